use itertools::Itertools;

use super::{BoundingBox, Point};

/// Signed shoelace area of a closed polygon.
///
/// The polygon is implicitly closed (last point joins the first). In a
/// y-down coordinate system (as SVG uses) a positive area means the points
/// run clockwise on screen.
pub fn polygon_area(points: &[Point]) -> f64 {
    points
        .iter()
        .circular_tuple_windows()
        .map(|(p, q)| p.x * q.y - q.x * p.y)
        .sum::<f64>()
        / 2.
}

/// True if the polygon winds clockwise in y-down coordinates.
pub fn is_clockwise_polygon(points: &[Point]) -> bool {
    polygon_area(points) > 0.
}

pub fn polygon_bbox(points: &[Point]) -> Option<BoundingBox> {
    BoundingBox::from_points(points.iter().copied())
}

/// Perimeter of the polygon; polylines are not closed back to the start.
pub fn polygon_length(points: &[Point], is_polyline: bool) -> f64 {
    let open: f64 = points.iter().tuple_windows().map(|(p, q)| p.distance(*q)).sum();
    match (is_polyline, points.first(), points.last()) {
        (false, Some(first), Some(last)) => open + last.distance(*first),
        _ => open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0., 0.),
            Point::new(size, 0.),
            Point::new(size, size),
            Point::new(0., size),
        ]
    }

    #[test]
    fn test_polygon_area() {
        assert_eq!(polygon_area(&square(10.)), 100.);
        let mut ccw = square(10.);
        ccw.reverse();
        assert_eq!(polygon_area(&ccw), -100.);
        assert!(is_clockwise_polygon(&square(10.)));
        assert!(!is_clockwise_polygon(&ccw));
        assert_eq!(polygon_area(&[]), 0.);
    }

    #[test]
    fn test_polygon_measure() {
        assert_eq!(polygon_length(&square(2.), false), 8.);
        assert_eq!(polygon_length(&square(2.), true), 6.);
        assert_eq!(
            polygon_bbox(&square(3.)),
            Some(BoundingBox::new(0., 0., 3., 3.))
        );
    }
}
