use std::ops::{Add, Div, Mul, Neg, Sub};

/// A location in user coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation towards `other`; `t == 0.5` is the midpoint.
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            (other.x - self.x) * t + self.x,
            (other.y - self.y) * t + self.y,
        )
    }

    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Length when treated as a vector
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Squared length when treated as a vector
    pub fn sqr(&self) -> f64 {
        self.dot(*self)
    }

    /// Reflect `self` through `center`, as used for shorthand control points.
    pub fn reflect_about(&self, center: Point) -> Point {
        Point::new(2. * center.x - self.x, 2. * center.y - self.y)
    }

    /// True if the mean absolute difference of the coordinates is below `tolerance`.
    pub fn same_point(&self, other: Point, tolerance: f64) -> bool {
        let diff = ((self.x - other.x).abs() + (self.y - other.y).abs()) / 2.;
        diff < tolerance
    }

    /// Angle of the line from `self` to `other`, in degrees.
    pub fn angle_to(&self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

/// Angle at vertex `b` of the triangle `a b c`, in degrees.
///
/// Uses the law of cosines; returns NaN if `b` coincides with `a` or `c`.
pub fn angle_abc(a: Point, b: Point, c: Point) -> f64 {
    let ba = a.distance(b);
    let ac = a.distance(c);
    let bc = c.distance(b);
    let cos = (ba * ba + bc * bc - ac * ac) / (2. * ba * bc);
    cos.clamp(-1., 1.).acos().to_degrees()
}

/// Intersection of the lines `p1-p2` and `p3-p4`.
///
/// With `exact` set, the intersection must lie strictly inside both
/// segments; otherwise the lines are treated as infinite. Parallel lines
/// never intersect.
pub fn line_intersection(p1: Point, p2: Point, p3: Point, p4: Point, exact: bool) -> Option<Point> {
    let denominator = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denominator == 0. {
        return None;
    }
    let a = p1.y - p3.y;
    let b = p1.x - p3.x;
    let ua = ((p4.x - p3.x) * a - (p4.y - p3.y) * b) / denominator;
    let ub = ((p2.x - p1.x) * a - (p2.y - p1.y) * b) / denominator;

    let point = Point::new(p1.x + ua * (p2.x - p1.x), p1.y + ua * (p2.y - p1.y));
    let on_segments = ua > 0. && ua < 1. && ub > 0. && ub < 1.;
    if exact && !on_segments {
        None
    } else {
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_in_delta;

    #[test]
    fn test_point_ops() {
        let a = Point::new(1., 2.);
        let b = Point::new(4., 6.);
        assert_eq!(a.distance(b), 5.);
        assert_eq!(a.lerp(b, 0.5), Point::new(2.5, 4.));
        assert_eq!(a + b, Point::new(5., 8.));
        assert_eq!(b - a, Point::new(3., 4.));
        assert_eq!(a * 2., Point::new(2., 4.));
        assert_eq!(a.reflect_about(Point::new(2., 2.)), Point::new(3., 2.));
        assert!(a.same_point(Point::new(1.1, 2.1), 0.2));
        assert!(!a.same_point(Point::new(1.5, 2.5), 0.2));
    }

    #[test]
    fn test_angle_abc() {
        let right = angle_abc(Point::new(1., 0.), Point::new(0., 0.), Point::new(0., 1.));
        assert_in_delta!(right, 90., 1e-9);
        let straight = angle_abc(Point::new(-1., 0.), Point::new(0., 0.), Point::new(1., 0.));
        assert_in_delta!(straight, 180., 1e-9);
        // the angle is measured at b, not at a
        let corner = angle_abc(Point::new(0., 0.), Point::new(10., 0.), Point::new(10., 10.));
        assert_in_delta!(corner, 90., 1e-9);
        let sixty = angle_abc(Point::new(1., 0.), Point::new(0., 0.), Point::new(0.5, 0.75_f64.sqrt()));
        assert_in_delta!(sixty, 60., 1e-9);
    }

    #[test]
    fn test_line_intersection() {
        let x = line_intersection(
            Point::new(0., 0.),
            Point::new(10., 10.),
            Point::new(0., 10.),
            Point::new(10., 0.),
            true,
        );
        assert_eq!(x, Some(Point::new(5., 5.)));

        // Segments which don't overlap only meet when extended
        let (p1, p2, p3, p4) = (
            Point::new(0., 0.),
            Point::new(1., 1.),
            Point::new(0., 10.),
            Point::new(1., 9.),
        );
        assert_eq!(line_intersection(p1, p2, p3, p4, true), None);
        assert_eq!(
            line_intersection(p1, p2, p3, p4, false),
            Some(Point::new(5., 5.))
        );

        // parallel
        assert_eq!(
            line_intersection(
                Point::new(0., 0.),
                Point::new(1., 0.),
                Point::new(0., 1.),
                Point::new(1., 1.),
                false
            ),
            None
        );
    }
}
