//! Evaluation, subdivision and extrema of quadratic and cubic Bezier curves.

use crate::geometry::Point;

/// Point on a cubic Bezier at parameter `t` (Bernstein form).
pub fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1. - t;
    p0 * (mt * mt * mt) + p1 * (3. * mt * mt * t) + p2 * (3. * mt * t * t) + p3 * (t * t * t)
}

/// Point on a quadratic Bezier at parameter `t`.
pub fn quadratic_point(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1. - t;
    p0 * (mt * mt) + p1 * (2. * mt * t) + p2 * (t * t)
}

pub fn cubic_derivative(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1. - t;
    (p1 - p0) * (3. * mt * mt) + (p2 - p1) * (6. * mt * t) + (p3 - p2) * (3. * t * t)
}

pub fn quadratic_derivative(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    (p1 - p0) * (2. * (1. - t)) + (p2 - p1) * (2. * t)
}

/// Split a cubic at `t` using de Casteljau's algorithm.
pub fn split_cubic(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    t: f64,
) -> ([Point; 4], [Point; 4]) {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    let c = p2.lerp(p3, t);
    let ab = a.lerp(b, t);
    let bc = b.lerp(c, t);
    let mid = ab.lerp(bc, t);
    ([p0, a, ab, mid], [mid, bc, c, p3])
}

/// Split a quadratic at `t` using de Casteljau's algorithm.
pub fn split_quadratic(p0: Point, p1: Point, p2: Point, t: f64) -> ([Point; 3], [Point; 3]) {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    let mid = a.lerp(b, t);
    ([p0, a, mid], [mid, b, p2])
}

/// Compute the extremal points of a quadratic Bezier
/// by solving for dx/dt = 0, dy/dt = 0
pub fn quadratic_extrema(start: Point, cp: Point, end: Point) -> Vec<Point> {
    // Compute stationary point t for one dimension,
    // if it lies in (0,1) (the range of t for the curve)
    fn stationary_t(p0: f64, p1: f64, p2: f64) -> Option<f64> {
        // B'(t) = 2(1-t)(p1-p0) + 2t(p2-p1)
        // B'(t) == 0  when  t = (p0-p1) / (p0-2p1+p2)
        let denom = p0 - 2. * p1 + p2;
        if denom.abs() < 1e-12 {
            None
        } else {
            Some((p0 - p1) / denom).filter(|t| *t > 0. && *t < 1.)
        }
    }

    [
        stationary_t(start.x, cp.x, end.x),
        stationary_t(start.y, cp.y, end.y),
    ]
    .into_iter()
    .flatten()
    .map(|t| quadratic_point(start, cp, end, t))
    .collect()
}

/// Compute the extremal points of a cubic Bezier.
pub fn cubic_extrema(start: Point, cp1: Point, cp2: Point, end: Point) -> Vec<Point> {
    fn stationary_ts(p0: f64, p1: f64, p2: f64, p3: f64) -> Vec<f64> {
        // Derivative of cubic Bezier: B'(t) = 3(1-t)^2 * (p1-p0) + 6(1-t)t(p2-p1) + 3t^2 * (p3-p2)
        // Rearranging to standard form: at^2 + bt + c = 0
        let a = 3. * (p3 - 3. * p2 + 3. * p1 - p0);
        let b = 6. * (p2 - 2. * p1 + p0);
        let c = 3. * (p1 - p0);

        solve_quadratic(a, b, c)
            .into_iter()
            .filter(|t| *t > 0. && *t < 1.)
            .collect()
    }

    let mut all_t = stationary_ts(start.x, cp1.x, cp2.x, end.x);
    all_t.extend(stationary_ts(start.y, cp1.y, cp2.y, end.y));

    all_t
        .into_iter()
        .map(|t| cubic_point(start, cp1, cp2, end, t))
        .collect()
}

/// Real roots of `a*t^2 + b*t + c = 0`, degrading to the linear case
/// when `a` vanishes.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    const EPSILON: f64 = 1e-12;
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            vec![]
        } else {
            vec![-c / b]
        }
    } else {
        let disc = b * b - 4. * a * c;
        if disc.abs() < EPSILON {
            vec![-b / (2. * a)]
        } else if disc < 0. {
            vec![]
        } else {
            let sqrt_disc = disc.sqrt();
            vec![(-b - sqrt_disc) / (2. * a), (-b + sqrt_disc) / (2. * a)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_in_delta;

    fn assert_point_eq(p: Point, q: Point) {
        assert_in_delta!(p.x, q.x, 1e-9);
        assert_in_delta!(p.y, q.y, 1e-9);
    }

    #[test]
    fn test_bezier_points() {
        let (p0, p1, p2, p3) = (
            Point::new(0., 0.),
            Point::new(0., 10.),
            Point::new(10., 10.),
            Point::new(10., 0.),
        );
        assert_eq!(cubic_point(p0, p1, p2, p3, 0.), p0);
        assert_eq!(cubic_point(p0, p1, p2, p3, 1.), p3);
        assert_point_eq(cubic_point(p0, p1, p2, p3, 0.5), Point::new(5., 7.5));
        assert_point_eq(quadratic_point(p0, p1, p3, 0.5), Point::new(2.5, 5.));
        assert_point_eq(cubic_derivative(p0, p1, p2, p3, 0.), Point::new(0., 30.));
        assert_point_eq(quadratic_derivative(p0, p1, p3, 1.), Point::new(20., -20.));
    }

    #[test]
    fn test_split() {
        let (p0, p1, p2, p3) = (
            Point::new(0., 0.),
            Point::new(2., 8.),
            Point::new(7., 9.),
            Point::new(10., 0.),
        );
        let (first, second) = split_cubic(p0, p1, p2, p3, 0.3);
        assert_eq!(first[0], p0);
        assert_eq!(second[3], p3);
        assert_point_eq(first[3], cubic_point(p0, p1, p2, p3, 0.3));
        // a point on the second half maps back to the original curve
        assert_point_eq(
            cubic_point(second[0], second[1], second[2], second[3], 0.5),
            cubic_point(p0, p1, p2, p3, 0.65),
        );

        let (first, second) = split_quadratic(p0, p1, p3, 0.5);
        assert_point_eq(first[2], quadratic_point(p0, p1, p3, 0.5));
        assert_eq!(second[2], p3);
    }

    #[test]
    fn test_extrema() {
        let ext = quadratic_extrema(Point::new(0., 0.), Point::new(5., 10.), Point::new(10., 0.));
        assert_eq!(ext.len(), 1);
        assert_point_eq(ext[0], Point::new(5., 5.));

        let ext = cubic_extrema(
            Point::new(0., 0.),
            Point::new(0., 10.),
            Point::new(10., 10.),
            Point::new(10., 0.),
        );
        assert_eq!(ext.len(), 1);
        assert_point_eq(ext[0], Point::new(5., 7.5));
    }

    #[test]
    fn test_solve_quadratic() {
        assert_eq!(solve_quadratic(1., -3., 2.), vec![1., 2.]);
        assert_eq!(solve_quadratic(0., 2., -1.), vec![0.5]);
        assert!(solve_quadratic(1., 0., 1.).is_empty());
        assert!(solve_quadratic(0., 0., 1.).is_empty());
    }
}
