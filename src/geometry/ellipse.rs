use std::f64::consts::PI;

use super::Point;

const EPSILON: f64 = 1e-9;

/// Centre parametrization of an elliptical arc.
///
/// Angles are in radians; `sweep_angle` is signed (positive runs in the
/// direction of increasing angle, which is clockwise on screen in y-down
/// coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCenter {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    /// x-axis rotation in radians
    pub phi: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl ArcCenter {
    /// Convert an SVG endpoint arc to centre form.
    ///
    /// Radii too small to span the endpoints are scaled up uniformly, see
    /// <https://www.w3.org/TR/SVG2/implnote.html#ArcCorrectionOutOfRangeRadii>.
    /// Returns `None` for zero radii or coincident endpoints, which SVG
    /// renders as a straight line (or nothing).
    pub fn from_endpoints(
        start: Point,
        end: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Option<Self> {
        if rx.abs() < EPSILON || ry.abs() < EPSILON || start.distance(end) < EPSILON {
            return None;
        }
        let (rx, ry) = (rx.abs(), ry.abs());
        let phi = x_axis_rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let x1_prime = cos_phi * (start.x - end.x) / 2. + sin_phi * (start.y - end.y) / 2.;
        let y1_prime = -sin_phi * (start.x - end.x) / 2. + cos_phi * (start.y - end.y) / 2.;

        let lambda = (x1_prime * x1_prime) / (rx * rx) + (y1_prime * y1_prime) / (ry * ry);
        let (rx, ry) = if lambda > 1. {
            (rx * lambda.sqrt(), ry * lambda.sqrt())
        } else {
            (rx, ry)
        };

        let (center, start_angle, sweep_angle) =
            endpoint_to_center(start, end, rx, ry, phi, large_arc, sweep);
        Some(Self {
            center,
            rx,
            ry,
            phi,
            start_angle,
            sweep_angle,
        })
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    pub fn point_at_angle(&self, angle: f64) -> Point {
        ellipse_point(self.center, self.rx, self.ry, self.phi, angle)
    }

    /// Magnitude of the derivative with respect to the parametric angle.
    pub fn speed_at_angle(&self, angle: f64) -> f64 {
        let (sin_t, cos_t) = angle.sin_cos();
        (self.rx * sin_t).hypot(self.ry * cos_t)
    }

    /// Arc length between two parametric angles (12-point Gauss-Legendre
    /// per quarter turn).
    pub fn length_between(&self, from: f64, to: f64) -> f64 {
        use crate::path::measure::gauss_legendre;

        let span = to - from;
        let pieces = ((span.abs() / (PI / 2.)).ceil() as usize).max(1);
        let step = span / pieces as f64;
        (0..pieces)
            .map(|i| {
                let a = from + step * i as f64;
                gauss_legendre(|t| self.speed_at_angle(a + step * t), 1.) * step.abs()
            })
            .sum()
    }

    pub fn length(&self) -> f64 {
        self.length_between(self.start_angle, self.end_angle())
    }

    /// Extremal points (in x or y) lying within the arc sweep.
    pub fn extrema(&self) -> Vec<Point> {
        let (rx, ry, phi) = (self.rx, self.ry, self.phi);
        let mut angles = Vec::new();
        let (sin_phi, cos_phi) = phi.sin_cos();
        if sin_phi.abs() < EPSILON || cos_phi.abs() < EPSILON {
            // axis-aligned (or 90 degree rotated): extrema at cardinal angles
            angles.extend([0., PI / 2., PI, 3. * PI / 2.]);
        } else {
            // dx/dt = 0
            let tan_t = -ry * sin_phi / (rx * cos_phi);
            angles.extend([tan_t.atan(), tan_t.atan() + PI]);
            // dy/dt = 0
            let tan_t = ry * cos_phi / (rx * sin_phi);
            angles.extend([tan_t.atan(), tan_t.atan() + PI]);
        }

        angles
            .into_iter()
            .filter(|angle| angle_in_sweep(*angle, self.start_angle, self.sweep_angle))
            .map(|angle| self.point_at_angle(angle))
            .collect()
    }
}

// Implements https://www.w3.org/TR/SVG2/implnote.html#ArcConversionEndpointToCenter
fn endpoint_to_center(
    start: Point,
    end: Point,
    rx: f64,
    ry: f64,
    phi: f64,
    large_arc_flag: bool,
    sweep_flag: bool,
) -> (Point, f64, f64) {
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Step 1: Compute (x1', y1')
    let x1_prime = cos_phi * (start.x - end.x) / 2. + sin_phi * (start.y - end.y) / 2.;
    let y1_prime = -sin_phi * (start.x - end.x) / 2. + cos_phi * (start.y - end.y) / 2.;

    // Step 2: Compute (cx', cy')
    let sign = if large_arc_flag != sweep_flag { 1. } else { -1. };
    let coeff_sq = ((rx * ry).powi(2) - (rx * y1_prime).powi(2) - (ry * x1_prime).powi(2))
        / ((rx * y1_prime).powi(2) + (ry * x1_prime).powi(2));
    let coeff = sign * coeff_sq.max(0.).sqrt();
    let cx_prime = coeff * (rx * y1_prime) / ry;
    let cy_prime = coeff * -(ry * x1_prime) / rx;

    // Step 3: Compute (cx, cy) from (cx', cy')
    let cx = cos_phi * cx_prime - sin_phi * cy_prime + (start.x + end.x) / 2.;
    let cy = sin_phi * cx_prime + cos_phi * cy_prime + (start.y + end.y) / 2.;

    // Step 4: Compute theta1 and delta_theta angles
    fn angle_between(u: Point, v: Point) -> f64 {
        let det = u.x * v.y - u.y * v.x;
        det.atan2(u.dot(v))
    }

    let u = Point::new((x1_prime - cx_prime) / rx, (y1_prime - cy_prime) / ry);
    let v = Point::new((-x1_prime - cx_prime) / rx, (-y1_prime - cy_prime) / ry);
    let theta1 = angle_between(Point::new(1., 0.), u);
    let mut delta_theta = angle_between(u, v);

    if sweep_flag && delta_theta < 0. {
        delta_theta += 2. * PI;
    } else if !sweep_flag && delta_theta > 0. {
        delta_theta -= 2. * PI;
    }

    (Point::new(cx, cy), theta1, delta_theta)
}

/// Point on a rotated ellipse at parametric angle `t` (radians).
pub fn ellipse_point(center: Point, rx: f64, ry: f64, phi: f64, t: f64) -> Point {
    let (sin_t, cos_t) = t.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();

    Point::new(
        center.x + rx * cos_t * cos_phi - ry * sin_t * sin_phi,
        center.y + rx * cos_t * sin_phi + ry * sin_t * cos_phi,
    )
}

/// True if `angle` lies within the (signed) sweep starting at `start_angle`.
pub fn angle_in_sweep(angle: f64, start_angle: f64, sweep_angle: f64) -> bool {
    if sweep_angle.abs() < EPSILON {
        return false;
    }

    let delta = (angle - start_angle).rem_euclid(2. * PI);
    if sweep_angle > 0. {
        delta <= sweep_angle
    } else {
        let delta = if delta > 0. { delta - 2. * PI } else { delta };
        delta >= sweep_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_in_delta;

    #[test]
    fn test_arc_center() {
        // quarter circle from (1,0) to (0,1) around the origin
        let arc = ArcCenter::from_endpoints(
            Point::new(1., 0.),
            Point::new(0., 1.),
            1.,
            1.,
            0.,
            false,
            true,
        )
        .unwrap();
        assert_in_delta!(arc.center.x, 0., 1e-12);
        assert_in_delta!(arc.center.y, 0., 1e-12);
        assert_in_delta!(arc.start_angle, 0., 1e-12);
        assert_in_delta!(arc.sweep_angle, PI / 2., 1e-12);
        assert_in_delta!(arc.length(), PI / 2., 1e-9);

        let mid = arc.point_at_angle(PI / 4.);
        assert_in_delta!(mid.x, (PI / 4.).cos(), 1e-12);
        assert_in_delta!(mid.y, (PI / 4.).sin(), 1e-12);
    }

    #[test]
    fn test_arc_radius_scaling() {
        // radius 1 cannot span a distance of 10; it is scaled to 5
        let arc = ArcCenter::from_endpoints(
            Point::new(0., 0.),
            Point::new(10., 0.),
            1.,
            1.,
            0.,
            false,
            true,
        )
        .unwrap();
        assert_in_delta!(arc.rx, 5., 1e-9);
        assert_in_delta!(arc.center.x, 5., 1e-9);
        assert_in_delta!(arc.sweep_angle.abs(), PI, 1e-9);
    }

    #[test]
    fn test_arc_degenerate() {
        let p = Point::new(3., 4.);
        assert!(ArcCenter::from_endpoints(p, Point::new(5., 5.), 0., 1., 0., false, true).is_none());
        assert!(ArcCenter::from_endpoints(p, p, 1., 1., 0., false, true).is_none());
    }

    #[test]
    fn test_angle_in_sweep() {
        assert!(angle_in_sweep(PI / 4., 0., PI / 2.));
        assert!(!angle_in_sweep(PI, 0., PI / 2.));
        assert!(angle_in_sweep(-PI / 4., 0., -PI / 2.));
        assert!(!angle_in_sweep(PI / 4., 0., -PI / 2.));
        assert!(angle_in_sweep(0.1, 3. * PI / 2., PI));
    }

    #[test]
    fn test_arc_extrema() {
        // half circle from (0,0) to (10,0); positive sweep passes through y = -5
        let arc = ArcCenter::from_endpoints(
            Point::new(0., 0.),
            Point::new(10., 0.),
            5.,
            5.,
            0.,
            false,
            true,
        )
        .unwrap();
        let extrema = arc.extrema();
        assert!(extrema
            .iter()
            .any(|p| (p.x - 5.).abs() < 1e-9 && (p.y + 5.).abs() < 1e-9));
        assert!(extrema.iter().all(|p| p.y <= 1e-9));
    }
}
