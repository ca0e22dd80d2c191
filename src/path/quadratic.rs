//! Conversion between quadratic and cubic Bezier curves.
//!
//! Cubic to quadratic approximation follows the approach of the fontello
//! `cubic2quad` library: split at inflection points, then try an
//! increasing number of equal sub-segments until every piece fits.

use itertools::Itertools;
use tracing::warn;

use super::bezier::{solve_quadratic, split_cubic};
use super::{Command, PathData, Segment};
use crate::errors::FitError;
use crate::geometry::Point;

/// Most sub-segments tried per cubic piece before giving up.
const MAX_SEGMENTS: usize = 8;

/// Exact degree elevation of the quadratic `p0 q p1`; returns the two
/// cubic control points.
pub fn quadratic_to_cubic(p0: Point, q: Point, p1: Point) -> (Point, Point) {
    (p0 + (q - p0) * (2. / 3.), p1 + (q - p1) * (2. / 3.))
}

/// Replace every quadratic with an equivalent cubic. The result is
/// absolute longhand.
pub fn quadratics_to_cubic(path: &PathData) -> PathData {
    path.segments()
        .map(|seg| match seg {
            Segment::Quadratic(p0, q, p1) => {
                let (cp1, cp2) = quadratic_to_cubic(p0, q, p1);
                Command::cubic(cp1, cp2, p1)
            }
            _ => seg.to_command(),
        })
        .collect()
}

/// A quadratic segment as (start, control, end).
pub type Quad = [Point; 3];

/// Outcome of approximating a cubic with quadratics.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticFit {
    pub quads: Vec<Quad>,
    /// Set when the tolerance could not be met with the maximum number of
    /// segments; `quads` then holds the best attempt.
    pub warning: Option<FitError>,
}

/// Cubic in power basis: `a*t^3 + b*t^2 + c*t + d`.
#[derive(Debug, Clone, Copy)]
struct PowerCubic {
    a: Point,
    b: Point,
    c: Point,
    d: Point,
}

impl PowerCubic {
    fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            a: p3 - p0 + (p1 - p2) * 3.,
            b: (p0 + p2) * 3. - p1 * 6.,
            c: (p1 - p0) * 3.,
            d: p0,
        }
    }

    fn point(&self, t: f64) -> Point {
        ((self.a * t + self.b) * t + self.c) * t + self.d
    }

    fn derivative(&self, t: f64) -> Point {
        (self.a * (3. * t) + self.b * 2.) * t + self.c
    }
}

/// Squared distance from `p` to the segment `a`-`b`.
fn min_distance_to_line_sq(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.sqr();
    let u = if len_sq == 0. { 0. } else { (p - a).dot(ab) / len_sq };
    if u <= 0. {
        (p - a).sqr()
    } else if u >= 1. {
        (p - b).sqr()
    } else {
        (p - (a + ab * u)).sqr()
    }
}

/// Quadratic matching the cubic between `t0` and `t1`: the control point
/// is where the end tangents meet, or the midpoint when they are parallel.
fn process_segment(cubic: &PowerCubic, t0: f64, t1: f64) -> Quad {
    let start = cubic.point(t0);
    let end = cubic.point(t1);
    let d0 = cubic.derivative(t0);
    let d1 = cubic.derivative(t1);
    let cross = -d0.x * d1.y + d1.x * d0.y;
    if cross.abs() < 1e-8 {
        return [start, start.lerp(end, 0.5), end];
    }
    let k0 = end.y * d1.x - end.x * d1.y;
    let k1 = start.x * d0.y - start.y * d0.x;
    let cp = Point::new(
        (d0.x * k0 + d1.x * k1) / cross,
        (d0.y * k0 + d1.y * k1) / cross,
    );
    [start, cp, end]
}

fn polyline_min_sq(p: Point, polyline: &[Point]) -> f64 {
    polyline
        .iter()
        .tuple_windows()
        .map(|(a, b)| min_distance_to_line_sq(p, *a, *b))
        .fold(f64::INFINITY, f64::min)
}

/// True if the cubic between `t0` and `t1` and the quadratic stay within
/// `tolerance` of each other, checked with 11 samples in each direction.
fn is_segment_close(cubic: &PowerCubic, t0: f64, t1: f64, quad: &Quad, tolerance: f64) -> bool {
    const SAMPLES: usize = 10;
    let tol_sq = tolerance * tolerance;
    let [q0, q1, q2] = *quad;
    let cubic_pts: Vec<Point> = (0..=SAMPLES)
        .map(|i| cubic.point(t0 + (t1 - t0) * i as f64 / SAMPLES as f64))
        .collect();
    let quad_pts: Vec<Point> = (0..=SAMPLES)
        .map(|i| super::bezier::quadratic_point(q0, q1, q2, i as f64 / SAMPLES as f64))
        .collect();

    let inner = 1..SAMPLES;
    cubic_pts[inner.clone()]
        .iter()
        .all(|p| polyline_min_sq(*p, &quad_pts) <= tol_sq)
        && quad_pts[inner]
            .iter()
            .all(|p| polyline_min_sq(*p, &cubic_pts) <= tol_sq)
}

/// Approximate a cubic with no inflection points.
fn fit_simple(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f64) -> (Vec<Quad>, bool) {
    let cubic = PowerCubic::new(p0, p1, p2, p3);
    let mut best = Vec::new();
    for count in 1..=MAX_SEGMENTS {
        let step = 1. / count as f64;
        let quads: Vec<Quad> = (0..count)
            .map(|i| process_segment(&cubic, i as f64 * step, (i + 1) as f64 * step))
            .collect();
        if count == 1 {
            // a control point behind either end folds the curve back on itself
            let cp = quads[0][1];
            if (cp - p0).dot(p1 - p0) < 0. || (cp - p3).dot(p2 - p3) < 0. {
                continue;
            }
        }
        let close = quads.iter().enumerate().all(|(i, quad)| {
            is_segment_close(&cubic, i as f64 * step, (i + 1) as f64 * step, quad, tolerance)
        });
        if close {
            return (quads, true);
        }
        best = quads;
    }
    (best, false)
}

/// Parameters in (0, 1) where the cubic changes its direction of turn.
fn inflections(p0: Point, p1: Point, p2: Point, p3: Point) -> Vec<f64> {
    let (x1, y1, x2, y2, x3, y3, x4, y4) = (p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
    let a = -x4 * (y1 - 2. * y2 + y3) + x3 * (2. * y1 - 3. * y2 + y4) + x1 * (y2 - 2. * y3 + y4)
        - x2 * (y1 - 3. * y3 + 2. * y4);
    let b = x4 * (y1 - y2) + 3. * x3 * (-y1 + y2) + x2 * (2. * y1 - 3. * y3 + y4)
        - x1 * (2. * y2 - 3. * y3 + y4);
    let c = x3 * (y1 - y2) + x1 * (y2 - y3) + x2 * (-y1 + y3);
    let mut roots: Vec<f64> = solve_quadratic(a, b, c)
        .into_iter()
        .filter(|t| *t > 1e-8 && *t < 1. - 1e-8)
        .collect();
    roots.sort_by(f64::total_cmp);
    roots
}

/// Approximate the cubic `p0 p1 p2 p3` with quadratics deviating by no
/// more than `tolerance`.
pub fn cubic_to_quadratic(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f64) -> QuadraticFit {
    let mut quads = Vec::new();
    let mut all_close = true;
    let mut rest = [p0, p1, p2, p3];
    let mut prev_t = 0.;
    for t in inflections(p0, p1, p2, p3) {
        let local_t = (t - prev_t) / (1. - prev_t);
        let (head, tail) = split_cubic(rest[0], rest[1], rest[2], rest[3], local_t);
        let (piece, close) = fit_simple(head[0], head[1], head[2], head[3], tolerance);
        quads.extend(piece);
        all_close &= close;
        rest = tail;
        prev_t = t;
    }
    let (piece, close) = fit_simple(rest[0], rest[1], rest[2], rest[3], tolerance);
    quads.extend(piece);
    all_close &= close;

    let warning = if all_close {
        None
    } else {
        warn!(
            tolerance,
            segments = quads.len(),
            "cubic approximation exceeds tolerance"
        );
        Some(FitError::ToleranceNotMet {
            tolerance,
            segments: quads.len(),
        })
    };
    QuadraticFit { quads, warning }
}

/// Path with every cubic replaced by quadratics, plus any soft failures.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticPath {
    pub path: PathData,
    pub warnings: Vec<FitError>,
}

/// Replace every cubic in the path with approximating quadratics.
///
/// The result is absolute longhand; fitting failures are collected rather
/// than aborting the conversion.
pub fn cubics_to_quadratic(path: &PathData, tolerance: f64) -> QuadraticPath {
    let mut out = PathData::default();
    let mut warnings = Vec::new();
    for seg in path.segments() {
        match seg {
            Segment::Cubic(p0, p1, p2, p3) => {
                let fit = cubic_to_quadratic(p0, p1, p2, p3, tolerance);
                let last = fit.quads.len().saturating_sub(1);
                out.extend(fit.quads.iter().enumerate().map(|(i, [_, cp, end])| {
                    // keep the original end point exactly
                    Command::quadratic(*cp, if i == last { p3 } else { *end })
                }));
                warnings.extend(fit.warning);
            }
            _ => out.push(seg.to_command()),
        }
    }
    QuadraticPath {
        path: out,
        warnings,
    }
}
