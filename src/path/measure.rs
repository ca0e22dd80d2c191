use super::bezier::{cubic_derivative, cubic_point, quadratic_derivative, quadratic_point};
use super::{arcs_to_cubic, to_longhand, PathData, Segment};
use crate::errors::{GeometryError, Result};
use crate::geometry::Point;

// 12-point Gauss-Legendre abscissae and weights on [-1, 1]
const GAUSS_T: [f64; 12] = [
    -0.1252334085114689,
    0.1252334085114689,
    -0.3678314989981802,
    0.3678314989981802,
    -0.5873179542866175,
    0.5873179542866175,
    -0.7699026741943047,
    0.7699026741943047,
    -0.9041172563704749,
    0.9041172563704749,
    -0.9815606342467192,
    0.9815606342467192,
];
const GAUSS_C: [f64; 12] = [
    0.2491470458134028,
    0.2491470458134028,
    0.2334925365383548,
    0.2334925365383548,
    0.2031674267230659,
    0.2031674267230659,
    0.1600783285433462,
    0.1600783285433462,
    0.1069393259953184,
    0.1069393259953184,
    0.0471753363865118,
    0.0471753363865118,
];

/// Integrate `f` over `[0, t]` with 12-point Gauss-Legendre quadrature.
pub fn gauss_legendre(f: impl Fn(f64) -> f64, t: f64) -> f64 {
    let half = t / 2.;
    GAUSS_T
        .iter()
        .zip(GAUSS_C)
        .map(|(x, c)| c * f(half * x + half))
        .sum::<f64>()
        * half
}

/// Length of a cubic Bezier from `t = 0` to `t`.
pub fn cubic_length(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> f64 {
    if t <= 0. {
        return 0.;
    }
    gauss_legendre(|u| cubic_derivative(p0, c1, c2, p3, u).length(), t.min(1.))
}

/// Length of a quadratic Bezier from `t = 0` to `t`.
pub fn quadratic_length(p0: Point, c: Point, p1: Point, t: f64) -> f64 {
    if t <= 0. {
        return 0.;
    }
    gauss_legendre(|u| quadratic_derivative(p0, c, p1, u).length(), t.min(1.))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Line,
    Cubic,
    Quadratic,
}

/// Measured drawing segment within a `LengthLookup`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLength {
    pub kind: SegmentKind,
    pub total: f64,
    /// Distance along the whole path at equally spaced `t` values;
    /// the first entry is where this segment starts, the last where it ends.
    pub cumulative_lengths: Vec<f64>,
    /// Start point, control points and end point.
    pub points: Vec<Point>,
}

impl SegmentLength {
    fn end_length(&self) -> f64 {
        self.cumulative_lengths.last().copied().unwrap_or_default()
    }

    fn point_at_t(&self, t: f64) -> Point {
        match (self.kind, self.points.as_slice()) {
            (SegmentKind::Cubic, [p0, p1, p2, p3]) => cubic_point(*p0, *p1, *p2, *p3, t),
            (SegmentKind::Quadratic, [p0, p1, p2]) => quadratic_point(*p0, *p1, *p2, t),
            (_, [p0, .., p1]) => p0.lerp(*p1, t),
            (_, [p]) => *p,
            (_, []) => Point::default(),
        }
    }
}

/// Precomputed arc-length table for a path, used to find points at a
/// given distance along it.
///
/// The table reflects the path at the time it was built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LengthLookup {
    pub total_length: f64,
    pub segments: Vec<SegmentLength>,
}

impl LengthLookup {
    pub fn point_at_length(&self, length: f64) -> Option<Point> {
        point_at_length(self, length)
    }
}

/// Measure every drawing segment of the path.
///
/// Curves are sampled at `t_divisions` equal parameter steps. Closepath
/// is measured as a line back to the subpath start. Arcs must be
/// converted to cubics first.
pub fn build_length_lookup(path: &PathData, t_divisions: usize) -> Result<LengthLookup> {
    let divisions = t_divisions.max(1);
    let mut lookup = LengthLookup::default();
    let mut path_length = 0.;
    for seg in to_longhand(path).segments() {
        let (kind, points) = match seg {
            Segment::Move(_) => continue,
            Segment::Arc { .. } => return Err(GeometryError::UnsupportedArc.into()),
            Segment::Line(s, e) | Segment::Close(s, e) => (SegmentKind::Line, vec![s, e]),
            Segment::Quadratic(s, c, e) => (SegmentKind::Quadratic, vec![s, c, e]),
            Segment::Cubic(s, c1, c2, e) => (SegmentKind::Cubic, vec![s, c1, c2, e]),
        };
        let length_at = |t: f64| match points.as_slice() {
            [p0, p1, p2, p3] => cubic_length(*p0, *p1, *p2, *p3, t),
            [p0, p1, p2] => quadratic_length(*p0, *p1, *p2, t),
            [p0, p1] => p0.distance(*p1) * t,
            _ => 0.,
        };
        let cumulative_lengths: Vec<f64> = if kind == SegmentKind::Line {
            vec![path_length, path_length + length_at(1.)]
        } else {
            (0..=divisions)
                .map(|d| path_length + length_at(d as f64 / divisions as f64))
                .collect()
        };
        let total = cumulative_lengths.last().copied().unwrap_or(path_length) - path_length;
        path_length += total;
        lookup.segments.push(SegmentLength {
            kind,
            total,
            cumulative_lengths,
            points,
        });
    }
    lookup.total_length = path_length;
    Ok(lookup)
}

/// Point at the given distance along the path.
///
/// Distances outside the path clamp to its first or last point. Returns
/// `None` only if the path has no drawing segments.
pub fn point_at_length(lookup: &LengthLookup, length: f64) -> Option<Point> {
    let first = lookup.segments.first()?;
    let last = lookup.segments.last()?;
    if length <= 0. {
        return first.points.first().copied();
    }
    if length >= lookup.total_length {
        return last.points.last().copied();
    }

    let Some(seg) = lookup.segments.iter().find(|s| s.end_length() > length) else {
        return last.points.last().copied();
    };
    let t = match seg.kind {
        SegmentKind::Line => 1. - (seg.end_length() - length) / seg.total,
        SegmentKind::Cubic | SegmentKind::Quadratic => {
            let lengths = &seg.cumulative_lengths;
            let step = 1. / (lengths.len() - 1) as f64;
            let idx = lengths
                .iter()
                .position(|l| *l > length)
                .unwrap_or(lengths.len() - 1)
                .max(1);
            let (prev, cur) = (lengths[idx - 1], lengths[idx]);
            let span = cur - prev;
            let frac = if span > 0. { (cur - length) / span } else { 0. };
            idx as f64 * step - step * frac
        }
    };
    Some(seg.point_at_t(t.clamp(0., 1.)))
}

/// Total length of the path, with any arcs approximated by cubics.
pub fn path_length(path: &PathData) -> Result<f64> {
    let path = arcs_to_cubic(path, 90.);
    Ok(build_length_lookup(&path, 10)?.total_length)
}
