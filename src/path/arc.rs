use std::f64::consts::FRAC_PI_2;

use super::{Command, CommandKind, PathData, Segment};
use crate::errors::{Error, GeometryError, Result};
use crate::geometry::{ArcCenter, Point};

#[cfg(feature = "json")]
use serde_derive::Deserialize;

use tracing::debug;

/// Best cubic approximation factor for a quarter circle; slightly better
/// than the `4/3 * tan(pi/8)` of the general formula.
const QUARTER_ARC_K: f64 = 0.5519150244935106;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct ArcOptions {
    /// Largest sweep (degrees) covered by a single cubic
    pub angle_threshold: f64,
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self {
            angle_threshold: 90.,
        }
    }
}

/// Split the sweep into equal ranges no larger than `threshold` radians.
fn angle_ranges(start_angle: f64, sweep: f64, threshold: f64) -> Vec<(f64, f64)> {
    // allow for rounding noise so a sweep of exactly the threshold is one range
    let count = ((sweep.abs() / threshold) - 1e-9).ceil().max(1.) as usize;
    let step = sweep / count as f64;
    (0..count)
        .map(|i| {
            let from = start_angle + step * i as f64;
            (from, from + step)
        })
        .collect()
}

/// Cubic control points for a unit-circle arc between two angles.
fn unit_arc(from: f64, to: f64) -> [Point; 3] {
    let delta = to - from;
    let k = if (delta.abs() - FRAC_PI_2).abs() < 1e-12 {
        QUARTER_ARC_K.copysign(delta)
    } else {
        4. / 3. * (delta / 4.).tan()
    };
    let (y1, x1) = from.sin_cos();
    let (y2, x2) = to.sin_cos();
    [
        Point::new(x1 - y1 * k, y1 + x1 * k),
        Point::new(x2 + y2 * k, y2 - x2 * k),
        Point::new(x2, y2),
    ]
}

/// Cubics approximating the arc described by a centre parametrization.
///
/// The final end point is `end` exactly, so joins stay watertight.
fn center_arc_to_cubic(arc: &ArcCenter, end: Point, threshold_deg: f64) -> Vec<Command> {
    let (sin_phi, cos_phi) = arc.phi.sin_cos();
    let map = |p: Point| {
        let (x, y) = (p.x * arc.rx, p.y * arc.ry);
        Point::new(
            arc.center.x + x * cos_phi - y * sin_phi,
            arc.center.y + x * sin_phi + y * cos_phi,
        )
    };
    let ranges = angle_ranges(
        arc.start_angle,
        arc.sweep_angle,
        threshold_deg.max(1.).to_radians(),
    );
    let last = ranges.len() - 1;
    ranges
        .into_iter()
        .enumerate()
        .map(|(idx, (from, to))| {
            let [cp1, cp2, seg_end] = unit_arc(from, to);
            let seg_end = if idx == last { end } else { map(seg_end) };
            Command::cubic(map(cp1), map(cp2), seg_end)
        })
        .collect()
}

/// Convert a single arc command starting at `start` into cubic curves.
///
/// `arc` may be absolute or relative. Arcs with a zero radius or
/// coincident endpoints cannot be represented this way and give
/// `GeometryError::DegenerateArc`.
pub fn arc_to_cubic(start: Point, arc: &Command, options: &ArcOptions) -> Result<Vec<Command>> {
    if !arc.kind().is_arc() {
        return Err(Error::InvalidValue(
            "arc command".to_string(),
            arc.letter().to_string(),
        ));
    }
    let v = arc.values();
    let mut end = Point::new(v[5], v[6]);
    if arc.kind() == CommandKind::ArcRel {
        end = end + start;
    }
    let center = ArcCenter::from_endpoints(start, end, v[0], v[1], v[2], v[3] != 0., v[4] != 0.)
        .ok_or(GeometryError::DegenerateArc)?;
    Ok(center_arc_to_cubic(&center, end, options.angle_threshold))
}

/// Replace every arc in the path with cubic curves.
///
/// The result is absolute longhand. Degenerate arcs become straight lines.
pub fn arcs_to_cubic(path: &PathData, angle_threshold: f64) -> PathData {
    let mut out = PathData::default();
    for seg in path.segments() {
        match (seg, seg.arc_center()) {
            (Segment::Arc { end, .. }, Some(center)) => {
                out.extend(center_arc_to_cubic(&center, end, angle_threshold));
            }
            (Segment::Arc { end, .. }, None) => {
                debug!(?end, "degenerate arc replaced by a line");
                out.push(Command::line_to(end));
            }
            _ => out.push(seg.to_command()),
        }
    }
    out
}
