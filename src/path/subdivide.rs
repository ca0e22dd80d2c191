use std::f64::consts::PI;

use super::bezier::{split_cubic, split_quadratic};
use super::{to_longhand, Command, PathData, Segment};
use crate::errors::{Error, Result};
use crate::geometry::{ArcCenter, Point};

use tracing::debug;

// bisection steps when locating a point by arc length; 2^-48 of the sweep
const ARC_BISECT_STEPS: usize = 48;

/// Parametric angle at which the arc length from the start reaches
/// `target`.
fn arc_angle_at_length(arc: &ArcCenter, target: f64) -> f64 {
    let (mut lo, mut hi) = (0., 1.);
    for _ in 0..ARC_BISECT_STEPS {
        let mid = (lo + hi) / 2.;
        let angle = arc.start_angle + arc.sweep_angle * mid;
        if arc.length_between(arc.start_angle, angle) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    arc.start_angle + arc.sweep_angle * (lo + hi) / 2.
}

/// Two arcs covering `arc`, divided where `t` of its length is reached.
fn split_arc(arc: &ArcCenter, rotation: f64, sweep: bool, end: Point, t: f64) -> [Command; 2] {
    let split_angle = arc_angle_at_length(arc, arc.length() * t);
    let mid = arc.point_at_angle(split_angle);
    let first_sweep = split_angle - arc.start_angle;
    let second_sweep = arc.end_angle() - split_angle;
    [
        Command::arc(arc.rx, arc.ry, rotation, first_sweep.abs() > PI, sweep, mid),
        Command::arc(arc.rx, arc.ry, rotation, second_sweep.abs() > PI, sweep, end),
    ]
}

/// Split the drawing command at `index` into two at parameter `t`.
///
/// The path is converted to absolute longhand first, so `index` refers to
/// the same command either way. Curves split with de Casteljau's
/// algorithm; arcs split where `t` of their length is reached, and
/// closepaths gain an explicit line to the split point.
pub fn split_segment_at_t(path: &PathData, index: usize, t: f64) -> Result<PathData> {
    if !(t > 0. && t < 1.) {
        return Err(Error::InvalidValue("split parameter".to_string(), t.to_string()));
    }
    let path = to_longhand(path);
    let invalid_index = || Error::InvalidValue("segment index".to_string(), index.to_string());
    let seg = path.segments().nth(index).ok_or_else(invalid_index)?;

    let replacement = match seg {
        Segment::Move(_) => return Err(invalid_index()),
        Segment::Line(s, e) => vec![Command::line_to(s.lerp(e, t)), Command::line_to(e)],
        Segment::Close(s, e) => vec![Command::line_to(s.lerp(e, t)), Command::close()],
        Segment::Quadratic(s, c, e) => {
            let (first, second) = split_quadratic(s, c, e, t);
            vec![
                Command::quadratic(first[1], first[2]),
                Command::quadratic(second[1], second[2]),
            ]
        }
        Segment::Cubic(s, c1, c2, e) => {
            let (first, second) = split_cubic(s, c1, c2, e, t);
            vec![
                Command::cubic(first[1], first[2], first[3]),
                Command::cubic(second[1], second[2], second[3]),
            ]
        }
        Segment::Arc {
            start,
            rotation,
            sweep,
            end,
            ..
        } => match seg.arc_center() {
            Some(arc) => split_arc(&arc, rotation, sweep, end, t).to_vec(),
            None => {
                debug!(index, "splitting degenerate arc as a line");
                vec![Command::line_to(start.lerp(end, t)), Command::line_to(end)]
            }
        },
    };

    let mut cmds = path.into_inner();
    cmds.splice(index..=index, replacement);
    Ok(PathData::new(cmds))
}

/// Halve the drawing command at `index` `passes` times, giving
/// `2^passes` equal-parameter pieces.
pub fn split_segment_n_times(path: &PathData, index: usize, passes: u32) -> Result<PathData> {
    let mut path = to_longhand(path);
    let mut pieces = 1;
    for _ in 0..passes {
        // split from the back so earlier indices stay valid
        for offset in (0..pieces).rev() {
            path = split_segment_at_t(&path, index + offset, 0.5)?;
        }
        pieces *= 2;
    }
    Ok(path)
}
