use super::{Command, PathData, Segment};
use crate::geometry::Point;

use tracing::debug;

/// Split a compound path into its subpaths.
///
/// Each subpath starts with an absolute moveto; the remaining commands keep
/// their original form. Drawing commands directly after a closepath start a
/// new subpath at the closed subpath's start point, as SVG renders them.
pub fn split_subpaths(path: &PathData) -> Vec<PathData> {
    let mut subpaths: Vec<PathData> = Vec::new();
    let mut after_close = false;
    for (cmd, seg) in path.iter().zip(path.segments()) {
        match seg {
            Segment::Move(p) => subpaths.push(PathData::new(vec![Command::move_to(p)])),
            _ => {
                if after_close || subpaths.is_empty() {
                    subpaths.push(PathData::new(vec![Command::move_to(seg.start())]));
                }
                if let Some(current) = subpaths.last_mut() {
                    current.push(cmd.clone());
                }
            }
        }
        after_close = matches!(seg, Segment::Close(..));
    }
    subpaths
}

/// Concatenate subpaths back into a single path.
pub fn join_subpaths(subpaths: impl IntoIterator<Item = PathData>) -> PathData {
    subpaths.into_iter().flatten().collect()
}

/// Insert an explicit lineto before each closepath whose current point is
/// not already at the subpath start.
pub fn add_closing_lineto(path: &PathData) -> PathData {
    let mut out = PathData::default();
    for (cmd, seg) in path.iter().zip(path.segments()) {
        if let Segment::Close(from, to) = seg {
            if from != to {
                out.push(Command::line_to(to));
            }
        }
        out.push(cmd.clone());
    }
    out
}

/// Drawing segments of a single subpath, with the closing line made
/// explicit when the subpath is closed.
struct SubpathOutline {
    start: Point,
    drawing: Vec<Segment>,
    closed: bool,
}

impl SubpathOutline {
    fn new(subpath: &PathData) -> Self {
        let segments: Vec<Segment> = subpath.segments().collect();
        let start = segments.first().map(|s| s.start()).unwrap_or_default();
        let closed = matches!(segments.last(), Some(Segment::Close(..)));
        let mut drawing = Vec::new();
        for seg in segments {
            match seg {
                Segment::Move(_) => {}
                Segment::Close(from, to) => {
                    if from != to {
                        drawing.push(Segment::Line(from, to));
                    }
                }
                _ => drawing.push(seg),
            }
        }
        Self {
            start,
            drawing,
            closed,
        }
    }

    /// Emit `M start`, the given segments, and `Z` if closed.
    ///
    /// A final line back to the start of a closed subpath is left to the
    /// closepath.
    fn emit(&self, start: Point, segments: impl IntoIterator<Item = Command>) -> PathData {
        let mut cmds = vec![Command::move_to(start)];
        cmds.extend(segments);
        if self.closed {
            if cmds.len() > 2
                && cmds
                    .last()
                    .is_some_and(|c| c.letter() == 'L' && c.end_point() == Some(start))
            {
                cmds.pop();
            }
            cmds.push(Command::close());
        }
        PathData::new(cmds)
    }

    fn reversed(&self) -> PathData {
        let start = if self.closed {
            self.start
        } else {
            self.drawing.last().map_or(self.start, |s| s.end())
        };
        self.emit(start, self.drawing.iter().rev().map(reverse_segment))
    }
}

/// The command drawing `seg` backwards, ending at its start point.
fn reverse_segment(seg: &Segment) -> Command {
    match *seg {
        Segment::Move(p) => Command::move_to(p),
        Segment::Line(s, _) | Segment::Close(s, _) => Command::line_to(s),
        Segment::Quadratic(s, c, _) => Command::quadratic(c, s),
        Segment::Cubic(s, c1, c2, _) => Command::cubic(c2, c1, s),
        Segment::Arc {
            start,
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            ..
        } => Command::arc(rx, ry, rotation, large_arc, !sweep, start),
    }
}

/// Reverse the drawing direction of every subpath.
///
/// The result is absolute longhand. Closed subpaths keep their start point
/// and closepath; open subpaths start from their previous end point.
pub fn reverse_path_data(path: &PathData) -> PathData {
    join_subpaths(
        split_subpaths(path)
            .iter()
            .map(|sub| SubpathOutline::new(sub).reversed()),
    )
}

/// Rotate each closed subpath so it starts at its `offset`-th vertex.
///
/// Offsets wrap around the number of vertices. Open subpaths have no
/// equivalent rotation and are returned unchanged. Rotated subpaths are
/// absolute longhand.
pub fn shift_starting_point(path: &PathData, offset: usize) -> PathData {
    join_subpaths(split_subpaths(path).into_iter().map(|sub| {
        let outline = SubpathOutline::new(&sub);
        let count = outline.drawing.len();
        if !outline.closed || count == 0 {
            if !outline.closed && offset != 0 {
                debug!("open subpath left unshifted");
            }
            return sub;
        }
        let k = offset % count;
        if k == 0 {
            return sub;
        }
        let new_start = outline.drawing[k - 1].end();
        let rotated = outline.drawing[k..]
            .iter()
            .chain(&outline.drawing[..k])
            .map(|seg| seg.to_command());
        outline.emit(new_start, rotated)
    }))
}
