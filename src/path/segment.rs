use super::normalize::CursorState;
use super::{Command, CommandKind, PathData};
use crate::geometry::{ArcCenter, Point};

/// A path command resolved to absolute coordinates, with any implied
/// control points made explicit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Move(Point),
    Line(Point, Point),
    Quadratic(Point, Point, Point),
    Cubic(Point, Point, Point, Point),
    Arc {
        start: Point,
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
    /// Closepath, drawn as a line from the current point back to the
    /// subpath start
    Close(Point, Point),
}

impl Segment {
    pub fn start(&self) -> Point {
        match *self {
            Segment::Move(p) => p,
            Segment::Line(s, _)
            | Segment::Quadratic(s, _, _)
            | Segment::Cubic(s, _, _, _)
            | Segment::Close(s, _) => s,
            Segment::Arc { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Segment::Move(p) => p,
            Segment::Line(_, e)
            | Segment::Quadratic(_, _, e)
            | Segment::Cubic(_, _, _, e)
            | Segment::Close(_, e) => e,
            Segment::Arc { end, .. } => end,
        }
    }

    /// Start, control and end points in drawing order.
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Segment::Move(p) => vec![p],
            Segment::Line(s, e) | Segment::Close(s, e) => vec![s, e],
            Segment::Quadratic(s, c, e) => vec![s, c, e],
            Segment::Cubic(s, c1, c2, e) => vec![s, c1, c2, e],
            Segment::Arc { start, end, .. } => vec![start, end],
        }
    }

    pub fn is_drawing(&self) -> bool {
        !matches!(self, Segment::Move(_))
    }

    pub fn arc_center(&self) -> Option<ArcCenter> {
        match *self {
            Segment::Arc {
                start,
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                end,
            } => ArcCenter::from_endpoints(start, end, rx, ry, rotation, large_arc, sweep),
            _ => None,
        }
    }

    /// The absolute longhand command drawing this segment.
    pub fn to_command(&self) -> Command {
        match *self {
            Segment::Move(p) => Command::move_to(p),
            Segment::Line(_, e) => Command::line_to(e),
            Segment::Quadratic(_, c, e) => Command::quadratic(c, e),
            Segment::Cubic(_, c1, c2, e) => Command::cubic(c1, c2, e),
            Segment::Arc {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                end,
                ..
            } => Command::arc(rx, ry, rotation, large_arc, sweep, end),
            Segment::Close(..) => Command::close(),
        }
    }
}

/// Iterator resolving each command of a `PathData` into a `Segment`.
///
/// Produces exactly one segment per command, so indices line up with the
/// source path.
pub struct Segments<'a> {
    commands: std::slice::Iter<'a, Command>,
    cursor: CursorState,
    // reflected control points for S/s and T/t
    prev_cubic_cp2: Option<Point>,
    prev_quad_cp: Option<Point>,
}

impl<'a> Segments<'a> {
    pub fn new(path: &'a PathData) -> Self {
        Self {
            commands: path.iter(),
            cursor: CursorState::default(),
            prev_cubic_cp2: None,
            prev_quad_cp: None,
        }
    }

    fn abs(&self, kind: CommandKind, x: f64, y: f64) -> Point {
        if kind.is_relative() {
            Point::new(self.cursor.x + x, self.cursor.y + y)
        } else {
            Point::new(x, y)
        }
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let cmd = self.commands.next()?;
        let kind = cmd.kind();
        let v = cmd.values();
        let current = self.cursor.point();

        let mut cubic_cp2 = None;
        let mut quad_cp = None;
        let segment = match kind.absolute() {
            CommandKind::MoveAbs => Segment::Move(self.abs(kind, v[0], v[1])),
            CommandKind::LineAbs => Segment::Line(current, self.abs(kind, v[0], v[1])),
            CommandKind::HLineAbs => {
                let x = if kind.is_relative() { current.x + v[0] } else { v[0] };
                Segment::Line(current, Point::new(x, current.y))
            }
            CommandKind::VLineAbs => {
                let y = if kind.is_relative() { current.y + v[0] } else { v[0] };
                Segment::Line(current, Point::new(current.x, y))
            }
            CommandKind::CubicAbs => {
                let cp1 = self.abs(kind, v[0], v[1]);
                let cp2 = self.abs(kind, v[2], v[3]);
                cubic_cp2 = Some(cp2);
                Segment::Cubic(current, cp1, cp2, self.abs(kind, v[4], v[5]))
            }
            CommandKind::SmoothCubicAbs => {
                // "The first control point is assumed to be the reflection of the second
                //  control point on the previous command relative to the current point.
                //  If there is no previous command or if the previous command was not an
                //  C, c, S or s, assume the first control point is coincident with the
                //  current point."
                let cp1 = self
                    .prev_cubic_cp2
                    .map_or(current, |cp| cp.reflect_about(current));
                let cp2 = self.abs(kind, v[0], v[1]);
                cubic_cp2 = Some(cp2);
                Segment::Cubic(current, cp1, cp2, self.abs(kind, v[2], v[3]))
            }
            CommandKind::QuadAbs => {
                let cp = self.abs(kind, v[0], v[1]);
                quad_cp = Some(cp);
                Segment::Quadratic(current, cp, self.abs(kind, v[2], v[3]))
            }
            CommandKind::SmoothQuadAbs => {
                // "(If there is no previous command or if the previous command was not a
                //  Q, q, T or t, assume the control point is coincident with the
                //  current point.)"
                let cp = self
                    .prev_quad_cp
                    .map_or(current, |cp| cp.reflect_about(current));
                quad_cp = Some(cp);
                Segment::Quadratic(current, cp, self.abs(kind, v[0], v[1]))
            }
            CommandKind::ArcAbs => Segment::Arc {
                start: current,
                rx: v[0],
                ry: v[1],
                rotation: v[2],
                large_arc: v[3] != 0.,
                sweep: v[4] != 0.,
                end: self.abs(kind, v[5], v[6]),
            },
            _ => Segment::Close(current, self.cursor.subpath_start()),
        };
        self.prev_cubic_cp2 = cubic_cp2;
        self.prev_quad_cp = quad_cp;
        self.cursor.advance(cmd);
        Some(segment)
    }
}

impl PathData {
    /// Iterate over the commands resolved to absolute longhand segments.
    pub fn segments(&self) -> Segments<'_> {
        Segments::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse;

    #[test]
    fn test_segments_resolve() {
        let path = parse("M10 10 h 5 v5 l -5 0 z").unwrap();
        let segs: Vec<_> = path.segments().collect();
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[1], Segment::Line(Point::new(10., 10.), Point::new(15., 10.)));
        assert_eq!(segs[2].end(), Point::new(15., 15.));
        assert_eq!(segs[3].end(), Point::new(10., 15.));
        assert_eq!(
            segs[4],
            Segment::Close(Point::new(10., 15.), Point::new(10., 10.))
        );
    }

    #[test]
    fn test_segments_shorthand() {
        let path = parse("M0 0 C 0 10 10 10 10 0 S 20 -10 20 0").unwrap();
        let segs: Vec<_> = path.segments().collect();
        assert_eq!(
            segs[2],
            Segment::Cubic(
                Point::new(10., 0.),
                Point::new(10., -10.),
                Point::new(20., -10.),
                Point::new(20., 0.)
            )
        );

        // T with no previous quadratic uses the current point
        let path = parse("M0 0 L 5 5 T 10 0").unwrap();
        let segs: Vec<_> = path.segments().collect();
        assert_eq!(
            segs[2],
            Segment::Quadratic(Point::new(5., 5.), Point::new(5., 5.), Point::new(10., 0.))
        );

        // chained T reflects the implied control point
        let path = parse("M0 0 Q 5 5 10 0 T 20 0 T 30 0").unwrap();
        let segs: Vec<_> = path.segments().collect();
        assert_eq!(
            segs[2],
            Segment::Quadratic(Point::new(10., 0.), Point::new(15., -5.), Point::new(20., 0.))
        );
        assert_eq!(
            segs[3],
            Segment::Quadratic(Point::new(20., 0.), Point::new(25., 5.), Point::new(30., 0.))
        );
    }

    #[test]
    fn test_segments_relative_arc() {
        let path = parse("M 10 10 a 5 5 0 0 1 10 0").unwrap();
        let seg = path.segments().nth(1).unwrap();
        assert_eq!(seg.end(), Point::new(20., 10.));
        let arc = seg.arc_center().unwrap();
        assert!((arc.center.x - 15.).abs() < 1e-9);
    }
}
