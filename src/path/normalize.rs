use super::{arcs_to_cubic, quadratics_to_cubic, Command, CommandKind, PathData, Segment};
use crate::geometry::Point;
use crate::types::round_to;

#[cfg(feature = "json")]
use serde_derive::Deserialize;

/// Current point and subpath start while walking a path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
    pub subpath_start_x: f64,
    pub subpath_start_y: f64,
}

impl CursorState {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn subpath_start(&self) -> Point {
        Point::new(self.subpath_start_x, self.subpath_start_y)
    }

    /// Move the cursor past `cmd`, which may be absolute or relative.
    pub fn advance(&mut self, cmd: &Command) {
        let kind = cmd.kind();
        let v = cmd.values();
        let (dx, dy) = if kind.is_relative() {
            (self.x, self.y)
        } else {
            (0., 0.)
        };
        match kind.absolute() {
            CommandKind::ClosePath => {
                self.x = self.subpath_start_x;
                self.y = self.subpath_start_y;
            }
            CommandKind::HLineAbs => self.x = v[0] + dx,
            CommandKind::VLineAbs => self.y = v[0] + dy,
            _ => {
                let n = v.len();
                self.x = v[n - 2] + dx;
                self.y = v[n - 1] + dy;
                if kind.is_move() {
                    self.subpath_start_x = self.x;
                    self.subpath_start_y = self.y;
                }
            }
        }
    }
}

/// Offset every coordinate in `values` by (`dx`, `dy`).
///
/// Arc radii, rotation and flags are left alone.
fn offset_values(kind: CommandKind, values: &[f64], dx: f64, dy: f64) -> Vec<f64> {
    match kind.absolute() {
        CommandKind::HLineAbs => vec![values[0] + dx],
        CommandKind::VLineAbs => vec![values[0] + dy],
        CommandKind::ArcAbs => {
            let mut v = values.to_vec();
            v[5] += dx;
            v[6] += dy;
            v
        }
        _ => values
            .iter()
            .enumerate()
            .map(|(i, v)| if i % 2 == 0 { v + dx } else { v + dy })
            .collect(),
    }
}

/// Convert every command to its absolute form.
pub fn to_absolute(path: &PathData) -> PathData {
    let mut cursor = CursorState::default();
    path.iter()
        .map(|cmd| {
            let kind = cmd.kind();
            let abs = if kind.is_relative() {
                Command::from_parts(
                    kind.absolute(),
                    offset_values(kind, cmd.values(), cursor.x, cursor.y),
                )
            } else {
                cmd.clone()
            };
            cursor.advance(cmd);
            abs
        })
        .collect()
}

/// Convert every command except the initial moveto to relative form.
pub fn to_relative(path: &PathData) -> PathData {
    let mut cursor = CursorState::default();
    path.iter()
        .enumerate()
        .map(|(idx, cmd)| {
            let kind = cmd.kind();
            let rel = if idx == 0 || kind.is_relative() || kind.is_close() {
                cmd.clone()
            } else {
                Command::from_parts(
                    kind.relative(),
                    offset_values(kind, cmd.values(), -cursor.x, -cursor.y),
                )
            };
            cursor.advance(cmd);
            rel
        })
        .collect()
}

/// Expand H, V, S and T into L, C and Q. The result is absolute.
pub fn to_longhand(path: &PathData) -> PathData {
    path.segments().map(|seg| seg.to_command()).collect()
}

/// Comparison precision used when detecting shorthand opportunities.
///
/// Values are multiplied by the scale and rounded to the given number of
/// decimals before being compared, so e.g. `cubic_scale: 3.0` with
/// `cubic_decimals: 0` treats control points within about a third of a
/// unit as equal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct ShorthandTolerance {
    pub line_scale: f64,
    pub line_decimals: u32,
    pub quad_scale: f64,
    pub quad_decimals: u32,
    pub cubic_scale: f64,
    pub cubic_decimals: u32,
}

impl Default for ShorthandTolerance {
    fn default() -> Self {
        Self {
            line_scale: 2.,
            line_decimals: 1,
            quad_scale: 1.,
            quad_decimals: 1,
            cubic_scale: 3.,
            cubic_decimals: 0,
        }
    }
}

fn near(a: f64, b: f64, scale: f64, decimals: u32) -> bool {
    round_to(a * scale, decimals) == round_to(b * scale, decimals)
}

fn near_point(a: Point, b: Point, scale: f64, decimals: u32) -> bool {
    near(a.x, b.x, scale, decimals) && near(a.y, b.y, scale, decimals)
}

/// Replace L, C and Q with H/V, S and T where the geometry allows.
///
/// The result is absolute. A Q (or C) only becomes T (or S) when the
/// previous segment was of the same family and its reflected control
/// point matches within `tolerance`.
pub fn to_shorthand(path: &PathData, tolerance: &ShorthandTolerance) -> PathData {
    let tol = tolerance;
    let mut prev: Option<Segment> = None;
    let mut out = PathData::default();
    for seg in path.segments() {
        let cmd = match seg {
            Segment::Line(start, end) => {
                let same_y = near(start.y, end.y, tol.line_scale, tol.line_decimals);
                let same_x = near(start.x, end.x, tol.line_scale, tol.line_decimals);
                match (same_x, same_y) {
                    (false, true) => Command::h_line_to(end.x),
                    (true, false) => Command::v_line_to(end.y),
                    _ => seg.to_command(),
                }
            }
            Segment::Quadratic(start, cp, end) => match prev {
                Some(Segment::Quadratic(_, prev_cp, _))
                    if near_point(
                        cp,
                        prev_cp.reflect_about(start),
                        tol.quad_scale,
                        tol.quad_decimals,
                    ) =>
                {
                    Command::smooth_quadratic(end)
                }
                _ => seg.to_command(),
            },
            Segment::Cubic(start, cp1, cp2, end) => match prev {
                Some(Segment::Cubic(_, _, prev_cp2, _))
                    if near_point(
                        cp1,
                        prev_cp2.reflect_about(start),
                        tol.cubic_scale,
                        tol.cubic_decimals,
                    ) =>
                {
                    Command::smooth_cubic(cp2, end)
                }
                _ => seg.to_command(),
            },
            _ => seg.to_command(),
        };
        out.push(cmd);
        prev = Some(seg);
    }
    out
}

/// Which normalization passes to run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct NormalizeOptions {
    pub absolute: bool,
    pub longhand: bool,
    pub arcs_to_cubic: bool,
    pub quadratics_to_cubic: bool,
    /// Maximum sweep (degrees) of each cubic produced from an arc
    pub arc_angle_threshold: f64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            absolute: true,
            longhand: true,
            arcs_to_cubic: false,
            quadratics_to_cubic: false,
            arc_angle_threshold: 90.,
        }
    }
}

/// Apply the selected normalization passes.
///
/// Curve conversions imply absolute longhand output.
pub fn normalize(path: &PathData, options: &NormalizeOptions) -> PathData {
    let mut path = if options.longhand || options.arcs_to_cubic || options.quadratics_to_cubic {
        to_longhand(path)
    } else if options.absolute {
        to_absolute(path)
    } else {
        path.clone()
    };
    if options.arcs_to_cubic {
        path = arcs_to_cubic(&path, options.arc_angle_threshold);
    }
    if options.quadratics_to_cubic {
        path = quadratics_to_cubic(&path);
    }
    path
}
