use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;

use crate::errors::{Error, ParseError, Result};
use crate::geometry::Point;

#[cfg(feature = "json")]
use serde_derive::{Deserialize, Serialize};

/// The nineteen SVG path commands.
///
/// Absolute and relative forms are distinct kinds; closepath has a single
/// kind since `Z` and `z` behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(into = "char", try_from = "char"))]
pub enum CommandKind {
    MoveAbs,
    MoveRel,
    LineAbs,
    LineRel,
    HLineAbs,
    HLineRel,
    VLineAbs,
    VLineRel,
    CubicAbs,
    CubicRel,
    SmoothCubicAbs,
    SmoothCubicRel,
    QuadAbs,
    QuadRel,
    SmoothQuadAbs,
    SmoothQuadRel,
    ArcAbs,
    ArcRel,
    ClosePath,
}

impl CommandKind {
    pub fn letter(&self) -> char {
        use CommandKind::*;
        match self {
            MoveAbs => 'M',
            MoveRel => 'm',
            LineAbs => 'L',
            LineRel => 'l',
            HLineAbs => 'H',
            HLineRel => 'h',
            VLineAbs => 'V',
            VLineRel => 'v',
            CubicAbs => 'C',
            CubicRel => 'c',
            SmoothCubicAbs => 'S',
            SmoothCubicRel => 's',
            QuadAbs => 'Q',
            QuadRel => 'q',
            SmoothQuadAbs => 'T',
            SmoothQuadRel => 't',
            ArcAbs => 'A',
            ArcRel => 'a',
            ClosePath => 'Z',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        use CommandKind::*;
        Some(match c {
            'M' => MoveAbs,
            'm' => MoveRel,
            'L' => LineAbs,
            'l' => LineRel,
            'H' => HLineAbs,
            'h' => HLineRel,
            'V' => VLineAbs,
            'v' => VLineRel,
            'C' => CubicAbs,
            'c' => CubicRel,
            'S' => SmoothCubicAbs,
            's' => SmoothCubicRel,
            'Q' => QuadAbs,
            'q' => QuadRel,
            'T' => SmoothQuadAbs,
            't' => SmoothQuadRel,
            'A' => ArcAbs,
            'a' => ArcRel,
            'Z' | 'z' => ClosePath,
            _ => return None,
        })
    }

    /// Number of values each instance of this command carries
    pub fn arity(&self) -> usize {
        use CommandKind::*;
        match self {
            ClosePath => 0,
            HLineAbs | HLineRel | VLineAbs | VLineRel => 1,
            MoveAbs | MoveRel | LineAbs | LineRel | SmoothQuadAbs | SmoothQuadRel => 2,
            QuadAbs | QuadRel | SmoothCubicAbs | SmoothCubicRel => 4,
            CubicAbs | CubicRel => 6,
            ArcAbs | ArcRel => 7,
        }
    }

    pub fn is_relative(&self) -> bool {
        self.letter().is_ascii_lowercase()
    }

    pub fn is_move(&self) -> bool {
        matches!(self, CommandKind::MoveAbs | CommandKind::MoveRel)
    }

    pub fn is_close(&self) -> bool {
        *self == CommandKind::ClosePath
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, CommandKind::ArcAbs | CommandKind::ArcRel)
    }

    /// The absolute form of this kind (unchanged if already absolute).
    pub fn absolute(&self) -> Self {
        Self::from_letter(self.letter().to_ascii_uppercase()).unwrap_or(*self)
    }

    /// The relative form of this kind (unchanged if already relative).
    pub fn relative(&self) -> Self {
        match self {
            CommandKind::ClosePath => CommandKind::ClosePath,
            _ => Self::from_letter(self.letter().to_ascii_lowercase()).unwrap_or(*self),
        }
    }
}

impl From<CommandKind> for char {
    fn from(kind: CommandKind) -> Self {
        kind.letter()
    }
}

impl TryFrom<char> for CommandKind {
    type Error = ParseError;

    fn try_from(c: char) -> std::result::Result<Self, Self::Error> {
        Self::from_letter(c).ok_or(ParseError::MalformedToken {
            position: 0,
            found: c.to_string(),
        })
    }
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A single path command with its numeric arguments.
///
/// The number of values always matches `kind.arity()`; arc flags are
/// stored as `0.0` / `1.0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "json",
    serde(try_from = "CommandRepr", into = "CommandRepr")
)]
pub struct Command {
    kind: CommandKind,
    values: Vec<f64>,
}

#[cfg(feature = "json")]
#[derive(Serialize, Deserialize)]
struct CommandRepr {
    #[serde(rename = "type")]
    kind: CommandKind,
    values: Vec<f64>,
}

#[cfg(feature = "json")]
impl TryFrom<CommandRepr> for Command {
    type Error = Error;

    fn try_from(repr: CommandRepr) -> Result<Self> {
        Command::new(repr.kind, repr.values)
    }
}

#[cfg(feature = "json")]
impl From<Command> for CommandRepr {
    fn from(cmd: Command) -> Self {
        Self {
            kind: cmd.kind,
            values: cmd.values,
        }
    }
}

impl Command {
    pub fn new(kind: CommandKind, values: Vec<f64>) -> Result<Self> {
        if values.len() != kind.arity() {
            return Err(ParseError::ArityMismatch {
                command: kind.letter(),
                expected: kind.arity(),
                found: values.len(),
            }
            .into());
        }
        Ok(Self { kind, values })
    }

    /// Build from values whose count is known to match the kind.
    pub(crate) fn from_parts(kind: CommandKind, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), kind.arity());
        Self { kind, values }
    }

    pub fn move_to(p: Point) -> Self {
        Self::from_parts(CommandKind::MoveAbs, vec![p.x, p.y])
    }

    pub fn line_to(p: Point) -> Self {
        Self::from_parts(CommandKind::LineAbs, vec![p.x, p.y])
    }

    pub fn h_line_to(x: f64) -> Self {
        Self::from_parts(CommandKind::HLineAbs, vec![x])
    }

    pub fn v_line_to(y: f64) -> Self {
        Self::from_parts(CommandKind::VLineAbs, vec![y])
    }

    pub fn cubic(cp1: Point, cp2: Point, end: Point) -> Self {
        Self::from_parts(
            CommandKind::CubicAbs,
            vec![cp1.x, cp1.y, cp2.x, cp2.y, end.x, end.y],
        )
    }

    pub fn smooth_cubic(cp2: Point, end: Point) -> Self {
        Self::from_parts(CommandKind::SmoothCubicAbs, vec![cp2.x, cp2.y, end.x, end.y])
    }

    pub fn quadratic(cp: Point, end: Point) -> Self {
        Self::from_parts(CommandKind::QuadAbs, vec![cp.x, cp.y, end.x, end.y])
    }

    pub fn smooth_quadratic(end: Point) -> Self {
        Self::from_parts(CommandKind::SmoothQuadAbs, vec![end.x, end.y])
    }

    pub fn arc(rx: f64, ry: f64, rotation: f64, large_arc: bool, sweep: bool, end: Point) -> Self {
        Self::from_parts(
            CommandKind::ArcAbs,
            vec![
                rx,
                ry,
                rotation,
                f64::from(u8::from(large_arc)),
                f64::from(u8::from(sweep)),
                end.x,
                end.y,
            ],
        )
    }

    pub fn close() -> Self {
        Self::from_parts(CommandKind::ClosePath, vec![])
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn letter(&self) -> char {
        self.kind.letter()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// The final coordinate pair, for kinds which carry one.
    ///
    /// H, V and Z need the current point to resolve an endpoint and
    /// return `None`; for relative kinds the pair is an offset.
    pub fn end_point(&self) -> Option<Point> {
        let n = self.values.len();
        match self.kind.absolute() {
            CommandKind::HLineAbs | CommandKind::VLineAbs | CommandKind::ClosePath => None,
            _ => Some(Point::new(self.values[n - 2], self.values[n - 1])),
        }
    }

    /// Arc flags as booleans (large-arc, sweep); `None` for non-arcs.
    pub fn arc_flags(&self) -> Option<(bool, bool)> {
        if self.kind.is_arc() {
            Some((self.values[3] != 0., self.values[4] != 0.))
        } else {
            None
        }
    }
}

/// An ordered sequence of path commands.
///
/// When produced by the parser the first command is always an absolute
/// moveto; every later moveto starts a new subpath.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(transparent))]
pub struct PathData(Vec<Command>);

impl PathData {
    pub fn new(commands: Vec<Command>) -> Self {
        Self(commands)
    }

    pub fn push(&mut self, cmd: Command) {
        self.0.push(cmd);
    }

    pub fn extend(&mut self, cmds: impl IntoIterator<Item = Command>) {
        self.0.extend(cmds);
    }

    pub fn into_inner(self) -> Vec<Command> {
        self.0
    }

    /// Number of subpaths, i.e. moveto commands.
    pub fn subpath_count(&self) -> usize {
        self.0.iter().filter(|c| c.kind().is_move()).count()
    }
}

impl Deref for PathData {
    type Target = [Command];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Command> for PathData {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PathData {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathData {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for PathData {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        super::parse(s)
    }
}

impl Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::serialize(self, &super::SerializeOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_letters() {
        for c in "MmLlHhVvCcSsQqTtAaZ".chars() {
            let kind = CommandKind::from_letter(c).unwrap();
            assert_eq!(kind.letter(), c);
        }
        assert_eq!(CommandKind::from_letter('z'), Some(CommandKind::ClosePath));
        assert_eq!(CommandKind::from_letter('x'), None);
    }

    #[test]
    fn test_kind_case() {
        assert_eq!(CommandKind::CubicRel.absolute(), CommandKind::CubicAbs);
        assert_eq!(CommandKind::ArcAbs.relative(), CommandKind::ArcRel);
        assert_eq!(CommandKind::ClosePath.relative(), CommandKind::ClosePath);
        assert!(CommandKind::MoveRel.is_relative());
        assert!(!CommandKind::ClosePath.is_relative());
    }

    #[test]
    fn test_command_arity() {
        assert!(Command::new(CommandKind::LineAbs, vec![1., 2.]).is_ok());
        let err = Command::new(CommandKind::CubicAbs, vec![1., 2., 3.]).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::ArityMismatch {
                command: 'C',
                expected: 6,
                found: 3
            })
        ));
    }

    #[test]
    fn test_command_accessors() {
        let arc = Command::arc(5., 5., 0., true, false, Point::new(10., 0.));
        assert_eq!(arc.values(), &[5., 5., 0., 1., 0., 10., 0.]);
        assert_eq!(arc.arc_flags(), Some((true, false)));
        assert_eq!(arc.end_point(), Some(Point::new(10., 0.)));
        assert_eq!(Command::h_line_to(3.).end_point(), None);
        assert_eq!(Command::close().end_point(), None);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_command_json() {
        let path = PathData::new(vec![
            Command::move_to(Point::new(1., 2.)),
            Command::line_to(Point::new(3., 4.)),
            Command::close(),
        ]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"M","values":[1.0,2.0]},{"type":"L","values":[3.0,4.0]},{"type":"Z","values":[]}]"#
        );
        let back: PathData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);

        assert!(serde_json::from_str::<PathData>(r#"[{"type":"L","values":[1.0]}]"#).is_err());
    }
}
