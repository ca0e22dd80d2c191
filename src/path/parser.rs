use super::syntax::{PathSyntax, SvgPathSyntax};
use super::{Command, CommandKind, PathData};
use crate::errors::{ParseError, Result};

use tracing::debug;

type ParseResult<T> = std::result::Result<T, ParseError>;

struct PathParser {
    tokens: SvgPathSyntax,
    // current command being processed; most commands take multiple parameter
    // sets without repeating the command character
    command: Option<CommandKind>,
    commands: Vec<Command>,
}

impl PathParser {
    fn new(data: &str) -> Self {
        Self {
            tokens: SvgPathSyntax::new(data),
            command: None,
            commands: Vec::new(),
        }
    }

    fn process_instruction(&mut self) -> ParseResult<()> {
        let kind = if self.tokens.at_command() {
            let kind = self.tokens.read_command()?;
            if self.commands.is_empty() && !kind.is_move() {
                return Err(ParseError::MissingMoveTo(kind.letter()));
            }
            kind
        } else {
            // "The command letter can be eliminated on subsequent commands if the same
            // command is used multiple times in a row"
            match self.command {
                // "If a moveto is followed by multiple pairs of coordinates,
                // the subsequent pairs are treated as implicit lineto commands."
                Some(CommandKind::MoveAbs) => CommandKind::LineAbs,
                Some(CommandKind::MoveRel) => CommandKind::LineRel,
                Some(kind) => kind,
                None if self.commands.is_empty() => {
                    let found = self.tokens.current().unwrap_or_default();
                    return Err(ParseError::MissingMoveTo(found));
                }
                None => return Err(self.tokens.malformed()),
            }
        };

        if kind.is_close() {
            self.commands.push(Command::close());
            // Z takes no values, so anything other than a new command
            // letter after it is an error.
            self.command = None;
            return Ok(());
        }
        self.command = Some(kind);

        let values = self.read_values(kind)?;
        let kind = if self.commands.is_empty() {
            // the initial moveto is always absolute; a relative one is
            // relative to the origin.
            CommandKind::MoveAbs
        } else {
            kind
        };
        self.commands.push(Command::from_parts(kind, values));
        Ok(())
    }

    fn read_values(&mut self, kind: CommandKind) -> ParseResult<Vec<f64>> {
        let arity = kind.arity();
        let mut values = Vec::with_capacity(arity);
        while values.len() < arity {
            if self.tokens.at_end() || self.tokens.at_command() {
                return Err(ParseError::ArityMismatch {
                    command: kind.letter(),
                    expected: arity,
                    found: values.len(),
                });
            }
            let value = match (kind.is_arc(), values.len()) {
                // "(rx ry x-axis-rotation large-arc-flag sweep-flag x y)+"
                (true, 0 | 1) => self.tokens.read_non_negative()?,
                (true, 3 | 4) => f64::from(u8::from(self.tokens.read_flag()?)),
                _ => self.tokens.read_number()?,
            };
            values.push(value);
        }
        Ok(values)
    }

    fn evaluate(mut self) -> ParseResult<PathData> {
        self.tokens.skip_whitespace();
        while !self.tokens.at_end() {
            self.process_instruction()?;
            self.tokens.skip_whitespace();
        }
        Ok(PathData::new(self.commands))
    }
}

/// Parse SVG path data text.
///
/// Parsing is all-or-nothing: any malformed token rejects the whole path.
/// Empty (or whitespace-only) input gives an empty `PathData`.
pub fn parse(data: &str) -> Result<PathData> {
    PathParser::new(data).evaluate().map_err(|err| {
        debug!(%err, data, "rejected path data");
        err.into()
    })
}
