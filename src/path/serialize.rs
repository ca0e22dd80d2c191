use super::{arcs_to_cubic, to_absolute, to_longhand, to_relative, to_shorthand, CommandKind};
use super::{Command, PathData, ShorthandTolerance};
use crate::types::{fstr, round_to, strip_leading_zero};

#[cfg(feature = "json")]
use serde_derive::Deserialize;

/// Output choices when writing path data back to text.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct SerializeOptions {
    /// Round to this many decimal places; `None` writes values unrounded
    pub decimals: Option<u32>,
    pub relative: bool,
    /// Collapse commands into H/V/S/T where the geometry allows
    pub shorthands: bool,
    /// Expand H/V/S/T into L/C/Q. Ignored when `shorthands` is set; with
    /// neither, commands keep their input form.
    pub longhands: bool,
    /// Drop every separator and command letter the grammar allows
    pub minify: bool,
    pub arcs_to_cubic: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            decimals: Some(3),
            relative: true,
            shorthands: true,
            longhands: false,
            minify: false,
            arcs_to_cubic: false,
        }
    }
}

fn round_values(path: &PathData, decimals: u32) -> PathData {
    path.iter()
        .map(|cmd| {
            Command::from_parts(
                cmd.kind(),
                cmd.values().iter().map(|v| round_to(*v, decimals)).collect(),
            )
        })
        .collect()
}

/// Whether the command letter can be left for the parser to infer.
fn implicit_letter(prev: Option<CommandKind>, kind: CommandKind) -> bool {
    use CommandKind::*;
    match prev {
        Some(MoveAbs) => kind == LineAbs,
        Some(MoveRel) => kind == LineRel,
        Some(prev) => prev == kind && !kind.is_move() && !kind.is_close(),
        None => false,
    }
}

/// Write path data as the text of an SVG `d` attribute.
///
/// Coordinates are rounded on absolute values before any conversion to
/// relative form, so rounding errors do not accumulate along the path.
pub fn serialize(path: &PathData, options: &SerializeOptions) -> String {
    let mut work = if options.arcs_to_cubic {
        arcs_to_cubic(path, 90.)
    } else {
        to_absolute(path)
    };
    if let Some(decimals) = options.decimals {
        work = round_values(&work, decimals);
    }
    if options.shorthands {
        work = to_shorthand(&work, &ShorthandTolerance::default());
    } else if options.longhands {
        work = to_longhand(&work);
    }
    if options.relative {
        work = to_relative(&work);
    }

    let minify = options.minify;
    // a leading moveto is absolute either way; lowercase lets a relative
    // lineto follow it implicitly
    let leading_rel_move = minify
        && work.len() > 1
        && work[0].kind() == CommandKind::MoveAbs
        && work[1].kind() == CommandKind::LineRel;

    let mut out = String::new();
    let mut last_number: Option<String> = None;
    let mut prev_kind: Option<CommandKind> = None;
    for (idx, cmd) in work.iter().enumerate() {
        let kind = if idx == 0 && leading_rel_move {
            CommandKind::MoveRel
        } else {
            cmd.kind()
        };
        if !(minify && implicit_letter(prev_kind, kind)) {
            if !minify && !out.is_empty() {
                out.push(' ');
            }
            let letter = kind.letter();
            out.push(if minify && kind.is_close() { 'z' } else { letter });
            last_number = None;
        }
        for v in cmd.values() {
            let mut num = fstr(*v, options.decimals);
            if minify {
                num = strip_leading_zero(&num);
            }
            if let Some(prev) = &last_number {
                let needs_sep = !minify
                    || !(num.starts_with('-') || (num.starts_with('.') && prev.contains('.')));
                if needs_sep {
                    out.push(' ');
                }
            }
            out.push_str(&num);
            last_number = Some(num);
        }
        prev_kind = Some(kind);
    }
    out
}
