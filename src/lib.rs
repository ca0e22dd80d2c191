//! ## pathdx - parse, normalize, measure and rewrite SVG path data
//!
//! `pathdx` reads the text of SVG path `d` attributes into a structured
//! [`PathData`](path::PathData) value, transforms it (absolute / relative,
//! shorthand / longhand, arcs and quadratics to cubics, reversal,
//! subdivision and more), measures it, and writes it back as compact text.
//!
//! It can also flatten the transforms of a whole SVG document into its
//! path geometry.
//!
//! ## Library use
//!
//! The building blocks live in the [`path`] module; each stage takes a
//! `&PathData` and returns a new one. For the common case of rewriting path
//! text, create a `ConvertConfig` and call `convert_str`.
//!
//! ## Example
//!
//! ```
//! let cfg = pathdx::ConvertConfig::default();
//!
//! let output = pathdx::convert_str("M 0 0 L 10 0 L 10 10 L 0 10 Z", &cfg).unwrap();
//!
//! assert_eq!(output, "M0 0 h10 v10 h-10 Z");
//! ```

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::io::{BufRead, Read, Write};
use std::str::FromStr;

#[cfg(feature = "cli")]
pub mod cli;
pub mod document;
pub mod errors;
pub mod flatten;
pub mod geometry;
pub mod path;
pub mod transform_attr;
mod types;

use document::Document;
pub use errors::{Error, Result};
use flatten::{flatten_document, FlattenOptions};
use path::{
    analyze_path_data, auto_fix_directions, cubics_to_quadratic, is_clockwise, parse, path_bbox,
    path_length, quadratics_to_cubic, reverse_path_data, serialize, shift_starting_point,
    PathData, SerializeOptions,
};
use types::fstr;

#[cfg(feature = "json")]
use serde_derive::Deserialize;

use tracing::warn;

// Allow users of this as a library to easily retrieve the version of pathdx being used
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How results are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "json", derive(Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum OutputFormat {
    /// Path data text
    #[default]
    Path,
    /// Path data as a JSON array of commands
    Json,
    /// Summary of the path's structure and geometry
    Info,
}

/// Settings to configure a single conversion.
///
/// Operations are applied in field order: curve conversions, then
/// reversal, direction fixing and start shifting, before the result is
/// written using `serialize`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct ConvertConfig {
    pub quadratics_to_cubic: bool,
    /// Replace cubics with quadratics, within this tolerance
    pub cubics_to_quadratic: Option<f64>,
    pub reverse: bool,
    /// Make inner subpaths wind opposite to the shapes around them
    pub fix_directions: bool,
    /// Start each closed subpath at this vertex
    pub shift: Option<usize>,
    pub serialize: SerializeOptions,
    pub format: OutputFormat,
    /// Input is an SVG document rather than bare path data
    pub svg: bool,
    /// Used when `svg` is set
    pub flatten: FlattenOptions,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            quadratics_to_cubic: false,
            cubics_to_quadratic: None,
            reverse: false,
            fix_directions: false,
            shift: None,
            serialize: SerializeOptions::default(),
            format: OutputFormat::default(),
            svg: false,
            flatten: FlattenOptions::default(),
        }
    }
}

/// Apply the structural operations selected in `cfg`.
pub fn apply_operations(path: &PathData, cfg: &ConvertConfig) -> PathData {
    let mut path = path.clone();
    if cfg.quadratics_to_cubic {
        path = quadratics_to_cubic(&path);
    }
    if let Some(tolerance) = cfg.cubics_to_quadratic {
        let result = cubics_to_quadratic(&path, tolerance);
        for warning in &result.warnings {
            warn!(%warning, "quadratic approximation");
        }
        path = result.path;
    }
    if cfg.reverse {
        path = reverse_path_data(&path);
    }
    if cfg.fix_directions {
        path = auto_fix_directions(&path);
    }
    if let Some(offset) = cfg.shift {
        path = shift_starting_point(&path, offset);
    }
    path
}

fn path_info(path: &PathData, decimals: Option<u32>) -> String {
    let info = analyze_path_data(path);
    let length = match path_length(path) {
        Ok(len) => fstr(len, decimals),
        Err(err) => err.to_string(),
    };
    let bbox = path_bbox(path).map_or("none".to_string(), |bb| {
        [bb.x1, bb.y1, bb.x2, bb.y2]
            .iter()
            .map(|v| fstr(*v, decimals))
            .collect::<Vec<_>>()
            .join(" ")
    });
    let direction = if is_clockwise(path) {
        "clockwise"
    } else {
        "counterclockwise"
    };
    [
        format!("commands: {}", path.len()),
        format!("subpaths: {}", info.subpath_count),
        format!("closed: {}", info.closed),
        format!("relative: {}", info.has_relative),
        format!("shorthand: {}", info.has_shorthand),
        format!("decimals: {}", info.decimals),
        format!("length: {length}"),
        format!("bbox: {bbox}"),
        format!("direction: {direction}"),
    ]
    .join("\n")
}

#[cfg(feature = "json")]
fn path_json(path: &PathData) -> Result<String> {
    Ok(serde_json::to_string(path)?)
}

#[cfg(not(feature = "json"))]
fn path_json(_path: &PathData) -> Result<String> {
    Err(Error::InvalidValue(
        "format".to_string(),
        "json (requires the 'json' feature)".to_string(),
    ))
}

/// Convert a single path data string.
pub fn convert_path_data(input: &str, cfg: &ConvertConfig) -> Result<String> {
    let path = apply_operations(&parse(input)?, cfg);
    match cfg.format {
        OutputFormat::Path => Ok(serialize(&path, &cfg.serialize)),
        OutputFormat::Json => path_json(&path),
        OutputFormat::Info => Ok(path_info(&path, cfg.serialize.decimals)),
    }
}

/// Flatten an SVG document's transforms, then convert the `d` of every
/// path in it.
pub fn convert_document(input: &str, cfg: &ConvertConfig) -> Result<String> {
    let mut doc = Document::from_str(input)?;
    let root = doc.require_root_mut()?;
    flatten_document(root, &cfg.flatten)?;

    let path_cfg = ConvertConfig {
        format: OutputFormat::Path,
        ..cfg.clone()
    };
    let mut failure = None;
    root.walk_mut(&mut |el| {
        if el.name() != "path" || failure.is_some() {
            return;
        }
        if let Some(d) = el.get_attr("d") {
            match convert_path_data(d, &path_cfg) {
                Ok(new_d) => el.set_attr("d", &new_d),
                Err(err) => failure = Some(err),
            }
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }
    doc.to_xml_string()
}

/// Reads from the `reader` stream, converts, and writes to `writer`.
///
/// Note the entire stream is read before any converted data is written to `writer`.
pub fn convert_stream(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    cfg: &ConvertConfig,
) -> Result<()> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    let output = convert_str(input, cfg)?;
    writer.write_all(output.as_bytes())?;
    if !cfg.svg {
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Convert `input` as configured by `cfg`, returning the result as a string.
pub fn convert_str<T: Into<String>>(input: T, cfg: &ConvertConfig) -> Result<String> {
    let input = input.into();
    if cfg.svg {
        convert_document(&input, cfg)
    } else {
        convert_path_data(input.trim(), cfg)
    }
}

/// Convert path data text, returning the result as a string.
///
/// A negative `decimals` value disables rounding.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn convert_string(
    input: String,
    decimals: i32,
    minify: bool,
) -> core::result::Result<String, String> {
    let cfg = ConvertConfig {
        serialize: SerializeOptions {
            decimals: u32::try_from(decimals).ok(),
            minify,
            ..Default::default()
        },
        ..Default::default()
    };
    convert_str(input, &cfg).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_str_default() {
        let cfg = ConvertConfig::default();
        assert_eq!(
            convert_str("M 0 0 L 10 0 L 10 10 L 0 10 Z", &cfg).unwrap(),
            "M0 0 h10 v10 h-10 Z"
        );
        assert_eq!(convert_str("  ", &cfg).unwrap(), "");
        assert!(convert_str("L 10 10", &cfg).is_err());
    }

    #[test]
    fn test_convert_operations() {
        let cfg = ConvertConfig {
            reverse: true,
            serialize: SerializeOptions {
                relative: false,
                shorthands: false,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            convert_str("M0 0 L10 0 L10 10", &cfg).unwrap(),
            "M10 10 L10 0 L0 0"
        );

        let cfg = ConvertConfig {
            reverse: false,
            shift: Some(1),
            ..cfg
        };
        assert_eq!(
            convert_str("M0 0 L10 0 L10 10 Z", &cfg).unwrap(),
            "M10 0 L10 10 L0 0 Z"
        );
    }

    #[test]
    fn test_convert_string_decimals() {
        assert_eq!(
            convert_string("M0.12345 0 L1 1".to_string(), 2, false).unwrap(),
            "M0.12 0 l0.88 1"
        );
        assert_eq!(
            convert_string("M0.5 0 L1.25 1".to_string(), -1, true).unwrap(),
            "m.5 0 .75 1"
        );
        assert!(convert_string("X".to_string(), 3, false).is_err());
    }

    #[test]
    fn test_info_format() {
        let cfg = ConvertConfig {
            format: OutputFormat::Info,
            ..Default::default()
        };
        let info = convert_str("M0 0 h10 v10 h-10 z", &cfg).unwrap();
        assert!(info.contains("commands: 5"), "{info}");
        assert!(info.contains("length: 40"), "{info}");
        assert!(info.contains("bbox: 0 0 10 10"), "{info}");
        assert!(info.contains("direction: clockwise"), "{info}");
    }

    #[test]
    fn test_convert_document() {
        let cfg = ConvertConfig {
            svg: true,
            ..Default::default()
        };
        let out = convert_str(
            r#"<svg><g transform="translate(1 1)"><path d="M0 0 L10 0"/></g></svg>"#,
            &cfg,
        )
        .unwrap();
        assert_eq!(out, r#"<svg><g><path d="M1 1 h10"/></g></svg>"#);
    }
}
