use clap::Parser;
use tempfile::NamedTempFile;

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Cursor, IsTerminal, Read};
use std::path::Path;

use crate::errors::{Error, Result};
use crate::flatten::FlattenOptions;
use crate::path::SerializeOptions;
use crate::{convert_stream, ConvertConfig, OutputFormat};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about=None)] // Read from Cargo.toml
struct Arguments {
    /// File to process ('-' for stdin)
    #[arg(default_value = "-")]
    file: String,

    /// Target output file ('-' for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Decimal places to round values to (negative to disable rounding)
    #[arg(long, default_value = "3", allow_negative_numbers = true)]
    decimals: i32,

    /// Write absolute commands only
    #[arg(long)]
    absolute: bool,

    /// Expand shorthand (H/V/S/T) commands into L/C/Q
    #[arg(long)]
    longhands: bool,

    /// Drop redundant separators, leading zeros and repeated command letters
    #[arg(long)]
    minify: bool,

    /// Replace elliptical arcs with cubic curves
    #[arg(long)]
    arcs_to_cubic: bool,

    /// Replace quadratic curves with cubic curves
    #[arg(long)]
    quadratic_to_cubic: bool,

    /// Replace cubic curves with quadratics, within the given tolerance
    #[arg(long, value_name = "TOL")]
    cubic_to_quadratic: Option<f64>,

    /// Reverse the direction of the path
    #[arg(long)]
    reverse: bool,

    /// Make inner subpaths wind opposite to the shapes around them
    #[arg(long)]
    fix_directions: bool,

    /// Start each closed subpath at the given vertex
    #[arg(long, value_name = "N")]
    shift: Option<usize>,

    /// Output format
    #[arg(long, default_value = "path")]
    format: OutputFormat,

    /// Input is an SVG document; flatten transforms and rewrite every path in it
    #[arg(long)]
    svg: bool,

    /// Replace nested svg elements with transformed groups (with --svg)
    #[arg(long, requires = "svg")]
    decompose_nested: bool,

    /// Replace use elements with copies of their targets (with --svg)
    #[arg(long, requires = "svg")]
    decompose_use: bool,
}

/// Top-level configuration used by the `pathdx` command-line process.
///
/// 'front-end' settings (input and output filenames) are stored directly in
/// this struct; everything about the conversion itself is in the embedded
/// `ConvertConfig`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to input file, or '-' for stdin
    pub input_path: String,
    /// Path to output file, or '-' for stdout
    pub output_path: String,
    /// conversion options
    pub convert: ConvertConfig,
}

impl Config {
    fn from_args(args: Arguments) -> Result<Self> {
        if args.file != "-" && args.output != "-" {
            let in_path = Path::new(&args.file);
            let out_path = Path::new(&args.output);
            if out_path.exists()
                && out_path.canonicalize().map_err(Error::from_err)?
                    == in_path.canonicalize().map_err(Error::from_err)?
            {
                return Err(Error::Cli(
                    "Output path must not refer to the same file as the input file.".into(),
                ));
            }
        }
        if args.cubic_to_quadratic.is_some_and(|tol| tol <= 0.) {
            return Err(Error::Cli(
                "--cubic-to-quadratic tolerance must be positive".into(),
            ));
        }
        Ok(Self {
            input_path: args.file,
            output_path: args.output,
            convert: ConvertConfig {
                quadratics_to_cubic: args.quadratic_to_cubic,
                cubics_to_quadratic: args.cubic_to_quadratic,
                reverse: args.reverse,
                fix_directions: args.fix_directions,
                shift: args.shift,
                serialize: SerializeOptions {
                    decimals: u32::try_from(args.decimals).ok(),
                    relative: !args.absolute,
                    shorthands: !args.longhands,
                    longhands: args.longhands,
                    minify: args.minify,
                    arcs_to_cubic: args.arcs_to_cubic,
                },
                format: args.format,
                svg: args.svg,
                flatten: FlattenOptions {
                    decompose_nested: args.decompose_nested,
                    decompose_use: args.decompose_use,
                    ..Default::default()
                },
            },
        })
    }

    /// Create a `Config` object set up given a command line string.
    ///
    /// The string is parsed using `shlex::split()`, so values containing
    /// spaces or quotes should be quoted or escaped appropriately.
    pub fn from_cmdline(args: &str) -> Result<Self> {
        let args = shlex::split(args).unwrap_or_default();
        let args = Arguments::try_parse_from(args.iter()).map_err(Error::from_err)?;
        Self::from_args(args)
    }
}

/// Create a `Config` object from process arguments.
pub fn get_config() -> Result<Config> {
    let args = Arguments::parse();
    Config::from_args(args)
}

/// Read from `input`, convert, and write the result to `output`.
///
/// Either may be '-' for stdin / stdout.
pub fn convert_file(input: &str, output: &str, cfg: &ConvertConfig) -> Result<()> {
    let mut in_reader = if input == "-" {
        let mut stdin = std::io::stdin().lock();
        if stdin.is_terminal() {
            // A single Ctrl-D doesn't always end terminal input; read
            // everything up front instead.
            let mut buf = Vec::new();
            stdin.read_to_end(&mut buf)?;
            Box::new(BufReader::new(Cursor::new(buf))) as Box<dyn BufRead>
        } else {
            Box::new(stdin) as Box<dyn BufRead>
        }
    } else {
        Box::new(BufReader::new(File::open(input)?)) as Box<dyn BufRead>
    };

    if output == "-" {
        convert_stream(&mut in_reader, &mut std::io::stdout(), cfg)?;
    } else {
        let mut out_temp = NamedTempFile::new()?;
        convert_stream(&mut in_reader, &mut out_temp, cfg)?;
        // Copy rather than persist(), which fails across filesystems
        fs::copy(out_temp.path(), output)?;
    }

    Ok(())
}

/// Run the `pathdx` program with a given `Config`.
pub fn run(config: Config) -> Result<()> {
    convert_file(&config.input_path, &config.output_path, &config.convert)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_cmdline() {
        let cfg = Config::from_cmdline("pathdx").unwrap();
        assert_eq!(cfg.input_path, "-");
        assert_eq!(cfg.output_path, "-");
        assert_eq!(cfg.convert, ConvertConfig::default());

        let cfg = Config::from_cmdline(
            "pathdx in.txt -o out.txt --decimals -1 --absolute --longhands --minify --shift 2 --format info",
        )
        .unwrap();
        assert_eq!(cfg.input_path, "in.txt");
        assert_eq!(cfg.output_path, "out.txt");
        let ser = &cfg.convert.serialize;
        assert_eq!(ser.decimals, None);
        assert!(!ser.relative && !ser.shorthands && ser.longhands && ser.minify);
        assert_eq!(cfg.convert.shift, Some(2));
        assert_eq!(cfg.convert.format, OutputFormat::Info);

        let cfg = Config::from_cmdline("pathdx --svg --decompose-use").unwrap();
        assert!(cfg.convert.svg);
        assert!(cfg.convert.flatten.decompose_use);
        assert!(!cfg.convert.flatten.decompose_nested);
    }

    #[test]
    fn test_config_errors() {
        for cmdline in [
            "pathdx --decompose-use",
            "pathdx --format xml",
            "pathdx --cubic-to-quadratic 0",
            "pathdx --shift -1",
            "pathdx a b",
        ] {
            assert!(Config::from_cmdline(cmdline).is_err(), "{cmdline}");
        }
    }
}
