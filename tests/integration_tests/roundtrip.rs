use assertables::assert_contains;
use pathdx::path::{parse, serialize, SerializeOptions};
use pathdx::{convert_str, ConvertConfig, OutputFormat};

use super::utils::{assert_same_points, convert_default};

const PATHS: &[&str] = &[
    "M 10 10 L 20 20 L 30 10 Z",
    "M0 0 h10 v10 h-10 z m 20 0 h5 v5 h-5 z",
    "M 0.5 0.5 C 0.1 0.2 0.3 -0.4 -0.5 0.6 S 1 1 2 2",
    "M 5 5 a 5 5 0 1 1 10 0 q 1 1 2 0 t 2 0 z m 1 1 v 3 h 0.25",
    "M-1-2L.5.5-3,4",
    "m 10 20 5 5 5 -5",
];

#[test]
fn test_roundtrip_all_forms() {
    for input in PATHS {
        let path = parse(input).unwrap();
        for relative in [false, true] {
            for shorthands in [false, true] {
                for minify in [false, true] {
                    let options = SerializeOptions {
                        decimals: None,
                        relative,
                        shorthands,
                        longhands: !shorthands,
                        minify,
                        arcs_to_cubic: false,
                    };
                    let output = serialize(&path, &options);
                    assert_same_points(input, &output);
                }
            }
        }
    }
}

#[test]
fn test_longhand_output() {
    for input in PATHS {
        let path = parse(input).unwrap();
        for relative in [false, true] {
            let options = SerializeOptions {
                decimals: None,
                relative,
                shorthands: false,
                longhands: true,
                ..Default::default()
            };
            let output = serialize(&path, &options);
            assert!(
                output
                    .chars()
                    .filter(char::is_ascii_alphabetic)
                    .all(|c| "MLCQAZ".contains(c.to_ascii_uppercase())),
                "{input} -> {output}"
            );
            assert_same_points(input, &output);
        }
    }

    let path = parse("M0 0 H10 V10 S 15 15 20 10 T 30 10").unwrap();
    let options = SerializeOptions {
        relative: false,
        shorthands: false,
        longhands: true,
        ..Default::default()
    };
    assert_eq!(
        serialize(&path, &options),
        "M0 0 L10 0 L10 10 C10 10 15 15 20 10 Q20 10 30 10"
    );
}

#[test]
fn test_default_output() {
    assert_eq!(
        convert_default("M 0 0 L 10 0 L 10 10 L 0 10 Z"),
        "M0 0 h10 v10 h-10 Z"
    );
    assert_eq!(
        convert_default("M 0 0 C 0 10 10 10 10 0 C 10 -10 20 -10 20 0"),
        "M0 0 c0 10 10 10 10 0 s10 -10 10 0"
    );
    assert_eq!(convert_default("M 1.23456 0 L 2 0"), "M1.235 0 h0.765");
}

#[test]
fn test_output_is_idempotent() {
    for input in PATHS {
        let once = convert_default(input);
        assert_eq!(convert_default(&once), once, "{input}");
    }
}

#[test]
fn test_parse_errors_reported() {
    for input in ["L 10 10", "M 0 0 L 10", "M0 0 A 1 1 0 2 0 5 5", "M 0 0 X 5"] {
        let err = convert_str(input, &ConvertConfig::default()).unwrap_err();
        assert_contains!(err.to_string(), "parse error");
    }
}

#[cfg(feature = "json")]
#[test]
fn test_json_format() {
    let cfg = ConvertConfig {
        format: OutputFormat::Json,
        ..Default::default()
    };
    let output = convert_str("M0 0 L1 1 Z", &cfg).unwrap();
    assert_contains!(output, r#""type":"M""#);
    assert_contains!(output, r#""type":"L""#);
    assert_contains!(output, r#""type":"Z""#);
}
