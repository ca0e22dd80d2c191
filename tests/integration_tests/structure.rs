use pathdx::path::{
    add_closing_lineto, auto_fix_directions, cubics_to_quadratic, join_subpaths, parse,
    quadratics_to_cubic, reverse_path_data, serialize, split_subpaths, subpath_directions,
    SerializeOptions,
};
use pathdx::{convert_str, ConvertConfig};

use super::utils::assert_same_points;

fn absolute() -> SerializeOptions {
    SerializeOptions {
        relative: false,
        shorthands: false,
        longhands: true,
        ..Default::default()
    }
}

fn convert_with(input: &str, cfg: ConvertConfig) -> String {
    let cfg = ConvertConfig {
        serialize: absolute(),
        ..cfg
    };
    convert_str(input, &cfg).unwrap()
}

#[test]
fn test_split_join() {
    let input = "M0 0 h10 v10 z M20 20 h5 v5 z";
    let path = parse(input).unwrap();
    let subpaths = split_subpaths(&path);
    assert_eq!(subpaths.len(), 2);
    assert_eq!(serialize(&subpaths[1], &absolute()), "M20 20 L25 20 L25 25 Z");
    assert_eq!(join_subpaths(subpaths), path);
}

#[test]
fn test_reverse() {
    let reverse = || ConvertConfig {
        reverse: true,
        ..Default::default()
    };
    let reversed = convert_with("M0 0 L10 0 L10 10 Z", reverse());
    assert_eq!(reversed, "M0 0 L10 10 L10 0 Z");
    assert_eq!(convert_with(&reversed, reverse()), "M0 0 L10 0 L10 10 Z");

    // open subpaths start from their old end point
    assert_eq!(
        convert_with("M0 0 L10 0 Q 15 5 10 10", reverse()),
        "M10 10 Q15 5 10 0 L0 0"
    );

    // each subpath is reversed in place
    let path = parse("M0 0 h10 v10 z M20 20 h5 v5 z").unwrap();
    let twice = reverse_path_data(&reverse_path_data(&path));
    assert_same_points(&serialize(&twice, &absolute()), "M0 0 L10 0 L10 10 Z M20 20 L25 20 L25 25 Z");
}

#[test]
fn test_shift() {
    let shift = |n| ConvertConfig {
        shift: Some(n),
        ..Default::default()
    };
    let square = "M0 0 L10 0 L10 10 L0 10 Z";
    assert_eq!(convert_with(square, shift(2)), "M10 10 L0 10 L0 0 L10 0 Z");
    // offsets wrap around the vertex count
    assert_eq!(convert_with(square, shift(6)), "M10 10 L0 10 L0 0 L10 0 Z");
    assert_eq!(convert_with(square, shift(4)), square);
    // open paths are left alone
    assert_eq!(convert_with("M0 0 L10 0 L10 10", shift(1)), "M0 0 L10 0 L10 10");
}

#[test]
fn test_fix_directions() {
    let path = parse("M0 0 h30 v30 h-30 z M10 10 h10 v10 h-10 z").unwrap();
    assert_eq!(subpath_directions(&path), [true, true]);
    let fixed = auto_fix_directions(&path);
    assert_eq!(subpath_directions(&fixed), [true, false]);

    // already opposite: unchanged
    assert_eq!(auto_fix_directions(&fixed), fixed);
}

#[test]
fn test_closing_lineto() {
    let path = parse("M0 0 h10 v10 z").unwrap();
    assert_eq!(
        serialize(&add_closing_lineto(&path), &absolute()),
        "M0 0 L10 0 L10 10 L0 0 Z"
    );
}

#[test]
fn test_quadratic_conversion() {
    let path = parse("M0 0 Q 5 10 10 0 T 20 0").unwrap();
    let cubic = quadratics_to_cubic(&path);
    assert!(cubic.iter().skip(1).all(|c| c.letter() == 'C'));
    assert_same_points(&serialize(&cubic, &absolute()), "M0 0 L10 0 L20 0");

    let back = cubics_to_quadratic(&cubic, 0.01);
    assert!(back.warnings.is_empty());
    assert!(back.path.iter().skip(1).all(|c| c.letter() == 'Q'));
    let last = back.path.last().and_then(|c| c.end_point()).unwrap();
    assert_eq!((last.x, last.y), (20., 0.));
}
