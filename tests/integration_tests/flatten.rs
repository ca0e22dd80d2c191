use assertables::{assert_contains, assert_not_contains};
use pathdx::flatten::FlattenOptions;
use pathdx::{convert_str, ConvertConfig};

fn convert_svg(input: &str, flatten: FlattenOptions) -> String {
    let cfg = ConvertConfig {
        svg: true,
        flatten,
        ..Default::default()
    };
    convert_str(input, &cfg).unwrap()
}

#[test]
fn test_flatten_group_transforms() {
    let input = r#"<svg><g transform="translate(10 20)"><g transform="scale(2)"><rect width="5" height="5"/></g><text>t</text></g></svg>"#;
    let expected = r#"<svg><g><g><path d="M10 20 h10 v10 h-10 v-10 Z"/></g><text transform="translate(10 20)">t</text></g></svg>"#;
    assert_eq!(convert_svg(input, FlattenOptions::default()), expected);
}

#[test]
fn test_flatten_keeps_other_content() {
    let input = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg">
  <!-- a comment -->
  <path d="M 0 0 L 10 0" transform="translate(1 1)" stroke="black"/>
</svg>"#;
    let output = convert_svg(input, FlattenOptions::default());
    assert_contains!(output, r#"<?xml version="1.0"?>"#);
    assert_contains!(output, "<!-- a comment -->");
    assert_contains!(output, r#"<path d="M1 1 h10" stroke="black" stroke-width="1"/>"#);
}

#[test]
fn test_flatten_nested_svg() {
    let input = r#"<svg><svg x="10" y="10" width="20" height="20" viewBox="0 0 10 10"><rect width="10" height="10"/></svg></svg>"#;
    let options = FlattenOptions {
        decompose_nested: true,
        ..Default::default()
    };
    assert_eq!(
        convert_svg(input, options),
        r#"<svg><g><path d="M10 10 h20 v20 h-20 v-20 Z"/></g></svg>"#
    );
}

#[test]
fn test_flatten_use() {
    let input = r##"<svg viewBox="0 0 100 100"><defs><symbol id="s" viewBox="0 0 10 10"><rect width="10" height="10"/></symbol></defs><use href="#s" x="5" y="5" width="20" height="20" fill="red"/></svg>"##;
    let options = FlattenOptions {
        decompose_use: true,
        ..Default::default()
    };
    let output = convert_svg(input, options);
    assert_contains!(output, r#"<g fill="red"><path d="M5 5 h20 v20 h-20 v-20 Z"/></g>"#);
    assert_not_contains!(output, "<use");
    assert_not_contains!(output, "<symbol");
}

#[test]
fn test_flatten_errors() {
    let cfg = ConvertConfig {
        svg: true,
        ..Default::default()
    };
    assert!(convert_str("<svg><g></svg>", &cfg).is_err());
    assert!(convert_str("", &cfg).is_err());
    assert!(convert_str(r#"<svg><g transform="wobble(2)"><rect/></g></svg>"#, &cfg).is_err());
}
