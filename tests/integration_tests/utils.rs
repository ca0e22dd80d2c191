use assertables::assert_in_delta;
use pathdx::geometry::Point;
use pathdx::path::{parse, PathData};
use pathdx::{convert_str, ConvertConfig};

/// Convert with default settings; panics on error.
pub fn convert_default(input: &str) -> String {
    convert_str(input, &ConvertConfig::default()).expect("conversion failed")
}

/// Absolute end point of each command.
pub fn end_points(path: &PathData) -> Vec<Point> {
    path.segments().map(|seg| seg.end()).collect()
}

/// Assert two path strings visit the same points, whatever their form.
pub fn assert_same_points(a: &str, b: &str) {
    let pa = end_points(&parse(a).expect("first path should parse"));
    let pb = end_points(&parse(b).expect("second path should parse"));
    assert_eq!(pa.len(), pb.len(), "\n {a}\n {b}");
    for (p, q) in pa.iter().zip(&pb) {
        assert_in_delta!(p.x, q.x, 1e-6);
        assert_in_delta!(p.y, q.y, 1e-6);
    }
}
