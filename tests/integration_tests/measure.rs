use assertables::assert_in_delta;
use pathdx::errors::{Error, GeometryError};
use pathdx::path::{
    build_length_lookup, parse, path_bbox, path_length, point_at_length, split_segment_at_t,
};

#[test]
fn test_square_length_and_points() {
    let path = parse("M0 0 h10 v10 h-10 z").unwrap();
    assert_in_delta!(path_length(&path).unwrap(), 40., 1e-9);

    let lookup = build_length_lookup(&path, 10).unwrap();
    let p = point_at_length(&lookup, 15.).unwrap();
    assert_in_delta!(p.x, 10., 1e-9);
    assert_in_delta!(p.y, 5., 1e-9);

    // out of range distances clamp to the ends
    let p = point_at_length(&lookup, -5.).unwrap();
    assert_eq!((p.x, p.y), (0., 0.));
    let p = lookup.point_at_length(100.).unwrap();
    assert_eq!((p.x, p.y), (0., 0.));
}

#[test]
fn test_circle_length() {
    let circle = parse("M0 10 A 10 10 0 0 1 20 10 A 10 10 0 0 1 0 10").unwrap();
    let expected = 2. * std::f64::consts::PI * 10.;
    assert_in_delta!(path_length(&circle).unwrap(), expected, 0.05);

    // arcs must be converted before building a lookup
    assert!(matches!(
        build_length_lookup(&circle, 10),
        Err(Error::Geometry(GeometryError::UnsupportedArc))
    ));
}

#[test]
fn test_curve_points_follow_length() {
    let path = parse("M0 0 C 0 10 10 10 10 0").unwrap();
    let lookup = build_length_lookup(&path, 20).unwrap();
    // the curve is symmetric about x = 5
    let mid = point_at_length(&lookup, lookup.total_length / 2.).unwrap();
    assert_in_delta!(mid.x, 5., 0.05);
    assert_in_delta!(mid.y, 7.5, 0.05);
    assert!(point_at_length(&build_length_lookup(&parse("M1 1").unwrap(), 10).unwrap(), 1.).is_none());
}

#[test]
fn test_bbox() {
    let bb = path_bbox(&parse("M0 0 C 0 10 10 10 10 0").unwrap()).unwrap();
    assert_in_delta!(bb.x1, 0., 1e-9);
    assert_in_delta!(bb.y1, 0., 1e-9);
    assert_in_delta!(bb.x2, 10., 1e-9);
    assert_in_delta!(bb.y2, 7.5, 1e-9);

    // arc extremes, not just end points
    let bb = path_bbox(&parse("M0 0 A 5 5 0 0 1 10 0").unwrap()).unwrap();
    assert_in_delta!(bb.y1, -5., 1e-6);
    assert_in_delta!(bb.y2, 0., 1e-6);
}

#[test]
fn test_split_preserves_length() {
    let path = parse("M0 0 C 0 10 10 10 10 0 L 20 0").unwrap();
    let total = path_length(&path).unwrap();
    let split = split_segment_at_t(&path, 1, 0.3).unwrap();
    assert_eq!(split.len(), path.len() + 1);
    assert_in_delta!(path_length(&split).unwrap(), total, 1e-2);
}
