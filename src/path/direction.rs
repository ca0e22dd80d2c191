use std::cmp::Ordering;

use super::bezier::{cubic_point, quadratic_point};
use super::{arcs_to_cubic, join_subpaths, path_bbox, reverse_path_data, split_subpaths};
use super::{PathData, Segment};
use crate::geometry::{is_clockwise_polygon, BoundingBox, Point};

#[cfg(feature = "json")]
use serde_derive::Deserialize;

/// How curves and lines are sampled when approximating a path by a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct PolygonSampling {
    /// Add intermediate points along curves (and arcs)
    pub control_midpoints: bool,
    /// Samples are spaced `0.5 / splits` apart in `t`; 0 samples only
    /// the midpoint
    pub splits: u32,
    /// Also add intermediate points along straight lines
    pub split_lines: bool,
}

impl Default for PolygonSampling {
    fn default() -> Self {
        Self {
            control_midpoints: true,
            splits: 0,
            split_lines: false,
        }
    }
}

impl PolygonSampling {
    fn sample_ts(&self) -> Vec<f64> {
        if !self.control_midpoints {
            return Vec::new();
        }
        let step = if self.splits > 0 {
            0.5 / f64::from(self.splits)
        } else {
            0.5
        };
        (1..)
            .map(|i: u32| step * f64::from(i))
            .take_while(|t| *t < 1. - 1e-9)
            .collect()
    }
}

/// Approximate the outline of a path with a polygon.
///
/// Vertices are segment end points plus any sampled intermediate points.
/// Arcs are sampled through their cubic approximation, and closepaths
/// contribute the subpath start.
pub fn polygon_points(path: &PathData, sampling: &PolygonSampling) -> Vec<Point> {
    let ts = sampling.sample_ts();
    let path = arcs_to_cubic(path, 90.);
    let mut points = Vec::new();
    for seg in path.segments() {
        match seg {
            Segment::Move(p) => points.push(p),
            Segment::Cubic(s, c1, c2, e) => {
                points.extend(ts.iter().map(|t| cubic_point(s, c1, c2, e, *t)));
                points.push(e);
            }
            Segment::Quadratic(s, c, e) => {
                points.extend(ts.iter().map(|t| quadratic_point(s, c, e, *t)));
                points.push(e);
            }
            Segment::Line(s, e) | Segment::Close(s, e) => {
                if sampling.split_lines {
                    points.extend(ts.iter().map(|t| s.lerp(e, *t)));
                }
                if !matches!(seg, Segment::Close(..)) || s != e {
                    points.push(e);
                }
            }
            // arcs_to_cubic leaves none behind
            Segment::Arc { end, .. } => points.push(end),
        }
    }
    points
}

/// True if the path winds clockwise on screen (y-down coordinates).
///
/// Compound paths are treated as a single polygon; use
/// `subpath_directions` to inspect subpaths individually.
pub fn is_clockwise(path: &PathData) -> bool {
    is_clockwise_polygon(&polygon_points(path, &PolygonSampling::default()))
}

/// Clockwise-ness of each subpath, in order.
pub fn subpath_directions(path: &PathData) -> Vec<bool> {
    split_subpaths(path).iter().map(is_clockwise).collect()
}

fn encloses(outer: &BoundingBox, inner: &BoundingBox) -> bool {
    inner.x1 >= outer.x1 && inner.y1 >= outer.y1 && inner.x2 <= outer.x2 && inner.y2 <= outer.y2
}

/// Reverse inner subpaths so they wind opposite to the shape enclosing
/// them, making holes render under either fill rule.
///
/// Subpaths are sorted by their bounding box (left edge, then top edge)
/// and the first is taken as the outer shape. A subpath is reversed when
/// its box lies within the previous subpath's box and both wind the same
/// way, or failing that when it lies within the outer box with the same
/// winding as the outer shape. Boxes stand in for real containment tests,
/// so unusual layouts may be left unfixed.
pub fn auto_fix_directions(path: &PathData) -> PathData {
    struct SubpathInfo {
        path: PathData,
        bbox: BoundingBox,
        clockwise: bool,
    }

    let mut subpaths: Vec<SubpathInfo> = split_subpaths(path)
        .into_iter()
        .filter_map(|sub| {
            let bbox = path_bbox(&sub)?;
            let clockwise = is_clockwise(&sub);
            Some(SubpathInfo {
                path: sub,
                bbox,
                clockwise,
            })
        })
        .collect();
    subpaths.sort_by(|a, b| {
        a.bbox
            .x1
            .partial_cmp(&b.bbox.x1)
            .unwrap_or(Ordering::Equal)
            .then(a.bbox.y1.partial_cmp(&b.bbox.y1).unwrap_or(Ordering::Equal))
    });

    for i in 1..subpaths.len() {
        let (done, rest) = subpaths.split_at_mut(i);
        let cur = &mut rest[0];
        let outer = &done[0];
        let prev = &done[i - 1];

        let enclosed_prev = encloses(&prev.bbox, &cur.bbox);
        let flip = if enclosed_prev {
            prev.clockwise == cur.clockwise
        } else {
            encloses(&outer.bbox, &cur.bbox) && outer.clockwise == cur.clockwise
        };
        if flip {
            cur.path = reverse_path_data(&cur.path);
            cur.clockwise = !cur.clockwise;
        }
    }
    join_subpaths(subpaths.into_iter().map(|s| s.path))
}
