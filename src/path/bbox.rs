use super::bezier::{cubic_extrema, quadratic_extrema};
use super::{PathData, Segment};
use crate::geometry::BoundingBox;

impl Segment {
    /// Tight bounding box of the segment, including any curve extrema.
    ///
    /// A moveto gives a zero-size box at its point.
    pub fn bbox(&self) -> BoundingBox {
        let (start, end) = (self.start(), self.end());
        let extrema = match *self {
            Segment::Cubic(s, c1, c2, e) => cubic_extrema(s, c1, c2, e),
            Segment::Quadratic(s, c, e) => quadratic_extrema(s, c, e),
            Segment::Arc { .. } => self.arc_center().map(|a| a.extrema()).unwrap_or_default(),
            _ => Vec::new(),
        };
        extrema.into_iter().fold(
            BoundingBox::new(start.x, start.y, start.x, start.y),
            |bb, p| bb.combine(&BoundingBox::new(p.x, p.y, p.x, p.y)),
        )
        .combine(&BoundingBox::new(end.x, end.y, end.x, end.y))
    }
}

/// Tight bounding box of everything the path draws.
///
/// Movetos contribute their point, so a path consisting only of a moveto
/// has a zero-size box. Returns `None` for an empty path.
pub fn path_bbox(path: &PathData) -> Option<BoundingBox> {
    BoundingBox::union(path.segments().map(|seg| seg.bbox()))
}
