mod bbox;
mod ellipse;
mod matrix;
mod point;
mod polygon;

pub use bbox::{BoundingBox, BoundingBoxBuilder};
pub use ellipse::{angle_in_sweep, ellipse_point, ArcCenter};
pub use matrix::{AffineMatrix, Decomposition};
pub use point::{angle_abc, line_intersection, Point};
pub use polygon::{is_clockwise_polygon, polygon_area, polygon_bbox, polygon_length};
