mod analyze;
mod arc;
mod bbox;
pub mod bezier;
mod command;
mod direction;
pub mod measure;
mod normalize;
mod parser;
mod quadratic;
mod segment;
mod serialize;
mod shapes;
mod structure;
mod subdivide;
mod syntax;

pub use analyze::{analyze_path_data, PathInfo};
pub use arc::{arc_to_cubic, arcs_to_cubic, ArcOptions};
pub use bbox::path_bbox;
pub use command::{Command, CommandKind, PathData};
pub use direction::{
    auto_fix_directions, is_clockwise, polygon_points, subpath_directions, PolygonSampling,
};
pub use measure::{
    build_length_lookup, path_length, point_at_length, LengthLookup, SegmentKind, SegmentLength,
};
pub use normalize::{
    normalize, to_absolute, to_longhand, to_relative, to_shorthand, CursorState,
    NormalizeOptions, ShorthandTolerance,
};
pub use parser::parse;
pub use quadratic::{
    cubic_to_quadratic, cubics_to_quadratic, quadratic_to_cubic, quadratics_to_cubic, Quad,
    QuadraticFit, QuadraticPath,
};
pub use segment::{Segment, Segments};
pub use serialize::{serialize, SerializeOptions};
pub use shapes::{
    circle_path, ellipse_path, line_path, parse_points, path_data_from_element, polyline_path,
    rect_path, EXCLUDED_ATTRS, SHAPE_ELEMENTS,
};
pub use structure::{
    add_closing_lineto, join_subpaths, reverse_path_data, shift_starting_point, split_subpaths,
};
pub use subdivide::{split_segment_at_t, split_segment_n_times};
pub use syntax::{PathSyntax, SvgPathSyntax};
