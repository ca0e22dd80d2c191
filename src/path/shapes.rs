use super::{parse, Command, PathData};
use crate::errors::{Error, Result};
use crate::geometry::Point;
use crate::types::{attr_split, strp};

/// Attributes which only carry the geometry of a primitive shape, and are
/// dropped once it is rewritten as a `path`.
pub const EXCLUDED_ATTRS: &[&str] = &[
    "x", "y", "x1", "y1", "x2", "y2", "cx", "cy", "r", "rx", "ry", "points", "width", "height",
];

/// Element names `path_data_from_element` can convert.
pub const SHAPE_ELEMENTS: &[&str] = &[
    "path", "rect", "circle", "ellipse", "line", "polyline", "polygon",
];

/// Outline of a rectangle, with rounded corners if `rx` or `ry` are given.
///
/// A missing radius takes the other's value; both are clamped to half the
/// width and height respectively. Corners are square if either is zero.
pub fn rect_path(x: f64, y: f64, width: f64, height: f64, rx: Option<f64>, ry: Option<f64>) -> PathData {
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0., 0.),
    };
    let rx = rx.max(0.).min(width / 2.);
    let ry = ry.max(0.).min(height / 2.);
    let rounded = rx > 0. && ry > 0.;
    let (rx, ry) = if rounded { (rx, ry) } else { (0., 0.) };
    let corner = |end: Point| Command::arc(rx, ry, 0., false, true, end);

    let mut cmds = vec![
        Command::move_to(Point::new(x + rx, y)),
        Command::h_line_to(x + width - rx),
    ];
    if rounded {
        cmds.push(corner(Point::new(x + width, y + ry)));
    }
    cmds.push(Command::v_line_to(y + height - ry));
    if rounded {
        cmds.push(corner(Point::new(x + width - rx, y + height)));
    }
    cmds.push(Command::h_line_to(x + rx));
    if rounded {
        cmds.push(corner(Point::new(x, y + height - ry)));
    }
    cmds.push(Command::v_line_to(y + ry));
    if rounded {
        cmds.push(corner(Point::new(x + rx, y)));
    }
    cmds.push(Command::close());
    PathData::new(cmds)
}

/// Ellipse as four quarter arcs, starting at the leftmost point.
pub fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> PathData {
    let quarter = |end: Point| Command::arc(rx, ry, 0., false, true, end);
    PathData::new(vec![
        Command::move_to(Point::new(cx - rx, cy)),
        quarter(Point::new(cx, cy - ry)),
        quarter(Point::new(cx + rx, cy)),
        quarter(Point::new(cx, cy + ry)),
        quarter(Point::new(cx - rx, cy)),
        Command::close(),
    ])
}

pub fn circle_path(cx: f64, cy: f64, r: f64) -> PathData {
    ellipse_path(cx, cy, r, r)
}

pub fn line_path(start: Point, end: Point) -> PathData {
    PathData::new(vec![Command::move_to(start), Command::line_to(end)])
}

/// Path through `points`, closed for polygons.
pub fn polyline_path(points: &[Point], closed: bool) -> PathData {
    let mut cmds: Vec<Command> = points
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            if idx == 0 {
                Command::move_to(*p)
            } else {
                Command::line_to(*p)
            }
        })
        .collect();
    if closed && !cmds.is_empty() {
        cmds.push(Command::close());
    }
    PathData::new(cmds)
}

/// Parse a `points` attribute; a trailing odd coordinate is an error.
pub fn parse_points(value: &str) -> Result<Vec<Point>> {
    let values = attr_split(value)
        .map(|v| strp(&v))
        .collect::<Result<Vec<_>>>()?;
    if values.len() % 2 != 0 {
        return Err(Error::InvalidValue("points".to_string(), value.to_string()));
    }
    Ok(values
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect())
}

/// Path data equivalent to a shape element, given its name and a lookup
/// for its attributes.
///
/// Missing numeric attributes count as zero.
pub fn path_data_from_element(
    name: &str,
    attr: impl Fn(&str) -> Option<String>,
) -> Result<PathData> {
    let num = |key: &str| -> Result<f64> {
        attr(key).map_or(Ok(0.), |v| strp(v.trim().trim_end_matches("px")))
    };
    let opt_num = |key: &str| -> Result<Option<f64>> {
        attr(key)
            .map(|v| strp(v.trim().trim_end_matches("px")))
            .transpose()
    };
    match name {
        "path" => parse(&attr("d").unwrap_or_default()),
        "rect" => Ok(rect_path(
            num("x")?,
            num("y")?,
            num("width")?,
            num("height")?,
            opt_num("rx")?,
            opt_num("ry")?,
        )),
        "circle" => Ok(circle_path(num("cx")?, num("cy")?, num("r")?)),
        "ellipse" => Ok(ellipse_path(num("cx")?, num("cy")?, num("rx")?, num("ry")?)),
        "line" => Ok(line_path(
            Point::new(num("x1")?, num("y1")?),
            Point::new(num("x2")?, num("y2")?),
        )),
        "polyline" | "polygon" => {
            let points = parse_points(&attr("points").unwrap_or_default())?;
            Ok(polyline_path(&points, name == "polygon"))
        }
        _ => Err(Error::InvalidValue("shape element".to_string(), name.to_string())),
    }
}
