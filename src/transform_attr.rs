use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::geometry::{AffineMatrix, Decomposition};
use crate::types::{fstr, round_to, strp};

// decimal places kept when writing transform values
const TRANSFORM_DECIMALS: u32 = 6;

#[derive(Clone, Debug, PartialEq)]
enum TransformType {
    Translate(f64, f64),
    Scale(f64, f64),
    Rotate(f64, f64, f64),
    SkewX(f64),
    SkewY(f64),
    Matrix(AffineMatrix),
}

impl TransformType {
    fn to_matrix(&self) -> AffineMatrix {
        match *self {
            TransformType::Translate(tx, ty) => AffineMatrix::translate(tx, ty),
            TransformType::Scale(sx, sy) => AffineMatrix::scale(sx, sy),
            TransformType::Rotate(angle, cx, cy) => AffineMatrix::rotate(angle, cx, cy),
            TransformType::SkewX(angle) => AffineMatrix::skew_x(angle),
            TransformType::SkewY(angle) => AffineMatrix::skew_y(angle),
            TransformType::Matrix(m) => m,
        }
    }
}

fn arg_count_error(name: &str, count: usize) -> Error {
    Error::Transform(format!("invalid number of arguments for {name}: {count}"))
}

impl FromStr for TransformType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (name, rest) = value
            .split_once('(')
            .ok_or_else(|| Error::Transform(format!("no transform arguments in '{value}'")))?;
        let args = rest
            .strip_suffix(')')
            .ok_or_else(|| Error::Transform(format!("no closing bracket in '{value}'")))?
            .split(&[',', ' ', '\t', '\n', '\r'])
            .filter(|&v| !v.is_empty())
            .map(strp)
            .collect::<Result<Vec<_>>>()?;
        let name = name.trim();
        // See https://www.w3.org/TR/SVG11/coords.html#TransformAttribute
        Ok(match (name.to_lowercase().as_str(), args.as_slice()) {
            ("translate", &[tx]) => TransformType::Translate(tx, 0.),
            ("translate", &[tx, ty]) => TransformType::Translate(tx, ty),
            ("scale", &[s]) => TransformType::Scale(s, s),
            ("scale", &[sx, sy]) => TransformType::Scale(sx, sy),
            ("rotate", &[angle]) => TransformType::Rotate(angle, 0., 0.),
            ("rotate", &[angle, cx, cy]) => TransformType::Rotate(angle, cx, cy),
            ("skewx", &[angle]) => TransformType::SkewX(angle),
            ("skewy", &[angle]) => TransformType::SkewY(angle),
            ("matrix", &[a, b, c, d, e, f]) => {
                TransformType::Matrix(AffineMatrix::new(a, b, c, d, e, f))
            }
            ("translate" | "scale" | "rotate" | "skewx" | "skewy" | "matrix", _) => {
                return Err(arg_count_error(name, args.len()))
            }
            _ => {
                return Err(Error::Transform(format!(
                    "unknown transform type: '{name}'"
                )))
            }
        })
    }
}

fn tstr(v: f64) -> String {
    fstr(v, Some(TRANSFORM_DECIMALS))
}

impl std::fmt::Display for TransformType {
    fn fmt(&self, w: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            TransformType::Translate(tx, ty) => write!(w, "translate({} {})", tstr(tx), tstr(ty)),
            TransformType::Scale(sx, sy) if tstr(sx) == tstr(sy) => {
                write!(w, "scale({})", tstr(sx))
            }
            TransformType::Scale(sx, sy) => write!(w, "scale({} {})", tstr(sx), tstr(sy)),
            TransformType::Rotate(angle, cx, cy) if cx == 0. && cy == 0. => {
                write!(w, "rotate({})", tstr(angle))
            }
            TransformType::Rotate(angle, cx, cy) => {
                write!(w, "rotate({} {} {})", tstr(angle), tstr(cx), tstr(cy))
            }
            TransformType::SkewX(angle) => write!(w, "skewX({})", tstr(angle)),
            TransformType::SkewY(angle) => write!(w, "skewY({})", tstr(angle)),
            TransformType::Matrix(m) => {
                let values: Vec<String> = m.to_array().iter().map(|v| tstr(*v)).collect();
                write!(w, "matrix({})", values.join(" "))
            }
        }
    }
}

/// The value of an SVG `transform` attribute: a list of transform
/// functions, applied right to left.
#[derive(Debug, Default, PartialEq)]
pub struct TransformAttr {
    transforms: Vec<TransformType>,
}

impl FromStr for TransformAttr {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let parts = value.split_inclusive(')').map(|v| v.trim());
        Ok(Self {
            transforms: parts
                .map(|v| v.trim_start_matches([',', ' ', '\t', '\n', '\r']))
                .filter(|v| !v.is_empty())
                .map(|v| v.parse())
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

impl std::fmt::Display for TransformAttr {
    fn fmt(&self, w: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, transform) in self.transforms.iter().enumerate() {
            if idx != 0 {
                write!(w, " ")?;
            }
            write!(w, "{transform}")?;
        }
        Ok(())
    }
}

impl TransformAttr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// The single matrix equivalent to the whole list.
    pub fn to_matrix(&self) -> AffineMatrix {
        self.transforms
            .iter()
            .fold(AffineMatrix::identity(), |acc, t| acc.multiply(&t.to_matrix()))
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.transforms.push(TransformType::Translate(tx, ty));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transforms.push(TransformType::Scale(sx, sy));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.transforms.push(TransformType::Rotate(angle, 0., 0.));
    }

    pub fn rotate_around(&mut self, angle: f64, cx: f64, cy: f64) {
        self.transforms.push(TransformType::Rotate(angle, cx, cy));
    }

    pub fn skewx(&mut self, angle: f64) {
        self.transforms.push(TransformType::SkewX(angle));
    }

    pub fn skewy(&mut self, angle: f64) {
        self.transforms.push(TransformType::SkewY(angle));
    }

    pub fn matrix(&mut self, m: AffineMatrix) {
        self.transforms.push(TransformType::Matrix(m));
    }
}

impl From<AffineMatrix> for TransformAttr {
    fn from(m: AffineMatrix) -> Self {
        let mut t = Self::new();
        t.matrix(m);
        t
    }
}

impl Decomposition {
    /// `translate rotate scale skewX` form, leaving out terms with no
    /// effect at the written precision.
    pub fn to_transform_attr(&self) -> TransformAttr {
        let zero = |v: f64| round_to(v, TRANSFORM_DECIMALS) == 0.;
        let mut t = TransformAttr::new();
        if !zero(self.translate_x) || !zero(self.translate_y) {
            t.translate(self.translate_x, self.translate_y);
        }
        if !zero(self.rotate) {
            t.rotate(self.rotate);
        }
        if !zero(self.scale_x - 1.) || !zero(self.scale_y - 1.) {
            t.scale(self.scale_x, self.scale_y);
        }
        if !zero(self.skew_x) {
            t.skewx(self.skew_x);
        }
        t
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Point;
    use assertables::assert_in_delta;

    fn assert_maps(t: &TransformAttr, from: (f64, f64), to: (f64, f64)) {
        let p = t.to_matrix().apply(Point::from(from));
        assert_in_delta!(p.x, to.0, 1e-9);
        assert_in_delta!(p.y, to.1, 1e-9);
    }

    #[test]
    fn test_transform_parsing() {
        let t1: TransformAttr = "translate(10,20) scale(2) rotate(45)".parse().unwrap();
        let t2: TransformAttr = "translate( 10,   20), scale( 2, 2), rotate(  45  ,  0  ,  0  )"
            .parse()
            .unwrap();
        assert_eq!(t1, t2);

        let t: TransformAttr = "".parse().unwrap();
        assert!(t.is_empty());
        assert!(t.to_matrix().is_identity(6));

        for bad in ["translate(1, 2, 3)", "rotate(1, 2)", "wobble(3)", "scale(2", "matrix(1 0 0 1)"] {
            assert!(bad.parse::<TransformAttr>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_to_matrix() {
        let t: TransformAttr = "translate(10,20)".parse().unwrap();
        assert_maps(&t, (0., 0.), (10., 20.));
        let t: TransformAttr = "translate(10)".parse().unwrap();
        assert_maps(&t, (1., 1.), (11., 1.));
        let t: TransformAttr = "scale(2, 3)".parse().unwrap();
        assert_maps(&t, (1., 1.), (2., 3.));
        let t: TransformAttr = "rotate(90)".parse().unwrap();
        assert_maps(&t, (10., 0.), (0., 10.));
        let t: TransformAttr = "rotate(90, 5, 2.5)".parse().unwrap();
        assert_maps(&t, (5., 2.5), (5., 2.5));
        assert_maps(&t, (10., 2.5), (5., 7.5));
        let t: TransformAttr = "skewX(45)".parse().unwrap();
        assert_maps(&t, (0., 10.), (10., 10.));
        let t: TransformAttr = "matrix(1 0 0 1 5 6)".parse().unwrap();
        assert_maps(&t, (0., 0.), (5., 6.));
    }

    #[test]
    fn test_apply_order() {
        // rightmost transform is applied first
        let t: TransformAttr = "scale(2) translate(10,20)".parse().unwrap();
        assert_maps(&t, (0., 0.), (20., 40.));
        let t: TransformAttr = "translate(10,20) scale(2)".parse().unwrap();
        assert_maps(&t, (1., 1.), (12., 22.));
    }

    #[test]
    fn test_transform_roundtrip() {
        let mut t = TransformAttr::new();
        t.translate(10., 20.);
        t.scale(2., 3.);
        t.rotate(45.);
        t.rotate_around(30., 1., 2.);
        t.skewx(10.);
        t.skewy(20.);
        t.matrix(AffineMatrix::identity());
        let text = t.to_string();
        assert_eq!(
            text,
            "translate(10 20) scale(2 3) rotate(45) rotate(30 1 2) skewX(10) skewY(20) matrix(1 0 0 1 0 0)"
        );
        let t2: TransformAttr = text.parse().unwrap();
        assert_eq!(t, t2);
    }

    #[test]
    fn test_decomposition_attr() {
        let m: TransformAttr = "translate(5 6) rotate(30) scale(2)".parse().unwrap();
        let attr = m.to_matrix().decompose().to_transform_attr();
        assert_eq!(attr.to_string(), "translate(5 6) rotate(30) scale(2)");

        let attr = AffineMatrix::identity().decompose().to_transform_attr();
        assert!(attr.is_empty());

        let attr = AffineMatrix::scale(1., 3.).decompose().to_transform_attr();
        assert_eq!(attr.to_string(), "scale(1 3)");
    }
}
