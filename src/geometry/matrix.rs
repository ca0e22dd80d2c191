use super::Point;
use crate::types::round_to;

/// A 2D affine transform in SVG `matrix(a b c d e f)` form.
///
/// Points map as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 6]> for AffineMatrix {
    fn from([a, b, c, d, e, f]: [f64; 6]) -> Self {
        Self { a, b, c, d, e, f }
    }
}

impl AffineMatrix {
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self::new(1., 0., 0., 1., 0., 0.)
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1., 0., 0., 1., tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0., 0., sy, 0., 0.)
    }

    /// Rotation by `angle` degrees about (`cx`, `cy`)
    pub fn rotate(angle: f64, cx: f64, cy: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        let rot = Self::new(cos, sin, -sin, cos, 0., 0.);
        Self::translate(cx, cy)
            .multiply(&rot)
            .multiply(&Self::translate(-cx, -cy))
    }

    pub fn skew_x(angle: f64) -> Self {
        Self::new(1., 0., angle.to_radians().tan(), 1., 0., 0.)
    }

    pub fn skew_y(angle: f64) -> Self {
        Self::new(1., angle.to_radians().tan(), 0., 1., 0., 0.)
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Post-multiply: the result applies `other` first, then `self`.
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0. || !det.is_finite() {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Identity check after rounding each coefficient to `decimals` places.
    pub fn is_identity(&self, decimals: u32) -> bool {
        self.to_array()
            .iter()
            .map(|v| round_to(*v, decimals))
            .zip(Self::identity().to_array())
            .all(|(v, i)| v == i)
    }

    /// Split into translate / rotate / scale / skewX components.
    ///
    /// Skew is only ever reported along x; matrices with reflections
    /// come out with a negative `scale_y`.
    pub fn decompose(&self) -> Decomposition {
        let Self { a, b, c, d, e, f } = *self;
        let denom = a * a + b * b;
        let scale_x = denom.sqrt();
        let scale_y = if scale_x == 0. {
            0.
        } else {
            (a * d - c * b) / scale_x
        };
        Decomposition {
            translate_x: e,
            translate_y: f,
            rotate: b.atan2(a).to_degrees(),
            scale_x,
            scale_y,
            skew_x: (a * c + b * d).atan2(denom).to_degrees(),
        }
    }
}

/// Readable transform components of an `AffineMatrix`.
///
/// Recomposing as `translate rotate scale skewX` (in that order) gives back
/// the original matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposition {
    pub translate_x: f64,
    pub translate_y: f64,
    /// degrees
    pub rotate: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// degrees
    pub skew_x: f64,
}

impl Decomposition {
    pub fn to_matrix(&self) -> AffineMatrix {
        AffineMatrix::translate(self.translate_x, self.translate_y)
            .multiply(&AffineMatrix::rotate(self.rotate, 0., 0.))
            .multiply(&AffineMatrix::scale(self.scale_x, self.scale_y))
            .multiply(&AffineMatrix::skew_x(self.skew_x))
    }

    /// Mean of the two scale factors, used for stroke widths.
    pub fn mean_scale(&self) -> f64 {
        (self.scale_x + self.scale_y) / 2.
    }
}
