use serde::{Deserialize, Serialize};

use crate::{
    functions::{Factor, FactorOp, MathOp, Rounding},
    FontMathError,
};
use kurbo::Point;

/// A component or image transformation, as the six affine coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub x_scale: f64,
    pub xy_scale: f64,
    pub yx_scale: f64,
    pub y_scale: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformation {
    pub const IDENTITY: Transformation = Transformation {
        x_scale: 1.0,
        xy_scale: 0.0,
        yx_scale: 0.0,
        y_scale: 1.0,
        x_offset: 0.0,
        y_offset: 0.0,
    };

    pub fn new(coeffs: [f64; 6]) -> Self {
        let [x_scale, xy_scale, yx_scale, y_scale, x_offset, y_offset] = coeffs;
        Transformation {
            x_scale,
            xy_scale,
            yx_scale,
            y_scale,
            x_offset,
            y_offset,
        }
    }

    pub fn as_coeffs(&self) -> [f64; 6] {
        [
            self.x_scale,
            self.xy_scale,
            self.yx_scale,
            self.y_scale,
            self.x_offset,
            self.y_offset,
        ]
    }

    pub fn as_affine(&self) -> kurbo::Affine {
        kurbo::Affine::new(self.as_coeffs())
    }

    fn scale_pair(&self) -> Point {
        Point::new(self.x_scale, self.y_scale)
    }

    fn skew_pair(&self) -> Point {
        Point::new(self.xy_scale, self.yx_scale)
    }

    fn offset_pair(&self) -> Point {
        Point::new(self.x_offset, self.y_offset)
    }

    fn from_pairs(scale: Point, skew: Point, offset: Point) -> Self {
        Transformation {
            x_scale: scale.x,
            xy_scale: skew.x,
            yx_scale: skew.y,
            y_scale: scale.y,
            x_offset: offset.x,
            y_offset: offset.y,
        }
    }

    /// Combine with another transformation, one axis pair at a time
    pub fn combine(&self, other: &Transformation, op: MathOp) -> Self {
        Self::from_pairs(
            op.apply_pt(self.scale_pair(), other.scale_pair()),
            op.apply_pt(self.skew_pair(), other.skew_pair()),
            op.apply_pt(self.offset_pair(), other.offset_pair()),
        )
    }

    pub fn scale(&self, factor: Factor, op: FactorOp) -> Result<Self, FontMathError> {
        Ok(Self::from_pairs(
            op.apply_pt(self.scale_pair(), factor)?,
            op.apply_pt(self.skew_pair(), factor)?,
            op.apply_pt(self.offset_pair(), factor)?,
        ))
    }

    /// Round the offsets; scale and skew factors are left exact.
    pub fn round(&self, rounding: &Rounding, digits: Option<u32>) -> Self {
        Transformation {
            x_offset: rounding.round(self.x_offset, digits),
            y_offset: rounding.round(self.y_offset, digits),
            ..*self
        }
    }
}

impl From<kurbo::Affine> for Transformation {
    fn from(t: kurbo::Affine) -> Self {
        Transformation::new(t.as_coeffs())
    }
}

impl From<Transformation> for kurbo::Affine {
    fn from(t: Transformation) -> Self {
        t.as_affine()
    }
}

impl From<[f64; 6]> for Transformation {
    fn from(coeffs: [f64; 6]) -> Self {
        Transformation::new(coeffs)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_combine() {
        let t1 = Transformation::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t2 = Transformation::new([1.5, 2.5, 3.5, 4.5, 5.5, 6.5]);
        assert_eq!(
            t1.combine(&t2, MathOp::Add),
            Transformation::new([2.5, 4.5, 6.5, 8.5, 10.5, 12.5])
        );
    }

    #[test]
    fn test_scale_is_per_axis() {
        let t = Transformation::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            t.scale(Factor::new(2.0, 3.0), FactorOp::Mul).unwrap(),
            Transformation::new([2.0, 4.0, 9.0, 12.0, 10.0, 18.0])
        );
    }

    #[test]
    fn test_round_only_offsets() {
        let t = Transformation::new([1.2, 2.2, 3.2, 4.2, 5.5, 6.2]);
        assert_eq!(
            t.round(&Rounding::default(), None),
            Transformation::new([1.2, 2.2, 3.2, 4.2, 6.0, 6.0])
        );
    }

    #[test]
    fn test_kurbo_roundtrip() {
        let affine = kurbo::Affine::new([2.0, 0.5, 0.25, 3.0, 10.0, 20.0]);
        let t: Transformation = affine.into();
        assert_eq!(t.xy_scale, 0.5);
        assert_eq!(t.as_affine(), affine);
    }
}
