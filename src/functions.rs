//! Numeric primitives shared by the glyph, info and kerning math.
//!
//! Binary operations between two operands use [`MathOp`], operations between an
//! operand and a scalar factor use [`FactorOp`]. Points are [`kurbo::Point`]s and
//! factors are always expanded to a per-axis [`Factor`] before use.
use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::FontMathError;

/// A per-axis scaling factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub x: f64,
    pub y: f64,
}

impl Factor {
    pub fn new(x: f64, y: f64) -> Self {
        Factor { x, y }
    }
}

impl From<f64> for Factor {
    fn from(f: f64) -> Self {
        Factor { x: f, y: f }
    }
}

impl From<(f64, f64)> for Factor {
    fn from((x, y): (f64, f64)) -> Self {
        Factor { x, y }
    }
}

/// Operation combining two operands of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Sub,
}

impl MathOp {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            MathOp::Add => add(a, b),
            MathOp::Sub => sub(a, b),
        }
    }

    pub fn apply_pt(self, a: Point, b: Point) -> Point {
        match self {
            MathOp::Add => add_pt(a, b),
            MathOp::Sub => sub_pt(a, b),
        }
    }
}

/// Operation applying a scalar factor to an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorOp {
    Mul,
    Div,
}

impl FactorOp {
    pub fn apply(self, v: f64, f: f64) -> Result<f64, FontMathError> {
        match self {
            FactorOp::Mul => Ok(mul(v, f)),
            FactorOp::Div => div(v, f),
        }
    }

    pub fn apply_pt(self, pt: Point, factor: Factor) -> Result<Point, FontMathError> {
        match self {
            FactorOp::Mul => Ok(mul_pt(pt, factor)),
            FactorOp::Div => div_pt(pt, factor),
        }
    }
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn add_pt(a: Point, b: Point) -> Point {
    Point::new(a.x + b.x, a.y + b.y)
}

pub fn sub(a: f64, b: f64) -> f64 {
    a - b
}

pub fn sub_pt(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}

pub fn mul(v: f64, f: f64) -> f64 {
    v * f
}

pub fn mul_pt(pt: Point, factor: Factor) -> Point {
    Point::new(pt.x * factor.x, pt.y * factor.y)
}

pub fn div(v: f64, f: f64) -> Result<f64, FontMathError> {
    if f == 0.0 {
        return Err(FontMathError::DivisionByZero);
    }
    Ok(v / f)
}

pub fn div_pt(pt: Point, factor: Factor) -> Result<Point, FontMathError> {
    Ok(Point::new(div(pt.x, factor.x)?, div(pt.y, factor.y)?))
}

/// Apply a factor to an angle given in degrees.
///
/// The angle is treated as a unit direction vector, each axis of which is
/// multiplied or divided by its own factor, so that a non-uniform scale rotates
/// the direction the way it would rotate a line drawn at that angle.
pub fn factor_angle(angle: f64, factor: Factor, op: FactorOp) -> Result<f64, FontMathError> {
    let radians = angle.to_radians();
    let x = op.apply(radians.cos(), factor.x)?;
    let y = op.apply(radians.sin(), factor.y)?;
    Ok(y.atan2(x).to_degrees())
}

/// Round to the nearest integer, halves away from zero.
pub fn round_integer(value: f64) -> f64 {
    value.round()
}

/// Round to `digits` decimal places, halves to even.
pub fn round_digits(value: f64, digits: u32) -> f64 {
    let multiplier = 10f64.powi(digits as i32);
    (value * multiplier).round_ties_even() / multiplier
}

/// Round with the built-in policies: to an integer when `digits` is `None`,
/// otherwise to that many decimal places.
pub fn round_number(value: f64, digits: Option<u32>) -> f64 {
    Rounding::default().round(value, digits)
}

/// The rounding policy used by a snapshot.
///
/// Each snapshot carries its own policy, handed over at construction time, and
/// passes it on to the results of every operation performed on it.
#[derive(Debug, Clone, Copy)]
pub struct Rounding {
    /// Rounds a value to an integer
    pub integer: fn(f64) -> f64,
    /// Rounds a value to a number of decimal places
    pub digits: fn(f64, u32) -> f64,
}

impl Default for Rounding {
    fn default() -> Self {
        Rounding {
            integer: round_integer,
            digits: round_digits,
        }
    }
}

impl Rounding {
    pub fn new(integer: fn(f64) -> f64, digits: fn(f64, u32) -> f64) -> Self {
        Rounding { integer, digits }
    }

    pub fn round(&self, value: f64, digits: Option<u32>) -> f64 {
        match digits {
            None => (self.integer)(value),
            Some(d) => (self.digits)(value, d),
        }
    }

    pub fn round_pt(&self, pt: Point, digits: Option<u32>) -> Point {
        Point::new(self.round(pt.x, digits), self.round(pt.y, digits))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_point_functions() {
        assert_eq!(
            sub_pt(Point::new(20.0, 230.0), Point::new(50.0, 40.0)),
            Point::new(-30.0, 190.0)
        );
        assert_eq!(
            mul_pt(Point::new(15.0, 25.0), Factor::new(2.0, 3.0)),
            Point::new(30.0, 75.0)
        );
        assert_eq!(
            div_pt(Point::new(15.0, 75.0), Factor::new(2.0, 3.0)).unwrap(),
            Point::new(7.5, 25.0)
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(div(4.0, 0.0), Err(FontMathError::DivisionByZero));
        assert_eq!(
            div_pt(Point::new(1.0, 1.0), Factor::new(1.0, 0.0)),
            Err(FontMathError::DivisionByZero)
        );
        assert!(factor_angle(45.0, Factor::new(0.0, 1.0), FactorOp::Div).is_err());
    }

    #[test]
    fn test_factor_angle() {
        let angle = factor_angle(45.0, Factor::new(2.0, 1.0), FactorOp::Mul).unwrap();
        assert!((angle - 1f64.atan2(2.0).to_degrees()).abs() < 1e-9);
        let angle = factor_angle(5.0, Factor::new(2.0, 1.5), FactorOp::Mul).unwrap();
        assert!((angle - 3.75).abs() < 0.01);
        // Uniform scaling leaves angles alone
        let angle = factor_angle(30.0, Factor::from(3.0), FactorOp::Div).unwrap();
        assert!((angle - 30.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.1, 0.0)]
    #[case(0.99, 1.0)]
    #[case(0.499, 0.0)]
    #[case(0.5, 1.0)]
    #[case(-0.499, 0.0)]
    #[case(-0.5, -1.0)]
    #[case(1.5, 2.0)]
    #[case(2.5, 3.0)]
    fn test_round_to_integer(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round_number(value, None), expected);
    }

    #[rstest]
    #[case(0.3333, 0, 0.0)]
    #[case(0.3333, 1, 0.3)]
    #[case(0.3333, 2, 0.33)]
    #[case(0.3333, 3, 0.333)]
    #[case(0.25, 1, 0.2)]
    fn test_round_to_digits(#[case] value: f64, #[case] digits: u32, #[case] expected: f64) {
        assert_eq!(round_number(value, Some(digits)), expected);
    }

    #[test]
    fn test_custom_rounding() {
        let rounding = Rounding::new(f64::floor, round_digits);
        assert_eq!(rounding.round(0.9, None), 0.0);
        assert_eq!(rounding.round(0.25, Some(1)), 0.2);
    }
}
