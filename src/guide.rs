use crate::{
    functions::{factor_angle, Factor, FactorOp, MathOp, Rounding},
    pair::Pairer,
    FontMathError,
};
use serde::{Deserialize, Serialize};

/// A guideline as stored in a glyph or font.
///
/// A horizontal guideline only sets `y` and a vertical one only sets `x`;
/// other guidelines carry all three of `x`, `y` and `angle`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Guideline {
    pub fn horizontal(y: f64) -> Self {
        Guideline {
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn vertical(x: f64) -> Self {
        Guideline {
            x: Some(x),
            ..Default::default()
        }
    }

    pub fn angled(x: f64, y: f64, angle: f64) -> Self {
        Guideline {
            x: Some(x),
            y: Some(y),
            angle: Some(angle),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Fill in the position and angle implied by a horizontal or vertical
    /// guideline.
    pub fn expand(&self) -> MathGuideline {
        let (x, y, angle) = match (self.x, self.y) {
            (None, y) => (0.0, y.unwrap_or(0.0), 0.0),
            (Some(x), None) => (x, 0.0, 90.0),
            (Some(x), Some(y)) => (x, y, self.angle.unwrap_or(0.0)),
        };
        MathGuideline {
            name: self.name.clone(),
            identifier: self.identifier.clone(),
            x,
            y,
            angle,
            color: self.color.clone(),
        }
    }
}

/// A guideline with its position and angle filled in, used for math.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MathGuideline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MathGuideline {
    /// Drop the position and angle fields implied by a horizontal or vertical
    /// guideline.
    pub fn compress(&self) -> Guideline {
        let mut guideline = Guideline {
            name: self.name.clone(),
            identifier: self.identifier.clone(),
            x: Some(self.x),
            y: Some(self.y),
            angle: Some(self.angle),
            color: self.color.clone(),
        };
        if self.x == 0.0 && (self.angle == 0.0 || self.angle == 180.0) {
            guideline.x = None;
            guideline.angle = None;
        } else if self.y == 0.0 && (self.angle == 90.0 || self.angle == 270.0) {
            guideline.y = None;
            guideline.angle = None;
        }
        guideline
    }

    fn same_position(&self, other: &MathGuideline) -> bool {
        self.x == other.x && self.y == other.y && self.angle == other.angle
    }

    pub(crate) fn combine(&self, other: &MathGuideline, op: MathOp) -> MathGuideline {
        MathGuideline {
            x: op.apply(self.x, other.x),
            y: op.apply(self.y, other.y),
            angle: op.apply(self.angle, other.angle),
            ..self.clone()
        }
    }

    pub(crate) fn scale(
        &self,
        factor: Factor,
        op: FactorOp,
    ) -> Result<MathGuideline, FontMathError> {
        Ok(MathGuideline {
            x: op.apply(self.x, factor.x)?,
            y: op.apply(self.y, factor.y)?,
            angle: factor_angle(self.angle, factor, op)?,
            ..self.clone()
        })
    }

    pub(crate) fn round(&self, rounding: &Rounding, digits: Option<u32>) -> MathGuideline {
        MathGuideline {
            x: rounding.round(self.x, digits),
            y: rounding.round(self.y, digits),
            ..self.clone()
        }
    }
}

/// Pair up guidelines from two glyphs or fonts.
///
/// Matching is attempted with progressively fewer fields: name, identifier
/// and position together first, then name and identifier, then name or
/// identifier with position, and finally name or identifier alone.
pub fn pair_guidelines<'a>(
    guidelines1: &'a [MathGuideline],
    guidelines2: &'a [MathGuideline],
) -> Vec<(&'a MathGuideline, &'a MathGuideline)> {
    let mut pairer = Pairer::new(guidelines1, guidelines2);
    pairer
        .pass(|g1, g2| {
            g1.name == g2.name && g1.identifier == g2.identifier && g1.same_position(g2)
        })
        .pass(|g1, g2| g1.name == g2.name && g1.identifier == g2.identifier)
        .pass(|g1, g2| g1.name == g2.name && g1.same_position(g2))
        .pass(|g1, g2| g1.identifier == g2.identifier && g1.same_position(g2));
    if pairer.has_candidates() {
        pairer.pass(|g1, g2| g1.name == g2.name);
    }
    if pairer.has_candidates() {
        pairer.pass(|g1, g2| g1.identifier == g2.identifier);
    }
    let (left, right) = pairer.leftovers();
    if left + right > 0 {
        log::debug!("Dropping {} unpaired guidelines", left + right);
    }
    pairer.finish()
}

/// Combine two guideline lists, dropping guidelines without a partner.
pub(crate) fn combine_guidelines(
    guidelines1: &[MathGuideline],
    guidelines2: &[MathGuideline],
    op: MathOp,
) -> Vec<MathGuideline> {
    pair_guidelines(guidelines1, guidelines2)
        .into_iter()
        .map(|(g1, g2)| g1.combine(g2, op))
        .collect()
}

pub(crate) fn scale_guidelines(
    guidelines: &[MathGuideline],
    factor: Factor,
    op: FactorOp,
) -> Result<Vec<MathGuideline>, FontMathError> {
    guidelines.iter().map(|g| g.scale(factor, op)).collect()
}

pub(crate) fn round_guidelines(
    guidelines: &[MathGuideline],
    rounding: &Rounding,
    digits: Option<u32>,
) -> Vec<MathGuideline> {
    guidelines
        .iter()
        .map(|g| g.round(rounding, digits))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Guideline::horizontal(100.0))]
    #[case(Guideline::vertical(-25.0))]
    #[case(Guideline::vertical(0.0))]
    #[case(Guideline::angled(10.0, 20.0, 45.0).with_name("diagonal"))]
    #[case(Guideline::horizontal(5.0).with_identifier("guide1"))]
    fn test_expand_compress_round_trip(#[case] guideline: Guideline) {
        assert_eq!(guideline.expand().compress(), guideline);
    }

    #[test]
    fn test_expand() {
        let horizontal = Guideline::horizontal(100.0).expand();
        assert_eq!((horizontal.x, horizontal.y, horizontal.angle), (0.0, 100.0, 0.0));
        let vertical = Guideline::vertical(30.0).expand();
        assert_eq!((vertical.x, vertical.y, vertical.angle), (30.0, 0.0, 90.0));
    }

    #[test]
    fn test_anisotropic_angle_scaling() {
        let guideline = Guideline::angled(0.0, 0.0, 45.0).expand();
        let scaled = guideline
            .scale(Factor::new(2.0, 1.0), FactorOp::Mul)
            .unwrap();
        let expected = 1f64.atan2(2.0).to_degrees();
        assert!((scaled.angle - expected).abs() < 1e-9);
        assert!((scaled.angle - 26.565).abs() < 1e-3);
    }

    #[test]
    fn test_combine_uses_scalar_angle() {
        let g1 = Guideline::angled(10.0, 10.0, 30.0).expand();
        let g2 = Guideline::angled(5.0, 5.0, 20.0).expand();
        let combined = g1.combine(&g2, MathOp::Add);
        assert_eq!((combined.x, combined.y, combined.angle), (15.0, 15.0, 50.0));
    }

    #[test]
    fn test_pairing_tiers() {
        let left = vec![
            Guideline::horizontal(10.0).with_name("a").expand(),
            Guideline::horizontal(20.0).with_identifier("2").expand(),
            Guideline::vertical(30.0).with_name("c").expand(),
        ];
        let right = vec![
            Guideline::vertical(300.0).with_name("c").expand(),
            Guideline::horizontal(20.0).with_identifier("2").expand(),
            Guideline::horizontal(10.0).with_name("a").expand(),
        ];
        let pairs = pair_guidelines(&left, &right);
        let summary: Vec<_> = pairs.iter().map(|(a, b)| (a.y + a.x, b.y + b.x)).collect();
        assert_eq!(summary, vec![(10.0, 10.0), (20.0, 20.0), (30.0, 300.0)]);
    }

    #[test]
    fn test_unmatched_guidelines_are_dropped() {
        let left = vec![Guideline::horizontal(10.0)
            .with_name("a")
            .with_identifier("1")
            .expand()];
        let right = vec![Guideline::horizontal(10.0)
            .with_name("b")
            .with_identifier("2")
            .expand()];
        assert!(combine_guidelines(&left, &right, MathOp::Add).is_empty());
    }
}
