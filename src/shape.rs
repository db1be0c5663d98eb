use crate::{
    common::{Node, NodeType, Transformation},
    functions::{Factor, FactorOp, MathOp, Rounding},
    pair::Pairer,
    FontMathError,
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A component in a glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// The referenced glyph name
    pub base_glyph: SmolStr,
    /// The transformation applied to the component
    #[serde(default)]
    pub transformation: Transformation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Component {
    pub fn new(base_glyph: impl Into<SmolStr>, transformation: Transformation) -> Self {
        Component {
            base_glyph: base_glyph.into(),
            transformation,
            identifier: None,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub(crate) fn combine(&self, other: &Component, op: MathOp) -> Component {
        Component {
            transformation: self.transformation.combine(&other.transformation, op),
            ..self.clone()
        }
    }

    pub(crate) fn scale(&self, factor: Factor, op: FactorOp) -> Result<Component, FontMathError> {
        Ok(Component {
            transformation: self.transformation.scale(factor, op)?,
            ..self.clone()
        })
    }

    pub(crate) fn round(&self, rounding: &Rounding, digits: Option<u32>) -> Component {
        Component {
            transformation: self.transformation.round(rounding, digits),
            ..self.clone()
        }
    }
}

/// Pair up components from two glyphs.
///
/// Components with the same base glyph and identifier are paired first; the
/// rest are paired on base glyph alone, in order. Unpaired components are
/// dropped.
pub fn pair_components<'a>(
    components1: &'a [Component],
    components2: &'a [Component],
) -> Vec<(&'a Component, &'a Component)> {
    let mut pairer = Pairer::new(components1, components2);
    pairer
        .pass(|c1, c2| c1.base_glyph == c2.base_glyph && c1.identifier == c2.identifier)
        .pass(|c1, c2| c1.base_glyph == c2.base_glyph);
    let (left, right) = pairer.leftovers();
    if left + right > 0 {
        log::debug!(
            "Dropping {} unpaired components ({} left, {} right)",
            left + right,
            left,
            right
        );
    }
    pairer.finish()
}

/// A contour in a glyph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// The points of the contour, in drawing order
    pub points: Vec<Node>,
}

impl Contour {
    /// A contour is open if it begins with a move.
    pub fn is_closed(&self) -> bool {
        self.points
            .first()
            .map(|p| p.nodetype != NodeType::Move)
            .unwrap_or(true)
    }

    /// Converts the `Contour` to a [`kurbo::BezPath`].
    ///
    /// Fails if a curve point is preceded by no off-curve points or by more
    /// than two.
    pub fn to_kurbo(&self) -> Result<kurbo::BezPath, FontMathError> {
        let mut path = kurbo::BezPath::new();
        let mut offs = std::collections::VecDeque::new();
        let closed = self.is_closed();
        let rotate = if closed {
            self.points
                .iter()
                .rev()
                .position(|pt| pt.nodetype.is_on_curve())
                .map(|idx| self.points.len() - 1 - idx)
                .unwrap_or(0)
        } else {
            0
        };
        let count = self.points.len();
        // Closed contours revisit their start point to close the last segment
        let mut points = self
            .points
            .iter()
            .cycle()
            .skip(rotate)
            .take(count + usize::from(closed && count > 0));
        // kurbo paths must start with a move_to, even closed ones
        if let Some(start) = points.next() {
            path.move_to(start.to_kurbo());
        }
        for (ix, pt) in points.enumerate() {
            let kurbo_point = pt.to_kurbo();
            let closing = closed && ix + 1 == count;
            match pt.nodetype {
                NodeType::Move | NodeType::Line if closing => {}
                NodeType::Move => path.move_to(kurbo_point),
                NodeType::Line => path.line_to(kurbo_point),
                NodeType::OffCurve => offs.push_back(kurbo_point),
                NodeType::Curve => {
                    match offs.make_contiguous() {
                        [p1] => path.quad_to(*p1, kurbo_point),
                        [p1, p2] => path.curve_to(*p1, *p2, kurbo_point),
                        _ => return Err(FontMathError::BadContour),
                    };
                    offs.clear();
                }
                NodeType::QCurve => {
                    if offs.is_empty() {
                        path.line_to(kurbo_point);
                    }
                    while let Some(pt) = offs.pop_front() {
                        if let Some(next) = offs.front() {
                            let implied_point = pt.midpoint(*next);
                            path.quad_to(pt, implied_point);
                        } else {
                            path.quad_to(pt, kurbo_point);
                        }
                    }
                }
            }
        }
        if closed {
            path.close_path()
        }
        Ok(path)
    }
}

/// Combine two lists of contours point by point.
///
/// Contours are matched strictly by index, and matched contours must have the
/// same number of points. Everything except the point positions comes from
/// the first list.
pub fn combine_contours(
    contours1: &[Contour],
    contours2: &[Contour],
    op: MathOp,
) -> Result<Vec<Contour>, FontMathError> {
    if contours1.len() != contours2.len() {
        return Err(FontMathError::IncompatibleContours {
            reason: format!(
                "{} contours against {}",
                contours1.len(),
                contours2.len()
            ),
        });
    }
    contours1
        .iter()
        .zip(contours2.iter())
        .enumerate()
        .map(|(ix, (c1, c2))| {
            if c1.points.len() != c2.points.len() {
                return Err(FontMathError::IncompatibleContours {
                    reason: format!(
                        "contour {} has {} points against {}",
                        ix,
                        c1.points.len(),
                        c2.points.len()
                    ),
                });
            }
            Ok(Contour {
                identifier: c1.identifier.clone(),
                points: c1
                    .points
                    .iter()
                    .zip(c2.points.iter())
                    .map(|(p1, p2)| p1.with_position(op.apply_pt(p1.to_kurbo(), p2.to_kurbo())))
                    .collect(),
            })
        })
        .collect()
}

pub(crate) fn scale_contours(
    contours: &[Contour],
    factor: Factor,
    op: FactorOp,
) -> Result<Vec<Contour>, FontMathError> {
    contours
        .iter()
        .map(|contour| {
            Ok(Contour {
                identifier: contour.identifier.clone(),
                points: contour
                    .points
                    .iter()
                    .map(|p| Ok(p.with_position(op.apply_pt(p.to_kurbo(), factor)?)))
                    .collect::<Result<Vec<Node>, FontMathError>>()?,
            })
        })
        .collect()
}

pub(crate) fn round_contours(
    contours: &[Contour],
    rounding: &Rounding,
    digits: Option<u32>,
) -> Vec<Contour> {
    contours
        .iter()
        .map(|contour| Contour {
            identifier: contour.identifier.clone(),
            points: contour
                .points
                .iter()
                .map(|p| p.with_position(rounding.round_pt(p.to_kurbo(), digits)))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;

    fn component(base: &str, identifier: Option<&str>, offset: f64) -> Component {
        Component {
            base_glyph: base.into(),
            transformation: Transformation::new([1.0, 0.0, 0.0, 1.0, offset, offset]),
            identifier: identifier.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_pair_components_by_identifier() {
        let components1 = vec![
            component("A", Some("1"), 0.0),
            component("B", Some("1"), 0.0),
            component("A", None, 0.0),
        ];
        let components2 = vec![
            component("A", None, 1.0),
            component("B", Some("1"), 1.0),
            component("A", Some("1"), 1.0),
        ];
        let pairs = pair_components(&components1, &components2);
        let summary: Vec<_> = pairs
            .iter()
            .map(|(a, b)| {
                (
                    a.base_glyph.as_str(),
                    a.identifier.as_deref(),
                    b.base_glyph.as_str(),
                    b.identifier.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("A", Some("1"), "A", Some("1")),
                ("B", Some("1"), "B", Some("1")),
                ("A", None, "A", None),
            ]
        );
    }

    #[test]
    fn test_pair_components_by_base_glyph() {
        let components1 = vec![
            component("A", Some("1"), 0.0),
            component("B", Some("2"), 0.0),
            component("C", None, 0.0),
        ];
        let components2 = vec![
            component("B", Some("x"), 1.0),
            component("A", Some("y"), 1.0),
            component("D", None, 1.0),
        ];
        let pairs = pair_components(&components1, &components2);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].1.identifier.as_deref(), Some("y"));
        assert_eq!(pairs[1].1.identifier.as_deref(), Some("x"));
    }

    #[test]
    fn test_combine_contours_checks_structure() {
        let contour = Contour {
            identifier: None,
            points: vec![Node::new_curve(0.0, 0.0)],
        };
        let longer = Contour {
            identifier: None,
            points: vec![Node::new_curve(0.0, 0.0), Node::new_offcurve(1.0, 1.0)],
        };
        assert!(combine_contours(&[contour.clone()], &[], MathOp::Add).is_err());
        assert!(combine_contours(&[contour], &[longer], MathOp::Add).is_err());
    }

    #[test]
    fn test_combine_contours_keeps_left_metadata() {
        let mut p1 = Node::new_curve(1.0, 2.0);
        p1.name = Some("left".to_string());
        p1.smooth = true;
        let mut p2 = Node::new_curve(10.0, 20.0);
        p2.name = Some("right".to_string());
        let c1 = Contour {
            identifier: Some("c1".to_string()),
            points: vec![p1],
        };
        let c2 = Contour {
            identifier: Some("c2".to_string()),
            points: vec![p2],
        };
        let result = combine_contours(&[c1], &[c2], MathOp::Sub).unwrap();
        assert_eq!(result[0].identifier.as_deref(), Some("c1"));
        let point = &result[0].points[0];
        assert_eq!((point.x, point.y), (-9.0, -18.0));
        assert_eq!(point.name.as_deref(), Some("left"));
        assert!(point.smooth);
    }

    #[test]
    fn test_contour_to_kurbo() {
        let contour = Contour {
            identifier: None,
            points: vec![
                Node::new_line(0.0, 0.0),
                Node::new_line(100.0, 0.0),
                Node::new_offcurve(100.0, 50.0),
                Node::new_offcurve(50.0, 100.0),
                Node::new_curve(0.0, 100.0),
            ],
        };
        let path = contour.to_kurbo().unwrap();
        assert_eq!(path.elements().len(), 5);
        assert_eq!(
            path.elements()[0],
            kurbo::PathEl::MoveTo(kurbo::Point::new(0.0, 100.0))
        );
        assert_eq!(path.elements()[4], kurbo::PathEl::ClosePath);
    }

    #[test]
    fn test_contour_to_kurbo_rejects_bare_curve() {
        let contour = Contour {
            identifier: None,
            points: vec![Node::new_line(0.0, 0.0), Node::new_curve(10.0, 10.0)],
        };
        assert_eq!(contour.to_kurbo(), Err(FontMathError::BadContour));
    }
}
