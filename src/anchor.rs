use crate::{
    functions::{Factor, FactorOp, MathOp, Rounding},
    FontMathError,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An anchor point in a glyph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Anchor {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Anchor {
            name: Some(name.into()),
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn position(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    fn with_position(&self, pt: kurbo::Point) -> Self {
        Anchor {
            x: pt.x,
            y: pt.y,
            ..self.clone()
        }
    }

    pub(crate) fn combine(&self, other: &Anchor, op: MathOp) -> Anchor {
        self.with_position(op.apply_pt(self.position(), other.position()))
    }

    pub(crate) fn scale(&self, factor: Factor, op: FactorOp) -> Result<Anchor, FontMathError> {
        Ok(self.with_position(op.apply_pt(self.position(), factor)?))
    }

    pub(crate) fn round(&self, rounding: &Rounding, digits: Option<u32>) -> Anchor {
        self.with_position(rounding.round_pt(self.position(), digits))
    }
}

/// Group anchors by name, keeping the order in which names first appear.
fn anchor_tree(anchors: &[Anchor]) -> IndexMap<Option<&str>, Vec<&Anchor>> {
    let mut tree: IndexMap<Option<&str>, Vec<&Anchor>> = IndexMap::new();
    for anchor in anchors {
        tree.entry(anchor.name.as_deref()).or_default().push(anchor);
    }
    tree
}

/// Pair up anchors from two glyphs.
///
/// Anchors only pair with anchors of the same name. Within a name, anchors
/// with matching identifiers pair first and the rest pair up in order until
/// one side runs out.
pub fn pair_anchors<'a>(
    anchors1: &'a [Anchor],
    anchors2: &'a [Anchor],
) -> Vec<(&'a Anchor, &'a Anchor)> {
    let tree1 = anchor_tree(anchors1);
    let mut tree2 = anchor_tree(anchors2);
    let mut pairs = vec![];
    for (name, mut bucket1) in tree1 {
        let Some(mut bucket2) = tree2.shift_remove(&name) else {
            log::debug!(
                "Dropping {} anchors named {:?}: no partner",
                bucket1.len(),
                name
            );
            continue;
        };
        let mut unmatched = vec![];
        for anchor1 in bucket1.drain(..) {
            match bucket2
                .iter()
                .position(|anchor2| anchor2.identifier == anchor1.identifier)
            {
                Some(ix) => pairs.push((anchor1, bucket2.remove(ix))),
                None => unmatched.push(anchor1),
            }
        }
        let count = unmatched.len().min(bucket2.len());
        pairs.extend(unmatched.drain(..count).zip(bucket2.drain(..count)));
        if !unmatched.is_empty() || !bucket2.is_empty() {
            log::debug!(
                "Dropping {} unpaired anchors named {:?}",
                unmatched.len() + bucket2.len(),
                name
            );
        }
    }
    pairs
}
