//! Arithmetic over fonts.
//!
//! Glyphs, font info and kerning are turned into snapshots ([`MathGlyph`],
//! [`MathInfo`] and [`MathKerning`]) which can be added, subtracted, scaled
//! and rounded, and then written back into a font. This is the machinery
//! behind interpolation and extrapolation between masters.
//!
//! Snapshots never talk to a font format directly: anything implementing
//! [`GlyphSource`], [`InfoSource`] or [`KerningSource`] can be read, and
//! anything implementing the matching target trait can be written to.
#![deny(clippy::unwrap_used, clippy::expect_used)]

mod anchor;
mod common;
mod error;
pub mod functions;
mod glyph;
mod guide;
mod image;
mod info;
mod kerning;
mod pair;
pub mod pen;
mod serde_helpers;
mod shape;

pub use crate::{
    anchor::{pair_anchors, Anchor},
    common::{Lib, Node, NodeType, Transformation},
    error::FontMathError,
    functions::{Factor, FactorOp, MathOp, Rounding},
    glyph::{GlyphSource, GlyphTarget, MathGlyph},
    guide::{pair_guidelines, Guideline, MathGuideline},
    image::{Image, MathImage},
    info::{
        postscript_weight_name, Axis, FormattedValue, Formatter, InfoData, InfoField, InfoSource,
        InfoTarget, InfoValue, MathInfo, Number,
    },
    kerning::{
        AmbiguousPairValidator, GroupPrefixes, Groups, Kerning, KerningData, KerningPair,
        KerningSource, KerningTarget, KerningValidator, MathKerning, PairSide, PairTier,
    },
    pen::PointPen,
    shape::{combine_contours, pair_components, Component, Contour},
};
