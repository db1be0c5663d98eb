use crate::{
    anchor::{pair_anchors, Anchor},
    common::Lib,
    functions::{Factor, FactorOp, MathOp, Rounding},
    guide::{combine_guidelines, round_guidelines, scale_guidelines, Guideline, MathGuideline},
    image::{Image, MathImage},
    pen::{FilterRedundantPointPen, NormalizingPen, PointPen},
    shape::{
        combine_contours, pair_components, round_contours, scale_contours, Component, Contour,
    },
    FontMathError,
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Read access to a glyph which can be turned into a [`MathGlyph`].
pub trait GlyphSource {
    fn name(&self) -> Option<&str>;
    fn unicodes(&self) -> Vec<u32>;
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn note(&self) -> Option<&str>;
    fn lib(&self) -> &Lib;
    fn anchors(&self) -> Vec<Anchor>;
    fn guidelines(&self) -> Vec<Guideline>;
    fn image(&self) -> Option<Image>;
    /// Draw the glyph's contours and components into a point pen.
    fn draw_points(&self, pen: &mut dyn PointPen);
}

/// Write access to a glyph which a [`MathGlyph`] can be extracted into.
///
/// Outlines are written by drawing into the target through its
/// [`PointPen`] implementation.
pub trait GlyphTarget: PointPen {
    fn clear_contours(&mut self);
    fn clear_components(&mut self);
    fn clear_anchors(&mut self);
    fn clear_guidelines(&mut self);
    fn clear_lib(&mut self);
    fn set_anchors(&mut self, anchors: Vec<Anchor>);
    fn set_guidelines(&mut self, guidelines: Vec<Guideline>);
    fn set_image(&mut self, image: Option<Image>);
    fn set_lib(&mut self, lib: Lib);
    fn set_width(&mut self, width: f64);
    fn set_height(&mut self, height: f64);
    fn set_note(&mut self, note: Option<String>);
    fn set_name(&mut self, name: Option<SmolStr>);
    fn set_unicodes(&mut self, unicodes: Vec<u32>);
}

/// A snapshot of a glyph on which arithmetic can be performed.
///
/// Contours are stored in normalized form (see [`NormalizingPen`]) and
/// guidelines and image in their expanded forms. No operation modifies its
/// operands; each returns a new snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MathGlyph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unicodes: Vec<u32>,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contours: Vec<Contour>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<Anchor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guidelines: Vec<MathGuideline>,
    #[serde(default)]
    pub image: MathImage,
    #[serde(default, skip_serializing_if = "Lib::is_empty")]
    pub lib: Lib,
    #[serde(skip)]
    rounding: Rounding,
}

impl PartialEq for MathGlyph {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.unicodes == other.unicodes
            && self.width == other.width
            && self.height == other.height
            && self.note == other.note
            && self.contours == other.contours
            && self.components == other.components
            && self.anchors == other.anchors
            && self.guidelines == other.guidelines
            && self.image == other.image
            && self.lib == other.lib
    }
}

impl MathGlyph {
    /// Take a snapshot of a glyph.
    pub fn from_source<G: GlyphSource + ?Sized>(glyph: &G) -> Self {
        let mut pen = NormalizingPen::new();
        glyph.draw_points(&mut pen);
        let (contours, components) = pen.build();
        MathGlyph {
            name: glyph.name().map(SmolStr::from),
            unicodes: glyph.unicodes(),
            width: glyph.width(),
            height: glyph.height(),
            note: glyph.note().map(|s| s.to_string()),
            contours,
            components,
            anchors: glyph.anchors(),
            guidelines: glyph.guidelines().iter().map(Guideline::expand).collect(),
            image: MathImage::from(glyph.image().as_ref()),
            lib: glyph.lib().clone(),
            rounding: Rounding::default(),
        }
    }

    /// Use a different rounding policy for [`MathGlyph::round`] on this
    /// snapshot and everything derived from it.
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// A copy of this glyph with all outline, anchor and guideline data removed
    fn copy_without_math_data(&self) -> Self {
        MathGlyph {
            name: self.name.clone(),
            unicodes: self.unicodes.clone(),
            width: self.width,
            height: self.height,
            note: self.note.clone(),
            lib: self.lib.clone(),
            rounding: self.rounding,
            ..Default::default()
        }
    }

    /// Add or subtract another glyph.
    ///
    /// Contours must be compatible, point for point. Components, anchors and
    /// guidelines are paired up and anything without a partner is dropped; if
    /// this glyph has none of a kind, the result has none either.
    pub fn combine(&self, other: &MathGlyph, op: MathOp) -> Result<MathGlyph, FontMathError> {
        let mut result = self.copy_without_math_data();
        result.width = op.apply(self.width, other.width);
        result.height = op.apply(self.height, other.height);
        if !self.contours.is_empty() {
            result.contours = combine_contours(&self.contours, &other.contours, op)?;
        }
        if !self.components.is_empty() {
            result.components = pair_components(&self.components, &other.components)
                .into_iter()
                .map(|(c1, c2)| c1.combine(c2, op))
                .collect();
        }
        if !self.anchors.is_empty() {
            result.anchors = pair_anchors(&self.anchors, &other.anchors)
                .into_iter()
                .map(|(a1, a2)| a1.combine(a2, op))
                .collect();
        }
        if !self.guidelines.is_empty() {
            result.guidelines = combine_guidelines(&self.guidelines, &other.guidelines, op);
        }
        result.image = self.image.combine(&other.image, op);
        Ok(result)
    }

    pub fn add(&self, other: &MathGlyph) -> Result<MathGlyph, FontMathError> {
        self.combine(other, MathOp::Add)
    }

    pub fn sub(&self, other: &MathGlyph) -> Result<MathGlyph, FontMathError> {
        self.combine(other, MathOp::Sub)
    }

    /// Multiply or divide by a factor, which may differ per axis.
    pub fn scale(
        &self,
        factor: impl Into<Factor>,
        op: FactorOp,
    ) -> Result<MathGlyph, FontMathError> {
        let factor = factor.into();
        let mut result = self.copy_without_math_data();
        result.width = op.apply(self.width, factor.x)?;
        result.height = op.apply(self.height, factor.y)?;
        result.contours = scale_contours(&self.contours, factor, op)?;
        result.components = self
            .components
            .iter()
            .map(|c| c.scale(factor, op))
            .collect::<Result<_, _>>()?;
        result.anchors = self
            .anchors
            .iter()
            .map(|a| a.scale(factor, op))
            .collect::<Result<_, _>>()?;
        result.guidelines = scale_guidelines(&self.guidelines, factor, op)?;
        result.image = self.image.scale(factor, op)?;
        Ok(result)
    }

    pub fn mul(&self, factor: impl Into<Factor>) -> Result<MathGlyph, FontMathError> {
        self.scale(factor, FactorOp::Mul)
    }

    pub fn div(&self, factor: impl Into<Factor>) -> Result<MathGlyph, FontMathError> {
        self.scale(factor, FactorOp::Div)
    }

    /// Round all coordinates, to integers if `digits` is `None`.
    ///
    /// Component and image scale factors are left alone; only their offsets
    /// are rounded.
    pub fn round(&self, digits: Option<u32>) -> MathGlyph {
        let rounding = &self.rounding;
        let mut result = self.copy_without_math_data();
        result.width = rounding.round(self.width, digits);
        result.height = rounding.round(self.height, digits);
        result.contours = round_contours(&self.contours, rounding, digits);
        result.components = self
            .components
            .iter()
            .map(|c| c.round(rounding, digits))
            .collect();
        result.anchors = self
            .anchors
            .iter()
            .map(|a| a.round(rounding, digits))
            .collect();
        result.guidelines = round_guidelines(&self.guidelines, rounding, digits);
        result.image = self.image.round(rounding, digits);
        result
    }

    /// Draw the contours and components into a point pen.
    ///
    /// With `filter_redundant`, curves whose control points sit on their end
    /// points are drawn as lines.
    pub fn draw_points<P: PointPen + ?Sized>(&self, pen: &mut P, filter_redundant: bool) {
        if filter_redundant {
            let mut filter = FilterRedundantPointPen::new(pen);
            self.draw_points_unfiltered(&mut filter);
        } else {
            self.draw_points_unfiltered(pen);
        }
    }

    fn draw_points_unfiltered<P: PointPen + ?Sized>(&self, pen: &mut P) {
        for contour in &self.contours {
            pen.begin_path(contour.identifier.as_deref());
            for point in &contour.points {
                pen.add_point(point);
            }
            pen.end_path();
        }
        for component in &self.components {
            pen.add_component(
                &component.base_glyph,
                component.transformation,
                component.identifier.as_deref(),
            );
        }
    }

    /// Write this snapshot into a glyph, replacing its outlines, anchors,
    /// guidelines, image and lib.
    ///
    /// Redundant curve points are filtered out on the way. Unless
    /// `only_geometry` is set, the name and unicodes are written too.
    pub fn extract_glyph<T: GlyphTarget + ?Sized>(&self, target: &mut T, only_geometry: bool) {
        target.clear_contours();
        target.clear_components();
        target.clear_anchors();
        target.clear_guidelines();
        target.clear_lib();
        self.draw_points(target, true);
        target.set_anchors(self.anchors.clone());
        target.set_guidelines(self.guidelines.iter().map(MathGuideline::compress).collect());
        target.set_image(self.image.compress());
        target.set_lib(self.lib.clone());
        target.set_width(self.width);
        target.set_height(self.height);
        target.set_note(self.note.clone());
        if !only_geometry {
            target.set_name(self.name.clone());
            target.set_unicodes(self.unicodes.clone());
        }
    }

    /// The glyph's contours as a single [`kurbo::BezPath`].
    ///
    /// Components are not included, as they refer to other glyphs.
    pub fn to_kurbo(&self) -> Result<kurbo::BezPath, FontMathError> {
        let mut path = kurbo::BezPath::new();
        for contour in &self.contours {
            for el in contour.to_kurbo()?.elements() {
                path.push(*el);
            }
        }
        Ok(path)
    }
}

impl GlyphSource for MathGlyph {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn unicodes(&self) -> Vec<u32> {
        self.unicodes.clone()
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    fn lib(&self) -> &Lib {
        &self.lib
    }

    fn anchors(&self) -> Vec<Anchor> {
        self.anchors.clone()
    }

    fn guidelines(&self) -> Vec<Guideline> {
        self.guidelines.iter().map(MathGuideline::compress).collect()
    }

    fn image(&self) -> Option<Image> {
        self.image.compress()
    }

    fn draw_points(&self, pen: &mut dyn PointPen) {
        self.draw_points_unfiltered(pen);
    }
}
