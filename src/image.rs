use crate::{
    common::Transformation,
    functions::{Factor, FactorOp, MathOp, Rounding},
    FontMathError,
};
use serde::{Deserialize, Serialize};

/// A background image attached to a glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub file_name: String,
    #[serde(default)]
    pub transformation: Transformation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Image {
    pub fn new(file_name: impl Into<String>) -> Self {
        Image {
            file_name: file_name.into(),
            transformation: Transformation::default(),
            color: None,
        }
    }

    pub fn expand(&self) -> MathImage {
        MathImage {
            file_name: Some(self.file_name.clone()),
            transformation: self.transformation,
            color: self.color.clone(),
        }
    }
}

/// The image slot of a glyph snapshot.
///
/// Always carries a transformation, even when there is no image, so that math
/// can be applied unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MathImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub transformation: Transformation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<Option<&Image>> for MathImage {
    fn from(image: Option<&Image>) -> Self {
        image.map(Image::expand).unwrap_or_default()
    }
}

impl MathImage {
    /// The stored form of this image, or `None` if there is no image file
    pub fn compress(&self) -> Option<Image> {
        self.file_name.as_ref().map(|file_name| Image {
            file_name: file_name.clone(),
            transformation: self.transformation,
            color: self.color.clone(),
        })
    }

    /// Images only combine when they refer to the same file; otherwise the
    /// result has no image.
    pub(crate) fn combine(&self, other: &MathImage, op: MathOp) -> MathImage {
        if self.file_name != other.file_name {
            log::debug!(
                "Dropping image: {:?} does not match {:?}",
                self.file_name,
                other.file_name
            );
            return MathImage::default();
        }
        MathImage {
            transformation: self.transformation.combine(&other.transformation, op),
            ..self.clone()
        }
    }

    pub(crate) fn scale(&self, factor: Factor, op: FactorOp) -> Result<MathImage, FontMathError> {
        Ok(MathImage {
            transformation: self.transformation.scale(factor, op)?,
            ..self.clone()
        })
    }

    pub(crate) fn round(&self, rounding: &Rounding, digits: Option<u32>) -> MathImage {
        MathImage {
            transformation: self.transformation.round(rounding, digits),
            ..self.clone()
        }
    }
}
