//! Font info math.
//!
//! Font-wide metrics are held as a map from [`InfoField`] to [`InfoValue`].
//! Each field knows which axis it scales along and how it must be formatted
//! when written back into a font.
use std::str::FromStr;

use crate::{
    functions::{factor_angle, Factor, FactorOp, MathOp, Rounding},
    guide::{combine_guidelines, round_guidelines, scale_guidelines, Guideline, MathGuideline},
    FontMathError,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The axis a field is scaled along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    /// An angle in degrees, scaled with [`factor_angle`]
    Angle,
}

/// How a field's value is written back into a font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// An integer if the value is integral, otherwise a float
    Number,
    Integer,
    Float,
    NonNegativeNumber,
    NonNegativeInteger,
    /// Every element rounded to an integer. No built-in field uses this;
    /// it is available to callers formatting their own values.
    IntegerList,
    NumberList,
    /// An integer between 1 and 9
    WidthClass,
    /// A non-negative integer
    WeightClass,
}

/// A number as written into a font
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    fn from_number(value: f64) -> Number {
        if value.fract() == 0.0 {
            Number::Integer(value as i64)
        } else {
            Number::Float(value)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

/// A formatted field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormattedValue {
    Number(Number),
    List(Vec<Number>),
}

impl Formatter {
    /// Format a value, rounding integers with the given policy
    pub fn format(&self, value: &InfoValue, rounding: &Rounding) -> FormattedValue {
        let integer = |v: f64| (rounding.integer)(v) as i64;
        match value {
            InfoValue::List(values) => FormattedValue::List(
                values
                    .iter()
                    .map(|v| match self {
                        Formatter::IntegerList | Formatter::Integer => Number::Integer(integer(*v)),
                        _ => Number::from_number(*v),
                    })
                    .collect(),
            ),
            InfoValue::Number(v) => FormattedValue::Number(match self {
                Formatter::Number | Formatter::NumberList => Number::from_number(*v),
                Formatter::Integer | Formatter::IntegerList => Number::Integer(integer(*v)),
                Formatter::Float => Number::Float(*v),
                Formatter::NonNegativeNumber => Number::from_number(v.max(0.0)),
                Formatter::NonNegativeInteger | Formatter::WeightClass => {
                    Number::Integer(integer(*v).max(0))
                }
                Formatter::WidthClass => Number::Integer(integer(*v).clamp(1, 9)),
            }),
        }
    }
}

/// A metric which takes part in font info math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InfoField {
    UnitsPerEm,
    Descender,
    XHeight,
    CapHeight,
    Ascender,
    ItalicAngle,
    OpenTypeHeadLowestRecPPEM,
    OpenTypeHheaAscender,
    OpenTypeHheaDescender,
    OpenTypeHheaLineGap,
    OpenTypeHheaCaretSlopeRise,
    OpenTypeHheaCaretSlopeRun,
    OpenTypeHheaCaretOffset,
    OpenTypeOS2WidthClass,
    OpenTypeOS2WeightClass,
    OpenTypeOS2TypoAscender,
    OpenTypeOS2TypoDescender,
    OpenTypeOS2TypoLineGap,
    OpenTypeOS2WinAscent,
    OpenTypeOS2WinDescent,
    OpenTypeOS2SubscriptXSize,
    OpenTypeOS2SubscriptYSize,
    OpenTypeOS2SubscriptXOffset,
    OpenTypeOS2SubscriptYOffset,
    OpenTypeOS2SuperscriptXSize,
    OpenTypeOS2SuperscriptYSize,
    OpenTypeOS2SuperscriptXOffset,
    OpenTypeOS2SuperscriptYOffset,
    OpenTypeOS2StrikeoutSize,
    OpenTypeOS2StrikeoutPosition,
    OpenTypeVheaVertTypoAscender,
    OpenTypeVheaVertTypoDescender,
    OpenTypeVheaVertTypoLineGap,
    OpenTypeVheaCaretSlopeRise,
    OpenTypeVheaCaretSlopeRun,
    OpenTypeVheaCaretOffset,
    PostscriptSlantAngle,
    PostscriptUnderlineThickness,
    PostscriptUnderlinePosition,
    PostscriptBlueValues,
    PostscriptOtherBlues,
    PostscriptFamilyBlues,
    PostscriptFamilyOtherBlues,
    PostscriptStemSnapH,
    PostscriptStemSnapV,
    PostscriptBlueFuzz,
    PostscriptBlueShift,
    PostscriptBlueScale,
    PostscriptDefaultWidthX,
    PostscriptNominalWidthX,
}

impl InfoField {
    pub const ALL: [InfoField; 50] = [
        InfoField::UnitsPerEm,
        InfoField::Descender,
        InfoField::XHeight,
        InfoField::CapHeight,
        InfoField::Ascender,
        InfoField::ItalicAngle,
        InfoField::OpenTypeHeadLowestRecPPEM,
        InfoField::OpenTypeHheaAscender,
        InfoField::OpenTypeHheaDescender,
        InfoField::OpenTypeHheaLineGap,
        InfoField::OpenTypeHheaCaretSlopeRise,
        InfoField::OpenTypeHheaCaretSlopeRun,
        InfoField::OpenTypeHheaCaretOffset,
        InfoField::OpenTypeOS2WidthClass,
        InfoField::OpenTypeOS2WeightClass,
        InfoField::OpenTypeOS2TypoAscender,
        InfoField::OpenTypeOS2TypoDescender,
        InfoField::OpenTypeOS2TypoLineGap,
        InfoField::OpenTypeOS2WinAscent,
        InfoField::OpenTypeOS2WinDescent,
        InfoField::OpenTypeOS2SubscriptXSize,
        InfoField::OpenTypeOS2SubscriptYSize,
        InfoField::OpenTypeOS2SubscriptXOffset,
        InfoField::OpenTypeOS2SubscriptYOffset,
        InfoField::OpenTypeOS2SuperscriptXSize,
        InfoField::OpenTypeOS2SuperscriptYSize,
        InfoField::OpenTypeOS2SuperscriptXOffset,
        InfoField::OpenTypeOS2SuperscriptYOffset,
        InfoField::OpenTypeOS2StrikeoutSize,
        InfoField::OpenTypeOS2StrikeoutPosition,
        InfoField::OpenTypeVheaVertTypoAscender,
        InfoField::OpenTypeVheaVertTypoDescender,
        InfoField::OpenTypeVheaVertTypoLineGap,
        InfoField::OpenTypeVheaCaretSlopeRise,
        InfoField::OpenTypeVheaCaretSlopeRun,
        InfoField::OpenTypeVheaCaretOffset,
        InfoField::PostscriptSlantAngle,
        InfoField::PostscriptUnderlineThickness,
        InfoField::PostscriptUnderlinePosition,
        InfoField::PostscriptBlueValues,
        InfoField::PostscriptOtherBlues,
        InfoField::PostscriptFamilyBlues,
        InfoField::PostscriptFamilyOtherBlues,
        InfoField::PostscriptStemSnapH,
        InfoField::PostscriptStemSnapV,
        InfoField::PostscriptBlueFuzz,
        InfoField::PostscriptBlueShift,
        InfoField::PostscriptBlueScale,
        InfoField::PostscriptDefaultWidthX,
        InfoField::PostscriptNominalWidthX,
    ];

    /// The field's name in a UFO fontinfo.plist, its formatter and its axis
    fn schema(&self) -> (&'static str, Formatter, Axis) {
        use Axis::*;
        use Formatter::*;
        match self {
            InfoField::UnitsPerEm => ("unitsPerEm", NonNegativeNumber, Y),
            InfoField::Descender => ("descender", Number, Y),
            InfoField::XHeight => ("xHeight", Number, Y),
            InfoField::CapHeight => ("capHeight", Number, Y),
            InfoField::Ascender => ("ascender", Number, Y),
            InfoField::ItalicAngle => ("italicAngle", Number, Angle),
            InfoField::OpenTypeHeadLowestRecPPEM => {
                ("openTypeHeadLowestRecPPEM", NonNegativeInteger, Y)
            }
            InfoField::OpenTypeHheaAscender => ("openTypeHheaAscender", Integer, Y),
            InfoField::OpenTypeHheaDescender => ("openTypeHheaDescender", Integer, Y),
            InfoField::OpenTypeHheaLineGap => ("openTypeHheaLineGap", Integer, Y),
            InfoField::OpenTypeHheaCaretSlopeRise => ("openTypeHheaCaretSlopeRise", Integer, Y),
            InfoField::OpenTypeHheaCaretSlopeRun => ("openTypeHheaCaretSlopeRun", Integer, Y),
            InfoField::OpenTypeHheaCaretOffset => ("openTypeHheaCaretOffset", Integer, Y),
            InfoField::OpenTypeOS2WidthClass => ("openTypeOS2WidthClass", WidthClass, X),
            InfoField::OpenTypeOS2WeightClass => ("openTypeOS2WeightClass", WeightClass, X),
            InfoField::OpenTypeOS2TypoAscender => ("openTypeOS2TypoAscender", Integer, Y),
            InfoField::OpenTypeOS2TypoDescender => ("openTypeOS2TypoDescender", Integer, Y),
            InfoField::OpenTypeOS2TypoLineGap => ("openTypeOS2TypoLineGap", Integer, Y),
            InfoField::OpenTypeOS2WinAscent => ("openTypeOS2WinAscent", NonNegativeInteger, Y),
            InfoField::OpenTypeOS2WinDescent => ("openTypeOS2WinDescent", NonNegativeInteger, Y),
            InfoField::OpenTypeOS2SubscriptXSize => ("openTypeOS2SubscriptXSize", Integer, X),
            InfoField::OpenTypeOS2SubscriptYSize => ("openTypeOS2SubscriptYSize", Integer, Y),
            InfoField::OpenTypeOS2SubscriptXOffset => ("openTypeOS2SubscriptXOffset", Integer, X),
            InfoField::OpenTypeOS2SubscriptYOffset => ("openTypeOS2SubscriptYOffset", Integer, Y),
            InfoField::OpenTypeOS2SuperscriptXSize => ("openTypeOS2SuperscriptXSize", Integer, X),
            InfoField::OpenTypeOS2SuperscriptYSize => ("openTypeOS2SuperscriptYSize", Integer, Y),
            InfoField::OpenTypeOS2SuperscriptXOffset => {
                ("openTypeOS2SuperscriptXOffset", Integer, X)
            }
            InfoField::OpenTypeOS2SuperscriptYOffset => {
                ("openTypeOS2SuperscriptYOffset", Integer, Y)
            }
            InfoField::OpenTypeOS2StrikeoutSize => ("openTypeOS2StrikeoutSize", Integer, Y),
            InfoField::OpenTypeOS2StrikeoutPosition => {
                ("openTypeOS2StrikeoutPosition", Integer, Y)
            }
            InfoField::OpenTypeVheaVertTypoAscender => {
                ("openTypeVheaVertTypoAscender", Integer, Y)
            }
            InfoField::OpenTypeVheaVertTypoDescender => {
                ("openTypeVheaVertTypoDescender", Integer, Y)
            }
            InfoField::OpenTypeVheaVertTypoLineGap => ("openTypeVheaVertTypoLineGap", Integer, Y),
            InfoField::OpenTypeVheaCaretSlopeRise => ("openTypeVheaCaretSlopeRise", Integer, Y),
            InfoField::OpenTypeVheaCaretSlopeRun => ("openTypeVheaCaretSlopeRun", Integer, Y),
            InfoField::OpenTypeVheaCaretOffset => ("openTypeVheaCaretOffset", Integer, Y),
            InfoField::PostscriptSlantAngle => ("postscriptSlantAngle", Number, Angle),
            InfoField::PostscriptUnderlineThickness => {
                ("postscriptUnderlineThickness", Number, Y)
            }
            InfoField::PostscriptUnderlinePosition => ("postscriptUnderlinePosition", Number, Y),
            InfoField::PostscriptBlueValues => ("postscriptBlueValues", NumberList, Y),
            InfoField::PostscriptOtherBlues => ("postscriptOtherBlues", NumberList, Y),
            InfoField::PostscriptFamilyBlues => ("postscriptFamilyBlues", NumberList, Y),
            InfoField::PostscriptFamilyOtherBlues => ("postscriptFamilyOtherBlues", NumberList, Y),
            InfoField::PostscriptStemSnapH => ("postscriptStemSnapH", NumberList, X),
            InfoField::PostscriptStemSnapV => ("postscriptStemSnapV", NumberList, Y),
            InfoField::PostscriptBlueFuzz => ("postscriptBlueFuzz", Number, Y),
            InfoField::PostscriptBlueShift => ("postscriptBlueShift", Number, Y),
            InfoField::PostscriptBlueScale => ("postscriptBlueScale", Float, Y),
            InfoField::PostscriptDefaultWidthX => ("postscriptDefaultWidthX", Number, X),
            InfoField::PostscriptNominalWidthX => ("postscriptNominalWidthX", Number, X),
        }
    }

    /// The field's name in a UFO fontinfo.plist
    pub fn as_str(&self) -> &'static str {
        self.schema().0
    }

    pub fn formatter(&self) -> Formatter {
        self.schema().1
    }

    pub fn axis(&self) -> Axis {
        self.schema().2
    }

    /// Fields which are never rounded
    fn exempt_from_rounding(&self) -> bool {
        matches!(self, InfoField::PostscriptBlueScale | InfoField::ItalicAngle)
    }
}

impl FromStr for InfoField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InfoField::ALL
            .iter()
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown font info field: {}", s))
    }
}

/// The value of a font info field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    Number(f64),
    List(Vec<f64>),
}

impl From<f64> for InfoValue {
    fn from(v: f64) -> Self {
        InfoValue::Number(v)
    }
}

impl From<Vec<f64>> for InfoValue {
    fn from(v: Vec<f64>) -> Self {
        InfoValue::List(v)
    }
}

impl From<FormattedValue> for InfoValue {
    fn from(v: FormattedValue) -> Self {
        match v {
            FormattedValue::Number(n) => InfoValue::Number(n.as_f64()),
            FormattedValue::List(l) => InfoValue::List(l.iter().map(Number::as_f64).collect()),
        }
    }
}

impl InfoValue {
    fn map(&self, f: impl Fn(f64) -> f64) -> InfoValue {
        match self {
            InfoValue::Number(v) => InfoValue::Number(f(*v)),
            InfoValue::List(l) => InfoValue::List(l.iter().map(|v| f(*v)).collect()),
        }
    }

    fn try_map(
        &self,
        f: impl Fn(f64) -> Result<f64, FontMathError>,
    ) -> Result<InfoValue, FontMathError> {
        Ok(match self {
            InfoValue::Number(v) => InfoValue::Number(f(*v)?),
            InfoValue::List(l) => {
                InfoValue::List(l.iter().map(|v| f(*v)).collect::<Result<_, _>>()?)
            }
        })
    }
}

/// Read access to font info which can be turned into a [`MathInfo`].
pub trait InfoSource {
    /// The value of a field, or `None` if it is not set
    fn info_value(&self, field: InfoField) -> Option<InfoValue>;
    fn guidelines(&self) -> Vec<Guideline>;
}

/// Write access to font info which a [`MathInfo`] can be extracted into.
pub trait InfoTarget {
    fn set_info_value(&mut self, field: InfoField, value: FormattedValue);
    fn set_postscript_weight_name(&mut self, name: Option<String>);
    fn set_guidelines(&mut self, guidelines: Vec<Guideline>);
}

/// Plain font info data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoData {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<InfoField, InfoValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postscript_weight_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guidelines: Vec<Guideline>,
}

impl InfoSource for InfoData {
    fn info_value(&self, field: InfoField) -> Option<InfoValue> {
        self.values.get(&field).cloned()
    }

    fn guidelines(&self) -> Vec<Guideline> {
        self.guidelines.clone()
    }
}

impl InfoTarget for InfoData {
    fn set_info_value(&mut self, field: InfoField, value: FormattedValue) {
        self.values.insert(field, value.into());
    }

    fn set_postscript_weight_name(&mut self, name: Option<String>) {
        self.postscript_weight_name = name;
    }

    fn set_guidelines(&mut self, guidelines: Vec<Guideline>) {
        self.guidelines = guidelines;
    }
}

const WEIGHT_NAMES: [&str; 9] = [
    "Thin",
    "Extra-light",
    "Light",
    "Normal",
    "Medium",
    "Semi-bold",
    "Bold",
    "Extra-bold",
    "Black",
];

/// The PostScript weight name closest to an OS/2 weight class, or `None`
/// if the weight class is not finite.
pub fn postscript_weight_name(weight_class: f64) -> Option<&'static str> {
    if !weight_class.is_finite() {
        return None;
    }
    let hundreds = (weight_class / 100.0).round().clamp(1.0, 9.0) as usize;
    WEIGHT_NAMES.get(hundreds - 1).copied()
}

/// A snapshot of font info on which arithmetic can be performed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MathInfo {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<InfoField, InfoValue>,
    /// Derived from the OS/2 weight class by every operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postscript_weight_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guidelines: Vec<MathGuideline>,
    #[serde(skip)]
    rounding: Rounding,
}

impl PartialEq for MathInfo {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
            && self.postscript_weight_name == other.postscript_weight_name
            && self.guidelines == other.guidelines
    }
}

impl MathInfo {
    /// Take a snapshot of font info.
    pub fn from_source<S: InfoSource + ?Sized>(source: &S) -> Self {
        let values = InfoField::ALL
            .iter()
            .filter_map(|field| source.info_value(*field).map(|v| (*field, v)))
            .collect();
        MathInfo {
            values,
            postscript_weight_name: None,
            guidelines: source.guidelines().iter().map(Guideline::expand).collect(),
            rounding: Rounding::default(),
        }
    }

    /// Use a different rounding policy for [`MathInfo::round`] and extraction
    /// on this snapshot and everything derived from it.
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    pub fn get(&self, field: InfoField) -> Option<&InfoValue> {
        self.values.get(&field)
    }

    pub fn set(&mut self, field: InfoField, value: impl Into<InfoValue>) {
        self.values.insert(field, value.into());
    }

    pub fn remove(&mut self, field: InfoField) -> Option<InfoValue> {
        self.values.shift_remove(&field)
    }

    fn with_values(&self, values: IndexMap<InfoField, InfoValue>) -> MathInfo {
        let mut result = MathInfo {
            values,
            postscript_weight_name: None,
            guidelines: vec![],
            rounding: self.rounding,
        };
        result.update_weight_name();
        result
    }

    fn update_weight_name(&mut self) {
        self.postscript_weight_name = match self.values.get(&InfoField::OpenTypeOS2WeightClass) {
            Some(InfoValue::Number(weight_class)) => {
                postscript_weight_name(*weight_class).map(str::to_string)
            }
            _ => None,
        };
    }

    /// Add or subtract another info snapshot.
    ///
    /// Fields set on only one side are passed through. List fields whose
    /// lengths differ are dropped.
    pub fn combine(&self, other: &MathInfo, op: MathOp) -> MathInfo {
        let mut values = IndexMap::new();
        for field in InfoField::ALL {
            let value = match (self.values.get(&field), other.values.get(&field)) {
                (Some(InfoValue::Number(a)), Some(InfoValue::Number(b))) => {
                    Some(InfoValue::Number(op.apply(*a, *b)))
                }
                (Some(InfoValue::List(a)), Some(InfoValue::List(b))) if a.len() == b.len() => {
                    Some(InfoValue::List(
                        a.iter().zip(b).map(|(a, b)| op.apply(*a, *b)).collect(),
                    ))
                }
                (Some(_), Some(_)) => {
                    log::warn!("Dropping {}: values are not compatible", field.as_str());
                    None
                }
                (Some(a), None) => Some(a.clone()),
                (None, Some(b)) => Some(b.clone()),
                (None, None) => None,
            };
            if let Some(value) = value {
                values.insert(field, value);
            }
        }
        let mut result = self.with_values(values);
        if !self.guidelines.is_empty() {
            result.guidelines = combine_guidelines(&self.guidelines, &other.guidelines, op);
        }
        result
    }

    pub fn add(&self, other: &MathInfo) -> MathInfo {
        self.combine(other, MathOp::Add)
    }

    pub fn sub(&self, other: &MathInfo) -> MathInfo {
        self.combine(other, MathOp::Sub)
    }

    /// Multiply or divide by a factor. Each field uses the part of the factor
    /// for its axis; angles are scaled as directions.
    pub fn scale(&self, factor: impl Into<Factor>, op: FactorOp) -> Result<MathInfo, FontMathError> {
        let factor = factor.into();
        let values = self
            .values
            .iter()
            .map(|(field, value)| {
                let scaled = match field.axis() {
                    Axis::X => value.try_map(|v| op.apply(v, factor.x))?,
                    Axis::Y => value.try_map(|v| op.apply(v, factor.y))?,
                    Axis::Angle => value.try_map(|v| factor_angle(v, factor, op))?,
                };
                Ok((*field, scaled))
            })
            .collect::<Result<IndexMap<_, _>, FontMathError>>()?;
        let mut result = self.with_values(values);
        if !self.guidelines.is_empty() {
            result.guidelines = scale_guidelines(&self.guidelines, factor, op)?;
        }
        Ok(result)
    }

    pub fn mul(&self, factor: impl Into<Factor>) -> Result<MathInfo, FontMathError> {
        self.scale(factor, FactorOp::Mul)
    }

    pub fn div(&self, factor: impl Into<Factor>) -> Result<MathInfo, FontMathError> {
        self.scale(factor, FactorOp::Div)
    }

    /// Round all fields, to integers if `digits` is `None`.
    ///
    /// The italic angle and blue scale are left exact; other angles are
    /// always rounded to integers.
    pub fn round(&self, digits: Option<u32>) -> MathInfo {
        let rounding = self.rounding;
        let values = self
            .values
            .iter()
            .map(|(field, value)| {
                let rounded = if field.exempt_from_rounding() {
                    value.clone()
                } else if field.axis() == Axis::Angle {
                    value.map(rounding.integer)
                } else {
                    value.map(|v| rounding.round(v, digits))
                };
                (*field, rounded)
            })
            .collect();
        let mut result = self.with_values(values);
        result.guidelines = round_guidelines(&self.guidelines, &rounding, digits);
        result
    }

    /// Write every set field into `target`, formatted as the field requires.
    pub fn extract_info<T: InfoTarget + ?Sized>(&self, target: &mut T) {
        for (field, value) in &self.values {
            target.set_info_value(*field, field.formatter().format(value, &self.rounding));
        }
        if self.postscript_weight_name.is_some() {
            target.set_postscript_weight_name(self.postscript_weight_name.clone());
        }
        target.set_guidelines(self.guidelines.iter().map(MathGuideline::compress).collect());
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn test_data() -> InfoData {
        let mut data = InfoData::default();
        let numbers = [
            (InfoField::UnitsPerEm, 1000.0),
            (InfoField::Descender, -200.0),
            (InfoField::XHeight, 400.0),
            (InfoField::CapHeight, 650.0),
            (InfoField::Ascender, 700.0),
            (InfoField::ItalicAngle, 0.0),
            (InfoField::OpenTypeHeadLowestRecPPEM, 5.0),
            (InfoField::OpenTypeOS2WidthClass, 5.0),
            (InfoField::OpenTypeOS2WeightClass, 500.0),
            (InfoField::OpenTypeOS2WinDescent, -200.0),
            (InfoField::OpenTypeOS2SubscriptXSize, 300.0),
            (InfoField::OpenTypeOS2SubscriptYSize, 300.0),
            (InfoField::PostscriptSlantAngle, 0.0),
            (InfoField::PostscriptBlueScale, 0.039625),
            (InfoField::PostscriptDefaultWidthX, 400.0),
        ];
        for (field, value) in numbers {
            data.values.insert(field, InfoValue::Number(value));
        }
        data.values.insert(
            InfoField::PostscriptBlueValues,
            vec![-10.0, 0.0, 400.0, 410.0, 650.0, 660.0, 700.0, 710.0].into(),
        );
        data.values
            .insert(InfoField::PostscriptStemSnapH, vec![80.0, 90.0].into());
        data
    }

    #[test]
    fn test_add() {
        let info1 = MathInfo::from_source(&test_data());
        let info2 = MathInfo::from_source(&test_data());
        let sum = info1.add(&info2);
        for (field, value) in &test_data().values {
            let expected = value.map(|v| v + v);
            assert_eq!(sum.get(*field), Some(&expected), "{}", field.as_str());
        }
        assert_eq!(sum.postscript_weight_name.as_deref(), Some("Black"));
    }

    #[test]
    fn test_add_passes_through_one_sided_fields() {
        let mut subset = InfoData::default();
        subset
            .values
            .insert(InfoField::UnitsPerEm, InfoValue::Number(1000.0));
        subset.values.insert(
            InfoField::PostscriptBlueValues,
            vec![-10.0, 0.0, 400.0, 410.0, 650.0].into(),
        );
        let full = MathInfo::from_source(&test_data());
        let partial = MathInfo::from_source(&subset);
        let sum = partial.add(&full);
        assert_eq!(sum.get(InfoField::UnitsPerEm), Some(&InfoValue::Number(2000.0)));
        assert_eq!(sum.get(InfoField::XHeight), Some(&InfoValue::Number(400.0)));
        // Mismatched list lengths drop the field
        assert_eq!(sum.get(InfoField::PostscriptBlueValues), None);
    }

    #[test]
    fn test_scale_uses_field_axis() {
        let info = MathInfo::from_source(&test_data());
        let scaled = info.mul((2.0, 3.0)).unwrap();
        assert_eq!(
            scaled.get(InfoField::OpenTypeOS2SubscriptXSize),
            Some(&InfoValue::Number(600.0))
        );
        assert_eq!(
            scaled.get(InfoField::OpenTypeOS2SubscriptYSize),
            Some(&InfoValue::Number(900.0))
        );
        assert_eq!(
            scaled.get(InfoField::PostscriptStemSnapH),
            Some(&InfoValue::List(vec![160.0, 180.0]))
        );
        assert_eq!(
            scaled.get(InfoField::ItalicAngle),
            Some(&InfoValue::Number(0.0))
        );
        assert_eq!(scaled.postscript_weight_name.as_deref(), Some("Black"));
        assert_eq!(info.div(0.0), Err(FontMathError::DivisionByZero));
    }

    #[test]
    fn test_round() {
        let mut data = InfoData::default();
        for (field, value) in [
            (InfoField::Ascender, 699.99),
            (InfoField::Descender, -199.99),
            (InfoField::XHeight, 399.66),
            (InfoField::ItalicAngle, -9.4),
            (InfoField::PostscriptSlantAngle, -9.6),
            (InfoField::PostscriptBlueScale, 0.137),
        ] {
            data.values.insert(field, InfoValue::Number(value));
        }
        data.values
            .insert(InfoField::PostscriptStemSnapH, vec![80.1, 90.2].into());
        data.guidelines = vec![Guideline::horizontal(100.99).with_name("bar")];
        let info = MathInfo::from_source(&data).round(None);
        assert_eq!(info.get(InfoField::Ascender), Some(&InfoValue::Number(700.0)));
        assert_eq!(info.get(InfoField::Descender), Some(&InfoValue::Number(-200.0)));
        assert_eq!(info.get(InfoField::XHeight), Some(&InfoValue::Number(400.0)));
        assert_eq!(info.get(InfoField::ItalicAngle), Some(&InfoValue::Number(-9.4)));
        assert_eq!(
            info.get(InfoField::PostscriptSlantAngle),
            Some(&InfoValue::Number(-10.0))
        );
        assert_eq!(
            info.get(InfoField::PostscriptBlueScale),
            Some(&InfoValue::Number(0.137))
        );
        assert_eq!(
            info.get(InfoField::PostscriptStemSnapH),
            Some(&InfoValue::List(vec![80.0, 90.0]))
        );
        assert_eq!(info.guidelines[0].y, 101.0);
        assert_eq!(info.postscript_weight_name, None);
    }

    #[rstest]
    #[case(500.0, "Medium")]
    #[case(549.0, "Medium")]
    #[case(550.0, "Semi-bold")]
    #[case(450.0, "Medium")]
    #[case(449.0, "Normal")]
    #[case(0.0, "Thin")]
    #[case(-1000.0, "Thin")]
    #[case(1000.0, "Black")]
    fn test_weight_name(#[case] weight_class: f64, #[case] expected: &str) {
        assert_eq!(postscript_weight_name(weight_class), Some(expected));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_weight_name_of_non_finite_weight_class(#[case] weight_class: f64) {
        assert_eq!(postscript_weight_name(weight_class), None);
    }

    #[test]
    fn test_infinite_weight_class_minus_itself() {
        let mut data = InfoData::default();
        data.values
            .insert(InfoField::OpenTypeOS2WeightClass, f64::INFINITY.into());
        let info = MathInfo::from_source(&data);
        let difference = info.sub(&info);
        assert!(matches!(
            difference.get(InfoField::OpenTypeOS2WeightClass),
            Some(InfoValue::Number(w)) if w.is_nan()
        ));
        assert_eq!(difference.postscript_weight_name, None);
        assert_eq!(info.add(&info).postscript_weight_name, None);
    }

    #[rstest]
    #[case(Formatter::WidthClass, -2.0, Number::Integer(1))]
    #[case(Formatter::WidthClass, 5.4, Number::Integer(5))]
    #[case(Formatter::WidthClass, 9.6, Number::Integer(9))]
    #[case(Formatter::WidthClass, 12.0, Number::Integer(9))]
    #[case(Formatter::WeightClass, -20.0, Number::Integer(0))]
    #[case(Formatter::WeightClass, 90.6, Number::Integer(91))]
    #[case(Formatter::NonNegativeNumber, -10.0, Number::Integer(0))]
    #[case(Formatter::NonNegativeNumber, 10.5, Number::Float(10.5))]
    #[case(Formatter::Number, 3.0, Number::Integer(3))]
    #[case(Formatter::Float, 3.0, Number::Float(3.0))]
    fn test_formatters(#[case] formatter: Formatter, #[case] value: f64, #[case] expected: Number) {
        assert_eq!(
            formatter.format(&InfoValue::Number(value), &Rounding::default()),
            FormattedValue::Number(expected)
        );
    }

    #[test]
    fn test_integer_list_formatter() {
        assert_eq!(
            Formatter::IntegerList.format(
                &InfoValue::List(vec![0.9, 40.3, 16.0001]),
                &Rounding::default()
            ),
            FormattedValue::List(vec![
                Number::Integer(1),
                Number::Integer(40),
                Number::Integer(16)
            ])
        );
    }

    fn guideline_data(guidelines: Vec<Guideline>) -> InfoData {
        InfoData {
            guidelines,
            ..test_data()
        }
    }

    #[test]
    fn test_guidelines_are_paired_in_add_and_sub() {
        let info1 = MathInfo::from_source(&guideline_data(vec![
            Guideline::horizontal(100.0).with_name("baseline"),
            Guideline::vertical(50.0).with_name("stem"),
        ]));
        let info2 = MathInfo::from_source(&guideline_data(vec![
            Guideline::horizontal(120.0).with_name("baseline")
        ]));
        let sum = info1.add(&info2);
        assert_eq!(sum.guidelines.len(), 1);
        assert_eq!(sum.guidelines[0].name.as_deref(), Some("baseline"));
        assert_eq!((sum.guidelines[0].x, sum.guidelines[0].y), (0.0, 220.0));
        let difference = info1.sub(&info2);
        assert_eq!(difference.guidelines.len(), 1);
        assert_eq!(difference.guidelines[0].y, -20.0);
        // Nothing on the left means nothing in the result
        let empty = MathInfo::from_source(&test_data());
        assert!(empty.add(&info2).guidelines.is_empty());
    }

    #[test]
    fn test_guideline_angles_scale_as_directions() {
        let info = MathInfo::from_source(&guideline_data(vec![Guideline::angled(
            10.0, 20.0, 45.0,
        )]));
        let scaled = info.mul((2.0, 1.0)).unwrap();
        let guideline = &scaled.guidelines[0];
        assert_eq!((guideline.x, guideline.y), (20.0, 20.0));
        assert!((guideline.angle - 1.0f64.atan2(2.0).to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn test_extract_info_writes_compressed_guidelines() {
        let info = MathInfo::from_source(&guideline_data(vec![
            Guideline::horizontal(100.0).with_name("baseline")
        ]));
        let mut target = InfoData::default();
        info.mul(2.0).unwrap().extract_info(&mut target);
        assert_eq!(
            target.guidelines,
            vec![Guideline::horizontal(200.0).with_name("baseline")]
        );
    }

    #[test]
    fn test_extract_info() {
        let info = MathInfo::from_source(&test_data()).mul(2.5).unwrap();
        let mut target = InfoData::default();
        info.extract_info(&mut target);
        assert_eq!(
            target.values.get(&InfoField::OpenTypeHeadLowestRecPPEM),
            Some(&InfoValue::Number(13.0))
        );
        assert_eq!(
            target.values.get(&InfoField::OpenTypeOS2WidthClass),
            Some(&InfoValue::Number(9.0))
        );
        assert_eq!(
            target.values.get(&InfoField::OpenTypeOS2WinDescent),
            Some(&InfoValue::Number(0.0))
        );
        assert_eq!(
            target.values.get(&InfoField::PostscriptBlueScale),
            Some(&InfoValue::Number(0.039625 * 2.5))
        );
        assert_eq!(target.postscript_weight_name.as_deref(), Some("Black"));
    }

    #[test]
    fn test_field_names() {
        for field in InfoField::ALL {
            assert_eq!(field.as_str().parse::<InfoField>(), Ok(field));
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }
}
