//! Kerning math.
//!
//! A kerning table maps pairs of sides to values, where each side is either a
//! glyph name or the name of a kerning group. Groups are recognised by their
//! name prefix, which differs between the first and second side (see
//! [`GroupPrefixes`]). Looking up a pair of glyphs falls back from the exact
//! pair to pairs involving the glyphs' groups.
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{
    functions::{div, Factor, FactorOp, MathOp, Rounding},
    FontMathError,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A pair of kerning sides
pub type KerningPair = (SmolStr, SmolStr);
/// A kerning table
pub type Kerning = IndexMap<KerningPair, f64>;
/// Group definitions, as group name to member glyph names
pub type Groups = IndexMap<SmolStr, Vec<SmolStr>>;

/// Values this close to an integer are snapped to it by cleanup
const INTEGER_TOLERANCE: f64 = 1e-9;

/// Read access to kerning and groups which can be turned into a
/// [`MathKerning`].
pub trait KerningSource {
    fn kerning(&self) -> &Kerning;
    fn groups(&self) -> &Groups;
}

/// Write access to kerning and groups which a [`MathKerning`] can be
/// extracted into.
pub trait KerningTarget {
    fn clear_kerning(&mut self);
    /// Add the given pairs, replacing existing values
    fn update_kerning(&mut self, kerning: Kerning);
    /// Add the given groups, replacing existing groups of the same name
    fn update_groups(&mut self, groups: Groups);
}

/// Something which finds pairs in a kerning table that conflict with each
/// other.
pub trait KerningValidator {
    /// Returns conflicting pairs. When a conflict is resolved, the second
    /// pair of each is removed and the first takes the mean of both values.
    fn find_conflicts(&self, kerning: &MathKerning) -> Vec<(KerningPair, KerningPair)>;
}

/// Plain kerning and group data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KerningData {
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        serialize_with = "crate::serde_helpers::kerning_map",
        deserialize_with = "crate::serde_helpers::kerning_unmap"
    )]
    pub kerning: Kerning,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub groups: Groups,
}

impl KerningSource for KerningData {
    fn kerning(&self) -> &Kerning {
        &self.kerning
    }

    fn groups(&self) -> &Groups {
        &self.groups
    }
}

impl KerningTarget for KerningData {
    fn clear_kerning(&mut self) {
        self.kerning.clear();
    }

    fn update_kerning(&mut self, kerning: Kerning) {
        self.kerning.extend(kerning);
    }

    fn update_groups(&mut self, groups: Groups) {
        self.groups.extend(groups);
    }
}

/// The name prefixes which mark a kerning side as a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPrefixes {
    pub side1: SmolStr,
    pub side2: SmolStr,
}

impl Default for GroupPrefixes {
    fn default() -> Self {
        GroupPrefixes {
            side1: "public.kern1.".into(),
            side2: "public.kern2.".into(),
        }
    }
}

impl GroupPrefixes {
    /// Old-style class kerning, where every group starts with `@`
    pub fn legacy() -> Self {
        GroupPrefixes {
            side1: "@".into(),
            side2: "@".into(),
        }
    }

    pub fn is_side1_group(&self, name: &str) -> bool {
        name.starts_with(self.side1.as_str())
    }

    pub fn is_side2_group(&self, name: &str) -> bool {
        name.starts_with(self.side2.as_str())
    }
}

/// The role played by one side of a kerning pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    /// A glyph with no group kerning behind it
    Glyph,
    /// A group
    Group,
    /// A glyph overriding the kerning of one of its groups
    Exception,
}

/// How specific a kerning pair is. Lookups prefer more specific pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairTier {
    GlyphGlyph,
    HalfGroup,
    GroupGroup,
}

fn pair_key(left: &str, right: &str) -> KerningPair {
    (left.into(), right.into())
}

/// A snapshot of a kerning table and its groups on which arithmetic can be
/// performed.
#[derive(Debug, Clone, Default)]
pub struct MathKerning {
    kerning: Kerning,
    groups: Groups,
    prefixes: GroupPrefixes,
    side1_groups: HashMap<SmolStr, Vec<SmolStr>>,
    side2_groups: HashMap<SmolStr, Vec<SmolStr>>,
    rounding: Rounding,
}

impl PartialEq for MathKerning {
    fn eq(&self, other: &Self) -> bool {
        self.kerning == other.kerning
            && self.groups == other.groups
            && self.prefixes == other.prefixes
    }
}

impl MathKerning {
    /// Iteration bound used by [`MathKerning::extract_kerning`]
    pub const DEFAULT_MAX_CONFLICT_ITERATIONS: usize = 32;

    pub fn new(kerning: Kerning, groups: Groups) -> Self {
        let mut math_kerning = MathKerning {
            kerning,
            ..Default::default()
        };
        math_kerning.update_groups(groups);
        math_kerning
    }

    /// Take a snapshot of some kerning and groups.
    pub fn from_source<S: KerningSource + ?Sized>(source: &S) -> Self {
        Self::new(source.kerning().clone(), source.groups().clone())
    }

    /// Recognise groups by different name prefixes.
    pub fn with_prefixes(mut self, prefixes: GroupPrefixes) -> Self {
        self.prefixes = prefixes;
        self.rebuild_group_maps();
        self
    }

    /// Use a different rounding policy for [`MathKerning::round`] on this
    /// snapshot and everything derived from it.
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn prefixes(&self) -> &GroupPrefixes {
        &self.prefixes
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Replace the kerning table
    pub fn update(&mut self, kerning: Kerning) {
        self.kerning = kerning;
    }

    /// Replace the groups and recompute which groups each glyph belongs to
    pub fn update_groups(&mut self, groups: Groups) {
        self.groups = groups;
        self.rebuild_group_maps();
    }

    fn rebuild_group_maps(&mut self) {
        self.side1_groups.clear();
        self.side2_groups.clear();
        for (group_name, glyphs) in &self.groups {
            if self.prefixes.is_side1_group(group_name) {
                add_membership(&mut self.side1_groups, group_name, glyphs);
            }
            if self.prefixes.is_side2_group(group_name) {
                add_membership(&mut self.side2_groups, group_name, glyphs);
            }
        }
    }

    pub fn pairs(&self) -> &Kerning {
        &self.kerning
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.kerning.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kerning.is_empty()
    }

    pub fn contains(&self, pair: (&str, &str)) -> bool {
        self.kerning.contains_key(&pair_key(pair.0, pair.1))
    }

    /// The side itself followed by the groups it belongs to on that side
    fn candidates<'a>(&'a self, name: &'a str, first_side: bool) -> Vec<&'a str> {
        let map = if first_side {
            &self.side1_groups
        } else {
            &self.side2_groups
        };
        std::iter::once(name)
            .chain(map.get(name).into_iter().flatten().map(|g| g.as_str()))
            .collect()
    }

    /// The glyphs covered by one side of a pair
    fn members<'a>(&'a self, name: &'a str, first_side: bool) -> Vec<&'a str> {
        let is_group = if first_side {
            self.prefixes.is_side1_group(name)
        } else {
            self.prefixes.is_side2_group(name)
        };
        match self.groups.get(name) {
            Some(glyphs) if is_group => glyphs.iter().map(|g| g.as_str()).collect(),
            _ => vec![name],
        }
    }

    pub fn pair_tier(&self, pair: (&str, &str)) -> PairTier {
        match (
            self.prefixes.is_side1_group(pair.0),
            self.prefixes.is_side2_group(pair.1),
        ) {
            (false, false) => PairTier::GlyphGlyph,
            (true, true) => PairTier::GroupGroup,
            _ => PairTier::HalfGroup,
        }
    }

    /// The value that applies to a pair, or `0.0` if none does.
    ///
    /// An exact entry wins. Otherwise every combination of each side and its
    /// groups is tried, and the most specific entry found applies; entries
    /// equally specific are decided by the alphabetically first pair.
    pub fn lookup(&self, pair: (&str, &str)) -> f64 {
        let (left, right) = pair;
        if let Some(value) = self.kerning.get(&pair_key(left, right)) {
            return *value;
        }
        let mut hits: Vec<(PairTier, KerningPair, f64)> = vec![];
        for l in self.candidates(left, true) {
            for r in self.candidates(right, false) {
                let key = pair_key(l, r);
                if let Some(value) = self.kerning.get(&key) {
                    hits.push((self.pair_tier((l, r)), key, *value));
                }
            }
        }
        hits.into_iter()
            .min_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)))
            .map(|(_, _, value)| value)
            .unwrap_or(0.0)
    }

    /// Like [`MathKerning::lookup`], but returns `default` where the value
    /// would be zero.
    pub fn get(&self, pair: (&str, &str), default: f64) -> f64 {
        let value = self.lookup(pair);
        if value == 0.0 {
            default
        } else {
            value
        }
    }

    /// Work out the role each side of a pair plays.
    ///
    /// A glyph side is an exception when the table also has an entry for
    /// the same pair with that glyph replaced by one of its groups.
    pub fn pair_type(&self, pair: (&str, &str)) -> (PairSide, PairSide) {
        let (left, right) = pair;
        let mut left_type = if self.prefixes.is_side1_group(left) {
            PairSide::Group
        } else {
            PairSide::Glyph
        };
        let mut right_type = if self.prefixes.is_side2_group(right) {
            PairSide::Group
        } else {
            PairSide::Glyph
        };
        if !self.contains(pair) {
            return (left_type, right_type);
        }
        let potential_left = if left_type == PairSide::Glyph {
            self.candidates(left, true)
        } else {
            vec![left]
        };
        let potential_right = if right_type == PairSide::Glyph {
            self.candidates(right, false)
        } else {
            vec![right]
        };
        for &l in &potential_left {
            for &r in &potential_right {
                if !self.contains((l, r)) {
                    continue;
                }
                if left_type != PairSide::Group && self.prefixes.is_side1_group(l) {
                    left_type = PairSide::Exception;
                }
                if right_type != PairSide::Group && self.prefixes.is_side2_group(r) {
                    right_type = PairSide::Exception;
                }
            }
        }
        (left_type, right_type)
    }

    fn with_kerning(&self, kerning: Kerning) -> MathKerning {
        MathKerning {
            kerning,
            ..self.clone()
        }
    }

    /// Add or subtract another kerning table.
    ///
    /// Every pair in either table is looked up in both, so a pair present in
    /// only one table is combined with whatever the other table's groups
    /// give it. Groups are merged if they differ.
    pub fn combine(&self, other: &MathKerning, op: MathOp) -> MathKerning {
        let mut kerning = Kerning::new();
        for key in self.kerning.keys().chain(other.kerning.keys()) {
            if kerning.contains_key(key) {
                continue;
            }
            let pair = (key.0.as_str(), key.1.as_str());
            let value = op.apply(self.get(pair, 0.0), other.get(pair, 0.0));
            kerning.insert(key.clone(), value);
        }
        let groups = if self.groups == other.groups {
            self.groups.clone()
        } else {
            merge_groups(&self.groups, &other.groups)
        };
        let mut result = self.with_kerning(kerning);
        result.update_groups(groups);
        result.cleanup()
    }

    pub fn add(&self, other: &MathKerning) -> MathKerning {
        self.combine(other, MathOp::Add)
    }

    pub fn sub(&self, other: &MathKerning) -> MathKerning {
        self.combine(other, MathOp::Sub)
    }

    /// Multiply or divide every value by a factor.
    ///
    /// Kerning is horizontal, so only the x part of the factor is used.
    pub fn scale(
        &self,
        factor: impl Into<Factor>,
        op: FactorOp,
    ) -> Result<MathKerning, FontMathError> {
        let factor = factor.into();
        let kerning = self
            .kerning
            .iter()
            .map(|(key, value)| Ok((key.clone(), op.apply(*value, factor.x)?)))
            .collect::<Result<Kerning, FontMathError>>()?;
        Ok(self.with_kerning(kerning).cleanup())
    }

    pub fn mul(&self, factor: impl Into<Factor>) -> Result<MathKerning, FontMathError> {
        self.scale(factor, FactorOp::Mul)
    }

    pub fn div(&self, factor: impl Into<Factor>) -> Result<MathKerning, FontMathError> {
        self.scale(factor, FactorOp::Div)
    }

    /// Snap values which are integers to within floating point error, and
    /// drop zero pairs unless they are exceptions.
    ///
    /// Dropping a pair can turn another zero pair from an exception into a
    /// plain pair, so this repeats until nothing more is dropped.
    pub fn cleanup(&self) -> MathKerning {
        let mut result = self.clone();
        for value in result.kerning.values_mut() {
            let rounded = value.round();
            if (*value - rounded).abs() < INTEGER_TOLERANCE {
                *value = rounded;
            }
        }
        loop {
            let keys: Vec<KerningPair> = result.kerning.keys().cloned().collect();
            let mut dropped = false;
            for key in keys {
                if result.kerning.get(&key) != Some(&0.0) {
                    continue;
                }
                let (left_type, right_type) = result.pair_type((key.0.as_str(), key.1.as_str()));
                if left_type != PairSide::Exception && right_type != PairSide::Exception {
                    result.kerning.shift_remove(&key);
                    dropped = true;
                }
            }
            if !dropped {
                return result;
            }
        }
    }

    /// Round every value to the nearest multiple of `multiple`.
    pub fn round(&self, multiple: f64) -> Result<MathKerning, FontMathError> {
        let integer = self.rounding.integer;
        let kerning = self
            .kerning
            .iter()
            .map(|(key, value)| {
                Ok((
                    key.clone(),
                    integer(integer(div(*value, multiple)?) * multiple),
                ))
            })
            .collect::<Result<Kerning, FontMathError>>()?;
        Ok(self.with_kerning(kerning))
    }

    /// Add `value` to every pair
    pub fn add_to(&self, value: f64) -> MathKerning {
        self.with_kerning(
            self.kerning
                .iter()
                .map(|(key, v)| (key.clone(), v + value))
                .collect(),
        )
    }

    /// Repeatedly ask `validator` for conflicting pairs and merge them, until
    /// there are none left or `max_iterations` rounds have passed.
    pub fn resolve_conflicts(
        &self,
        validator: &dyn KerningValidator,
        max_iterations: usize,
    ) -> Result<MathKerning, FontMathError> {
        let mut result = self.clone();
        for iteration in 0..max_iterations {
            let conflicts = validator.find_conflicts(&result);
            if conflicts.is_empty() {
                if iteration > 0 {
                    log::info!("Resolved kerning conflicts in {} passes", iteration);
                }
                return Ok(result);
            }
            for (pair1, pair2) in conflicts {
                if pair1 == pair2 {
                    continue;
                }
                let (Some(value1), Some(value2)) = (
                    result.kerning.get(&pair1).copied(),
                    result.kerning.get(&pair2).copied(),
                ) else {
                    continue;
                };
                let mean = (value1 + value2) / 2.0;
                log::warn!(
                    "Kerning conflict: {}/{} ({}) against {}/{} ({}); keeping {}/{} at {}",
                    pair1.0,
                    pair1.1,
                    value1,
                    pair2.0,
                    pair2.1,
                    value2,
                    pair1.0,
                    pair1.1,
                    mean
                );
                result.kerning.shift_remove(&pair2);
                result.kerning.insert(pair1, mean);
            }
        }
        let remaining = validator.find_conflicts(&result).len();
        if remaining == 0 {
            log::info!("Resolved kerning conflicts in {} passes", max_iterations);
            return Ok(result);
        }
        Err(FontMathError::UnresolvedKerningConflicts {
            iterations: max_iterations,
            remaining,
        })
    }

    /// Resolve ambiguous pairs, then replace the target's kerning with this
    /// table and merge in the groups.
    pub fn extract_kerning<T: KerningTarget + ?Sized>(
        &self,
        target: &mut T,
    ) -> Result<(), FontMathError> {
        self.extract_kerning_with(
            target,
            &AmbiguousPairValidator,
            Self::DEFAULT_MAX_CONFLICT_ITERATIONS,
        )
    }

    pub fn extract_kerning_with<T: KerningTarget + ?Sized>(
        &self,
        target: &mut T,
        validator: &dyn KerningValidator,
        max_iterations: usize,
    ) -> Result<(), FontMathError> {
        let resolved = self.resolve_conflicts(validator, max_iterations)?;
        target.clear_kerning();
        target.update_kerning(resolved.kerning);
        target.update_groups(resolved.groups);
        Ok(())
    }

    /// The plain kerning and group data of this snapshot
    pub fn to_data(&self) -> KerningData {
        KerningData {
            kerning: self.kerning.clone(),
            groups: self.groups.clone(),
        }
    }
}

fn add_membership(
    map: &mut HashMap<SmolStr, Vec<SmolStr>>,
    group_name: &SmolStr,
    glyphs: &[SmolStr],
) {
    for glyph in glyphs {
        let groups = map.entry(glyph.clone()).or_default();
        if !groups.contains(group_name) {
            groups.push(group_name.clone());
        }
    }
}

fn merge_groups(groups1: &Groups, groups2: &Groups) -> Groups {
    let mut merged = groups1.clone();
    for (name, glyphs) in groups2 {
        let members = merged.entry(name.clone()).or_default();
        for glyph in glyphs {
            if !members.contains(glyph) {
                members.push(glyph.clone());
            }
        }
    }
    merged
}

/// Reports pairs which are equally specific, cover at least one glyph pair
/// in common, and disagree on the value.
///
/// A lookup of a glyph pair covered by both has no principled way to pick
/// between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbiguousPairValidator;

/// A table entry with the glyphs it covers on each side
struct Coverage<'a> {
    pair: &'a KerningPair,
    value: f64,
    tier: PairTier,
    left: Vec<&'a str>,
    right: HashSet<&'a str>,
}

impl KerningValidator for AmbiguousPairValidator {
    fn find_conflicts(&self, kerning: &MathKerning) -> Vec<(KerningPair, KerningPair)> {
        let entries: Vec<Coverage> = kerning
            .pairs()
            .iter()
            .map(|(pair, value)| Coverage {
                pair,
                value: *value,
                tier: kerning.pair_tier((pair.0.as_str(), pair.1.as_str())),
                left: kerning.members(&pair.0, true),
                right: kerning.members(&pair.1, false).into_iter().collect(),
            })
            .collect();
        // Only entries of the same tier sharing a first-side glyph can clash
        let mut by_left_glyph: HashMap<(PairTier, &str), Vec<usize>> = HashMap::new();
        for (ix, entry) in entries.iter().enumerate() {
            for glyph in &entry.left {
                by_left_glyph
                    .entry((entry.tier, *glyph))
                    .or_default()
                    .push(ix);
            }
        }
        let mut conflicts = vec![];
        for (ix, entry) in entries.iter().enumerate() {
            let candidates: BTreeSet<usize> = entry
                .left
                .iter()
                .filter_map(|glyph| by_left_glyph.get(&(entry.tier, *glyph)))
                .flatten()
                .copied()
                .filter(|other| *other > ix)
                .collect();
            for other in candidates {
                let other = &entries[other];
                if entry.value != other.value && !entry.right.is_disjoint(&other.right) {
                    conflicts.push((entry.pair.clone(), other.pair.clone()));
                }
            }
        }
        conflicts
    }
}
