//! Matching items between two collections that need not line up.
//!
//! Anchors, components and guidelines are paired by content rather than by
//! position. Each collection kind supplies a sequence of match tests, from
//! most to least specific; items matched by one test are taken out of both
//! pools before the next test runs. Whatever is left unmatched at the end is
//! dropped from the result.

/// Two pools of items still waiting to be paired, and the pairs made so far.
#[derive(Debug)]
pub(crate) struct Pairer<'a, T> {
    left: Vec<&'a T>,
    right: Vec<&'a T>,
    pairs: Vec<(&'a T, &'a T)>,
}

impl<'a, T> Pairer<'a, T> {
    pub(crate) fn new(left: &'a [T], right: &'a [T]) -> Self {
        Pairer {
            left: left.iter().collect(),
            right: right.iter().collect(),
            pairs: vec![],
        }
    }

    /// Both pools still hold something.
    pub(crate) fn has_candidates(&self) -> bool {
        !self.left.is_empty() && !self.right.is_empty()
    }

    /// Run one matching pass.
    ///
    /// Each remaining left item, in order, takes the first remaining right
    /// item for which `matches` holds.
    pub(crate) fn pass(&mut self, matches: impl Fn(&T, &T) -> bool) -> &mut Self {
        let mut unmatched = Vec::with_capacity(self.left.len());
        for left in std::mem::take(&mut self.left) {
            match self.right.iter().position(|right| matches(left, right)) {
                Some(ix) => {
                    let right = self.right.remove(ix);
                    self.pairs.push((left, right));
                }
                None => unmatched.push(left),
            }
        }
        self.left = unmatched;
        self
    }

    /// Pair whatever remains strictly by position.
    pub(crate) fn pass_by_index(&mut self) -> &mut Self {
        let count = self.left.len().min(self.right.len());
        let left = self.left.drain(..count);
        let right = self.right.drain(..count);
        self.pairs.extend(left.zip(right));
        self
    }

    /// Number of items on each side which found no partner.
    pub(crate) fn leftovers(&self) -> (usize, usize) {
        (self.left.len(), self.right.len())
    }

    pub(crate) fn finish(self) -> Vec<(&'a T, &'a T)> {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_remove_from_both_pools() {
        let left = [(1, 'a'), (2, 'b'), (3, 'c')];
        let right = [(3, 'x'), (1, 'a'), (2, 'y')];
        let mut pairer = Pairer::new(&left, &right);
        pairer.pass(|l, r| l == r).pass(|l, r| l.0 == r.0);
        assert_eq!(pairer.leftovers(), (0, 0));
        let pairs = pairer.finish();
        assert_eq!(
            pairs,
            vec![
                (&(1, 'a'), &(1, 'a')),
                (&(2, 'b'), &(2, 'y')),
                (&(3, 'c'), &(3, 'x'))
            ]
        );
    }

    #[test]
    fn test_index_pass_stops_at_shorter_side() {
        let left = [1, 2, 3];
        let right = [7, 8];
        let mut pairer = Pairer::new(&left, &right);
        pairer.pass_by_index();
        assert_eq!(pairer.leftovers(), (1, 0));
        assert_eq!(pairer.finish(), vec![(&1, &7), (&2, &8)]);
    }
}
