//! Normalized disjoint range sets
//!
//! Members never overlap and never touch, and are kept sorted by
//! `(start, end)`. The set is only ever changed through [`add`] and
//! [`remove`], which restore that invariant on every call.
//!
//! [`add`]: DisjointRangeSet::add
//! [`remove`]: DisjointRangeSet::remove

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use tracing::trace;

use crate::range::Range;
use crate::value::Steppable;
use crate::{RangeError, Result};

/// Ordered collection of pairwise non-overlapping, non-adjacent ranges.
///
/// Equality compares the normalized members, so two sets built in a
/// different order but covering the same values are equal.
///
/// Not synchronized: share it read-only, or serialize mutation externally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DisjointRangeSet<V> {
    members: BTreeSet<Range<V>>,
}

impl<V: Steppable> Default for DisjointRangeSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Steppable> DisjointRangeSet<V> {
    /// Empty set.
    pub fn new() -> Self {
        Self {
            members: BTreeSet::new(),
        }
    }

    /// Greatest member ordered at or before `range`.
    fn floor(&self, range: &Range<V>) -> Option<Range<V>> {
        self.members.range(..=*range).next_back().copied()
    }

    /// Least member ordered at or after `range`.
    fn ceiling(&self, range: &Range<V>) -> Option<Range<V>> {
        self.members.range(*range..).next().copied()
    }

    /// Members sharing at least one value with `range`, in order.
    fn overlapping<'a>(&'a self, range: &'a Range<V>) -> impl Iterator<Item = Range<V>> + 'a {
        let anchor = Range::single(range.start());
        let before = self.members.range(..anchor).next_back();
        let from = self
            .members
            .range(anchor..)
            .take_while(move |member| member.start() <= range.end());
        before
            .into_iter()
            .chain(from)
            .filter(move |member| member.overlaps(range))
            .copied()
    }

    /// Insert `range`, coalescing with every member it overlaps or touches.
    pub fn add(&mut self, range: Range<V>) {
        if self.contains(&range) {
            return;
        }

        let mut candidate = range;
        loop {
            if let Some(right) = self.ceiling(&candidate) {
                if let Some(merged) = candidate.coalesce(&right) {
                    trace!(%candidate, %right, %merged, "coalescing with upper neighbour");
                    self.members.remove(&right);
                    candidate = merged;
                    continue;
                }
            }
            if let Some(left) = self.floor(&candidate) {
                if let Some(merged) = candidate.coalesce(&left) {
                    trace!(%candidate, %left, %merged, "coalescing with lower neighbour");
                    self.members.remove(&left);
                    candidate = merged;
                    continue;
                }
            }
            self.members.insert(candidate);
            return;
        }
    }

    /// [`add`](Self::add) every range.
    pub fn add_all<I>(&mut self, ranges: I)
    where
        I: IntoIterator<Item = Range<V>>,
    {
        for range in ranges {
            self.add(range);
        }
    }

    /// Subtract `range` from the set. Returns whether anything changed.
    ///
    /// Members inside `range` are dropped; members straddling one of its
    /// boundaries are cut back to the part outside it.
    pub fn remove(&mut self, range: &Range<V>) -> Result<bool> {
        let touched: Vec<Range<V>> = self.overlapping(range).collect();
        if touched.is_empty() {
            return Ok(false);
        }

        let mut fragments = Vec::new();
        for member in &touched {
            fragments.extend(member.exclude(range)?);
        }

        trace!(%range, removed = touched.len(), kept = fragments.len(), "removing range");
        for member in &touched {
            self.members.remove(member);
        }
        self.members.extend(fragments);
        Ok(true)
    }

    /// [`remove`](Self::remove) every range. Returns whether anything changed.
    pub fn remove_all<'a, I>(&mut self, ranges: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'a Range<V>>,
        V: 'a,
    {
        let mut changed = false;
        for range in ranges {
            changed |= self.remove(range)?;
        }
        Ok(changed)
    }

    /// Whether a single member covers all of `range`.
    pub fn contains(&self, range: &Range<V>) -> bool {
        let probe = Range::from_ordered(range.start(), V::max_value());
        self.members
            .range(..=probe)
            .next_back()
            .map_or(false, |member| member.contains(range))
    }

    /// Whether some member holds `value`.
    pub fn contains_value(&self, value: V) -> bool {
        self.contains(&Range::single(value))
    }

    /// Values present in both sets.
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = Self::new();
        for member in &self.members {
            for candidate in other.overlapping(member) {
                if let Ok(common) = member.intersection(&candidate) {
                    result.add(common);
                }
            }
        }
        result
    }

    /// The only member, failing unless there is exactly one.
    pub fn single_range(&self) -> Result<Range<V>> {
        match (self.members.len(), self.members.first()) {
            (1, Some(range)) => Ok(*range),
            (count, _) => Err(RangeError::NotSingleRange { count }),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, Range<V>> {
        self.members.iter()
    }

    /// Drop every member.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

impl<V: Steppable> FromIterator<Range<V>> for DisjointRangeSet<V> {
    fn from_iter<I: IntoIterator<Item = Range<V>>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_all(iter);
        set
    }
}

impl<V: Steppable> Extend<Range<V>> for DisjointRangeSet<V> {
    fn extend<I: IntoIterator<Item = Range<V>>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, V: Steppable> IntoIterator for &'a DisjointRangeSet<V> {
    type Item = &'a Range<V>;
    type IntoIter = btree_set::Iter<'a, Range<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl<V: Steppable> IntoIterator for DisjointRangeSet<V> {
    type Item = Range<V>;
    type IntoIter = btree_set::IntoIter<Range<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<V: Steppable> fmt::Display for DisjointRangeSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, member) in self.members.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", member)?;
        }
        f.write_str("}")
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::Deserialize<'de> for DisjointRangeSet<V>
where
    V: Steppable + serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ranges = Vec::<Range<V>>::deserialize(deserializer)?;
        Ok(ranges.into_iter().collect())
    }
}
