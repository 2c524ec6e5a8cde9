//! Closed interval algebra
//!
//! A [`Range`] is an immutable `[start, end]` pair with `start <= end`.
//! Everything here depends only on the [`Steppable`] contract, so the same
//! code serves IPv4, IPv6 and ASN ranges.

mod builder;
mod iter;

pub use builder::RangeBuilder;
pub use iter::RangeIter;

use std::fmt;
use std::str::FromStr;

use crate::value::{ParseError, Steppable};
use crate::{RangeError, Result};

/// Closed interval `[start, end]` over a steppable value.
///
/// Ordering is by `(start, end)`, which is also the order members are kept
/// in by [`DisjointRangeSet`](crate::DisjointRangeSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Range<V> {
    start: V,
    end: V,
}

/// Where `other` sits relative to `self`, from the point of view of
/// subtracting `other` from `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// No common values.
    Disjoint,
    /// `other` covers all of `self`.
    Covered,
    /// `other` covers the start of `self` but not its end.
    CutsHead,
    /// `other` covers the end of `self` but not its start.
    CutsTail,
    /// `other` lies strictly inside `self`, touching neither endpoint.
    Interior,
}

impl<V: Steppable> Range<V> {
    /// Build `[start, end]`, failing when `start > end`.
    pub fn new(start: V, end: V) -> Result<Self> {
        if start > end {
            return Err(RangeError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Range holding exactly one value.
    pub fn single(value: V) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    /// Caller guarantees `start <= end`.
    pub(crate) fn from_ordered(start: V, end: V) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Range covering the entire value space.
    pub fn full() -> Self {
        Self {
            start: V::min_value(),
            end: V::max_value(),
        }
    }

    /// Start a builder anchored at `start`.
    pub fn starting_at(start: V) -> RangeBuilder<V> {
        RangeBuilder::new(start)
    }

    /// First value (inclusive).
    pub fn start(&self) -> V {
        self.start
    }

    /// Last value (inclusive).
    pub fn end(&self) -> V {
        self.end
    }

    /// `start <= value <= end`.
    pub fn contains_value(&self, value: V) -> bool {
        self.start <= value && value <= self.end
    }

    /// Whether `other` lies entirely within `self`.
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Whether the two ranges share at least one value. Symmetric.
    pub fn overlaps(&self, other: &Self) -> bool {
        other.contains_value(self.start) || other.contains_value(self.end) || self.contains(other)
    }

    /// [`overlaps`](Self::overlaps) where a missing range never overlaps.
    pub fn overlaps_any(&self, other: Option<&Self>) -> bool {
        other.map_or(false, |other| self.overlaps(other))
    }

    /// Whether the ranges touch with no gap and no overlap, in either order.
    pub fn is_consecutive(&self, other: &Self) -> bool {
        fn follows<V: Steppable>(left: &Range<V>, right: &Range<V>) -> bool {
            left.end.next().map_or(false, |next| next == right.start)
        }
        follows(self, other) || follows(other, self)
    }

    /// Smallest range covering both, if they overlap or are consecutive.
    pub(crate) fn coalesce(&self, other: &Self) -> Option<Self> {
        if !(self.overlaps(other) || self.is_consecutive(other)) {
            return None;
        }
        Some(Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }

    /// Union of two overlapping or consecutive ranges.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        self.coalesce(other).ok_or_else(|| RangeError::NotMergeable {
            left: self.to_string(),
            right: other.to_string(),
        })
    }

    /// Values common to both ranges.
    pub fn intersection(&self, other: &Self) -> Result<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start > end {
            return Err(RangeError::NoIntersection {
                left: self.to_string(),
                right: other.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    fn position_of(&self, other: &Self) -> Position {
        if !self.overlaps(other) {
            Position::Disjoint
        } else if other.contains(self) {
            Position::Covered
        } else if other.contains_value(self.start) {
            Position::CutsHead
        } else if other.contains_value(self.end) {
            Position::CutsTail
        } else {
            Position::Interior
        }
    }

    /// Set difference `self \ other`: zero, one or two ranges in ascending order.
    ///
    /// Boundary stepping failures are returned, not swallowed.
    pub fn exclude(&self, other: &Self) -> Result<Vec<Self>> {
        match self.position_of(other) {
            Position::Disjoint => Ok(vec![*self]),
            Position::Covered => Ok(Vec::new()),
            Position::CutsHead => Ok(vec![Self::new(other.end.next()?, self.end)?]),
            Position::CutsTail => Ok(vec![Self::new(self.start, other.start.previous()?)?]),
            Position::Interior => Ok(vec![
                Self::new(self.start, other.start.previous()?)?,
                Self::new(other.end.next()?, self.end)?,
            ]),
        }
    }

    /// Same start and same end.
    pub fn is_same_range(&self, other: &Self) -> bool {
        self == other
    }

    /// True for a single-value range.
    ///
    /// A closed range is never empty of values; this reports the degenerate
    /// one-point case.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `end - start` in bit space.
    pub(crate) fn span(&self) -> u128 {
        self.end.to_bits() - self.start.to_bits()
    }

    /// Number of values in the range.
    pub fn size(&self) -> V::Size {
        V::size_from_span(self.span())
    }

    /// Lazily walk every value from `start` to `end`.
    pub fn iter(&self) -> RangeIter<V> {
        RangeIter::new(self)
    }
}

impl<V: Steppable> IntoIterator for Range<V> {
    type Item = V;
    type IntoIter = RangeIter<V>;

    fn into_iter(self) -> RangeIter<V> {
        RangeIter::new(&self)
    }
}

impl<V: Steppable> IntoIterator for &Range<V> {
    type Item = V;
    type IntoIter = RangeIter<V>;

    fn into_iter(self) -> RangeIter<V> {
        self.iter()
    }
}

impl<V: Steppable> TryFrom<(V, V)> for Range<V> {
    type Error = RangeError;

    fn try_from((start, end): (V, V)) -> Result<Self> {
        Self::new(start, end)
    }
}

impl<V: Steppable> fmt::Display for Range<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if V::PREFIX_NOTATION {
            if let Ok(length) = self.prefix_length() {
                return write!(f, "{}/{}", self.start, length);
            }
        } else if self.is_empty() {
            return write!(f, "{}", self.start);
        }
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Accepts `start-end`, `start/length` (start must be aligned) or a single value.
impl<V> FromStr for Range<V>
where
    V: Steppable + FromStr<Err = ParseError>,
{
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        if let Some((start, end)) = trimmed.split_once('-') {
            return Ok(Self::new(start.parse()?, end.parse()?)?);
        }

        if let Some((start, length)) = trimmed.split_once('/') {
            let length = length.trim();
            let length: u32 = length.parse().map_err(|source| ParseError::Number {
                input: length.to_string(),
                source,
            })?;
            return Ok(Self::starting_at(start.parse()?).with_prefix_length(length)?);
        }

        Ok(Self::single(trimmed.parse()?))
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::Deserialize<'de> for Range<V>
where
    V: Steppable + serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw<V> {
            start: V,
            end: V,
        }

        let raw = Raw::<V>::deserialize(deserializer)?;
        Self::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}
