use super::Range;
use crate::value::{host_mask, Steppable};
use crate::{RangeError, Result};

/// Two-step construction: `Range::starting_at(start).to(end)`.
#[derive(Debug, Clone, Copy)]
pub struct RangeBuilder<V> {
    start: V,
}

impl<V: Steppable> RangeBuilder<V> {
    pub(super) fn new(start: V) -> Self {
        Self { start }
    }

    /// Close the range at `end`.
    pub fn to(self, end: V) -> Result<Range<V>> {
        Range::new(self.start, end)
    }

    /// Close the range as the `/length` block starting here.
    ///
    /// Fails unless `start` is the first value of that block.
    pub fn with_prefix_length(self, length: u32) -> Result<Range<V>> {
        if length > V::BITS {
            return Err(RangeError::InvalidPrefixLength {
                length,
                bits: V::BITS,
            });
        }
        if self.start.lower_bound_for_prefix(length) != self.start {
            return Err(RangeError::NotLegalPrefix {
                range: format!("{}/{}", self.start, length),
            });
        }
        Range::new(self.start, self.start.upper_bound_for_prefix(length))
    }

    /// Close the range so that it holds exactly `size` values.
    ///
    /// A `u128` count stops one short of the whole IPv6 space; build `::/0`
    /// with `with_prefix_length(0)` or [`Range::full`].
    pub fn with_size(self, size: u128) -> Result<Range<V>> {
        let invalid = || RangeError::InvalidSize {
            start: self.start.to_string(),
            size,
        };
        let span = size.checked_sub(1).ok_or_else(invalid)?;
        let end = self
            .start
            .to_bits()
            .checked_add(span)
            .filter(|end| *end <= host_mask(V::BITS))
            .ok_or_else(invalid)?;
        Range::new(self.start, V::from_bits(end))
    }
}
