//! CIDR decomposition and prefix legality
//!
//! A prefix is a range whose size is a power of two and whose start is
//! aligned to that size. Any range can be partitioned into the minimal
//! ordered list of maximal prefixes with a single greedy pass:
//!
//! 1. Take the largest block aligned at the cursor
//! 2. Shrink it until it fits before the end of the range
//! 3. Emit it and move the cursor past it
//!
//! All block arithmetic runs in `u128` on `end - start`, so the full IPv4
//! space (`2^32` addresses) and the full IPv6 space (`2^128`) never overflow.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::range::Range;
use crate::value::{host_mask, Steppable};
use crate::{RangeError, Result};

/// Lazy decomposition of a range into maximal aligned blocks.
#[derive(Debug, Clone)]
pub struct PrefixIter<V> {
    cursor: Option<u128>,
    end: u128,
    _value: PhantomData<V>,
}

impl<V: Steppable> PrefixIter<V> {
    fn new(range: &Range<V>) -> Self {
        Self {
            cursor: Some(range.start().to_bits()),
            end: range.end().to_bits(),
            _value: PhantomData,
        }
    }
}

impl<V: Steppable> Iterator for PrefixIter<V> {
    type Item = Range<V>;

    fn next(&mut self) -> Option<Range<V>> {
        let cursor = self.cursor?;

        // Largest block aligned at the cursor
        let mut host_bits = if cursor == 0 {
            V::BITS
        } else {
            cursor.trailing_zeros().min(V::BITS)
        };

        // Shrink until it fits
        let remaining = self.end - cursor;
        while host_mask(host_bits) > remaining {
            host_bits -= 1;
        }

        let block_end = cursor + host_mask(host_bits);
        self.cursor = if block_end < self.end {
            Some(block_end + 1)
        } else {
            None
        };

        Some(Range::from_ordered(
            V::from_bits(cursor),
            V::from_bits(block_end),
        ))
    }
}

impl<V: Steppable> FusedIterator for PrefixIter<V> {}

impl<V: Steppable> Range<V> {
    /// The `/length` block containing `value`.
    pub fn prefix_containing(value: V, length: u32) -> Result<Self> {
        if length > V::BITS {
            return Err(RangeError::InvalidPrefixLength {
                length,
                bits: V::BITS,
            });
        }
        Ok(Self::from_ordered(
            value.lower_bound_for_prefix(length),
            value.upper_bound_for_prefix(length),
        ))
    }

    /// Lazily decompose into maximal prefixes, in ascending order.
    pub fn prefixes(&self) -> PrefixIter<V> {
        PrefixIter::new(self)
    }

    /// Minimal ordered list of prefixes whose union is exactly `self`.
    pub fn split_into_prefixes(&self) -> Vec<Self> {
        self.prefixes().collect()
    }

    /// Whether the range is a single aligned power-of-two block.
    pub fn is_legal_prefix(&self) -> bool {
        self.prefix_length().is_ok()
    }

    /// Prefix length of a legal prefix.
    pub fn prefix_length(&self) -> Result<u32> {
        let length = self.start().common_prefix_length(self.end());
        if self.start().lower_bound_for_prefix(length) != self.start()
            || self.end().upper_bound_for_prefix(length) != self.end()
        {
            // Display goes through here, so render the operands by hand.
            return Err(RangeError::NotLegalPrefix {
                range: format!("{}-{}", self.start(), self.end()),
            });
        }
        Ok(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ipv4, Ipv6};

    fn v4(start: &str, end: &str) -> Range<Ipv4> {
        Range::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
    }

    fn render<V: Steppable>(prefixes: &[Range<V>]) -> Vec<String> {
        prefixes.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_small_range_decomposition() {
        let prefixes = v4("0.0.0.1", "0.0.0.6").split_into_prefixes();
        assert_eq!(
            render(&prefixes),
            ["0.0.0.1/32", "0.0.0.2/31", "0.0.0.4/31", "0.0.0.6/32"]
        );
    }

    #[test]
    fn test_aligned_range_is_one_prefix() {
        let prefixes = v4("10.0.0.0", "10.255.255.255").split_into_prefixes();
        assert_eq!(render(&prefixes), ["10.0.0.0/8"]);
    }

    #[test]
    fn test_whole_spaces() {
        assert_eq!(render(&Range::<Ipv4>::full().split_into_prefixes()), ["0.0.0.0/0"]);
        assert_eq!(render(&Range::<Ipv6>::full().split_into_prefixes()), ["::/0"]);
    }

    #[test]
    fn test_top_of_space_terminates() {
        let prefixes = v4("255.255.255.254", "255.255.255.255").split_into_prefixes();
        assert_eq!(render(&prefixes), ["255.255.255.254/31"]);

        let prefixes = v4("255.255.255.253", "255.255.255.255").split_into_prefixes();
        assert_eq!(render(&prefixes), ["255.255.255.253/32", "255.255.255.254/31"]);
    }

    #[test]
    fn test_legality() {
        assert_eq!(v4("192.168.0.0", "192.168.255.255").prefix_length(), Ok(16));
        assert!(!v4("192.168.0.1", "192.168.255.255").is_legal_prefix());
        assert!(v4("1.2.3.4", "1.2.3.4").is_legal_prefix());
        assert!(matches!(
            v4("0.0.0.2", "0.0.0.5").prefix_length(),
            Err(RangeError::NotLegalPrefix { .. })
        ));
    }

    #[test]
    fn test_prefix_containing() {
        let value: Ipv4 = "172.16.5.9".parse().unwrap();
        let block = Range::prefix_containing(value, 12).unwrap();
        assert_eq!(block.to_string(), "172.16.0.0/12");
        assert_eq!(block.prefix_length(), Ok(12));
        assert!(Range::prefix_containing(value, 40).is_err());
    }
}
