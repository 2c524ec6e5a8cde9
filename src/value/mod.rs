//! Value contract shared by every address family
//!
//! A value is a point on a finite line of `2^BITS` positions. The range
//! algebra only needs ordering, single steps in either direction, and the
//! bit-level queries used for CIDR alignment.

mod asn;
mod ipv4;
mod ipv6;

pub use asn::Asn;
pub use ipv4::Ipv4;
pub use ipv6::{Ipv6, Ipv6Size};

use std::fmt;
use std::hash::Hash;
use std::net::AddrParseError;
use std::num::ParseIntError;

use thiserror::Error;

use crate::{RangeError, Result};

/// Ordered scalar with a fixed bit width that can step to its neighbours.
///
/// Implementors only supply the bit conversions; stepping, bounds and the
/// prefix queries are derived from the `u128` representation.
pub trait Steppable: Copy + Ord + Hash + fmt::Debug + fmt::Display {
    /// Bit width of the value space (32 for IPv4 and ASN, 128 for IPv6).
    const BITS: u32;

    /// Whether legal prefixes of this family render in `start/len` form.
    const PREFIX_NOTATION: bool = true;

    /// Number type wide enough to hold `2^BITS`.
    type Size: Copy + Ord + fmt::Debug + fmt::Display;

    /// Bit representation, zero-extended to 128 bits.
    fn to_bits(self) -> u128;

    /// Build a value from its bit representation. Bits above `BITS` are discarded.
    fn from_bits(bits: u128) -> Self;

    /// Number of values in a range whose `end - start` equals `span`.
    fn size_from_span(span: u128) -> Self::Size;

    /// Smallest value of the space.
    fn min_value() -> Self {
        Self::from_bits(0)
    }

    /// Largest value of the space.
    fn max_value() -> Self {
        Self::from_bits(host_mask(Self::BITS))
    }

    /// Whether a successor exists.
    fn has_next(self) -> bool {
        self != Self::max_value()
    }

    /// Whether a predecessor exists.
    fn has_previous(self) -> bool {
        self != Self::min_value()
    }

    /// Successor, failing at the top of the space.
    fn next(self) -> Result<Self> {
        if !self.has_next() {
            return Err(RangeError::NoNext {
                value: self.to_string(),
            });
        }
        Ok(Self::from_bits(self.to_bits() + 1))
    }

    /// Predecessor, failing at the bottom of the space.
    fn previous(self) -> Result<Self> {
        if !self.has_previous() {
            return Err(RangeError::NoPrevious {
                value: self.to_string(),
            });
        }
        Ok(Self::from_bits(self.to_bits() - 1))
    }

    /// First value of the `/len` block containing `self`.
    ///
    /// Lengths above `BITS` are clamped.
    fn lower_bound_for_prefix(self, len: u32) -> Self {
        let host_bits = Self::BITS - len.min(Self::BITS);
        Self::from_bits(self.to_bits() & !host_mask(host_bits))
    }

    /// Last value of the `/len` block containing `self`.
    ///
    /// Lengths above `BITS` are clamped.
    fn upper_bound_for_prefix(self, len: u32) -> Self {
        let host_bits = Self::BITS - len.min(Self::BITS);
        Self::from_bits(self.to_bits() | host_mask(host_bits))
    }

    /// Number of leading bits `self` and `other` have in common.
    fn common_prefix_length(self, other: Self) -> u32 {
        let diff = (self.to_bits() ^ other.to_bits()) << (128 - Self::BITS);
        diff.leading_zeros().min(Self::BITS)
    }
}

/// Mask with the low `host_bits` bits set.
pub(crate) fn host_mask(host_bits: u32) -> u128 {
    match host_bits {
        0 => 0,
        bits if bits >= 128 => u128::MAX,
        bits => (1u128 << bits) - 1,
    }
}

/// Errors from the thin text layer over values and ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty after trimming.
    #[error("empty input")]
    Empty,

    /// Address text rejected by `std::net`.
    #[error("invalid address '{input}': {source}")]
    Address {
        /// Text that failed to parse
        input: String,
        /// Underlying parser error
        #[source]
        source: AddrParseError,
    },

    /// Numeric field (ASN, prefix length) failed to parse.
    #[error("invalid number '{input}': {source}")]
    Number {
        /// Text that failed to parse
        input: String,
        /// Underlying parser error
        #[source]
        source: ParseIntError,
    },

    /// Text parsed but described an invalid range.
    #[error(transparent)]
    Range(#[from] RangeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_mask_edges() {
        assert_eq!(host_mask(0), 0);
        assert_eq!(host_mask(1), 1);
        assert_eq!(host_mask(32), u32::MAX as u128);
        assert_eq!(host_mask(128), u128::MAX);
    }

    #[test]
    fn test_stepping_fails_at_the_edges() {
        assert!(Ipv4::min_value().previous().is_err());
        assert!(Ipv4::max_value().next().is_err());
        assert!(Ipv6::max_value().next().is_err());
        assert_eq!(Asn::new(7).next().unwrap(), Asn::new(8));
        assert_eq!(Asn::new(7).previous().unwrap(), Asn::new(6));
    }

    #[test]
    fn test_prefix_bounds() {
        let value: Ipv4 = "192.168.12.34".parse().unwrap();
        assert_eq!(value.lower_bound_for_prefix(16).to_string(), "192.168.0.0");
        assert_eq!(value.upper_bound_for_prefix(16).to_string(), "192.168.255.255");
        assert_eq!(value.lower_bound_for_prefix(0), Ipv4::min_value());
        assert_eq!(value.upper_bound_for_prefix(32), value);
    }

    #[test]
    fn test_common_prefix_length() {
        let a: Ipv4 = "192.168.0.0".parse().unwrap();
        let b: Ipv4 = "192.168.255.255".parse().unwrap();
        assert_eq!(a.common_prefix_length(b), 16);
        assert_eq!(a.common_prefix_length(a), 32);

        let x: Ipv6 = "::".parse().unwrap();
        let y: Ipv6 = "8000::".parse().unwrap();
        assert_eq!(x.common_prefix_length(y), 0);
        assert_eq!(x.common_prefix_length(x), 128);
    }
}
