use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use super::{host_mask, ParseError, Steppable};
use crate::{RangeError, Result};

/// IPv4 address as a point in the 32-bit space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ipv4(u32);

impl Ipv4 {
    /// Wrap a raw 32-bit address.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw 32-bit address.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Dotted netmask for a prefix length, e.g. `/24` → `255.255.255.0`.
    pub fn netmask(prefix_length: u32) -> Result<Self> {
        if prefix_length > Self::BITS {
            return Err(RangeError::InvalidPrefixLength {
                length: prefix_length,
                bits: Self::BITS,
            });
        }
        let host = host_mask(Self::BITS - prefix_length) as u32;
        Ok(Self(!host))
    }

    /// Prefix length encoded by a netmask, or `None` when the ones are not contiguous.
    pub fn from_netmask(mask: Self) -> Option<u32> {
        let inverted = !mask.0;
        if inverted & inverted.wrapping_add(1) != 0 {
            return None;
        }
        Some(mask.0.leading_ones())
    }
}

impl Steppable for Ipv4 {
    const BITS: u32 = 32;
    type Size = u64;

    fn to_bits(self) -> u128 {
        self.0 as u128
    }

    fn from_bits(bits: u128) -> Self {
        Self(bits as u32)
    }

    fn size_from_span(span: u128) -> u64 {
        span as u64 + 1
    }
}

impl From<Ipv4Addr> for Ipv4 {
    fn from(addr: Ipv4Addr) -> Self {
        Self(u32::from(addr))
    }
}

impl From<Ipv4> for Ipv4Addr {
    fn from(value: Ipv4) -> Self {
        Ipv4Addr::from(value.0)
    }
}

impl From<u32> for Ipv4 {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Ipv4Addr::from(*self), f)
    }
}

impl FromStr for Ipv4 {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        trimmed
            .parse::<Ipv4Addr>()
            .map(Self::from)
            .map_err(|source| ParseError::Address {
                input: trimmed.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let value: Ipv4 = "10.1.2.3".parse().unwrap();
        assert_eq!(value.value(), 0x0A01_0203);
        assert_eq!(value.to_string(), "10.1.2.3");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!("10.1.2".parse::<Ipv4>(), Err(ParseError::Address { .. })));
        assert_eq!("  ".parse::<Ipv4>(), Err(ParseError::Empty));
    }

    #[test]
    fn test_netmask_conversions() {
        assert_eq!(Ipv4::netmask(24).unwrap().to_string(), "255.255.255.0");
        assert_eq!(Ipv4::netmask(0).unwrap(), Ipv4::new(0));
        assert_eq!(Ipv4::netmask(32).unwrap(), Ipv4::new(u32::MAX));
        assert!(Ipv4::netmask(33).is_err());

        assert_eq!(Ipv4::from_netmask("255.255.240.0".parse().unwrap()), Some(20));
        assert_eq!(Ipv4::from_netmask("0.0.0.0".parse().unwrap()), Some(0));
        assert_eq!(Ipv4::from_netmask("255.0.255.0".parse().unwrap()), None);
    }

    #[test]
    fn test_size_covers_whole_space() {
        assert_eq!(Ipv4::size_from_span(u32::MAX as u128), 1u64 << 32);
    }
}
