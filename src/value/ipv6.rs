use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use super::{ParseError, Steppable};

/// IPv6 address as a point in the 128-bit space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Ipv6(u128);

impl Ipv6 {
    /// Wrap a raw 128-bit address.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Raw 128-bit address.
    pub const fn value(self) -> u128 {
        self.0
    }
}

/// Number of addresses in an IPv6 range.
///
/// Stored as `count - 1` so that the full space (`2^128`) stays representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv6Size {
    span: u128,
}

impl Ipv6Size {
    /// Address count, or `None` for the full `2^128` space.
    pub fn count(self) -> Option<u128> {
        self.span.checked_add(1)
    }

    /// Whether this is the size of the entire address space.
    pub fn is_full_space(self) -> bool {
        self.span == u128::MAX
    }
}

impl fmt::Display for Ipv6Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count() {
            Some(count) => write!(f, "{}", count),
            None => f.write_str("340282366920938463463374607431768211456"),
        }
    }
}

impl Steppable for Ipv6 {
    const BITS: u32 = 128;
    type Size = Ipv6Size;

    fn to_bits(self) -> u128 {
        self.0
    }

    fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    fn size_from_span(span: u128) -> Ipv6Size {
        Ipv6Size { span }
    }
}

impl From<Ipv6Addr> for Ipv6 {
    fn from(addr: Ipv6Addr) -> Self {
        Self(u128::from(addr))
    }
}

impl From<Ipv6> for Ipv6Addr {
    fn from(value: Ipv6) -> Self {
        Ipv6Addr::from(value.0)
    }
}

impl From<u128> for Ipv6 {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Ipv6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Ipv6Addr::from(*self), f)
    }
}

impl FromStr for Ipv6 {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        trimmed
            .parse::<Ipv6Addr>()
            .map(Self::from)
            .map_err(|source| ParseError::Address {
                input: trimmed.to_string(),
                source,
            })
    }
}
