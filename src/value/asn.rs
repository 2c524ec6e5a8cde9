use std::fmt;
use std::str::FromStr;

use super::{ParseError, Steppable};

/// Autonomous System Number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Asn(u32);

impl Asn {
    /// Wrap a raw AS number.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw AS number.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether the number fits the original 16-bit ASN space.
    pub fn is_16_bit(self) -> bool {
        self.0 <= u16::MAX as u32
    }
}

impl Steppable for Asn {
    const BITS: u32 = 32;
    const PREFIX_NOTATION: bool = false;
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

impl From<u32> for Asn {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

/// Accepts `AS65000`, `as65000` or a bare `65000`.
impl FromStr for Asn {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        let digits = match trimmed.get(..2) {
            Some(tag) if tag.eq_ignore_ascii_case("as") => &trimmed[2..],
            _ => trimmed,
        };
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|source| ParseError::Number {
                input: trimmed.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("AS65000".parse::<Asn>().unwrap(), Asn::new(65000));
        assert_eq!("as1".parse::<Asn>().unwrap(), Asn::new(1));
        assert_eq!("4294967295".parse::<Asn>().unwrap(), Asn::new(u32::MAX));
        assert!(matches!("AS".parse::<Asn>(), Err(ParseError::Number { .. })));
        assert!(matches!("AS4294967296".parse::<Asn>(), Err(ParseError::Number { .. })));
    }

    #[test]
    fn test_display_and_width() {
        assert_eq!(Asn::new(3333).to_string(), "AS3333");
        assert!(Asn::new(65535).is_16_bit());
        assert!(!Asn::new(65536).is_16_bit());
    }
}
