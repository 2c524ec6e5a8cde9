//! # Exact range arithmetic over address spaces
//!
//! This library models IPv4 addresses, IPv6 addresses and Autonomous System
//! Numbers as points on a finite, totally ordered line and works with closed
//! intervals over them.
//!
//! ## Layers
//!
//! 1. **Values**: [`Steppable`] describes what a point must offer (ordering,
//!    stepping, a fixed bit width). [`Ipv4`], [`Ipv6`] and [`Asn`] implement it.
//! 2. **Ranges**: [`Range`] is a closed interval with containment, overlap,
//!    merge, intersection and set difference.
//! 3. **Prefixes**: any range splits into the minimal ordered list of
//!    power-of-two aligned blocks (CIDR prefixes).
//! 4. **Sets**: [`DisjointRangeSet`] keeps ranges coalesced under insertion
//!    and removal.
//! 5. **Search**: best-fit prefix search and free-space planning on top.
//!
//! ## Usage Example
//!
//! ```
//! use ipmath::{Ipv4, Range};
//!
//! let range: Range<Ipv4> = "0.0.0.1-0.0.0.6".parse()?;
//! let blocks: Vec<String> = range.prefixes().map(|p| p.to_string()).collect();
//! assert_eq!(blocks, ["0.0.0.1/32", "0.0.0.2/31", "0.0.0.4/31", "0.0.0.6/32"]);
//! # Ok::<(), ipmath::ParseError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod value;   // Value contract and address families
pub mod range;   // Closed interval algebra
pub mod prefix;  // CIDR decomposition and legality
pub mod set;     // Normalized disjoint range sets
pub mod search;  // Prefix search and free-space accounting

pub use value::{Asn, Ipv4, Ipv6, Ipv6Size, ParseError, Steppable};
pub use range::{Range, RangeBuilder, RangeIter};
pub use prefix::PrefixIter;
pub use set::DisjointRangeSet;
pub use search::{
    aggregate_prefix_length, best_fit_allocation, exclude_from_range_and_split_into_prefixes,
    find_best_fit, find_maximum_prefix_for_prefix_length, find_minimum_prefix_for_prefix_length,
};

use thiserror::Error;

/// Errors raised by range construction and range algebra.
///
/// Every variant is deterministic: it signals a programming or input error,
/// never an environmental fault. Operands are carried in rendered form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Start lies after end.
    #[error("invalid range: start {start} is greater than end {end}")]
    InvalidRange {
        /// Requested start
        start: String,
        /// Requested end
        end: String,
    },

    /// Merge requested for ranges that neither overlap nor touch.
    #[error("cannot merge {left} and {right}: ranges are neither overlapping nor consecutive")]
    NotMergeable {
        /// Receiver of the merge
        left: String,
        /// Argument of the merge
        right: String,
    },

    /// Intersection requested for ranges that do not overlap.
    #[error("{left} and {right} do not intersect")]
    NoIntersection {
        /// Receiver of the intersection
        left: String,
        /// Argument of the intersection
        right: String,
    },

    /// A single range was required but the set held a different number.
    #[error("expected exactly one range, found {count}")]
    NotSingleRange {
        /// Number of members actually present
        count: usize,
    },

    /// The range is not aligned to a power-of-two block.
    #[error("{range} is not a legal prefix")]
    NotLegalPrefix {
        /// Offending range
        range: String,
    },

    /// Prefix length beyond the bit width of the family.
    #[error("invalid prefix length {length}: must be between 0 and {bits}")]
    InvalidPrefixLength {
        /// Requested length
        length: u32,
        /// Bit width of the value family
        bits: u32,
    },

    /// Stepped past the top of the value space.
    #[error("{value} has no next value")]
    NoNext {
        /// Value at the upper edge
        value: String,
    },

    /// Stepped past the bottom of the value space.
    #[error("{value} has no previous value")]
    NoPrevious {
        /// Value at the lower edge
        value: String,
    },

    /// A range of the requested size does not fit in the remaining space.
    #[error("a range of {size} values starting at {start} does not fit in the value space")]
    InvalidSize {
        /// Requested start
        start: String,
        /// Requested number of values
        size: u128,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RangeError>;
