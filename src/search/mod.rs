//! Prefix search and free-space accounting
//!
//! Built on decomposition and disjoint sets: find the tightest block that can
//! host a `/p`, and work out which aligned blocks remain once assigned ranges
//! are subtracted from a pool.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::range::Range;
use crate::set::DisjointRangeSet;
use crate::value::{host_mask, Steppable};
use crate::{RangeError, Result};

fn check_prefix_length<V: Steppable>(length: u32) -> Result<()> {
    if length > V::BITS {
        return Err(RangeError::InvalidPrefixLength {
            length,
            bits: V::BITS,
        });
    }
    Ok(())
}

/// Decomposed blocks of `range` big enough to hold a `/length`.
fn qualifying_prefixes<V: Steppable>(
    range: &Range<V>,
    length: u32,
) -> impl Iterator<Item = Range<V>> {
    let needed = host_mask(V::BITS - length);
    range.prefixes().filter(move |prefix| prefix.span() >= needed)
}

/// Smallest prefix of `range`'s decomposition that can hold a `/length`.
///
/// A block qualifies when its own prefix length is at most `length`.
/// Ties go to the lowest address. `None` when no block is large enough.
pub fn find_minimum_prefix_for_prefix_length<V: Steppable>(
    range: &Range<V>,
    length: u32,
) -> Result<Option<Range<V>>> {
    check_prefix_length::<V>(length)?;
    Ok(qualifying_prefixes(range, length).fold(None, |best, prefix| match best {
        Some(current) if current.span() <= prefix.span() => Some(current),
        _ => Some(prefix),
    }))
}

/// Largest prefix of `range`'s decomposition that can hold a `/length`.
///
/// Qualifying blocks as in [`find_minimum_prefix_for_prefix_length`].
/// Ties go to the lowest address. `None` when no block is large enough.
pub fn find_maximum_prefix_for_prefix_length<V: Steppable>(
    range: &Range<V>,
    length: u32,
) -> Result<Option<Range<V>>> {
    check_prefix_length::<V>(length)?;
    Ok(qualifying_prefixes(range, length).fold(None, |best, prefix| match best {
        Some(current) if current.span() >= prefix.span() => Some(current),
        _ => Some(prefix),
    }))
}

/// Best-fit search over candidate free ranges.
///
/// For every candidate with room for a `/length`, take its minimum
/// qualifying prefix and keep the smallest seen overall. The first
/// candidate wins exact ties.
pub fn find_best_fit<'a, V, I>(candidates: I, length: u32) -> Result<Option<Range<V>>>
where
    V: Steppable + 'a,
    I: IntoIterator<Item = &'a Range<V>>,
{
    check_prefix_length::<V>(length)?;
    let needed = host_mask(V::BITS - length);

    let mut best: Option<Range<V>> = None;
    for candidate in candidates {
        if candidate.span() < needed {
            continue;
        }
        if let Some(prefix) = find_minimum_prefix_for_prefix_length(candidate, length)? {
            if best.map_or(true, |current| prefix.span() < current.span()) {
                best = Some(prefix);
            }
        }
    }
    Ok(best)
}

/// The `/length` block a best-fit allocation would hand out: the first one
/// inside the prefix chosen by [`find_best_fit`].
pub fn best_fit_allocation<'a, V, I>(candidates: I, length: u32) -> Result<Option<Range<V>>>
where
    V: Steppable + 'a,
    I: IntoIterator<Item = &'a Range<V>>,
{
    find_best_fit(candidates, length)?
        .map(|prefix| Range::prefix_containing(prefix.start(), length))
        .transpose()
}

/// Aligned blocks of `original` left free once every range in `to_exclude`
/// is taken out, ordered by start then size.
pub fn exclude_from_range_and_split_into_prefixes<'a, V, I>(
    original: &Range<V>,
    to_exclude: I,
) -> Result<BTreeSet<Range<V>>>
where
    V: Steppable + 'a,
    I: IntoIterator<Item = &'a Range<V>>,
{
    let mut remaining = DisjointRangeSet::new();
    remaining.add(*original);
    remaining.remove_all(to_exclude)?;

    let free: BTreeSet<Range<V>> = remaining
        .iter()
        .flat_map(|member| member.prefixes())
        .collect();
    debug!(
        %original,
        remaining = remaining.len(),
        prefixes = free.len(),
        "planned free prefixes"
    );
    Ok(free)
}

/// Prefix length of a single block as large as all the given blocks combined.
///
/// Computes `floor(BITS - log2(sum(2^(BITS - length))))` in floating point.
/// When the blocks add up to more than the whole space the result drops
/// below zero; that value is returned as is. An empty slice has no finite
/// answer and saturates to `i32::MAX`.
pub fn aggregate_prefix_length<V: Steppable>(lengths: &[u32]) -> Result<i32> {
    let bits = V::BITS as i32;
    let mut total = 0f64;
    for &length in lengths {
        check_prefix_length::<V>(length)?;
        total += 2f64.powi(bits - length as i32);
    }

    let aggregate = (bits as f64 - total.log2()).floor() as i32;
    if aggregate < 0 {
        warn!(aggregate, blocks = lengths.len(), "aggregate exceeds the address space");
    }
    Ok(aggregate)
}
