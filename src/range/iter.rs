use super::Range;
use crate::value::Steppable;

/// Lazy walk over every value of a range, in ascending order.
///
/// Stops after `end`, or earlier if stepping hits the top of the space.
#[derive(Debug, Clone)]
pub struct RangeIter<V> {
    next: Option<V>,
    end: V,
}

impl<V: Steppable> RangeIter<V> {
    pub(super) fn new(range: &Range<V>) -> Self {
        Self {
            next: Some(range.start()),
            end: range.end(),
        }
    }
}

impl<V: Steppable> Iterator for RangeIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let current = self.next.take()?;
        if current < self.end {
            self.next = current.next().ok();
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            None => (0, Some(0)),
            Some(next) => {
                let remaining = (self.end.to_bits() - next.to_bits()).checked_add(1);
                match remaining.and_then(|n| usize::try_from(n).ok()) {
                    Some(n) => (n, Some(n)),
                    None => (usize::MAX, None),
                }
            }
        }
    }
}

impl<V: Steppable> std::iter::FusedIterator for RangeIter<V> {}
