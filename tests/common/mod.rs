#![allow(dead_code)]

use ipmath::{Asn, DisjointRangeSet, Ipv4, Range, Steppable};

pub fn v4(start: &str, end: &str) -> Range<Ipv4> {
    Range::new(start.parse().expect("start parses"), end.parse().expect("end parses"))
        .expect("valid range")
}

pub fn asn(start: u32, end: u32) -> Range<Asn> {
    Range::new(Asn::new(start), Asn::new(end)).expect("valid range")
}

pub fn render<'a, V, I>(ranges: I) -> Vec<String>
where
    V: Steppable + 'a,
    I: IntoIterator<Item = &'a Range<V>>,
{
    ranges.into_iter().map(|range| range.to_string()).collect()
}

/// Panics unless members are sorted, pairwise disjoint and non-adjacent.
pub fn assert_normalized<V: Steppable>(set: &DisjointRangeSet<V>) {
    let members: Vec<&Range<V>> = set.iter().collect();
    for pair in members.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        assert!(left < right, "members out of order: {} then {}", left, right);
        assert!(!left.overlaps(right), "{} overlaps {}", left, right);
        assert!(!left.is_consecutive(right), "{} touches {}", left, right);
    }
}
