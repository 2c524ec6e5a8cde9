//! Property tests for the interval algebra, decomposition and disjoint sets

mod common;

use common::assert_normalized;
use ipmath::{Asn, DisjointRangeSet, Ipv4, Ipv6, Range, Steppable};
use proptest::prelude::*;

fn small_asn_range() -> impl Strategy<Value = Range<Asn>> {
    (0u32..200, 0u32..40).prop_map(|(start, len)| {
        Range::new(Asn::new(start), Asn::new(start + len)).expect("ordered bounds")
    })
}

fn ipv4_range() -> impl Strategy<Value = Range<Ipv4>> {
    (any::<u32>(), any::<u32>()).prop_map(|(a, b)| {
        Range::new(Ipv4::new(a.min(b)), Ipv4::new(a.max(b))).expect("ordered bounds")
    })
}

fn ipv6_range() -> impl Strategy<Value = Range<Ipv6>> {
    (any::<u128>(), any::<u128>()).prop_map(|(a, b)| {
        Range::new(Ipv6::new(a.min(b)), Ipv6::new(a.max(b))).expect("ordered bounds")
    })
}

#[derive(Debug, Clone)]
enum Op {
    Add(Range<Asn>),
    Remove(Range<Asn>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => small_asn_range().prop_map(Op::Add),
        1 => small_asn_range().prop_map(Op::Remove),
    ]
}

fn covered_values(set: &DisjointRangeSet<Asn>) -> Vec<u32> {
    set.iter()
        .flat_map(|range| range.iter())
        .map(Asn::value)
        .collect()
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in small_asn_range(), b in small_asn_range()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        prop_assert!(a.contains(&a));
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn intersection_takes_inner_bounds(a in small_asn_range(), b in small_asn_range()) {
        match a.intersection(&b) {
            Ok(common) => {
                prop_assert!(a.overlaps(&b));
                prop_assert_eq!(common.start(), a.start().max(b.start()));
                prop_assert_eq!(common.end(), a.end().min(b.end()));
            }
            Err(_) => prop_assert!(!a.overlaps(&b)),
        }
    }

    #[test]
    fn exclude_matches_pointwise_difference(a in small_asn_range(), b in small_asn_range()) {
        let pieces = a.exclude(&b).expect("no boundary crossing in the small space");
        prop_assert!(pieces.len() <= 2);
        let kept: Vec<u32> = pieces.iter().flat_map(|p| p.iter()).map(Asn::value).collect();
        let expected: Vec<u32> = a
            .iter()
            .filter(|value| !b.contains_value(*value))
            .map(Asn::value)
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn ipv4_decomposition_round_trips(range in ipv4_range()) {
        let prefixes = range.split_into_prefixes();
        prop_assert!(prefixes.len() <= 62);
        prop_assert!(prefixes.iter().all(|p| p.is_legal_prefix()));

        let mut merged = prefixes[0];
        for window in prefixes.windows(2) {
            prop_assert!(window[0].is_consecutive(&window[1]));
        }
        for prefix in &prefixes[1..] {
            merged = merged.merge(prefix).expect("blocks are consecutive");
        }
        prop_assert_eq!(merged, range);
    }

    #[test]
    fn ipv6_decomposition_round_trips(range in ipv6_range()) {
        let prefixes = range.split_into_prefixes();
        prop_assert!(prefixes.len() <= 254);
        prop_assert!(prefixes.iter().all(|p| p.is_legal_prefix()));
        prop_assert_eq!(prefixes[0].start(), range.start());
        prop_assert_eq!(prefixes[prefixes.len() - 1].end(), range.end());
        for window in prefixes.windows(2) {
            prop_assert_eq!(window[0].end().next().expect("not last"), window[1].start());
        }
    }

    #[test]
    fn adding_twice_is_idempotent(ranges in proptest::collection::vec(small_asn_range(), 1..20)) {
        let once: DisjointRangeSet<Asn> = ranges.iter().copied().collect();
        let mut twice = once.clone();
        twice.add_all(ranges.iter().copied());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn set_stays_normalized(ops in proptest::collection::vec(op(), 1..40)) {
        let mut set = DisjointRangeSet::new();
        let mut model = vec![false; 250];
        for step in &ops {
            match step {
                Op::Add(range) => {
                    set.add(*range);
                    for value in range.iter() {
                        model[value.value() as usize] = true;
                    }
                }
                Op::Remove(range) => {
                    let changed = set.remove(range).expect("remove succeeds");
                    let mut had_any = false;
                    for value in range.iter() {
                        had_any |= model[value.value() as usize];
                        model[value.value() as usize] = false;
                    }
                    prop_assert_eq!(changed, had_any);
                }
            }
            assert_normalized(&set);
        }

        let expected: Vec<u32> = model
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(|(value, _)| value as u32)
            .collect();
        prop_assert_eq!(covered_values(&set), expected);
    }

    #[test]
    fn contains_agrees_with_members(
        ranges in proptest::collection::vec(small_asn_range(), 1..10),
        probe in small_asn_range(),
    ) {
        let set: DisjointRangeSet<Asn> = ranges.into_iter().collect();
        let expected = set.iter().any(|member| member.contains(&probe));
        prop_assert_eq!(set.contains(&probe), expected);
    }

    #[test]
    fn intersection_is_pointwise(
        left in proptest::collection::vec(small_asn_range(), 1..8),
        right in proptest::collection::vec(small_asn_range(), 1..8),
    ) {
        let left: DisjointRangeSet<Asn> = left.into_iter().collect();
        let right: DisjointRangeSet<Asn> = right.into_iter().collect();
        let common = left.intersection(&right);
        assert_normalized(&common);

        let expected: Vec<u32> = covered_values(&left)
            .into_iter()
            .filter(|value| right.contains_value(Asn::new(*value)))
            .collect();
        prop_assert_eq!(covered_values(&common), expected);
    }
}
