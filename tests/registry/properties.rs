//! Property tests for index contents and ordering

use crate::common::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn two_level() -> CompositeIndex<usize> {
    CompositeIndex::new(
        "pairs",
        vec![KeyType::of::<TagKey>(), KeyType::of::<YearKey>()],
    )
    .unwrap()
}

fn keys(tag: &str, year: i64) -> KeySequence {
    KeySequence::new()
        .with(&TagKey(tag.to_string()))
        .with(&YearKey(year))
}

proptest! {
    #[test]
    fn size_counts_distinct_sequences(
        pairs in prop::collection::vec(("[a-d]{1,2}", -20i64..20), 0..60)
    ) {
        let mut index = two_level();
        let mut distinct = BTreeSet::new();
        for (n, (tag, year)) in pairs.iter().enumerate() {
            let inserted = index.put(n, &keys(tag, *year)).unwrap();
            prop_assert_eq!(inserted, distinct.insert((tag.clone(), *year)));
        }
        prop_assert_eq!(index.size(), distinct.len());
    }

    #[test]
    fn select_all_is_sorted_by_full_sequence(
        pairs in prop::collection::btree_set(("[a-d]{1,2}", -20i64..20), 0..40)
    ) {
        let mut index = two_level();
        let pairs: Vec<(String, i64)> = pairs.into_iter().collect();
        // insert in reverse so order cannot come from insertion
        for (n, (tag, year)) in pairs.iter().enumerate().rev() {
            prop_assert!(index.put(n, &keys(tag, *year)).unwrap());
        }
        let all: Vec<usize> = index.select_all().into_iter().copied().collect();
        let expected: Vec<usize> = (0..pairs.len()).collect();
        prop_assert_eq!(all, expected);
    }

    #[test]
    fn wildcard_query_equals_select_all(
        pairs in prop::collection::vec(("[a-d]{1,2}", -20i64..20), 0..40)
    ) {
        let mut index = two_level();
        for (n, (tag, year)) in pairs.iter().enumerate() {
            index.put(n, &keys(tag, *year)).unwrap();
        }
        let all = index.select_all();
        prop_assert_eq!(index.get(&KeySequence::new()).unwrap(), all.clone());
        prop_assert_eq!(index.get(&KeySequence::new().wildcard().wildcard()).unwrap(), all);
    }

    #[test]
    fn fully_specified_get_returns_the_first_value_put(
        pairs in prop::collection::vec(("[a-d]{1,2}", -20i64..20), 1..40)
    ) {
        let mut index = two_level();
        for (n, (tag, year)) in pairs.iter().enumerate() {
            index.put(n, &keys(tag, *year)).unwrap();
        }
        for (tag, year) in &pairs {
            let first = pairs.iter().position(|(t, y)| t == tag && y == year).unwrap();
            prop_assert_eq!(index.get(&keys(tag, *year)).unwrap(), vec![&first]);
        }
        prop_assert!(index.get(&keys("zz", 0)).unwrap().is_empty());
    }
}
