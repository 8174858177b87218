use crate::alphabet::{symbol_to_bit, ALPHABET};
use crate::trie::Node;
use crate::{CompactTrie, TrieError};

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Walk every node, checking density and the tracked counters, and return the number of
/// nodes and stored values found.
fn validate_trie<V>(t: &CompactTrie<V>) -> (usize, usize) {
    let mut stack: Vec<&Node<V>> = vec![t.root()];
    let mut nodes = 0usize;
    let mut values = 0usize;
    let mut root = true;

    while let Some(node) = stack.pop() {
        nodes += 1;
        assert_eq!(node.child_mask & 1, 0, "reserved bit must stay clear");
        assert_eq!(
            node.children.len(),
            node.child_mask.count_ones() as usize,
            "children must be dense"
        );
        if node.value.is_some() {
            values += 1;
        } else if !root {
            assert_ne!(node.child_mask, 0, "non-root dead end without a value");
        }
        root = false;
        stack.extend(node.children.iter());
    }

    assert_eq!(nodes, t.node_count(), "tracked node count must match");
    assert_eq!(values, t.len(), "tracked key count must match");
    (nodes, values)
}

fn symbol() -> impl Strategy<Value = char> {
    proptest::sample::select(ALPHABET.to_vec())
}

fn key() -> impl Strategy<Value = String> {
    proptest::collection::vec(symbol(), 0..12).prop_map(|v| v.into_iter().collect())
}

/// Keys drawn from a handful of symbols, so that prefixes are shared often.
fn dense_key() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(vec!['A', 'B', '-', ' ']), 0..6)
        .prop_map(|v| v.into_iter().collect())
}

fn invalid_key() -> impl Strategy<Value = String> {
    (key(), any::<char>(), key())
        .prop_filter("needs a symbol outside the alphabet", |(_, c, _)| {
            symbol_to_bit(*c).is_none()
        })
        .prop_map(|(head, c, tail)| format!("{head}{c}{tail}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn round_trip_matches_btreemap(entries in proptest::collection::vec((key(), any::<i32>()), 0..64)) {
        let mut trie = CompactTrie::new();
        let mut model = BTreeMap::new();
        for (k, v) in &entries {
            let previous = trie.insert(k.chars(), *v).unwrap();
            prop_assert_eq!(previous, model.insert(k.clone(), *v));
        }
        for (k, v) in &model {
            prop_assert_eq!(trie.get(k.chars()), Some(v));
        }
        prop_assert_eq!(trie.len(), model.len());
        validate_trie(&trie);
    }

    #[test]
    fn density_holds_after_every_insert(keys in proptest::collection::vec(dense_key(), 0..64)) {
        let mut trie = CompactTrie::new();
        for (i, k) in keys.iter().enumerate() {
            trie.insert(k.chars(), i).unwrap();
            validate_trie(&trie);
        }
    }

    #[test]
    fn overwrite_keeps_latest_value(k in key(), first in any::<i32>(), second in any::<i32>()) {
        let mut trie = CompactTrie::new();
        trie.insert(k.chars(), first).unwrap();
        let nodes = trie.node_count();
        prop_assert_eq!(trie.insert(k.chars(), second).unwrap(), Some(first));
        prop_assert_eq!(trie.get(k.chars()), Some(&second));
        prop_assert_eq!(trie.node_count(), nodes);
        prop_assert_eq!(trie.len(), 1);
    }

    #[test]
    fn invalid_keys_are_rejected_and_never_found(
        existing in proptest::collection::vec(key(), 0..16),
        bad in invalid_key(),
    ) {
        let mut trie = CompactTrie::new();
        for k in &existing {
            trie.insert(k.chars(), 1).unwrap();
        }
        let before = trie.clone();
        let rejected = matches!(
            trie.insert(bad.chars(), 2),
            Err(TrieError::InvalidSymbol { .. })
        );
        prop_assert!(rejected);
        prop_assert_eq!(trie.get(bad.chars()), None);
        prop_assert_eq!(&trie, &before);
        validate_trie(&trie);
    }

    #[test]
    fn prefixes_are_independent(k in key(), tail in key(), a in any::<i32>(), b in any::<i32>()) {
        prop_assume!(!tail.is_empty());
        let long = format!("{k}{tail}");
        let mut trie = CompactTrie::new();
        trie.insert(long.chars(), b).unwrap();
        prop_assert_eq!(trie.get(k.chars()), None);
        trie.insert(k.chars(), a).unwrap();
        prop_assert_eq!(trie.get(k.chars()), Some(&a));
        prop_assert_eq!(trie.get(long.chars()), Some(&b));
        validate_trie(&trie);
    }
}
