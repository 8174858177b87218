//! Provides a compact Trie implementation for storing keys composed of
//! symbols from the fixed [`crate::alphabet`]. Every key has an associated
//! value.
//!
//! A node does not carry a slot for every possible symbol. Instead it keeps a
//! `u32` child mask, with one bit per alphabet symbol, and a `Vec` holding
//! exactly one child per set bit, ordered by bit position. The child for a
//! symbol lives at the rank of its bit: the number of set bits below it.
//!
//! Keys are anything which implements `IntoIterator<Item = char>` with a
//! cloneable iterator, so `&str::chars()`, arrays and vectors all work.
//!
//! Example 1
//! ```
//! use masktrie::trie::CompactTrie;
//!
//! let mut trie = CompactTrie::new();
//! trie.insert("CAT".chars(), 1).unwrap();
//! trie.insert("CATS".chars(), 2).unwrap();
//!
//! assert_eq!(trie.get("CAT".chars()), Some(&1));
//! assert_eq!(trie.get(['C', 'A', 'T', 'S']), Some(&2));
//! assert_eq!(trie.get("CA".chars()), None);
//! assert_eq!(trie.len(), 2);
//! ```
//!
//! Inserting an existing key replaces its value and hands back the old one.
//! Symbols outside the alphabet are rejected on insert, and simply never
//! found on lookup.
//!
//! Example 2
//! ```
//! use masktrie::trie::CompactTrie;
//! use masktrie::TrieError;
//!
//! let mut trie = CompactTrie::new();
//! assert_eq!(trie.insert("GOOD".chars(), 12).unwrap(), None);
//! assert_eq!(trie.insert("GOOD".chars(), 13).unwrap(), Some(12));
//!
//! let err = trie.insert("GO0D".chars(), 0).unwrap_err();
//! assert!(matches!(err, TrieError::InvalidSymbol { symbol: '0', index: 2 }));
//! assert_eq!(trie.get("GO0D".chars()), None);
//! ```

use std::fmt;

use log::{debug, trace};

use crate::alphabet::symbol_to_bit;
use crate::error::{Result, TrieError};

/// Index of the child for `bit` within a dense children array.
#[inline(always)]
fn rank(mask: u32, bit: u32) -> usize {
    (mask & ((1u32 << bit) - 1)).count_ones() as usize
}

pub(crate) struct Node<V> {
    pub(crate) child_mask: u32,
    pub(crate) value: Option<V>,
    pub(crate) children: Vec<Node<V>>,
}

/// Stores keys of alphabet symbols as a tree of bitmask nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct CompactTrie<V = i32> {
    root: Node<V>,
    count: usize,
    nodes: usize,
}

impl<V> Node<V> {
    const fn new() -> Self {
        Self {
            child_mask: 0,
            value: None,
            children: Vec::new(),
        }
    }

    #[inline(always)]
    fn has_child(&self, bit: u32) -> bool {
        self.child_mask & (1 << bit) != 0
    }

    fn child(&self, bit: u32) -> Option<&Node<V>> {
        if !self.has_child(bit) {
            return None;
        }
        self.children.get(rank(self.child_mask, bit))
    }

    /// Return the child for `bit`, creating it first if needed. The flag is
    /// true when a new child was created.
    fn child_or_insert(&mut self, bit: u32) -> Result<(&mut Node<V>, bool)> {
        let index = rank(self.child_mask, bit);
        let created = !self.has_child(bit);
        if created {
            #[cfg(test)]
            growth_budget::spend()?;
            self.children.try_reserve_exact(1)?;
            self.children.insert(index, Node::new());
            self.child_mask |= 1 << bit;
            trace!(
                "grew child for bit {} at index {} ({} children)",
                bit,
                index,
                self.children.len()
            );
        }
        Ok((&mut self.children[index], created))
    }

    /// Detach the child for `bit`, keeping the remaining children dense.
    fn remove_child(&mut self, bit: u32) -> Option<Node<V>> {
        if !self.has_child(bit) {
            return None;
        }
        let index = rank(self.child_mask, bit);
        self.child_mask &= !(1 << bit);
        Some(self.children.remove(index))
    }
}

impl<V> Drop for Node<V> {
    // Flatten the subtree so that very long keys can't exhaust the stack.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl<V: Clone> Node<V> {
    fn clone_shallow(&self) -> Self {
        Self {
            child_mask: self.child_mask,
            value: self.value.clone(),
            children: Vec::with_capacity(self.children.len()),
        }
    }
}

impl<V: Clone> Clone for Node<V> {
    // Depth-first copy with an explicit stack; each frame holds a copy whose
    // children are still being filled in.
    fn clone(&self) -> Self {
        let mut stack: Vec<(&Node<V>, Node<V>)> = vec![];
        let mut current = (self, self.clone_shallow());
        loop {
            let (source, copy) = current;
            match source.children.get(copy.children.len()) {
                Some(child) => {
                    stack.push((source, copy));
                    current = (child, child.clone_shallow());
                }
                None => match stack.pop() {
                    Some((parent_source, mut parent)) => {
                        parent.children.push(copy);
                        current = (parent_source, parent);
                    }
                    None => return copy,
                },
            }
        }
    }
}

impl<V: PartialEq> PartialEq for Node<V> {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.child_mask != b.child_mask || a.value != b.value {
                return false;
            }
            // Equal masks mean equally many children.
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl<V: fmt::Debug> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("child_mask", &format_args!("{:#034b}", self.child_mask))
            .field("value", &self.value)
            .field("children", &self.children.len())
            .finish()
    }
}

impl<V> Default for CompactTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CompactTrie<V> {
    /// Create a new CompactTrie.
    pub const fn new() -> Self {
        Self {
            root: Node::new(),
            count: 0,
            nodes: 1,
        }
    }

    /// Clear the CompactTrie.
    pub fn clear(&mut self) {
        self.root = Node::new();
        self.count = 0;
        self.nodes = 1;
    }

    /// Does the CompactTrie contain the supplied key?
    pub fn contains<K: IntoIterator<Item = char>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// How many keys does the CompactTrie contain?
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Is the CompactTrie empty?
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// How many nodes are allocated, including the root?
    #[inline(always)]
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Get a reference to a key's associated value.
    ///
    /// A key containing a symbol outside the alphabet can never have been
    /// inserted, so it is reported as absent.
    pub fn get<K: IntoIterator<Item = char>>(&self, key: K) -> Option<&V> {
        let mut node = &self.root;
        for symbol in key {
            node = node.child(symbol_to_bit(symbol)?)?;
        }
        node.value.as_ref()
    }

    /// Insert the key and value into the CompactTrie. If the key is already
    /// present the value is replaced. Returns the previously associated
    /// value.
    ///
    /// The whole key is checked against the alphabet before anything is
    /// modified, so a rejected key leaves the trie exactly as it was. The
    /// same holds if growing a node fails.
    pub fn insert<K>(&mut self, key: K, value: V) -> Result<Option<V>>
    where
        K: IntoIterator<Item = char>,
        K::IntoIter: Clone,
    {
        let symbols = key.into_iter();
        if let Err(e) = Self::validate(symbols.clone()) {
            debug!("rejected insert: {}", e);
            return Err(e);
        }
        let bits = symbols.filter_map(symbol_to_bit);

        match Self::descend(&mut self.root, bits.clone(), value) {
            Ok((previous, created)) => {
                self.nodes += created;
                if previous.is_none() {
                    self.count += 1;
                }
                Ok(previous)
            }
            Err((e, first_created)) => {
                if let Some(depth) = first_created {
                    self.prune(bits.take(depth + 1));
                }
                debug!("insert failed while growing the trie: {}", e);
                Err(e)
            }
        }
    }

    /// Walk `bits` from `node`, growing missing children, and store `value`
    /// at the end. On success returns the replaced value and the number of
    /// nodes created. On failure returns the depth of the first node created
    /// by this walk, if any.
    fn descend<I: Iterator<Item = u32>>(
        mut node: &mut Node<V>,
        bits: I,
        value: V,
    ) -> std::result::Result<(Option<V>, usize), (TrieError, Option<usize>)> {
        let mut created = 0;
        let mut first_created = None;
        for (depth, bit) in bits.enumerate() {
            match node.child_or_insert(bit) {
                Ok((child, grown)) => {
                    if grown {
                        created += 1;
                        first_created.get_or_insert(depth);
                    }
                    node = child;
                }
                Err(e) => return Err((e, first_created)),
            }
        }
        Ok((node.value.replace(value), created))
    }

    fn validate<I: Iterator<Item = char>>(symbols: I) -> Result<()> {
        for (index, symbol) in symbols.enumerate() {
            if symbol_to_bit(symbol).is_none() {
                return Err(TrieError::InvalidSymbol { symbol, index });
            }
        }
        Ok(())
    }

    /// Detach the subtree reached by following `bits`. Every bit but the last
    /// must already be present.
    fn prune<I: Iterator<Item = u32>>(&mut self, bits: I) {
        let mut bits = bits.peekable();
        let mut node = &mut self.root;
        while let Some(bit) = bits.next() {
            if bits.peek().is_none() {
                node.remove_child(bit);
                return;
            }
            if !node.has_child(bit) {
                return;
            }
            let index = rank(node.child_mask, bit);
            node = &mut node.children[index];
        }
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Node<V> {
        &self.root
    }
}
