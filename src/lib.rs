//! Provides a compact Trie implementation for storing keys composed of
//! symbols from a small fixed alphabet. Every stored key has an associated
//! value.
//!
//! The alphabet is the uppercase letters `A`-`Z` plus `_`, `.`, `-`, `'`
//! and space. Each symbol owns one bit of a `u32`, so a node records which
//! children it has in a single mask and keeps the children themselves in a
//! densely packed [`std::vec::Vec`]. A node with two children pays for two
//! children, not thirty-two.
//!
//! Keys are supplied as iterators of `char`, in the same way as any other
//! sequence of atoms:
//!
//! ```
//! use masktrie::trie::CompactTrie;
//!
//! let mut trie = CompactTrie::new();
//! trie.insert("GOOD".chars(), 12).unwrap();
//! trie.insert("W".chars(), -1).unwrap();
//!
//! assert_eq!(trie.get("GOOD".chars()), Some(&12));
//! assert_eq!(trie.get("GOO".chars()), None);
//! assert!(trie.insert("123".chars(), 999).is_err());
//! ```
//!
//! Modules:
//! * alphabet : [`crate::alphabet`]
//! * trie : [`crate::trie`]
//! * rhyme : [`crate::rhyme`]
//!
//! Typical usages for this data structure:
//!  - Dictionaries keyed by normalized words
//!  - Symbol tables
//!  - Counting occurrences of short uppercase strings

pub mod alphabet;

pub mod error;

pub mod rhyme;

pub mod trie;

pub use error::{Result, RhymeError, TrieError};
pub use trie::CompactTrie;

#[cfg(test)]
mod proptests;
