//! The fixed alphabet accepted by [`crate::trie::CompactTrie`].
//!
//! Every symbol is assigned one bit position in `1..=31`. Bit 0 is never
//! handed out, so a child mask always fits in a `u32` with room to spare.
//!
//! ```
//! use masktrie::alphabet::symbol_to_bit;
//!
//! assert_eq!(symbol_to_bit('Z'), Some(1));
//! assert_eq!(symbol_to_bit('A'), Some(26));
//! assert_eq!(symbol_to_bit(' '), Some(31));
//! assert_eq!(symbol_to_bit('a'), None);
//! ```

/// Every symbol a key may contain, in ascending bit order.
pub const ALPHABET: [char; 31] = [
    'Z', 'Y', 'X', 'W', 'V', 'U', 'T', 'S', 'R', 'Q', 'P', 'O', 'N', 'M', 'L', 'K', 'J', 'I', 'H',
    'G', 'F', 'E', 'D', 'C', 'B', 'A', '_', '.', '-', '\'', ' ',
];

/// Lowest bit position assigned to a symbol.
pub const MIN_BIT: u32 = 1;

/// Highest bit position assigned to a symbol.
pub const MAX_BIT: u32 = 31;

const LETTERS: u32 = 26;

/// Map a symbol to its bit position, or `None` if the symbol is not part of
/// the alphabet.
///
/// This is the only place the alphabet is defined. Lookup and insertion both
/// go through it.
#[inline]
pub const fn symbol_to_bit(symbol: char) -> Option<u32> {
    match symbol {
        'A'..='Z' => Some('Z' as u32 - symbol as u32 + MIN_BIT),
        '_' => Some(LETTERS + 1),
        '.' => Some(LETTERS + 2),
        '-' => Some(LETTERS + 3),
        '\'' => Some(LETTERS + 4),
        ' ' => Some(LETTERS + 5),
        _ => None,
    }
}

/// Is the symbol part of the alphabet?
#[inline]
pub const fn is_valid_symbol(symbol: char) -> bool {
    symbol_to_bit(symbol).is_some()
}
