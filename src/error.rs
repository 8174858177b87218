use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T, E = TrieError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum TrieError {
    /// A key contained a symbol outside the alphabet.
    #[error("invalid symbol {symbol:?} at index {index}")]
    InvalidSymbol { symbol: char, index: usize },

    /// Growing a node's children failed.
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

#[derive(Error, Debug)]
pub enum RhymeError {
    /// Reading a dictionary or sonnet source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storing into a trie failed for a reason other than the key itself.
    #[error("trie error: {0}")]
    Trie(#[from] TrieError),
}
