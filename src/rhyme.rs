//! Rhyme-scheme analysis of sonnets, using [`CompactTrie`] as the word
//! store.
//!
//! A phonetic dictionary maps each word to its phonemes. Two words rhyme
//! when their phonemes agree from the last vowel phoneme onwards. Each line
//! of a sonnet is reduced to its last word, and each distinct rhyme gets a
//! letter in order of first appearance, giving schemes such as `ABAB`.
//!
//! ```
//! use masktrie::rhyme::{most_common_rhyme_scheme, RhymeDictionary};
//!
//! let dictionary = RhymeDictionary::from_reader(
//!     "DAY  D EY\nMAY  M EY\nNIGHT  N AY T\nLIGHT  L AY T\n".as_bytes(),
//! )
//! .unwrap();
//!
//! let sonnets = "By day\nBy night\nIn May\nNo light\n\nAll day\nAll May\n";
//! let scheme = most_common_rhyme_scheme(sonnets.as_bytes(), &dictionary).unwrap();
//! assert_eq!(scheme.as_deref(), Some("ABAB"));
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::alphabet::is_valid_symbol;
use crate::error::{RhymeError, TrieError};
use crate::trie::CompactTrie;

const PHONEME_VOWELS: &[u8] = b"AEIOU";

/// The last word of a line, or `None` if the line has no letters.
///
/// The word ends at the last ASCII letter and starts at the first letter
/// after the space preceding it, so trailing punctuation and leading quotes
/// are dropped while inner apostrophes and hyphens are kept.
pub fn last_word(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    let end = bytes.iter().rposition(u8::is_ascii_alphabetic)? + 1;
    let start = bytes[..end]
        .iter()
        .rposition(|&b| b == b' ')
        .map_or(0, |space| space + 1);
    let start = start + bytes[start..end].iter().position(u8::is_ascii_alphabetic)?;
    Some(&line[start..end])
}

/// The rhyming part of a phoneme string: everything from the last phoneme
/// which starts with a vowel. The whole string if there is no such phoneme.
pub fn rhyme_suffix(phonemes: &str) -> &str {
    let bytes = phonemes.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| bytes[i - 1] == b' ' && PHONEME_VOWELS.contains(&bytes[i]))
        .map_or(phonemes, |i| &phonemes[i..])
}

/// Read one line into `buf`, or `None` at end of input. Bytes which aren't
/// UTF-8 are replaced rather than failing the read, so such a word just won't
/// be found.
fn read_line_lossy<'b, R: BufRead>(
    reader: &mut R,
    buf: &'b mut Vec<u8>,
) -> io::Result<Option<Cow<'b, str>>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(buf)))
}

/// Store `key`, or warn and report `false` if it can't be keyed.
fn store(trie: &mut CompactTrie<u32>, key: &str, value: u32) -> Result<bool, RhymeError> {
    match trie.insert(key.chars(), value) {
        Ok(_) => Ok(true),
        Err(e @ TrieError::InvalidSymbol { .. }) => {
            warn!("skipping {:?}: {}", key, e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Maps uppercase words to rhyme ids.
#[derive(Clone, Debug, Default)]
pub struct RhymeDictionary {
    words: CompactTrie<u32>,
    rhymes: u32,
}

impl RhymeDictionary {
    /// Load a phonetic dictionary file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RhymeError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a phonetic dictionary from lines of the form `WORD PH ON EM ES`.
    ///
    /// Rhyme ids are handed out from 0 in order of first appearance. Lines
    /// which can't be stored are skipped with a warning.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, RhymeError> {
        let mut words = CompactTrie::new();
        let mut rhyme_ids = CompactTrie::new();
        let mut rhymes = 0;
        let mut buf = Vec::new();
        let mut number = 0;

        while let Some(line) = read_line_lossy(&mut reader, &mut buf)? {
            number += 1;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let Some((word, phonemes)) = line.split_once(' ') else {
                warn!("line {}: no phonemes for {:?}", number, line);
                continue;
            };
            if let Some(symbol) = word.chars().find(|c| !is_valid_symbol(*c)) {
                warn!("line {}: skipping {:?}, invalid symbol {:?}", number, word, symbol);
                continue;
            }
            let rhyme = rhyme_suffix(phonemes);

            let id = match rhyme_ids.get(rhyme.chars()) {
                Some(&id) => id,
                None => {
                    let id = rhymes;
                    if !store(&mut rhyme_ids, rhyme, id)? {
                        continue;
                    }
                    rhymes += 1;
                    id
                }
            };
            store(&mut words, word, id)?;
        }

        debug!(
            "loaded {} words with {} distinct rhymes ({} nodes)",
            words.len(),
            rhymes,
            words.node_count()
        );
        Ok(Self { words, rhymes })
    }

    /// The rhyme id of an uppercase word.
    pub fn rhyme_id(&self, word: &str) -> Option<u32> {
        self.words.get(word.chars()).copied()
    }

    /// How many words does the dictionary contain?
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Is the dictionary empty?
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// How many distinct rhymes were seen?
    pub fn rhyme_count(&self) -> usize {
        self.rhymes as usize
    }
}

/// Iterator over the rhyme schemes of consecutive sonnets.
///
/// Sonnets are runs of lines containing a word, separated by lines which
/// don't.
#[derive(Debug)]
pub struct RhymeSchemes<'d, R> {
    reader: R,
    dictionary: &'d RhymeDictionary,
    line: Vec<u8>,
    done: bool,
}

impl<'d, R: BufRead> RhymeSchemes<'d, R> {
    pub fn new(reader: R, dictionary: &'d RhymeDictionary) -> Self {
        Self {
            reader,
            dictionary,
            line: Vec::new(),
            done: false,
        }
    }

    fn next_scheme(&mut self) -> Result<Option<String>, RhymeError> {
        let mut scheme = String::new();
        let mut letters: HashMap<u32, char> = HashMap::new();
        let mut next_letter = b'A';
        let mut fresh = || {
            let letter = next_letter as char;
            next_letter = next_letter.saturating_add(1);
            letter
        };

        loop {
            let Some(line) = read_line_lossy(&mut self.reader, &mut self.line)? else {
                break;
            };
            let Some(word) = last_word(&line) else {
                if scheme.is_empty() {
                    continue;
                }
                break;
            };
            let word = word.to_ascii_uppercase();
            let letter = match self.dictionary.rhyme_id(&word) {
                Some(id) => *letters.entry(id).or_insert_with(&mut fresh),
                None => {
                    warn!("cannot find rhyme mapping for {}", word);
                    fresh()
                }
            };
            scheme.push(letter);
        }

        Ok((!scheme.is_empty()).then_some(scheme))
    }
}

impl<R: BufRead> Iterator for RhymeSchemes<'_, R> {
    type Item = Result<String, RhymeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_scheme() {
            Ok(Some(scheme)) => Some(Ok(scheme)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// The rhyme scheme which occurs most often, or `None` if there are no
/// sonnets. On a tie the scheme which reached the count first wins.
pub fn most_common_rhyme_scheme<R: BufRead>(
    reader: R,
    dictionary: &RhymeDictionary,
) -> Result<Option<String>, RhymeError> {
    let mut frequency = CompactTrie::new();
    let mut best = None;
    let mut highest = 0;

    for scheme in RhymeSchemes::new(reader, dictionary) {
        let scheme = scheme?;
        let count = frequency.get(scheme.chars()).map_or(1, |c| c + 1);
        if !store(&mut frequency, &scheme, count)? {
            continue;
        }
        if count > highest {
            highest = count;
            best = Some(scheme);
        }
    }
    Ok(best)
}
