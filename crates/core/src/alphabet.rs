//! The symbol alphabet guaranteed to receive codes.
//!
//! Every fit seeds its frequency table with each alphabet symbol, so any
//! in-alphabet symbol can be encoded later even if the training corpus never
//! contained it.

use std::collections::BTreeSet;

/// Number of symbols in [`Alphabet::base`]: 26 letters, 10 digits, 32 punctuation marks.
pub const BASE_ALPHABET_LEN: usize = 68;

/// An ordered, duplicate-free set of symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: BTreeSet<char>,
}

impl Alphabet {
    /// Build an alphabet from arbitrary symbols. Duplicates are collapsed.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Lowercase ASCII letters, ASCII digits and ASCII punctuation.
    pub fn base() -> Self {
        let symbols = ('a'..='z')
            .chain('0'..='9')
            .chain((0x21u8..=0x7e).map(char::from).filter(|c| c.is_ascii_punctuation()));
        Self::new(symbols)
    }

    /// An alphabet with no symbols. Fitting with it and an empty corpus fails.
    pub fn empty() -> Self {
        Self {
            symbols: BTreeSet::new(),
        }
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate symbols in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::base()
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self::new(iter)
    }
}
