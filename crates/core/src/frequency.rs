//! Symbol frequency counting.
//!
//! Counts start at 1 for every alphabet symbol rather than 0, then each
//! occurrence in the corpus adds one. The seeded counts keep every alphabet
//! symbol in the tree.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::alphabet::Alphabet;
use crate::error::{CorpusError, Result};

/// Training input: a single string or an ordered list of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corpus {
    Text(String),
    Records(Vec<String>),
}

impl Corpus {
    /// Interpret a JSON value as a corpus.
    ///
    /// # Errors
    /// `CorpusError::InvalidInputKind` unless the value is a string or an
    /// array whose elements are all strings.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Corpus::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(CorpusError::InvalidInputKind {
                        found: json_kind(other),
                    }
                    .into()),
                })
                .collect::<Result<Vec<_>>>()
                .map(Corpus::Records),
            other => Err(CorpusError::InvalidInputKind {
                found: json_kind(other),
            }
            .into()),
        }
    }

    /// Iterate records. A `Text` corpus is a single record.
    pub fn records(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Corpus::Text(text) => Box::new(std::iter::once(text.as_str())),
            Corpus::Records(records) => Box::new(records.iter().map(String::as_str)),
        }
    }

    /// Copy of this corpus with surrounding whitespace removed from each record.
    pub fn trimmed(&self) -> Corpus {
        match self {
            Corpus::Text(text) => Corpus::Text(text.trim().to_string()),
            Corpus::Records(records) => {
                Corpus::Records(records.iter().map(|r| r.trim().to_string()).collect())
            }
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            Corpus::Text(_) => 1,
            Corpus::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<&str> for Corpus {
    fn from(text: &str) -> Self {
        Corpus::Text(text.to_string())
    }
}

impl From<String> for Corpus {
    fn from(text: String) -> Self {
        Corpus::Text(text)
    }
}

impl From<Vec<String>> for Corpus {
    fn from(records: Vec<String>) -> Self {
        Corpus::Records(records)
    }
}

impl From<Vec<&str>> for Corpus {
    fn from(records: Vec<&str>) -> Self {
        Corpus::Records(records.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Corpus {
    fn from(records: &[&str]) -> Self {
        Corpus::Records(records.iter().map(|r| r.to_string()).collect())
    }
}

/// Occurrence count per symbol, ordered by symbol.
///
/// Immutable once built; the only constructors are [`count_with`] and
/// [`FrequencyTable::from_counts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<char, u64>,
}

impl FrequencyTable {
    /// Build a table directly from counts.
    pub fn from_counts<I: IntoIterator<Item = (char, u64)>>(counts: I) -> Self {
        Self {
            counts: counts.into_iter().collect(),
        }
    }

    pub fn get(&self, symbol: char) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate `(symbol, count)` in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

/// Count symbols over `corpus`, seeded with the base alphabet.
pub fn count(corpus: &Corpus) -> FrequencyTable {
    count_with(&Alphabet::base(), corpus)
}

/// Count symbols over `corpus`, seeding every `alphabet` symbol with 1.
pub fn count_with(alphabet: &Alphabet, corpus: &Corpus) -> FrequencyTable {
    let mut counts: BTreeMap<char, u64> = alphabet.iter().map(|s| (s, 1)).collect();

    for record in corpus.records() {
        for symbol in record.chars() {
            *counts.entry(symbol).or_insert(0) += 1;
        }
    }

    FrequencyTable { counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::BASE_ALPHABET_LEN;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_alphabet_seeded_with_one() {
        let table = count(&Corpus::Records(Vec::new()));
        assert_eq!(table.len(), BASE_ALPHABET_LEN);
        assert!(table.iter().all(|(_, c)| c == 1));
    }

    #[test]
    fn test_occurrences_added() {
        let table = count(&Corpus::from(vec!["aab", "b"]));
        assert_eq!(table.get('a'), Some(3));
        assert_eq!(table.get('b'), Some(3));
        assert_eq!(table.get('c'), Some(1));
    }

    #[test]
    fn test_out_of_alphabet_symbols_counted() {
        let table = count(&Corpus::from("hi there"));
        assert_eq!(table.get(' '), Some(1));
        assert_eq!(table.get('h'), Some(3));
        assert_eq!(table.len(), BASE_ALPHABET_LEN + 1);
    }

    #[test]
    fn test_text_and_records_agree() {
        let text = count(&Corpus::from("abc"));
        let records = count(&Corpus::from(vec!["a", "bc"]));
        assert_eq!(text, records);
    }

    #[test]
    fn test_custom_alphabet() {
        let alphabet = Alphabet::new(['x']);
        let table = count_with(&alphabet, &Corpus::from("xx"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get('x'), Some(3));
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_from_json_string_and_array() {
        assert_eq!(
            Corpus::from_json(&json!("abc")).unwrap(),
            Corpus::Text("abc".to_string())
        );
        assert_eq!(
            Corpus::from_json(&json!(["a", "b"])).unwrap(),
            Corpus::from(vec!["a", "b"])
        );
    }

    #[test]
    fn test_from_json_invalid_kind() {
        for value in [json!(42), json!({"a": "b"}), json!(null), json!(["a", 1])] {
            let result = Corpus::from_json(&value);
            assert!(matches!(
                result,
                Err(Error::Corpus(CorpusError::InvalidInputKind { .. }))
            ));
        }
    }

    #[test]
    fn test_trimmed() {
        let corpus = Corpus::from(vec!["  a b ", "\tc\n"]).trimmed();
        assert_eq!(corpus, Corpus::from(vec!["a b", "c"]));
        assert_eq!(corpus.len(), 2);
    }
}
