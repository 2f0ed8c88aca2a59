//! Huffman tree construction and code tables.
//!
//! # Construction
//!
//! 1. One leaf per symbol, weighted by its frequency, goes into a min-heap.
//! 2. The two lightest nodes are popped and merged under a new internal node
//!    whose weight is their sum. The first popped node becomes the left child
//!    (bit `0`), the second the right child (bit `1`).
//! 3. Merging repeats until a single root remains.
//!
//! # Tie-breaking
//!
//! Heap entries are totally ordered by `(weight, sequence)`. Leaves receive
//! sequence numbers in ascending symbol order; each internal node takes the
//! next number when it is created. Among equal weights the lower sequence is
//! popped first, so the same frequency table always yields the same codes.
//!
//! # Code assignment
//!
//! Codes are the left/right path from the root to each leaf. Because only
//! leaves carry symbols, the result is prefix-free. A tree with a single leaf
//! assigns that symbol the one-bit code `"0"`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use tracing::{debug, trace};

use crate::error::{CodecError, HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// A node of the Huffman tree. Internal nodes always own exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Leaf {
        symbol: char,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn weight(&self) -> u64 {
        match self {
            TreeNode::Leaf { weight, .. } | TreeNode::Internal { weight, .. } => *weight,
        }
    }
}

/// Heap wrapper giving min-heap behavior over `(weight, sequence)`.
#[derive(Debug)]
struct HeapEntry {
    weight: u64,
    sequence: usize,
    node: TreeNode,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// A fully merged Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: TreeNode,
    leaves: usize,
}

impl CodeTree {
    /// Build the tree from a frequency table.
    ///
    /// # Errors
    /// `HuffmanError::EmptyAlphabet` if the table has no symbols.
    pub fn build(freq: &FrequencyTable) -> Result<Self> {
        if freq.is_empty() {
            return Err(HuffmanError::EmptyAlphabet.into());
        }

        let mut heap: BinaryHeap<HeapEntry> = freq
            .iter()
            .enumerate()
            .map(|(sequence, (symbol, weight))| HeapEntry {
                weight,
                sequence,
                node: TreeNode::Leaf { symbol, weight },
            })
            .collect();

        let leaves = heap.len();
        let mut next_sequence = leaves;

        while heap.len() > 1 {
            let (Some(first), Some(second)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let weight = first.weight + second.weight;
            trace!(
                left = first.weight,
                right = second.weight,
                merged = weight,
                "merging nodes"
            );
            heap.push(HeapEntry {
                weight,
                sequence: next_sequence,
                node: TreeNode::Internal {
                    weight,
                    left: Box::new(first.node),
                    right: Box::new(second.node),
                },
            });
            next_sequence += 1;
        }

        let root = heap
            .pop()
            .map(|entry| entry.node)
            .ok_or(HuffmanError::EmptyAlphabet)?;

        debug!(leaves, weight = root.weight(), "built huffman tree");
        Ok(Self { root, leaves })
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Number of leaves (distinct symbols).
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Total weight at the root.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// Walk the tree and assign a code to every leaf.
    ///
    /// Uses an explicit stack so deep, skewed trees cannot overflow the call stack.
    pub fn code_table(&self) -> CodeTable {
        let mut symbol_to_code = BTreeMap::new();
        let mut code_to_symbol = BTreeMap::new();

        let mut stack: Vec<(&TreeNode, String)> = vec![(&self.root, String::new())];
        while let Some((node, prefix)) = stack.pop() {
            match node {
                TreeNode::Leaf { symbol, .. } => {
                    let code = if prefix.is_empty() {
                        "0".to_string()
                    } else {
                        prefix
                    };
                    code_to_symbol.insert(code.clone(), *symbol);
                    symbol_to_code.insert(*symbol, code);
                }
                TreeNode::Internal { left, right, .. } => {
                    let mut right_prefix = prefix.clone();
                    right_prefix.push('1');
                    stack.push((right, right_prefix));

                    let mut left_prefix = prefix;
                    left_prefix.push('0');
                    stack.push((left, left_prefix));
                }
            }
        }

        CodeTable::from_parts(symbol_to_code, code_to_symbol)
    }
}

/// Build a code table straight from frequencies.
pub fn build(freq: &FrequencyTable) -> Result<CodeTable> {
    Ok(CodeTree::build(freq)?.code_table())
}

/// Bidirectional symbol/code mapping.
///
/// # Invariants
/// - Both maps hold the same pairs
/// - Every code is non-empty and made of `'0'`/`'1'`
/// - No code is a prefix of another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    symbol_to_code: BTreeMap<char, String>,
    code_to_symbol: BTreeMap<String, char>,
    max_code_len: usize,
}

impl CodeTable {
    fn from_parts(
        symbol_to_code: BTreeMap<char, String>,
        code_to_symbol: BTreeMap<String, char>,
    ) -> Self {
        let max_code_len = symbol_to_code.values().map(String::len).max().unwrap_or(0);
        Self {
            symbol_to_code,
            code_to_symbol,
            max_code_len,
        }
    }

    /// Rebuild a table from previously exported maps.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyAlphabet` if both maps are empty
    /// - `HuffmanError::InconsistentCodeTable` if the maps disagree, a code is
    ///   empty or non-binary, or the codes are not prefix-free
    pub fn from_maps(
        symbol_to_code: BTreeMap<char, String>,
        code_to_symbol: BTreeMap<String, char>,
    ) -> Result<Self> {
        if symbol_to_code.is_empty() && code_to_symbol.is_empty() {
            return Err(HuffmanError::EmptyAlphabet.into());
        }
        if symbol_to_code.len() != code_to_symbol.len() {
            return Err(inconsistent(format!(
                "{} symbols but {} codes",
                symbol_to_code.len(),
                code_to_symbol.len()
            )));
        }

        for (&symbol, code) in &symbol_to_code {
            if code.is_empty() {
                return Err(inconsistent(format!("symbol {symbol:?} has an empty code")));
            }
            if let Some(bad) = code.chars().find(|c| *c != '0' && *c != '1') {
                return Err(inconsistent(format!(
                    "code for {symbol:?} contains {bad:?}"
                )));
            }
            if code_to_symbol.get(code) != Some(&symbol) {
                return Err(inconsistent(format!(
                    "code {code} for {symbol:?} has no matching inverse entry"
                )));
            }
        }

        let table = Self::from_parts(symbol_to_code, code_to_symbol);
        if let Some((shorter, longer)) = table.prefix_violation() {
            return Err(inconsistent(format!("code {shorter} is a prefix of {longer}")));
        }
        Ok(table)
    }

    /// Code for `symbol`, if it has one.
    pub fn code(&self, symbol: char) -> Option<&str> {
        self.symbol_to_code.get(&symbol).map(String::as_str)
    }

    /// Symbol for an exact code.
    pub fn symbol(&self, code: &str) -> Option<char> {
        self.code_to_symbol.get(code).copied()
    }

    pub fn symbol_to_code(&self) -> &BTreeMap<char, String> {
        &self.symbol_to_code
    }

    pub fn code_to_symbol(&self) -> &BTreeMap<String, char> {
        &self.code_to_symbol
    }

    /// Number of coded symbols.
    pub fn len(&self) -> usize {
        self.symbol_to_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_to_code.is_empty()
    }

    /// Length of the longest code.
    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    /// Iterate `(symbol, code)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.symbol_to_code.iter().map(|(&s, c)| (s, c.as_str()))
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.prefix_violation().is_none()
    }

    // In lexicographic order, a prefix sorts directly before some code that extends it.
    fn prefix_violation(&self) -> Option<(&str, &str)> {
        let codes: Vec<&str> = self.code_to_symbol.keys().map(String::as_str).collect();
        codes
            .windows(2)
            .find(|pair| pair[1].starts_with(pair[0]))
            .map(|pair| (pair[0], pair[1]))
    }

    /// Greedily decode a bit sequence.
    ///
    /// Consumes the shortest prefix that matches a code, emits its symbol and
    /// continues with the remainder until the bits are exhausted.
    ///
    /// # Errors
    /// `CodecError::MalformedCode` with the bit position where the unmatched
    /// code started.
    pub fn decode_bits<I>(&self, bits: I) -> Result<String>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut decoded = String::new();
        let mut pending = String::with_capacity(self.max_code_len);
        let mut code_start = 0;

        for (position, bit) in bits.into_iter().enumerate() {
            pending.push(if bit { '1' } else { '0' });

            if let Some(symbol) = self.symbol(&pending) {
                decoded.push(symbol);
                pending.clear();
                code_start = position + 1;
            } else if pending.len() >= self.max_code_len {
                return Err(CodecError::MalformedCode {
                    position: code_start,
                }
                .into());
            }
        }

        if !pending.is_empty() {
            return Err(CodecError::MalformedCode {
                position: code_start,
            }
            .into());
        }

        Ok(decoded)
    }
}

fn inconsistent(reason: String) -> crate::error::Error {
    HuffmanError::InconsistentCodeTable { reason }.into()
}
