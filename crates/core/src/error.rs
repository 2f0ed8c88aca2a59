//! Error types for huffbatch.
//!
//! Every fallible operation returns a structured error instead of panicking.
//! Callers can match on the domain enum to decide whether a failure is a bad
//! input, an unfitted codec, or corrupted encoded data.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Corpus: the training input has the wrong shape
/// - Huffman: code table construction or reload failures
/// - Codec: encode/transform/decode failures
/// - Bit I/O: packing or unpacking bit sequences
/// - Registry: lookups in a named codec collection
#[derive(Debug, Error)]
pub enum Error {
    /// Corpus shape error (e.g., a JSON number where strings were expected)
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Huffman tree or code table error
    #[error("huffman error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Encoding, padding or decoding error
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Bit packing error
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Named codec lookup error
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Persisted state could not be (de)serialized
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Reader/writer failure while persisting state
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Corpus input errors.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus is neither a string nor a sequence of strings
    #[error("invalid corpus: expected a string or a list of strings, found {found}")]
    InvalidInputKind { found: &'static str },
}

/// Huffman construction errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols at all (cannot build a tree)
    #[error("empty alphabet: cannot build a code table without symbols")]
    EmptyAlphabet,

    /// Persisted maps do not describe a valid prefix code
    #[error("inconsistent code table: {reason}")]
    InconsistentCodeTable { reason: String },
}

/// Codec usage and data errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// encode/transform/decode called before a successful fit
    #[error("codec is not fitted")]
    NotFitted,

    /// Symbol has no code in the fitted table
    #[error("unknown symbol {symbol:?} at position {position}")]
    UnknownSymbol { symbol: char, position: usize },

    /// No code matches the bits starting at `position`
    #[error("malformed code at bit position {position}")]
    MalformedCode { position: usize },

    /// Encoded record is wider than the fitted row width
    #[error("record {index} encodes to {length} bits, exceeding the maximum of {max}")]
    RecordTooLong {
        index: usize,
        length: usize,
        max: usize,
    },

    /// Batch cell holds something other than 0 or 1
    #[error("invalid bit value {value} at position {position}")]
    InvalidBit { value: u8, position: usize },

    /// Row shape disagrees with the batch header
    #[error("row {row} has width {actual}, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Batch carries a different number of rows and stored lengths
    #[error("batch has {rows} rows but {lengths} lengths")]
    LengthCountMismatch { rows: usize, lengths: usize },

    /// Stored unpadded length is wider than the row
    #[error("row {row} claims {length} bits, row width is {width}")]
    LengthExceedsWidth {
        row: usize,
        length: usize,
        width: usize,
    },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the recorded bit length
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Bit string contains a character other than '0' or '1'
    #[error("invalid bit character {ch:?} at position {position}")]
    InvalidBitChar { ch: char, position: usize },

    /// Packed length does not fit in the byte buffer
    #[error("bit length {bit_len} exceeds buffer capacity of {capacity} bits")]
    LengthOverflow { bit_len: usize, capacity: usize },
}

/// Codec registry errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No codec registered under this name
    #[error("codec {0:?} not found")]
    UnknownCodec(String),

    /// A fit was requested without training data
    #[error("no corpus supplied, cannot fit codec {0:?}")]
    MissingCorpus(String),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Return the codec error if this is one, for concise matching in callers.
    pub fn as_codec(&self) -> Option<&CodecError> {
        match self {
            Error::Codec(err) => Some(err),
            _ => None,
        }
    }
}
