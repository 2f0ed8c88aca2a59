//! huffbatch-core: Huffman prefix codes with fixed-width padded batch output
//!
//! This library fits a Huffman code table on a text corpus and uses it to turn
//! records into rectangular 0/1 matrices (one row per record), then decodes
//! those matrices back losslessly.
//!
//! # Architecture
//!
//! - `alphabet`: the base symbol set that always receives codes
//! - `frequency`: corpus handling and symbol counting
//! - `huffman`: deterministic tree construction and code tables
//! - `bitio`: packing code strings into bytes
//! - `codec`: fit / transform / inverse_transform with padding
//! - `state`: exporting and reloading a fitted codec
//! - `registry`: named collections of codecs
//! - `metrics`: observable batch statistics
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: Equal-weight ties are broken by a fixed order
//! - **Fit once**: Only `fit` mutates a codec; everything else is read-only
//! - **Explicit padding**: Rows carry their true bit length instead of a sentinel

pub mod alphabet;
pub mod bitio;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod metrics;
pub mod registry;
pub mod state;

// Re-export commonly used types
pub use alphabet::Alphabet;
pub use codec::{Codec, CodecOptions, EncodedRecord, PaddedBatch, Transformed};
pub use error::{Error, Result};
pub use frequency::{Corpus, FrequencyTable};
pub use huffman::{CodeTable, CodeTree};
pub use state::CodecState;
