//! The fit / transform / inverse_transform codec.
//!
//! A [`Codec`] is fitted once on a training corpus. Fitting counts symbols,
//! builds the Huffman code table and fixes the row width `mx_string`: the
//! longest encoded training record plus a margin (20 bits by default), so
//! slightly longer unseen records still fit without refitting.
//!
//! `transform` encodes records into a [`PaddedBatch`]: every row is exactly
//! `mx_string` bits wide, right-padded with zero bits, and the unpadded bit
//! length of each row is stored next to it. Decoding strips each row back to
//! its stored length instead of searching for a sentinel value.
//!
//! Records that encode to more than `mx_string` bits are skipped and their
//! input indices are reported in [`Transformed::skipped`];
//! [`Codec::transform_strict`] rejects them instead.
//!
//! # Example
//! ```
//! use huffbatch_core::codec::Codec;
//! use huffbatch_core::frequency::Corpus;
//!
//! let corpus = Corpus::from(vec!["how much could a wood chuck", "could chuck wood?"]);
//! let mut codec = Codec::new();
//! let transformed = codec.fit_transform(&corpus).unwrap();
//! assert!(transformed.skipped.is_empty());
//!
//! let decoded = codec.inverse_transform(&transformed.batch).unwrap();
//! assert_eq!(decoded, vec!["how much could a wood chuck", "could chuck wood?"]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::alphabet::Alphabet;
use crate::bitio::{BitReader, BitWriter, PackedRecord};
use crate::error::{BitIoError, CodecError, Error, Result};
use crate::frequency::{self, Corpus, FrequencyTable};
use crate::huffman::{CodeTable, CodeTree};

/// Extra bits added to the longest training record when fixing the row width.
pub const DEFAULT_MARGIN: usize = 20;

/// Fit-time settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Bits added to the longest encoded training record
    pub margin: usize,
    /// Symbols guaranteed a code regardless of the corpus
    pub alphabet: Alphabet,
}

impl CodecOptions {
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            alphabet: Alphabet::base(),
        }
    }
}

/// Requested padding length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadSize {
    /// No padding
    Auto,
    Exact(usize),
}

impl PadSize {
    pub fn resolve(self) -> usize {
        match self {
            PadSize::Auto => 0,
            PadSize::Exact(n) => n,
        }
    }
}

/// `fill` repeated `size` times.
pub fn pad<T: Clone>(size: PadSize, fill: T) -> Vec<T> {
    vec![fill; size.resolve()]
}

/// The unpadded code string for one record.
///
/// Deserialization goes through [`EncodedRecord::from_bits`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEncodedRecord")]
pub struct EncodedRecord {
    bits: String,
}

#[derive(Deserialize)]
struct RawEncodedRecord {
    bits: String,
}

impl TryFrom<RawEncodedRecord> for EncodedRecord {
    type Error = Error;

    fn try_from(raw: RawEncodedRecord) -> Result<Self> {
        Self::from_bits(raw.bits)
    }
}

impl EncodedRecord {
    /// Wrap a `'0'/'1'` string.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitChar` on any other character.
    pub fn from_bits(bits: impl Into<String>) -> Result<Self> {
        let bits = bits.into();
        if let Some((position, ch)) = bits.chars().enumerate().find(|(_, c)| *c != '0' && *c != '1')
        {
            return Err(BitIoError::InvalidBitChar { ch, position }.into());
        }
        Ok(Self { bits })
    }

    /// Rebuild from a packed representation.
    pub fn from_packed(packed: &PackedRecord) -> Self {
        let bits = BitReader::new(packed)
            .map(|bit| if bit { '1' } else { '0' })
            .collect();
        Self { bits }
    }

    pub fn as_str(&self) -> &str {
        &self.bits
    }

    /// Length in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// One integer (0 or 1) per bit.
    pub fn to_bits(&self) -> Vec<u8> {
        self.bits.bytes().map(|b| b - b'0').collect()
    }

    /// Iterate bits as booleans.
    pub fn iter_bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.bytes().map(|b| b == b'1')
    }

    /// Pack MSB-first into bytes.
    pub fn pack(&self) -> PackedRecord {
        let mut writer = BitWriter::new();
        for bit in self.iter_bits() {
            writer.push_bit(bit);
        }
        writer.finish()
    }
}

impl fmt::Display for EncodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bits)
    }
}

/// Convert encoded records into integer rows without padding.
pub fn to_binary_rows(records: &[EncodedRecord]) -> Vec<Vec<u8>> {
    records.iter().map(EncodedRecord::to_bits).collect()
}

/// Rectangular batch of fixed-width bit rows.
///
/// # Invariants
/// - Every row is exactly `width` cells of 0 or 1
/// - `lengths[i] <= width` is the unpadded length of `rows[i]`
///
/// Deserialization goes through [`PaddedBatch::from_parts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPaddedBatch")]
pub struct PaddedBatch {
    width: usize,
    rows: Vec<Vec<u8>>,
    lengths: Vec<usize>,
}

#[derive(Deserialize)]
struct RawPaddedBatch {
    width: usize,
    rows: Vec<Vec<u8>>,
    lengths: Vec<usize>,
}

impl TryFrom<RawPaddedBatch> for PaddedBatch {
    type Error = Error;

    fn try_from(raw: RawPaddedBatch) -> Result<Self> {
        Self::from_parts(raw.width, raw.rows, raw.lengths)
    }
}

impl PaddedBatch {
    /// An empty batch whose rows will be `width` bits.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            lengths: Vec::new(),
        }
    }

    /// Assemble a batch from parts, checking the invariants.
    ///
    /// # Errors
    /// - `CodecError::LengthCountMismatch` if the counts of rows and lengths differ
    /// - `CodecError::RowWidthMismatch` if a row is not `width` wide
    /// - `CodecError::LengthExceedsWidth` if a length exceeds `width`
    /// - `CodecError::InvalidBit` if a cell is not 0 or 1
    pub fn from_parts(width: usize, rows: Vec<Vec<u8>>, lengths: Vec<usize>) -> Result<Self> {
        check_counts(rows.len(), lengths.len())?;
        for (row, (cells, &length)) in rows.iter().zip(&lengths).enumerate() {
            check_row(row, cells, width)?;
            check_length(row, length, width)?;
        }
        Ok(Self {
            width,
            rows,
            lengths,
        })
    }

    fn push(&mut self, record: &EncodedRecord) {
        let mut row = record.to_bits();
        row.extend(pad(PadSize::Exact(self.width - record.len()), 0u8));
        self.rows.push(row);
        self.lengths.push(record.len());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[u8]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Unpadded bit length of every row.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total padding cells across all rows.
    pub fn padding_bits(&self) -> usize {
        self.lengths.iter().map(|len| self.width - len).sum()
    }
}

fn check_counts(rows: usize, lengths: usize) -> Result<()> {
    if rows != lengths {
        return Err(CodecError::LengthCountMismatch { rows, lengths }.into());
    }
    Ok(())
}

fn check_length(row: usize, length: usize, width: usize) -> Result<()> {
    if length > width {
        return Err(CodecError::LengthExceedsWidth { row, length, width }.into());
    }
    Ok(())
}

fn check_row(row: usize, cells: &[u8], width: usize) -> Result<()> {
    if cells.len() != width {
        return Err(CodecError::RowWidthMismatch {
            row,
            expected: width,
            actual: cells.len(),
        }
        .into());
    }
    if let Some((position, &value)) = cells.iter().enumerate().find(|&(_, &v)| v > 1) {
        return Err(CodecError::InvalidBit { value, position }.into());
    }
    Ok(())
}

/// Output of [`Codec::transform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub batch: PaddedBatch,
    /// Input indices of records longer than the row width, in input order
    pub skipped: Vec<usize>,
}

impl Transformed {
    /// True when every input record produced a row.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Fitted {
    pub(crate) table: CodeTable,
    pub(crate) mx_string: usize,
    /// Absent when the codec was reloaded from persisted state
    pub(crate) frequencies: Option<FrequencyTable>,
}

/// Huffman codec with fixed-width batch output.
///
/// Only [`Codec::fit`] mutates; every other operation takes `&self`, so a
/// fitted codec can be shared across threads for encoding and decoding.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    options: CodecOptions,
    fitted: Option<Fitted>,
}

impl Codec {
    /// An unfitted codec with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            options,
            fitted: None,
        }
    }

    pub(crate) fn from_fitted(options: CodecOptions, fitted: Fitted) -> Self {
        Self {
            options,
            fitted: Some(fitted),
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub(crate) fn fitted(&self) -> Result<&Fitted> {
        self.fitted.as_ref().ok_or_else(|| CodecError::NotFitted.into())
    }

    /// Fit on `corpus`: count symbols, build codes and fix the row width.
    ///
    /// Records are trimmed of surrounding whitespace first. On failure the
    /// codec is left unfitted, even if it was fitted before.
    ///
    /// # Errors
    /// `HuffmanError::EmptyAlphabet` if the alphabet and the corpus are both empty.
    pub fn fit(&mut self, corpus: &Corpus) -> Result<()> {
        self.fitted = None;

        let corpus = corpus.trimmed();
        let frequencies = frequency::count_with(&self.options.alphabet, &corpus);
        let table = CodeTree::build(&frequencies)?.code_table();

        let mut longest = 0;
        for record in corpus.records() {
            longest = longest.max(encode_with(&table, record)?.len());
        }
        let mx_string = longest + self.options.margin;

        debug!(
            records = corpus.len(),
            symbols = table.len(),
            max_code_len = table.max_code_len(),
            mx_string,
            "fitted codec"
        );

        self.fitted = Some(Fitted {
            table,
            mx_string,
            frequencies: Some(frequencies),
        });
        Ok(())
    }

    /// Fit, then transform the trimmed training records.
    pub fn fit_transform(&mut self, corpus: &Corpus) -> Result<Transformed> {
        self.fit(corpus)?;
        let trimmed = corpus.trimmed();
        let records: Vec<&str> = trimmed.records().collect();
        self.transform(&records)
    }

    pub fn code_table(&self) -> Result<&CodeTable> {
        Ok(&self.fitted()?.table)
    }

    /// Frequencies seen at fit time; `None` for a codec loaded from state.
    pub fn frequencies(&self) -> Result<Option<&FrequencyTable>> {
        Ok(self.fitted()?.frequencies.as_ref())
    }

    /// Fixed row width of transformed batches.
    pub fn mx_string(&self) -> Result<usize> {
        Ok(self.fitted()?.mx_string)
    }

    /// Encode one record by concatenating the code of each symbol.
    ///
    /// # Errors
    /// - `CodecError::NotFitted`
    /// - `CodecError::UnknownSymbol` for a symbol without a code
    pub fn encode(&self, record: &str) -> Result<EncodedRecord> {
        encode_with(&self.fitted()?.table, record)
    }

    /// Decode one unpadded record.
    ///
    /// # Errors
    /// - `CodecError::NotFitted`
    /// - `CodecError::MalformedCode` if the bits do not split into codes
    pub fn decode(&self, record: &EncodedRecord) -> Result<String> {
        self.fitted()?.table.decode_bits(record.iter_bits())
    }

    /// Decode a packed record.
    pub fn decode_packed(&self, packed: &PackedRecord) -> Result<String> {
        self.fitted()?.table.decode_bits(BitReader::new(packed))
    }

    /// Encode and pad records into a batch, skipping over-length records.
    ///
    /// Callers should compare `batch.len()` against the input length or check
    /// [`Transformed::skipped`].
    ///
    /// # Errors
    /// `CodecError::NotFitted` or `CodecError::UnknownSymbol`.
    pub fn transform<S: AsRef<str>>(&self, records: &[S]) -> Result<Transformed> {
        let fitted = self.fitted()?;
        let mut batch = PaddedBatch::new(fitted.mx_string);
        let mut skipped = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let encoded = encode_with(&fitted.table, record.as_ref())?;
            if encoded.len() > fitted.mx_string {
                warn!(
                    index,
                    length = encoded.len(),
                    max = fitted.mx_string,
                    "skipping record longer than row width"
                );
                skipped.push(index);
                continue;
            }
            batch.push(&encoded);
        }

        debug!(
            records = records.len(),
            kept = batch.len(),
            skipped = skipped.len(),
            width = fitted.mx_string,
            "transformed batch"
        );
        Ok(Transformed { batch, skipped })
    }

    /// Like [`Codec::transform`] but fails on the first over-length record.
    ///
    /// # Errors
    /// `CodecError::RecordTooLong` in addition to the `transform` errors.
    pub fn transform_strict<S: AsRef<str>>(&self, records: &[S]) -> Result<PaddedBatch> {
        let fitted = self.fitted()?;
        let mut batch = PaddedBatch::new(fitted.mx_string);

        for (index, record) in records.iter().enumerate() {
            let encoded = encode_with(&fitted.table, record.as_ref())?;
            if encoded.len() > fitted.mx_string {
                return Err(CodecError::RecordTooLong {
                    index,
                    length: encoded.len(),
                    max: fitted.mx_string,
                }
                .into());
            }
            batch.push(&encoded);
        }
        Ok(batch)
    }

    /// Decode every row of a batch, stripping padding.
    pub fn inverse_transform(&self, batch: &PaddedBatch) -> Result<Vec<String>> {
        self.inverse_transform_with(batch, true)
    }

    /// Decode every row of a batch.
    ///
    /// With `strip_padding` each row is cut to its stored length before
    /// decoding; without it the whole row is decoded, which only succeeds
    /// when the row carries no padding.
    ///
    /// # Errors
    /// - `CodecError::NotFitted`
    /// - `CodecError::LengthCountMismatch`, `CodecError::RowWidthMismatch`,
    ///   `CodecError::LengthExceedsWidth` or `CodecError::InvalidBit` for a
    ///   malformed batch
    /// - `CodecError::MalformedCode` if a row does not split into codes
    pub fn inverse_transform_with(
        &self,
        batch: &PaddedBatch,
        strip_padding: bool,
    ) -> Result<Vec<String>> {
        let fitted = self.fitted()?;
        check_counts(batch.len(), batch.lengths().len())?;

        batch
            .rows()
            .iter()
            .zip(batch.lengths())
            .enumerate()
            .map(|(index, (row, &length))| -> Result<String> {
                check_row(index, row, batch.width())?;
                check_length(index, length, batch.width())?;
                let end = if strip_padding { length } else { row.len() };
                fitted.table.decode_bits(row[..end].iter().map(|&b| b == 1))
            })
            .collect()
    }
}

fn encode_with(table: &CodeTable, record: &str) -> Result<EncodedRecord> {
    let mut bits = String::new();
    for (position, symbol) in record.chars().enumerate() {
        let code = table
            .code(symbol)
            .ok_or(CodecError::UnknownSymbol { symbol, position })?;
        bits.push_str(code);
    }
    Ok(EncodedRecord { bits })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn wood_chuck() -> Corpus {
        Corpus::from(vec![
            "how much could a wood chuck",
            "chuck if a wood chuck",
            "could chuck wood?",
        ])
    }

    fn fitted(corpus: &Corpus) -> Codec {
        let mut codec = Codec::new();
        codec.fit(corpus).unwrap();
        codec
    }

    #[test]
    fn test_not_fitted() {
        let codec = Codec::new();
        assert!(!codec.is_fitted());
        assert_eq!(
            codec.encode("a").unwrap_err().as_codec(),
            Some(&CodecError::NotFitted)
        );
        assert_eq!(
            codec.transform(&["a"]).unwrap_err().as_codec(),
            Some(&CodecError::NotFitted)
        );
        assert_eq!(
            codec
                .inverse_transform(&PaddedBatch::new(4))
                .unwrap_err()
                .as_codec(),
            Some(&CodecError::NotFitted)
        );
        assert!(codec.mx_string().is_err());
    }

    #[test]
    fn test_encode_matches_codes() {
        let codec = fitted(&wood_chuck());
        let table = codec.code_table().unwrap();

        let expected: String = "chuck".chars().map(|c| table.code(c).unwrap()).collect();
        let encoded = codec.encode("chuck").unwrap();
        assert_eq!(encoded.as_str(), expected);
        assert_eq!(codec.decode(&encoded).unwrap(), "chuck");
    }

    #[test]
    fn test_unknown_symbol() {
        let codec = fitted(&wood_chuck());
        assert_eq!(
            codec.encode("wood Z").unwrap_err().as_codec(),
            Some(&CodecError::UnknownSymbol {
                symbol: 'Z',
                position: 5
            })
        );
    }

    #[test]
    fn test_out_of_corpus_alphabet_symbols_encode() {
        let codec = fitted(&wood_chuck());
        let encoded = codec.encode("xyz123!").unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), "xyz123!");
    }

    #[test]
    fn test_mx_string_includes_margin() {
        let corpus = wood_chuck();
        let codec = fitted(&corpus);
        let longest = corpus
            .records()
            .map(|r| codec.encode(r).unwrap().len())
            .max()
            .unwrap();
        assert_eq!(codec.mx_string().unwrap(), longest + DEFAULT_MARGIN);

        let mut narrow = Codec::with_options(CodecOptions::default().with_margin(0));
        narrow.fit(&corpus).unwrap();
        assert_eq!(narrow.mx_string().unwrap(), longest);
    }

    #[test]
    fn test_fit_trims_records() {
        let padded = fitted(&Corpus::from(vec!["  chuck  "]));
        let plain = fitted(&Corpus::from(vec!["chuck"]));
        assert_eq!(padded.mx_string().unwrap(), plain.mx_string().unwrap());
    }

    #[test]
    fn test_transform_shape() {
        let corpus = wood_chuck();
        let mut codec = Codec::new();
        let transformed = codec.fit_transform(&corpus).unwrap();
        let width = codec.mx_string().unwrap();

        assert!(transformed.is_complete());
        assert_eq!(transformed.batch.len(), 3);
        assert_eq!(transformed.batch.width(), width);
        for (row, &len) in transformed.batch.rows().iter().zip(transformed.batch.lengths()) {
            assert_eq!(row.len(), width);
            assert!(row.iter().all(|&b| b <= 1));
            assert!(row[len..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_inverse_transform_round_trip() {
        let corpus = wood_chuck();
        let codec = fitted(&corpus);
        let records: Vec<&str> = corpus.records().collect();

        let transformed = codec.transform(&records).unwrap();
        let decoded = codec.inverse_transform(&transformed.batch).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_transform_skips_long_records() {
        let codec = fitted(&Corpus::from(vec!["ab"]));
        let long = "abcdefghijklmnopqrstuvwxyz".repeat(4);
        let transformed = codec.transform(&["ab", long.as_str(), "ba"]).unwrap();

        assert_eq!(transformed.skipped, vec![1]);
        assert_eq!(transformed.batch.len(), 2);
        assert_eq!(
            codec.inverse_transform(&transformed.batch).unwrap(),
            vec!["ab", "ba"]
        );
    }

    #[test]
    fn test_transform_strict_rejects_long_records() {
        let codec = fitted(&Corpus::from(vec!["ab"]));
        let long = "z".repeat(200);
        let err = codec.transform_strict(&["ab", long.as_str()]).unwrap_err();
        match err.as_codec() {
            Some(CodecError::RecordTooLong { index, max, .. }) => {
                assert_eq!(*index, 1);
                assert_eq!(*max, codec.mx_string().unwrap());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_inverse_transform_without_strip() {
        let mut codec = Codec::with_options(CodecOptions::default().with_margin(0));
        codec.fit(&Corpus::from(vec!["chuck"])).unwrap();

        let transformed = codec.transform(&["chuck"]).unwrap();
        assert_eq!(transformed.batch.padding_bits(), 0);
        assert_eq!(
            codec
                .inverse_transform_with(&transformed.batch, false)
                .unwrap(),
            vec!["chuck"]
        );
    }

    #[test]
    fn test_inverse_transform_rejects_bad_cells() {
        let codec = fitted(&wood_chuck());
        let batch = PaddedBatch {
            width: 3,
            rows: vec![vec![0, 9, 1]],
            lengths: vec![3],
        };
        assert_eq!(
            codec.inverse_transform(&batch).unwrap_err().as_codec(),
            Some(&CodecError::InvalidBit {
                value: 9,
                position: 1
            })
        );
    }

    #[test]
    fn test_single_symbol_alphabet() {
        let options = CodecOptions::default().with_alphabet(Alphabet::new(['a']));
        let mut codec = Codec::with_options(options);
        codec.fit(&Corpus::Records(Vec::new())).unwrap();

        assert_eq!(codec.code_table().unwrap().code('a'), Some("0"));
        let encoded = codec.encode("aaa").unwrap();
        assert_eq!(encoded.as_str(), "000");
        assert_eq!(codec.decode(&encoded).unwrap(), "aaa");

        let transformed = codec.transform(&["a", "aa"]).unwrap();
        assert_eq!(
            codec.inverse_transform(&transformed.batch).unwrap(),
            vec!["a", "aa"]
        );
    }

    #[test]
    fn test_empty_alphabet_leaves_codec_unfitted() {
        let mut codec = fitted(&wood_chuck());
        assert!(codec.is_fitted());

        let mut empty = Codec::with_options(CodecOptions::default().with_alphabet(Alphabet::empty()));
        let result = empty.fit(&Corpus::from(vec!["   "]));
        assert!(matches!(
            result,
            Err(Error::Huffman(crate::error::HuffmanError::EmptyAlphabet))
        ));
        assert!(!empty.is_fitted());

        // A failed refit reverts a fitted codec
        codec.options = CodecOptions::default().with_alphabet(Alphabet::empty());
        assert!(codec.fit(&Corpus::Records(Vec::new())).is_err());
        assert!(!codec.is_fitted());
    }

    #[test]
    fn test_empty_record() {
        let codec = fitted(&wood_chuck());
        let transformed = codec.transform(&[""]).unwrap();
        assert_eq!(transformed.batch.lengths(), &[0]);
        assert_eq!(codec.inverse_transform(&transformed.batch).unwrap(), vec![""]);
    }

    #[test]
    fn test_packed_round_trip() {
        let codec = fitted(&wood_chuck());
        let encoded = codec.encode("a wood chuck").unwrap();
        let packed = encoded.pack();
        assert_eq!(packed.bit_len(), encoded.len());
        assert_eq!(EncodedRecord::from_packed(&packed), encoded);
        assert_eq!(codec.decode_packed(&packed).unwrap(), "a wood chuck");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad(PadSize::Auto, '9'), Vec::<char>::new());
        assert_eq!(pad(PadSize::Exact(3), 0u8), vec![0, 0, 0]);
    }

    #[test]
    fn test_to_binary_rows() {
        let records = vec![
            EncodedRecord::from_bits("101").unwrap(),
            EncodedRecord::from_bits("0").unwrap(),
        ];
        assert_eq!(to_binary_rows(&records), vec![vec![1, 0, 1], vec![0]]);
        assert!(EncodedRecord::from_bits("1091").is_err());
    }

    #[test]
    fn test_batch_from_parts_validation() {
        assert!(PaddedBatch::from_parts(2, vec![vec![0, 1]], vec![2]).is_ok());

        let codec_err = |result: Result<PaddedBatch>| result.unwrap_err().as_codec().cloned();
        assert_eq!(
            codec_err(PaddedBatch::from_parts(2, vec![vec![0]], vec![1])),
            Some(CodecError::RowWidthMismatch {
                row: 0,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            codec_err(PaddedBatch::from_parts(2, vec![vec![0, 1]], vec![3])),
            Some(CodecError::LengthExceedsWidth {
                row: 0,
                length: 3,
                width: 2
            })
        );
        assert_eq!(
            codec_err(PaddedBatch::from_parts(2, vec![vec![0, 2]], vec![2])),
            Some(CodecError::InvalidBit {
                value: 2,
                position: 1
            })
        );
        assert_eq!(
            codec_err(PaddedBatch::from_parts(2, vec![vec![0, 1]], vec![])),
            Some(CodecError::LengthCountMismatch {
                rows: 1,
                lengths: 0
            })
        );
    }

    #[test]
    fn test_batch_deserialize_validates() {
        let mut codec = Codec::new();
        codec.fit(&Corpus::from(vec!["ab", "ba"])).unwrap();
        let batch = codec.transform(&["ab", "ba"]).unwrap().batch;

        let json = serde_json::to_string(&batch).unwrap();
        let restored: PaddedBatch = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, batch);

        // One length dropped: rows can no longer be paired with lengths
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["lengths"].as_array_mut().unwrap().pop();
        let err = serde_json::from_value::<PaddedBatch>(value).unwrap_err();
        assert!(err.to_string().contains("2 rows but 1 lengths"), "{err}");

        // Length wider than the row
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["lengths"][1] = serde_json::json!(batch.width() + 1);
        assert!(serde_json::from_value::<PaddedBatch>(value).is_err());

        // Ragged row
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["rows"][0].as_array_mut().unwrap().pop();
        assert!(serde_json::from_value::<PaddedBatch>(value).is_err());
    }

    #[test]
    fn test_encoded_record_deserialize_validates() {
        let record: EncodedRecord = serde_json::from_str(r#"{"bits":"0110"}"#).unwrap();
        assert_eq!(record.to_bits(), vec![0, 1, 1, 0]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"bits":"0110"}"#
        );

        let err = serde_json::from_str::<EncodedRecord>(r#"{"bits":"0 1"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid bit character ' '"), "{err}");
        assert!(serde_json::from_str::<EncodedRecord>(r#"{"bits":"012"}"#).is_err());
    }

    #[test]
    fn test_codec_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Codec>();
    }
}
