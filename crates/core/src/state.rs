//! Persisted encoder state.
//!
//! A fitted codec is fully described by its two code maps plus the row width
//! fixed at fit time. Exporting them lets a caller reload the codec without
//! retraining. Where the state is stored is up to the caller; JSON helpers
//! are provided because the maps serialize naturally as objects.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::codec::{Codec, CodecOptions, Fitted};
use crate::error::Result;
use crate::huffman::CodeTable;

/// Serializable snapshot of a fitted [`Codec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecState {
    pub symbol_to_code: BTreeMap<char, String>,
    pub code_to_symbol: BTreeMap<String, char>,
    pub mx_string: usize,
    pub margin: usize,
}

impl CodecState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Codec {
    /// Export the fitted maps and row width.
    ///
    /// # Errors
    /// `CodecError::NotFitted`.
    pub fn state(&self) -> Result<CodecState> {
        let fitted = self.fitted()?;
        Ok(CodecState {
            symbol_to_code: fitted.table.symbol_to_code().clone(),
            code_to_symbol: fitted.table.code_to_symbol().clone(),
            mx_string: fitted.mx_string,
            margin: self.options().margin,
        })
    }

    /// Rebuild a fitted codec from exported state.
    ///
    /// The reloaded codec's alphabet is the set of coded symbols; fit-time
    /// frequencies are not part of the state.
    ///
    /// # Errors
    /// `HuffmanError::InconsistentCodeTable` or `HuffmanError::EmptyAlphabet`
    /// if the maps do not form a valid prefix code.
    pub fn from_state(state: CodecState) -> Result<Self> {
        let table = CodeTable::from_maps(state.symbol_to_code, state.code_to_symbol)?;
        let options = CodecOptions::default()
            .with_margin(state.margin)
            .with_alphabet(Alphabet::new(table.iter().map(|(symbol, _)| symbol)));

        Ok(Codec::from_fitted(
            options,
            Fitted {
                table,
                mx_string: state.mx_string,
                frequencies: None,
            },
        ))
    }
}
