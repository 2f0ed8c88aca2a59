//! A named collection of codecs.
//!
//! Useful when several fields of a dataset each get their own code table.

use std::collections::btree_map::{BTreeMap, Entry};

use tracing::debug;

use crate::codec::{Codec, CodecOptions, Transformed};
use crate::error::{RegistryError, Result};
use crate::frequency::Corpus;

#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    codecs: BTreeMap<String, Codec>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a codec under `name`, fitting it when a corpus is supplied.
    ///
    /// Replaces any codec already registered under the same name. If the fit
    /// fails nothing is registered.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        options: CodecOptions,
        corpus: Option<&Corpus>,
    ) -> Result<&Codec> {
        let mut codec = Codec::with_options(options);
        if let Some(corpus) = corpus {
            codec.fit(corpus)?;
        }
        Ok(self.insert(name, codec))
    }

    /// Register an existing codec, e.g. one reloaded from state.
    pub fn insert(&mut self, name: impl Into<String>, codec: Codec) -> &Codec {
        match self.codecs.entry(name.into()) {
            Entry::Occupied(mut slot) => {
                slot.insert(codec);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(codec),
        }
    }

    /// Look up a codec.
    ///
    /// # Errors
    /// `RegistryError::UnknownCodec`.
    pub fn get(&self, name: &str) -> Result<&Codec> {
        self.codecs
            .get(name)
            .ok_or_else(|| RegistryError::UnknownCodec(name.to_string()).into())
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Codec> {
        self.codecs
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownCodec(name.to_string()).into())
    }

    /// Whether `name` exists and has been fitted.
    pub fn is_fitted(&self, name: &str) -> bool {
        self.codecs.get(name).is_some_and(Codec::is_fitted)
    }

    /// (Re)fit a registered codec, optionally transforming the corpus too.
    pub fn fit(
        &mut self,
        name: &str,
        corpus: &Corpus,
        transform: bool,
    ) -> Result<Option<Transformed>> {
        let codec = self.get_mut(name)?;
        if transform {
            codec.fit_transform(corpus).map(Some)
        } else {
            codec.fit(corpus).map(|()| None)
        }
    }

    /// Transform `records` with a registered codec.
    ///
    /// An unfitted codec is fitted on `corpus` first.
    ///
    /// # Errors
    /// - `RegistryError::UnknownCodec`
    /// - `RegistryError::MissingCorpus` if the codec is unfitted and no corpus was given
    pub fn apply<S: AsRef<str>>(
        &mut self,
        name: &str,
        records: &[S],
        corpus: Option<&Corpus>,
    ) -> Result<Transformed> {
        let codec = self.get_mut(name)?;
        if !codec.is_fitted() {
            let corpus = corpus.ok_or_else(|| RegistryError::MissingCorpus(name.to_string()))?;
            debug!(codec = name, "fitting on first use");
            codec.fit(corpus)?;
        }
        codec.transform(records)
    }

    pub fn remove(&mut self, name: &str) -> Option<Codec> {
        self.codecs.remove(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.codecs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
