//! Subcommand implementations.
//!
//! File formats live here, not in the core: corpora are read from JSON or
//! line-oriented text, codec state and batches are written as JSON.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use huffbatch_core::{
    metrics::BatchMetrics, Alphabet, Codec, CodecOptions, CodecState, Corpus, PaddedBatch,
    Transformed,
};
use tracing::{debug, info};

use crate::config::{DecodeArgs, DemoConfig, EncodeArgs, FitArgs};
use crate::input_gen::generate_sample_corpus;

/// Load a corpus: `.json` files hold a string or an array of strings,
/// anything else is one record per line.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("corpus {} is not valid JSON", path.display()))?;
        Ok(Corpus::from_json(&value)?)
    } else {
        Ok(Corpus::Records(text.lines().map(str::to_string).collect()))
    }
}

fn load_codec(path: &Path) -> Result<Codec> {
    let file = File::open(path).with_context(|| format!("failed to open state {}", path.display()))?;
    let state = CodecState::read_from(BufReader::new(file))
        .with_context(|| format!("failed to parse state {}", path.display()))?;
    Ok(Codec::from_state(state)?)
}

fn write_batch(path: &Path, batch: &PaddedBatch) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, batch)?;
    writer.flush()?;
    Ok(())
}

pub fn fit(args: &FitArgs) -> Result<()> {
    let corpus = load_corpus(&args.corpus)?;

    let mut options = CodecOptions::default().with_margin(args.margin);
    if let Some(symbols) = &args.alphabet {
        options = options.with_alphabet(Alphabet::new(symbols.chars()));
    }

    let mut codec = Codec::with_options(options);
    codec.fit(&corpus).context("fit failed")?;

    let records: Vec<&str> = corpus.records().map(str::trim).collect();
    let mut metrics = BatchMetrics::new();

    let transformed = if args.strict {
        Transformed {
            batch: codec.transform_strict(&records)?,
            skipped: Vec::new(),
        }
    } else {
        codec.transform(&records)?
    };
    metrics.record_batch(&records, &transformed);
    if !transformed.is_complete() {
        info!(skipped = ?transformed.skipped, "records skipped");
    }
    let batch = transformed.batch;
    metrics.complete();

    codec.state()?.write_to(BufWriter::new(
        File::create(&args.state)
            .with_context(|| format!("failed to create {}", args.state.display()))?,
    ))?;
    write_batch(&args.batch, &batch)?;

    info!(
        state = %args.state.display(),
        batch = %args.batch.display(),
        rows = batch.len(),
        width = batch.width(),
        "wrote codec state and batch"
    );

    if !args.no_metrics {
        metrics.print_summary();
    }
    Ok(())
}

pub fn encode(args: &EncodeArgs) -> Result<()> {
    let codec = load_codec(&args.state)?;

    for text in &args.texts {
        let encoded = codec
            .encode(text)
            .with_context(|| format!("failed to encode {text:?}"))?;
        if args.packed {
            let packed = encoded.pack();
            let hex: String = packed.bytes().iter().map(|b| format!("{b:02x}")).collect();
            println!("{}\t{}", packed.bit_len(), hex);
        } else {
            println!("{encoded}");
        }
    }
    Ok(())
}

pub fn decode(args: &DecodeArgs) -> Result<()> {
    let codec = load_codec(&args.state)?;

    let file = File::open(&args.batch)
        .with_context(|| format!("failed to open batch {}", args.batch.display()))?;
    let batch: PaddedBatch = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse batch {}", args.batch.display()))?;

    let decoded = codec.inverse_transform_with(&batch, !args.keep_padding)?;
    debug!(rows = decoded.len(), "decoded batch");

    match &args.out {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            for record in &decoded {
                writeln!(writer, "{record}")?;
            }
            writer.flush()?;
        }
        None => {
            for record in &decoded {
                println!("{record}");
            }
        }
    }
    Ok(())
}

pub fn demo(config: &DemoConfig) -> Result<()> {
    if config.print_config {
        config.print();
    }

    let records = generate_sample_corpus(config.seed, config.records, config.max_words);
    let corpus = Corpus::Records(records.clone());

    let mut codec = Codec::with_options(CodecOptions::default().with_margin(config.margin));
    let mut metrics = BatchMetrics::new();

    let transformed = codec.fit_transform(&corpus)?;
    metrics.record_batch(&records, &transformed);

    // A fresh codec from exported state must decode the same batch
    let reloaded = Codec::from_state(codec.state()?)?;
    let decoded = reloaded.inverse_transform(&transformed.batch)?;
    metrics.record_decode(&records, &decoded);
    metrics.complete();

    if config.print_metrics {
        metrics.print_summary();
    }
    metrics.print_result();

    if metrics.rows_mismatched > 0 || metrics.records_skipped > 0 {
        bail!("demo round trip failed");
    }
    Ok(())
}
