//! Metrics collection and reporting for batch encoding.
//!
//! Tracks how much a batch shrank relative to 8-bit symbols, how much of it
//! is padding, and how many records were skipped for being too long.
//!
//! # Thread Safety
//!
//! `BatchMetrics` is a plain struct updated by the caller. For multi-threaded
//! use, keep one per thread and [`BatchMetrics::merge`] them at the end.

use std::time::{Duration, Instant};

use crate::codec::Transformed;

/// Bits used per symbol by an uncompressed 8-bit encoding.
const RAW_BITS_PER_SYMBOL: f64 = 8.0;

/// Counters for one or more transformed batches.
#[derive(Debug, Clone)]
pub struct BatchMetrics {
    // === Timing ===
    /// When collection started
    pub start_time: Instant,

    /// When collection ended (set on completion)
    pub end_time: Option<Instant>,

    // === Records ===
    /// Records submitted to transform
    pub records_in: u64,

    /// Records that produced a row
    pub records_kept: u64,

    /// Records skipped as too long
    pub records_skipped: u64,

    // === Bits ===
    /// Symbols across kept records
    pub symbols: u64,

    /// Unpadded code bits across kept records
    pub encoded_bits: u64,

    /// Padding cells across kept records
    pub padding_bits: u64,

    // === Decoding ===
    /// Rows decoded back to text
    pub rows_decoded: u64,

    /// Decoded rows that differ from their input
    pub rows_mismatched: u64,
}

impl BatchMetrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            records_in: 0,
            records_kept: 0,
            records_skipped: 0,
            symbols: 0,
            encoded_bits: 0,
            padding_bits: 0,
            rows_decoded: 0,
            rows_mismatched: 0,
        }
    }

    /// Account for one transform call over `records`.
    pub fn record_batch<S: AsRef<str>>(&mut self, records: &[S], transformed: &Transformed) {
        self.records_in += records.len() as u64;
        self.records_kept += transformed.batch.len() as u64;
        self.records_skipped += transformed.skipped.len() as u64;

        let mut skipped = transformed.skipped.iter().peekable();
        for (index, record) in records.iter().enumerate() {
            if skipped.peek() == Some(&&index) {
                skipped.next();
                continue;
            }
            self.symbols += record.as_ref().chars().count() as u64;
        }

        self.encoded_bits += transformed.batch.lengths().iter().sum::<usize>() as u64;
        self.padding_bits += transformed.batch.padding_bits() as u64;
    }

    /// Compare decoded rows against the records that produced them.
    pub fn record_decode<A: AsRef<str>, B: AsRef<str>>(&mut self, expected: &[A], decoded: &[B]) {
        self.rows_decoded += decoded.len() as u64;
        self.rows_mismatched += expected
            .iter()
            .zip(decoded)
            .filter(|&(a, b)| a.as_ref() != b.as_ref())
            .count() as u64;
        self.rows_mismatched += expected.len().abs_diff(decoded.len()) as u64;
    }

    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: &BatchMetrics) {
        self.start_time = self.start_time.min(other.start_time);
        self.records_in += other.records_in;
        self.records_kept += other.records_kept;
        self.records_skipped += other.records_skipped;
        self.symbols += other.symbols;
        self.encoded_bits += other.encoded_bits;
        self.padding_bits += other.padding_bits;
        self.rows_decoded += other.rows_decoded;
        self.rows_mismatched += other.rows_mismatched;
    }

    /// Mark collection as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Average code length. Returns 0.0 if nothing was encoded.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            self.encoded_bits as f64 / self.symbols as f64
        }
    }

    /// Encoded bits relative to 8 bits per symbol.
    pub fn compression_ratio(&self) -> f64 {
        self.bits_per_symbol() / RAW_BITS_PER_SYMBOL
    }

    /// Fraction of batch cells that are padding.
    pub fn padding_overhead(&self) -> f64 {
        let total = self.encoded_bits + self.padding_bits;
        if total == 0 {
            0.0
        } else {
            self.padding_bits as f64 / total as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Batch Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Records ===");
        println!("Submitted: {}", self.records_in);
        println!("Kept: {}", self.records_kept);
        println!("Skipped (too long): {}", self.records_skipped);
        println!();

        println!("=== Encoding ===");
        println!("Symbols: {}", self.symbols);
        println!("Code bits: {}", self.encoded_bits);
        println!("Bits/symbol: {:.3}", self.bits_per_symbol());
        println!("Ratio vs 8-bit: {:.1}%", self.compression_ratio() * 100.0);
        println!("Padding: {} bits ({:.1}% of batch)", self.padding_bits, self.padding_overhead() * 100.0);
        println!();

        if self.rows_decoded > 0 {
            println!("=== Decoding ===");
            println!("Rows decoded: {}", self.rows_decoded);
            println!("Mismatches: {}", self.rows_mismatched);
            println!();
        }
    }

    /// Print just the final result (pass/fail).
    pub fn print_result(&self) {
        if self.rows_mismatched == 0 && self.records_skipped == 0 {
            println!("✓ Round trip succeeded");
            println!("  {} records in {} ms", self.records_in, self.duration().as_millis());
        } else if self.rows_mismatched > 0 {
            println!("✗ Round trip failed: {} rows differ", self.rows_mismatched);
        } else {
            println!("✗ Round trip incomplete: {} records skipped", self.records_skipped);
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             records_in={}\n\
             records_kept={}\n\
             records_skipped={}\n\
             symbols={}\n\
             encoded_bits={}\n\
             padding_bits={}\n\
             bits_per_symbol={:.4}\n\
             compression_ratio={:.4}\n\
             rows_mismatched={}\n",
            self.duration().as_millis(),
            self.records_in,
            self.records_kept,
            self.records_skipped,
            self.symbols,
            self.encoded_bits,
            self.padding_bits,
            self.bits_per_symbol(),
            self.compression_ratio(),
            self.rows_mismatched,
        )
    }
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
