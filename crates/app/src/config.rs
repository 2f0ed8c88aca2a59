//! Configuration for the huffbatch application.
//!
//! Command-line arguments are parsed with clap. The `demo` command works
//! with ZERO arguments: unspecified values are drawn from a seeded RNG and
//! printed on request, so every run is reproducible from its seed.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use huffbatch_core::codec::DEFAULT_MARGIN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Parser)]
#[command(name = "huffbatch", version, about = "Huffman-coded fixed-width batches for text records")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "huffbatch_core=debug")
    #[arg(long, global = true, default_value = "warn")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a codec on a corpus and write its state and padded batch
    Fit(FitArgs),
    /// Encode text with a saved codec and print the codes
    Encode(EncodeArgs),
    /// Decode a padded batch with a saved codec
    Decode(DecodeArgs),
    /// Fit a generated corpus and verify the round trip
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
pub struct FitArgs {
    /// Corpus file: `.json` (string or array of strings) or one record per line
    #[arg(long)]
    pub corpus: PathBuf,

    /// Where to write the codec state (JSON)
    #[arg(long)]
    pub state: PathBuf,

    /// Where to write the padded batch (JSON)
    #[arg(long)]
    pub batch: PathBuf,

    /// Extra bits added to the longest record when fixing the row width
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: usize,

    /// Replace the base alphabet with these symbols
    #[arg(long)]
    pub alphabet: Option<String>,

    /// Fail instead of skipping records that exceed the row width
    #[arg(long)]
    pub strict: bool,

    /// Don't print metrics summary
    #[arg(long)]
    pub no_metrics: bool,
}

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Codec state written by `fit`
    #[arg(long)]
    pub state: PathBuf,

    /// Print packed bytes as hex instead of bit strings
    #[arg(long)]
    pub packed: bool,

    /// Records to encode
    #[arg(required = true)]
    pub texts: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Codec state written by `fit`
    #[arg(long)]
    pub state: PathBuf,

    /// Padded batch written by `fit`
    #[arg(long)]
    pub batch: PathBuf,

    /// Decode full rows without stripping padding
    #[arg(long)]
    pub keep_padding: bool,

    /// Write decoded records here (one per line) instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Random seed for determinism
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of generated records (default: random 20-200)
    #[arg(long)]
    pub records: Option<usize>,

    /// Maximum words per generated record (default: random 3-12)
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Row width margin (default: 20)
    #[arg(long)]
    pub margin: Option<usize>,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print metrics summary
    #[arg(long)]
    pub no_metrics: bool,
}

/// Resolved configuration for a demo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub seed: u64,
    pub records: usize,
    pub max_words: usize,
    pub margin: usize,
    pub print_config: bool,
    pub print_metrics: bool,
}

impl DemoConfig {
    /// Resolve arguments, drawing unspecified values from the seed.
    ///
    /// Without `--seed` a time-based seed is used.
    pub fn from_args(args: &DemoArgs) -> Self {
        let seed = args.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        Self {
            seed,
            records: args.records.unwrap_or_else(|| rng.gen_range(20..=200)),
            max_words: args.max_words.unwrap_or_else(|| rng.gen_range(3..=12)).max(1),
            margin: args.margin.unwrap_or(DEFAULT_MARGIN),
            print_config: args.print_config,
            print_metrics: !args.no_metrics,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Seed: {}", self.seed);
        println!("Records: {}", self.records);
        println!("Max words per record: {}", self.max_words);
        println!("Row margin: {} bits", self.margin);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_args(seed: Option<u64>) -> DemoArgs {
        DemoArgs {
            seed,
            records: None,
            max_words: None,
            margin: None,
            print_config: false,
            no_metrics: false,
        }
    }

    #[test]
    fn test_cli_parses_fit() {
        let cli = Cli::try_parse_from([
            "huffbatch", "fit", "--corpus", "c.txt", "--state", "s.json", "--batch", "b.json",
        ])
        .unwrap();
        match cli.command {
            Command::Fit(args) => {
                assert_eq!(args.margin, DEFAULT_MARGIN);
                assert!(!args.strict);
                assert_eq!(args.corpus, PathBuf::from("c.txt"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_texts_for_encode() {
        assert!(Cli::try_parse_from(["huffbatch", "encode", "--state", "s.json"]).is_err());
    }

    #[test]
    fn test_seeded_defaults_are_deterministic() {
        let a = DemoConfig::from_args(&demo_args(Some(42)));
        let b = DemoConfig::from_args(&demo_args(Some(42)));
        assert_eq!(a, b);
        assert!((20..=200).contains(&a.records));
        assert!((3..=12).contains(&a.max_words));
        assert_eq!(a.margin, DEFAULT_MARGIN);
    }

    #[test]
    fn test_explicit_values_win() {
        let mut args = demo_args(Some(1));
        args.records = Some(5);
        args.margin = Some(0);
        args.no_metrics = true;

        let config = DemoConfig::from_args(&args);
        assert_eq!(config.records, 5);
        assert_eq!(config.margin, 0);
        assert!(!config.print_metrics);
    }
}
