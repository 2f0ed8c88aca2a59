//! huffbatch: fit Huffman codecs on text corpora and move fixed-width
//! batches between a loader and a consumer.
//!
//! ```text
//! huffbatch fit --corpus items.txt --state state.json --batch batch.json
//! huffbatch encode --state state.json "milk 2%"
//! huffbatch decode --state state.json --batch batch.json
//! huffbatch demo --seed 42 --print-config
//! ```

mod commands;
mod config;
mod input_gen;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Cli, Command, DemoConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so decoded records on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Fit(args) => commands::fit(args),
        Command::Encode(args) => commands::encode(args),
        Command::Decode(args) => commands::decode(args),
        Command::Demo(args) => commands::demo(&DemoConfig::from_args(args)),
    }
}
