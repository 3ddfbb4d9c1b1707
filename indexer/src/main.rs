use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use fts_core::corpus::read_corpus;
use fts_core::persist::{save_index, save_meta, save_stats, MetaFile, StorePaths};
use fts_core::{DocStats, IndexMode, InvertedIndex};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the inverted index and length norms for a document collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build index and stats from a dataset directory
    Build {
        /// Dataset directory of collection files
        #[arg(long)]
        input: String,
        /// Output store directory
        #[arg(long, default_value = "./results")]
        output: String,
        /// Store occurrence offsets instead of per-document counts
        #[arg(long, default_value_t = false)]
        positional: bool,
        /// Apply the Porter stemmer during tokenization
        #[arg(long, default_value_t = false)]
        stem: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, positional, stem } => build(&input, &output, positional, stem),
    }
}

fn build(input: &str, output: &str, positional: bool, stem: bool) -> Result<()> {
    let input_path = Path::new(input);
    if !input_path.is_dir() {
        bail!("dataset directory '{input}' not found");
    }
    let corpus = read_corpus(input_path)?;
    if corpus.is_empty() {
        tracing::warn!(input, "no documents found; writing an empty index");
    }

    let mode = if positional {
        IndexMode::Positional
    } else {
        IndexMode::Frequency
    };
    let paths = StorePaths::new(output);

    let index = InvertedIndex::build(&corpus, mode, stem);
    save_index(&paths, &index)?;

    let stats = DocStats::compute(&corpus, stem);
    save_stats(&paths, &stats)?;

    let meta = MetaFile {
        num_docs: corpus.len() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: 1,
    };
    save_meta(&paths, &meta)?;

    tracing::info!(
        output,
        num_docs = corpus.len(),
        num_terms = index.term_count(),
        "index build complete"
    );
    Ok(())
}
