use anyhow::{bail, Result};
use clap::Parser;
use fts_core::boolean;
use fts_core::corpus::read_corpus;
use fts_core::persist::{load_or_build_index, load_or_build_stats, StorePaths};
use fts_core::query::parse;
use fts_core::ranked;
use fts_core::tokenizer::tokenize;
use fts_core::{Corpus, DocId, DocStats, IndexMode, InvertedIndex};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Console search over an indexed document collection", long_about = None)]
struct Args {
    /// Dataset directory of collection files
    #[arg(long)]
    dataset: String,
    /// Index/stats store directory
    #[arg(long, default_value = "./results")]
    store: String,
    /// Rank hits by tf-idf cosine instead of boolean evaluation
    #[arg(long, default_value_t = false)]
    ranked: bool,
    /// Use a positional index
    #[arg(long, default_value_t = false)]
    positional: bool,
    /// Apply the Porter stemmer during tokenization
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Number of ranked hits to display
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let corpus = read_corpus(Path::new(&args.dataset))?;
    if corpus.is_empty() {
        bail!("no documents in '{}'; nothing to search", args.dataset);
    }

    let mode = if args.positional {
        IndexMode::Positional
    } else {
        IndexMode::Frequency
    };
    let paths = StorePaths::new(&args.store);
    let index = load_or_build_index(&corpus, mode, args.stem, &paths)?;
    let stats = if args.ranked {
        Some(load_or_build_stats(&corpus, args.stem, &paths)?)
    } else {
        None
    };
    let universe = corpus.ids();

    let stdin = io::stdin();
    loop {
        print!("Enter query: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        if raw == "\\q" {
            break;
        }
        match &stats {
            Some(stats) => run_ranked(&index, stats, raw, &args),
            None => run_boolean(&corpus, &index, &universe, raw, &args),
        }
    }
    Ok(())
}

fn run_boolean(
    corpus: &Corpus,
    index: &InvertedIndex,
    universe: &[DocId],
    raw: &str,
    args: &Args,
) {
    let outcome = parse(raw, args.stem).and_then(|rpn| boolean::evaluate(index, universe, &rpn));
    match outcome {
        Ok(ids) if ids.is_empty() => println!("Nothing found. Try another query"),
        Ok(ids) => {
            println!("Results found: {}", ids.len());
            let rendered: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            println!("{}", rendered.join(" "));
            if let Err(e) = write_result_files(Path::new(&args.store), raw, &ids, corpus) {
                tracing::warn!(error = %e, "failed to write result files");
            }
        }
        Err(e) => println!("ERROR: {e}"),
    }
}

fn run_ranked(index: &InvertedIndex, stats: &DocStats, raw: &str, args: &Args) {
    let terms = tokenize(raw, args.stem);
    let results = ranked::evaluate(index, stats, &terms);
    if results.is_empty() {
        println!("Nothing found. Try another query");
        return;
    }
    println!("Results found: {}", results.len());
    for hit in results.iter().take(args.top) {
        println!("{:>8}  {:.6}", hit.doc_id, hit.score);
    }
}

/// Write the two result files the sink interface describes: one with the
/// matched ids, one with the full matched documents.
fn write_result_files(dir: &Path, raw: &str, ids: &[DocId], corpus: &Corpus) -> Result<()> {
    let mut f = File::create(dir.join("lastqueryids.txt"))?;
    writeln!(f, "Query: \"{raw}\"")?;
    writeln!(f, "Found: {} documents", ids.len())?;
    writeln!(f, "Document ids:")?;
    writeln!(f)?;
    let rendered: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    writeln!(f, "{}", rendered.join(" "))?;

    let mut f = File::create(dir.join("lastquery.txt"))?;
    writeln!(f, "Query: \"{raw}\"")?;
    writeln!(f, "Found: {} documents", ids.len())?;
    writeln!(f, "Documents:")?;
    writeln!(f)?;
    for &id in ids {
        if let Some(doc) = corpus.get(id) {
            writeln!(f, "Document {id}")?;
            writeln!(f, "{}", doc.title)?;
            writeln!(f, "{}", doc.content)?;
            writeln!(f, "********************************************")?;
        }
    }
    Ok(())
}
