use anyhow::Result;
use clap::{Parser, Subcommand};
use sift_core::build::IndexBuilder;
use sift_core::persist::IndexPaths;
use sift_core::tokenizer::{Analyzer, AnalyzerConfig};
use sift_core::IndexMode;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

mod corpus;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the dictionary and postings files of an inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a directory of numbered files, a CSV, or JSON/JSONL
    Build {
        /// Input corpus (directory or file)
        #[arg(short = 'i', long)]
        input: PathBuf,
        /// Output dictionary file
        #[arg(short = 'd', long)]
        dictionary: PathBuf,
        /// Output postings file
        #[arg(short = 'p', long)]
        postings: PathBuf,
        /// Postings shape: boolean, ranked or phrasal
        #[arg(long, default_value_t = IndexMode::Boolean)]
        mode: IndexMode,
        /// Store term positions for phrase queries (same as --mode phrasal)
        #[arg(short = 'x', long, default_value_t = false)]
        phrasal: bool,
        /// Index stopwords instead of dropping them
        #[arg(long, default_value_t = false)]
        keep_stopwords: bool,
        /// Disable stemming
        #[arg(long, default_value_t = false)]
        no_stem: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, dictionary, postings, mode, phrasal, keep_stopwords, no_stem } => {
            let mode = if phrasal { IndexMode::Phrasal } else { mode };
            let analyzer = AnalyzerConfig { stem: !no_stem, stopwords: !keep_stopwords };
            build_index(&input, &IndexPaths::new(dictionary, postings), mode, analyzer)
        }
    }
}

fn build_index(input: &Path, paths: &IndexPaths, mode: IndexMode, config: AnalyzerConfig) -> Result<()> {
    let docs = corpus::read_corpus(input)?;
    tracing::info!(input = %input.display(), docs = docs.len(), %mode, "indexing");

    let analyzer = Analyzer::new(config);
    let mut builder = IndexBuilder::new(mode, config);
    for doc in docs {
        let terms = analyzer.analyze(&doc.text);
        builder.add_document(doc.id, doc.meta, &terms)?;
    }
    let summary = builder.finish(paths)?;

    tracing::info!(
        num_docs = summary.num_docs,
        num_terms = summary.num_terms,
        postings_bytes = summary.postings_bytes,
        dictionary = %paths.dictionary.display(),
        postings = %paths.postings.display(),
        "index build complete"
    );
    Ok(())
}
