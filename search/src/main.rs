use anyhow::Result;
use clap::Parser;
use search::run_search;
use sift_core::config::{ScoreCombine, SearchConfig};
use sift_core::persist::IndexPaths;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Run a file of queries against a built index", long_about = None)]
struct Args {
    /// Dictionary file
    #[arg(short = 'd', long)]
    dictionary: PathBuf,
    /// Postings file
    #[arg(short = 'p', long)]
    postings: PathBuf,
    /// Query file, one query per line
    #[arg(short = 'q', long)]
    queries: PathBuf,
    /// Output file, one result line per query
    #[arg(short = 'o', long)]
    output: PathBuf,
    /// JSON file with search settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Feedback documents taken from the first pass
    #[arg(long)]
    top_k: Option<usize>,
    /// Original query weight in the feedback query
    #[arg(long)]
    alpha: Option<f32>,
    /// Feedback centroid weight
    #[arg(long)]
    beta: Option<f32>,
    /// How sub-query scores are combined: sum or minmax
    #[arg(long)]
    combine: Option<ScoreCombine>,
}

impl Args {
    fn search_config(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::from_json_file(path)?,
            None => SearchConfig::default(),
        };
        if let Some(k) = self.top_k { config.top_k = k; }
        if let Some(a) = self.alpha { config.alpha = a; }
        if let Some(b) = self.beta { config.beta = b; }
        if let Some(c) = self.combine { config.combine = c; }
        Ok(config)
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = args.search_config()?;
    let paths = IndexPaths::new(&args.dictionary, &args.postings);
    run_search(&paths, &args.queries, &args.output, config)?;
    Ok(())
}
