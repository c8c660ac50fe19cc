//! Batch query runner: one query per input line, one result line per query.

use anyhow::{Context, Result};
use sift_core::config::SearchConfig;
use sift_core::error::QueryError;
use sift_core::persist::{IndexPaths, PostingsStore};
use sift_core::router::QueryRouter;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub queries: usize,
    pub failed: usize,
}

/// Open the index files and wrap them in a router.
pub fn open_router(paths: &IndexPaths, config: SearchConfig) -> Result<QueryRouter> {
    let store = PostingsStore::open(paths)?;
    tracing::info!(
        mode = %store.mode(),
        num_docs = store.num_docs(),
        created_at = store.created_at(),
        "index loaded"
    );
    Ok(QueryRouter::new(store, config))
}

/// Answer every line of `input`, writing space-separated document IDs to `out`.
///
/// A query that fails to compile produces an empty result line; any other
/// error aborts the batch.
pub fn run_batch<R: BufRead, W: Write>(router: &mut QueryRouter, input: R, mut out: W) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for (n, line) in input.lines().enumerate() {
        let line = line?;
        summary.queries += 1;
        let docs = match router.route(&line) {
            Ok(docs) => docs,
            Err(err) => match err.downcast_ref::<QueryError>() {
                Some(parse) => {
                    tracing::warn!(line = n + 1, query = %line, error = %parse, "malformed query");
                    summary.failed += 1;
                    Vec::new()
                }
                None => return Err(err.context(format!("query on line {}", n + 1))),
            },
        };
        let ids: Vec<String> = docs.iter().map(|d| d.to_string()).collect();
        writeln!(out, "{}", ids.join(" "))?;
    }
    out.flush()?;
    Ok(summary)
}

/// File-to-file form of [`run_batch`].
pub fn run_search(paths: &IndexPaths, queries: &Path, results: &Path, config: SearchConfig) -> Result<BatchSummary> {
    let mut router = open_router(paths, config)?;
    let input = File::open(queries).with_context(|| format!("opening queries {}", queries.display()))?;
    let output = File::create(results).with_context(|| format!("creating results {}", results.display()))?;
    let summary = run_batch(&mut router, BufReader::new(input), BufWriter::new(output))?;
    tracing::info!(queries = summary.queries, failed = summary.failed, "search complete");
    Ok(summary)
}
