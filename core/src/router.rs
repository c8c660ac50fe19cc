use crate::boolean::{compile, evaluate};
use crate::config::SearchConfig;
use crate::persist::PostingsStore;
use crate::rank::{combine, rank_order, FreeTextQuery, Ranker, Scores};
use crate::tokenizer::Analyzer;
use crate::DocId;
use anyhow::Result;

/// Literal separator of independently ranked sub-queries.
pub const CONJUNCTION: &str = " AND ";

/// Dispatches query lines to the Boolean evaluator or the ranking engine,
/// depending on how the index was built.
pub struct QueryRouter {
    store: PostingsStore,
    analyzer: Analyzer,
    config: SearchConfig,
}

impl QueryRouter {
    pub fn new(store: PostingsStore, config: SearchConfig) -> Self {
        let analyzer = Analyzer::new(store.analyzer());
        Self { store, analyzer, config }
    }

    pub fn store(&self) -> &PostingsStore { &self.store }

    pub fn config(&self) -> &SearchConfig { &self.config }

    /// Resolve one query line into result document IDs.
    ///
    /// Boolean indexes return ascending IDs. Ranked indexes return IDs by
    /// descending score. A malformed Boolean query fails with a
    /// [`QueryError`](crate::error::QueryError) inside the returned error.
    pub fn route(&mut self, line: &str) -> Result<Vec<DocId>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Vec::new());
        }
        if self.store.mode().is_ranked() {
            let scores = self.rank_line(line)?;
            Ok(rank_order(&scores).into_iter().map(|(doc, _)| doc).collect())
        } else {
            let expr = compile(line, &self.analyzer)?;
            evaluate(&expr, &mut self.store)
        }
    }

    /// Rank each `AND`-separated sub-query on its own and keep the documents all of them share.
    pub fn rank_line(&mut self, line: &str) -> Result<Scores> {
        let mut subresults = Vec::new();
        let mut ranker = Ranker::new(&mut self.store, &self.config);
        for sub in line.split(CONJUNCTION) {
            let query = FreeTextQuery::parse(sub, &self.analyzer);
            subresults.push(ranker.rank(&query)?);
        }
        Ok(combine::intersect_all(subresults, self.config.combine))
    }
}
