//! Ranked free-text retrieval.
//!
//! Documents carry L2-normalized `1 + log10(tf)` weights computed at build
//! time. A query is weighted `(1 + log10(tf)) * log10(N / df)` and normalized,
//! scored by dot product, and re-scored once with a query expanded from the
//! top-ranked documents. A quoted query first narrows the candidates to the
//! documents holding the exact phrase.

pub mod combine;
pub mod feedback;
pub mod phrase;
pub mod tfidf;

use crate::config::SearchConfig;
use crate::persist::PostingsStore;
use crate::tokenizer::Analyzer;
use crate::{DocId, PostingPayload};
use anyhow::Result;
use feedback::Feedback;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

/// Running score per document.
pub type Scores = HashMap<DocId, f32>;

/// Query term weights. Ordered so accumulation is reproducible.
pub type QueryVector = BTreeMap<String, f32>;

/// Analyzed free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeTextQuery {
    /// Terms in query order, duplicates kept.
    pub tokens: Vec<String>,
    /// The query was quoted.
    pub phrase: bool,
}

impl FreeTextQuery {
    pub fn parse(text: &str, analyzer: &Analyzer) -> Self {
        let phrase = text.contains('"');
        let tokens = analyzer.analyze(&text.replace('"', " "));
        Self { tokens, phrase }
    }

    pub fn term_counts(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for t in &self.tokens {
            *counts.entry(t.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Order by descending score, ties by ascending document ID.
pub fn rank_order(scores: &Scores) -> Vec<(DocId, f32)> {
    let mut ranked: Vec<(DocId, f32)> = scores.iter().map(|(d, s)| (*d, *s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// Scores one free-text query against a ranked index.
pub struct Ranker<'s> {
    store: &'s mut PostingsStore,
    config: &'s SearchConfig,
    // decoded postings, shared by both scoring passes and the feedback step
    cache: HashMap<String, Rc<PostingPayload>>,
}

impl<'s> Ranker<'s> {
    pub fn new(store: &'s mut PostingsStore, config: &'s SearchConfig) -> Self {
        Self { store, config, cache: HashMap::new() }
    }

    fn postings(&mut self, term: &str) -> Result<Rc<PostingPayload>> {
        if let Some(p) = self.cache.get(term) {
            return Ok(Rc::clone(p));
        }
        let payload = Rc::new(self.store.get(term)?);
        self.cache.insert(term.to_string(), Rc::clone(&payload));
        Ok(payload)
    }

    /// Normalized ltc weights of the query terms.
    pub fn query_vector(&self, query: &FreeTextQuery) -> QueryVector {
        let n = self.store.num_docs();
        let counts = query.term_counts();
        let raw: Vec<f32> = counts
            .iter()
            .map(|(term, tf)| tfidf::tf_weight(*tf) * tfidf::idf_weight(n, self.store.document_frequency(term)))
            .collect();
        counts.into_keys().zip(tfidf::normalize(raw)).collect()
    }

    /// Documents containing the query as a phrase.
    ///
    /// Without stored positions only the conjunctive candidate set can be produced.
    pub fn phrase_candidates(&mut self, tokens: &[String]) -> Result<HashSet<DocId>> {
        let mut distinct: Vec<&String> = tokens.iter().collect();
        distinct.sort();
        distinct.dedup();
        let mut lists = Vec::with_capacity(distinct.len());
        for term in distinct {
            lists.push(self.postings(term)?.to_skip_list());
        }
        let candidates = phrase::intersect_cheapest_first(lists);
        if tokens.len() <= 1 {
            return Ok(candidates.as_slice().iter().copied().collect());
        }
        if !self.store.mode().has_positions() {
            tracing::warn!(mode = %self.store.mode(), "index has no positions, phrase reduced to conjunction");
            return Ok(candidates.as_slice().iter().copied().collect());
        }

        let mut payloads = Vec::with_capacity(tokens.len());
        for t in tokens {
            payloads.push(self.postings(t)?);
        }
        let mut matched = HashSet::new();
        for &doc in candidates.as_slice() {
            let positions: Option<Vec<&[u32]>> = payloads.iter().map(|p| p.positions_of(doc)).collect();
            if positions.is_some_and(|pos| phrase::is_adjacent_sequence(&pos)) {
                matched.insert(doc);
            }
        }
        Ok(matched)
    }

    /// Dot-product accumulation of `query` against document weights.
    ///
    /// With `positive_only`, zero-weight query terms are skipped; otherwise every
    /// document holding a query term enters the result, possibly with score `0`.
    pub fn score(
        &mut self,
        query: &QueryVector,
        candidates: Option<&HashSet<DocId>>,
        positive_only: bool,
    ) -> Result<Scores> {
        let mut scores = Scores::new();
        for (term, &q_weight) in query {
            if positive_only && q_weight <= 0.0 {
                continue;
            }
            let postings = self.postings(term)?;
            for (doc, d_weight) in postings.weights() {
                if candidates.is_some_and(|c| !c.contains(&doc)) {
                    continue;
                }
                *scores.entry(doc).or_insert(0.0) += q_weight * d_weight;
            }
        }
        Ok(scores)
    }

    /// Term weights summed over the given feedback documents.
    pub fn feedback(&mut self, docs: &[DocId]) -> Result<Feedback> {
        let mut feedback = Feedback::new();
        for &doc in docs {
            let terms = self.store.doc_terms(doc).to_vec();
            for term in terms {
                if let Some(w) = self.postings(&term)?.weight_of(doc) {
                    feedback.add(&term, w);
                }
            }
        }
        Ok(feedback)
    }

    /// Full pipeline: candidates, first pass, feedback expansion, final pass.
    pub fn rank(&mut self, query: &FreeTextQuery) -> Result<Scores> {
        if query.tokens.is_empty() {
            return Ok(Scores::new());
        }
        let candidates = if query.phrase {
            Some(self.phrase_candidates(&query.tokens)?)
        } else {
            None
        };

        let query_vector = self.query_vector(query);
        let first = self.score(&query_vector, candidates.as_ref(), true)?;
        let top: Vec<DocId> = rank_order(&first)
            .into_iter()
            .take(self.config.top_k)
            .map(|(doc, _)| doc)
            .collect();
        let feedback = self.feedback(&top)?;
        let expanded = feedback.expand(&query_vector, self.config.alpha, self.config.beta, self.config.top_k);
        tracing::debug!(
            terms = query_vector.len(),
            expanded = expanded.len(),
            feedback_docs = top.len(),
            "feedback query"
        );
        self.score(&expanded, candidates.as_ref(), false)
    }
}
