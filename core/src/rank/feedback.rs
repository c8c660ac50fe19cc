//! Pseudo-relevance feedback.

use super::QueryVector;
use std::collections::BTreeMap;

/// Summed document weights of every term seen in the feedback documents.
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    sums: BTreeMap<String, f32>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a feedback document holds `term` with `weight`.
    pub fn add(&mut self, term: &str, weight: f32) {
        *self.sums.entry(term.to_string()).or_insert(0.0) += weight;
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    pub fn sum(&self, term: &str) -> f32 {
        self.sums.get(term).copied().unwrap_or(0.0)
    }

    /// Feedback query: `alpha * q + beta * sum / k` for query terms and
    /// `beta * sum / k` for terms only the feedback documents contribute.
    pub fn expand(&self, query: &QueryVector, alpha: f32, beta: f32, k: usize) -> QueryVector {
        let k = k.max(1) as f32;
        let mut expanded: QueryVector = query
            .iter()
            .map(|(term, w)| (term.clone(), alpha * w + beta * self.sum(term) / k))
            .collect();
        for (term, sum) in &self.sums {
            expanded.entry(term.clone()).or_insert(beta * sum / k);
        }
        expanded
    }
}
