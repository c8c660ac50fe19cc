//! Index build session: collects `(doc_id, terms)` pairs, then writes the
//! postings file and dictionary in one go.

use crate::codec::term_table;
use crate::persist::{save_dictionary, DictionaryFile, IndexPaths, PostingsWriter, FORMAT_VERSION};
use crate::rank::tfidf;
use crate::skiplist::{annotate, SkipEntry};
use crate::tokenizer::AnalyzerConfig;
use crate::{DocId, DocMeta, IndexMode, PositionalPosting, Posting, PostingPayload, UNIVERSE_KEY};
use anyhow::{bail, Result};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub num_docs: u32,
    pub num_terms: usize,
    pub postings_bytes: u64,
}

pub struct IndexBuilder {
    mode: IndexMode,
    analyzer: AnalyzerConfig,
    docs: BTreeMap<DocId, DocMeta>,
    doc_terms: BTreeMap<DocId, Vec<String>>,
    // Boolean: term -> docs
    doc_sets: BTreeMap<String, BTreeSet<DocId>>,
    // Ranked/phrasal: term -> doc -> stats
    weighted: BTreeMap<String, BTreeMap<DocId, PositionalPosting>>,
}

impl IndexBuilder {
    pub fn new(mode: IndexMode, analyzer: AnalyzerConfig) -> Self {
        Self {
            mode,
            analyzer,
            docs: BTreeMap::new(),
            doc_terms: BTreeMap::new(),
            doc_sets: BTreeMap::new(),
            weighted: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> IndexMode { self.mode }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    /// Add one document's already-normalized term sequence.
    pub fn add_document<S: AsRef<str>>(&mut self, doc_id: DocId, meta: DocMeta, terms: &[S]) -> Result<()> {
        if self.docs.contains_key(&doc_id) {
            bail!("duplicate document id {doc_id}");
        }
        self.docs.insert(doc_id, meta);
        let table = term_table(terms);

        if !self.mode.is_ranked() {
            for term in table.into_keys() {
                self.doc_sets.entry(term).or_default().insert(doc_id);
            }
            return Ok(());
        }

        let mut table: Vec<_> = table.into_iter().collect();
        table.sort_by(|a, b| a.0.cmp(&b.0));
        let weights = tfidf::normalize(table.iter().map(|(_, occ)| tfidf::tf_weight(occ.tf)).collect());
        self.doc_terms.insert(doc_id, table.iter().map(|(t, _)| t.clone()).collect());
        for ((term, occ), weight) in table.into_iter().zip(weights) {
            let posting = PositionalPosting { tf: occ.tf, positions: occ.positions, weight };
            self.weighted.entry(term).or_default().insert(doc_id, posting);
        }
        Ok(())
    }

    /// Write the postings file, then the dictionary that indexes it.
    pub fn finish(self, paths: &IndexPaths) -> Result<BuildSummary> {
        let mut writer = PostingsWriter::create(&paths.postings, self.mode)?;
        match self.mode {
            IndexMode::Boolean => {
                for (term, docs) in &self.doc_sets {
                    let ids: Vec<DocId> = docs.iter().copied().collect();
                    writer.put(term, &PostingPayload::DocIdSet(annotate(&ids)))?;
                }
                let universe = self.docs.keys().copied().map(SkipEntry::plain).collect();
                writer.put(UNIVERSE_KEY, &PostingPayload::DocIdSet(universe))?;
            }
            IndexMode::Ranked => {
                for (term, docs) in self.weighted {
                    let map = docs
                        .into_iter()
                        .map(|(doc, p)| (doc, Posting { tf: p.tf, weight: p.weight }))
                        .collect();
                    writer.put(&term, &PostingPayload::FrequencyMap(map))?;
                }
            }
            IndexMode::Phrasal => {
                for (term, docs) in self.weighted {
                    writer.put(&term, &PostingPayload::PositionalFrequencyMap(docs))?;
                }
            }
        }
        let entries = writer.finish()?;
        let postings_bytes = entries.values().map(|e| e.size).sum();

        let summary = BuildSummary {
            num_docs: self.docs.len() as u32,
            num_terms: entries.keys().filter(|k| k.as_str() != UNIVERSE_KEY).count(),
            postings_bytes,
        };
        let dict = DictionaryFile {
            version: FORMAT_VERSION,
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            mode: self.mode,
            analyzer: self.analyzer,
            num_docs: summary.num_docs,
            docs: self.docs,
            doc_terms: self.doc_terms,
            entries,
        };
        save_dictionary(&paths.dictionary, &dict)?;
        tracing::info!(mode = %dict.mode, num_docs = summary.num_docs, num_terms = summary.num_terms, "index written");
        Ok(summary)
    }
}
