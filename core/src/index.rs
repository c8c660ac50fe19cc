use crate::skiplist::{SkipEntry, SkipList};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type DocId = u32;

/// Dictionary key holding every indexed document ID of a Boolean index.
pub const UNIVERSE_KEY: &str = "__all__";

/// Shape of the postings written by one index build. Fixed for the index lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    #[default]
    Boolean,
    Ranked,
    Phrasal,
}

impl IndexMode {
    pub fn is_ranked(self) -> bool {
        !matches!(self, IndexMode::Boolean)
    }

    pub fn has_positions(self) -> bool {
        matches!(self, IndexMode::Phrasal)
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexMode::Boolean => "boolean",
            IndexMode::Ranked => "ranked",
            IndexMode::Phrasal => "phrasal",
        };
        f.write_str(name)
    }
}

impl FromStr for IndexMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" => Ok(IndexMode::Boolean),
            "ranked" => Ok(IndexMode::Ranked),
            "phrasal" | "phrase" => Ok(IndexMode::Phrasal),
            other => Err(format!("unknown index mode `{other}` (expected boolean, ranked or phrasal)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub title: Option<String>,
    pub date: Option<String>,
    pub court: Option<String>,
    /// Anchor text of links pointing at a crawled page.
    pub anchor: Option<String>,
}

/// Dictionary record: where a term's posting payload lives in the postings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Document frequency.
    pub frequency: u32,
    pub offset: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub tf: u32,
    pub weight: f32, // normalized tf weight of the term in the document
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalPosting {
    pub tf: u32,
    /// Ascending term positions within the document.
    pub positions: Vec<u32>,
    pub weight: f32,
}

/// Serialized record of one term in the postings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostingPayload {
    DocIdSet(Vec<SkipEntry>),
    FrequencyMap(BTreeMap<DocId, Posting>),
    PositionalFrequencyMap(BTreeMap<DocId, PositionalPosting>),
}

impl PostingPayload {
    /// The empty payload of the variant an index of `mode` stores.
    pub fn empty(mode: IndexMode) -> Self {
        match mode {
            IndexMode::Boolean => PostingPayload::DocIdSet(Vec::new()),
            IndexMode::Ranked => PostingPayload::FrequencyMap(BTreeMap::new()),
            IndexMode::Phrasal => PostingPayload::PositionalFrequencyMap(BTreeMap::new()),
        }
    }

    pub fn mode(&self) -> IndexMode {
        match self {
            PostingPayload::DocIdSet(_) => IndexMode::Boolean,
            PostingPayload::FrequencyMap(_) => IndexMode::Ranked,
            PostingPayload::PositionalFrequencyMap(_) => IndexMode::Phrasal,
        }
    }

    /// Document frequency of the term.
    pub fn len(&self) -> usize {
        match self {
            PostingPayload::DocIdSet(entries) => entries.len(),
            PostingPayload::FrequencyMap(map) => map.len(),
            PostingPayload::PositionalFrequencyMap(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending document IDs, skip-annotated when the payload carries pointers.
    pub fn to_skip_list(&self) -> SkipList {
        match self {
            PostingPayload::DocIdSet(entries) => SkipList::from_entries(entries.clone()),
            PostingPayload::FrequencyMap(map) => SkipList::from_sorted(map.keys().copied().collect()),
            PostingPayload::PositionalFrequencyMap(map) => {
                SkipList::from_sorted(map.keys().copied().collect())
            }
        }
    }

    /// `(doc, weight)` pairs in ascending document order. Empty for Boolean payloads.
    pub fn weights(&self) -> Box<dyn Iterator<Item = (DocId, f32)> + '_> {
        match self {
            PostingPayload::DocIdSet(_) => Box::new(std::iter::empty()),
            PostingPayload::FrequencyMap(map) => Box::new(map.iter().map(|(d, p)| (*d, p.weight))),
            PostingPayload::PositionalFrequencyMap(map) => {
                Box::new(map.iter().map(|(d, p)| (*d, p.weight)))
            }
        }
    }

    pub fn weight_of(&self, doc_id: DocId) -> Option<f32> {
        match self {
            PostingPayload::DocIdSet(_) => None,
            PostingPayload::FrequencyMap(map) => map.get(&doc_id).map(|p| p.weight),
            PostingPayload::PositionalFrequencyMap(map) => map.get(&doc_id).map(|p| p.weight),
        }
    }

    /// Term positions in `doc_id`; `None` when the payload is not positional.
    pub fn positions_of(&self, doc_id: DocId) -> Option<&[u32]> {
        match self {
            PostingPayload::PositionalFrequencyMap(map) => {
                map.get(&doc_id).map(|p| p.positions.as_slice())
            }
            _ => None,
        }
    }
}
