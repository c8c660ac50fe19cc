use crate::error::InvalidSkipEntry;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lists of this length or shorter carry no skip pointers.
pub const SKIP_THRESHOLD: usize = 9;

/// One on-disk posting: a document ID and, at skip positions, the ID it jumps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipEntry {
    pub doc_id: DocId,
    pub skip_to: Option<DocId>,
}

impl SkipEntry {
    pub fn plain(doc_id: DocId) -> Self {
        Self { doc_id, skip_to: None }
    }
}

impl fmt::Display for SkipEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.skip_to {
            Some(target) => write!(f, "{}:{}", self.doc_id, target),
            None => write!(f, "{}", self.doc_id),
        }
    }
}

impl FromStr for SkipEntry {
    type Err = InvalidSkipEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSkipEntry(s.to_string());
        let (id, target) = match s.split_once(':') {
            Some((id, target)) => (id, Some(target)),
            None => (s, None),
        };
        let doc_id = id.trim().parse().map_err(|_| invalid())?;
        let skip_to = match target {
            Some(t) => Some(t.trim().parse().map_err(|_| invalid())?),
            None => None,
        };
        Ok(Self { doc_id, skip_to })
    }
}

/// Distance between two skip positions for a list of `len` entries.
pub fn skip_step(len: usize) -> usize {
    (len as f64).sqrt().floor() as usize
}

/// `(source, target)` index pairs of every skip pointer for a list of `len` entries.
///
/// Sources sit every `skip_step(len)` positions. A pointer whose step would run
/// past the end targets the last element instead.
pub fn skip_layout(len: usize) -> Vec<(usize, usize)> {
    if len <= SKIP_THRESHOLD {
        return Vec::new();
    }
    let step = skip_step(len);
    (0..len)
        .step_by(step)
        .map(|source| (source, (source + step).min(len - 1)))
        .collect()
}

/// Annotate a strictly ascending ID list with skip pointers.
pub fn annotate(ids: &[DocId]) -> Vec<SkipEntry> {
    let mut entries: Vec<SkipEntry> = ids.iter().copied().map(SkipEntry::plain).collect();
    for (source, target) in skip_layout(ids.len()) {
        entries[source].skip_to = Some(ids[target]);
    }
    entries
}

/// Ascending, duplicate-free document IDs with evenly spaced skip pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    ids: Vec<DocId>,
    // index of the skip target, per position
    skips: Vec<Option<usize>>,
    step: usize,
}

impl SkipList {
    /// Build from IDs in any order; duplicates are dropped.
    pub fn new(ids: impl IntoIterator<Item = DocId>) -> Self {
        let mut ids: Vec<DocId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self::from_sorted(ids)
    }

    /// Build from IDs the caller guarantees are strictly ascending.
    pub fn from_sorted(ids: Vec<DocId>) -> Self {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids must be strictly ascending");
        let mut skips = vec![None; ids.len()];
        for (source, target) in skip_layout(ids.len()) {
            skips[source] = Some(target);
        }
        Self { step: skip_step(ids.len()), ids, skips }
    }

    /// Rebuild from entries read back from disk.
    ///
    /// Entries are re-sorted by document ID. A stored pointer is kept only when
    /// its target is present in the list at or after its source.
    pub fn from_entries(mut entries: Vec<SkipEntry>) -> Self {
        entries.sort_by_key(|e| e.doc_id);
        entries.dedup_by_key(|e| e.doc_id);
        let ids: Vec<DocId> = entries.iter().map(|e| e.doc_id).collect();
        let skips = if ids.len() <= SKIP_THRESHOLD {
            vec![None; ids.len()]
        } else {
            entries
                .iter()
                .enumerate()
                .map(|(source, e)| {
                    e.skip_to
                        .and_then(|target| ids.binary_search(&target).ok())
                        .filter(|&target| target >= source)
                })
                .collect()
        };
        Self { step: skip_step(ids.len()), ids, skips }
    }

    /// Parse textual `id` / `id:target` entries.
    pub fn from_encoded<S: AsRef<str>>(items: &[S]) -> Result<Self, InvalidSkipEntry> {
        let entries = items
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<SkipEntry>, _>>()?;
        Ok(Self::from_entries(entries))
    }

    /// Entries in on-disk form.
    pub fn entries(&self) -> Vec<SkipEntry> {
        self.ids
            .iter()
            .zip(&self.skips)
            .map(|(&doc_id, skip)| SkipEntry { doc_id, skip_to: skip.map(|t| self.ids[t]) })
            .collect()
    }

    /// `(source, target)` document IDs of every skip pointer.
    pub fn pointers(&self) -> impl Iterator<Item = (DocId, DocId)> + '_ {
        self.ids
            .iter()
            .zip(&self.skips)
            .filter_map(|(&doc_id, skip)| skip.map(|t| (doc_id, self.ids[t])))
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[DocId] {
        &self.ids
    }

    pub fn into_vec(self) -> Vec<DocId> {
        self.ids
    }

    pub fn cursor(&self) -> SkipCursor<'_> {
        SkipCursor { list: self, pos: 0 }
    }
}

impl FromIterator<DocId> for SkipList {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        SkipList::new(iter)
    }
}

/// Forward cursor over a [`SkipList`]. Exhaustion is `None`, never a sentinel ID.
#[derive(Debug, Clone)]
pub struct SkipCursor<'a> {
    list: &'a SkipList,
    pos: usize,
}

impl SkipCursor<'_> {
    pub fn next_doc(&mut self) -> Option<DocId> {
        let id = *self.list.ids.get(self.pos)?;
        self.pos += 1;
        Some(id)
    }

    /// Advance toward `target`.
    ///
    /// If the next entry carries a skip pointer whose destination is `<= target`,
    /// the cursor jumps straight to that destination and returns it.
    pub fn next_toward(&mut self, target: DocId) -> Option<DocId> {
        if self.pos >= self.list.len() {
            return None;
        }
        if self.list.len() > SKIP_THRESHOLD {
            if let Some(dest) = self.list.skips[self.pos] {
                let id = self.list.ids[dest];
                if id <= target {
                    self.pos = dest + 1;
                    return Some(id);
                }
            }
        }
        self.next_doc()
    }
}

impl Iterator for SkipCursor<'_> {
    type Item = DocId;

    fn next(&mut self) -> Option<DocId> {
        self.next_doc()
    }
}
