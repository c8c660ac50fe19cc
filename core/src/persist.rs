use crate::boolean::PostingSource;
use crate::skiplist::SkipList;
use crate::tokenizer::AnalyzerConfig;
use crate::{DocId, DocMeta, Entry, IndexMode, PostingPayload, UNIVERSE_KEY};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 2;

/// Dictionary and postings files, always opened as a pair.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub dictionary: PathBuf,
    pub postings: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(dictionary: P, postings: Q) -> Self {
        Self { dictionary: dictionary.as_ref().to_path_buf(), postings: postings.as_ref().to_path_buf() }
    }

    /// `dictionary.bin` and `postings.bin` inside `root`.
    pub fn in_dir<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self::new(root.join("dictionary.bin"), root.join("postings.bin"))
    }
}

/// Everything stored in the dictionary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryFile {
    pub version: u32,
    pub created_at: String,
    pub mode: IndexMode,
    pub analyzer: AnalyzerConfig,
    pub num_docs: u32,
    pub docs: BTreeMap<DocId, DocMeta>,
    /// Distinct terms of each document. Only filled for ranked indexes.
    pub doc_terms: BTreeMap<DocId, Vec<String>>,
    pub entries: HashMap<String, Entry>,
}

pub fn save_dictionary(path: &Path, dict: &DictionaryFile) -> Result<()> {
    let f = File::create(path).with_context(|| format!("creating dictionary {}", path.display()))?;
    let mut out = BufWriter::new(f);
    bincode::serialize_into(&mut out, dict)?;
    out.flush()?;
    Ok(())
}

pub fn load_dictionary(path: &Path) -> Result<DictionaryFile> {
    let mut f = File::open(path).with_context(|| format!("opening dictionary {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let dict: DictionaryFile = bincode::deserialize(&buf)
        .with_context(|| format!("corrupt dictionary {}", path.display()))?;
    if dict.version != FORMAT_VERSION {
        bail!("dictionary {} has format version {}, expected {}", path.display(), dict.version, FORMAT_VERSION);
    }
    Ok(dict)
}

/// Appends serialized posting payloads and records where each one landed.
pub struct PostingsWriter {
    out: BufWriter<File>,
    mode: IndexMode,
    offset: u64,
    entries: HashMap<String, Entry>,
}

impl PostingsWriter {
    pub fn create(path: &Path, mode: IndexMode) -> Result<Self> {
        let f = File::create(path).with_context(|| format!("creating postings {}", path.display()))?;
        Ok(Self { out: BufWriter::new(f), mode, offset: 0, entries: HashMap::new() })
    }

    pub fn put(&mut self, term: &str, payload: &PostingPayload) -> Result<()> {
        if payload.mode() != self.mode {
            bail!("{} postings for `{term}` in a {} index", payload.mode(), self.mode);
        }
        let bytes = bincode::serialize(payload)?;
        self.out.write_all(&bytes)?;
        let size = bytes.len() as u64;
        self.entries.insert(
            term.to_string(),
            Entry { frequency: payload.len() as u32, offset: self.offset, size },
        );
        self.offset += size;
        Ok(())
    }

    /// Flush the postings file and hand back the dictionary entries.
    pub fn finish(mut self) -> Result<HashMap<String, Entry>> {
        self.out.flush()?;
        Ok(self.entries)
    }
}

/// Read side of an index: the dictionary held in memory plus the open postings file.
pub struct PostingsStore {
    dict: DictionaryFile,
    postings: BufReader<File>,
    path: PathBuf,
}

impl PostingsStore {
    pub fn open(paths: &IndexPaths) -> Result<Self> {
        let dict = load_dictionary(&paths.dictionary)?;
        let f = File::open(&paths.postings)
            .with_context(|| format!("opening postings {}", paths.postings.display()))?;
        tracing::debug!(mode = %dict.mode, num_docs = dict.num_docs, num_terms = dict.entries.len(), "opened index");
        Ok(Self { dict, postings: BufReader::new(f), path: paths.postings.clone() })
    }

    pub fn mode(&self) -> IndexMode { self.dict.mode }

    pub fn analyzer(&self) -> AnalyzerConfig { self.dict.analyzer }

    pub fn num_docs(&self) -> u32 { self.dict.num_docs }

    pub fn created_at(&self) -> &str { &self.dict.created_at }

    pub fn doc_meta(&self, doc_id: DocId) -> Option<&DocMeta> { self.dict.docs.get(&doc_id) }

    /// Distinct terms of a document; empty for Boolean indexes.
    pub fn doc_terms(&self, doc_id: DocId) -> &[String] {
        self.dict.doc_terms.get(&doc_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dictionary record of a query term. The reserved universe key is not a term.
    pub fn entry(&self, term: &str) -> Option<&Entry> {
        if term == UNIVERSE_KEY {
            return None;
        }
        self.dict.entries.get(term)
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.entry(term).map(|e| e.frequency).unwrap_or(0)
    }

    /// Seek to the term's record and decode it. Unknown terms give an empty payload.
    pub fn get(&mut self, term: &str) -> Result<PostingPayload> {
        match self.entry(term).copied() {
            Some(entry) => self.read_at(term, entry),
            None => Ok(PostingPayload::empty(self.dict.mode)),
        }
    }

    fn read_at(&mut self, term: &str, entry: Entry) -> Result<PostingPayload> {
        self.postings.seek(SeekFrom::Start(entry.offset))?;
        let mut buf = vec![0u8; entry.size as usize];
        self.postings
            .read_exact(&mut buf)
            .with_context(|| format!("reading postings for `{term}` from {}", self.path.display()))?;
        let payload = bincode::deserialize(&buf)
            .with_context(|| format!("corrupt postings for `{term}` in {}", self.path.display()))?;
        Ok(payload)
    }

    /// Every indexed document ID.
    pub fn universe(&mut self) -> Result<SkipList> {
        if self.dict.mode.is_ranked() {
            return Ok(SkipList::from_sorted(self.dict.docs.keys().copied().collect()));
        }
        match self.dict.entries.get(UNIVERSE_KEY).copied() {
            Some(entry) => Ok(self.read_at(UNIVERSE_KEY, entry)?.to_skip_list()),
            None => Ok(SkipList::default()),
        }
    }
}

impl PostingSource for PostingsStore {
    fn doc_ids(&mut self, term: &str) -> Result<SkipList> {
        Ok(self.get(term)?.to_skip_list())
    }

    fn universe(&mut self) -> Result<SkipList> {
        PostingsStore::universe(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skiplist::{annotate, SkipEntry};
    use tempfile::tempdir;

    fn dictionary(mode: IndexMode, entries: HashMap<String, Entry>) -> DictionaryFile {
        DictionaryFile {
            version: FORMAT_VERSION,
            created_at: "2024-01-01T00:00:00Z".into(),
            mode,
            analyzer: AnalyzerConfig::default(),
            num_docs: 12,
            docs: (1..=12).map(|d| (d, DocMeta::default())).collect(),
            doc_terms: BTreeMap::new(),
            entries,
        }
    }

    #[test]
    fn put_then_get_by_offset() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        let mut writer = PostingsWriter::create(&paths.postings, IndexMode::Boolean).unwrap();
        let long: Vec<DocId> = (1..=12).collect();
        writer.put("apple", &PostingPayload::DocIdSet(annotate(&[2, 5]))).unwrap();
        writer.put("pear", &PostingPayload::DocIdSet(annotate(&long))).unwrap();
        let entries = writer.finish().unwrap();
        assert_eq!(entries["apple"].offset, 0);
        assert_eq!(entries["pear"].offset, entries["apple"].size);
        assert_eq!(entries["pear"].frequency, 12);
        save_dictionary(&paths.dictionary, &dictionary(IndexMode::Boolean, entries)).unwrap();

        let mut store = PostingsStore::open(&paths).unwrap();
        let pear = store.doc_ids("pear").unwrap();
        assert_eq!(pear.as_slice(), long.as_slice());
        assert_eq!(pear.pointers().count(), 4);
        assert_eq!(store.doc_ids("apple").unwrap().as_slice(), &[2, 5]);
    }

    #[test]
    fn missing_term_is_empty_not_error() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        let writer = PostingsWriter::create(&paths.postings, IndexMode::Ranked).unwrap();
        let entries = writer.finish().unwrap();
        save_dictionary(&paths.dictionary, &dictionary(IndexMode::Ranked, entries)).unwrap();

        let mut store = PostingsStore::open(&paths).unwrap();
        let payload = store.get("nothing").unwrap();
        assert_eq!(payload, PostingPayload::empty(IndexMode::Ranked));
        assert_eq!(store.document_frequency("nothing"), 0);
        assert_eq!(store.universe().unwrap().len(), 12);
    }

    #[test]
    fn universe_key_is_not_a_query_term() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        let mut writer = PostingsWriter::create(&paths.postings, IndexMode::Boolean).unwrap();
        writer.put("apple", &PostingPayload::DocIdSet(annotate(&[2, 5]))).unwrap();
        let all: Vec<SkipEntry> = (1..=12).map(SkipEntry::plain).collect();
        writer.put(UNIVERSE_KEY, &PostingPayload::DocIdSet(all)).unwrap();
        let entries = writer.finish().unwrap();
        save_dictionary(&paths.dictionary, &dictionary(IndexMode::Boolean, entries)).unwrap();

        let mut store = PostingsStore::open(&paths).unwrap();
        assert!(store.doc_ids(UNIVERSE_KEY).unwrap().is_empty());
        assert_eq!(store.document_frequency(UNIVERSE_KEY), 0);
        assert_eq!(store.universe().unwrap().len(), 12);
    }

    #[test]
    fn writer_rejects_mixed_payloads() {
        let dir = tempdir().unwrap();
        let mut writer = PostingsWriter::create(&dir.path().join("p.bin"), IndexMode::Ranked).unwrap();
        assert!(writer.put("x", &PostingPayload::DocIdSet(Vec::new())).is_err());
    }

    #[test]
    fn missing_files_fail_to_open() {
        let dir = tempdir().unwrap();
        assert!(PostingsStore::open(&IndexPaths::in_dir(dir.path())).is_err());
    }
}
