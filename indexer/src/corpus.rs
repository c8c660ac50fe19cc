//! Corpus readers. Each yields `(doc_id, meta, raw text)` records.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use sift_core::{DocId, DocMeta};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct RawDoc {
    pub id: DocId,
    pub meta: DocMeta,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct JsonDoc {
    id: serde_json::Value,
    #[serde(default)]
    title: Option<String>,
    body: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    court: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    document_id: String,
    #[serde(default)]
    title: Option<String>,
    content: String,
    #[serde(default)]
    date_posted: Option<String>,
    #[serde(default)]
    court: Option<String>,
}

fn parse_id(raw: &str, origin: &Path) -> Result<DocId> {
    raw.trim()
        .parse()
        .with_context(|| format!("document id `{raw}` in {} is not a non-negative integer", origin.display()))
}

/// Read every document under `input`: a directory of plain-text files named by
/// numeric ID, a `.csv` file, or a `.json`/`.jsonl` file.
pub fn read_corpus(input: &Path) -> Result<Vec<RawDoc>> {
    if input.is_dir() {
        return read_dir(input);
    }
    match input.extension().and_then(|s| s.to_str()) {
        Some("csv") => read_csv(input),
        Some("jsonl") => read_jsonl(input),
        Some("json") => read_json(input),
        _ => Err(anyhow!("unsupported corpus {} (expected a directory, .csv, .json or .jsonl)", input.display())),
    }
}

/// `12` or `0012.txt`.
fn doc_id_from_file_name(name: &str) -> Option<DocId> {
    name.strip_suffix(".txt").unwrap_or(name).parse().ok()
}

const TITLE_TAG: &str = "$T: ";
const ANCHOR_TAG: &str = "$AT: ";

/// Split a crawled page into its metadata and body.
///
/// Crawled pages open with a `$T: ` title block and a `$AT: ` anchor-text block,
/// each ending in a blank line. Any other text is body only.
fn split_page(text: String) -> (DocMeta, String) {
    let Some(rest) = text.strip_prefix(TITLE_TAG) else {
        return (DocMeta::default(), text);
    };
    let mut blocks = rest.splitn(3, "\n\n");
    let title = blocks.next().unwrap_or_default().trim().to_string();
    let mut meta = DocMeta { title: Some(title), ..DocMeta::default() };
    let mut body = String::new();
    if let Some(second) = blocks.next() {
        match second.strip_prefix(ANCHOR_TAG) {
            Some(anchor) => {
                meta.anchor = Some(anchor.trim().to_string());
                body = blocks.next().unwrap_or_default().to_string();
            }
            None => {
                body.push_str(second);
                if let Some(third) = blocks.next() {
                    body.push_str("\n\n");
                    body.push_str(third);
                }
            }
        }
    }
    (meta, body)
}

fn read_dir(dir: &Path) -> Result<Vec<RawDoc>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            files.push(entry.path().to_path_buf());
        }
    }
    let mut docs = Vec::with_capacity(files.len());
    for file in files {
        let Some(name) = file.file_name().and_then(|s| s.to_str()) else { continue };
        let Some(id) = doc_id_from_file_name(name) else {
            tracing::warn!(file = %file.display(), "skipping file without a numeric name");
            continue;
        };
        let text = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
        let (meta, text) = split_page(text);
        docs.push(RawDoc { id, meta, text });
    }
    docs.sort_by_key(|d| d.id);
    Ok(docs)
}

fn read_csv(file: &Path) -> Result<Vec<RawDoc>> {
    let mut reader = csv::Reader::from_path(file).with_context(|| format!("opening {}", file.display()))?;
    let mut docs = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row.with_context(|| format!("reading {}", file.display()))?;
        docs.push(RawDoc {
            id: parse_id(&row.document_id, file)?,
            meta: DocMeta { title: row.title, date: row.date_posted, court: row.court, anchor: None },
            text: row.content,
        });
    }
    Ok(docs)
}

fn from_json(doc: JsonDoc, file: &Path) -> Result<RawDoc> {
    let id = match &doc.id {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(RawDoc {
        id: parse_id(&id, file)?,
        meta: DocMeta { title: doc.title, date: doc.date, court: doc.court, anchor: None },
        text: doc.body,
    })
}

fn read_jsonl(file: &Path) -> Result<Vec<RawDoc>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: JsonDoc = serde_json::from_str(&line)?;
        docs.push(from_json(doc, file)?);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<RawDoc>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))?;
    let mut docs = Vec::new();
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(from_json(serde_json::from_value(v)?, file)?);
            }
        }
        obj @ serde_json::Value::Object(_) => docs.push(from_json(serde_json::from_value(obj)?, file)?),
        _ => return Err(anyhow!("{} holds neither a document nor an array of documents", file.display())),
    }
    Ok(docs)
}
