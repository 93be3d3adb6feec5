//! Search index
//!
//! Derived, rebuildable artifacts: inverted postings (token -> document ->
//! term frequency), document lengths, and a per-document metadata snapshot.
//! Each table is persisted as a whole-file JSON snapshot under `index/`.
//!
//! All three tables are owned as one unit behind a mutex, so concurrent
//! read-modify-write updates cannot clobber each other. The index may still
//! lag the node store (a failed incremental update is tolerated upstream);
//! `rebuild` is the reconciliation path for any drift.

pub mod tokenizer;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::{ContentNode, Style};
use crate::storage::atomic_write;
use self::tokenizer::tokenize;

/// Per-document metadata snapshot
///
/// Kept alongside the postings so filtering and sorting avoid re-reading node
/// bodies. Never treated as a source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocMeta {
    pub date: DateTime<Utc>,
    pub title: Option<String>,
    #[serde(default)]
    pub style: Vec<Style>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
}

impl DocMeta {
    fn of(node: &ContentNode) -> Self {
        Self {
            date: node.date,
            title: node.title.clone(),
            style: node.style.clone(),
            tags: node.tags.clone(),
            authors: node.authors.clone(),
        }
    }
}

/// The three index tables
///
/// Ordered maps keep snapshots byte-stable across rebuilds of the same node
/// set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexTables {
    /// token -> document id -> term frequency
    pub postings: BTreeMap<String, BTreeMap<String, u32>>,
    /// document id -> token count (minimum 1)
    pub doc_lengths: BTreeMap<String, u32>,
    /// document id -> metadata snapshot
    pub metadata: BTreeMap<String, DocMeta>,
}

/// The on-disk inverted index with its sibling tables
pub struct SearchIndex {
    inverted_path: PathBuf,
    lengths_path: PathBuf,
    meta_path: PathBuf,
    tables: Mutex<IndexTables>,
}

impl SearchIndex {
    /// Open the index, loading any existing snapshots
    pub fn open(config: &Config) -> StoreResult<Self> {
        let dir = config.index_dir();
        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;

        let inverted_path = dir.join("inverted.json");
        let lengths_path = dir.join("doclens.json");
        let meta_path = dir.join("meta.json");

        let tables = IndexTables {
            postings: read_snapshot(&inverted_path)?,
            doc_lengths: read_snapshot(&lengths_path)?,
            metadata: read_snapshot(&meta_path)?,
        };

        Ok(Self {
            inverted_path,
            lengths_path,
            meta_path,
            tables: Mutex::new(tables),
        })
    }

    /// Add or refresh one document's contribution
    ///
    /// Only this document's own posting entries are touched; tokens it no
    /// longer contains stay behind until the next full rebuild.
    pub fn index_document(&self, node: &ContentNode) -> StoreResult<()> {
        let doc_id = node.id.to_string();
        let tokens = tokenize(&document_text(node));

        let mut tables = self.lock();
        for (token, count) in term_frequencies(&tokens) {
            tables
                .postings
                .entry(token)
                .or_default()
                .insert(doc_id.clone(), count);
        }
        tables
            .doc_lengths
            .insert(doc_id.clone(), (tokens.len() as u32).max(1));
        tables.metadata.insert(doc_id, DocMeta::of(node));

        self.persist(&tables)
    }

    /// Recompute every table from the given node set, replacing all prior
    /// state
    ///
    /// The only operation that removes stale entries.
    pub fn rebuild(&self, nodes: &[ContentNode]) -> StoreResult<()> {
        let mut fresh = IndexTables::default();
        for node in nodes {
            let doc_id = node.id.to_string();
            let tokens = tokenize(&document_text(node));
            for (token, count) in term_frequencies(&tokens) {
                fresh
                    .postings
                    .entry(token)
                    .or_default()
                    .insert(doc_id.clone(), count);
            }
            fresh
                .doc_lengths
                .insert(doc_id.clone(), (tokens.len() as u32).max(1));
            fresh.metadata.insert(doc_id, DocMeta::of(node));
        }

        let mut tables = self.lock();
        *tables = fresh;
        self.persist(&tables)
    }

    /// Current tables, cloned out from under the lock for query evaluation
    pub fn snapshot(&self) -> IndexTables {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, IndexTables> {
        // A panicking writer must not permanently disable search; the tables
        // are rebuildable snapshots.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, tables: &IndexTables) -> StoreResult<()> {
        write_snapshot(&self.inverted_path, &tables.postings)?;
        write_snapshot(&self.lengths_path, &tables.doc_lengths)?;
        write_snapshot(&self.meta_path, &tables.metadata)
    }
}

/// The text a document is indexed under: title plus body
fn document_text(node: &ContentNode) -> String {
    format!("{}\n{}", node.title.as_deref().unwrap_or(""), node.content)
}

fn term_frequencies(tokens: &[String]) -> BTreeMap<String, u32> {
    let mut tf = BTreeMap::new();
    for token in tokens {
        *tf.entry(token.clone()).or_insert(0) += 1;
    }
    tf
}

fn read_snapshot<T: DeserializeOwned + Default>(path: &Path) -> StoreResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let data = fs::read(path).map_err(|e| StoreError::from_io(e, path.to_path_buf()))?;
    serde_json::from_slice(&data).map_err(|source| StoreError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

fn write_snapshot<T: Serialize>(path: &Path, table: &T) -> StoreResult<()> {
    let data = serde_json::to_vec(table).map_err(|source| StoreError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, &data)
}
