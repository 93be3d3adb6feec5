//! Edge logs
//!
//! Append-only JSONL files, one relation family per file. Edges are facts:
//! never updated, deduplicated, or removed, so "is linked" means "appears at
//! least once". Appends are serialized so each record lands as one complete
//! line; readers skip lines they cannot parse.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::{AuthorEdge, LinkEdge, RelatesEdge, TagEdge};

const RELATES_LOG: &str = "relates.jsonl";
const TAGS_LOG: &str = "tags.jsonl";
const AUTHORS_LOG: &str = "authors.jsonl";
const LINKS_LOG: &str = "links.jsonl";

/// Append-only storage for relation records
pub struct EdgeLog {
    dir: PathBuf,
    append_lock: Mutex<()>,
}

impl EdgeLog {
    /// Open the log directory, creating it if absent
    pub fn open(config: &Config) -> StoreResult<Self> {
        let dir = config.edges_dir();
        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            append_lock: Mutex::new(()),
        })
    }

    fn log_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn append<T: Serialize>(&self, name: &str, record: &T) -> StoreResult<()> {
        let path = self.log_path(name);
        let mut line = serde_json::to_vec(record).map_err(|source| StoreError::InvalidJson {
            path: path.clone(),
            source,
        })?;
        line.push(b'\n');

        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::from_io(e, path.clone()))?;
        file.write_all(&line)
            .map_err(|e| StoreError::from_io(e, path))?;
        Ok(())
    }

    fn scan<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Vec<T>> {
        let path = self.log_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text =
            fs::read_to_string(&path).map_err(|e| StoreError::from_io(e, path.clone()))?;

        let mut records = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(err) => debug!(log = name, %err, "skipping malformed edge record"),
            }
        }
        Ok(records)
    }

    pub fn append_relates(&self, edge: &RelatesEdge) -> StoreResult<()> {
        self.append(RELATES_LOG, edge)
    }

    pub fn append_tag(&self, edge: &TagEdge) -> StoreResult<()> {
        self.append(TAGS_LOG, edge)
    }

    pub fn append_author(&self, edge: &AuthorEdge) -> StoreResult<()> {
        self.append(AUTHORS_LOG, edge)
    }

    pub fn append_link(&self, edge: &LinkEdge) -> StoreResult<()> {
        self.append(LINKS_LOG, edge)
    }

    /// All relates edges, in append order
    pub fn relates(&self) -> StoreResult<Vec<RelatesEdge>> {
        self.scan(RELATES_LOG)
    }

    /// Link edges for one content node, in append order
    pub fn links_for(&self, content_id: &str) -> StoreResult<Vec<LinkEdge>> {
        Ok(self
            .scan::<LinkEdge>(LINKS_LOG)?
            .into_iter()
            .filter(|edge| edge.content == content_id)
            .collect())
    }
}
