//! Node persistence
//!
//! One JSON document per node, grouped by kind under `nodes/`. Content ids
//! (UUIDs) and slug ids live in disjoint namespaces, so a cross-kind lookup
//! by bare id is unambiguous.

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::atomic_write;
use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::{AuthorNode, ContentNode, LinkNode, Node, StyleNode, TagNode};

/// The five stored node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Content,
    Tag,
    Style,
    Author,
    Link,
}

impl NodeKind {
    /// All kinds, in lookup order
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Content,
        NodeKind::Tag,
        NodeKind::Style,
        NodeKind::Author,
        NodeKind::Link,
    ];

    /// Subdirectory name under `nodes/`
    pub fn dir_name(&self) -> &'static str {
        match self {
            NodeKind::Content => "content",
            NodeKind::Tag => "tag",
            NodeKind::Style => "style",
            NodeKind::Author => "author",
            NodeKind::Link => "link",
        }
    }
}

/// Durable storage for nodes
pub struct NodeStore {
    nodes_dir: PathBuf,
}

impl NodeStore {
    /// Open the store, creating the per-kind directories if absent
    pub fn open(config: &Config) -> StoreResult<Self> {
        let nodes_dir = config.nodes_dir();
        for kind in NodeKind::ALL {
            let dir = nodes_dir.join(kind.dir_name());
            fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self { nodes_dir })
    }

    fn node_path(&self, kind: NodeKind, id: &str) -> PathBuf {
        self.nodes_dir
            .join(kind.dir_name())
            .join(format!("{id}.json"))
    }

    fn write_node<T: Serialize>(&self, kind: NodeKind, id: &str, node: &T) -> StoreResult<()> {
        let path = self.node_path(kind, id);
        let data = serde_json::to_vec_pretty(node).map_err(|source| StoreError::InvalidJson {
            path: path.clone(),
            source,
        })?;
        atomic_write(&path, &data)
    }

    fn read_node<T: DeserializeOwned>(&self, kind: NodeKind, id: &str) -> StoreResult<T> {
        let path = self.node_path(kind, id);
        if !path.exists() {
            return Err(StoreError::NodeNotFound { id: id.to_string() });
        }
        let data = fs::read(&path).map_err(|e| StoreError::from_io(e, path.clone()))?;
        serde_json::from_slice(&data).map_err(|source| StoreError::InvalidJson { path, source })
    }

    /// Whether a node file of this kind exists for the id
    pub fn exists(&self, kind: NodeKind, id: &str) -> bool {
        self.node_path(kind, id).exists()
    }

    pub fn write_content(&self, node: &ContentNode) -> StoreResult<()> {
        self.write_node(NodeKind::Content, &node.id.to_string(), node)
    }

    pub fn read_content(&self, id: &str) -> StoreResult<ContentNode> {
        self.read_node(NodeKind::Content, id)
    }

    pub fn write_tag(&self, node: &TagNode) -> StoreResult<()> {
        self.write_node(NodeKind::Tag, &node.id, node)
    }

    pub fn write_style(&self, node: &StyleNode) -> StoreResult<()> {
        self.write_node(NodeKind::Style, &node.id, node)
    }

    pub fn write_author(&self, node: &AuthorNode) -> StoreResult<()> {
        self.write_node(NodeKind::Author, &node.id, node)
    }

    pub fn write_link(&self, node: &LinkNode) -> StoreResult<()> {
        self.write_node(NodeKind::Link, &node.id, node)
    }

    pub fn read_link(&self, id: &str) -> StoreResult<LinkNode> {
        self.read_node(NodeKind::Link, id)
    }

    /// Look up a node by id across every kind
    pub fn get(&self, id: &str) -> StoreResult<Node> {
        if self.exists(NodeKind::Content, id) {
            return Ok(Node::Content(self.read_node(NodeKind::Content, id)?));
        }
        if self.exists(NodeKind::Tag, id) {
            return Ok(Node::Tag(self.read_node(NodeKind::Tag, id)?));
        }
        if self.exists(NodeKind::Style, id) {
            return Ok(Node::Style(self.read_node(NodeKind::Style, id)?));
        }
        if self.exists(NodeKind::Author, id) {
            return Ok(Node::Author(self.read_node(NodeKind::Author, id)?));
        }
        if self.exists(NodeKind::Link, id) {
            return Ok(Node::Link(self.read_node(NodeKind::Link, id)?));
        }
        Err(StoreError::NodeNotFound { id: id.to_string() })
    }

    /// Count stored content nodes
    ///
    /// Returns 0 instead of failing; this feeds non-critical reporting only.
    pub fn count_content(&self) -> usize {
        let dir = self.nodes_dir.join(NodeKind::Content.dir_name());
        match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count(),
            Err(_) => 0,
        }
    }

    /// All readable content nodes; unparseable files are skipped
    pub fn all_content(&self) -> StoreResult<Vec<ContentNode>> {
        let dir = self.nodes_dir.join(NodeKind::Content.dir_name());
        let entries = fs::read_dir(&dir).map_err(|e| StoreError::from_io(e, dir.clone()))?;

        let mut nodes = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let parsed = fs::read(&path)
                .ok()
                .and_then(|data| serde_json::from_slice::<ContentNode>(&data).ok());
            match parsed {
                Some(node) => nodes.push(node),
                None => debug!(?path, "skipping unreadable content node"),
            }
        }
        Ok(nodes)
    }
}
