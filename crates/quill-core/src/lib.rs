//! quill core library
//!
//! A local-first content library: short- and long-form writing stored as a
//! file-backed graph with typed metadata (tags, authors, styles, links) and
//! full-text search with ranking, filtering, sorting, and pagination.
//!
//! # Architecture
//!
//! - **Node files** are the source of truth: one JSON document per node under
//!   `nodes/<kind>/`, written atomically
//! - **Edge logs** are append-only facts (`edges/*.jsonl`); repeated links
//!   produce repeated records and readers tolerate dangling references
//! - **The search index** (`index/*.json`) is derived and rebuildable; it may
//!   lag the node store and is reconciled by `rebuild_index`
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open()?;
//!
//! let mut draft = ContentDraft::new("Focus on user needs.");
//! draft.set_styles(vec!["snippet".into()]);
//! draft.set_tags(vec!["product-management".into()]);
//! let created = store.create_content(draft)?;
//!
//! let mut request = SearchRequest::new();
//! request.query = Some("user needs".into());
//! let results = store.search(&request)?;
//! ```
//!
//! # Modules
//!
//! - `store`: unified storage interface (main entry point)
//! - `models`: node kinds, edge records, and the content draft
//! - `storage`: node files and edge logs
//! - `index`: inverted index, document lengths, metadata snapshot
//! - `query`: filter pipeline, TF-IDF scoring, sorting, pagination
//! - `excerpt`: deriving new content nodes from existing ones
//! - `slug`: name/URL normalization
//! - `config`: application configuration

pub mod config;
pub mod error;
pub mod excerpt;
pub mod index;
pub mod models;
pub mod query;
pub mod slug;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use excerpt::{Platform, RawExtract};
pub use models::{
    AuthorHandles, AuthorNode, ContentDraft, ContentNode, LinkNode, Node, RelationType, Style,
    StyleNode, TagNode,
};
pub use query::{Filters, SearchRequest, SearchResponse, SortOrder};
pub use slug::slugify;
pub use store::{CreatedContent, IndexStatus, Store};
