//! Unified storage interface
//!
//! The `Store` wires the node store, the edge logs, and the search index
//! behind the operation set callers use: create and fetch nodes, append
//! relations, search, and rebuild the index.
//!
//! ## Durability contract
//!
//! Node writes and edge appends are strict: a validation failure aborts
//! before any write. Index updates are advisory: a failed incremental update
//! leaves the content node durably stored and is reported as
//! [`IndexStatus::Degraded`]; `rebuild_index` reconciles the drift.

use std::str::FromStr;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::StoreResult;
#[cfg(test)]
use crate::error::StoreError;
use crate::index::SearchIndex;
use crate::models::{
    AuthorEdge, AuthorHandles, AuthorNode, ContentDraft, ContentNode, LinkEdge, LinkNode, Node,
    RelatesEdge, RelationType, Style, StyleNode, TagEdge, TagNode,
};
use crate::query::{self, SearchRequest, SearchResponse};
use crate::slug::slugify;
use crate::storage::{EdgeLog, NodeKind, NodeStore};

/// Whether the search index reflects a newly created content node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The incremental index update succeeded
    Updated,
    /// The update failed; the node is durably stored but search lags behind
    /// until the next `rebuild_index`
    Degraded,
}

/// Outcome of `create_content`: the node is always stored, the index may lag
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedContent {
    pub id: Uuid,
    pub index: IndexStatus,
}

/// Unified storage interface for quill
pub struct Store {
    config: Config,
    nodes: NodeStore,
    edges: EdgeLog,
    index: SearchIndex,
}

impl Store {
    /// Open the store using configuration from the default location
    pub fn open() -> anyhow::Result<Self> {
        let config = Config::load()?;
        Ok(Self::open_with_config(config)?)
    }

    /// Open the store rooted at the configured data directory
    ///
    /// Creates the node, edge, and index directories if absent.
    pub fn open_with_config(config: Config) -> StoreResult<Self> {
        let nodes = NodeStore::open(&config)?;
        let edges = EdgeLog::open(&config)?;
        let index = SearchIndex::open(&config)?;
        Ok(Self {
            config,
            nodes,
            edges,
            index,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Content ====================

    /// Create a content node
    ///
    /// Styles are validated all-or-nothing before anything is written. One
    /// tag edge per tag and one author edge per author are appended, lazily
    /// creating the referenced tag/author nodes. The index update is
    /// best-effort: its failure does not undo the write.
    pub fn create_content(&self, draft: ContentDraft) -> StoreResult<CreatedContent> {
        let styles = draft
            .styles
            .iter()
            .map(|name| Style::from_str(name))
            .collect::<StoreResult<Vec<_>>>()?;

        let node = ContentNode {
            id: Uuid::new_v4(),
            title: draft.title,
            date: draft.date.unwrap_or_else(Utc::now),
            style: styles,
            tags: draft.tags,
            authors: draft.authors,
            content: draft.content,
        };
        self.nodes.write_content(&node)?;

        let content_id = node.id.to_string();
        for tag in &node.tags {
            self.tag_content(&content_id, tag)?;
        }
        for author in &node.authors {
            self.credit_author(&content_id, author)?;
        }

        let index = match self.index.index_document(&node) {
            Ok(()) => IndexStatus::Updated,
            Err(err) => {
                warn!(id = %node.id, %err, "index update failed; run reindex to recover");
                IndexStatus::Degraded
            }
        };

        Ok(CreatedContent { id: node.id, index })
    }

    // ==================== Entities ====================

    /// Create a tag node if its slug is new; idempotent
    pub fn get_or_create_tag(&self, name: &str) -> StoreResult<String> {
        let slug = slugify(name);
        if !self.nodes.exists(NodeKind::Tag, &slug) {
            self.nodes.write_tag(&TagNode::new(&slug, name))?;
        }
        Ok(slug)
    }

    /// Register a style node; the name must be in the fixed enumeration
    pub fn get_or_create_style(&self, name: &str) -> StoreResult<String> {
        name.parse::<Style>()?;
        let slug = slugify(name);
        if !self.nodes.exists(NodeKind::Style, &slug) {
            self.nodes.write_style(&StyleNode::new(&slug, name))?;
        }
        Ok(slug)
    }

    /// Create an author node if its slug is new; idempotent
    ///
    /// Handles are captured only on first creation; a later call with
    /// different handles for an existing slug returns the existing id and
    /// changes nothing.
    pub fn get_or_create_author(&self, name: &str, handles: &AuthorHandles) -> StoreResult<String> {
        let slug = slugify(name);
        if !self.nodes.exists(NodeKind::Author, &slug) {
            self.nodes
                .write_author(&AuthorNode::new(&slug, name, handles))?;
        }
        Ok(slug)
    }

    /// Create a link node keyed by the slugified URL; idempotent
    pub fn get_or_create_link(
        &self,
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> StoreResult<String> {
        let slug = slugify(url);
        if !self.nodes.exists(NodeKind::Link, &slug) {
            self.nodes.write_link(&LinkNode::new(
                &slug,
                url,
                title.map(str::to_string),
                description.map(str::to_string),
            ))?;
        }
        Ok(slug)
    }

    // ==================== Edges ====================

    /// Append a relates edge between two content nodes
    ///
    /// The relation name must be `snippet_of` or `related_to`; anything else
    /// fails before a record is written.
    pub fn relate(&self, src: &str, relation: &str, dst: &str) -> StoreResult<()> {
        let relation = RelationType::from_str(relation)?;
        self.edges.append_relates(&RelatesEdge {
            src: src.to_string(),
            relation,
            dst: dst.to_string(),
            date: Utc::now(),
        })
    }

    /// Attach a tag to a content node, creating the tag node on demand
    pub fn tag_content(&self, content_id: &str, tag: &str) -> StoreResult<()> {
        let slug = self.get_or_create_tag(tag)?;
        self.edges.append_tag(&TagEdge {
            content: content_id.to_string(),
            tag: slug,
            date: Utc::now(),
        })
    }

    /// Credit an author on a content node, creating the author node on demand
    pub fn credit_author(&self, content_id: &str, author: &str) -> StoreResult<()> {
        let slug = self.get_or_create_author(author, &AuthorHandles::default())?;
        self.edges.append_author(&AuthorEdge {
            content: content_id.to_string(),
            author: slug,
            date: Utc::now(),
        })
    }

    /// Associate a URL with a content node, creating the link node on demand
    pub fn attach_link(
        &self,
        content_id: &str,
        url: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> StoreResult<()> {
        let slug = self.get_or_create_link(url, title, description)?;
        self.edges.append_link(&LinkEdge {
            content: content_id.to_string(),
            link: slug,
            date: Utc::now(),
        })
    }

    // ==================== Reads ====================

    /// Look up a node by content id or slug across every kind
    pub fn get_node(&self, id: &str) -> StoreResult<Node> {
        self.nodes.get(id)
    }

    /// Link nodes attached to a content node
    ///
    /// Dangling references are skipped and I/O problems degrade to an empty
    /// list; this is a reporting path, not a source of truth.
    pub fn links_of(&self, content_id: &str) -> Vec<LinkNode> {
        let edges = match self.edges.links_for(content_id) {
            Ok(edges) => edges,
            Err(err) => {
                debug!(%err, "links scan failed");
                return Vec::new();
            }
        };

        let mut links = Vec::new();
        for edge in edges {
            match self.nodes.read_link(&edge.link) {
                Ok(node) => links.push(node),
                Err(err) => debug!(link = %edge.link, %err, "skipping dangling link reference"),
            }
        }
        links
    }

    /// Number of stored content nodes; 0 if the directory cannot be read
    pub fn count_content(&self) -> usize {
        self.nodes.count_content()
    }

    // ==================== Search ====================

    /// Run a search over the indexed documents
    pub fn search(&self, request: &SearchRequest) -> StoreResult<SearchResponse> {
        query::run(&self.index, &self.nodes, &self.edges, request)
    }

    /// Rebuild the search index from every stored content node
    ///
    /// Replaces all three snapshot tables; the reconciliation path for any
    /// index drift.
    pub fn rebuild_index(&self) -> StoreResult<()> {
        let nodes = self.nodes.all_content()?;
        self.index.rebuild(&nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filters, SortOrder};
    use std::fs;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> Store {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
        };
        Store::open_with_config(config).unwrap()
    }

    fn draft(content: &str, styles: &[&str]) -> ContentDraft {
        let mut draft = ContentDraft::new(content);
        draft.set_styles(styles.iter().map(|s| s.to_string()).collect());
        draft
    }

    fn content_files(temp_dir: &TempDir) -> usize {
        fs::read_dir(temp_dir.path().join("nodes/content"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[test]
    fn test_create_content_stores_and_indexes() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut d = draft("Focus on user needs.", &["snippet"]);
        d.set_title("Product Notes");
        d.set_tags(vec!["product-management".to_string()]);
        d.set_authors(vec!["jane-doe".to_string()]);

        let created = store.create_content(d).unwrap();
        assert_eq!(created.index, IndexStatus::Updated);

        let node = store.get_node(&created.id.to_string()).unwrap();
        let content = node.as_content().unwrap();
        assert_eq!(content.title.as_deref(), Some("Product Notes"));
        assert_eq!(content.style, vec![Style::Snippet]);

        // tag and author nodes were lazily created
        assert_eq!(store.get_node("product-management").unwrap().kind(), "tag");
        assert_eq!(store.get_node("jane-doe").unwrap().kind(), "author");
    }

    #[test]
    fn test_invalid_style_rejected_before_any_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut d = draft("body", &["blog", "sonnet"]);
        d.set_tags(vec!["never-created".to_string()]);

        let err = store.create_content(d).unwrap_err();
        assert!(matches!(err, StoreError::InvalidStyle { name } if name == "sonnet"));

        // no partial side effects: no content file, no tag node, no edges
        assert_eq!(content_files(&temp_dir), 0);
        assert!(store.get_node("never-created").is_err());
        assert!(!temp_dir.path().join("edges/tags.jsonl").exists());
    }

    #[test]
    fn test_get_or_create_tag_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let first = store.get_or_create_tag("Machine Learning!").unwrap();
        let second = store.get_or_create_tag("machine learning").unwrap();

        assert_eq!(first, "machine-learning");
        assert_eq!(first, second);

        // exactly one node file
        let files = fs::read_dir(temp_dir.path().join("nodes/tag")).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_get_or_create_style_validates() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        assert_eq!(store.get_or_create_style("blog").unwrap(), "blog");
        assert!(store.get_or_create_style("sonnet").is_err());
        assert!(store.get_node("sonnet").is_err());
    }

    #[test]
    fn test_author_handles_first_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let handles = AuthorHandles {
            twitter: "janedoe".to_string(),
            ..Default::default()
        };
        store.get_or_create_author("Jane Doe", &handles).unwrap();

        let different = AuthorHandles {
            twitter: "someone-else".to_string(),
            ..Default::default()
        };
        let slug = store.get_or_create_author("Jane Doe", &different).unwrap();
        assert_eq!(slug, "jane-doe");

        match store.get_node("jane-doe").unwrap() {
            Node::Author(author) => assert_eq!(author.twitter_username, "janedoe"),
            other => panic!("expected author node, got {}", other.kind()),
        }
    }

    #[test]
    fn test_relate_rejects_unknown_relation() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let c1 = store.create_content(draft("one", &[])).unwrap();
        let c2 = store.create_content(draft("two", &[])).unwrap();

        store
            .relate(&c1.id.to_string(), "snippet_of", &c2.id.to_string())
            .unwrap();

        let log_path = temp_dir.path().join("edges/relates.jsonl");
        let lines_before = fs::read_to_string(&log_path).unwrap().lines().count();

        let err = store
            .relate(&c1.id.to_string(), "bogus", &c2.id.to_string())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRelation { name } if name == "bogus"));

        // nothing was appended
        let lines_after = fs::read_to_string(&log_path).unwrap().lines().count();
        assert_eq!(lines_before, lines_after);
    }

    #[test]
    fn test_links_of_skips_dangling_references() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let created = store.create_content(draft("body", &[])).unwrap();
        let content_id = created.id.to_string();

        store
            .attach_link(
                &content_id,
                "https://example.com/article",
                Some("Article"),
                None,
            )
            .unwrap();
        store
            .attach_link(&content_id, "https://gone.example.com", None, None)
            .unwrap();

        // delete one link node out from under its edge
        let gone_slug = slugify("https://gone.example.com");
        fs::remove_file(
            temp_dir
                .path()
                .join("nodes/link")
                .join(format!("{gone_slug}.json")),
        )
        .unwrap();

        let links = store.links_of(&content_id);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/article");
    }

    #[test]
    fn test_count_content() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        assert_eq!(store.count_content(), 0);
        store.create_content(draft("one", &[])).unwrap();
        store.create_content(draft("two", &[])).unwrap();
        assert_eq!(store.count_content(), 2);
    }

    #[test]
    fn test_search_empty_index() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        for sort in [SortOrder::Relevance, SortOrder::Date, SortOrder::Random] {
            let mut request = SearchRequest::new();
            request.query = Some("anything".to_string());
            request.sort = sort;
            let response = store.search(&request).unwrap();
            assert_eq!(response.total, 0);
            assert!(response.items.is_empty());
        }
    }

    #[test]
    fn test_relevance_ranking_by_term_frequency() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let c1 = store
            .create_content(draft("alpha beta gamma", &["blog"]))
            .unwrap();
        let c2 = store
            .create_content(draft("alpha alpha beta", &["post"]))
            .unwrap();
        store.rebuild_index().unwrap();

        let mut request = SearchRequest::new();
        request.query = Some("alpha".to_string());
        let response = store.search(&request).unwrap();

        assert_eq!(response.total, 2);
        // C2 contains the term twice at equal length, so it ranks first
        assert_eq!(response.items[0].id, c2.id);
        assert_eq!(response.items[1].id, c1.id);
    }

    #[test]
    fn test_search_filters_by_style_and_tag() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut blog = draft("alpha beta", &["blog"]);
        blog.set_tags(vec!["ai".to_string()]);
        let blog = store.create_content(blog).unwrap();

        let mut tweet = draft("alpha gamma", &["tweet"]);
        tweet.set_tags(vec!["ml".to_string()]);
        store.create_content(tweet).unwrap();

        let mut request = SearchRequest::new();
        request.filters = Filters {
            style: vec!["blog".to_string()],
            ..Default::default()
        };
        let response = store.search(&request).unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.items[0].id, blog.id);

        let mut request = SearchRequest::new();
        request.filters = Filters {
            tag: vec!["ai".to_string()],
            ..Default::default()
        };
        let response = store.search(&request).unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.items[0].id, blog.id);

        // unknown tag matches nothing
        let mut request = SearchRequest::new();
        request.filters = Filters {
            tag: vec!["nonexistent-tag".to_string()],
            ..Default::default()
        };
        let response = store.search(&request).unwrap();
        assert_eq!(response.total, 0);
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_search_filters_by_author_and_title_and_body() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut d = draft("The quick brown fox", &[]);
        d.set_title("Animal Facts");
        d.set_authors(vec!["jane-doe".to_string()]);
        let target = store.create_content(d).unwrap();

        let mut other = draft("Slow green turtle", &[]);
        other.set_title("More Facts");
        other.set_authors(vec!["john-roe".to_string()]);
        store.create_content(other).unwrap();

        let mut request = SearchRequest::new();
        request.filters = Filters {
            author: vec!["jane-doe".to_string()],
            ..Default::default()
        };
        assert_eq!(store.search(&request).unwrap().items[0].id, target.id);

        let mut request = SearchRequest::new();
        request.filters = Filters {
            title: Some("animal".to_string()),
            ..Default::default()
        };
        assert_eq!(store.search(&request).unwrap().total, 1);

        let mut request = SearchRequest::new();
        request.filters = Filters {
            content: Some("QUICK BROWN".to_string()),
            ..Default::default()
        };
        let response = store.search(&request).unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.items[0].id, target.id);
    }

    #[test]
    fn test_search_relates_filter() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let c1 = store.create_content(draft("parent piece", &[])).unwrap();
        let c2 = store.create_content(draft("child snippet", &[])).unwrap();
        store.create_content(draft("unrelated", &[])).unwrap();

        store
            .relate(&c2.id.to_string(), "snippet_of", &c1.id.to_string())
            .unwrap();

        let mut request = SearchRequest::new();
        request.filters = Filters {
            relates: vec![c1.id.to_string()],
            ..Default::default()
        };
        let response = store.search(&request).unwrap();

        // symmetric: both endpoints of the matching edge survive
        assert_eq!(response.total, 2);
        let ids: Vec<Uuid> = response.items.iter().map(|n| n.id).collect();
        assert!(ids.contains(&c1.id));
        assert!(ids.contains(&c2.id));
    }

    #[test]
    fn test_search_date_sort() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut old = draft("old entry", &[]);
        old.set_date("2020-01-01T00:00:00Z".parse().unwrap());
        let old = store.create_content(old).unwrap();

        let mut new = draft("new entry", &[]);
        new.set_date("2024-06-01T00:00:00Z".parse().unwrap());
        let new = store.create_content(new).unwrap();

        let mut request = SearchRequest::new();
        request.sort = SortOrder::Date;
        let response = store.search(&request).unwrap();

        assert_eq!(response.items[0].id, new.id);
        assert_eq!(response.items[1].id, old.id);
    }

    #[test]
    fn test_search_random_sort_is_seed_reproducible() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        for i in 0..8 {
            store
                .create_content(draft(&format!("document number {i}"), &[]))
                .unwrap();
        }

        let mut request = SearchRequest::new();
        request.sort = SortOrder::Random;
        request.seed = Some(42);

        let first: Vec<Uuid> = store
            .search(&request)
            .unwrap()
            .items
            .iter()
            .map(|n| n.id)
            .collect();
        let second: Vec<Uuid> = store
            .search(&request)
            .unwrap()
            .items
            .iter()
            .map(|n| n.id)
            .collect();

        assert_eq!(first.len(), 8);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pagination_bounds() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let total: usize = 7;
        for i in 0..total {
            store
                .create_content(draft(&format!("entry {i}"), &[]))
                .unwrap();
        }

        for (page, page_size) in [(1, 3), (2, 3), (3, 3), (4, 3), (1, 10), (2, 10)] {
            let mut request = SearchRequest::new();
            request.page = page;
            request.page_size = page_size;
            let response = store.search(&request).unwrap();

            let expected = total.saturating_sub((page - 1) * page_size).min(page_size);
            assert_eq!(response.items.len(), expected, "page={page} size={page_size}");
            assert_eq!(response.total, total);
            assert_eq!(response.page, page);
        }
    }

    #[test]
    fn test_search_omits_documents_missing_from_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let kept = store.create_content(draft("kept entry", &[])).unwrap();
        let removed = store.create_content(draft("removed entry", &[])).unwrap();

        // delete the node file out from under the index
        fs::remove_file(
            temp_dir
                .path()
                .join("nodes/content")
                .join(format!("{}.json", removed.id)),
        )
        .unwrap();

        let response = store.search(&SearchRequest::new()).unwrap();
        assert_eq!(response.total, 2);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].id, kept.id);
    }

    #[test]
    fn test_rebuild_reconciles_index_with_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let kept = store.create_content(draft("kept entry", &[])).unwrap();
        let removed = store.create_content(draft("removed entry", &[])).unwrap();

        fs::remove_file(
            temp_dir
                .path()
                .join("nodes/content")
                .join(format!("{}.json", removed.id)),
        )
        .unwrap();

        store.rebuild_index().unwrap();

        let response = store.search(&SearchRequest::new()).unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.items[0].id, kept.id);
    }

    #[test]
    fn test_store_reopen_preserves_data() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
        };

        let id;
        {
            let store = Store::open_with_config(config.clone()).unwrap();
            id = store.create_content(draft("durable entry", &[])).unwrap().id;
        }

        let store = Store::open_with_config(config).unwrap();
        assert_eq!(store.count_content(), 1);
        assert!(store.get_node(&id.to_string()).is_ok());

        let mut request = SearchRequest::new();
        request.query = Some("durable".to_string());
        assert_eq!(store.search(&request).unwrap().total, 1);
    }

    #[test]
    fn test_tag_edges_written_on_create() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let mut d = draft("tagged body", &[]);
        d.set_tags(vec!["Machine Learning!".to_string()]);
        let created = store.create_content(d).unwrap();

        let text = fs::read_to_string(temp_dir.path().join("edges/tags.jsonl")).unwrap();
        let record: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(record["content"], created.id.to_string());
        assert_eq!(record["tag"], "machine-learning");
        assert_eq!(record["type"], "is_tagged");
    }
}
