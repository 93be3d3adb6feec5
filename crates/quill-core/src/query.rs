//! Query engine
//!
//! Tokenize, filter, score, sort, paginate, hydrate. Runs over an index
//! snapshot plus the node store (body filter, hydration) and the relates log
//! (relation filter).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::index::tokenizer::tokenize;
use crate::index::{IndexTables, SearchIndex};
use crate::models::{ContentNode, Style};
use crate::storage::{EdgeLog, NodeStore};

/// Sort strategies for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Descending TF-IDF score; ties keep candidate order
    #[default]
    Relevance,
    /// Newest first
    Date,
    /// Shuffled, reproducible when a seed is supplied
    Random,
}

/// Metadata filters, applied in a fixed order
///
/// Each populated filter narrows the candidate set by intersection. The
/// cheap metadata filters run before the body scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    /// Keep documents whose style set intersects these (enumeration values)
    pub style: Vec<String>,
    /// Keep documents whose tag list intersects these slugs
    pub tag: Vec<String>,
    /// Keep documents whose author list intersects these slugs
    pub author: Vec<String>,
    /// Case-insensitive substring match against the title
    pub title: Option<String>,
    /// Case-insensitive substring match against the full stored body
    pub content: Option<String>,
    /// Keep documents connected by a relates edge to these content ids
    pub relates: Vec<String>,
}

/// A search invocation
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub filters: Filters,
    pub sort: SortOrder,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    /// Seed for the random sort; omit for a non-reproducible shuffle
    pub seed: Option<u64>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self {
            query: None,
            filters: Filters::default(),
            sort: SortOrder::Relevance,
            page: 1,
            page_size: 10,
            seed: None,
        }
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResponse {
    pub items: Vec<ContentNode>,
    /// Candidate count before pagination
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Run a search against the current index snapshot
pub(crate) fn run(
    index: &SearchIndex,
    nodes: &NodeStore,
    edges: &EdgeLog,
    request: &SearchRequest,
) -> StoreResult<SearchResponse> {
    let tables = index.snapshot();
    let query_tokens = tokenize(request.query.as_deref().unwrap_or(""));

    // Ordered metadata keys give a stable iteration order for tie-breaking.
    let candidates: Vec<String> = tables.metadata.keys().cloned().collect();
    let mut candidates = apply_filters(candidates, &tables, nodes, edges, &request.filters)?;

    match request.sort {
        SortOrder::Relevance => {
            let scores = score_candidates(&tables, &query_tokens);
            candidates.sort_by(|a, b| {
                let score_a = scores.get(a).copied().unwrap_or(0.0);
                let score_b = scores.get(b).copied().unwrap_or(0.0);
                score_b.total_cmp(&score_a)
            });
        }
        SortOrder::Date => {
            candidates.sort_by(|a, b| {
                let date_a = tables.metadata.get(a).map(|m| m.date);
                let date_b = tables.metadata.get(b).map(|m| m.date);
                date_b.cmp(&date_a)
            });
        }
        SortOrder::Random => match request.seed {
            Some(seed) => candidates.shuffle(&mut ChaCha8Rng::seed_from_u64(seed)),
            None => candidates.shuffle(&mut rand::thread_rng()),
        },
    }

    let total = candidates.len();
    let start = request.page.saturating_sub(1).saturating_mul(request.page_size);
    let end = start.saturating_add(request.page_size).min(total);
    let page_ids: &[String] = if start < total {
        &candidates[start..end]
    } else {
        &[]
    };

    let mut items = Vec::with_capacity(page_ids.len());
    for id in page_ids {
        match nodes.read_content(id) {
            Ok(node) => items.push(node),
            // tolerate drift between the index and the node store
            Err(StoreError::NodeNotFound { .. }) => {
                debug!(%id, "indexed document missing from node store");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(SearchResponse {
        items,
        total,
        page: request.page,
        page_size: request.page_size,
    })
}

fn apply_filters(
    mut candidates: Vec<String>,
    tables: &IndexTables,
    nodes: &NodeStore,
    edges: &EdgeLog,
    filters: &Filters,
) -> StoreResult<Vec<String>> {
    if !filters.style.is_empty() {
        // Unknown style names are dropped rather than rejected here; an
        // empty surviving set simply matches nothing.
        let styles: Vec<Style> = filters
            .style
            .iter()
            .filter_map(|name| Style::from_str(name).ok())
            .collect();
        candidates.retain(|doc| {
            tables
                .metadata
                .get(doc)
                .is_some_and(|meta| meta.style.iter().any(|s| styles.contains(s)))
        });
    }

    if !filters.tag.is_empty() {
        let tags: HashSet<&str> = filters.tag.iter().map(String::as_str).collect();
        candidates.retain(|doc| {
            tables
                .metadata
                .get(doc)
                .is_some_and(|meta| meta.tags.iter().any(|t| tags.contains(t.as_str())))
        });
    }

    if !filters.author.is_empty() {
        let authors: HashSet<&str> = filters.author.iter().map(String::as_str).collect();
        candidates.retain(|doc| {
            tables
                .metadata
                .get(doc)
                .is_some_and(|meta| meta.authors.iter().any(|a| authors.contains(a.as_str())))
        });
    }

    if let Some(title) = &filters.title {
        let needle = title.to_lowercase();
        candidates.retain(|doc| {
            tables.metadata.get(doc).is_some_and(|meta| {
                meta.title
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&needle)
            })
        });
    }

    if let Some(content) = &filters.content {
        // O(candidates) file reads; runs after the cheaper filters have
        // already narrowed the set.
        let needle = content.to_lowercase();
        let mut keep = Vec::with_capacity(candidates.len());
        for doc in candidates {
            match nodes.read_content(&doc) {
                Ok(node) => {
                    if node.content.to_lowercase().contains(&needle) {
                        keep.push(doc);
                    }
                }
                Err(StoreError::NodeNotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        candidates = keep;
    }

    if !filters.relates.is_empty() {
        // Symmetric over src/dst: an edge that touches both the current
        // candidate set and the filter set contributes both endpoints.
        let wanted: HashSet<&str> = filters.relates.iter().map(String::as_str).collect();
        let current: HashSet<&str> = candidates.iter().map(String::as_str).collect();
        let mut keep: HashSet<String> = HashSet::new();
        for edge in edges.relates()? {
            let touches_candidates =
                current.contains(edge.src.as_str()) || current.contains(edge.dst.as_str());
            let touches_filter =
                wanted.contains(edge.src.as_str()) || wanted.contains(edge.dst.as_str());
            if touches_candidates && touches_filter {
                keep.insert(edge.src);
                keep.insert(edge.dst);
            }
        }
        candidates.retain(|doc| keep.contains(doc));
    }

    Ok(candidates)
}

/// TF-IDF scores for every document matching at least one query token
///
/// idf(t) = ln((1 + N) / (1 + df(t))) + 1, where N is the number of distinct
/// documents in the postings. Always >= 1, so ubiquitous and absent terms
/// never get a zero or negative weight. Per-document contribution is
/// tf * idf / sqrt(doc length).
fn score_candidates(tables: &IndexTables, query_tokens: &[String]) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    if query_tokens.is_empty() {
        return scores;
    }

    let mut indexed_docs: HashSet<&str> = HashSet::new();
    for postings in tables.postings.values() {
        indexed_docs.extend(postings.keys().map(String::as_str));
    }
    let total_docs = indexed_docs.len().max(1) as f64;

    let mut idf_cache: HashMap<&str, f64> = HashMap::new();
    for token in query_tokens {
        let idf = *idf_cache.entry(token.as_str()).or_insert_with(|| {
            let df = tables.postings.get(token.as_str()).map_or(0, BTreeMap::len) as f64;
            ((1.0 + total_docs) / (1.0 + df)).ln() + 1.0
        });

        if let Some(postings) = tables.postings.get(token.as_str()) {
            for (doc, tf) in postings {
                let length = tables.doc_lengths.get(doc).copied().unwrap_or(1).max(1) as f64;
                *scores.entry(doc.clone()).or_insert(0.0) += f64::from(*tf) * idf / length.sqrt();
            }
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables_with(docs: &[(&str, &[(&str, u32)], u32)]) -> IndexTables {
        let mut tables = IndexTables::default();
        for (doc, terms, length) in docs {
            for (token, tf) in *terms {
                tables
                    .postings
                    .entry((*token).to_string())
                    .or_default()
                    .insert((*doc).to_string(), *tf);
            }
            tables.doc_lengths.insert((*doc).to_string(), *length);
        }
        tables
    }

    #[test]
    fn test_score_monotonic_in_term_frequency() {
        // Equal lengths: the doc with the higher tf must not score lower.
        let tables = tables_with(&[
            ("doc-a", &[("alpha", 2)], 3),
            ("doc-b", &[("alpha", 1)], 3),
        ]);

        let scores = score_candidates(&tables, &[String::from("alpha")]);
        assert!(scores["doc-a"] >= scores["doc-b"]);
        assert!(scores["doc-a"] > scores["doc-b"]);
    }

    #[test]
    fn test_score_normalized_by_length() {
        let tables = tables_with(&[
            ("short", &[("alpha", 1)], 1),
            ("long", &[("alpha", 1)], 100),
        ]);

        let scores = score_candidates(&tables, &[String::from("alpha")]);
        assert!(scores["short"] > scores["long"]);
    }

    #[test]
    fn test_idf_weight_is_at_least_one() {
        // "common" is in every document, so its raw idf would round toward
        // zero without the +1 floor.
        let tables = tables_with(&[
            ("a", &[("common", 1)], 1),
            ("b", &[("common", 1)], 1),
            ("c", &[("common", 1)], 1),
        ]);

        let scores = score_candidates(&tables, &[String::from("common")]);
        for (_, score) in scores {
            assert!(score > 0.0);
        }
    }

    #[test]
    fn test_empty_query_scores_nothing() {
        let tables = tables_with(&[("a", &[("alpha", 1)], 1)]);
        assert!(score_candidates(&tables, &[]).is_empty());
    }

    #[test]
    fn test_absent_term_scores_nothing() {
        let tables = tables_with(&[("a", &[("alpha", 1)], 1)]);
        let scores = score_candidates(&tables, &[String::from("missing")]);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_repeated_query_token_accumulates() {
        let tables = tables_with(&[("a", &[("alpha", 1)], 1)]);
        let once = score_candidates(&tables, &[String::from("alpha")]);
        let twice =
            score_candidates(&tables, &[String::from("alpha"), String::from("alpha")]);
        assert!(twice["a"] > once["a"]);
    }
}
