//! Deriving new content from existing nodes
//!
//! Extraction and combination never mutate a source node: each operation
//! creates fresh content nodes and links them back through the relates log
//! (`snippet_of` for extracts, `related_to` for combinations).

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{ContentDraft, ContentNode, Node, RelationType};
use crate::slug::slugify;
use crate::store::{CreatedContent, Store};

/// Options for [`Store::extract_raw`]
#[derive(Debug, Clone)]
pub struct RawExtract {
    /// Maximum character count; longer bodies are truncated with "..."
    pub max_length: Option<usize>,
    /// Style names for the extracted node
    pub styles: Vec<String>,
    /// Copy tags from the source
    pub preserve_tags: bool,
    /// Copy authors from the source
    pub preserve_authors: bool,
}

impl Default for RawExtract {
    fn default() -> Self {
        Self {
            max_length: None,
            styles: vec!["snippet".to_string()],
            preserve_tags: true,
            preserve_authors: true,
        }
    }
}

/// Target platforms for social snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Twitter,
    LinkedIn,
    Instagram,
}

impl Platform {
    /// Character budget for a post on this platform
    pub fn max_length(&self) -> usize {
        match self {
            Platform::Twitter => 280,
            Platform::LinkedIn => 700,
            Platform::Instagram => 500,
        }
    }

    /// Style names applied to snippets for this platform
    pub fn styles(&self) -> Vec<String> {
        let styles = match self {
            Platform::Twitter => ["tweet", "snippet"],
            Platform::LinkedIn | Platform::Instagram => ["post", "snippet"],
        };
        styles.iter().map(|s| s.to_string()).collect()
    }

    /// Lowercase platform name, used as a tag
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::LinkedIn => "linkedin",
            Platform::Instagram => "instagram",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "Linkedin",
            Platform::Instagram => "Instagram",
        }
    }
}

/// Words that mark a sentence as a social-post candidate
const ACTION_WORDS: [&str; 8] = [
    "discover", "learn", "build", "create", "think", "consider", "imagine", "remember",
];

impl Store {
    /// Copy a node's body, optionally truncated, into a new snippet node
    ///
    /// The new node is linked `snippet_of` back to the source.
    pub fn extract_raw(&self, content_id: &str, options: &RawExtract) -> StoreResult<CreatedContent> {
        let source = self.content(content_id)?;

        let mut body = source.content.clone();
        if let Some(max) = options.max_length {
            if body.chars().count() > max {
                body = body.chars().take(max).collect::<String>() + "...";
            }
        }

        let mut draft = ContentDraft::new(body);
        draft.set_title(format!("Extract from: {}", source_label(&source)));
        draft.set_styles(options.styles.clone());
        if options.preserve_tags {
            draft.set_tags(source.tags.clone());
        }
        if options.preserve_authors {
            draft.set_authors(source.authors.clone());
        }

        let created = self.create_content(draft)?;
        self.relate(
            &created.id.to_string(),
            RelationType::SnippetOf.as_str(),
            content_id,
        )?;
        Ok(created)
    }

    /// Split a node's body on blank lines and store qualifying paragraphs as
    /// separate snippets
    ///
    /// Paragraphs shorter than `min_words` are skipped. Tags and authors are
    /// copied from the source; each snippet links `snippet_of` back.
    pub fn extract_paragraphs(
        &self,
        content_id: &str,
        min_words: usize,
        max_snippets: Option<usize>,
        styles: &[String],
    ) -> StoreResult<Vec<Uuid>> {
        let source = self.content(content_id)?;
        let styles = default_styles(styles, &["snippet"]);

        let mut created = Vec::new();
        for paragraph in source
            .content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            if paragraph.split_whitespace().count() < min_words {
                continue;
            }

            let mut draft = ContentDraft::new(paragraph);
            draft.set_title(format!("Paragraph from: {}", source_label(&source)));
            draft.set_styles(styles.clone());
            draft.set_tags(source.tags.clone());
            draft.set_authors(source.authors.clone());

            let snippet = self.create_content(draft)?;
            self.relate(
                &snippet.id.to_string(),
                RelationType::SnippetOf.as_str(),
                content_id,
            )?;
            created.push(snippet.id);

            if max_snippets.is_some_and(|max| created.len() >= max) {
                break;
            }
        }
        Ok(created)
    }

    /// Extract every sentence mentioning a keyword, with surrounding context
    ///
    /// Each match produces one snippet holding the sentence plus
    /// `context_sentences` sentences either side, tagged with the slugified
    /// keyword in addition to the source's tags.
    pub fn extract_keyword_sections(
        &self,
        content_id: &str,
        keyword: &str,
        context_sentences: usize,
        styles: &[String],
    ) -> StoreResult<Vec<Uuid>> {
        let source = self.content(content_id)?;
        let styles = default_styles(styles, &["snippet"]);
        let sentences = split_sentences(&source.content);
        let needle = keyword.to_lowercase();

        let mut created = Vec::new();
        for (i, sentence) in sentences.iter().enumerate() {
            if !sentence.to_lowercase().contains(&needle) {
                continue;
            }

            let start = i.saturating_sub(context_sentences);
            let end = (i + context_sentences + 1).min(sentences.len());
            let block = sentences[start..end].join(" ");

            let mut tags = source.tags.clone();
            tags.push(slugify(keyword));

            let mut draft = ContentDraft::new(block);
            draft.set_title(format!(
                "Section on '{keyword}' from: {}",
                source_label(&source)
            ));
            draft.set_styles(styles.clone());
            draft.set_tags(tags);
            draft.set_authors(source.authors.clone());

            let snippet = self.create_content(draft)?;
            self.relate(
                &snippet.id.to_string(),
                RelationType::SnippetOf.as_str(),
                content_id,
            )?;
            created.push(snippet.id);
        }
        Ok(created)
    }

    /// Extract quotable sentences sized for a social platform
    ///
    /// Candidates are questions or sentences containing an action word,
    /// between 20 characters and the platform limit. Source links are copied
    /// onto each snippet.
    pub fn extract_social_posts(
        &self,
        content_id: &str,
        platform: Platform,
        max_count: usize,
    ) -> StoreResult<Vec<Uuid>> {
        let source = self.content(content_id)?;
        let sentences = split_sentences(&source.content);
        let source_links = self.links_of(content_id);

        let mut created = Vec::new();
        for sentence in &sentences {
            if created.len() >= max_count {
                break;
            }
            if !is_social_candidate(sentence, platform.max_length()) {
                continue;
            }

            let mut tags = source.tags.clone();
            tags.push(platform.name().to_string());
            tags.push("social-media".to_string());

            let mut draft = ContentDraft::new(sentence.clone());
            draft.set_title(format!(
                "{} snippet from: {}",
                platform.label(),
                source_label(&source)
            ));
            draft.set_styles(platform.styles());
            draft.set_tags(tags);
            draft.set_authors(source.authors.clone());

            let snippet = self.create_content(draft)?;
            self.relate(
                &snippet.id.to_string(),
                RelationType::SnippetOf.as_str(),
                content_id,
            )?;
            for link in &source_links {
                self.attach_link(
                    &snippet.id.to_string(),
                    &link.url,
                    link.title.as_deref(),
                    link.description.as_deref(),
                )?;
            }
            created.push(snippet.id);
        }
        Ok(created)
    }

    /// Combine several content nodes into a single longer piece
    ///
    /// Missing source ids are skipped rather than failing the operation. Tags
    /// and authors are the unions across sources; each surviving source is
    /// linked `related_to` the combined node.
    pub fn combine(
        &self,
        content_ids: &[String],
        title: &str,
        styles: &[String],
        separator: &str,
    ) -> StoreResult<CreatedContent> {
        let mut parts = Vec::new();
        let mut tags = BTreeSet::new();
        let mut authors = BTreeSet::new();
        let mut survivors = Vec::new();

        for id in content_ids {
            match self.content(id) {
                Ok(node) => {
                    parts.push(node.content);
                    tags.extend(node.tags);
                    authors.extend(node.authors);
                    survivors.push(id.clone());
                }
                Err(StoreError::NodeNotFound { .. }) => continue,
                Err(err) => return Err(err),
            }
        }

        let styles = default_styles(styles, &["blog", "post"]);
        let mut draft = ContentDraft::new(parts.join(separator));
        draft.set_title(title);
        draft.set_styles(styles);
        draft.set_tags(tags.into_iter().collect());
        draft.set_authors(authors.into_iter().collect());

        let combined = self.create_content(draft)?;
        for id in &survivors {
            self.relate(
                id,
                RelationType::RelatedTo.as_str(),
                &combined.id.to_string(),
            )?;
        }
        Ok(combined)
    }

    /// A content node by id; other kinds count as not found here
    fn content(&self, id: &str) -> StoreResult<ContentNode> {
        match self.get_node(id)? {
            Node::Content(node) => Ok(node),
            _ => Err(StoreError::NodeNotFound { id: id.to_string() }),
        }
    }
}

fn default_styles(styles: &[String], fallback: &[&str]) -> Vec<String> {
    if styles.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        styles.to_vec()
    }
}

fn source_label(node: &ContentNode) -> String {
    node.title
        .clone()
        .unwrap_or_else(|| node.id.to_string()[..8].to_string())
}

fn is_social_candidate(sentence: &str, max_length: usize) -> bool {
    let lowered = sentence.to_lowercase();
    let is_question = sentence.contains('?');
    let has_action = ACTION_WORDS.iter().any(|word| lowered.contains(word));
    (is_question || has_action) && (20..=max_length).contains(&sentence.chars().count())
}

/// Split text into sentences on terminator punctuation followed by
/// whitespace; the terminator stays with its sentence
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if matches!(c, '.' | '!' | '?')
            && iter.peek().is_some_and(|&(_, next)| next.is_whitespace())
        {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            while iter.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
                iter.next();
            }
            start = iter.peek().map_or(text.len(), |&(j, _)| j);
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}
