//! Data models
//!
//! Defines the five stored node kinds (content, tag, style, author, link),
//! the append-only edge records, and the draft type used to create content.
//! Content nodes are immutable after creation; derivative operations always
//! create new nodes and link back via edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::StoreError;

/// Writing styles a content node can carry
///
/// A fixed enumeration: any name outside it is rejected with a validation
/// error before a write happens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Chapter,
    Blog,
    Post,
    Snippet,
    Tweet,
}

impl Style {
    /// All valid styles
    pub const ALL: [Style; 5] = [
        Style::Chapter,
        Style::Blog,
        Style::Post,
        Style::Snippet,
        Style::Tweet,
    ];

    /// The style's canonical (slug) name
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Chapter => "chapter",
            Style::Blog => "blog",
            Style::Post => "post",
            Style::Snippet => "snippet",
            Style::Tweet => "tweet",
        }
    }
}

impl FromStr for Style {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chapter" => Ok(Style::Chapter),
            "blog" => Ok(Style::Blog),
            "post" => Ok(Style::Post),
            "snippet" => Ok(Style::Snippet),
            "tweet" => Ok(Style::Tweet),
            _ => Err(StoreError::InvalidStyle {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relation types allowed on content-to-content edges
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    SnippetOf,
    RelatedTo,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::SnippetOf => "snippet_of",
            RelationType::RelatedTo => "related_to",
        }
    }
}

impl FromStr for RelationType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snippet_of" => Ok(RelationType::SnippetOf),
            "related_to" => Ok(RelationType::RelatedTo),
            _ => Err(StoreError::InvalidRelation {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored piece of writing, from a tweet to a chapter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename = "content")]
pub struct ContentNode {
    /// Unique identifier (random, collision-free in practice)
    pub id: Uuid,
    /// Optional human-readable title
    pub title: Option<String>,
    /// Creation or authoring timestamp (UTC)
    pub date: DateTime<Utc>,
    /// Styles drawn from the fixed enumeration
    #[serde(default)]
    pub style: Vec<Style>,
    /// Tag list as supplied at creation; duplicates are kept
    #[serde(default)]
    pub tags: Vec<String>,
    /// Author slugs in credit order
    #[serde(default)]
    pub authors: Vec<String>,
    /// The body text
    pub content: String,
}

/// A tag node; id is the slugified name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename = "tag")]
pub struct TagNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl TagNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A style node; one per enumeration value actually used
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename = "style")]
pub struct StyleNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl StyleNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Social handles captured when an author node is first created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorHandles {
    pub linkedin: String,
    pub twitter: String,
    pub substack: String,
    pub reddit: String,
}

/// An author node; id is the slugified name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename = "author")]
pub struct AuthorNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub linkedin_username: String,
    #[serde(default)]
    pub twitter_username: String,
    #[serde(default)]
    pub substack_username: String,
    #[serde(default)]
    pub reddit_username: String,
}

impl AuthorNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, handles: &AuthorHandles) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            linkedin_username: handles.linkedin.clone(),
            twitter_username: handles.twitter.clone(),
            substack_username: handles.substack.clone(),
            reddit_username: handles.reddit.clone(),
        }
    }
}

/// A link (URL) node; id is the slugified URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename = "link")]
pub struct LinkNode {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl LinkNode {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title,
            description,
        }
    }
}

/// Any stored node
///
/// Which kind an id resolves to is determined by the directory its file lives
/// in; each variant's own serialization carries the `type` tag.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Node {
    Content(ContentNode),
    Tag(TagNode),
    Style(StyleNode),
    Author(AuthorNode),
    Link(LinkNode),
}

impl Node {
    /// The node's identifier (content UUID or slug)
    pub fn id(&self) -> String {
        match self {
            Node::Content(n) => n.id.to_string(),
            Node::Tag(n) => n.id.clone(),
            Node::Style(n) => n.id.clone(),
            Node::Author(n) => n.id.clone(),
            Node::Link(n) => n.id.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Content(_) => "content",
            Node::Tag(_) => "tag",
            Node::Style(_) => "style",
            Node::Author(_) => "author",
            Node::Link(_) => "link",
        }
    }

    pub fn as_content(&self) -> Option<&ContentNode> {
        match self {
            Node::Content(n) => Some(n),
            _ => None,
        }
    }
}

/// A relates edge between two content nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatesEdge {
    pub src: String,
    #[serde(rename = "type")]
    pub relation: RelationType,
    pub dst: String,
    pub date: DateTime<Utc>,
}

/// A content-to-tag edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename = "is_tagged")]
pub struct TagEdge {
    pub content: String,
    pub tag: String,
    pub date: DateTime<Utc>,
}

/// A content-to-author edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename = "authored")]
pub struct AuthorEdge {
    pub content: String,
    pub author: String,
    pub date: DateTime<Utc>,
}

/// A content-to-link edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename = "has_link")]
pub struct LinkEdge {
    pub content: String,
    pub link: String,
    pub date: DateTime<Utc>,
}

/// Parameters for creating a content node
///
/// Styles are carried as names and validated against the enumeration when the
/// draft is stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentDraft {
    pub content: String,
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub styles: Vec<String>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
}

impl ContentDraft {
    /// Create a draft with the given body text
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Override the creation timestamp (defaults to now when stored)
    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = Some(date);
    }

    pub fn set_styles(&mut self, styles: Vec<String>) {
        self.styles = styles;
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    pub fn add_author(&mut self, author: impl Into<String>) {
        self.authors.push(author.into());
    }

    pub fn set_authors(&mut self, authors: Vec<String>) {
        self.authors = authors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse() {
        assert_eq!("blog".parse::<Style>().unwrap(), Style::Blog);
        assert_eq!("tweet".parse::<Style>().unwrap(), Style::Tweet);

        let err = "sonnet".parse::<Style>().unwrap_err();
        assert!(matches!(err, StoreError::InvalidStyle { name } if name == "sonnet"));
    }

    #[test]
    fn test_style_roundtrip_all() {
        for style in Style::ALL {
            assert_eq!(style.as_str().parse::<Style>().unwrap(), style);
        }
    }

    #[test]
    fn test_relation_parse() {
        assert_eq!(
            "snippet_of".parse::<RelationType>().unwrap(),
            RelationType::SnippetOf
        );
        assert_eq!(
            "related_to".parse::<RelationType>().unwrap(),
            RelationType::RelatedTo
        );
        assert!("bogus".parse::<RelationType>().is_err());
    }

    #[test]
    fn test_content_node_serialization() {
        let node = ContentNode {
            id: Uuid::new_v4(),
            title: Some("Hello".to_string()),
            date: Utc::now(),
            style: vec![Style::Blog, Style::Post],
            tags: vec!["rust".to_string()],
            authors: vec!["jane-doe".to_string()],
            content: "Body text".to_string(),
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "content");
        assert_eq!(json["style"][0], "blog");

        let parsed: ContentNode = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_edge_record_shapes() {
        let date = Utc::now();

        let tag_edge = TagEdge {
            content: "abc".to_string(),
            tag: "rust".to_string(),
            date,
        };
        let json = serde_json::to_value(&tag_edge).unwrap();
        assert_eq!(json["type"], "is_tagged");
        assert_eq!(json["content"], "abc");
        assert_eq!(json["tag"], "rust");

        let rel_edge = RelatesEdge {
            src: "a".to_string(),
            relation: RelationType::SnippetOf,
            dst: "b".to_string(),
            date,
        };
        let json = serde_json::to_value(&rel_edge).unwrap();
        assert_eq!(json["type"], "snippet_of");

        let author_edge = AuthorEdge {
            content: "abc".to_string(),
            author: "jane-doe".to_string(),
            date,
        };
        assert_eq!(
            serde_json::to_value(&author_edge).unwrap()["type"],
            "authored"
        );

        let link_edge = LinkEdge {
            content: "abc".to_string(),
            link: "https-example-com".to_string(),
            date,
        };
        assert_eq!(
            serde_json::to_value(&link_edge).unwrap()["type"],
            "has_link"
        );
    }

    #[test]
    fn test_draft_setters() {
        let mut draft = ContentDraft::new("body");
        draft.set_title("Title");
        draft.set_styles(vec!["blog".to_string()]);
        draft.add_tag("rust");
        draft.add_tag("rust");
        draft.add_author("jane-doe");

        assert_eq!(draft.title.as_deref(), Some("Title"));
        // duplicates are allowed, not deduplicated
        assert_eq!(draft.tags, vec!["rust", "rust"]);
        assert_eq!(draft.authors, vec!["jane-doe"]);
    }

    #[test]
    fn test_author_node_carries_handles() {
        let handles = AuthorHandles {
            twitter: "janedoe".to_string(),
            ..Default::default()
        };
        let node = AuthorNode::new("jane-doe", "Jane Doe", &handles);
        assert_eq!(node.twitter_username, "janedoe");
        assert_eq!(node.linkedin_username, "");

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "author");
    }
}
