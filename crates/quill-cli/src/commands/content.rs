//! Content command handlers

use std::io::Read;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use quill_core::{ContentDraft, IndexStatus, Node, Store};

use crate::output::{Output, OutputFormat};

/// Create a content node from an argument or stdin
#[allow(clippy::too_many_arguments)]
pub fn add(
    store: &Store,
    content: Option<String>,
    title: Option<String>,
    date: Option<String>,
    styles: Vec<String>,
    tags: Vec<String>,
    authors: Vec<String>,
    output: &Output,
) -> Result<()> {
    let body = match content {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read content from stdin")?;
            buffer
        }
    };

    let mut draft = ContentDraft::new(body);
    if let Some(title) = title {
        draft.set_title(title);
    }
    if let Some(date) = date {
        let parsed = DateTime::parse_from_rfc3339(&date)
            .with_context(|| format!("Invalid RFC 3339 date: {date}"))?;
        draft.set_date(parsed.with_timezone(&Utc));
    }
    draft.set_styles(styles);
    draft.set_tags(tags);
    draft.set_authors(authors);

    let created = store.create_content(draft)?;

    match output.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "id": created.id,
                "indexed": created.index == IndexStatus::Updated
            })
        ),
        OutputFormat::Quiet => println!("{}", created.id),
        OutputFormat::Human => {
            println!("Created content: {}", created.id);
            if created.index == IndexStatus::Degraded {
                eprintln!("Warning: index update failed; run `quill reindex` to recover.");
            }
        }
    }
    Ok(())
}

/// Show a node by id or slug
pub fn show(store: &Store, id: &str, output: &Output) -> Result<()> {
    let node = store.get_node(id)?;

    match output.format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&node)?;
            if let Node::Content(content) = &node {
                let links = store.links_of(&content.id.to_string());
                value["links"] = serde_json::to_value(&links)?;
            }
            println!("{value}");
        }
        OutputFormat::Quiet => println!("{}", node.id()),
        OutputFormat::Human => match &node {
            Node::Content(content) => {
                let links = store.links_of(&content.id.to_string());
                output.print_content(content, &links);
            }
            other => output.print_node(other),
        },
    }
    Ok(())
}

/// Relate two content nodes
pub fn relate(store: &Store, src: &str, relation: &str, dst: &str, output: &Output) -> Result<()> {
    store.relate(src, relation, dst)?;
    if !output.is_quiet() && !output.is_json() {
        println!("Related {src} -[{relation}]-> {dst}");
    }
    Ok(())
}

/// Attach a tag to a content node
pub fn attach_tag(store: &Store, content_id: &str, tag: &str, output: &Output) -> Result<()> {
    store.tag_content(content_id, tag)?;
    if !output.is_quiet() && !output.is_json() {
        println!("Tagged {content_id}");
    }
    Ok(())
}

/// Credit an author on a content node
pub fn attach_author(store: &Store, content_id: &str, author: &str, output: &Output) -> Result<()> {
    store.credit_author(content_id, author)?;
    if !output.is_quiet() && !output.is_json() {
        println!("Credited {author} on {content_id}");
    }
    Ok(())
}

/// Associate a URL with a content node
pub fn attach_url(
    store: &Store,
    content_id: &str,
    url: &str,
    title: Option<String>,
    description: Option<String>,
    output: &Output,
) -> Result<()> {
    store.attach_link(content_id, url, title.as_deref(), description.as_deref())?;
    if !output.is_quiet() && !output.is_json() {
        println!("Linked {url} to {content_id}");
    }
    Ok(())
}
