//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use quill_core::{ContentNode, LinkNode, Node, SearchResponse};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a created/returned identifier
    pub fn print_id(&self, id: &str) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "id": id })),
            _ => println!("{id}"),
        }
    }

    /// Print a full content node (with its links)
    pub fn print_content(&self, node: &ContentNode, links: &[LinkNode]) {
        println!("ID:      {}", node.id);
        if let Some(ref title) = node.title {
            println!("Title:   {}", title);
        }
        println!("Date:    {}", node.date.format("%Y-%m-%d %H:%M"));
        if !node.style.is_empty() {
            let styles: Vec<&str> = node.style.iter().map(|s| s.as_str()).collect();
            println!("Style:   {}", styles.join(", "));
        }
        if !node.tags.is_empty() {
            println!("Tags:    {}", node.tags.join(", "));
        }
        if !node.authors.is_empty() {
            println!("Authors: {}", node.authors.join(", "));
        }
        println!();
        println!("{}", node.content);

        if !links.is_empty() {
            println!();
            println!("── Links ({}) ──", links.len());
            for link in links {
                match &link.title {
                    Some(title) => println!("{} - {}", link.url, title),
                    None => println!("{}", link.url),
                }
            }
        }
    }

    /// Print a non-content node
    pub fn print_node(&self, node: &Node) {
        println!("ID:   {}", node.id());
        println!("Kind: {}", node.kind());
        match node {
            Node::Tag(tag) => println!("Name: {}", tag.name),
            Node::Style(style) => println!("Name: {}", style.name),
            Node::Author(author) => {
                println!("Name: {}", author.name);
                if !author.twitter_username.is_empty() {
                    println!("Twitter:  {}", author.twitter_username);
                }
                if !author.linkedin_username.is_empty() {
                    println!("LinkedIn: {}", author.linkedin_username);
                }
                if !author.substack_username.is_empty() {
                    println!("Substack: {}", author.substack_username);
                }
                if !author.reddit_username.is_empty() {
                    println!("Reddit:   {}", author.reddit_username);
                }
            }
            Node::Link(link) => {
                println!("URL:  {}", link.url);
                if let Some(ref title) = link.title {
                    println!("Title: {}", title);
                }
                if let Some(ref desc) = link.description {
                    println!("Description: {}", desc);
                }
            }
            Node::Content(_) => {}
        }
    }

    /// Print one page of search results
    pub fn print_search(&self, response: &SearchResponse) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string(response) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("Failed to serialize results: {err}"),
            },
            OutputFormat::Quiet => {
                for item in &response.items {
                    println!("{}", item.id);
                }
            }
            OutputFormat::Human => {
                if response.total == 0 {
                    println!("No results.");
                    return;
                }
                for item in &response.items {
                    let label = item
                        .title
                        .clone()
                        .unwrap_or_else(|| truncate_line(&item.content, 60));
                    println!(
                        "{}  {}  {}",
                        item.id,
                        item.date.format("%Y-%m-%d"),
                        label
                    );
                }
                println!();
                println!(
                    "Page {} of {} result(s) (page size {})",
                    response.page, response.total, response.page_size
                );
            }
        }
    }
}

/// Truncate text to a single line of at most `max` characters
fn truncate_line(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let truncated: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        // quiet wins over json
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("short", 10), "short");
        assert_eq!(truncate_line("first\nsecond", 10), "first");

        let long = "a".repeat(80);
        let truncated = truncate_line(&long, 10);
        assert_eq!(truncated.chars().count(), 10);
        assert!(truncated.ends_with('…'));
    }
}
