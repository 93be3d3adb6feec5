//! Extraction and combination command handlers

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use uuid::Uuid;

use quill_core::{Platform, RawExtract, Store};

use crate::output::{Output, OutputFormat};

#[derive(Subcommand)]
pub enum ExtractCommands {
    /// Copy the body (optionally truncated) into a new snippet
    Raw {
        /// Source content id
        id: String,
        /// Truncate to at most this many characters
        #[arg(long)]
        max_length: Option<usize>,
        /// Styles for the extract (default: snippet)
        #[arg(long)]
        style: Vec<String>,
        /// Don't copy tags from the source
        #[arg(long)]
        no_tags: bool,
        /// Don't copy authors from the source
        #[arg(long)]
        no_authors: bool,
    },
    /// Split the body into per-paragraph snippets
    Paragraphs {
        /// Source content id
        id: String,
        /// Skip paragraphs shorter than this many words
        #[arg(long, default_value_t = 20)]
        min_words: usize,
        /// Stop after creating this many snippets
        #[arg(long)]
        max_snippets: Option<usize>,
        /// Styles for the snippets (default: snippet)
        #[arg(long)]
        style: Vec<String>,
    },
    /// Extract keyword-matching sections with surrounding context
    Sections {
        /// Source content id
        id: String,
        /// Keyword to search for (case-insensitive)
        keyword: String,
        /// Sentences of context either side of a match
        #[arg(long, default_value_t = 2)]
        context: usize,
        /// Styles for the snippets (default: snippet)
        #[arg(long)]
        style: Vec<String>,
    },
    /// Extract quotable sentences sized for a social platform
    Social {
        /// Source content id
        id: String,
        #[arg(long, value_enum, default_value_t = PlatformArg::Twitter)]
        platform: PlatformArg,
        /// Stop after creating this many snippets
        #[arg(long, default_value_t = 5)]
        max_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Twitter,
    Linkedin,
    Instagram,
}

impl From<PlatformArg> for Platform {
    fn from(platform: PlatformArg) -> Self {
        match platform {
            PlatformArg::Twitter => Platform::Twitter,
            PlatformArg::Linkedin => Platform::LinkedIn,
            PlatformArg::Instagram => Platform::Instagram,
        }
    }
}

/// Dispatch an extract subcommand
pub fn run(store: &Store, command: ExtractCommands, output: &Output) -> Result<()> {
    match command {
        ExtractCommands::Raw {
            id,
            max_length,
            style,
            no_tags,
            no_authors,
        } => {
            let defaults = RawExtract::default();
            let options = RawExtract {
                max_length,
                styles: if style.is_empty() { defaults.styles } else { style },
                preserve_tags: !no_tags,
                preserve_authors: !no_authors,
            };
            let created = store.extract_raw(&id, &options)?;
            print_created(output, &[created.id]);
        }
        ExtractCommands::Paragraphs {
            id,
            min_words,
            max_snippets,
            style,
        } => {
            let ids = store.extract_paragraphs(&id, min_words, max_snippets, &style)?;
            print_created(output, &ids);
        }
        ExtractCommands::Sections {
            id,
            keyword,
            context,
            style,
        } => {
            let ids = store.extract_keyword_sections(&id, &keyword, context, &style)?;
            print_created(output, &ids);
        }
        ExtractCommands::Social {
            id,
            platform,
            max_count,
        } => {
            let ids = store.extract_social_posts(&id, platform.into(), max_count)?;
            print_created(output, &ids);
        }
    }
    Ok(())
}

/// Combine content nodes into one longer piece
pub fn combine(
    store: &Store,
    ids: &[String],
    title: &str,
    styles: &[String],
    separator: &str,
    output: &Output,
) -> Result<()> {
    let created = store.combine(ids, title, styles, separator)?;
    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "id": created.id })),
        OutputFormat::Quiet => println!("{}", created.id),
        OutputFormat::Human => println!("Created combined content: {}", created.id),
    }
    Ok(())
}

fn print_created(output: &Output, ids: &[Uuid]) {
    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!(ids)),
        OutputFormat::Quiet => {
            for id in ids {
                println!("{id}");
            }
        }
        OutputFormat::Human => {
            println!("Created {} node(s):", ids.len());
            for id in ids {
                println!("  {id}");
            }
        }
    }
}
