//! Search command handler

use anyhow::Result;
use clap::{Args, ValueEnum};

use quill_core::{Filters, SearchRequest, SortOrder, Store};

use crate::output::Output;

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text query ranked by TF-IDF
    pub query: Option<String>,

    /// Filter by style (chapter, blog, post, snippet, tweet)
    #[arg(long)]
    pub style: Vec<String>,

    /// Filter by tag slug
    #[arg(long)]
    pub tag: Vec<String>,

    /// Filter by author slug
    #[arg(long)]
    pub author: Vec<String>,

    /// Substring match against titles
    #[arg(long)]
    pub title: Option<String>,

    /// Substring match against full bodies
    #[arg(long)]
    pub contains: Option<String>,

    /// Keep content related to these content ids
    #[arg(long)]
    pub relates: Vec<String>,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortArg::Relevance)]
    pub sort: SortArg,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Results per page
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// Seed for reproducible random ordering
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Relevance,
    Date,
    Random,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Relevance => SortOrder::Relevance,
            SortArg::Date => SortOrder::Date,
            SortArg::Random => SortOrder::Random,
        }
    }
}

/// Run a search and print one page of results
pub fn run(store: &Store, args: SearchArgs, output: &Output) -> Result<()> {
    let request = SearchRequest {
        query: args.query,
        filters: Filters {
            style: args.style,
            tag: args.tag,
            author: args.author,
            title: args.title,
            content: args.contains,
            relates: args.relates,
        },
        sort: args.sort.into(),
        page: args.page,
        page_size: args.page_size,
        seed: args.seed,
    };

    let response = store.search(&request)?;
    output.print_search(&response);
    Ok(())
}
