//! Link command handlers

use anyhow::Result;

use quill_core::Store;

use crate::output::Output;

/// Register a link node keyed by its URL, printing the slug
pub fn register(
    store: &Store,
    url: &str,
    title: Option<String>,
    description: Option<String>,
    output: &Output,
) -> Result<()> {
    let slug = store.get_or_create_link(url, title.as_deref(), description.as_deref())?;
    output.print_id(&slug);
    Ok(())
}
