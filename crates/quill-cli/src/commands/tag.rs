//! Tag command handlers

use anyhow::Result;

use quill_core::Store;

use crate::output::Output;

/// Register a tag, printing its slug
pub fn register(store: &Store, name: &str, output: &Output) -> Result<()> {
    let slug = store.get_or_create_tag(name)?;
    output.print_id(&slug);
    Ok(())
}
