//! Style command handlers

use anyhow::Result;

use quill_core::Store;

use crate::output::Output;

/// Register a style, printing its slug
///
/// Fails for names outside the fixed enumeration.
pub fn register(store: &Store, name: &str, output: &Output) -> Result<()> {
    let slug = store.get_or_create_style(name)?;
    output.print_id(&slug);
    Ok(())
}
