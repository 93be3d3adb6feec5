//! Author command handlers

use anyhow::Result;

use quill_core::{AuthorHandles, Store};

use crate::output::Output;

/// Register an author, printing their slug
///
/// Social handles are stored only on first creation; re-registering an
/// existing author leaves its node untouched.
pub fn register(
    store: &Store,
    name: &str,
    linkedin: Option<String>,
    twitter: Option<String>,
    substack: Option<String>,
    reddit: Option<String>,
    output: &Output,
) -> Result<()> {
    let handles = AuthorHandles {
        linkedin: linkedin.unwrap_or_default(),
        twitter: twitter.unwrap_or_default(),
        substack: substack.unwrap_or_default(),
        reddit: reddit.unwrap_or_default(),
    };
    let slug = store.get_or_create_author(name, &handles)?;
    output.print_id(&slug);
    Ok(())
}
