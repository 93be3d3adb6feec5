//! Slug normalization
//!
//! Tag, style, author, and link nodes are addressed by slug: a lowercase
//! identifier derived deterministically from a display name or URL. The same
//! input always produces the same slug, and slugifying a slug returns it
//! unchanged.

use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_\-]+").expect("hardcoded pattern is valid"));
static DASH_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("hardcoded pattern is valid"));

/// Normalize text to strict slug form
///
/// Lowercases, replaces every maximal run of characters outside `[a-z0-9_-]`
/// with a single dash, collapses repeated dashes, and strips leading and
/// trailing dashes.
///
/// Examples:
/// - "Machine Learning!" -> "machine-learning"
/// - "AI & ML" -> "ai-ml"
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let dashed = NON_SLUG.replace_all(&lowered, "-");
    let collapsed = DASH_RUNS.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}
