//! Status and reindex command handlers

use anyhow::Result;

use quill_core::Store;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let count = store.count_content();
    let config = store.config();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "content_count": count
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{count}");
        }
        OutputFormat::Human => {
            println!("quill status");
            println!("============");
            println!();
            println!("Data directory: {}", config.data_dir.display());
            println!("Content nodes:  {count}");
        }
    }
    Ok(())
}

/// Rebuild the search index from the node store
pub fn reindex(store: &Store, output: &Output) -> Result<()> {
    store.rebuild_index()?;

    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "status": "ok" })),
        OutputFormat::Quiet => {}
        OutputFormat::Human => println!("Index rebuilt from {} content node(s).", store.count_content()),
    }
    Ok(())
}
