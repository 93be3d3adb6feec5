//! Config command handlers

use anyhow::{bail, Result};

use quill_core::Config;

use crate::output::{Output, OutputFormat};

/// Show the current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": Config::config_file_path(),
                    "data_dir": config.data_dir
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Config file:    {}", Config::config_file_path().display());
            println!("Data directory: {}", config.data_dir.display());
        }
    }
    Ok(())
}

/// Set a configuration value and save it
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load()?;

    match key.as_str() {
        "data_dir" => config.data_dir = value.into(),
        _ => bail!("Unknown configuration key: {key} (expected: data_dir)"),
    }

    config.save()?;
    if !output.is_quiet() {
        println!("Saved {key}.");
    }
    Ok(())
}
