//! `wren build`: rewrite a stylesheet with resolved values

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use wr_driver::Options;

pub fn build(
    input: &Path,
    output: Option<&Path>,
    options: &Options,
    values_json: Option<&Path>,
) -> Result<()> {
    let result = wr_driver::process_file(input, options)?;

    for warning in &result.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    match output {
        Some(path) => fs::write(path, &result.css)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => print!("{}", result.css),
    }

    if let Some(path) = values_json {
        let json = serde_json::to_string_pretty(&result.values)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    Ok(())
}
