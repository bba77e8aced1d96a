//! `wren values`: print the resolved mapping without rewriting

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use wr_driver::Options;

pub fn values(input: &Path, options: &Options) -> Result<()> {
    let result = wr_driver::process_file(input, options)?;

    for warning in &result.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    println!("{}", serde_json::to_string_pretty(&result.values)?);
    Ok(())
}
