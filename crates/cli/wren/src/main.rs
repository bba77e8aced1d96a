//! wren CLI
//!
//! Command-line front end for the stylesheet value-resolution pipeline

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod build;
mod values;

#[derive(Parser)]
#[command(name = "wren")]
#[command(about = "Stylesheet value-resolution toolchain", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve values across imports and rewrite a stylesheet
    Build {
        /// Input stylesheet
        input: PathBuf,

        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Strip @value statements from the output
        #[arg(long)]
        no_emit_exports: bool,

        /// Also rewrite rule selectors
        #[arg(long)]
        replace_in_selectors: bool,

        /// Treat import specifiers as package-style module requests
        #[arg(long)]
        module_requests: bool,

        /// At-rule kinds whose parameters are rewritten
        #[arg(long = "at-rule", default_values_t = vec![String::from("media")])]
        at_rules: Vec<String>,

        /// Write the resolved name-value mapping as JSON
        #[arg(long)]
        values_json: Option<PathBuf>,
    },

    /// Print the resolved name-value mapping as JSON
    Values {
        /// Input stylesheet
        input: PathBuf,

        /// Treat import specifiers as package-style module requests
        #[arg(long)]
        module_requests: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Build {
            input,
            output,
            no_emit_exports,
            replace_in_selectors,
            module_requests,
            at_rules,
            values_json,
        } => {
            let options = wr_driver::Options {
                no_emit_exports,
                replace_in_selectors,
                imports_as_module_requests: module_requests,
                at_rules,
                preprocess: None,
            };
            build::build(&input, output.as_deref(), &options, values_json.as_deref())?;
        }
        Commands::Values { input, module_requests } => {
            let options = wr_driver::Options {
                imports_as_module_requests: module_requests,
                ..wr_driver::Options::default()
            };
            values::values(&input, &options)?;
        }
    }

    Ok(())
}
