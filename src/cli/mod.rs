//! Command-line interface for irida-sistr-results.
//!
//! Available commands:
//!
//! - **export**: Reconcile SISTR results for IRIDA projects and write a table
//! - **workflows**: List the SISTR workflow versions that can be selected
//!
//! ## Usage
//!
//! ```text
//! # Export results for two projects as a tab-delimited table
//! irida-sistr-results export --irida-url http://localhost:8080/irida \
//!     --client-id client --client-secret secret -u admin \
//!     -p 1 -p 2 --output-tab results.tsv
//!
//! # Every project, only SISTR 0.3 results, short layout plus JSON
//! irida-sistr-results export -a -w 0.3 --short \
//!     --output-tab short.tsv --output-json results.json
//!
//! # Known workflow versions, for scripting
//! irida-sistr-results workflows --format tsv
//! ```

use clap::{Parser, Subcommand};

pub mod export;
pub mod workflows;

#[derive(Parser)]
#[command(name = "irida-sistr-results")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Export reconciled SISTR results from IRIDA")]
#[command(
    long_about = "irida-sistr-results collects the SISTR serotyping results of IRIDA projects and exports one result per sample.\n\nWhen a sample has several SISTR results (one per sequencing pair, or results shared with a project or launched by the user), a single one is chosen:\n- A PASS result is preferred over WARNING or FAIL\n- Otherwise the most recent analysis wins\n- Only the selected workflow versions are considered"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for messages printed to stdout
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile SISTR results and write them to file
    Export(export::ExportArgs),

    /// List known SISTR workflow versions
    Workflows(workflows::WorkflowsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
