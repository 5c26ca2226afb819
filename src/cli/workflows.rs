use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::config::FileConfig;
use crate::workflow::WorkflowEntry;

#[derive(Args)]
pub struct WorkflowsArgs {
    /// Config file adding workflow releases (defaults to the user config file)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Execute workflows subcommand
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or output fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: WorkflowsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = FileConfig::discover(args.config.as_deref())?;
    let table = config.workflow_table();

    if verbose {
        eprintln!("Loaded {} SISTR workflow versions", table.len());
    }

    match format {
        OutputFormat::Text => print_text(table.entries()),
        OutputFormat::Json => print_json(table.entries())?,
        OutputFormat::Tsv => print_tsv(table.entries()),
    }

    Ok(())
}

fn print_text(entries: &[WorkflowEntry]) {
    let version_width = entries
        .iter()
        .map(|e| e.version.len())
        .max()
        .unwrap_or(7)
        .max(7);

    println!("SISTR workflows ({} versions)\n", entries.len());
    println!("{:<w$} {:<36} Aliases", "Version", "Workflow ID", w = version_width);
    println!("{}", "-".repeat(version_width + 1 + 36 + 8));
    for entry in entries {
        println!(
            "{:<w$} {:<36} {}",
            entry.version,
            entry.id,
            entry.aliases.join(", "),
            w = version_width
        );
    }
}

fn print_json(entries: &[WorkflowEntry]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = entries
        .iter()
        .map(|e| {
            serde_json::json!({
                "version": e.version,
                "aliases": e.aliases,
                "id": e.id,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(entries: &[WorkflowEntry]) {
    println!("version\tid\taliases");
    for entry in entries {
        println!("{}\t{}\t{}", entry.version, entry.id, entry.aliases.join(","));
    }
}
