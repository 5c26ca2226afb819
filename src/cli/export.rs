use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{ArgGroup, Args};
use tracing::info;

use crate::cli::OutputFormat;
use crate::config::{self, ConnectionOverrides, FileConfig};
use crate::core::types::ProjectId;
use crate::irida::client::IridaClient;
use crate::output::{
    write_results, JsonWriter, Layout, Provenance, ResultsWriter, RowFormatter, TsvWriter,
};
use crate::reconcile::engine::{
    ReconcileConfig, ReconciledResults, ReconciliationEngine, ResultSummary,
};
use crate::reconcile::ReconcileError;
use crate::workflow::{WorkflowFilter, WorkflowSet};

#[derive(Args)]
#[command(group(ArgGroup::new("selection").required(true).args(["projects", "all_projects"])))]
#[command(group(ArgGroup::new("destination").required(true).multiple(true).args(["output_tab", "output_json"])))]
pub struct ExportArgs {
    /// Base URL of IRIDA (e.g. http://localhost:8080/irida)
    #[arg(long)]
    pub irida_url: Option<String>,

    /// OAuth2 client id
    #[arg(long)]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[arg(long)]
    pub client_secret: Option<String>,

    /// IRIDA username
    #[arg(short, long)]
    pub username: Option<String>,

    /// IRIDA password (prompted for when not given)
    #[arg(long, env = "IRIDA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Project to export; may be given multiple times
    #[arg(short = 'p', long = "project")]
    pub projects: Vec<String>,

    /// Export every project the user can access
    #[arg(short, long)]
    pub all_projects: bool,

    /// Write a tab-delimited table to this file
    #[arg(long)]
    pub output_tab: Option<PathBuf>,

    /// Write a JSON table to this file
    #[arg(long)]
    pub output_json: Option<PathBuf>,

    /// Only write the most important columns
    #[arg(long)]
    pub short: bool,

    /// Also consider SISTR results the user launched themselves
    #[arg(long)]
    pub include_user_results: bool,

    /// Only use the user's results for samples that have no result yet
    #[arg(long, requires = "include_user_results")]
    pub exclude_user_existing_results: bool,

    /// Only use results of this SISTR workflow version or id; may be given multiple times
    #[arg(short = 'w', long = "workflow")]
    pub workflows: Vec<String>,

    /// Request timeout in seconds (default 600)
    #[arg(short = 'T', long)]
    pub timeout: Option<u64>,

    /// Config file (defaults to the user config file)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File of reportable serovars, one per line
    #[arg(long)]
    pub reportable_serovars: Option<PathBuf>,
}

/// Execute export subcommand
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, a workflow selector is
/// unknown, a project is repeated, IRIDA cannot be queried, or an output file
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExportArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let file_config = FileConfig::discover(args.config.as_deref())?;

    // Everything that can be checked locally is checked before connecting
    let filter = WorkflowFilter::new(file_config.workflow_table());
    let selectors = if args.workflows.is_empty() {
        &file_config.sistr.workflows
    } else {
        &args.workflows
    };
    let allowed = filter.resolve(selectors)?;
    if !allowed.is_empty() {
        let versions: Vec<String> = allowed.iter().map(|id| filter.display_version(id)).collect();
        info!("Only including SISTR results from workflow versions {versions:?}");
    }

    let projects = unique_projects(&args.projects)?;

    let reportable_serovars = match &args.reportable_serovars {
        Some(path) => config::read_reportable_serovars(path)?,
        None => file_config.reportable_serovars(),
    };
    if verbose {
        eprintln!("Using {} reportable serovars", reportable_serovars.len());
    }

    let overrides = ConnectionOverrides {
        url: args.irida_url.clone(),
        client_id: args.client_id.clone(),
        client_secret: args.client_secret.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
        timeout: args.timeout,
    };
    let settings = file_config.connection_settings(overrides, config::prompt_password)?;
    let client = IridaClient::connect(&settings)?;

    let engine_config = ReconcileConfig {
        include_shared_results: true,
        include_user_results: args.include_user_results,
        update_existing_with_user_results: !args.exclude_user_existing_results,
        reportable_serovars: Arc::new(reportable_serovars),
    };
    let engine = ReconciliationEngine::with_config(&client, engine_config);

    let allowed = (!allowed.is_empty()).then_some(&allowed);
    let results = if args.all_projects {
        engine.get_results_for_all_projects(allowed)?
    } else {
        engine.get_results_for_projects(&projects, allowed)?
    };

    let layout = if args.short { Layout::Short } else { Layout::Full };
    let formatter = RowFormatter::new(layout, &settings.base_url, &filter);
    let provenance = Provenance::new(&settings.base_url, &settings.username);

    if let Some(path) = &args.output_tab {
        let mut writer = TsvWriter::create(path)?;
        write_file(&mut writer, path, &results, &formatter, &provenance)?;
    }
    if let Some(path) = &args.output_json {
        let mut writer = JsonWriter::create(path)?;
        write_file(&mut writer, path, &results, &formatter, &provenance)?;
    }

    let summary = results.summary();
    info!(
        "Exported {} samples from {} projects: PASS={}, WARNING={}, FAIL={}, MISSING={}",
        summary.samples,
        summary.projects,
        summary.pass,
        summary.warning,
        summary.fail,
        summary.missing
    );

    match format {
        OutputFormat::Text => print_text_summary(&summary, &args),
        OutputFormat::Json => print_json_summary(&summary, allowed)?,
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

/// Parse `-p` values, rejecting repeats
fn unique_projects(values: &[String]) -> Result<Vec<ProjectId>, ReconcileError> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|value| {
            let id = ProjectId::new(value.trim());
            if seen.insert(id.clone()) {
                Ok(id)
            } else {
                Err(ReconcileError::DuplicateProject(id))
            }
        })
        .collect()
}

fn write_file<W: ResultsWriter>(
    writer: &mut W,
    path: &Path,
    results: &ReconciledResults,
    formatter: &RowFormatter<'_>,
    provenance: &Provenance,
) -> anyhow::Result<()> {
    let rows = write_results(writer, results, formatter, provenance)?;
    info!("Wrote {rows} results to {}", path.display());
    Ok(())
}

fn print_text_summary(summary: &ResultSummary, args: &ExportArgs) {
    println!(
        "Exported {} samples from {} projects",
        summary.samples, summary.projects
    );
    println!("   PASS: {}", summary.pass);
    println!("   WARNING: {}", summary.warning);
    println!("   FAIL: {}", summary.fail);
    println!("   MISSING: {}", summary.missing);
    for path in [&args.output_tab, &args.output_json].into_iter().flatten() {
        println!("Results written to {}", path.display());
    }
}

fn print_json_summary(
    summary: &ResultSummary,
    allowed: Option<&WorkflowSet>,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "summary": summary,
        "workflows": allowed.map(|set| set.iter().collect::<Vec<_>>()).unwrap_or_default(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(summary: &ResultSummary) {
    println!("projects\tsamples\tpass\twarning\tfail\tmissing");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        summary.projects,
        summary.samples,
        summary.pass,
        summary.warning,
        summary.fail,
        summary.missing
    );
}
