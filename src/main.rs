use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use irida_sistr_results::cli;

fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("irida_sistr_results=debug,info")
    } else {
        EnvFilter::new("irida_sistr_results=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(err) = run(cli) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> anyhow::Result<()> {
    match cli.command {
        cli::Commands::Export(args) => cli::export::run(args, cli.format, cli.verbose),
        cli::Commands::Workflows(args) => cli::workflows::run(args, cli.format, cli.verbose),
    }
}
