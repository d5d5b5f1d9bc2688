mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use error::{exit_with_error, CliError};
use tabcube_inspect::InspectConfig;

fn init_tracing(cli: &Cli) {
    // --quiet  -> always off
    // --verbose -> RUST_LOG if set, otherwise info
    // default  -> off, so log lines never mix into the summary
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = run(cli) {
        exit_with_error(e);
    }
}

fn load_config(cli: &Cli) -> error::CliResult<InspectConfig> {
    match cli.config.as_deref() {
        Some(path) if !path.exists() => Err(CliError::Usage(format!(
            "config file '{}' does not exist",
            path.display()
        ))),
        Some(path) => Ok(InspectConfig::load(path)?),
        None => Ok(InspectConfig::default()),
    }
}

fn run(cli: Cli) -> error::CliResult<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Inspect {
            location,
            format,
            max_tree_nodes,
        } => {
            let max_tree_nodes = max_tree_nodes.unwrap_or(config.display.max_tree_nodes);
            commands::inspect::run(&location, format, max_tree_nodes, &config)
        }
        Commands::Dependencies { location } => commands::dependencies::run(&location, &config),
    }
}
