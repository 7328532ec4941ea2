//! pcode-detector CLI.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            manifest,
            config,
            reference,
            output,
            secondary,
            sample_rows,
            max_size,
        } => commands::run::run(commands::run::RunArgs {
            manifest,
            config,
            reference,
            output,
            secondary,
            sample_rows,
            max_size,
        }),

        Commands::Inspect {
            file,
            format,
            locations,
            reference,
            config,
            json,
        } => commands::inspect::run(file, format, locations, reference, config, json),

        Commands::Codes {
            reference,
            config,
            output,
            locations,
        } => commands::codes::run(reference, config, output, locations),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
