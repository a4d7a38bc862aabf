//! breath-trim CLI
//!
//! Command-line interface for trimming breath recordings.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, error};

use breath_trim::cli::{commands, Cli, Commands};
use breath_trim::TrimError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    debug!("breath-trim v{}", env!("CARGO_PKG_VERSION"));

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            if let Some(hint) = err
                .downcast_ref::<TrimError>()
                .and_then(TrimError::recovery_suggestion)
            {
                eprintln!("hint: {}", hint);
            }
            let status = err
                .downcast_ref::<TrimError>()
                .map(TrimError::status_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(status).unwrap_or(1))
        }
    }
}

fn run(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Trim {
            input,
            output,
            config,
            json,
        } => commands::trim(&input, &output, config.as_deref(), json)
            .with_context(|| format!("failed to trim {}", input.display())),
        Commands::Analyze {
            amplitudes,
            config,
            json,
        } => commands::analyze(&amplitudes, config.as_deref(), json)
            .with_context(|| format!("failed to analyse {}", amplitudes.display())),
        Commands::Inspect { input } => commands::inspect(&input)
            .with_context(|| format!("failed to inspect {}", input.display())),
    }
}
