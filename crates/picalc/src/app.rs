//! Application entry point and dispatch.

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use picalc_cli::completion::generate_completion;
use picalc_cli::ui::{print_banner, print_header, print_success};
use picalc_cli::{prompt_time_limit, save_result, CLISnapshotPresenter};
use picalc_core::constants::exit_codes;
use picalc_core::observers::LoggingObserver;
use picalc_core::{RunConfig, RunResult};
use picalc_orchestration::{monitor, ComputationSupervisor, StopHandle};

use crate::config::AppConfig;

/// How often the main thread checks for a fresh snapshot.
const REFRESH: Duration = Duration::from_millis(100);

/// Minimum spacing of snapshot log lines.
const LOG_INTERVAL_MS: u64 = 5_000;

/// Run the application and return the process exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    if !config.quiet {
        print_banner();
    }

    let time_limit = resolve_time_limit(config)?;
    let run_config = config.to_run_config(time_limit);
    run_config.validate()?;

    if !config.quiet {
        match time_limit {
            Some(limit) => print_header(&format!(
                "Calculating for {:.1} seconds (Ctrl+C to stop early)",
                limit.as_secs_f64()
            )),
            None => print_header("Calculating until Ctrl+C"),
        }
    }

    let observer = Arc::new(LoggingObserver::new(LOG_INTERVAL_MS));
    let supervisor = ComputationSupervisor::start_with_observer(run_config.clone(), observer)?;
    ctrlc_handler(supervisor.stop_handle());

    let presenter = CLISnapshotPresenter::new(config.quiet, config.max_display);
    let result = monitor(&supervisor, &presenter, REFRESH)?;

    if !config.no_save {
        save(config, &result, &run_config)?;
    }

    if result.fault.is_some() {
        return Ok(exit_codes::ERROR_GENERIC);
    }
    Ok(exit_codes::SUCCESS)
}

fn resolve_time_limit(config: &AppConfig) -> Result<Option<Duration>> {
    if !config.wants_prompt(io::stdin().is_terminal()) {
        return Ok(config.time_limit);
    }
    let limit = prompt_time_limit(&mut io::stdin().lock(), &mut io::stdout())
        .context("reading time limit")?;
    Ok(limit)
}

fn save(config: &AppConfig, result: &RunResult, run_config: &RunConfig) -> Result<()> {
    if result.snapshot.is_none() {
        warn!("Nothing to save");
        return Ok(());
    }
    let path = save_result(&config.output_dir, result, run_config, config.format)
        .with_context(|| format!("saving result to {}", config.output_dir.display()))?;
    if !config.quiet {
        print_success(&format!("Result saved to: {}", path.display()));
    }
    Ok(())
}

fn ctrlc_handler(stop: StopHandle) {
    if let Err(err) = ctrlc::set_handler(move || {
        stop.interrupt();
    }) {
        warn!(%err, "Could not install Ctrl+C handler");
    }
}
