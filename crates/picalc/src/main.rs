//! PiCalc-rs: continuous π calculator.

use std::process::ExitCode;

use picalc_cli::ui::print_error;
use picalc_lib::{app, config, errors};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI args first so --verbose can set the log level
    let config = config::AppConfig::parse();

    let level = if config.verbose { Level::INFO } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let code = match app::run(&config) {
        Ok(code) => code,
        Err(err) => {
            print_error(&format!("{err:#}"));
            errors::exit_code(&err)
        }
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
