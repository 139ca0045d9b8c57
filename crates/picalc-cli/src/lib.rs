//! # picalc-cli
//!
//! CLI output, live presentation, result persistence, time-limit prompt,
//! and shell completion.

pub mod completion;
pub mod output;
pub mod persist;
pub mod presenter;
pub mod prompt;
pub mod ui;

pub use persist::{save_result, OutputFormat, PersistError};
pub use presenter::CLISnapshotPresenter;
pub use prompt::{prompt_time_limit, PromptError};
