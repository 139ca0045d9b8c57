//! # picalc-orchestration
//!
//! Supervised worker thread, rate-limited snapshot publication, stop
//! handling, and the consumer-side monitor loop.

pub mod interfaces;
pub mod monitor;
pub mod snapshot_cell;
pub mod supervisor;
mod worker;

pub use interfaces::{NullPresenter, SnapshotPresenter};
pub use monitor::monitor;
pub use snapshot_cell::SnapshotCell;
pub use supervisor::{ComputationSupervisor, Phase, StopHandle};
