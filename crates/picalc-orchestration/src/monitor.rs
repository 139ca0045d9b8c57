//! Consumer side of a run: present new snapshots until the worker stops.

use std::time::Duration;

use picalc_core::{PiError, RunResult};

use crate::interfaces::SnapshotPresenter;
use crate::supervisor::ComputationSupervisor;

/// Present each newer snapshot at most once per `refresh`, then hand back
/// the result.
///
/// Between refreshes the calling thread waits on the supervisor's stop
/// signal, so a run that ends early is picked up immediately.
pub fn monitor(
    supervisor: &ComputationSupervisor,
    presenter: &dyn SnapshotPresenter,
    refresh: Duration,
) -> Result<RunResult, PiError> {
    let mut last_presented: Option<u64> = None;
    loop {
        let stopped = supervisor.wait_stopped(refresh);
        if stopped {
            break;
        }
        if let Some(snapshot) = supervisor.poll_latest() {
            if last_presented.map_or(true, |iteration| snapshot.iteration > iteration) {
                presenter.present_snapshot(&snapshot);
                last_presented = Some(snapshot.iteration);
            }
        }
    }

    let result = supervisor.await_result()?;
    match &result.fault {
        Some(fault) => presenter.present_error(fault),
        None => presenter.present_result(&result),
    }
    Ok(result)
}
