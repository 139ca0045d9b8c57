//! Supervised computation: one worker thread driving a `SeriesEvaluator`.
//!
//! ```text
//!            request_stop()        interrupt()        deadline
//! Running ───────┬──────────────────────┬─────────────────┬────────
//!                v                      v                 v
//!       StoppingExplicitly    StoppingByInterrupt   StoppingByDeadline
//!                └──────── in-flight step completes ───────┘
//!                                       v
//!                                    Stopped
//! ```
//!
//! The first trigger wins. An arithmetic fault goes straight to `Stopped`
//! with `StopReason::StoppedExplicitly`.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{info, warn};

use picalc_core::observers::NoOpObserver;
use picalc_core::progress::{CancellationToken, Deadline};
use picalc_core::{
    ChudnovskyEngine, PiError, RunConfig, RunResult, SeriesEvaluator, Snapshot, SnapshotObserver,
    StopReason,
};

use crate::worker::{ResultSlot, Shared, Worker};

/// Lifecycle phase of a supervised run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The worker is stepping.
    Running,
    /// The time limit elapsed; the in-flight step is finishing.
    StoppingByDeadline,
    /// An external interrupt arrived; the in-flight step is finishing.
    StoppingByInterrupt,
    /// The owning process asked to stop; the in-flight step is finishing.
    StoppingExplicitly,
    /// Terminal. The result is (or was) available.
    Stopped,
}

/// Cloneable handle for stopping a run, e.g. from a signal handler.
#[derive(Clone, Debug)]
pub struct StopHandle {
    cancel: CancellationToken,
}

impl StopHandle {
    /// Request an explicit stop. Returns `true` if this call initiated stopping.
    pub fn request_stop(&self) -> bool {
        let initiated = self.cancel.cancel(StopReason::StoppedExplicitly);
        if initiated {
            info!("Stop requested");
        }
        initiated
    }

    /// Deliver an external cancellation signal. Returns `true` if this call
    /// initiated stopping.
    pub fn interrupt(&self) -> bool {
        let initiated = self.cancel.cancel(StopReason::Interrupted);
        if initiated {
            info!("Calculation interrupted");
        }
        initiated
    }
}

/// Runs a series evaluator on a dedicated worker thread.
///
/// # Example
/// ```no_run
/// use picalc_core::RunConfig;
/// use picalc_orchestration::ComputationSupervisor;
///
/// let supervisor = ComputationSupervisor::start(RunConfig::default()).unwrap();
/// std::thread::sleep(std::time::Duration::from_secs(1));
/// supervisor.request_stop();
/// let result = supervisor.await_result().unwrap();
/// assert!(result.digits().starts_with("3.14159"));
/// ```
pub struct ComputationSupervisor {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    started_at: Instant,
}

impl ComputationSupervisor {
    /// Validate `config` and start a Chudnovsky run.
    pub fn start(config: RunConfig) -> Result<Self, PiError> {
        Self::start_with_observer(config, Arc::new(NoOpObserver::new()))
    }

    /// Start a Chudnovsky run that reports publications to `observer`.
    pub fn start_with_observer(
        config: RunConfig,
        observer: Arc<dyn SnapshotObserver>,
    ) -> Result<Self, PiError> {
        let engine = ChudnovskyEngine::initialize(&config)?;
        Self::start_with(Box::new(engine), &config, observer)
    }

    /// Start a run driving an arbitrary evaluator.
    pub fn start_with(
        evaluator: Box<dyn SeriesEvaluator>,
        config: &RunConfig,
        observer: Arc<dyn SnapshotObserver>,
    ) -> Result<Self, PiError> {
        config.validate()?;

        let shared = Arc::new(Shared::new());
        let deadline = Deadline::start(config.time_limit);
        let algorithm = evaluator.name().to_string();
        let worker = Worker {
            evaluator,
            display_interval: config.display_interval,
            deadline,
            shared: Arc::clone(&shared),
            observer,
        };
        let handle = thread::Builder::new()
            .name("picalc-worker".into())
            .spawn(move || worker.run())
            .map_err(|e| PiError::WorkerSpawn(e.to_string()))?;

        info!(
            %algorithm,
            initial_precision = config.initial_precision,
            time_limit_secs = config.time_limit.map(|d| d.as_secs_f64()),
            "Calculation started"
        );

        Ok(Self {
            shared,
            worker: Mutex::new(Some(handle)),
            started_at: Instant::now(),
        })
    }

    /// Most recently published snapshot, without blocking on the worker.
    ///
    /// `None` until the first step has completed and been published.
    #[must_use]
    pub fn poll_latest(&self) -> Option<Arc<Snapshot>> {
        self.shared.cell.latest()
    }

    /// Request an explicit stop. Idempotent.
    pub fn request_stop(&self) -> bool {
        self.stop_handle().request_stop()
    }

    /// Deliver an external cancellation signal. Idempotent.
    pub fn interrupt(&self) -> bool {
        self.stop_handle().interrupt()
    }

    /// Cloneable handle for signal handlers.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            cancel: self.shared.cancel.clone(),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.is_stopped() {
            return Phase::Stopped;
        }
        match self.shared.cancel.reason() {
            None => Phase::Running,
            Some(StopReason::TimeLimitReached) => Phase::StoppingByDeadline,
            Some(StopReason::Interrupted) => Phase::StoppingByInterrupt,
            Some(StopReason::StoppedExplicitly) => Phase::StoppingExplicitly,
        }
    }

    /// Whether the worker has reached `Stopped`.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        !matches!(*self.shared.outcome.lock(), ResultSlot::Pending)
    }

    /// Block until `Stopped` or until `timeout` passes. Returns `true` once stopped.
    pub fn wait_stopped(&self, timeout: Duration) -> bool {
        let until = Instant::now().checked_add(timeout);
        let mut slot = self.shared.outcome.lock();
        while matches!(*slot, ResultSlot::Pending) {
            match until {
                Some(until) => {
                    if self.shared.stopped.wait_until(&mut slot, until).timed_out() {
                        break;
                    }
                }
                // Too far in the future to represent: wait without a limit.
                None => self.shared.stopped.wait(&mut slot),
            }
        }
        !matches!(*slot, ResultSlot::Pending)
    }

    /// Block until the run stops and take its result.
    ///
    /// Suspends on a condition variable. The result is handed over once;
    /// later calls return `PiError::ResultTaken`.
    pub fn await_result(&self) -> Result<RunResult, PiError> {
        let mut slot = self.shared.outcome.lock();
        while matches!(*slot, ResultSlot::Pending) {
            self.shared.stopped.wait(&mut slot);
        }
        let result = match std::mem::replace(&mut *slot, ResultSlot::Taken) {
            ResultSlot::Ready(result) => result,
            ResultSlot::Pending | ResultSlot::Taken => return Err(PiError::ResultTaken),
        };
        drop(slot);
        self.join_worker();
        Ok(result)
    }

    /// Time since the run started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn join_worker(&self) {
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                warn!("Worker thread panicked");
            }
        }
    }
}

impl Drop for ComputationSupervisor {
    fn drop(&mut self) {
        self.shared.cancel.cancel(StopReason::StoppedExplicitly);
        self.join_worker();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use picalc_core::observers::ChannelObserver;

    use super::*;

    /// Evaluator that sleeps on every step and can fail at a chosen iteration.
    struct ScriptedEvaluator {
        iteration: u64,
        step_time: Duration,
        fail_at: Option<u64>,
        panic_at: Option<u64>,
    }

    impl ScriptedEvaluator {
        fn new(step_time: Duration) -> Self {
            Self {
                iteration: 0,
                step_time,
                fail_at: None,
                panic_at: None,
            }
        }
    }

    impl SeriesEvaluator for ScriptedEvaluator {
        fn step(&mut self) -> Result<(), PiError> {
            thread::sleep(self.step_time);
            if self.fail_at == Some(self.iteration + 1) {
                return Err(PiError::ArithmeticFault("injected".into()));
            }
            if self.panic_at == Some(self.iteration + 1) {
                panic!("injected panic");
            }
            self.iteration += 1;
            Ok(())
        }

        fn render(&self) -> String {
            format!("3.{}", "1".repeat(self.iteration as usize))
        }

        fn iteration(&self) -> u64 {
            self.iteration
        }

        fn precision_digits(&self) -> u64 {
            self.iteration + 1
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    struct CountingObserver {
        snapshots: AtomicU64,
        finished: AtomicU64,
    }

    impl SnapshotObserver for CountingObserver {
        fn on_snapshot(&self, _snapshot: &Snapshot) {
            self.snapshots.fetch_add(1, Ordering::Relaxed);
        }

        fn on_finished(&self, _result: &RunResult) {
            self.finished.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn fast_config() -> RunConfig {
        RunConfig::default().with_display_interval(Duration::from_millis(5))
    }

    fn scripted(evaluator: ScriptedEvaluator, config: &RunConfig) -> ComputationSupervisor {
        ComputationSupervisor::start_with(
            Box::new(evaluator),
            config,
            Arc::new(NoOpObserver::new()),
        )
        .unwrap()
    }

    #[test]
    fn invalid_config_rejected_before_start() {
        let config = RunConfig {
            iterations_per_step: 0,
            ..RunConfig::default()
        };
        assert!(matches!(
            ComputationSupervisor::start(config),
            Err(PiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn explicit_stop_produces_result() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(1)),
            &fast_config(),
        );
        assert_eq!(supervisor.phase(), Phase::Running);
        thread::sleep(Duration::from_millis(30));
        assert!(supervisor.request_stop());
        let result = supervisor.await_result().unwrap();
        assert_eq!(result.stop_reason, StopReason::StoppedExplicitly);
        assert!(result.is_complete());
        assert_eq!(supervisor.phase(), Phase::Stopped);
    }

    #[test]
    fn stop_twice_yields_one_result() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(1)),
            &fast_config(),
        );
        assert!(supervisor.request_stop());
        assert!(!supervisor.request_stop());
        assert!(supervisor.await_result().is_ok());
        assert!(!supervisor.request_stop());
        assert_eq!(supervisor.await_result(), Err(PiError::ResultTaken));
    }

    #[test]
    fn interrupt_wins_over_later_stop() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(20)),
            &fast_config(),
        );
        assert!(supervisor.interrupt());
        assert_eq!(supervisor.phase(), Phase::StoppingByInterrupt);
        assert!(!supervisor.request_stop());
        let result = supervisor.await_result().unwrap();
        assert_eq!(result.stop_reason, StopReason::Interrupted);
    }

    #[test]
    fn stop_before_first_step_still_has_snapshot() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(10)),
            &fast_config(),
        );
        supervisor.request_stop();
        let result = supervisor.await_result().unwrap();
        let snapshot = result.snapshot.unwrap();
        assert!(snapshot.iteration >= 1);
    }

    #[test]
    fn deadline_stops_run() {
        let config = fast_config().with_time_limit(Duration::from_millis(100));
        let supervisor = scripted(ScriptedEvaluator::new(Duration::from_millis(5)), &config);
        let result = supervisor.await_result().unwrap();
        assert_eq!(result.stop_reason, StopReason::TimeLimitReached);
        let snapshot = result.snapshot.unwrap();
        assert!(snapshot.elapsed >= Duration::from_millis(100));
        assert!(snapshot.elapsed < Duration::from_millis(100) + Duration::from_secs(1));
    }

    #[test]
    fn fault_stops_with_last_published_snapshot() {
        let mut evaluator = ScriptedEvaluator::new(Duration::from_millis(1));
        evaluator.fail_at = Some(4);
        let supervisor = scripted(evaluator, &fast_config());
        let result = supervisor.await_result().unwrap();
        assert_eq!(result.stop_reason, StopReason::StoppedExplicitly);
        assert_eq!(
            result.fault.as_deref(),
            Some("arithmetic fault: injected")
        );
        let snapshot = result.snapshot.unwrap();
        assert!(snapshot.iteration <= 3);
    }

    #[test]
    fn fault_on_first_step_has_no_snapshot() {
        let mut evaluator = ScriptedEvaluator::new(Duration::ZERO);
        evaluator.fail_at = Some(1);
        let supervisor = scripted(evaluator, &fast_config());
        let result = supervisor.await_result().unwrap();
        assert!(result.snapshot.is_none());
        assert!(!result.is_complete());
    }

    #[test]
    fn worker_panic_still_settles_result() {
        let mut evaluator = ScriptedEvaluator::new(Duration::ZERO);
        evaluator.panic_at = Some(3);
        let supervisor = scripted(evaluator, &fast_config());
        let result = supervisor.await_result().unwrap();
        assert_eq!(result.fault.as_deref(), Some("worker panicked"));
    }

    #[test]
    fn poll_latest_is_monotone() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(1)),
            &RunConfig::default().with_display_interval(Duration::from_millis(2)),
        );
        let mut last: Option<Arc<Snapshot>> = None;
        for _ in 0..50 {
            if let Some(snapshot) = supervisor.poll_latest() {
                if let Some(previous) = &last {
                    assert!(snapshot.is_at_least(previous));
                }
                last = Some(snapshot);
            }
            thread::sleep(Duration::from_millis(1));
        }
        supervisor.request_stop();
        let result = supervisor.await_result().unwrap();
        if let Some(previous) = &last {
            assert!(result.snapshot.unwrap().is_at_least(previous));
        }
    }

    #[test]
    fn publishing_is_rate_limited() {
        let observer = Arc::new(CountingObserver {
            snapshots: AtomicU64::new(0),
            finished: AtomicU64::new(0),
        });
        let config = RunConfig::default()
            .with_display_interval(Duration::from_secs(60))
            .with_time_limit(Duration::from_millis(50));
        let supervisor = ComputationSupervisor::start_with(
            Box::new(ScriptedEvaluator::new(Duration::from_millis(1))),
            &config,
            Arc::clone(&observer) as Arc<dyn SnapshotObserver>,
        )
        .unwrap();
        let result = supervisor.await_result().unwrap();
        assert!(result.snapshot.unwrap().iteration > 2);
        // One immediate publish plus the final one.
        assert_eq!(observer.snapshots.load(Ordering::Relaxed), 2);
        assert_eq!(observer.finished.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn wait_stopped_times_out_while_running() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(1)),
            &fast_config(),
        );
        assert!(!supervisor.wait_stopped(Duration::from_millis(10)));
        supervisor.request_stop();
        assert!(supervisor.wait_stopped(Duration::from_secs(10)));
        assert!(supervisor.is_stopped());
    }

    #[test]
    fn wait_stopped_accepts_unbounded_timeout() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(1)),
            &fast_config(),
        );
        let handle = supervisor.stop_handle();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.request_stop();
        });
        assert!(supervisor.wait_stopped(Duration::MAX));
        stopper.join().unwrap();
        assert_eq!(supervisor.phase(), Phase::Stopped);
    }

    #[test]
    fn stop_handle_from_other_thread() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(1)),
            &fast_config(),
        );
        let handle = supervisor.stop_handle();
        thread::spawn(move || handle.interrupt()).join().unwrap();
        let result = supervisor.await_result().unwrap();
        assert_eq!(result.stop_reason, StopReason::Interrupted);
    }

    #[test]
    fn channel_observer_receives_publications() {
        let (tx, rx) = crossbeam_channel::bounded(256);
        let config = fast_config().with_time_limit(Duration::from_millis(40));
        let supervisor = ComputationSupervisor::start_with(
            Box::new(ScriptedEvaluator::new(Duration::from_millis(1))),
            &config,
            Arc::new(ChannelObserver::new(tx)),
        )
        .unwrap();
        let result = supervisor.await_result().unwrap();
        let received: Vec<Arc<Snapshot>> = rx.try_iter().collect();
        assert!(!received.is_empty());
        assert!(received.windows(2).all(|w| w[1].is_at_least(&w[0])));
        assert_eq!(
            received.last().map(|s| s.iteration),
            result.snapshot.map(|s| s.iteration)
        );
    }

    #[test]
    fn chudnovsky_run_converges() {
        let config = RunConfig {
            initial_precision: 50,
            precision_step: 10,
            iterations_per_step: 2,
            ..fast_config()
        };
        let supervisor = ComputationSupervisor::start(config).unwrap();
        assert!(!supervisor.wait_stopped(Duration::from_millis(20)));
        supervisor.request_stop();
        let result = supervisor.await_result().unwrap();
        let snapshot = result.snapshot.unwrap();
        assert!(snapshot.digits.starts_with("3.14159265358979323846"));
        assert!(snapshot.digits.len() as u64 >= snapshot.precision_digits);
    }

    #[test]
    fn drop_stops_worker() {
        let supervisor = scripted(
            ScriptedEvaluator::new(Duration::from_millis(1)),
            &fast_config(),
        );
        let handle = supervisor.stop_handle();
        drop(supervisor);
        assert!(!handle.request_stop());
    }
}
