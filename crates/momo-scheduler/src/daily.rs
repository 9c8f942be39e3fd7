use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::{Result, SchedulerError};
use crate::sender::DailySender;
use crate::trigger::Trigger;

/// Delivery attempts per cycle.
pub const MAX_ATTEMPTS: u32 = 3;
/// Base backoff between failed attempts; attempt N waits N * BASE_BACKOFF.
pub const BASE_BACKOFF: Duration = Duration::from_secs(5 * 60);

/// Bounded retry with linearly increasing backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_backoff: BASE_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Wait inserted after a failed attempt (1-based ordinal).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.base_backoff * attempt
    }
}

/// running flag and stop signal live under one lock so start/stop are
/// linearizable. The lock is only ever held for the flag check/update,
/// never across an await.
struct SchedulerState {
    running: bool,
    stop_tx: Option<watch::Sender<bool>>,
}

/// Drives one daily delivery at a fixed local time, with bounded retry and
/// guarded start/stop/force controls.
pub struct DailyScheduler<S: DailySender> {
    sender: Arc<S>,
    trigger: Trigger,
    retry: RetryPolicy,
    state: Mutex<SchedulerState>,
}

impl<S: DailySender> DailyScheduler<S> {
    pub fn new(sender: Arc<S>, trigger: Trigger, retry: RetryPolicy) -> Self {
        Self {
            sender,
            trigger,
            retry,
            state: Mutex::new(SchedulerState {
                running: false,
                stop_tx: None,
            }),
        }
    }

    /// Launch the run-loop as a background task.
    ///
    /// Returns `AlreadyRunning` when a loop is active. When the sender
    /// reports itself disabled (no destination configured) this is a success
    /// no-op and no task is spawned.
    pub fn start(&self, shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.running {
            return Err(SchedulerError::AlreadyRunning);
        }

        if !self.sender.is_enabled() {
            info!("daily delivery not configured or disabled; scheduler will not start");
            return Ok(());
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        state.running = true;
        state.stop_tx = Some(stop_tx);

        let status = self.sender.status();
        info!(
            hour = self.trigger.hour,
            minute = self.trigger.minute,
            destination = %status.destination,
            "daily scheduler started"
        );

        tokio::spawn(run_loop(
            Arc::clone(&self.sender),
            self.trigger,
            self.retry.clone(),
            shutdown,
            stop_rx,
        ));
        Ok(())
    }

    /// Signal the run-loop to terminate.
    ///
    /// Returns `NotRunning` when no loop is active; calling twice errors the
    /// second time. An in-flight delivery attempt or backoff sleep is not
    /// interrupted.
    pub fn stop(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return Err(SchedulerError::NotRunning);
        }
        state.running = false;
        if let Some(stop_tx) = state.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        info!("daily scheduler stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    /// The configured daily trigger time.
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Fire one out-of-band delivery cycle immediately, without touching the
    /// timer schedule.
    ///
    /// Fails fast with `Disabled` when the sender cannot deliver; otherwise
    /// the cycle runs as an unsupervised task and its outcome is only logged.
    pub fn force_send(&self) -> Result<()> {
        if !self.sender.is_enabled() {
            return Err(SchedulerError::Disabled);
        }

        info!("force-sending daily delivery");
        let sender = Arc::clone(&self.sender);
        let retry = self.retry.clone();
        tokio::spawn(async move {
            run_cycle(sender.as_ref(), &retry).await;
        });
        Ok(())
    }
}

/// The run-loop: a single-shot deadline re-armed after every cycle.
///
/// Waits on exactly three events: upstream cancellation, explicit stop, and
/// the deadline. Cycles execute inside the loop, so they can never overlap.
async fn run_loop<S: DailySender>(
    sender: Arc<S>,
    trigger: Trigger,
    retry: RetryPolicy,
    mut shutdown: watch::Receiver<bool>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut deadline = next_deadline(&trigger);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("daily scheduler cancelled");
                    return;
                }
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    info!("daily scheduler loop exiting on stop request");
                    return;
                }
            }
            _ = tokio::time::sleep_until(deadline) => {
                run_cycle(sender.as_ref(), &retry).await;
                deadline = next_deadline(&trigger);
            }
        }
    }
}

fn next_deadline(trigger: &Trigger) -> tokio::time::Instant {
    let wait = trigger
        .wait_from(Local::now())
        .to_std()
        .unwrap_or_default();
    debug!(wait_secs = wait.as_secs(), "next daily delivery scheduled");
    tokio::time::Instant::now() + wait
}

/// One cycle: re-check the enabled flag, then attempt delivery up to the
/// retry cap with increasing backoff between failures.
pub(crate) async fn run_cycle<S: DailySender + ?Sized>(sender: &S, retry: &RetryPolicy) {
    // The feature may have been toggled off between scheduling and firing;
    // that is a silent skip, not an error.
    if !sender.is_enabled() {
        info!("daily delivery disabled; skipping this cycle");
        return;
    }

    for attempt in 1..=retry.max_attempts {
        match sender.send().await {
            Ok(()) => {
                info!(attempt, "daily delivery sent");
                return;
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = retry.max_attempts,
                    error = %e,
                    "daily delivery attempt failed"
                );
                if attempt < retry.max_attempts {
                    tokio::time::sleep(retry.backoff_after(attempt)).await;
                }
            }
        }
    }

    error!(
        attempts = retry.max_attempts,
        "daily delivery failed; giving up until the next cycle"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::SenderStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    struct MockSender {
        enabled: AtomicBool,
        calls: AtomicU32,
        fail_first: u32,
    }

    impl MockSender {
        fn new(enabled: bool, fail_first: u32) -> Arc<Self> {
            Arc::new(Self {
                enabled: AtomicBool::new(enabled),
                calls: AtomicU32::new(0),
                fail_first,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DailySender for MockSender {
        fn is_enabled(&self) -> bool {
            self.enabled.load(Ordering::SeqCst)
        }

        async fn send(&self) -> anyhow::Result<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.fail_first {
                anyhow::bail!("simulated delivery failure (attempt {n})");
            }
            Ok(())
        }

        fn status(&self) -> SenderStatus {
            SenderStatus {
                enabled: self.is_enabled(),
                destination: "mock://daily".to_string(),
            }
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::from_secs(5 * 60),
        }
    }

    #[tokio::test]
    async fn start_twice_errors() {
        let sender = MockSender::new(true, 0);
        let scheduler = DailyScheduler::new(sender, Trigger::new(5, 0), fast_retry());
        let (_tx, rx) = watch::channel(false);

        assert!(scheduler.start(rx.clone()).is_ok());
        assert!(scheduler.is_running());
        assert_eq!(scheduler.start(rx), Err(SchedulerError::AlreadyRunning));

        assert!(scheduler.stop().is_ok());
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn stop_when_not_running_errors() {
        let sender = MockSender::new(true, 0);
        let scheduler = DailyScheduler::new(sender, Trigger::new(5, 0), fast_retry());

        assert_eq!(scheduler.stop(), Err(SchedulerError::NotRunning));

        let (_tx, rx) = watch::channel(false);
        scheduler.start(rx).unwrap();
        scheduler.stop().unwrap();
        // Second stop errors instead of panicking or double-closing.
        assert_eq!(scheduler.stop(), Err(SchedulerError::NotRunning));
    }

    #[tokio::test]
    async fn start_with_disabled_sender_is_a_noop() {
        let sender = MockSender::new(false, 0);
        let scheduler = DailyScheduler::new(Arc::clone(&sender), Trigger::new(5, 0), fast_retry());
        let (_tx, rx) = watch::channel(false);

        assert!(scheduler.start(rx).is_ok());
        assert!(!scheduler.is_running());
        assert_eq!(sender.calls(), 0);
    }

    #[tokio::test]
    async fn force_send_while_disabled_errors_without_sending() {
        let sender = MockSender::new(false, 0);
        let scheduler = DailyScheduler::new(Arc::clone(&sender), Trigger::new(5, 0), fast_retry());

        assert_eq!(scheduler.force_send(), Err(SchedulerError::Disabled));
        assert_eq!(sender.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn force_send_runs_one_cycle() {
        let sender = MockSender::new(true, 0);
        let scheduler = DailyScheduler::new(Arc::clone(&sender), Trigger::new(5, 0), fast_retry());

        assert!(scheduler.force_send().is_ok());
        // Paused time auto-advances; yield until the spawned cycle completes.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sender.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_retries_with_linear_backoff() {
        let sender = MockSender::new(true, 2);
        let retry = fast_retry();

        let started = tokio::time::Instant::now();
        run_cycle(sender.as_ref(), &retry).await;

        // Attempts 1 and 2 fail: 5 min + 10 min of backoff before success.
        assert_eq!(sender.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(15 * 60));
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_gives_up_after_max_attempts() {
        let sender = MockSender::new(true, u32::MAX);
        let retry = fast_retry();

        let started = tokio::time::Instant::now();
        run_cycle(sender.as_ref(), &retry).await;

        // Exactly 3 sends and no backoff after the final failure.
        assert_eq!(sender.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(15 * 60));
    }

    #[tokio::test]
    async fn cycle_skips_silently_when_disabled() {
        let sender = MockSender::new(false, 0);
        run_cycle(sender.as_ref(), &fast_retry()).await;
        assert_eq!(sender.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_cycle_leaves_scheduler_running() {
        use chrono::Timelike;

        let sender = MockSender::new(true, u32::MAX);
        // Pin the trigger ~24h out so the loop's own timer cannot interleave
        // with the forced cycle under test.
        let now = Local::now();
        let scheduler = DailyScheduler::new(
            Arc::clone(&sender),
            Trigger::new(now.hour(), now.minute()),
            fast_retry(),
        );
        let (_tx, rx) = watch::channel(false);
        scheduler.start(rx).unwrap();

        scheduler.force_send().unwrap();
        tokio::time::sleep(Duration::from_secs(16 * 60)).await;

        assert_eq!(sender.calls(), 3);
        // Delivery failure is recoverable at the cycle level, never fatal.
        assert!(scheduler.is_running());
        scheduler.stop().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_admit_exactly_one() {
        let sender = MockSender::new(true, 0);
        let scheduler =
            Arc::new(DailyScheduler::new(sender, Trigger::new(5, 0), fast_retry()));
        let (_tx, rx) = watch::channel(false);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let scheduler = Arc::clone(&scheduler);
            let rx = rx.clone();
            handles.push(tokio::spawn(async move { scheduler.start(rx).is_ok() }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert!(scheduler.is_running());
        scheduler.stop().unwrap();
    }
}
