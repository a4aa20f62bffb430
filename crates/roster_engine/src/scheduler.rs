use std::time::Duration;

use roster_logging::{roster_debug, roster_info};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::TaskId;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Shortest accepted period; tokio intervals reject a zero period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Ownership token for the live poll timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct PollHandle {
    task_id: TaskId,
    timer: JoinHandle<()>,
}

impl PollHandle {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

/// Runs at most one fixed-interval timer at a time.
///
/// Ticks fire on a wall-clock cadence: the callback must not block, and the
/// scheduler never waits for work the callback starts. Deciding when a job is
/// finished is up to the caller, which calls [`PollingScheduler::stop`].
#[derive(Debug)]
pub struct PollingScheduler {
    period: Duration,
    runtime: Handle,
    active: Option<PollHandle>,
}

impl PollingScheduler {
    pub fn new(period: Duration, runtime: Handle) -> Self {
        Self {
            period: period.max(MIN_POLL_INTERVAL),
            runtime,
            active: None,
        }
    }

    /// Starts invoking `on_tick` every period, first after one full period.
    /// Any timer already running is cancelled first.
    pub fn start<F>(&mut self, task_id: impl Into<TaskId>, on_tick: F)
    where
        F: Fn() + Send + 'static,
    {
        self.stop();
        let task_id = task_id.into();
        let period = self.period;
        roster_info!("Polling task {} every {:?}", task_id, period);

        let timer = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                on_tick();
            }
        });
        self.active = Some(PollHandle { task_id, timer });
    }

    /// Cancels the live timer. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            roster_debug!("Stopped polling task {}", handle.task_id());
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_task(&self) -> Option<&str> {
        self.active.as_ref().map(PollHandle::task_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn scheduler() -> PollingScheduler {
        PollingScheduler::new(DEFAULT_POLL_INTERVAL, Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_on_fixed_interval_until_stopped() {
        let (count, on_tick) = counter();
        let mut scheduler = scheduler();
        scheduler.start("t1", on_tick);
        assert_eq!(scheduler.active_task(), Some("t1"));

        tokio::time::sleep(Duration::from_millis(1_900)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        scheduler.stop();
        assert!(!scheduler.is_running());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_live_timer() {
        let (first, first_tick) = counter();
        let (second, second_tick) = counter();
        let mut scheduler = scheduler();

        scheduler.start("t1", first_tick);
        tokio::time::sleep(Duration::from_millis(2_100)).await;
        scheduler.start("t2", second_tick);
        tokio::time::sleep(Duration::from_millis(7_000)).await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.active_task(), Some("t2"));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let mut scheduler = scheduler();
        scheduler.stop();
        let (_count, on_tick) = counter();
        scheduler.start("t1", on_tick);
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.active_task(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_raised_to_the_minimum() {
        let (count, on_tick) = counter();
        let mut scheduler = PollingScheduler::new(Duration::ZERO, Handle::current());
        scheduler.start("t1", on_tick);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(count.load(Ordering::SeqCst) >= 1);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_scheduler_cancels_the_timer() {
        let (count, on_tick) = counter();
        let mut scheduler = scheduler();
        scheduler.start("t1", on_tick);
        drop(scheduler);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
