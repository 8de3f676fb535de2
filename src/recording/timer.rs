use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

/// One-second elapsed counter driven by a tokio interval
///
/// The first tick lands one second after `start`. Cancelling is idempotent
/// and also happens on drop.
pub struct ElapsedTimer {
    ticks: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl ElapsedTimer {
    /// Spawn the counter task; must be called inside a tokio runtime
    pub fn start() -> Self {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        Self {
            ticks,
            task: Some(task),
        }
    }

    /// Seconds counted so far
    pub fn elapsed_secs(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Stop counting and return the final count
    pub fn cancel(&mut self) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Elapsed timer cancelled at {}s", self.elapsed_secs());
        }
        self.elapsed_secs()
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
