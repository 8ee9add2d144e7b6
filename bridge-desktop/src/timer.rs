//! Interval timers on the ambient Tokio runtime.

use bridge_traits::{
    error::{BridgeError, Result},
    platform::DynCallback,
    timer::{TimerHandle, TimerHost},
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Runs each interval as a spawned Tokio task; clearing aborts the task.
///
/// `set_interval` must be called from within a Tokio runtime.
#[derive(Default)]
pub struct TokioTimerHost {
    next_id: AtomicU64,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl TokioTimerHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerHost for TokioTimerHost {
    fn set_interval(&self, period: Duration, mut callback: Box<DynCallback>) -> Result<TimerHandle> {
        if period.is_zero() {
            return Err(BridgeError::OperationFailed(
                "interval period must be non-zero".to_string(),
            ));
        }
        let runtime = Handle::try_current().map_err(|_| {
            BridgeError::NotAvailable("interval timers need a Tokio runtime".to_string())
        })?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                callback();
            }
        });

        self.tasks.lock().insert(id, task);
        debug!(timer_id = id, period_ms = period.as_millis() as u64, "Interval registered");
        Ok(TimerHandle(id))
    }

    fn clear_interval(&self, handle: TimerHandle) {
        if let Some(task) = self.tasks.lock().remove(&handle.0) {
            task.abort();
            debug!(timer_id = handle.0, "Interval cleared");
        }
    }

    fn active_timers(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl Drop for TokioTimerHost {
    fn drop(&mut self) {
        for (_, task) in self.tasks.get_mut().drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::time::sleep;

    fn counting(counter: &Arc<AtomicUsize>) -> Box<DynCallback> {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test]
    async fn test_interval_fires_until_cleared() {
        let timers = TokioTimerHost::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let handle = timers
            .set_interval(Duration::from_millis(10), counting(&counter))
            .unwrap();
        assert_eq!(timers.active_timers(), 1);

        sleep(Duration::from_millis(80)).await;
        assert!(counter.load(Ordering::SeqCst) >= 2);

        timers.clear_interval(handle);
        assert_eq!(timers.active_timers(), 0);
        let after_clear = counter.load(Ordering::SeqCst);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), after_clear);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let timers = TokioTimerHost::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = timers
            .set_interval(Duration::from_millis(10), counting(&counter))
            .unwrap();

        timers.clear_interval(handle);
        timers.clear_interval(handle);
        timers.clear_interval(TimerHandle(999));
        assert_eq!(timers.active_timers(), 0);
    }

    #[tokio::test]
    async fn test_zero_period_is_rejected() {
        let timers = TokioTimerHost::new();
        let counter = Arc::new(AtomicUsize::new(0));
        assert!(timers
            .set_interval(Duration::ZERO, counting(&counter))
            .is_err());
    }

    #[test]
    fn test_requires_runtime() {
        let timers = TokioTimerHost::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let err = timers
            .set_interval(Duration::from_millis(10), counting(&counter))
            .unwrap_err();
        assert!(matches!(err, BridgeError::NotAvailable(_)));
    }
}
