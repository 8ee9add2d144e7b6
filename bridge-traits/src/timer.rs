//! Interval Timer Abstraction
//!
//! Progress tracking polls the active backend on a fixed interval. The host
//! owns the actual timer (`setInterval` in the browser, a tokio task on
//! desktop) so the core stays runtime-agnostic.

use crate::error::Result;
use crate::platform::{DynCallback, PlatformSendSync};
use std::fmt;
use std::time::Duration;

/// Opaque identifier for a registered interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Host interval timers.
///
/// Implementations must guarantee that once [`clear_interval`](Self::clear_interval)
/// returns, the callback for that handle is never started again. An
/// invocation already running on another thread may still finish.
pub trait TimerHost: PlatformSendSync {
    /// Invoke `callback` every `period` until cleared.
    fn set_interval(&self, period: Duration, callback: Box<DynCallback>) -> Result<TimerHandle>;

    /// Cancel a timer. Clearing an unknown or already-cleared handle is a no-op.
    fn clear_interval(&self, handle: TimerHandle);

    /// Number of timers currently registered.
    fn active_timers(&self) -> usize;
}
