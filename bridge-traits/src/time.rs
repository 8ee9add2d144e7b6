//! Monotonic Time Source
//!
//! The decoded-buffer backend has no native playback clock, so its position is
//! derived from elapsed wall time. The clock is injectable so tests can drive
//! that derivation deterministically.

use crate::platform::PlatformSendSync;

/// Monotonic time source.
///
/// Values are milliseconds relative to an arbitrary, fixed origin (the
/// semantics of the browser's `performance.now()`). Only differences between
/// two readings are meaningful.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::time::Clock;
///
/// fn elapsed_secs(clock: &dyn Clock, since_ms: f64) -> f64 {
///     (clock.now_millis() - since_ms) / 1000.0
/// }
/// ```
pub trait Clock: PlatformSendSync {
    /// Current monotonic time in milliseconds.
    fn now_millis(&self) -> f64;

    /// Milliseconds elapsed since an earlier reading.
    fn elapsed_since(&self, earlier_ms: f64) -> f64 {
        (self.now_millis() - earlier_ms).max(0.0)
    }
}
