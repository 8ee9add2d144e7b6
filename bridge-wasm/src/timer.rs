//! `setInterval` timers.
//!
//! The browser hands out the interval id, which doubles as the
//! [`TimerHandle`]. Each registration keeps its `Closure` alive until the
//! interval is cleared.

use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    platform::DynCallback,
    timer::{TimerHandle, TimerHost},
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

use crate::error::{js_error, window};

pub struct IntervalTimerHost {
    window: Window,
    intervals: RefCell<HashMap<i32, Closure<dyn FnMut()>>>,
}

impl IntervalTimerHost {
    pub fn new() -> BridgeResult<Self> {
        Ok(Self {
            window: window()?,
            intervals: RefCell::new(HashMap::new()),
        })
    }
}

impl TimerHost for IntervalTimerHost {
    fn set_interval(&self, period: Duration, callback: Box<DynCallback>) -> BridgeResult<TimerHandle> {
        if period.is_zero() {
            return Err(BridgeError::OperationFailed(
                "interval period must be non-zero".to_string(),
            ));
        }
        let timeout_ms = period.as_millis().min(i32::MAX as u128) as i32;
        let closure = Closure::wrap(callback);
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout_ms,
            )
            .map_err(|err| js_error("setInterval", err))?;

        self.intervals.borrow_mut().insert(id, closure);
        debug!(timer_id = id, period_ms = timeout_ms, "Interval registered");
        Ok(TimerHandle(id as u64))
    }

    fn clear_interval(&self, handle: TimerHandle) {
        let id = handle.0 as i32;
        let removed = self.intervals.borrow_mut().remove(&id);
        if let Some(closure) = removed {
            self.window.clear_interval_with_handle(id);
            // The callback may be the caller; free the closure on a later turn.
            wasm_bindgen_futures::spawn_local(async move { drop(closure) });
            debug!(timer_id = id, "Interval cleared");
        }
    }

    fn active_timers(&self) -> usize {
        self.intervals.borrow().len()
    }
}

impl Drop for IntervalTimerHost {
    fn drop(&mut self) {
        for (id, _) in self.intervals.get_mut().drain() {
            self.window.clear_interval_with_handle(id);
        }
    }
}
