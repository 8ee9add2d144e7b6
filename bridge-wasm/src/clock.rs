//! `performance.now()` clock.

use bridge_traits::{error::Result as BridgeResult, time::Clock};
use web_sys::Performance;

use crate::error::{window, WasmError};

pub struct PerformanceClock {
    performance: Performance,
}

impl PerformanceClock {
    pub fn new() -> BridgeResult<Self> {
        let performance = window()?
            .performance()
            .ok_or_else(|| WasmError::Unavailable("performance".to_string()))?;
        Ok(Self { performance })
    }
}

impl Clock for PerformanceClock {
    fn now_millis(&self) -> f64 {
        self.performance.now()
    }
}
