//! # Playback Configuration
//!
//! Configuration types for the audio playback manager.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backend::BackendKind;

/// Playback manager configuration.
///
/// Controls cache sizing, progress polling, backend preference and volume
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum number of synthesized clips kept in memory.
    ///
    /// Eviction is by insertion order. `0` disables caching; each session
    /// then owns (and revokes) its own object URL.
    ///
    /// Default: 50.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// How often the active backend is polled for position and end-of-stream.
    ///
    /// Default: 100 ms.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: Duration,

    /// Playback strategies, tried in order until one starts.
    ///
    /// Default: decoded buffer, streaming element, encoded data URL.
    #[serde(default = "default_backend_order")]
    pub backend_order: Vec<BackendKind>,

    /// Volume of the first session (`0.0..=1.0`).
    ///
    /// Default: 1.0.
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Volume restored by unmute when nothing was stored before muting.
    ///
    /// Default: 0.5.
    #[serde(default = "default_unmute_volume")]
    pub unmute_volume: f32,

    /// Cut over-long selections to the API limit instead of rejecting them.
    ///
    /// Default: true.
    #[serde(default = "default_truncate_long_text")]
    pub truncate_long_text: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            progress_interval: default_progress_interval(),
            backend_order: default_backend_order(),
            initial_volume: default_initial_volume(),
            unmute_volume: default_unmute_volume(),
            truncate_long_text: default_truncate_long_text(),
        }
    }
}

impl PlaybackConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Faster progress polling for smoother progress bars.
    pub fn low_latency() -> Self {
        Self {
            progress_interval: Duration::from_millis(50),
            ..Default::default()
        }
    }

    /// No caching: every play request fetches fresh audio.
    pub fn uncached() -> Self {
        Self {
            cache_capacity: 0,
            ..Default::default()
        }
    }

    pub fn with_backend_order(mut self, order: Vec<BackendKind>) -> Self {
        self.backend_order = order;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Validate configuration parameters.
    ///
    /// Returns an error message if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.progress_interval.is_zero() {
            return Err("progress_interval must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(format!(
                "initial_volume must be between 0.0 and 1.0, got {}",
                self.initial_volume
            ));
        }

        if !(0.0..=1.0).contains(&self.unmute_volume) || self.unmute_volume == 0.0 {
            return Err(format!(
                "unmute_volume must be in (0.0, 1.0], got {}",
                self.unmute_volume
            ));
        }

        if self.backend_order.is_empty() {
            return Err("backend_order must list at least one backend".to_string());
        }

        for (index, kind) in self.backend_order.iter().enumerate() {
            if self.backend_order[..index].contains(kind) {
                return Err(format!("backend_order lists {} more than once", kind));
            }
        }

        Ok(())
    }
}

// Default value functions for serde

fn default_cache_capacity() -> usize {
    50
}

fn default_progress_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_backend_order() -> Vec<BackendKind> {
    vec![
        BackendKind::DecodedBuffer,
        BackendKind::StreamingElement,
        BackendKind::EncodedDataUrl,
    ]
}

fn default_initial_volume() -> f32 {
    1.0
}

fn default_unmute_volume() -> f32 {
    0.5
}

fn default_truncate_long_text() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlaybackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_capacity, 50);
        assert_eq!(config.progress_interval, Duration::from_millis(100));
        assert_eq!(config.backend_order[0], BackendKind::DecodedBuffer);
        assert_eq!(config.unmute_volume, 0.5);
    }

    #[test]
    fn test_presets_are_valid() {
        let low_latency = PlaybackConfig::low_latency();
        assert!(low_latency.validate().is_ok());
        assert_eq!(low_latency.progress_interval, Duration::from_millis(50));

        let uncached = PlaybackConfig::uncached();
        assert!(uncached.validate().is_ok());
        assert_eq!(uncached.cache_capacity, 0);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = PlaybackConfig::default();
        config.progress_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = PlaybackConfig::default();
        config.initial_volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = PlaybackConfig::default();
        config.unmute_volume = 0.0;
        assert!(config.validate().is_err());

        let config = PlaybackConfig::default().with_backend_order(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_backend_rejected() {
        let config = PlaybackConfig::default().with_backend_order(vec![
            BackendKind::StreamingElement,
            BackendKind::StreamingElement,
        ]);
        let err = config.validate().unwrap_err();
        assert!(err.contains("streaming-element"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"cache_capacity":5,"backend_order":["encoded-data-url"]}"#)
                .unwrap();
        assert_eq!(config.cache_capacity, 5);
        assert_eq!(config.backend_order, vec![BackendKind::EncodedDataUrl]);
        assert_eq!(config.initial_volume, 1.0);
        assert!(config.truncate_long_text);
    }
}
