//! Decoded-buffer backend.

use async_trait::async_trait;
use bridge_traits::{AudioGraph, AudioGraphHost, Clock};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{AudioBackend, BackendKind};
use crate::error::{PlaybackError, Result};

/// Wall-clock position derivation for a backend without a native clock.
///
/// `position = (now - anchor - paused_total) / 1000`, clamped to the clip.
/// While paused the position is the snapshot taken at pause time. All times
/// are clock milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionTracker {
    anchor_ms: f64,
    paused_total_ms: f64,
    paused_since_ms: Option<f64>,
    snapshot_secs: f64,
}

impl PositionTracker {
    /// Playback (re)starts from zero at `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        *self = Self {
            anchor_ms: now_ms,
            ..Default::default()
        };
    }

    /// Freeze the position. Returns the snapshot.
    pub fn pause(&mut self, now_ms: f64, duration_secs: f64) -> f64 {
        if self.paused_since_ms.is_none() {
            self.snapshot_secs = self.position(now_ms, duration_secs);
            self.paused_since_ms = Some(now_ms);
        }
        self.snapshot_secs
    }

    /// Unfreeze. Returns the offset playback must restart from.
    pub fn resume(&mut self, now_ms: f64) -> f64 {
        if let Some(since) = self.paused_since_ms.take() {
            self.paused_total_ms += (now_ms - since).max(0.0);
        }
        self.snapshot_secs
    }

    /// Re-anchor so the position reads `target_secs` from `now_ms` on.
    pub fn seek(&mut self, now_ms: f64, target_secs: f64) {
        self.anchor_ms = now_ms - target_secs * 1000.0;
        self.paused_total_ms = 0.0;
        self.snapshot_secs = target_secs;
        if self.paused_since_ms.is_some() {
            self.paused_since_ms = Some(now_ms);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since_ms.is_some()
    }

    pub fn position(&self, now_ms: f64, duration_secs: f64) -> f64 {
        let secs = if self.paused_since_ms.is_some() {
            self.snapshot_secs
        } else {
            (now_ms - self.anchor_ms - self.paused_total_ms) / 1000.0
        };
        secs.clamp(0.0, duration_secs.max(0.0))
    }
}

/// Plays a decoded buffer through the host audio graph.
///
/// Buffer source nodes are one-shot, so pause stops the node and resume or
/// seek starts a fresh one at the tracked offset. The gain node persists.
pub struct DecodedBufferBackend {
    graph: Box<dyn AudioGraph>,
    clock: Arc<dyn Clock>,
    duration: f64,
    volume: f32,
    tracker: PositionTracker,
    started: bool,
    /// The context was resumed ahead of the first `play`.
    primed: bool,
    released: bool,
}

impl DecodedBufferBackend {
    /// Open a processing context and decode `data` into it.
    ///
    /// # Errors
    ///
    /// `DecodeFailed` when the host cannot decode the data; the context is
    /// closed before returning.
    pub async fn open(
        host: &dyn AudioGraphHost,
        clock: Arc<dyn Clock>,
        data: Bytes,
    ) -> Result<Self> {
        let mut graph = host.create_graph()?;
        let duration = match graph.decode(data).await {
            Ok(duration) if duration.is_finite() && duration > 0.0 => duration,
            Ok(duration) => {
                graph.close();
                return Err(PlaybackError::DecodeFailed(format!(
                    "decoded buffer has invalid duration {}",
                    duration
                )));
            }
            Err(err) => {
                graph.close();
                return Err(PlaybackError::DecodeFailed(err.to_string()));
            }
        };

        debug!(duration_secs = duration, "Decoded audio buffer");

        Ok(Self {
            graph,
            clock,
            duration,
            volume: 1.0,
            tracker: PositionTracker::default(),
            started: false,
            primed: false,
            released: false,
        })
    }

    /// Resume the processing context without starting the source, so the
    /// caller can still back out before anything is audible. The next `play`
    /// skips its own resume.
    pub(crate) async fn prime(&mut self) -> Result<()> {
        if self.released {
            return Err(PlaybackError::PlaybackInterrupted(
                "backend already released".to_string(),
            ));
        }
        self.graph.resume_context().await?;
        self.primed = true;
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.released || self.graph.is_closed() {
            return Err(PlaybackError::SeekFailed(
                "audio context already closed".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AudioBackend for DecodedBufferBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DecodedBuffer
    }

    async fn play(&mut self) -> Result<()> {
        if self.released {
            return Err(PlaybackError::PlaybackInterrupted(
                "backend already released".to_string(),
            ));
        }

        if !std::mem::take(&mut self.primed) {
            self.graph.resume_context().await?;
        }
        self.graph.set_gain(self.volume)?;

        let now = self.clock.now_millis();
        if !self.started {
            self.graph.start_at(0.0)?;
            self.tracker.start(now);
            self.started = true;
        } else if self.tracker.is_paused() {
            let offset = self.tracker.resume(now);
            self.graph.start_at(offset)?;
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.started || self.tracker.is_paused() {
            return;
        }
        let position = self.tracker.pause(self.clock.now_millis(), self.duration);
        self.graph.stop();
        debug!(position, "Paused decoded buffer");
    }

    fn seek(&mut self, secs: f64) -> Result<()> {
        self.ensure_open()?;
        let target = secs.clamp(0.0, self.duration);
        let now = self.clock.now_millis();

        if self.started && !self.tracker.is_paused() {
            self.graph.stop();
            self.graph
                .start_at(target)
                .map_err(|e| PlaybackError::SeekFailed(e.to_string()))?;
        }
        if !self.started {
            // Seeking before the first start: begin paused at the target.
            self.tracker.start(now);
            self.tracker.pause(now, self.duration);
            self.started = true;
        }
        self.tracker.seek(now, target);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume.clamp(0.0, 1.0);
        if self.released {
            return Ok(());
        }
        self.graph.set_gain(self.volume)?;
        Ok(())
    }

    fn position_secs(&self) -> f64 {
        if !self.started {
            return 0.0;
        }
        self.tracker.position(self.clock.now_millis(), self.duration)
    }

    fn duration_secs(&self) -> f64 {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.started && !self.tracker.is_paused() && self.position_secs() >= self.duration
    }

    fn runtime_error(&self) -> Option<String> {
        (!self.released && self.graph.is_closed())
            .then(|| "audio context was closed by the host".to_string())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.graph.stop();
        self.graph.close();
        if !self.graph.is_closed() {
            warn!("Audio context did not report closed after release");
        }
    }
}

impl Drop for DecodedBufferBackend {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advances_with_wall_time() {
        let mut tracker = PositionTracker::default();
        tracker.start(1_000.0);
        assert_eq!(tracker.position(1_000.0, 10.0), 0.0);
        assert_eq!(tracker.position(3_500.0, 10.0), 2.5);
        assert_eq!(tracker.position(60_000.0, 10.0), 10.0);
    }

    #[test]
    fn test_paused_time_is_excluded() {
        let mut tracker = PositionTracker::default();
        tracker.start(0.0);

        assert_eq!(tracker.pause(2_500.0, 10.0), 2.5);
        assert_eq!(tracker.position(9_000.0, 10.0), 2.5);

        assert_eq!(tracker.resume(9_000.0), 2.5);
        assert_eq!(tracker.position(10_000.0, 10.0), 3.5);
    }

    #[test]
    fn test_seek_reanchors() {
        let mut tracker = PositionTracker::default();
        tracker.start(0.0);
        tracker.pause(1_000.0, 10.0);
        tracker.resume(4_000.0);

        tracker.seek(5_000.0, 8.0);
        assert_eq!(tracker.position(5_000.0, 10.0), 8.0);
        assert_eq!(tracker.position(6_000.0, 10.0), 9.0);
    }

    #[test]
    fn test_seek_while_paused_stays_paused() {
        let mut tracker = PositionTracker::default();
        tracker.start(0.0);
        tracker.pause(2_000.0, 10.0);

        tracker.seek(3_000.0, 6.0);
        assert!(tracker.is_paused());
        assert_eq!(tracker.position(7_000.0, 10.0), 6.0);

        assert_eq!(tracker.resume(7_000.0), 6.0);
        assert_eq!(tracker.position(8_000.0, 10.0), 7.0);
    }

    #[test]
    fn test_position_never_negative() {
        let mut tracker = PositionTracker::default();
        tracker.start(5_000.0);
        assert_eq!(tracker.position(4_000.0, 10.0), 0.0);
    }
}
