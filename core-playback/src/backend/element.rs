//! Media element backends (`blob:` URL and embedded `data:` URI).

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bridge_traits::{MediaElement, MediaElementHost};
use tracing::debug;

use super::{AudioBackend, BackendKind};
use crate::error::{PlaybackError, Result};

/// Build a self-contained `data:` URI for encoded audio.
pub fn data_url(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(data))
}

/// Plays through a host media element, which keeps its own clock.
pub struct ElementBackend {
    kind: BackendKind,
    element: Box<dyn MediaElement>,
    duration: f64,
    released: bool,
}

impl ElementBackend {
    /// Create an element and load `src` into it.
    ///
    /// `duration_hint` is used when the element cannot report a duration
    /// (some hosts report `Infinity` or `NaN` for in-memory sources).
    pub async fn open(
        host: &dyn MediaElementHost,
        kind: BackendKind,
        src: &str,
        duration_hint: Option<f64>,
    ) -> Result<Self> {
        let mut element = host.create_element()?;
        let loaded = match element.load(src).await {
            Ok(duration) => duration,
            Err(err) => {
                element.release();
                return Err(err.into());
            }
        };

        let duration = if loaded.is_finite() && loaded > 0.0 {
            loaded
        } else if let Some(hint) = duration_hint.filter(|hint| *hint > 0.0) {
            hint
        } else {
            element.release();
            return Err(PlaybackError::DecodeFailed(
                "media element reported no duration".to_string(),
            ));
        };

        debug!(%kind, duration_secs = duration, "Loaded media element");

        Ok(Self {
            kind,
            element,
            duration,
            released: false,
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AudioBackend for ElementBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn play(&mut self) -> Result<()> {
        if self.released {
            return Err(PlaybackError::PlaybackInterrupted(
                "backend already released".to_string(),
            ));
        }
        self.element.play().await?;
        Ok(())
    }

    fn pause(&mut self) {
        if !self.released {
            self.element.pause();
        }
    }

    fn seek(&mut self, secs: f64) -> Result<()> {
        if self.released {
            return Err(PlaybackError::SeekFailed(
                "media element already released".to_string(),
            ));
        }
        self.element
            .set_current_time(secs.clamp(0.0, self.duration))
            .map_err(|e| PlaybackError::SeekFailed(e.to_string()))
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        if !self.released {
            self.element.set_volume(volume.clamp(0.0, 1.0));
        }
        Ok(())
    }

    fn position_secs(&self) -> f64 {
        let position = self.element.current_time();
        if position.is_finite() {
            position.clamp(0.0, self.duration)
        } else {
            0.0
        }
    }

    fn duration_secs(&self) -> f64 {
        self.duration
    }

    fn is_finished(&self) -> bool {
        !self.released && self.element.ended()
    }

    fn runtime_error(&self) -> Option<String> {
        if self.released {
            return None;
        }
        self.element.error()
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.element.release();
    }
}

impl Drop for ElementBackend {
    fn drop(&mut self) {
        self.release();
    }
}
