//! Ordered fallback across playback strategies.

use bridge_traits::{AudioGraphHost, Clock, MediaElementHost};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{data_url, AudioBackend, BackendKind, DecodedBufferBackend, ElementBackend, PlaybackBackend};
use crate::cache::AudioResource;
use crate::error::{PlaybackError, Result};

/// Tries each configured strategy in order until one is audibly playing.
///
/// A strategy succeeds only once `play()` resolved; anything a failed
/// strategy created is released before the next one is tried.
pub struct BackendSelector {
    order: Vec<BackendKind>,
    audio_graph: Option<Arc<dyn AudioGraphHost>>,
    media_elements: Option<Arc<dyn MediaElementHost>>,
    clock: Arc<dyn Clock>,
}

impl BackendSelector {
    pub fn new(
        order: Vec<BackendKind>,
        audio_graph: Option<Arc<dyn AudioGraphHost>>,
        media_elements: Option<Arc<dyn MediaElementHost>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            order,
            audio_graph,
            media_elements,
            clock,
        }
    }

    /// Start `resource` at `volume` with the first strategy that works.
    ///
    /// `is_current` is checked before each strategy, after the source is
    /// opened, before and after `play()`. Once it reports `false`, whatever
    /// was opened is released and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// `PlaybackUnavailable` listing every strategy's failure.
    #[instrument(skip(self, resource, is_current), fields(mime = %resource.mime, bytes = resource.data.len()))]
    pub async fn start(
        &self,
        resource: &AudioResource,
        volume: f32,
        is_current: impl Fn() -> bool,
    ) -> Result<Option<PlaybackBackend>> {
        let mut failures = Vec::with_capacity(self.order.len());

        for &kind in &self.order {
            if !is_current() {
                debug!(backend = %kind, "Request superseded, not trying further strategies");
                return Ok(None);
            }
            match self.try_start(kind, resource, volume, &is_current).await {
                Ok(Some(backend)) => {
                    info!(backend = %kind, duration_secs = backend.duration_secs(), "Playback started");
                    return Ok(Some(backend));
                }
                Ok(None) => {
                    debug!(backend = %kind, "Released backend of superseded request");
                    return Ok(None);
                }
                Err(err) => {
                    warn!(backend = %kind, error = %err, "Playback strategy failed");
                    failures.push(format!("{}: {}", kind, err));
                }
            }
        }

        Err(PlaybackError::PlaybackUnavailable(failures.join("; ")))
    }

    async fn try_start(
        &self,
        kind: BackendKind,
        resource: &AudioResource,
        volume: f32,
        is_current: &impl Fn() -> bool,
    ) -> Result<Option<PlaybackBackend>> {
        let mut backend = match kind {
            BackendKind::DecodedBuffer => {
                let host = self.audio_graph.as_deref().ok_or_else(|| {
                    PlaybackError::PlaybackUnavailable("no audio graph host".to_string())
                })?;
                PlaybackBackend::Decoded(
                    DecodedBufferBackend::open(host, self.clock.clone(), resource.data.clone())
                        .await?,
                )
            }
            BackendKind::StreamingElement => {
                let host = self.element_host()?;
                let url = resource.object_url.as_deref().ok_or_else(|| {
                    PlaybackError::PlaybackUnavailable("no object URL for audio".to_string())
                })?;
                PlaybackBackend::Element(
                    ElementBackend::open(host, kind, url, resource.duration_hint).await?,
                )
            }
            BackendKind::EncodedDataUrl => {
                let host = self.element_host()?;
                let url = data_url(&resource.mime, &resource.data);
                debug!(url_len = url.len(), "Built data URL fallback");
                PlaybackBackend::Element(
                    ElementBackend::open(host, kind, &url, resource.duration_hint).await?,
                )
            }
        };

        if !is_current() {
            backend.release();
            return Ok(None);
        }

        let started = match backend.set_volume(volume) {
            Ok(()) => backend.prime().await,
            Err(err) => Err(err),
        };
        let started = match started {
            Ok(()) if !is_current() => {
                backend.release();
                return Ok(None);
            }
            Ok(()) => backend.play().await,
            Err(err) => Err(err),
        };

        match started {
            Ok(()) if is_current() => Ok(Some(backend)),
            Ok(()) => {
                backend.release();
                Ok(None)
            }
            Err(err) => {
                backend.release();
                Err(err)
            }
        }
    }

    fn element_host(&self) -> Result<&dyn MediaElementHost> {
        self.media_elements
            .as_deref()
            .ok_or_else(|| PlaybackError::PlaybackUnavailable("no media element host".to_string()))
    }
}
