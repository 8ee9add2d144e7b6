//! # Playback Backends
//!
//! The three interchangeable ways a clip can be played, behind one small
//! capability interface so the session and the transport controls never
//! probe which backend is active.
//!
//! ## Backends
//!
//! - [`DecodedBufferBackend`]: decodes into an in-memory buffer and plays
//!   through a gain node. It has no native clock; position is derived from
//!   elapsed wall time (see [`PositionTracker`]).
//! - [`ElementBackend`] with [`BackendKind::StreamingElement`]: a media
//!   element pointed at the clip's `blob:` URL.
//! - [`ElementBackend`] with [`BackendKind::EncodedDataUrl`]: the same element
//!   fed a self-contained `data:` URI, for pages whose content-security policy
//!   blocks `blob:` media.
//!
//! ## Threading Model
//!
//! Backends are owned by exactly one session and are never shared. On native
//! targets they are `Send` so the session can move between tasks; on WASM,
//! the traits use `?Send` from `async_trait`.

mod decoded;
mod element;
mod selector;

pub use decoded::{DecodedBufferBackend, PositionTracker};
pub use element::{data_url, ElementBackend};
pub use selector::BackendSelector;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Playback strategy identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// In-memory decoded buffer with a gain node.
    DecodedBuffer,
    /// Media element playing the `blob:` URL.
    StreamingElement,
    /// Media element playing an embedded `data:` URI.
    EncodedDataUrl,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::DecodedBuffer => "decoded-buffer",
            BackendKind::StreamingElement => "streaming-element",
            BackendKind::EncodedDataUrl => "encoded-data-url",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability interface every backend implements.
///
/// Positions and durations are in seconds. `position_secs` is always within
/// `[0, duration_secs]`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AudioBackend {
    fn kind(&self) -> BackendKind;

    /// Start playback, or resume from the paused position.
    async fn play(&mut self) -> Result<()>;

    /// Suspend playback and freeze the position.
    fn pause(&mut self);

    /// Move to `secs` (clamped to the clip). Keeps the current
    /// playing/paused state.
    fn seek(&mut self, secs: f64) -> Result<()>;

    fn set_volume(&mut self, volume: f32) -> Result<()>;

    fn position_secs(&self) -> f64;

    fn duration_secs(&self) -> f64;

    /// Whether playback reached the end of the clip.
    fn is_finished(&self) -> bool;

    /// Runtime failure reported after playback started.
    fn runtime_error(&self) -> Option<String>;

    /// Stop and free host resources. Idempotent.
    fn release(&mut self);
}

/// The concrete backend of a session.
pub enum PlaybackBackend {
    Decoded(DecodedBufferBackend),
    Element(ElementBackend),
}

macro_rules! delegate {
    ($self:expr, $backend:ident => $call:expr) => {
        match $self {
            PlaybackBackend::Decoded($backend) => $call,
            PlaybackBackend::Element($backend) => $call,
        }
    };
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AudioBackend for PlaybackBackend {
    fn kind(&self) -> BackendKind {
        delegate!(self, backend => backend.kind())
    }

    async fn play(&mut self) -> Result<()> {
        delegate!(self, backend => backend.play().await)
    }

    fn pause(&mut self) {
        delegate!(self, backend => backend.pause())
    }

    fn seek(&mut self, secs: f64) -> Result<()> {
        delegate!(self, backend => backend.seek(secs))
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        delegate!(self, backend => backend.set_volume(volume))
    }

    fn position_secs(&self) -> f64 {
        delegate!(self, backend => backend.position_secs())
    }

    fn duration_secs(&self) -> f64 {
        delegate!(self, backend => backend.duration_secs())
    }

    fn is_finished(&self) -> bool {
        delegate!(self, backend => backend.is_finished())
    }

    fn runtime_error(&self) -> Option<String> {
        delegate!(self, backend => backend.runtime_error())
    }

    fn release(&mut self) {
        delegate!(self, backend => backend.release())
    }
}

impl PlaybackBackend {
    /// Get the host ready to play without producing sound yet.
    pub(crate) async fn prime(&mut self) -> Result<()> {
        match self {
            PlaybackBackend::Decoded(backend) => backend.prime().await,
            PlaybackBackend::Element(_) => Ok(()),
        }
    }
}

impl fmt::Debug for PlaybackBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackBackend")
            .field("kind", &self.kind())
            .field("duration_secs", &self.duration_secs())
            .finish()
    }
}
