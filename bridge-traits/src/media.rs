//! Streaming Media Element & Object URLs
//!
//! High-level media playback (an `HTMLAudioElement` in the browser) plus the
//! registry used to expose in-memory audio as fetchable `blob:` URLs.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::platform::{PlatformSend, PlatformSendSync};

/// Factory for media elements.
pub trait MediaElementHost: PlatformSendSync {
    fn create_element(&self) -> Result<Box<dyn MediaElement>>;
}

/// A streaming media element with a native playback clock.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MediaElement: PlatformSend {
    /// Point the element at `src` and wait until metadata is available.
    ///
    /// Returns the duration in seconds. Fails if the source cannot be loaded
    /// (unsupported format, blocked by content-security policy, ...).
    async fn load(&mut self, src: &str) -> Result<f64>;

    /// Start or resume playback. Hosts reject this when an autoplay policy
    /// forbids playback.
    async fn play(&mut self) -> Result<()>;

    /// Pause in place; `current_time` is preserved.
    fn pause(&mut self);

    /// Native playback position in seconds.
    fn current_time(&self) -> f64;

    /// Move the native playback position.
    fn set_current_time(&mut self, secs: f64) -> Result<()>;

    /// Duration in seconds, `0.0` when unknown.
    fn duration(&self) -> f64;

    /// Element volume (`0.0..=1.0`).
    fn set_volume(&mut self, volume: f32);

    /// Whether playback reached the end of the resource.
    fn ended(&self) -> bool;

    /// Human-readable description of a runtime media error, if one occurred.
    fn error(&self) -> Option<String>;

    /// Pause and detach the source so the element can be collected.
    fn release(&mut self);
}

/// Registry for `blob:` URLs backed by in-memory data.
pub trait ObjectUrlRegistry: PlatformSendSync {
    /// Wrap `data` in a blob of type `mime` and return its URL.
    fn create_object_url(&self, data: &Bytes, mime: &str) -> Result<String>;

    /// Release a URL created by [`create_object_url`](Self::create_object_url).
    fn revoke_object_url(&self, url: &str) -> Result<()>;
}
