//! Decoded-Buffer Audio Graph
//!
//! Abstraction over a Web Audio style processing context: encoded bytes are
//! decoded into an in-memory buffer and played through a one-shot source node
//! connected to a persistent gain node. Source nodes cannot be restarted, so
//! every (re)start creates a fresh node from an arbitrary offset, which is
//! what makes sample-accurate seeking possible.
//!
//! ```text
//!   decode(bytes) ──> [buffer]
//!                        │ start_at(offset)
//!                        ▼
//!                  [source node] ──> [gain node] ──> destination
//! ```

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::platform::{PlatformSend, PlatformSendSync};

/// Factory for audio processing contexts.
pub trait AudioGraphHost: PlatformSendSync {
    /// Open a new processing context. Each playback session owns exactly one.
    fn create_graph(&self) -> Result<Box<dyn AudioGraph>>;
}

/// One processing context with a decoded buffer and a gain node.
///
/// Implementations keep at most one source node alive at a time:
/// `start_at` stops any previous node before creating the new one.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AudioGraph: PlatformSend {
    /// Decode an encoded resource into the context's buffer.
    ///
    /// Returns the buffer duration in seconds.
    async fn decode(&mut self, data: Bytes) -> Result<f64>;

    /// Resume a context the host created in a suspended state (autoplay
    /// policies). A no-op for a running context.
    async fn resume_context(&mut self) -> Result<()>;

    /// Create and start a source node from `offset_secs` into the buffer.
    fn start_at(&mut self, offset_secs: f64) -> Result<()>;

    /// Stop and disconnect the active source node, if any.
    fn stop(&mut self);

    /// Set the gain node value (`0.0..=1.0`). Persists across restarts.
    fn set_gain(&mut self, gain: f32) -> Result<()>;

    /// Stop everything and close the context. Idempotent.
    fn close(&mut self);

    /// Whether the context has been closed.
    fn is_closed(&self) -> bool;
}
