//! WebAssembly Bridge Implementations
//!
//! This crate provides browser implementations of the bridge traits defined
//! in `bridge-traits`. They use browser APIs through `web-sys` and
//! `wasm-bindgen`, and are what the read-aloud content script injects into
//! the playback core.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It compiles to an empty crate on native targets.
//!
//! # Implementations
//!
//! - [`FetchHttpClient`]: `fetch` with `AbortController` timeouts
//! - [`WebAudioGraphHost`]: one `AudioContext` + `GainNode` per session
//! - [`HtmlAudioElementHost`]: detached `<audio>` elements
//! - [`BlobUrlRegistry`]: `URL.createObjectURL` / `revokeObjectURL`
//! - [`IntervalTimerHost`]: `setInterval` / `clearInterval`
//! - [`PerformanceClock`]: `performance.now()`
//! - [`CustomEventNotificationSurface`]: toasts via `CustomEvent`
//! - [`ElementPopup`]: popup geometry from `getBoundingClientRect`
//! - [`ConsoleLogSink`]: `console.*` log forwarding
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::{build_wasm_bridges, WasmBridgeConfig};
//! use core_runtime::config::CoreConfig;
//!
//! let bridges = build_wasm_bridges(WasmBridgeConfig::default())?;
//! let config = CoreConfig::builder()
//!     .http_client(bridges.http_client.clone())
//!     .clock(bridges.clock.clone())
//!     .timer_host(bridges.timer_host.clone())
//!     .notifications(bridges.notifications.clone())
//!     .audio_graph(bridges.audio_graph.clone())
//!     .media_elements(bridges.media_elements.clone())
//!     .object_urls(bridges.object_urls.clone())
//!     .popup(bridges.popup_for(popup_element)?)
//!     .build()?;
//! ```

#![cfg(target_arch = "wasm32")]

pub mod audio;
pub mod bootstrap;
pub mod clock;
pub mod error;
pub mod http;
pub mod log;
pub mod media;
pub mod notification;
pub mod popup;
pub mod timer;

// Re-export commonly used types
pub use audio::{WebAudioGraph, WebAudioGraphHost};
pub use bootstrap::{build_wasm_bridges, WasmBridgeConfig, WasmBridgeSet};
pub use clock::PerformanceClock;
pub use error::{WasmError, WasmResult};
pub use http::FetchHttpClient;
pub use log::ConsoleLogSink;
pub use media::{BlobUrlRegistry, HtmlAudio, HtmlAudioElementHost};
pub use notification::{CustomEventNotificationSurface, NOTIFY_EVENT};
pub use popup::ElementPopup;
pub use timer::IntervalTimerHost;
