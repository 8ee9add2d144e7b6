//! # Host Bridge Traits
//!
//! Capability traits the playback core requires from its host (a browser
//! extension content script, or a desktop shell during development).
//!
//! ## Overview
//!
//! The core never talks to the DOM, Web Audio, or the network directly. Each
//! trait below is one capability, implemented by `bridge-wasm` for browsers
//! and by `bridge-desktop` (where the platform has an equivalent) for native
//! builds and tests.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Single-shot async HTTP requests
//!
//! ### Audio
//! - [`AudioGraphHost`](audio::AudioGraphHost) / [`AudioGraph`](audio::AudioGraph) - Decoded-buffer playback with a gain node
//! - [`MediaElementHost`](media::MediaElementHost) / [`MediaElement`](media::MediaElement) - Streaming media element playback
//! - [`ObjectUrlRegistry`](media::ObjectUrlRegistry) - `blob:` URL creation and revocation
//!
//! ### Page Integration
//! - [`TimerHost`](timer::TimerHost) - Interval timers for progress polling
//! - [`NotificationSurface`](notification::NotificationSurface) - User-facing error toasts
//! - [`HostPopup`](geometry::HostPopup) - Geometry of the popup the controls dock to
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Monotonic time source for deterministic testing
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors (JS exceptions, `reqwest` errors) into it
//! with an actionable message.
//!
//! ## Thread Safety
//!
//! Trait bounds go through [`platform::PlatformSendSync`]: `Send + Sync` on
//! native targets, nothing on `wasm32`, where browser objects are bound to the
//! page's single thread.

pub mod audio;
pub mod error;
pub mod geometry;
pub mod http;
pub mod log;
pub mod media;
pub mod notification;
pub mod platform;
pub mod time;
pub mod timer;

pub use error::BridgeError;

// Re-export commonly used types
pub use audio::{AudioGraph, AudioGraphHost};
pub use geometry::{HostPopup, Point, Rect, Size};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaElement, MediaElementHost, ObjectUrlRegistry};
pub use notification::{NotificationCategory, NotificationSurface};
pub use time::Clock;
pub use timer::{TimerHandle, TimerHost};
