//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for native builds (desktop
//! shells, command-line tools, integration tests).
//!
//! ## Overview
//!
//! This crate provides implementations of the host-agnostic bridges:
//! - `HttpClient` using `reqwest`
//! - `TimerHost` using Tokio tasks
//! - `Clock` using `std::time::Instant`
//! - `NotificationSurface` writing to the tracing log
//!
//! Audio output (`AudioGraphHost`, `MediaElementHost`) is browser-only and
//! must be injected by the embedding application.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, TokioTimerHost};
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .http_client(Arc::new(ReqwestHttpClient::new()?))
//!     .timer_host(Arc::new(TokioTimerHost::new()))
//!     .media_elements(my_media_host)
//!     .build()?;
//! ```

mod clock;
mod http;
mod notification;
mod timer;

pub use clock::MonotonicClock;
pub use http::ReqwestHttpClient;
pub use notification::LogNotificationSurface;
pub use timer::TokioTimerHost;
