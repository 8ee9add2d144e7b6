//! # Core Configuration Module
//!
//! Provides configuration management for the read-aloud playback core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every host bridge and the speech-synthesis settings.
//! It enforces fail-fast validation so a missing capability is reported at
//! startup instead of at the first play request.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - Speech synthesis requests (desktop default: reqwest)
//! - `Clock` - Position derivation for decoded-buffer playback (desktop default: `Instant`)
//! - `TimerHost` - Progress polling (desktop default: tokio intervals)
//! - `NotificationSurface` - User-facing errors (desktop default: tracing)
//! - At least one of `AudioGraphHost` / `MediaElementHost`
//!
//! ## Optional Dependencies
//!
//! - `ObjectUrlRegistry` - `blob:` URLs for the streaming-element backend.
//!   Without it only the decoded-buffer and data-URL backends are usable.
//! - `HostPopup` - Geometry for docking the transport controls
//! - `EventBus` - Shared bus; a private one is created when absent
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults are
//! injected for the first four bridges if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, TtsApiConfig};
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .audio_graph(Arc::new(MyAudioGraphHost))
//!     .tts(TtsApiConfig::from_env())
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // No playback host: fails with an actionable message
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - no audio host");
//! ```

use crate::error::{Error, Result};
use crate::events::EventBus;
use bridge_traits::{
    AudioGraphHost, Clock, HostPopup, HttpClient, MediaElementHost, NotificationSurface,
    ObjectUrlRegistry, TimerHost,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the speech API key.
pub const ENV_TTS_API_KEY: &str = "READALOUD_TTS_API_KEY";
/// Environment variable overriding the speech API base URL.
pub const ENV_TTS_BASE_URL: &str = "READALOUD_TTS_BASE_URL";
/// Environment variable overriding the speech model.
pub const ENV_TTS_MODEL: &str = "READALOUD_TTS_MODEL";
/// Environment variable overriding the voice.
pub const ENV_TTS_VOICE: &str = "READALOUD_TTS_VOICE";

/// Core configuration for the playback core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// HTTP client for speech synthesis requests
    pub http_client: Arc<dyn HttpClient>,

    /// Monotonic clock
    pub clock: Arc<dyn Clock>,

    /// Interval timers for progress polling
    pub timer_host: Arc<dyn TimerHost>,

    /// Where playback failures are shown to the user
    pub notifications: Arc<dyn NotificationSurface>,

    /// Decoded-buffer playback host
    pub audio_graph: Option<Arc<dyn AudioGraphHost>>,

    /// Streaming media element host
    pub media_elements: Option<Arc<dyn MediaElementHost>>,

    /// `blob:` URL registry
    pub object_urls: Option<Arc<dyn ObjectUrlRegistry>>,

    /// Popup the transport controls dock to
    pub popup: Option<Arc<dyn HostPopup>>,

    /// Speech synthesis API settings
    pub tts: TtsApiConfig,

    /// Event bus shared with the host
    pub event_bus: EventBus,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("clock", &"Clock { ... }")
            .field("timer_host", &"TimerHost { ... }")
            .field("notifications", &"NotificationSurface { ... }")
            .field(
                "audio_graph",
                &self.audio_graph.as_ref().map(|_| "AudioGraphHost { ... }"),
            )
            .field(
                "media_elements",
                &self.media_elements.as_ref().map(|_| "MediaElementHost { ... }"),
            )
            .field(
                "object_urls",
                &self.object_urls.as_ref().map(|_| "ObjectUrlRegistry { ... }"),
            )
            .field("popup", &self.popup.as_ref().map(|_| "HostPopup { ... }"))
            .field("tts", &self.tts)
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

/// Speech synthesis API settings.
///
/// The defaults target an OpenAI-compatible `/audio/speech` endpoint. A
/// missing key is not a configuration error: requests fail with a
/// credential error so the user can be told to add one.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub voice: String,
    pub response_format: String,
    /// Longest accepted input, in characters.
    pub max_text_length: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for TtsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtsApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("response_format", &self.response_format)
            .field("max_text_length", &self.max_text_length)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for TtsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "playai-tts".to_string(),
            voice: "Fritz-PlayAI".to_string(),
            response_format: "wav".to_string(),
            max_text_length: 10_000,
            request_timeout_secs: 30,
        }
    }
}

impl TtsApiConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with the `READALOUD_TTS_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var(ENV_TTS_API_KEY) {
            config.api_key = Some(key);
        }
        if let Ok(url) = std::env::var(ENV_TTS_BASE_URL) {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var(ENV_TTS_MODEL) {
            config.model = model;
        }
        if let Ok(voice) = std::env::var(ENV_TTS_VOICE) {
            config.voice = voice;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    /// The usable API key: `None` when absent or blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("TTS base URL cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "TTS base URL must be http(s), got '{}'",
                self.base_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Config("TTS model cannot be empty".to_string()));
        }
        if self.voice.trim().is_empty() {
            return Err(Error::Config("TTS voice cannot be empty".to_string()));
        }
        if self.max_text_length == 0 {
            return Err(Error::Config(
                "TTS max_text_length must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "TTS request timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Called automatically by the builder.
    pub fn validate(&self) -> Result<()> {
        if self.audio_graph.is_none() && self.media_elements.is_none() {
            return Err(capability_missing(
                "AudioGraphHost | MediaElementHost",
                "At least one playback host is required. \
                 Inject an AudioGraphHost (decoded-buffer playback) or a \
                 MediaElementHost (streaming element playback).",
            ));
        }
        self.tts.validate()
    }
}

fn capability_missing(capability: &str, message: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(tts: &TtsApiConfig) -> Result<Arc<dyn HttpClient>> {
    let client = bridge_desktop::ReqwestHttpClient::with_timeout(tts.request_timeout())
        .map_err(|e| Error::Config(format!("Failed to create default HTTP client: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_tts: &TtsApiConfig) -> Result<Arc<dyn HttpClient>> {
    Err(capability_missing(
        "HttpClient",
        "HttpClient implementation is required for speech synthesis. \
         Enable the 'desktop-shims' feature or inject a host client (e.g. bridge-wasm's FetchHttpClient).",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_clock() -> Result<Arc<dyn Clock>> {
    Ok(Arc::new(bridge_desktop::MonotonicClock::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_clock() -> Result<Arc<dyn Clock>> {
    Err(capability_missing(
        "Clock",
        "Clock implementation is required to track decoded-buffer playback position. \
         Enable the 'desktop-shims' feature or inject a host clock.",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_timer_host() -> Result<Arc<dyn TimerHost>> {
    Ok(Arc::new(bridge_desktop::TokioTimerHost::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_timer_host() -> Result<Arc<dyn TimerHost>> {
    Err(capability_missing(
        "TimerHost",
        "TimerHost implementation is required for progress polling. \
         Enable the 'desktop-shims' feature or inject host timers.",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_notifications() -> Result<Arc<dyn NotificationSurface>> {
    Ok(Arc::new(bridge_desktop::LogNotificationSurface::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_notifications() -> Result<Arc<dyn NotificationSurface>> {
    Err(capability_missing(
        "NotificationSurface",
        "NotificationSurface implementation is required to report playback failures. \
         Enable the 'desktop-shims' feature or inject a host surface.",
    ))
}

/// Builder for constructing `CoreConfig` instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    timer_host: Option<Arc<dyn TimerHost>>,
    notifications: Option<Arc<dyn NotificationSurface>>,
    audio_graph: Option<Arc<dyn AudioGraphHost>>,
    media_elements: Option<Arc<dyn MediaElementHost>>,
    object_urls: Option<Arc<dyn ObjectUrlRegistry>>,
    popup: Option<Arc<dyn HostPopup>>,
    tts: Option<TtsApiConfig>,
    event_bus: Option<EventBus>,
}

impl CoreConfigBuilder {
    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the monotonic clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the interval timer host.
    pub fn timer_host(mut self, timers: Arc<dyn TimerHost>) -> Self {
        self.timer_host = Some(timers);
        self
    }

    /// Sets the notification surface.
    pub fn notifications(mut self, surface: Arc<dyn NotificationSurface>) -> Self {
        self.notifications = Some(surface);
        self
    }

    /// Sets the decoded-buffer playback host.
    pub fn audio_graph(mut self, host: Arc<dyn AudioGraphHost>) -> Self {
        self.audio_graph = Some(host);
        self
    }

    /// Sets the streaming media element host.
    pub fn media_elements(mut self, host: Arc<dyn MediaElementHost>) -> Self {
        self.media_elements = Some(host);
        self
    }

    /// Sets the `blob:` URL registry.
    pub fn object_urls(mut self, registry: Arc<dyn ObjectUrlRegistry>) -> Self {
        self.object_urls = Some(registry);
        self
    }

    /// Sets the popup the transport controls dock to.
    pub fn popup(mut self, popup: Arc<dyn HostPopup>) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Sets the speech synthesis API configuration.
    ///
    /// Defaults to [`TtsApiConfig::default`] (no API key).
    pub fn tts(mut self, tts: TtsApiConfig) -> Self {
        self.tts = Some(tts);
        self
    }

    /// Shares an existing event bus instead of creating a private one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - Required bridges are missing and no desktop default is available
    /// - No playback host was provided
    /// - The speech API settings are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let tts = self.tts.unwrap_or_default();

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(&tts)?,
        };

        let clock = match self.clock {
            Some(clock) => clock,
            None => provide_default_clock()?,
        };

        let timer_host = match self.timer_host {
            Some(timers) => timers,
            None => provide_default_timer_host()?,
        };

        let notifications = match self.notifications {
            Some(surface) => surface,
            None => provide_default_notifications()?,
        };

        let config = CoreConfig {
            http_client,
            clock,
            timer_host,
            notifications,
            audio_graph: self.audio_graph,
            media_elements: self.media_elements,
            object_urls: self.object_urls,
            popup: self.popup,
            tts,
            event_bus: self.event_bus.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
