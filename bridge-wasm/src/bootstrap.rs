//! Convenience helpers for wiring all wasm bridge implementations together.
//!
//! Content scripts use [`build_wasm_bridges`] to construct every browser
//! adapter the playback core needs in one call. The result mirrors the role
//! that the `bridge-desktop` crate plays for native targets.

use std::sync::Arc;

use bridge_traits::{
    audio::AudioGraphHost,
    error::Result as BridgeResult,
    geometry::HostPopup,
    http::HttpClient,
    log::{LogLevel, LoggerSink},
    media::{MediaElementHost, ObjectUrlRegistry},
    notification::NotificationSurface,
    time::Clock,
    timer::TimerHost,
};
use web_sys::Element;

use crate::{
    audio::WebAudioGraphHost,
    clock::PerformanceClock,
    error::window,
    http::FetchHttpClient,
    log::ConsoleLogSink,
    media::{BlobUrlRegistry, HtmlAudioElementHost},
    notification::{CustomEventNotificationSurface, NOTIFY_EVENT},
    popup::ElementPopup,
    timer::IntervalTimerHost,
};

/// Configuration for [`build_wasm_bridges`].
#[derive(Debug, Clone)]
pub struct WasmBridgeConfig {
    /// Name of the `CustomEvent` dispatched for user notifications.
    pub notify_event: String,
    /// Minimum level forwarded to the browser console.
    pub console_level: LogLevel,
    /// Install `console_error_panic_hook` so panics reach the console.
    pub panic_hook: bool,
}

impl Default for WasmBridgeConfig {
    fn default() -> Self {
        Self {
            notify_event: NOTIFY_EVENT.to_string(),
            console_level: LogLevel::Info,
            panic_hook: true,
        }
    }
}

/// Fully constructed wasm bridge objects ready for injection into the core.
pub struct WasmBridgeSet {
    /// HTTP client powered by browser `fetch`.
    pub http_client: Arc<dyn HttpClient>,
    /// `performance.now()` clock.
    pub clock: Arc<dyn Clock>,
    /// `setInterval` timers for progress polling.
    pub timer_host: Arc<dyn TimerHost>,
    /// Toasts via `CustomEvent` on `window`.
    pub notifications: Arc<dyn NotificationSurface>,
    /// Web Audio decoded-buffer graphs.
    pub audio_graph: Arc<dyn AudioGraphHost>,
    /// Detached `<audio>` elements.
    pub media_elements: Arc<dyn MediaElementHost>,
    /// `URL.createObjectURL` registry.
    pub object_urls: Arc<dyn ObjectUrlRegistry>,
    /// Console sink for `core_runtime::logging`.
    pub logger_sink: Arc<dyn LoggerSink>,
}

impl WasmBridgeSet {
    /// Popup geometry for a specific translation popup element.
    pub fn popup_for(&self, element: Element) -> BridgeResult<Arc<dyn HostPopup>> {
        Ok(Arc::new(ElementPopup::new(window()?, element)))
    }
}

/// Build the default wasm bridge stack.
///
/// Hosts should call this during startup (e.g., inside their wasm bindgen
/// bootstrap) and pass the returned trait objects into
/// `core_runtime::config::CoreConfig::builder()`.
pub fn build_wasm_bridges(config: WasmBridgeConfig) -> BridgeResult<WasmBridgeSet> {
    if config.panic_hook {
        console_error_panic_hook::set_once();
    }

    Ok(WasmBridgeSet {
        http_client: Arc::new(FetchHttpClient::new()?),
        clock: Arc::new(PerformanceClock::new()?),
        timer_host: Arc::new(IntervalTimerHost::new()?),
        notifications: Arc::new(CustomEventNotificationSurface::with_event_name(
            config.notify_event,
        )?),
        audio_graph: Arc::new(WebAudioGraphHost::new()),
        media_elements: Arc::new(HtmlAudioElementHost::new()),
        object_urls: Arc::new(BlobUrlRegistry::new()),
        logger_sink: Arc::new(ConsoleLogSink::new(config.console_level)),
    })
}
