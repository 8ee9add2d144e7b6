//! `HTMLAudioElement` playback and `blob:` URL registry.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    media::{MediaElement, MediaElementHost, ObjectUrlRegistry},
};
use bytes::Bytes;
use js_sys::{Array, Function, Promise, Uint8Array};
use tracing::debug;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAudioElement, Url};

use crate::error::js_error;

/// Creates detached `<audio>` elements; they are never inserted into the page.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlAudioElementHost;

impl HtmlAudioElementHost {
    pub fn new() -> Self {
        Self
    }
}

impl MediaElementHost for HtmlAudioElementHost {
    fn create_element(&self) -> BridgeResult<Box<dyn MediaElement>> {
        let element = HtmlAudioElement::new().map_err(|err| js_error("new Audio", err))?;
        element.set_preload("auto");
        Ok(Box::new(HtmlAudio { element }))
    }
}

pub struct HtmlAudio {
    element: HtmlAudioElement,
}

impl HtmlAudio {
    fn clear_load_handlers(&self) {
        self.element.set_onloadedmetadata(None);
        self.element.set_onerror(None);
    }
}

#[async_trait(?Send)]
impl MediaElement for HtmlAudio {
    async fn load(&mut self, src: &str) -> BridgeResult<f64> {
        let element = self.element.clone();
        // The promise executor's resolve/reject double as the event handlers.
        let metadata = Promise::new(&mut |resolve: Function, reject: Function| {
            element.set_onloadedmetadata(Some(&resolve));
            element.set_onerror(Some(&reject));
        });
        self.element.set_src(src);
        self.element.load();

        let outcome = JsFuture::from(metadata).await;
        self.clear_load_handlers();
        if outcome.is_err() {
            let reason = self
                .error()
                .unwrap_or_else(|| "source could not be loaded".to_string());
            return Err(BridgeError::OperationFailed(reason));
        }

        debug!(duration_secs = self.duration(), "Media metadata loaded");
        Ok(self.duration())
    }

    async fn play(&mut self) -> BridgeResult<()> {
        let promise = self
            .element
            .play()
            .map_err(|err| js_error("audio.play", err))?;
        JsFuture::from(promise)
            .await
            .map_err(|err| js_error("audio.play", err))?;
        Ok(())
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, secs: f64) -> BridgeResult<()> {
        if !secs.is_finite() {
            return Err(BridgeError::OperationFailed(format!(
                "invalid seek target {secs}"
            )));
        }
        self.element.set_current_time(secs.max(0.0));
        Ok(())
    }

    fn duration(&self) -> f64 {
        let duration = self.element.duration();
        if duration.is_finite() {
            duration
        } else {
            0.0
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(f64::from(volume.clamp(0.0, 1.0)));
    }

    fn ended(&self) -> bool {
        self.element.ended()
    }

    fn error(&self) -> Option<String> {
        self.element.error().map(|error| {
            let message = error.message();
            if message.is_empty() {
                format!("media error code {}", error.code())
            } else {
                message
            }
        })
    }

    fn release(&mut self) {
        self.clear_load_handlers();
        let _ = self.element.pause();
        let _ = self.element.remove_attribute("src");
        self.element.load();
    }
}

/// `URL.createObjectURL` over in-memory blobs.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlobUrlRegistry;

impl BlobUrlRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl ObjectUrlRegistry for BlobUrlRegistry {
    fn create_object_url(&self, data: &Bytes, mime: &str) -> BridgeResult<String> {
        let parts = Array::of1(&Uint8Array::from(data.as_ref()));
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|err| js_error("new Blob", err))?;
        // A page CSP that forbids blob: surfaces here in some browsers.
        Url::create_object_url_with_blob(&blob).map_err(|err| js_error("URL.createObjectURL", err))
    }

    fn revoke_object_url(&self, url: &str) -> BridgeResult<()> {
        Url::revoke_object_url(url).map_err(|err| js_error("URL.revokeObjectURL", err))
    }
}
