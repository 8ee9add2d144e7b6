//! Web Audio implementation of the decoded-buffer graph.
//!
//! Every graph owns one `AudioContext` with a persistent `GainNode` wired to
//! the destination. Source nodes are single-use, so `start_at` builds a fresh
//! `AudioBufferSourceNode` on every (re)start.

use async_trait::async_trait;
use bridge_traits::{
    audio::{AudioGraph, AudioGraphHost},
    error::{BridgeError, Result as BridgeResult},
};
use bytes::Bytes;
use js_sys::Uint8Array;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, AudioContextState, GainNode};

use crate::error::js_error;

/// Opens a new `AudioContext` per session.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebAudioGraphHost;

impl WebAudioGraphHost {
    pub fn new() -> Self {
        Self
    }
}

impl AudioGraphHost for WebAudioGraphHost {
    fn create_graph(&self) -> BridgeResult<Box<dyn AudioGraph>> {
        Ok(Box::new(WebAudioGraph::open()?))
    }
}

pub struct WebAudioGraph {
    context: AudioContext,
    gain: GainNode,
    buffer: Option<AudioBuffer>,
    source: Option<AudioBufferSourceNode>,
    closed: bool,
}

impl WebAudioGraph {
    fn open() -> BridgeResult<Self> {
        let context = AudioContext::new().map_err(|err| js_error("new AudioContext", err))?;
        let gain = context
            .create_gain()
            .map_err(|err| js_error("createGain", err))?;
        gain.connect_with_audio_node(&context.destination())
            .map_err(|err| js_error("connect gain", err))?;

        Ok(Self {
            context,
            gain,
            buffer: None,
            source: None,
            closed: false,
        })
    }

    fn ensure_open(&self) -> BridgeResult<()> {
        if self.closed {
            Err(BridgeError::Closed("audio context".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl AudioGraph for WebAudioGraph {
    async fn decode(&mut self, data: Bytes) -> BridgeResult<f64> {
        self.ensure_open()?;
        // decodeAudioData detaches its input, so hand it a private copy.
        let array = Uint8Array::from(data.as_ref());
        let promise = self
            .context
            .decode_audio_data(&array.buffer())
            .map_err(|err| js_error("decodeAudioData", err))?;
        let decoded = JsFuture::from(promise)
            .await
            .map_err(|err| js_error("decodeAudioData", err))?;
        let buffer = decoded
            .dyn_into::<AudioBuffer>()
            .map_err(|_| BridgeError::OperationFailed("decodeAudioData returned non-buffer".into()))?;

        let duration = buffer.duration();
        debug!(duration_secs = duration, channels = buffer.number_of_channels(), "Decoded audio buffer");
        self.buffer = Some(buffer);
        Ok(duration)
    }

    async fn resume_context(&mut self) -> BridgeResult<()> {
        self.ensure_open()?;
        if self.context.state() != AudioContextState::Suspended {
            return Ok(());
        }
        let promise = self
            .context
            .resume()
            .map_err(|err| js_error("AudioContext.resume", err))?;
        JsFuture::from(promise)
            .await
            .map_err(|err| js_error("AudioContext.resume", err))?;
        Ok(())
    }

    fn start_at(&mut self, offset_secs: f64) -> BridgeResult<()> {
        self.ensure_open()?;
        self.stop();
        let buffer = self
            .buffer
            .as_ref()
            .ok_or_else(|| BridgeError::OperationFailed("no decoded buffer".to_string()))?;

        let source = self
            .context
            .create_buffer_source()
            .map_err(|err| js_error("createBufferSource", err))?;
        source.set_buffer(Some(buffer));
        source
            .connect_with_audio_node(&self.gain)
            .map_err(|err| js_error("connect source", err))?;
        source
            .start_with_when_and_grain_offset(0.0, offset_secs.max(0.0))
            .map_err(|err| js_error("source.start", err))?;
        self.source = Some(source);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(source) = self.source.take() {
            // Throws if the node already finished; nothing to undo then.
            #[allow(deprecated)]
            let _ = source.stop();
            let _ = source.disconnect();
        }
    }

    fn set_gain(&mut self, gain: f32) -> BridgeResult<()> {
        self.ensure_open()?;
        self.gain.gain().set_value(gain.clamp(0.0, 1.0));
        Ok(())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.stop();
        let _ = self.gain.disconnect();
        self.buffer = None;
        self.closed = true;
        match self.context.close() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    warn!(error = ?err, "AudioContext.close rejected");
                }
            }),
            Err(err) => warn!(error = ?err, "AudioContext.close threw"),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for WebAudioGraph {
    fn drop(&mut self) {
        self.close();
    }
}
