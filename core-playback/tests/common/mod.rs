//! Shared host fakes for playback integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::platform::DynCallback;
use bridge_traits::{
    AudioGraph, AudioGraphHost, Clock, HostPopup, HttpClient, HttpRequest, HttpResponse,
    MediaElement, MediaElementHost, NotificationCategory, NotificationSurface, ObjectUrlRegistry,
    Rect, TimerHandle, TimerHost,
};
use bytes::Bytes;
use core_playback::{AudioPlaybackManager, PlaybackConfig};
use core_runtime::config::{CoreConfig, TtsApiConfig};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Audio fixtures
// ============================================================================

/// A silent 8 kHz mono 16-bit WAV clip.
pub fn silent_wav(secs: f64) -> Bytes {
    let sample_rate: u32 = 8_000;
    let samples = (secs * sample_rate as f64) as u32;
    let data_len = samples * 2;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    Bytes::from(wav)
}

pub fn wav_response(secs: f64) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: HashMap::from([("Content-Type".to_string(), "audio/wav".to_string())]),
        body: silent_wav(secs),
    }
}

pub fn rate_limit_response() -> HttpResponse {
    HttpResponse {
        status: 429,
        headers: HashMap::new(),
        body: Bytes::from_static(
            br#"{"error":{"message":"Rate limit reached for model playai-tts","type":"tokens","code":"rate_limit_exceeded"}}"#,
        ),
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Clock that only moves when told to.
#[derive(Default)]
pub struct ManualClock {
    now_ms: Mutex<f64>,
}

impl ManualClock {
    pub fn advance(&self, ms: f64) {
        *self.now_ms.lock() += ms;
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> f64 {
        *self.now_ms.lock()
    }
}

// ============================================================================
// Timers
// ============================================================================

type SharedCallback = Arc<Mutex<Box<DynCallback>>>;

/// Timer host whose intervals only fire on [`ManualTimers::fire`].
#[derive(Default)]
pub struct ManualTimers {
    next_id: AtomicU64,
    timers: Mutex<HashMap<u64, (Duration, SharedCallback)>>,
    registered: AtomicU64,
}

impl ManualTimers {
    /// Run every registered callback once.
    pub fn fire(&self) {
        let callbacks: Vec<SharedCallback> = self
            .timers
            .lock()
            .values()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            (callback.lock())();
        }
    }

    pub fn total_registered(&self) -> u64 {
        self.registered.load(Ordering::SeqCst)
    }

    pub fn periods(&self) -> Vec<Duration> {
        self.timers.lock().values().map(|(period, _)| *period).collect()
    }
}

impl TimerHost for ManualTimers {
    fn set_interval(
        &self,
        period: Duration,
        callback: Box<DynCallback>,
    ) -> BridgeResult<TimerHandle> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.registered.fetch_add(1, Ordering::SeqCst);
        self.timers
            .lock()
            .insert(id, (period, Arc::new(Mutex::new(callback))));
        Ok(TimerHandle(id))
    }

    fn clear_interval(&self, handle: TimerHandle) {
        self.timers.lock().remove(&handle.0);
    }

    fn active_timers(&self) -> usize {
        self.timers.lock().len()
    }
}

// ============================================================================
// Decoded-buffer host
// ============================================================================

#[derive(Debug, Default)]
pub struct GraphLog {
    pub created: usize,
    pub closed: usize,
    pub starts: Vec<f64>,
    pub stops: usize,
    pub gains: Vec<f32>,
    pub resumes: usize,
    /// Graphs with a source currently started.
    pub sounding: usize,
    pub max_sounding: usize,
}

/// Audio graph host with scripted failures.
#[derive(Default)]
pub struct FakeGraphHost {
    pub log: Arc<Mutex<GraphLog>>,
    /// Decoded duration; `None` makes decoding fail.
    pub duration: Mutex<Option<f64>>,
    pub reject_resume: Mutex<bool>,
    /// Simulates the page closing every open context.
    pub host_closed: Arc<Mutex<bool>>,
    /// Held over the next graph's `decode`.
    decode_gate: Mutex<Option<Arc<Notify>>>,
    /// Held over the next `resume_context` of any graph.
    resume_gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl FakeGraphHost {
    pub fn decoding(duration: f64) -> Self {
        let host = Self::default();
        *host.duration.lock() = Some(duration);
        host
    }

    pub fn failing() -> Self {
        Self::default()
    }

    /// Contexts created minus contexts closed.
    pub fn open_graphs(&self) -> usize {
        let log = self.log.lock();
        log.created - log.closed
    }

    pub fn last_start(&self) -> Option<f64> {
        self.log.lock().starts.last().copied()
    }

    /// Hold the next graph's decode until the returned gate is notified.
    pub fn gate_next_decode(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.decode_gate.lock() = Some(gate.clone());
        gate
    }

    /// Hold the next context resume until the returned gate is notified.
    pub fn gate_next_resume(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.resume_gate.lock() = Some(gate.clone());
        gate
    }
}

impl AudioGraphHost for FakeGraphHost {
    fn create_graph(&self) -> BridgeResult<Box<dyn AudioGraph>> {
        self.log.lock().created += 1;
        Ok(Box::new(FakeGraph {
            log: self.log.clone(),
            duration: *self.duration.lock(),
            reject_resume: *self.reject_resume.lock(),
            host_closed: self.host_closed.clone(),
            decode_gate: self.decode_gate.lock().take(),
            resume_gate: self.resume_gate.clone(),
            sounding: false,
            closed: false,
        }))
    }
}

struct FakeGraph {
    log: Arc<Mutex<GraphLog>>,
    duration: Option<f64>,
    reject_resume: bool,
    host_closed: Arc<Mutex<bool>>,
    decode_gate: Option<Arc<Notify>>,
    resume_gate: Arc<Mutex<Option<Arc<Notify>>>>,
    sounding: bool,
    closed: bool,
}

#[async_trait]
impl AudioGraph for FakeGraph {
    async fn decode(&mut self, _data: Bytes) -> BridgeResult<f64> {
        if let Some(gate) = self.decode_gate.take() {
            gate.notified().await;
        }
        self.duration
            .ok_or_else(|| BridgeError::OperationFailed("Unable to decode audio data".into()))
    }

    async fn resume_context(&mut self) -> BridgeResult<()> {
        let gate = self.resume_gate.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.reject_resume {
            return Err(BridgeError::Rejected("autoplay blocked".into()));
        }
        self.log.lock().resumes += 1;
        Ok(())
    }

    fn start_at(&mut self, offset_secs: f64) -> BridgeResult<()> {
        if self.is_closed() {
            return Err(BridgeError::Closed("context closed".into()));
        }
        let mut log = self.log.lock();
        log.starts.push(offset_secs);
        if !self.sounding {
            self.sounding = true;
            log.sounding += 1;
            log.max_sounding = log.max_sounding.max(log.sounding);
        }
        Ok(())
    }

    fn stop(&mut self) {
        let mut log = self.log.lock();
        log.stops += 1;
        if std::mem::take(&mut self.sounding) {
            log.sounding -= 1;
        }
    }

    fn set_gain(&mut self, gain: f32) -> BridgeResult<()> {
        self.log.lock().gains.push(gain);
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.stop();
            self.closed = true;
            self.log.lock().closed += 1;
        }
    }

    fn is_closed(&self) -> bool {
        self.closed || *self.host_closed.lock()
    }
}

// ============================================================================
// Media element host
// ============================================================================

#[derive(Debug, Default)]
pub struct ElementState {
    pub sources: Vec<String>,
    pub created: usize,
    pub released: usize,
    pub playing: bool,
    pub current_time: f64,
    pub volume: f32,
    pub ended: bool,
    pub error: Option<String>,
}

/// Media element host; can refuse `blob:` sources the way a strict
/// content-security policy does.
pub struct FakeMediaHost {
    pub state: Arc<Mutex<ElementState>>,
    pub duration: f64,
    pub block_blob_urls: bool,
    pub reject_play: bool,
}

impl FakeMediaHost {
    pub fn new(duration: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(ElementState::default())),
            duration,
            block_blob_urls: false,
            reject_play: false,
        }
    }

    pub fn blocking_blob_urls(mut self) -> Self {
        self.block_blob_urls = true;
        self
    }

    pub fn rejecting_play(mut self) -> Self {
        self.reject_play = true;
        self
    }

    pub fn live_elements(&self) -> usize {
        let state = self.state.lock();
        state.created - state.released
    }
}

impl MediaElementHost for FakeMediaHost {
    fn create_element(&self) -> BridgeResult<Box<dyn MediaElement>> {
        self.state.lock().created += 1;
        Ok(Box::new(FakeElement {
            state: self.state.clone(),
            duration: self.duration,
            block_blob_urls: self.block_blob_urls,
            reject_play: self.reject_play,
            released: false,
        }))
    }
}

struct FakeElement {
    state: Arc<Mutex<ElementState>>,
    duration: f64,
    block_blob_urls: bool,
    reject_play: bool,
    released: bool,
}

#[async_trait]
impl MediaElement for FakeElement {
    async fn load(&mut self, src: &str) -> BridgeResult<f64> {
        self.state.lock().sources.push(src.to_string());
        if self.block_blob_urls && src.starts_with("blob:") {
            return Err(BridgeError::Rejected("media-src blocked by CSP".into()));
        }
        Ok(self.duration)
    }

    async fn play(&mut self) -> BridgeResult<()> {
        if self.reject_play {
            return Err(BridgeError::Rejected("NotAllowedError".into()));
        }
        self.state.lock().playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().playing = false;
    }

    fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    fn set_current_time(&mut self, secs: f64) -> BridgeResult<()> {
        self.state.lock().current_time = secs;
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.lock().volume = volume;
    }

    fn ended(&self) -> bool {
        self.state.lock().ended
    }

    fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            let mut state = self.state.lock();
            state.released += 1;
            state.playing = false;
        }
    }
}

// ============================================================================
// Object URLs, notifications, popup
// ============================================================================

#[derive(Default)]
pub struct CountingUrls {
    next: AtomicU64,
    live: Mutex<HashSet<String>>,
    pub revoked: Mutex<Vec<String>>,
}

impl CountingUrls {
    pub fn live(&self) -> usize {
        self.live.lock().len()
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked.lock().len()
    }
}

impl ObjectUrlRegistry for CountingUrls {
    fn create_object_url(&self, _data: &Bytes, _mime: &str) -> BridgeResult<String> {
        let url = format!("blob:test/{}", self.next.fetch_add(1, Ordering::SeqCst));
        self.live.lock().insert(url.clone());
        Ok(url)
    }

    fn revoke_object_url(&self, url: &str) -> BridgeResult<()> {
        self.live.lock().remove(url);
        self.revoked.lock().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifications {
    pub messages: Mutex<Vec<(String, NotificationCategory)>>,
}

impl RecordingNotifications {
    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn last(&self) -> Option<(String, NotificationCategory)> {
        self.messages.lock().last().cloned()
    }
}

impl NotificationSurface for RecordingNotifications {
    fn notify(&self, message: &str, category: NotificationCategory) {
        self.messages.lock().push((message.to_string(), category));
    }
}

pub struct FixedPopup {
    pub rect: Mutex<Option<Rect>>,
    pub viewport: Rect,
}

impl HostPopup for FixedPopup {
    fn bounding_rect(&self) -> Option<Rect> {
        *self.rect.lock()
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP fake answering from a queue; each answer can be held back until
/// [`ScriptedHttp::release`] is called.
#[derive(Default)]
pub struct ScriptedHttp {
    responses: Mutex<VecDeque<(HttpResponse, Option<Arc<Notify>>)>>,
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttp {
    pub fn respond(&self, response: HttpResponse) {
        self.responses.lock().push_back((response, None));
    }

    /// Queue a response held until the returned gate is notified.
    pub fn respond_gated(&self, response: HttpResponse) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.responses
            .lock()
            .push_back((response, Some(gate.clone())));
        gate
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().push(request);
        let next = self.responses.lock().pop_front();
        let (response, gate) =
            next.ok_or_else(|| BridgeError::OperationFailed("connection refused".into()))?;
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(response)
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub timers: Arc<ManualTimers>,
    pub graphs: Arc<FakeGraphHost>,
    pub media: Arc<FakeMediaHost>,
    pub urls: Arc<CountingUrls>,
    pub notifications: Arc<RecordingNotifications>,
    pub popup: Arc<FixedPopup>,
    pub http: Arc<ScriptedHttp>,
}

impl Harness {
    pub fn new(graphs: FakeGraphHost, media: FakeMediaHost) -> Self {
        Self {
            clock: Arc::new(ManualClock::default()),
            timers: Arc::new(ManualTimers::default()),
            graphs: Arc::new(graphs),
            media: Arc::new(media),
            urls: Arc::new(CountingUrls::default()),
            notifications: Arc::new(RecordingNotifications::default()),
            popup: Arc::new(FixedPopup {
                rect: Mutex::new(Some(Rect::new(200.0, 100.0, 300.0, 150.0))),
                viewport: Rect::new(0.0, 0.0, 1024.0, 768.0),
            }),
            http: Arc::new(ScriptedHttp::default()),
        }
    }

    /// Decoded-buffer playback of 10 s clips.
    pub fn decoded() -> Self {
        Self::new(FakeGraphHost::decoding(10.0), FakeMediaHost::new(10.0))
    }

    pub fn core_config(&self) -> CoreConfig {
        self.core_config_with_tts(TtsApiConfig::new().with_api_key("gsk_test"))
    }

    pub fn core_config_with_tts(&self, tts: TtsApiConfig) -> CoreConfig {
        CoreConfig::builder()
            .http_client(self.http.clone())
            .clock(self.clock.clone())
            .timer_host(self.timers.clone())
            .notifications(self.notifications.clone())
            .audio_graph(self.graphs.clone())
            .media_elements(self.media.clone())
            .object_urls(self.urls.clone())
            .popup(self.popup.clone())
            .tts(tts)
            .build()
            .expect("valid test config")
    }

    pub fn manager(&self) -> AudioPlaybackManager {
        self.manager_with(PlaybackConfig::default())
    }

    pub fn manager_with(&self, config: PlaybackConfig) -> AudioPlaybackManager {
        AudioPlaybackManager::new(self.core_config(), config).expect("valid manager")
    }

    /// Advance the clock and run one progress tick.
    pub fn tick(&self, ms: f64) {
        self.clock.advance(ms);
        self.timers.fire();
    }
}
