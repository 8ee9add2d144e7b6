//! # Audio Playback Manager
//!
//! Owns the one active [`PlaybackSession`] and the clip cache, and turns a
//! "listen" request for a piece of text into audible playback.
//!
//! ## Lifecycle
//!
//! ```text
//! play(text) ──> stop previous ──> cache / synthesize ──> probe ──> select backend
//!                     │                                                  │
//!                     └─ generation bumped              generation still current?
//!                                                         yes: install + timer
//!                                                         no:  release everything
//! ```
//!
//! Every `play` and `stop` bumps a generation counter. Each asynchronous
//! continuation re-checks it before touching the slot, so a response that
//! arrives after the user moved on is released instead of played.
//!
//! ## Locking
//!
//! The slot mutex is never held across an `.await`. Async session steps
//! (resume, seek commit) check the session out of the slot, leaving a
//! `Busy` marker, and check it back in only if no newer request replaced
//! the marker in the meantime. A step whose future is dropped before check-in
//! leaves the manager `Idle` with the session released.
//!
//! Backend selection gets the same treatment: the selector re-checks the
//! generation between host steps, so a request superseded during decode or
//! `play()` releases its backend instead of starting a second clip.
//!
//! ## Failures
//!
//! Nothing propagates to the caller as an error. Failures reset the manager
//! to `Idle`, show [`PlaybackError::user_message`] on the notification
//! surface, and publish a [`PlaybackEvent::Error`].

use bridge_traits::{
    HostPopup, NotificationCategory, NotificationSurface, ObjectUrlRegistry, Rect, TimerHandle,
    TimerHost,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, EventStream, PlaybackEvent};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, instrument, warn};

use crate::backend::{BackendKind, BackendSelector};
use crate::cache::{AudioCache, AudioResource};
use crate::config::PlaybackConfig;
use crate::controls::{SessionHandle, TransportControls};
use crate::error::{PlaybackError, Result};
use crate::probe::probe_audio;
use crate::session::{PlaybackSession, PlaybackState, SessionSnapshot, TickOutcome};
use crate::tts::{truncate_chars, TtsClient};

/// What a [`AudioPlaybackManager::play`] request ended up doing.
#[derive(Debug)]
pub enum PlayOutcome {
    /// A backend is audibly playing the text.
    Started {
        session_id: u64,
        backend: BackendKind,
    },
    /// A newer `play` or `stop` arrived first; everything was released.
    Superseded,
    /// Nothing to play (blank selection).
    Ignored,
    /// Playback failed. The user was already notified.
    Failed(PlaybackError),
}

impl PlayOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, PlayOutcome::Started { .. })
    }
}

enum Slot {
    Idle,
    Loading {
        generation: u64,
    },
    Active(PlaybackSession),
    /// The session is checked out for an async step.
    Busy {
        generation: u64,
        timer: Option<TimerHandle>,
        snapshot: SessionSnapshot,
    },
    Ended {
        generation: u64,
    },
}

impl Slot {
    fn state(&self) -> PlaybackState {
        match self {
            Slot::Idle => PlaybackState::Idle,
            Slot::Loading { .. } => PlaybackState::Loading,
            Slot::Active(session) => session.state(),
            Slot::Busy { snapshot, .. } => snapshot.state,
            Slot::Ended { .. } => PlaybackState::Ended,
        }
    }

    fn session_id(&self) -> Option<u64> {
        match self {
            Slot::Active(session) => Some(session.id()),
            Slot::Busy { generation, .. } => Some(*generation),
            _ => None,
        }
    }
}

/// A session checked out of the slot for an async step.
///
/// Dropped without [`checkin`](Self::checkin), which happens when the
/// step's future is cancelled mid-await, it resets the slot to `Idle` and
/// tears the session down.
struct CheckedOut<'a> {
    inner: &'a ManagerInner,
    session: Option<PlaybackSession>,
}

impl CheckedOut<'_> {
    /// Put the session back unless a newer request replaced the `Busy`
    /// marker. An `Err` result fails the session.
    fn checkin<T>(mut self, result: Result<T>) -> Option<T> {
        let mut session = self.session.take()?;
        let inner = self.inner;
        let session_id = session.id();
        let mut slot = inner.slot.lock();
        let current = matches!(&*slot, Slot::Busy { generation, .. } if *generation == session_id);
        if !current {
            drop(slot);
            debug!(session_id, "Releasing superseded session after async step");
            session.teardown(inner.timers.as_ref(), inner.object_urls.as_deref());
            return None;
        }

        match result {
            Ok(value) => {
                *slot = Slot::Active(session);
                Some(value)
            }
            Err(err) => {
                *slot = Slot::Idle;
                drop(slot);
                session.teardown(inner.timers.as_ref(), inner.object_urls.as_deref());
                inner.report(session_id, &err);
                None
            }
        }
    }
}

impl Drop for CheckedOut<'_> {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        let session_id = session.id();
        let current = {
            let mut slot = self.inner.slot.lock();
            let current =
                matches!(&*slot, Slot::Busy { generation, .. } if *generation == session_id);
            if current {
                *slot = Slot::Idle;
            }
            current
        };

        warn!(session_id, "Session step cancelled before completing");
        session.teardown(self.inner.timers.as_ref(), self.inner.object_urls.as_deref());
        if current {
            self.inner.emit(PlaybackEvent::Stopped { session_id });
        }
    }
}

pub(crate) struct ManagerInner {
    config: PlaybackConfig,
    tts: TtsClient,
    selector: BackendSelector,
    timers: Arc<dyn TimerHost>,
    notifications: Arc<dyn NotificationSurface>,
    object_urls: Option<Arc<dyn ObjectUrlRegistry>>,
    popup: Option<Arc<dyn HostPopup>>,
    events: EventBus,
    cache: Mutex<AudioCache>,
    slot: Mutex<Slot>,
    generation: AtomicU64,
    /// Volume carried from one session to the next.
    volume: Mutex<f32>,
}

impl ManagerInner {
    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Must be called with the slot locked.
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.current_generation() != generation
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is not an error.
        let _ = self.events.emit(CoreEvent::Playback(event));
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn play(self: &Arc<Self>, text: &str) -> PlayOutcome {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank selection");
            return PlayOutcome::Ignored;
        }

        let max = self.tts.max_text_length();
        let text = if self.config.truncate_long_text && text.chars().count() > max {
            warn!(max, "Truncating selection to the speech API limit");
            truncate_chars(text, max)
        } else {
            text
        };

        let generation = self.begin_play();
        let cached = self.cache.lock().get(text);
        self.emit(PlaybackEvent::Loading {
            session_id: generation,
            text_chars: text.chars().count(),
            cached: cached.is_some(),
        });

        match self.load_and_start(generation, text, cached).await {
            Ok(outcome) => outcome,
            Err(err) => self.fail_loading(generation, err),
        }
    }

    /// Tear down whatever is current and enter `Loading`.
    fn begin_play(&self) -> u64 {
        let (generation, previous) = {
            let mut slot = self.slot.lock();
            let generation = self.next_generation();
            (generation, std::mem::replace(&mut *slot, Slot::Loading { generation }))
        };
        self.dispose(previous);
        generation
    }

    async fn load_and_start(
        self: &Arc<Self>,
        generation: u64,
        text: &str,
        cached: Option<AudioResource>,
    ) -> Result<PlayOutcome> {
        let (resource, owned_url) = match cached {
            Some(resource) => (resource, None),
            None => {
                let audio = self.tts.synthesize(text).await?;
                if self.is_superseded(generation) {
                    debug!(session_id = generation, "Discarding speech for superseded request");
                    return Ok(PlayOutcome::Superseded);
                }

                let probe = probe_audio(
                    &audio.data,
                    audio.content_type.as_deref(),
                    Some(&self.tts.config().response_format),
                )?;
                let resource = AudioResource::new(audio.data, &probe)
                    .with_object_url(self.object_urls.as_deref());
                let owned_url = if self.cache.lock().put(text, resource.clone()) {
                    None
                } else {
                    resource.object_url.clone()
                };
                (resource, owned_url)
            }
        };

        let volume = *self.volume.lock();
        let started = self
            .selector
            .start(&resource, volume, || !self.is_superseded(generation))
            .await;
        let backend = match started {
            Ok(Some(backend)) => backend,
            Ok(None) => {
                debug!(session_id = generation, "Request superseded while starting playback");
                self.revoke_url(owned_url);
                return Ok(PlayOutcome::Superseded);
            }
            Err(err) => {
                self.revoke_url(owned_url);
                return Err(err);
            }
        };

        let session = PlaybackSession::new(generation, backend, volume, self.config.unmute_volume)
            .with_owned_url(owned_url);
        self.install(session)
    }

    fn install(self: &Arc<Self>, mut session: PlaybackSession) -> Result<PlayOutcome> {
        let generation = session.id();
        let mut slot = self.slot.lock();
        let loading = matches!(&*slot, Slot::Loading { generation: g } if *g == generation);
        if !loading || self.is_superseded(generation) {
            drop(slot);
            debug!(session_id = generation, "Releasing backend for superseded request");
            session.teardown(self.timers.as_ref(), self.object_urls.as_deref());
            return Ok(PlayOutcome::Superseded);
        }

        let weak: Weak<ManagerInner> = Arc::downgrade(self);
        let registered = self.timers.set_interval(
            self.config.progress_interval,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_tick(generation);
                }
            }),
        );
        match registered {
            Ok(handle) => session.attach_timer(handle),
            Err(err) => {
                drop(slot);
                session.teardown(self.timers.as_ref(), self.object_urls.as_deref());
                return Err(err.into());
            }
        }

        let backend = session.backend_kind();
        let duration_secs = session.duration_secs();
        *slot = Slot::Active(session);
        drop(slot);

        info!(session_id = generation, %backend, duration_secs, "Session playing");
        self.emit(PlaybackEvent::Started {
            session_id: generation,
            backend: backend.to_string(),
            duration_secs,
        });
        Ok(PlayOutcome::Started {
            session_id: generation,
            backend,
        })
    }

    fn fail_loading(&self, generation: u64, err: PlaybackError) -> PlayOutcome {
        {
            let mut slot = self.slot.lock();
            if self.is_superseded(generation) {
                debug!(session_id = generation, error = %err, "Dropping failure of superseded request");
                return PlayOutcome::Superseded;
            }
            *slot = Slot::Idle;
        }
        self.report(generation, &err);
        PlayOutcome::Failed(err)
    }

    fn report(&self, session_id: u64, err: &PlaybackError) {
        let message = err.user_message();
        warn!(session_id, error = %err, "Playback failed");
        self.notifications
            .notify(&message, NotificationCategory::AudioError);
        self.emit(PlaybackEvent::Error {
            session_id,
            message,
            rate_limited: err.is_rate_limit(),
        });
    }

    fn revoke_url(&self, url: Option<String>) {
        let (Some(url), Some(registry)) = (url, self.object_urls.as_deref()) else {
            return;
        };
        if let Err(err) = registry.revoke_object_url(&url) {
            warn!(error = %err, "Failed to revoke object URL");
        }
    }

    fn dispose(&self, slot: Slot) {
        match slot {
            Slot::Active(mut session) => {
                let session_id = session.id();
                session.teardown(self.timers.as_ref(), self.object_urls.as_deref());
                self.emit(PlaybackEvent::Stopped { session_id });
            }
            Slot::Busy {
                generation, timer, ..
            } => {
                // The checked-out session releases itself on check-in or drop.
                if let Some(handle) = timer {
                    self.timers.clear_interval(handle);
                }
                self.emit(PlaybackEvent::Stopped {
                    session_id: generation,
                });
            }
            Slot::Loading { generation } => {
                self.emit(PlaybackEvent::Stopped {
                    session_id: generation,
                });
            }
            Slot::Idle | Slot::Ended { .. } => {}
        }
    }

    /// Progress timer body.
    fn on_tick(&self, generation: u64) {
        let finished = {
            let mut slot = self.slot.lock();
            let outcome = match &mut *slot {
                Slot::Active(session) if session.id() == generation => session.tick(),
                _ => return,
            };
            match outcome {
                TickOutcome::Progress {
                    position_secs,
                    duration_secs,
                } => {
                    drop(slot);
                    self.emit(PlaybackEvent::PositionChanged {
                        session_id: generation,
                        position_secs,
                        duration_secs,
                    });
                    return;
                }
                TickOutcome::Ended => (
                    std::mem::replace(&mut *slot, Slot::Ended { generation }),
                    None,
                ),
                TickOutcome::Failed(message) => (
                    std::mem::replace(&mut *slot, Slot::Idle),
                    Some(PlaybackError::PlaybackInterrupted(message)),
                ),
            }
        };

        let (previous, error) = finished;
        if let Slot::Active(mut session) = previous {
            session.teardown(self.timers.as_ref(), self.object_urls.as_deref());
        }
        match error {
            Some(err) => self.report(generation, &err),
            None => {
                info!(session_id = generation, "Playback ended");
                self.emit(PlaybackEvent::Ended {
                    session_id: generation,
                });
            }
        }
    }

    fn checkout(&self, accept: impl Fn(PlaybackState) -> bool) -> Option<CheckedOut<'_>> {
        let mut slot = self.slot.lock();
        let Slot::Active(session) = &*slot else {
            return None;
        };
        if !accept(session.state()) {
            return None;
        }
        let busy = Slot::Busy {
            generation: session.id(),
            timer: session.timer(),
            snapshot: session.snapshot(),
        };
        match std::mem::replace(&mut *slot, busy) {
            Slot::Active(session) => Some(CheckedOut {
                inner: self,
                session: Some(session),
            }),
            _ => None,
        }
    }

    pub(crate) fn stop(&self) -> bool {
        let previous = {
            let mut slot = self.slot.lock();
            if matches!(&*slot, Slot::Idle) {
                return false;
            }
            self.next_generation();
            std::mem::replace(&mut *slot, Slot::Idle)
        };
        debug!(state = %previous.state(), "Stopping playback");
        self.dispose(previous);
        true
    }

    pub(crate) fn pause(&self) -> bool {
        let mut slot = self.slot.lock();
        let Slot::Active(session) = &mut *slot else {
            return false;
        };
        if !session.pause() {
            return false;
        }
        let event = PlaybackEvent::Paused {
            session_id: session.id(),
            position_secs: session.position_secs(),
        };
        drop(slot);
        self.emit(event);
        true
    }

    pub(crate) async fn resume(&self) -> bool {
        let Some(mut step) = self.checkout(|state| state == PlaybackState::Paused) else {
            return false;
        };
        let Some(session) = step.session.as_mut() else {
            return false;
        };
        let result = session.resume().await;
        let session_id = session.id();
        let position_secs = session.position_secs();

        match step.checkin(result) {
            Some(true) => {
                self.emit(PlaybackEvent::Resumed {
                    session_id,
                    position_secs,
                });
                true
            }
            _ => false,
        }
    }

    pub(crate) async fn toggle_playback(&self) -> PlaybackState {
        match self.state() {
            PlaybackState::Playing => {
                self.pause();
            }
            PlaybackState::Paused => {
                self.resume().await;
            }
            _ => {}
        }
        self.state()
    }

    pub(crate) fn begin_seek(&self, fraction: f64) -> bool {
        let mut slot = self.slot.lock();
        let Slot::Active(session) = &mut *slot else {
            return false;
        };
        let was_seeking = session.state() == PlaybackState::Seeking;
        if !session.begin_seek(fraction) {
            return false;
        }
        let session_id = session.id();
        drop(slot);
        if !was_seeking {
            self.emit(PlaybackEvent::SeekStarted { session_id });
        }
        true
    }

    pub(crate) fn update_seek(&self, fraction: f64) -> bool {
        match &mut *self.slot.lock() {
            Slot::Active(session) => session.update_seek(fraction),
            _ => false,
        }
    }

    /// Returns the position the seek landed on, `None` when nothing was
    /// applied (no pending seek, superseded, or the backend refused it).
    pub(crate) async fn commit_seek(&self) -> Option<f64> {
        let mut step = self.checkout(|state| state == PlaybackState::Seeking)?;
        let result = step.session.as_mut()?.commit_seek().await;
        self.finish_seek(step, result)
    }

    /// Same contract as [`commit_seek`](Self::commit_seek).
    pub(crate) async fn seek_to_fraction(&self, fraction: f64) -> Option<f64> {
        let mut step = self.checkout(|state| {
            matches!(state, PlaybackState::Playing | PlaybackState::Paused)
        })?;
        let result = step.session.as_mut()?.seek_to_fraction(fraction).await;
        self.finish_seek(step, result)
    }

    fn finish_seek(&self, step: CheckedOut<'_>, result: Result<Option<f64>>) -> Option<f64> {
        let session_id = step.session.as_ref()?.id();
        let position_secs = step.checkin(result).flatten()?;
        self.emit(PlaybackEvent::Seeked {
            session_id,
            position_secs,
        });
        Some(position_secs)
    }

    pub(crate) fn set_volume(&self, volume: f32) -> f32 {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        *self.volume.lock() = volume;

        let mut slot = self.slot.lock();
        let Slot::Active(session) = &mut *slot else {
            return volume;
        };
        let session_id = session.id();
        let applied = match session.set_volume(volume) {
            Ok(applied) => applied,
            Err(err) => {
                warn!(session_id, error = %err, "Failed to apply volume");
                return session.volume();
            }
        };
        drop(slot);
        self.emit(PlaybackEvent::VolumeChanged {
            session_id,
            volume: applied,
        });
        applied
    }

    pub(crate) fn toggle_mute(&self) -> Option<f32> {
        let mut slot = self.slot.lock();
        let Slot::Active(session) = &mut *slot else {
            return None;
        };
        let session_id = session.id();
        let volume = match session.toggle_mute() {
            Ok(volume) => volume,
            Err(err) => {
                warn!(session_id, error = %err, "Failed to toggle mute");
                return None;
            }
        };
        drop(slot);
        *self.volume.lock() = volume;
        self.emit(PlaybackEvent::VolumeChanged { session_id, volume });
        Some(volume)
    }

    pub(crate) fn state(&self) -> PlaybackState {
        self.slot.lock().state()
    }

    pub(crate) fn session_id(&self) -> Option<u64> {
        self.slot.lock().session_id()
    }

    pub(crate) fn snapshot(&self) -> Option<SessionSnapshot> {
        match &*self.slot.lock() {
            Slot::Active(session) => Some(session.snapshot()),
            Slot::Busy { snapshot, .. } => Some(snapshot.clone()),
            _ => None,
        }
    }

    pub(crate) fn popup_rect(&self) -> Option<(Rect, Rect)> {
        let popup = self.popup.as_ref()?;
        Some((popup.bounding_rect()?, popup.viewport()))
    }
}

impl Drop for ManagerInner {
    fn drop(&mut self) {
        let previous = std::mem::replace(self.slot.get_mut(), Slot::Idle);
        self.dispose(previous);
        self.cache.get_mut().clear();
    }
}

/// Entry point for text-to-speech playback.
///
/// Cheap handles to the same manager are not handed out; the transport
/// controls hold a weak reference obtained from [`controls`](Self::controls).
/// Dropping the manager tears down the session and clears the cache.
///
/// # Example
///
/// ```ignore
/// let manager = AudioPlaybackManager::new(core_config, PlaybackConfig::default())?;
/// match manager.play("Bonjour tout le monde").await {
///     PlayOutcome::Started { backend, .. } => println!("playing via {backend}"),
///     other => println!("not playing: {other:?}"),
/// }
/// ```
pub struct AudioPlaybackManager {
    inner: Arc<ManagerInner>,
}

impl AudioPlaybackManager {
    /// Build a manager from host capabilities and playback settings.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for out-of-range settings; `Runtime` when the host
    /// configuration is unusable (no playback host, bad API settings).
    pub fn new(core: CoreConfig, config: PlaybackConfig) -> Result<Self> {
        config.validate().map_err(PlaybackError::InvalidConfig)?;
        core.validate()?;

        let cache = AudioCache::new(config.cache_capacity, core.object_urls.clone())
            .with_events(core.event_bus.clone());
        let selector = BackendSelector::new(
            config.backend_order.clone(),
            core.audio_graph.clone(),
            core.media_elements.clone(),
            core.clock.clone(),
        );
        let volume = config.initial_volume;

        info!(
            cache_capacity = config.cache_capacity,
            backends = ?config.backend_order,
            "Audio playback manager ready"
        );

        Ok(Self {
            inner: Arc::new(ManagerInner {
                tts: TtsClient::new(core.http_client.clone(), core.tts.clone()),
                selector,
                timers: core.timer_host,
                notifications: core.notifications,
                object_urls: core.object_urls,
                popup: core.popup,
                events: core.event_bus,
                cache: Mutex::new(cache),
                slot: Mutex::new(Slot::Idle),
                generation: AtomicU64::new(0),
                volume: Mutex::new(volume),
                config,
            }),
        })
    }

    /// Speak `text`, replacing any current session.
    pub async fn play(&self, text: &str) -> PlayOutcome {
        self.inner.play(text).await
    }

    /// Tear down the current session. Returns `false` if already idle.
    pub fn stop(&self) -> bool {
        self.inner.stop()
    }

    pub fn pause(&self) -> bool {
        self.inner.pause()
    }

    pub async fn resume(&self) -> bool {
        self.inner.resume().await
    }

    /// Pause when playing, resume when paused. Returns the resulting state.
    pub async fn toggle_playback(&self) -> PlaybackState {
        self.inner.toggle_playback().await
    }

    /// Seek to `fraction` of the clip in one step and restore the prior
    /// playing/paused state. Returns the new position, or `None` when the
    /// seek was not applied (the backend refused it and playback stayed put).
    pub async fn seek_to_fraction(&self, fraction: f64) -> Option<f64> {
        self.inner.seek_to_fraction(fraction).await
    }

    pub fn begin_seek(&self, fraction: f64) -> bool {
        self.inner.begin_seek(fraction)
    }

    pub fn update_seek(&self, fraction: f64) -> bool {
        self.inner.update_seek(fraction)
    }

    /// Apply the pending drag seek. Same result as
    /// [`seek_to_fraction`](Self::seek_to_fraction).
    pub async fn commit_seek(&self) -> Option<f64> {
        self.inner.commit_seek().await
    }

    /// Set the volume (clamped to `[0, 1]`); also used by later sessions.
    pub fn set_volume(&self, volume: f32) -> f32 {
        self.inner.set_volume(volume)
    }

    pub fn toggle_mute(&self) -> Option<f32> {
        self.inner.toggle_mute()
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.state()
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.inner.snapshot()
    }

    /// Transport controls bound to the current session, if any.
    pub fn controls(&self) -> Option<TransportControls> {
        let session_id = self.inner.session_id()?;
        Some(TransportControls::new(SessionHandle::new(
            Arc::downgrade(&self.inner),
            session_id,
        )))
    }

    /// Drop every cached clip and revoke its URL.
    pub fn clear_cache(&self) {
        self.inner.cache.lock().clear();
    }

    pub fn cache_len(&self) -> usize {
        self.inner.cache.lock().len()
    }

    /// Resize the clip cache. Shrinking releases the oldest clips; `0`
    /// disables caching.
    pub fn set_cache_capacity(&self, capacity: usize) {
        info!(capacity, "Resizing audio cache");
        self.inner.cache.lock().set_capacity(capacity);
    }

    /// Cached selections, least recently inserted first.
    pub fn cached_texts(&self) -> Vec<String> {
        self.inner.cache.lock().keys()
    }

    pub fn is_cached(&self, text: &str) -> bool {
        self.inner.cache.lock().contains(text.trim())
    }

    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.inner.events.subscribe())
    }
}

impl fmt::Debug for AudioPlaybackManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioPlaybackManager")
            .field("state", &self.inner.state())
            .field("generation", &self.inner.current_generation())
            .field("cache_len", &self.cache_len())
            .finish()
    }
}
