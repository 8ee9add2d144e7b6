//! # Playback Session
//!
//! The single active unit of audio state: one backend, its transport state
//! machine, volume and pending seek.
//!
//! ## State machine
//!
//! ```text
//!            ┌──────── teardown (any state) ────────┐
//!            ▼                                       │
//!  Idle ─> Loading ─> Playing ⇄ Paused               │
//!            │          │  ▲     │  ▲                │
//!            │          ▼  │     ▼  │                │
//!            │          Seeking ───┘                 │
//!            │          │                            │
//!            └─> Idle   └─> Ended ───────────────────┘
//! ```
//!
//! `Idle` and `Loading` belong to the manager (no session exists yet); a
//! session is born `Playing` because the backend selector only hands over a
//! backend that is already audible.

use bridge_traits::{ObjectUrlRegistry, TimerHandle, TimerHost};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::backend::{AudioBackend, BackendKind, PlaybackBackend};
use crate::error::{PlaybackError, Result};

/// Transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Paused,
    Seeking,
    Ended,
}

impl PlaybackState {
    /// Whether `next` is directly reachable from this state.
    ///
    /// `Idle` is reachable from everywhere (teardown is total).
    pub fn can_transition_to(self, next: PlaybackState) -> bool {
        use PlaybackState::*;

        if next == Idle {
            return true;
        }
        matches!(
            (self, next),
            (Idle, Loading)
                | (Ended, Loading)
                | (Loading, Playing)
                | (Playing, Paused)
                | (Playing, Seeking)
                | (Playing, Ended)
                | (Paused, Playing)
                | (Paused, Seeking)
                | (Seeking, Seeking)
                | (Seeking, Playing)
                | (Seeking, Paused)
        )
    }

    pub fn is_active(self) -> bool {
        matches!(
            self,
            PlaybackState::Playing | PlaybackState::Paused | PlaybackState::Seeking
        )
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Seeking => "seeking",
            PlaybackState::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: u64,
    pub backend: BackendKind,
    pub state: PlaybackState,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: f32,
    pub pending_seek_secs: Option<f64>,
}

impl SessionSnapshot {
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }
}

/// Result of one progress poll.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Progress { position_secs: f64, duration_secs: f64 },
    Ended,
    Failed(String),
}

#[derive(Debug, Clone, Copy)]
struct PendingSeek {
    target_secs: f64,
    resume_after: bool,
}

/// An active playback session.
pub struct PlaybackSession {
    id: u64,
    backend: PlaybackBackend,
    state: PlaybackState,
    volume: f32,
    pre_mute_volume: Option<f32>,
    unmute_volume: f32,
    seek: Option<PendingSeek>,
    timer: Option<TimerHandle>,
    owned_url: Option<String>,
}

impl PlaybackSession {
    /// Wrap a backend that is already playing at `volume`.
    pub fn new(id: u64, backend: PlaybackBackend, volume: f32, unmute_volume: f32) -> Self {
        Self {
            id,
            backend,
            state: PlaybackState::Playing,
            volume: volume.clamp(0.0, 1.0),
            pre_mute_volume: None,
            unmute_volume,
            seek: None,
            timer: None,
            owned_url: None,
        }
    }

    /// Revoke `url` at teardown (used when the clip is not cached).
    pub fn with_owned_url(mut self, url: Option<String>) -> Self {
        self.owned_url = url;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn duration_secs(&self) -> f64 {
        self.backend.duration_secs()
    }

    /// The displayed position: the pending target while seeking.
    pub fn position_secs(&self) -> f64 {
        match self.seek {
            Some(seek) => seek.target_secs,
            None => self.backend.position_secs(),
        }
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn attach_timer(&mut self, handle: TimerHandle) {
        self.timer = Some(handle);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            backend: self.backend.kind(),
            state: self.state,
            position_secs: self.position_secs(),
            duration_secs: self.duration_secs(),
            volume: self.volume,
            pending_seek_secs: self.seek.map(|seek| seek.target_secs),
        }
    }

    fn transition(&mut self, next: PlaybackState) -> bool {
        if !self.state.can_transition_to(next) {
            debug!(session_id = self.id, from = %self.state, to = %next, "Ignoring transition");
            return false;
        }
        self.state = next;
        true
    }

    /// `Playing → Paused`. Returns `false` in any other state.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.backend.pause();
        self.transition(PlaybackState::Paused)
    }

    /// `Paused → Playing`. Returns `Ok(false)` in any other state.
    pub async fn resume(&mut self) -> Result<bool> {
        if self.state != PlaybackState::Paused {
            return Ok(false);
        }
        self.backend.play().await?;
        Ok(self.transition(PlaybackState::Playing))
    }

    /// Enter `Seeking` at `fraction` of the clip. The backend is paused
    /// immediately; playback resumes on commit only if it was playing.
    pub fn begin_seek(&mut self, fraction: f64) -> bool {
        let resume_after = match self.state {
            PlaybackState::Playing => true,
            PlaybackState::Paused => false,
            PlaybackState::Seeking => {
                return self.update_seek(fraction);
            }
            _ => return false,
        };

        self.backend.pause();
        self.seek = Some(PendingSeek {
            target_secs: self.fraction_to_secs(fraction),
            resume_after,
        });
        self.transition(PlaybackState::Seeking)
    }

    /// Move the pending target while dragging.
    pub fn update_seek(&mut self, fraction: f64) -> bool {
        let target_secs = self.fraction_to_secs(fraction);
        match self.seek.as_mut() {
            Some(seek) if self.state == PlaybackState::Seeking => {
                seek.target_secs = target_secs;
                true
            }
            _ => false,
        }
    }

    /// Apply the pending seek and return to the prior state.
    ///
    /// A `SeekFailed` from the backend is logged and the position stays
    /// where it was; the session is not failed. Errors from resuming
    /// playback are returned.
    pub async fn commit_seek(&mut self) -> Result<Option<f64>> {
        let Some(seek) = self.seek.take() else {
            return Ok(None);
        };
        if self.state != PlaybackState::Seeking {
            return Ok(None);
        }

        let applied = match self.backend.seek(seek.target_secs) {
            Ok(()) => Some(seek.target_secs),
            Err(err @ PlaybackError::SeekFailed(_)) => {
                warn!(session_id = self.id, error = %err, "Seek ignored");
                None
            }
            Err(err) => return Err(err),
        };

        if seek.resume_after {
            self.backend.play().await?;
            self.transition(PlaybackState::Playing);
        } else {
            self.transition(PlaybackState::Paused);
        }
        Ok(applied)
    }

    /// Seek in one step (click on the progress bar).
    pub async fn seek_to_fraction(&mut self, fraction: f64) -> Result<Option<f64>> {
        if !self.begin_seek(fraction) {
            return Ok(None);
        }
        self.commit_seek().await
    }

    /// Set the volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) -> Result<f32> {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.backend.set_volume(volume)?;
        self.volume = volume;
        if volume > 0.0 {
            self.pre_mute_volume = None;
        }
        Ok(volume)
    }

    /// Mute, or restore the pre-mute volume (the configured default when
    /// none was stored).
    pub fn toggle_mute(&mut self) -> Result<f32> {
        if self.volume > 0.0 {
            let previous = self.volume;
            self.set_volume(0.0)?;
            self.pre_mute_volume = Some(previous);
            Ok(0.0)
        } else {
            let restore = self.pre_mute_volume.take().unwrap_or(self.unmute_volume);
            self.set_volume(restore)
        }
    }

    /// Poll the backend for progress, end of stream and runtime errors.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state == PlaybackState::Playing {
            if let Some(error) = self.backend.runtime_error() {
                return TickOutcome::Failed(error);
            }
            if self.backend.is_finished() {
                self.transition(PlaybackState::Ended);
                return TickOutcome::Ended;
            }
        }
        TickOutcome::Progress {
            position_secs: self.position_secs(),
            duration_secs: self.duration_secs(),
        }
    }

    /// Release every resource the session holds. Idempotent.
    pub fn teardown(&mut self, timers: &dyn TimerHost, urls: Option<&dyn ObjectUrlRegistry>) {
        if let Some(handle) = self.timer.take() {
            timers.clear_interval(handle);
        }
        self.backend.release();
        if let Some(url) = self.owned_url.take() {
            match urls {
                Some(registry) => {
                    if let Err(err) = registry.revoke_object_url(&url) {
                        warn!(session_id = self.id, error = %err, "Failed to revoke session URL");
                    }
                }
                None => warn!(session_id = self.id, "No registry to revoke session URL"),
            }
        }
        self.seek = None;
        self.state = PlaybackState::Idle;
        debug!(session_id = self.id, "Session torn down");
    }

    fn fraction_to_secs(&self, fraction: f64) -> f64 {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        (fraction * self.duration_secs()).clamp(0.0, self.duration_secs())
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("backend", &self.backend)
            .field("state", &self.state)
            .field("volume", &self.volume)
            .field("timer", &self.timer)
            .finish()
    }
}
