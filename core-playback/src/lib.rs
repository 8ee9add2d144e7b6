//! # Read-Aloud Playback
//!
//! Speaks a text selection through a speech-synthesis API and plays the
//! result with transport controls docked to the host's translation popup.
//!
//! ## Overview
//!
//! This crate handles:
//! - Speech synthesis requests ([`tts`]) and audio probing ([`probe`])
//! - A bounded clip cache with insertion-order eviction ([`cache`])
//! - Ordered fallback across three playback backends ([`backend`])
//! - The single playback session and its state machine ([`session`])
//! - Ownership of that session and stale-result guarding ([`manager`])
//! - The transport controls view-model ([`controls`])
//!
//! Host capabilities (audio graph, media element, timers, notifications)
//! come from `bridge-traits` implementations wired up in a
//! [`CoreConfig`](core_runtime::config::CoreConfig).

pub mod backend;
pub mod cache;
pub mod config;
pub mod controls;
pub mod error;
pub mod manager;
pub mod probe;
pub mod session;
pub mod tts;

pub use backend::{AudioBackend, BackendKind, BackendSelector, PlaybackBackend};
pub use cache::{AudioCache, AudioResource};
pub use config::PlaybackConfig;
pub use controls::{
    format_time, place_controls, seek_fraction, EventDisposition, SessionHandle,
    TransportControls, TransportView, VolumeTier,
};
pub use error::{PlaybackError, Result};
pub use manager::{AudioPlaybackManager, PlayOutcome};
pub use probe::{probe_audio, AudioCodec, AudioProbe};
pub use session::{PlaybackSession, PlaybackState, SessionSnapshot, TickOutcome};
pub use tts::{truncate_chars, SynthesizedAudio, TtsClient};
