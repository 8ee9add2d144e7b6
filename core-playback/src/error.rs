//! # Playback Error Types
//!
//! Error taxonomy for speech synthesis and audio playback.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur while turning text into audible speech.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Request Errors
    // ========================================================================
    /// Text exceeds the speech API's input limit.
    #[error("Text too long: {length} characters (max {max})")]
    TextTooLong { length: usize, max: usize },

    /// No API key is configured.
    #[error("No speech API key configured")]
    CredentialMissing,

    /// Network or HTTP failure while fetching audio.
    #[error("Failed to fetch audio: {0}")]
    FetchFailed(String),

    /// The speech API refused the request because of rate limiting.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    // ========================================================================
    // Playback Errors
    // ========================================================================
    /// Audio data is malformed or in an unsupported format.
    #[error("Failed to decode audio: {0}")]
    DecodeFailed(String),

    /// Every playback backend failed.
    #[error("Audio playback unavailable: {0}")]
    PlaybackUnavailable(String),

    /// The backend cannot seek in its current state.
    #[error("Seek failed: {0}")]
    SeekFailed(String),

    /// A runtime error stopped playback after it had started.
    #[error("Playback interrupted: {0}")]
    PlaybackInterrupted(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Host bridge failure.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Invalid playback configuration.
    #[error("Invalid playback configuration: {0}")]
    InvalidConfig(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl PlaybackError {
    /// The single notification string shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            PlaybackError::TextTooLong { max, .. } => {
                format!("The selected text is too long to read aloud (limit {} characters).", max)
            }
            PlaybackError::CredentialMissing => {
                "Add a speech API key in the extension options to use read aloud.".to_string()
            }
            PlaybackError::RateLimited(_) => {
                "Speech rate limit reached. Please wait a moment and try again.".to_string()
            }
            PlaybackError::FetchFailed(cause) => {
                format!("Could not fetch speech audio: {}", cause)
            }
            PlaybackError::DecodeFailed(_) => {
                "The speech audio could not be decoded.".to_string()
            }
            PlaybackError::PlaybackUnavailable(_) | PlaybackError::Bridge(_) => {
                "Audio playback is not available on this page.".to_string()
            }
            PlaybackError::SeekFailed(_) => "Could not seek in the audio.".to_string(),
            PlaybackError::PlaybackInterrupted(cause) => {
                format!("Audio playback stopped unexpectedly: {}", cause)
            }
            PlaybackError::InvalidConfig(_) | PlaybackError::Runtime(_) => {
                "Read aloud is misconfigured.".to_string()
            }
        }
    }

    /// Returns `true` if the speech API rejected the request for rate limiting.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, PlaybackError::RateLimited(_))
    }

    /// Returns `true` if this error is due to network issues.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::FetchFailed(_) | PlaybackError::RateLimited(_)
        )
    }

    /// Returns `true` if re-issuing the same request could succeed.
    ///
    /// Nothing is retried automatically; this only informs the host UI.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlaybackError::FetchFailed(_)
                | PlaybackError::RateLimited(_)
                | PlaybackError::PlaybackInterrupted(_)
                | PlaybackError::SeekFailed(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
