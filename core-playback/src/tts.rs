//! # Speech Synthesis Client
//!
//! Client for an OpenAI-compatible `POST /audio/speech` endpoint.
//!
//! ## Error mapping
//!
//! | Response                                        | Error              |
//! |-------------------------------------------------|--------------------|
//! | no / blank API key (checked locally)            | `CredentialMissing`|
//! | input longer than the limit (checked locally)   | `TextTooLong`      |
//! | HTTP 429 or `error.code == "rate_limit_exceeded"` | `RateLimited`    |
//! | any other non-2xx                               | `FetchFailed`      |
//! | 2xx with an empty body                          | `FetchFailed`      |
//! | transport failure                               | `FetchFailed`      |
//!
//! Requests are sent exactly once. Nothing is retried.

use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_runtime::config::TtsApiConfig;
use core_runtime::logging::text_preview;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{PlaybackError, Result};

const RATE_LIMIT_CODE: &str = "rate_limit_exceeded";

/// Audio returned by the speech API.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub data: Bytes,
    /// The response `Content-Type` without parameters.
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Speech synthesis client.
pub struct TtsClient {
    http: Arc<dyn HttpClient>,
    config: TtsApiConfig,
}

impl TtsClient {
    pub fn new(http: Arc<dyn HttpClient>, config: TtsApiConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &TtsApiConfig {
        &self.config
    }

    /// Longest accepted input, in characters.
    pub fn max_text_length(&self) -> usize {
        self.config.max_text_length
    }

    /// Synthesize `text` into encoded audio.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio> {
        let api_key = self
            .config
            .credential()
            .ok_or(PlaybackError::CredentialMissing)?;

        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(PlaybackError::TextTooLong {
                length,
                max: self.config.max_text_length,
            });
        }

        let url = format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'));
        let body = SpeechRequest {
            model: &self.config.model,
            input: text,
            voice: &self.config.voice,
            response_format: &self.config.response_format,
        };

        let request = HttpRequest::new(HttpMethod::Post, url)
            .bearer_token(api_key)
            .timeout(self.config.request_timeout())
            .json(&body)
            .map_err(|e| PlaybackError::FetchFailed(e.to_string()))?;

        debug!(text = %text_preview(text, 32), voice = %self.config.voice, "Requesting speech");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| PlaybackError::FetchFailed(e.to_string()))?;

        if !response.is_success() {
            return Err(map_error_response(&response));
        }

        if response.body.is_empty() {
            return Err(PlaybackError::FetchFailed(
                "speech API returned no audio".to_string(),
            ));
        }

        debug!(bytes = response.body.len(), "Received speech audio");

        Ok(SynthesizedAudio {
            content_type: response.content_type().map(str::to_string),
            data: response.body,
        })
    }
}

fn map_error_response(response: &HttpResponse) -> PlaybackError {
    let parsed = response.json::<ApiErrorEnvelope>().ok().map(|e| e.error);
    let code = parsed.as_ref().and_then(|e| e.code.clone());
    let message = parsed
        .and_then(|e| e.message)
        .or_else(|| response.text().ok().filter(|text| !text.trim().is_empty()))
        .unwrap_or_else(|| "no error details".to_string());

    if response.status == 429 || code.as_deref() == Some(RATE_LIMIT_CODE) {
        warn!(status = response.status, "Speech API rate limit hit");
        return PlaybackError::RateLimited(message);
    }

    warn!(status = response.status, error = %message, "Speech API request failed");
    PlaybackError::FetchFailed(format!("HTTP {}: {}", response.status, message))
}

/// Cut `text` to at most `max_chars` characters, on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
