//! # Audio Probe
//!
//! Identifies synthesized audio with Symphonia's probe before any playback
//! backend sees it. The probe yields the MIME type used for `blob:` and
//! `data:` URLs and, when the container declares it, the clip duration.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use symphonia::core::codecs::CodecType;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::{PlaybackError, Result};

/// Audio codec of a probed clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCodec {
    Mp3,
    Aac,
    Flac,
    Vorbis,
    Opus,
    Alac,
    /// Uncompressed PCM (WAV/AIFF containers).
    Wav,
    Unknown,
}

impl AudioCodec {
    /// Detect the codec from Symphonia's codec type.
    pub fn from_codec_type(codec_type: CodecType) -> Self {
        use symphonia::core::codecs::*;

        if codec_type == CODEC_TYPE_MP3 {
            AudioCodec::Mp3
        } else if codec_type == CODEC_TYPE_AAC {
            AudioCodec::Aac
        } else if codec_type == CODEC_TYPE_FLAC {
            AudioCodec::Flac
        } else if codec_type == CODEC_TYPE_VORBIS {
            AudioCodec::Vorbis
        } else if codec_type == CODEC_TYPE_OPUS {
            AudioCodec::Opus
        } else if codec_type == CODEC_TYPE_ALAC {
            AudioCodec::Alac
        } else if [
            CODEC_TYPE_PCM_S16LE,
            CODEC_TYPE_PCM_S16BE,
            CODEC_TYPE_PCM_S24LE,
            CODEC_TYPE_PCM_S24BE,
            CODEC_TYPE_PCM_S32LE,
            CODEC_TYPE_PCM_S32BE,
            CODEC_TYPE_PCM_F32LE,
            CODEC_TYPE_PCM_F32BE,
            CODEC_TYPE_PCM_F64LE,
            CODEC_TYPE_PCM_F64BE,
            CODEC_TYPE_PCM_U8,
            CODEC_TYPE_PCM_S8,
        ]
        .contains(&codec_type)
        {
            AudioCodec::Wav
        } else {
            warn!("Unknown codec type: {:?}", codec_type);
            AudioCodec::Unknown
        }
    }

    /// MIME type browsers accept for this codec, if it has one.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            AudioCodec::Mp3 => Some("audio/mpeg"),
            AudioCodec::Aac => Some("audio/aac"),
            AudioCodec::Flac => Some("audio/flac"),
            AudioCodec::Vorbis | AudioCodec::Opus => Some("audio/ogg"),
            AudioCodec::Alac => Some("audio/mp4"),
            AudioCodec::Wav => Some("audio/wav"),
            AudioCodec::Unknown => None,
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioCodec::Mp3 => "MP3",
            AudioCodec::Aac => "AAC",
            AudioCodec::Flac => "FLAC",
            AudioCodec::Vorbis => "Vorbis",
            AudioCodec::Opus => "Opus",
            AudioCodec::Alac => "ALAC",
            AudioCodec::Wav => "WAV",
            AudioCodec::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// What the probe learned about a clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioProbe {
    pub codec: AudioCodec,
    pub mime: String,
    pub duration_secs: Option<f64>,
}

/// Probe encoded audio.
///
/// `content_type` is the server's media type, if any; an `audio/*` value
/// wins over the sniffed MIME type. `extension` is a format hint such as the
/// requested response format (`"wav"`).
///
/// # Errors
///
/// Returns `DecodeFailed` for empty, unrecognised, or malformed data.
pub fn probe_audio(
    data: &Bytes,
    content_type: Option<&str>,
    extension: Option<&str>,
) -> Result<AudioProbe> {
    if data.is_empty() {
        return Err(PlaybackError::DecodeFailed("empty audio data".to_string()));
    }

    let server_mime = content_type
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("audio/"));

    let mut hint = Hint::new();
    if let Some(mime) = server_mime.as_deref() {
        hint.mime_type(mime);
    }
    if let Some(extension) = extension {
        hint.with_extension(extension);
    }

    let source = MediaSourceStream::new(Box::new(Cursor::new(data.clone())), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::DecodeFailed(format!("unrecognised audio: {}", e)))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| PlaybackError::DecodeFailed("no audio track".to_string()))?;

    let params = &track.codec_params;
    let codec = AudioCodec::from_codec_type(params.codec);
    let duration_secs = match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => Some(frames as f64 / rate as f64),
        _ => None,
    };

    let mime = match (server_mime, codec.mime_type()) {
        (Some(mime), _) => mime,
        (None, Some(sniffed)) => sniffed.to_string(),
        (None, None) => {
            return Err(PlaybackError::DecodeFailed(
                "unsupported audio codec".to_string(),
            ))
        }
    };

    debug!(%codec, mime = %mime, ?duration_secs, "Probed synthesized audio");

    Ok(AudioProbe {
        codec,
        mime,
        duration_secs,
    })
}
