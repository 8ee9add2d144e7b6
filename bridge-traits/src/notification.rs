//! User Notification Surface
//!
//! Non-fatal failures (fetch errors, rate limits, unplayable audio) are shown
//! to the user as toasts by the host UI. The core only supplies the message
//! and a category.

use crate::platform::PlatformSendSync;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category attached to a notification so the host can style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationCategory {
    /// Playback or speech-synthesis failure.
    AudioError,
    /// Informational message.
    Info,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::AudioError => "audio-error",
            NotificationCategory::Info => "info",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host notification surface. Fire-and-forget: no result is consumed.
pub trait NotificationSurface: PlatformSendSync {
    fn notify(&self, message: &str, category: NotificationCategory);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        assert_eq!(NotificationCategory::AudioError.as_str(), "audio-error");
        assert_eq!(
            serde_json::to_string(&NotificationCategory::AudioError).unwrap(),
            "\"audio-error\""
        );
        assert_eq!(NotificationCategory::Info.to_string(), "info");
    }
}
