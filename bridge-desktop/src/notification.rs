//! Notification surface that writes to the tracing log.
//!
//! Desktop builds have no toast UI; notifications become log events under
//! the `readaloud::notify` target so they are visible with the default
//! filter.

use bridge_traits::notification::{NotificationCategory, NotificationSurface};
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSurface;

impl LogNotificationSurface {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSurface for LogNotificationSurface {
    fn notify(&self, message: &str, category: NotificationCategory) {
        match category {
            NotificationCategory::AudioError => {
                warn!(target: "readaloud::notify", %category, "{}", message)
            }
            NotificationCategory::Info => {
                info!(target: "readaloud::notify", %category, "{}", message)
            }
        }
    }
}
