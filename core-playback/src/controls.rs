//! # Transport Controls
//!
//! View-model for the progress bar, time labels, and volume slider docked
//! next to the host popup. The host renders; this module maps gestures to
//! manager calls and computes what to display.
//!
//! Controls never touch a backend. They hold a [`SessionHandle`] and go
//! through the manager, and every call becomes a no-op once the session they
//! were created for is gone.
//!
//! ## Gestures
//!
//! - `pointer_down` arms a drag; the first `pointer_move` enters `Seeking`
//!   (audio pauses), further moves update the target, `pointer_up` commits.
//! - A `click` without a drag seeks in one step.
//!
//! Both restore the state from before the gesture: playback resumes only if
//! it was playing. Every handler returns an [`EventDisposition`] asking the
//! host to stop propagation, so the page's click-outside handler never closes
//! the popup because of a control gesture.

use bridge_traits::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};

use crate::manager::ManagerInner;
use crate::session::PlaybackState;

/// Gap between the popup and the controls, in CSS pixels.
pub const POPUP_GAP_PX: f64 = 8.0;

/// Volume icon tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTier {
    Muted,
    Low,
    Medium,
    High,
}

impl VolumeTier {
    /// `0` → muted, `< 0.3` → low, `< 0.7` → medium, otherwise high.
    pub fn for_volume(volume: f32) -> Self {
        if volume.is_nan() || volume <= 0.0 {
            VolumeTier::Muted
        } else if volume < 0.3 {
            VolumeTier::Low
        } else if volume < 0.7 {
            VolumeTier::Medium
        } else {
            VolumeTier::High
        }
    }

    /// Icon name the host maps to an asset.
    pub fn icon(&self) -> &'static str {
        match self {
            VolumeTier::Muted => "volume-muted",
            VolumeTier::Low => "volume-low",
            VolumeTier::Medium => "volume-medium",
            VolumeTier::High => "volume-high",
        }
    }
}

/// Format seconds as `m:ss`. Negative or non-finite input shows `0:00`.
pub fn format_time(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Horizontal fraction of `client_x` within `bar`, clamped to `[0, 1]`.
pub fn seek_fraction(client_x: f64, bar: &Rect) -> f64 {
    if bar.width.is_nan() || bar.width <= 0.0 || !client_x.is_finite() {
        return 0.0;
    }
    ((client_x - bar.left) / bar.width).clamp(0.0, 1.0)
}

/// Where to put controls of `size` next to `popup`.
///
/// Below the popup with an 8 px gap; above it when that would overflow the
/// viewport bottom. Horizontally aligned with the popup's left edge and
/// clamped inside the viewport.
pub fn place_controls(popup: &Rect, viewport: &Rect, size: Size) -> Point {
    let max_x = (viewport.right() - size.width).max(viewport.left);
    let x = popup.left.clamp(viewport.left, max_x);

    let below = popup.bottom() + POPUP_GAP_PX;
    let y = if below + size.height > viewport.bottom() {
        (popup.top - POPUP_GAP_PX - size.height).max(viewport.top)
    } else {
        below
    };

    Point { x, y }
}

/// What the host should do with the DOM event that triggered a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDisposition {
    /// Always `true` for control gestures.
    pub stop_propagation: bool,
    /// Whether the gesture changed anything.
    pub handled: bool,
}

impl EventDisposition {
    fn contained(handled: bool) -> Self {
        Self {
            stop_propagation: true,
            handled,
        }
    }
}

/// Everything the controls render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportView {
    /// `0.0..=100.0`
    pub progress_percent: f64,
    pub elapsed_label: String,
    pub duration_label: String,
    pub volume: f32,
    pub volume_tier: VolumeTier,
    pub playing: bool,
    pub seeking: bool,
}

/// Weak reference to the manager scoped to one session.
#[derive(Clone)]
pub struct SessionHandle {
    manager: Weak<ManagerInner>,
    session_id: u64,
}

impl SessionHandle {
    pub(crate) fn new(manager: Weak<ManagerInner>, session_id: u64) -> Self {
        Self {
            manager,
            session_id,
        }
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Whether the session still exists.
    pub fn is_attached(&self) -> bool {
        self.manager().is_some()
    }

    fn manager(&self) -> Option<Arc<ManagerInner>> {
        let manager = self.manager.upgrade()?;
        (manager.session_id() == Some(self.session_id)).then_some(manager)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session_id", &self.session_id)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Armed { fraction: f64 },
    Seeking,
}

/// Controls bound to one session.
#[derive(Debug)]
pub struct TransportControls {
    handle: SessionHandle,
    drag: Option<Drag>,
    suppress_click: bool,
}

impl TransportControls {
    pub(crate) fn new(handle: SessionHandle) -> Self {
        Self {
            handle,
            drag: None,
            suppress_click: false,
        }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_attached()
    }

    /// Current view, `None` once the session is gone (the host removes the
    /// controls).
    pub fn refresh(&self) -> Option<TransportView> {
        let snapshot = self.handle.manager()?.snapshot()?;
        let duration = snapshot.duration_secs.max(0.0);
        let position = snapshot.position_secs.clamp(0.0, duration);
        let progress_percent = if duration > 0.0 {
            position / duration * 100.0
        } else {
            0.0
        };

        Some(TransportView {
            progress_percent,
            elapsed_label: format_time(position),
            duration_label: format_time(duration),
            volume: snapshot.volume,
            volume_tier: VolumeTier::for_volume(snapshot.volume),
            playing: snapshot.state == PlaybackState::Playing,
            seeking: snapshot.state == PlaybackState::Seeking,
        })
    }

    pub fn pointer_down(&mut self, client_x: f64, bar: &Rect) -> EventDisposition {
        if !self.is_attached() {
            return EventDisposition::contained(false);
        }
        self.drag = Some(Drag::Armed {
            fraction: seek_fraction(client_x, bar),
        });
        self.suppress_click = false;
        EventDisposition::contained(true)
    }

    pub fn pointer_move(&mut self, client_x: f64, bar: &Rect) -> EventDisposition {
        let Some(drag) = self.drag else {
            return EventDisposition::contained(false);
        };
        let Some(manager) = self.handle.manager() else {
            self.drag = None;
            return EventDisposition::contained(false);
        };

        let fraction = seek_fraction(client_x, bar);
        let handled = match drag {
            Drag::Armed { fraction: start } => {
                let began = manager.begin_seek(start) && manager.update_seek(fraction);
                self.drag = began.then_some(Drag::Seeking);
                began
            }
            Drag::Seeking => manager.update_seek(fraction),
        };
        EventDisposition::contained(handled)
    }

    pub async fn pointer_up(&mut self, client_x: f64, bar: &Rect) -> EventDisposition {
        let drag = self.drag.take();
        if drag != Some(Drag::Seeking) {
            return EventDisposition::contained(false);
        }
        // The click that follows this release belongs to the drag.
        self.suppress_click = true;

        let Some(manager) = self.handle.manager() else {
            return EventDisposition::contained(false);
        };
        manager.update_seek(seek_fraction(client_x, bar));
        let handled = manager.commit_seek().await.is_some();
        EventDisposition::contained(handled)
    }

    pub async fn click(&mut self, client_x: f64, bar: &Rect) -> EventDisposition {
        if std::mem::take(&mut self.suppress_click) {
            return EventDisposition::contained(false);
        }
        let Some(manager) = self.handle.manager() else {
            return EventDisposition::contained(false);
        };
        let handled = manager
            .seek_to_fraction(seek_fraction(client_x, bar))
            .await
            .is_some();
        EventDisposition::contained(handled)
    }

    pub fn set_volume(&self, volume: f32) -> EventDisposition {
        let Some(manager) = self.handle.manager() else {
            return EventDisposition::contained(false);
        };
        manager.set_volume(volume);
        EventDisposition::contained(true)
    }

    pub fn toggle_mute(&self) -> EventDisposition {
        let handled = self
            .handle
            .manager()
            .and_then(|manager| manager.toggle_mute())
            .is_some();
        EventDisposition::contained(handled)
    }

    pub async fn toggle_playback(&self) -> EventDisposition {
        let Some(manager) = self.handle.manager() else {
            return EventDisposition::contained(false);
        };
        let before = manager.state();
        let after = manager.toggle_playback().await;
        EventDisposition::contained(before != after)
    }

    /// Placement for the current popup geometry; call on popup drag and page
    /// scroll. `None` when detached or the popup is hidden.
    pub fn reposition(&self, size: Size) -> Option<Point> {
        let (popup, viewport) = self.handle.manager()?.popup_rect()?;
        Some(place_controls(&popup, &viewport, size))
    }
}
