//! Popup geometry read from a live DOM element.

use bridge_traits::geometry::{HostPopup, Rect};
use web_sys::{Element, Window};

/// Reports the bounding box of the translation popup element.
pub struct ElementPopup {
    window: Window,
    element: Element,
}

impl ElementPopup {
    pub fn new(window: Window, element: Element) -> Self {
        Self { window, element }
    }
}

impl HostPopup for ElementPopup {
    fn bounding_rect(&self) -> Option<Rect> {
        if !self.element.is_connected() {
            return None;
        }
        let rect = self.element.get_bounding_client_rect();
        if rect.width() == 0.0 && rect.height() == 0.0 {
            return None;
        }
        Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }

    fn viewport(&self) -> Rect {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        Rect::new(0.0, 0.0, width, height)
    }
}
