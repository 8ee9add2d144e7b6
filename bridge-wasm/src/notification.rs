//! Notifications as DOM events.
//!
//! The content script's UI layer listens for `readaloud:notify` on `window`
//! and renders a toast from `event.detail`:
//!
//! ```javascript
//! window.addEventListener("readaloud:notify", (e) => {
//!   showToast(e.detail.message, e.detail.category);
//! });
//! ```

use bridge_traits::{
    error::Result as BridgeResult,
    notification::{NotificationCategory, NotificationSurface},
};
use js_sys::{Object, Reflect};
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit, Window};

use crate::error::window;

pub const NOTIFY_EVENT: &str = "readaloud:notify";

pub struct CustomEventNotificationSurface {
    window: Window,
    event_name: String,
}

impl CustomEventNotificationSurface {
    pub fn new() -> BridgeResult<Self> {
        Self::with_event_name(NOTIFY_EVENT)
    }

    pub fn with_event_name(event_name: impl Into<String>) -> BridgeResult<Self> {
        Ok(Self {
            window: window()?,
            event_name: event_name.into(),
        })
    }

    fn dispatch(&self, message: &str, category: NotificationCategory) -> Result<(), JsValue> {
        let detail = Object::new();
        Reflect::set(&detail, &"message".into(), &message.into())?;
        Reflect::set(&detail, &"category".into(), &category.as_str().into())?;

        let init = CustomEventInit::new();
        init.set_detail(&detail);
        let event = CustomEvent::new_with_event_init_dict(&self.event_name, &init)?;
        self.window.dispatch_event(&event)?;
        Ok(())
    }
}

impl NotificationSurface for CustomEventNotificationSurface {
    fn notify(&self, message: &str, category: NotificationCategory) {
        if let Err(err) = self.dispatch(message, category) {
            warn!(error = ?err, %category, "Failed to dispatch notification event");
        }
    }
}
