//! Workspace facade crate.
//!
//! Re-exports the playback core and maps the `desktop-shims` and `wasm`
//! feature flags onto the bridge crates, so host applications depend on
//! `readaloud-workspace` alone.

pub use bridge_traits as bridges;
pub use core_playback as playback;
pub use core_runtime as runtime;

pub use core_playback::{AudioPlaybackManager, PlayOutcome, PlaybackConfig, PlaybackState};
pub use core_runtime::config::CoreConfig;

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub use bridge_desktop as desktop;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use bridge_wasm as wasm;
