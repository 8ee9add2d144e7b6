//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the read-aloud core:
//! - Logging and tracing infrastructure
//! - Configuration management and host bridge validation
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that `core-playback` depends on.
//! It establishes the logging conventions, the fail-fast capability checks for
//! host bridges, and the event broadcasting used to report playback activity.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
