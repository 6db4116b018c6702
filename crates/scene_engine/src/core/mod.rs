//! # Core Engine Module
//!
//! Shared configuration used by the game loop and its subsystems.
//!
//! ## Organization
//!
//! - **Config**: Game-level configuration (canvas, timing, logging)

pub mod config;

pub use config::GameConfig;
pub use crate::config::{Config, ConfigError, ConfigFormat};
