//! # Game Configuration
//!
//! Top-level configuration for one game instance: canvas geometry, frame
//! pacing, logging and scene defaults. Loadable from TOML or RON through the
//! [`Config`] trait.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::EngineError;
use crate::foundation::math::{Color, Size};

/// # Game Configuration
///
/// Everything the frame loop needs to know before the first tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Canvas width in game units
    pub width: f32,
    /// Canvas height in game units
    pub height: f32,
    /// Device pixels per game unit, applied when drawing and when mapping
    /// pointer coordinates into game space
    pub canvas_scale: f32,
    /// Nominal frame rate of the host's animation-frame callback
    pub target_fps: u32,
    /// Log level used by [`crate::foundation::logging::init_with_level`]
    pub log_level: String,
    /// Background color given to scenes created through [`crate::Game::new_scene`]
    pub background_color: [f32; 4],
    /// Whether the free-node overlay scene is drawn and hit-tested
    pub free_nodes_enabled: bool,
    /// Slide duration used by [`crate::Game::slide_transition`]
    pub default_slide_duration_ms: f64,
}

impl GameConfig {
    /// Create a configuration for a canvas of the given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set canvas scale
    pub fn with_canvas_scale(mut self, scale: f32) -> Self {
        self.canvas_scale = scale;
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set default scene background color
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = [color.x, color.y, color.z, color.w];
        self
    }

    /// Enable or disable the free-node overlay
    pub fn with_free_nodes(mut self, enabled: bool) -> Self {
        self.free_nodes_enabled = enabled;
        self
    }

    /// Canvas size in game units
    pub fn canvas_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Default scene background color
    pub fn background(&self) -> Color {
        Color::from(self.background_color)
    }

    /// Milliseconds per frame at the target frame rate
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.target_fps.max(1))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.width.is_finite() && self.width > 0.0) || !(self.height.is_finite() && self.height > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if !(self.canvas_scale.is_finite() && self.canvas_scale > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "canvas scale must be positive, got {}",
                self.canvas_scale
            )));
        }

        if self.target_fps == 0 {
            return Err(EngineError::InvalidConfig("target FPS must be at least 1".to_string()));
        }

        if !(self.default_slide_duration_ms.is_finite() && self.default_slide_duration_ms >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "slide duration must be non-negative, got {}",
                self.default_slide_duration_ms
            )));
        }

        if self.background_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(EngineError::InvalidConfig(
                "background color components must be within [0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 800.0,
            canvas_scale: 1.0,
            target_fps: 60,
            log_level: "info".to_string(),
            background_color: [1.0, 1.0, 1.0, 1.0],
            free_nodes_enabled: true,
            default_slide_duration_ms: 500.0,
        }
    }
}

impl Config for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_canvas() {
        let config = GameConfig::new(0.0, 800.0);
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_partial_config_uses_defaults() {
        let config = GameConfig::from_str_with_format(
            "width = 1024.0\nheight = 768.0\nlog_level = \"debug\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.canvas_size(), Size::new(1024.0, 768.0));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.target_fps, 60);
    }

    #[test]
    fn test_ron_round_trip_preserves_scale() {
        let config = GameConfig::new(320.0, 480.0).with_canvas_scale(2.0);
        let text = config.to_string_with_format(ConfigFormat::Ron).unwrap();
        let parsed = GameConfig::from_str_with_format(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, config);
    }
}
