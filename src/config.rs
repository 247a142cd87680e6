//! Renderer configuration
//!
//! Stored as RON (Rusty Object Notation). A missing file means defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rasterizer::{BitLayout, ChannelOrder, RenderContext, TranslationPolicy, HEIGHT, WIDTH};

/// Canvas and compatibility settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Channel packing used when decoding bitmaps
    pub bit_layout: BitLayout,
    /// Byte order of the presented true-colour buffer
    pub channel_order: ChannelOrder,
    pub translation: TranslationPolicy,
    /// Fixed update rate of the viewer
    pub fps: u32,
    /// Window size as a multiple of the canvas
    pub window_scale: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: WIDTH,
            canvas_height: HEIGHT,
            bit_layout: BitLayout::RedHigh,
            channel_order: ChannelOrder::Rgba,
            translation: TranslationPolicy::Legacy,
            fps: 60,
            window_scale: 3,
        }
    }
}

impl RenderConfig {
    pub fn context(&self) -> RenderContext {
        RenderContext::new(self.translation, self.channel_order)
    }
}

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}
