use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::schedule::DEFAULT_TOLERANCE;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub enhance: EnhanceConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// WebSocket endpoint of the generation engine
    #[serde(default = "default_engine_url")]
    pub url: String,
    /// Open the connection as soon as the TUI starts
    #[serde(default)]
    pub connect_on_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            url: default_engine_url(),
            connect_on_start: false,
        }
    }
}

fn default_engine_url() -> String {
    "ws://127.0.0.1:8080/ws".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Length of a generation, in frames
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    /// Hit-test tolerance window, in frames
    #[serde(default = "default_tolerance")]
    pub tolerance: u32,
    /// Frames per second, for timecode display only
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Ruler tick spacing, in frames
    #[serde(default = "default_tick_interval")]
    pub tick_interval: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            max_frames: default_max_frames(),
            tolerance: default_tolerance(),
            fps: default_fps(),
            tick_interval: default_tick_interval(),
        }
    }
}

fn default_max_frames() -> u32 {
    240
}

fn default_tolerance() -> u32 {
    DEFAULT_TOLERANCE
}

fn default_fps() -> u32 {
    24
}

fn default_tick_interval() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceConfig {
    /// Endpoint of the prompt-enhancement service
    #[serde(default = "default_enhance_url")]
    pub url: String,
    /// Forwarded to the service as `openaiApiKey` when non-empty
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_enhance_timeout")]
    pub timeout_secs: u64,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        EnhanceConfig {
            url: default_enhance_url(),
            api_key: String::new(),
            timeout_secs: default_enhance_timeout(),
        }
    }
}

fn default_enhance_url() -> String {
    "http://127.0.0.1:3000/api/enhance-prompt".to_string()
}

fn default_enhance_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level when no -v flag is given
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file used while the TUI owns the terminal. Empty = default path.
    #[serde(default)]
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Hex color overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
