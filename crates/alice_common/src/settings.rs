//! Persisted console settings
//!
//! Flat key-value JSON, loaded once at startup. Missing keys take defaults,
//! unreadable or corrupt files fall back to full defaults — persistence
//! problems are reported, never fatal. Settings are written back only on an
//! explicit, confirmed save.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

pub const SETTINGS_FILENAME: &str = "alice_shell_settings.json";

pub const TTS_SPEED_MIN: f32 = 0.5;
pub const TTS_SPEED_MAX: f32 = 2.0;
pub const TTS_SPEED_STEP: f32 = 0.25;

pub const DEFAULT_ASSISTANT_NAME: &str = "Alice";
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Known model ring for `model next` / `model previous` cycling
pub const MODEL_OPTIONS: [&str; 4] = ["gpt-5", "gpt-5-codex", "gpt-4.1", "gpt-4o"];

/// Which slice of terminal history is sent as model context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferMode {
    /// Full history for this run
    #[default]
    Session,
    /// History after the most recent explicit clear
    Anchor,
    /// History since the last codex response or executed command
    Last,
}

impl BufferMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BufferMode::Session => "session",
            BufferMode::Anchor => "anchor",
            BufferMode::Last => "last",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "session" => Some(BufferMode::Session),
            "anchor" => Some(BufferMode::Anchor),
            "last" => Some(BufferMode::Last),
            _ => None,
        }
    }
}

/// Model reasoning effort passed to the codex CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningLevel {
    None,
    Low,
    #[default]
    Medium,
    High,
}

impl ReasoningLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningLevel::None => "none",
            ReasoningLevel::Low => "low",
            ReasoningLevel::Medium => "medium",
            ReasoningLevel::High => "high",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "none" => Some(ReasoningLevel::None),
            "low" => Some(ReasoningLevel::Low),
            "medium" => Some(ReasoningLevel::Medium),
            "high" => Some(ReasoningLevel::High),
            _ => None,
        }
    }

    pub fn all() -> [ReasoningLevel; 4] {
        [
            ReasoningLevel::None,
            ReasoningLevel::Low,
            ReasoningLevel::Medium,
            ReasoningLevel::High,
        ]
    }
}

/// Console settings persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Guided mode: speak confirmations and help after commands
    #[serde(default = "default_true")]
    pub guided: bool,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub reasoning: ReasoningLevel,

    #[serde(default = "default_true")]
    pub debug_logging: bool,

    #[serde(default = "default_true")]
    pub save_recordings: bool,

    /// Log prompts and responses to the session log
    #[serde(default = "default_true")]
    pub log_prompts: bool,

    /// Colored tag output
    #[serde(default = "default_true")]
    pub fancy_output: bool,

    /// Playback speed multiplier, clamped to [0.5, 2.0]
    #[serde(default = "default_tts_speed")]
    pub tts_speed: f32,

    #[serde(default)]
    pub buffer_mode: BufferMode,
}

fn default_assistant_name() -> String {
    DEFAULT_ASSISTANT_NAME.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_tts_speed() -> f32 {
    1.2
}

impl Default for Settings {
    fn default() -> Self {
        // Same default fns the #[serde(default)] attributes use, so both
        // paths stay in sync.
        Self {
            assistant_name: default_assistant_name(),
            guided: default_true(),
            model: default_model(),
            reasoning: ReasoningLevel::default(),
            debug_logging: default_true(),
            save_recordings: default_true(),
            log_prompts: default_true(),
            fancy_output: default_true(),
            tts_speed: default_tts_speed(),
            buffer_mode: BufferMode::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Settings>(&content) {
                Ok(mut settings) => {
                    settings.clamp();
                    settings
                }
                Err(e) => {
                    warn!("settings file {} is corrupt: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("could not read settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)
    }

    /// Keep tts_speed inside its valid range.
    pub fn clamp(&mut self) {
        self.tts_speed = self.tts_speed.clamp(TTS_SPEED_MIN, TTS_SPEED_MAX);
    }

    pub fn set_tts_speed(&mut self, value: f32) {
        self.tts_speed = value.clamp(TTS_SPEED_MIN, TTS_SPEED_MAX);
    }

    /// Cycle the model ring forward or backward.
    pub fn cycle_model(&mut self, forward: bool) {
        let idx = MODEL_OPTIONS
            .iter()
            .position(|m| *m == self.model)
            .unwrap_or(0);
        let len = MODEL_OPTIONS.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.model = MODEL_OPTIONS[next].to_string();
    }
}
