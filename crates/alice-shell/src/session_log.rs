//! Session log: prompts, responses, and executed commands as JSONL
//!
//! One serde-serialized entry per line, append-only. Path discovery walks
//! an override env var, then XDG state, then ~/.local/state; when nothing
//! is writable the entry falls back to being dropped silently — logging
//! must never take the session down.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// What a session-log entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Prompt,
    Response,
    Executed,
}

/// One line of the session log
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 timestamp
    pub ts: String,
    /// Request ID tying a prompt to its response
    pub req_id: String,
    pub kind: LogKind,
    pub text: String,
}

/// Append-only JSONL writer, enabled by the `log_prompts` setting.
#[derive(Debug)]
pub struct SessionLog {
    enabled: bool,
    path: Option<PathBuf>,
}

impl SessionLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            path: discover_log_path(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn generate_req_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Append one entry. Failures are logged at debug level and swallowed.
    pub fn record(&self, req_id: &str, kind: LogKind, text: &str) {
        if !self.enabled {
            return;
        }
        let entry = LogEntry {
            ts: Utc::now().to_rfc3339(),
            req_id: req_id.to_string(),
            kind,
            text: text.to_string(),
        };
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = append_entry(path, &entry) {
            debug!("session log write failed: {e}");
        }
    }
}

fn append_entry(path: &PathBuf, entry: &LogEntry) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{json}")
}

/// Priority: explicit override, XDG state dir, ~/.local/state.
fn discover_log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("ALICE_SHELL_LOG_FILE") {
        return Some(PathBuf::from(path));
    }
    if let Some(state) = dirs::state_dir() {
        return Some(state.join("alice-shell").join("session.jsonl"));
    }
    dirs::home_dir().map(|home| {
        home.join(".local")
            .join("state")
            .join("alice-shell")
            .join("session.jsonl")
    })
}
