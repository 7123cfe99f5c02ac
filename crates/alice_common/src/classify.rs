//! Candidate command classification
//!
//! Every candidate string — a freshly parsed model suggestion or a direct
//! keyboard/voice line — maps to exactly one kind. Internal and voice
//! invocations are never handed to the OS shell executor, regardless of
//! their content.

use serde::{Deserialize, Serialize};

/// Default prefix marking typed internal commands
pub const DEFAULT_INTERNAL_PREFIX: &str = "v-";

/// What a candidate string is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Internal,
    VoiceInvocation,
    ShellCommand,
}

/// A fully routed candidate. `Internal` and `Voice` carry the remainder
/// with the prefix / wake word stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Console-scoped command (prefix stripped): name plus arguments
    Internal { rest: String },
    /// Voice-style command: the words after the assistant name
    Voice { rest: String },
    /// Literal OS shell command
    Shell { command: String },
}

impl Routed {
    pub fn kind(&self) -> CommandKind {
        match self {
            Routed::Internal { .. } => CommandKind::Internal,
            Routed::Voice { .. } => CommandKind::VoiceInvocation,
            Routed::Shell { .. } => CommandKind::ShellCommand,
        }
    }
}

/// One classification step, in priority order: internal prefix, then
/// assistant name (case-insensitive, word boundary), then shell.
fn step(candidate: &str, prefix: &str, assistant_name: &str) -> Routed {
    let trimmed = candidate.trim();

    if let Some(rest) = trimmed.strip_prefix(prefix) {
        return Routed::Internal {
            rest: rest.trim().to_string(),
        };
    }

    if let Some(rest) = strip_wake_word(trimmed, assistant_name) {
        return Routed::Voice {
            rest: rest.trim().to_string(),
        };
    }

    Routed::Shell {
        command: trimmed.to_string(),
    }
}

/// Strip a leading assistant name if it is followed by a word boundary.
fn strip_wake_word<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let name = name.trim();
    if name.is_empty() || text.len() < name.len() {
        return None;
    }
    let (head, rest) = text.split_at(name.len());
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    // Word boundary: end of string or whitespace after the name.
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

/// Classify a candidate, re-dispatching a voice invocation's remainder at
/// most once.
///
/// The bounded loop (not recursion) guards against alias cycles, e.g. an
/// assistant accidentally renamed to its own internal prefix. A remainder
/// that would classify as a shell command stays a voice invocation: nothing
/// reached through rule 2 may cross into the OS executor.
pub fn route(candidate: &str, prefix: &str, assistant_name: &str) -> Routed {
    let mut current = step(candidate, prefix, assistant_name);
    for _depth in 0..1 {
        match current {
            Routed::Voice { ref rest } => {
                match step(rest, prefix, assistant_name) {
                    inner @ Routed::Internal { .. } => return inner,
                    // Voice invocations do not chain, and never become shell.
                    Routed::Voice { .. } | Routed::Shell { .. } => return current,
                }
            }
            other => return other,
        }
    }
    current
}
