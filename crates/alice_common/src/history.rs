//! Terminal history buffer with anchor/slice queries
//!
//! Append-only log of everything the console printed or the user entered.
//! Suggestion requests embed a slice of this buffer as model context; the
//! active `BufferMode` picks which suffix is sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::BufferMode;

/// Cap on how many rendered lines are embedded in a prompt. Older lines are
/// dropped from the render, never from the buffer itself.
pub const RENDER_LINE_CAP: usize = 400;

/// What produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A line the user typed or spoke
    Input,
    /// A line the console printed (command output, status, responses)
    Output,
}

/// One immutable line of terminal activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: EntryKind,
    pub text: String,
}

impl HistoryEntry {
    pub fn input(text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: EntryKind::Input,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: EntryKind::Output,
            text: text.into(),
        }
    }
}

/// Append-only sequence of history entries.
///
/// `anchor_index` only ever moves forward (explicit clear, or after a codex
/// interaction while in `last` mode). `last_interaction_index` moves after a
/// completed model round-trip or an executed command. Both are always
/// `<= entries.len()`, so every slice is a suffix of the full sequence.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    entries: Vec<HistoryEntry>,
    anchor_index: usize,
    last_interaction_index: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Never fails, always permitted.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }

    pub fn last_interaction_index(&self) -> usize {
        self.last_interaction_index
    }

    /// The suffix of entries selected by `mode`.
    pub fn slice(&self, mode: BufferMode) -> &[HistoryEntry] {
        let start = match mode {
            BufferMode::Session => 0,
            BufferMode::Anchor => self.anchor_index,
            BufferMode::Last => self.last_interaction_index,
        };
        &self.entries[start.min(self.entries.len())..]
    }

    /// Capture "now": future anchor slices start after the current end.
    pub fn reset_anchor(&mut self) {
        self.anchor_index = self.entries.len();
    }

    /// Record that a model round-trip or command execution just completed.
    pub fn mark_interaction(&mut self) {
        self.last_interaction_index = self.entries.len();
    }

    /// Render the selected slice as newline-joined text for prompt embedding,
    /// capped to the most recent [`RENDER_LINE_CAP`] lines.
    pub fn render(&self, mode: BufferMode) -> String {
        let slice = self.slice(mode);
        let start = slice.len().saturating_sub(RENDER_LINE_CAP);
        slice[start..]
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Numbered preview lines of the slice that would be sent, most recent
    /// `max_lines` only. Line numbers are positions within the slice.
    pub fn preview(&self, mode: BufferMode, max_lines: usize) -> Vec<String> {
        let slice = self.slice(mode);
        let start = slice.len().saturating_sub(max_lines);
        slice[start..]
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{:4}: {}", start + i + 1, e.text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> HistoryBuffer {
        let mut buf = HistoryBuffer::new();
        buf.append(HistoryEntry::input("ls"));
        buf.append(HistoryEntry::output("file.txt"));
        buf.append(HistoryEntry::input("pwd"));
        buf
    }

    #[test]
    fn test_slice_is_suffix_for_every_mode() {
        let mut buf = filled();
        buf.reset_anchor();
        buf.append(HistoryEntry::output("/home"));
        buf.mark_interaction();
        buf.append(HistoryEntry::input("whoami"));

        for mode in [BufferMode::Session, BufferMode::Anchor, BufferMode::Last] {
            let slice = buf.slice(mode);
            let full: Vec<&str> = buf
                .slice(BufferMode::Session)
                .iter()
                .map(|e| e.text.as_str())
                .collect();
            let got: Vec<&str> = slice.iter().map(|e| e.text.as_str()).collect();
            assert_eq!(&full[full.len() - got.len()..], got.as_slice());
        }
    }

    #[test]
    fn test_reset_anchor_empties_anchor_slice() {
        let mut buf = filled();
        buf.reset_anchor();
        assert!(buf.slice(BufferMode::Anchor).is_empty());
    }

    #[test]
    fn test_anchor_slice_sees_later_entries() {
        let mut buf = filled();
        buf.reset_anchor();
        buf.append(HistoryEntry::output("new line"));
        let texts: Vec<&str> = buf
            .slice(BufferMode::Anchor)
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, vec!["new line"]);
    }

    #[test]
    fn test_mark_interaction_moves_last_slice() {
        let mut buf = filled();
        buf.mark_interaction();
        assert!(buf.slice(BufferMode::Last).is_empty());
        buf.append(HistoryEntry::output("after"));
        assert_eq!(buf.slice(BufferMode::Last).len(), 1);
    }

    #[test]
    fn test_render_caps_line_count() {
        let mut buf = HistoryBuffer::new();
        for i in 0..(RENDER_LINE_CAP + 50) {
            buf.append(HistoryEntry::output(format!("line {i}")));
        }
        let rendered = buf.render(BufferMode::Session);
        assert_eq!(rendered.lines().count(), RENDER_LINE_CAP);
        assert!(rendered.starts_with("line 50"));
    }

    #[test]
    fn test_preview_numbers_positions() {
        let buf = filled();
        let lines = buf.preview(BufferMode::Session, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("2: file.txt"));
        assert!(lines[1].contains("3: pwd"));
    }
}
