//! Voice boundaries: transcript intake and speech output
//!
//! Speech recognition is an external background producer pushing completed
//! transcripts into a single-producer/single-consumer queue; the REPL is
//! the sole consumer. Text-to-speech is fire-and-forget. Neither side
//! shares state with the controller beyond these seams.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// One unit of work for the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line typed at the prompt
    Typed(String),
    /// A completed transcript from the recognizer (already lowercased)
    Transcript(String),
}

/// Producer-side handle given to the speech recognizer. When listening is
/// disabled the producer drops new transcripts; anything already queued
/// still reaches the consumer.
#[derive(Debug, Clone)]
pub struct TranscriptSender {
    tx: mpsc::Sender<String>,
    listening: Arc<AtomicBool>,
}

impl TranscriptSender {
    pub fn push(&self, transcript: String) {
        if !self.listening.load(Ordering::Relaxed) {
            debug!("listening disabled, dropping transcript");
            return;
        }
        if self.tx.try_send(transcript).is_err() {
            debug!("transcript queue full or closed, dropping");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

/// Consumer-side control owned by the REPL.
#[derive(Debug)]
pub struct TranscriptQueue {
    rx: mpsc::Receiver<String>,
    listening: Arc<AtomicBool>,
}

impl TranscriptQueue {
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    pub fn set_listening(&self, on: bool) {
        self.listening.store(on, Ordering::Relaxed);
    }
}

/// Create the SPSC boundary between recognizer and REPL. Listening starts
/// disabled until the controller turns it on.
pub fn transcript_channel(capacity: usize) -> (TranscriptSender, TranscriptQueue) {
    let (tx, rx) = mpsc::channel(capacity);
    let listening = Arc::new(AtomicBool::new(false));
    (
        TranscriptSender {
            tx,
            listening: listening.clone(),
        },
        TranscriptQueue { rx, listening },
    )
}

/// Fire-and-forget speech output. Invoking it never blocks dispatch;
/// overlapping requests are the engine's problem, not ours.
pub trait Speaker: Send + Sync {
    fn say(&self, text: &str);
}

/// Speaker used when no TTS engine is wired up.
pub struct NullSpeaker;

impl Speaker for NullSpeaker {
    fn say(&self, text: &str) {
        debug!("tts (disabled): {text}");
    }
}

/// Strip console decoration before text reaches the speech engine:
/// model/reasoning status lines and list bullets read badly aloud.
pub fn clean_for_speech(text: &str) -> String {
    let mut cleaned = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        if lower.starts_with("model:") || lower.starts_with("reasoning:") {
            continue;
        }
        let line = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")).unwrap_or(line);
        cleaned.push(line);
    }
    cleaned.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transcripts_flow_while_listening() {
        let (tx, mut queue) = transcript_channel(8);
        queue.set_listening(true);
        tx.push("hello".to_string());
        assert_eq!(queue.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_disabled_listening_drops_new_input() {
        let (tx, mut queue) = transcript_channel(8);
        queue.set_listening(true);
        tx.push("queued".to_string());
        // Stop listening: queued input survives, new input is dropped.
        queue.set_listening(false);
        tx.push("dropped".to_string());
        assert_eq!(queue.recv().await, Some("queued".to_string()));
        assert!(queue.rx.try_recv().is_err());
    }

    #[test]
    fn test_clean_for_speech() {
        let text = "Model: gpt-5\n- first point\n* second point\n\nplain line";
        assert_eq!(clean_for_speech(text), "first point second point plain line");
    }
}
