//! Command-line argument parsing
//!
//! Flags are run-only overrides of the persisted settings: nothing here is
//! written back to disk unless the user later confirms a save.

use alice_common::settings::{BufferMode, ReasoningLevel};
use clap::Parser;
use std::path::PathBuf;

/// Voice-enabled shell console in front of the codex CLI
#[derive(Debug, Parser)]
#[command(name = "alice-shell")]
#[command(about = "Voice/typed command console with codex-backed suggestions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the settings and voice profile files
    /// (default: the platform config dir, e.g. ~/.config/alice-shell)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Assistant name for this run
    #[arg(long)]
    pub name: Option<String>,

    /// Model passed to the codex CLI
    #[arg(long)]
    pub model: Option<String>,

    /// Reasoning effort: none, low, medium, high
    #[arg(long, value_parser = parse_reasoning)]
    pub reasoning: Option<ReasoningLevel>,

    /// History slice for suggestions: session, anchor, last
    #[arg(long, value_parser = parse_buffer)]
    pub buffer: Option<BufferMode>,

    /// Disable guided (spoken) feedback for this run
    #[arg(long)]
    pub unguided: bool,

    /// Plain output, no colors
    #[arg(long)]
    pub plain: bool,

    /// Start with transcript listening enabled
    #[arg(long)]
    pub listen: bool,

    /// Verbose (debug-level) logging to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

fn parse_reasoning(word: &str) -> Result<ReasoningLevel, String> {
    ReasoningLevel::parse(word).ok_or_else(|| format!("unknown reasoning level: {word}"))
}

fn parse_buffer(word: &str) -> Result<BufferMode, String> {
    BufferMode::parse(word).ok_or_else(|| format!("unknown buffer mode: {word}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_all_absent() {
        let cli = Cli::parse_from(["alice-shell"]);
        assert!(cli.config_dir.is_none());
        assert!(cli.name.is_none());
        assert!(!cli.unguided);
        assert!(!cli.listen);
    }

    #[test]
    fn test_overrides_parse() {
        let cli = Cli::parse_from([
            "alice-shell",
            "--name",
            "Nova",
            "--model",
            "gpt-4o",
            "--reasoning",
            "high",
            "--buffer",
            "last",
            "--unguided",
            "--plain",
        ]);
        assert_eq!(cli.name.as_deref(), Some("Nova"));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        assert_eq!(cli.reasoning, Some(ReasoningLevel::High));
        assert_eq!(cli.buffer, Some(BufferMode::Last));
        assert!(cli.unguided);
        assert!(cli.plain);
    }

    #[test]
    fn test_bad_reasoning_rejected() {
        assert!(Cli::try_parse_from(["alice-shell", "--reasoning", "extreme"]).is_err());
    }
}
