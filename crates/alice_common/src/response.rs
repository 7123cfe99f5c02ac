//! Structured model-reply parsing
//!
//! The model is instructed to answer with exactly two recognized lines,
//! order independent: one starting `CMD: ` and one `EXPL: `. Anything else
//! is ignored. A reply without a usable command is a recoverable failure,
//! never a partial result.

use thiserror::Error;

const CMD_MARKER: &str = "CMD:";
const EXPL_MARKER: &str = "EXPL:";

/// A successfully parsed (command, explanation) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub command: String,
    pub explanation: String,
}

/// Why a model reply could not be turned into a candidate action
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("reply contains no CMD: line")]
    MissingCommand,
    #[error("reply contains no EXPL: line")]
    MissingExplanation,
    #[error("CMD: line is empty")]
    EmptyCommand,
}

/// Extract the first `CMD:` and first `EXPL:` line from raw model output.
///
/// Markers are matched case-sensitively at the start of each trimmed line.
/// Extra lines are not an error. An explanation without a command is not
/// actionable, so both markers are required and the command must be
/// non-empty after trimming.
pub fn parse_reply(raw: &str) -> Result<ParsedReply, ParseError> {
    let mut command: Option<&str> = None;
    let mut explanation: Option<&str> = None;

    for line in raw.lines() {
        let line = line.trim();
        if command.is_none() {
            if let Some(rest) = line.strip_prefix(CMD_MARKER) {
                command = Some(rest.trim());
                continue;
            }
        }
        if explanation.is_none() {
            if let Some(rest) = line.strip_prefix(EXPL_MARKER) {
                explanation = Some(rest.trim());
            }
        }
    }

    let command = command.ok_or(ParseError::MissingCommand)?;
    let explanation = explanation.ok_or(ParseError::MissingExplanation)?;

    if command.is_empty() {
        return Err(ParseError::EmptyCommand);
    }

    Ok(ParsedReply {
        command: command.to_string(),
        explanation: explanation.to_string(),
    })
}
