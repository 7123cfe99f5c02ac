//! Codex CLI client
//!
//! The language model lives behind the `codex` binary. One prompt in, raw
//! text out; the call blocks dispatch until it completes and is never
//! retried or cancelled by a watchdog. A missing binary gets an install
//! hint instead of a bare OS error.

use alice_common::settings::ReasoningLevel;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Seam to the external model CLI. Mocked in controller tests.
#[async_trait]
pub trait CodexClient: Send + Sync {
    /// Send one prompt, get the raw reply text.
    async fn complete(&self, model: &str, reasoning: ReasoningLevel, prompt: &str)
        -> Result<String>;
}

/// Production client spawning `codex exec`.
pub struct CodexCliClient;

impl CodexCliClient {
    pub fn new() -> Self {
        Self
    }

    fn build_args(model: &str, reasoning: ReasoningLevel, prompt: &str) -> Vec<String> {
        vec![
            "exec".to_string(),
            "--skip-git-repo-check".to_string(),
            "--model".to_string(),
            model.to_string(),
            "--config".to_string(),
            format!("model_reasoning_effort=\"{}\"", reasoning.as_str()),
            prompt.to_string(),
        ]
    }
}

impl Default for CodexCliClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodexClient for CodexCliClient {
    async fn complete(
        &self,
        model: &str,
        reasoning: ReasoningLevel,
        prompt: &str,
    ) -> Result<String> {
        let args = Self::build_args(model, reasoning, prompt);
        debug!(model, reasoning = reasoning.as_str(), "invoking codex CLI");

        let output = match Command::new("codex").args(&args).output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!(
                    "'codex' CLI not found. Install with 'npm install -g @openai/codex' \
                     and run 'codex login'."
                );
            }
            Err(e) => return Err(e).context("failed to run codex"),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "codex exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                if stderr.trim().is_empty() {
                    "(no stderr)"
                } else {
                    stderr.trim()
                }
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() {
            bail!("codex returned no output");
        }
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_shape() {
        let args = CodexCliClient::build_args("gpt-5", ReasoningLevel::High, "list files");
        assert_eq!(args[0], "exec");
        assert!(args.contains(&"--skip-git-repo-check".to_string()));
        assert!(args.contains(&"gpt-5".to_string()));
        assert!(args.contains(&"model_reasoning_effort=\"high\"".to_string()));
        assert_eq!(args.last().unwrap(), "list files");
    }
}
