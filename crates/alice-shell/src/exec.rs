//! OS shell execution boundary
//!
//! Takes a single literal command string plus the working directory,
//! returns exit code and captured output. The console never interprets
//! shell syntax itself; errors come back exactly as received and are never
//! retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tokio::process::Command;

/// Cap on captured stdout/stderr, to keep one runaway command from
/// swallowing the session.
pub const MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// Outcome of one shell command, without interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecOutcome {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stdout_truncated: bool,
    pub stderr: String,
    pub stderr_truncated: bool,
    pub duration_ms: u64,
}

impl ExecOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Seam between the controller and the operating system. Mocked in tests;
/// candidate actions classified Internal or VoiceInvocation must never
/// reach an implementor of this trait.
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    async fn run(&self, command: &str) -> anyhow::Result<ExecOutcome>;
}

/// Production executor: `sh -c <command>` in a fixed working directory.
pub struct OsShellExecutor {
    working_dir: PathBuf,
}

impl OsShellExecutor {
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }
}

#[async_trait]
impl ShellExecutor for OsShellExecutor {
    async fn run(&self, command: &str) -> anyhow::Result<ExecOutcome> {
        let start = Instant::now();
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.working_dir)
            .output()
            .await?;

        let (stdout, stdout_truncated) = truncate_output(&output.stdout);
        let (stderr, stderr_truncated) = truncate_output(&output.stderr);

        Ok(ExecOutcome {
            command: command.to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout,
            stdout_truncated,
            stderr,
            stderr_truncated,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

fn truncate_output(bytes: &[u8]) -> (String, bool) {
    let text = String::from_utf8_lossy(bytes);
    if text.len() <= MAX_OUTPUT_BYTES {
        return (text.into_owned(), false);
    }
    let mut cut = MAX_OUTPUT_BYTES;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    (text[..cut].to_string(), true)
}
