//! alice-shell entry point
//!
//! Loads settings and the voice profile, applies run-only CLI overrides,
//! then runs the REPL: one `select!` over typed stdin lines and the
//! transcript queue, feeding the mode controller one input at a time.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use alice_common::profile::{VoiceProfile, PROFILE_FILENAME};
use alice_common::session::Session;
use alice_common::settings::{Settings, SETTINGS_FILENAME};
use alice_shell::cli::Cli;
use alice_shell::codex::CodexCliClient;
use alice_shell::controller::ModeController;
use alice_shell::display::Display;
use alice_shell::exec::OsShellExecutor;
use alice_shell::session_log::SessionLog;
use alice_shell::voice::{transcript_channel, NullSpeaker};

fn config_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.config_dir {
        return dir.clone();
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("alice-shell")
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    // Stderr, so log lines never interleave with console output on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let dir = config_dir(&cli);
    let settings_path = dir.join(SETTINGS_FILENAME);
    let mut settings = Settings::load(&settings_path);

    if let Some(name) = &cli.name {
        settings.assistant_name = name.clone();
    }
    if let Some(model) = &cli.model {
        settings.model = model.clone();
    }
    if let Some(reasoning) = cli.reasoning {
        settings.reasoning = reasoning;
    }
    if let Some(buffer) = cli.buffer {
        settings.buffer_mode = buffer;
    }
    if cli.unguided {
        settings.guided = false;
    }
    if cli.plain {
        settings.fancy_output = false;
    }

    let profile = VoiceProfile::load(&dir.join(PROFILE_FILENAME));
    debug!("config dir: {}", dir.display());

    let display = Display::new(settings.fancy_output);
    let log = SessionLog::new(settings.log_prompts);
    let mut session = Session::new(settings, profile);
    session.listening = cli.listen;

    // Producer handle for an external speech recognizer. Held for the whole
    // run so the queue stays open even before a recognizer is wired in.
    let (_recognizer, mut transcripts) = transcript_channel(32);

    let mut controller = ModeController::new(
        session,
        display,
        log,
        Box::new(CodexCliClient::new()),
        Box::new(OsShellExecutor::new(std::env::current_dir()?)),
        Box::new(NullSpeaker),
        settings_path,
    );
    controller.print_banner();
    transcripts.set_listening(controller.wants_listening());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => controller.handle_typed(&line).await?,
                    None => break,
                }
            }
            Some(transcript) = transcripts.recv() => {
                controller.handle_transcript(&transcript).await?;
            }
        }
        transcripts.set_listening(controller.wants_listening());
        if controller.terminated() {
            break;
        }
    }
    Ok(())
}
