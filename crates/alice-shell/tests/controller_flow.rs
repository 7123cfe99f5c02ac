//! End-to-end controller flows with mock codex and executor seams.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use alice_common::history::EntryKind;
use alice_common::profile::VoiceProfile;
use alice_common::session::{GatedAction, Mode, Session};
use alice_common::settings::{BufferMode, ReasoningLevel, Settings};
use anyhow::{bail, Result};
use async_trait::async_trait;

use alice_shell::codex::CodexClient;
use alice_shell::controller::ModeController;
use alice_shell::display::Display;
use alice_shell::exec::{ExecOutcome, ShellExecutor};
use alice_shell::session_log::SessionLog;
use alice_shell::voice::NullSpeaker;

/// Codex seam returning scripted replies in order; records every prompt.
#[derive(Clone, Default)]
struct ScriptedCodex {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedCodex {
    fn reply(self, raw: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(raw.to_string()));
        self
    }

    fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodexClient for ScriptedCodex {
    async fn complete(
        &self,
        _model: &str,
        _reasoning: ReasoningLevel,
        prompt: &str,
    ) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(message)) => bail!("{message}"),
            None => bail!("no scripted reply left"),
        }
    }
}

/// Executor seam that records commands and always succeeds.
#[derive(Clone, Default)]
struct RecordingExecutor {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingExecutor {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShellExecutor for RecordingExecutor {
    async fn run(&self, command: &str) -> Result<ExecOutcome> {
        self.calls.lock().unwrap().push(command.to_string());
        Ok(ExecOutcome {
            command: command.to_string(),
            exit_code: 0,
            stdout: "ok\n".to_string(),
            stdout_truncated: false,
            stderr: String::new(),
            stderr_truncated: false,
            duration_ms: 1,
        })
    }
}

fn controller(codex: ScriptedCodex, exec: RecordingExecutor) -> ModeController {
    controller_at(
        codex,
        exec,
        std::env::temp_dir().join("alice_shell_flow_settings.json"),
    )
}

fn controller_at(
    codex: ScriptedCodex,
    exec: RecordingExecutor,
    settings_path: std::path::PathBuf,
) -> ModeController {
    let session = Session::new(Settings::default(), VoiceProfile::default());
    ModeController::new(
        session,
        Display::new(false),
        SessionLog::new(false),
        Box::new(codex),
        Box::new(exec),
        Box::new(NullSpeaker),
        settings_path,
    )
}

/// Put something in the history buffer so a shell suggestion has context
/// to analyze (otherwise the empty-context no-op guard kicks in).
async fn seed(c: &mut ModeController) {
    c.handle_typed("v-help").await.unwrap();
    assert!(!c.session().history.is_empty());
}

fn output_entries(c: &ModeController) -> usize {
    c.session()
        .history
        .slice(BufferMode::Session)
        .iter()
        .filter(|e| e.kind == EntryKind::Output)
        .count()
}

const LS_REPLY: &str = "CMD: ls -la\nEXPL: List all files with details.";

#[tokio::test]
async fn test_suggestion_reaches_confirmation() {
    let codex = ScriptedCodex::default().reply(LS_REPLY);
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());
    seed(&mut c).await;

    c.handle_typed("v-command").await.unwrap();

    assert_eq!(
        c.session().mode,
        Mode::AwaitingConfirmation(GatedAction::ExecutePending)
    );
    assert_eq!(c.session().pending().unwrap().candidate, "ls -la");
    assert!(exec.calls().is_empty(), "nothing runs before confirmation");
}

#[tokio::test]
async fn test_affirm_executes_and_returns_idle() {
    let codex = ScriptedCodex::default().reply(LS_REPLY);
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());
    seed(&mut c).await;

    c.handle_typed("v-command").await.unwrap();
    let before = output_entries(&c);
    c.handle_typed("yes").await.unwrap();

    assert_eq!(exec.calls(), vec!["ls -la".to_string()]);
    assert_eq!(c.session().mode, Mode::Idle);
    assert!(c.session().pending().is_none());
    assert_eq!(output_entries(&c), before + 1, "one entry per execution");
}

#[tokio::test]
async fn test_deny_cancels_without_executing() {
    let codex = ScriptedCodex::default().reply(LS_REPLY);
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());
    seed(&mut c).await;

    c.handle_typed("v-command").await.unwrap();
    c.handle_typed("no").await.unwrap();

    assert!(exec.calls().is_empty());
    assert_eq!(c.session().mode, Mode::Idle);
    assert!(c.session().pending().is_none());
}

#[tokio::test]
async fn test_ambiguous_replies_keep_waiting() {
    let codex = ScriptedCodex::default().reply(LS_REPLY);
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());
    seed(&mut c).await;

    c.handle_typed("v-command").await.unwrap();
    for reply in ["maybe", "hmm", "yes please run it", "what was it again"] {
        c.handle_typed(reply).await.unwrap();
        assert_eq!(
            c.session().mode,
            Mode::AwaitingConfirmation(GatedAction::ExecutePending),
            "{reply:?} must not resolve the confirmation"
        );
        assert!(c.session().pending().is_some());
    }
    c.handle_typed("yeah").await.unwrap();
    assert_eq!(exec.calls(), vec!["ls -la".to_string()]);
}

#[tokio::test]
async fn test_malformed_reply_stays_idle() {
    let codex = ScriptedCodex::default().reply("just run ls, trust me");
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());
    seed(&mut c).await;

    c.handle_typed("v-command").await.unwrap();

    assert_eq!(c.session().mode, Mode::Idle);
    assert!(c.session().pending().is_none());
    assert!(exec.calls().is_empty());
}

#[tokio::test]
async fn test_codex_failure_is_reported_not_fatal() {
    let codex = ScriptedCodex::default().fail("network down");
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());
    seed(&mut c).await;

    c.handle_typed("v-command").await.unwrap();

    assert_eq!(c.session().mode, Mode::Idle);
    assert!(c.session().pending().is_none());
    // The failure still counts as a completed round-trip for `last` mode.
    assert_eq!(
        c.session().history.last_interaction_index(),
        c.session().history.len()
    );
}

#[tokio::test]
async fn test_voice_candidate_never_reaches_shell() {
    let codex =
        ScriptedCodex::default().reply("CMD: Alice history\nEXPL: Show the history preview.");
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());

    c.handle_typed("v-voicecmd").await.unwrap();
    c.handle_typed("yes").await.unwrap();

    assert!(exec.calls().is_empty(), "voice invocations must not hit sh");
    assert_eq!(c.session().mode, Mode::Idle);
}

#[tokio::test]
async fn test_internal_candidate_dispatches_internally() {
    let codex =
        ScriptedCodex::default().reply("CMD: v-buffer last\nEXPL: Use the most recent slice.");
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());

    c.handle_typed("v-voicecmd").await.unwrap();
    c.handle_typed("yes").await.unwrap();

    assert!(exec.calls().is_empty());
    assert_eq!(c.session().settings.buffer_mode, BufferMode::Last);
}

#[tokio::test]
async fn test_new_suggestion_replaces_pending() {
    let codex = ScriptedCodex::default()
        .reply(LS_REPLY)
        .reply("CMD: df -h\nEXPL: Show disk usage.");
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());
    seed(&mut c).await;

    c.handle_typed("v-command").await.unwrap();
    assert_eq!(c.session().pending().unwrap().candidate, "ls -la");
    c.handle_typed("no").await.unwrap();
    c.handle_typed("v-command").await.unwrap();

    // Single slot: only the latest candidate exists.
    assert_eq!(c.session().pending().unwrap().candidate, "df -h");
    c.handle_typed("yes").await.unwrap();
    assert_eq!(exec.calls(), vec!["df -h".to_string()]);
}

#[tokio::test]
async fn test_direct_shell_lines_are_literal() {
    let exec = RecordingExecutor::default();
    let mut c = controller(ScriptedCodex::default(), exec.clone());

    // Even a line starting with the assistant name is literal when typed.
    c.handle_typed("Alice --version").await.unwrap();
    c.handle_typed("echo hi").await.unwrap();

    assert_eq!(
        exec.calls(),
        vec!["Alice --version".to_string(), "echo hi".to_string()]
    );
    assert_eq!(c.session().mode, Mode::Idle);
}

#[tokio::test]
async fn test_empty_buffer_and_goal_is_local_noop() {
    let codex = ScriptedCodex::default().reply(LS_REPLY);
    let exec = RecordingExecutor::default();
    let mut c = controller(codex.clone(), exec);

    c.handle_typed("v-command").await.unwrap();

    assert!(codex.prompts().is_empty(), "no request for an empty context");
    assert_eq!(c.session().mode, Mode::Idle);
}

#[tokio::test]
async fn test_prompt_editing_by_voice() {
    let codex = ScriptedCodex::default().reply(LS_REPLY);
    let exec = RecordingExecutor::default();
    let mut c = controller(codex.clone(), exec);

    c.handle_transcript("alice prompt").await.unwrap();
    assert_eq!(c.session().mode, Mode::PromptEditing);

    // Dictation needs no wake word while editing.
    c.handle_transcript("list the biggest files").await.unwrap();
    c.handle_transcript("in my home directory").await.unwrap();
    c.handle_transcript("done").await.unwrap();

    assert_eq!(c.session().mode, Mode::Idle);
    assert_eq!(
        c.session().prompt_text,
        "list the biggest files in my home directory"
    );

    // The drafted goal is embedded in the next request.
    c.handle_transcript("alice shell command").await.unwrap();
    let prompts = codex.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("list the biggest files"));
}

#[tokio::test]
async fn test_typed_empty_line_finishes_editing() {
    let mut c = controller(ScriptedCodex::default(), RecordingExecutor::default());

    c.handle_typed("v-prompt").await.unwrap();
    c.handle_typed("clean up docker images").await.unwrap();
    c.handle_typed("").await.unwrap();

    assert_eq!(c.session().mode, Mode::Idle);
    assert_eq!(c.session().prompt_text, "clean up docker images");
}

#[tokio::test]
async fn test_non_wake_speech_ignored_in_idle() {
    let exec = RecordingExecutor::default();
    let mut c = controller(ScriptedCodex::default(), exec.clone());

    c.handle_transcript("echo hi").await.unwrap();
    c.handle_transcript("um").await.unwrap();

    assert!(exec.calls().is_empty());
    assert_eq!(c.session().mode, Mode::Idle);
    assert!(c.session().history.is_empty());
}

#[tokio::test]
async fn test_exit_requires_confirmation() {
    let mut c = controller(ScriptedCodex::default(), RecordingExecutor::default());

    c.handle_typed("exit").await.unwrap();
    assert_eq!(
        c.session().mode,
        Mode::AwaitingConfirmation(GatedAction::Exit)
    );

    c.handle_typed("nope").await.unwrap();
    assert_eq!(c.session().mode, Mode::Idle);
    assert!(!c.terminated());

    c.handle_typed("v-exit").await.unwrap();
    c.handle_typed("yes").await.unwrap();
    assert!(c.terminated());
    assert!(!c.wants_listening());

    // Terminated is absorbing.
    c.handle_typed("echo hi").await.unwrap();
    assert!(c.terminated());
}

#[tokio::test]
async fn test_save_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut c = controller_at(
        ScriptedCodex::default(),
        RecordingExecutor::default(),
        path.clone(),
    );

    c.handle_typed("v-buffer last").await.unwrap();
    c.handle_typed("v-save").await.unwrap();
    assert_eq!(
        c.session().mode,
        Mode::AwaitingConfirmation(GatedAction::SaveSettings)
    );
    c.handle_typed("yes").await.unwrap();

    let saved = Settings::load(&path);
    assert_eq!(saved.buffer_mode, BufferMode::Last);
}

#[tokio::test]
async fn test_rename_moves_the_wake_word() {
    let codex = ScriptedCodex::default();
    let mut c = controller(codex, RecordingExecutor::default());

    c.handle_typed("v-rename Nova").await.unwrap();
    assert_eq!(c.session().settings.assistant_name, "Nova");

    let before = c.session().history.len();
    c.handle_transcript("alice settings").await.unwrap();
    assert_eq!(c.session().history.len(), before, "old name no longer wakes");

    c.handle_transcript("nova prompt").await.unwrap();
    assert_eq!(c.session().mode, Mode::PromptEditing);
}

#[tokio::test]
async fn test_buffer_clear_is_gated_and_moves_anchor() {
    let exec = RecordingExecutor::default();
    let mut c = controller(ScriptedCodex::default(), exec);

    c.handle_typed("echo one").await.unwrap();
    let len_before = c.session().history.len();
    c.handle_typed("v-clear").await.unwrap();
    assert_eq!(
        c.session().mode,
        Mode::AwaitingConfirmation(GatedAction::ClearBuffer)
    );
    c.handle_typed("yes").await.unwrap();

    assert_eq!(c.session().settings.buffer_mode, BufferMode::Anchor);
    assert!(c.session().history.anchor_index() >= len_before);
    // Append-only: nothing was deleted.
    assert!(c.session().history.len() >= len_before);
}

#[tokio::test]
async fn test_listening_toggle_tracks_commands() {
    let mut c = controller(ScriptedCodex::default(), RecordingExecutor::default());
    assert!(!c.wants_listening());

    c.handle_typed("v-listen").await.unwrap();
    assert!(c.wants_listening());

    c.handle_transcript("alice stop listening").await.unwrap();
    assert!(!c.wants_listening());
}

#[tokio::test]
async fn test_gated_confirmation_is_recorded_in_history() {
    let mut c = controller(ScriptedCodex::default(), RecordingExecutor::default());

    // Entering confirmation is a mode transition; it must leave a trace
    // in the buffer, not just on the terminal.
    let before = c.session().history.len();
    c.handle_typed("v-save").await.unwrap();
    assert_eq!(
        c.session().mode,
        Mode::AwaitingConfirmation(GatedAction::SaveSettings)
    );
    assert!(
        c.session().history.len() > before,
        "Idle -> AwaitingConfirmation must append a history entry"
    );

    c.handle_typed("no").await.unwrap();
    let before = c.session().history.len();
    c.handle_typed("exit").await.unwrap();
    assert!(c.session().history.len() > before);
    c.handle_typed("no").await.unwrap();
}

#[tokio::test]
async fn test_buffer_query_is_recorded_in_history() {
    let mut c = controller(ScriptedCodex::default(), RecordingExecutor::default());

    let before = c.session().history.len();
    c.handle_typed("v-buffer").await.unwrap();
    assert_eq!(c.session().mode, Mode::Idle);
    assert!(
        c.session().history.len() > before,
        "pure queries still land in the buffer"
    );
}

#[tokio::test]
async fn test_self_test_never_executes_commands() {
    let codex = ScriptedCodex::default().reply(LS_REPLY);
    let exec = RecordingExecutor::default();
    let mut c = controller(codex, exec.clone());

    c.handle_typed("v-test both").await.unwrap();

    assert!(exec.calls().is_empty(), "self-test must not reach the OS");
    assert_eq!(c.session().mode, Mode::Idle);
    assert!(c.session().pending().is_none());
}
