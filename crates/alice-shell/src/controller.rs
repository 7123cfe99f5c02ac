//! Mode controller - command routing and confirmation state machine
//!
//! Single point of truth for "what happens next" given an input line. The
//! controller owns the `Session` and is its only mutator: typed lines and
//! transcripts arrive one at a time, are dispatched fully, and only then is
//! the next input accepted. The codex call is the sole blocking operation
//! inside dispatch; the mode does not change while it is outstanding.

use std::path::PathBuf;

use alice_common::classify::{route, Routed, DEFAULT_INTERNAL_PREFIX};
use alice_common::composer::{self, SuggestionKind};
use alice_common::confirm::Decision;
use alice_common::history::HistoryEntry;
use alice_common::response::parse_reply;
use alice_common::session::{GatedAction, Mode, PendingAction, Session};
use alice_common::settings::{BufferMode, TTS_SPEED_STEP};
use anyhow::Result;
use tracing::debug;

use crate::codex::CodexClient;
use crate::commands::{
    parse_typed, parse_voice, ConsoleCommand, ModelChange, SpeedChange, TestScope,
};
use crate::display::{banner_lines, settings_lines, Display};
use crate::exec::ShellExecutor;
use crate::session_log::{LogKind, SessionLog};
use crate::voice::{clean_for_speech, Speaker};

/// Transcript fragments dropped as recognition noise.
const FILLER_WORDS: [&str; 3] = ["huh", "uh", "um"];

pub struct ModeController {
    session: Session,
    display: Display,
    log: SessionLog,
    codex: Box<dyn CodexClient>,
    executor: Box<dyn ShellExecutor>,
    speaker: Box<dyn Speaker>,
    settings_path: PathBuf,
}

impl ModeController {
    pub fn new(
        session: Session,
        display: Display,
        log: SessionLog,
        codex: Box<dyn CodexClient>,
        executor: Box<dyn ShellExecutor>,
        speaker: Box<dyn Speaker>,
        settings_path: PathBuf,
    ) -> Self {
        Self {
            session,
            display,
            log,
            codex,
            executor,
            speaker,
            settings_path,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn terminated(&self) -> bool {
        self.session.terminated()
    }

    /// Whether the background transcript producer should currently run.
    pub fn wants_listening(&self) -> bool {
        self.session.listening && !self.session.terminated()
    }

    pub fn print_banner(&mut self) {
        for line in banner_lines(&self.session.settings) {
            self.display.print(&line);
        }
        self.print_status();
    }

    // --- Input entry points ---------------------------------------------

    /// Dispatch one typed line. Direct shell lines are always literal: in
    /// `Idle` they bypass the classifier entirely.
    pub async fn handle_typed(&mut self, line: &str) -> Result<()> {
        if self.session.terminated() {
            return Ok(());
        }
        let line = line.trim().to_string();

        match self.session.mode {
            Mode::AwaitingConfirmation(gated) => self.handle_confirmation(&line, gated).await?,
            Mode::PromptEditing => {
                if line.is_empty() {
                    self.finish_prompt_editing();
                } else if let Some(rest) = line.strip_prefix(DEFAULT_INTERNAL_PREFIX) {
                    // Internal commands stay commands even while editing.
                    let cmd = parse_typed(rest);
                    self.dispatch(cmd).await?;
                } else {
                    self.append_prompt_fragment(&line);
                }
            }
            Mode::Idle => {
                if line.is_empty() {
                    return Ok(());
                }
                if let Some(rest) = line.strip_prefix(DEFAULT_INTERNAL_PREFIX) {
                    let cmd = parse_typed(rest);
                    self.dispatch(cmd).await?;
                } else if line == "exit" || line == "quit" {
                    self.request_confirmation(
                        GatedAction::Exit,
                        "Exit voice shell? Say yes or no.",
                    );
                } else {
                    // Direct shell lines are literal: no classification, and
                    // both the line and its outcome land in the buffer.
                    self.session.history.append(HistoryEntry::input(line.as_str()));
                    self.run_shell(&line).await?;
                }
            }
            Mode::Terminated => {}
        }
        Ok(())
    }

    /// Dispatch one completed transcript (already lowercased by the
    /// recognizer). Speech that does not carry the wake word is dictation
    /// while editing and ignored otherwise.
    pub async fn handle_transcript(&mut self, text: &str) -> Result<()> {
        if self.session.terminated() {
            return Ok(());
        }
        let text = text.trim().to_string();
        if text.is_empty() || FILLER_WORDS.contains(&text.as_str()) {
            debug!("dropped filler transcript: {text:?}");
            return Ok(());
        }

        match self.session.mode {
            Mode::AwaitingConfirmation(gated) => self.handle_confirmation(&text, gated).await?,
            Mode::PromptEditing => {
                if let Some(rest) = self.strip_spoken_wake(&text) {
                    let cmd = parse_voice(&rest);
                    self.dispatch(cmd).await?;
                } else if matches!(text.as_str(), "done" | "enter") {
                    self.finish_prompt_editing();
                } else {
                    self.append_prompt_fragment(&text);
                }
            }
            Mode::Idle => {
                if let Some(rest) = self.strip_spoken_wake(&text) {
                    let cmd = parse_voice(&rest);
                    self.dispatch(cmd).await?;
                } else {
                    debug!("ignored non-wake speech: {text:?}");
                }
            }
            Mode::Terminated => {}
        }
        Ok(())
    }

    /// Strip a leading wake-word variant (assistant name or calibrated
    /// alias) from spoken text.
    fn strip_spoken_wake(&self, text: &str) -> Option<String> {
        let mut split = text.splitn(2, char::is_whitespace);
        let head = split.next()?.to_lowercase();
        let variants = self
            .session
            .profile
            .wake_variants(&self.session.settings.assistant_name);
        if variants.contains(&head) {
            Some(split.next().unwrap_or("").trim().to_string())
        } else {
            None
        }
    }

    // --- Confirmation ----------------------------------------------------

    async fn handle_confirmation(&mut self, input: &str, gated: GatedAction) -> Result<()> {
        let profile = self.session.profile.clone();
        let decision = self.session.guard_mut().decide(input, &profile);
        match decision {
            Decision::Affirm => self.apply_gated(gated).await?,
            Decision::Deny => {
                self.emit("[CONFIRM] Cancelled.");
                self.speak("Cancelled.");
                self.session.clear_pending();
                self.session.mode = Mode::Idle;
                self.print_status();
            }
            Decision::Ambiguous => {
                self.display.print("[CONFIRM] Please say yes or no.");
                self.speak("Please say yes or no.");
            }
        }
        Ok(())
    }

    fn request_confirmation(&mut self, gated: GatedAction, message: &str) {
        self.session.await_confirmation(gated);
        // The transition into confirmation is buffered like any other
        // mode change, so the prompt shows up in later history slices.
        self.emit(&format!("[CONFIRM] {message}"));
        self.speak(message);
    }

    async fn apply_gated(&mut self, gated: GatedAction) -> Result<()> {
        match gated {
            GatedAction::ExecutePending => {
                self.session.mode = Mode::Idle;
                self.execute_pending().await?;
            }
            GatedAction::Exit => {
                self.session.listening = false;
                self.session.clear_pending();
                self.session.mode = Mode::Terminated;
                self.display.print("[SHELL] Exit confirmed.");
                self.speak("Exiting voice shell.");
            }
            GatedAction::SaveSettings => {
                self.session.mode = Mode::Idle;
                match self.session.settings.save(&self.settings_path) {
                    Ok(()) => {
                        self.emit(&format!(
                            "[SHELL] Settings saved to {}",
                            self.settings_path.display()
                        ));
                        self.speak("Settings saved.");
                    }
                    Err(e) => {
                        self.emit(&format!("[SHELL] Failed to save settings: {e}"));
                    }
                }
            }
            GatedAction::ClearBuffer => {
                self.session.mode = Mode::Idle;
                self.session.history.reset_anchor();
                self.session.settings.buffer_mode = BufferMode::Anchor;
                self.emit("[SHELL] Buffer anchor set; suggestions will use history after this point.");
                self.speak("Buffer cleared for suggestions.");
            }
            GatedAction::EnableRecordings => {
                self.session.mode = Mode::Idle;
                self.session.settings.save_recordings = true;
                self.emit("[VOICE] Saving recordings enabled.");
                self.speak("I will save future speech recordings.");
            }
            GatedAction::EnableLogPrompts => {
                self.session.mode = Mode::Idle;
                self.session.settings.log_prompts = true;
                self.log.set_enabled(true);
                self.emit("[VOICE] Prompt and response logging enabled.");
                self.speak("I will log prompts and responses.");
            }
        }
        self.print_status();
        Ok(())
    }

    // --- Suggestion round-trip -------------------------------------------

    async fn request_suggestion(&mut self, origin: SuggestionKind) -> Result<()> {
        let goal = self.session.prompt_text.clone();
        let mode = self.session.settings.buffer_mode;
        let history = self.session.history.render(mode);

        if origin == SuggestionKind::ShellSuggestion
            && goal.trim().is_empty()
            && history.is_empty()
        {
            self.emit("[SHELL] No history or prompt to analyze.");
            self.speak("There is no buffer or prompt yet.");
            return Ok(());
        }

        // A new request invalidates whatever candidate was pending.
        self.session.clear_pending();

        let name = self.session.settings.assistant_name.clone();
        let prompt = match origin {
            SuggestionKind::ShellSuggestion => composer::shell_suggestion(&goal, &history, mode),
            SuggestionKind::VoiceSuggestion => {
                composer::voice_suggestion(&goal, &history, &name, DEFAULT_INTERNAL_PREFIX)
            }
        };

        let req_id = SessionLog::generate_req_id();
        self.log.record(&req_id, LogKind::Prompt, &prompt);
        self.display.print("[SHELL] Running codex, please wait...");

        let model = self.session.settings.model.clone();
        let reasoning = self.session.settings.reasoning;
        let reply = self.codex.complete(&model, reasoning, &prompt).await;

        match reply {
            Err(e) => {
                self.emit(&format!("[SHELL] Codex request failed: {e:#}"));
                self.speak("The codex request failed.");
                self.session.history.mark_interaction();
            }
            Ok(raw) => {
                self.log.record(&req_id, LogKind::Response, &raw);
                self.session.last_response = Some(raw.clone());
                self.session.history.append(HistoryEntry::output(raw.clone()));
                self.session.history.mark_interaction();

                match parse_reply(&raw) {
                    Err(e) => {
                        self.emit(&format!(
                            "[SHELL] Could not extract a command from the response: {e}"
                        ));
                        self.speak("I could not extract a single command from the response.");
                    }
                    Ok(parsed) => {
                        let routed = route(&parsed.command, DEFAULT_INTERNAL_PREFIX, &name);
                        let action = PendingAction {
                            origin,
                            candidate: parsed.command.clone(),
                            explanation: parsed.explanation.clone(),
                            kind: routed.kind(),
                            needs_confirmation: true,
                        };
                        self.display
                            .print(&format!("[SHELL] Proposed command: {}", parsed.command));
                        if !parsed.explanation.is_empty() {
                            self.display
                                .print(&format!("[SHELL] Explanation: {}", parsed.explanation));
                        }
                        self.session.set_pending(action);
                        self.request_confirmation(
                            GatedAction::ExecutePending,
                            &format!("Execute: {}? Say yes or no.", parsed.command),
                        );
                        if !parsed.explanation.is_empty() {
                            self.speak(&parsed.explanation);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // --- Execution --------------------------------------------------------

    /// Run the affirmed pending action per its classified kind. Internal
    /// and voice candidates go back through internal dispatch and can
    /// re-enter this state machine; only shell candidates reach the OS.
    async fn execute_pending(&mut self) -> Result<()> {
        let Some(action) = self.session.take_pending() else {
            self.emit("[CMD] No pending command.");
            return Ok(());
        };
        self.display
            .print(&format!("[EXEC] Running: {}", action.candidate));

        match route(
            &action.candidate,
            DEFAULT_INTERNAL_PREFIX,
            &self.session.settings.assistant_name,
        ) {
            Routed::Internal { rest } => {
                let cmd = parse_typed(&rest);
                self.dispatch(cmd).await?;
                self.session.history.mark_interaction();
            }
            Routed::Voice { rest } => {
                let cmd = parse_voice(&rest);
                self.dispatch(cmd).await?;
                self.session.history.mark_interaction();
            }
            Routed::Shell { command } => {
                self.run_shell(&command).await?;
            }
        }
        Ok(())
    }

    /// Hand one literal command to the OS executor and record its outcome
    /// as a single history entry.
    async fn run_shell(&mut self, command: &str) -> Result<()> {
        self.display.print(&format!("$ {command}"));
        match self.executor.run(command).await {
            Ok(outcome) => {
                for line in outcome.stdout.lines().chain(outcome.stderr.lines()) {
                    self.display.print(line);
                }
                let mut recorded = format!("$ {} (exit {})", command, outcome.exit_code);
                if !outcome.stdout.is_empty() {
                    recorded.push('\n');
                    recorded.push_str(outcome.stdout.trim_end());
                }
                if !outcome.stderr.is_empty() {
                    recorded.push('\n');
                    recorded.push_str(outcome.stderr.trim_end());
                }
                self.session.history.append(HistoryEntry::output(recorded));
                self.log.record(
                    &SessionLog::generate_req_id(),
                    LogKind::Executed,
                    command,
                );
            }
            Err(e) => {
                self.emit(&format!("[SHELL] Error running command: {e:#}"));
            }
        }
        self.session.history.mark_interaction();
        self.print_status();
        Ok(())
    }

    // --- Internal command dispatch ----------------------------------------

    async fn dispatch(&mut self, cmd: ConsoleCommand) -> Result<()> {
        match cmd {
            ConsoleCommand::Help => {
                for line in banner_lines(&self.session.settings) {
                    self.display.print(&line);
                }
                self.session
                    .history
                    .append(HistoryEntry::output("[CMD] Help shown."));
            }
            ConsoleCommand::ShowSettings => {
                for line in settings_lines(&self.session.settings) {
                    self.display.print(&line);
                }
                self.session
                    .history
                    .append(HistoryEntry::output("[CMD] Settings shown."));
                self.speak("Here are your current settings.");
            }
            ConsoleCommand::Attention => {
                let name = self.session.settings.assistant_name.clone();
                self.display.print(&format!("[VOICE] {name} is listening."));
                self.speak(&format!("Yes? I'm {name}."));
            }
            ConsoleCommand::StartPromptEditing => {
                self.session.mode = Mode::PromptEditing;
                self.emit("[VOICE] Prompt editing enabled. Add text; say 'done' or enter an empty line when finished.");
                self.speak("Prompt editing enabled. Say done when finished.");
            }
            ConsoleCommand::FinishPromptEditing => {
                if self.session.mode == Mode::PromptEditing {
                    self.finish_prompt_editing();
                } else {
                    self.emit("[VOICE] No prompt is currently being edited.");
                }
            }
            ConsoleCommand::RunPrompt => {
                if self.session.prompt_text.trim().is_empty() {
                    self.emit("[VOICE] No prompt to run.");
                    self.speak("There is no prompt to run.");
                } else {
                    // Leaving PromptEditing: a failed request falls back to Idle.
                    self.session.mode = Mode::Idle;
                    self.display.print("[VOICE] Running prompt via codex.");
                    self.request_suggestion(SuggestionKind::ShellSuggestion)
                        .await?;
                }
            }
            ConsoleCommand::SuggestShell => {
                self.display
                    .print("[VOICE] Asking codex for the next shell command.");
                self.request_suggestion(SuggestionKind::ShellSuggestion)
                    .await?;
            }
            ConsoleCommand::SuggestVoice => {
                self.display
                    .print("[VOICE] Asking codex for the next internal command.");
                self.request_suggestion(SuggestionKind::VoiceSuggestion)
                    .await?;
            }
            ConsoleCommand::Execute => {
                match self.session.pending().map(|p| p.candidate.clone()) {
                    Some(candidate) => {
                        self.request_confirmation(
                            GatedAction::ExecutePending,
                            &format!("Execute: {candidate}? Say yes or no."),
                        );
                    }
                    None => {
                        self.emit("[VOICE] No pending command to execute.");
                        self.speak("There is no pending command.");
                    }
                }
            }
            ConsoleCommand::Respond => {
                let text = self
                    .session
                    .pending()
                    .map(|p| p.explanation.clone())
                    .filter(|e| !e.is_empty())
                    .or_else(|| self.session.last_response.clone());
                match text {
                    Some(text) => {
                        self.display.print(&format!("[RESP] {text}"));
                        self.speaker.say(&clean_for_speech(&text));
                    }
                    None => {
                        self.emit("[VOICE] No response available to read.");
                        self.speak("There is no response yet.");
                    }
                }
            }
            ConsoleCommand::Repeat => {
                if self.session.prompt_text.is_empty() {
                    self.emit("[VOICE] No prompt to repeat.");
                    self.speak("There is no current prompt.");
                } else {
                    let prompt = self.session.prompt_text.clone();
                    self.display.print(&format!("[PROMPT] {prompt}"));
                    self.speaker.say(&clean_for_speech(&prompt));
                }
            }
            ConsoleCommand::ShowHistory => {
                let mode = self.session.settings.buffer_mode;
                let lines = self.session.history.preview(mode, 40);
                if lines.is_empty() {
                    self.display
                        .print("[HISTORY] Slice is empty; nothing would be sent.");
                } else {
                    self.display
                        .print("[HISTORY] Preview of the buffer slice used for suggestions:");
                    for line in lines {
                        self.display.print(&format!("[H] {line}"));
                    }
                }
                self.session
                    .history
                    .append(HistoryEntry::output("[CMD] History previewed."));
            }
            ConsoleCommand::ShowBuffer => {
                self.display.print(&format!(
                    "[CMD] Buffer mode: {} (anchor={}, last_interaction={})",
                    self.session.settings.buffer_mode.as_str(),
                    self.session.history.anchor_index(),
                    self.session.history.last_interaction_index(),
                ));
                self.session
                    .history
                    .append(HistoryEntry::output("[CMD] Buffer status shown."));
            }
            ConsoleCommand::SetBuffer(mode) => {
                self.session.settings.buffer_mode = mode;
                self.emit(&format!("[CMD] Buffer mode set to {}.", mode.as_str()));
                self.speak(&format!("Buffer mode {}.", mode.as_str()));
            }
            ConsoleCommand::ClearBuffer => {
                self.request_confirmation(
                    GatedAction::ClearBuffer,
                    "Clear the suggestion buffer from this point on? Say yes or no.",
                );
            }
            ConsoleCommand::SetGuided(on) => {
                self.session.settings.guided = on;
                self.emit(&format!(
                    "[VOICE] Mode set to {}.",
                    if on { "Guided" } else { "Unguided" }
                ));
                // Announce unguided even though guided just turned off.
                self.speaker.say(if on {
                    "Guided mode enabled."
                } else {
                    "Unguided mode enabled."
                });
            }
            ConsoleCommand::SetFancy(on) => {
                self.session.settings.fancy_output = on;
                self.display.set_fancy(on);
                self.emit(&format!(
                    "[CMD] Fancy colored output {}.",
                    if on { "enabled" } else { "disabled" }
                ));
            }
            ConsoleCommand::SetDebug(value) => {
                let on = value.unwrap_or(!self.session.settings.debug_logging);
                self.session.settings.debug_logging = on;
                self.emit(&format!(
                    "[CMD] Debug logging {}.",
                    if on { "enabled" } else { "disabled" }
                ));
            }
            ConsoleCommand::ToggleRecordings => {
                let on = !self.session.settings.save_recordings;
                self.session.settings.save_recordings = on;
                self.emit(&format!(
                    "[CMD] Save recordings: {}.",
                    if on { "ON" } else { "OFF" }
                ));
            }
            ConsoleCommand::EnableRecordings => {
                let state = if self.session.settings.save_recordings {
                    "currently saving"
                } else {
                    "currently not saving"
                };
                self.request_confirmation(
                    GatedAction::EnableRecordings,
                    &format!(
                        "Save recordings is {state}. Enable saving recordings? Say yes or no."
                    ),
                );
            }
            ConsoleCommand::ToggleLogPrompts => {
                let on = !self.session.settings.log_prompts;
                self.session.settings.log_prompts = on;
                self.log.set_enabled(on);
                self.emit(&format!(
                    "[CMD] Log prompts/responses: {}.",
                    if on { "ON" } else { "OFF" }
                ));
            }
            ConsoleCommand::EnableLogPrompts => {
                let state = if self.session.settings.log_prompts {
                    "currently logging"
                } else {
                    "currently not logging"
                };
                self.request_confirmation(
                    GatedAction::EnableLogPrompts,
                    &format!(
                        "Prompt logging is {state}. Enable logging prompts and responses? Say yes or no."
                    ),
                );
            }
            ConsoleCommand::Speed(change) => self.apply_speed(change),
            ConsoleCommand::Model(change) => {
                match change {
                    ModelChange::Next => self.session.settings.cycle_model(true),
                    ModelChange::Previous => self.session.settings.cycle_model(false),
                    ModelChange::Set(name) => self.session.settings.model = name,
                }
                let model = self.session.settings.model.clone();
                self.emit(&format!("[CMD] Model set to: {model}"));
                self.speak(&format!("Model set to {model}."));
            }
            ConsoleCommand::Reasoning(level) => {
                self.session.settings.reasoning = level;
                self.emit(&format!("[CMD] Reasoning set to: {}", level.as_str()));
                self.speak(&format!("Reasoning set to {}.", level.as_str()));
            }
            ConsoleCommand::Rename(name) => {
                self.session.settings.assistant_name = name.clone();
                self.emit(&format!("[CMD] Assistant renamed to: {name}"));
                self.speak(&format!("You can now call me {name}."));
            }
            ConsoleCommand::SaveSettings => {
                self.request_confirmation(
                    GatedAction::SaveSettings,
                    "Save current settings so they load next time? Say yes or no.",
                );
            }
            ConsoleCommand::Exit => {
                self.request_confirmation(GatedAction::Exit, "Exit voice shell? Say yes or no.");
            }
            ConsoleCommand::Listen => {
                self.session.listening = true;
                self.emit("[VOICE] Listening started.");
                self.speak("Listening enabled.");
            }
            ConsoleCommand::StopListening => {
                self.session.listening = false;
                self.emit("[VOICE] Stop listening requested.");
                self.speak("Stopping listening.");
            }
            ConsoleCommand::SelfTest(scope) => self.run_self_test(scope).await?,
            ConsoleCommand::Unknown(text) => {
                self.emit(&format!("[VOICE] Unknown command: {text}"));
                self.speak("I did not recognize that command.");
            }
        }
        if !self.session.terminated() {
            self.print_status();
        }
        Ok(())
    }

    fn apply_speed(&mut self, change: SpeedChange) {
        let current = self.session.settings.tts_speed;
        match change {
            SpeedChange::Show => {
                self.display
                    .print(&format!("[VOICE] Current TTS speed: {current:.2}x"));
                self.speak(&format!(
                    "My speaking speed is {current:.2} times normal."
                ));
                return;
            }
            SpeedChange::Increase => self.session.settings.set_tts_speed(current + TTS_SPEED_STEP),
            SpeedChange::Decrease => self.session.settings.set_tts_speed(current - TTS_SPEED_STEP),
            SpeedChange::Set(value) => self.session.settings.set_tts_speed(value),
        }
        let speed = self.session.settings.tts_speed;
        self.emit(&format!("[VOICE] TTS speed set to {speed:.2}x"));
        self.speak(&format!("Speaking speed set to {speed:.2} times normal."));
    }

    // --- Prompt editing ---------------------------------------------------

    fn append_prompt_fragment(&mut self, fragment: &str) {
        if !self.session.prompt_text.is_empty() {
            self.session.prompt_text.push(' ');
        }
        self.session.prompt_text.push_str(fragment);
        self.display.print(&format!("[PROMPT+] {fragment}"));
    }

    fn finish_prompt_editing(&mut self) {
        self.session.mode = Mode::Idle;
        self.emit("[VOICE] Prompt editing finished.");
        self.speak("Prompt editing finished.");
        self.print_status();
    }

    // --- Self-test --------------------------------------------------------

    /// Diagnostic pass over the internal handlers. Never reaches the OS
    /// executor: a proposal produced by the shell scope is cancelled before
    /// the test ends.
    async fn run_self_test(&mut self, scope: TestScope) -> Result<()> {
        self.display
            .print(&format!("[TEST] Starting self-test ({scope:?})."));
        self.speak("Starting self test. I will not run any operating system commands without your confirmation.");

        if matches!(scope, TestScope::Voice | TestScope::Both) {
            self.display
                .print("[TEST] Exercising internal command handlers.");
            for line in settings_lines(&self.session.settings) {
                self.display.print(&line);
            }
            self.session.mode = Mode::PromptEditing;
            self.append_prompt_fragment("self-test prompt fragment");
            self.finish_prompt_editing();
            self.apply_speed(SpeedChange::Show);
            self.display.print("[TEST] Voice handlers executed.");
        }

        if matches!(scope, TestScope::Shell | TestScope::Both) {
            self.display
                .print("[TEST] Exercising the suggestion flow (no OS execution).");
            self.session
                .history
                .append(HistoryEntry::output("echo 'hello from self-test'"));
            let saved_prompt = std::mem::replace(
                &mut self.session.prompt_text,
                "Summarize and suggest the next maintenance command.".to_string(),
            );
            self.request_suggestion(SuggestionKind::ShellSuggestion)
                .await?;
            self.session.prompt_text = saved_prompt;
            if self.session.pending().is_some() {
                self.session.clear_pending();
                self.session.mode = Mode::Idle;
                self.display
                    .print("[TEST] Proposal cancelled (self-test never executes).");
            }
            self.display.print("[TEST] Suggestion flow exercised.");
        }

        self.display.print("[TEST] Self-test finished.");
        self.speak("Self test finished.");
        Ok(())
    }

    // --- Output helpers ---------------------------------------------------

    /// Print a line and record it in the history buffer.
    fn emit(&mut self, line: &str) {
        self.display.print(line);
        self.session.history.append(HistoryEntry::output(line));
    }

    fn print_status(&self) {
        self.display
            .print(&format!("[STATUS] {}", self.session.status_line()));
    }

    /// Speak through the TTS seam when guided mode is on. Fire-and-forget.
    fn speak(&self, text: &str) {
        if self.session.settings.guided {
            self.speaker.say(&clean_for_speech(text));
        }
    }
}
