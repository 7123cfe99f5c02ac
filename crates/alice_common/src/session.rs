//! Session state: mode, pending action, prompt draft
//!
//! Exactly one `Session` exists per run. It is created at startup, owned by
//! the mode controller, and mutated only by the controller and its
//! sub-components. No statics, no ambient state.

use crate::classify::CommandKind;
use crate::composer::SuggestionKind;
use crate::confirm::ConfirmationGuard;
use crate::history::HistoryBuffer;
use crate::profile::VoiceProfile;
use crate::settings::Settings;

/// The single in-flight candidate command awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub origin: SuggestionKind,
    pub candidate: String,
    pub explanation: String,
    pub kind: CommandKind,
    pub needs_confirmation: bool,
}

/// What a pending confirmation will do once affirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedAction {
    /// Run the current `PendingAction` per its classified kind
    ExecutePending,
    /// Leave the console
    Exit,
    /// Overwrite the settings file
    SaveSettings,
    /// Move the history anchor to "now"
    ClearBuffer,
    /// Turn on speech-recording persistence
    EnableRecordings,
    /// Turn on prompt/response logging
    EnableLogPrompts,
}

/// Tagged console mode; exactly one active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    PromptEditing,
    AwaitingConfirmation(GatedAction),
    /// Absorbing; reached only through a confirmed exit
    Terminated,
}

/// Process-wide console state.
#[derive(Debug)]
pub struct Session {
    pub mode: Mode,
    pub settings: Settings,
    pub profile: VoiceProfile,
    pub history: HistoryBuffer,
    /// Mutable goal draft edited in `PromptEditing`
    pub prompt_text: String,
    /// Most recent raw model output, for `respond`
    pub last_response: Option<String>,
    pending: Option<PendingAction>,
    guard: ConfirmationGuard,
    /// Whether the background transcript producer should be running
    pub listening: bool,
}

impl Session {
    pub fn new(settings: Settings, profile: VoiceProfile) -> Self {
        Self {
            mode: Mode::Idle,
            settings,
            profile,
            history: HistoryBuffer::new(),
            prompt_text: String::new(),
            last_response: None,
            pending: None,
            guard: ConfirmationGuard::default(),
            listening: false,
        }
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Install a new pending action, replacing any previous one. The
    /// single-slot invariant lives here: there is never more than one
    /// candidate in flight, and a fresh candidate resets the guard.
    pub fn set_pending(&mut self, action: PendingAction) {
        self.pending = Some(action);
        self.guard.reset();
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
        self.guard.reset();
    }

    /// Take the pending action out for execution, leaving the slot empty.
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.guard.reset();
        self.pending.take()
    }

    pub fn guard_mut(&mut self) -> &mut ConfirmationGuard {
        &mut self.guard
    }

    /// Enter confirmation for a gated action.
    pub fn await_confirmation(&mut self, gated: GatedAction) {
        self.guard.reset();
        self.mode = Mode::AwaitingConfirmation(gated);
    }

    pub fn terminated(&self) -> bool {
        self.mode == Mode::Terminated
    }

    /// One-line status summary, printed after state-changing commands.
    pub fn status_line(&self) -> String {
        format!(
            "guided={} | model={} | reason={} | speed={:.2}x | buffer={} | mode={} | listen={}",
            on_off(self.settings.guided),
            self.settings.model,
            self.settings.reasoning.as_str(),
            self.settings.tts_speed,
            self.settings.buffer_mode.as_str(),
            mode_name(self.mode),
            on_off(self.listening),
        )
    }
}

fn on_off(b: bool) -> &'static str {
    if b {
        "ON"
    } else {
        "OFF"
    }
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Idle => "idle",
        Mode::PromptEditing => "prompt",
        Mode::AwaitingConfirmation(_) => "confirm",
        Mode::Terminated => "terminated",
    }
}
