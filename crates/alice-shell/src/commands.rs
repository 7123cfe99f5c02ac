//! Internal command surface
//!
//! Typed `v-...` lines and spoken `<Name> ...` commands both resolve to one
//! `ConsoleCommand`, so the controller dispatches a single enum no matter
//! which surface the command arrived through. Parsing is total: anything
//! unrecognized becomes `Unknown` and is reported, never executed.

use alice_common::settings::{BufferMode, ReasoningLevel};

/// Speed adjustment requested by `speed ...`
#[derive(Debug, Clone, PartialEq)]
pub enum SpeedChange {
    Show,
    Increase,
    Decrease,
    Set(f32),
}

/// Model selection requested by `model ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChange {
    Next,
    Previous,
    Set(String),
}

/// Which diagnostics the self-test exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestScope {
    Voice,
    Shell,
    Both,
}

/// A resolved internal console command.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Help,
    ShowSettings,
    /// Bare wake word with nothing after it
    Attention,
    StartPromptEditing,
    FinishPromptEditing,
    RunPrompt,
    /// Ask the model for the next OS shell command
    SuggestShell,
    /// Ask the model for the next internal console command
    SuggestVoice,
    /// Confirm-and-run the pending suggestion
    Execute,
    /// Print/speak the pending explanation or last response
    Respond,
    /// Print/speak the current prompt draft
    Repeat,
    /// Preview the history slice that would be sent
    ShowHistory,
    ShowBuffer,
    SetBuffer(BufferMode),
    /// Move the anchor to "now" (confirmation-gated from voice)
    ClearBuffer,
    SetGuided(bool),
    SetFancy(bool),
    /// `None` toggles
    SetDebug(Option<bool>),
    ToggleRecordings,
    /// Enable recordings with confirmation (voice surface)
    EnableRecordings,
    ToggleLogPrompts,
    /// Enable prompt logging with confirmation (voice surface)
    EnableLogPrompts,
    Speed(SpeedChange),
    Model(ModelChange),
    Reasoning(ReasoningLevel),
    Rename(String),
    SaveSettings,
    Exit,
    Listen,
    StopListening,
    SelfTest(TestScope),
    Unknown(String),
}

/// Parse the remainder of a typed internal command (prefix already
/// stripped), e.g. `save`, `buffer last`, `speed 1.2`.
pub fn parse_typed(rest: &str) -> ConsoleCommand {
    let rest = rest.trim();
    let mut parts = rest.split_whitespace();
    let Some(key) = parts.next() else {
        return ConsoleCommand::Unknown(String::new());
    };
    let args: Vec<&str> = parts.collect();

    match key {
        "help" => ConsoleCommand::Help,
        "settings" => ConsoleCommand::ShowSettings,
        "prompt" => ConsoleCommand::StartPromptEditing,
        "done" | "enter" => ConsoleCommand::FinishPromptEditing,
        "run" => ConsoleCommand::RunPrompt,
        "command" | "shell" => ConsoleCommand::SuggestShell,
        "voicecmd" | "voice-command" | "voicecommand" => ConsoleCommand::SuggestVoice,
        "exec" | "execute" => ConsoleCommand::Execute,
        "respond" => ConsoleCommand::Respond,
        "repeat" => ConsoleCommand::Repeat,
        "history" => ConsoleCommand::ShowHistory,
        "clear" => ConsoleCommand::ClearBuffer,
        "guided-on" => ConsoleCommand::SetGuided(true),
        "guided-off" => ConsoleCommand::SetGuided(false),
        "fancy-on" => ConsoleCommand::SetFancy(true),
        "fancy-off" => ConsoleCommand::SetFancy(false),
        "debug" => ConsoleCommand::SetDebug(None),
        "recordings" => ConsoleCommand::ToggleRecordings,
        "logprompts" => ConsoleCommand::ToggleLogPrompts,
        "save" => ConsoleCommand::SaveSettings,
        "exit" => ConsoleCommand::Exit,
        "listen" => ConsoleCommand::Listen,
        "buffer" => parse_buffer(&args),
        "speed" => parse_speed(&args),
        "model" => parse_model(&args, rest),
        "reasoning" => args
            .first()
            .and_then(|w| ReasoningLevel::parse(w))
            .map(ConsoleCommand::Reasoning)
            .unwrap_or_else(|| ConsoleCommand::Unknown(rest.to_string())),
        "rename" => {
            let name = args.join(" ").trim_matches('"').trim().to_string();
            if name.is_empty() {
                ConsoleCommand::Unknown(rest.to_string())
            } else {
                ConsoleCommand::Rename(name)
            }
        }
        "test" => parse_test(&args, rest),
        _ => ConsoleCommand::Unknown(rest.to_string()),
    }
}

/// Parse the words after the wake word, e.g. `shell command`,
/// `mode guided`, `buffer last`, `stop listening`.
pub fn parse_voice(rest: &str) -> ConsoleCommand {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return ConsoleCommand::Attention;
    };
    let args = &tokens[1..];

    match head {
        "help" => ConsoleCommand::Help,
        "settings" => ConsoleCommand::ShowSettings,
        "prompt" => ConsoleCommand::StartPromptEditing,
        "done" | "enter" => ConsoleCommand::FinishPromptEditing,
        "run" => ConsoleCommand::RunPrompt,
        "shell" if args.first() == Some(&"command") => ConsoleCommand::SuggestShell,
        "voice" if args.first() == Some(&"command") => ConsoleCommand::SuggestVoice,
        // Back-compat alias: "voice shell" also means a shell suggestion.
        "voice" if args.first() == Some(&"shell") => ConsoleCommand::SuggestShell,
        "execute" | "exec" => ConsoleCommand::Execute,
        "respond" | "response" | "reply" => ConsoleCommand::Respond,
        "repeat" => ConsoleCommand::Repeat,
        "history" => ConsoleCommand::ShowHistory,
        "buffer" => parse_buffer(args),
        "mode" => match args.first().copied() {
            Some("guided") => ConsoleCommand::SetGuided(true),
            Some("unguided") => ConsoleCommand::SetGuided(false),
            _ => ConsoleCommand::Unknown(rest.to_string()),
        },
        "color" | "style" | "ui" => match args.first().copied() {
            Some("on" | "enable" | "enabled" | "fancy") => ConsoleCommand::SetFancy(true),
            Some("off" | "disable" | "disabled" | "plain") => ConsoleCommand::SetFancy(false),
            _ => ConsoleCommand::Unknown(rest.to_string()),
        },
        "debug" => match args.first().copied() {
            Some("on" | "enable") => ConsoleCommand::SetDebug(Some(true)),
            Some("off" | "disable") => ConsoleCommand::SetDebug(Some(false)),
            _ => ConsoleCommand::Unknown(rest.to_string()),
        },
        "save" if args.first() == Some(&"recordings") => ConsoleCommand::EnableRecordings,
        "save" if args.is_empty() => ConsoleCommand::SaveSettings,
        "log" => ConsoleCommand::EnableLogPrompts,
        "speed" => parse_speed(args),
        "model" => parse_model(args, rest),
        "reasoning" => args
            .first()
            .and_then(|w| ReasoningLevel::parse(w))
            .map(ConsoleCommand::Reasoning)
            .unwrap_or_else(|| ConsoleCommand::Unknown(rest.to_string())),
        "rename" => {
            let name = args.join(" ").trim().to_string();
            if name.is_empty() {
                ConsoleCommand::Unknown(rest.to_string())
            } else {
                ConsoleCommand::Rename(name)
            }
        }
        "exit" => ConsoleCommand::Exit,
        "listen" => ConsoleCommand::Listen,
        "start" if args.first() == Some(&"listening") => ConsoleCommand::Listen,
        "stop" if args.first() == Some(&"listening") => ConsoleCommand::StopListening,
        "test" => parse_test(args, rest),
        "self" if matches!(args.first().copied(), Some("directed" | "direct")) => {
            ConsoleCommand::SelfTest(TestScope::Both)
        }
        _ => ConsoleCommand::Unknown(rest.to_string()),
    }
}

fn parse_buffer(args: &[&str]) -> ConsoleCommand {
    match args.first().copied() {
        None => ConsoleCommand::ShowBuffer,
        Some("clear") => ConsoleCommand::ClearBuffer,
        Some(word) => BufferMode::parse(word)
            .map(ConsoleCommand::SetBuffer)
            .unwrap_or_else(|| ConsoleCommand::Unknown(format!("buffer {word}"))),
    }
}

fn parse_speed(args: &[&str]) -> ConsoleCommand {
    match args.first().copied() {
        None => ConsoleCommand::Speed(SpeedChange::Show),
        Some("increase" | "up" | "faster") => ConsoleCommand::Speed(SpeedChange::Increase),
        Some("decrease" | "down" | "slower") => ConsoleCommand::Speed(SpeedChange::Decrease),
        Some(word) => match word.parse::<f32>() {
            Ok(value) => ConsoleCommand::Speed(SpeedChange::Set(value)),
            Err(_) => ConsoleCommand::Unknown(format!("speed {word}")),
        },
    }
}

fn parse_model(args: &[&str], rest: &str) -> ConsoleCommand {
    match args.first().copied() {
        None => ConsoleCommand::Unknown(rest.to_string()),
        Some("next" | "forward") => ConsoleCommand::Model(ModelChange::Next),
        Some("previous" | "prev" | "back") => ConsoleCommand::Model(ModelChange::Previous),
        Some(_) => ConsoleCommand::Model(ModelChange::Set(args.join(" "))),
    }
}

fn parse_test(args: &[&str], rest: &str) -> ConsoleCommand {
    match args.first().copied() {
        Some("voice") => ConsoleCommand::SelfTest(TestScope::Voice),
        Some("shell") => ConsoleCommand::SelfTest(TestScope::Shell),
        Some("both") => ConsoleCommand::SelfTest(TestScope::Both),
        _ => ConsoleCommand::Unknown(rest.to_string()),
    }
}
