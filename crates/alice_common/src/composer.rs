//! Outbound prompt composition
//!
//! Builds the two request texts sent to the codex CLI. Pure string
//! assembly over session data; composition never fails. Oversized history
//! is handled upstream by the buffer's render cap — a slice that still
//! exceeds the model context is a documented risk, not a retry.

use crate::settings::BufferMode;

/// Which kind of suggestion was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// Ask for the next OS shell command
    ShellSuggestion,
    /// Ask for the next internal console command
    VoiceSuggestion,
}

const OUTPUT_FORMAT: &str = "IMPORTANT OUTPUT FORMAT:\n\
Return EXACTLY TWO non-empty lines, and nothing else:\n\
  LINE 1: CMD: <the command>\n\
  LINE 2: EXPL: <a short natural language explanation, <= 25 words>\n\
No backticks, no extra commentary, no bullet points.\n";

fn goal_or_none(goal: &str) -> &str {
    let goal = goal.trim();
    if goal.is_empty() {
        "(none)"
    } else {
        goal
    }
}

/// Prompt asking for the single best next shell command given the user's
/// stated goal and the selected history slice.
pub fn shell_suggestion(goal: &str, history: &str, mode: BufferMode) -> String {
    format!(
        "You are an expert Linux shell assistant.\n\
         You will receive:\n\
         \x20- The user's high-level request (may be empty).\n\
         \x20- Recent terminal history (commands and outputs).\n\n\
         Your job:\n\
         \x20- Decide the single best next shell command to run.\n\
         \x20- Explain briefly what it does.\n\n\
         {OUTPUT_FORMAT}\n\
         USER HIGH-LEVEL REQUEST:\n\
         {goal}\n\n\
         BUFFER MODE: {mode}\n\
         === TERMINAL HISTORY START ===\n\
         {history}\n\
         === TERMINAL HISTORY END ===\n",
        goal = goal_or_none(goal),
        mode = mode.as_str(),
    )
}

/// Prompt asking for the next *internal* console action: a typed command
/// carrying `prefix`, or a voice command led by the assistant name. Plain
/// shell commands are explicitly forbidden here; whatever comes back is
/// still classified and confirmation-gated.
pub fn voice_suggestion(
    goal: &str,
    history: &str,
    assistant_name: &str,
    prefix: &str,
) -> String {
    format!(
        "You are the control logic for a voice-enabled shell console.\n\
         The console supports two kinds of internal commands:\n\
         \x20 1) Typed commands starting with '{prefix}' such as:\n\
         \x20    {prefix}help, {prefix}settings, {prefix}prompt, {prefix}command, {prefix}voicecmd,\n\
         \x20    {prefix}history, {prefix}buffer clear, {prefix}guided-on, {prefix}guided-off,\n\
         \x20    {prefix}speed 1.2, {prefix}respond, {prefix}repeat, {prefix}recordings,\n\
         \x20    {prefix}logprompts, {prefix}debug, {prefix}save, {prefix}exec, {prefix}exit, {prefix}listen.\n\
         \x20 2) Voice commands starting with the assistant name, for example:\n\
         \x20    {name} prompt, {name} done, {name} run, {name} shell command,\n\
         \x20    {name} voice command, {name} execute, {name} respond, {name} repeat,\n\
         \x20    {name} history, {name} buffer last, {name} mode guided, {name} speed increase.\n\n\
         Your job:\n\
         \x20- Look at the user's high-level request and the recent shell history.\n\
         \x20- Choose the single most helpful internal control command to invoke next.\n\
         \x20- Prefer '{prefix}' commands when it is something the user might type, or\n\
         \x20  a '{name} ...' voice command when the user is working by voice.\n\
         \x20- Do NOT return plain shell commands like 'ls', 'git status', etc.\n\n\
         {OUTPUT_FORMAT}\n\
         USER HIGH-LEVEL REQUEST:\n\
         {goal}\n\n\
         === RECENT SHELL HISTORY (may be empty) ===\n\
         {history}\n\
         === END HISTORY ===\n",
        goal = goal_or_none(goal),
        name = assistant_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_prompt_embeds_goal_and_history() {
        let p = shell_suggestion("free up disk space", "df -h\n...", BufferMode::Session);
        assert!(p.contains("free up disk space"));
        assert!(p.contains("df -h"));
        assert!(p.contains("BUFFER MODE: session"));
        assert!(p.contains("CMD:"));
        assert!(p.contains("EXPL:"));
    }

    #[test]
    fn test_empty_goal_becomes_none_marker() {
        let p = shell_suggestion("   ", "", BufferMode::Last);
        assert!(p.contains("USER HIGH-LEVEL REQUEST:\n(none)"));
    }

    #[test]
    fn test_voice_prompt_names_both_surfaces() {
        let p = voice_suggestion("", "", "Alice", "v-");
        assert!(p.contains("v-help"));
        assert!(p.contains("Alice execute"));
        assert!(p.contains("Do NOT return plain shell commands"));
    }

    #[test]
    fn test_voice_prompt_uses_configured_name_and_prefix() {
        let p = voice_suggestion("", "", "Nova", "x-");
        assert!(p.contains("Nova prompt"));
        assert!(p.contains("x-settings"));
        assert!(!p.contains("v-help"));
    }
}
