//! Terminal output formatting
//!
//! Tag-colored lines ([VOICE], [SHELL], [CMD], ...) with a plain-text
//! fallback when fancy output is off or stdout is not a terminal.

use alice_common::settings::Settings;
use console::Term;
use owo_colors::OwoColorize;

/// Colors console lines by their leading tag.
#[derive(Debug, Clone, Copy)]
pub struct Display {
    fancy: bool,
}

impl Display {
    pub fn new(fancy: bool) -> Self {
        // Color only makes sense on a real terminal.
        let fancy = fancy && Term::stdout().is_term();
        Self { fancy }
    }

    pub fn set_fancy(&mut self, fancy: bool) {
        self.fancy = fancy && Term::stdout().is_term();
    }

    pub fn fancy(&self) -> bool {
        self.fancy
    }

    /// Print a line, colorized by tag when fancy output is on.
    pub fn print(&self, line: &str) {
        println!("{}", self.colorize(line));
    }

    pub fn colorize(&self, line: &str) -> String {
        if !self.fancy {
            return line.to_string();
        }
        let stripped = line.trim_start();
        if stripped.starts_with("[VOICE]") {
            line.cyan().to_string()
        } else if stripped.starts_with("[SHELL]") {
            line.yellow().to_string()
        } else if stripped.starts_with("[CMD]") || stripped.starts_with("[EXEC]") {
            line.green().to_string()
        } else if stripped.starts_with("[CONFIRM]") {
            line.magenta().to_string()
        } else if stripped.starts_with("[CALIB]") {
            line.blue().to_string()
        } else if stripped.starts_with("[RESP]") {
            line.bright_blue().to_string()
        } else if stripped.starts_with("[STATUS]") {
            line.bright_black().to_string()
        } else if stripped.starts_with("[TEST]") {
            line.bright_magenta().to_string()
        } else if stripped.starts_with("===") || stripped.starts_with("╔") {
            line.bold().to_string()
        } else {
            line.to_string()
        }
    }
}

/// Banner lines printed at startup and on `help`.
pub fn banner_lines(settings: &Settings) -> Vec<String> {
    let title = "Alice Voice Shell";
    let border = "═".repeat(title.len() + 4);
    let name = &settings.assistant_name;
    let mut lines = vec![
        format!("╔{border}╗"),
        format!("║  {title}  ║"),
        format!("╚{border}╝"),
        format!("Assistant name: {name}"),
        format!(
            "Model: {}, Reasoning: {}",
            settings.model,
            settings.reasoning.as_str()
        ),
        format!("Guided mode: {}", if settings.guided { "ON" } else { "OFF" }),
        format!("TTS speed: {:.2}x", settings.tts_speed),
        "Type normal shell commands to run them.".to_string(),
        "Prefix with 'v-' for console commands (e.g., v-help).".to_string(),
        "Examples:".to_string(),
        "  v-help              # show this help".to_string(),
        "  v-settings          # show current settings".to_string(),
        "  v-prompt            # edit the goal prompt".to_string(),
        "  v-command           # suggest next shell command from history".to_string(),
        "  v-voicecmd          # suggest next internal console command".to_string(),
        "  v-history           # preview the buffer slice that will be sent".to_string(),
        "  v-buffer clear|session|last   # choose the history slice".to_string(),
        "  v-exec              # execute the proposed command".to_string(),
        "  v-save              # save settings (with confirmation)".to_string(),
        "  v-exit              # exit (with confirmation)".to_string(),
    ];
    lines.push(format!("Voice commands (with assistant name):"));
    for cmd in [
        "prompt / done / run",
        "shell command / voice command / execute",
        "respond / repeat / history",
        "buffer clear | session | last",
        "mode guided / unguided",
        "speed / speed increase / speed 1.2",
        "save / exit / listen / stop listening",
    ] {
        lines.push(format!("  {name} {cmd}"));
    }
    lines
}

/// Settings view lines for `v-settings` / "<name> settings".
pub fn settings_lines(settings: &Settings) -> Vec<String> {
    let on_off = |b: bool| if b { "ON" } else { "OFF" };
    vec![
        "=== Settings ===".to_string(),
        format!("Assistant name: {}", settings.assistant_name),
        format!("Guided mode: {}", on_off(settings.guided)),
        format!("Model: {}", settings.model),
        format!("Reasoning: {}", settings.reasoning.as_str()),
        format!("Debug logging: {}", on_off(settings.debug_logging)),
        format!("Save recordings: {}", on_off(settings.save_recordings)),
        format!("Log prompts/responses: {}", on_off(settings.log_prompts)),
        format!("Fancy output: {}", on_off(settings.fancy_output)),
        format!("TTS speed: {:.2}x", settings.tts_speed),
        format!("Buffer mode: {}", settings.buffer_mode.as_str()),
    ]
}
