//! Voice/alias calibration profile
//!
//! Flat JSON map of alias key to word list: wake-word variants, yes/no
//! confirmation tokens, and per-command alias lists. Written by the external
//! calibration tool; the console only reads it at startup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const PROFILE_FILENAME: &str = "alice_voice_profile.json";

/// Alias sets keyed by purpose ("wake", "yes", "no", or a command name).
/// All words are stored lowercased.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceProfile {
    aliases: BTreeMap<String, Vec<String>>,
}

impl VoiceProfile {
    /// Load a profile, falling back to an empty one on any failure.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<VoiceProfile>(&content) {
                Ok(profile) => profile.normalized(),
                Err(e) => {
                    warn!("voice profile {} is corrupt: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("could not read voice profile {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn normalized(mut self) -> Self {
        for words in self.aliases.values_mut() {
            let mut seen = Vec::new();
            for w in words.iter() {
                let w = w.trim().to_lowercase();
                if !w.is_empty() && !seen.contains(&w) {
                    seen.push(w);
                }
            }
            *words = seen;
        }
        self
    }

    /// Aliases for `key`, or `defaults` when the profile has none.
    pub fn aliases_or<'a>(&'a self, key: &str, defaults: &[&str]) -> Vec<String> {
        match self.aliases.get(&key.to_lowercase()) {
            Some(words) if !words.is_empty() => words.clone(),
            _ => defaults.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Wake-word variants: the configured assistant name plus any calibrated
    /// aliases.
    pub fn wake_variants(&self, assistant_name: &str) -> Vec<String> {
        let mut variants = vec![assistant_name.trim().to_lowercase()];
        for w in self.aliases_or("wake", &[]) {
            if !variants.contains(&w) {
                variants.push(w);
            }
        }
        variants
    }

    pub fn yes_variants(&self) -> Vec<String> {
        self.aliases_or(
            "yes",
            &["yes", "yeah", "yep", "confirm", "sure", "ok", "okay"],
        )
    }

    pub fn no_variants(&self) -> Vec<String> {
        self.aliases_or("no", &["no", "nope", "cancel", "stop", "never"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_uses_defaults() {
        let p = VoiceProfile::default();
        assert!(p.yes_variants().contains(&"yeah".to_string()));
        assert!(p.no_variants().contains(&"cancel".to_string()));
        assert_eq!(p.wake_variants("Alice"), vec!["alice".to_string()]);
    }

    #[test]
    fn test_profile_overrides_defaults() {
        let p: VoiceProfile =
            serde_json::from_str(r#"{"yes": ["aye", "affirmative"]}"#).unwrap();
        assert_eq!(p.yes_variants(), vec!["aye", "affirmative"]);
        // Untouched sets keep their defaults.
        assert!(p.no_variants().contains(&"no".to_string()));
    }

    #[test]
    fn test_load_normalizes_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILENAME);
        std::fs::write(&path, r#"{"wake": [" Allie ", "allie", "AL"]}"#).unwrap();
        let p = VoiceProfile::load(&path);
        assert_eq!(
            p.wake_variants("Alice"),
            vec!["alice".to_string(), "allie".to_string(), "al".to_string()]
        );
    }

    #[test]
    fn test_load_corrupt_file_is_empty_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILENAME);
        std::fs::write(&path, "[1, 2").unwrap();
        let p = VoiceProfile::load(&path);
        assert!(p.yes_variants().contains(&"yes".to_string()));
    }
}
