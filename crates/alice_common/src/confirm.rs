//! Confirmation guard
//!
//! Any state-changing or destructive action waits here for an explicit
//! yes/no. Matching is exact-token against the whole trimmed input,
//! case-insensitive — substring triggers would fire on sentences that merely
//! mention "yes". Anything that matches neither set is ambiguous: the caller
//! re-prompts and the pending action stays pending. The guard never
//! auto-affirms, and by default never auto-cancels.

use crate::profile::VoiceProfile;

/// Outcome of matching one input line against the alias sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Affirm,
    Deny,
    /// Matched neither set; re-prompt, state unchanged
    Ambiguous,
}

/// Re-prompt policy for ambiguous replies while a confirmation is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPolicy {
    /// Keep asking until a clear yes or no arrives (default).
    RepromptForever,
    /// Fail closed (treat as deny) after this many ambiguous replies.
    CancelAfter(u32),
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        ConfirmPolicy::RepromptForever
    }
}

/// Tracks ambiguous-reply count for one pending confirmation.
#[derive(Debug, Default)]
pub struct ConfirmationGuard {
    policy: ConfirmPolicy,
    ambiguous_count: u32,
}

impl ConfirmationGuard {
    pub fn new(policy: ConfirmPolicy) -> Self {
        Self {
            policy,
            ambiguous_count: 0,
        }
    }

    /// Classify one reply. Ambiguous replies may turn into `Deny` once the
    /// configured cancel threshold is crossed; they never turn into
    /// `Affirm`.
    pub fn decide(&mut self, input: &str, profile: &VoiceProfile) -> Decision {
        match match_tokens(input, profile) {
            Decision::Ambiguous => {
                self.ambiguous_count += 1;
                match self.policy {
                    ConfirmPolicy::RepromptForever => Decision::Ambiguous,
                    ConfirmPolicy::CancelAfter(limit) if self.ambiguous_count >= limit => {
                        Decision::Deny
                    }
                    ConfirmPolicy::CancelAfter(_) => Decision::Ambiguous,
                }
            }
            clear => clear,
        }
    }

    /// A fresh pending action starts a fresh count.
    pub fn reset(&mut self) {
        self.ambiguous_count = 0;
    }
}

/// Stateless exact-token match against the profile alias sets.
pub fn match_tokens(input: &str, profile: &VoiceProfile) -> Decision {
    let token = input.trim().to_lowercase();
    if token.is_empty() {
        return Decision::Ambiguous;
    }
    if profile.yes_variants().iter().any(|w| *w == token) {
        return Decision::Affirm;
    }
    if profile.no_variants().iter().any(|w| *w == token) {
        return Decision::Deny;
    }
    Decision::Ambiguous
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_affirmatives() {
        let p = VoiceProfile::default();
        for word in ["yes", "YES", " yeah ", "okay"] {
            assert_eq!(match_tokens(word, &p), Decision::Affirm, "{word:?}");
        }
    }

    #[test]
    fn test_exact_negatives() {
        let p = VoiceProfile::default();
        for word in ["no", "Nope", "cancel"] {
            assert_eq!(match_tokens(word, &p), Decision::Deny, "{word:?}");
        }
    }

    #[test]
    fn test_substring_does_not_trigger() {
        let p = VoiceProfile::default();
        assert_eq!(match_tokens("yes please run it", &p), Decision::Ambiguous);
        assert_eq!(match_tokens("oh no not that", &p), Decision::Ambiguous);
    }

    #[test]
    fn test_maybe_is_ambiguous() {
        let p = VoiceProfile::default();
        assert_eq!(match_tokens("maybe", &p), Decision::Ambiguous);
        assert_eq!(match_tokens("", &p), Decision::Ambiguous);
    }

    #[test]
    fn test_reprompt_forever_never_resolves() {
        let p = VoiceProfile::default();
        let mut guard = ConfirmationGuard::new(ConfirmPolicy::RepromptForever);
        for _ in 0..100 {
            assert_eq!(guard.decide("maybe", &p), Decision::Ambiguous);
        }
        assert_eq!(guard.decide("yes", &p), Decision::Affirm);
    }

    #[test]
    fn test_cancel_after_limit_fails_closed() {
        let p = VoiceProfile::default();
        let mut guard = ConfirmationGuard::new(ConfirmPolicy::CancelAfter(3));
        assert_eq!(guard.decide("hmm", &p), Decision::Ambiguous);
        assert_eq!(guard.decide("what", &p), Decision::Ambiguous);
        assert_eq!(guard.decide("eh", &p), Decision::Deny);
    }

    #[test]
    fn test_ambiguity_never_affirms() {
        let p = VoiceProfile::default();
        let mut guard = ConfirmationGuard::new(ConfirmPolicy::CancelAfter(1));
        assert_ne!(guard.decide("maybe", &p), Decision::Affirm);
    }
}
