//! Shared core for the alice-shell voice console
//!
//! Everything here is deterministic and I/O-free apart from settings and
//! profile file handling: the history buffer, the model-reply parser, the
//! command classifier, the confirmation guard, the prompt composer, and the
//! session state they hang off.

pub mod classify;
pub mod composer;
pub mod confirm;
pub mod history;
pub mod profile;
pub mod response;
pub mod session;
pub mod settings;

pub use classify::{route, CommandKind, Routed, DEFAULT_INTERNAL_PREFIX};
pub use composer::SuggestionKind;
pub use confirm::{ConfirmPolicy, ConfirmationGuard, Decision};
pub use history::{EntryKind, HistoryBuffer, HistoryEntry};
pub use profile::VoiceProfile;
pub use response::{parse_reply, ParseError, ParsedReply};
pub use session::{GatedAction, Mode, PendingAction, Session};
pub use settings::{BufferMode, ReasoningLevel, Settings};
