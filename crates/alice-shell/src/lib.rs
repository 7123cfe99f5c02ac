//! Alice Shell - voice/typed command console in front of the codex CLI
//!
//! The binary wires the pieces together; everything observable lives in
//! library modules so the controller can be driven end-to-end from tests
//! with mock codex and executor seams.

pub mod cli;
pub mod codex;
pub mod commands;
pub mod controller;
pub mod display;
pub mod exec;
pub mod session_log;
pub mod voice;
