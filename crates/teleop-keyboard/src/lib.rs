//! `teleop-keyboard` – keystrokes in, velocity commands and mode flags out.
//!
//! # Modules
//!
//! - [`bindings`] – the movement, speed and control key tables.
//! - [`dispatch`] – the pure key → state transition and the outgoing
//!   [`Command`][dispatch::Command].
//! - [`emitter`] – publishes each command on the bus.
//! - [`terminal`] – raw-mode single-key reads behind the
//!   [`KeySource`][terminal::KeySource] trait.
//! - [`console`] – banner and status-line text.
//! - [`teleop_loop`] – ties the above together until Ctrl-C.

pub mod bindings;
pub mod console;
pub mod dispatch;
pub mod emitter;
pub mod teleop_loop;
pub mod terminal;

pub use bindings::{KeyBindings, SpeedFactor};
pub use dispatch::{Command, Dispatched, KeyOutcome, SessionState, Step, dispatch};
pub use emitter::CommandEmitter;
pub use terminal::{KeySource, RawModeGuard, TerminalKeys};
