//! The interactive read → dispatch → emit loop.
//!
//! The loop is single-threaded and blocks on each key, so its cadence is
//! the operator's typing cadence. It has two states, running and
//! terminated; only the interrupt key moves it to terminated, and nothing
//! is emitted for that key.

use std::io::Write;

use teleop_types::TeleopError;
use tracing::{debug, info, instrument};

use crate::bindings::KeyBindings;
use crate::console;
use crate::dispatch::{Dispatched, KeyOutcome, SessionState, Step, dispatch};
use crate::emitter::CommandEmitter;
use crate::terminal::KeySource;

/// Run until the interrupt key, printing console text to `out`.
///
/// `after_emit` is called once per emitted command, after the bus publish.
/// Returns the final session state.
///
/// # Errors
///
/// Any error from `keys` ends the loop and is returned as-is.
#[instrument(skip_all)]
pub fn run<K, W, F>(
    keys: &mut K,
    bindings: &KeyBindings,
    emitter: &CommandEmitter,
    out: &mut W,
    mut after_emit: F,
) -> Result<SessionState, TeleopError>
where
    K: KeySource,
    W: Write,
    F: FnMut(&Dispatched),
{
    let mut state = SessionState::default();

    write!(out, "{}", console::USAGE).ok();
    write!(out, "{}", console::awaiting(&state)).ok();
    out.flush().ok();
    info!(speed = state.speed, turn = state.turn, "teleop loop started");

    loop {
        let key = keys.next_key()?;

        let dispatched = match dispatch(&state, key, bindings) {
            Step::Continue(d) => d,
            Step::Terminate => {
                write!(out, "{}", console::FAREWELL).ok();
                out.flush().ok();
                info!("interrupt received, leaving teleop loop");
                return Ok(state);
            }
        };
        state = dispatched.state;

        let line = match dispatched.outcome {
            KeyOutcome::Stopped => {
                debug!(key = ?key, "unbound key, stopping");
                console::invalid_command(&state, key)
            }
            outcome => {
                debug!(key = ?key, ?outcome, "key dispatched");
                console::last_command(&state, key)
            }
        };
        write!(out, "{line}").ok();
        out.flush().ok();

        emitter.emit(&dispatched.command);
        after_emit(&dispatched);
    }
}
