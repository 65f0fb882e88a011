//! Keystroke dispatch.
//!
//! [`dispatch`] is a pure function: it takes the current [`SessionState`],
//! one key and the [`KeyBindings`], and returns the next state together with
//! the [`Command`] to emit. Nothing here touches the terminal or the bus.
//!
//! Keys are resolved in fixed priority order:
//!
//! 1. movement key → replace the direction;
//! 2. speed key → scale speed and turn, keep the direction;
//! 3. control key → zero the direction, select exactly one mode;
//! 4. anything else → zero the direction, keep the mode flags as they were.
//!    The interrupt character (`0x03`) terminates instead.
//!
//! Speed and turn are never clamped; repeated scale-up keys grow them
//! without bound.

use teleop_types::{Direction, Mode, ModeSignals, Twist, Vector3};

use crate::bindings::KeyBindings;

/// ASCII ETX, delivered for Ctrl-C when the terminal is in raw mode.
pub const INTERRUPT: char = '\x03';

/// Linear speed (m/s) at startup.
pub const INITIAL_SPEED: f64 = 0.5;

/// Turn rate (rad/s) at startup.
pub const INITIAL_TURN: f64 = 1.0;

/// Mutable state of one teleop session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionState {
    pub speed: f64,
    pub turn: f64,
    pub direction: Direction,
    /// Last mode selected by a control key; `None` until one is pressed.
    pub mode: Option<Mode>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            speed: INITIAL_SPEED,
            turn: INITIAL_TURN,
            direction: Direction::ZERO,
            mode: None,
        }
    }
}

impl SessionState {
    pub fn mode_signals(&self) -> ModeSignals {
        ModeSignals::from(self.mode)
    }
}

/// What a key did to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Moved,
    SpeedScaled,
    ModeSelected(Mode),
    /// Unbound key: the robot was stopped.
    Stopped,
}

/// Everything published for one keystroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub twist: Twist,
    pub modes: ModeSignals,
}

impl Command {
    /// Scale the state's direction by its speed and turn rate.
    ///
    /// Linear is `(x, y, z) · speed`; angular is `(0, 0, turn · turn_rate)`.
    pub fn from_state(state: &SessionState) -> Self {
        let d = state.direction;
        Self {
            twist: Twist {
                linear: Vector3::new(d.x * state.speed, d.y * state.speed, d.z * state.speed),
                angular: Vector3::new(0.0, 0.0, d.turn * state.turn),
            },
            modes: state.mode_signals(),
        }
    }
}

/// Result of one successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dispatched {
    pub key: char,
    pub state: SessionState,
    pub outcome: KeyOutcome,
    pub command: Command,
}

/// Loop transition produced by a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Continue(Dispatched),
    Terminate,
}

/// Resolve `key` against `bindings` and compute the next state.
pub fn dispatch(state: &SessionState, key: char, bindings: &KeyBindings) -> Step {
    let mut next = *state;

    let outcome = if let Some(direction) = bindings.movement(key) {
        next.direction = direction;
        KeyOutcome::Moved
    } else if let Some(factor) = bindings.speed(key) {
        next.speed *= factor.linear;
        next.turn *= factor.angular;
        KeyOutcome::SpeedScaled
    } else if let Some(mode) = bindings.control(key) {
        next.direction = Direction::ZERO;
        next.mode = Some(mode);
        KeyOutcome::ModeSelected(mode)
    } else {
        if key == INTERRUPT {
            return Step::Terminate;
        }
        next.direction = Direction::ZERO;
        KeyOutcome::Stopped
    };

    Step::Continue(Dispatched {
        key,
        state: next,
        outcome,
        command: Command::from_state(&next),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::SpeedFactor;

    const EPS: f64 = 1e-9;

    fn step(state: &SessionState, key: char) -> Dispatched {
        match dispatch(state, key, &KeyBindings::standard()) {
            Step::Continue(d) => d,
            Step::Terminate => panic!("{key:?} must not terminate"),
        }
    }

    fn trotting() -> SessionState {
        SessionState {
            speed: 0.7,
            turn: 1.3,
            direction: Direction::new(1.0, 0.0, 0.0, -1.0),
            mode: Some(Mode::Trot),
        }
    }

    #[test]
    fn initial_state() {
        let s = SessionState::default();
        assert_eq!(s.speed, 0.5);
        assert_eq!(s.turn, 1.0);
        assert!(s.direction.is_zero());
        assert_eq!(s.mode_signals(), ModeSignals::default());
    }

    #[test]
    fn every_move_key_sets_direction_only() {
        let bindings = KeyBindings::standard();
        let before = trotting();
        for key in bindings.move_keys() {
            let d = step(&before, key);
            assert_eq!(d.outcome, KeyOutcome::Moved);
            assert_eq!(d.state.direction, bindings.movement(key).unwrap());
            assert_eq!(d.state.speed, before.speed);
            assert_eq!(d.state.turn, before.turn);
            assert_eq!(d.state.mode, before.mode, "{key:?} must not touch modes");
        }
    }

    #[test]
    fn every_speed_key_scales_and_keeps_direction() {
        let bindings = KeyBindings::standard();
        let before = trotting();
        for key in bindings.speed_keys() {
            let factor = bindings.speed(key).unwrap();
            let d = step(&before, key);
            assert_eq!(d.outcome, KeyOutcome::SpeedScaled);
            assert!((d.state.speed - before.speed * factor.linear).abs() < EPS);
            assert!((d.state.turn - before.turn * factor.angular).abs() < EPS);
            assert_eq!(d.state.direction, before.direction);
            assert_eq!(d.state.mode, before.mode);
        }
    }

    #[test]
    fn control_keys_zero_direction_and_select_one_mode() {
        for (key, mode) in ['a', 's', 'd', 'f'].into_iter().zip(Mode::ALL) {
            let d = step(&trotting(), key);
            assert_eq!(d.outcome, KeyOutcome::ModeSelected(mode));
            assert!(d.state.direction.is_zero());
            for other in Mode::ALL {
                assert_eq!(d.command.modes.get(other), other == mode, "{key:?} → {other}");
            }
        }
    }

    /// Unbound keys stop the robot but leave the last mode selection in
    /// place, unlike control keys which reset all four flags.
    #[test]
    fn unbound_key_stops_but_keeps_mode_flags() {
        let before = trotting();
        for key in ['p', 'g', ' ', '\n', '\x1b', '9'] {
            let d = step(&before, key);
            assert_eq!(d.outcome, KeyOutcome::Stopped);
            assert!(d.state.direction.is_zero());
            assert_eq!(d.command.twist, Twist::STOP);
            assert_eq!(d.state.mode, Some(Mode::Trot));
            assert!(d.command.modes.trot);
            assert_eq!(d.state.speed, before.speed);
        }
    }

    #[test]
    fn interrupt_terminates() {
        let step = dispatch(&trotting(), INTERRUPT, &KeyBindings::standard());
        assert_eq!(step, Step::Terminate);
    }

    #[test]
    fn forward_then_faster() {
        let start = SessionState::default();

        let forward = step(&start, 'i');
        assert_eq!(forward.state.direction, Direction::new(1.0, 0.0, 0.0, 0.0));
        assert!((forward.command.twist.linear.x - 0.5).abs() < EPS);
        assert_eq!(forward.command.twist.angular, Vector3::ZERO);

        let faster = step(&forward.state, 'q');
        assert!((faster.state.speed - 0.55).abs() < EPS);
        assert!((faster.state.turn - 1.1).abs() < EPS);
        assert_eq!(faster.state.direction, Direction::new(1.0, 0.0, 0.0, 0.0));
        assert!((faster.command.twist.linear.x - 0.55).abs() < EPS);
        assert_eq!(faster.command.twist.linear.y, 0.0);
    }

    #[test]
    fn rest_then_slower_keeps_rest() {
        let rest = step(&SessionState::default(), 'a');
        assert!(rest.command.modes.rest);
        assert!(!rest.command.modes.trot && !rest.command.modes.crawl && !rest.command.modes.stand);
        assert!(rest.state.direction.is_zero());

        let slower = step(&rest.state, 'z');
        assert_eq!(slower.outcome, KeyOutcome::SpeedScaled);
        assert!((slower.state.speed - 0.45).abs() < EPS);
        assert!(slower.command.modes.rest, "speed keys leave mode flags alone");
    }

    #[test]
    fn unbound_p_after_mode_keeps_it() {
        let stand = step(&SessionState::default(), 'f');
        let moving = step(&stand.state, 'u');
        let stopped = step(&moving.state, 'p');
        assert!(stopped.state.direction.is_zero());
        assert_eq!(stopped.command.modes, stand.command.modes);
    }

    #[test]
    fn turning_scales_angular_by_turn_rate() {
        let faster_turn = step(&SessionState::default(), 'e');
        let left = step(&faster_turn.state, 'j');
        assert!((left.command.twist.angular.z - 1.1).abs() < EPS);
        assert_eq!(left.command.twist.linear, Vector3::ZERO);
        assert_eq!(left.command.twist.angular.x, 0.0);
        assert_eq!(left.command.twist.angular.y, 0.0);
    }

    /// No upper bound is enforced on speed or turn.
    #[test]
    fn speed_grows_without_bound() {
        let mut state = SessionState::default();
        for _ in 0..200 {
            state = step(&state, 'q').state;
        }
        assert!(state.speed > 1.0e6);
        assert!(state.turn > 1.0e6);
    }

    #[test]
    fn alternate_layout_is_honoured() {
        let bindings = KeyBindings::new(
            [('w', Direction::new(1.0, 0.0, 0.0, 0.0))],
            [('+', SpeedFactor::new(2.0, 1.0))],
            ['1', '2', '3', '4'],
        );
        let Step::Continue(d) = dispatch(&SessionState::default(), 'w', &bindings) else {
            panic!("w must continue");
        };
        assert_eq!(d.outcome, KeyOutcome::Moved);

        let Step::Continue(d) = dispatch(&d.state, '+', &bindings) else {
            panic!("+ must continue");
        };
        assert!((d.command.twist.linear.x - 1.0).abs() < EPS);

        let Step::Continue(d) = dispatch(&d.state, '3', &bindings) else {
            panic!("3 must continue");
        };
        assert_eq!(d.outcome, KeyOutcome::ModeSelected(Mode::Crawl));

        let Step::Continue(d) = dispatch(&d.state, 'i', &bindings) else {
            panic!("i must continue");
        };
        assert_eq!(d.outcome, KeyOutcome::Stopped);
    }
}
