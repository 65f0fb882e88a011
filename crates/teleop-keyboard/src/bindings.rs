//! Keystroke lookup tables.
//!
//! Three tables drive the dispatcher:
//!
//! | Table | Maps | Size |
//! |---|---|---|
//! | movement | key → unit [`Direction`] | 20 |
//! | speed | key → [`SpeedFactor`] | 6 |
//! | control | position → [`Mode`] | 4 |
//!
//! [`KeyBindings::standard`] returns the layout the node ships with. Tests
//! (or alternate keyboards) can build their own [`KeyBindings`] and hand it
//! to [`dispatch`][crate::dispatch::dispatch].

use std::collections::HashMap;

use teleop_types::{Direction, Mode};

/// Multiplicative adjustment applied to the current speed and turn rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedFactor {
    pub linear: f64,
    pub angular: f64,
}

impl SpeedFactor {
    pub const fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }
}

const MOVE_TABLE: [(char, Direction); 20] = [
    ('i', Direction::new(1.0, 0.0, 0.0, 0.0)),
    ('o', Direction::new(1.0, 0.0, 0.0, -1.0)),
    ('j', Direction::new(0.0, 0.0, 0.0, 1.0)),
    ('l', Direction::new(0.0, 0.0, 0.0, -1.0)),
    ('u', Direction::new(1.0, 0.0, 0.0, 1.0)),
    (',', Direction::new(-1.0, 0.0, 0.0, 0.0)),
    ('.', Direction::new(-1.0, 0.0, 0.0, 1.0)),
    ('m', Direction::new(-1.0, 0.0, 0.0, -1.0)),
    ('O', Direction::new(1.0, -1.0, 0.0, 0.0)),
    ('I', Direction::new(1.0, 0.0, 0.0, 0.0)),
    ('J', Direction::new(0.0, 1.0, 0.0, 0.0)),
    ('L', Direction::new(0.0, -1.0, 0.0, 0.0)),
    ('U', Direction::new(1.0, 1.0, 0.0, 0.0)),
    ('<', Direction::new(-1.0, 0.0, 0.0, 0.0)),
    ('>', Direction::new(-1.0, -1.0, 0.0, 0.0)),
    ('M', Direction::new(-1.0, 1.0, 0.0, 0.0)),
    ('t', Direction::new(0.0, 0.0, 1.0, 0.0)),
    ('b', Direction::new(0.0, 0.0, -1.0, 0.0)),
    ('k', Direction::new(0.0, 0.0, 0.0, 0.0)),
    ('K', Direction::new(0.0, 0.0, 0.0, 0.0)),
];

const SPEED_TABLE: [(char, SpeedFactor); 6] = [
    ('q', SpeedFactor::new(1.1, 1.1)),
    ('z', SpeedFactor::new(0.9, 0.9)),
    ('w', SpeedFactor::new(1.1, 1.0)),
    ('x', SpeedFactor::new(0.9, 1.0)),
    ('e', SpeedFactor::new(1.0, 1.1)),
    ('c', SpeedFactor::new(1.0, 0.9)),
];

const CONTROL_KEYS: [char; 4] = ['a', 's', 'd', 'f'];

/// The three immutable binding tables.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    moves: HashMap<char, Direction>,
    speeds: HashMap<char, SpeedFactor>,
    /// Position `i` selects `Mode::ALL[i]`.
    controls: [char; 4],
}

impl KeyBindings {
    /// Build bindings from explicit tables.
    pub fn new(
        moves: impl IntoIterator<Item = (char, Direction)>,
        speeds: impl IntoIterator<Item = (char, SpeedFactor)>,
        controls: [char; 4],
    ) -> Self {
        Self {
            moves: moves.into_iter().collect(),
            speeds: speeds.into_iter().collect(),
            controls,
        }
    }

    /// The compiled-in layout: `uiojklm,.` driving, shifted keys for
    /// holonomic strafing, `t`/`b` for ±z, `qzwxec` speed scaling, and
    /// `asdf` for Rest/Trot/Crawl/Stand.
    pub fn standard() -> Self {
        Self::new(MOVE_TABLE, SPEED_TABLE, CONTROL_KEYS)
    }

    pub fn movement(&self, key: char) -> Option<Direction> {
        self.moves.get(&key).copied()
    }

    pub fn speed(&self, key: char) -> Option<SpeedFactor> {
        self.speeds.get(&key).copied()
    }

    /// Mode selected by `key`, chosen by the key's position in the control list.
    pub fn control(&self, key: char) -> Option<Mode> {
        self.controls
            .iter()
            .position(|k| *k == key)
            .map(|i| Mode::ALL[i])
    }

    pub fn move_keys(&self) -> impl Iterator<Item = char> + '_ {
        self.moves.keys().copied()
    }

    pub fn speed_keys(&self) -> impl Iterator<Item = char> + '_ {
        self.speeds.keys().copied()
    }

    pub fn control_keys(&self) -> [char; 4] {
        self.controls
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::standard()
    }
}
