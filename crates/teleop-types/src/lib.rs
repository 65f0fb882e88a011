use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A 3D vector in the robot frame, mirroring `geometry_msgs/Vector3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Velocity command: linear velocity (m/s) plus angular velocity (rad/s).
///
/// Field layout matches `geometry_msgs/Twist` so the value can be forwarded
/// to a ROS bridge without reshaping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl Twist {
    /// All-zero twist; the robot holds still.
    pub const STOP: Twist = Twist {
        linear: Vector3::ZERO,
        angular: Vector3::ZERO,
    };
}

/// Unit direction selected by a movement key.
///
/// Every component is one of `-1.0`, `0.0`, or `1.0`. `turn` is the yaw
/// component and ends up in `angular.z` of the outgoing [`Twist`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub turn: f64,
}

impl Direction {
    pub const ZERO: Direction = Direction {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        turn: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64, turn: f64) -> Self {
        Self { x, y, z, turn }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Discrete gait / pose selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Rest,
    Trot,
    Crawl,
    Stand,
}

impl Mode {
    /// All modes in control-key order (position 0 → `Rest`, … 3 → `Stand`).
    pub const ALL: [Mode; 4] = [Mode::Rest, Mode::Trot, Mode::Crawl, Mode::Stand];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Rest => "Rest",
            Mode::Trot => "Trot",
            Mode::Crawl => "Crawl",
            Mode::Stand => "Stand",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The four boolean mode flags published alongside every twist.
///
/// Built from an `Option<Mode>` so at most one flag can ever be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSignals {
    pub rest: bool,
    pub trot: bool,
    pub crawl: bool,
    pub stand: bool,
}

impl ModeSignals {
    /// Value of the flag belonging to `mode`.
    pub fn get(&self, mode: Mode) -> bool {
        match mode {
            Mode::Rest => self.rest,
            Mode::Trot => self.trot,
            Mode::Crawl => self.crawl,
            Mode::Stand => self.stand,
        }
    }

    /// The mode whose flag is set, if any.
    pub fn active(&self) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| self.get(*m))
    }
}

impl From<Option<Mode>> for ModeSignals {
    fn from(mode: Option<Mode>) -> Self {
        Self {
            rest: mode == Some(Mode::Rest),
            trot: mode == Some(Mode::Trot),
            crawl: mode == Some(Mode::Crawl),
            stand: mode == Some(Mode::Stand),
        }
    }
}

/// Unified event wrapper for the message bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g., "teleop-keyboard::emitter"
    pub source: String,
    pub payload: EventPayload,
}

impl Event {
    /// Stamp `payload` with a fresh id and the current time.
    pub fn new(source: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            payload,
        }
    }
}

/// Variants of data that can be routed over the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// Velocity command for the base.
    Twist(Twist),
    /// One of the four mode flags; `active` is the flag's current value.
    ModeSignal { mode: Mode, active: bool },
}

/// Error type shared by every teleop crate.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum TeleopError {
    #[error("Terminal Error: {0}")]
    Terminal(String),

    #[error("Input Closed: standard input reached end of file")]
    InputClosed,

    #[error("Bus Channel Error: {0}")]
    Channel(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),
}
