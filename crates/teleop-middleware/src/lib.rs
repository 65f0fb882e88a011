//! `teleop-middleware` – message plumbing for the keyboard teleop node.
//!
//! # Modules
//!
//! - [`bus`] – typed, topic-based publish/subscribe bus built on Tokio
//!   broadcast channels, one lane per outgoing stream.
//! - [`rosbridge`] – encodes bus events as rosbridge v2 `publish` frames so
//!   traffic can be forwarded to (or inspected as) ROS messages.

pub mod bus;
pub mod rosbridge;

pub use bus::{BusTap, EventBus, Topic, TopicReceiver};
pub use rosbridge::{RosbridgeEncoder, TopicNames};
