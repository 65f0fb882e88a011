//! rosbridge v2 JSON frames for bus traffic.
//!
//! [`RosbridgeEncoder`] turns a bus [`Event`] into the `publish` operation a
//! rosbridge server expects:
//!
//! * a [`EventPayload::Twist`] on [`Topic::CmdVel`] becomes a
//!   `geometry_msgs/Twist` message;
//! * a [`EventPayload::ModeSignal`] on its mode topic becomes a
//!   `std_msgs/Bool` message.

use serde_json::json;
use teleop_types::{Event, EventPayload, TeleopError};

use crate::bus::Topic;

/// Wire topic names for each bus [`Topic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicNames {
    pub cmd_vel: String,
    pub rest: String,
    pub trot: String,
    pub crawl: String,
    pub stand: String,
}

impl TopicNames {
    pub fn name(&self, topic: Topic) -> &str {
        match topic {
            Topic::CmdVel => &self.cmd_vel,
            Topic::RestCmd => &self.rest,
            Topic::TrotCmd => &self.trot,
            Topic::CrawlCmd => &self.crawl,
            Topic::StandCmd => &self.stand,
        }
    }
}

impl Default for TopicNames {
    fn default() -> Self {
        Self {
            cmd_vel: "cmd_vel_key".to_string(),
            rest: "rest_cmd".to_string(),
            trot: "trot_cmd".to_string(),
            crawl: "crawl_cmd".to_string(),
            stand: "stand_cmd".to_string(),
        }
    }
}

/// Encodes bus events as rosbridge `publish` frames.
#[derive(Debug, Clone, Default)]
pub struct RosbridgeEncoder {
    names: TopicNames,
}

impl RosbridgeEncoder {
    pub fn new(names: TopicNames) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &TopicNames {
        &self.names
    }

    /// Absolute wire topic for `topic` (leading `/` added when missing).
    pub fn wire_topic(&self, topic: Topic) -> String {
        let name = self.names.name(topic);
        if name.starts_with('/') {
            name.to_string()
        } else {
            format!("/{name}")
        }
    }

    /// Encode `event` as a frame for `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`TeleopError::Serialization`] when the payload does not
    /// belong on `topic` (a twist off [`Topic::CmdVel`], or a mode flag on
    /// a topic other than its own).
    pub fn encode(&self, topic: Topic, event: &Event) -> Result<String, TeleopError> {
        let msg = match (&event.payload, topic) {
            (EventPayload::Twist(twist), Topic::CmdVel) => json!({
                "linear":  { "x": twist.linear.x, "y": twist.linear.y, "z": twist.linear.z },
                "angular": { "x": twist.angular.x, "y": twist.angular.y, "z": twist.angular.z }
            }),
            (EventPayload::ModeSignal { mode, active }, t) if Topic::for_mode(*mode) == t => {
                json!({ "data": active })
            }
            (payload, t) => {
                return Err(TeleopError::Serialization(format!(
                    "payload {payload:?} cannot be published on {t:?}"
                )));
            }
        };
        let frame = json!({
            "op": "publish",
            "topic": self.wire_topic(topic),
            "msg": msg
        });
        Ok(frame.to_string())
    }
}
