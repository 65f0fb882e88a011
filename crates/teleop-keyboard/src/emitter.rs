//! Publishes one [`Command`] per keystroke onto the [`EventBus`].
//!
//! Every call sends five messages: the twist on [`Topic::CmdVel`] and each
//! of the four mode flags on its own topic. Nothing is skipped when the
//! command is unchanged, so listeners see one message per keystroke on
//! every topic.

use teleop_middleware::{EventBus, Topic};
use teleop_types::{Event, EventPayload, Mode};
use tracing::{debug, trace};

use crate::dispatch::Command;

/// Source tag stamped on every emitted event.
pub const SOURCE: &str = "teleop-keyboard::emitter";

/// Write-only handle onto the bus.
#[derive(Clone, Debug)]
pub struct CommandEmitter {
    bus: EventBus,
}

impl CommandEmitter {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Publish `command` on all five topics.
    ///
    /// Publish failures (e.g. a topic with no listener) are traced and
    /// otherwise ignored.
    pub fn emit(&self, command: &Command) {
        let twist = command.twist;
        debug!(
            linear_x = twist.linear.x,
            linear_y = twist.linear.y,
            linear_z = twist.linear.z,
            angular_z = twist.angular.z,
            mode = ?command.modes.active(),
            "emitting command"
        );

        self.publish(Topic::CmdVel, EventPayload::Twist(twist));
        for mode in Mode::ALL {
            self.publish(
                Topic::for_mode(mode),
                EventPayload::ModeSignal {
                    mode,
                    active: command.modes.get(mode),
                },
            );
        }
    }

    fn publish(&self, topic: Topic, payload: EventPayload) {
        if let Err(e) = self.bus.publish_to(topic, Event::new(SOURCE, payload)) {
            trace!(?topic, error = %e, "publish dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::SessionState;
    use teleop_types::{Direction, Twist};

    #[test]
    fn emits_twist_and_four_flags() {
        let bus = EventBus::default();
        let mut tap = bus.subscribe_all();
        let emitter = CommandEmitter::new(bus);

        let state = SessionState {
            direction: Direction::new(1.0, 1.0, 0.0, 0.0),
            mode: Some(Mode::Crawl),
            ..SessionState::default()
        };
        emitter.emit(&Command::from_state(&state));

        let events = tap.drain();
        assert_eq!(events.len(), 5);

        let (topic, first) = &events[0];
        assert_eq!(*topic, Topic::CmdVel);
        assert_eq!(first.source, SOURCE);
        let EventPayload::Twist(twist) = first.payload else {
            panic!("cmd_vel must carry a twist");
        };
        assert_eq!(twist.linear.x, 0.5);
        assert_eq!(twist.linear.y, 0.5);

        for (topic, event) in &events[1..] {
            let EventPayload::ModeSignal { mode, active } = event.payload else {
                panic!("mode topics carry mode flags");
            };
            assert_eq!(*topic, Topic::for_mode(mode));
            assert_eq!(active, mode == Mode::Crawl);
        }
    }

    #[test]
    fn repeats_unchanged_commands() {
        let bus = EventBus::default();
        let mut cmd_vel = bus.subscribe_to(Topic::CmdVel);
        let emitter = CommandEmitter::new(bus);

        let command = Command::from_state(&SessionState::default());
        emitter.emit(&command);
        emitter.emit(&command);

        for _ in 0..2 {
            let event = cmd_vel.try_recv().expect("one twist per emit");
            assert_eq!(event.payload, EventPayload::Twist(Twist::STOP));
        }
        assert!(cmd_vel.try_recv().is_none());
    }

    #[test]
    fn emit_without_listeners_is_silent() {
        let emitter = CommandEmitter::new(EventBus::default());
        emitter.emit(&Command::from_state(&SessionState::default()));
    }
}
