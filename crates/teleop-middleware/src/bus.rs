//! Typed, topic-based publish/subscribe message bus.
//!
//! Uses [`tokio::sync::broadcast`] channels under the hood so that every
//! subscriber receives every message without any single subscriber blocking
//! the others. Publishing is synchronous, so the bus can be driven from a
//! plain blocking loop without a runtime.
//!
//! # Topics
//!
//! One [`Topic`] lane per outgoing message stream of the teleop node:
//!
//! | Topic | Payload |
//! |---|---|
//! | [`Topic::CmdVel`] | [`EventPayload::Twist`][teleop_types::EventPayload::Twist] velocity commands |
//! | [`Topic::RestCmd`] | `Rest` mode flag |
//! | [`Topic::TrotCmd`] | `Trot` mode flag |
//! | [`Topic::CrawlCmd`] | `Crawl` mode flag |
//! | [`Topic::StandCmd`] | `Stand` mode flag |

use teleop_types::{Event, Mode, TeleopError};
use tokio::sync::broadcast;
use tracing::warn;

/// Default channel capacity (number of buffered events before old ones are
/// dropped for slow subscribers).
pub const DEFAULT_CAPACITY: usize = 64;

/// Enumeration of all routing topics on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Velocity commands for the base.
    CmdVel,
    RestCmd,
    TrotCmd,
    CrawlCmd,
    StandCmd,
}

impl Topic {
    /// Every topic, in publish order.
    pub const ALL: [Topic; 5] = [
        Topic::CmdVel,
        Topic::RestCmd,
        Topic::TrotCmd,
        Topic::CrawlCmd,
        Topic::StandCmd,
    ];

    /// The topic carrying the flag for `mode`.
    pub fn for_mode(mode: Mode) -> Topic {
        match mode {
            Mode::Rest => Topic::RestCmd,
            Mode::Trot => Topic::TrotCmd,
            Mode::Crawl => Topic::CrawlCmd,
            Mode::Stand => Topic::StandCmd,
        }
    }
}

/// Shared message bus. Clone it cheaply – all clones share the same
/// underlying broadcast channels.
#[derive(Clone, Debug)]
pub struct EventBus {
    cmd_vel: broadcast::Sender<Event>,
    rest_cmd: broadcast::Sender<Event>,
    trot_cmd: broadcast::Sender<Event>,
    crawl_cmd: broadcast::Sender<Event>,
    stand_cmd: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new bus with the given channel capacity.
    ///
    /// The `capacity` is applied to every topic channel independently.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (a tokio broadcast restriction).
    pub fn new(capacity: usize) -> Self {
        let (cmd_vel, _) = broadcast::channel(capacity);
        let (rest_cmd, _) = broadcast::channel(capacity);
        let (trot_cmd, _) = broadcast::channel(capacity);
        let (crawl_cmd, _) = broadcast::channel(capacity);
        let (stand_cmd, _) = broadcast::channel(capacity);
        Self {
            cmd_vel,
            rest_cmd,
            trot_cmd,
            crawl_cmd,
            stand_cmd,
        }
    }

    /// Publish `event` to the given [`Topic`] channel.
    ///
    /// Returns the number of active receivers that were handed the event, or
    /// [`TeleopError::Channel`] when nobody is subscribed to the topic.
    pub fn publish_to(&self, topic: Topic, event: Event) -> Result<usize, TeleopError> {
        self.topic_sender(topic)
            .send(event)
            .map_err(|_| TeleopError::Channel(format!("No subscribers for topic {:?}", topic)))
    }

    /// Subscribe to a specific [`Topic`] channel.
    pub fn subscribe_to(&self, topic: Topic) -> TopicReceiver {
        TopicReceiver {
            topic,
            receiver: self.topic_sender(topic).subscribe(),
        }
    }

    /// Subscribe to every topic at once.
    pub fn subscribe_all(&self) -> BusTap {
        BusTap {
            receivers: Topic::ALL.map(|t| self.subscribe_to(t)),
        }
    }

    /// Number of live subscribers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topic_sender(topic).receiver_count()
    }

    fn topic_sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::CmdVel => &self.cmd_vel,
            Topic::RestCmd => &self.rest_cmd,
            Topic::TrotCmd => &self.trot_cmd,
            Topic::CrawlCmd => &self.crawl_cmd,
            Topic::StandCmd => &self.stand_cmd,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Topic-based receiver
// ---------------------------------------------------------------------------

/// A receiver bound to a single [`Topic`] channel.
///
/// Obtained via [`EventBus::subscribe_to`].
pub struct TopicReceiver {
    topic: Topic,
    receiver: broadcast::Receiver<Event>,
}

impl TopicReceiver {
    /// Wait for the next event on this topic.
    ///
    /// Returns:
    /// * `Ok(event)` – a successfully received event.
    /// * `Err(broadcast::error::RecvError::Lagged(n))` – the subscriber fell
    ///   behind and `n` messages were dropped.
    /// * `Err(broadcast::error::RecvError::Closed)` – the bus has shut down.
    pub async fn recv(&mut self) -> Result<Event, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    /// Take the next buffered event without waiting.
    ///
    /// Returns `None` when nothing is buffered or the bus is closed. A lagged
    /// receiver skips the dropped messages and yields the oldest retained one.
    pub fn try_recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!(topic = ?self.topic, lagged_by = n, "TopicReceiver lagged");
                    continue;
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return None,
            }
        }
    }

    /// The [`Topic`] this receiver is bound to.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

// ---------------------------------------------------------------------------
// All-topic tap
// ---------------------------------------------------------------------------

/// Synchronous observer of every topic.
///
/// Obtained via [`EventBus::subscribe_all`]; call [`BusTap::drain`] to pull
/// everything published since the previous drain.
pub struct BusTap {
    receivers: [TopicReceiver; 5],
}

impl BusTap {
    /// Collect every buffered event, grouped by topic in [`Topic::ALL`] order.
    pub fn drain(&mut self) -> Vec<(Topic, Event)> {
        let mut out = Vec::new();
        for rx in &mut self.receivers {
            while let Some(event) = rx.try_recv() {
                out.push((rx.topic(), event));
            }
        }
        out
    }
}
