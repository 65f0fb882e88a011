//! `teleop_twist_keyboard` – keyboard teleoperation for a legged base.
//!
//! This binary:
//!
//! 1. Initialises structured logging (stderr) with optional OTLP export.
//! 2. Loads `~/.teleop/config.toml` (optional) plus `TELEOP_*` overrides.
//! 3. Wires the [`CommandEmitter`] to a fresh [`EventBus`].
//! 4. Runs the raw-mode key loop until Ctrl-C, publishing a twist and the
//!    four mode flags after every key.

mod config;
mod telemetry;

use std::io;
use std::process::ExitCode;

use colored::Colorize;
use tracing::{debug, error, info, warn};

use teleop_keyboard::{CommandEmitter, KeyBindings, TerminalKeys, teleop_loop};
use teleop_middleware::{BusTap, EventBus, RosbridgeEncoder};
use teleop_types::TeleopError;

fn main() -> ExitCode {
    let cfg = match config::load() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!("{}: {}", "Config error".red(), e);
            eprintln!("  Using default configuration.");
            None
        }
    };
    let cfg = cfg.unwrap_or_default();

    let _telemetry = telemetry::init_tracing(&cfg.node_name);
    info!(
        node = %cfg.node_name,
        config = %config::config_path().display(),
        cmd_vel = %cfg.cmd_vel_topic,
        echo_frames = cfg.echo_frames,
        "starting keyboard teleop"
    );

    match run(&cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "teleop loop failed");
            eprintln!();
            eprintln!("{}: {}", "teleop_twist_keyboard".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cfg: &config::Config) -> Result<(), TeleopError> {
    let bus = EventBus::new(cfg.bus_capacity);
    let emitter = CommandEmitter::new(bus.clone());
    let bindings = KeyBindings::standard();
    let mut echo = cfg
        .echo_frames
        .then(|| FrameEcho::new(bus.subscribe_all(), RosbridgeEncoder::new(cfg.topic_names())));

    let mut keys = TerminalKeys::new();
    let mut stdout = io::stdout();
    let last = teleop_loop::run(&mut keys, &bindings, &emitter, &mut stdout, |_| {
        if let Some(echo) = echo.as_mut() {
            echo.flush();
        }
    })?;

    info!(speed = last.speed, turn = last.turn, "teleop stopped");
    Ok(())
}

/// Logs every bus message as the rosbridge frame it would travel as.
struct FrameEcho {
    tap: BusTap,
    encoder: RosbridgeEncoder,
}

impl FrameEcho {
    fn new(tap: BusTap, encoder: RosbridgeEncoder) -> Self {
        Self { tap, encoder }
    }

    fn flush(&mut self) {
        for (topic, event) in self.tap.drain() {
            match self.encoder.encode(topic, &event) {
                Ok(frame) => debug!(target: "teleop::frames", %frame),
                Err(e) => warn!(?topic, error = %e, "could not encode frame"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teleop_keyboard::{Command, SessionState};

    #[test]
    fn frame_echo_drains_every_topic() {
        let bus = EventBus::default();
        let mut echo = FrameEcho::new(bus.subscribe_all(), RosbridgeEncoder::default());
        let emitter = CommandEmitter::new(bus);

        emitter.emit(&Command::from_state(&SessionState::default()));
        echo.flush();
        assert!(echo.tap.drain().is_empty(), "flush consumes all five messages");
    }
}
