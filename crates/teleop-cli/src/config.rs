//! Optional node configuration read from `~/.teleop/config.toml`.
//!
//! Only the bus plumbing is configurable. Key bindings and the initial
//! speed / turn rate are compiled in.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use teleop_middleware::TopicNames;

/// Node configuration. Every field has a default, so a partial (or absent)
/// file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name the node reports in logs and traces.
    #[serde(default = "default_node_name")]
    pub node_name: String,

    #[serde(default = "default_cmd_vel_topic")]
    pub cmd_vel_topic: String,

    #[serde(default = "default_rest_topic")]
    pub rest_topic: String,

    #[serde(default = "default_trot_topic")]
    pub trot_topic: String,

    #[serde(default = "default_crawl_topic")]
    pub crawl_topic: String,

    #[serde(default = "default_stand_topic")]
    pub stand_topic: String,

    /// Per-topic bus buffer; must be at least 1.
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,

    /// Log every published message as a rosbridge JSON frame (debug level).
    #[serde(default)]
    pub echo_frames: bool,
}

fn default_node_name() -> String {
    "teleop_twist_keyboard".to_string()
}
fn default_cmd_vel_topic() -> String {
    "cmd_vel_key".to_string()
}
fn default_rest_topic() -> String {
    "rest_cmd".to_string()
}
fn default_trot_topic() -> String {
    "trot_cmd".to_string()
}
fn default_crawl_topic() -> String {
    "crawl_cmd".to_string()
}
fn default_stand_topic() -> String {
    "stand_cmd".to_string()
}
fn default_bus_capacity() -> usize {
    teleop_middleware::bus::DEFAULT_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_name: default_node_name(),
            cmd_vel_topic: default_cmd_vel_topic(),
            rest_topic: default_rest_topic(),
            trot_topic: default_trot_topic(),
            crawl_topic: default_crawl_topic(),
            stand_topic: default_stand_topic(),
            bus_capacity: default_bus_capacity(),
            echo_frames: false,
        }
    }
}

impl Config {
    pub fn topic_names(&self) -> TopicNames {
        TopicNames {
            cmd_vel: self.cmd_vel_topic.clone(),
            rest: self.rest_topic.clone(),
            trot: self.trot_topic.clone(),
            crawl: self.crawl_topic.clone(),
            stand: self.stand_topic.clone(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.bus_capacity == 0 {
            return Err("bus_capacity must be at least 1".to_string());
        }
        let names = [
            &self.cmd_vel_topic,
            &self.rest_topic,
            &self.trot_topic,
            &self.crawl_topic,
            &self.stand_topic,
        ];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err("topic names must not be empty".to_string());
        }
        Ok(())
    }
}

/// Return the path to `~/.teleop/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".teleop").join("config.toml")
}

/// Load the configuration, falling back to defaults when no file exists.
/// Environment overrides are applied in both cases.
pub fn load() -> Result<Config, String> {
    let mut cfg = load_from(&config_path())?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

/// Load the config from a specific path.  Returns `None` if the file does
/// not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

/// Apply `TELEOP_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `TELEOP_NODE_NAME` | `node_name` |
/// | `TELEOP_CMD_VEL_TOPIC` | `cmd_vel_topic` |
/// | `TELEOP_BUS_CAPACITY` | `bus_capacity` |
/// | `TELEOP_ECHO_FRAMES` | `echo_frames` (`1`/`true` or `0`/`false`) |
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("TELEOP_NODE_NAME") {
        cfg.node_name = v;
    }
    if let Ok(v) = std::env::var("TELEOP_CMD_VEL_TOPIC") {
        cfg.cmd_vel_topic = v;
    }
    if let Ok(v) = std::env::var("TELEOP_BUS_CAPACITY")
        && let Ok(capacity) = v.parse::<usize>()
    {
        cfg.bus_capacity = capacity;
    }
    if let Ok(v) = std::env::var("TELEOP_ECHO_FRAMES") {
        match v.to_ascii_lowercase().as_str() {
            "1" | "true" => cfg.echo_frames = true,
            "0" | "false" => cfg.echo_frames = false,
            _ => {}
        }
    }
}
