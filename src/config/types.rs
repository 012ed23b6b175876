//! Configuration constants and default value functions.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "agentflow.yaml";

/// Valid agent-type tags: lowercase, starting with a letter.
pub(crate) static AGENT_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("Invalid agent tag regex"));

// Default value functions for serde
pub(crate) fn default_log_dir() -> PathBuf {
    PathBuf::from(".agentflow").join("logs")
}
