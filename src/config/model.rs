//! Config struct definition and default implementation.

use super::types::*;
use crate::agent::{AgentDefaults, AgentProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for agentflow.
///
/// This struct represents the contents of `agentflow.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Workflow settings
    // =========================================================================
    /// User-defined workflows: name to ordered agent-type tags.
    ///
    /// A workflow defined here replaces a built-in workflow of the same name.
    #[serde(default)]
    pub workflows: BTreeMap<String, Vec<String>>,

    /// Append-only NDJSON log of workflow runs (disabled when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_log: Option<PathBuf>,

    // =========================================================================
    // Agent settings
    // =========================================================================
    /// Command-backed agent profiles keyed by agent-type tag.
    #[serde(default)]
    pub agents: BTreeMap<String, AgentProfile>,

    /// Defaults applied to every agent profile.
    #[serde(default)]
    pub defaults: AgentDefaults,

    /// Directory receiving per-invocation prompts and output captures.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workflows: BTreeMap::new(),
            event_log: None,
            agents: BTreeMap::new(),
            defaults: AgentDefaults::default(),
            log_dir: default_log_dir(),
        }
    }
}
