//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::AGENT_TAG_REGEX;
use crate::agent::{AgentRegistry, AgentType, CommandAgent};
use crate::error::{FlowError, Result};
use std::collections::BTreeSet;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FlowError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults when it does
    /// not exist. A file that exists but is invalid is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| FlowError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            FlowError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - every workflow has at least one step
    /// - workflow steps and agent keys are valid agent-type tags
    /// - a workflow lists each agent type at most once
    /// - agent commands are non-empty
    /// - timeouts are positive
    pub fn validate(&self) -> Result<()> {
        for (name, steps) in &self.workflows {
            if name.trim().is_empty() {
                return Err(FlowError::ConfigError(
                    "config validation failed: workflow names must be non-empty".to_string(),
                ));
            }
            if steps.is_empty() {
                return Err(FlowError::ConfigError(format!(
                    "config validation failed: workflow '{}' has no steps",
                    name
                )));
            }

            let mut seen = BTreeSet::new();
            for step in steps {
                validate_tag(step, &format!("workflow '{}'", name))?;
                if !seen.insert(step.as_str()) {
                    return Err(FlowError::ConfigError(format!(
                        "config validation failed: workflow '{}' lists '{}' more than once",
                        name, step
                    )));
                }
            }
        }

        for (tag, profile) in &self.agents {
            validate_tag(tag, "agents")?;
            if profile.command.trim().is_empty() {
                return Err(FlowError::ConfigError(format!(
                    "config validation failed: agent '{}' has an empty command",
                    tag
                )));
            }
            if profile.timeout_seconds == Some(0) {
                return Err(FlowError::ConfigError(format!(
                    "config validation failed: agent '{}' timeout_seconds must be greater than 0",
                    tag
                )));
            }
        }

        if self.defaults.timeout_seconds == 0 {
            return Err(FlowError::ConfigError(
                "config validation failed: defaults.timeout_seconds must be greater than 0"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Agent types of a configured workflow (empty if not configured).
    pub fn workflow_steps(&self, workflow_name: &str) -> Vec<AgentType> {
        self.workflows
            .get(workflow_name)
            .map(|steps| steps.iter().map(|s| AgentType::from(s.as_str())).collect())
            .unwrap_or_default()
    }

    /// Build a registry with one [`CommandAgent`] factory per agent profile.
    pub fn agent_registry(&self) -> AgentRegistry {
        let mut registry = AgentRegistry::new();
        for (tag, profile) in &self.agents {
            let agent = CommandAgent::new(
                AgentType::from(tag.as_str()),
                profile.clone(),
                self.defaults.clone(),
                self.log_dir.clone(),
            );
            registry.register(AgentType::from(tag.as_str()), move || {
                Ok(Box::new(agent.clone()))
            });
        }
        registry
    }
}

fn validate_tag(tag: &str, location: &str) -> Result<()> {
    if AGENT_TAG_REGEX.is_match(tag) {
        Ok(())
    } else {
        Err(FlowError::ConfigError(format!(
            "config validation failed: invalid agent type '{}' in {}. \
             Agent types must be lowercase letters, digits, '-' or '_' (e.g. 'plan', 'security-review').",
            tag, location
        )))
    }
}
