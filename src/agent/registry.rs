//! Agent-type to factory mapping.

use crate::agent::{Agent, AgentType};
use crate::error::{FlowError, Result};
use std::collections::BTreeMap;

/// Produces a fresh agent instance for one step.
pub type AgentFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Agent>> + Send + Sync>;

/// Registry of agent factories keyed by agent type.
///
/// Supplied by the host application. The orchestrator relies only on the
/// registered keys and on the factory contract.
#[derive(Default)]
pub struct AgentRegistry {
    factories: BTreeMap<AgentType, AgentFactory>,
}

impl AgentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for an agent type.
    pub fn register<F>(&mut self, agent_type: AgentType, factory: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Agent>> + Send + Sync + 'static,
    {
        self.factories.insert(agent_type, Box::new(factory));
        self
    }

    /// Builder-style variant of [`AgentRegistry::register`].
    pub fn with<F>(mut self, agent_type: AgentType, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Agent>> + Send + Sync + 'static,
    {
        self.register(agent_type, factory);
        self
    }

    /// Whether a factory is registered for `agent_type`.
    pub fn contains(&self, agent_type: &AgentType) -> bool {
        self.factories.contains_key(agent_type)
    }

    /// Registered agent types, sorted.
    pub fn agent_types(&self) -> impl Iterator<Item = &AgentType> {
        self.factories.keys()
    }

    /// Fail with `UnknownAgentType` unless `agent_type` is registered.
    pub fn ensure_registered(&self, agent_type: &AgentType) -> Result<()> {
        if self.contains(agent_type) {
            Ok(())
        } else {
            Err(FlowError::UnknownAgentType(agent_type.to_string()))
        }
    }

    /// Build an agent for `agent_type`.
    ///
    /// Unregistered types fail with `UnknownAgentType`. A factory error is
    /// returned as-is so the caller can report it on the step.
    pub fn create(&self, agent_type: &AgentType) -> anyhow::Result<Box<dyn Agent>> {
        let factory = self
            .factories
            .get(agent_type)
            .ok_or_else(|| FlowError::UnknownAgentType(agent_type.to_string()))?;
        factory()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agent_types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
