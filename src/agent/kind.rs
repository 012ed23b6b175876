//! Agent type tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag identifying which kind of agent a workflow step invokes.
///
/// The four built-in tags cover the standard pipeline. Host applications may
/// register additional tags, which parse into [`AgentType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentType {
    Plan,
    Code,
    Test,
    Review,
    Other(String),
}

impl AgentType {
    /// The built-in agent tags, in pipeline order.
    pub const BUILTIN: [AgentType; 4] = [
        AgentType::Plan,
        AgentType::Code,
        AgentType::Test,
        AgentType::Review,
    ];

    /// The tag as it appears in configuration and context keys.
    pub fn as_str(&self) -> &str {
        match self {
            AgentType::Plan => "plan",
            AgentType::Code => "code",
            AgentType::Test => "test",
            AgentType::Review => "review",
            AgentType::Other(tag) => tag,
        }
    }

    /// Whether a failure of this agent type aborts the rest of a workflow.
    ///
    /// Planning output seeds the context of every downstream step, so only
    /// `plan` is critical.
    pub fn is_critical(&self) -> bool {
        matches!(self, AgentType::Plan)
    }

    /// Title-cased display name (e.g. `Plan`, `Code`).
    pub fn title(&self) -> String {
        crate::workflow::title_case(self.as_str())
    }
}

impl From<&str> for AgentType {
    fn from(tag: &str) -> Self {
        match tag {
            "plan" => AgentType::Plan,
            "code" => AgentType::Code,
            "test" => AgentType::Test,
            "review" => AgentType::Review,
            other => AgentType::Other(other.to_string()),
        }
    }
}

impl From<String> for AgentType {
    fn from(tag: String) -> Self {
        AgentType::from(tag.as_str())
    }
}

impl From<AgentType> for String {
    fn from(agent_type: AgentType) -> Self {
        agent_type.as_str().to_string()
    }
}

impl FromStr for AgentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AgentType::from(s))
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
