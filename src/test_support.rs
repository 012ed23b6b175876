use crate::agent::{Agent, AgentRegistry, AgentType, TaskResult};
use crate::context::ContextMap;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// What a stub agent does when executed.
#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    /// Return a successful result with this output and echoed context.
    Succeed { output: String, context: ContextMap },
    /// Return an unsuccessful result with this error.
    Fail(String),
    /// Sleep, then succeed with this output.
    Slow { output: String, delay: Duration },
    /// Return this result as-is (its agent type and task are overwritten).
    Returns(TaskResult),
    /// Return `Err` from `execute`.
    Error(String),
    /// Panic inside `execute`.
    Panic(String),
    /// Fail while constructing the agent.
    FactoryError(String),
}

impl Behavior {
    pub(crate) fn succeed(output: &str) -> Self {
        Behavior::Succeed {
            output: output.to_string(),
            context: ContextMap::new(),
        }
    }

    pub(crate) fn succeed_with(output: &str, pairs: &[(&str, Value)]) -> Self {
        Behavior::Succeed {
            output: output.to_string(),
            context: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    pub(crate) fn fail(error: &str) -> Self {
        Behavior::Fail(error.to_string())
    }
}

/// One recorded invocation of a stub agent.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub agent_type: AgentType,
    pub task: String,
    pub context: ContextMap,
    pub stream: bool,
}

/// Shared record of every stub invocation, in order.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    fn lock(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    pub(crate) fn agent_types(&self) -> Vec<AgentType> {
        self.lock().iter().map(|c| c.agent_type.clone()).collect()
    }

    pub(crate) fn count(&self, agent_type: &AgentType) -> usize {
        self.lock()
            .iter()
            .filter(|c| &c.agent_type == agent_type)
            .count()
    }

    pub(crate) fn call_for(&self, agent_type: &AgentType) -> Option<Call> {
        self.lock()
            .iter()
            .find(|c| &c.agent_type == agent_type)
            .cloned()
    }
}

pub(crate) struct StubAgent {
    agent_type: AgentType,
    behavior: Behavior,
    log: CallLog,
}

impl Agent for StubAgent {
    fn execute(&self, task: &str, context: &ContextMap, stream: bool) -> anyhow::Result<TaskResult> {
        self.log.lock().push(Call {
            agent_type: self.agent_type.clone(),
            task: task.to_string(),
            context: context.clone(),
            stream,
        });

        match &self.behavior {
            Behavior::Succeed { output, context } => {
                Ok(TaskResult::success(self.agent_type.clone(), task, output.clone())
                    .with_context(context.clone()))
            }
            Behavior::Fail(error) => Ok(TaskResult::failure(
                self.agent_type.clone(),
                task,
                error.clone(),
            )),
            Behavior::Slow { output, delay } => {
                std::thread::sleep(*delay);
                Ok(TaskResult::success(self.agent_type.clone(), task, output.clone()))
            }
            Behavior::Returns(result) => {
                let mut result = result.clone();
                result.agent_type = self.agent_type.clone();
                result.task = task.to_string();
                Ok(result)
            }
            Behavior::Error(message) => Err(anyhow::anyhow!("{}", message)),
            Behavior::Panic(message) => panic!("{}", message),
            Behavior::FactoryError(_) => unreachable!("factory never builds this agent"),
        }
    }
}

/// Registry of stub agents plus the log they record into.
pub(crate) fn stub_registry(agents: &[(AgentType, Behavior)]) -> (AgentRegistry, CallLog) {
    let log = CallLog::default();
    let mut registry = AgentRegistry::new();
    for (agent_type, behavior) in agents {
        let agent_type = agent_type.clone();
        let behavior = behavior.clone();
        let log = log.clone();
        registry.register(agent_type.clone(), move || {
            if let Behavior::FactoryError(message) = &behavior {
                anyhow::bail!("{}", message);
            }
            Ok(Box::new(StubAgent {
                agent_type: agent_type.clone(),
                behavior: behavior.clone(),
                log: log.clone(),
            }))
        });
    }
    (registry, log)
}

/// Stub registry where all four built-in agents succeed with `{tag} output`.
pub(crate) fn succeeding_registry() -> (AgentRegistry, CallLog) {
    let agents: Vec<(AgentType, Behavior)> = AgentType::BUILTIN
        .iter()
        .map(|t| (t.clone(), Behavior::succeed(&format!("{} output", t))))
        .collect();
    stub_registry(&agents)
}
