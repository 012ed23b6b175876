//! Agents backed by an external command.
//!
//! A profile in `agentflow.yaml` binds an agent type to a command template:
//!
//! ```yaml
//! agents:
//!   plan:
//!     name: "Planner (llama3.1)"
//!     command: "ollama run llama3.1:8b --file {prompt_file}"
//!     timeout_seconds: 300
//!   code:
//!     command: "./scripts/coder.sh {prompt_file} {agent_type}"
//!     environment:
//!       MODEL: "codellama:7b"
//! ```
//!
//! Each invocation renders a prompt file, runs the command, and treats its
//! stdout as the agent output.
//!
//! Prompt template variables: `{task}`, `{agent_type}`, `{context}` (JSON).
//! Command template variables: `{task}`, `{agent_type}`, `{prompt_file}`,
//! `{log_dir}`, `{stream}`.

mod executor;

pub use executor::{CommandOutcome, CommandSpec, run_command};

use crate::agent::template::{render_template, vars};
use crate::agent::{Agent, AgentType, TaskResult};
use crate::context::ContextMap;
use crate::error::FlowError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default timeout for agent commands in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;

/// Prompt written for every invocation unless a profile overrides it.
pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "# {agent_type} task\n\n{task}\n\n## Context\n\n```json\n{context}\n```\n";

/// Number of stderr lines quoted in a failure message.
const STDERR_TAIL_LINES: usize = 20;

static INVOCATION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Settings shared by all command agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentDefaults {
    /// Default timeout in seconds.
    pub timeout_seconds: u64,

    /// Default prompt template.
    pub prompt_template: String,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            extra: BTreeMap::new(),
        }
    }
}

/// Profile for one command-backed agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Human-readable name.
    #[serde(default)]
    pub name: String,

    /// Command template.
    pub command: String,

    /// Timeout in seconds (overrides the default if set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Environment variables for the agent process.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub environment: HashMap<String, String>,

    /// Working directory for the agent process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Prompt template (overrides the default if set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl AgentProfile {
    /// Effective timeout for this agent.
    pub fn effective_timeout(&self, defaults: &AgentDefaults) -> u64 {
        self.timeout_seconds.unwrap_or(defaults.timeout_seconds)
    }

    /// Effective prompt template for this agent.
    pub fn effective_prompt_template<'a>(&'a self, defaults: &'a AgentDefaults) -> &'a str {
        self.prompt_template
            .as_deref()
            .unwrap_or(&defaults.prompt_template)
    }
}

/// An [`Agent`] that shells out to a configured command.
#[derive(Debug, Clone)]
pub struct CommandAgent {
    agent_type: AgentType,
    profile: AgentProfile,
    defaults: AgentDefaults,
    log_root: PathBuf,
}

impl CommandAgent {
    pub fn new(
        agent_type: AgentType,
        profile: AgentProfile,
        defaults: AgentDefaults,
        log_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            agent_type,
            profile,
            defaults,
            log_root: log_root.into(),
        }
    }

    /// Fresh directory for one invocation's prompt and output captures.
    fn invocation_dir(&self) -> PathBuf {
        let seq = INVOCATION_SEQ.fetch_add(1, Ordering::Relaxed);
        self.log_root.join(format!(
            "{}-{}-{}",
            Utc::now().format("%Y%m%dT%H%M%S%3f"),
            self.agent_type,
            seq
        ))
    }

    fn render_prompt(&self, task: &str, context: &ContextMap) -> anyhow::Result<String> {
        let context_json = serde_json::to_string_pretty(context)?;
        let variables = vars([
            ("task", task),
            ("agent_type", self.agent_type.as_str()),
            ("context", context_json.as_str()),
        ]);
        let template = self.profile.effective_prompt_template(&self.defaults);
        render_template(template, &variables).map_err(|e| {
            FlowError::ConfigError(format!(
                "prompt template for agent '{}' is invalid: {}",
                self.agent_type, e
            ))
            .into()
        })
    }
}

impl Agent for CommandAgent {
    fn execute(&self, task: &str, context: &ContextMap, stream: bool) -> anyhow::Result<TaskResult> {
        let log_dir = self.invocation_dir();
        std::fs::create_dir_all(&log_dir).map_err(|e| {
            FlowError::AgentError(format!(
                "failed to create agent log directory '{}': {}",
                log_dir.display(),
                e
            ))
        })?;

        let prompt_file = log_dir.join("prompt.md");
        std::fs::write(&prompt_file, self.render_prompt(task, context)?).map_err(|e| {
            FlowError::AgentError(format!(
                "failed to write prompt file '{}': {}",
                prompt_file.display(),
                e
            ))
        })?;

        let prompt_path = prompt_file.to_string_lossy().to_string();
        let log_dir_str = log_dir.to_string_lossy().to_string();
        let variables = vars([
            ("task", task),
            ("agent_type", self.agent_type.as_str()),
            ("prompt_file", prompt_path.as_str()),
            ("log_dir", log_dir_str.as_str()),
            ("stream", if stream { "true" } else { "false" }),
        ]);
        let command_line = render_template(&self.profile.command, &variables).map_err(|e| {
            FlowError::ConfigError(format!(
                "command template for agent '{}' is invalid: {}\nCommand: {}",
                self.agent_type, e, self.profile.command
            ))
        })?;

        let mut environment = self.profile.environment.clone();
        environment.insert("AGENTFLOW_AGENT_TYPE".to_string(), self.agent_type.to_string());
        environment.insert("AGENTFLOW_PROMPT_FILE".to_string(), prompt_path.clone());
        if stream {
            environment.insert("AGENTFLOW_STREAM".to_string(), "1".to_string());
        }

        tracing::debug!(agent_type = %self.agent_type, command = %command_line, "running agent command");
        let outcome = run_command(&CommandSpec {
            command_line: &command_line,
            working_dir: self.profile.working_dir.as_deref(),
            environment: &environment,
            log_dir: &log_dir,
            timeout: Duration::from_secs(self.profile.effective_timeout(&self.defaults)),
        })?;

        let stdout = read_capture(&outcome.stdout_path)?;
        let mut echoed = ContextMap::new();
        echoed.insert(
            "_stdout_log".to_string(),
            Value::String(outcome.stdout_path.to_string_lossy().to_string()),
        );
        echoed.insert(
            "_stderr_log".to_string(),
            Value::String(outcome.stderr_path.to_string_lossy().to_string()),
        );

        if outcome.is_success() {
            return Ok(
                TaskResult::success(self.agent_type.clone(), task, stdout.trim_end())
                    .with_context(echoed),
            );
        }

        let stderr = read_capture(&outcome.stderr_path)?;
        let error = failure_message(&outcome, &stderr, self.profile.effective_timeout(&self.defaults));
        Ok(TaskResult::failure(self.agent_type.clone(), task, error)
            .with_output(stdout.trim_end())
            .with_context(echoed))
    }
}

/// Read a captured output stream. Bytes that are not valid UTF-8 are
/// replaced rather than dropping the whole capture.
fn read_capture(path: &Path) -> Result<String, FlowError> {
    let bytes = std::fs::read(path).map_err(|e| {
        FlowError::AgentError(format!(
            "failed to read agent output '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn failure_message(outcome: &CommandOutcome, stderr: &str, timeout_seconds: u64) -> String {
    let headline = if outcome.timed_out {
        format!("agent command timed out after {}s", timeout_seconds)
    } else {
        match outcome.exit_code {
            Some(code) => format!("agent command exited with code {}", code),
            None => "agent command was terminated by a signal".to_string(),
        }
    };

    let lines: Vec<&str> = stderr.lines().collect();
    let tail = &lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..];
    if tail.is_empty() {
        headline
    } else {
        format!("{}: {}", headline, tail.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn agent(temp_dir: &TempDir, agent_type: AgentType, command: &str) -> CommandAgent {
        CommandAgent::new(
            agent_type,
            AgentProfile {
                name: "test".to_string(),
                command: command.to_string(),
                timeout_seconds: Some(10),
                ..Default::default()
            },
            AgentDefaults::default(),
            temp_dir.path(),
        )
    }

    #[test]
    fn profile_overrides_defaults() {
        let defaults = AgentDefaults::default();
        let mut profile = AgentProfile::default();
        assert_eq!(profile.effective_timeout(&defaults), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(
            profile.effective_prompt_template(&defaults),
            DEFAULT_PROMPT_TEMPLATE
        );

        profile.timeout_seconds = Some(30);
        profile.prompt_template = Some("{task}".to_string());
        assert_eq!(profile.effective_timeout(&defaults), 30);
        assert_eq!(profile.effective_prompt_template(&defaults), "{task}");
    }

    #[cfg(not(windows))]
    #[test]
    fn stdout_becomes_output() {
        let temp_dir = TempDir::new().unwrap();
        let agent = agent(&temp_dir, AgentType::Plan, "cat {prompt_file}");

        let mut context = ContextMap::new();
        context.insert("language".to_string(), json!("rust"));
        let result = agent.execute("Create a plan", &context, false).unwrap();

        assert!(result.success);
        assert_eq!(result.agent_type, AgentType::Plan);
        assert!(result.output.starts_with("# plan task"));
        assert!(result.output.contains("Create a plan"));
        assert!(result.output.contains("\"language\": \"rust\""));
        assert!(result.context.contains_key("_stdout_log"));
    }

    #[cfg(not(windows))]
    #[test]
    fn failing_command_reports_exit_code_and_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let agent = agent(
            &temp_dir,
            AgentType::Code,
            "sh -c \"echo partial; echo compile error >&2; exit 2\"",
        );

        let result = agent.execute("Implement", &ContextMap::new(), false).unwrap();

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("exited with code 2"));
        assert!(error.contains("compile error"));
        assert_eq!(result.output, "partial");
    }

    #[cfg(not(windows))]
    #[test]
    fn non_utf8_stdout_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let agent = agent(&temp_dir, AgentType::Code, "printf 'fn main\\377'");

        let result = agent.execute("Implement", &ContextMap::new(), false).unwrap();

        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.output, "fn main\u{FFFD}");
    }

    #[cfg(not(windows))]
    #[test]
    fn non_utf8_stderr_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let agent = agent(
            &temp_dir,
            AgentType::Code,
            "sh -c \"printf 'bad byte \\377' >&2; exit 1\"",
        );

        let result = agent.execute("Implement", &ContextMap::new(), false).unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("bad byte \u{FFFD}"));
    }

    #[test]
    fn missing_capture_is_an_agent_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_capture(&temp_dir.path().join("missing.log")).unwrap_err();
        assert!(matches!(err, FlowError::AgentError(_)));
        assert!(err.to_string().contains("failed to read agent output"));
    }

    #[cfg(not(windows))]
    #[test]
    fn stream_flag_is_forwarded() {
        let temp_dir = TempDir::new().unwrap();
        let agent = agent(&temp_dir, AgentType::Test, "echo {stream}");

        let result = agent.execute("Test", &ContextMap::new(), true).unwrap();
        assert_eq!(result.output, "true");
    }

    #[test]
    fn undefined_command_variable_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let agent = agent(&temp_dir, AgentType::Review, "review {nope}");

        let err = agent.execute("Review", &ContextMap::new(), false).unwrap_err();
        assert!(err.to_string().contains("undefined variable 'nope'"));
    }

    #[test]
    fn failure_message_prefers_timeout() {
        let outcome = CommandOutcome {
            exit_code: None,
            stdout_path: PathBuf::from("stdout.log"),
            stderr_path: PathBuf::from("stderr.log"),
            duration: Duration::from_secs(5),
            timed_out: true,
        };
        assert_eq!(
            failure_message(&outcome, "", 5),
            "agent command timed out after 5s"
        );
    }
}
