//! Implementation of the `agentflow workflows` and `agentflow agents` commands.

use crate::config::Config;
use crate::error::Result;
use crate::exit_codes;
use crate::workflow::{WorkflowOrigin, list_workflows};

/// Execute the `agentflow workflows` command.
pub fn cmd_workflows(config: &Config) -> Result<i32> {
    print!("{}", render_workflows(config));
    Ok(exit_codes::SUCCESS)
}

/// Execute the `agentflow agents` command.
pub fn cmd_agents(config: &Config) -> Result<i32> {
    print!("{}", render_agents(config));
    Ok(exit_codes::SUCCESS)
}

fn render_workflows(config: &Config) -> String {
    let definitions = list_workflows(config);
    let width = definitions.iter().map(|d| d.name.len()).max().unwrap_or(0);

    let mut out = String::from("Workflows:\n");
    for definition in definitions {
        let origin = match definition.origin {
            WorkflowOrigin::Builtin => "built-in",
            WorkflowOrigin::Configured => "configured",
        };
        let steps: Vec<&str> = definition.steps.iter().map(|s| s.as_str()).collect();
        out.push_str(&format!(
            "  {:width$}  {}  ({})\n",
            definition.name,
            steps.join(" -> "),
            origin,
            width = width
        ));
    }
    out
}

fn render_agents(config: &Config) -> String {
    if config.agents.is_empty() {
        return "No agents configured.\n\n\
                Add an `agents` section to agentflow.yaml, for example:\n\
                agents:\n  \
                  plan:\n    \
                    command: \"my-planner --prompt {prompt_file}\"\n"
            .to_string();
    }

    let mut out = String::from("Agents:\n");
    for (tag, profile) in &config.agents {
        let name = if profile.name.is_empty() {
            tag.as_str()
        } else {
            profile.name.as_str()
        };
        out.push_str(&format!(
            "  {}  {} (timeout {}s)\n    {}\n",
            tag,
            name,
            profile.effective_timeout(&config.defaults),
            profile.command
        ));
    }
    out
}
