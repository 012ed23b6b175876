//! Implementation of the `agentflow run` and `agentflow custom` commands.

use crate::agent::AgentType;
use crate::cli::{CustomArgs, ExecutionArgs, RunArgs};
use crate::config::Config;
use crate::context::ContextMap;
use crate::error::{FlowError, Result};
use crate::exit_codes;
use crate::workflow::{WorkflowOrchestrator, WorkflowResult};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Execute the `agentflow run` command.
pub fn cmd_run(config: &Config, args: RunArgs) -> Result<i32> {
    let context = seed_context(&args.execution)?;
    let orchestrator = WorkflowOrchestrator::from_config(config);

    let result = orchestrator.execute_workflow(
        &args.workflow,
        &args.task,
        Some(context),
        args.execution.stream,
    )?;

    report(&result, &args.execution)
}

/// Execute the `agentflow custom` command.
pub fn cmd_custom(config: &Config, args: CustomArgs) -> Result<i32> {
    let steps = parse_steps(&args.steps)?;
    let context = seed_context(&args.execution)?;
    let orchestrator = WorkflowOrchestrator::from_config(config);

    let result =
        orchestrator.create_custom_workflow(&steps, &args.task, Some(context), args.execution.stream)?;

    report(&result, &args.execution)
}

fn parse_steps(raw: &[String]) -> Result<Vec<AgentType>> {
    let steps: Vec<AgentType> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(AgentType::from)
        .collect();

    if steps.is_empty() {
        return Err(FlowError::UserError(
            "--steps must name at least one agent type".to_string(),
        ));
    }
    Ok(steps)
}

/// Build the initial workflow context from command-line options.
///
/// - `--context FILE` stores the file text under `file_content`
/// - `--context DIR` stores the path under `directory`
/// - `output_directory` is the output directory, or the current directory
/// - `--set key=value` pairs are added as strings
pub(crate) fn seed_context(args: &ExecutionArgs) -> Result<ContextMap> {
    let mut context = ContextMap::new();

    if let Some(path) = &args.context {
        if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                FlowError::UserError(format!(
                    "failed to read context file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            context.insert("file_content".to_string(), Value::String(content));
        } else if path.is_dir() {
            context.insert(
                "directory".to_string(),
                Value::String(path.to_string_lossy().to_string()),
            );
        } else {
            return Err(FlowError::UserError(format!(
                "context path '{}' does not exist",
                path.display()
            )));
        }
    }

    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| {
            FlowError::UserError(format!("failed to determine current directory: {}", e))
        })?,
    };
    context.insert(
        "output_directory".to_string(),
        Value::String(output_dir.to_string_lossy().to_string()),
    );

    for pair in &args.set {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            FlowError::UserError(format!("invalid --set '{}': expected KEY=VALUE", pair))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(FlowError::UserError(format!(
                "invalid --set '{}': key must be non-empty",
                pair
            )));
        }
        context.insert(key.to_string(), Value::String(value.to_string()));
    }

    Ok(context)
}

/// Print the result, save outputs when requested, and pick the exit code.
fn report(result: &WorkflowResult, args: &ExecutionArgs) -> Result<i32> {
    if args.json {
        let json = serde_json::to_string_pretty(&result.to_dict()).map_err(|e| {
            FlowError::UserError(format!("failed to serialize workflow result: {}", e))
        })?;
        println!("{}", json);
    } else {
        print!("{}", result.summary());
    }

    if result.success
        && let Some(dir) = &args.output_dir
    {
        let written = write_outputs(result, dir)?;
        if !args.json {
            println!();
            for path in written {
                println!("Saved {}", path.display());
            }
        }
    }

    Ok(if result.success {
        exit_codes::SUCCESS
    } else {
        exit_codes::WORKFLOW_FAILURE
    })
}

/// Write `{workflow}_summary.md` plus one `step_{i}_{agent}.txt` per
/// successful step with output. Returns the paths written.
pub(crate) fn write_outputs(result: &WorkflowResult, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| {
        FlowError::UserError(format!(
            "failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut written = Vec::new();
    let summary_path = dir.join(format!("{}_summary.md", result.workflow_name));
    write_file(&summary_path, &result.summary())?;
    written.push(summary_path);

    for (i, step) in result.results.iter().enumerate() {
        if step.success && !step.output.is_empty() {
            let path = dir.join(format!("step_{}_{}.txt", i + 1, step.agent_type));
            write_file(&path, &step.output)?;
            written.push(path);
        }
    }

    Ok(written)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| {
        FlowError::UserError(format!("failed to write '{}': {}", path.display(), e))
    })
}
