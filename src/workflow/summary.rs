//! Markdown report for a finished workflow.

use crate::workflow::{WorkflowResult, title_case};

impl WorkflowResult {
    /// Human-readable markdown summary of the run.
    ///
    /// A pure function of the result: repeated calls return identical text.
    pub fn summary(&self) -> String {
        let attempted = self.results.len();
        let failed = self.failed_steps();

        let mut out = format!("# {} Workflow Summary\n\n", title_case(&self.workflow_name));
        out.push_str(&format!("**Task**: {}\n", self.task));
        out.push_str(&format!(
            "**Completion**: {}/{} steps successful\n",
            self.completed_steps, attempted
        ));
        out.push_str(&format!(
            "**Execution Time**: {}\n\n",
            self.execution_time_formatted()
        ));

        let status = if self.success {
            "✅ **Status**: Workflow completed successfully".to_string()
        } else if attempted == 0 {
            "⚠️ **Status**: No steps were executed".to_string()
        } else if self.aborted {
            format!("⚠️ **Status**: Workflow aborted with {}", plural_failures(failed))
        } else {
            format!("⚠️ **Status**: Workflow completed with {}", plural_failures(failed))
        };
        out.push_str(&status);
        out.push_str("\n\n## Step Results:\n");

        for (i, result) in self.results.iter().enumerate() {
            let glyph = if result.success { "✅" } else { "❌" };
            out.push_str(&format!(
                "{}. {} {} Agent\n",
                i + 1,
                glyph,
                result.agent_type.title()
            ));
            if !result.success
                && let Some(error) = &result.error
            {
                out.push_str(&format!("   Error: {}\n", error));
            }
        }

        if !self.skipped_steps.is_empty() {
            out.push_str("\n## Skipped Steps:\n");
            for skipped in &self.skipped_steps {
                let unmet: Vec<&str> = skipped
                    .unmet_dependencies
                    .iter()
                    .map(|dep| dep.as_str())
                    .collect();
                out.push_str(&format!(
                    "- {} Agent (unmet dependencies: {})\n",
                    skipped.agent_type.title(),
                    unmet.join(", ")
                ));
            }
        }

        out
    }
}

fn plural_failures(count: usize) -> String {
    if count == 1 {
        "1 failure".to_string()
    } else {
        format!("{} failures", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentType, TaskResult};
    use crate::workflow::SkippedStep;
    use crate::workflow::result::RunRecord;

    fn result(results: Vec<TaskResult>, skipped: Vec<SkippedStep>, aborted: bool) -> WorkflowResult {
        WorkflowResult::from_run(RunRecord {
            workflow_name: "bug-fix".to_string(),
            task: "Fix NPE".to_string(),
            total_steps: 3,
            results,
            skipped_steps: skipped,
            aborted,
            execution_time: 1.5,
            ..Default::default()
        })
    }

    #[test]
    fn successful_summary() {
        let summary = result(
            vec![
                TaskResult::success(AgentType::Plan, "p", "plan"),
                TaskResult::success(AgentType::Code, "c", "code"),
            ],
            Vec::new(),
            false,
        )
        .summary();

        assert!(summary.starts_with("# Bug-Fix Workflow Summary\n"));
        assert!(summary.contains("**Task**: Fix NPE"));
        assert!(summary.contains("2/2 steps successful"));
        assert!(summary.contains("**Execution Time**: 1.50 seconds"));
        assert!(summary.contains("✅ **Status**: Workflow completed successfully"));
        assert!(summary.contains("1. ✅ Plan Agent"));
        assert!(summary.contains("2. ✅ Code Agent"));
        assert!(!summary.contains("Skipped Steps"));
    }

    #[test]
    fn failures_and_skips_are_listed() {
        let summary = result(
            vec![
                TaskResult::success(AgentType::Plan, "p", "plan"),
                TaskResult::failure(AgentType::Code, "c", "compile error"),
            ],
            vec![SkippedStep {
                agent_type: AgentType::Test,
                description: "Test bug fix".to_string(),
                unmet_dependencies: vec![AgentType::Code],
            }],
            false,
        )
        .summary();

        assert!(summary.contains("1/2 steps successful"));
        assert!(summary.contains("⚠️ **Status**: Workflow completed with 1 failure\n"));
        assert!(summary.contains("2. ❌ Code Agent\n   Error: compile error"));
        assert!(summary.contains("## Skipped Steps:"));
        assert!(summary.contains("- Test Agent (unmet dependencies: code)"));
    }

    #[test]
    fn aborted_status() {
        let summary = result(
            vec![TaskResult::failure(AgentType::Plan, "p", "no model")],
            Vec::new(),
            true,
        )
        .summary();
        assert!(summary.contains("Workflow aborted with 1 failure"));
    }

    #[test]
    fn empty_run_status() {
        let summary = result(Vec::new(), Vec::new(), false).summary();
        assert!(summary.contains("0/0 steps successful"));
        assert!(summary.contains("No steps were executed"));
    }

    #[test]
    fn fast_runs_use_milliseconds() {
        let mut r = result(
            vec![TaskResult::success(AgentType::Review, "r", "ok")],
            Vec::new(),
            false,
        );
        r.execution_time = 0.042;
        assert!(r.summary().contains("**Execution Time**: 42ms"));
    }

    #[test]
    fn summary_is_idempotent() {
        let r = result(
            vec![TaskResult::failure(AgentType::Plan, "p", "x")],
            Vec::new(),
            true,
        );
        assert_eq!(r.summary(), r.summary());
    }
}
