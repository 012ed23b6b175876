//! Workflow orchestration.
//!
//! - **Step**: one node of a workflow ([`WorkflowStep`])
//! - **Definition**: named workflows and their resolution ([`resolve_workflow`])
//! - **Orchestrator**: sequential execution with dependency gating ([`WorkflowOrchestrator`])
//! - **Result**: the aggregate outcome and its markdown summary ([`WorkflowResult`])

mod definition;
mod orchestrator;
pub(crate) mod result;
mod step;
mod summary;


// Re-export public API
pub use definition::{
    BUILTIN_WORKFLOWS, BuiltinOnly, WorkflowDefinition, WorkflowOrigin, WorkflowSource,
    builtin_workflow, customize_task, list_workflows, resolve_workflow,
};
pub use orchestrator::{CUSTOM_WORKFLOW_NAME, WorkflowOrchestrator};
pub use result::{WorkflowResult, format_duration};
pub use step::{SkippedStep, WorkflowStep};

/// Title-case a tag: the first letter of every alphabetic run is uppercased
/// and the rest lowercased (`bug-fix` becomes `Bug-Fix`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
