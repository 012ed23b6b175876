//! `{variable}` substitution for agent prompts and command lines.
//!
//! - `{name}` substitutes the value of `name` (surrounding whitespace inside
//!   the braces is ignored)
//! - `{{` and `}}` render literal braces
//!
//! Undefined variables are an error rather than an empty substitution, so a
//! typo in a command template fails loudly instead of running a wrong command.

use std::collections::HashMap;
use thiserror::Error;

/// Template rendering failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    #[error("empty variable name '{{}}' at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// Render `template`, substituting every `{variable}`.
///
/// ```
/// use agentflow::agent::template::{render_template, vars};
///
/// let vars = vars([("agent_type", "plan"), ("prompt_file", "/tmp/prompt.md")]);
/// let cmd = render_template("ollama-run --role {agent_type} {prompt_file}", &vars).unwrap();
/// assert_eq!(cmd, "ollama-run --role plan /tmp/prompt.md");
/// ```
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    rendered.push('{');
                    continue;
                }

                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                }

                if name.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }

                let name = name.trim();
                let value = variables
                    .get(name)
                    .ok_or_else(|| TemplateError::UndefinedVariable {
                        name: name.to_string(),
                        position: pos,
                    })?;
                rendered.push_str(value);
            }
            '}' => {
                // `}}` collapses to one brace; a lone `}` is kept as-is.
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                rendered.push('}');
            }
            _ => rendered.push(ch),
        }
    }

    Ok(rendered)
}

/// Build a variables map from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_variables() {
        let vars = vars([("task", "Fix NPE"), ("agent_type", "code")]);
        let rendered = render_template("[{agent_type}] {task}", &vars).unwrap();
        assert_eq!(rendered, "[code] Fix NPE");
    }

    #[test]
    fn escaped_braces_render_literally() {
        let rendered = render_template("json: {{\"a\": 1}}", &HashMap::new()).unwrap();
        assert_eq!(rendered, "json: {\"a\": 1}");
    }

    #[test]
    fn lone_closing_brace_is_kept() {
        let rendered = render_template("a } b", &HashMap::new()).unwrap();
        assert_eq!(rendered, "a } b");
    }

    #[test]
    fn whitespace_inside_braces_is_ignored() {
        let vars = vars([("task", "x")]);
        assert_eq!(render_template("{ task }", &vars).unwrap(), "x");
    }

    #[test]
    fn braces_inside_values_are_not_reinterpreted() {
        let vars = vars([("context", "{\"plan_output\": \"{step}\"}")]);
        let rendered = render_template("Context: {context}", &vars).unwrap();
        assert_eq!(rendered, "Context: {\"plan_output\": \"{step}\"}");
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let err = render_template("run {prompt_file}", &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "prompt_file".to_string(),
                position: 4,
            }
        );
        assert_eq!(
            err.to_string(),
            "undefined variable 'prompt_file' at position 4 in template"
        );
    }

    #[test]
    fn unmatched_brace_is_an_error() {
        let err = render_template("run {prompt_file", &HashMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::UnmatchedBrace { position: 4 });
        assert_eq!(err.to_string(), "unmatched '{' at position 4 in template");
    }

    #[test]
    fn empty_variable_name_is_an_error() {
        let err = render_template("run {}", &HashMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::EmptyVariableName { position: 4 });
        assert_eq!(
            err.to_string(),
            "empty variable name '{}' at position 4 in template"
        );
    }

    #[test]
    fn multiline_templates() {
        let vars = vars([("task", "Add login"), ("context", "{}")]);
        let rendered = render_template("# Task\n{task}\n\n# Context\n{context}", &vars).unwrap();
        assert_eq!(rendered, "# Task\nAdd login\n\n# Context\n{}");
    }
}
