//! Template error handling for ctxgen
//!
//! This module provides structured error types for template rendering with
//! location information and user-friendly formatting. Every engine failure is
//! translated into one [`TemplateError`] by the renderer.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Render failures, one category with a variant per cause
#[derive(Debug)]
pub enum TemplateError {
    /// The template (or a template it includes) could not be found
    TemplateNotFound {
        name: String,
        location: Box<ErrorLocation>,
    },

    /// The engine could not parse the template
    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    /// Strict mode only: a missing name or attribute was used
    UndefinedReference {
        /// Dotted paths referenced by the template that the data lacks,
        /// most relevant first
        references: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        available_variables: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    /// Any other failure during evaluation (bad filter arguments, invalid
    /// operations, unreadable includes)
    RenderFailed {
        message: String,
        location: Box<ErrorLocation>,
    },
}

/// Location information for template errors
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Template the error occurred in, relative to the template root
    pub template_name: String,
    /// Full path of that template, if known
    pub file_path: Option<PathBuf>,
    /// Line number (1-indexed) if the engine reported one
    pub line_number: Option<usize>,
    /// Source lines around the error, with their 1-indexed line numbers
    pub context_lines: Vec<(usize, String)>,
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TemplateNotFound {
                name,
                ..
            } => {
                write!(f, "Template '{}' not found", name)
            }
            TemplateError::SyntaxError {
                message,
                ..
            } => {
                write!(f, "Template syntax error: {}", message)
            }
            TemplateError::UndefinedReference {
                references,
                ..
            } => match references.first() {
                Some(first) => write!(f, "Template variable not found: '{}'", first),
                None => write!(f, "Template references an undefined value"),
            },
            TemplateError::RenderFailed {
                message,
                ..
            } => {
                write!(f, "Error rendering template: {}", message)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl TemplateError {
    /// Where the error occurred.
    pub fn location(&self) -> &ErrorLocation {
        match self {
            TemplateError::TemplateNotFound {
                location,
                ..
            }
            | TemplateError::SyntaxError {
                location,
                ..
            }
            | TemplateError::UndefinedReference {
                location,
                ..
            }
            | TemplateError::RenderFailed {
                location,
                ..
            } => location,
        }
    }

    /// Generate a detailed, multi-line description with location and context
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::TemplateNotFound {
                name,
                location,
            } => format_template_not_found_error(name, location),
            TemplateError::SyntaxError {
                message,
                location,
            } => format_located_error(message, location),
            TemplateError::UndefinedReference {
                references,
                suggestions,
                available_variables,
                location,
            } => format_undefined_reference_error(
                references,
                suggestions,
                available_variables,
                location,
            ),
            TemplateError::RenderFailed {
                message,
                location,
            } => format_located_error(message, location),
        }
    }

    /// A one-line hint for fixing the error
    pub fn suggestion(&self) -> &'static str {
        match self {
            TemplateError::TemplateNotFound {
                ..
            } => "Included templates are resolved relative to the directory of the main template",
            TemplateError::SyntaxError {
                ..
            } => {
                "Check for unclosed {{ }} or {% %} delimiters, unknown tags and missing quotes around strings"
            }
            TemplateError::UndefinedReference {
                ..
            } => {
                "Add the missing keys to the data, guard them with {% if x is defined %}, or drop --strict to render them as empty"
            }
            TemplateError::RenderFailed {
                ..
            } => "Check the filter arguments and value types used on the reported line",
        }
    }
}

fn format_template_not_found_error(name: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str(&format!("Missing template: {}\n", name));
    if location.template_name != name {
        msg.push_str(&format!("Referenced from: {}\n", location.template_name));
    }
    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }
    push_context_lines(&mut msg, location);

    msg
}

/// Format an error that only has a message and a location
fn format_located_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str(&format!("Error: {}\n", message));
    push_location(&mut msg, location);
    push_context_lines(&mut msg, location);

    msg
}

/// Format a detailed "undefined reference" error message
fn format_undefined_reference_error(
    references: &[String],
    suggestions: &[String],
    available_variables: &[String],
    location: &ErrorLocation,
) -> String {
    let mut msg = String::new();

    match references {
        [] => msg.push_str("Variable: (could not be determined)\n"),
        [only] => msg.push_str(&format!("Variable: {}\n", only)),
        many => msg.push_str(&format!("Variables: {}\n", many.join(", "))),
    }
    push_location(&mut msg, location);
    push_context_lines(&mut msg, location);

    if !suggestions.is_empty() {
        msg.push_str("\nDid you mean one of these?\n");
        for suggestion in suggestions {
            msg.push_str(&format!("  - {}\n", suggestion));
        }
    }

    if available_variables.is_empty() {
        msg.push_str("\nThe data binds no variables.\n");
    } else {
        msg.push_str("\nAvailable variables in this context:\n");

        // Group by top-level name
        let mut grouped: BTreeMap<&str, Vec<&String>> = BTreeMap::new();
        for var in available_variables {
            let prefix = var.split('.').next().unwrap_or(var);
            grouped.entry(prefix).or_default().push(var);
        }

        for (prefix, vars) in grouped.iter().take(5) {
            if vars.len() <= 3 {
                for var in vars {
                    msg.push_str(&format!("  {}\n", var));
                }
            } else {
                msg.push_str(&format!("  {}.*  ({} variables)\n", prefix, vars.len()));
            }
        }

        if grouped.len() > 5 {
            msg.push_str(&format!("  ... and {} more\n", grouped.len() - 5));
        }
    }

    msg
}

fn push_location(msg: &mut String, location: &ErrorLocation) {
    msg.push_str(&format!("Template: {}\n", location.template_name));
    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }
}

fn push_context_lines(msg: &mut String, location: &ErrorLocation) {
    if location.context_lines.is_empty() {
        return;
    }

    let width = location.context_lines.last().map(|(n, _)| n.to_string().len()).unwrap_or(1);

    msg.push('\n');
    for (number, line) in &location.context_lines {
        let marker = if Some(*number) == location.line_number {
            ">"
        } else {
            " "
        };
        msg.push_str(&format!("{} {:>width$} | {}\n", marker, number, line, width = width));
    }
}
