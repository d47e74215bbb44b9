//! Template rendering with MiniJinja.
//!
//! This module provides the [`TemplateRenderer`] that configures a MiniJinja
//! environment from a [`RenderConfig`], renders one template against the
//! data context, and translates engine failures into [`TemplateError`]s.

use minijinja::{AutoEscape, Environment, ErrorKind};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use strsim::levenshtein;

use super::error::{ErrorLocation, TemplateError};
use super::filters;
use super::undefined::UndefinedPolicy;
use crate::data::Context;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
/// This represents a 50% similarity threshold for variable name suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// How deep nested mappings are walked when listing available variables.
const MAX_VARIABLE_DEPTH: usize = 3;

/// Source lines shown on each side of an error line.
const CONTEXT_LINES: usize = 2;

/// Names the engine provides itself; never reported as missing data.
const ENGINE_GLOBALS: &[&str] = &["range", "dict", "debug", "namespace", "loop", "self", "super"];

/// Engine settings for one invocation.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory templates are loaded from. When `None`, the directory of the
    /// template being rendered is used.
    pub template_root: Option<PathBuf>,
    /// What happens on a reference to missing data
    pub policy: UndefinedPolicy,
    /// Remove the first newline after a block tag
    pub trim_blocks: bool,
    /// Strip whitespace before a block tag at the start of a line
    pub lstrip_blocks: bool,
    /// Keep the final newline of the template in the output
    pub keep_trailing_newline: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_root: None,
            policy: UndefinedPolicy::default(),
            trim_blocks: true,
            lstrip_blocks: true,
            keep_trailing_newline: false,
        }
    }
}

impl RenderConfig {
    /// Default whitespace handling with the given undefined-value policy.
    #[must_use]
    pub fn new(policy: UndefinedPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Load templates from `root` instead of the template's own directory.
    #[must_use]
    pub fn with_template_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.template_root = Some(root.into());
        self
    }
}

/// Template renderer driving a MiniJinja environment.
///
/// A fresh environment is built for every render, so nothing is cached
/// between invocations. The environment:
/// - loads templates from the template root, so `{% include %}` and
///   `{% extends %}` resolve relative to it
/// - trims whitespace around block tags per [`RenderConfig`]
/// - never auto-escapes output, whatever the template's file extension
/// - applies the configured [`UndefinedPolicy`]
/// - registers the custom filters from [`filters`]
pub struct TemplateRenderer {
    config: RenderConfig,
}

impl TemplateRenderer {
    /// Create a renderer for the given configuration.
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
        }
    }

    /// Build a configured engine environment loading templates from `root`.
    pub fn environment(&self, root: &Path) -> Environment<'static> {
        let mut env = Environment::new();

        env.set_loader(minijinja::path_loader(root));
        env.set_trim_blocks(self.config.trim_blocks);
        env.set_lstrip_blocks(self.config.lstrip_blocks);
        env.set_keep_trailing_newline(self.config.keep_trailing_newline);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        self.config.policy.apply(&mut env);
        filters::register_filters(&mut env, self.config.policy);

        tracing::debug!(
            "Configured template environment: root={}, trim_blocks={}, lstrip_blocks={}",
            root.display(),
            self.config.trim_blocks,
            self.config.lstrip_blocks
        );

        env
    }

    /// Render the template at `template_path` with the top-level variables in `context`.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] if the template cannot be found or parsed,
    /// if a missing value is used under the strict policy, or if evaluation
    /// fails for any other reason. No partial output is returned.
    pub fn render(&self, template_path: &Path, context: &Context) -> Result<String, TemplateError> {
        let (root, name) = self.resolve(template_path)?;
        tracing::debug!("Rendering template '{}' from {}", name, root.display());
        log_context(context);

        let env = self.environment(&root);

        let template = env
            .get_template(&name)
            .map_err(|err| translate_error(&env, &root, &name, context, &err))?;

        let rendered = template
            .render(minijinja::Value::from_serialize(context))
            .map_err(|err| translate_error(&env, &root, &name, context, &err))?;

        tracing::debug!("Template rendering complete ({} bytes)", rendered.len());
        Ok(rendered)
    }

    /// Render and discard the result, reporting only success or failure.
    ///
    /// Every variable reference is evaluated, so strict-mode undefined values
    /// are caught exactly as a real render would catch them.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`render`](Self::render).
    pub fn validate(&self, template_path: &Path, context: &Context) -> Result<(), TemplateError> {
        self.render(template_path, context).map(|rendered| {
            tracing::debug!("Validation render produced {} bytes (discarded)", rendered.len());
        })
    }

    /// Split a template path into the loader root and the template name.
    fn resolve(&self, template_path: &Path) -> Result<(PathBuf, String), TemplateError> {
        let (root, relative) = match &self.config.template_root {
            Some(root) => {
                let relative = if template_path.is_absolute() {
                    template_path.strip_prefix(root).map(Path::to_path_buf).map_err(|_| {
                        not_found(
                            template_path,
                            format!("template is outside the template root {}", root.display()),
                        )
                    })?
                } else {
                    template_path.to_path_buf()
                };
                (root.clone(), relative)
            }
            None => {
                let root = match template_path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                let file_name = template_path
                    .file_name()
                    .map(PathBuf::from)
                    .ok_or_else(|| not_found(template_path, "path has no file name".to_string()))?;
                (root, file_name)
            }
        };

        Ok((root, template_name(&relative, template_path)?))
    }
}

/// Join path components with `/`, the separator the engine's loader expects.
fn template_name(relative: &Path, original: &Path) -> Result<String, TemplateError> {
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => match segment.to_str() {
                Some(segment) => segments.push(segment),
                None => {
                    return Err(not_found(original, "path is not valid UTF-8".to_string()));
                }
            },
            Component::CurDir => {}
            _ => {
                return Err(not_found(
                    original,
                    "path must stay inside the template root".to_string(),
                ));
            }
        }
    }

    if segments.is_empty() {
        return Err(not_found(original, "path has no file name".to_string()));
    }

    Ok(segments.join("/"))
}

fn not_found(path: &Path, reason: String) -> TemplateError {
    tracing::debug!("Cannot resolve template {}: {}", path.display(), reason);
    TemplateError::TemplateNotFound {
        name: path.display().to_string(),
        location: Box::new(ErrorLocation {
            template_name: path.display().to_string(),
            file_path: Some(path.to_path_buf()),
            ..ErrorLocation::default()
        }),
    }
}

/// Translate an engine error into a structured [`TemplateError`].
fn translate_error(
    env: &Environment<'_>,
    root: &Path,
    root_name: &str,
    context: &Context,
    err: &minijinja::Error,
) -> TemplateError {
    let template_name = err.name().unwrap_or(root_name).to_string();
    let line_number = err.line();
    let source = std::fs::read_to_string(root.join(&template_name)).ok();
    let context_lines = match (&source, line_number) {
        (Some(source), Some(line)) => extract_context_lines(source, line, CONTEXT_LINES),
        _ => Vec::new(),
    };

    let location = Box::new(ErrorLocation {
        file_path: Some(root.join(&template_name)),
        template_name: template_name.clone(),
        line_number,
        context_lines,
    });

    tracing::debug!("Template engine error ({:?}): {:#}", err.kind(), err);

    match err.kind() {
        ErrorKind::TemplateNotFound => TemplateError::TemplateNotFound {
            name: missing_template_name(err).unwrap_or_else(|| root_name.to_string()),
            location,
        },
        ErrorKind::SyntaxError | ErrorKind::BadEscape => TemplateError::SyntaxError {
            message: format_engine_error(err),
            location,
        },
        ErrorKind::UndefinedError => {
            let undeclared = env
                .get_template(&template_name)
                .map(|template| template.undeclared_variables(true))
                .unwrap_or_default();
            let failing = source.as_deref().and_then(|source| failing_expression(source, err));

            let references = missing_references(&undeclared, context, failing);
            let available_variables = extract_available_variables(context);
            let suggestions = references
                .first()
                .map(|reference| find_similar_variables(reference, &available_variables))
                .unwrap_or_default();

            TemplateError::UndefinedReference {
                references: Box::new(references),
                suggestions: Box::new(suggestions),
                available_variables: Box::new(available_variables),
                location,
            }
        }
        _ => TemplateError::RenderFailed {
            message: format_engine_error(err),
            location,
        },
    }
}

/// Pull the template name out of a "template not found" detail message.
fn missing_template_name(err: &minijinja::Error) -> Option<String> {
    let detail = err.detail()?;
    let start = detail.find('"')? + 1;
    let end = start + detail[start..].find('"')?;
    Some(detail[start..end].to_string())
}

/// Format an engine error with its cause chain, without location suffixes.
pub fn format_engine_error(err: &minijinja::Error) -> String {
    use std::error::Error;

    let mut message = match err.detail() {
        Some(detail) => format!("{}: {}", err.kind(), detail),
        None => err.kind().to_string(),
    };

    let mut current: Option<&dyn Error> = err.source();
    while let Some(cause) = current {
        message.push_str(&format!("\n  → {}", cause));
        current = cause.source();
    }

    message
}

/// The source text of the expression the engine failed on.
fn failing_expression<'a>(source: &'a str, err: &minijinja::Error) -> Option<&'a str> {
    let text = source.get(err.range()?)?.trim();
    (!text.is_empty()).then_some(text)
}

/// List the missing references, the failing expression first.
///
/// The rest are the template's referenced paths that do not resolve against
/// the data, in sorted order. Without a failing expression they are all there
/// is to report.
fn missing_references(
    undeclared: &HashSet<String>,
    context: &Context,
    failing: Option<&str>,
) -> Vec<String> {
    let mut missing: Vec<String> = undeclared
        .iter()
        .filter(|path| {
            let root = path.split('.').next().unwrap_or(path);
            !ENGINE_GLOBALS.contains(&root)
                && !resolves(context, path)
                && Some(path.as_str()) != failing
        })
        .cloned()
        .collect();
    missing.sort();

    if let Some(failing) = failing {
        missing.insert(0, failing.to_string());
    }

    missing
}

/// Whether a dotted path resolves to a value in the data.
fn resolves(context: &Context, path: &str) -> bool {
    let mut segments = path.split('.');
    let Some(mut current) = segments.next().and_then(|first| context.get(first)) else {
        return false;
    };

    for segment in segments {
        let next = match current {
            JsonValue::Object(map) => map.get(segment),
            JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return false,
        }
    }

    true
}

/// List the dotted variable paths available in the data.
fn extract_available_variables(context: &Context) -> Vec<String> {
    fn walk(prefix: &str, value: &JsonValue, depth: usize, out: &mut Vec<String>) {
        out.push(prefix.to_string());
        if depth >= MAX_VARIABLE_DEPTH {
            return;
        }
        if let JsonValue::Object(map) = value {
            for (key, child) in map {
                walk(&format!("{}.{}", prefix, key), child, depth + 1, out);
            }
        }
    }

    let mut vars = Vec::new();
    for (key, value) in context {
        walk(key, value, 1, &mut vars);
    }
    vars
}

/// Find similar variable names using Levenshtein distance
fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<_> = available
        .iter()
        .map(|var| {
            let distance = levenshtein(target, var);
            (var.clone(), distance)
        })
        .collect();

    // Sort by distance (closest first)
    scored.sort_by_key(|(_, dist)| *dist);

    // Return top 3 suggestions within reasonable distance
    scored
        .into_iter()
        .filter(|(_, dist)| *dist > 0 && *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(var, _)| var)
        .collect()
}

/// Extract context lines around an error location
///
/// Returns up to `context_size` lines before and after the error line,
/// along with their line numbers (1-indexed).
fn extract_context_lines(
    content: &str,
    error_line: usize,
    context_size: usize,
) -> Vec<(usize, String)> {
    let lines: Vec<&str> = content.lines().collect();
    let total_lines = lines.len();

    if error_line == 0 || error_line > total_lines {
        return Vec::new();
    }

    // Convert to 0-indexed for slicing
    let start = error_line.saturating_sub(context_size + 1);
    let end = (error_line + context_size).min(total_lines);

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(idx, line)| (start + idx + 1, line.to_string()))
        .collect()
}

/// Log the top-level variables at debug level.
fn log_context(context: &Context) {
    for (key, value) in context {
        let kind = match value {
            JsonValue::Null => "null".to_string(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => n.to_string(),
            JsonValue::String(s) => format!("string ({} chars)", s.chars().count()),
            JsonValue::Array(items) => format!("[{} items]", items.len()),
            JsonValue::Object(map) => format!("{{{} keys}}", map.len()),
        };
        tracing::debug!("  {}: {}", key, kind);
    }
}
