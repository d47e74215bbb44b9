//! Jinja template rendering for ctxgen.
//!
//! This module fills a template with the variables bound from the data
//! document, using the MiniJinja engine.
//!
//! # Overview
//!
//! - [`renderer`]: builds the engine environment and renders one template
//! - [`undefined`]: the strict and lenient policies for missing values
//! - [`filters`]: custom filters (`tojson`)
//! - [`error`]: structured render errors with location and context lines
//!
//! # Template Features
//!
//! - Variable substitution: `{{ user.name }}`, `{{ items[0] }}`
//! - Conditionals and loops: `{% if user.admin %}`, `{% for item in items %}`
//! - Includes and inheritance, resolved relative to the template root
//!   (the main template's directory unless configured otherwise)
//! - Built-in engine filters plus `tojson`
//!
//! Block tags swallow their own line: the newline after a tag is removed and
//! whitespace before a tag at the start of a line is stripped. Output is
//! never HTML-escaped.
//!
//! # Example
//!
//! ```rust,no_run
//! use ctxgen_cli::templating::{RenderConfig, TemplateRenderer, UndefinedPolicy};
//! use std::path::Path;
//!
//! let data = serde_json::json!({"name": "Ada"});
//! let context = data.as_object().cloned().unwrap_or_default();
//!
//! let renderer = TemplateRenderer::new(RenderConfig::new(UndefinedPolicy::Strict));
//! let text = renderer.render(Path::new("prompt.md"), &context)?;
//! println!("{text}");
//! # Ok::<(), ctxgen_cli::templating::TemplateError>(())
//! ```

pub mod error;
pub mod filters;
pub mod renderer;
pub mod undefined;

pub use error::{ErrorLocation, TemplateError};
pub use renderer::{RenderConfig, TemplateRenderer};
pub use undefined::UndefinedPolicy;
