//! Error handling for ctxgen
//!
//! This module provides the error taxonomy and user-friendly error reporting for
//! the context generator. The error system follows two principles:
//! 1. **Strongly-typed errors** so each failure mode can be matched precisely
//! 2. **User-friendly messages** with details and suggestions on stderr
//!
//! # Architecture
//!
//! - [`CtxgenError`] - Enumerated error types for every fatal failure
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for display
//! - [`user_friendly_error`] - Converts any [`anyhow::Error`] into an [`ErrorContext`]
//!
//! # Error Categories
//!
//! - **Inputs**: [`CtxgenError::InputNotFound`], [`CtxgenError::DataRead`]
//! - **Data**: [`CtxgenError::DataFormat`], [`CtxgenError::TopLevelNotMapping`]
//! - **Rendering**: [`CtxgenError::Render`] wrapping a [`TemplateError`]
//! - **Output**: [`CtxgenError::OutputWrite`]
//!
//! Every error is fatal for the invocation: it is displayed once and the process
//! exits with status 1. Nothing is retried.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ctxgen_cli::core::{CtxgenError, InputKind, user_friendly_error};
//!
//! let error = CtxgenError::InputNotFound {
//!     kind: InputKind::Template,
//!     path: "prompt.md".to_string(),
//! };
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display(); // Colored error with a suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templating::TemplateError;

/// Which kind of input file an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// The JSON/YAML data file given with `--data`
    Data,
    /// The template file given with `--template`
    Template,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Data => write!(f, "Data"),
            InputKind::Template => write!(f, "Template"),
        }
    }
}

/// The main error type for ctxgen operations
///
/// Each variant is one fatal failure mode of an invocation. The `Display`
/// output is a single line; [`user_friendly_error`] adds the multi-line
/// details and the suggestion.
#[derive(Error, Debug)]
pub enum CtxgenError {
    /// A named input file does not exist
    ///
    /// Reported before any read or parse is attempted.
    #[error("{kind} file '{path}' not found")]
    InputNotFound {
        /// Whether the data or the template file is missing
        kind: InputKind,
        /// The path as given on the command line
        path: String,
    },

    /// The data source exists but could not be read
    #[error("Failed to read data from {source_name}: {reason}")]
    DataRead {
        /// Human-readable source name (a path or "standard input")
        source_name: String,
        /// The underlying I/O failure
        reason: String,
    },

    /// The data is neither valid JSON nor valid YAML
    ///
    /// `reason` holds the YAML diagnostic (the more informative of the two)
    /// or the encoding failure; `json_error` keeps the JSON diagnostic when
    /// both decoders were tried.
    #[error("Unable to parse data from {source_name} as JSON or YAML: {reason}")]
    DataFormat {
        /// Human-readable source name (a path or "standard input")
        source_name: String,
        /// The YAML parser diagnostic, or the encoding failure
        reason: String,
        /// The JSON parser diagnostic, if JSON decoding was attempted
        json_error: Option<String>,
    },

    /// The decoded document cannot be bound as template variables
    #[error("Top-level data must be a mapping of variable names to values, found {found}")]
    TopLevelNotMapping {
        /// The kind of value found at the top level (e.g. "an array")
        found: &'static str,
    },

    /// Rendering the template failed
    #[error(transparent)]
    Render(#[from] TemplateError),

    /// The output file could not be created or written
    #[error("Failed to write output to '{path}': {reason}")]
    OutputWrite {
        /// The destination path, or "standard output"
        path: String,
        /// The underlying failure
        reason: String,
    },

    /// Any other failure
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

/// Error wrapper carrying user-facing details and a suggestion
///
/// [`ErrorContext::display`] prints the error in red, details in yellow and
/// the suggestion in green, all on stderr so standard output stays clean for
/// piping.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CtxgenError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: CtxgenError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// Colors are dropped automatically when `NO_COLOR` is set or stderr is
    /// not a terminal (handled by `colored`).
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details.trim_end());
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {}", details.trim_end())?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// [`CtxgenError`] values get tailored details and suggestions. I/O errors
/// that escaped without a typed wrapper are described by kind. Anything else
/// is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<CtxgenError>() {
        Ok(ctxgen_error) => return create_error_context(ctxgen_error),
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(CtxgenError::Other {
                message: error_chain_message(&error),
            })
            .with_suggestion("Check file permissions for the template, data and output paths");
        }
    }

    ErrorContext::new(CtxgenError::Other {
        message: error_chain_message(&error),
    })
}

/// Render an error and its causes as one message.
fn error_chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

/// Attach details and suggestions to a typed error.
fn create_error_context(error: CtxgenError) -> ErrorContext {
    match &error {
        CtxgenError::InputNotFound {
            kind: InputKind::Template,
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the --template path; it is resolved relative to the current directory"),
        CtxgenError::InputNotFound {
            kind: InputKind::Data,
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check the --data path, or omit it (or pass '-') to read data from standard input",
        ),
        CtxgenError::DataRead {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Make sure the data source is a readable file or a pipe"),
        CtxgenError::DataFormat {
            json_error,
            ..
        } => {
            let details = json_error.as_ref().map(|json| format!("JSON parser reported: {json}"));
            let context = ErrorContext::new(error).with_suggestion(
                "Data must be a JSON document or a YAML document; check quotes, brackets and indentation",
            );
            match details {
                Some(details) => context.with_details(details),
                None => context,
            }
        }
        CtxgenError::TopLevelNotMapping {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Wrap the data in an object, e.g. {\"items\": [...]}, and reference it as {{ items }}",
        ),
        CtxgenError::Render(template_error) => {
            let details = template_error.format_with_context();
            let suggestion = template_error.suggestion();
            ErrorContext::new(error).with_details(details).with_suggestion(suggestion)
        }
        CtxgenError::OutputWrite {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the output directory exists and is writable"),
        CtxgenError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
