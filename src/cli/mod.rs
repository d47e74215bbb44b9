//! Command-line interface for ctxgen.
//!
//! ctxgen renders one Jinja template with variables taken from a JSON or YAML
//! document and writes the result to standard output or a file.
//!
//! # Pipeline
//!
//! 1. Check that the template file exists
//! 2. Load the data (file, or standard input when `--data` is omitted or `-`)
//! 3. Bind the top-level mapping as template variables
//! 4. Render with the selected undefined-value policy
//! 5. Either report validity (`--validate-only`) or write the output
//!
//! Every failure is fatal: it is reported once on stderr and the process
//! exits with status 1. Confirmations and diagnostics go to stderr so the
//! rendered text on stdout can be piped.
//!
//! # Examples
//!
//! ```bash
//! # Render to stdout
//! ctxgen --template prompt.md --data data.json
//!
//! # Data from a pipe, output to a file
//! cat data.yaml | ctxgen -t prompt.md -o context.md
//!
//! # Fail on missing values, without writing anything
//! ctxgen -t prompt.md -d data.json --strict --validate-only
//! ```

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::core::{CtxgenError, InputKind};
use crate::data::{self, DataSource};
use crate::templating::{RenderConfig, TemplateRenderer, UndefinedPolicy};
use crate::utils::fs::atomic_write;

/// Log filter used when neither a flag nor `RUST_LOG` selects one.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Runtime configuration for CLI execution.
///
/// Built from the parsed arguments by [`Cli::build_config`], and injectable
/// directly by tests and programmatic callers.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter override.
    ///
    /// When `None`, `RUST_LOG` is used if set, otherwise `warn`.
    pub log_level: Option<String>,

    /// Suppress the confirmation messages on stderr.
    pub quiet: bool,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The log filter this configuration selects.
    fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        }
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Calling this more than once is harmless; later calls are ignored.
    pub fn init_tracing(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Render a Jinja template with JSON or YAML data.
#[derive(Parser, Debug)]
#[command(
    name = "ctxgen",
    about = "Generate context files by filling a Jinja template with JSON or YAML data",
    version,
    long_about = "ctxgen renders a Jinja template with the top-level keys of a JSON or YAML \
                  document bound as variables. Data is read from --data, or from standard \
                  input when --data is omitted or '-'.",
    after_help = "Examples:\n  \
                  ctxgen -t prompt.md -d data.json\n  \
                  cat data.yaml | ctxgen -t prompt.md -o context.md\n  \
                  ctxgen -t prompt.md -d data.json --strict --validate-only"
)]
pub struct Cli {
    /// Path to the Jinja template file
    #[arg(short, long, value_name = "FILE")]
    template: PathBuf,

    /// Path to the JSON or YAML data file ('-' or omitted reads standard input)
    #[arg(short, long, value_name = "FILE")]
    data: Option<String>,

    /// Write the rendered text to this file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Render the template but write nothing; report whether it succeeded
    #[arg(long)]
    validate_only: bool,

    /// Fail on any use of a value missing from the data
    ///
    /// Without this flag, missing values render as empty text.
    #[arg(long, env = "CTXGEN_STRICT", value_parser = clap::builder::BoolishValueParser::new())]
    strict: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Execute with the configuration derived from the parsed flags.
    ///
    /// Installs the tracing subscriber before running the pipeline.
    ///
    /// # Errors
    ///
    /// Returns any fatal error of the invocation, typically a [`CtxgenError`].
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_tracing();
        self.execute_with_config(&config)
    }

    /// Build a [`CliConfig`] from the parsed CLI arguments.
    ///
    /// `--verbose` selects `debug` logging and `--quiet` selects `error`;
    /// otherwise the log level is left to `RUST_LOG`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            quiet: self.quiet,
        }
    }

    /// The undefined-value policy selected by `--strict`.
    #[must_use]
    pub const fn policy(&self) -> UndefinedPolicy {
        UndefinedPolicy::from_strict(self.strict)
    }

    /// Run the pipeline with an explicit configuration.
    ///
    /// The template's existence is checked before any data is read, so a
    /// mistyped template path fails fast instead of waiting on stdin.
    ///
    /// # Errors
    ///
    /// - [`CtxgenError::InputNotFound`] for a missing template or data file
    /// - [`CtxgenError::DataRead`], [`CtxgenError::DataFormat`] and
    ///   [`CtxgenError::TopLevelNotMapping`] for unusable data
    /// - [`CtxgenError::Render`] for any template failure
    /// - [`CtxgenError::OutputWrite`] if the output cannot be written
    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        if !self.template.is_file() {
            return Err(CtxgenError::InputNotFound {
                kind: InputKind::Template,
                path: self.template.display().to_string(),
            }
            .into());
        }

        let source = DataSource::from_arg(self.data.as_deref());
        tracing::debug!("Loading data from {}", source);
        let value = data::load(&source)?;
        let context = data::into_context(value)?;
        tracing::debug!("Bound {} top-level variables", context.len());

        let renderer = TemplateRenderer::new(RenderConfig::new(self.policy()));

        if self.validate_only {
            renderer.validate(&self.template, &context).map_err(CtxgenError::from)?;
            if !config.quiet {
                eprintln!("{} Template and data are valid (rendered successfully)", "✓".green());
            }
            return Ok(());
        }

        let rendered = renderer.render(&self.template, &context).map_err(CtxgenError::from)?;

        match &self.output {
            Some(path) => {
                write_output_file(path, &rendered)?;
                if !config.quiet {
                    eprintln!("{} Generated context saved to {}", "✓".green(), path.display());
                }
            }
            None => write_stdout(&rendered)?,
        }

        Ok(())
    }
}

/// Write the rendered text to a file, verbatim.
fn write_output_file(path: &Path, rendered: &str) -> Result<(), CtxgenError> {
    atomic_write(path, rendered.as_bytes()).map_err(|e| CtxgenError::OutputWrite {
        path: path.display().to_string(),
        reason: format!("{e:#}"),
    })
}

/// Write the rendered text to stdout followed by a newline.
///
/// A closed pipe (`ctxgen ... | head`) is not an error.
fn write_stdout(rendered: &str) -> Result<(), CtxgenError> {
    let mut stdout = std::io::stdout().lock();
    let result = writeln!(stdout, "{rendered}").and_then(|()| stdout.flush());

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!("Standard output closed before all output was written");
            Ok(())
        }
        Err(e) => Err(CtxgenError::OutputWrite {
            path: "standard output".to_string(),
            reason: e.to_string(),
        }),
    }
}
