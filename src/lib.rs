//! ctxgen - template-based context generation
//!
//! Renders a Jinja template with the variables of a JSON or YAML document.
//! The typical use is producing prompt or context files from structured data:
//!
//! ```bash
//! ctxgen --template prompt.md --data facts.yaml --output context.md
//! ```
//!
//! # Core Modules
//!
//! - [`cli`] - Argument parsing and the render pipeline
//! - [`core`] - Error taxonomy and user-facing error reporting
//! - [`data`] - Loading the data document with JSON-then-YAML detection
//! - [`templating`] - The template engine, undefined-value policies and filters
//! - [`utils`] - Atomic file output
//!
//! # Behavior
//!
//! - **Format detection**: data is parsed as JSON first; text that is not JSON
//!   is parsed as YAML. There is no format flag.
//! - **Lenient by default**: missing values render as empty text and survive
//!   attribute access, filters, loops and tests. `--strict` makes any use of a
//!   missing value fatal and names the missing reference.
//! - **No partial output**: a failing render writes nothing, and the output
//!   file is replaced atomically.
//! - **Clean stdout**: only rendered text goes to stdout; logs, confirmations
//!   and errors go to stderr.

pub mod cli;
pub mod core;
pub mod data;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
