//! Core types for ctxgen
//!
//! This module holds the error taxonomy shared by every stage of an
//! invocation:
//! - **Strongly-typed errors** ([`CtxgenError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with details and suggestions
//!   for CLI users
//!
//! # Error Handling Pattern
//!
//! ```rust,no_run
//! use ctxgen_cli::core::{CtxgenError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(CtxgenError::TopLevelNotMapping { found: "an array" }.into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     friendly.display(); // Colored error with suggestions on stderr
//! }
//! ```

pub mod error;

pub use error::{CtxgenError, ErrorContext, InputKind, user_friendly_error};
