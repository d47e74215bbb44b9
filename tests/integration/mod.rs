//! Integration test suite for ctxgen
//!
//! These tests drive the built `ctxgen` binary end to end: arguments, data on
//! disk or standard input, stdout/stderr contents and exit status.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **data_formats**: JSON/YAML detection, stdin, malformed and non-mapping data
//! - **output**: stdout vs. `--output`, atomic writes, write failures
//! - **render**: substitution, control flow, includes, `tojson`, lenient defaults
//! - **strict**: `--strict` and `CTXGEN_STRICT`, undefined-reference reports
//! - **validate**: `--validate-only` reporting


mod data_formats;
mod output;
mod render;
mod strict;
