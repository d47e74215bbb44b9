//! Utility modules for ctxgen
//!
//! - [`fs`]: atomic file writes for the rendered output

pub mod fs;

pub use fs::atomic_write;
