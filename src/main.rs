//! ctxgen CLI entry point
//!
//! Parses arguments, sets up logging, runs the render pipeline and turns any
//! failure into a colored report on stderr with exit status 1.

use clap::Parser;
use ctxgen_cli::cli::Cli;
use ctxgen_cli::core::user_friendly_error;

fn main() {
    // Parse CLI arguments; usage errors exit with clap's own status
    let cli = Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        // Convert to user-friendly error with context and suggestions
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
