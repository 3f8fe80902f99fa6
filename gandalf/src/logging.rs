//! Diagnostic tracing for the gandalf CLI.
//!
//! # Output channels
//!
//! - **Tracing (this module)**: stage progress, engine timeouts, truncated
//!   engine output. Controlled by `RUST_LOG`, always written to stderr.
//!
//! - **Review report (`report`)**: the only thing written to stdout. With
//!   `--format json` a hook or CI step parses it directly, so a stray log line
//!   on stdout would corrupt the document.
//!
//! Pipeline errors are also printed to stderr by `main`; the exit status alone
//! tells the caller whether to proceed.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// git diff --cached | RUST_LOG=gandalf=debug gandalf review
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
