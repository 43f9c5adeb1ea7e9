//! Diagnostic logging to stderr.
//!
//! `--verbose` turns on debug output for this crate. Otherwise `RUST_LOG`
//! is honoured, falling back to warnings only.

use std::io::{self, IsTerminal};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,incremental=debug";

/// Picks the filter directive from `--verbose` and the `RUST_LOG` value.
fn directive(verbose: bool, from_env: Option<&str>) -> &str {
    match (verbose, from_env) {
        (true, _) => VERBOSE_FILTER,
        (false, Some(env)) if !env.trim().is_empty() => env,
        (false, _) => DEFAULT_FILTER,
    }
}

fn filter(verbose: bool, from_env: Option<&str>) -> EnvFilter {
    EnvFilter::try_new(directive(verbose, from_env))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter(verbose, from_env.as_deref());

    let layer = fmt::layer()
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .with_writer(io::stderr);

    // Fails only when a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
