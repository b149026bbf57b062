//! Structured logging module using tracing
//!
//! Diagnostics go to stderr so the credential report on stdout stays clean
//! enough to read (or pipe) on its own.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with console (stderr) output.
pub fn init_tracing(verbosity: u8) {
    // Convert verbosity level (0-3) to tracing level.
    // -v (1): warn only, no debug. -vv (2): debug. -vvv (3): trace.
    let filter_level = match verbosity {
        0 => "error",
        1 => "warn",
        2 => "debug",
        _ => "trace",
    };

    // Always use command-line verbosity, ignore RUST_LOG environment variable.
    // This ensures that -v flags control logging, not environment variables.
    let filter = EnvFilter::new(filter_level);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}
