use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging(log_dir: &str) {
    let _ = fs::create_dir_all(log_dir);

    // Daily rotated JSON file log
    let file_appender = tracing_appender::rolling::daily(log_dir, "curator.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    let console_layer = fmt::layer().with_writer(std::io::stdout);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("exhibition_curator=info"));

    // try_init so tests and repeated calls don't panic on an installed subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // Keep the guard alive for the process lifetime so buffered lines get flushed
    std::mem::forget(guard);
}
