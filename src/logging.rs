use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging to the console and to a daily JSON log file under `log_dir`.
///
/// The returned guard flushes the file writer when dropped; keep it alive for the whole run.
pub fn init_logging(log_dir: &str) -> WorkerGuard {
    // Ensure logs directory exists
    let _ = fs::create_dir_all(log_dir);

    let file_appender = tracing_appender::rolling::daily(log_dir, "agenda_scraper.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Console output goes to stderr so `extract` can print JSON on stdout
    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("agenda_scraper=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
