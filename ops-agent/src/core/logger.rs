//! Logging setup
//!
//! Structured logging via tracing, console by default with optional
//! daily-rolling file output under the work directory.

use std::path::Path;

/// Initialize the logger with console output only.
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger, writing to a daily-rolling file when `log_dir`
/// exists. Level comes from the argument, falling back to `RUST_LOG`,
/// falling back to info.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir
        && Path::new(dir).exists()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "ops-agent");
        subscriber.with_writer(file_appender).init();
        return;
    }

    subscriber.init();
}
