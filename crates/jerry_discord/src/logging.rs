use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Console plus daily rolling file output.
///
/// `RUST_LOG` wins over the configured filter. Keep the returned guard alive
/// for the life of the process or buffered file lines are lost.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(&config.directory).ok();

    let file_appender = tracing_appender::rolling::daily(&config.directory, "jerry.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.filter.as_str().into()))
        .with(
            // Console output
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true),
        )
        .with(
            // File output
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_ansi(false),
        )
        .init();

    guard
}
