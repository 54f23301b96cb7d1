//! Tracing configuration for the widget shell
//!
//! Initializes `tracing-subscriber` for structured logging with spans.
//!
//! ## Behavior / 行为
//!
//! - **Environment-aware**: debug builds log at debug, release builds at info
//! - **Override**: `RUST_LOG`, then `[logging] level`, then the defaults
//! - **File output**: a non-blocking daily file when `[logging] dir` is set
//! - **Log bridge**: `try_init` also installs the `log` forwarder

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};
use ws_core::config::LoggingConfig;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "widget-shell.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug level for the shell crates
/// - **Production**: info level for the shell crates
/// - **HTTP stack**: hyper and reqwest internals stay at warn
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let crate_level = if is_dev { "debug" } else { "info" };
    let mut directives = vec![
        crate_level.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        "rustls=warn".to_string(),
    ];
    for name in ["widget_shell", "ws_app", "ws_core", "ws_infra", "ws_platform"] {
        directives.push(format!("{name}={crate_level}"));
    }
    directives
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match config.level.as_deref().filter(|level| !level.trim().is_empty()) {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::new(build_filter_directives(is_development()).join(",")),
        }
    })
}

/// Initialize the tracing subscriber with appropriate configuration
///
/// Call once from `main` before any use case runs. Output goes to stderr so
/// command output on stdout stays machine readable.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber or a `log` logger is already registered.
pub fn init_tracing_subscriber(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = build_env_filter(config);

    let file_writer = match config.dir.as_deref() {
        Some(dir) => match build_file_writer(dir) {
            Ok(writer) => Some(writer),
            Err(err) => {
                eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
                None
            }
        },
        None => None,
    };

    // "2025-01-15 10:30:45.123 INFO src/x.rs:42 target: message"
    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(BoxMakeWriter::new(io::stderr));

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry().with(env_filter).with(stderr_layer);
    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer(dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
