//! Tracing setup shared by every beanscope entry point.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the log directory when no explicit one is configured.
pub const LOG_DIR_ENV: &str = "BEANSCOPE_LOG_DIR";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the rolling log files. Falls back to `$BEANSCOPE_LOG_DIR`,
    /// then `$HOME/.beanscope/logs`.
    pub dir: Option<PathBuf>,
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    pub to_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: "info".to_string(),
            to_stderr: false,
        }
    }
}

impl LoggingConfig {
    pub fn log_dir(&self) -> PathBuf {
        resolve_log_dir(
            self.dir.clone(),
            std::env::var(LOG_DIR_ENV).ok(),
            std::env::var("HOME").ok(),
        )
    }
}

fn resolve_log_dir(
    explicit: Option<PathBuf>,
    from_env: Option<String>,
    home: Option<String>,
) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Some(dir) = from_env.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    PathBuf::from(home.unwrap_or_else(|| ".".to_string())).join(".beanscope/logs")
}

pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    init_logging_with(
        component,
        &LoggingConfig {
            to_stderr,
            ..Default::default()
        },
    )
}

/// Installs the global subscriber. A second call keeps the first subscriber
/// and only returns a fresh file guard.
pub fn init_logging_with(component: &str, config: &LoggingConfig) -> WorkerGuard {
    let log_dir = config.log_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    // Files roll daily and are prefixed with the component name, e.g. cli.2024-01-21
    let file_appender = tracing_appender::rolling::daily(&log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if config.to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        let _ = registry.with(stderr_layer).try_init();
    } else {
        let _ = registry.try_init();
    }

    guard
}
