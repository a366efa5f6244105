//! Tracing setup for the CLI.
//!
//! Filter precedence: `--log-level`, then `WEEKPLAN_LOG`, then `warn`.
//! Everything goes to stderr so stdout stays clean JSON.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub const LOG_ENV: &str = "WEEKPLAN_LOG";

fn build_filter(level: Option<LogLevel>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    }
}

pub fn init(level: Option<LogLevel>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    // A second init (tests calling `run` twice) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
