#![forbid(unsafe_code)]

//! Structured log output.
//!
//! The engines log through `tracing` and never install a subscriber
//! themselves. A host calls [`init`] once at startup; the filter comes from
//! `VITRINE_LOG` (same syntax as `RUST_LOG`), falling back to `info`.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "VITRINE_LOG";

/// Filter used when `VITRINE_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" | "jsonl" => Ok(Self::Json),
            _ => Err(TelemetryError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
    #[error("unknown log format: {0} (expected \"pretty\" or \"json\")")]
    UnknownFormat(String),
}

/// Filter from `VITRINE_LOG`, or [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Fails rather than panicking if one is
/// already installed.
pub fn init(format: LogFormat) -> Result<(), TelemetryError> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    let installed = match format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };
    installed.map_err(|_| TelemetryError::AlreadyInstalled)?;
    tracing::debug!(?format, "telemetry installed");
    Ok(())
}
