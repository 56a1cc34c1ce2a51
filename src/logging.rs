//! Tracing subscriber setup for host binaries.
//!
//! The library only emits `tracing` events; whoever embeds the pass decides
//! where they go. This helper wires the usual stderr subscriber, filtered by
//! `RUST_LOG` and defaulting to `info`.

use anyhow::{Result, bail};
use std::io;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl TryFrom<&str> for LogFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("Unknown log format: {other} (expected text|json)"),
        }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    // Err means a subscriber is already installed by the host or an earlier call.
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
