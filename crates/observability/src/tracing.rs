//! Tracing/logging initialization.
//!
//! Filtering follows `RUST_LOG` (default `info`). Output is JSON unless
//! `MEDPORTAL_LOG_FORMAT=pretty` asks for human-readable lines.

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "MEDPORTAL_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Parse a format name; anything other than `pretty` means JSON.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("pretty") {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    pub fn from_env() -> Self {
        std::env::var(FORMAT_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// Install the global subscriber.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
