//! Subscriber setup for the CLI. Library code only emits `tracing` events.
//!
//! ```text
//! RUST_LOG            filter directives, default `warn,beewallet=info`
//! BEEWALLET_LOG_JSON  1 | true | json -> one JSON object per event
//! ```
//!
//! Everything goes to stderr; stdout carries command output only.

use tracing_subscriber::EnvFilter;

pub const ENV_LOG_JSON: &str = "BEEWALLET_LOG_JSON";
pub const DEFAULT_FILTER: &str = "warn,beewallet=info";

/// Rendering of log events on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::parse(std::env::var(ENV_LOG_JSON).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("1" | "true" | "json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// `directives` when they parse, the default filter otherwise.
fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber once; later calls are no-ops.
pub fn init_logging() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(directives.as_deref()))
        .with_writer(std::io::stderr);

    let _ = match LogFormat::from_env() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
