//! One-time subscriber installation for the binary

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Output format for [`init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines
    Development,
    /// One JSON object per event, for CI logs
    Production,
}

const DEFAULT_FILTER: &str = "migrax=info";

static INSTALLED: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
///
/// Events go to stderr in both profiles so stdout carries only command
/// output (`status --json` in particular). `RUST_LOG` overrides the
/// default `migrax=info` filter.
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter);
        match profile {
            Profile::Development => builder.init(),
            Profile::Production => builder.json().init(),
        }
    });
}
