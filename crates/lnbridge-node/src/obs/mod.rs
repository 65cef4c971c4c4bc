//! Observability: tracing setup and in-process bridge counters.
//!
//! Counters are stored as atomics and rendered on demand; hosts decide where
//! the text goes.

pub mod metrics;

use tracing_subscriber::{fmt, EnvFilter};

use lnbridge_core::error::{BridgeError, Result};

pub use metrics::BridgeMetrics;

/// Install the fmt subscriber. `RUST_LOG` wins over `default_directive`.
///
/// Fails (without side effects) if a global subscriber is already set.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| BridgeError::Internal(format!("tracing init failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails_cleanly() {
        let _ = init_tracing("lnbridge=debug");
        assert!(init_tracing("lnbridge=debug").is_err());
    }
}
