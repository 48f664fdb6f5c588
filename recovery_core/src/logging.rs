//! Tracing setup for the `quitmeter` binary.
//!
//! Stdout carries command output (status text, JSON, CSV), so every log line
//! goes to stderr. Only warnings are shown unless `RUST_LOG` asks for more,
//! e.g. `RUST_LOG=recovery_core=debug quitmeter metrics` prints each
//! aggregation and timeline sample count.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LEVEL: &str = "warn";

/// Install the stderr subscriber at [`DEFAULT_LEVEL`]
pub fn init() {
    init_with_level(DEFAULT_LEVEL)
}

/// Install the stderr subscriber, falling back to `default_level` when
/// `RUST_LOG` is unset or unparsable
pub fn init_with_level(default_level: &str) {
    tracing_subscriber::registry()
        .with(filter_or(default_level))
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Route debug output through the test harness; safe to call from every test
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!("logging initialised twice without panicking");
    }
}
