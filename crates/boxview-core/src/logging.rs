#![forbid(unsafe_code)]

//! Logging setup helpers.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's job. These helpers cover the two common hosts: test binaries and
//! production viewers that ship JSON logs.
//!
//! Filtering follows `RUST_LOG` (see [`EnvFilter`]); when unset, `boxview`
//! crates log at `info`.

use tracing_subscriber::EnvFilter;

/// Default directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "boxview_core=info,boxview_runtime=info,boxview_layout=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable subscriber that writes through the libtest
/// capture. Safe to call from every test; only the first call wins.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init();
}

/// Install a JSON subscriber on stderr for production hosts.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
