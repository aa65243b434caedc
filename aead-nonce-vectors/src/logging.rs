#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events. Binaries and test harnesses that
//! want to see them call [`init_tracing`] once per process.
//!
//! ```rust,no_run
//! use aead_nonce_vectors::logging::init_tracing;
//!
//! init_tracing().expect("Failed to init tracing");
//! ```

use crate::error::{Result, VectorError};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "aead_nonce_vectors=info";

/// Install a global subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| VectorError::LoggingError(e.to_string()))?;

    info!("aead-nonce-vectors logging initialized");
    Ok(())
}
