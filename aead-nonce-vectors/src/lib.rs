#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! AEAD Nonce-Setup Conformance Vectors
//!
//! A table of test cases for AEAD nonce setup (`psa_aead_set_nonce`) across
//! CCM and GCM, tag-length modifiers, nonce lengths and operation states,
//! with the status a conforming implementation must return for each.
//!
//! ## Modules
//!
//! - **types**: Test case data model
//! - **psa**: Numeric PSA Crypto encodings
//! - **fixtures**: Shared key and nonce buffers
//! - **policy**: Nonce bounds, tag lengths and the expected-status decision function
//! - **config**: Supported-algorithm configuration
//! - **builder**: Table builder
//! - **table**: Read-only table and the compiled default
//! - **validation**: Self-consistency checks
//! - **harness**: Consumption contract and reference model
//! - **export**: JSON export and import
//! - **logging**: Tracing subscriber setup
//!
//! ## Usage
//!
//! ```rust
//! use aead_nonce_vectors::{compiled_table, validate_table};
//!
//! let table = compiled_table().expect("compiled configuration builds");
//! validate_table(table).expect("table is self-consistent");
//! for case in table {
//!     println!("{case}");
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod harness;
pub mod logging;
pub mod policy;
pub mod psa;
pub mod table;
pub mod types;
pub mod validation;

// Re-exports
pub use builder::{Scenario, TableBuilder};
pub use config::{Coverage, SuiteConfig};
pub use error::{Result, VectorError};
pub use harness::{ConformanceReport, NonceSetupTarget, ReferenceModel, evaluate};
pub use table::{TestTable, compiled_table};
pub use types::{
    AeadAlgorithm, AeadMode, Direction, KeyType, KeyUsage, OperationState, Status, TagLength,
    TestCase,
};
pub use validation::{ValidationReport, validate_table};
