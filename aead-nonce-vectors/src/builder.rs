#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Table builder.
//!
//! Emits the scenario list for a [`SuiteConfig`]: for every direction and
//! every enabled mode, a baseline record and the variants that move exactly
//! one axis away from it.

use crate::{
    config::{Coverage, SuiteConfig},
    error::{Result, VectorError},
    fixtures::{self, AES_16B_KEY_SIZE},
    policy::{self, BASELINE_NONCE_LENGTH, LARGE_NONCE_FACTOR},
    table::TestTable,
    types::{AeadAlgorithm, AeadMode, Direction, KeyType, OperationState, Status, TestCase},
};
use tracing::{debug, info};

/// Name of the API entry point, as it appears in descriptions.
pub const ENTRY_POINT: &str = "psa_aead_set_nonce";

/// One scenario of an algorithm block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Valid nonce, active operation.
    Baseline,
    /// Shortened tag-length modifier on the setup algorithm.
    ShortenedTag,
    /// Default-length tag modifier on the setup algorithm.
    DefaultLengthTag,
    /// Nonce one byte shorter than the required length.
    SmallNonce,
    /// Nonce five times the required length.
    LargeNonce,
    /// Operation not set up.
    InactiveOperation,
}

impl Scenario {
    /// Scenarios of a fully covered block, in emission order.
    pub const FULL: [Scenario; 6] = [
        Scenario::Baseline,
        Scenario::ShortenedTag,
        Scenario::DefaultLengthTag,
        Scenario::SmallNonce,
        Scenario::LargeNonce,
        Scenario::InactiveOperation,
    ];

    /// Scenarios emitted for `coverage`.
    #[must_use]
    pub fn for_coverage(coverage: Coverage) -> &'static [Scenario] {
        match coverage {
            Coverage::Full => &Self::FULL,
            Coverage::BaselineOnly => &[Scenario::Baseline],
        }
    }

    /// Status the scenario is designed to provoke.
    #[must_use]
    pub const fn intended_status(self) -> Status {
        match self {
            Scenario::Baseline | Scenario::ShortenedTag | Scenario::DefaultLengthTag => {
                Status::Success
            }
            Scenario::SmallNonce | Scenario::LargeNonce => Status::InvalidArgument,
            Scenario::InactiveOperation => Status::BadState,
        }
    }

    fn suffix(self, shortened_tag_length: u8) -> String {
        match self {
            Scenario::Baseline => String::new(),
            Scenario::ShortenedTag => format!(" - Tag length = {shortened_tag_length}"),
            Scenario::DefaultLengthTag => " - Default Tag length".to_string(),
            Scenario::SmallNonce => " - Small nonce size".to_string(),
            Scenario::LargeNonce => " - Large nonce size".to_string(),
            Scenario::InactiveOperation => " - Invalid operation state".to_string(),
        }
    }
}

/// Description of a record.
#[must_use]
pub fn describe(
    direction: Direction,
    mode: AeadMode,
    scenario: Scenario,
    tag_length: u8,
) -> String {
    format!("Test {ENTRY_POINT} - {direction} - {mode}{}", scenario.suffix(tag_length))
}

/// Builds a [`TestTable`] from a configuration.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    config: SuiteConfig,
}

impl TableBuilder {
    /// Builder for `config`.
    #[must_use]
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    /// Builder for the compiled algorithm set.
    #[must_use]
    pub fn compiled() -> Self {
        Self::new(SuiteConfig::compiled())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Emit the table.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, a shared buffer is
    /// too short, or a scenario would not provoke its intended status.
    pub fn build(&self) -> Result<TestTable> {
        self.config.validate()?;

        let mut cases = Vec::new();
        if !self.config.aes_128 {
            info!("AES-128 not supported, emitting empty table");
            return Ok(TestTable::new(cases));
        }

        for &direction in &self.config.directions {
            for (mode, coverage) in self.config.enabled_modes() {
                let scenarios = Scenario::for_coverage(coverage);
                debug!("Emitting {} {} scenario(s) for {}", scenarios.len(), direction, mode);
                for &scenario in scenarios {
                    cases.push(self.emit(direction, mode, scenario)?);
                }
            }
        }

        info!("Built nonce-setup table with {} record(s)", cases.len());
        Ok(TestTable::new(cases))
    }

    fn emit(&self, direction: Direction, mode: AeadMode, scenario: Scenario) -> Result<TestCase> {
        let key_type = KeyType::Aes;
        let algorithm = AeadAlgorithm::new(mode);
        let required = policy::default_nonce_length(key_type, algorithm).ok_or_else(|| {
            VectorError::UnsupportedCombination(format!("{key_type} with {algorithm}"))
        })?;
        let tag_length = self.config.shortened_tag_length;

        let (setup_algorithm, nonce_length, operation_state) = match scenario {
            Scenario::Baseline => (algorithm, BASELINE_NONCE_LENGTH, OperationState::Active),
            Scenario::ShortenedTag => (
                algorithm.with_shortened_tag(tag_length),
                BASELINE_NONCE_LENGTH,
                OperationState::Active,
            ),
            Scenario::DefaultLengthTag => {
                (algorithm.with_default_length_tag(), BASELINE_NONCE_LENGTH, OperationState::Active)
            }
            Scenario::SmallNonce => (algorithm, required.saturating_sub(1), OperationState::Active),
            Scenario::LargeNonce => {
                (algorithm, required.saturating_mul(LARGE_NONCE_FACTOR), OperationState::Active)
            }
            Scenario::InactiveOperation => {
                (algorithm, BASELINE_NONCE_LENGTH, OperationState::Inactive)
            }
        };

        let description = describe(direction, mode, scenario, tag_length);
        let expected_status = scenario.intended_status();
        let derived =
            policy::expected_status(key_type, setup_algorithm, nonce_length, operation_state);
        if derived != expected_status {
            return Err(VectorError::ConfigurationError(format!(
                "{description}: scenario expects {expected_status} \
                 but nonce policy yields {derived}"
            )));
        }

        Ok(TestCase {
            description,
            key_type,
            key: fixtures::key_material(AES_16B_KEY_SIZE)?,
            usage: direction.usage(),
            algorithm,
            setup_algorithm,
            nonce: fixtures::nonce(nonce_length)?,
            operation_state,
            expected_status,
        })
    }
}
