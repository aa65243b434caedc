//! Configuration of the supported-algorithm set.
//!
//! Decides which algorithm blocks a table contains. The record shape never
//! depends on configuration.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use crate::{
    error::{Result, VectorError},
    policy::is_valid_tag_length,
    types::{AeadMode, DEFAULT_TAG_LENGTH, Direction},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shortened tag length used by the tag-length scenarios unless overridden.
pub const DEFAULT_SHORTENED_TAG_LENGTH: u8 = 4;

/// How many scenarios are emitted for an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coverage {
    /// Baseline, tag-length, nonce-length and state scenarios.
    Full,
    /// Baseline scenario only.
    BaselineOnly,
}

/// Supported-algorithm configuration consumed by [`crate::builder::TableBuilder`].
///
/// # Examples
/// ```rust
/// use aead_nonce_vectors::config::{Coverage, SuiteConfig};
/// use aead_nonce_vectors::types::AeadMode;
///
/// let config = SuiteConfig::new()
///     .without_algorithm(AeadMode::Gcm)
///     .with_shortened_tag_length(8)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.coverage(AeadMode::Ccm), Some(Coverage::Full));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Whether AES-128 keys are supported. Without them no record is emitted.
    ///
    /// Default: the `aes-128` cargo feature.
    pub aes_128: bool,

    /// Enabled modes and their coverage.
    ///
    /// Default: every compiled mode (`ccm`, `gcm` cargo features) at full coverage.
    pub algorithms: BTreeMap<AeadMode, Coverage>,

    /// Usage directions, in emission order.
    ///
    /// Default: encrypt, then decrypt.
    pub directions: Vec<Direction>,

    /// Tag length for the shortened-tag scenarios.
    ///
    /// Default: 4 bytes.
    pub shortened_tag_length: u8,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self::compiled()
    }
}

impl SuiteConfig {
    /// Configuration for everything compiled into this build.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration derived from the enabled cargo features.
    #[must_use]
    pub fn compiled() -> Self {
        let mut algorithms = BTreeMap::new();
        if cfg!(feature = "ccm") {
            algorithms.insert(AeadMode::Ccm, Coverage::Full);
        }
        if cfg!(feature = "gcm") {
            algorithms.insert(AeadMode::Gcm, Coverage::Full);
        }

        Self {
            aes_128: cfg!(feature = "aes-128"),
            algorithms,
            directions: Direction::ALL.to_vec(),
            shortened_tag_length: DEFAULT_SHORTENED_TAG_LENGTH,
        }
    }

    /// The historical certification table: full CCM coverage, GCM baseline
    /// only, restricted to the compiled algorithms.
    #[must_use]
    pub fn reference() -> Self {
        let mut config = Self::compiled();
        if let Some(coverage) = config.algorithms.get_mut(&AeadMode::Gcm) {
            *coverage = Coverage::BaselineOnly;
        }
        config
    }

    /// Configuration with no algorithms enabled.
    #[must_use]
    pub fn empty() -> Self {
        Self { algorithms: BTreeMap::new(), ..Self::compiled() }
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the configuration is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.build()
    }

    /// Enable `mode` with the given coverage.
    #[must_use]
    pub fn with_algorithm(mut self, mode: AeadMode, coverage: Coverage) -> Self {
        self.algorithms.insert(mode, coverage);
        self
    }

    /// Disable `mode`.
    #[must_use]
    pub fn without_algorithm(mut self, mode: AeadMode) -> Self {
        self.algorithms.remove(&mode);
        self
    }

    /// Set AES-128 support.
    #[must_use]
    pub fn with_aes_128(mut self, enabled: bool) -> Self {
        self.aes_128 = enabled;
        self
    }

    /// Set the usage directions.
    #[must_use]
    pub fn with_directions(mut self, directions: &[Direction]) -> Self {
        self.directions = directions.to_vec();
        self
    }

    /// Set the shortened tag length.
    #[must_use]
    pub fn with_shortened_tag_length(mut self, length: u8) -> Self {
        self.shortened_tag_length = length;
        self
    }

    /// Coverage for `mode`, or `None` if it is disabled.
    #[must_use]
    pub fn coverage(&self, mode: AeadMode) -> Option<Coverage> {
        self.algorithms.get(&mode).copied()
    }

    /// Enabled modes in table order.
    pub fn enabled_modes(&self) -> impl Iterator<Item = (AeadMode, Coverage)> + '_ {
        self.algorithms.iter().map(|(mode, coverage)| (*mode, *coverage))
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    /// See [`SuiteConfig::validate`].
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Validates the configuration settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no direction is configured, or a direction is repeated
    /// - the shortened tag length is not shorter than the default tag
    /// - the shortened tag length is invalid for an enabled mode
    pub fn validate(&self) -> Result<()> {
        if self.directions.is_empty() {
            return Err(VectorError::ConfigurationError(
                "At least one direction must be configured".to_string(),
            ));
        }

        for (index, direction) in self.directions.iter().enumerate() {
            if self.directions.iter().skip(index + 1).any(|other| other == direction) {
                return Err(VectorError::ConfigurationError(format!(
                    "Direction {direction} is configured more than once"
                )));
            }
        }

        if self.shortened_tag_length >= DEFAULT_TAG_LENGTH {
            return Err(VectorError::ConfigurationError(format!(
                "Shortened tag length {} must be below the default of {DEFAULT_TAG_LENGTH}",
                self.shortened_tag_length
            )));
        }

        for (mode, _) in self.enabled_modes() {
            if !is_valid_tag_length(mode, self.shortened_tag_length) {
                return Err(VectorError::ConfigurationError(format!(
                    "Tag length {} is not valid for {mode}",
                    self.shortened_tag_length
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_matches_features() {
        let config = SuiteConfig::compiled();
        assert_eq!(config.aes_128, cfg!(feature = "aes-128"));
        assert_eq!(config.coverage(AeadMode::Ccm).is_some(), cfg!(feature = "ccm"));
        assert_eq!(config.coverage(AeadMode::Gcm).is_some(), cfg!(feature = "gcm"));
        assert_eq!(config.directions, vec![Direction::Encrypt, Direction::Decrypt]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_limits_gcm() {
        let config = SuiteConfig::reference();
        if cfg!(feature = "gcm") {
            assert_eq!(config.coverage(AeadMode::Gcm), Some(Coverage::BaselineOnly));
        }
        if cfg!(feature = "ccm") {
            assert_eq!(config.coverage(AeadMode::Ccm), Some(Coverage::Full));
        }
    }

    #[test]
    fn test_builder_chain() {
        let config = SuiteConfig::empty()
            .with_algorithm(AeadMode::Gcm, Coverage::Full)
            .with_directions(&[Direction::Decrypt])
            .with_shortened_tag_length(8)
            .build()
            .unwrap();
        let modes: Vec<_> = config.enabled_modes().collect();
        assert_eq!(modes, vec![(AeadMode::Gcm, Coverage::Full)]);
        assert_eq!(config.directions, vec![Direction::Decrypt]);
        assert_eq!(config.shortened_tag_length, 8);
    }

    #[test]
    fn test_rejects_empty_directions() {
        let err = SuiteConfig::new().with_directions(&[]).build().unwrap_err();
        assert!(matches!(err, VectorError::ConfigurationError(_)));
    }

    #[test]
    fn test_rejects_duplicate_directions() {
        let result =
            SuiteConfig::new().with_directions(&[Direction::Encrypt, Direction::Encrypt]).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_tag_length_invalid_for_mode() {
        // 6 is valid for CCM but not for GCM
        let result = SuiteConfig::empty()
            .with_algorithm(AeadMode::Ccm, Coverage::Full)
            .with_algorithm(AeadMode::Gcm, Coverage::Full)
            .with_shortened_tag_length(6)
            .build();
        assert!(result.is_err());

        let ccm_only = SuiteConfig::empty()
            .with_algorithm(AeadMode::Ccm, Coverage::Full)
            .with_shortened_tag_length(6)
            .build();
        assert!(ccm_only.is_ok());
    }

    #[test]
    fn test_rejects_default_tag_length() {
        assert!(SuiteConfig::new().with_shortened_tag_length(16).build().is_err());
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config =
            SuiteConfig::from_json(r#"{"algorithms": {"Ccm": "BaselineOnly"}, "aes_128": true}"#)
                .unwrap();
        assert_eq!(config.coverage(AeadMode::Ccm), Some(Coverage::BaselineOnly));
        assert_eq!(config.coverage(AeadMode::Gcm), None);
        assert_eq!(config.shortened_tag_length, DEFAULT_SHORTENED_TAG_LENGTH);
        assert_eq!(config.directions.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(SuiteConfig::from_json("{"), Err(VectorError::Json(_))));
        assert!(matches!(
            SuiteConfig::from_json(r#"{"directions": []}"#),
            Err(VectorError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SuiteConfig::reference();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SuiteConfig::from_json(&json).unwrap(), config);
    }
}
