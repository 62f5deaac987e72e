//! DEX Configuration Module
//!
//! Loads executor parameters from an optional TOML file overlaid by
//! environment variables (`DEX__DEFAULT_FEE=0.0025`,
//! `DEX__LOGGING__LEVEL=debug`). Missing keys fall back to defaults.
//!
//! Fee fractions are written as decimals (`default_fee = "0.003"`) and must
//! be exact in whole basis points.

use crate::logging::LoggingConfig;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use dex_types::{BasisPoints, Quantity};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "DEX";

/// Executor parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DexConfig {
    /// Pool tokens locked forever by the first deposit into a pool
    ///
    /// Zero disables the lock; the first provider then owns the whole supply.
    pub minimum_liquidity: Quantity,
    /// Fee of a freshly created XYK pool
    #[serde(with = "decimal_fraction")]
    pub default_fee: BasisPoints,
    /// Protocol share of the fee of a freshly created XYK pool
    #[serde(with = "decimal_fraction")]
    pub default_protocol_fee_part: BasisPoints,
    /// Prefix of pool token asset names
    pub pool_token_prefix: String,
    /// Prefix of pool custody account names
    pub custody_account_prefix: String,
    pub logging: LoggingConfig,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            minimum_liquidity: 1000,
            default_fee: BasisPoints::DEFAULT_XYK_FEE,
            default_protocol_fee_part: BasisPoints::ZERO,
            pool_token_prefix: "PSWAP".to_string(),
            custody_account_prefix: "STORE".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DexConfig {
    /// Load configuration with `DEX__` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    /// Load configuration with a custom environment variable prefix
    pub fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading DEX config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build DEX configuration")?
            .try_deserialize()
            .context("Failed to deserialize DEX configuration")?;

        config.validate()?;
        debug!(?config, "DEX configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse DEX configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check naming parameters
    ///
    /// Fee bounds are enforced while deserializing.
    pub fn validate(&self) -> Result<()> {
        if self.pool_token_prefix.trim().is_empty() {
            bail!("pool_token_prefix must not be empty");
        }
        if self.custody_account_prefix.trim().is_empty() {
            bail!("custody_account_prefix must not be empty");
        }
        Ok(())
    }
}

/// Serde adapter reading a [`BasisPoints`] from a decimal fraction
///
/// Accepts strings and numbers, since environment overrides arrive parsed as
/// floats. Writes the canonical decimal string.
mod decimal_fraction {
    use dex_types::BasisPoints;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &BasisPoints, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_decimal().to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BasisPoints, D::Error> {
        deserializer.deserialize_any(FractionVisitor)
    }

    struct FractionVisitor;

    impl<'de> Visitor<'de> for FractionVisitor {
        type Value = BasisPoints;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal fraction in [0, 1) such as \"0.003\"")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<BasisPoints, E> {
            BasisPoints::from_decimal_str(value).map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<BasisPoints, E> {
            // Shortest round-trip formatting keeps 0.003 as "0.003"
            self.visit_str(&value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<BasisPoints, E> {
            self.visit_str(&value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<BasisPoints, E> {
            self.visit_str(&value.to_string())
        }
    }
}

/// Convenience function to load configuration from an optional file
pub fn load_config(path: Option<&Path>) -> Result<DexConfig> {
    DexConfig::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = DexConfig::default();
        assert_eq!(config.minimum_liquidity, 1000);
        assert_eq!(config.default_fee, BasisPoints::DEFAULT_XYK_FEE);
        assert_eq!(config.default_protocol_fee_part, BasisPoints::ZERO);
        assert_eq!(config.pool_token_prefix, "PSWAP");
        assert_eq!(config.custody_account_prefix, "STORE");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dex.toml");

        let config_content = r#"
default_fee = "0.0025"
default_protocol_fee_part = 0.1

[logging]
level = "debug"
json = true
"#;
        fs::write(&config_path, config_content).unwrap();

        let config = DexConfig::load_with_env_prefix(Some(&config_path), "DEXTEST_FILE").unwrap();
        assert_eq!(config.default_fee, BasisPoints::try_new(25).unwrap());
        assert_eq!(config.default_protocol_fee_part, BasisPoints::try_new(1000).unwrap());
        assert_eq!(config.minimum_liquidity, 1000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_environment_override() {
        std::env::set_var("DEXTEST_ENV__POOL_TOKEN_PREFIX", "LP");
        std::env::set_var("DEXTEST_ENV__MINIMUM_LIQUIDITY", "500");
        std::env::set_var("DEXTEST_ENV__DEFAULT_FEE", "0.005");

        let config = DexConfig::load_with_env_prefix(None, "DEXTEST_ENV").unwrap();
        assert_eq!(config.pool_token_prefix, "LP");
        assert_eq!(config.minimum_liquidity, 500);
        assert_eq!(config.default_fee, BasisPoints::try_new(50).unwrap());
        assert_eq!(config.custody_account_prefix, "STORE");

        std::env::remove_var("DEXTEST_ENV__POOL_TOKEN_PREFIX");
        std::env::remove_var("DEXTEST_ENV__MINIMUM_LIQUIDITY");
        std::env::remove_var("DEXTEST_ENV__DEFAULT_FEE");
    }

    #[test]
    fn test_rejects_invalid_fee_fractions() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dex.toml");
        fs::write(&config_path, "default_fee = \"1\"\n").unwrap();

        assert!(DexConfig::load_with_env_prefix(Some(&config_path), "DEXTEST_FEE").is_err());
        assert!(DexConfig::from_toml_str("default_protocol_fee_part = \"1.2\"").is_err());
        // Finer than one basis point
        assert!(DexConfig::from_toml_str("default_fee = \"0.00005\"").is_err());
        assert!(DexConfig::from_toml_str("default_fee = \"abc\"").is_err());
    }

    #[test]
    fn test_zero_minimum_liquidity_is_allowed() {
        let config = DexConfig::from_toml_str("minimum_liquidity = 0").unwrap();
        assert_eq!(config.minimum_liquidity, 0);
        assert!(DexConfig::from_toml_str("pool_token_prefix = \" \"").is_err());
    }

    #[test]
    fn test_fee_fractions_round_trip_as_decimals() {
        let config = DexConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("default_fee = \"0.0030\""));
        assert_eq!(DexConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(DexConfig::load_with_env_prefix(Some(&missing), "DEXTEST_MISSING").is_err());
    }
}
