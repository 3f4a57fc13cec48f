use std::collections::HashMap;
use thiserror::Error;

use crate::domain::Decimal;

pub const DEFAULT_TAX_RATE: &str = "0.20";
pub const DEFAULT_TAX_FREE_THRESHOLD: &str = "20000.00";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rules: TaxRules,
}

/// Immutable tax parameters handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRules {
    /// Fraction of net profit owed as tax.
    pub tax_rate: Decimal,
    /// Sale proceeds at or below this amount are exempt.
    pub tax_free_threshold: Decimal,
}

impl TaxRules {
    pub fn new(tax_rate: Decimal, tax_free_threshold: Decimal) -> Self {
        Self {
            tax_rate,
            tax_free_threshold,
        }
    }
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            tax_rate: rust_decimal::Decimal::new(20, 2).into(),
            tax_free_threshold: rust_decimal::Decimal::new(2_000_000, 2).into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let tax_rate = parse_decimal(&env_map, "TAX_RATE", DEFAULT_TAX_RATE)?;
        if tax_rate.is_negative() || tax_rate > Decimal::from(1_i64) {
            return Err(ConfigError::InvalidValue(
                "TAX_RATE".to_string(),
                "must be between 0 and 1".to_string(),
            ));
        }

        let tax_free_threshold =
            parse_decimal(&env_map, "TAX_FREE_THRESHOLD", DEFAULT_TAX_FREE_THRESHOLD)?;
        if tax_free_threshold.is_negative() {
            return Err(ConfigError::InvalidValue(
                "TAX_FREE_THRESHOLD".to_string(),
                "must not be negative".to_string(),
            ));
        }

        Ok(Config {
            rules: TaxRules::new(tax_rate, tax_free_threshold),
        })
    }
}

fn parse_decimal(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<Decimal, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), "must be a decimal".to_string()))
}
