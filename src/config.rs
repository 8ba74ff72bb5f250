//! Cart runtime configuration.
//!
//! # Environment Variables
//!
//! All optional; unset variables keep the [`CartConfig::default`] value.
//! - `CART_STORAGE_KEY` - Key the cart record is stored under (default: cart)
//! - `CART_COMMAND_CAPACITY` - Bound of the writer's command queue (default: 256)
//! - `CART_EVENT_CAPACITY` - Per-subscriber event buffer (default: 1024)
//! - `CART_SHIPPING_FEE` - Flat shipping fee added at checkout (default: 15.00)

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::DEFAULT_STORAGE_KEY;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub storage_key: String,
    pub command_capacity: usize,
    pub event_capacity: usize,
    pub shipping_fee: Decimal,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            command_capacity: 256,
            event_capacity: 1024,
            shipping_fee: Decimal::new(1500, 2),
        }
    }
}

impl CartConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_key = match lookup("CART_STORAGE_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_STORAGE_KEY".to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Some(key) => key,
            None => defaults.storage_key,
        };

        Ok(Self {
            storage_key,
            command_capacity: parse_capacity(&lookup, "CART_COMMAND_CAPACITY")?
                .unwrap_or(defaults.command_capacity),
            event_capacity: parse_capacity(&lookup, "CART_EVENT_CAPACITY")?
                .unwrap_or(defaults.event_capacity),
            shipping_fee: parse_fee(&lookup, "CART_SHIPPING_FEE")?.unwrap_or(defaults.shipping_fee),
        })
    }
}

fn parse_capacity(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(v) => Ok(Some(v)),
        Err(e) => Err(ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
    }
}

fn parse_fee(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<Decimal>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let fee = Decimal::from_str(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))?;
    if fee.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(Some(fee))
}
