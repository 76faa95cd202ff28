//! # Bazaar Configuration
//!
//! Where carts are stored and what checkout charges.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     AEGYPTUS_DB_PATH=/var/lib/aegyptus/bazaar.db                       │
//! │     AEGYPTUS_CART_KEY_PREFIX=cart                                      │
//! │     AEGYPTUS_TAX_RATE=7          (percent)                             │
//! │     AEGYPTUS_STANDARD_SHIPPING_CENTS=1000                              │
//! │     AEGYPTUS_EXPRESS_SHIPPING_CENTS=2000                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/aegyptus-bazaar/bazaar.toml (Linux)                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! database_path = "/var/lib/aegyptus/bazaar.db"
//! key_prefix = "cart"
//!
//! [checkout]
//! tax_rate_bps = 700
//! standard_shipping_cents = 1000
//! express_shipping_cents = 2000
//! ```

use std::path::PathBuf;

use aegyptus_core::validation::validate_tax_rate;
use aegyptus_core::{CheckoutPolicy, Money, TaxRate, DEFAULT_CART_KEY_PREFIX};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

const CONFIG_FILE: &str = "bazaar.toml";
const DATABASE_FILE: &str = "bazaar.db";

// =============================================================================
// Sections
// =============================================================================

/// Where carts are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file. Defaults to the platform data directory.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Prefix of every cart storage key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "aegyptus", "bazaar")
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
}

fn default_key_prefix() -> String {
    DEFAULT_CART_KEY_PREFIX.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: default_database_path(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// Tax and shipping charged at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
    #[serde(default = "default_standard_shipping")]
    pub standard_shipping_cents: i64,
    #[serde(default = "default_express_shipping")]
    pub express_shipping_cents: i64,
}

fn default_tax_rate_bps() -> u32 {
    CheckoutPolicy::default().tax_rate.bps()
}
fn default_standard_shipping() -> i64 {
    CheckoutPolicy::default().standard_shipping.cents()
}
fn default_express_shipping() -> i64 {
    CheckoutPolicy::default().express_shipping.cents()
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            tax_rate_bps: default_tax_rate_bps(),
            standard_shipping_cents: default_standard_shipping(),
            express_shipping_cents: default_express_shipping(),
        }
    }
}

// =============================================================================
// Bazaar Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BazaarConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

impl BazaarConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`bazaar.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading bazaar config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load bazaar config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a `bazaar.toml` document. Missing fields take their defaults.
    pub fn from_toml(contents: &str) -> StoreResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.storage.key_prefix.trim().is_empty() {
            return Err(StoreError::Config("key_prefix must not be empty".into()));
        }

        if self.storage.database_path.as_os_str().is_empty() {
            return Err(StoreError::Config("database_path must not be empty".into()));
        }

        validate_tax_rate(TaxRate::from_bps(self.checkout.tax_rate_bps))
            .map_err(|e| StoreError::Config(e.to_string()))?;

        if self.checkout.standard_shipping_cents < 0 || self.checkout.express_shipping_cents < 0 {
            return Err(StoreError::Config(
                "shipping fees must not be negative".into(),
            ));
        }

        Ok(())
    }

    /// The checkout policy these settings describe.
    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            tax_rate: TaxRate::from_bps(self.checkout.tax_rate_bps),
            standard_shipping: Money::from_cents(self.checkout.standard_shipping_cents),
            express_shipping: Money::from_cents(self.checkout.express_shipping_cents),
        }
    }

    pub fn key_prefix(&self) -> &str {
        &self.storage.key_prefix
    }

    pub fn database_path(&self) -> &PathBuf {
        &self.storage.database_path
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("AEGYPTUS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = PathBuf::from(path);
        }

        if let Some(prefix) = lookup("AEGYPTUS_CART_KEY_PREFIX") {
            self.storage.key_prefix = prefix;
        }

        if let Some(rate) = lookup("AEGYPTUS_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    self.checkout.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(rate = %rate, "Ignoring invalid AEGYPTUS_TAX_RATE"),
            }
        }

        if let Some(cents) = lookup("AEGYPTUS_STANDARD_SHIPPING_CENTS") {
            match cents.trim().parse::<i64>() {
                Ok(c) => self.checkout.standard_shipping_cents = c,
                Err(_) => warn!(value = %cents, "Ignoring invalid AEGYPTUS_STANDARD_SHIPPING_CENTS"),
            }
        }

        if let Some(cents) = lookup("AEGYPTUS_EXPRESS_SHIPPING_CENTS") {
            match cents.trim().parse::<i64>() {
                Ok(c) => self.checkout.express_shipping_cents = c,
                Err(_) => warn!(value = %cents, "Ignoring invalid AEGYPTUS_EXPRESS_SHIPPING_CENTS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "aegyptus", "bazaar")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_checkout_page() {
        let config = BazaarConfig::default();
        assert_eq!(config.key_prefix(), "cart");
        assert_eq!(config.checkout_policy(), CheckoutPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = BazaarConfig::from_toml(
            r#"
            [checkout]
            tax_rate_bps = 825
            "#,
        )
        .unwrap();

        assert_eq!(config.checkout.tax_rate_bps, 825);
        assert_eq!(config.checkout.standard_shipping_cents, 1000);
        assert_eq!(config.storage.key_prefix, "cart");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            BazaarConfig::from_toml("[checkout\n"),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("AEGYPTUS_DB_PATH", "/tmp/bazaar-test.db"),
            ("AEGYPTUS_CART_KEY_PREFIX", "bazaar"),
            ("AEGYPTUS_TAX_RATE", "8.25"),
            ("AEGYPTUS_EXPRESS_SHIPPING_CENTS", "2500"),
            ("AEGYPTUS_STANDARD_SHIPPING_CENTS", "lots"),
        ]
        .into_iter()
        .collect();

        let mut config = BazaarConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.database_path(), &PathBuf::from("/tmp/bazaar-test.db"));
        assert_eq!(config.key_prefix(), "bazaar");
        assert_eq!(config.checkout.tax_rate_bps, 825);
        assert_eq!(config.checkout.express_shipping_cents, 2500);
        // Unparseable values keep the previous setting
        assert_eq!(config.checkout.standard_shipping_cents, 1000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BazaarConfig::default();
        config.storage.key_prefix = " ".into();
        assert!(config.validate().is_err());

        let mut config = BazaarConfig::default();
        config.checkout.tax_rate_bps = 20_000;
        assert!(config.validate().is_err());

        let mut config = BazaarConfig::default();
        config.checkout.standard_shipping_cents = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("aegyptus-no-such-dir").join("bazaar.toml");
        let config = BazaarConfig::load_or_default(Some(path));
        assert!(config.validate().is_ok());
    }
}
