//! # CLI Settings
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FIXQUOTE_CARD_FEE=0.045                                            │
//! │     FIXQUOTE_CLIENT_NAME=Ana                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/fixquote/fixquote.toml (Linux)                           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     PricingConfig::default(), view = both                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! CUSTO_FIXO_ATENDIMENTO_PADRAO = 65.30
//! VALOR_DIAGNOSTICO_TOPLOAD = 190
//! VALOR_DIAGNOSTICO_LAVASECA = 230
//! TAXA_CARTAO = 0.05
//! DESCONTO_PIX = 0.05
//! CUSTO_DESLOCAMENTO_EXTRA_FORNECEDOR_PADRAO = 40
//! KM_FRANQUIA = 10
//!
//! [quote]
//! client_name = "Ana"
//! view = "customer"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use fixquote_core::config::{
    KEY_CARD_FEE, KEY_FIXED_VISIT_COST, KEY_PIX_DISCOUNT, KEY_SUPPLIER_LOGISTICS,
};
use fixquote_core::validation::MAX_NAME_LEN;
use fixquote_core::PricingConfig;

use crate::args::View;
use crate::error::{CliError, CliResult};

/// Environment overrides and the pricing key each one sets.
pub const ENV_PRICING_OVERRIDES: [(&str, &str); 4] = [
    ("FIXQUOTE_CARD_FEE", KEY_CARD_FEE),
    ("FIXQUOTE_PIX_DISCOUNT", KEY_PIX_DISCOUNT),
    ("FIXQUOTE_FIXED_COST", KEY_FIXED_VISIT_COST),
    ("FIXQUOTE_LOGISTICS_DEFAULT", KEY_SUPPLIER_LOGISTICS),
];

pub const ENV_CLIENT_NAME: &str = "FIXQUOTE_CLIENT_NAME";

/// Quote presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSettings {
    #[serde(default)]
    pub client_name: Option<String>,

    #[serde(default)]
    pub view: View,
}

/// Complete CLI settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Business parameters keyed like the configuration table.
    #[serde(default)]
    pub pricing: BTreeMap<String, f64>,

    #[serde(default)]
    pub quote: QuoteSettings,
}

impl Settings {
    /// Loads settings from file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`fixquote.toml`)
    /// 3. Environment variables
    ///
    /// An explicitly passed path must exist; the default path may be absent.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let mut settings = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Settings file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading settings from file");
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies overrides from a variable lookup (the process environment
    /// in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in ENV_PRICING_OVERRIDES {
            let Some(raw) = lookup(var) else { continue };
            match raw.trim().parse::<f64>() {
                Ok(value) => {
                    debug!(var, key, value, "Overriding pricing parameter from environment");
                    self.pricing.insert(key.to_string(), value);
                }
                Err(_) => warn!(var, value = %raw, "Ignoring non-numeric override"),
            }
        }

        if let Some(name) = lookup(ENV_CLIENT_NAME) {
            debug!(client_name = %name, "Overriding client name from environment");
            self.quote.client_name = Some(name);
        }
    }

    /// Rejects values that cannot be meant; plain fallbacks are left to
    /// [`PricingConfig::from_parameters`].
    pub fn validate(&self) -> CliResult<()> {
        for (key, value) in &self.pricing {
            if !value.is_finite() || *value < 0.0 {
                return Err(CliError::InvalidSettings(format!(
                    "{} must be a non-negative number, got {}",
                    key, value
                )));
            }
            if (key == KEY_CARD_FEE || key == KEY_PIX_DISCOUNT) && *value >= 1.0 {
                return Err(CliError::InvalidSettings(format!(
                    "{} is a fraction and must be below 1, got {}",
                    key, value
                )));
            }
            if !PricingConfig::known_keys().contains(&key.as_str()) {
                warn!(key = %key, "Unknown pricing parameter, ignored");
            }
        }

        if let Some(name) = &self.quote.client_name {
            if name.chars().count() > MAX_NAME_LEN {
                return Err(CliError::InvalidSettings(format!(
                    "client_name must be at most {} characters",
                    MAX_NAME_LEN
                )));
            }
        }

        Ok(())
    }

    /// Resolves the pricing parameters into the engine's configuration.
    pub fn pricing_config(&self) -> PricingConfig {
        let params: HashMap<String, f64> = self
            .pricing
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        PricingConfig::from_parameters(&params)
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fixquote", "fixquote")
            .map(|dirs| dirs.config_dir().join("fixquote.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixquote_core::config::{KEY_DIAGNOSTIC_FEE_TOP_LOAD, KEY_FRANCHISE_KM};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_file_format() {
        let settings: Settings = toml::from_str(
            r#"
            [pricing]
            VALOR_DIAGNOSTICO_TOPLOAD = 200
            TAXA_CARTAO = 0.04

            [quote]
            client_name = "Ana"
            view = "customer"
            "#,
        )
        .unwrap();

        assert_eq!(settings.pricing[KEY_DIAGNOSTIC_FEE_TOP_LOAD], 200.0);
        assert_eq!(settings.quote.view, View::Customer);

        let config = settings.pricing_config();
        assert_eq!(config.diagnostic_fee_top_load.cents(), 20000);
        assert_eq!(config.card_fee.bps(), 400);
        assert_eq!(config.pix_discount.bps(), 500);
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pricing_config(), PricingConfig::default());
        assert_eq!(settings.quote.view, View::Both);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(lookup(&[
            ("FIXQUOTE_CARD_FEE", "0.045"),
            ("FIXQUOTE_FIXED_COST", "70"),
            ("FIXQUOTE_PIX_DISCOUNT", "lots"),
            ("FIXQUOTE_CLIENT_NAME", "Bruno"),
        ]));

        assert_eq!(settings.pricing[KEY_CARD_FEE], 0.045);
        assert!(!settings.pricing.contains_key(KEY_PIX_DISCOUNT));
        assert_eq!(settings.quote.client_name.as_deref(), Some("Bruno"));

        let config = settings.pricing_config();
        assert_eq!(config.card_fee.bps(), 450);
        assert_eq!(config.fixed_visit_cost.cents(), 7000);
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.pricing.insert(KEY_FRANCHISE_KM.to_string(), 12.0);
        assert!(settings.validate().is_ok());

        settings.pricing.insert(KEY_CARD_FEE.to_string(), 1.5);
        assert!(settings.validate().is_err());

        settings.pricing.insert(KEY_CARD_FEE.to_string(), -0.1);
        assert!(settings.validate().is_err());

        settings.pricing.insert(KEY_CARD_FEE.to_string(), 0.05);
        settings.quote.client_name = Some("x".repeat(MAX_NAME_LEN + 1));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("fixquote-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(CliError::Io { .. })
        ));
    }
}
