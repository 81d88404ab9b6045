//! Engine Settings Module
//!
//! Loads the pricing engine's runtime settings from TOML files with
//! environment-specific overrides and `AMM_`-prefixed environment variables.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::protocol::{pricing, tokens};

/// Default location of the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "config/amm.toml";

/// Runtime settings for the pricing engine
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    /// Swap fee in basis points (30 = 0.3%)
    pub fee_bps: u32,

    /// Slippage tolerance used to derive min-out / max-in bounds
    pub slippage_tolerance_bps: u32,

    /// Decimal exponent of the YES / NO outcome tokens
    pub outcome_decimals: u8,

    /// Decimal exponent of the base asset
    pub base_decimals: u8,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fee_bps: pricing::DEFAULT_FEE_BPS,
            slippage_tolerance_bps: pricing::DEFAULT_SLIPPAGE_BPS,
            outcome_decimals: tokens::OUTCOME_TOKEN_DECIMALS,
            base_decimals: tokens::BASE_ASSET_DECIMALS,
        }
    }
}

impl EngineSettings {
    /// Load settings from files with environment overrides
    ///
    /// Missing files fall back to the defaults; values that fail
    /// [`EngineSettings::validate`] are rejected.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new(DEFAULT_SETTINGS_PATH));
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("fee_bps", i64::from(defaults.fee_bps))?
            .set_default(
                "slippage_tolerance_bps",
                i64::from(defaults.slippage_tolerance_bps),
            )?
            .set_default("outcome_decimals", i64::from(defaults.outcome_decimals))?
            .set_default("base_decimals", i64::from(defaults.base_decimals))?;

        if base.exists() {
            debug!("Loading engine settings: {:?}", base);
            builder = builder.add_source(File::from(base).required(true));
        } else {
            warn!("Engine settings not found at {:?}, using defaults", base);
        }

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
                .join("environments")
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment settings: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment settings not found: {:?}", env_file);
            }
        }

        // Override with environment variables (AMM_FEE_BPS, AMM_SLIPPAGE_TOLERANCE_BPS, ...)
        builder = builder.add_source(
            Environment::with_prefix("AMM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder
            .build()
            .context("Failed to build engine settings")?
            .try_deserialize()
            .context("Failed to deserialize engine settings")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the engine would refuse at quote time
    pub fn validate(&self) -> Result<()> {
        if self.fee_bps > pricing::MAX_FEE_BPS {
            bail!(
                "fee_bps {} exceeds maximum {}",
                self.fee_bps,
                pricing::MAX_FEE_BPS
            );
        }
        if self.slippage_tolerance_bps > pricing::MAX_SLIPPAGE_BPS {
            bail!(
                "slippage_tolerance_bps {} exceeds maximum {}",
                self.slippage_tolerance_bps,
                pricing::MAX_SLIPPAGE_BPS
            );
        }
        for (name, decimals) in [
            ("outcome_decimals", self.outcome_decimals),
            ("base_decimals", self.base_decimals),
        ] {
            if decimals > tokens::MAX_DECIMALS {
                bail!(
                    "{} {} exceeds maximum {}",
                    name,
                    decimals,
                    tokens::MAX_DECIMALS
                );
            }
        }
        Ok(())
    }

    /// Render the settings as a TOML document
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize engine settings")
    }

    /// Write the settings to `path`, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write {:?}", path))?;
        Ok(path.to_path_buf())
    }
}

/// Convenience function to load settings from the default location
pub fn load_settings(environment: Option<&str>) -> Result<EngineSettings> {
    EngineSettings::load(None, environment)
}
