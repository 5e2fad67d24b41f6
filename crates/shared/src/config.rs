//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Leave policy configuration.
    pub policy: PolicyConfig,
}

/// Leave policy configuration.
///
/// Declares the leave types the organization grants. The core crate turns
/// this into its policy catalog at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// The configured leave types.
    #[serde(default)]
    pub leave_types: Vec<LeaveTypeSetting>,
}

/// A single configured leave type.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypeSetting {
    /// Unique leave type code (e.g. "VL").
    pub code: String,
    /// Days granted per year.
    pub annual_entitlement_days: Decimal,
    /// Maximum days carried into the next year.
    #[serde(default = "default_max_carryover")]
    pub max_carryover_days: Decimal,
    /// Whether unused days carry into the next year.
    #[serde(default)]
    pub carry_forward_allowed: bool,
    /// Whether leave of this type is paid.
    #[serde(default = "default_is_paid")]
    pub is_paid: bool,
}

fn default_max_carryover() -> Decimal {
    Decimal::ZERO
}

fn default_is_paid() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
