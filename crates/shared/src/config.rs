//! Application configuration management.
//!
//! Besides server settings, the configuration carries the organization's base
//! currency and optional seed data (actors, exchange rates, rule sets) that is
//! loaded into the in-memory store at startup.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Approval workflow configuration.
    #[serde(default)]
    pub workflow: WorkflowConfig,
    /// Startup seed data.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Approval workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// The organization's reporting currency.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Rule set bound to new submissions. Falls back to the first seeded rule set.
    #[serde(default)]
    pub default_rule_set: Option<Uuid>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            default_rule_set: None,
        }
    }
}

fn default_base_currency() -> String {
    "USD".to_string()
}

/// Seed data applied to an empty store at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Actors to register, managers before their reports.
    #[serde(default)]
    pub actors: Vec<SeedActor>,
    /// Initial exchange rate table.
    #[serde(default)]
    pub exchange_rates: Vec<SeedExchangeRate>,
    /// Initial rule sets.
    #[serde(default)]
    pub rule_sets: Vec<SeedRuleSet>,
}

/// A seeded actor.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedActor {
    /// Fixed actor id so other seeds can reference it.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role name (e.g. "Manager", "CFO").
    pub role: String,
    /// The actor's direct manager.
    #[serde(default)]
    pub manager_id: Option<Uuid>,
}

/// A seeded exchange rate (1 `from` = `rate` `to`).
#[derive(Debug, Clone, Deserialize)]
pub struct SeedExchangeRate {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Conversion rate.
    pub rate: Decimal,
    /// Date the rate is effective from. Defaults to the load date.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

/// A seeded approval rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRuleSet {
    /// Fixed rule set id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Ordered step roles. `"manager"` means the submitter's direct manager.
    pub steps: Vec<String>,
    /// `none`, `or` or `and`.
    #[serde(default = "default_combinator")]
    pub combinator: String,
    /// Percentage of steps that must approve to auto-approve.
    #[serde(default)]
    pub percentage_threshold: Option<u8>,
    /// Role whose approval auto-approves.
    #[serde(default)]
    pub specific_approver: Option<String>,
}

fn default_combinator() -> String {
    "none".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, AppError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPENDFLOW").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
