//! Settings for the `brokerdesk` binary.
//!
//! Layered lowest to highest: the TOML file, `BROKERDESK_*` environment
//! variables, then command-line overrides.

use engine::Currency;
use serde::Deserialize;

use crate::{cli::Args, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/brokerdesk.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: String,
    /// IANA name used to decide "today" for current-year and pipeline
    /// reports.
    pub timezone: String,
    pub currency: Currency,
    /// Team leader whose operations are loaded. Empty means the roster's
    /// only team leader.
    pub team: String,
    pub operations: String,
    pub roster: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: "America/Argentina/Buenos_Aires".to_string(),
            currency: Currency::default(),
            team: String::new(),
            operations: "data/operations.json".to_string(),
            roster: "data/roster.json".to_string(),
        }
    }
}

pub fn load(args: &Args) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BROKERDESK"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(level) = &args.level {
        settings.level = level.clone();
    }
    if let Some(timezone) = &args.timezone {
        settings.timezone = timezone.clone();
    }
    if let Some(currency) = &args.currency {
        settings.currency = Currency::try_from(currency.as_str())?;
    }
    if let Some(team) = &args.team {
        settings.team = team.clone();
    }
    if let Some(operations) = &args.operations {
        settings.operations = operations.clone();
    }
    if let Some(roster) = &args.roster {
        settings.roster = roster.clone();
    }

    Ok(settings)
}
