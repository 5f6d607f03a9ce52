//! # Calculator Settings
//!
//! Time-sensitive constants that some calculators depend on: exchange rates,
//! Bitcoin network difficulty, carbon-emission factors and so on. Compiled
//! defaults make every calculator usable out of the box; a TOML file can
//! override any subset of them.
//!
//! ## File Format
//!
//! ```toml
//! [exchange_rates]
//! EUR = 0.92
//! GBP = 0.79
//!
//! [mining]
//! network_difficulty = 90e12
//!
//! [carbon]
//! average_tonnes_per_person = 14.5
//! ```
//!
//! Missing tables and keys keep their defaults. Currencies left out of
//! `[exchange_rates]` keep their default rate.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculations::currency::ExchangeRates;
use crate::errors::{CalcError, CalcResult};

/// Root settings container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcSettings {
    /// Units of each currency per one US dollar
    pub exchange_rates: ExchangeRates,

    /// Bitcoin network constants
    pub mining: MiningSettings,

    /// Carbon footprint emission factors
    pub carbon: CarbonSettings,

    /// Sleep cycle assumptions
    pub sleep: SleepSettings,
}

impl CalcSettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let mut settings: CalcSettings = toml::from_str(text).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        let filled = settings.exchange_rates.fill_missing();
        if !filled.is_empty() {
            debug!(count = filled.len(), "using default exchange rates for unlisted currencies");
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CalcError::config_error(path.display().to_string(), e.to_string()))?;
        let settings = Self::from_toml_str(&text).map_err(|e| match e {
            CalcError::SerializationError { reason } => {
                CalcError::config_error(path.display().to_string(), reason)
            }
            other => other,
        })?;
        info!(path = %path.display(), "loaded calculator settings");
        Ok(settings)
    }

    /// Render as TOML (useful for writing a starter config file).
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Reject non-positive constants.
    pub fn validate(&self) -> CalcResult<()> {
        self.exchange_rates.validate()?;
        positive("mining.network_difficulty", self.mining.network_difficulty)?;
        positive("mining.block_reward_btc", self.mining.block_reward_btc)?;
        positive("carbon.average_tonnes_per_person", self.carbon.average_tonnes_per_person)?;
        non_negative("carbon.car_kg_per_km", self.carbon.car_kg_per_km)?;
        non_negative("carbon.flight_kg_per_hour", self.carbon.flight_kg_per_hour)?;
        non_negative("carbon.electricity_kg_per_kwh", self.carbon.electricity_kg_per_kwh)?;
        self.sleep.validate()?;
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"));
    }
    Ok(())
}

/// Bitcoin network constants used by the mining estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningSettings {
    /// Network difficulty
    pub network_difficulty: f64,
    /// Block subsidy in BTC
    pub block_reward_btc: f64,
}

impl Default for MiningSettings {
    fn default() -> Self {
        MiningSettings {
            network_difficulty: 83_148_355_189_239.0,
            block_reward_btc: 3.125,
        }
    }
}

/// Emission factors for the carbon footprint estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonSettings {
    /// Average per-capita footprint used for comparison (tonnes CO2e/year)
    pub average_tonnes_per_person: f64,
    /// Passenger car emissions (kg CO2e per km)
    pub car_kg_per_km: f64,
    /// Air travel emissions (kg CO2e per flight hour)
    pub flight_kg_per_hour: f64,
    /// Grid electricity emissions (kg CO2e per kWh)
    pub electricity_kg_per_kwh: f64,
}

impl Default for CarbonSettings {
    fn default() -> Self {
        CarbonSettings {
            average_tonnes_per_person: 16.0,
            car_kg_per_km: 0.171,
            flight_kg_per_hour: 90.0,
            electricity_kg_per_kwh: 0.385,
        }
    }
}

/// Sleep cycle assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepSettings {
    /// Minutes it takes to fall asleep
    pub fall_asleep_minutes: u32,
    /// Length of one sleep cycle in minutes
    pub cycle_minutes: u32,
}

impl Default for SleepSettings {
    fn default() -> Self {
        SleepSettings {
            fall_asleep_minutes: 15,
            cycle_minutes: 90,
        }
    }
}

impl SleepSettings {
    /// Upper bound for either duration: one day
    pub const MAX_MINUTES: u32 = 24 * 60;

    /// Cycle length in (0, 1440] and latency in [0, 1440] minutes.
    pub fn validate(&self) -> CalcResult<()> {
        if self.cycle_minutes == 0 || self.cycle_minutes > Self::MAX_MINUTES {
            return Err(CalcError::invalid_input(
                "sleep.cycle_minutes",
                self.cycle_minutes.to_string(),
                format!("Cycle length must be between 1 and {} minutes", Self::MAX_MINUTES),
            ));
        }
        if self.fall_asleep_minutes > Self::MAX_MINUTES {
            return Err(CalcError::invalid_input(
                "sleep.fall_asleep_minutes",
                self.fall_asleep_minutes.to_string(),
                format!("Cannot exceed {} minutes", Self::MAX_MINUTES),
            ));
        }
        Ok(())
    }
}
