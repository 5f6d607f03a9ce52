//! # Bitcoin Mining Profitability
//!
//! Expected daily reward for a given hash rate, from the network
//! difficulty and block subsidy in [`MiningSettings`]. The estimate
//! ignores transaction fees, difficulty changes and luck.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::MiningSettings;

const SECONDS_PER_DAY: f64 = 86_400.0;
/// Expected hashes per unit of difficulty
const HASHES_PER_DIFFICULTY: f64 = 4_294_967_296.0;

/// Mining input
///
/// ## JSON Example
///
/// ```json
/// {
///   "hashrate_ths": 100.0,
///   "power_watts": 3250.0,
///   "electricity_cost_per_kwh": 0.10,
///   "btc_price": 60000.0,
///   "pool_fee_percent": 1.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiningInput {
    /// Hash rate in TH/s
    pub hashrate_ths: f64,
    pub power_watts: f64,
    pub electricity_cost_per_kwh: f64,
    pub btc_price: f64,
    pub pool_fee_percent: f64,
}

impl MiningInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.hashrate_ths <= 0.0 {
            return Err(CalcError::invalid_input(
                "hashrate_ths",
                self.hashrate_ths.to_string(),
                "Hash rate must be positive",
            ));
        }
        if self.btc_price <= 0.0 {
            return Err(CalcError::invalid_input(
                "btc_price",
                self.btc_price.to_string(),
                "BTC price must be positive",
            ));
        }
        for (field, value) in [
            ("power_watts", self.power_watts),
            ("electricity_cost_per_kwh", self.electricity_cost_per_kwh),
        ] {
            if value < 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"));
            }
        }
        if !(0.0..100.0).contains(&self.pool_fee_percent) {
            return Err(CalcError::invalid_input(
                "pool_fee_percent",
                self.pool_fee_percent.to_string(),
                "Pool fee must be at least 0 and below 100 percent",
            ));
        }
        Ok(())
    }
}

/// Mining result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiningResult {
    pub btc_per_day: f64,
    pub revenue_per_day: f64,
    pub electricity_cost_per_day: f64,
    pub profit_per_day: f64,
    pub profit_per_month: f64,
    pub profit_per_year: f64,
    /// BTC price at which daily profit is zero
    pub break_even_btc_price: f64,
    pub is_profitable: bool,
}

/// Expected BTC/day, revenue, power cost and profit.
pub fn calculate(input: &MiningInput, network: &MiningSettings) -> CalcResult<MiningResult> {
    input.validate()?;
    if network.network_difficulty <= 0.0 {
        return Err(CalcError::invalid_input(
            "mining.network_difficulty",
            network.network_difficulty.to_string(),
            "Must be positive",
        ));
    }

    let hashes_per_second = input.hashrate_ths * 1e12;
    let gross_btc_per_day =
        hashes_per_second * SECONDS_PER_DAY * network.block_reward_btc / (network.network_difficulty * HASHES_PER_DIFFICULTY);
    let btc_per_day = gross_btc_per_day * (1.0 - input.pool_fee_percent / 100.0);

    let revenue_per_day = btc_per_day * input.btc_price;
    let electricity_cost_per_day = input.power_watts / 1000.0 * 24.0 * input.electricity_cost_per_kwh;
    let profit_per_day = revenue_per_day - electricity_cost_per_day;

    Ok(MiningResult {
        btc_per_day,
        revenue_per_day,
        electricity_cost_per_day,
        profit_per_day,
        profit_per_month: profit_per_day * 30.0,
        profit_per_year: profit_per_day * 365.0,
        break_even_btc_price: electricity_cost_per_day / btc_per_day,
        is_profitable: profit_per_day > 0.0,
    })
}
