//! # Currency Conversion
//!
//! Converts between a fixed set of currencies using a per-USD rate table.
//! Rates are demonstration values; they come from [`CalcSettings`] so a
//! deployment can supply fresher numbers through its config file.
//!
//! Every pair is derived from two per-USD rates (`to / from`), so the table
//! can never be missing a pair the way a hand-written pair matrix can.
//!
//! [`CalcSettings`]: crate::settings::CalcSettings

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Supported currencies
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    INR,
    PKR,
    CAD,
    AUD,
}

impl Currency {
    /// All currencies in selector order
    pub const ALL: [Currency; 8] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::INR,
        Currency::PKR,
        Currency::CAD,
        Currency::AUD,
    ];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::INR => "INR",
            Currency::PKR => "PKR",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// Default units of this currency per one US dollar
    pub fn default_per_usd(&self) -> f64 {
        match self {
            Currency::USD => 1.0,
            Currency::EUR => 0.85,
            Currency::GBP => 0.73,
            Currency::JPY => 110.0,
            Currency::INR => 74.0,
            Currency::PKR => 280.0,
            Currency::CAD => 1.25,
            Currency::AUD => 1.35,
        }
    }
}

impl FromStr for Currency {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == wanted)
            .ok_or_else(|| CalcError::unknown_key("currency", s))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Per-USD exchange rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRates {
    per_usd: BTreeMap<Currency, f64>,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        ExchangeRates {
            per_usd: Currency::ALL
                .into_iter()
                .map(|c| (c, c.default_per_usd()))
                .collect(),
        }
    }
}

impl ExchangeRates {
    /// Empty table (every lookup fails until rates are set)
    pub fn empty() -> Self {
        ExchangeRates {
            per_usd: BTreeMap::new(),
        }
    }

    /// Set units of `currency` per one US dollar
    pub fn set(&mut self, currency: Currency, per_usd: f64) {
        self.per_usd.insert(currency, per_usd);
    }

    /// Units of `currency` per one US dollar
    pub fn per_usd(&self, currency: Currency) -> CalcResult<f64> {
        self.per_usd
            .get(&currency)
            .copied()
            .ok_or_else(|| CalcError::unknown_key("exchange rate", currency.code()))
    }

    /// Units of `to` received for one unit of `from`
    pub fn rate(&self, from: Currency, to: Currency) -> CalcResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        Ok(self.per_usd(to)? / self.per_usd(from)?)
    }

    /// Fill any currency absent from the table with its default rate.
    /// Returns the currencies that were filled.
    pub fn fill_missing(&mut self) -> Vec<Currency> {
        let mut filled = Vec::new();
        for currency in Currency::ALL {
            if !self.per_usd.contains_key(&currency) {
                self.per_usd.insert(currency, currency.default_per_usd());
                filled.push(currency);
            }
        }
        filled
    }

    /// Check that every configured rate is a positive finite number
    pub fn validate(&self) -> CalcResult<()> {
        for (currency, rate) in &self.per_usd {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(CalcError::invalid_input(
                    format!("exchange_rates.{}", currency.code()),
                    rate.to_string(),
                    "Exchange rate must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Currency conversion input
///
/// ## JSON Example
///
/// ```json
/// { "amount": 100.0, "from": "USD", "to": "EUR" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInput {
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
}

/// Currency conversion result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyResult {
    pub amount: f64,
    pub from: Currency,
    pub converted: f64,
    pub to: Currency,
    /// Units of `to` per unit of `from`
    pub rate: f64,
    pub note: String,
}

/// Convert an amount using the given rate table.
pub fn calculate(input: &CurrencyInput, rates: &ExchangeRates) -> CalcResult<CurrencyResult> {
    if input.amount < 0.0 {
        return Err(CalcError::invalid_input(
            "amount",
            input.amount.to_string(),
            "Amount cannot be negative",
        ));
    }
    let rate = rates.rate(input.from, input.to)?;
    let converted = if input.from == input.to {
        input.amount
    } else {
        input.amount * rate
    };

    Ok(CurrencyResult {
        amount: input.amount,
        from: input.from,
        converted,
        to: input.to,
        rate,
        note: "Rates are approximate and for demonstration only".to_string(),
    })
}
