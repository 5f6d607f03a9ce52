//! Temperature conversion.
//!
//! Temperature scales differ by offset as well as scale, so conversion is
//! additive and routed through Celsius rather than through a factor table.
//! Negative readings are valid; anything below absolute zero is not.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Absolute zero in Celsius
pub const ABSOLUTE_ZERO_C: f64 = -273.15;

/// Temperature scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
    Rankine,
}

impl TemperatureUnit {
    /// All scales in selector order
    pub const ALL: [TemperatureUnit; 4] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
        TemperatureUnit::Rankine,
    ];

    /// Selector key
    pub fn key(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
            TemperatureUnit::Rankine => "rankine",
        }
    }

    /// Display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Rankine => "°R",
        }
    }

    fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureUnit::Kelvin => value + ABSOLUTE_ZERO_C,
            TemperatureUnit::Rankine => (value - 491.67) * 5.0 / 9.0,
        }
    }

    fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => celsius - ABSOLUTE_ZERO_C,
            TemperatureUnit::Rankine => celsius * 9.0 / 5.0 + 491.67,
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "celsius" | "c" | "°c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" | "°f" => Ok(TemperatureUnit::Fahrenheit),
            "kelvin" | "k" => Ok(TemperatureUnit::Kelvin),
            "rankine" | "r" | "°r" => Ok(TemperatureUnit::Rankine),
            _ => Err(CalcError::unknown_key("temperature unit", s)),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Convert a temperature reading between scales.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid_number("value", value.to_string()));
    }
    let celsius = from.to_celsius(value);
    // Small tolerance so -273.15 °C expressed in °F still passes
    if celsius < ABSOLUTE_ZERO_C - 1e-9 {
        return Err(CalcError::invalid_input(
            "value",
            value.to_string(),
            format!("Below absolute zero ({} {})", from.from_celsius(ABSOLUTE_ZERO_C), from.symbol()),
        ));
    }
    if from == to {
        return Ok(value);
    }
    Ok(to.from_celsius(celsius))
}

/// Temperature conversion input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureInput {
    pub value: f64,
    pub from: TemperatureUnit,
    pub to: TemperatureUnit,
}

/// Temperature conversion result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResult {
    pub value: f64,
    pub from: String,
    pub result: f64,
    pub to: String,
    pub celsius: f64,
}

/// Convert and report the Celsius intermediate.
pub fn calculate(input: &TemperatureInput) -> CalcResult<TemperatureResult> {
    let result = convert_temperature(input.value, input.from, input.to)?;
    Ok(TemperatureResult {
        value: input.value,
        from: input.from.key().to_string(),
        result,
        to: input.to.key().to_string(),
        celsius: input.from.to_celsius(input.value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_points() {
        let f = convert_temperature(100.0, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit).unwrap();
        assert!((f - 212.0).abs() < 1e-9);

        let c = convert_temperature(-40.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius).unwrap();
        assert!((c + 40.0).abs() < 1e-9);

        let k = convert_temperature(0.0, TemperatureUnit::Celsius, TemperatureUnit::Kelvin).unwrap();
        assert!((k - 273.15).abs() < 1e-9);

        let r = convert_temperature(0.0, TemperatureUnit::Kelvin, TemperatureUnit::Rankine).unwrap();
        assert!(r.abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_all_pairs() {
        for a in TemperatureUnit::ALL {
            for b in TemperatureUnit::ALL {
                let there = convert_temperature(310.0, a, b).unwrap();
                let back = convert_temperature(there, b, a).unwrap();
                assert!((back - 310.0).abs() < 1e-9, "{a} -> {b}");
            }
        }
    }

    #[test]
    fn test_negative_allowed_but_not_below_absolute_zero() {
        assert!(convert_temperature(-10.0, TemperatureUnit::Celsius, TemperatureUnit::Kelvin).is_ok());
        assert!(convert_temperature(-1.0, TemperatureUnit::Kelvin, TemperatureUnit::Celsius).is_err());
        assert!(convert_temperature(-500.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius).is_err());
        assert!(convert_temperature(-459.67, TemperatureUnit::Fahrenheit, TemperatureUnit::Kelvin).is_ok());
    }

    #[test]
    fn test_unknown_scale() {
        let err = "reaumur".parse::<TemperatureUnit>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_KEY");
    }
}
