//! # Carbon Footprint
//!
//! Rough annual CO2-equivalent estimate from driving, flying, household
//! electricity and diet, compared against a configurable per-capita
//! average. Emission factors come from [`CarbonSettings`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::CarbonSettings;

/// Diet profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Vegan,
    Vegetarian,
    Pescatarian,
    Average,
    MeatHeavy,
}

impl DietType {
    pub const ALL: &'static [DietType] = &[
        DietType::Vegan,
        DietType::Vegetarian,
        DietType::Pescatarian,
        DietType::Average,
        DietType::MeatHeavy,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DietType::Vegan => "vegan",
            DietType::Vegetarian => "vegetarian",
            DietType::Pescatarian => "pescatarian",
            DietType::Average => "average",
            DietType::MeatHeavy => "meat_heavy",
        }
    }

    /// Annual food emissions, tonnes CO2e
    pub fn annual_tonnes(&self) -> f64 {
        match self {
            DietType::Vegan => 1.5,
            DietType::Vegetarian => 1.7,
            DietType::Pescatarian => 1.9,
            DietType::Average => 2.5,
            DietType::MeatHeavy => 3.3,
        }
    }
}

impl FromStr for DietType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        DietType::ALL
            .iter()
            .copied()
            .find(|d| d.key() == key)
            .ok_or_else(|| CalcError::unknown_key("diet", s))
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Carbon footprint input
///
/// ## JSON Example
///
/// ```json
/// {
///   "car_km_per_year": 12000.0,
///   "flights_per_year": 2.0,
///   "hours_per_flight": 3.0,
///   "electricity_kwh_per_month": 300.0,
///   "diet": "average"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintInput {
    pub car_km_per_year: f64,
    pub flights_per_year: f64,
    pub hours_per_flight: f64,
    pub electricity_kwh_per_month: f64,
    pub diet: DietType,
}

impl FootprintInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("car_km_per_year", self.car_km_per_year),
            ("flights_per_year", self.flights_per_year),
            ("hours_per_flight", self.hours_per_flight),
            ("electricity_kwh_per_month", self.electricity_kwh_per_month),
        ] {
            if value < 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"));
            }
        }
        Ok(())
    }
}

/// Carbon footprint result, tonnes CO2e per year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintResult {
    pub car_tonnes: f64,
    pub flight_tonnes: f64,
    pub electricity_tonnes: f64,
    pub diet_tonnes: f64,
    pub total_tonnes: f64,
    pub average_tonnes: f64,
    /// Total as a percentage of the average
    pub percent_of_average: f64,
    pub above_average: bool,
}

/// Estimate an annual footprint.
pub fn calculate(input: &FootprintInput, factors: &CarbonSettings) -> CalcResult<FootprintResult> {
    input.validate()?;
    let car_tonnes = input.car_km_per_year * factors.car_kg_per_km / 1000.0;
    let flight_tonnes = input.flights_per_year * input.hours_per_flight * factors.flight_kg_per_hour / 1000.0;
    let electricity_tonnes = input.electricity_kwh_per_month * 12.0 * factors.electricity_kg_per_kwh / 1000.0;
    let diet_tonnes = input.diet.annual_tonnes();
    let total_tonnes = car_tonnes + flight_tonnes + electricity_tonnes + diet_tonnes;

    Ok(FootprintResult {
        car_tonnes,
        flight_tonnes,
        electricity_tonnes,
        diet_tonnes,
        total_tonnes,
        average_tonnes: factors.average_tonnes_per_person,
        percent_of_average: total_tonnes / factors.average_tonnes_per_person * 100.0,
        above_average: total_tonnes > factors.average_tonnes_per_person,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_components() {
        let factors = CarbonSettings {
            average_tonnes_per_person: 10.0,
            car_kg_per_km: 0.2,
            flight_kg_per_hour: 100.0,
            electricity_kg_per_kwh: 0.5,
        };
        let result = calculate(
            &FootprintInput {
                car_km_per_year: 10_000.0,
                flights_per_year: 2.0,
                hours_per_flight: 5.0,
                electricity_kwh_per_month: 100.0,
                diet: DietType::Vegan,
            },
            &factors,
        )
        .unwrap();
        assert!((result.car_tonnes - 2.0).abs() < 1e-12);
        assert!((result.flight_tonnes - 1.0).abs() < 1e-12);
        assert!((result.electricity_tonnes - 0.6).abs() < 1e-12);
        assert_eq!(result.diet_tonnes, 1.5);
        assert!((result.total_tonnes - 5.1).abs() < 1e-12);
        assert!((result.percent_of_average - 51.0).abs() < 1e-9);
        assert!(!result.above_average);
    }

    #[test]
    fn test_diet_only() {
        let result = calculate(
            &FootprintInput {
                car_km_per_year: 0.0,
                flights_per_year: 0.0,
                hours_per_flight: 0.0,
                electricity_kwh_per_month: 0.0,
                diet: DietType::MeatHeavy,
            },
            &CarbonSettings::default(),
        )
        .unwrap();
        assert_eq!(result.total_tonnes, 3.3);
        assert_eq!(result.average_tonnes, 16.0);
    }

    #[test]
    fn test_negative_rejected() {
        let err = calculate(
            &FootprintInput {
                car_km_per_year: -1.0,
                flights_per_year: 0.0,
                hours_per_flight: 0.0,
                electricity_kwh_per_month: 0.0,
                diet: DietType::Average,
            },
            &CarbonSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("car_km_per_year"));
    }

    #[test]
    fn test_diet_parsing() {
        assert_eq!("meat-heavy".parse::<DietType>().unwrap(), DietType::MeatHeavy);
        assert_eq!("Vegan".parse::<DietType>().unwrap(), DietType::Vegan);
        assert!("carnivore".parse::<DietType>().is_err());
    }
}
