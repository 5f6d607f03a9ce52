//! # Speed, Distance and Time
//!
//! Given any two of speed (km/h), distance (km) and time (hours), solve
//! for the third.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Which quantity was solved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionUnknown {
    Speed,
    Distance,
    Time,
}

/// Two known quantities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "solve_for", rename_all = "snake_case")]
pub enum MotionInput {
    Speed { distance_km: f64, time_hours: f64 },
    Distance { speed_kmh: f64, time_hours: f64 },
    Time { speed_kmh: f64, distance_km: f64 },
}

impl MotionInput {
    /// Pick the mode from whichever two values are present.
    pub fn from_known(speed_kmh: Option<f64>, distance_km: Option<f64>, time_hours: Option<f64>) -> CalcResult<Self> {
        match (speed_kmh, distance_km, time_hours) {
            (None, Some(distance_km), Some(time_hours)) => Ok(MotionInput::Speed { distance_km, time_hours }),
            (Some(speed_kmh), None, Some(time_hours)) => Ok(MotionInput::Distance { speed_kmh, time_hours }),
            (Some(speed_kmh), Some(distance_km), None) => Ok(MotionInput::Time { speed_kmh, distance_km }),
            _ => Err(CalcError::invalid_input(
                "speed_kmh",
                "",
                "Provide exactly two of speed_kmh, distance_km and time_hours",
            )),
        }
    }

    pub fn unknown(&self) -> MotionUnknown {
        match self {
            MotionInput::Speed { .. } => MotionUnknown::Speed,
            MotionInput::Distance { .. } => MotionUnknown::Distance,
            MotionInput::Time { .. } => MotionUnknown::Time,
        }
    }
}

/// Motion result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionResult {
    pub solved_for: MotionUnknown,
    pub speed_kmh: f64,
    pub distance_km: f64,
    pub time_hours: f64,
    /// Time as `H:MM:SS`
    pub time_hms: String,
    /// Minutes per km
    pub pace_min_per_km: f64,
}

fn positive(field: &str, value: f64) -> CalcResult<f64> {
    if value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"));
    }
    Ok(value)
}

fn format_hms(hours: f64) -> String {
    let total_seconds = (hours * 3600.0).round() as u64;
    format!(
        "{}:{:02}:{:02}",
        total_seconds / 3600,
        total_seconds % 3600 / 60,
        total_seconds % 60
    )
}

/// Solve `distance = speed × time` for the missing quantity.
pub fn calculate(input: &MotionInput) -> CalcResult<MotionResult> {
    let (speed_kmh, distance_km, time_hours) = match *input {
        MotionInput::Speed { distance_km, time_hours } => {
            let d = positive("distance_km", distance_km)?;
            let t = positive("time_hours", time_hours)?;
            (d / t, d, t)
        }
        MotionInput::Distance { speed_kmh, time_hours } => {
            let s = positive("speed_kmh", speed_kmh)?;
            let t = positive("time_hours", time_hours)?;
            (s, s * t, t)
        }
        MotionInput::Time { speed_kmh, distance_km } => {
            let s = positive("speed_kmh", speed_kmh)?;
            let d = positive("distance_km", distance_km)?;
            (s, d, d / s)
        }
    };

    Ok(MotionResult {
        solved_for: input.unknown(),
        speed_kmh,
        distance_km,
        time_hours,
        time_hms: format_hms(time_hours),
        pace_min_per_km: 60.0 / speed_kmh,
    })
}
