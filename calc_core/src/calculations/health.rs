//! # Health Calculators
//!
//! Body mass index, basal metabolic rate and blood pressure classification.
//! These are screening figures only, not medical advice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// BMI
// ============================================================================

/// WHO adult BMI categories. Intervals are half-open: `[18.5, 25)` is normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Lower bound of normal weight
    pub const NORMAL_MIN: f64 = 18.5;
    /// Lower bound of overweight
    pub const OVERWEIGHT_MIN: f64 = 25.0;
    /// Lower bound of obese
    pub const OBESE_MIN: f64 = 30.0;

    /// Classify a BMI value
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < Self::NORMAL_MIN {
            BmiCategory::Underweight
        } else if bmi < Self::OVERWEIGHT_MIN {
            BmiCategory::NormalWeight
        } else if bmi < Self::OBESE_MIN {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// BMI input (metric)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiInput {
    pub weight_kg: f64,
    pub height_cm: f64,
}

/// BMI result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
    /// Weight range that would be "Normal weight" at this height
    pub healthy_weight_min_kg: f64,
    pub healthy_weight_max_kg: f64,
}

/// `bmi = kg / m²`
pub fn calculate_bmi(input: &BmiInput) -> CalcResult<BmiResult> {
    if input.weight_kg <= 0.0 || input.height_cm <= 0.0 {
        let (field, value) = if input.weight_kg <= 0.0 {
            ("weight_kg", input.weight_kg)
        } else {
            ("height_cm", input.height_cm)
        };
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Weight and height must be positive numbers",
        ));
    }
    let height_m = input.height_cm / 100.0;
    let height_sq = height_m * height_m;
    let bmi = input.weight_kg / height_sq;

    Ok(BmiResult {
        bmi,
        category: BmiCategory::from_bmi(bmi),
        healthy_weight_min_kg: BmiCategory::NORMAL_MIN * height_sq,
        healthy_weight_max_kg: BmiCategory::OVERWEIGHT_MIN * height_sq,
    })
}

// ============================================================================
// BMR
// ============================================================================

/// Biological sex for the Harris-Benedict equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(CalcError::unknown_key("sex", s)),
        }
    }
}

/// BMR input (metric)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrInput {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
    pub sex: Sex,
}

/// Daily calorie needs per activity level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityCalories {
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
    pub active: f64,
    pub very_active: f64,
}

/// BMR result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrResult {
    /// Basal metabolic rate, kcal/day
    pub bmr: f64,
    pub activity_levels: ActivityCalories,
}

/// Revised Harris-Benedict BMR (Roza & Shizgal, 1984).
pub fn calculate_bmr(input: &BmrInput) -> CalcResult<BmrResult> {
    for (field, value) in [
        ("weight_kg", input.weight_kg),
        ("height_cm", input.height_cm),
        ("age_years", input.age_years),
    ] {
        if value <= 0.0 {
            return Err(CalcError::invalid_input(
                field,
                value.to_string(),
                "Weight, height, and age must be positive numbers",
            ));
        }
    }

    let bmr = match input.sex {
        Sex::Male => 88.362 + 13.397 * input.weight_kg + 4.799 * input.height_cm - 5.677 * input.age_years,
        Sex::Female => 447.593 + 9.247 * input.weight_kg + 3.098 * input.height_cm - 4.330 * input.age_years,
    };

    Ok(BmrResult {
        bmr,
        activity_levels: ActivityCalories {
            sedentary: bmr * 1.2,
            light: bmr * 1.375,
            moderate: bmr * 1.55,
            active: bmr * 1.725,
            very_active: bmr * 1.9,
        },
    })
}

// ============================================================================
// Blood pressure
// ============================================================================

/// AHA blood pressure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodPressureCategory {
    Normal,
    Elevated,
    #[serde(rename = "Stage 1 High Blood Pressure")]
    Stage1,
    #[serde(rename = "Stage 2 High Blood Pressure")]
    Stage2,
    #[serde(rename = "Hypertensive Crisis")]
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    /// Classify a reading (mmHg)
    pub fn classify(systolic: f64, diastolic: f64) -> Self {
        if systolic > 180.0 || diastolic > 120.0 {
            BloodPressureCategory::HypertensiveCrisis
        } else if systolic >= 140.0 || diastolic >= 90.0 {
            BloodPressureCategory::Stage2
        } else if systolic >= 130.0 || diastolic >= 80.0 {
            BloodPressureCategory::Stage1
        } else if systolic >= 120.0 {
            BloodPressureCategory::Elevated
        } else {
            BloodPressureCategory::Normal
        }
    }

    /// Suggested next step
    pub fn advice(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "Maintain healthy lifestyle",
            BloodPressureCategory::Elevated => "Lifestyle changes recommended",
            BloodPressureCategory::Stage1 => "Consult healthcare provider",
            BloodPressureCategory::Stage2 => "Seek medical attention",
            BloodPressureCategory::HypertensiveCrisis => "Emergency medical attention required",
        }
    }
}

/// Blood pressure input (mmHg)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureInput {
    pub systolic: f64,
    pub diastolic: f64,
}

/// Blood pressure result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureResult {
    pub category: BloodPressureCategory,
    pub advice: String,
    /// Systolic minus diastolic
    pub pulse_pressure: f64,
    /// Diastolic + one third of pulse pressure
    pub mean_arterial_pressure: f64,
}

/// Classify a blood pressure reading.
pub fn calculate_blood_pressure(input: &BloodPressureInput) -> CalcResult<BloodPressureResult> {
    if input.systolic <= 0.0 || input.systolic > 300.0 {
        return Err(CalcError::invalid_input(
            "systolic",
            input.systolic.to_string(),
            "Systolic pressure must be between 0 and 300 mmHg",
        ));
    }
    if input.diastolic <= 0.0 || input.diastolic > 200.0 {
        return Err(CalcError::invalid_input(
            "diastolic",
            input.diastolic.to_string(),
            "Diastolic pressure must be between 0 and 200 mmHg",
        ));
    }
    if input.systolic < input.diastolic {
        return Err(CalcError::invalid_input(
            "systolic",
            input.systolic.to_string(),
            "Systolic pressure should be higher than diastolic pressure",
        ));
    }

    let category = BloodPressureCategory::classify(input.systolic, input.diastolic);
    let pulse_pressure = input.systolic - input.diastolic;
    Ok(BloodPressureResult {
        category,
        advice: category.advice().to_string(),
        pulse_pressure,
        mean_arterial_pressure: input.diastolic + pulse_pressure / 3.0,
    })
}
