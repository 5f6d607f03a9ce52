//! # Compound Growth
//!
//! Compound interest, return on investment and retirement projection.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Compound interest
// ============================================================================

/// Compound interest input.
///
/// ## JSON Example
///
/// ```json
/// { "principal": 1000.0, "annual_rate_percent": 5.0, "years": 10.0, "compounds_per_year": 1 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: f64,
    /// Compounding periods per year (1 = annual, 12 = monthly)
    pub compounds_per_year: u32,
}

impl CompoundInterestInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("principal", self.principal),
            ("annual_rate_percent", self.annual_rate_percent),
            ("years", self.years),
        ] {
            if value <= 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "All values must be positive numbers"));
            }
        }
        if self.compounds_per_year == 0 {
            return Err(CalcError::invalid_input(
                "compounds_per_year",
                "0",
                "Compounding frequency must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Compound interest result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestResult {
    pub principal: f64,
    pub interest_earned: f64,
    pub future_value: f64,
    /// Annual rate equivalent to the compounded nominal rate, percent
    pub effective_annual_rate_percent: f64,
}

/// `fv = P (1 + r/m)^(m t)`
pub fn calculate_compound_interest(input: &CompoundInterestInput) -> CalcResult<CompoundInterestResult> {
    input.validate()?;
    let m = f64::from(input.compounds_per_year);
    let periodic = input.annual_rate_percent / 100.0 / m;
    let future_value = input.principal * (1.0 + periodic).powf(m * input.years);

    Ok(CompoundInterestResult {
        principal: input.principal,
        interest_earned: future_value - input.principal,
        future_value,
        effective_annual_rate_percent: ((1.0 + periodic).powf(m) - 1.0) * 100.0,
    })
}

// ============================================================================
// ROI
// ============================================================================

/// Return on investment input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiInput {
    pub initial_investment: f64,
    pub final_value: f64,
    pub years: f64,
}

/// Return on investment result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    /// Final minus initial
    pub profit: f64,
    pub roi_percent: f64,
    /// Compound annual growth rate, percent
    pub annualized_roi_percent: f64,
    pub is_gain: bool,
}

/// Total and annualised return.
pub fn calculate_roi(input: &RoiInput) -> CalcResult<RoiResult> {
    for (field, value) in [
        ("initial_investment", input.initial_investment),
        ("final_value", input.final_value),
        ("years", input.years),
    ] {
        if value <= 0.0 {
            return Err(CalcError::invalid_input(field, value.to_string(), "All values must be positive numbers"));
        }
    }

    let profit = input.final_value - input.initial_investment;
    let roi_percent = profit / input.initial_investment * 100.0;
    let annualized = (input.final_value / input.initial_investment).powf(1.0 / input.years) - 1.0;

    Ok(RoiResult {
        profit,
        roi_percent,
        annualized_roi_percent: annualized * 100.0,
        is_gain: profit >= 0.0,
    })
}

// ============================================================================
// Retirement projection
// ============================================================================

/// Retirement savings projection input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementInput {
    pub current_age: f64,
    pub retirement_age: f64,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    /// Expected annual return, percent
    pub annual_return_percent: f64,
}

impl RetirementInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.current_age <= 0.0 {
            return Err(CalcError::invalid_input(
                "current_age",
                self.current_age.to_string(),
                "Age must be positive",
            ));
        }
        if self.retirement_age <= self.current_age {
            return Err(CalcError::invalid_input(
                "retirement_age",
                self.retirement_age.to_string(),
                "Retirement age must be greater than current age",
            ));
        }
        for (field, value) in [
            ("current_savings", self.current_savings),
            ("monthly_contribution", self.monthly_contribution),
            ("annual_return_percent", self.annual_return_percent),
        ] {
            if value < 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"));
            }
        }
        Ok(())
    }
}

/// Retirement savings projection result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementResult {
    pub years_to_retirement: f64,
    /// Current savings grown to retirement
    pub savings_growth: f64,
    /// Accumulated value of all monthly contributions
    pub contributions_growth: f64,
    pub projected_balance: f64,
    pub total_contributed: f64,
    /// Projected balance minus everything put in
    pub total_growth: f64,
}

/// Project savings plus a monthly-contribution annuity to retirement.
pub fn calculate_retirement(input: &RetirementInput) -> CalcResult<RetirementResult> {
    input.validate()?;
    let years = input.retirement_age - input.current_age;
    let months = years * 12.0;
    let monthly_return = input.annual_return_percent / 100.0 / 12.0;

    let savings_growth = input.current_savings * (1.0 + monthly_return).powf(months);
    let contributions_growth = if monthly_return == 0.0 {
        input.monthly_contribution * months
    } else {
        input.monthly_contribution * ((1.0 + monthly_return).powf(months) - 1.0) / monthly_return
    };
    let projected_balance = savings_growth + contributions_growth;
    let total_contributed = input.current_savings + input.monthly_contribution * months;

    Ok(RetirementResult {
        years_to_retirement: years,
        savings_growth,
        contributions_growth,
        projected_balance,
        total_contributed,
        total_growth: projected_balance - total_contributed,
    })
}
