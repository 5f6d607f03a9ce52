//! # Everyday Business Math
//!
//! Percentages, tips, salary breakdowns and break-even analysis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Percentage
// ============================================================================

/// Percentage input: a number and a percentage applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageInput {
    pub number: f64,
    pub percentage: f64,
}

/// Percentage result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageResult {
    /// `percentage`% of `number`
    pub percent_of: f64,
    /// `number` as a percentage of `percentage`; `None` when `percentage` is 0
    pub ratio_percent: Option<f64>,
    /// Change from `number` to `percentage`, percent; `None` when `number` is 0
    pub change_percent: Option<f64>,
}

/// Three related percentage readings of two numbers.
pub fn calculate_percentage(input: &PercentageInput) -> CalcResult<PercentageResult> {
    let n = input.number;
    let p = input.percentage;
    Ok(PercentageResult {
        percent_of: n * p / 100.0,
        ratio_percent: (p != 0.0).then(|| n / p * 100.0),
        change_percent: (n != 0.0).then(|| (p - n) / n * 100.0),
    })
}

// ============================================================================
// Tip
// ============================================================================

/// Tip splitting input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TipInput {
    pub bill_amount: f64,
    pub tip_percent: f64,
    pub people: u32,
}

/// Tip splitting result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TipResult {
    pub tip_amount: f64,
    pub total_amount: f64,
    pub amount_per_person: f64,
    pub tip_per_person: f64,
}

/// Tip and per-person split.
pub fn calculate_tip(input: &TipInput) -> CalcResult<TipResult> {
    if input.bill_amount <= 0.0 {
        return Err(CalcError::invalid_input(
            "bill_amount",
            input.bill_amount.to_string(),
            "Bill amount must be positive",
        ));
    }
    if input.tip_percent < 0.0 {
        return Err(CalcError::invalid_input(
            "tip_percent",
            input.tip_percent.to_string(),
            "Tip percentage cannot be negative",
        ));
    }
    if input.people == 0 {
        return Err(CalcError::invalid_input("people", "0", "At least one person must pay"));
    }

    let people = f64::from(input.people);
    let tip_amount = input.bill_amount * input.tip_percent / 100.0;
    let total_amount = input.bill_amount + tip_amount;
    Ok(TipResult {
        tip_amount,
        total_amount,
        amount_per_person: total_amount / people,
        tip_per_person: tip_amount / people,
    })
}

// ============================================================================
// Salary
// ============================================================================

/// Pay period the salary amount is quoted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPeriod {
    Hourly,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Annual,
}

impl PayPeriod {
    /// All periods in selector order
    pub const ALL: [PayPeriod; 6] = [
        PayPeriod::Hourly,
        PayPeriod::Daily,
        PayPeriod::Weekly,
        PayPeriod::Biweekly,
        PayPeriod::Monthly,
        PayPeriod::Annual,
    ];

    /// Selector key
    pub fn key(&self) -> &'static str {
        match self {
            PayPeriod::Hourly => "hourly",
            PayPeriod::Daily => "daily",
            PayPeriod::Weekly => "weekly",
            PayPeriod::Biweekly => "biweekly",
            PayPeriod::Monthly => "monthly",
            PayPeriod::Annual => "annual",
        }
    }
}

impl FromStr for PayPeriod {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "hour" => Ok(PayPeriod::Hourly),
            "daily" | "day" => Ok(PayPeriod::Daily),
            "weekly" | "week" => Ok(PayPeriod::Weekly),
            "biweekly" | "bi-weekly" | "fortnightly" => Ok(PayPeriod::Biweekly),
            "monthly" | "month" => Ok(PayPeriod::Monthly),
            "annual" | "annually" | "yearly" | "year" => Ok(PayPeriod::Annual),
            _ => Err(CalcError::unknown_key("pay period", s)),
        }
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Days in a working week
const WORKDAYS_PER_WEEK: f64 = 5.0;

/// Salary conversion input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryInput {
    pub amount: f64,
    pub period: PayPeriod,
    pub hours_per_week: f64,
    pub weeks_per_year: f64,
}

impl SalaryInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.amount <= 0.0 {
            return Err(CalcError::invalid_input("amount", self.amount.to_string(), "Salary must be positive"));
        }
        if self.hours_per_week <= 0.0 || self.hours_per_week > 168.0 {
            return Err(CalcError::invalid_input(
                "hours_per_week",
                self.hours_per_week.to_string(),
                "Hours per week must be between 0 and 168",
            ));
        }
        if self.weeks_per_year <= 0.0 || self.weeks_per_year > 52.143 {
            return Err(CalcError::invalid_input(
                "weeks_per_year",
                self.weeks_per_year.to_string(),
                "Weeks per year must be between 0 and 52.143",
            ));
        }
        Ok(())
    }
}

/// Salary expressed in every pay period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryResult {
    pub hourly: f64,
    pub daily: f64,
    pub weekly: f64,
    pub biweekly: f64,
    pub monthly: f64,
    pub annual: f64,
}

/// Normalise to annual pay, then derive every other period.
pub fn calculate_salary(input: &SalaryInput) -> CalcResult<SalaryResult> {
    input.validate()?;
    let hours_per_year = input.hours_per_week * input.weeks_per_year;
    let hours_per_day = input.hours_per_week / WORKDAYS_PER_WEEK;

    let annual = match input.period {
        PayPeriod::Hourly => input.amount * hours_per_year,
        PayPeriod::Daily => input.amount / hours_per_day * hours_per_year,
        PayPeriod::Weekly => input.amount * input.weeks_per_year,
        PayPeriod::Biweekly => input.amount * input.weeks_per_year / 2.0,
        PayPeriod::Monthly => input.amount * 12.0,
        PayPeriod::Annual => input.amount,
    };
    let hourly = annual / hours_per_year;
    let weekly = annual / input.weeks_per_year;

    Ok(SalaryResult {
        hourly,
        daily: hourly * hours_per_day,
        weekly,
        biweekly: weekly * 2.0,
        monthly: annual / 12.0,
        annual,
    })
}

// ============================================================================
// Break-even
// ============================================================================

/// Break-even analysis input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub fixed_costs: f64,
    pub variable_cost_per_unit: f64,
    pub price_per_unit: f64,
    /// Profit goal for the "units needed" figure
    pub target_profit: f64,
}

/// Break-even analysis result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    /// Whole units needed to cover fixed costs
    pub break_even_units: u64,
    pub break_even_revenue: f64,
    /// Price minus variable cost
    pub contribution_margin: f64,
    pub contribution_margin_percent: f64,
    /// Whole units needed to cover fixed costs plus the target profit
    pub units_for_target_profit: u64,
}

/// Units and revenue needed to break even.
pub fn calculate_break_even(input: &BreakEvenInput) -> CalcResult<BreakEvenResult> {
    if input.fixed_costs <= 0.0 {
        return Err(CalcError::invalid_input(
            "fixed_costs",
            input.fixed_costs.to_string(),
            "Fixed costs must be positive",
        ));
    }
    if input.variable_cost_per_unit < 0.0 {
        return Err(CalcError::invalid_input(
            "variable_cost_per_unit",
            input.variable_cost_per_unit.to_string(),
            "Variable cost cannot be negative",
        ));
    }
    if input.price_per_unit <= input.variable_cost_per_unit {
        return Err(CalcError::invalid_input(
            "price_per_unit",
            input.price_per_unit.to_string(),
            "Selling price must be greater than variable cost per unit",
        ));
    }
    if input.target_profit < 0.0 {
        return Err(CalcError::invalid_input(
            "target_profit",
            input.target_profit.to_string(),
            "Target profit cannot be negative",
        ));
    }

    let margin = input.price_per_unit - input.variable_cost_per_unit;
    let break_even_units = (input.fixed_costs / margin).ceil() as u64;
    Ok(BreakEvenResult {
        break_even_units,
        break_even_revenue: break_even_units as f64 * input.price_per_unit,
        contribution_margin: margin,
        contribution_margin_percent: margin / input.price_per_unit * 100.0,
        units_for_target_profit: ((input.fixed_costs + input.target_profit) / margin).ceil() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let result = calculate_percentage(&PercentageInput {
            number: 200.0,
            percentage: 15.0,
        })
        .unwrap();
        assert_eq!(result.percent_of, 30.0);
        assert!((result.ratio_percent.unwrap() - 1333.333_333).abs() < 1e-3);
        assert!((result.change_percent.unwrap() + 92.5).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_zero_guards() {
        let result = calculate_percentage(&PercentageInput {
            number: 0.0,
            percentage: 0.0,
        })
        .unwrap();
        assert_eq!(result.percent_of, 0.0);
        assert_eq!(result.ratio_percent, None);
        assert_eq!(result.change_percent, None);
    }

    #[test]
    fn test_tip_split() {
        let result = calculate_tip(&TipInput {
            bill_amount: 100.0,
            tip_percent: 15.0,
            people: 4,
        })
        .unwrap();
        assert_eq!(result.tip_amount, 15.0);
        assert_eq!(result.total_amount, 115.0);
        assert_eq!(result.amount_per_person, 28.75);
        assert_eq!(result.tip_per_person, 3.75);
    }

    #[test]
    fn test_tip_requires_people() {
        assert!(calculate_tip(&TipInput {
            bill_amount: 100.0,
            tip_percent: 15.0,
            people: 0,
        })
        .is_err());
    }

    #[test]
    fn test_salary_from_hourly() {
        let result = calculate_salary(&SalaryInput {
            amount: 25.0,
            period: PayPeriod::Hourly,
            hours_per_week: 40.0,
            weeks_per_year: 52.0,
        })
        .unwrap();
        assert_eq!(result.annual, 52_000.0);
        assert_eq!(result.daily, 200.0);
        assert_eq!(result.weekly, 1_000.0);
        assert_eq!(result.biweekly, 2_000.0);
        assert!((result.monthly - 4_333.333_333).abs() < 1e-3);
    }

    #[test]
    fn test_salary_periods_agree() {
        for period in PayPeriod::ALL {
            let annual = calculate_salary(&SalaryInput {
                amount: 60_000.0,
                period: PayPeriod::Annual,
                hours_per_week: 37.5,
                weeks_per_year: 48.0,
            })
            .unwrap();
            let quoted = match period {
                PayPeriod::Hourly => annual.hourly,
                PayPeriod::Daily => annual.daily,
                PayPeriod::Weekly => annual.weekly,
                PayPeriod::Biweekly => annual.biweekly,
                PayPeriod::Monthly => annual.monthly,
                PayPeriod::Annual => annual.annual,
            };
            let back = calculate_salary(&SalaryInput {
                amount: quoted,
                period,
                hours_per_week: 37.5,
                weeks_per_year: 48.0,
            })
            .unwrap();
            assert!((back.annual - 60_000.0).abs() < 1e-6, "{period}");
        }
    }

    #[test]
    fn test_unknown_pay_period() {
        assert_eq!("quarterly".parse::<PayPeriod>().unwrap_err().error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_break_even() {
        let result = calculate_break_even(&BreakEvenInput {
            fixed_costs: 10_000.0,
            variable_cost_per_unit: 30.0,
            price_per_unit: 50.0,
            target_profit: 10_000.0,
        })
        .unwrap();
        assert_eq!(result.break_even_units, 500);
        assert_eq!(result.break_even_revenue, 25_000.0);
        assert_eq!(result.contribution_margin, 20.0);
        assert_eq!(result.contribution_margin_percent, 40.0);
        assert_eq!(result.units_for_target_profit, 1_000);
    }

    #[test]
    fn test_break_even_rounds_up() {
        let result = calculate_break_even(&BreakEvenInput {
            fixed_costs: 1_001.0,
            variable_cost_per_unit: 0.0,
            price_per_unit: 10.0,
            target_profit: 0.0,
        })
        .unwrap();
        assert_eq!(result.break_even_units, 101);
    }

    #[test]
    fn test_break_even_price_must_exceed_cost() {
        let err = calculate_break_even(&BreakEvenInput {
            fixed_costs: 1_000.0,
            variable_cost_per_unit: 10.0,
            price_per_unit: 10.0,
            target_profit: 0.0,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("price_per_unit"));
    }
}
