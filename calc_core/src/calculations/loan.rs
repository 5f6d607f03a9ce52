//! # Loan Calculations
//!
//! Amortized-loan family: EMI, car loan, student loan and a two-offer
//! comparison. All share [`annuity_payment`].
//!
//! ## Formula
//!
//! ```text
//! r = annual_rate_percent / 1200
//! n = years * 12
//! payment = P * r * (1 + r)^n / ((1 + r)^n - 1)      (r > 0)
//! payment = P / n                                    (r = 0)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::loan::{calculate_emi, EmiInput};
//!
//! let result = calculate_emi(&EmiInput {
//!     principal: 100_000.0,
//!     annual_rate_percent: 6.0,
//!     years: 30.0,
//! }).unwrap();
//!
//! assert!((result.monthly_payment - 599.55).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Months in a year
const MONTHS_PER_YEAR: f64 = 12.0;

/// Longest loan term accepted, in years
pub const MAX_TERM_YEARS: f64 = 100.0;

/// Amortized payment per month for a loan.
///
/// Callers validate inputs; a zero rate degenerates to straight-line repayment.
pub fn annuity_payment(principal: f64, annual_rate_percent: f64, years: f64) -> f64 {
    let monthly_rate = annual_rate_percent / 1200.0;
    let n = years * MONTHS_PER_YEAR;
    if monthly_rate == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + monthly_rate).powf(n);
    principal * monthly_rate * growth / (growth - 1.0)
}

fn require_positive(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    if value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

fn require_term(field: &str, years: f64) -> CalcResult<()> {
    require_positive(field, years, "Loan term must be positive")?;
    if years > MAX_TERM_YEARS {
        return Err(CalcError::invalid_input(
            field,
            years.to_string(),
            format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
        ));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64, reason: &str) -> CalcResult<()> {
    if value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

/// Payment, total and interest for an amortized loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSummary {
    /// Fixed monthly payment
    pub monthly_payment: f64,
    /// Number of monthly payments
    pub payments: f64,
    /// Sum of all payments
    pub total_paid: f64,
    /// Total paid minus principal
    pub total_interest: f64,
}

impl RepaymentSummary {
    /// Fails when the payment overflows; `term_field` names the field blamed.
    fn new(principal: f64, annual_rate_percent: f64, years: f64, term_field: &str) -> CalcResult<Self> {
        let monthly_payment = annuity_payment(principal, annual_rate_percent, years);
        let payments = years * MONTHS_PER_YEAR;
        let total_paid = monthly_payment * payments;
        if !monthly_payment.is_finite() || !total_paid.is_finite() {
            return Err(CalcError::invalid_input(
                term_field,
                years.to_string(),
                "Term too long to compute at this rate and amount",
            ));
        }
        Ok(RepaymentSummary {
            monthly_payment,
            payments,
            total_paid,
            total_interest: total_paid - principal,
        })
    }
}

// ============================================================================
// EMI
// ============================================================================

/// Equated monthly installment input.
///
/// ## JSON Example
///
/// ```json
/// { "principal": 250000.0, "annual_rate_percent": 7.5, "years": 20.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmiInput {
    /// Amount borrowed
    pub principal: f64,
    /// Nominal annual interest rate in percent
    pub annual_rate_percent: f64,
    /// Loan tenure in years
    pub years: f64,
}

impl EmiInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("principal", self.principal, "Loan amount must be positive")?;
        require_positive("annual_rate_percent", self.annual_rate_percent, "Interest rate must be positive")?;
        require_term("years", self.years)?;
        Ok(())
    }
}

/// EMI result with a yearly amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiResult {
    pub monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    /// Year-by-year breakdown
    pub schedule: Vec<AmortizationYear>,
}

/// One year of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    /// 1-based year number
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    /// Outstanding balance at year end
    pub closing_balance: f64,
}

/// Calculate EMI, totals and schedule.
pub fn calculate_emi(input: &EmiInput) -> CalcResult<EmiResult> {
    input.validate()?;
    let summary = RepaymentSummary::new(input.principal, input.annual_rate_percent, input.years, "years")?;
    let schedule = amortization_schedule(
        input.principal,
        input.annual_rate_percent,
        summary.monthly_payment,
        summary.payments.ceil() as u32,
    );

    Ok(EmiResult {
        monthly_payment: summary.monthly_payment,
        total_paid: summary.total_paid,
        total_interest: summary.total_interest,
        schedule,
    })
}

/// Yearly roll-up of a month-by-month amortization.
pub fn amortization_schedule(
    principal: f64,
    annual_rate_percent: f64,
    monthly_payment: f64,
    months: u32,
) -> Vec<AmortizationYear> {
    let monthly_rate = annual_rate_percent / 1200.0;
    let mut balance = principal;
    let mut schedule = Vec::new();
    let mut current = AmortizationYear {
        year: 1,
        principal_paid: 0.0,
        interest_paid: 0.0,
        closing_balance: balance,
    };

    for month in 1..=months {
        let interest = balance * monthly_rate;
        let principal_part = (monthly_payment - interest).min(balance);
        balance -= principal_part;
        current.interest_paid += interest;
        current.principal_paid += principal_part;
        current.closing_balance = balance.max(0.0);

        if month % 12 == 0 || month == months {
            schedule.push(current);
            current = AmortizationYear {
                year: current.year + 1,
                principal_paid: 0.0,
                interest_paid: 0.0,
                closing_balance: balance,
            };
        }
    }
    schedule
}

// ============================================================================
// Car loan
// ============================================================================

/// Car loan input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarLoanInput {
    pub vehicle_price: f64,
    pub down_payment: f64,
    pub trade_in_value: f64,
    /// Sales tax on the vehicle price, percent
    pub sales_tax_percent: f64,
    /// Annual rate in percent (0 allowed for promotional financing)
    pub annual_rate_percent: f64,
    pub years: f64,
}

impl CarLoanInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("vehicle_price", self.vehicle_price, "Vehicle price must be positive")?;
        require_non_negative("down_payment", self.down_payment, "Down payment cannot be negative")?;
        require_non_negative("trade_in_value", self.trade_in_value, "Trade-in value cannot be negative")?;
        require_non_negative("sales_tax_percent", self.sales_tax_percent, "Sales tax cannot be negative")?;
        require_non_negative("annual_rate_percent", self.annual_rate_percent, "Interest rate cannot be negative")?;
        require_term("years", self.years)?;
        if self.financed_amount() <= 0.0 {
            return Err(CalcError::invalid_input(
                "down_payment",
                self.down_payment.to_string(),
                "Down payment and trade-in cover the whole price; nothing to finance",
            ));
        }
        Ok(())
    }

    /// Sales tax owed on the vehicle price
    pub fn sales_tax(&self) -> f64 {
        self.vehicle_price * self.sales_tax_percent / 100.0
    }

    /// Principal after down payment, trade-in and tax
    pub fn financed_amount(&self) -> f64 {
        self.vehicle_price + self.sales_tax() - self.down_payment - self.trade_in_value
    }
}

/// Car loan result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarLoanResult {
    pub sales_tax: f64,
    pub financed_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    /// Down payment + trade-in + all loan payments
    pub total_cost: f64,
}

/// Calculate a car loan.
pub fn calculate_car_loan(input: &CarLoanInput) -> CalcResult<CarLoanResult> {
    input.validate()?;
    let financed = input.financed_amount();
    let summary = RepaymentSummary::new(financed, input.annual_rate_percent, input.years, "years")?;

    Ok(CarLoanResult {
        sales_tax: input.sales_tax(),
        financed_amount: financed,
        monthly_payment: summary.monthly_payment,
        total_interest: summary.total_interest,
        total_cost: summary.total_paid + input.down_payment + input.trade_in_value,
    })
}

// ============================================================================
// Student loan
// ============================================================================

/// Student loan input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentLoanInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    /// Repayment term in years
    pub years: f64,
    /// Months between disbursement and first payment; simple interest
    /// accrues and is capitalised into the principal
    pub grace_period_months: f64,
}

impl StudentLoanInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("principal", self.principal, "Loan amount must be positive")?;
        require_non_negative("annual_rate_percent", self.annual_rate_percent, "Interest rate cannot be negative")?;
        require_term("years", self.years)?;
        require_non_negative("grace_period_months", self.grace_period_months, "Grace period cannot be negative")?;
        Ok(())
    }
}

/// Student loan result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentLoanResult {
    /// Interest accrued during the grace period
    pub capitalized_interest: f64,
    /// Principal at the start of repayment
    pub repayment_principal: f64,
    pub monthly_payment: f64,
    pub total_paid: f64,
    /// Interest over the whole life, including capitalised interest
    pub total_interest: f64,
}

/// Calculate a student loan.
pub fn calculate_student_loan(input: &StudentLoanInput) -> CalcResult<StudentLoanResult> {
    input.validate()?;
    let capitalized_interest =
        input.principal * input.annual_rate_percent / 1200.0 * input.grace_period_months;
    let repayment_principal = input.principal + capitalized_interest;
    let summary = RepaymentSummary::new(repayment_principal, input.annual_rate_percent, input.years, "years")?;

    Ok(StudentLoanResult {
        capitalized_interest,
        repayment_principal,
        monthly_payment: summary.monthly_payment,
        total_paid: summary.total_paid,
        total_interest: summary.total_paid - input.principal,
    })
}

// ============================================================================
// Loan comparison
// ============================================================================

/// One offer in a loan comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: f64,
    /// Flat fees (origination, closing) paid on top of the payments
    pub fees: f64,
}

impl LoanOffer {
    fn validate(&self, prefix: &str) -> CalcResult<()> {
        require_positive(&format!("{prefix}.principal"), self.principal, "Loan amount must be positive")?;
        require_non_negative(
            &format!("{prefix}.annual_rate_percent"),
            self.annual_rate_percent,
            "Interest rate cannot be negative",
        )?;
        require_term(&format!("{prefix}.years"), self.years)?;
        require_non_negative(&format!("{prefix}.fees"), self.fees, "Fees cannot be negative")?;
        Ok(())
    }
}

/// Evaluated offer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfferSummary {
    pub monthly_payment: f64,
    pub total_interest: f64,
    /// All payments plus fees
    pub total_cost: f64,
}

/// Which offer is cheaper overall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cheaper {
    OfferA,
    OfferB,
    Tie,
}

/// Two-offer comparison input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanComparisonInput {
    pub offer_a: LoanOffer,
    pub offer_b: LoanOffer,
}

/// Two-offer comparison result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanComparisonResult {
    pub offer_a: OfferSummary,
    pub offer_b: OfferSummary,
    pub cheaper: Cheaper,
    /// Absolute difference in total cost
    pub savings: f64,
}

/// Rank two offers by total cost including fees.
pub fn calculate_loan_comparison(input: &LoanComparisonInput) -> CalcResult<LoanComparisonResult> {
    input.offer_a.validate("offer_a")?;
    input.offer_b.validate("offer_b")?;

    let summarize = |offer: &LoanOffer, prefix: &str| -> CalcResult<OfferSummary> {
        let summary = RepaymentSummary::new(
            offer.principal,
            offer.annual_rate_percent,
            offer.years,
            &format!("{prefix}.years"),
        )?;
        Ok(OfferSummary {
            monthly_payment: summary.monthly_payment,
            total_interest: summary.total_interest,
            total_cost: summary.total_paid + offer.fees,
        })
    };
    let a = summarize(&input.offer_a, "offer_a")?;
    let b = summarize(&input.offer_b, "offer_b")?;

    let difference = a.total_cost - b.total_cost;
    let cheaper = if difference.abs() < 0.005 {
        Cheaper::Tie
    } else if difference < 0.0 {
        Cheaper::OfferA
    } else {
        Cheaper::OfferB
    };

    Ok(LoanComparisonResult {
        offer_a: a,
        offer_b: b,
        cheaper,
        savings: difference.abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emi(principal: f64, rate: f64, years: f64) -> f64 {
        calculate_emi(&EmiInput {
            principal,
            annual_rate_percent: rate,
            years,
        })
        .unwrap()
        .monthly_payment
    }

    #[test]
    fn test_known_mortgage_payment() {
        // 100k at 6% over 30 years is the textbook 599.55
        assert!((emi(100_000.0, 6.0, 30.0) - 599.55).abs() < 0.01);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(annuity_payment(12_000.0, 0.0, 1.0), 1000.0);
    }

    #[test]
    fn test_emi_monotonic_in_rate() {
        let mut previous = 0.0;
        for rate in [0.5, 1.0, 3.0, 6.0, 12.0, 24.0] {
            let payment = emi(50_000.0, rate, 10.0);
            assert!(payment > previous, "rate {rate}");
            previous = payment;
        }
    }

    #[test]
    fn test_emi_monotonic_in_years() {
        let mut previous = f64::INFINITY;
        for years in [1.0, 2.0, 5.0, 10.0, 30.0] {
            let payment = emi(50_000.0, 7.0, years);
            assert!(payment < previous, "years {years}");
            previous = payment;
        }
    }

    #[test]
    fn test_emi_totals_and_schedule() {
        let result = calculate_emi(&EmiInput {
            principal: 10_000.0,
            annual_rate_percent: 12.0,
            years: 2.0,
        })
        .unwrap();

        assert!((result.total_paid - result.monthly_payment * 24.0).abs() < 1e-6);
        assert!((result.total_interest - (result.total_paid - 10_000.0)).abs() < 1e-6);
        assert_eq!(result.schedule.len(), 2);
        assert!(result.schedule[1].closing_balance.abs() < 1e-6);

        let principal_sum: f64 = result.schedule.iter().map(|y| y.principal_paid).sum();
        assert!((principal_sum - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_emi_rejects_non_positive() {
        let err = calculate_emi(&EmiInput {
            principal: 0.0,
            annual_rate_percent: 5.0,
            years: 5.0,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("principal"));
    }

    #[test]
    fn test_car_loan() {
        let input = CarLoanInput {
            vehicle_price: 30_000.0,
            down_payment: 5_000.0,
            trade_in_value: 2_000.0,
            sales_tax_percent: 5.0,
            annual_rate_percent: 0.0,
            years: 5.0,
        };
        let result = calculate_car_loan(&input).unwrap();
        assert_eq!(result.sales_tax, 1_500.0);
        assert_eq!(result.financed_amount, 24_500.0);
        assert!((result.monthly_payment - 24_500.0 / 60.0).abs() < 1e-9);
        assert!(result.total_interest.abs() < 1e-6);
    }

    #[test]
    fn test_car_loan_nothing_to_finance() {
        let input = CarLoanInput {
            vehicle_price: 10_000.0,
            down_payment: 10_000.0,
            trade_in_value: 500.0,
            sales_tax_percent: 0.0,
            annual_rate_percent: 4.0,
            years: 3.0,
        };
        assert!(calculate_car_loan(&input).is_err());
    }

    #[test]
    fn test_student_loan_grace_period_capitalizes() {
        let with_grace = calculate_student_loan(&StudentLoanInput {
            principal: 20_000.0,
            annual_rate_percent: 6.0,
            years: 10.0,
            grace_period_months: 6.0,
        })
        .unwrap();
        assert!((with_grace.capitalized_interest - 600.0).abs() < 1e-9);
        assert_eq!(with_grace.repayment_principal, 20_600.0);

        let without = calculate_student_loan(&StudentLoanInput {
            grace_period_months: 0.0,
            ..StudentLoanInput {
                principal: 20_000.0,
                annual_rate_percent: 6.0,
                years: 10.0,
                grace_period_months: 6.0,
            }
        })
        .unwrap();
        assert!(with_grace.monthly_payment > without.monthly_payment);
    }

    #[test]
    fn test_loan_comparison_accounts_for_fees() {
        let base = LoanOffer {
            principal: 200_000.0,
            annual_rate_percent: 5.0,
            years: 30.0,
            fees: 0.0,
        };
        // Lower rate but heavy fees
        let cheaper_rate = LoanOffer {
            annual_rate_percent: 4.9,
            fees: 50_000.0,
            ..base
        };

        let result = calculate_loan_comparison(&LoanComparisonInput {
            offer_a: base,
            offer_b: cheaper_rate,
        })
        .unwrap();

        assert!(result.offer_b.monthly_payment < result.offer_a.monthly_payment);
        assert_eq!(result.cheaper, Cheaper::OfferA);
        assert!(
            (result.savings - (result.offer_b.total_cost - result.offer_a.total_cost)).abs() < 1e-6
        );
    }

    #[test]
    fn test_loan_comparison_tie() {
        let offer = LoanOffer {
            principal: 1_000.0,
            annual_rate_percent: 3.0,
            years: 1.0,
            fees: 10.0,
        };
        let result = calculate_loan_comparison(&LoanComparisonInput {
            offer_a: offer,
            offer_b: offer,
        })
        .unwrap();
        assert_eq!(result.cheaper, Cheaper::Tie);
    }

    #[test]
    fn test_term_is_capped() {
        let err = calculate_emi(&EmiInput {
            principal: 1_000.0,
            annual_rate_percent: 24.0,
            years: 1e4,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("years"));
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let longest = calculate_emi(&EmiInput {
            principal: 1_000.0,
            annual_rate_percent: 24.0,
            years: MAX_TERM_YEARS,
        })
        .unwrap();
        assert!(longest.monthly_payment.is_finite());
        assert_eq!(longest.schedule.len(), 100);
    }

    #[test]
    fn test_overflowing_payment_is_an_error() {
        let err = calculate_emi(&EmiInput {
            principal: 1_000.0,
            annual_rate_percent: 1e6,
            years: 100.0,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("years"));

        let err = calculate_car_loan(&CarLoanInput {
            vehicle_price: 30_000.0,
            down_payment: 0.0,
            trade_in_value: 0.0,
            sales_tax_percent: 0.0,
            annual_rate_percent: 1e6,
            years: 100.0,
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let good = LoanOffer {
            principal: 1_000.0,
            annual_rate_percent: 3.0,
            years: 1.0,
            fees: 0.0,
        };
        let err = calculate_loan_comparison(&LoanComparisonInput {
            offer_a: LoanOffer { annual_rate_percent: 1e6, years: 100.0, ..good },
            offer_b: good,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("offer_a.years"));
    }

    #[test]
    fn test_comparison_error_names_offer() {
        let good = LoanOffer {
            principal: 1_000.0,
            annual_rate_percent: 3.0,
            years: 1.0,
            fees: 0.0,
        };
        let bad = LoanOffer { years: 0.0, ..good };
        let err = calculate_loan_comparison(&LoanComparisonInput {
            offer_a: good,
            offer_b: bad,
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("offer_b.years"));
    }
}
