//! # Fractions
//!
//! Exact rational arithmetic on `i64` numerators and denominators.
//! Results are reduced, carry their sign on the numerator and render as
//! mixed numbers (`1 1/2`). Overflow is reported, never wrapped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Greatest common divisor by Euclid's algorithm; `gcd(x, 0) = |x|`.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    // Only gcd(i64::MIN, 0) or gcd(i64::MIN, i64::MIN) exceed i64::MAX
    i64::try_from(a).unwrap_or(i64::MAX)
}

fn overflow(operation: &str) -> CalcError {
    CalcError::invalid_input("fraction", operation, "Arithmetic overflow")
}

/// A reduced fraction with a positive denominator.
///
/// Only [`Fraction::new`] builds one; deserializing goes through it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FractionParts")]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

#[derive(Deserialize)]
struct FractionParts {
    numerator: i64,
    denominator: i64,
}

impl TryFrom<FractionParts> for Fraction {
    type Error = CalcError;

    fn try_from(parts: FractionParts) -> Result<Self, Self::Error> {
        Fraction::new(parts.numerator, parts.denominator)
    }
}

impl Fraction {
    /// Signed numerator
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    /// Always positive
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Build and simplify `numerator / denominator`.
    pub fn new(numerator: i64, denominator: i64) -> CalcResult<Self> {
        if denominator == 0 {
            return Err(CalcError::invalid_input(
                "denominator",
                "0",
                "Denominator cannot be zero",
            ));
        }
        Self::simplify(numerator, denominator)
    }

    fn simplify(numerator: i64, denominator: i64) -> CalcResult<Self> {
        let divisor = gcd(numerator, denominator).max(1);
        let (mut n, mut d) = (numerator / divisor, denominator / divisor);
        if d < 0 {
            n = n.checked_neg().ok_or_else(|| overflow("negate"))?;
            d = d.checked_neg().ok_or_else(|| overflow("negate"))?;
        }
        Ok(Fraction {
            numerator: n,
            denominator: d,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// `5/6`, `2` for whole values, `1 1/2` / `-1 1/2` for improper ones.
    pub fn to_mixed_string(&self) -> String {
        let whole = self.numerator / self.denominator;
        let remainder = (self.numerator % self.denominator).abs();
        if remainder == 0 {
            whole.to_string()
        } else if whole == 0 {
            format!("{}/{}", self.numerator, self.denominator)
        } else {
            format!("{} {}/{}", whole, remainder, self.denominator)
        }
    }

    pub fn checked_add(self, other: Fraction) -> CalcResult<Fraction> {
        let lhs = self.numerator.checked_mul(other.denominator);
        let rhs = other.numerator.checked_mul(self.denominator);
        let numerator = lhs
            .zip(rhs)
            .and_then(|(l, r)| l.checked_add(r))
            .ok_or_else(|| overflow("add"))?;
        let denominator = self
            .denominator
            .checked_mul(other.denominator)
            .ok_or_else(|| overflow("add"))?;
        Self::simplify(numerator, denominator)
    }

    pub fn checked_sub(self, other: Fraction) -> CalcResult<Fraction> {
        let negated = other.numerator.checked_neg().ok_or_else(|| overflow("subtract"))?;
        self.checked_add(Fraction {
            numerator: negated,
            denominator: other.denominator,
        })
    }

    pub fn checked_mul(self, other: Fraction) -> CalcResult<Fraction> {
        let numerator = self
            .numerator
            .checked_mul(other.numerator)
            .ok_or_else(|| overflow("multiply"))?;
        let denominator = self
            .denominator
            .checked_mul(other.denominator)
            .ok_or_else(|| overflow("multiply"))?;
        Self::simplify(numerator, denominator)
    }

    pub fn checked_div(self, other: Fraction) -> CalcResult<Fraction> {
        if other.is_zero() {
            return Err(CalcError::invalid_input(
                "numerator2",
                "0",
                "Cannot divide by zero",
            ));
        }
        let numerator = self
            .numerator
            .checked_mul(other.denominator)
            .ok_or_else(|| overflow("divide"))?;
        let denominator = self
            .denominator
            .checked_mul(other.numerator)
            .ok_or_else(|| overflow("divide"))?;
        Self::simplify(numerator, denominator)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

// ============================================================================
// Calculator
// ============================================================================

/// Fraction operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl FractionOp {
    pub const ALL: &'static [FractionOp] = &[
        FractionOp::Add,
        FractionOp::Subtract,
        FractionOp::Multiply,
        FractionOp::Divide,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            FractionOp::Add => "+",
            FractionOp::Subtract => "-",
            FractionOp::Multiply => "×",
            FractionOp::Divide => "÷",
        }
    }
}

impl FromStr for FractionOp {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" | "+" | "plus" => Ok(FractionOp::Add),
            "subtract" | "sub" | "-" | "minus" => Ok(FractionOp::Subtract),
            "multiply" | "mul" | "*" | "x" | "×" | "times" => Ok(FractionOp::Multiply),
            "divide" | "div" | "/" | "÷" => Ok(FractionOp::Divide),
            _ => Err(CalcError::unknown_key("operation", s)),
        }
    }
}

impl fmt::Display for FractionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Fraction calculator input
///
/// ## JSON Example
///
/// ```json
/// { "numerator1": 1, "denominator1": 2, "operation": "add", "numerator2": 1, "denominator2": 3 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionInput {
    pub numerator1: i64,
    pub denominator1: i64,
    pub operation: FractionOp,
    pub numerator2: i64,
    pub denominator2: i64,
}

/// Fraction calculator result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionResult {
    pub expression: String,
    pub fraction: Fraction,
    /// `a/b` or a whole number
    pub simplified: String,
    pub mixed: String,
    pub decimal: f64,
}

/// Evaluate `a/b op c/d`.
pub fn calculate(input: &FractionInput) -> CalcResult<FractionResult> {
    if input.denominator1 == 0 || input.denominator2 == 0 {
        let field = if input.denominator1 == 0 { "denominator1" } else { "denominator2" };
        return Err(CalcError::invalid_input(field, "0", "Denominators cannot be zero"));
    }
    let lhs = Fraction::new(input.numerator1, input.denominator1)?;
    let rhs = Fraction::new(input.numerator2, input.denominator2)?;

    let fraction = match input.operation {
        FractionOp::Add => lhs.checked_add(rhs)?,
        FractionOp::Subtract => lhs.checked_sub(rhs)?,
        FractionOp::Multiply => lhs.checked_mul(rhs)?,
        FractionOp::Divide => lhs.checked_div(rhs)?,
    };

    Ok(FractionResult {
        expression: format!(
            "{}/{} {} {}/{}",
            input.numerator1, input.denominator1, input.operation, input.numerator2, input.denominator2
        ),
        fraction,
        simplified: fraction.to_string(),
        mixed: fraction.to_mixed_string(),
        decimal: fraction.to_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    fn run(n1: i64, d1: i64, op: FractionOp, n2: i64, d2: i64) -> CalcResult<FractionResult> {
        calculate(&FractionInput {
            numerator1: n1,
            denominator1: d1,
            operation: op,
            numerator2: n2,
            denominator2: d2,
        })
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(-12, 18), 6);
    }

    #[test]
    fn test_simplify_and_sign() {
        assert_eq!(frac(2, 4), Fraction { numerator: 1, denominator: 2 });
        assert_eq!(frac(3, -6), Fraction { numerator: -1, denominator: 2 });
        assert_eq!(frac(-3, -6), Fraction { numerator: 1, denominator: 2 });
        assert_eq!(frac(0, -5), Fraction { numerator: 0, denominator: 1 });
    }

    #[test]
    fn test_simplify_idempotent() {
        let once = frac(84, -36);
        let twice = Fraction::new(once.numerator(), once.denominator()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_deserialize_goes_through_new() {
        let half: Fraction = serde_json::from_str(r#"{ "numerator": 3, "denominator": -6 }"#).unwrap();
        assert_eq!((half.numerator(), half.denominator()), (-1, 2));
        assert_eq!(half.to_mixed_string(), "-1/2");

        let zero = serde_json::from_str::<Fraction>(r#"{ "numerator": 1, "denominator": 0 }"#);
        assert!(zero.is_err());
    }

    #[test]
    fn test_add() {
        let result = run(1, 2, FractionOp::Add, 1, 3).unwrap();
        assert_eq!(result.simplified, "5/6");
        assert_eq!(result.mixed, "5/6");
        assert_eq!(result.expression, "1/2 + 1/3");
    }

    #[test]
    fn test_whole_result() {
        let result = run(3, 2, FractionOp::Add, 1, 2).unwrap();
        assert_eq!(result.fraction, Fraction { numerator: 2, denominator: 1 });
        assert_eq!(result.simplified, "2");
        assert_eq!(result.mixed, "2");
    }

    #[test]
    fn test_mixed_rendering() {
        assert_eq!(frac(3, 2).to_mixed_string(), "1 1/2");
        assert_eq!(frac(-3, 2).to_mixed_string(), "-1 1/2");
        assert_eq!(frac(-1, 2).to_mixed_string(), "-1/2");
        assert_eq!(frac(0, 3).to_mixed_string(), "0");
    }

    #[test]
    fn test_subtract_multiply_divide() {
        assert_eq!(run(1, 2, FractionOp::Subtract, 3, 4).unwrap().simplified, "-1/4");
        assert_eq!(run(2, 3, FractionOp::Multiply, 3, 4).unwrap().simplified, "1/2");
        assert_eq!(run(1, 2, FractionOp::Divide, 1, 4).unwrap().simplified, "2");
    }

    #[test]
    fn test_zero_denominator_and_division_by_zero_differ() {
        let zero_denominator = run(1, 0, FractionOp::Add, 1, 2).unwrap_err();
        let divide_by_zero = run(1, 2, FractionOp::Divide, 0, 5).unwrap_err();
        assert_eq!(zero_denominator.error_code(), "INVALID_INPUT");
        assert_eq!(divide_by_zero.error_code(), "INVALID_INPUT");
        assert_eq!(zero_denominator.field(), Some("denominator1"));
        assert_eq!(divide_by_zero.field(), Some("numerator2"));
        assert_ne!(zero_denominator.to_string(), divide_by_zero.to_string());
    }

    #[test]
    fn test_overflow_reported() {
        let err = run(i64::MAX, 1, FractionOp::Multiply, 2, 1).unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("+".parse::<FractionOp>().unwrap(), FractionOp::Add);
        assert_eq!("Divide".parse::<FractionOp>().unwrap(), FractionOp::Divide);
        assert!("modulo".parse::<FractionOp>().is_err());
    }
}
