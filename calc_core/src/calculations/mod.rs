//! # Calculators
//!
//! Every calculator here is a leaf: it validates its own inputs, applies a
//! closed-form formula or a small lookup table, and returns. Each one
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate*(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! Calculators that depend on time-sensitive constants (exchange rates,
//! network difficulty, emission factors) take them as an explicit argument
//! from [`crate::settings::CalcSettings`].
//!
//! ## Available Calculations
//!
//! - [`loan`] - EMI, car loan, student loan, loan comparison
//! - [`growth`] - Compound interest, ROI, retirement projection
//! - [`business`] - Percentage, tip, salary, break-even
//! - [`currency`] - Currency conversion
//! - [`health`] - BMI, BMR, blood pressure
//! - [`geometry`] - Shape area/perimeter, circle, triangle
//! - [`quadratic`] - Quadratic roots
//! - [`dates`] - Age, ovulation, pregnancy, sleep cycles
//! - [`fraction`] - Fraction arithmetic
//! - [`subnet`] - IPv4 subnet math
//! - [`text`] - Word count, case conversion, passwords, hashes
//! - [`footprint`] - Carbon footprint
//! - [`mining`] - Bitcoin mining profitability
//! - [`motion`] - Speed, distance and time
//!
//! Unit conversions live in [`crate::units`].

pub mod business;
pub mod currency;
pub mod dates;
pub mod footprint;
pub mod fraction;
pub mod geometry;
pub mod growth;
pub mod health;
pub mod loan;
pub mod mining;
pub mod motion;
pub mod quadratic;
pub mod subnet;
pub mod text;

// Re-export commonly used types
pub use currency::{Currency, ExchangeRates};
pub use fraction::Fraction;
pub use geometry::{Shape, ShapeKind, TriangleInput};
pub use loan::{annuity_payment, EmiInput, EmiResult};
