//! # calc_core - Calc Hub Calculation Engine
//!
//! `calc_core` is the computational heart of Calc Hub: unit converters and
//! closed-form calculators for finance, health, geometry, dates, networking
//! and text. All inputs and outputs are JSON-serializable, so the same
//! calculators serve a command line, a web form or an API.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Closed Vocabularies**: Units, currencies and modes are enums; only
//!   parsing a selector string can produce an unknown key
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::loan::{calculate_emi, EmiInput};
//!
//! let result = calculate_emi(&EmiInput {
//!     principal: 100_000.0,
//!     annual_rate_percent: 6.0,
//!     years: 30.0,
//! })
//! .unwrap();
//!
//! assert!((result.monthly_payment - 599.55).abs() < 0.01);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Formula evaluators (loans, health, geometry, dates, ...)
//! - [`units`] - Unit enums and conversions
//! - [`registry`] - String-keyed access to every calculator
//! - [`input`] - Raw requests, field coercion and labeled results
//! - [`settings`] - Time-sensitive constants with TOML overrides
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod input;
pub mod registry;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use input::{validate_input, CalculationRequest, CalculationResult};
pub use registry::{Calculator, Category};
pub use settings::CalcSettings;
