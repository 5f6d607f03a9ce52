//! # Quadratic Equations
//!
//! Roots of `a x² + b x + c = 0`, real or complex.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::input::format_number;

/// Quadratic coefficients
///
/// ## JSON Example
///
/// ```json
/// { "a": 1.0, "b": -3.0, "c": 2.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticInput {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Roots, by sign of the discriminant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Roots {
    /// `D > 0`; `x1` uses `+√D`
    TwoReal { x1: f64, x2: f64 },
    /// `D == 0`
    OneReal { x: f64 },
    /// `D < 0`; the pair is `real ± imaginary·i`, `imaginary > 0`
    Complex { real: f64, imaginary: f64 },
}

impl Roots {
    /// Human-readable rendering, e.g. `x = 0 ± 1i`
    pub fn describe(&self) -> String {
        match *self {
            Roots::TwoReal { x1, x2 } => format!("x1 = {}, x2 = {}", format_number(x1), format_number(x2)),
            Roots::OneReal { x } => format!("x = {}", format_number(x)),
            Roots::Complex { real, imaginary } => {
                format!("x = {} ± {}i", format_number(real), format_number(imaginary))
            }
        }
    }
}

/// Quadratic result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticResult {
    pub discriminant: f64,
    pub roots: Roots,
    pub solution: String,
    /// Vertex of the parabola
    pub vertex_x: f64,
    pub vertex_y: f64,
}

/// Solve `a x² + b x + c = 0`.
///
/// A discriminant within rounding noise of zero (relative to `b²` and
/// `4ac`) is treated as a double root.
pub fn calculate(input: &QuadraticInput) -> CalcResult<QuadraticResult> {
    let QuadraticInput { a, b, c } = *input;
    if a == 0.0 {
        return Err(CalcError::invalid_input(
            "a",
            "0",
            "Coefficient 'a' cannot be zero for a quadratic equation",
        ));
    }

    let b_sq = b * b;
    let four_ac = 4.0 * a * c;
    let discriminant = b_sq - four_ac;
    if !discriminant.is_finite() {
        return Err(CalcError::invalid_input(
            "a",
            a.to_string(),
            "Coefficients are too large to solve in floating point",
        ));
    }
    let noise = f64::EPSILON * b_sq.max(four_ac.abs());
    let two_a = 2.0 * a;

    // `+ 0.0` turns a -0.0 into 0.0
    let roots = if discriminant.abs() <= noise {
        Roots::OneReal { x: -b / two_a + 0.0 }
    } else if discriminant > 0.0 {
        let sqrt_d = discriminant.sqrt();
        Roots::TwoReal {
            x1: (-b + sqrt_d) / two_a + 0.0,
            x2: (-b - sqrt_d) / two_a + 0.0,
        }
    } else {
        Roots::Complex {
            real: -b / two_a + 0.0,
            imaginary: (-discriminant).sqrt() / two_a.abs(),
        }
    };

    let vertex_x = -b / two_a + 0.0;
    let vertex_y = a * vertex_x * vertex_x + b * vertex_x + c;
    let finite = match roots {
        Roots::TwoReal { x1, x2 } => x1.is_finite() && x2.is_finite(),
        Roots::OneReal { x } => x.is_finite(),
        Roots::Complex { real, imaginary } => real.is_finite() && imaginary.is_finite(),
    };
    if !finite || !vertex_y.is_finite() {
        return Err(CalcError::invalid_input(
            "a",
            a.to_string(),
            "Roots fall outside the floating-point range",
        ));
    }

    Ok(QuadraticResult {
        discriminant,
        roots,
        solution: roots.describe(),
        vertex_x,
        vertex_y,
    })
}
