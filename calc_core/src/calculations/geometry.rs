//! # Geometry
//!
//! Area and perimeter of common plane shapes, circle properties and
//! triangle solving (base/height, three sides, two sides and the
//! included angle).
//!
//! All dimensions share one unknown length unit; areas are in that unit
//! squared.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Dimensions must be positive numbers",
        ));
    }
    Ok(())
}

// ============================================================================
// Shapes
// ============================================================================

/// Shape selector, used when parsing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Square,
    Circle,
    Triangle,
    Parallelogram,
    Trapezoid,
    Ellipse,
}

impl ShapeKind {
    pub const ALL: &'static [ShapeKind] = &[
        ShapeKind::Rectangle,
        ShapeKind::Square,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Parallelogram,
        ShapeKind::Trapezoid,
        ShapeKind::Ellipse,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Square => "square",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Parallelogram => "parallelogram",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::Ellipse => "ellipse",
        }
    }

    /// Names of the dimension fields this shape needs, in order
    pub fn dimensions(&self) -> &'static [&'static str] {
        match self {
            ShapeKind::Rectangle => &["length", "width"],
            ShapeKind::Square => &["side"],
            ShapeKind::Circle => &["radius"],
            ShapeKind::Triangle | ShapeKind::Parallelogram => &["base", "height"],
            ShapeKind::Trapezoid => &["base_a", "base_b", "height"],
            ShapeKind::Ellipse => &["semi_major", "semi_minor"],
        }
    }
}

impl FromStr for ShapeKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        ShapeKind::ALL
            .iter()
            .copied()
            .find(|k| k.key() == key || (key == "trapezium" && *k == ShapeKind::Trapezoid))
            .ok_or_else(|| CalcError::unknown_key("shape", s))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A shape with its dimensions.
///
/// ## JSON Example
///
/// ```json
/// { "shape": "trapezoid", "base_a": 4.0, "base_b": 6.0, "height": 3.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Rectangle { length: f64, width: f64 },
    Square { side: f64 },
    Circle { radius: f64 },
    /// Triangle from base and perpendicular height
    Triangle { base: f64, height: f64 },
    Parallelogram { base: f64, height: f64 },
    Trapezoid { base_a: f64, base_b: f64, height: f64 },
    Ellipse { semi_major: f64, semi_minor: f64 },
}

impl Shape {
    /// Build a shape from its kind and dimension values (in
    /// [`ShapeKind::dimensions`] order).
    pub fn from_dimensions(kind: ShapeKind, dims: &[f64]) -> CalcResult<Self> {
        let names = kind.dimensions();
        if dims.len() != names.len() {
            return Err(CalcError::invalid_input(
                "shape",
                kind.key(),
                format!("Expected {} dimensions, got {}", names.len(), dims.len()),
            ));
        }
        Ok(match kind {
            ShapeKind::Rectangle => Shape::Rectangle { length: dims[0], width: dims[1] },
            ShapeKind::Square => Shape::Square { side: dims[0] },
            ShapeKind::Circle => Shape::Circle { radius: dims[0] },
            ShapeKind::Triangle => Shape::Triangle { base: dims[0], height: dims[1] },
            ShapeKind::Parallelogram => Shape::Parallelogram { base: dims[0], height: dims[1] },
            ShapeKind::Trapezoid => Shape::Trapezoid {
                base_a: dims[0],
                base_b: dims[1],
                height: dims[2],
            },
            ShapeKind::Ellipse => Shape::Ellipse {
                semi_major: dims[0],
                semi_minor: dims[1],
            },
        })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Square { .. } => ShapeKind::Square,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Triangle { .. } => ShapeKind::Triangle,
            Shape::Parallelogram { .. } => ShapeKind::Parallelogram,
            Shape::Trapezoid { .. } => ShapeKind::Trapezoid,
            Shape::Ellipse { .. } => ShapeKind::Ellipse,
        }
    }

    fn dimension_values(&self) -> Vec<f64> {
        match *self {
            Shape::Rectangle { length, width } => vec![length, width],
            Shape::Square { side } => vec![side],
            Shape::Circle { radius } => vec![radius],
            Shape::Triangle { base, height } | Shape::Parallelogram { base, height } => vec![base, height],
            Shape::Trapezoid { base_a, base_b, height } => vec![base_a, base_b, height],
            Shape::Ellipse { semi_major, semi_minor } => vec![semi_major, semi_minor],
        }
    }

    /// Validate that every dimension is positive.
    pub fn validate(&self) -> CalcResult<()> {
        let names = self.kind().dimensions();
        for (name, value) in names.iter().zip(self.dimension_values()) {
            require_positive(name, value)?;
        }
        Ok(())
    }
}

/// Area/perimeter result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaResult {
    pub shape: ShapeKind,
    pub area: f64,
    /// `None` when the dimensions given do not determine it
    pub perimeter: Option<f64>,
}

/// Area and, where determinable, perimeter of a shape.
pub fn calculate_area(shape: &Shape) -> CalcResult<AreaResult> {
    shape.validate()?;
    let (area, perimeter) = match *shape {
        Shape::Rectangle { length, width } => (length * width, Some(2.0 * (length + width))),
        Shape::Square { side } => (side * side, Some(4.0 * side)),
        Shape::Circle { radius } => (PI * radius * radius, Some(2.0 * PI * radius)),
        Shape::Triangle { base, height } => (0.5 * base * height, None),
        Shape::Parallelogram { base, height } => (base * height, None),
        Shape::Trapezoid { base_a, base_b, height } => (0.5 * (base_a + base_b) * height, None),
        Shape::Ellipse { semi_major, semi_minor } => {
            // Ramanujan's second approximation
            let (a, b) = (semi_major, semi_minor);
            let h = ((a - b) / (a + b)).powi(2);
            let perimeter = PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()));
            (PI * a * b, Some(perimeter))
        }
    };
    Ok(AreaResult {
        shape: shape.kind(),
        area,
        perimeter,
    })
}

// ============================================================================
// Circle
// ============================================================================

/// Circle result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleResult {
    pub radius: f64,
    pub diameter: f64,
    pub circumference: f64,
    pub area: f64,
}

/// Circle properties from the radius.
pub fn calculate_circle(radius: f64) -> CalcResult<CircleResult> {
    require_positive("radius", radius)?;
    Ok(CircleResult {
        radius,
        diameter: 2.0 * radius,
        circumference: 2.0 * PI * radius,
        area: PI * radius * radius,
    })
}

// ============================================================================
// Triangle
// ============================================================================

/// Triangle solving mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleMode {
    BaseHeight,
    ThreeSides,
    SideAngleSide,
}

impl TriangleMode {
    pub const ALL: &'static [TriangleMode] = &[
        TriangleMode::BaseHeight,
        TriangleMode::ThreeSides,
        TriangleMode::SideAngleSide,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TriangleMode::BaseHeight => "base_height",
            TriangleMode::ThreeSides => "three_sides",
            TriangleMode::SideAngleSide => "side_angle_side",
        }
    }
}

impl FromStr for TriangleMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "base_height" | "bh" => Ok(TriangleMode::BaseHeight),
            "three_sides" | "sss" | "heron" => Ok(TriangleMode::ThreeSides),
            "side_angle_side" | "sas" => Ok(TriangleMode::SideAngleSide),
            _ => Err(CalcError::unknown_key("triangle mode", s)),
        }
    }
}

impl fmt::Display for TriangleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Triangle input, one variant per mode.
///
/// ## JSON Example
///
/// ```json
/// { "mode": "three_sides", "a": 3.0, "b": 4.0, "c": 5.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TriangleInput {
    BaseHeight { base: f64, height: f64 },
    ThreeSides { a: f64, b: f64, c: f64 },
    /// Two sides and the included angle in degrees
    SideAngleSide { a: f64, b: f64, angle_degrees: f64 },
}

/// Triangle result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleResult {
    pub mode: TriangleMode,
    pub area: f64,
    pub perimeter: Option<f64>,
    /// Side opposite the given angle (side-angle-side only)
    pub third_side: Option<f64>,
}

/// Solve a triangle.
pub fn calculate_triangle(input: &TriangleInput) -> CalcResult<TriangleResult> {
    match *input {
        TriangleInput::BaseHeight { base, height } => {
            require_positive("base", base)?;
            require_positive("height", height)?;
            Ok(TriangleResult {
                mode: TriangleMode::BaseHeight,
                area: 0.5 * base * height,
                perimeter: None,
                third_side: None,
            })
        }
        TriangleInput::ThreeSides { a, b, c } => {
            require_positive("a", a)?;
            require_positive("b", b)?;
            require_positive("c", c)?;
            if a + b <= c || a + c <= b || b + c <= a {
                return Err(CalcError::invalid_input(
                    "sides",
                    format!("{}, {}, {}", a, b, c),
                    "Sides violate the triangle inequality",
                ));
            }
            let s = (a + b + c) / 2.0;
            let area = (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt();
            Ok(TriangleResult {
                mode: TriangleMode::ThreeSides,
                area,
                perimeter: Some(a + b + c),
                third_side: None,
            })
        }
        TriangleInput::SideAngleSide { a, b, angle_degrees } => {
            require_positive("a", a)?;
            require_positive("b", b)?;
            if angle_degrees <= 0.0 || angle_degrees >= 180.0 {
                return Err(CalcError::invalid_input(
                    "angle_degrees",
                    angle_degrees.to_string(),
                    "Angle must be between 0 and 180 degrees",
                ));
            }
            let angle = angle_degrees.to_radians();
            let c = (a * a + b * b - 2.0 * a * b * angle.cos()).max(0.0).sqrt();
            Ok(TriangleResult {
                mode: TriangleMode::SideAngleSide,
                area: 0.5 * a * b * angle.sin(),
                perimeter: Some(a + b + c),
                third_side: Some(c),
            })
        }
    }
}
