//! # Unit Types
//!
//! Closed unit enums and the two-step conversion routine shared by every
//! multiplicative converter (length, weight, energy, storage, pressure,
//! speed). Temperature is additive and lives in [`temperature`].
//!
//! ## Design
//!
//! Each unit carries exactly one factor: how many canonical units one of it
//! is worth. Converting `A -> B` goes `value * factor(A)` into the canonical
//! unit and then `* (1 / factor(B))` back out. Because the outbound factor is
//! derived from the inbound one, `A -> B -> A` returns the original value to
//! floating-point tolerance for every pair.
//!
//! Unit selectors are enums, so a missing factor is a compile error. The only
//! place an unknown unit name can appear is [`std::str::FromStr`], which
//! returns [`CalcError::UnknownKey`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{convert, LengthUnit};
//!
//! let meters = convert(12.0, LengthUnit::Feet, LengthUnit::Meter).unwrap();
//! assert!((meters - 3.6576).abs() < 1e-12);
//! ```

pub mod temperature;

pub use temperature::{convert_temperature, TemperatureUnit};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A multiplicative unit with a single canonical factor.
pub trait LinearUnit: Copy + PartialEq + fmt::Debug + 'static {
    /// Quantity name used in error messages (e.g. "length")
    const QUANTITY: &'static str;

    /// Name of the canonical unit (e.g. "meter")
    const CANONICAL: &'static str;

    /// Whether negative magnitudes are physically meaningful
    const ALLOWS_NEGATIVE: bool;

    /// Every variant, in selector order
    fn all() -> &'static [Self];

    /// Canonical units per one of this unit
    fn to_canonical(self) -> f64;

    /// Units of this per one canonical unit
    fn from_canonical(self) -> f64 {
        1.0 / self.to_canonical()
    }

    /// Selector key (e.g. "kilometer")
    fn key(self) -> &'static str;

    /// Short symbol for display (e.g. "km")
    fn symbol(self) -> &'static str;
}

/// Convert `value` between two units of the same quantity.
///
/// Fails with `InvalidInput` for negative magnitudes of quantities with a
/// natural zero floor. `from == to` returns `value` unchanged.
pub fn convert<U: LinearUnit>(value: f64, from: U, to: U) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid_number("value", value.to_string()));
    }
    if value < 0.0 && !U::ALLOWS_NEGATIVE {
        return Err(CalcError::invalid_input(
            "value",
            value.to_string(),
            format!("{} cannot be negative", capitalize(U::QUANTITY)),
        ));
    }
    if from == to {
        return Ok(value);
    }
    let canonical = value * from.to_canonical();
    Ok(canonical * to.from_canonical())
}

/// Input for any linear unit conversion.
///
/// ## JSON Example
///
/// ```json
/// { "value": 5.0, "from": "mile", "to": "kilometer" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionInput<U> {
    /// Magnitude in the `from` unit
    pub value: f64,
    /// Source unit
    pub from: U,
    /// Target unit
    pub to: U,
}

/// Result of a linear unit conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Original magnitude
    pub value: f64,
    /// Source unit key
    pub from: String,
    /// Converted magnitude
    pub result: f64,
    /// Target unit key
    pub to: String,
    /// Magnitude expressed in the canonical unit
    pub canonical_value: f64,
    /// Canonical unit name
    pub canonical_unit: String,
}

/// Run a conversion and report it with its canonical intermediate.
pub fn calculate<U: LinearUnit>(input: &ConversionInput<U>) -> CalcResult<ConversionResult> {
    let result = convert(input.value, input.from, input.to)?;
    Ok(ConversionResult {
        value: input.value,
        from: input.from.key().to_string(),
        result,
        to: input.to.key().to_string(),
        canonical_value: input.value * input.from.to_canonical(),
        canonical_unit: U::CANONICAL.to_string(),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase().replace([' ', '-', '_'], "")
}

// ============================================================================
// Unit definitions (macro to keep factor tables in one place)
// ============================================================================

macro_rules! linear_unit {
    (
        $(#[$meta:meta])*
        $name:ident {
            quantity: $quantity:literal,
            canonical: $canonical:literal,
            allows_negative: $neg:literal,
            units: [
                $( $variant:ident => ($key:literal, $symbol:literal, $factor:expr, [$($alias:literal),*]) ),+ $(,)?
            ]
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// All variants in selector order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];
        }

        impl LinearUnit for $name {
            const QUANTITY: &'static str = $quantity;
            const CANONICAL: &'static str = $canonical;
            const ALLOWS_NEGATIVE: bool = $neg;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn to_canonical(self) -> f64 {
                match self {
                    $( $name::$variant => $factor, )+
                }
            }

            fn key(self) -> &'static str {
                match self {
                    $( $name::$variant => $key, )+
                }
            }

            fn symbol(self) -> &'static str {
                match self {
                    $( $name::$variant => $symbol, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = CalcError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_key(s);
                $(
                    if wanted == normalize_key($key)
                        || wanted == normalize_key($symbol)
                        $( || wanted == normalize_key($alias) )*
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(CalcError::unknown_key(concat!($quantity, " unit"), s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.key())
            }
        }
    };
}

linear_unit! {
    /// Length units, canonical meter
    LengthUnit {
        quantity: "length",
        canonical: "meter",
        allows_negative: false,
        units: [
            Meter => ("meter", "m", 1.0, ["meters", "metre"]),
            Kilometer => ("kilometer", "km", 1000.0, ["kilometers", "kilometre"]),
            Centimeter => ("centimeter", "cm", 0.01, ["centimeters"]),
            Millimeter => ("millimeter", "mm", 0.001, ["millimeters"]),
            Feet => ("feet", "ft", 0.3048, ["foot"]),
            Inch => ("inch", "in", 0.0254, ["inches"]),
            Yard => ("yard", "yd", 0.9144, ["yards"]),
            Mile => ("mile", "mi", 1609.344, ["miles"]),
            NauticalMile => ("nautical_mile", "nmi", 1852.0, ["nauticalmiles"]),
        ]
    }
}

linear_unit! {
    /// Mass units, canonical gram
    WeightUnit {
        quantity: "weight",
        canonical: "gram",
        allows_negative: false,
        units: [
            Kilogram => ("kilogram", "kg", 1000.0, ["kilograms"]),
            Gram => ("gram", "g", 1.0, ["grams"]),
            Milligram => ("milligram", "mg", 0.001, ["milligrams"]),
            Pound => ("pound", "lb", 453.592_37, ["pounds", "lbs"]),
            Ounce => ("ounce", "oz", 28.349_523_125, ["ounces"]),
            Stone => ("stone", "st", 6350.293_18, ["stones"]),
            MetricTon => ("metric_ton", "t", 1_000_000.0, ["tonne", "tonnes"]),
        ]
    }
}

linear_unit! {
    /// Energy units, canonical joule
    EnergyUnit {
        quantity: "energy",
        canonical: "joule",
        allows_negative: false,
        units: [
            Joule => ("joule", "J", 1.0, ["joules"]),
            Kilojoule => ("kilojoule", "kJ", 1000.0, ["kilojoules"]),
            Calorie => ("calorie", "cal", 4.184, ["calories"]),
            Kilocalorie => ("kilocalorie", "kcal", 4184.0, ["kilocalories"]),
            WattHour => ("watt_hour", "Wh", 3600.0, ["watthours"]),
            KilowattHour => ("kilowatt_hour", "kWh", 3_600_000.0, ["kilowatthours"]),
            Btu => ("btu", "BTU", 1055.055_852_62, []),
            Electronvolt => ("electronvolt", "eV", 1.602_176_634e-19, ["electronvolts"]),
        ]
    }
}

linear_unit! {
    /// Digital storage units (binary multiples), canonical byte
    StorageUnit {
        quantity: "storage",
        canonical: "byte",
        allows_negative: false,
        units: [
            Bit => ("bit", "bit", 0.125, ["bits"]),
            Byte => ("byte", "B", 1.0, ["bytes"]),
            Kilobyte => ("kilobyte", "KB", 1024.0, ["KiB", "kibibyte"]),
            Megabyte => ("megabyte", "MB", 1_048_576.0, ["MiB", "mebibyte"]),
            Gigabyte => ("gigabyte", "GB", 1_073_741_824.0, ["GiB", "gibibyte"]),
            Terabyte => ("terabyte", "TB", 1_099_511_627_776.0, ["TiB", "tebibyte"]),
            Petabyte => ("petabyte", "PB", 1_125_899_906_842_624.0, ["PiB", "pebibyte"]),
        ]
    }
}

linear_unit! {
    /// Pressure units, canonical pascal
    PressureUnit {
        quantity: "pressure",
        canonical: "pascal",
        allows_negative: false,
        units: [
            Pascal => ("pascal", "Pa", 1.0, ["pascals"]),
            Kilopascal => ("kilopascal", "kPa", 1000.0, ["kilopascals"]),
            Bar => ("bar", "bar", 100_000.0, []),
            Psi => ("psi", "psi", 6894.757_293_168, []),
            Atmosphere => ("atmosphere", "atm", 101_325.0, ["atmospheres"]),
            Mmhg => ("mmhg", "mmHg", 133.322_387_415, ["torr"]),
        ]
    }
}

linear_unit! {
    /// Speed units, canonical meters per second
    SpeedUnit {
        quantity: "speed",
        canonical: "meter_per_second",
        allows_negative: false,
        units: [
            MeterPerSecond => ("meter_per_second", "m/s", 1.0, ["mps"]),
            KilometerPerHour => ("kilometer_per_hour", "km/h", 1000.0 / 3600.0, ["kph", "kmh"]),
            MilePerHour => ("mile_per_hour", "mph", 1609.344 / 3600.0, []),
            Knot => ("knot", "kn", 1852.0 / 3600.0, ["knots"]),
            FootPerSecond => ("foot_per_second", "ft/s", 0.3048, ["fps"]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trips<U: LinearUnit>() {
        for &a in U::all() {
            for &b in U::all() {
                for &v in &[0.0, 1.0, 123.456, 9.75e6] {
                    let there = convert(v, a, b).unwrap();
                    let back = convert(there, b, a).unwrap();
                    let tolerance = 1e-9 * v.abs().max(1.0);
                    assert!(
                        (back - v).abs() <= tolerance,
                        "{:?} -> {:?} -> {:?}: {} became {}",
                        a, b, a, v, back
                    );
                }
            }
        }
    }

    #[test]
    fn test_round_trips() {
        assert_round_trips::<LengthUnit>();
        assert_round_trips::<WeightUnit>();
        assert_round_trips::<EnergyUnit>();
        assert_round_trips::<StorageUnit>();
        assert_round_trips::<PressureUnit>();
        assert_round_trips::<SpeedUnit>();
    }

    #[test]
    fn test_identity_is_exact() {
        for &unit in LengthUnit::ALL {
            assert_eq!(convert(0.1, unit, unit).unwrap(), 0.1);
        }
    }

    #[test]
    fn test_known_values() {
        let km = convert(1.0, LengthUnit::Mile, LengthUnit::Kilometer).unwrap();
        assert!((km - 1.609344).abs() < 1e-12);

        let lb = convert(1.0, WeightUnit::Kilogram, WeightUnit::Pound).unwrap();
        assert!((lb - 2.204_622_621_8).abs() < 1e-9);

        let kwh = convert(3_600_000.0, EnergyUnit::Joule, EnergyUnit::KilowattHour).unwrap();
        assert!((kwh - 1.0).abs() < 1e-12);

        let mb = convert(1.0, StorageUnit::Gigabyte, StorageUnit::Megabyte).unwrap();
        assert_eq!(mb, 1024.0);

        let kmh = convert(10.0, SpeedUnit::MeterPerSecond, SpeedUnit::KilometerPerHour).unwrap();
        assert!((kmh - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_rejected() {
        let err = convert(-1.0, LengthUnit::Meter, LengthUnit::Feet).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("Length cannot be negative"));
        assert!(convert(-1.0, PressureUnit::Bar, PressureUnit::Psi).is_err());
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("km".parse::<LengthUnit>().unwrap(), LengthUnit::Kilometer);
        assert_eq!("Feet".parse::<LengthUnit>().unwrap(), LengthUnit::Feet);
        assert_eq!("nautical mile".parse::<LengthUnit>().unwrap(), LengthUnit::NauticalMile);
        assert_eq!("GiB".parse::<StorageUnit>().unwrap(), StorageUnit::Gigabyte);
        assert_eq!("torr".parse::<PressureUnit>().unwrap(), PressureUnit::Mmhg);

        let err = "furlong".parse::<LengthUnit>().unwrap_err();
        assert_eq!(err, CalcError::unknown_key("length unit", "furlong"));
    }

    #[test]
    fn test_calculate_reports_canonical() {
        let result = calculate(&ConversionInput {
            value: 2.0,
            from: WeightUnit::Kilogram,
            to: WeightUnit::Gram,
        })
        .unwrap();
        assert_eq!(result.result, 2000.0);
        assert_eq!(result.canonical_value, 2000.0);
        assert_eq!(result.canonical_unit, "gram");
        assert_eq!(result.to, "gram");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&LengthUnit::NauticalMile).unwrap();
        assert_eq!(json, "\"nautical_mile\"");
        let roundtrip: LengthUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, LengthUnit::NauticalMile);
    }
}
