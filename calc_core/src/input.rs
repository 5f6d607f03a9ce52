//! # Requests and Results
//!
//! The string-keyed boundary between calculators and whatever front end
//! collects their inputs. A [`CalculationRequest`] is a flat map of field
//! name to raw text (exactly what a form or a `key=value` command line
//! produces); a [`CalculationResult`] is the labeled breakdown a calculator
//! hands back.
//!
//! All numeric coercion goes through [`validate_input`], so every calculator
//! rejects empty fields and non-numbers the same way.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::input::CalculationRequest;
//!
//! let request = CalculationRequest::new()
//!     .with("weight_kg", "70")
//!     .with("height_cm", "175");
//!
//! assert_eq!(request.number("weight_kg").unwrap(), 70.0);
//! assert!(request.number("age").is_err());
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{CalcError, CalcResult};

/// Coerce a raw field value into a finite number.
///
/// Leading and trailing whitespace is ignored. Empty input is a
/// [`CalcError::MissingField`]; anything that does not parse to a finite
/// `f64` (including `NaN` and `inf`) is a [`CalcError::InvalidNumber`].
pub fn validate_input(value: &str, field_name: &str) -> CalcResult<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CalcError::missing_field(field_name));
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(CalcError::invalid_number(field_name, trimmed)),
    }
}

// ============================================================================
// Request
// ============================================================================

/// Raw inputs for a single calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalculationRequest {
    fields: BTreeMap<String, String>,
}

impl CalculationRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Build a request from `key=value` assignments.
    ///
    /// ```rust
    /// use calc_core::input::CalculationRequest;
    ///
    /// let request = CalculationRequest::from_assignments(["value=12", "from=feet"]).unwrap();
    /// assert_eq!(request.raw("from"), Some("feet"));
    /// ```
    pub fn from_assignments<I, S>(assignments: I) -> CalcResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut request = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (key, value) = assignment.split_once('=').ok_or_else(|| {
                CalcError::invalid_input("assignment", assignment, "Expected key=value")
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CalcError::invalid_input("assignment", assignment, "Field name is empty"));
            }
            request.insert(key, value.trim());
        }
        Ok(request)
    }

    /// Field names present in this request
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Trimmed raw value; `None` when absent or blank
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Required numeric field
    pub fn number(&self, field: &str) -> CalcResult<f64> {
        validate_input(self.raw(field).unwrap_or(""), field)
    }

    /// Optional numeric field with a default
    pub fn number_or(&self, field: &str, default: f64) -> CalcResult<f64> {
        match self.raw(field) {
            Some(raw) => validate_input(raw, field),
            None => Ok(default),
        }
    }

    /// Optional numeric field
    pub fn optional_number(&self, field: &str) -> CalcResult<Option<f64>> {
        self.raw(field).map(|raw| validate_input(raw, field)).transpose()
    }

    /// Required whole-number field
    pub fn integer(&self, field: &str) -> CalcResult<i64> {
        parse_integer(self.raw(field).unwrap_or(""), field)
    }

    /// Optional whole-number field with a default
    pub fn integer_or(&self, field: &str, default: i64) -> CalcResult<i64> {
        match self.raw(field) {
            Some(raw) => parse_integer(raw, field),
            None => Ok(default),
        }
    }

    /// Optional non-negative count with a default
    pub fn count_or(&self, field: &str, default: u32) -> CalcResult<u32> {
        let value = self.integer_or(field, i64::from(default))?;
        u32::try_from(value)
            .map_err(|_| CalcError::invalid_input(field, value.to_string(), "Must be a non-negative whole number"))
    }

    /// Required text field (returned untrimmed so text tools see the exact input)
    pub fn text(&self, field: &str) -> CalcResult<&str> {
        match self.fields.get(field) {
            Some(v) if !v.trim().is_empty() => Ok(v.as_str()),
            _ => Err(CalcError::missing_field(field)),
        }
    }

    /// Optional text field, untrimmed; blank text is returned as-is
    pub fn text_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        self.fields.get(field).map(String::as_str).unwrap_or(default)
    }

    /// Required categorical selector parsed via `FromStr`
    pub fn select<T>(&self, field: &str) -> CalcResult<T>
    where
        T: FromStr<Err = CalcError>,
    {
        self.raw(field)
            .ok_or_else(|| CalcError::missing_field(field))?
            .parse()
    }

    /// Optional categorical selector with a default
    pub fn select_or<T>(&self, field: &str, default: T) -> CalcResult<T>
    where
        T: FromStr<Err = CalcError>,
    {
        match self.raw(field) {
            Some(raw) => raw.parse(),
            None => Ok(default),
        }
    }

    /// Boolean option (`true/false`, `yes/no`, `on/off`, `1/0`)
    pub fn flag(&self, field: &str, default: bool) -> CalcResult<bool> {
        match self.raw(field).map(str::to_ascii_lowercase).as_deref() {
            None => Ok(default),
            Some("true" | "yes" | "on" | "1") => Ok(true),
            Some("false" | "no" | "off" | "0") => Ok(false),
            Some(other) => Err(CalcError::invalid_input(field, other, "Expected true or false")),
        }
    }

    /// Required ISO date (`YYYY-MM-DD`)
    pub fn date(&self, field: &str) -> CalcResult<NaiveDate> {
        let raw = self.raw(field).ok_or_else(|| CalcError::missing_field(field))?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| CalcError::invalid_input(field, raw, "Expected a date as YYYY-MM-DD"))
    }

    /// Required clock time (`HH:MM`)
    pub fn time(&self, field: &str) -> CalcResult<NaiveTime> {
        let raw = self.raw(field).ok_or_else(|| CalcError::missing_field(field))?;
        NaiveTime::parse_from_str(raw, "%H:%M")
            .map_err(|_| CalcError::invalid_input(field, raw, "Expected a time as HH:MM"))
    }
}

/// Largest magnitude an `f64` holds without skipping integers (2^53)
const MAX_EXACT_FLOAT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Exact integer parse; decimal forms such as `3.0` are accepted only while
/// the float still represents them exactly.
fn parse_integer(raw: &str, field: &str) -> CalcResult<i64> {
    if let Ok(exact) = raw.trim().parse::<i64>() {
        return Ok(exact);
    }
    let value = validate_input(raw, field)?;
    if value.fract() != 0.0 {
        return Err(CalcError::invalid_input(field, raw.trim(), "Must be a whole number"));
    }
    if value.abs() > MAX_EXACT_FLOAT_INTEGER {
        return Err(CalcError::invalid_input(field, raw.trim(), "Whole number is too large"));
    }
    Ok(value as i64)
}

// ============================================================================
// Result
// ============================================================================

/// Labeled outputs of one calculation.
///
/// Values keep the declaration order of the typed result they were built
/// from. Nested results (e.g. a loan comparison's two offers) stay nested;
/// [`CalculationResult::lines`] flattens them with dotted labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Calculator id that produced this result
    pub calculator: String,
    /// Output label to value
    pub values: Map<String, Value>,
}

impl CalculationResult {
    /// Build from any serializable typed result.
    pub fn from_typed<T: Serialize>(calculator: impl Into<String>, typed: &T) -> CalcResult<Self> {
        let values = match serde_json::to_value(typed)? {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };
        Ok(CalculationResult {
            calculator: calculator.into(),
            values,
        })
    }

    /// Look up a top-level output
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.values.get(label)
    }

    /// Top-level numeric output
    pub fn number(&self, label: &str) -> Option<f64> {
        self.values.get(label).and_then(Value::as_f64)
    }

    /// Top-level textual output
    pub fn text(&self, label: &str) -> Option<&str> {
        self.values.get(label).and_then(Value::as_str)
    }

    /// Flattened `(label, rendered value)` pairs for plain-text display.
    /// Null outputs (e.g. an undefined perimeter) are rendered as "n/a".
    pub fn lines(&self) -> Vec<(String, String)> {
        let mut lines = Vec::new();
        for (label, value) in &self.values {
            flatten(label, value, &mut lines);
        }
        lines
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                flatten(&format!("{prefix}.{key}"), inner, out);
            }
        }
        Value::Array(items) if items.iter().any(|v| v.is_object() || v.is_array()) => {
            for (i, inner) in items.iter().enumerate() {
                flatten(&format!("{prefix}[{i}]"), inner, out);
            }
        }
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(render_scalar).collect();
            out.push((prefix.to_string(), joined.join(", ")));
        }
        scalar => out.push((prefix.to_string(), render_scalar(scalar))),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => "n/a".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Render a float with at most six decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input() {
        assert_eq!(validate_input(" 42.5 ", "Weight").unwrap(), 42.5);
        assert_eq!(validate_input("-3", "Temperature").unwrap(), -3.0);
        assert_eq!(
            validate_input("", "Weight").unwrap_err(),
            CalcError::missing_field("Weight")
        );
        assert_eq!(validate_input("abc", "Weight").unwrap_err().error_code(), "INVALID_NUMBER");
        assert_eq!(validate_input("NaN", "Weight").unwrap_err().error_code(), "INVALID_NUMBER");
        assert_eq!(validate_input("inf", "Weight").unwrap_err().error_code(), "INVALID_NUMBER");
    }

    #[test]
    fn test_request_accessors() {
        let request = CalculationRequest::new()
            .with("count", "3")
            .with("ratio", "0.5")
            .with("blank", "   ")
            .with("on", "yes");

        assert_eq!(request.integer("count").unwrap(), 3);
        assert!(request.integer("ratio").is_err());
        assert_eq!(request.number_or("blank", 7.0).unwrap(), 7.0);
        assert_eq!(request.optional_number("missing").unwrap(), None);
        assert!(request.flag("on", false).unwrap());
        assert!(!request.flag("off", false).unwrap());
        assert_eq!(request.text("blank").unwrap_err().error_code(), "MISSING_FIELD");
        assert_eq!(request.count_or("count", 1).unwrap(), 3);
        assert_eq!(request.count_or("missing", 1).unwrap(), 1);
        assert!(CalculationRequest::new().with("n", "-2").count_or("n", 1).is_err());
    }

    #[test]
    fn test_integer_parsing_is_exact() {
        let request = CalculationRequest::new()
            .with("big", "9007199254740993")
            .with("max", "9223372036854775807")
            .with("decimal", "3.0")
            .with("overflow", "9223372036854775808")
            .with("huge_decimal", "1e19")
            .with("empty", "");

        assert_eq!(request.integer("big").unwrap(), 9_007_199_254_740_993);
        assert_eq!(request.integer("max").unwrap(), i64::MAX);
        assert_eq!(request.integer("decimal").unwrap(), 3);
        assert_eq!(request.integer("overflow").unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(request.integer("huge_decimal").unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(request.integer("empty").unwrap_err(), CalcError::missing_field("empty"));
        assert_eq!(request.integer_or("missing", 5).unwrap(), 5);
    }

    #[test]
    fn test_from_assignments() {
        let request = CalculationRequest::from_assignments(["a=1", " b = two words "]).unwrap();
        assert_eq!(request.raw("a"), Some("1"));
        assert_eq!(request.raw("b"), Some("two words"));
        assert!(CalculationRequest::from_assignments(["novalue"]).is_err());
        assert!(CalculationRequest::from_assignments(["=3"]).is_err());
    }

    #[test]
    fn test_dates() {
        let request = CalculationRequest::new()
            .with("dob", "2000-01-31")
            .with("bad", "31/01/2000")
            .with("wake", "07:30");
        assert_eq!(
            request.date("dob").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 31).unwrap()
        );
        assert!(request.date("bad").is_err());
        assert_eq!(request.time("wake").unwrap(), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.23456789), "1.234568");
        assert_eq!(format_number(-0.0000001), "0");
    }

    #[test]
    fn test_result_lines_flatten_nested() {
        #[derive(Serialize)]
        struct Inner {
            value: f64,
        }
        #[derive(Serialize)]
        struct Outer {
            name: String,
            inner: Inner,
            missing: Option<f64>,
        }

        let result = CalculationResult::from_typed(
            "demo",
            &Outer {
                name: "x".to_string(),
                inner: Inner { value: 1.5 },
                missing: None,
            },
        )
        .unwrap();

        let lines = result.lines();
        assert_eq!(lines[0], ("name".to_string(), "x".to_string()));
        assert_eq!(lines[1], ("inner.value".to_string(), "1.5".to_string()));
        assert_eq!(lines[2], ("missing".to_string(), "n/a".to_string()));
    }
}
