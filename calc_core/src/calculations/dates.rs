//! # Calendar Calculators
//!
//! Age, ovulation, pregnancy and sleep-cycle timing.
//!
//! "Today" is always an explicit input so every result is reproducible;
//! front ends pass the local date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::SleepSettings;

/// `date` shifted by whole months, clamping the day to the month's length.
fn add_months(field: &str, date: NaiveDate, months: u32) -> CalcResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| CalcError::invalid_input(field, date.to_string(), "Date is out of range"))
}

fn add_days(field: &str, date: NaiveDate, days: i64) -> CalcResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| CalcError::invalid_input(field, date.to_string(), "Date is out of range"))
}

fn not_in_future(field: &str, date: NaiveDate, today: NaiveDate, what: &str) -> CalcResult<()> {
    if date > today {
        return Err(CalcError::invalid_input(
            field,
            date.to_string(),
            format!("{} cannot be in the future", what),
        ));
    }
    Ok(())
}

// ============================================================================
// Age
// ============================================================================

/// Age input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeInput {
    pub birth_date: NaiveDate,
    pub today: NaiveDate,
}

/// Age result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeResult {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
    pub total_weeks: i64,
    pub total_hours: i64,
    pub total_minutes: i64,
    pub next_birthday: NaiveDate,
    /// Zero when today is the birthday
    pub days_until_next_birthday: i64,
}

/// Exact age in years, months and days.
///
/// Months are counted to the last month anniversary on or before today;
/// an anniversary whose day does not exist in its month falls on that
/// month's last day (born Jan 31 → Feb 29 in a leap year). Remaining days
/// are counted from there, so no component is ever negative.
pub fn calculate_age(input: &AgeInput) -> CalcResult<AgeResult> {
    let AgeInput { birth_date, today } = *input;
    not_in_future("birth_date", birth_date, today, "Birth date")?;

    let month_span = (today.year() - birth_date.year()) * 12 + today.month() as i32 - birth_date.month() as i32;
    let mut whole_months = u32::try_from(month_span).unwrap_or(0);
    let mut anniversary = add_months("birth_date", birth_date, whole_months)?;
    if anniversary > today {
        whole_months = whole_months.saturating_sub(1);
        anniversary = add_months("birth_date", birth_date, whole_months)?;
    }
    let days = (today - anniversary).num_days();
    let years = whole_months / 12;

    let birthday_this_cycle = add_months("birth_date", birth_date, years * 12)?;
    let next_birthday = if birthday_this_cycle == today {
        today
    } else {
        add_months("birth_date", birth_date, (years + 1) * 12)?
    };

    let total_days = (today - birth_date).num_days();
    Ok(AgeResult {
        years,
        months: whole_months % 12,
        days: u32::try_from(days).unwrap_or(0),
        total_days,
        total_weeks: total_days / 7,
        total_hours: total_days * 24,
        total_minutes: total_days * 24 * 60,
        next_birthday,
        days_until_next_birthday: (next_birthday - today).num_days(),
    })
}

// ============================================================================
// Ovulation
// ============================================================================

/// Ovulation input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvulationInput {
    /// First day of the last menstrual period
    pub last_period: NaiveDate,
    /// Days, 21-45
    pub cycle_length: u32,
    /// Days, 10-16
    pub luteal_phase: u32,
    pub today: NaiveDate,
}

impl OvulationInput {
    pub const CYCLE_RANGE: (u32, u32) = (21, 45);
    pub const LUTEAL_RANGE: (u32, u32) = (10, 16);

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        let (lo, hi) = Self::CYCLE_RANGE;
        if !(lo..=hi).contains(&self.cycle_length) {
            return Err(CalcError::invalid_input(
                "cycle_length",
                self.cycle_length.to_string(),
                format!("Cycle length should be between {}-{} days", lo, hi),
            ));
        }
        let (lo, hi) = Self::LUTEAL_RANGE;
        if !(lo..=hi).contains(&self.luteal_phase) {
            return Err(CalcError::invalid_input(
                "luteal_phase",
                self.luteal_phase.to_string(),
                format!("Luteal phase should be between {}-{} days", lo, hi),
            ));
        }
        not_in_future("last_period", self.last_period, self.today, "Last period date")
    }
}

/// Ovulation result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvulationResult {
    pub ovulation_date: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    pub next_period: NaiveDate,
}

/// Estimate ovulation and the fertile window.
pub fn calculate_ovulation(input: &OvulationInput) -> CalcResult<OvulationResult> {
    input.validate()?;
    let ovulation_day = i64::from(input.cycle_length - input.luteal_phase);
    let ovulation_date = add_days("last_period", input.last_period, ovulation_day)?;

    Ok(OvulationResult {
        ovulation_date,
        fertile_window_start: add_days("last_period", ovulation_date, -5)?,
        fertile_window_end: add_days("last_period", ovulation_date, 1)?,
        next_period: add_days("last_period", input.last_period, i64::from(input.cycle_length))?,
    })
}

// ============================================================================
// Pregnancy
// ============================================================================

/// Naegele's rule: 40 weeks from the last menstrual period
pub const GESTATION_DAYS: i64 = 280;
/// Oldest accepted LMP
pub const MAX_GESTATION_DAYS: i64 = 42 * 7;

/// Pregnancy trimester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// Trimester for a completed-weeks gestational age
    pub fn from_weeks(weeks: i64) -> Self {
        if weeks < 14 {
            Trimester::First
        } else if weeks < 28 {
            Trimester::Second
        } else {
            Trimester::Third
        }
    }
}

/// Pregnancy input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PregnancyInput {
    /// First day of the last menstrual period
    pub last_period: NaiveDate,
    pub today: NaiveDate,
}

/// Pregnancy result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PregnancyResult {
    pub due_date: NaiveDate,
    /// Approximate conception date (LMP + 14 days)
    pub conception_date: NaiveDate,
    pub gestational_weeks: i64,
    pub gestational_days: i64,
    pub trimester: Trimester,
    /// Negative once the due date has passed
    pub days_remaining: i64,
}

/// Due date and gestational age from the last menstrual period.
pub fn calculate_pregnancy(input: &PregnancyInput) -> CalcResult<PregnancyResult> {
    not_in_future("last_period", input.last_period, input.today, "Last period date")?;
    let elapsed = (input.today - input.last_period).num_days();
    if elapsed > MAX_GESTATION_DAYS {
        return Err(CalcError::invalid_input(
            "last_period",
            input.last_period.to_string(),
            "Last period date cannot be more than 42 weeks ago",
        ));
    }

    let due_date = add_days("last_period", input.last_period, GESTATION_DAYS)?;
    let weeks = elapsed / 7;
    Ok(PregnancyResult {
        due_date,
        conception_date: add_days("last_period", input.last_period, 14)?,
        gestational_weeks: weeks,
        gestational_days: elapsed % 7,
        trimester: Trimester::from_weeks(weeks),
        days_remaining: (due_date - input.today).num_days(),
    })
}

// ============================================================================
// Sleep
// ============================================================================

/// Which end of the night is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepMode {
    /// Given a wake-up time, suggest bedtimes
    WakeUpAt,
    /// Given a bedtime, suggest wake-up times
    BedtimeAt,
}

impl FromStr for SleepMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "wake_up_at" | "wake" | "wake_up" => Ok(SleepMode::WakeUpAt),
            "bedtime_at" | "bed" | "bedtime" => Ok(SleepMode::BedtimeAt),
            _ => Err(CalcError::unknown_key("sleep mode", s)),
        }
    }
}

impl fmt::Display for SleepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepMode::WakeUpAt => write!(f, "wake_up_at"),
            SleepMode::BedtimeAt => write!(f, "bedtime_at"),
        }
    }
}

/// Sleep input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepInput {
    pub mode: SleepMode,
    pub time: NaiveTime,
}

/// One suggested time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepOption {
    pub cycles: u32,
    /// `HH:MM`, 24-hour clock
    pub time: String,
    /// Time actually asleep
    pub sleep_hours: f64,
}

/// Sleep result, longest sleep first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepResult {
    pub mode: SleepMode,
    pub options: Vec<SleepOption>,
}

/// Cycle counts offered, longest first
pub const SLEEP_CYCLE_OPTIONS: [u32; 4] = [6, 5, 4, 3];

/// Bedtimes or wake-up times aligned to whole sleep cycles.
pub fn calculate_sleep(input: &SleepInput, settings: &SleepSettings) -> CalcResult<SleepResult> {
    settings.validate()?;

    let latency = Duration::minutes(i64::from(settings.fall_asleep_minutes));
    let options = SLEEP_CYCLE_OPTIONS
        .iter()
        .map(|&cycles| {
            let asleep = Duration::minutes(i64::from(cycles) * i64::from(settings.cycle_minutes));
            // NaiveTime arithmetic wraps around midnight
            let time = match input.mode {
                SleepMode::WakeUpAt => input.time - asleep - latency,
                SleepMode::BedtimeAt => input.time + latency + asleep,
            };
            SleepOption {
                cycles,
                time: time.format("%H:%M").to_string(),
                sleep_hours: asleep.num_minutes() as f64 / 60.0,
            }
        })
        .collect();

    Ok(SleepResult {
        mode: input.mode,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn age(birth: &str, today: &str) -> AgeResult {
        calculate_age(&AgeInput {
            birth_date: date(birth),
            today: date(today),
        })
        .unwrap()
    }

    #[test]
    fn test_age_simple() {
        let result = age("1990-05-15", "2024-05-20");
        assert_eq!((result.years, result.months, result.days), (34, 0, 5));
        assert_eq!(result.next_birthday, date("2025-05-15"));
    }

    #[test]
    fn test_age_borrow_with_clamped_anniversary() {
        let result = age("2000-01-31", "2024-03-01");
        assert_eq!((result.years, result.months, result.days), (24, 1, 1));
    }

    #[test]
    fn test_age_borrow_days() {
        // Borrowing from a 30-day month
        let result = age("2000-03-25", "2024-05-10");
        assert_eq!((result.years, result.months, result.days), (24, 1, 15));
    }

    #[test]
    fn test_age_totals() {
        let result = age("2024-01-01", "2024-01-15");
        assert_eq!(result.total_days, 14);
        assert_eq!(result.total_weeks, 2);
        assert_eq!(result.total_hours, 336);
        assert_eq!(result.total_minutes, 20_160);
    }

    #[test]
    fn test_birthday_today() {
        let result = age("2000-06-01", "2024-06-01");
        assert_eq!((result.years, result.months, result.days), (24, 0, 0));
        assert_eq!(result.days_until_next_birthday, 0);
    }

    #[test]
    fn test_age_born_today() {
        let result = age("2024-06-01", "2024-06-01");
        assert_eq!(result.total_days, 0);
        assert_eq!(result.days_until_next_birthday, 0);
    }

    #[test]
    fn test_future_birth_date() {
        let err = calculate_age(&AgeInput {
            birth_date: date("2030-01-01"),
            today: date("2024-01-01"),
        })
        .unwrap_err();
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn test_ovulation() {
        let result = calculate_ovulation(&OvulationInput {
            last_period: date("2024-03-01"),
            cycle_length: 28,
            luteal_phase: 14,
            today: date("2024-03-05"),
        })
        .unwrap();
        assert_eq!(result.ovulation_date, date("2024-03-15"));
        assert_eq!(result.fertile_window_start, date("2024-03-10"));
        assert_eq!(result.fertile_window_end, date("2024-03-16"));
        assert_eq!(result.next_period, date("2024-03-29"));
    }

    #[test]
    fn test_ovulation_ranges() {
        let base = OvulationInput {
            last_period: date("2024-03-01"),
            cycle_length: 28,
            luteal_phase: 14,
            today: date("2024-03-05"),
        };
        let err = calculate_ovulation(&OvulationInput { cycle_length: 20, ..base }).unwrap_err();
        assert_eq!(err.field(), Some("cycle_length"));
        let err = calculate_ovulation(&OvulationInput { luteal_phase: 17, ..base }).unwrap_err();
        assert_eq!(err.field(), Some("luteal_phase"));
        let err = calculate_ovulation(&OvulationInput {
            last_period: date("2024-04-01"),
            ..base
        })
        .unwrap_err();
        assert_eq!(err.field(), Some("last_period"));
    }

    #[test]
    fn test_pregnancy() {
        let result = calculate_pregnancy(&PregnancyInput {
            last_period: date("2024-01-01"),
            today: date("2024-03-01"),
        })
        .unwrap();
        assert_eq!(result.due_date, date("2024-10-07"));
        // 60 days elapsed
        assert_eq!((result.gestational_weeks, result.gestational_days), (8, 4));
        assert_eq!(result.trimester, Trimester::First);
        assert_eq!(result.days_remaining, 220);
    }

    #[test]
    fn test_pregnancy_limits() {
        let err = calculate_pregnancy(&PregnancyInput {
            last_period: date("2023-01-01"),
            today: date("2024-03-01"),
        })
        .unwrap_err();
        assert!(err.to_string().contains("42 weeks"));

        assert!(calculate_pregnancy(&PregnancyInput {
            last_period: date("2024-03-02"),
            today: date("2024-03-01"),
        })
        .is_err());
    }

    #[test]
    fn test_trimesters() {
        assert_eq!(Trimester::from_weeks(13), Trimester::First);
        assert_eq!(Trimester::from_weeks(14), Trimester::Second);
        assert_eq!(Trimester::from_weeks(28), Trimester::Third);
    }

    #[test]
    fn test_bedtimes_wrap_midnight() {
        let result = calculate_sleep(
            &SleepInput {
                mode: SleepMode::WakeUpAt,
                time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            },
            &SleepSettings::default(),
        )
        .unwrap();
        let times: Vec<&str> = result.options.iter().map(|o| o.time.as_str()).collect();
        assert_eq!(times, vec!["21:45", "23:15", "00:45", "02:15"]);
        assert_eq!(result.options[0].sleep_hours, 9.0);
    }

    #[test]
    fn test_wake_times() {
        let result = calculate_sleep(
            &SleepInput {
                mode: SleepMode::BedtimeAt,
                time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            },
            &SleepSettings {
                fall_asleep_minutes: 0,
                cycle_minutes: 90,
            },
        )
        .unwrap();
        assert_eq!(result.options[0].time, "08:00");
        assert_eq!(result.options[3].time, "03:30");
    }

    #[test]
    fn test_sleep_rejects_oversized_cycles() {
        let input = SleepInput {
            mode: SleepMode::WakeUpAt,
            time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        };
        let err = calculate_sleep(
            &input,
            &SleepSettings {
                fall_asleep_minutes: 15,
                cycle_minutes: 800_000_000,
            },
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("sleep.cycle_minutes"));

        // A full-day cycle wraps back to the same clock time
        let result = calculate_sleep(
            &input,
            &SleepSettings {
                fall_asleep_minutes: 0,
                cycle_minutes: SleepSettings::MAX_MINUTES,
            },
        )
        .unwrap();
        assert_eq!(result.options[0].time, "07:00");
        assert_eq!(result.options[0].sleep_hours, 144.0);
    }
}
