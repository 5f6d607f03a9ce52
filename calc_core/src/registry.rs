//! # Calculator Registry
//!
//! String-keyed access to every calculator, for front ends that only have
//! a calculator id and a bag of text fields (a form, a command line).
//! Each [`Calculator`] knows its id, display name, category and field
//! names, parses a [`CalculationRequest`] into its typed input and returns
//! the typed result as a [`CalculationResult`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::input::CalculationRequest;
//! use calc_core::registry::Calculator;
//! use calc_core::settings::CalcSettings;
//! use chrono::NaiveDate;
//!
//! let request = CalculationRequest::new()
//!     .with("principal", "100000")
//!     .with("annual_rate_percent", "6")
//!     .with("years", "30");
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//! let result = Calculator::Emi
//!     .evaluate(&request, &CalcSettings::default(), today)
//!     .unwrap();
//! assert!((result.number("monthly_payment").unwrap() - 599.55).abs() < 0.01);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::{
    business, currency, dates, footprint, fraction, geometry, growth, health, loan, mining, motion, quadratic, subnet,
    text,
};
use crate::errors::{CalcError, CalcResult};
use crate::input::{CalculationRequest, CalculationResult};
use crate::settings::CalcSettings;
use crate::units::{self, temperature, ConversionInput, LinearUnit};

// ============================================================================
// Categories
// ============================================================================

/// Calculator grouping used for browsing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Converters,
    Finance,
    Health,
    Math,
    DateTime,
    Text,
    Technology,
    Environment,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Converters,
        Category::Finance,
        Category::Health,
        Category::Math,
        Category::DateTime,
        Category::Text,
        Category::Technology,
        Category::Environment,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Converters => "converters",
            Category::Finance => "finance",
            Category::Health => "health",
            Category::Math => "math",
            Category::DateTime => "date_time",
            Category::Text => "text",
            Category::Technology => "technology",
            Category::Environment => "environment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Converters => "Converters",
            Category::Finance => "Finance",
            Category::Health => "Health",
            Category::Math => "Math",
            Category::DateTime => "Date & Time",
            Category::Text => "Text",
            Category::Technology => "Technology",
            Category::Environment => "Environment",
        }
    }
}

impl FromStr for Category {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let wanted = lowered.replace(['-', ' '], "_");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == wanted || c.display_name().to_lowercase() == lowered)
            .ok_or_else(|| CalcError::unknown_key("category", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Calculators
// ============================================================================

/// Every calculator the library provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Calculator {
    // Converters
    Length,
    Weight,
    Temperature,
    Energy,
    Storage,
    Pressure,
    Speed,
    Currency,
    // Finance
    Emi,
    CarLoan,
    StudentLoan,
    LoanComparison,
    CompoundInterest,
    Roi,
    Retirement,
    Percentage,
    Tip,
    Salary,
    BreakEven,
    // Health
    Bmi,
    Bmr,
    BloodPressure,
    Ovulation,
    Pregnancy,
    // Math
    Area,
    Circle,
    Triangle,
    Quadratic,
    Fraction,
    Motion,
    // Date & time
    Age,
    Sleep,
    // Text
    WordCounter,
    TextCase,
    // Technology
    Subnet,
    Password,
    Hash,
    BitcoinMining,
    // Environment
    CarbonFootprint,
}

impl Calculator {
    pub const ALL: &'static [Calculator] = &[
        Calculator::Length,
        Calculator::Weight,
        Calculator::Temperature,
        Calculator::Energy,
        Calculator::Storage,
        Calculator::Pressure,
        Calculator::Speed,
        Calculator::Currency,
        Calculator::Emi,
        Calculator::CarLoan,
        Calculator::StudentLoan,
        Calculator::LoanComparison,
        Calculator::CompoundInterest,
        Calculator::Roi,
        Calculator::Retirement,
        Calculator::Percentage,
        Calculator::Tip,
        Calculator::Salary,
        Calculator::BreakEven,
        Calculator::Bmi,
        Calculator::Bmr,
        Calculator::BloodPressure,
        Calculator::Ovulation,
        Calculator::Pregnancy,
        Calculator::Area,
        Calculator::Circle,
        Calculator::Triangle,
        Calculator::Quadratic,
        Calculator::Fraction,
        Calculator::Motion,
        Calculator::Age,
        Calculator::Sleep,
        Calculator::WordCounter,
        Calculator::TextCase,
        Calculator::Subnet,
        Calculator::Password,
        Calculator::Hash,
        Calculator::BitcoinMining,
        Calculator::CarbonFootprint,
    ];

    /// Stable identifier used on the command line and in results
    pub fn id(&self) -> &'static str {
        match self {
            Calculator::Length => "length",
            Calculator::Weight => "weight",
            Calculator::Temperature => "temperature",
            Calculator::Energy => "energy",
            Calculator::Storage => "storage",
            Calculator::Pressure => "pressure",
            Calculator::Speed => "speed",
            Calculator::Currency => "currency",
            Calculator::Emi => "emi",
            Calculator::CarLoan => "car_loan",
            Calculator::StudentLoan => "student_loan",
            Calculator::LoanComparison => "loan_comparison",
            Calculator::CompoundInterest => "compound_interest",
            Calculator::Roi => "roi",
            Calculator::Retirement => "retirement",
            Calculator::Percentage => "percentage",
            Calculator::Tip => "tip",
            Calculator::Salary => "salary",
            Calculator::BreakEven => "break_even",
            Calculator::Bmi => "bmi",
            Calculator::Bmr => "bmr",
            Calculator::BloodPressure => "blood_pressure",
            Calculator::Ovulation => "ovulation",
            Calculator::Pregnancy => "pregnancy",
            Calculator::Area => "area",
            Calculator::Circle => "circle",
            Calculator::Triangle => "triangle",
            Calculator::Quadratic => "quadratic",
            Calculator::Fraction => "fraction",
            Calculator::Motion => "motion",
            Calculator::Age => "age",
            Calculator::Sleep => "sleep",
            Calculator::WordCounter => "word_counter",
            Calculator::TextCase => "text_case",
            Calculator::Subnet => "subnet",
            Calculator::Password => "password",
            Calculator::Hash => "hash",
            Calculator::BitcoinMining => "bitcoin_mining",
            Calculator::CarbonFootprint => "carbon_footprint",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Calculator::Length => "Length Converter",
            Calculator::Weight => "Weight Converter",
            Calculator::Temperature => "Temperature Converter",
            Calculator::Energy => "Energy Converter",
            Calculator::Storage => "Data Storage Converter",
            Calculator::Pressure => "Pressure Converter",
            Calculator::Speed => "Speed Converter",
            Calculator::Currency => "Currency Converter",
            Calculator::Emi => "Loan EMI Calculator",
            Calculator::CarLoan => "Car Loan Calculator",
            Calculator::StudentLoan => "Student Loan Calculator",
            Calculator::LoanComparison => "Loan Comparison",
            Calculator::CompoundInterest => "Compound Interest Calculator",
            Calculator::Roi => "ROI Calculator",
            Calculator::Retirement => "Retirement Planner",
            Calculator::Percentage => "Percentage Calculator",
            Calculator::Tip => "Tip Calculator",
            Calculator::Salary => "Salary Converter",
            Calculator::BreakEven => "Break-Even Calculator",
            Calculator::Bmi => "BMI Calculator",
            Calculator::Bmr => "BMR Calculator",
            Calculator::BloodPressure => "Blood Pressure Checker",
            Calculator::Ovulation => "Ovulation Calculator",
            Calculator::Pregnancy => "Pregnancy Due Date Calculator",
            Calculator::Area => "Area Calculator",
            Calculator::Circle => "Circle Calculator",
            Calculator::Triangle => "Triangle Calculator",
            Calculator::Quadratic => "Quadratic Equation Solver",
            Calculator::Fraction => "Fraction Calculator",
            Calculator::Motion => "Speed Distance Time Calculator",
            Calculator::Age => "Age Calculator",
            Calculator::Sleep => "Sleep Cycle Calculator",
            Calculator::WordCounter => "Word Counter",
            Calculator::TextCase => "Text Case Converter",
            Calculator::Subnet => "IP Subnet Calculator",
            Calculator::Password => "Password Generator",
            Calculator::Hash => "Hash Generator",
            Calculator::BitcoinMining => "Bitcoin Mining Calculator",
            Calculator::CarbonFootprint => "Carbon Footprint Calculator",
        }
    }

    pub fn category(&self) -> Category {
        use Calculator::*;
        match self {
            Length | Weight | Temperature | Energy | Storage | Pressure | Speed | Currency => Category::Converters,
            Emi | CarLoan | StudentLoan | LoanComparison | CompoundInterest | Roi | Retirement | Percentage | Tip
            | Salary | BreakEven => Category::Finance,
            Bmi | Bmr | BloodPressure | Ovulation | Pregnancy => Category::Health,
            Area | Circle | Triangle | Quadratic | Fraction | Motion => Category::Math,
            Age | Sleep => Category::DateTime,
            WordCounter | TextCase => Category::Text,
            Subnet | Password | Hash | BitcoinMining => Category::Technology,
            CarbonFootprint => Category::Environment,
        }
    }

    /// Request fields this calculator reads. Optional fields are marked `?`.
    pub fn fields(&self) -> &'static [&'static str] {
        use Calculator::*;
        match self {
            Length | Weight | Temperature | Energy | Storage | Pressure | Speed => &["value", "from", "to"],
            Currency => &["amount", "from", "to"],
            Emi => &["principal", "annual_rate_percent", "years"],
            CarLoan => &[
                "vehicle_price",
                "down_payment?",
                "trade_in_value?",
                "sales_tax_percent?",
                "annual_rate_percent",
                "years",
            ],
            StudentLoan => &["principal", "annual_rate_percent", "years", "grace_period_months?"],
            LoanComparison => &[
                "offer_a.principal",
                "offer_a.annual_rate_percent",
                "offer_a.years",
                "offer_a.fees?",
                "offer_b.principal",
                "offer_b.annual_rate_percent",
                "offer_b.years",
                "offer_b.fees?",
            ],
            CompoundInterest => &["principal", "annual_rate_percent", "years", "compounds_per_year?"],
            Roi => &["initial_investment", "final_value", "years"],
            Retirement => &[
                "current_age",
                "retirement_age",
                "current_savings",
                "monthly_contribution",
                "annual_return_percent",
            ],
            Percentage => &["number", "percentage"],
            Tip => &["bill_amount", "tip_percent", "people?"],
            Salary => &["amount", "period", "hours_per_week?", "weeks_per_year?"],
            BreakEven => &["fixed_costs", "variable_cost_per_unit", "price_per_unit", "target_profit?"],
            Bmi => &["weight_kg", "height_cm"],
            Bmr => &["weight_kg", "height_cm", "age_years", "sex"],
            BloodPressure => &["systolic", "diastolic"],
            Ovulation => &["last_period", "cycle_length?", "luteal_phase?"],
            Pregnancy => &["last_period"],
            Area => &[
                "shape",
                "length?",
                "width?",
                "side?",
                "radius?",
                "base?",
                "height?",
                "base_a?",
                "base_b?",
                "semi_major?",
                "semi_minor?",
            ],
            Circle => &["radius"],
            Triangle => &["mode", "base?", "height?", "a?", "b?", "c?", "angle_degrees?"],
            Quadratic => &["a", "b", "c"],
            Fraction => &["numerator1", "denominator1", "operation", "numerator2", "denominator2"],
            Motion => &["speed_kmh?", "distance_km?", "time_hours?"],
            Age => &["birth_date"],
            Sleep => &["mode?", "time"],
            WordCounter => &["text?"],
            TextCase => &["text", "case"],
            Subnet => &["ip_address", "mask"],
            Password => &["length?", "uppercase?", "lowercase?", "numbers?", "symbols?"],
            Hash => &["text?", "algorithm?"],
            BitcoinMining => &[
                "hashrate_ths",
                "power_watts",
                "electricity_cost_per_kwh",
                "btc_price",
                "pool_fee_percent?",
            ],
            CarbonFootprint => &[
                "car_km_per_year?",
                "flights_per_year?",
                "hours_per_flight?",
                "electricity_kwh_per_month?",
                "diet?",
            ],
        }
    }

    /// Case-insensitive match on id, name or category. A blank term matches
    /// everything.
    pub fn search(term: &str) -> Vec<Calculator> {
        let needle = term.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .filter(|c| {
                needle.is_empty()
                    || c.id().contains(&needle)
                    || c.id().replace('_', " ").contains(&needle)
                    || c.name().to_lowercase().contains(&needle)
                    || c.category().display_name().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Calculators in one category, in listing order
    pub fn by_category(category: Category) -> Vec<Calculator> {
        Self::ALL.iter().copied().filter(|c| c.category() == category).collect()
    }

    /// Parse the request, run the calculator and label its result.
    ///
    /// `today` anchors the date-based calculators (age, ovulation,
    /// pregnancy); the others ignore it.
    pub fn evaluate(
        &self,
        request: &CalculationRequest,
        settings: &CalcSettings,
        today: NaiveDate,
    ) -> CalcResult<CalculationResult> {
        debug!(calculator = self.id(), "evaluating");
        let result = self.dispatch(request, settings, today);
        if let Err(e) = &result {
            debug!(calculator = self.id(), code = e.error_code(), error = %e, "calculation rejected");
        }
        result
    }

    fn dispatch(&self, req: &CalculationRequest, settings: &CalcSettings, today: NaiveDate) -> CalcResult<CalculationResult> {
        let id = self.id();
        match self {
            // ----------------------------------------------------------------
            // Converters
            // ----------------------------------------------------------------
            Calculator::Length => linear::<units::LengthUnit>(id, req),
            Calculator::Weight => linear::<units::WeightUnit>(id, req),
            Calculator::Energy => linear::<units::EnergyUnit>(id, req),
            Calculator::Storage => linear::<units::StorageUnit>(id, req),
            Calculator::Pressure => linear::<units::PressureUnit>(id, req),
            Calculator::Speed => linear::<units::SpeedUnit>(id, req),
            Calculator::Temperature => {
                let input = temperature::TemperatureInput {
                    value: req.number("value")?,
                    from: req.select("from")?,
                    to: req.select("to")?,
                };
                CalculationResult::from_typed(id, &temperature::calculate(&input)?)
            }
            Calculator::Currency => {
                let input = currency::CurrencyInput {
                    amount: req.number("amount")?,
                    from: req.select("from")?,
                    to: req.select("to")?,
                };
                CalculationResult::from_typed(id, &currency::calculate(&input, &settings.exchange_rates)?)
            }

            // ----------------------------------------------------------------
            // Finance
            // ----------------------------------------------------------------
            Calculator::Emi => {
                let input = loan::EmiInput {
                    principal: req.number("principal")?,
                    annual_rate_percent: req.number("annual_rate_percent")?,
                    years: req.number("years")?,
                };
                CalculationResult::from_typed(id, &loan::calculate_emi(&input)?)
            }
            Calculator::CarLoan => {
                let input = loan::CarLoanInput {
                    vehicle_price: req.number("vehicle_price")?,
                    down_payment: req.number_or("down_payment", 0.0)?,
                    trade_in_value: req.number_or("trade_in_value", 0.0)?,
                    sales_tax_percent: req.number_or("sales_tax_percent", 0.0)?,
                    annual_rate_percent: req.number("annual_rate_percent")?,
                    years: req.number("years")?,
                };
                CalculationResult::from_typed(id, &loan::calculate_car_loan(&input)?)
            }
            Calculator::StudentLoan => {
                let input = loan::StudentLoanInput {
                    principal: req.number("principal")?,
                    annual_rate_percent: req.number("annual_rate_percent")?,
                    years: req.number("years")?,
                    grace_period_months: req.number_or("grace_period_months", 0.0)?,
                };
                CalculationResult::from_typed(id, &loan::calculate_student_loan(&input)?)
            }
            Calculator::LoanComparison => {
                let offer = |prefix: &str| -> CalcResult<loan::LoanOffer> {
                    Ok(loan::LoanOffer {
                        principal: req.number(&format!("{prefix}.principal"))?,
                        annual_rate_percent: req.number(&format!("{prefix}.annual_rate_percent"))?,
                        years: req.number(&format!("{prefix}.years"))?,
                        fees: req.number_or(&format!("{prefix}.fees"), 0.0)?,
                    })
                };
                let input = loan::LoanComparisonInput {
                    offer_a: offer("offer_a")?,
                    offer_b: offer("offer_b")?,
                };
                CalculationResult::from_typed(id, &loan::calculate_loan_comparison(&input)?)
            }
            Calculator::CompoundInterest => {
                let input = growth::CompoundInterestInput {
                    principal: req.number("principal")?,
                    annual_rate_percent: req.number("annual_rate_percent")?,
                    years: req.number("years")?,
                    compounds_per_year: req.count_or("compounds_per_year", 1)?,
                };
                CalculationResult::from_typed(id, &growth::calculate_compound_interest(&input)?)
            }
            Calculator::Roi => {
                let input = growth::RoiInput {
                    initial_investment: req.number("initial_investment")?,
                    final_value: req.number("final_value")?,
                    years: req.number("years")?,
                };
                CalculationResult::from_typed(id, &growth::calculate_roi(&input)?)
            }
            Calculator::Retirement => {
                let input = growth::RetirementInput {
                    current_age: req.number("current_age")?,
                    retirement_age: req.number("retirement_age")?,
                    current_savings: req.number("current_savings")?,
                    monthly_contribution: req.number("monthly_contribution")?,
                    annual_return_percent: req.number("annual_return_percent")?,
                };
                CalculationResult::from_typed(id, &growth::calculate_retirement(&input)?)
            }
            Calculator::Percentage => {
                let input = business::PercentageInput {
                    number: req.number("number")?,
                    percentage: req.number("percentage")?,
                };
                CalculationResult::from_typed(id, &business::calculate_percentage(&input)?)
            }
            Calculator::Tip => {
                let input = business::TipInput {
                    bill_amount: req.number("bill_amount")?,
                    tip_percent: req.number("tip_percent")?,
                    people: req.count_or("people", 1)?,
                };
                CalculationResult::from_typed(id, &business::calculate_tip(&input)?)
            }
            Calculator::Salary => {
                let input = business::SalaryInput {
                    amount: req.number("amount")?,
                    period: req.select("period")?,
                    hours_per_week: req.number_or("hours_per_week", 40.0)?,
                    weeks_per_year: req.number_or("weeks_per_year", 52.0)?,
                };
                CalculationResult::from_typed(id, &business::calculate_salary(&input)?)
            }
            Calculator::BreakEven => {
                let input = business::BreakEvenInput {
                    fixed_costs: req.number("fixed_costs")?,
                    variable_cost_per_unit: req.number("variable_cost_per_unit")?,
                    price_per_unit: req.number("price_per_unit")?,
                    target_profit: req.number_or("target_profit", 10_000.0)?,
                };
                CalculationResult::from_typed(id, &business::calculate_break_even(&input)?)
            }

            // ----------------------------------------------------------------
            // Health
            // ----------------------------------------------------------------
            Calculator::Bmi => {
                let input = health::BmiInput {
                    weight_kg: req.number("weight_kg")?,
                    height_cm: req.number("height_cm")?,
                };
                CalculationResult::from_typed(id, &health::calculate_bmi(&input)?)
            }
            Calculator::Bmr => {
                let input = health::BmrInput {
                    weight_kg: req.number("weight_kg")?,
                    height_cm: req.number("height_cm")?,
                    age_years: req.number("age_years")?,
                    sex: req.select("sex")?,
                };
                CalculationResult::from_typed(id, &health::calculate_bmr(&input)?)
            }
            Calculator::BloodPressure => {
                let input = health::BloodPressureInput {
                    systolic: req.number("systolic")?,
                    diastolic: req.number("diastolic")?,
                };
                CalculationResult::from_typed(id, &health::calculate_blood_pressure(&input)?)
            }
            Calculator::Ovulation => {
                let input = dates::OvulationInput {
                    last_period: req.date("last_period")?,
                    cycle_length: req.count_or("cycle_length", 28)?,
                    luteal_phase: req.count_or("luteal_phase", 14)?,
                    today,
                };
                CalculationResult::from_typed(id, &dates::calculate_ovulation(&input)?)
            }
            Calculator::Pregnancy => {
                let input = dates::PregnancyInput {
                    last_period: req.date("last_period")?,
                    today,
                };
                CalculationResult::from_typed(id, &dates::calculate_pregnancy(&input)?)
            }

            // ----------------------------------------------------------------
            // Math
            // ----------------------------------------------------------------
            Calculator::Area => {
                let kind: geometry::ShapeKind = req.select("shape")?;
                let dims = kind
                    .dimensions()
                    .iter()
                    .map(|field| req.number(field))
                    .collect::<CalcResult<Vec<f64>>>()?;
                let shape = geometry::Shape::from_dimensions(kind, &dims)?;
                CalculationResult::from_typed(id, &geometry::calculate_area(&shape)?)
            }
            Calculator::Circle => CalculationResult::from_typed(id, &geometry::calculate_circle(req.number("radius")?)?),
            Calculator::Triangle => {
                let input = match req.select("mode")? {
                    geometry::TriangleMode::BaseHeight => geometry::TriangleInput::BaseHeight {
                        base: req.number("base")?,
                        height: req.number("height")?,
                    },
                    geometry::TriangleMode::ThreeSides => geometry::TriangleInput::ThreeSides {
                        a: req.number("a")?,
                        b: req.number("b")?,
                        c: req.number("c")?,
                    },
                    geometry::TriangleMode::SideAngleSide => geometry::TriangleInput::SideAngleSide {
                        a: req.number("a")?,
                        b: req.number("b")?,
                        angle_degrees: req.number("angle_degrees")?,
                    },
                };
                CalculationResult::from_typed(id, &geometry::calculate_triangle(&input)?)
            }
            Calculator::Quadratic => {
                let input = quadratic::QuadraticInput {
                    a: req.number("a")?,
                    b: req.number("b")?,
                    c: req.number("c")?,
                };
                CalculationResult::from_typed(id, &quadratic::calculate(&input)?)
            }
            Calculator::Fraction => {
                let input = fraction::FractionInput {
                    numerator1: req.integer("numerator1")?,
                    denominator1: req.integer("denominator1")?,
                    operation: req.select("operation")?,
                    numerator2: req.integer("numerator2")?,
                    denominator2: req.integer("denominator2")?,
                };
                CalculationResult::from_typed(id, &fraction::calculate(&input)?)
            }
            Calculator::Motion => {
                let input = motion::MotionInput::from_known(
                    req.optional_number("speed_kmh")?,
                    req.optional_number("distance_km")?,
                    req.optional_number("time_hours")?,
                )?;
                CalculationResult::from_typed(id, &motion::calculate(&input)?)
            }

            // ----------------------------------------------------------------
            // Date & time
            // ----------------------------------------------------------------
            Calculator::Age => {
                let input = dates::AgeInput {
                    birth_date: req.date("birth_date")?,
                    today,
                };
                CalculationResult::from_typed(id, &dates::calculate_age(&input)?)
            }
            Calculator::Sleep => {
                let input = dates::SleepInput {
                    mode: req.select_or("mode", dates::SleepMode::WakeUpAt)?,
                    time: req.time("time")?,
                };
                CalculationResult::from_typed(id, &dates::calculate_sleep(&input, &settings.sleep)?)
            }

            // ----------------------------------------------------------------
            // Text
            // ----------------------------------------------------------------
            Calculator::WordCounter => CalculationResult::from_typed(id, &text::count_words(req.text_or("text", ""))),
            Calculator::TextCase => {
                let input = text::CaseInput {
                    text: req.text("text")?.to_string(),
                    case: req.select("case")?,
                };
                CalculationResult::from_typed(id, &text::convert_case(&input)?)
            }

            // ----------------------------------------------------------------
            // Technology
            // ----------------------------------------------------------------
            Calculator::Subnet => {
                let mask = req
                    .raw("mask")
                    .or_else(|| req.raw("cidr"))
                    .ok_or_else(|| CalcError::missing_field("mask"))?;
                let ip = req.raw("ip_address").ok_or_else(|| CalcError::missing_field("ip_address"))?;
                let input = subnet::SubnetInput::parse(ip, mask)?;
                CalculationResult::from_typed(id, &subnet::calculate(&input)?)
            }
            Calculator::Password => {
                let defaults = text::PasswordInput::default();
                let input = text::PasswordInput {
                    length: req.count_or("length", defaults.length)?,
                    uppercase: req.flag("uppercase", defaults.uppercase)?,
                    lowercase: req.flag("lowercase", defaults.lowercase)?,
                    numbers: req.flag("numbers", defaults.numbers)?,
                    symbols: req.flag("symbols", defaults.symbols)?,
                };
                CalculationResult::from_typed(id, &text::generate_password(&input)?)
            }
            Calculator::Hash => {
                let input = text::HashInput {
                    text: req.text_or("text", "").to_string(),
                    algorithm: req.select_or("algorithm", text::HashAlgorithm::Sha256)?,
                };
                CalculationResult::from_typed(id, &text::generate_hash(&input))
            }
            Calculator::BitcoinMining => {
                let input = mining::MiningInput {
                    hashrate_ths: req.number("hashrate_ths")?,
                    power_watts: req.number("power_watts")?,
                    electricity_cost_per_kwh: req.number("electricity_cost_per_kwh")?,
                    btc_price: req.number("btc_price")?,
                    pool_fee_percent: req.number_or("pool_fee_percent", 0.0)?,
                };
                CalculationResult::from_typed(id, &mining::calculate(&input, &settings.mining)?)
            }

            // ----------------------------------------------------------------
            // Environment
            // ----------------------------------------------------------------
            Calculator::CarbonFootprint => {
                let input = footprint::FootprintInput {
                    car_km_per_year: req.number_or("car_km_per_year", 0.0)?,
                    flights_per_year: req.number_or("flights_per_year", 0.0)?,
                    hours_per_flight: req.number_or("hours_per_flight", 2.0)?,
                    electricity_kwh_per_month: req.number_or("electricity_kwh_per_month", 0.0)?,
                    diet: req.select_or("diet", footprint::DietType::Average)?,
                };
                CalculationResult::from_typed(id, &footprint::calculate(&input, &settings.carbon)?)
            }
        }
    }
}

fn linear<U>(id: &str, req: &CalculationRequest) -> CalcResult<CalculationResult>
where
    U: LinearUnit + FromStr<Err = CalcError>,
{
    let input = ConversionInput::<U> {
        value: req.number("value")?,
        from: req.select("from")?,
        to: req.select("to")?,
    };
    CalculationResult::from_typed(id, &units::calculate(&input)?)
}

impl FromStr for Calculator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Calculator::ALL
            .iter()
            .copied()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| CalcError::unknown_key("calculator", s))
    }
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn run(calc: Calculator, fields: &[&str]) -> CalcResult<CalculationResult> {
        let request = CalculationRequest::from_assignments(fields.iter().copied())?;
        calc.evaluate(&request, &CalcSettings::default(), today())
    }

    #[test]
    fn test_ids_are_unique_and_parse() {
        for calc in Calculator::ALL {
            assert_eq!(calc.id().parse::<Calculator>().unwrap(), *calc);
            assert_eq!(Calculator::ALL.iter().filter(|c| c.id() == calc.id()).count(), 1);
        }
        assert_eq!("car-loan".parse::<Calculator>().unwrap(), Calculator::CarLoan);
        assert_eq!("nope".parse::<Calculator>().unwrap_err().error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_every_category_has_calculators() {
        for category in Category::ALL {
            assert!(!Calculator::by_category(*category).is_empty(), "{category}");
        }
        let total: usize = Category::ALL.iter().map(|c| Calculator::by_category(*c).len()).sum();
        assert_eq!(total, Calculator::ALL.len());
    }

    #[test]
    fn test_search() {
        let loans = Calculator::search("LOAN");
        assert!(loans.contains(&Calculator::CarLoan));
        assert!(loans.contains(&Calculator::StudentLoan));
        assert!(loans.contains(&Calculator::Emi));
        assert!(!loans.contains(&Calculator::Bmi));

        assert_eq!(Calculator::search("").len(), Calculator::ALL.len());
        assert!(Calculator::search("health").contains(&Calculator::BloodPressure));
        assert!(Calculator::search("zzz").is_empty());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Date & Time".parse::<Category>().unwrap(), Category::DateTime);
        assert_eq!("date_time".parse::<Category>().unwrap(), Category::DateTime);
        assert_eq!("FINANCE".parse::<Category>().unwrap(), Category::Finance);
        assert!("cooking".parse::<Category>().is_err());
    }

    #[test]
    fn test_evaluate_length() {
        let result = run(Calculator::Length, &["value=5", "from=mile", "to=km"]).unwrap();
        assert_eq!(result.calculator, "length");
        assert!((result.number("result").unwrap() - 8.04672).abs() < 1e-9);
        assert_eq!(result.text("to"), Some("kilometer"));
    }

    #[test]
    fn test_evaluate_missing_and_bad_fields() {
        let err = run(Calculator::Bmi, &["weight_kg=70"]).unwrap_err();
        assert_eq!(err, CalcError::missing_field("height_cm"));

        let err = run(Calculator::Bmi, &["weight_kg=abc", "height_cm=170"]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_NUMBER");

        let err = run(Calculator::Length, &["value=1", "from=parsec", "to=m"]).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_evaluate_age_uses_today() {
        let result = run(Calculator::Age, &["birth_date=2000-01-31"]).unwrap();
        assert_eq!(result.number("years"), Some(24.0));
        assert_eq!(result.number("months"), Some(1.0));
        assert_eq!(result.number("days"), Some(1.0));
    }

    #[test]
    fn test_evaluate_area_dimensions_follow_shape() {
        let result = run(Calculator::Area, &["shape=trapezoid", "base_a=4", "base_b=6", "height=3"]).unwrap();
        assert_eq!(result.number("area"), Some(15.0));
        assert!(result.get("perimeter").unwrap().is_null());

        let err = run(Calculator::Area, &["shape=rectangle", "length=4"]).unwrap_err();
        assert_eq!(err, CalcError::missing_field("width"));
    }

    #[test]
    fn test_evaluate_loan_comparison_nested() {
        let result = run(
            Calculator::LoanComparison,
            &[
                "offer_a.principal=10000",
                "offer_a.annual_rate_percent=5",
                "offer_a.years=3",
                "offer_b.principal=10000",
                "offer_b.annual_rate_percent=4",
                "offer_b.years=3",
                "offer_b.fees=500",
            ],
        )
        .unwrap();
        assert_eq!(result.text("cheaper"), Some("offer_a"));
        let labels: Vec<String> = result.lines().into_iter().map(|(label, _)| label).collect();
        assert!(labels.contains(&"offer_a.monthly_payment".to_string()));
    }

    #[test]
    fn test_evaluate_subnet_accepts_cidr_field() {
        let result = run(Calculator::Subnet, &["ip_address=192.168.1.10", "cidr=24"]).unwrap();
        assert_eq!(result.text("broadcast_address"), Some("192.168.1.255"));
        assert_eq!(result.number("usable_hosts"), Some(254.0));
    }

    #[test]
    fn test_evaluate_motion_and_fraction() {
        let motion = run(Calculator::Motion, &["distance_km=100", "time_hours=2"]).unwrap();
        assert_eq!(motion.number("speed_kmh"), Some(50.0));
        assert_eq!(motion.text("solved_for"), Some("speed"));

        let fraction = run(
            Calculator::Fraction,
            &["numerator1=3", "denominator1=2", "operation=+", "numerator2=1", "denominator2=2"],
        )
        .unwrap();
        assert_eq!(fraction.text("mixed"), Some("2"));
    }

    #[test]
    fn test_evaluate_fraction_keeps_large_integers_exact() {
        let result = run(
            Calculator::Fraction,
            &[
                "numerator1=9007199254740993",
                "denominator1=1",
                "operation=+",
                "numerator2=0",
                "denominator2=1",
            ],
        )
        .unwrap();
        assert_eq!(result.text("simplified"), Some("9007199254740993"));

        let err = run(
            Calculator::Fraction,
            &["numerator1=1e300", "denominator1=1", "operation=+", "numerator2=0", "denominator2=1"],
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("numerator1"));
    }

    #[test]
    fn test_evaluate_uses_settings() {
        let mut settings = CalcSettings::default();
        settings.carbon.average_tonnes_per_person = 2.5;
        let request = CalculationRequest::new().with("diet", "average");
        let result = Calculator::CarbonFootprint
            .evaluate(&request, &settings, today())
            .unwrap();
        assert_eq!(result.number("percent_of_average"), Some(100.0));
    }

    #[test]
    fn test_every_calculator_reports_missing_input() {
        // Calculators with all-optional fields succeed on an empty request
        let all_optional = [
            Calculator::Password,
            Calculator::Hash,
            Calculator::WordCounter,
            Calculator::CarbonFootprint,
        ];
        for calc in Calculator::ALL {
            let result = calc.evaluate(&CalculationRequest::new(), &CalcSettings::default(), today());
            if all_optional.contains(calc) {
                assert!(result.is_ok(), "{calc}");
                assert!(calc.fields().iter().all(|f| f.ends_with('?')), "{calc}");
            } else {
                assert!(result.is_err(), "{calc}");
            }
        }
    }
}
