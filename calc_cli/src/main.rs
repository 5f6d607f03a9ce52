//! # Calc Hub CLI
//!
//! Command-line front end for `calc_core`.
//!
//! ```text
//! calc list [--category finance]
//! calc search loan
//! calc fields emi
//! calc run emi principal=250000 annual_rate_percent=7.5 years=20 [--json]
//! calc config > calc.toml
//! ```
//!
//! Failed calculations print the structured error as JSON on stderr and exit
//! with a non-zero status.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use calc_core::input::CalculationRequest;
use calc_core::{CalcError, CalcSettings, Calculator, Category};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "calc", version, about = "Unit converters and everyday calculators")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List calculators, optionally in one category
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Find calculators by id, name or category
    Search { term: String },
    /// Show the fields a calculator reads
    Fields { calculator: String },
    /// Run a calculator with field=value inputs
    Run {
        calculator: String,

        /// Inputs as field=value
        fields: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// TOML file overriding exchange rates and other constants
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reference date for date-based calculators (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },
    /// Print the default settings as TOML
    Config,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("calc_core=debug,calc=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("calc_core=info,calc=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    debug!(?cli, "parsed arguments");

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<CalcError>() {
        Some(calc_error) => {
            let body = serde_json::json!({
                "code": calc_error.error_code(),
                "message": calc_error.to_string(),
                "error": calc_error,
            });
            match serde_json::to_string_pretty(&body) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("Error: {}", calc_error),
            }
        }
        None => eprintln!("Error: {:#}", error),
    }
}

fn execute(command: Command) -> Result<()> {
    match command {
        Command::List { category } => {
            let categories = match category {
                Some(name) => vec![name.parse::<Category>()?],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                println!("{}", category);
                for calc in Calculator::by_category(category) {
                    println!("  {:<20} {}", calc.id(), calc.name());
                }
            }
        }
        Command::Search { term } => {
            let found = Calculator::search(&term);
            if found.is_empty() {
                println!("No calculators match '{}'", term);
            }
            for calc in found {
                println!("{:<20} {:<32} [{}]", calc.id(), calc.name(), calc.category());
            }
        }
        Command::Fields { calculator } => {
            let calc: Calculator = calculator.parse()?;
            println!("{} ({})", calc.name(), calc.id());
            for field in calc.fields() {
                match field.strip_suffix('?') {
                    Some(optional) => println!("  {} (optional)", optional),
                    None => println!("  {}", field),
                }
            }
        }
        Command::Run {
            calculator,
            fields,
            json,
            config,
            today,
        } => {
            let calc: Calculator = calculator.parse()?;
            let settings = load_settings(config.as_deref())?;
            let today = match today {
                Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                    .map_err(|_| CalcError::invalid_input("today", text.as_str(), "Expected a date as YYYY-MM-DD"))?,
                None => chrono::Local::now().date_naive(),
            };
            let request = CalculationRequest::from_assignments(&fields)?;

            let result = calc.evaluate(&request, &settings, today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result).context("rendering result as JSON")?);
            } else {
                println!("{}", calc.name());
                let lines = result.lines();
                let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
                for (label, value) in lines {
                    println!("  {:<width$}  {}", label, value, width = width);
                }
            }
        }
        Command::Config => {
            print!("{}", CalcSettings::default().to_toml_string()?);
        }
    }
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<CalcSettings> {
    match path {
        Some(path) => {
            let settings = CalcSettings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?;
            Ok(settings)
        }
        None => Ok(CalcSettings::default()),
    }
}
