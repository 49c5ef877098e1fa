use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "date must use valid calendar values".to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "billscan",
    version,
    about = "Recurring-bill detection over normalized transaction history"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Detect recurring bills from a transaction file (JSON array or CSV)
    Detect {
        /// Path to the transaction file
        path: PathBuf,

        /// Run detection as of this date instead of today
        #[arg(long, value_parser = parse_iso_date)]
        today: Option<NaiveDate>,

        /// Use the bulk-import threshold preset (looser gaps, 180-day staleness)
        #[arg(long)]
        historical: bool,

        /// JSON file of {merchant, amount?, category?, reason?} exclusions
        #[arg(long)]
        exclusions: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Score one transaction with no history behind it
    Quick {
        #[arg(long)]
        description: String,

        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
