mod cli;
mod input;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use billscan_engine::{
    DETECTION_POLICY_HISTORICAL, DETECTION_POLICY_LIVE, detect_bills_with_policy,
    is_likely_bill_payment,
};

use crate::cli::{Cli, Command, OutputFormat};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let parsed = Cli::parse();
    match run(parsed) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(1)
        }
    }
}

fn run(parsed: Cli) -> Result<String, String> {
    match parsed.command {
        Command::Detect {
            path,
            today,
            historical,
            exclusions,
            format,
        } => {
            let loaded = input::load_transactions(&path)?;
            let policy = if historical {
                DETECTION_POLICY_HISTORICAL
            } else {
                DETECTION_POLICY_LIVE
            };
            let as_of = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let bills = detect_bills_with_policy(&loaded.transactions, as_of, &policy);

            let (bills, excluded) = match exclusions {
                Some(exclusions_path) => {
                    let rules = input::load_exclusions(&exclusions_path)?;
                    let before = bills.len();
                    let remaining = input::apply_exclusions(bills, &rules);
                    let dropped = before - remaining.len();
                    (remaining, dropped)
                }
                None => (bills, 0),
            };

            match format {
                OutputFormat::Text => {
                    Ok(output::render_bills_text(&bills, loaded.skipped_rows, excluded))
                }
                OutputFormat::Json => {
                    output::render_bills_json(&bills, loaded.skipped_rows, excluded)
                }
            }
        }
        Command::Quick {
            description,
            amount,
            format,
        } => {
            let verdict = is_likely_bill_payment(&description, amount);
            match format {
                OutputFormat::Text => Ok(output::render_quick_text(&verdict)),
                OutputFormat::Json => output::render_quick_json(&verdict),
            }
        }
    }
}
