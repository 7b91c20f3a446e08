//! CLI commands for data export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{BudgetMillError, BudgetMillResult};
use crate::export::{csv, json};
use crate::models::Period;
use crate::storage::Storage;

use super::{parse_period, reference_date};

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export transactions, or per-category totals, to CSV
    Csv {
        /// Output file path
        output: PathBuf,
        /// Export per-category totals for a period instead of transactions
        #[arg(long)]
        totals: bool,
        /// Period for --totals: today, week, month, year or all
        #[arg(short, long, value_parser = parse_period, default_value = "month")]
        period: Period,
        /// Reference date for --totals (YYYY-MM-DD); defaults to today
        #[arg(long)]
        on: Option<String>,
    },

    /// Export categories, transactions and budgets to JSON
    Json {
        /// Output file path
        output: PathBuf,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn create_file(output: &Path) -> BudgetMillResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        BudgetMillError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> BudgetMillResult<()> {
    match cmd {
        ExportCommands::Csv {
            output,
            totals,
            period,
            on,
        } => {
            let mut writer = create_file(&output)?;
            if totals {
                let reference = reference_date(on.as_deref())?;
                csv::export_category_totals_csv(
                    storage,
                    &mut writer,
                    period,
                    reference,
                    settings.first_weekday,
                )?;
                writer.flush()?;
                println!("Category totals ({}) exported to: {}", period, output.display());
            } else {
                csv::export_transactions_csv(storage, &mut writer)?;
                writer.flush()?;
                println!(
                    "Exported {} transactions to: {}",
                    storage.transactions.count(),
                    output.display()
                );
            }
        }

        ExportCommands::Json { output, pretty } => {
            let mut writer = create_file(&output)?;
            json::export_full_json(storage, &mut writer, pretty)?;
            writer.flush()?;
            println!("Full export written to: {}", output.display());
        }
    }

    Ok(())
}
