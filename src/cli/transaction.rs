//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing and editing transactions.

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::{BudgetMillError, BudgetMillResult};
use crate::models::transaction::parse_timestamp;
use crate::models::{Period, RecurringInterval, TransactionType};
use crate::services::transaction::{TransactionForm, TransactionPatch, TransactionQuery};
use crate::services::TransactionService;
use crate::storage::Storage;

use super::{parse_kind, parse_money, parse_period, reference_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Title (e.g., "Lunch with client")
        title: String,
        /// Amount, always positive (e.g., "25" or "25.50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// "expense" or "income"
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Date and time (YYYY-MM-DD or "YYYY-MM-DD HH:MM"); defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
        /// Repeat interval: none, daily, weekly, monthly or yearly
        #[arg(short, long)]
        repeat: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Period: today, week, month, year or all
        #[arg(short, long, value_parser = parse_period, default_value = "all")]
        period: Period,
        /// Only "expense" or "income"
        #[arg(short = 't', long = "type", value_parser = parse_kind)]
        kind: Option<TransactionType>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Case-insensitive text in title, category or note
        #[arg(short, long)]
        search: Option<String>,
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Reference date for the period (YYYY-MM-DD); defaults to today
        #[arg(long)]
        on: Option<String>,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short = 't', long = "type", value_parser = parse_kind)]
        kind: Option<TransactionType>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, conflicts_with = "clear_note")]
        note: Option<String>,
        /// Remove the note
        #[arg(long)]
        clear_note: bool,
        /// Repeat interval, or "none" to stop repeating
        #[arg(short, long)]
        repeat: Option<String>,
    },

    /// Delete a transaction
    #[command(alias = "remove")]
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BudgetMillResult<()> {
    match cmd {
        TransactionCommands::Add {
            title,
            amount,
            category,
            kind,
            date,
            note,
            repeat,
        } => {
            let form = TransactionForm {
                title,
                amount,
                kind,
                category,
                date,
                note,
                repeat,
            };
            let input = form.parse(&storage.categories, Local::now().naive_local())?;

            let mut service = TransactionService::new(storage);
            let id = service.add(input)?;
            let txn = service.get(id)?;

            println!(
                "Added {}: {} {}",
                txn.kind,
                txn.title,
                settings.format_money(txn.amount)
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            period,
            kind,
            category,
            search,
            limit,
            on,
        } => {
            let reference = reference_date(on.as_deref())?;
            let mut query = TransactionQuery::new()
                .period(period, reference, settings.first_weekday)
                .limit(limit);
            if let Some(kind) = kind {
                query = query.kind(kind);
            }
            if let Some(category) = category {
                let found = storage
                    .categories
                    .find(&category, kind)?
                    .ok_or_else(|| BudgetMillError::category_not_found(&category))?;
                query = query.category(found.id);
            }
            if let Some(text) = search {
                query = query.text(text);
            }

            let service = TransactionService::new(storage);
            let transactions = service.list(&query);
            print!(
                "{}",
                format_transaction_register(&transactions, &storage.categories, settings)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = TransactionService::new(storage).find(&id)?;
            print!(
                "{}",
                format_transaction_details(&txn, &storage.categories, settings)
            );
        }

        TransactionCommands::Edit {
            id,
            title,
            amount,
            kind,
            category,
            date,
            note,
            clear_note,
            repeat,
        } => {
            let existing = TransactionService::new(storage).find(&id)?;

            let category_id = match category {
                Some(name) => {
                    let target_kind = kind.unwrap_or(existing.kind);
                    let found = storage
                        .categories
                        .find(&name, Some(target_kind))?
                        .ok_or_else(|| BudgetMillError::category_not_found(&name))?;
                    Some(found.id)
                }
                None => None,
            };

            let date = date
                .map(|text| {
                    parse_timestamp(&text).ok_or_else(|| {
                        BudgetMillError::Validation(format!(
                            "Invalid date '{}': use YYYY-MM-DD or YYYY-MM-DD HH:MM",
                            text
                        ))
                    })
                })
                .transpose()?;

            let recurrence = repeat
                .map(|text| {
                    if text.trim().eq_ignore_ascii_case("none") {
                        Ok(None)
                    } else {
                        RecurringInterval::parse(&text).map(Some).ok_or_else(|| {
                            BudgetMillError::Validation(format!(
                                "Invalid repeat interval '{}'",
                                text
                            ))
                        })
                    }
                })
                .transpose()?;

            let patch = TransactionPatch {
                title,
                amount: amount.as_deref().map(parse_money).transpose()?,
                kind,
                category_id,
                date,
                note: if clear_note { Some(None) } else { note.map(Some) },
                recurrence,
            };

            if patch.is_empty() {
                println!("No changes specified. Use --title, --amount, --type, --category, --date, --note or --repeat.");
                return Ok(());
            }

            let updated = TransactionService::new(storage).update(existing.id, patch)?;
            println!("Updated transaction: {} ({})", updated.title, updated.id);
        }

        TransactionCommands::Delete { id } => {
            let mut service = TransactionService::new(storage);
            let existing = service.find(&id)?;
            let removed = service.remove(existing.id)?;
            println!("Deleted transaction: {} ({})", removed.title, removed.id);
        }
    }

    Ok(())
}
