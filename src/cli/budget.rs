//! Budget CLI commands
//!
//! Implements CLI commands for category spending caps.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_budget_details, format_budget_statuses, format_budget_totals};
use crate::error::{BudgetMillError, BudgetMillResult};
use crate::models::{BudgetPeriod, BudgetTotals, DateRange, TransactionType};
use crate::reports::CategoryLookup;
use crate::services::budget::{BudgetWindow, CreateBudgetInput};
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{parse_money, reference_date};

fn parse_budget_period(s: &str) -> Result<BudgetPeriod, String> {
    BudgetPeriod::parse(s).ok_or_else(|| format!("expected weekly, monthly or yearly, got '{}'", s))
}

fn parse_day(s: &str) -> BudgetMillResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| BudgetMillError::Validation(format!("Invalid date '{}': use YYYY-MM-DD", s)))
}

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Cap spending in an expense category
    Add {
        /// Expense category name or ID
        category: String,
        /// Cap amount (e.g., "1000" or "1000.00")
        cap: String,
        /// Period length; defaults to the configured budget period
        #[arg(short, long, value_parser = parse_budget_period)]
        period: Option<BudgetPeriod>,
        /// Any date inside the calendar window (YYYY-MM-DD); defaults to today
        #[arg(long, conflicts_with_all = ["from", "to"])]
        on: Option<String>,
        /// First day of an explicit window (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// Last day of an explicit window, inclusive (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// List budgets with their current status
    List {
        /// Only budgets whose window contains this date (YYYY-MM-DD)
        #[arg(long)]
        on: Option<String>,
        /// Only budgets whose category name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show the status of one budget
    Status {
        /// Budget ID
        id: String,
    },

    /// Change a budget's cap
    Edit {
        /// Budget ID
        id: String,
        /// New cap amount
        #[arg(long)]
        cap: String,
    },

    /// Delete a budget
    #[command(alias = "remove")]
    Delete {
        /// Budget ID
        id: String,
    },

    /// Create the budget for the next window with the same cap
    Renew {
        /// Budget ID
        id: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BudgetMillResult<()> {
    match cmd {
        BudgetCommands::Add {
            category,
            cap,
            period,
            on,
            from,
            to,
        } => {
            let found = storage
                .categories
                .find(&category, Some(TransactionType::Expense))?
                .ok_or_else(|| BudgetMillError::category_not_found(&category))?;
            let category_id = found.id;
            let category_name = found.name.clone();

            let window = match (from, to) {
                (Some(from), Some(to)) => {
                    let range = DateRange::inclusive(parse_day(&from)?, parse_day(&to)?)
                        .map_err(|e| BudgetMillError::Validation(e.to_string()))?;
                    BudgetWindow::Explicit(range)
                }
                _ => BudgetWindow::Calendar(reference_date(on.as_deref())?),
            };

            let mut service = BudgetService::with_settings(storage, settings);
            let budget = service.create(CreateBudgetInput {
                category_id,
                cap: parse_money(&cap)?,
                period: period.unwrap_or(settings.default_budget_period),
                window,
            })?;

            println!(
                "Created {} budget for {}: {}",
                budget.period,
                category_name,
                settings.format_money(budget.cap)
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::List { on, search } => {
            let service = BudgetService::with_settings(storage, settings);
            let budgets = service.search(search.as_deref().unwrap_or(""));
            let mut statuses = match on {
                Some(text) => service.statuses_on(parse_day(&text)?),
                None => service.statuses(),
            };
            statuses.retain(|s| budgets.iter().any(|b| b.id == s.budget_id));
            let totals = BudgetTotals::across(&statuses);

            print!(
                "{}",
                format_budget_statuses(&budgets, &statuses, &storage.categories, settings)
            );
            if !statuses.is_empty() {
                print!("{}", format_budget_totals(&totals, settings));
            }
        }

        BudgetCommands::Status { id } => {
            let service = BudgetService::with_settings(storage, settings);
            let budget = service.find(&id)?;
            let status = service.status(budget.id)?;
            let category_name = storage
                .categories
                .category_name(budget.category_id)
                .unwrap_or("Unknown");
            print!(
                "{}",
                format_budget_details(&budget, &status, category_name, settings)
            );
        }

        BudgetCommands::Edit { id, cap } => {
            let mut service = BudgetService::with_settings(storage, settings);
            let budget = service.find(&id)?;
            let updated = service.update_cap(budget.id, parse_money(&cap)?)?;
            println!(
                "Updated budget {}: cap {}",
                updated.id,
                settings.format_money(updated.cap)
            );
        }

        BudgetCommands::Delete { id } => {
            let mut service = BudgetService::with_settings(storage, settings);
            let budget = service.find(&id)?;
            let removed = service.remove(budget.id)?;
            println!("Deleted budget: {}", removed.id);
        }

        BudgetCommands::Renew { id } => {
            let mut service = BudgetService::with_settings(storage, settings);
            let budget = service.find(&id)?;
            let next = service.renew(budget.id)?;
            println!(
                "Created budget {} for {} .. {}",
                next.id,
                next.start.format(&settings.date_format),
                (next.end - chrono::Duration::days(1)).format(&settings.date_format)
            );
        }
    }

    Ok(())
}
