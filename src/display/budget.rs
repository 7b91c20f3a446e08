//! Budget display formatting
//!
//! Status table with a progress bar per budget and the totals line.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::{Budget, BudgetHealth, BudgetStatus, BudgetTotals};
use crate::reports::CategoryLookup;

use super::report::{format_bar, format_percentage};

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Cap")]
    cap: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Status")]
    health: String,
}

fn health_marker(health: BudgetHealth) -> String {
    match health {
        BudgetHealth::Normal => health.to_string(),
        BudgetHealth::ApproachingLimit => format!("! {}", health),
        BudgetHealth::OverBudget => format!("!! {}", health),
    }
}

fn window(budget: &Budget, settings: &Settings) -> String {
    let last = budget.end - chrono::Duration::days(1);
    format!(
        "{} {}..{}",
        budget.period,
        budget.start.format(&settings.date_format),
        last.format(&settings.date_format)
    )
}

/// Format budgets with their current status
///
/// `budgets` and `statuses` are matched by budget ID; a budget without a
/// status is skipped.
pub fn format_budget_statuses<L>(
    budgets: &[Budget],
    statuses: &[BudgetStatus],
    categories: &L,
    settings: &Settings,
) -> String
where
    L: CategoryLookup + ?Sized,
{
    if statuses.is_empty() {
        return "No budgets found.\n\nRun 'budgetmill budget add <category> <cap>' to create one.\n"
            .to_string();
    }

    let rows = statuses.iter().filter_map(|status| {
        let budget = budgets.iter().find(|b| b.id == status.budget_id)?;
        Some(StatusRow {
            id: budget.id.to_string(),
            category: categories
                .category_name(budget.category_id)
                .unwrap_or("Unknown")
                .to_string(),
            window: window(budget, settings),
            cap: settings.format_money(status.cap),
            spent: settings.format_money(status.spent),
            remaining: settings.format_money(status.remaining),
            progress: format!(
                "{} {}",
                format_bar(status.progress, 1.0, 10),
                format_percentage(status.progress * 100.0)
            ),
            health: health_marker(status.health),
        })
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format totals across budgets
pub fn format_budget_totals(totals: &BudgetTotals, settings: &Settings) -> String {
    format!(
        "Total cap: {}   Spent: {}   Remaining: {}\n",
        settings.format_money(totals.total_cap),
        settings.format_money(totals.total_spent),
        settings.format_money(totals.total_remaining)
    )
}

/// Format a single budget with its status
pub fn format_budget_details(
    budget: &Budget,
    status: &BudgetStatus,
    category_name: &str,
    settings: &Settings,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget: {}\n", budget.id));
    output.push_str(&format!("  Category:  {}\n", category_name));
    output.push_str(&format!("  Window:    {}\n", window(budget, settings)));
    output.push_str(&format!("  Cap:       {}\n", settings.format_money(status.cap)));
    output.push_str(&format!("  Spent:     {}\n", settings.format_money(status.spent)));
    output.push_str(&format!(
        "  Remaining: {}\n",
        settings.format_money(status.remaining)
    ));
    output.push_str(&format!(
        "  Progress:  {} {}\n",
        format_bar(status.progress, 1.0, 20),
        format_percentage(status.progress * 100.0)
    ));
    output.push_str(&format!("  Status:    {}\n", status.health));

    output
}
