//! Transaction display formatting
//!
//! Register tables and the detail view of a single transaction.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::Transaction;
use crate::reports::CategoryLookup;

use super::report::truncate;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "")]
    flags: String,
}

/// Format the signed amount: income positive, expense negative
fn signed(txn: &Transaction, settings: &Settings) -> String {
    settings.format_money(txn.signed_amount())
}

/// Format a list of transactions as a register
pub fn format_transaction_register<L>(
    transactions: &[Transaction],
    categories: &L,
    settings: &Settings,
) -> String
where
    L: CategoryLookup + ?Sized,
{
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|txn| {
        let mut flags = String::new();
        if txn.is_recurring() {
            flags.push('↻');
        }
        if txn.note.is_some() {
            flags.push('✎');
        }
        TransactionRow {
            id: txn.id.to_string(),
            date: txn.date.format(&settings.date_format).to_string(),
            title: truncate(&txn.title, 28),
            category: categories
                .category_name(txn.category_id)
                .unwrap_or("Unknown")
                .to_string(),
            amount: signed(txn, settings),
            flags,
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details<L>(txn: &Transaction, categories: &L, settings: &Settings) -> String
where
    L: CategoryLookup + ?Sized,
{
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Title:       {}\n", txn.title));
    output.push_str(&format!(
        "Date:        {} {}\n",
        txn.date.format(&settings.date_format),
        txn.date.format("%H:%M")
    ));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Amount:      {}\n", signed(txn, settings)));

    match categories.category(txn.category_id) {
        Some(category) => output.push_str(&format!("Category:    {}\n", category.name)),
        None => output.push_str(&format!("Category:    Unknown ({})\n", txn.category_id)),
    }

    if let Some(note) = &txn.note {
        output.push_str(&format!("Note:        {}\n", note));
    }

    if let Some(interval) = txn.recurrence {
        output.push_str(&format!("Repeats:     {}\n", interval));
    }

    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
