//! CSV Export functionality
//!
//! Exports transactions and per-category totals to CSV format.

use std::io::Write;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::error::BudgetMillResult;
use crate::models::{Period, TransactionType};
use crate::reports::{filter_by_period, CategoryBreakdown, CategoryLookup};
use crate::storage::Storage;

#[derive(Serialize)]
struct TransactionRecord<'a> {
    id: String,
    date: String,
    title: &'a str,
    #[serde(rename = "type")]
    kind: TransactionType,
    category: &'a str,
    amount: String,
    note: &'a str,
    recurrence: String,
}

#[derive(Serialize)]
struct CategoryTotalRecord<'a> {
    category: &'a str,
    #[serde(rename = "type")]
    kind: TransactionType,
    count: usize,
    total: String,
    percent: String,
}

fn writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// Export all transactions to CSV in insertion order
///
/// Amounts are unsigned decimals; the `type` column carries the direction.
pub fn export_transactions_csv<W: Write>(storage: &Storage, out: W) -> BudgetMillResult<()> {
    let mut csv = writer(out);

    for txn in storage.transactions.iter() {
        csv.serialize(TransactionRecord {
            id: txn.id.as_uuid().to_string(),
            date: txn.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            title: &txn.title,
            kind: txn.kind,
            category: storage
                .categories
                .category_name(txn.category_id)
                .unwrap_or("Unknown"),
            amount: txn.amount.to_decimal_string(),
            note: txn.note.as_deref().unwrap_or(""),
            recurrence: txn
                .recurrence
                .map(|r| r.to_string())
                .unwrap_or_default(),
        })?;
    }

    csv.flush()?;
    Ok(())
}

/// Export per-category totals of one period to CSV, income then expense
pub fn export_category_totals_csv<W: Write>(
    storage: &Storage,
    out: W,
    period: Period,
    reference: NaiveDate,
    week_start: Weekday,
) -> BudgetMillResult<()> {
    let mut csv = writer(out);

    for kind in [TransactionType::Income, TransactionType::Expense] {
        let in_period = filter_by_period(storage.transactions.iter(), period, reference, week_start);
        let breakdown = CategoryBreakdown::generate(in_period, kind, &storage.categories);

        for share in &breakdown.shares {
            csv.serialize(CategoryTotalRecord {
                category: &share.name,
                kind,
                count: share.count,
                total: share.total.to_decimal_string(),
                percent: format!("{:.1}", share.percent),
            })?;
        }
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RecurringInterval, Transaction};

    fn at(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn storage() -> Storage {
        let mut storage = Storage::in_memory();
        let dining = storage.categories.find_by_name("Dining", None).unwrap().id;
        let salary = storage.categories.find_by_name("Salary", None).unwrap().id;

        let txns = [
            Transaction::new(
                "Lunch, with client",
                Money::from_cents(2550),
                TransactionType::Expense,
                dining,
                at(3),
            )
            .with_note("Lunch receipt"),
            Transaction::new("Dinner", Money::from_major(40), TransactionType::Expense, dining, at(4)),
            Transaction::new("Pay", Money::from_major(9000), TransactionType::Income, salary, at(1))
                .with_recurrence(RecurringInterval::Monthly),
        ];
        for txn in txns {
            storage.transactions.insert(txn).unwrap();
        }
        storage
    }

    #[test]
    fn test_export_transactions_csv() {
        let storage = storage();
        let mut buffer = Vec::new();
        export_transactions_csv(&storage, &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "id,date,title,type,category,amount,note,recurrence");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("\"Lunch, with client\",expense,Dining,25.50,Lunch receipt,"));
        assert!(lines[3].ends_with("income,Salary,9000.00,,monthly"));
    }

    #[test]
    fn test_export_category_totals_csv() {
        let storage = storage();
        let mut buffer = Vec::new();
        export_category_totals_csv(
            &storage,
            &mut buffer,
            Period::ThisMonth,
            NaiveDate::from_ymd_opt(2024, 12, 19).unwrap(),
            Weekday::Mon,
        )
        .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "category,type,count,total,percent");
        assert_eq!(lines[1], "Salary,income,1,9000.00,100.0");
        assert_eq!(lines[2], "Dining,expense,2,65.50,100.0");
    }

    #[test]
    fn test_empty_store_writes_nothing() {
        let storage = Storage::in_memory();
        let mut buffer = Vec::new();
        export_transactions_csv(&storage, &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }
}
