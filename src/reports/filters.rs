//! Transaction filters
//!
//! Each filter takes any iterator of transaction references and returns a
//! lazy iterator, so filters chain and the source can be re-queried freely.

use chrono::{NaiveDate, Weekday};

use crate::models::{Category, CategoryId, DateRange, Period, Transaction, TransactionType};
use crate::storage::CategoryRepository;

/// Resolves category IDs to categories
pub trait CategoryLookup {
    fn category(&self, id: CategoryId) -> Option<&Category>;

    fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.category(id).map(|c| c.name.as_str())
    }
}

impl CategoryLookup for CategoryRepository {
    fn category(&self, id: CategoryId) -> Option<&Category> {
        self.get(id)
    }
}

impl CategoryLookup for [Category] {
    fn category(&self, id: CategoryId) -> Option<&Category> {
        self.iter().find(|c| c.id == id)
    }
}

impl CategoryLookup for Vec<Category> {
    fn category(&self, id: CategoryId) -> Option<&Category> {
        self.as_slice().category(id)
    }
}

/// Transactions dated inside the calendar `period` around `reference`
pub fn filter_by_period<'a, I>(
    transactions: I,
    period: Period,
    reference: NaiveDate,
    week_start: Weekday,
) -> impl Iterator<Item = &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let range = period.range(reference, week_start);
    transactions
        .into_iter()
        .filter(move |t| range.map_or(true, |r| r.contains(t.day())))
}

/// Transactions dated inside `range`
pub fn filter_by_range<'a, I>(transactions: I, range: DateRange) -> impl Iterator<Item = &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(move |t| range.contains(t.day()))
}

/// Transactions of one type; `None` keeps everything
pub fn filter_by_type<'a, I>(
    transactions: I,
    kind: Option<TransactionType>,
) -> impl Iterator<Item = &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(move |t| kind.map_or(true, |k| t.kind == k))
}

/// Transactions filed under one category
pub fn filter_by_category<'a, I>(
    transactions: I,
    category_id: CategoryId,
) -> impl Iterator<Item = &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(move |t| t.category_id == category_id)
}

/// Case-insensitive substring search over title, category name and note
///
/// Blank search text matches every transaction.
pub fn search_text<'a, I, L>(
    transactions: I,
    text: &str,
    categories: &'a L,
) -> impl Iterator<Item = &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
    L: CategoryLookup + ?Sized,
{
    let needle = text.trim().to_lowercase();
    transactions
        .into_iter()
        .filter(move |t| matches_text(t, &needle, categories))
}

/// Whether `txn` contains the already-lowercased `needle`
pub fn matches_text<L>(txn: &Transaction, needle: &str, categories: &L) -> bool
where
    L: CategoryLookup + ?Sized,
{
    if needle.is_empty() {
        return true;
    }
    txn.title.to_lowercase().contains(needle)
        || categories
            .category_name(txn.category_id)
            .is_some_and(|name| name.to_lowercase().contains(needle))
        || txn
            .note
            .as_deref()
            .is_some_and(|note| note.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PresetCategory};

    fn at(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn fixtures() -> (Vec<Category>, Vec<Transaction>) {
        let dining = PresetCategory::Dining.to_category();
        let transport = PresetCategory::Transport.to_category();
        let salary = PresetCategory::Salary.to_category();

        let txns = vec![
            Transaction::new(
                "Lunch with client",
                Money::from_major(25),
                TransactionType::Expense,
                dining.id,
                at(2024, 12, 19),
            ),
            Transaction::new(
                "Groceries",
                Money::from_major(15),
                TransactionType::Expense,
                dining.id,
                at(2024, 12, 1),
            )
            .with_note("Lunch receipt"),
            Transaction::new(
                "Metro",
                Money::from_major(6),
                TransactionType::Expense,
                transport.id,
                at(2024, 11, 30),
            ),
            Transaction::new(
                "December pay",
                Money::from_major(8000),
                TransactionType::Income,
                salary.id,
                at(2024, 12, 5),
            ),
        ];
        (vec![dining, transport, salary], txns)
    }

    #[test]
    fn test_this_month_uses_calendar_containment() {
        let (_, txns) = fixtures();
        let reference = NaiveDate::from_ymd_opt(2024, 12, 19).unwrap();

        let titles: Vec<_> = filter_by_period(&txns, Period::ThisMonth, reference, Weekday::Mon)
            .map(|t| t.title.as_str())
            .collect();
        assert!(titles.contains(&"Groceries"));
        assert!(!titles.contains(&"Metro"));
        assert_eq!(titles.len(), 3);

        assert_eq!(
            filter_by_period(&txns, Period::All, reference, Weekday::Mon).count(),
            4
        );
        assert_eq!(
            filter_by_period(&txns, Period::Today, reference, Weekday::Mon).count(),
            1
        );
    }

    #[test]
    fn test_filter_by_type() {
        let (_, txns) = fixtures();
        assert_eq!(filter_by_type(&txns, None).count(), 4);
        assert_eq!(
            filter_by_type(&txns, Some(TransactionType::Income)).count(),
            1
        );
        assert_eq!(
            filter_by_type(&txns, Some(TransactionType::Expense)).count(),
            3
        );
    }

    #[test]
    fn test_search_matches_title_and_note() {
        let (categories, txns) = fixtures();

        let found: Vec<_> = search_text(&txns, "Lunch", &categories)
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(found, vec!["Lunch with client", "Groceries"]);

        // Category names are searched too
        assert_eq!(search_text(&txns, "transport", &categories).count(), 1);

        // Absent notes simply do not match
        assert_eq!(search_text(&txns, "receipt", &categories).count(), 1);

        assert_eq!(search_text(&txns, "", &categories).count(), 4);
        assert_eq!(search_text(&txns, "zzz", &categories).count(), 0);
    }

    #[test]
    fn test_filters_chain() {
        let (categories, txns) = fixtures();
        let dining = categories[0].id;
        let december = DateRange::month_containing(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());

        let total: Money = filter_by_range(filter_by_category(&txns, dining), december)
            .map(|t| t.amount)
            .sum();
        assert_eq!(total, Money::from_major(40));
    }
}
