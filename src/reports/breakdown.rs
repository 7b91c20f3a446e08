//! Category totals and the per-category breakdown behind the donut chart

use std::collections::HashMap;

use crate::models::{CategoryId, Money, Transaction, TransactionType};

use super::filters::CategoryLookup;

/// Sum amounts per category
///
/// Categories without a matching transaction are absent from the map.
pub fn group_by_category<'a, I>(transactions: I) -> HashMap<CategoryId, Money>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: HashMap<CategoryId, Money> = HashMap::new();
    for txn in transactions {
        *totals.entry(txn.category_id).or_default() += txn.amount;
    }
    totals
}

/// One slice of the breakdown
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryShare {
    pub category_id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: Money,
    pub count: usize,
    /// Share of the breakdown total, 0-100
    pub percent: f64,
}

/// Per-category totals for one transaction type, largest first
#[derive(Debug, Clone, serde::Serialize)]
pub struct CategoryBreakdown {
    pub kind: TransactionType,
    pub total: Money,
    pub shares: Vec<CategoryShare>,
}

impl CategoryBreakdown {
    /// Build the breakdown of `kind` transactions
    ///
    /// Transactions whose category is unknown are grouped under "Unknown".
    pub fn generate<'a, I, L>(transactions: I, kind: TransactionType, categories: &L) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
        L: CategoryLookup + ?Sized,
    {
        let mut totals: HashMap<CategoryId, (Money, usize)> = HashMap::new();
        for txn in transactions.into_iter().filter(|t| t.kind == kind) {
            let entry = totals.entry(txn.category_id).or_default();
            entry.0 += txn.amount;
            entry.1 += 1;
        }

        let total: Money = totals.values().map(|(amount, _)| *amount).sum();

        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|(category_id, (amount, count))| {
                let (name, icon, color) = match categories.category(category_id) {
                    Some(c) => (c.name.clone(), c.icon.clone(), c.color.clone()),
                    None => (
                        "Unknown".to_string(),
                        "questionmark.circle".to_string(),
                        "#8E8E93".to_string(),
                    ),
                };
                CategoryShare {
                    category_id,
                    name,
                    icon,
                    color,
                    total: amount,
                    count,
                    percent: amount.ratio(total) * 100.0,
                }
            })
            .collect();

        shares.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

        Self {
            kind,
            total,
            shares,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, PresetCategory};
    use chrono::NaiveDate;

    fn txn(category: &Category, major: i64, kind: TransactionType) -> Transaction {
        Transaction::new(
            "t",
            Money::from_major(major),
            kind,
            category.id,
            NaiveDate::from_ymd_opt(2024, 12, 19)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_group_by_category() {
        let food = PresetCategory::Dining.to_category();
        let transport = PresetCategory::Transport.to_category();
        let housing = PresetCategory::Housing.to_category();
        let txns = vec![
            txn(&food, 25, TransactionType::Expense),
            txn(&food, 15, TransactionType::Expense),
            txn(&transport, 6, TransactionType::Expense),
        ];

        let totals = group_by_category(&txns);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&food.id], Money::from_major(40));
        assert_eq!(totals[&transport.id], Money::from_major(6));
        assert!(!totals.contains_key(&housing.id));
    }

    #[test]
    fn test_breakdown_sorted_with_percentages() {
        let food = PresetCategory::Dining.to_category();
        let transport = PresetCategory::Transport.to_category();
        let salary = PresetCategory::Salary.to_category();
        let categories = vec![food.clone(), transport.clone(), salary.clone()];
        let txns = vec![
            txn(&transport, 25, TransactionType::Expense),
            txn(&food, 50, TransactionType::Expense),
            txn(&food, 25, TransactionType::Expense),
            txn(&salary, 9000, TransactionType::Income),
        ];

        let breakdown = CategoryBreakdown::generate(&txns, TransactionType::Expense, &categories);
        assert_eq!(breakdown.total, Money::from_major(100));
        assert_eq!(breakdown.shares.len(), 2);

        let first = &breakdown.shares[0];
        assert_eq!(first.name, "Dining");
        assert_eq!(first.color, "#FF9500");
        assert_eq!(first.count, 2);
        assert!((first.percent - 75.0).abs() < 1e-9);
        assert!((breakdown.shares[1].percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_empty() {
        let categories: Vec<Category> = Vec::new();
        let breakdown =
            CategoryBreakdown::generate(&Vec::<Transaction>::new(), TransactionType::Income, &categories);
        assert!(breakdown.is_empty());
        assert_eq!(breakdown.total, Money::zero());
    }

    #[test]
    fn test_unknown_category() {
        let orphan = PresetCategory::Dining.to_category();
        let txns = vec![txn(&orphan, 10, TransactionType::Expense)];
        let categories: Vec<Category> = Vec::new();

        let breakdown = CategoryBreakdown::generate(&txns, TransactionType::Expense, &categories);
        assert_eq!(breakdown.shares[0].name, "Unknown");
    }
}
