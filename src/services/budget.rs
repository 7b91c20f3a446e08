//! Budget service
//!
//! Creates and maintains category caps and projects their spend from the
//! transaction store on every read.

use chrono::{NaiveDate, Weekday};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{BudgetMillError, BudgetMillResult};
use crate::models::{
    Budget, BudgetId, BudgetPeriod, BudgetStatus, BudgetTotals, CategoryId, DateRange, Money,
    DEFAULT_WARNING_PERCENT,
};
use crate::reports::CategoryLookup;
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a mut Storage,
    week_start: Weekday,
    warning_percent: u8,
}

/// Where a new budget's window comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetWindow {
    /// The calendar week, month or year containing this date
    Calendar(NaiveDate),
    /// An explicit `[start, end)` date range
    Explicit(DateRange),
}

/// Input for creating a budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub category_id: CategoryId,
    pub cap: Money,
    pub period: BudgetPeriod,
    pub window: BudgetWindow,
}

impl<'a> BudgetService<'a> {
    /// Service with Monday weeks and the default warning threshold
    pub fn new(storage: &'a mut Storage) -> Self {
        Self {
            storage,
            week_start: Weekday::Mon,
            warning_percent: DEFAULT_WARNING_PERCENT,
        }
    }

    /// Service using the week start and threshold from the user's settings
    pub fn with_settings(storage: &'a mut Storage, settings: &Settings) -> Self {
        Self {
            storage,
            week_start: settings.first_weekday,
            warning_percent: settings.budget_warning_percent,
        }
    }

    /// Budgets may only cap existing expense categories
    fn check_category(&self, category_id: CategoryId) -> BudgetMillResult<()> {
        let category = self
            .storage
            .categories
            .get(category_id)
            .ok_or_else(|| BudgetMillError::category_not_found(category_id.to_string()))?;

        if !category.kind.is_expense() {
            return Err(BudgetMillError::Validation(format!(
                "Budgets can only be set on expense categories; '{}' is {}",
                category.name, category.kind
            )));
        }
        Ok(())
    }

    fn check_no_overlap(&self, budget: &Budget) -> BudgetMillResult<()> {
        let clash = self
            .storage
            .budgets
            .for_category(budget.category_id)
            .any(|b| b.id != budget.id && b.start < budget.end && budget.start < b.end);
        if clash {
            return Err(BudgetMillError::Duplicate {
                entity_type: "Budget",
                identifier: format!(
                    "{} .. {}",
                    budget.start.format("%Y-%m-%d"),
                    budget.end.format("%Y-%m-%d")
                ),
            });
        }
        Ok(())
    }

    fn store_new(&mut self, budget: Budget) -> BudgetMillResult<Budget> {
        budget
            .validate()
            .map_err(|e| BudgetMillError::Validation(e.to_string()))?;
        self.check_category(budget.category_id)?;
        self.check_no_overlap(&budget)?;

        self.storage.budgets.insert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage
            .log_create(EntityType::Budget, budget.id.to_string(), None, &budget)?;
        info!(
            id = %budget.id,
            category = %budget.category_id,
            cap = %budget.cap,
            start = %budget.start,
            "budget created"
        );

        Ok(budget)
    }

    /// Create a budget for an expense category
    pub fn create(&mut self, input: CreateBudgetInput) -> BudgetMillResult<Budget> {
        let budget = match input.window {
            BudgetWindow::Calendar(reference) => Budget::for_window(
                input.category_id,
                input.cap,
                input.period,
                reference,
                self.week_start,
            ),
            BudgetWindow::Explicit(range) => Budget::new(
                input.category_id,
                input.cap,
                input.period,
                range.start_datetime(),
                range.end_datetime(),
            ),
        };
        self.store_new(budget)
    }

    pub fn get(&self, id: BudgetId) -> BudgetMillResult<Budget> {
        self.storage
            .budgets
            .get(id)
            .cloned()
            .ok_or_else(|| BudgetMillError::budget_not_found(id.to_string()))
    }

    /// Find by full, prefixed or short ID
    pub fn find(&self, identifier: &str) -> BudgetMillResult<Budget> {
        self.storage
            .budgets
            .find(identifier)?
            .cloned()
            .ok_or_else(|| BudgetMillError::budget_not_found(identifier))
    }

    /// All budgets ordered by window start
    pub fn list(&self) -> Vec<Budget> {
        let mut budgets: Vec<Budget> = self.storage.budgets.iter().cloned().collect();
        budgets.sort_by(|a, b| a.start.cmp(&b.start));
        budgets
    }

    /// Budgets whose category name contains `text`, ignoring case; blank text matches all
    pub fn search(&self, text: &str) -> Vec<Budget> {
        let needle = text.trim().to_lowercase();
        let categories = &self.storage.categories;
        self.list()
            .into_iter()
            .filter(|b| {
                needle.is_empty()
                    || categories
                        .category_name(b.category_id)
                        .map_or(false, |name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn compute(&self, budget: &Budget) -> BudgetStatus {
        BudgetStatus::compute_with_threshold(
            budget,
            self.storage.transactions.iter(),
            self.warning_percent,
        )
    }

    /// Current spend-vs-cap status of one budget
    pub fn status(&self, id: BudgetId) -> BudgetMillResult<BudgetStatus> {
        let budget = self
            .storage
            .budgets
            .get(id)
            .ok_or_else(|| BudgetMillError::budget_not_found(id.to_string()))?;
        Ok(self.compute(budget))
    }

    /// Status of every budget, ordered by window start
    pub fn statuses(&self) -> Vec<BudgetStatus> {
        let statuses: Vec<BudgetStatus> = self.list().iter().map(|b| self.compute(b)).collect();
        debug!(count = statuses.len(), "computed budget statuses");
        statuses
    }

    /// Statuses of the budgets whose window contains `date`
    pub fn statuses_on(&self, date: NaiveDate) -> Vec<BudgetStatus> {
        let Some(at) = date.and_hms_opt(0, 0, 0) else {
            return Vec::new();
        };
        self.list()
            .iter()
            .filter(|b| b.start <= at && at < b.end)
            .map(|b| self.compute(b))
            .collect()
    }

    /// Totals across every budget
    pub fn totals(&self) -> BudgetTotals {
        BudgetTotals::across(&self.statuses())
    }

    pub fn update_cap(&mut self, id: BudgetId, cap: Money) -> BudgetMillResult<Budget> {
        let before = self.get(id)?;
        let mut budget = before.clone();
        budget.set_cap(cap);
        budget
            .validate()
            .map_err(|e| BudgetMillError::Validation(e.to_string()))?;

        self.storage.budgets.replace(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            None,
            &before,
            &budget,
        )?;
        info!(%id, cap = %cap, "budget cap updated");

        Ok(budget)
    }

    pub fn remove(&mut self, id: BudgetId) -> BudgetMillResult<Budget> {
        let budget = self
            .storage
            .budgets
            .remove(id)
            .ok_or_else(|| BudgetMillError::budget_not_found(id.to_string()))?;
        self.storage.budgets.save()?;

        self.storage
            .log_delete(EntityType::Budget, budget.id.to_string(), None, &budget)?;
        info!(%id, "budget removed");

        Ok(budget)
    }

    /// Create the budget for the window right after `id`'s, with the same cap
    pub fn renew(&mut self, id: BudgetId) -> BudgetMillResult<Budget> {
        let current = self.get(id)?;
        self.store_new(current.next_period(self.week_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetHealth, Transaction, TransactionType};
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn dining(storage: &Storage) -> CategoryId {
        storage
            .categories
            .find_by_name("Dining", Some(TransactionType::Expense))
            .unwrap()
            .id
    }

    fn december(category_id: CategoryId, cap: i64) -> CreateBudgetInput {
        CreateBudgetInput {
            category_id,
            cap: Money::from_major(cap),
            period: BudgetPeriod::Monthly,
            window: BudgetWindow::Calendar(date(2024, 12, 19)),
        }
    }

    fn spend(storage: &mut Storage, category_id: CategoryId, major: i64, at: NaiveDateTime) {
        storage
            .transactions
            .insert(Transaction::new(
                "spend",
                Money::from_major(major),
                TransactionType::Expense,
                category_id,
                at,
            ))
            .unwrap();
    }

    #[test]
    fn test_create_calendar_window() {
        let mut storage = Storage::in_memory();
        let food = dining(&storage);
        let mut service = BudgetService::new(&mut storage);

        let budget = service.create(december(food, 1000)).unwrap();
        assert_eq!(budget.start, date(2024, 12, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(budget.end, date(2025, 1, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(service.list().len(), 1);
    }

    #[test]
    fn test_create_rejects_income_and_unknown_categories() {
        let mut storage = Storage::in_memory();
        let salary = storage.categories.find_by_name("Salary", None).unwrap().id;
        let mut service = BudgetService::new(&mut storage);

        assert!(service.create(december(salary, 100)).unwrap_err().is_validation());
        assert!(service
            .create(december(CategoryId::new(), 100))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_create_rejects_bad_values() {
        let mut storage = Storage::in_memory();
        let food = dining(&storage);
        let mut service = BudgetService::new(&mut storage);

        assert!(service.create(december(food, -5)).unwrap_err().is_validation());

        service.create(december(food, 500)).unwrap();
        assert!(matches!(
            service.create(december(food, 700)),
            Err(BudgetMillError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_status_reflects_transactions() {
        let mut storage = Storage::in_memory();
        let food = dining(&storage);
        let id = BudgetService::new(&mut storage)
            .create(december(food, 1000))
            .unwrap()
            .id;

        spend(&mut storage, food, 300, noon(2024, 12, 1));
        spend(&mut storage, food, 400, noon(2024, 12, 15));
        spend(&mut storage, food, 350, noon(2024, 12, 29));
        spend(&mut storage, food, 999, date(2025, 1, 1).and_hms_opt(0, 0, 0).unwrap());

        let service = BudgetService::new(&mut storage);
        let status = service.status(id).unwrap();
        assert_eq!(status.spent, Money::from_major(1050));
        assert_eq!(status.remaining, Money::zero());
        assert!(status.is_over_budget);
        assert_eq!(status.progress, 1.0);
        assert_eq!(status.health, BudgetHealth::OverBudget);

        let totals = service.totals();
        assert_eq!(totals.total_remaining, Money::from_major(-50));
    }

    #[test]
    fn test_warning_threshold_from_settings() {
        let mut storage = Storage::in_memory();
        let food = dining(&storage);
        let id = BudgetService::new(&mut storage)
            .create(december(food, 100))
            .unwrap()
            .id;
        spend(&mut storage, food, 60, noon(2024, 12, 2));

        let default = BudgetService::new(&mut storage).status(id).unwrap();
        assert_eq!(default.health, BudgetHealth::Normal);

        let settings = Settings {
            budget_warning_percent: 50,
            ..Settings::default()
        };
        let strict = BudgetService::with_settings(&mut storage, &settings)
            .status(id)
            .unwrap();
        assert_eq!(strict.health, BudgetHealth::ApproachingLimit);
    }

    #[test]
    fn test_update_cap_and_remove() {
        let mut storage = Storage::in_memory();
        let food = dining(&storage);
        let mut service = BudgetService::new(&mut storage);
        let id = service.create(december(food, 100)).unwrap().id;

        let updated = service.update_cap(id, Money::from_major(250)).unwrap();
        assert_eq!(updated.cap, Money::from_major(250));
        assert!(service
            .update_cap(id, Money::from_major(-1))
            .unwrap_err()
            .is_validation());

        service.remove(id).unwrap();
        assert!(service.status(id).unwrap_err().is_not_found());
        assert!(service.remove(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_renew_creates_next_window() {
        let mut storage = Storage::in_memory();
        let food = dining(&storage);
        let mut service = BudgetService::new(&mut storage);
        let current = service.create(december(food, 800)).unwrap();

        let next = service.renew(current.id).unwrap();
        assert_eq!(next.cap, current.cap);
        assert_eq!(next.start, current.end);
        assert_eq!(next.end, date(2025, 2, 1).and_hms_opt(0, 0, 0).unwrap());

        // Renewing the same budget again would duplicate January
        assert!(matches!(
            service.renew(current.id),
            Err(BudgetMillError::Duplicate { .. })
        ));

        assert_eq!(service.statuses_on(date(2025, 1, 10)).len(), 1);
        assert_eq!(service.statuses().len(), 2);
    }

    #[test]
    fn test_search_by_category_name() {
        let mut storage = Storage::in_memory();
        let food = dining(&storage);
        let transport = storage
            .categories
            .find_by_name("Transport", Some(TransactionType::Expense))
            .unwrap()
            .id;
        let mut service = BudgetService::new(&mut storage);
        service.create(december(food, 800)).unwrap();
        service.create(december(transport, 300)).unwrap();

        let found = service.search("DIN");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category_id, food);

        assert_eq!(service.search("port")[0].category_id, transport);
        assert!(service.search("rent").is_empty());
        assert_eq!(service.search("  ").len(), 2);
    }

    #[test]
    fn test_explicit_window() {
        let mut storage = Storage::in_memory();
        let food = dining(&storage);
        let mut service = BudgetService::new(&mut storage);

        let trip = DateRange::inclusive(date(2024, 12, 20), date(2024, 12, 27)).unwrap();
        let budget = service
            .create(CreateBudgetInput {
                category_id: food,
                cap: Money::from_major(200),
                period: BudgetPeriod::Weekly,
                window: BudgetWindow::Explicit(trip),
            })
            .unwrap();
        assert_eq!(budget.end, date(2024, 12, 28).and_hms_opt(0, 0, 0).unwrap());
    }
}
