//! Transaction service
//!
//! The transaction store's business rules: every insert and update checks
//! the amount, the title and that the category exists with a matching type.

use chrono::{NaiveDate, NaiveDateTime, Utc, Weekday};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{BudgetMillError, BudgetMillResult};
use crate::models::transaction::{normalize_note, parse_timestamp};
use crate::models::{
    CategoryId, DateRange, Money, Period, RecurringInterval, Transaction, TransactionId,
    TransactionType,
};
use crate::reports::filters::{matches_text, CategoryLookup};
use crate::storage::{CategoryRepository, Storage};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a mut Storage,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub amount: Money,
    pub kind: TransactionType,
    pub category_id: CategoryId,
    pub date: NaiveDateTime,
    pub note: Option<String>,
    pub recurrence: Option<RecurringInterval>,
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub title: Option<String>,
    pub amount: Option<Money>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub date: Option<NaiveDateTime>,
    /// `Some(None)` clears the note
    pub note: Option<Option<String>>,
    /// `Some(None)` stops the recurrence
    pub recurrence: Option<Option<RecurringInterval>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.category_id.is_none()
            && self.date.is_none()
            && self.note.is_none()
            && self.recurrence.is_none()
    }
}

/// Structured query over the store; unset fields do not filter
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub id: Option<TransactionId>,
    pub kind: Option<TransactionType>,
    pub category_id: Option<CategoryId>,
    pub range: Option<DateRange>,
    pub text: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: TransactionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Restrict to a calendar period around `reference`; `Period::All` clears the range
    pub fn period(mut self, period: Period, reference: NaiveDate, week_start: Weekday) -> Self {
        self.range = period.range(reference, week_start);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Cap the number of results returned by `list`
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `txn` satisfies every set criterion
    pub fn matches<L>(&self, txn: &Transaction, categories: &L) -> bool
    where
        L: CategoryLookup + ?Sized,
    {
        self.id.map_or(true, |id| txn.id == id)
            && self.kind.map_or(true, |k| txn.kind == k)
            && self.category_id.map_or(true, |c| txn.category_id == c)
            && self.range.map_or(true, |r| r.contains(txn.day()))
            && self
                .text
                .as_deref()
                .map_or(true, |t| matches_text(txn, &t.trim().to_lowercase(), categories))
    }
}

/// Raw text input from an entry form or command line
#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    pub title: String,
    pub amount: String,
    pub kind: String,
    /// Category name or ID
    pub category: String,
    /// Empty means "now"
    pub date: Option<String>,
    pub note: Option<String>,
    /// "none" or empty means not recurring
    pub repeat: Option<String>,
}

impl TransactionForm {
    /// Validate and convert the form into a `NewTransaction`
    pub fn parse(
        &self,
        categories: &CategoryRepository,
        now: NaiveDateTime,
    ) -> BudgetMillResult<NewTransaction> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(BudgetMillError::Validation("Title is required".into()));
        }

        let amount = Money::parse(&self.amount)
            .map_err(|e| BudgetMillError::Validation(e.to_string()))?;
        if !amount.is_positive() {
            return Err(BudgetMillError::Validation(format!(
                "Amount must be greater than zero, got {}",
                amount
            )));
        }

        let kind = TransactionType::parse(&self.kind).ok_or_else(|| {
            BudgetMillError::Validation(format!(
                "Invalid type '{}': expected expense or income",
                self.kind
            ))
        })?;

        let category = match categories.find(&self.category, Some(kind))? {
            Some(category) => category,
            None => categories
                .find(&self.category, None)?
                .ok_or_else(|| BudgetMillError::category_not_found(self.category.trim()))?,
        };
        if category.kind != kind {
            return Err(BudgetMillError::Validation(format!(
                "Category '{}' is an {} category but the transaction is an {}",
                category.name, category.kind, kind
            )));
        }

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(text) => parse_timestamp(text).ok_or_else(|| {
                BudgetMillError::Validation(format!(
                    "Invalid date '{}': use YYYY-MM-DD or YYYY-MM-DD HH:MM",
                    text
                ))
            })?,
        };

        let recurrence = match self.repeat.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) if text.eq_ignore_ascii_case("none") => None,
            Some(text) => Some(RecurringInterval::parse(text).ok_or_else(|| {
                BudgetMillError::Validation(format!(
                    "Invalid repeat interval '{}': expected daily, weekly, monthly or yearly",
                    text
                ))
            })?),
        };

        Ok(NewTransaction {
            title: title.to_string(),
            amount,
            kind,
            category_id: category.id,
            date,
            note: normalize_note(self.note.clone()),
            recurrence,
        })
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Check the category exists and accepts transactions of `kind`
    fn check_category(&self, category_id: CategoryId, kind: TransactionType) -> BudgetMillResult<()> {
        let category = self
            .storage
            .categories
            .get(category_id)
            .ok_or_else(|| BudgetMillError::category_not_found(category_id.to_string()))?;

        if category.kind != kind {
            return Err(BudgetMillError::Validation(format!(
                "Category '{}' is an {} category but the transaction is an {}",
                category.name, category.kind, kind
            )));
        }
        Ok(())
    }

    /// Validate and append a transaction
    pub fn add(&mut self, input: NewTransaction) -> BudgetMillResult<TransactionId> {
        let mut txn = Transaction::new(
            input.title.trim(),
            input.amount,
            input.kind,
            input.category_id,
            input.date,
        );
        txn.note = normalize_note(input.note);
        txn.recurrence = input.recurrence;

        txn.validate()
            .map_err(|e| BudgetMillError::Validation(e.to_string()))?;
        self.check_category(txn.category_id, txn.kind)?;

        let id = txn.id;
        self.storage.transactions.insert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            id.to_string(),
            Some(txn.title.clone()),
            &txn,
        )?;
        info!(%id, title = %txn.title, amount = %txn.amount, kind = %txn.kind, "transaction added");

        Ok(id)
    }

    pub fn get(&self, id: TransactionId) -> BudgetMillResult<Transaction> {
        self.storage
            .transactions
            .get(id)
            .cloned()
            .ok_or_else(|| BudgetMillError::transaction_not_found(id.to_string()))
    }

    /// Find by full, prefixed or short ID
    pub fn find(&self, identifier: &str) -> BudgetMillResult<Transaction> {
        self.storage
            .transactions
            .find(identifier)?
            .cloned()
            .ok_or_else(|| BudgetMillError::transaction_not_found(identifier))
    }

    /// Lazily iterate the store in insertion order, filtered by `query`
    ///
    /// The `limit` field is ignored here; see [`TransactionService::list`].
    pub fn query<'q>(&'q self, query: &'q TransactionQuery) -> impl Iterator<Item = &'q Transaction> + 'q {
        let categories = &self.storage.categories;
        self.storage
            .transactions
            .iter()
            .filter(move |&t| query.matches(t, categories))
    }

    /// Lazily iterate the store filtered by an arbitrary predicate
    pub fn query_by<'q, P>(&'q self, predicate: P) -> impl Iterator<Item = &'q Transaction> + 'q
    where
        P: Fn(&Transaction) -> bool + 'q,
    {
        self.storage.transactions.iter().filter(move |&t| predicate(t))
    }

    /// Matching transactions, newest first, honoring `limit`
    pub fn list(&self, query: &TransactionQuery) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self.query(query).cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        if let Some(limit) = query.limit {
            transactions.truncate(limit);
        }
        debug!(count = transactions.len(), "listed transactions");
        transactions
    }

    pub fn count(&self) -> usize {
        self.storage.transactions.count()
    }

    /// Apply a patch, re-running every rule `add` enforces
    pub fn update(&mut self, id: TransactionId, patch: TransactionPatch) -> BudgetMillResult<Transaction> {
        let before = self.get(id)?;
        let mut txn = before.clone();

        if let Some(title) = patch.title {
            txn.title = title.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            txn.amount = amount;
        }
        if let Some(kind) = patch.kind {
            txn.kind = kind;
        }
        if let Some(category_id) = patch.category_id {
            txn.category_id = category_id;
        }
        if let Some(date) = patch.date {
            txn.date = date;
        }
        if let Some(note) = patch.note {
            txn.note = normalize_note(note);
        }
        if let Some(recurrence) = patch.recurrence {
            txn.recurrence = recurrence;
        }

        txn.validate()
            .map_err(|e| BudgetMillError::Validation(e.to_string()))?;
        self.check_category(txn.category_id, txn.kind)?;
        txn.updated_at = Utc::now();

        self.storage.transactions.replace(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.title.clone()),
            &before,
            &txn,
        )?;
        info!(%id, "transaction updated");

        Ok(txn)
    }

    pub fn remove(&mut self, id: TransactionId) -> BudgetMillResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .remove(id)
            .ok_or_else(|| BudgetMillError::transaction_not_found(id.to_string()))?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.title.clone()),
            &txn,
        )?;
        info!(%id, "transaction removed");

        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn category(storage: &Storage, name: &str, kind: TransactionType) -> CategoryId {
        storage.categories.find_by_name(name, Some(kind)).unwrap().id
    }

    fn lunch(category_id: CategoryId) -> NewTransaction {
        NewTransaction {
            title: "Lunch with client".into(),
            amount: Money::from_major(25),
            kind: TransactionType::Expense,
            category_id,
            date: at(2024, 12, 19, 12),
            note: None,
            recurrence: None,
        }
    }

    #[test]
    fn test_add_then_query_by_id() {
        let mut storage = Storage::in_memory();
        let dining = category(&storage, "Dining", TransactionType::Expense);
        let mut service = TransactionService::new(&mut storage);

        let id = service.add(lunch(dining)).unwrap();

        let query = TransactionQuery::new().id(id);
        let found: Vec<_> = service.query(&query).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Lunch with client");
        assert_eq!(found[0].amount, Money::from_major(25));
        assert_eq!(*found[0], service.get(id).unwrap());
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut storage = Storage::in_memory();
        let dining = category(&storage, "Dining", TransactionType::Expense);
        let salary = category(&storage, "Salary", TransactionType::Income);
        let mut service = TransactionService::new(&mut storage);

        let mut zero = lunch(dining);
        zero.amount = Money::zero();
        assert!(service.add(zero).unwrap_err().is_validation());

        let mut untitled = lunch(dining);
        untitled.title = "  ".into();
        assert!(service.add(untitled).unwrap_err().is_validation());

        let mut mismatched = lunch(salary);
        mismatched.kind = TransactionType::Expense;
        assert!(service.add(mismatched).unwrap_err().is_validation());

        assert!(service.add(lunch(CategoryId::new())).unwrap_err().is_not_found());
        assert_eq!(service.count(), 0);
    }

    #[test]
    fn test_update_revalidates() {
        let mut storage = Storage::in_memory();
        let dining = category(&storage, "Dining", TransactionType::Expense);
        let transport = category(&storage, "Transport", TransactionType::Expense);
        let salary = category(&storage, "Salary", TransactionType::Income);
        let mut service = TransactionService::new(&mut storage);
        let id = service.add(lunch(dining)).unwrap();

        let updated = service
            .update(
                id,
                TransactionPatch {
                    amount: Some(Money::from_major(30)),
                    category_id: Some(transport),
                    note: Some(Some("taxi back".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, Money::from_major(30));
        assert_eq!(updated.category_id, transport);
        assert_eq!(updated.note.as_deref(), Some("taxi back"));

        let bad_amount = service.update(
            id,
            TransactionPatch {
                amount: Some(Money::from_cents(-1)),
                ..Default::default()
            },
        );
        assert!(bad_amount.unwrap_err().is_validation());

        let bad_category = service.update(
            id,
            TransactionPatch {
                category_id: Some(salary),
                ..Default::default()
            },
        );
        assert!(bad_category.unwrap_err().is_validation());

        // Switching type together with a matching category is fine
        let switched = service
            .update(
                id,
                TransactionPatch {
                    kind: Some(TransactionType::Income),
                    category_id: Some(salary),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(switched.is_income());

        assert!(service
            .update(TransactionId::new(), TransactionPatch::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_remove() {
        let mut storage = Storage::in_memory();
        let dining = category(&storage, "Dining", TransactionType::Expense);
        let mut service = TransactionService::new(&mut storage);
        let id = service.add(lunch(dining)).unwrap();

        let removed = service.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(service.count(), 0);
        assert!(service.remove(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_sorted_and_limited() {
        let mut storage = Storage::in_memory();
        let dining = category(&storage, "Dining", TransactionType::Expense);
        let mut service = TransactionService::new(&mut storage);

        for (day, title) in [(3, "middle"), (1, "oldest"), (9, "newest")] {
            let mut input = lunch(dining);
            input.title = title.into();
            input.date = at(2024, 12, day, 8);
            service.add(input).unwrap();
        }

        let all = service.list(&TransactionQuery::new());
        let titles: Vec<_> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle", "oldest"]);

        let limited = service.list(&TransactionQuery::new().limit(2));
        assert_eq!(limited.len(), 2);

        // query() keeps insertion order
        let all_query = TransactionQuery::new();
        let first = service.query(&all_query).next().unwrap();
        assert_eq!(first.title, "middle");
    }

    #[test]
    fn test_query_filters() {
        let mut storage = Storage::in_memory();
        let dining = category(&storage, "Dining", TransactionType::Expense);
        let salary = category(&storage, "Salary", TransactionType::Income);
        let mut service = TransactionService::new(&mut storage);

        service.add(lunch(dining)).unwrap();
        service
            .add(NewTransaction {
                title: "Pay".into(),
                amount: Money::from_major(9000),
                kind: TransactionType::Income,
                category_id: salary,
                date: at(2024, 11, 30, 9),
                note: Some("November".into()),
                recurrence: Some(RecurringInterval::Monthly),
            })
            .unwrap();

        let reference = NaiveDate::from_ymd_opt(2024, 12, 19).unwrap();
        let december = TransactionQuery::new().period(Period::ThisMonth, reference, Weekday::Mon);
        assert_eq!(service.query(&december).count(), 1);

        let income = TransactionQuery::new().kind(TransactionType::Income);
        assert_eq!(service.query(&income).count(), 1);

        let by_note = TransactionQuery::new().text("november");
        assert_eq!(service.query(&by_note).count(), 1);

        let by_category_name = TransactionQuery::new().text("DINING");
        assert_eq!(service.query(&by_category_name).count(), 1);

        let recurring: Vec<_> = service.query_by(|t| t.is_recurring()).collect();
        assert_eq!(recurring.len(), 1);
        assert_eq!(recurring[0].title, "Pay");
    }

    #[test]
    fn test_form_parsing() {
        let storage = Storage::in_memory();
        let now = at(2024, 12, 19, 20);

        let form = TransactionForm {
            title: " Coffee ".into(),
            amount: "4.5".into(),
            kind: "expense".into(),
            category: "dining".into(),
            date: None,
            note: Some("".into()),
            repeat: Some("daily".into()),
        };
        let input = form.parse(&storage.categories, now).unwrap();
        assert_eq!(input.title, "Coffee");
        assert_eq!(input.amount, Money::from_cents(450));
        assert_eq!(input.date, now);
        assert_eq!(input.note, None);
        assert_eq!(input.recurrence, Some(RecurringInterval::Daily));

        let dated = TransactionForm {
            date: Some("2024-12-01 08:15".into()),
            repeat: Some("none".into()),
            ..form.clone()
        };
        let input = dated.parse(&storage.categories, now).unwrap();
        assert_eq!(input.date.format("%H:%M").to_string(), "08:15");
        assert_eq!(input.recurrence, None);

        let bad_date = TransactionForm {
            date: Some("yesterday".into()),
            ..form.clone()
        };
        assert!(bad_date.parse(&storage.categories, now).unwrap_err().is_validation());

        let bad_amount = TransactionForm {
            amount: "four".into(),
            ..form.clone()
        };
        assert!(bad_amount.parse(&storage.categories, now).unwrap_err().is_validation());

        let no_title = TransactionForm {
            title: "".into(),
            ..form.clone()
        };
        assert!(no_title.parse(&storage.categories, now).unwrap_err().is_validation());

        let wrong_kind_category = TransactionForm {
            category: "Salary".into(),
            ..form.clone()
        };
        let err = wrong_kind_category.parse(&storage.categories, now).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("income category"));

        let unknown_category = TransactionForm {
            category: "Groceries".into(),
            ..form.clone()
        };
        assert!(unknown_category
            .parse(&storage.categories, now)
            .unwrap_err()
            .is_not_found());

        let huge = TransactionForm {
            amount: "50000000000000000".into(),
            ..form.clone()
        };
        assert!(huge.parse(&storage.categories, now).unwrap_err().is_validation());
    }

    #[test]
    fn test_add_rejects_amount_above_limit() {
        let mut storage = Storage::in_memory();
        let dining = category(&storage, "Dining", TransactionType::Expense);
        let mut service = TransactionService::new(&mut storage);

        let mut huge = lunch(dining);
        huge.amount = Money::from_cents(5_000_000_000_000_000);
        assert!(service.add(huge).unwrap_err().is_validation());

        let mut largest = lunch(dining);
        largest.amount = Money::MAX_AMOUNT;
        let id = service.add(largest).unwrap();

        let too_much = service.update(
            id,
            TransactionPatch {
                amount: Some(Money::MAX_AMOUNT + Money::from_cents(1)),
                ..Default::default()
            },
        );
        assert!(too_much.unwrap_err().is_validation());
        assert_eq!(service.count(), 1);
    }
}
