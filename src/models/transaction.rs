//! Transaction model
//!
//! A transaction is a single expense or income record. The stored amount is
//! always positive; its sign is derived from the transaction type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Whether money left or entered the user's pocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    /// Parse a transaction type from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" | "out" | "spend" => Some(Self::Expense),
            "income" | "in" | "earn" => Some(Self::Income),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

/// Repeat interval for recurring transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringInterval {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Some(Self::Daily),
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "yearly" | "year" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for RecurringInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Short description ("Lunch with client")
    pub title: String,

    /// Amount, always positive
    pub amount: Money,

    /// Expense or income
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Category this transaction is filed under
    pub category_id: CategoryId,

    /// Local wall-clock date and time
    pub date: NaiveDateTime,

    /// Free-form note
    #[serde(default)]
    pub note: Option<String>,

    /// Repeat interval; `Some` means the transaction is recurring
    #[serde(default)]
    pub recurrence: Option<RecurringInterval>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        title: impl Into<String>,
        amount: Money,
        kind: TransactionType,
        category_id: CategoryId,
        date: NaiveDateTime,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            title: title.into(),
            amount,
            kind,
            category_id,
            date,
            note: None,
            recurrence: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style note setter; blank notes are stored as `None`
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = normalize_note(Some(note.into()));
        self
    }

    /// Builder-style recurrence setter
    pub fn with_recurrence(mut self, interval: RecurringInterval) -> Self {
        self.recurrence = Some(interval);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn is_expense(&self) -> bool {
        self.kind.is_expense()
    }

    pub fn is_income(&self) -> bool {
        self.kind.is_income()
    }

    /// Calendar date of the transaction
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Amount with sign applied: negative for expenses
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionType::Expense => -self.amount,
            TransactionType::Income => self.amount,
        }
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.title.trim().is_empty() {
            return Err(TransactionValidationError::EmptyTitle);
        }

        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if !self.amount.is_within_limit() {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.title,
            self.signed_amount()
        )
    }
}

/// Trim a note and collapse blank input to `None`
pub fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Parse a local timestamp: "2024-12-19 12:30", "2024-12-19T12:30:00" or a
/// bare date (midnight)
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyTitle,
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Transaction title cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive, got {}", amount)
            }
            Self::AmountTooLarge(amount) => write!(
                f,
                "Transaction amount {} exceeds the maximum of {}",
                amount,
                Money::MAX_AMOUNT
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
