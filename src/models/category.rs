//! Category model and the preset catalog
//!
//! Every category is either an expense or an income category. Its type is
//! fixed at creation; transactions may only be filed under a category of the
//! same type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::money::Money;
use super::transaction::TransactionType;

/// Maximum category name length in characters
pub const MAX_NAME_LEN: usize = 50;

/// A spending or income category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Symbolic icon name ("fork.knife")
    pub icon: String,

    /// Hex color ("#FF9500")
    pub color: String,

    /// Expense or income; immutable after creation
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Optional monthly cap shown alongside the category
    #[serde(default)]
    pub budget: Option<Money>,

    /// Whether this category comes from the preset catalog
    #[serde(default)]
    pub is_default: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new user-defined category
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        kind: TransactionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            kind,
            budget: None,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the budget cap
    pub fn set_budget(&mut self, amount: Money) {
        self.budget = Some(amount);
        self.updated_at = Utc::now();
    }

    /// Clear the budget cap
    pub fn clear_budget(&mut self) {
        self.budget = None;
        self.updated_at = Utc::now();
    }

    /// Case-insensitive name comparison
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if let Some(budget) = self.budget {
            if budget.is_negative() {
                return Err(CategoryValidationError::NegativeBudget);
            }
            if !budget.is_within_limit() {
                return Err(CategoryValidationError::BudgetTooLarge(budget));
            }
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// `#RGB`, `#RRGGBB` or `#AARRGGBB`
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Categories seeded into a fresh registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetCategory {
    Dining,
    Transport,
    Shopping,
    Entertainment,
    Medical,
    Education,
    Housing,
    OtherExpense,
    Salary,
    Bonus,
    Investment,
    PartTime,
    OtherIncome,
}

impl PresetCategory {
    /// Get all presets in catalog order, expenses first
    pub fn all() -> &'static [Self] {
        &[
            Self::Dining,
            Self::Transport,
            Self::Shopping,
            Self::Entertainment,
            Self::Medical,
            Self::Education,
            Self::Housing,
            Self::OtherExpense,
            Self::Salary,
            Self::Bonus,
            Self::Investment,
            Self::PartTime,
            Self::OtherIncome,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dining => "Dining",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Medical => "Medical",
            Self::Education => "Education",
            Self::Housing => "Housing",
            Self::OtherExpense | Self::OtherIncome => "Other",
            Self::Salary => "Salary",
            Self::Bonus => "Bonus",
            Self::Investment => "Investment",
            Self::PartTime => "Part-time",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Dining => "fork.knife",
            Self::Transport => "car.fill",
            Self::Shopping => "bag.fill",
            Self::Entertainment => "gamecontroller.fill",
            Self::Medical => "cross.fill",
            Self::Education => "book.fill",
            Self::Housing => "house.fill",
            Self::OtherExpense | Self::OtherIncome => "ellipsis.circle.fill",
            Self::Salary => "banknote.fill",
            Self::Bonus => "gift.fill",
            Self::Investment => "chart.line.uptrend.xyaxis",
            Self::PartTime => "briefcase.fill",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Dining | Self::Bonus => "#FF9500",
            Self::Transport | Self::Investment => "#007AFF",
            Self::Shopping | Self::Salary => "#34C759",
            Self::Entertainment | Self::PartTime => "#AF52DE",
            Self::Medical => "#FF3B30",
            Self::Education => "#5AC8FA",
            Self::Housing => "#FFCC00",
            Self::OtherExpense | Self::OtherIncome => "#8E8E93",
        }
    }

    pub fn kind(&self) -> TransactionType {
        match self {
            Self::Salary | Self::Bonus | Self::Investment | Self::PartTime | Self::OtherIncome => {
                TransactionType::Income
            }
            _ => TransactionType::Expense,
        }
    }

    /// Create a Category from this preset
    pub fn to_category(&self) -> Category {
        let mut category = Category::new(self.name(), self.icon(), self.color(), self.kind());
        category.is_default = true;
        category
    }
}

/// The full preset catalog as fresh categories
pub fn default_categories() -> Vec<Category> {
    PresetCategory::all()
        .iter()
        .map(PresetCategory::to_category)
        .collect()
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeBudget,
    BudgetTooLarge(Money),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(
                    f,
                    "Category name too long ({} chars, max {})",
                    len, MAX_NAME_LEN
                )
            }
            Self::NegativeBudget => write!(f, "Budget amount cannot be negative"),
            Self::BudgetTooLarge(budget) => {
                write!(f, "Budget amount {} exceeds the maximum of {}", budget, Money::MAX_AMOUNT)
            }
            Self::InvalidColor(color) => write!(f, "Invalid hex color: {}", color),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Pets", "pawprint.fill", "#A2845E", TransactionType::Expense);

        assert_eq!(category.name, "Pets");
        assert_eq!(category.kind, TransactionType::Expense);
        assert!(!category.is_default);
        assert!(category.budget.is_none());
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_category_budget() {
        let mut category = PresetCategory::Dining.to_category();

        category.set_budget(Money::from_major(1500));
        assert_eq!(category.budget, Some(Money::from_major(1500)));

        category.clear_budget();
        assert!(category.budget.is_none());
    }

    #[test]
    fn test_category_validation() {
        let mut category = Category::new("Valid", "star", "#FFF", TransactionType::Income);
        assert!(category.validate().is_ok());

        category.name = "  ".into();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));

        category.name = "Valid".into();
        category.budget = Some(Money::from_cents(-1));
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NegativeBudget)
        );

        category.budget = Some(Money::from_cents(i64::MAX));
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::BudgetTooLarge(_))
        ));

        category.budget = None;
        category.color = "orange".into();
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FF9500"));
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#80FF9500"));
        assert!(!is_hex_color("FF9500"));
        assert!(!is_hex_color("#FF95"));
        assert!(!is_hex_color("#GG9500"));
    }

    #[test]
    fn test_preset_catalog() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 13);
        assert!(defaults.iter().all(|c| c.is_default));
        assert!(defaults.iter().all(|c| c.validate().is_ok()));

        let expenses = defaults.iter().filter(|c| c.kind.is_expense()).count();
        let incomes = defaults.iter().filter(|c| c.kind.is_income()).count();
        assert_eq!(expenses, 8);
        assert_eq!(incomes, 5);

        assert_eq!(defaults[0].name, "Dining");
        assert_eq!(defaults[0].icon, "fork.knife");
        assert_eq!(PresetCategory::PartTime.name(), "Part-time");
        assert_eq!(PresetCategory::OtherIncome.kind(), TransactionType::Income);
    }

    #[test]
    fn test_name_matches() {
        let category = PresetCategory::Transport.to_category();
        assert!(category.name_matches("transport"));
        assert!(category.name_matches(" Transport "));
        assert!(!category.name_matches("Trans"));
    }

    #[test]
    fn test_serialization() {
        let category = PresetCategory::Salary.to_category();
        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("\"type\":\"income\""));

        let deserialized: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(category, deserialized);
    }
}
