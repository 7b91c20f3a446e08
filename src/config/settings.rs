//! User settings for BudgetMill
//!
//! Manages user preferences: currency symbol, first day of the week, budget
//! warning threshold and the default budget period.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::paths::BudgetMillPaths;
use crate::error::BudgetMillError;
use crate::models::budget::{BudgetPeriod, DEFAULT_WARNING_PERCENT};
use crate::models::money::DEFAULT_CURRENCY_SYMBOL;
use crate::models::period::parse_weekday;
use crate::models::Money;

/// User settings for BudgetMill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// First day of the calendar week
    #[serde(default = "default_first_weekday")]
    pub first_weekday: Weekday,

    /// Percentage of a cap above which a budget is flagged as approaching its limit
    #[serde(default = "default_warning_percent")]
    pub budget_warning_percent: u8,

    /// Period used by `budget add` when none is given
    #[serde(default)]
    pub default_budget_period: BudgetPeriod,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_first_weekday() -> Weekday {
    Weekday::Mon
}

fn default_warning_percent() -> u8 {
    DEFAULT_WARNING_PERCENT
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

/// Check a strftime pattern parses and renders a plain calendar date
fn validate_date_format(format: &str) -> Result<(), BudgetMillError> {
    let invalid = || BudgetMillError::Config(format!("Invalid date format: {}", format));

    if format.is_empty() {
        return Err(BudgetMillError::Config("Date format cannot be empty".into()));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    // Time-of-day fields fail on dates without a time
    let sample = NaiveDate::from_ymd_opt(2024, 12, 19).ok_or_else(invalid)?;
    let mut rendered = String::new();
    write!(rendered, "{}", sample.format(format)).map_err(|_| invalid())?;
    Ok(())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            first_weekday: default_first_weekday(),
            budget_warning_percent: default_warning_percent(),
            default_budget_period: BudgetPeriod::default(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Keys accepted by [`Settings::set`]
    pub const KEYS: &'static [&'static str] = &[
        "currency",
        "first-weekday",
        "warning-percent",
        "budget-period",
        "date-format",
    ];

    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &BudgetMillPaths) -> Result<Self, BudgetMillError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BudgetMillError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let mut settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetMillError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            if let Err(e) = validate_date_format(&settings.date_format) {
                warn!(error = %e, "falling back to the default date format");
                settings.date_format = default_date_format();
            }

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetMillPaths) -> Result<(), BudgetMillError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BudgetMillError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BudgetMillError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Update one setting from a `key value` pair
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), BudgetMillError> {
        let value = value.trim();
        match key {
            "currency" => {
                if value.is_empty() {
                    return Err(BudgetMillError::Config(
                        "Currency symbol cannot be empty".into(),
                    ));
                }
                self.currency_symbol = value.to_string();
            }
            "first-weekday" => {
                self.first_weekday =
                    parse_weekday(value).map_err(|e| BudgetMillError::Config(e.to_string()))?;
            }
            "warning-percent" => {
                let pct: u8 = value.parse().map_err(|_| {
                    BudgetMillError::Config(format!("Invalid percentage: {}", value))
                })?;
                if pct == 0 || pct > 100 {
                    return Err(BudgetMillError::Config(
                        "Warning percentage must be between 1 and 100".into(),
                    ));
                }
                self.budget_warning_percent = pct;
            }
            "budget-period" => {
                self.default_budget_period = BudgetPeriod::parse(value).ok_or_else(|| {
                    BudgetMillError::Config(format!("Invalid budget period: {}", value))
                })?;
            }
            "date-format" => {
                validate_date_format(value)?;
                self.date_format = value.to_string();
            }
            other => {
                return Err(BudgetMillError::Config(format!(
                    "Unknown setting '{}'. Valid keys: {}",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "¥");
        assert_eq!(settings.first_weekday, Weekday::Mon);
        assert_eq!(settings.budget_warning_percent, 80);
        assert_eq!(settings.default_budget_period, BudgetPeriod::Monthly);
        assert_eq!(settings.format_money(Money::from_cents(1250)), "¥12.50");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetMillPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.first_weekday = Weekday::Sun;
        settings.currency_symbol = "$".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.budget_warning_percent, 80);
        assert_eq!(settings.first_weekday, Weekday::Mon);
    }

    #[test]
    fn test_set() {
        let mut settings = Settings::default();
        settings.set("first-weekday", "sunday").unwrap();
        settings.set("warning-percent", "90").unwrap();
        settings.set("budget-period", "weekly").unwrap();
        settings.set("currency", "$").unwrap();

        assert_eq!(settings.first_weekday, Weekday::Sun);
        assert_eq!(settings.budget_warning_percent, 90);
        assert_eq!(settings.default_budget_period, BudgetPeriod::Weekly);
        assert_eq!(settings.currency_symbol, "$");

        assert!(settings.set("warning-percent", "0").is_err());
        assert!(settings.set("warning-percent", "150").is_err());
        assert!(settings.set("first-weekday", "someday").is_err());
        assert!(settings.set("colour", "red").is_err());
    }

    #[test]
    fn test_set_date_format() {
        let mut settings = Settings::default();
        settings.set("date-format", "%d/%m/%Y").unwrap();
        assert_eq!(settings.date_format, "%d/%m/%Y");

        for bad in ["%Q", "%", "%H:%M", ""] {
            let err = settings.set("date-format", bad).unwrap_err();
            assert!(matches!(err, BudgetMillError::Config(_)), "{}", bad);
        }
        assert_eq!(settings.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_load_replaces_bad_date_format() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetMillPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"date_format": "%Q"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.date_format, "%Y-%m-%d");
    }
}
