//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "")]
    preset: &'static str,
}

/// Format categories as a table
pub fn format_category_list(categories: &[Category], settings: &Settings) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'budgetmill init' to create the preset categories.\n"
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        id: c.id.to_string(),
        name: c.name.clone(),
        kind: c.kind.to_string(),
        budget: c
            .budget
            .map(|b| settings.format_money(b))
            .unwrap_or_else(|| "-".to_string()),
        icon: c.icon.clone(),
        color: c.color.clone(),
        preset: if c.is_default { "preset" } else { "" },
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;

    #[test]
    fn test_category_list() {
        let output = format_category_list(&default_categories(), &Settings::default());
        assert!(output.contains("Dining"));
        assert!(output.contains("Salary"));
        assert!(output.contains("income"));
        assert!(output.contains("preset"));
    }

    #[test]
    fn test_empty_list() {
        let output = format_category_list(&[], &Settings::default());
        assert!(output.starts_with("No categories found."));
    }
}
