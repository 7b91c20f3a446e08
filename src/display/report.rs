//! Report formatting for terminal output
//!
//! Period summary cards, the category breakdown and time series bars.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::Money;
use crate::reports::{CategoryBreakdown, PeriodSummary, SeriesPoint};

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Format the statistics cards for one period
pub fn format_period_summary(summary: &PeriodSummary, settings: &Settings) -> String {
    let mut output = String::new();

    let window = match &summary.range {
        Some(range) => format!(
            "{} to {}",
            range.start.format(&settings.date_format),
            range.last_day().format(&settings.date_format)
        ),
        None => "all time".to_string(),
    };
    output.push_str(&format!("{} ({})\n", summary.period, window));
    output.push_str(&separator(40));
    output.push('\n');

    output.push_str(&format!(
        "  Income:            {:>16}\n",
        settings.format_money(summary.income)
    ));
    output.push_str(&format!(
        "  Expense:           {:>16}\n",
        settings.format_money(summary.expense)
    ));
    output.push_str(&format!(
        "  Net:               {:>16}\n",
        settings.format_money(summary.net)
    ));
    output.push_str(&format!("  Transactions:      {:>16}\n", summary.count));
    output.push_str(&format!(
        "  Avg daily expense: {:>16}  (over {} days)\n",
        settings.format_money(summary.average_daily_expense),
        summary.elapsed_days
    ));

    output
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

/// Format the per-category breakdown, largest first
pub fn format_category_breakdown(breakdown: &CategoryBreakdown, settings: &Settings) -> String {
    if breakdown.is_empty() {
        return format!("No {} transactions in this period.\n", breakdown.kind);
    }

    let rows = breakdown.shares.iter().map(|share| ShareRow {
        name: truncate(&share.name, 24),
        count: share.count,
        total: settings.format_money(share.total),
        share: format_percentage(share.percent),
        bar: format_bar(share.percent, 100.0, 20),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!(
        "{}\nTotal {}: {}\n",
        table,
        breakdown.kind,
        settings.format_money(breakdown.total)
    )
}

/// Format a time series as one bar per bucket
pub fn format_series(points: &[SeriesPoint], settings: &Settings) -> String {
    if points.is_empty() {
        return "No transactions in this range.\n".to_string();
    }

    let max = points
        .iter()
        .map(|p| p.total)
        .max()
        .unwrap_or_else(Money::zero);

    let mut output = String::new();
    for point in points {
        output.push_str(&format!(
            "{}  {} {:>14}\n",
            point.bucket.format(&settings.date_format),
            format_bar(point.total.cents() as f64, max.cents() as f64, 30),
            settings.format_money(point.total)
        ));
    }
    output
}
