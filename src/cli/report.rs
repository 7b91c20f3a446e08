//! Report CLI commands
//!
//! Statistics for a period: summary cards, category breakdown and trend.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_category_breakdown, format_period_summary, format_series};
use crate::error::{BudgetMillError, BudgetMillResult};
use crate::models::{Period, TransactionType};
use crate::reports::{
    daily_trend, filter_by_period, filter_by_type, time_series, CategoryBreakdown, Granularity,
    PeriodSummary, SeriesMode,
};
use crate::storage::Storage;

use super::{parse_kind, parse_period, reference_date};

/// Longest window `trend --days` accepts, about ten years
pub const MAX_TREND_DAYS: u32 = 3660;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expense, net and daily average for a period
    Summary {
        /// Period: today, week, month, year or all
        #[arg(short, long, value_parser = parse_period, default_value = "month")]
        period: Period,
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        on: Option<String>,
    },

    /// Per-category totals for a period, largest first
    Categories {
        #[arg(short, long, value_parser = parse_period, default_value = "month")]
        period: Period,
        /// "expense" or "income"
        #[arg(short = 't', long = "type", value_parser = parse_kind, default_value = "expense")]
        kind: TransactionType,
        #[arg(long)]
        on: Option<String>,
    },

    /// Totals per day, week or month
    Trend {
        /// Bucket size: day, week or month
        #[arg(short, long, default_value = "day")]
        by: String,
        /// Period to cover; ignored with --days
        #[arg(short, long, value_parser = parse_period, default_value = "month")]
        period: Period,
        /// Daily trend over the last N days instead of a period
        #[arg(
            long,
            conflicts_with = "by",
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TREND_DAYS))
        )]
        days: Option<u32>,
        /// "expense" or "income"
        #[arg(short = 't', long = "type", value_parser = parse_kind, default_value = "expense")]
        kind: TransactionType,
        /// Omit buckets without transactions
        #[arg(long)]
        sparse: bool,
        #[arg(long)]
        on: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> BudgetMillResult<()> {
    let week_start = settings.first_weekday;

    match cmd {
        ReportCommands::Summary { period, on } => {
            let reference = reference_date(on.as_deref())?;
            let summary =
                PeriodSummary::generate(storage.transactions.iter(), period, reference, week_start);
            print!("{}", format_period_summary(&summary, settings));
        }

        ReportCommands::Categories { period, kind, on } => {
            let reference = reference_date(on.as_deref())?;
            let in_period =
                filter_by_period(storage.transactions.iter(), period, reference, week_start);
            let breakdown = CategoryBreakdown::generate(in_period, kind, &storage.categories);

            println!("{} by category ({})", kind, period);
            print!("{}", format_category_breakdown(&breakdown, settings));
        }

        ReportCommands::Trend {
            by,
            period,
            days,
            kind,
            sparse,
            on,
        } => {
            let reference = reference_date(on.as_deref())?;
            let of_kind = filter_by_type(storage.transactions.iter(), Some(kind));

            let points = match days {
                Some(days) => daily_trend(of_kind, reference, days),
                None => {
                    let granularity = Granularity::parse(&by, week_start).ok_or_else(|| {
                        BudgetMillError::Validation(format!(
                            "Invalid bucket '{}': expected day, week or month",
                            by
                        ))
                    })?;
                    let mode = if sparse {
                        SeriesMode::Sparse
                    } else {
                        SeriesMode::Dense
                    };
                    time_series(
                        of_kind,
                        granularity,
                        mode,
                        period.range(reference, week_start),
                    )
                }
            };

            print!("{}", format_series(&points, settings));
        }
    }

    Ok(())
}
