//! Aggregation and filter engine
//!
//! Stateless functions over transaction iterators: filters, category totals,
//! time series and period summaries. Nothing here mutates or caches.

pub mod breakdown;
pub mod filters;
pub mod summary;
pub mod time_series;

pub use breakdown::{group_by_category, CategoryBreakdown, CategoryShare};
pub use filters::{
    filter_by_category, filter_by_period, filter_by_range, filter_by_type, search_text,
    CategoryLookup,
};
pub use summary::PeriodSummary;
pub use time_series::{daily_trend, time_series, Granularity, SeriesMode, SeriesPoint};
