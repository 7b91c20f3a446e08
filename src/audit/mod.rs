//! Audit logging for BudgetMill
//!
//! Records every create, update and delete with before/after values in an
//! append-only JSONL file (`audit.log`).
//!
//! - `AuditEntry`: one operation on one entity, timestamped in UTC
//! - `AuditLogger`: appends entries and reads them back
//! - `generate_diff`: "field: old -> new" summaries for updates

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
