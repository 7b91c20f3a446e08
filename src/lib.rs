//! BudgetMill - personal finance tracking
//!
//! This library provides the core of the BudgetMill application: a
//! transaction store, a category registry, per-category budgets with
//! spend-vs-cap status, and stateless aggregation over transactions for
//! statistics views.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, budgets, money, periods)
//! - `storage`: JSON snapshot storage layer
//! - `services`: Business logic layer
//! - `reports`: Filters and aggregations over transactions
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `export`: CSV and JSON export
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetmill::services::{TransactionService, TransactionQuery};
//! use budgetmill::storage::Storage;
//!
//! let mut storage = Storage::in_memory();
//! let service = TransactionService::new(&mut storage);
//! let recent = service.list(&TransactionQuery::new().limit(10));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetMillError, BudgetMillResult};
