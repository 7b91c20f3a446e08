//! Service layer for BudgetMill
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity checks.

pub mod budget;
pub mod category;
pub mod transaction;

pub use budget::{BudgetService, BudgetWindow, CreateBudgetInput};
pub use category::{CategoryService, CreateCategoryInput, UpdateCategoryInput};
pub use transaction::{
    NewTransaction, TransactionForm, TransactionPatch, TransactionQuery, TransactionService,
};
