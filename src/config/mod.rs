//! Configuration module for BudgetMill
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BudgetMillPaths;
pub use settings::Settings;
