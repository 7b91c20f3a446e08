//! Category service
//!
//! Category registry operations: listing by type, creating user categories,
//! editing presentation fields, and removing unused categories.

use chrono::Utc;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetMillError, BudgetMillResult};
use crate::models::{Category, CategoryId, Money, TransactionType};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a mut Storage,
}

/// Input for creating a new category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub kind: TransactionType,
    pub budget: Option<Money>,
}

/// Partial update of a category; the type cannot change
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` clears the budget cap
    pub budget: Option<Option<Money>>,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Categories of one type, or all of them, in registry order
    pub fn list_categories(&self, kind: Option<TransactionType>) -> Vec<Category> {
        self.storage
            .categories
            .iter()
            .filter(|c| kind.map_or(true, |k| c.kind == k))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: CategoryId) -> BudgetMillResult<Category> {
        self.storage
            .categories
            .get(id)
            .cloned()
            .ok_or_else(|| BudgetMillError::category_not_found(id.to_string()))
    }

    /// Find by ID or case-insensitive name
    pub fn find(&self, identifier: &str, kind: Option<TransactionType>) -> BudgetMillResult<Category> {
        self.storage
            .categories
            .find(identifier, kind)?
            .cloned()
            .ok_or_else(|| BudgetMillError::category_not_found(identifier))
    }

    /// Create a user-defined category
    pub fn create(&mut self, input: CreateCategoryInput) -> BudgetMillResult<Category> {
        let name = input.name.trim();
        if self
            .storage
            .categories
            .find_by_name(name, Some(input.kind))
            .is_some()
        {
            return Err(BudgetMillError::Duplicate {
                entity_type: "Category",
                identifier: format!("{} ({})", name, input.kind),
            });
        }

        let mut category = Category::new(name, input.icon.trim(), input.color.trim(), input.kind);
        category.budget = input.budget;
        category
            .validate()
            .map_err(|e| BudgetMillError::Validation(e.to_string()))?;

        self.storage.categories.insert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        info!(id = %category.id, name = %category.name, kind = %category.kind, "category created");

        Ok(category)
    }

    /// Edit name, icon, color or budget cap
    pub fn update(&mut self, id: CategoryId, input: UpdateCategoryInput) -> BudgetMillResult<Category> {
        let before = self.get(id)?;
        let mut category = before.clone();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            let clash = self
                .storage
                .categories
                .find_by_name(&name, Some(category.kind))
                .is_some_and(|other| other.id != id);
            if clash {
                return Err(BudgetMillError::Duplicate {
                    entity_type: "Category",
                    identifier: format!("{} ({})", name, category.kind),
                });
            }
            category.name = name;
        }
        if let Some(icon) = input.icon {
            category.icon = icon.trim().to_string();
        }
        if let Some(color) = input.color {
            category.color = color.trim().to_string();
        }
        if let Some(budget) = input.budget {
            category.budget = budget;
        }

        category
            .validate()
            .map_err(|e| BudgetMillError::Validation(e.to_string()))?;
        category.updated_at = Utc::now();

        self.storage.categories.replace(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Remove a user-defined category that nothing references
    pub fn remove(&mut self, id: CategoryId) -> BudgetMillResult<Category> {
        let category = self.get(id)?;

        if category.is_default {
            return Err(BudgetMillError::Validation(format!(
                "'{}' is a preset category and cannot be deleted",
                category.name
            )));
        }

        if self.storage.transactions.references_category(id) {
            return Err(BudgetMillError::Validation(format!(
                "Category '{}' still has transactions; move or delete them first",
                category.name
            )));
        }

        if self.storage.budgets.for_category(id).next().is_some() {
            return Err(BudgetMillError::Validation(format!(
                "Category '{}' still has budgets; delete them first",
                category.name
            )));
        }

        self.storage.categories.remove(id);
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        info!(id = %category.id, name = %category.name, "category removed");

        Ok(category)
    }
}
