//! Budget repository
//!
//! Manages loading and saving budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::error::BudgetMillError;
use crate::models::{Budget, BudgetId, CategoryId};

use super::file_io::{read_json, write_json_atomic};
use super::unique_match;

/// On-disk layout of budgets.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BudgetData {
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Default)]
pub struct BudgetRepository {
    path: Option<PathBuf>,
    budgets: Vec<Budget>,
    index: HashMap<BudgetId, usize>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn load(&mut self) -> Result<(), BudgetMillError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data: BudgetData = read_json(path)?;
        self.budgets = data.budgets;
        self.rebuild_index();
        debug!(count = self.budgets.len(), "loaded budgets");
        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetMillError> {
        match &self.path {
            Some(path) => write_json_atomic(
                path,
                &BudgetData {
                    budgets: self.budgets.clone(),
                },
            ),
            None => Ok(()),
        }
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .budgets
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id, i))
            .collect();
    }

    pub fn get(&self, id: BudgetId) -> Option<&Budget> {
        self.index.get(&id).map(|&i| &self.budgets[i])
    }

    /// Look up by full UUID, prefixed UUID or the short display form
    pub fn find(&self, identifier: &str) -> Result<Option<&Budget>, BudgetMillError> {
        if let Ok(id) = identifier.trim().parse::<BudgetId>() {
            return Ok(self.get(id));
        }
        unique_match(
            self.budgets.iter().filter(|b| b.id.matches(identifier)),
            "Budget",
            identifier,
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Budget> {
        self.budgets.iter()
    }

    /// Budgets capping one category
    pub fn for_category(&self, category_id: CategoryId) -> impl Iterator<Item = &Budget> {
        self.budgets
            .iter()
            .filter(move |b| b.category_id == category_id)
    }

    pub fn count(&self) -> usize {
        self.budgets.len()
    }

    pub fn insert(&mut self, budget: Budget) -> Result<(), BudgetMillError> {
        if self.index.contains_key(&budget.id) {
            return Err(BudgetMillError::Duplicate {
                entity_type: "Budget",
                identifier: budget.id.to_string(),
            });
        }
        self.index.insert(budget.id, self.budgets.len());
        self.budgets.push(budget);
        Ok(())
    }

    pub fn replace(&mut self, budget: Budget) -> Result<Budget, BudgetMillError> {
        let position = *self
            .index
            .get(&budget.id)
            .ok_or_else(|| BudgetMillError::budget_not_found(budget.id.to_string()))?;
        Ok(std::mem::replace(&mut self.budgets[position], budget))
    }

    pub fn remove(&mut self, id: BudgetId) -> Option<Budget> {
        let position = self.index.remove(&id)?;
        let removed = self.budgets.remove(position);
        self.rebuild_index();
        Some(removed)
    }
}
