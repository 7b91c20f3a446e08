//! Category repository
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::error::BudgetMillError;
use crate::models::{default_categories, Category, CategoryId, TransactionType};

use super::file_io::{read_json, write_json_atomic};
use super::unique_match;

/// On-disk layout of categories.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Category registry storage
#[derive(Debug, Default)]
pub struct CategoryRepository {
    path: Option<PathBuf>,
    categories: Vec<Category>,
    index: HashMap<CategoryId, usize>,
}

impl CategoryRepository {
    /// Repository backed by a snapshot file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::default()
        }
    }

    /// In-memory registry holding the preset catalog
    pub fn with_defaults() -> Self {
        let mut repo = Self::default();
        repo.categories = default_categories();
        repo.rebuild_index();
        repo
    }

    /// Load the snapshot, replacing current contents
    pub fn load(&mut self) -> Result<(), BudgetMillError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data: CategoryData = read_json(path)?;
        self.categories = data.categories;
        self.rebuild_index();
        debug!(count = self.categories.len(), "loaded categories");
        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetMillError> {
        match &self.path {
            Some(path) => write_json_atomic(
                path,
                &CategoryData {
                    categories: self.categories.clone(),
                },
            ),
            None => Ok(()),
        }
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.index.get(&id).map(|&i| &self.categories[i])
    }

    /// All categories in registry order
    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Categories of one type, in registry order
    pub fn by_kind(&self, kind: TransactionType) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(move |c| c.kind == kind)
    }

    /// Case-insensitive name lookup, optionally restricted to one type
    pub fn find_by_name(&self, name: &str, kind: Option<TransactionType>) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name_matches(name) && kind.map_or(true, |k| c.kind == k))
    }

    /// Look up by ID (full or short form), then by name
    pub fn find(
        &self,
        identifier: &str,
        kind: Option<TransactionType>,
    ) -> Result<Option<&Category>, BudgetMillError> {
        if let Ok(id) = identifier.trim().parse::<CategoryId>() {
            if let Some(category) = self.get(id) {
                return Ok(Some(category));
            }
        }
        let by_id = unique_match(
            self.categories.iter().filter(|c| c.id.matches(identifier)),
            "Category",
            identifier,
        )?;
        Ok(by_id.or_else(|| self.find_by_name(identifier, kind)))
    }

    pub fn count(&self) -> usize {
        self.categories.len()
    }

    pub fn insert(&mut self, category: Category) -> Result<(), BudgetMillError> {
        if self.index.contains_key(&category.id) {
            return Err(BudgetMillError::Duplicate {
                entity_type: "Category",
                identifier: category.id.to_string(),
            });
        }
        self.index.insert(category.id, self.categories.len());
        self.categories.push(category);
        Ok(())
    }

    pub fn replace(&mut self, category: Category) -> Result<Category, BudgetMillError> {
        let position = *self
            .index
            .get(&category.id)
            .ok_or_else(|| BudgetMillError::category_not_found(category.id.to_string()))?;
        Ok(std::mem::replace(&mut self.categories[position], category))
    }

    pub fn remove(&mut self, id: CategoryId) -> Option<Category> {
        let position = self.index.remove(&id)?;
        let removed = self.categories.remove(position);
        self.rebuild_index();
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_with_defaults() {
        let repo = CategoryRepository::with_defaults();
        assert_eq!(repo.count(), 13);
        assert_eq!(repo.by_kind(TransactionType::Expense).count(), 8);
        assert_eq!(repo.by_kind(TransactionType::Income).count(), 5);
    }

    #[test]
    fn test_find_by_name_respects_type() {
        let repo = CategoryRepository::with_defaults();

        let other_expense = repo
            .find_by_name("other", Some(TransactionType::Expense))
            .unwrap();
        let other_income = repo
            .find_by_name("Other", Some(TransactionType::Income))
            .unwrap();
        assert_ne!(other_expense.id, other_income.id);

        assert!(repo
            .find_by_name("Salary", Some(TransactionType::Expense))
            .is_none());
        assert!(repo.find_by_name("Salary", None).is_some());
    }

    #[test]
    fn test_find_by_id_or_name() {
        let repo = CategoryRepository::with_defaults();
        let dining = repo.find_by_name("Dining", None).unwrap().clone();

        assert_eq!(
            repo.find(&dining.id.to_string(), None).unwrap().unwrap().id,
            dining.id
        );
        assert_eq!(repo.find("dining", None).unwrap().unwrap().id, dining.id);
        assert!(repo.find("Groceries", None).unwrap().is_none());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut repo = CategoryRepository::with_defaults();
        let pets = Category::new("Pets", "pawprint.fill", "#A2845E", TransactionType::Expense);
        let id = pets.id;

        repo.insert(pets).unwrap();
        assert_eq!(repo.count(), 14);
        assert_eq!(repo.get(id).unwrap().name, "Pets");

        repo.remove(id).unwrap();
        assert!(repo.get(id).is_none());
        assert_eq!(repo.count(), 13);
        assert!(repo.find("Dining", None).unwrap().is_some());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");

        let mut repo = CategoryRepository::new(path.clone());
        repo.insert(Category::new("Pets", "pawprint.fill", "#A2845E", TransactionType::Expense))
            .unwrap();
        repo.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"categories\""));

        let mut reloaded = CategoryRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.count(), 1);
        assert!(reloaded.find_by_name("pets", None).is_some());
    }
}
