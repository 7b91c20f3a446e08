//! Storage initialization
//!
//! First-run setup: directories plus the preset category catalog.

use tracing::info;

use crate::config::paths::BudgetMillPaths;
use crate::error::BudgetMillError;
use crate::models::default_categories;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Prepare a data directory for use
///
/// Seeds categories.json with the preset catalog when it does not exist yet.
/// Returns `true` if the catalog was written.
pub fn initialize_storage(paths: &BudgetMillPaths) -> Result<bool, BudgetMillError> {
    paths.ensure_directories()?;

    if !needs_initialization(paths) {
        return Ok(false);
    }

    let data = CategoryData {
        categories: default_categories(),
    };
    write_json_atomic(paths.categories_file(), &data)?;
    info!(
        count = data.categories.len(),
        path = %paths.categories_file().display(),
        "seeded preset categories"
    );
    Ok(true)
}

/// Check if the category catalog still has to be seeded
pub fn needs_initialization(paths: &BudgetMillPaths) -> bool {
    !paths.categories_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetMillPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        assert!(initialize_storage(&paths).unwrap());

        assert!(!needs_initialization(&paths));
        assert!(paths.data_dir().exists());

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();
        assert_eq!(data.categories.len(), 13);
        assert!(data
            .categories
            .iter()
            .any(|c| c.name == "Salary" && c.kind == TransactionType::Income));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetMillPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();
        let first = std::fs::read_to_string(paths.categories_file()).unwrap();

        assert!(!initialize_storage(&paths).unwrap());
        let second = std::fs::read_to_string(paths.categories_file()).unwrap();
        assert_eq!(first, second);
    }
}
