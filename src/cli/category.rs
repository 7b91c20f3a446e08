//! Category CLI commands
//!
//! Implements CLI commands for the category registry.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_category_list;
use crate::error::BudgetMillResult;
use crate::models::TransactionType;
use crate::services::category::{CreateCategoryInput, UpdateCategoryInput};
use crate::services::CategoryService;
use crate::storage::Storage;

use super::{parse_kind, parse_money};

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories, optionally of one type
    List {
        /// Only "expense" or "income" categories
        #[arg(short = 't', long = "type", value_parser = parse_kind)]
        kind: Option<TransactionType>,
    },

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Category type
        #[arg(short = 't', long = "type", value_parser = parse_kind, default_value = "expense")]
        kind: TransactionType,
        /// Icon name
        #[arg(long, default_value = "tag.fill")]
        icon: String,
        /// Color as #RRGGBB
        #[arg(long, default_value = "#8E8E93")]
        color: String,
        /// Suggested monthly budget (e.g., "500" or "500.00")
        #[arg(long)]
        budget: Option<String>,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New icon
        #[arg(long)]
        icon: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
        /// New suggested budget
        #[arg(long, conflicts_with = "clear_budget")]
        budget: Option<String>,
        /// Clear the suggested budget
        #[arg(long)]
        clear_budget: bool,
    },

    /// Delete an unused user category
    #[command(alias = "delete")]
    Remove {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> BudgetMillResult<()> {
    let mut service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let categories = service.list_categories(kind);
            print!("{}", format_category_list(&categories, settings));
        }

        CategoryCommands::Add {
            name,
            kind,
            icon,
            color,
            budget,
        } => {
            let budget = budget.as_deref().map(parse_money).transpose()?;
            let category = service.create(CreateCategoryInput {
                name,
                icon,
                color,
                kind,
                budget,
            })?;

            println!("Created {} category: {}", category.kind, category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Edit {
            category,
            name,
            icon,
            color,
            budget,
            clear_budget,
        } => {
            let existing = service.find(&category, None)?;

            if name.is_none() && icon.is_none() && color.is_none() && budget.is_none() && !clear_budget
            {
                println!("No changes specified. Use --name, --icon, --color, --budget or --clear-budget.");
                return Ok(());
            }

            let budget = if clear_budget {
                Some(None)
            } else {
                budget.as_deref().map(parse_money).transpose()?.map(Some)
            };

            let updated = service.update(
                existing.id,
                UpdateCategoryInput {
                    name,
                    icon,
                    color,
                    budget,
                },
            )?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Remove { category } => {
            let existing = service.find(&category, None)?;
            let removed = service.remove(existing.id)?;
            println!("Deleted category: {}", removed.name);
        }
    }

    Ok(())
}
