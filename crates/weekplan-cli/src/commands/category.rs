//! Category management commands for CLI.

use clap::Subcommand;
use serde::Serialize;
use uuid::Uuid;
use weekplan_core::{Category, Config, Context, PlanDb, Purpose, Purposes};

use super::{find_category, print_json, CmdResult};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a new category
    Add {
        /// Display name, also matched against the label tokens
        name: String,
        /// Context: home, placement, school or other
        #[arg(long, default_value = "other")]
        context: Context,
        /// Display color, e.g. "#ffcc00"
        #[arg(long)]
        color: Option<String>,
        /// Explicit purposes (comma separated); overrides name matching
        #[arg(long, value_delimiter = ',')]
        purpose: Vec<Purpose>,
        /// Explicit id (defaults to a fresh UUID)
        #[arg(long)]
        id: Option<String>,
    },
    /// List all categories with their effective purposes
    List,
    /// Delete a category by id or name
    Delete {
        /// Category id or name
        category: String,
    },
}

#[derive(Serialize)]
struct CategoryView<'a> {
    #[serde(flatten)]
    category: &'a Category,
    effective: Vec<&'static str>,
    cells: usize,
}

fn purpose_names(p: &Purposes) -> Vec<&'static str> {
    [
        (p.sleep, "sleep"),
        (p.home, "home"),
        (p.placement, "placement"),
        (p.school, "school"),
        (p.free, "free"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect()
}

pub fn run(action: CategoryAction) -> CmdResult {
    let db = PlanDb::open()?;

    match action {
        CategoryAction::Add {
            name,
            context,
            color,
            purpose,
            id,
        } => {
            let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
            let mut category = Category::new(id, name, context).with_purposes(purpose);
            category.color = color;
            db.create_category(&category)?;
            eprintln!("Category created: {}", category.id);
            print_json(&category)?;
        }
        CategoryAction::List => {
            let config = Config::load()?;
            let rules = config.label_rules();
            let grid = db.load_grid(config.hour_range())?;
            let categories = db.list_categories()?;
            let views: Vec<_> = categories
                .iter()
                .map(|category| CategoryView {
                    category,
                    effective: purpose_names(&rules.classify(category)),
                    cells: grid.category_usage(&category.id),
                })
                .collect();
            print_json(&views)?;
        }
        CategoryAction::Delete { category } => {
            let category = find_category(&db, &category)?;
            db.delete_category(&category.id)?;
            let grid = db.load_grid(Config::load()?.hour_range())?;
            let orphaned = grid.category_usage(&category.id);
            eprintln!("Category deleted: {} ({orphaned} grid cells now empty)", category.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_names_follow_flag_order() {
        let purposes: Purposes = [Purpose::Free, Purpose::Home].into_iter().collect();
        assert_eq!(purpose_names(&purposes), vec!["home", "free"]);
        assert!(purpose_names(&Purposes::default()).is_empty());
    }
}
