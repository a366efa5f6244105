mod config;
pub mod migrations;
pub mod plan_db;

pub use config::{Config, ExportConfig, GridConfig};
pub use plan_db::PlanDb;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the weekplan data directory, creating it if needed.
///
/// `WEEKPLAN_DATA_DIR` wins when set. Otherwise `~/.config/weekplan[-dev]/`,
/// where `WEEKPLAN_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("WEEKPLAN_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("WEEKPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("weekplan-dev")
            } else {
                base_dir.join("weekplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
