mod config;

pub use config::{Config, DisplayConfig, PickerConfig, StatsConfig, TimerConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/healthytime[-dev]/` based on HEALTHYTIME_ENV.
///
/// Set HEALTHYTIME_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HEALTHYTIME_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("healthytime-dev")
    } else {
        base_dir.join("healthytime")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
