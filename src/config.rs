use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mealinsights_shared::MealType;
use mealinsights_shopping::SortBy;
use serde::Deserialize;
use std::env;

pub const MAX_DISPLAY_PRECISION: u32 = 6;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub shopping: ShoppingConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShoppingConfig {
    #[serde(default)]
    pub default_sort_by: SortBy,
    /// Meal types left out of every shopping list unless the caller passes
    /// its own list
    #[serde(default)]
    pub exclude_meal_types: Vec<MealType>,
    #[serde(default = "default_display_precision")]
    pub display_precision: u32,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            default_sort_by: SortBy::default(),
            exclude_meal_types: vec![],
            display_precision: default_display_precision(),
        }
    }
}

fn default_display_precision() -> u32 {
    2
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> String {
    "data/snapshot.json".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MEALINSIGHTS__SNAPSHOT__PATH, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("shopping.default_sort_by", SortBy::default().as_ref())?
            .set_default("shopping.display_precision", default_display_precision())?
            .set_default("snapshot.path", default_snapshot_path())?;

        // Load config file if path provided or CONFIG_PATH env var set
        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional: a missing file just means defaults + environment
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALINSIGHTS")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("shopping.exclude_meal_types")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(format!(
                "Unknown log format '{}', expected 'pretty' or 'json'",
                self.logging.format
            ));
        }
        if self.shopping.display_precision > MAX_DISPLAY_PRECISION {
            return Err(format!(
                "Display precision must be at most {MAX_DISPLAY_PRECISION} decimals"
            ));
        }
        if self.snapshot.path.trim().is_empty() {
            return Err("Snapshot path must not be empty".to_string());
        }
        Ok(())
    }
}
