//! Tests for configuration system

use mealinsights::Config;
use mealinsights_shared::MealType;
use mealinsights_shopping::SortBy;
use temp_dir::TempDir;

#[test]
fn test_config_loads_from_default_toml() {
    let config = Config::load(None).expect("Failed to load config");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "pretty");
    assert_eq!(config.shopping.default_sort_by, SortBy::IngredientName);
    assert_eq!(config.shopping.display_precision, 2);
    assert_eq!(config.snapshot.path, "data/snapshot.json");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("mealinsights.toml");
    std::fs::write(
        &path,
        r#"
[logging]
format = "json"

[shopping]
default_sort_by = "quantity"
exclude_meal_types = ["snack"]
display_precision = 1

[snapshot]
path = "/tmp/plan.json"
"#,
    )
    .unwrap();

    let config =
        Config::load(Some(path.to_string_lossy().to_string())).expect("Failed to load config");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.shopping.default_sort_by, SortBy::Quantity);
    assert_eq!(config.shopping.exclude_meal_types, vec![MealType::Snack]);
    assert_eq!(config.shopping.display_precision, 1);
    assert_eq!(config.snapshot.path, "/tmp/plan.json");
}

#[test]
fn test_config_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("absent.toml");

    let config =
        Config::load(Some(path.to_string_lossy().to_string())).expect("Failed to load config");

    assert_eq!(config.shopping.display_precision, 2);
    assert!(config.shopping.exclude_meal_types.is_empty());
}

#[test]
fn test_config_rejects_unknown_sort_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("bad.toml");
    std::fs::write(&path, "[shopping]\ndefault_sort_by = \"price\"\n").unwrap();

    assert!(Config::load(Some(path.to_string_lossy().to_string())).is_err());
}
