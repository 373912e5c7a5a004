pub mod aggregation;
pub mod catalog;
pub mod equivalent;
mod error;
pub mod expander;
pub mod export;
pub mod nutrition;
pub mod presenter;
pub mod preview;
pub mod service;
pub mod store;
pub mod unit;
mod warning;

// Re-export commonly used types
pub use aggregation::{AggregatedItem, Aggregation, AggregationEngine, AggregationInput};
pub use catalog::{CatalogResolver, ResolvedCatalog};
pub use equivalent::{EquivalentResolver, Substitution};
pub use error::{Result, ShoppingError};
pub use expander::{ExpandedMeal, MealExpander};
pub use export::render_text;
pub use nutrition::{DayNutrition, NutritionReport};
pub use presenter::{
    DayNutritionRecord, NutritionResponse, NutritionTotals, Presenter, ShoppingListItemRecord,
    ShoppingListResponse, ShoppingSummary, SortBy,
};
pub use preview::{PreviewDay, PreviewEntry, ShoppingListPreview};
pub use service::{GenerateShoppingList, ShoppingService};
pub use store::{CatalogStore, CostEstimator, MealStore, PlanStore};
pub use unit::{UnitMismatch, normalize};
pub use warning::{Warning, WarningKind, WarningRecord};
