//! JSON snapshot of a planner's data.
//!
//! A snapshot holds the item catalog (with optional prices), the meal
//! definitions and the calendar assignments. It backs every collaborator
//! store the shopping service needs, which is what the CLI runs against.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use mealinsights_shared::{
    Amount, DateRange, EquivalentRule, ItemProfile, ItemRef, ItemType, Macros, MealAssignment,
    MealDefinition, MealIngredientLine, MealType, Nutrition, Quantity, Unit, UnitFamily, amount,
    bail,
};
use mealinsights_shopping::{CatalogStore, CostEstimator, MealStore, PlanStore};
use serde::Deserialize;
use time::{Date, Time, macros::format_description};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SnapshotDocument {
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    #[validate(nested)]
    pub meals: Vec<MealRecord>,
    #[serde(default)]
    #[validate(nested)]
    pub assignments: Vec<AssignmentRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MacrosRecord {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub protein: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub carbs: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub sugar: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fat: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fiber: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub saturated_fat: f64,
}

impl From<&MacrosRecord> for Macros {
    fn from(value: &MacrosRecord) -> Self {
        Self {
            protein: amount::from_f64(value.protein),
            carbs: amount::from_f64(value.carbs),
            sugar: amount::from_f64(value.sugar),
            fat: amount::from_f64(value.fat),
            fiber: amount::from_f64(value.fiber),
            saturated_fat: amount::from_f64(value.saturated_fat),
        }
    }
}

/// Ingredient or product, with nutrition per 100 g / ml / pieces.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ItemRecord {
    pub item_type: ItemType,
    #[validate(length(min = 1))]
    pub item_id: String,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub base_unit_kind: UnitFamily,
    #[validate(range(min = 0.0))]
    pub calories_per_100: f64,
    #[serde(default)]
    #[validate(nested)]
    pub macros_per_100: MacrosRecord,
    pub default_shop: Option<String>,
    pub category: Option<String>,
    /// Price for 100 base units
    #[validate(range(min = 0.0))]
    pub price_per_100: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ItemRefRecord {
    pub item_type: ItemType,
    #[validate(length(min = 1))]
    pub item_id: String,
}

impl From<&ItemRefRecord> for ItemRef {
    fn from(value: &ItemRefRecord) -> Self {
        ItemRef::new(value.item_type, value.item_id.to_owned())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngredientLineRecord {
    pub item_type: ItemType,
    #[validate(length(min = 1))]
    pub item_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: f64,
    pub unit: Unit,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EquivalentRecord {
    #[validate(nested)]
    pub original: ItemRefRecord,
    #[validate(nested)]
    pub equivalent: ItemRefRecord,
    #[serde(default = "default_conversion_ratio")]
    #[validate(range(exclusive_min = 0.0))]
    pub conversion_ratio: f64,
}

fn default_conversion_ratio() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MealRecord {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<IngredientLineRecord>,
    #[serde(default)]
    #[validate(nested)]
    pub equivalents: Vec<EquivalentRecord>,
    #[validate(range(min = 0.0))]
    pub calories_total: Option<f64>,
    #[validate(nested)]
    pub macros_total: Option<MacrosRecord>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignmentRecord {
    #[validate(length(min = 1))]
    pub id: String,
    pub plan_date: Date,
    #[validate(length(min = 1))]
    pub meal_id: String,
    pub meal_type: MealType,
    /// `HH:MM`
    pub specific_time: Option<String>,
    #[serde(default = "default_servings")]
    #[validate(range(exclusive_min = 0.0))]
    pub servings: f64,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

fn default_servings() -> f64 {
    1.0
}

/// In-memory planner data loaded from a snapshot document.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    profiles: HashMap<ItemRef, ItemProfile>,
    prices: HashMap<ItemRef, Amount>,
    meals: HashMap<String, MealDefinition>,
    assignments: Vec<MealAssignment>,
}

impl Snapshot {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

        let snapshot = Self::from_json(&json)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            items = snapshot.profiles.len(),
            meals = snapshot.meals.len(),
            assignments = snapshot.assignments.len(),
            "Snapshot loaded"
        );

        Ok(snapshot)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(json)?;

        Ok(Self::from_document(document)?)
    }

    pub fn from_document(document: SnapshotDocument) -> mealinsights_shared::Result<Self> {
        document.validate()?;

        let mut snapshot = Self::default();

        for record in document.items {
            let item = ItemRef::new(record.item_type, record.item_id.to_owned());
            if snapshot.profiles.contains_key(&item) {
                bail!("Duplicate catalog item {item}");
            }

            if let Some(price) = record.price_per_100 {
                snapshot.prices.insert(item.clone(), amount::from_f64(price));
            }

            snapshot.profiles.insert(
                item.clone(),
                ItemProfile {
                    item,
                    name: record.name,
                    per_100_base: Nutrition {
                        calories: amount::from_f64(record.calories_per_100),
                        macros: Macros::from(&record.macros_per_100),
                    },
                    base_unit_kind: record.base_unit_kind,
                    default_shop: record.default_shop,
                    category: record.category,
                },
            );
        }

        for record in document.meals {
            if snapshot.meals.contains_key(&record.id) {
                bail!("Duplicate meal {}", record.id);
            }

            let meal = meal_definition(record)?;
            snapshot.meals.insert(meal.id.to_owned(), meal);
        }

        let time_format = format_description!("[hour]:[minute]");
        for record in document.assignments {
            let specific_time = match &record.specific_time {
                Some(value) => match Time::parse(value, time_format) {
                    Ok(time) => Some(time),
                    Err(_) => bail!("Assignment {} has invalid time '{value}'", record.id),
                },
                None => None,
            };

            snapshot.assignments.push(MealAssignment {
                id: record.id,
                plan_date: record.plan_date,
                meal_id: record.meal_id,
                meal_type: record.meal_type,
                specific_time,
                servings: amount::from_f64(record.servings),
                notes: record.notes,
            });
        }

        Ok(snapshot)
    }

    pub fn assignments(&self) -> &[MealAssignment] {
        &self.assignments
    }
}

fn meal_definition(record: MealRecord) -> mealinsights_shared::Result<MealDefinition> {
    let ingredient_lines = record
        .ingredients
        .iter()
        .map(|line| {
            Ok(MealIngredientLine {
                item: ItemRef::new(line.item_type, line.item_id.to_owned()),
                quantity: Quantity::new(amount::from_f64(line.quantity), line.unit)?,
            })
        })
        .collect::<mealinsights_shared::Result<Vec<_>>>()?;

    let equivalents = record
        .equivalents
        .iter()
        .map(|rule| {
            EquivalentRule::new(
                ItemRef::from(&rule.original),
                ItemRef::from(&rule.equivalent),
                amount::from_f64(rule.conversion_ratio),
            )
        })
        .collect::<mealinsights_shared::Result<Vec<_>>>()?;

    let cached_nutrition = record.calories_total.map(|calories| Nutrition {
        calories: amount::from_f64(calories),
        macros: record
            .macros_total
            .as_ref()
            .map(Macros::from)
            .unwrap_or_default(),
    });

    Ok(MealDefinition {
        id: record.id,
        name: record.name,
        ingredient_lines,
        equivalents,
        cached_nutrition,
    })
}

#[async_trait]
impl CatalogStore for Snapshot {
    async fn resolve_many(
        &self,
        items: &[ItemRef],
    ) -> anyhow::Result<HashMap<ItemRef, ItemProfile>> {
        Ok(items
            .iter()
            .filter_map(|item| {
                self.profiles
                    .get(item)
                    .map(|profile| (item.clone(), profile.clone()))
            })
            .collect())
    }
}

#[async_trait]
impl MealStore for Snapshot {
    async fn get_meal_definition(&self, meal_id: &str) -> anyhow::Result<Option<MealDefinition>> {
        Ok(self.meals.get(meal_id).cloned())
    }
}

#[async_trait]
impl PlanStore for Snapshot {
    async fn get_assignments(&self, range: &DateRange) -> anyhow::Result<Vec<MealAssignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|assignment| range.contains(assignment.plan_date))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CostEstimator for Snapshot {
    async fn estimate(
        &self,
        item: &ItemRef,
        quantity: &Quantity,
    ) -> anyhow::Result<Option<Amount>> {
        let Some(price) = self.prices.get(item) else {
            return Ok(None);
        };

        let base_amount = quantity.amount().clone() * quantity.unit().base_factor();

        Ok(Some(price.clone() * base_amount / amount::whole(100)))
    }
}
