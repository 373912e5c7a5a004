//! In-memory stores and builders shared by the shopping integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mealinsights_shared::{
    Amount, DateRange, EquivalentRule, ItemProfile, ItemRef, MealAssignment, MealDefinition,
    MealIngredientLine, MealType, Nutrition, Quantity, Unit, UnitFamily, amount,
};
use mealinsights_shopping::{CatalogStore, CostEstimator, MealStore, PlanStore, ShoppingService};
use time::Date;

#[derive(Default)]
pub struct MemoryStore {
    pub profiles: HashMap<ItemRef, ItemProfile>,
    pub meals: HashMap<String, MealDefinition>,
    pub assignments: Vec<MealAssignment>,
    pub prices: HashMap<ItemRef, Amount>,
    pub catalog_batches: Mutex<Vec<usize>>,
}

impl MemoryStore {
    pub fn with_profile(mut self, profile: ItemProfile) -> Self {
        self.profiles.insert(profile.item.clone(), profile);
        self
    }

    pub fn with_meal(mut self, meal: MealDefinition) -> Self {
        self.meals.insert(meal.id.to_owned(), meal);
        self
    }

    pub fn with_assignment(mut self, assignment: MealAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// Price per 100 base units.
    pub fn with_price(mut self, item: ItemRef, price: f64) -> Self {
        self.prices.insert(item, amount::from_f64(price));
        self
    }

    pub fn catalog_batches(&self) -> Vec<usize> {
        self.catalog_batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn resolve_many(
        &self,
        items: &[ItemRef],
    ) -> anyhow::Result<HashMap<ItemRef, ItemProfile>> {
        self.catalog_batches.lock().unwrap().push(items.len());

        Ok(items
            .iter()
            .filter_map(|item| self.profiles.get(item).map(|p| (item.clone(), p.clone())))
            .collect())
    }
}

#[async_trait]
impl MealStore for MemoryStore {
    async fn get_meal_definition(&self, meal_id: &str) -> anyhow::Result<Option<MealDefinition>> {
        Ok(self.meals.get(meal_id).cloned())
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
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
impl CostEstimator for MemoryStore {
    async fn estimate(
        &self,
        item: &ItemRef,
        quantity: &Quantity,
    ) -> anyhow::Result<Option<Amount>> {
        Ok(self
            .prices
            .get(item)
            .map(|price| price.clone() * quantity.amount().clone() / amount::whole(100)))
    }
}

pub type TestService = ShoppingService<Arc<MemoryStore>, Arc<MemoryStore>, Arc<MemoryStore>>;

pub fn service(store: Arc<MemoryStore>) -> TestService {
    ShoppingService::new(store.clone(), store.clone(), store)
}

pub fn priced_service(store: Arc<MemoryStore>) -> TestService {
    ShoppingService::new(store.clone(), store.clone(), store.clone()).with_cost_estimator(store)
}

pub fn profile(item: ItemRef, name: &str, calories: u64, family: UnitFamily) -> ItemProfile {
    ItemProfile {
        item,
        name: name.to_owned(),
        per_100_base: Nutrition {
            calories: amount::whole(calories),
            ..Nutrition::default()
        },
        base_unit_kind: family,
        default_shop: None,
        category: None,
    }
}

pub fn line(item: ItemRef, value: f64, unit: Unit) -> MealIngredientLine {
    MealIngredientLine {
        item,
        quantity: Quantity::new(amount::from_f64(value), unit).unwrap(),
    }
}

pub fn meal(id: &str, name: &str, lines: Vec<MealIngredientLine>) -> MealDefinition {
    MealDefinition {
        id: id.to_owned(),
        name: name.to_owned(),
        ingredient_lines: lines,
        equivalents: vec![],
        cached_nutrition: None,
    }
}

pub fn meal_with_equivalents(
    id: &str,
    name: &str,
    lines: Vec<MealIngredientLine>,
    equivalents: Vec<EquivalentRule>,
) -> MealDefinition {
    MealDefinition {
        equivalents,
        ..meal(id, name, lines)
    }
}

pub fn assign(
    id: &str,
    plan_date: Date,
    meal_id: &str,
    meal_type: MealType,
    servings: f64,
) -> MealAssignment {
    MealAssignment {
        id: id.to_owned(),
        plan_date,
        meal_id: meal_id.to_owned(),
        meal_type,
        specific_time: None,
        servings: amount::from_f64(servings),
        notes: None,
    }
}
