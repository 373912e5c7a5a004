use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use mealinsights_shared::{
    Amount, DateRange, ItemProfile, ItemRef, MealAssignment, MealDefinition, Quantity,
};

/// Ingredient/product catalog.
///
/// `resolve_many` returns the profiles it knows about; requested items that
/// are absent from the map are treated as deleted, never defaulted.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn resolve_many(
        &self,
        items: &[ItemRef],
    ) -> anyhow::Result<HashMap<ItemRef, ItemProfile>>;
}

#[async_trait]
pub trait MealStore: Send + Sync {
    async fn get_meal_definition(&self, meal_id: &str) -> anyhow::Result<Option<MealDefinition>>;

    /// Fetches several meals concurrently. Missing meals are absent from the map.
    async fn get_meal_definitions(
        &self,
        meal_ids: &[String],
    ) -> anyhow::Result<HashMap<String, MealDefinition>> {
        let meals = try_join_all(meal_ids.iter().map(|id| self.get_meal_definition(id))).await?;

        Ok(meals
            .into_iter()
            .flatten()
            .map(|meal| (meal.id.to_owned(), meal))
            .collect())
    }
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn get_assignments(&self, range: &DateRange) -> anyhow::Result<Vec<MealAssignment>>;
}

/// Optional price lookup. `None` means "no price data", which is reported as
/// an absent cost rather than zero.
#[async_trait]
pub trait CostEstimator: Send + Sync {
    async fn estimate(&self, item: &ItemRef, quantity: &Quantity) -> anyhow::Result<Option<Amount>>;
}

#[async_trait]
impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    async fn resolve_many(
        &self,
        items: &[ItemRef],
    ) -> anyhow::Result<HashMap<ItemRef, ItemProfile>> {
        (**self).resolve_many(items).await
    }
}

#[async_trait]
impl<T: MealStore + ?Sized> MealStore for Arc<T> {
    async fn get_meal_definition(&self, meal_id: &str) -> anyhow::Result<Option<MealDefinition>> {
        (**self).get_meal_definition(meal_id).await
    }

    async fn get_meal_definitions(
        &self,
        meal_ids: &[String],
    ) -> anyhow::Result<HashMap<String, MealDefinition>> {
        (**self).get_meal_definitions(meal_ids).await
    }
}

#[async_trait]
impl<T: PlanStore + ?Sized> PlanStore for Arc<T> {
    async fn get_assignments(&self, range: &DateRange) -> anyhow::Result<Vec<MealAssignment>> {
        (**self).get_assignments(range).await
    }
}

#[async_trait]
impl<T: CostEstimator + ?Sized> CostEstimator for Arc<T> {
    async fn estimate(
        &self,
        item: &ItemRef,
        quantity: &Quantity,
    ) -> anyhow::Result<Option<Amount>> {
        (**self).estimate(item, quantity).await
    }
}
