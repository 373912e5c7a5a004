use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use mealinsights_shared::{DateRange, MealType, Quantity};
use time::{Date, OffsetDateTime};

use crate::aggregation::{AggregatedItem, AggregationEngine, AggregationInput};
use crate::error::{Result, ShoppingError};
use crate::export::render_text;
use crate::nutrition::NutritionReport;
use crate::presenter::{Presenter, ShoppingListResponse, SortBy};
use crate::preview::ShoppingListPreview;
use crate::store::{CatalogStore, CostEstimator, MealStore, PlanStore};
use crate::warning::WarningRecord;

/// Command to generate a shopping list for a date range
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateShoppingList {
    pub start_date: Date,
    pub end_date: Date,
    pub exclude_meal_types: HashSet<MealType>,
    pub sort_by: SortBy,
}

impl GenerateShoppingList {
    pub fn new(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date,
            end_date,
            exclude_meal_types: HashSet::new(),
            sort_by: SortBy::default(),
        }
    }
}

/// Shopping & nutrition operations over the planner's stores.
///
/// Each call fetches plan and meal data, runs the [`AggregationEngine`] once
/// and presents the result. Nothing is cached between calls.
pub struct ShoppingService<C, M, P> {
    catalog: C,
    meals: M,
    plans: P,
    cost_estimator: Option<Box<dyn CostEstimator>>,
    presenter: Presenter,
}

impl<C, M, P> ShoppingService<C, M, P>
where
    C: CatalogStore,
    M: MealStore,
    P: PlanStore,
{
    pub fn new(catalog: C, meals: M, plans: P) -> Self {
        Self {
            catalog,
            meals,
            plans,
            cost_estimator: None,
            presenter: Presenter::default(),
        }
    }

    pub fn with_cost_estimator(mut self, estimator: impl CostEstimator + 'static) -> Self {
        self.cost_estimator = Some(Box::new(estimator));
        self
    }

    pub fn with_presenter(mut self, presenter: Presenter) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Generate a shopping list
    ///
    /// 1. Loads assignments in range and the meals they reference
    /// 2. Aggregates ingredients and nutrition in one engine run
    /// 3. Sorts rows and attaches cost estimates when an estimator is set
    #[tracing::instrument(skip(self))]
    pub async fn generate_shopping_list(
        &self,
        cmd: GenerateShoppingList,
    ) -> Result<ShoppingListResponse> {
        let range = DateRange::new(cmd.start_date, cmd.end_date)?;
        let input = self.load(range, cmd.exclude_meal_types).await?;

        let aggregation = AggregationEngine::aggregate(&input, &self.catalog).await?;
        let mut items = Presenter::present(aggregation.shopping_list, cmd.sort_by);
        self.estimate_costs(&mut items).await?;

        Ok(ShoppingListResponse {
            items: items
                .iter()
                .map(|item| self.presenter.item_record(item))
                .collect(),
            summary: self.presenter.summary(&items, &range),
            warnings: aggregation
                .warnings
                .iter()
                .map(WarningRecord::from)
                .collect(),
            generated_at: OffsetDateTime::now_utc(),
        })
    }

    /// Nutrition per date in `[start_date, end_date]`, zero-filled for empty
    /// days.
    #[tracing::instrument(skip(self))]
    pub async fn daily_nutrition(
        &self,
        start_date: Date,
        end_date: Date,
    ) -> Result<NutritionReport> {
        let range = DateRange::new(start_date, end_date)?;

        self.nutrition(range).await
    }

    /// Nutrition for the seven days starting at `start_date`.
    #[tracing::instrument(skip(self))]
    pub async fn week_nutrition(&self, start_date: Date) -> Result<NutritionReport> {
        let range = DateRange::week_from(start_date)?;

        self.nutrition(range).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn preview(&self, start_date: Date, end_date: Date) -> Result<ShoppingListPreview> {
        let range = DateRange::new(start_date, end_date)?;
        let input = self.load(range, HashSet::new()).await?;

        let selected = AggregationEngine::select_assignments(
            &input.assignments,
            &input.range,
            &input.exclude_meal_types,
        );

        Ok(ShoppingListPreview::build(
            &range,
            &selected,
            &input.meals,
            &self.presenter,
        ))
    }

    #[tracing::instrument(skip(self))]
    pub async fn export_text(&self, cmd: GenerateShoppingList) -> Result<String> {
        let response = self.generate_shopping_list(cmd).await?;

        Ok(render_text(&response))
    }

    async fn nutrition(&self, range: DateRange) -> Result<NutritionReport> {
        let input = self.load(range, HashSet::new()).await?;
        let aggregation = AggregationEngine::aggregate(&input, &self.catalog).await?;

        Ok(NutritionReport::new(
            range,
            aggregation.day_nutrition,
            aggregation.warnings,
        ))
    }

    async fn load(
        &self,
        range: DateRange,
        exclude_meal_types: HashSet<MealType>,
    ) -> Result<AggregationInput> {
        let assignments = self
            .plans
            .get_assignments(&range)
            .await
            .map_err(ShoppingError::Store)?;

        let meal_ids = {
            let mut seen = HashSet::new();
            assignments
                .iter()
                .filter(|assignment| seen.insert(assignment.meal_id.as_str()))
                .map(|assignment| assignment.meal_id.to_owned())
                .collect::<Vec<_>>()
        };

        let meals: HashMap<_, _> = if meal_ids.is_empty() {
            HashMap::new()
        } else {
            self.meals
                .get_meal_definitions(&meal_ids)
                .await
                .map_err(ShoppingError::Store)?
        };

        tracing::debug!(
            assignments = assignments.len(),
            meals = meals.len(),
            "loaded meal plan"
        );

        Ok(AggregationInput {
            range,
            assignments,
            meals,
            exclude_meal_types,
        })
    }

    async fn estimate_costs(&self, items: &mut [AggregatedItem]) -> Result<()> {
        let Some(estimator) = &self.cost_estimator else {
            return Ok(());
        };

        let estimates = try_join_all(items.iter().map(|item| async move {
            match Quantity::new(item.total_quantity.clone(), item.unit) {
                Ok(quantity) => estimator.estimate(&item.item, &quantity).await,
                Err(_) => Ok(None),
            }
        }))
        .await
        .map_err(ShoppingError::Store)?;

        for (item, estimate) in items.iter_mut().zip(estimates) {
            item.estimated_cost = estimate;
        }

        Ok(())
    }
}
