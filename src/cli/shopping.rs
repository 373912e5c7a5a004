use mealinsights_shared::MealType;
use mealinsights_shopping::{
    CatalogStore, GenerateShoppingList, MealStore, PlanStore, ShoppingService, SortBy, render_text,
};
use time::Date;

use super::OutputFormat;
use crate::config::ShoppingConfig;

/// Builds the request, falling back to the configured exclusions and sort
/// key when the caller gives none.
pub fn shopping_request(
    config: &ShoppingConfig,
    start_date: Date,
    end_date: Date,
    exclude: Vec<MealType>,
    sort_by: Option<SortBy>,
) -> GenerateShoppingList {
    let exclude = if exclude.is_empty() {
        config.exclude_meal_types.clone()
    } else {
        exclude
    };

    GenerateShoppingList {
        start_date,
        end_date,
        exclude_meal_types: exclude.into_iter().collect(),
        sort_by: sort_by.unwrap_or(config.default_sort_by),
    }
}

#[tracing::instrument(skip(service))]
pub async fn shopping_list<C, M, P>(
    service: &ShoppingService<C, M, P>,
    request: GenerateShoppingList,
    format: OutputFormat,
) -> anyhow::Result<String>
where
    C: CatalogStore,
    M: MealStore,
    P: PlanStore,
{
    let response = service.generate_shopping_list(request).await?;

    tracing::info!(
        items = response.summary.total_items,
        warnings = response.warnings.len(),
        "Shopping list generated"
    );

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => Ok(render_text(&response)),
    }
}

#[tracing::instrument(skip(service))]
pub async fn preview<C, M, P>(
    service: &ShoppingService<C, M, P>,
    start_date: Date,
    end_date: Date,
) -> anyhow::Result<String>
where
    C: CatalogStore,
    M: MealStore,
    P: PlanStore,
{
    let preview = service.preview(start_date, end_date).await?;

    Ok(serde_json::to_string_pretty(&preview)?)
}
