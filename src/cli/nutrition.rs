use mealinsights_shopping::{CatalogStore, MealStore, PlanStore, ShoppingService};
use time::Date;

#[tracing::instrument(skip(service))]
pub async fn nutrition<C, M, P>(
    service: &ShoppingService<C, M, P>,
    start_date: Date,
    end_date: Date,
) -> anyhow::Result<String>
where
    C: CatalogStore,
    M: MealStore,
    P: PlanStore,
{
    let report = service.daily_nutrition(start_date, end_date).await?;
    let response = service.presenter().nutrition(&report);

    Ok(serde_json::to_string_pretty(&response)?)
}

#[tracing::instrument(skip(service))]
pub async fn week<C, M, P>(
    service: &ShoppingService<C, M, P>,
    start_date: Date,
) -> anyhow::Result<String>
where
    C: CatalogStore,
    M: MealStore,
    P: PlanStore,
{
    let report = service.week_nutrition(start_date).await?;
    let response = service.presenter().nutrition(&report);

    Ok(serde_json::to_string_pretty(&response)?)
}
