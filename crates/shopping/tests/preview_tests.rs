mod helpers;

use std::sync::Arc;

use helpers::{MemoryStore, assign, line, meal, service};
use mealinsights_shared::{ItemRef, MealType, Unit};
use mealinsights_shopping::ShoppingError;
use time::macros::date;

#[tokio::test]
async fn test_preview_lists_planned_meals_without_catalog() {
    let store = Arc::new(
        MemoryStore::default()
            .with_meal(meal(
                "pancakes",
                "Pancakes",
                vec![
                    line(ItemRef::ingredient("flour"), 120.0, Unit::Gram),
                    line(ItemRef::ingredient("milk"), 1.0, Unit::Cup),
                ],
            ))
            .with_meal(meal(
                "soup",
                "Soup",
                vec![line(ItemRef::ingredient("leek"), 1.0, Unit::Piece)],
            ))
            .with_assignment(assign("a2", date!(2024 - 05 - 02), "soup", MealType::Dinner, 2.0))
            .with_assignment(assign(
                "a1",
                date!(2024 - 05 - 02),
                "pancakes",
                MealType::Breakfast,
                1.0,
            ))
            .with_assignment(assign("a3", date!(2024 - 05 - 04), "soup", MealType::Lunch, 1.0)),
    );

    let preview = service(store.clone())
        .preview(date!(2024 - 05 - 01), date!(2024 - 05 - 07))
        .await
        .unwrap();

    assert_eq!(preview.total_days, 7);
    assert_eq!(
        preview.days.iter().map(|day| day.date).collect::<Vec<_>>(),
        vec![date!(2024 - 05 - 02), date!(2024 - 05 - 04)]
    );

    let thursday = &preview.days[0];
    assert_eq!(
        thursday.meals.keys().copied().collect::<Vec<_>>(),
        vec![MealType::Breakfast, MealType::Dinner]
    );
    let soup = &thursday.meals[&MealType::Dinner][0];
    assert_eq!(soup.meal_name, "Soup");
    assert_eq!(soup.servings, "2");
    assert_eq!(soup.ingredient_count, 1);
    assert_eq!(thursday.meals[&MealType::Breakfast][0].ingredient_count, 2);

    assert!(preview.warnings.is_empty());
    assert!(store.catalog_batches().is_empty());
}

#[tokio::test]
async fn test_preview_rejects_inverted_range() {
    let result = service(Arc::new(MemoryStore::default()))
        .preview(date!(2024 - 05 - 07), date!(2024 - 05 - 01))
        .await;

    assert!(matches!(result, Err(ShoppingError::InvalidDateRange { .. })));
}
