use std::collections::{BTreeMap, HashMap};

use mealinsights_shared::{DateRange, MealAssignment, MealDefinition, MealType, amount};
use serde::Serialize;
use time::Date;

use crate::presenter::Presenter;
use crate::warning::{Warning, WarningRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub assignment_id: String,
    pub meal_id: String,
    pub meal_name: String,
    pub servings: String,
    pub ingredient_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_calories: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewDay {
    pub date: Date,
    pub meals: BTreeMap<MealType, Vec<PreviewEntry>>,
}

/// What a shopping list for the range would be built from, without touching
/// the catalog. Only dates that have at least one meal are listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListPreview {
    pub start_date: Date,
    pub end_date: Date,
    pub total_days: u32,
    pub days: Vec<PreviewDay>,
    pub warnings: Vec<WarningRecord>,
}

impl ShoppingListPreview {
    /// `assignments` are expected in plan order (see
    /// [`crate::AggregationEngine::select_assignments`]).
    pub fn build(
        range: &DateRange,
        assignments: &[&MealAssignment],
        meals: &HashMap<String, MealDefinition>,
        presenter: &Presenter,
    ) -> Self {
        let precision = presenter.precision();
        let mut days: BTreeMap<Date, BTreeMap<MealType, Vec<PreviewEntry>>> = BTreeMap::new();
        let mut warnings = vec![];

        for assignment in assignments {
            let Some(meal) = meals.get(&assignment.meal_id) else {
                warnings.push(Warning::MealNotFound {
                    assignment_id: assignment.id.to_owned(),
                    meal_id: assignment.meal_id.to_owned(),
                });
                continue;
            };

            let slot = days
                .entry(assignment.plan_date)
                .or_default()
                .entry(assignment.meal_type)
                .or_default();

            slot.push(PreviewEntry {
                assignment_id: assignment.id.to_owned(),
                meal_id: meal.id.to_owned(),
                meal_name: meal.name.to_owned(),
                servings: amount::format(&assignment.servings, precision),
                ingredient_count: meal.ingredient_lines.len(),
                cached_calories: meal
                    .cached_nutrition
                    .as_ref()
                    .map(|nutrition| amount::to_f64(&nutrition.calories, precision)),
            });
        }

        for warning in &warnings {
            warning.log();
        }

        Self {
            start_date: range.start,
            end_date: range.end,
            total_days: range.total_days(),
            days: days
                .into_iter()
                .map(|(date, meals)| PreviewDay { date, meals })
                .collect(),
            warnings: warnings.iter().map(WarningRecord::from).collect(),
        }
    }
}
