use mealinsights_shared::{Amount, MealDefinition, MealIngredientLine, Result};

use crate::equivalent::EquivalentResolver;
use crate::warning::Warning;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedMeal {
    pub lines: Vec<MealIngredientLine>,
    pub warnings: Vec<Warning>,
}

/// Meal Expander
///
/// Flattens a meal into item lines scaled by `servings`, with equivalents
/// already applied: `amount = line amount * servings * ratio`, unit kept as
/// written. Output order is the meal's ingredient-line order.
///
/// Fails with [`mealinsights_shared::Error::InvalidQuantity`] when `servings`
/// is not positive.
pub struct MealExpander;

impl MealExpander {
    pub fn expand(meal: &MealDefinition, servings: &Amount) -> Result<ExpandedMeal> {
        let (equivalents, warnings) = EquivalentResolver::new(&meal.id, &meal.equivalents);
        let mut lines = Vec::with_capacity(meal.ingredient_lines.len());

        for line in &meal.ingredient_lines {
            let substitution = equivalents.resolve(&line.item);
            let factor = servings.clone() * substitution.ratio;

            lines.push(MealIngredientLine {
                item: substitution.canonical,
                quantity: line.quantity.scale(&factor)?,
            });
        }

        Ok(ExpandedMeal { lines, warnings })
    }
}
