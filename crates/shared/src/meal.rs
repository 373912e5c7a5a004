use crate::amount::{self, Amount};
use crate::item::{ItemRef, Nutrition};
use crate::unit::Quantity;
use crate::{Error, Result};

/// One row of a meal's composition.
#[derive(Clone, Debug, PartialEq)]
pub struct MealIngredientLine {
    pub item: ItemRef,
    pub quantity: Quantity,
}

/// Declares that `equivalent` is bought instead of `original` for one meal.
///
/// `equivalent quantity = original quantity * conversion_ratio`
#[derive(Clone, Debug, PartialEq)]
pub struct EquivalentRule {
    original: ItemRef,
    equivalent: ItemRef,
    conversion_ratio: Amount,
}

impl EquivalentRule {
    pub fn new(original: ItemRef, equivalent: ItemRef, conversion_ratio: Amount) -> Result<Self> {
        if !amount::is_positive(&conversion_ratio) {
            return Err(Error::InvalidQuantity(format!(
                "conversion ratio {conversion_ratio} for {original} must be positive"
            )));
        }

        Ok(Self {
            original,
            equivalent,
            conversion_ratio,
        })
    }

    pub fn one_to_one(original: ItemRef, equivalent: ItemRef) -> Self {
        Self {
            original,
            equivalent,
            conversion_ratio: amount::whole(1),
        }
    }

    pub fn original(&self) -> &ItemRef {
        &self.original
    }

    pub fn equivalent(&self) -> &ItemRef {
        &self.equivalent
    }

    pub fn conversion_ratio(&self) -> &Amount {
        &self.conversion_ratio
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MealDefinition {
    pub id: String,
    pub name: String,
    pub ingredient_lines: Vec<MealIngredientLine>,
    pub equivalents: Vec<EquivalentRule>,
    /// Totals stored alongside the meal by the editor. Informational only:
    /// aggregation always recomputes from the ingredient lines.
    pub cached_nutrition: Option<Nutrition>,
}
