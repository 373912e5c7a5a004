use std::{fmt, ops::AddAssign};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::amount::{self, Amount};
use crate::unit::UnitFamily;

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Ingredient,
    Product,
}

/// Identity of a catalog item. Ingredients and products live in separate id
/// spaces, so the kind is part of the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "item_type", content = "item_id", rename_all = "snake_case")]
pub enum ItemRef {
    Ingredient(String),
    Product(String),
}

impl ItemRef {
    pub fn ingredient(id: impl Into<String>) -> Self {
        Self::Ingredient(id.into())
    }

    pub fn product(id: impl Into<String>) -> Self {
        Self::Product(id.into())
    }

    pub fn new(item_type: ItemType, id: impl Into<String>) -> Self {
        match item_type {
            ItemType::Ingredient => Self::Ingredient(id.into()),
            ItemType::Product => Self::Product(id.into()),
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            ItemRef::Ingredient(_) => ItemType::Ingredient,
            ItemRef::Product(_) => ItemType::Product,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ItemRef::Ingredient(id) | ItemRef::Product(id) => id,
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_type(), self.id())
    }
}

/// Macronutrients in grams.
#[derive(Clone, Debug, PartialEq)]
pub struct Macros {
    pub protein: Amount,
    pub carbs: Amount,
    pub sugar: Amount,
    pub fat: Amount,
    pub fiber: Amount,
    pub saturated_fat: Amount,
}

impl Default for Macros {
    fn default() -> Self {
        Self {
            protein: amount::zero(),
            carbs: amount::zero(),
            sugar: amount::zero(),
            fat: amount::zero(),
            fiber: amount::zero(),
            saturated_fat: amount::zero(),
        }
    }
}

impl Macros {
    pub fn scaled(&self, factor: &Amount) -> Self {
        Self {
            protein: self.protein.clone() * factor.clone(),
            carbs: self.carbs.clone() * factor.clone(),
            sugar: self.sugar.clone() * factor.clone(),
            fat: self.fat.clone() * factor.clone(),
            fiber: self.fiber.clone() * factor.clone(),
            saturated_fat: self.saturated_fat.clone() * factor.clone(),
        }
    }
}

impl AddAssign<&Macros> for Macros {
    fn add_assign(&mut self, rhs: &Macros) {
        self.protein += rhs.protein.clone();
        self.carbs += rhs.carbs.clone();
        self.sugar += rhs.sugar.clone();
        self.fat += rhs.fat.clone();
        self.fiber += rhs.fiber.clone();
        self.saturated_fat += rhs.saturated_fat.clone();
    }
}

/// Calories plus macros, either per 100 base units or as absolute totals.
#[derive(Clone, Debug, PartialEq)]
pub struct Nutrition {
    pub calories: Amount,
    pub macros: Macros,
}

impl Default for Nutrition {
    fn default() -> Self {
        Self {
            calories: amount::zero(),
            macros: Macros::default(),
        }
    }
}

impl Nutrition {
    /// Absolute nutrition for `base_amount` base units of an item whose
    /// profile is expressed per 100 base units.
    pub fn for_base_amount(&self, base_amount: &Amount) -> Self {
        let factor = base_amount.clone() / amount::whole(100);

        Self {
            calories: self.calories.clone() * factor.clone(),
            macros: self.macros.scaled(&factor),
        }
    }
}

impl AddAssign<&Nutrition> for Nutrition {
    fn add_assign(&mut self, rhs: &Nutrition) {
        self.calories += rhs.calories.clone();
        self.macros += &rhs.macros;
    }
}

/// Catalog view of an ingredient or product.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemProfile {
    pub item: ItemRef,
    pub name: String,
    pub per_100_base: Nutrition,
    pub base_unit_kind: UnitFamily,
    pub default_shop: Option<String>,
    pub category: Option<String>,
}
