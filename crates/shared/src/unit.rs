use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::amount::{self, Amount};
use crate::{Error, Result};

/// Conversions only ever happen inside one family.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum UnitFamily {
    #[default]
    Mass,
    Volume,
    Count,
}

impl UnitFamily {
    pub fn base_unit(&self) -> Unit {
        match self {
            UnitFamily::Mass => Unit::Gram,
            UnitFamily::Volume => Unit::Milliliter,
            UnitFamily::Count => Unit::Piece,
        }
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Unit {
    #[default]
    #[strum(to_string = "g", serialize = "gram", serialize = "grams")]
    #[serde(rename = "g", alias = "gram")]
    Gram,
    #[strum(to_string = "ml", serialize = "milliliter", serialize = "milliliters")]
    #[serde(rename = "ml", alias = "milliliter")]
    Milliliter,
    #[strum(to_string = "piece", serialize = "pieces", serialize = "pcs")]
    #[serde(rename = "piece", alias = "pieces")]
    Piece,
    #[strum(to_string = "cup", serialize = "cups")]
    #[serde(rename = "cup", alias = "cups")]
    Cup,
    #[strum(to_string = "tbsp", serialize = "tablespoon", serialize = "tablespoons")]
    #[serde(rename = "tbsp", alias = "tablespoon")]
    Tablespoon,
    #[strum(to_string = "tsp", serialize = "teaspoon", serialize = "teaspoons")]
    #[serde(rename = "tsp", alias = "teaspoon")]
    Teaspoon,
}

impl Unit {
    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Gram => UnitFamily::Mass,
            Unit::Milliliter | Unit::Cup | Unit::Tablespoon | Unit::Teaspoon => UnitFamily::Volume,
            Unit::Piece => UnitFamily::Count,
        }
    }

    /// How many base units of its family one of this unit is worth.
    ///
    /// 1 cup = 240 ml, 1 tbsp = 15 ml, 1 tsp = 5 ml.
    pub fn base_factor(&self) -> Amount {
        match self {
            Unit::Gram | Unit::Milliliter | Unit::Piece => amount::whole(1),
            Unit::Cup => amount::whole(240),
            Unit::Tablespoon => amount::whole(15),
            Unit::Teaspoon => amount::whole(5),
        }
    }
}

/// A strictly positive amount in a given unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    amount: Amount,
    unit: Unit,
}

impl Quantity {
    pub fn new(amount: Amount, unit: Unit) -> Result<Self> {
        if !amount::is_positive(&amount) {
            return Err(Error::InvalidQuantity(format!(
                "{amount} {unit} must be a positive amount"
            )));
        }

        Ok(Self { amount, unit })
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Multiplies the amount by a positive factor (servings, conversion ratio).
    pub fn scale(&self, factor: &Amount) -> Result<Self> {
        Self::new(self.amount.clone() * factor.clone(), self.unit)
    }
}
