use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Date, Time};

use crate::amount::Amount;

/// Declaration order is the within-day order used for sorting assignments.
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
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// A meal placed on the calendar by the planner.
#[derive(Clone, Debug, PartialEq)]
pub struct MealAssignment {
    pub id: String,
    pub plan_date: Date,
    pub meal_id: String,
    pub meal_type: MealType,
    pub specific_time: Option<Time>,
    pub servings: Amount,
    pub notes: Option<String>,
}
