pub mod amount;
mod date;
mod error;
pub mod item;
pub mod meal;
pub mod plan;
pub mod unit;

pub use amount::Amount;
pub use date::*;
pub use error::*;
pub use item::{ItemProfile, ItemRef, ItemType, Macros, Nutrition};
pub use meal::{EquivalentRule, MealDefinition, MealIngredientLine};
pub use plan::{MealAssignment, MealType};
pub use unit::{Quantity, Unit, UnitFamily};
