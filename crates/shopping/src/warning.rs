use mealinsights_shared::{ItemRef, Unit, UnitFamily};
use serde::Serialize;
use strum::{AsRefStr, Display};
use time::Date;

/// A recovered, non-fatal problem encountered while aggregating.
///
/// The affected line or assignment is left out of the result and the run
/// continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Warning {
    #[error("{item} is no longer in the catalog, {lines} line(s) left out")]
    ItemNotFound { item: ItemRef, lines: usize },

    #[error("{meal_name} on {plan_date}: {unit} cannot be converted to {family} for {item}")]
    UnitMismatch {
        item: ItemRef,
        unit: Unit,
        family: UnitFamily,
        meal_name: String,
        plan_date: Date,
    },

    #[error("assignment {assignment_id} references missing meal {meal_id}")]
    MealNotFound {
        assignment_id: String,
        meal_id: String,
    },

    #[error("meal {meal_id} declares {rules} equivalents for {item}, using the first one")]
    AmbiguousEquivalent {
        meal_id: String,
        item: ItemRef,
        rules: usize,
    },

    #[error("assignment {assignment_id} has non-positive servings")]
    InvalidServings { assignment_id: String },
}

#[derive(Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ItemNotFound,
    UnitMismatch,
    MealNotFound,
    AmbiguousEquivalent,
    InvalidServings,
}

impl Warning {
    pub fn kind(&self) -> WarningKind {
        match self {
            Warning::ItemNotFound { .. } => WarningKind::ItemNotFound,
            Warning::UnitMismatch { .. } => WarningKind::UnitMismatch,
            Warning::MealNotFound { .. } => WarningKind::MealNotFound,
            Warning::AmbiguousEquivalent { .. } => WarningKind::AmbiguousEquivalent,
            Warning::InvalidServings { .. } => WarningKind::InvalidServings,
        }
    }

    pub(crate) fn log(&self) {
        tracing::warn!(kind = self.kind().as_ref(), "{}", self);
    }
}

/// Serialized form handed to callers for display as non-blocking notices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningRecord {
    pub kind: WarningKind,
    pub message: String,
}

impl From<&Warning> for WarningRecord {
    fn from(value: &Warning) -> Self {
        Self {
            kind: value.kind(),
            message: value.to_string(),
        }
    }
}
