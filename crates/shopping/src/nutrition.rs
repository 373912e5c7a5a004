use std::collections::BTreeMap;

use mealinsights_shared::{DateRange, Nutrition};
use time::Date;

use crate::warning::Warning;

/// Calories and macros eaten on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayNutrition {
    pub date: Date,
    pub total: Nutrition,
}

impl DayNutrition {
    pub fn empty(date: Date) -> Self {
        Self {
            date,
            total: Nutrition::default(),
        }
    }
}

/// Per-day nutrition over a date range, one entry per date, plus the range
/// total.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionReport {
    pub range: DateRange,
    pub days: BTreeMap<Date, DayNutrition>,
    pub total: Nutrition,
    pub warnings: Vec<Warning>,
}

impl NutritionReport {
    pub fn new(range: DateRange, days: Vec<DayNutrition>, warnings: Vec<Warning>) -> Self {
        let mut total = Nutrition::default();
        for day in &days {
            total += &day.total;
        }

        Self {
            range,
            days: days.into_iter().map(|day| (day.date, day)).collect(),
            total,
            warnings,
        }
    }

    pub fn day(&self, date: Date) -> Option<&DayNutrition> {
        self.days.get(&date)
    }
}
