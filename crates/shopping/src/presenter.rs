use std::cmp::Ordering;
use std::collections::BTreeSet;

use mealinsights_shared::{Amount, DateRange, ItemType, Nutrition, Unit, amount};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Date, OffsetDateTime};

use crate::aggregation::AggregatedItem;
use crate::nutrition::{DayNutrition, NutritionReport};
use crate::warning::WarningRecord;

pub const DEFAULT_PRECISION: u32 = 2;

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
pub enum SortBy {
    #[default]
    IngredientName,
    Quantity,
    ShopSuggestion,
    MealName,
    PlannedDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListItemRecord {
    pub item_type: ItemType,
    pub item_id: String,
    pub name: String,
    pub total_quantity: String,
    pub unit: Unit,
    pub category: Option<String>,
    pub shop_suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    pub planned_meals: Vec<String>,
    pub planned_dates: Vec<Date>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingSummary {
    pub total_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_estimated_cost: Option<f64>,
    pub categories: Vec<String>,
    pub date_range_start: Date,
    pub date_range_end: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListResponse {
    pub items: Vec<ShoppingListItemRecord>,
    pub summary: ShoppingSummary,
    pub warnings: Vec<WarningRecord>,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_sugar: f64,
    pub total_fat: f64,
    pub total_fiber: f64,
    pub total_saturated_fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayNutritionRecord {
    pub date: Date,
    #[serde(flatten)]
    pub totals: NutritionTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionResponse {
    pub start_date: Date,
    pub end_date: Date,
    pub days: Vec<DayNutritionRecord>,
    pub total: NutritionTotals,
    pub warnings: Vec<WarningRecord>,
}

/// Sort/Filter Presenter
///
/// Orders shopping-list rows and turns exact amounts into display records.
/// This is the only place where values get rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presenter {
    precision: u32,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl Presenter {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Stable sort: rows with equal keys keep their discovery order.
    pub fn sort(items: &mut [AggregatedItem], sort_by: SortBy) {
        match sort_by {
            SortBy::IngredientName => items.sort_by(by_name),
            SortBy::Quantity => items.sort_by(|a, b| {
                b.total_quantity
                    .partial_cmp(&a.total_quantity)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| by_name(a, b))
            }),
            SortBy::ShopSuggestion => items.sort_by(|a, b| {
                by_shop(a.shop_suggestion.as_deref(), b.shop_suggestion.as_deref())
                    .then_with(|| by_name(a, b))
            }),
            SortBy::MealName => items.sort_by(|a, b| {
                a.planned_meals
                    .first()
                    .cmp(&b.planned_meals.first())
                    .then_with(|| by_name(a, b))
            }),
            SortBy::PlannedDate => items.sort_by(|a, b| {
                a.planned_dates
                    .first()
                    .cmp(&b.planned_dates.first())
                    .then_with(|| by_name(a, b))
            }),
        }
    }

    pub fn present(mut items: Vec<AggregatedItem>, sort_by: SortBy) -> Vec<AggregatedItem> {
        Self::sort(&mut items, sort_by);
        items
    }

    pub fn item_record(&self, item: &AggregatedItem) -> ShoppingListItemRecord {
        ShoppingListItemRecord {
            item_type: item.item.item_type(),
            item_id: item.item.id().to_owned(),
            name: item.name.to_owned(),
            total_quantity: amount::format(&item.total_quantity, self.precision),
            unit: item.unit,
            category: item.category.clone(),
            shop_suggestion: item.shop_suggestion.clone(),
            estimated_cost: item
                .estimated_cost
                .as_ref()
                .map(|cost| amount::to_f64(cost, self.precision)),
            planned_meals: item.planned_meals.iter().cloned().collect(),
            planned_dates: item.planned_dates.iter().copied().collect(),
        }
    }

    /// Summary over already presented rows.
    ///
    /// `total_estimated_cost` sums the known estimates and is absent when no
    /// row has one.
    pub fn summary(&self, items: &[AggregatedItem], range: &DateRange) -> ShoppingSummary {
        let total_estimated_cost = items
            .iter()
            .filter_map(|item| item.estimated_cost.clone())
            .reduce(|total, cost| total + cost);

        let categories = items
            .iter()
            .filter_map(|item| item.category.clone())
            .collect::<BTreeSet<_>>();

        ShoppingSummary {
            total_items: items.len(),
            total_estimated_cost: total_estimated_cost
                .as_ref()
                .map(|cost| amount::to_f64(cost, self.precision)),
            categories: categories.into_iter().collect(),
            date_range_start: range.start,
            date_range_end: range.end,
        }
    }

    pub fn totals(&self, nutrition: &Nutrition) -> NutritionTotals {
        let value = |amount: &Amount| amount::to_f64(amount, self.precision);

        NutritionTotals {
            total_calories: value(&nutrition.calories),
            total_protein: value(&nutrition.macros.protein),
            total_carbs: value(&nutrition.macros.carbs),
            total_sugar: value(&nutrition.macros.sugar),
            total_fat: value(&nutrition.macros.fat),
            total_fiber: value(&nutrition.macros.fiber),
            total_saturated_fat: value(&nutrition.macros.saturated_fat),
        }
    }

    pub fn day_record(&self, day: &DayNutrition) -> DayNutritionRecord {
        DayNutritionRecord {
            date: day.date,
            totals: self.totals(&day.total),
        }
    }

    pub fn nutrition(&self, report: &NutritionReport) -> NutritionResponse {
        NutritionResponse {
            start_date: report.range.start,
            end_date: report.range.end,
            days: report.days.values().map(|day| self.day_record(day)).collect(),
            total: self.totals(&report.total),
            warnings: report.warnings.iter().map(WarningRecord::from).collect(),
        }
    }
}

fn by_name(a: &AggregatedItem, b: &AggregatedItem) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

fn by_shop(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
