use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use mealinsights_shared::{
    Amount, DateRange, ItemRef, MealAssignment, MealDefinition, MealIngredientLine, MealType, Unit,
    amount,
};
use time::Date;

use crate::catalog::{CatalogResolver, ResolvedCatalog};
use crate::error::Result;
use crate::expander::MealExpander;
use crate::nutrition::DayNutrition;
use crate::store::CatalogStore;
use crate::unit::normalize;
use crate::warning::Warning;

/// Shopping-list row: everything bought for one canonical item over the range.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem {
    pub item: ItemRef,
    pub name: String,
    /// Sum of every contributing line, in `unit`.
    pub total_quantity: Amount,
    /// Base unit of the item's family (g, ml or piece).
    pub unit: Unit,
    pub category: Option<String>,
    pub shop_suggestion: Option<String>,
    pub estimated_cost: Option<Amount>,
    pub planned_meals: BTreeSet<String>,
    pub planned_dates: BTreeSet<Date>,
}

/// An expanded line tagged with the assignment it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceLine {
    pub assignment_id: String,
    pub plan_date: Date,
    pub meal_type: MealType,
    pub meal_name: String,
    pub line: MealIngredientLine,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub lines: Vec<ProvenanceLine>,
    pub warnings: Vec<Warning>,
}

impl Expansion {
    /// Distinct canonical items in first-seen order.
    pub fn item_refs(&self) -> Vec<ItemRef> {
        let mut seen = HashSet::new();

        self.lines
            .iter()
            .filter(|line| seen.insert(&line.line.item))
            .map(|line| line.line.item.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationInput {
    pub range: DateRange,
    pub assignments: Vec<MealAssignment>,
    pub meals: HashMap<String, MealDefinition>,
    pub exclude_meal_types: HashSet<MealType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Groups in discovery order; ordering for display is the presenter's job.
    pub shopping_list: Vec<AggregatedItem>,
    /// One entry per date of the range, ascending.
    pub day_nutrition: Vec<DayNutrition>,
    pub warnings: Vec<Warning>,
}

/// Aggregation Engine
///
/// Turns meal assignments into a shopping list and per-day nutrition in a
/// single pass over the same normalized lines, so both outputs always agree.
///
/// Steps:
/// 1. keep assignments inside the range whose meal type is not excluded
/// 2. expand each into scaled, substituted lines tagged with provenance
/// 3. resolve every distinct item with one catalog batch
/// 4. normalize each line into its item's base unit, then sum per item and
///    per date
///
/// Lines and assignments that cannot be used are dropped and reported as
/// [`Warning`]s. All arithmetic is exact; nothing is rounded here.
pub struct AggregationEngine;

impl AggregationEngine {
    #[tracing::instrument(
        skip_all,
        fields(
            start = %input.range.start,
            end = %input.range.end,
            assignments = input.assignments.len()
        )
    )]
    pub async fn aggregate<C: CatalogStore + ?Sized>(
        input: &AggregationInput,
        catalog: &C,
    ) -> Result<Aggregation> {
        let selected =
            Self::select_assignments(&input.assignments, &input.range, &input.exclude_meal_types);
        let expansion = Self::expand(&selected, &input.meals);
        let items = expansion.item_refs();

        // No lines means nothing to look up; the run still yields zeroed days.
        let catalog = if items.is_empty() {
            ResolvedCatalog::default()
        } else {
            CatalogResolver::new(catalog).resolve_many(&items).await?
        };

        let aggregation = Self::fold(expansion, &catalog, &input.range);

        for warning in &aggregation.warnings {
            warning.log();
        }

        tracing::info!(
            selected = selected.len(),
            resolved = catalog.len(),
            items = aggregation.shopping_list.len(),
            days = aggregation.day_nutrition.len(),
            warnings = aggregation.warnings.len(),
            "aggregated meal plan"
        );

        Ok(aggregation)
    }

    /// Assignments inside `range` and not of an excluded type, ordered by
    /// date, meal type, then time. The sort is stable so equal slots keep the
    /// store's order.
    pub fn select_assignments<'a>(
        assignments: &'a [MealAssignment],
        range: &DateRange,
        exclude_meal_types: &HashSet<MealType>,
    ) -> Vec<&'a MealAssignment> {
        let mut selected = assignments
            .iter()
            .filter(|assignment| range.contains(assignment.plan_date))
            .filter(|assignment| !exclude_meal_types.contains(&assignment.meal_type))
            .collect::<Vec<_>>();

        selected.sort_by_key(|assignment| {
            (assignment.plan_date, assignment.meal_type, assignment.specific_time)
        });

        selected
    }

    pub fn expand(
        assignments: &[&MealAssignment],
        meals: &HashMap<String, MealDefinition>,
    ) -> Expansion {
        let mut expansion = Expansion::default();

        for assignment in assignments {
            if !amount::is_positive(&assignment.servings) {
                expansion.warnings.push(Warning::InvalidServings {
                    assignment_id: assignment.id.to_owned(),
                });
                continue;
            }

            let Some(meal) = meals.get(&assignment.meal_id) else {
                expansion.warnings.push(Warning::MealNotFound {
                    assignment_id: assignment.id.to_owned(),
                    meal_id: assignment.meal_id.to_owned(),
                });
                continue;
            };

            let expanded = match MealExpander::expand(meal, &assignment.servings) {
                Ok(expanded) => expanded,
                Err(_) => {
                    expansion.warnings.push(Warning::InvalidServings {
                        assignment_id: assignment.id.to_owned(),
                    });
                    continue;
                }
            };

            expansion.warnings.extend(expanded.warnings);
            expansion
                .lines
                .extend(expanded.lines.into_iter().map(|line| ProvenanceLine {
                    assignment_id: assignment.id.to_owned(),
                    plan_date: assignment.plan_date,
                    meal_type: assignment.meal_type,
                    meal_name: meal.name.to_owned(),
                    line,
                }));
        }

        expansion
    }

    /// Sums expanded lines into shopping-list groups and per-day nutrition.
    pub fn fold(expansion: Expansion, catalog: &ResolvedCatalog, range: &DateRange) -> Aggregation {
        let Expansion {
            lines,
            mut warnings,
        } = expansion;

        let mut days = range
            .days()
            .map(|date| (date, DayNutrition::empty(date)))
            .collect::<BTreeMap<_, _>>();
        let mut groups: Vec<AggregatedItem> = vec![];
        let mut group_index: HashMap<ItemRef, usize> = HashMap::new();
        let mut missing: Vec<(ItemRef, usize)> = vec![];

        for ProvenanceLine {
            plan_date,
            meal_name,
            line,
            ..
        } in lines
        {
            let Some(profile) = catalog.profile(&line.item) else {
                match missing.iter_mut().find(|(item, _)| *item == line.item) {
                    Some((_, count)) => *count += 1,
                    None => missing.push((line.item, 1)),
                }
                continue;
            };

            let base_amount = match normalize(&line.quantity, profile.base_unit_kind) {
                Ok(base_amount) => base_amount,
                Err(mismatch) => {
                    warnings.push(Warning::UnitMismatch {
                        item: line.item,
                        unit: mismatch.unit,
                        family: mismatch.to,
                        meal_name,
                        plan_date,
                    });
                    continue;
                }
            };

            if let Some(day) = days.get_mut(&plan_date) {
                day.total += &profile.per_100_base.for_base_amount(&base_amount);
            }

            let index = *group_index.entry(line.item.clone()).or_insert_with(|| {
                groups.push(AggregatedItem {
                    item: line.item.clone(),
                    name: profile.name.to_owned(),
                    total_quantity: amount::zero(),
                    unit: profile.base_unit_kind.base_unit(),
                    category: profile.category.clone(),
                    shop_suggestion: profile.default_shop.clone(),
                    estimated_cost: None,
                    planned_meals: BTreeSet::new(),
                    planned_dates: BTreeSet::new(),
                });
                groups.len() - 1
            });

            let group = &mut groups[index];
            group.total_quantity += base_amount;
            group.planned_meals.insert(meal_name);
            group.planned_dates.insert(plan_date);
        }

        warnings.extend(
            missing
                .into_iter()
                .map(|(item, lines)| Warning::ItemNotFound { item, lines }),
        );

        Aggregation {
            shopping_list: groups,
            day_nutrition: days.into_values().collect(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealinsights_shared::{ItemProfile, Nutrition, Quantity, UnitFamily};
    use time::macros::date;

    fn assignment(id: &str, plan_date: Date, meal_id: &str, meal_type: MealType) -> MealAssignment {
        MealAssignment {
            id: id.to_owned(),
            plan_date,
            meal_id: meal_id.to_owned(),
            meal_type,
            specific_time: None,
            servings: amount::whole(1),
            notes: None,
        }
    }

    fn meal(id: &str, lines: Vec<(ItemRef, u64, Unit)>) -> MealDefinition {
        MealDefinition {
            id: id.to_owned(),
            name: id.to_owned(),
            ingredient_lines: lines
                .into_iter()
                .map(|(item, value, unit)| MealIngredientLine {
                    item,
                    quantity: Quantity::new(amount::whole(value), unit).unwrap(),
                })
                .collect(),
            equivalents: vec![],
            cached_nutrition: None,
        }
    }

    fn profile(item: ItemRef, calories: u64, family: UnitFamily) -> ItemProfile {
        ItemProfile {
            name: item.id().to_owned(),
            item,
            per_100_base: Nutrition {
                calories: amount::whole(calories),
                ..Nutrition::default()
            },
            base_unit_kind: family,
            default_shop: None,
            category: None,
        }
    }

    fn catalog(profiles: Vec<ItemProfile>) -> ResolvedCatalog {
        ResolvedCatalog::new(
            profiles
                .into_iter()
                .map(|profile| (profile.item.clone(), profile))
                .collect(),
        )
    }

    fn range() -> DateRange {
        DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 03)).unwrap()
    }

    #[test]
    fn test_select_assignments_filters_and_orders() {
        let assignments = vec![
            assignment("a1", date!(2024 - 01 - 02), "m", MealType::Dinner),
            assignment("a2", date!(2024 - 01 - 05), "m", MealType::Lunch),
            assignment("a3", date!(2024 - 01 - 02), "m", MealType::Breakfast),
            assignment("a4", date!(2024 - 01 - 01), "m", MealType::Snack),
            assignment("a5", date!(2024 - 01 - 01), "m", MealType::Lunch),
        ];

        let selected = AggregationEngine::select_assignments(
            &assignments,
            &range(),
            &HashSet::from([MealType::Snack]),
        );

        assert_eq!(
            selected.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
            vec!["a5", "a3", "a1"]
        );
    }

    #[test]
    fn test_expand_reports_missing_meal_and_bad_servings() {
        let mut zero = assignment("a2", date!(2024 - 01 - 01), "oatmeal", MealType::Lunch);
        zero.servings = amount::zero();
        let assignments = [
            assignment("a1", date!(2024 - 01 - 01), "gone", MealType::Breakfast),
            zero,
        ];
        let meals = HashMap::from([(
            "oatmeal".to_owned(),
            meal("oatmeal", vec![(ItemRef::ingredient("oats"), 100, Unit::Gram)]),
        )]);

        let expansion = AggregationEngine::expand(&assignments.iter().collect::<Vec<_>>(), &meals);

        assert!(expansion.lines.is_empty());
        assert_eq!(
            expansion.warnings,
            vec![
                Warning::MealNotFound {
                    assignment_id: "a1".to_owned(),
                    meal_id: "gone".to_owned(),
                },
                Warning::InvalidServings {
                    assignment_id: "a2".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_fold_groups_and_counts_nutrition_per_day() {
        let assignments = [
            assignment("a1", date!(2024 - 01 - 01), "breakfast", MealType::Breakfast),
            assignment("a2", date!(2024 - 01 - 03), "dinner", MealType::Dinner),
        ];
        let meals = HashMap::from([
            (
                "breakfast".to_owned(),
                meal("breakfast", vec![(ItemRef::ingredient("y"), 50, Unit::Gram)]),
            ),
            (
                "dinner".to_owned(),
                meal("dinner", vec![(ItemRef::ingredient("y"), 30, Unit::Gram)]),
            ),
        ]);
        let expansion = AggregationEngine::expand(&assignments.iter().collect::<Vec<_>>(), &meals);
        let catalog = catalog(vec![profile(ItemRef::ingredient("y"), 200, UnitFamily::Mass)]);

        let aggregation = AggregationEngine::fold(expansion, &catalog, &range());

        assert_eq!(aggregation.shopping_list.len(), 1);
        let item = &aggregation.shopping_list[0];
        assert_eq!(item.total_quantity, amount::whole(80));
        assert_eq!(item.unit, Unit::Gram);
        assert_eq!(
            item.planned_dates,
            BTreeSet::from([date!(2024 - 01 - 01), date!(2024 - 01 - 03)])
        );
        assert_eq!(
            item.planned_meals,
            BTreeSet::from(["breakfast".to_owned(), "dinner".to_owned()])
        );

        let calories = aggregation
            .day_nutrition
            .iter()
            .map(|day| day.total.calories.clone())
            .collect::<Vec<_>>();
        assert_eq!(calories, vec![amount::whole(100), amount::zero(), amount::whole(60)]);
        assert!(aggregation.warnings.is_empty());
    }

    #[test]
    fn test_fold_keeps_long_decimals_exact() {
        let mut lunch = assignment("a1", date!(2024 - 01 - 02), "stew", MealType::Lunch);
        lunch.servings = amount::from_f64(1.5);
        let line = |item: ItemRef, value: f64| MealIngredientLine {
            item,
            quantity: Quantity::new(amount::from_f64(value), Unit::Gram).unwrap(),
        };
        let meals = HashMap::from([(
            "stew".to_owned(),
            MealDefinition {
                ingredient_lines: vec![
                    line(ItemRef::ingredient("a"), 33.333333333333336),
                    line(ItemRef::ingredient("b"), 66.66666666666667),
                    line(ItemRef::ingredient("a"), 12.345),
                ],
                ..meal("stew", vec![])
            },
        )]);
        let mut lentils = profile(ItemRef::ingredient("a"), 0, UnitFamily::Mass);
        lentils.per_100_base.calories = amount::from_f64(367.5);
        lentils.per_100_base.macros.protein = amount::from_f64(13.17);
        let mut carrots = profile(ItemRef::ingredient("b"), 0, UnitFamily::Mass);
        carrots.per_100_base.calories = amount::from_f64(52.3);

        let expansion = AggregationEngine::expand(&[&lunch], &meals);
        let catalog = catalog(vec![lentils, carrots]);
        let aggregation = AggregationEngine::fold(expansion, &catalog, &range());

        let [a, b] = aggregation.shopping_list.as_slice() else {
            panic!("expected two rows, got {:?}", aggregation.shopping_list);
        };
        assert_eq!(
            a.total_quantity,
            (amount::from_f64(33.333333333333336) + amount::from_f64(12.345))
                * amount::from_f64(1.5)
        );
        assert_eq!(amount::format(&a.total_quantity, 2), "68.52");
        assert_eq!(amount::format(&b.total_quantity, 2), "100");

        let tuesday = &aggregation.day_nutrition[1].total;
        assert_eq!(amount::format(&tuesday.calories, 2), "304.1");
        assert_eq!(amount::format(&tuesday.macros.protein, 2), "9.02");
        assert!(aggregation.warnings.is_empty());
    }

    #[test]
    fn test_fold_drops_unknown_items_and_unit_mismatches() {
        let assignments = [assignment("a1", date!(2024 - 01 - 02), "salad", MealType::Lunch)];
        let meals = HashMap::from([(
            "salad".to_owned(),
            meal(
                "salad",
                vec![
                    (ItemRef::ingredient("egg"), 2, Unit::Piece),
                    (ItemRef::ingredient("gone"), 10, Unit::Gram),
                    (ItemRef::ingredient("gone"), 5, Unit::Gram),
                    (ItemRef::ingredient("oil"), 1, Unit::Tablespoon),
                ],
            ),
        )]);
        let expansion = AggregationEngine::expand(&assignments.iter().collect::<Vec<_>>(), &meals);
        let catalog = catalog(vec![
            profile(ItemRef::ingredient("egg"), 150, UnitFamily::Mass),
            profile(ItemRef::ingredient("oil"), 800, UnitFamily::Volume),
        ]);

        let aggregation = AggregationEngine::fold(expansion, &catalog, &range());

        assert_eq!(aggregation.shopping_list.len(), 1);
        assert_eq!(aggregation.shopping_list[0].item, ItemRef::ingredient("oil"));
        assert_eq!(aggregation.shopping_list[0].total_quantity, amount::whole(15));
        assert_eq!(aggregation.shopping_list[0].unit, Unit::Milliliter);
        assert_eq!(aggregation.day_nutrition[1].total.calories, amount::whole(120));
        assert_eq!(
            aggregation.warnings,
            vec![
                Warning::UnitMismatch {
                    item: ItemRef::ingredient("egg"),
                    unit: Unit::Piece,
                    family: UnitFamily::Mass,
                    meal_name: "salad".to_owned(),
                    plan_date: date!(2024 - 01 - 02),
                },
                Warning::ItemNotFound {
                    item: ItemRef::ingredient("gone"),
                    lines: 2,
                },
            ]
        );
    }

    #[test]
    fn test_item_refs_are_distinct_in_discovery_order() {
        let assignments = [assignment("a1", date!(2024 - 01 - 01), "m", MealType::Lunch)];
        let meals = HashMap::from([(
            "m".to_owned(),
            meal(
                "m",
                vec![
                    (ItemRef::ingredient("b"), 1, Unit::Gram),
                    (ItemRef::product("a"), 1, Unit::Gram),
                    (ItemRef::ingredient("b"), 2, Unit::Gram),
                ],
            ),
        )]);

        let expansion = AggregationEngine::expand(&assignments.iter().collect::<Vec<_>>(), &meals);

        assert_eq!(
            expansion.item_refs(),
            vec![ItemRef::ingredient("b"), ItemRef::product("a")]
        );
    }
}
