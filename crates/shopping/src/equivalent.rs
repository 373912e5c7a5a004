use std::collections::HashMap;

use mealinsights_shared::{Amount, EquivalentRule, ItemRef, amount};

use crate::warning::Warning;

/// Item a quantity is aggregated under, and the factor applied on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub canonical: ItemRef,
    pub ratio: Amount,
}

impl Substitution {
    pub fn identity(item: &ItemRef) -> Self {
        Self {
            canonical: item.clone(),
            ratio: amount::whole(1),
        }
    }
}

/// Resolves a single item against a rule list.
///
/// When several rules name the same original item, the first declared one
/// wins.
pub fn resolve(item: &ItemRef, rules: &[EquivalentRule]) -> Substitution {
    rules
        .iter()
        .find(|rule| rule.original() == item)
        .map(|rule| Substitution {
            canonical: rule.equivalent().clone(),
            ratio: rule.conversion_ratio().clone(),
        })
        .unwrap_or_else(|| Substitution::identity(item))
}

/// Equivalent Resolver for one meal.
///
/// The rule list is reduced once to an `original → substitution` map
/// (first-declared wins). Every original item with more than one rule yields
/// an [`Warning::AmbiguousEquivalent`]. Substitutions are single-step: the
/// equivalent of an equivalent is not followed.
#[derive(Debug, Clone, Default)]
pub struct EquivalentResolver {
    active: HashMap<ItemRef, Substitution>,
}

impl EquivalentResolver {
    pub fn new(meal_id: &str, rules: &[EquivalentRule]) -> (Self, Vec<Warning>) {
        let mut active = HashMap::new();
        let mut counts: Vec<(ItemRef, usize)> = vec![];

        for rule in rules {
            match counts.iter_mut().find(|(item, _)| item == rule.original()) {
                Some((_, count)) => *count += 1,
                None => counts.push((rule.original().clone(), 1)),
            }

            active
                .entry(rule.original().clone())
                .or_insert_with(|| Substitution {
                    canonical: rule.equivalent().clone(),
                    ratio: rule.conversion_ratio().clone(),
                });
        }

        let warnings = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(item, rules)| Warning::AmbiguousEquivalent {
                meal_id: meal_id.to_owned(),
                item,
                rules,
            })
            .collect();

        (Self { active }, warnings)
    }

    pub fn resolve(&self, item: &ItemRef) -> Substitution {
        self.active
            .get(item)
            .cloned()
            .unwrap_or_else(|| Substitution::identity(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(original: &str, equivalent: &str, ratio: u64) -> EquivalentRule {
        EquivalentRule::new(
            ItemRef::ingredient(original),
            ItemRef::ingredient(equivalent),
            amount::whole(ratio),
        )
        .unwrap()
    }

    #[test]
    fn test_no_rule_is_identity() {
        let item = ItemRef::ingredient("a");
        let substitution = resolve(&item, &[rule("b", "c", 2)]);

        assert_eq!(substitution, Substitution::identity(&item));
    }

    #[test]
    fn test_single_rule_applies_ratio() {
        let substitution = resolve(&ItemRef::ingredient("a"), &[rule("a", "b", 2)]);

        assert_eq!(substitution.canonical, ItemRef::ingredient("b"));
        assert_eq!(substitution.ratio, amount::whole(2));
    }

    #[test]
    fn test_first_declared_rule_wins() {
        let rules = [rule("a", "b", 2), rule("a", "c", 3)];

        let (resolver, warnings) = EquivalentResolver::new("meal-1", &rules);

        assert_eq!(resolver.resolve(&ItemRef::ingredient("a")).canonical, ItemRef::ingredient("b"));
        assert_eq!(resolve(&ItemRef::ingredient("a"), &rules).canonical, ItemRef::ingredient("b"));
        assert_eq!(
            warnings,
            vec![Warning::AmbiguousEquivalent {
                meal_id: "meal-1".to_owned(),
                item: ItemRef::ingredient("a"),
                rules: 2,
            }]
        );
    }

    #[test]
    fn test_item_type_is_part_of_the_match() {
        let rules = [rule("a", "b", 2)];
        let (resolver, warnings) = EquivalentResolver::new("meal-1", &rules);

        assert!(warnings.is_empty());
        assert_eq!(resolver.resolve(&ItemRef::product("a")).canonical, ItemRef::product("a"));
    }

    #[test]
    fn test_substitutions_are_not_chained() {
        let rules = [rule("a", "b", 2), rule("b", "c", 3)];
        let (resolver, _) = EquivalentResolver::new("meal-1", &rules);

        let substitution = resolver.resolve(&ItemRef::ingredient("a"));

        assert_eq!(substitution.canonical, ItemRef::ingredient("b"));
        assert_eq!(substitution.ratio, amount::whole(2));
    }
}
