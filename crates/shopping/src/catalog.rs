use std::collections::{HashMap, HashSet};

use mealinsights_shared::{ItemProfile, ItemRef};

use crate::error::{Result, ShoppingError};
use crate::store::CatalogStore;

/// Profiles fetched for one aggregation run. Requested items the store did
/// not return are simply absent.
#[derive(Debug, Default, Clone)]
pub struct ResolvedCatalog {
    profiles: HashMap<ItemRef, ItemProfile>,
}

impl ResolvedCatalog {
    pub fn new(profiles: HashMap<ItemRef, ItemProfile>) -> Self {
        Self { profiles }
    }

    pub fn profile(&self, item: &ItemRef) -> Option<&ItemProfile> {
        self.profiles.get(item)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Item Catalog Resolver
///
/// Deduplicates the requested references and hits the store with a single
/// batch, so one aggregation run costs one catalog round trip regardless of
/// how many meal lines point at the same item.
pub struct CatalogResolver<'a, C: CatalogStore + ?Sized> {
    store: &'a C,
}

impl<'a, C: CatalogStore + ?Sized> CatalogResolver<'a, C> {
    pub fn new(store: &'a C) -> Self {
        Self { store }
    }

    pub async fn resolve_many(&self, items: &[ItemRef]) -> Result<ResolvedCatalog> {
        if items.is_empty() {
            return Err(ShoppingError::EmptyCatalogBatch);
        }

        let mut seen = HashSet::new();
        let unique = items
            .iter()
            .filter(|item| seen.insert(*item))
            .cloned()
            .collect::<Vec<_>>();

        tracing::debug!(requested = items.len(), unique = unique.len(), "resolving catalog batch");

        let mut fetched = self
            .store
            .resolve_many(&unique)
            .await
            .map_err(ShoppingError::Catalog)?;

        let profiles = unique
            .into_iter()
            .filter_map(|item| fetched.remove(&item).map(|profile| (item, profile)))
            .collect::<HashMap<_, _>>();

        Ok(ResolvedCatalog::new(profiles))
    }
}
