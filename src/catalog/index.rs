//! Caliber index derived from a catalog.
//!
//! Built once per pass from the catalog as it stands before any whitelist is
//! touched, then only read. Both directions are kept consistent: every ammo id
//! in `ammo_to_caliber` sits in exactly one `caliber_to_ammo` group.

use crate::catalog::{Caliber, Catalog, ItemId, fold};
use crate::classify::classify;
use crate::config::FieldAliases;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

#[derive(Clone, Debug, Default)]
pub struct AmmoIndex {
    /// Folded ammo id → caliber.
    ammo_to_caliber: BTreeMap<String, Caliber>,
    /// Caliber → folded ammo id → id as spelled in the catalog.
    caliber_to_ammo: BTreeMap<Caliber, BTreeMap<String, ItemId>>,
}

impl AmmoIndex {
    /// Scan every item once and index the ones classified as ammo.
    ///
    /// Ids that differ only in case collapse to the first one seen in catalog
    /// order.
    pub fn build(catalog: &Catalog, fields: &FieldAliases) -> Self {
        let mut index = Self::default();
        for (id, record) in catalog.iter() {
            if let Some(caliber) = classify(record, fields).caliber() {
                index.insert(ItemId(id.clone()), caliber.clone());
            }
        }
        debug!(
            ammo = index.len(),
            calibers = index.caliber_count(),
            "built ammo index"
        );
        index
    }

    fn insert(&mut self, id: ItemId, caliber: Caliber) {
        let folded = id.folded();
        let caliber = self
            .caliber_to_ammo
            .get_key_value(&caliber)
            .map(|(group, _)| group.clone())
            .unwrap_or(caliber);
        match self.ammo_to_caliber.entry(folded.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(caliber.clone());
                self.caliber_to_ammo
                    .entry(caliber)
                    .or_default()
                    .insert(folded, id);
            }
            Entry::Occupied(existing) => {
                let kept = self
                    .caliber_to_ammo
                    .get(existing.get())
                    .and_then(|group| group.get(&folded))
                    .map(ItemId::as_str)
                    .unwrap_or_default();
                warn!(
                    kept,
                    dropped = %id,
                    kept_caliber = %existing.get(),
                    dropped_caliber = %caliber,
                    "ammo ids differ only in case; indexing the first one"
                );
            }
        }
    }

    /// Caliber of a known ammo id, compared case-insensitively.
    pub fn caliber_of(&self, id: &str) -> Option<&Caliber> {
        self.ammo_to_caliber.get(&fold(id))
    }

    /// Every ammo id of `caliber`, as spelled in the catalog.
    pub fn ammo_of(&self, caliber: &Caliber) -> impl Iterator<Item = &ItemId> {
        self.caliber_to_ammo
            .get(caliber)
            .into_iter()
            .flat_map(|group| group.values())
    }

    pub fn calibers(&self) -> impl Iterator<Item = &Caliber> {
        self.caliber_to_ammo.keys()
    }

    /// Number of known ammo ids.
    pub fn len(&self) -> usize {
        self.ammo_to_caliber.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ammo_to_caliber.is_empty()
    }

    pub fn caliber_count(&self) -> usize {
        self.caliber_to_ammo.len()
    }

    /// Calibers implied by a set of whitelist entries.
    pub fn implied_calibers<'a, I>(&self, ids: I) -> BTreeSet<Caliber>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter()
            .filter_map(|id| self.caliber_of(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn ammo(caliber: &str) -> Value {
        json!({"_props": {"Caliber": caliber, "Damage": 40}})
    }

    fn catalog(entries: Vec<(&str, Value)>) -> Catalog {
        entries
            .into_iter()
            .map(|(id, record)| (id.to_string(), record))
            .collect()
    }

    #[test]
    fn indexes_both_directions() {
        let catalog = catalog(vec![
            ("a1", ammo("X")),
            ("a2", ammo("X")),
            ("a3", ammo("Y")),
            ("mag", json!({"_props": {"Cartridges": []}})),
        ]);
        let index = AmmoIndex::build(&catalog, &FieldAliases::default());

        assert_eq!(index.len(), 3);
        assert_eq!(index.caliber_count(), 2);
        let x = Caliber::parse("X").unwrap();
        let group: Vec<_> = index.ammo_of(&x).map(ItemId::as_str).collect();
        assert_eq!(group, vec!["a1", "a2"]);
        assert!(index.caliber_of("mag").is_none());

        for caliber in index.calibers() {
            for id in index.ammo_of(caliber) {
                assert_eq!(index.caliber_of(id.as_str()), Some(caliber));
            }
        }
    }

    #[test]
    fn caliber_groups_ignore_case() {
        let catalog = catalog(vec![("a1", ammo("9x19mm")), ("a2", ammo("9X19MM"))]);
        let index = AmmoIndex::build(&catalog, &FieldAliases::default());
        assert_eq!(index.caliber_count(), 1);
        assert_eq!(index.caliber_of("a1"), index.caliber_of("a2"));
        assert_eq!(index.calibers().next().unwrap().display(), "9x19mm");
        assert_eq!(index.caliber_of("a2").unwrap().display(), "9x19mm");
    }

    #[test]
    fn case_colliding_ids_keep_the_first_in_catalog_order() {
        let catalog = catalog(vec![("A1", ammo("X")), ("a1", ammo("Y")), ("y2", ammo("Y"))]);
        let index = AmmoIndex::build(&catalog, &FieldAliases::default());

        assert_eq!(index.len(), 2);
        assert_eq!(index.caliber_of("a1").unwrap().display(), "X");
        let y = Caliber::parse("Y").unwrap();
        let group: Vec<_> = index.ammo_of(&y).map(ItemId::as_str).collect();
        assert_eq!(group, vec!["y2"]);
    }

    #[test]
    fn id_lookup_ignores_case() {
        let catalog = catalog(vec![("AmmoOne", ammo("X"))]);
        let index = AmmoIndex::build(&catalog, &FieldAliases::default());
        assert!(index.caliber_of("ammoone").is_some());
        let implied = index.implied_calibers(["AMMOONE", "unknown"]);
        assert_eq!(implied.len(), 1);
    }

    #[test]
    fn empty_catalog_gives_empty_index() {
        let index = AmmoIndex::build(&Catalog::new(), &FieldAliases::default());
        assert!(index.is_empty());
        assert_eq!(index.calibers().count(), 0);
    }
}
