//! Caliber-union expansion of a single whitelist.
//!
//! The existing entries decide everything: their calibers (looked up in the
//! index) select which ammo groups to pull in, and their element shape
//! decides how new ids are written. Entries are only ever appended.

use crate::access::{self, FieldName};
use crate::catalog::{AmmoIndex, Caliber, IdRepr, ItemId, fold};
use anyhow::{Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Mutable view over one whitelist array.
pub struct Whitelist<'a> {
    elements: &'a mut Vec<Value>,
    wrapped_id: &'a FieldName,
}

impl<'a> Whitelist<'a> {
    pub fn new(elements: &'a mut Vec<Value>, wrapped_id: &'a FieldName) -> Self {
        Self {
            elements,
            wrapped_id,
        }
    }

    /// Identifiers currently listed, in element order. Elements that are
    /// neither strings nor wrapped ids are skipped (and left in place).
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .filter_map(|element| entry_id(element, self.wrapped_id))
    }

    /// Representation of the first recognizable element, if any.
    pub fn sampled_repr(&self) -> Option<IdRepr> {
        self.elements.iter().find_map(|element| match element {
            Value::String(_) => Some(IdRepr::Bare),
            Value::Object(_) => {
                let key = access::resolve_field_key(element, self.wrapped_id)?;
                element
                    .get(key)
                    .is_some_and(Value::is_string)
                    .then(|| IdRepr::Wrapped {
                        key: key.to_string(),
                    })
            }
            _ => None,
        })
    }

    fn push(&mut self, id: &ItemId, repr: &IdRepr) -> Result<()> {
        if let IdRepr::Wrapped { key } = repr {
            if key.trim().is_empty() {
                bail!("cannot append {id}: wrapped id representation has an empty key");
            }
        }
        self.elements.push(repr.to_element(id));
        Ok(())
    }
}

fn entry_id<'v>(element: &'v Value, wrapped_id: &FieldName) -> Option<&'v str> {
    match element {
        Value::String(id) => Some(id.as_str()),
        Value::Object(_) => access::get_field(element, wrapped_id).and_then(Value::as_str),
        _ => None,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// What expanding one whitelist would do.
pub struct ExpansionPlan {
    pub implied: BTreeSet<Caliber>,
    pub missing: Vec<ItemId>,
}

impl ExpansionPlan {
    pub fn is_noop(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Work out which ammo ids a whitelist is missing.
///
/// Empty whitelists and whitelists without any known ammo produce an empty
/// plan: there is nothing to infer a caliber from.
pub fn plan(whitelist: &Whitelist<'_>, index: &AmmoIndex) -> ExpansionPlan {
    let present: BTreeSet<String> = whitelist.ids().map(fold).collect();
    if present.is_empty() {
        return ExpansionPlan::default();
    }
    let implied = index.implied_calibers(whitelist.ids());
    if implied.is_empty() {
        return ExpansionPlan::default();
    }

    let mut candidates: BTreeMap<String, &ItemId> = BTreeMap::new();
    for caliber in &implied {
        for id in index.ammo_of(caliber) {
            candidates.entry(id.folded()).or_insert(id);
        }
    }
    let missing = candidates
        .into_iter()
        .filter(|(folded, _)| !present.contains(folded))
        .map(|(_, id)| id.clone())
        .collect();

    ExpansionPlan { implied, missing }
}

/// Expand `whitelist` to every known ammo id of the calibers it already
/// references. Returns how many ids were appended.
pub fn expand(
    whitelist: &mut Whitelist<'_>,
    index: &AmmoIndex,
    default_repr: &IdRepr,
) -> Result<usize> {
    let plan = plan(whitelist, index);
    apply(whitelist, &plan, default_repr)
}

/// Append the ids listed in `plan`.
pub fn apply(
    whitelist: &mut Whitelist<'_>,
    plan: &ExpansionPlan,
    default_repr: &IdRepr,
) -> Result<usize> {
    if plan.is_noop() {
        return Ok(0);
    }
    let repr = whitelist
        .sampled_repr()
        .unwrap_or_else(|| default_repr.clone());
    for id in &plan.missing {
        whitelist.push(id, &repr)?;
    }
    Ok(plan.missing.len())
}
