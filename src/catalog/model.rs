//! In-memory item catalog.
//!
//! Records stay as untyped JSON trees: the pass only ever reads them through
//! [`crate::access`], so no per-kind schema is baked in. Loading helpers live
//! here for host binaries and tests; the pass itself only takes a
//! `&mut Catalog` from whoever loaded it.

use crate::access::{self, FieldName};
use crate::schema_loader::validate_catalog_shape;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Item id → item record, iterated in id order.
pub struct Catalog {
    items: BTreeMap<String, Value>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&mut self, id: impl Into<String>, record: Value) -> Option<Value> {
        self.items.insert(id.into(), record)
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.items.iter_mut()
    }

    /// Render the catalog in the layout it was loaded from.
    ///
    /// Listed documents come back as an array in their original record
    /// order; ids the order does not mention follow in id order.
    pub fn to_document(&self, layout: &CatalogLayout) -> Value {
        match layout {
            CatalogLayout::Keyed => Value::Object(
                self.items
                    .iter()
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect(),
            ),
            CatalogLayout::Listed { order } => {
                let listed: BTreeSet<&str> = order.iter().map(String::as_str).collect();
                let ordered = order.iter().filter_map(|id| self.items.get(id));
                let rest = self
                    .items
                    .iter()
                    .filter(|(id, _)| !listed.contains(id.as_str()))
                    .map(|(_, record)| record);
                Value::Array(ordered.chain(rest).cloned().collect())
            }
        }
    }
}

/// Outer shape of a catalog document on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogLayout {
    /// `{ "<id>": { ...record } }`
    #[default]
    Keyed,
    /// `[ { "_id": "<id>", ...record } ]`, with ids in document order.
    Listed { order: Vec<String> },
}

impl FromIterator<(String, Value)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Parse a catalog document.
///
/// Accepts either an object keyed by item id or an array of records that
/// each carry their id under `_id` (or `id`). The document shape is checked
/// against the bundled schema first so malformed dumps fail with a readable
/// report instead of an empty pass.
pub fn parse_catalog(input: &str) -> Result<Catalog> {
    parse_catalog_document(input).map(|(catalog, _)| catalog)
}

/// Parse a catalog document and remember its layout for writing it back.
pub fn parse_catalog_document(input: &str) -> Result<(Catalog, CatalogLayout)> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("catalog document is empty");
    }
    let document: Value = serde_json::from_str(trimmed).context("catalog is not valid JSON")?;
    validate_catalog_shape(&document)?;

    match document {
        Value::Object(map) => Ok((map.into_iter().collect(), CatalogLayout::Keyed)),
        Value::Array(records) => {
            let id_field = FieldName::new("_id", "id");
            let mut catalog = Catalog::new();
            let mut order = Vec::with_capacity(records.len());
            for (idx, record) in records.into_iter().enumerate() {
                let id = access::get_field(&record, &id_field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .with_context(|| format!("record {idx} has no string id"))?;
                if catalog.get(&id).is_some() {
                    bail!("duplicate item id {id} at record {idx}");
                }
                order.push(id.clone());
                catalog.insert(id, record);
            }
            Ok((catalog, CatalogLayout::Listed { order }))
        }
        _ => bail!("Unsupported catalog document; expected object or array"),
    }
}

/// Read and parse a catalog from disk.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog> {
    load_catalog_document(path).map(|(catalog, _)| catalog)
}

/// Read a catalog from disk along with its layout.
pub fn load_catalog_document(path: &Path) -> Result<(Catalog, CatalogLayout)> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    parse_catalog_document(&data).with_context(|| format!("loading catalog {}", path.display()))
}
