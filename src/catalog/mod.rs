//! Item catalog wiring.
//!
//! `Catalog` holds the untyped item records the pass mutates, `identity`
//! defines the identifier and caliber keys compared case-insensitively across
//! the crate, and `AmmoIndex` is the caliber index rebuilt at the start of
//! every pass.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{Caliber, IdRepr, ItemId, fold};
pub use index::AmmoIndex;
pub use model::{
    Catalog, CatalogLayout, load_catalog_document, load_catalog_from_path, parse_catalog,
    parse_catalog_document,
};
