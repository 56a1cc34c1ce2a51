//! Caliber inference and ammo whitelist expansion for item catalogs.
//!
//! The crate runs one in-memory pass over a catalog of item records whose
//! schemas are not known up front. It indexes every item that looks like
//! ammunition by caliber, finds the ammo whitelists embedded in chambers,
//! magazines and slots, and appends every known round of the calibers each
//! whitelist already references. Running the pass again adds nothing.
//!
//! Public entry points: [`run_pass`] for callers that want the `Result`, and
//! [`PassRunner`] for hosts that want a single outcome that never panics
//! through them. Loading a catalog from disk ([`load_catalog_from_path`]) and
//! logging setup ([`logging::init`]) are conveniences for host binaries; the
//! pass itself does no I/O.

pub mod access;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod logging;
pub mod pass;
mod schema_loader;
pub mod whitelist;

pub use access::FieldName;
pub use catalog::{
    AmmoIndex, Caliber, Catalog, CatalogLayout, IdRepr, ItemId, load_catalog_document,
    load_catalog_from_path, parse_catalog, parse_catalog_document,
};
pub use classify::{Classification, classify};
pub use config::{FieldAliases, PassConfig};
pub use pass::{PassOutcome, PassRunner, PassSummary, run_pass};
pub use whitelist::{WhitelistLocation, locate_whitelists};
