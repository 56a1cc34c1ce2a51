//! Ammo whitelists embedded in item records.
//!
//! `locate` walks one record and yields pointer handles to every filter
//! array it recognizes; `expand` takes one such array and appends the ammo
//! ids its existing entries imply.

pub mod expand;
pub mod locate;

pub use expand::{ExpansionPlan, Whitelist, apply, expand, plan};
pub use locate::{WhitelistLocation, WhitelistLocator, locate_whitelists};
