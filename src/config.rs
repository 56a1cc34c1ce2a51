//! Pass configuration.
//!
//! Defaults match the common item-dump layout. A JSON file can override any
//! subset of fields (every field is `#[serde(default)]`), and a couple of
//! environment variables adjust the result so host scripts can flip behavior
//! without editing files.

use crate::access::FieldName;
use crate::catalog::IdRepr;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Path to a JSON config file, consulted when no explicit path is given.
pub const ENV_CONFIG_PATH: &str = "CALIBER_SYNC_CONFIG";
/// Truthy unless empty or `0`; forces a dry run.
pub const ENV_DRY_RUN: &str = "CALIBER_SYNC_DRY_RUN";

/// Accepted spellings for every logical field the pass reads.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAliases {
    pub properties: FieldName,
    pub caliber: FieldName,
    /// At least one of these must be present for an item to count as ammo.
    pub damage: Vec<FieldName>,
    pub chambers: FieldName,
    pub cartridges: FieldName,
    pub slots: FieldName,
    pub filter_group: FieldName,
    pub filter: FieldName,
    /// Keys that hold the identifier inside wrapped whitelist entries.
    pub wrapped_id: FieldName,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            properties: FieldName::new("_props", "Properties"),
            caliber: FieldName::new("Caliber", "ammoCaliber"),
            damage: vec![
                FieldName::new("Damage", "damage"),
                FieldName::new("PenetrationPower", "penetration_power"),
            ],
            chambers: FieldName::new("Chambers", "chambers"),
            cartridges: FieldName::new("Cartridges", "cartridges"),
            slots: FieldName::new("Slots", "slots"),
            filter_group: FieldName::new("filters", "Filters"),
            filter: FieldName::new("Filter", "filter"),
            wrapped_id: FieldName::new("_id", "id"),
        }
    }
}

impl FieldAliases {
    /// Collections whose elements carry their own properties to search.
    pub fn containers(&self) -> [&FieldName; 3] {
        [&self.chambers, &self.cartridges, &self.slots]
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    pub fields: FieldAliases,
    /// Representation used when a whitelist has no element to sample.
    pub default_id_repr: IdRepr,
    /// Count what would be added without touching any whitelist.
    pub dry_run: bool,
}

impl PassConfig {
    /// Read a config file; missing fields fall back to defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading pass config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("parsing pass config {}", path.display()))
    }

    /// Resolve the effective config for a host run.
    ///
    /// An explicit path wins over `CALIBER_SYNC_CONFIG`; with neither, the
    /// defaults apply. `CALIBER_SYNC_DRY_RUN` is layered on last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(ENV_CONFIG_PATH).map(PathBuf::from))
            .filter(|path| !path.as_os_str().is_empty());
        let mut config = match path {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };
        if env_flag(ENV_DRY_RUN) {
            config.dry_run = true;
        }
        Ok(config)
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .ok()
        .map(|v| !v.trim().is_empty() && v != "0")
        .unwrap_or(false)
}
