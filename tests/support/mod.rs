#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use calibersync::Catalog;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::{Command, Output};

pub const MAG_FILTER: &str = "/_props/Cartridges/0/_props/filters/0/Filter";
pub const CHAMBER_FILTER: &str = "/_props/Chambers/0/_props/filters/0/Filter";

pub fn ammo(caliber: &str) -> Value {
    json!({
        "_type": "Item",
        "_props": {
            "Name": "round",
            "Caliber": caliber,
            "Damage": 50,
            "PenetrationPower": 25
        }
    })
}

pub fn magazine(filter: Value) -> Value {
    json!({
        "_type": "Item",
        "_props": {
            "Cartridges": [{
                "_name": "cartridges",
                "_max_count": 30,
                "_props": {"filters": [{"Filter": filter}]}
            }]
        }
    })
}

pub fn weapon(chamber_filter: Value, magazine_slot_filter: Value) -> Value {
    json!({
        "_type": "Item",
        "_props": {
            "ammoCaliber": "display only",
            "Chambers": [{
                "_name": "patron_in_weapon",
                "_props": {"filters": [{"Filter": chamber_filter}]}
            }],
            "Slots": [{
                "_name": "mod_magazine",
                "_props": {"filters": [{"Filter": magazine_slot_filter}]}
            }]
        }
    })
}

pub fn catalog_of(entries: Vec<(&str, Value)>) -> Catalog {
    entries
        .into_iter()
        .map(|(id, record)| (id.to_string(), record))
        .collect()
}

pub fn filter_at(catalog: &Catalog, id: &str, pointer: &str) -> Vec<Value> {
    catalog
        .get(id)
        .and_then(|record| record.pointer(pointer))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_else(|| panic!("no whitelist at {pointer} on {id}"))
}

pub fn id_set(elements: &[Value]) -> BTreeSet<String> {
    elements
        .iter()
        .filter_map(|element| match element {
            Value::String(id) => Some(id.clone()),
            Value::Object(map) => map.get("_id").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

pub fn set_of(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn cli_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_caliber-sync"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
