//! Finds ammo whitelist collections inside one item record.
//!
//! Search starts at the item's own properties and follows the known
//! containment points: chamber, cartridge and slot collections, whose
//! elements carry properties of their own. Each properties node reached is
//! checked for a filter group sequence; the `Filter` field of every group
//! entry is a whitelist. Nested containers are queued on an explicit
//! worklist, so depth is unbounded but every step is a plain field lookup.
//!
//! Results are JSON Pointer handles into the record rather than borrows, so
//! the locator can run over a shared borrow and the expander can take the
//! record mutably afterwards.

use crate::access;
use crate::config::FieldAliases;
use serde_json::Value;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
/// Location of one whitelist array, relative to its item record.
pub struct WhitelistLocation {
    pointer: String,
}

impl WhitelistLocation {
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Vec<Value>> {
        record.pointer(&self.pointer).and_then(Value::as_array)
    }

    pub fn resolve_mut<'a>(&self, record: &'a mut Value) -> Option<&'a mut Vec<Value>> {
        record
            .pointer_mut(&self.pointer)
            .and_then(Value::as_array_mut)
    }
}

/// Lazily yields every whitelist in a record.
pub struct WhitelistLocator<'a> {
    record: &'a Value,
    fields: &'a FieldAliases,
    pending: VecDeque<String>,
    ready: VecDeque<WhitelistLocation>,
}

impl<'a> WhitelistLocator<'a> {
    pub fn new(record: &'a Value, fields: &'a FieldAliases) -> Self {
        let mut pending = VecDeque::new();
        if let Some(key) = access::resolve_field_key(record, &fields.properties) {
            pending.push_back(child_pointer("", key));
        }
        Self {
            record,
            fields,
            pending,
            ready: VecDeque::new(),
        }
    }

    fn visit(&mut self, props_pointer: &str) {
        let record = self.record;
        let fields = self.fields;
        let Some(props) = record.pointer(props_pointer) else {
            return;
        };
        self.queue_filters(props_pointer, props);

        for container in fields.containers() {
            let Some(key) = access::resolve_field_key(props, container) else {
                continue;
            };
            let Some(elements) = props.get(key).and_then(Value::as_array) else {
                continue;
            };
            let container_pointer = child_pointer(props_pointer, key);
            for (idx, element) in elements.iter().enumerate() {
                if let Some(nested) = access::resolve_field_key(element, &fields.properties) {
                    let element_pointer = child_pointer(&container_pointer, &idx.to_string());
                    self.pending
                        .push_back(child_pointer(&element_pointer, nested));
                }
            }
        }
    }

    fn queue_filters(&mut self, props_pointer: &str, props: &Value) {
        let fields = self.fields;
        let Some(key) = access::resolve_field_key(props, &fields.filter_group) else {
            return;
        };
        let Some(groups) = props.get(key).and_then(Value::as_array) else {
            return;
        };
        let groups_pointer = child_pointer(props_pointer, key);
        for (idx, group) in groups.iter().enumerate() {
            let Some(filter_key) = access::resolve_field_key(group, &fields.filter) else {
                continue;
            };
            if group.get(filter_key).is_some_and(Value::is_array) {
                let group_pointer = child_pointer(&groups_pointer, &idx.to_string());
                self.ready.push_back(WhitelistLocation {
                    pointer: child_pointer(&group_pointer, filter_key),
                });
            }
        }
    }
}

impl Iterator for WhitelistLocator<'_> {
    type Item = WhitelistLocation;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.ready.pop_front() {
                return Some(found);
            }
            let next = self.pending.pop_front()?;
            self.visit(&next);
        }
    }
}

/// Locate every whitelist embedded in `record`.
pub fn locate_whitelists<'a>(record: &'a Value, fields: &'a FieldAliases) -> WhitelistLocator<'a> {
    WhitelistLocator::new(record, fields)
}

// RFC 6901 escaping: `~` before `/`.
fn child_pointer(parent: &str, segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pointers(record: &Value) -> Vec<String> {
        let fields = FieldAliases::default();
        locate_whitelists(record, &fields)
            .map(|loc| loc.pointer().to_string())
            .collect()
    }

    #[test]
    fn finds_magazine_cartridge_filters() {
        let mag = json!({
            "_props": {
                "Cartridges": [{
                    "_name": "cartridges",
                    "_props": {"filters": [{"Filter": ["a1"]}]}
                }]
            }
        });
        assert_eq!(
            pointers(&mag),
            vec!["/_props/Cartridges/0/_props/filters/0/Filter"]
        );
    }

    #[test]
    fn finds_chamber_and_nested_slot_filters() {
        let weapon = json!({
            "_props": {
                "Chambers": [{"_props": {"filters": [{"Filter": ["a1"]}, {"Filter": ["a3"]}]}}],
                "Slots": [{
                    "_props": {
                        "filters": [{"Filter": ["mag"]}],
                        "Slots": [{"_props": {"Filters": [{"filter": ["deep"]}]}}]
                    }
                }]
            }
        });
        let found = pointers(&weapon);
        assert_eq!(found.len(), 4);
        assert!(found.contains(&"/_props/Chambers/0/_props/filters/0/Filter".to_string()));
        assert!(found.contains(&"/_props/Chambers/0/_props/filters/1/Filter".to_string()));
        assert!(found.contains(&"/_props/Slots/0/_props/filters/0/Filter".to_string()));
        assert!(
            found.contains(&"/_props/Slots/0/_props/Slots/0/_props/Filters/0/filter".to_string())
        );
    }

    #[test]
    fn tolerates_alternate_spellings_and_case() {
        let mag = json!({
            "Properties": {
                "cartridges": [{"properties": {"FILTERS": [{"FILTER": []}]}}]
            }
        });
        assert_eq!(
            pointers(&mag),
            vec!["/Properties/cartridges/0/properties/FILTERS/0/FILTER"]
        );
    }

    #[test]
    fn filters_directly_on_item_properties_count() {
        let item = json!({"_props": {"filters": [{"Filter": ["x"]}]}});
        assert_eq!(pointers(&item), vec!["/_props/filters/0/Filter"]);
    }

    #[test]
    fn malformed_shapes_yield_nothing() {
        assert!(pointers(&json!({})).is_empty());
        assert!(pointers(&json!({"_props": null})).is_empty());
        assert!(pointers(&json!({"_props": {"Cartridges": {"not": "array"}}})).is_empty());
        assert!(pointers(&json!({"_props": {"Slots": [1, "two", null]}})).is_empty());
        assert!(pointers(&json!({"_props": {"filters": [{"Filter": "a1"}]}})).is_empty());
        assert!(pointers(&json!({"_props": {"filters": {"Filter": ["a1"]}}})).is_empty());
    }

    #[test]
    fn escapes_pointer_segments() {
        let fields = FieldAliases {
            properties: crate::access::FieldName::new("x/y~z", ""),
            ..FieldAliases::default()
        };
        let record = json!({"x/y~z": {"filters": [{"Filter": ["id"]}]}});
        let found: Vec<_> = locate_whitelists(&record, &fields).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pointer(), "/x~1y~0z/filters/0/Filter");
        assert_eq!(found[0].resolve(&record), Some(&vec![json!("id")]));
    }
}
