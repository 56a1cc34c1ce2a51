//! Structural access to item records of unknown shape.
//!
//! Item records are plain JSON trees whose field spellings drift between item
//! kinds and data dumps (`_props` vs `Properties`, `Caliber` vs `caliber`).
//! The helpers here resolve one logical field on one record: exact key first,
//! then a case-insensitive match, first accepted spelling before the
//! alternate. They never descend into nested structures; callers chain
//! lookups explicitly so every traversal step is visible at the call site.
//! Missing fields, `null` values and non-object records all resolve to `None`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A logical field accepted under two spellings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldName {
    pub primary: String,
    pub alternate: String,
}

impl FieldName {
    pub fn new(primary: &str, alternate: &str) -> Self {
        Self {
            primary: primary.to_string(),
            alternate: alternate.to_string(),
        }
    }

    fn spellings(&self) -> impl Iterator<Item = &str> {
        [self.primary.as_str(), self.alternate.as_str()]
            .into_iter()
            .filter(|name| !name.is_empty())
    }
}

/// Resolve the concrete key on `record` that answers to `name`.
pub fn resolve_key<'a>(record: &'a Value, name: &str) -> Option<&'a str> {
    let map = record.as_object()?;
    if let Some((key, value)) = map.get_key_value(name) {
        if !value.is_null() {
            return Some(key.as_str());
        }
    }
    map.iter()
        .find(|(key, value)| key.eq_ignore_ascii_case(name) && !value.is_null())
        .map(|(key, _)| key.as_str())
}

/// Look up a single spelling on `record`.
pub fn get<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    let key = resolve_key(record, name)?;
    record.get(key)
}

/// Resolve the concrete key for a logical field, trying both spellings.
pub fn resolve_field_key<'a>(record: &'a Value, field: &FieldName) -> Option<&'a str> {
    field.spellings().find_map(|name| resolve_key(record, name))
}

/// Look up a logical field, trying both spellings. First found wins.
pub fn get_field<'a>(record: &'a Value, field: &FieldName) -> Option<&'a Value> {
    let key = resolve_field_key(record, field)?;
    record.get(key)
}

/// Whether a logical field is present with a non-null value.
pub fn has_field(record: &Value, field: &FieldName) -> bool {
    resolve_field_key(record, field).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exact_match_beats_case_insensitive_match() {
        let record = json!({"caliber": "lower", "Caliber": "exact"});
        assert_eq!(get(&record, "Caliber"), Some(&json!("exact")));
        assert_eq!(get(&record, "caliber"), Some(&json!("lower")));
        assert!(matches!(
            resolve_key(&record, "CALIBER"),
            Some("caliber") | Some("Caliber")
        ));
    }

    #[test]
    fn falls_back_to_case_insensitive_match() {
        let record = json!({"CALIBER": "9x19mm"});
        assert_eq!(get(&record, "Caliber"), Some(&json!("9x19mm")));
        assert_eq!(resolve_key(&record, "caliber"), Some("CALIBER"));
    }

    #[test]
    fn null_exact_match_falls_through_to_other_casings() {
        let record = json!({"Caliber": null, "CALIBER": "X"});
        assert_eq!(resolve_key(&record, "Caliber"), Some("CALIBER"));
        assert_eq!(get(&record, "Caliber"), Some(&json!("X")));
    }

    #[test]
    fn alternate_spelling_is_used_when_primary_missing() {
        let field = FieldName::new("_props", "Properties");
        let record = json!({"properties": {"Damage": 10}});
        assert_eq!(resolve_field_key(&record, &field), Some("properties"));
        assert!(get_field(&record, &field).unwrap().is_object());
    }

    #[test]
    fn primary_spelling_wins_when_both_present() {
        let field = FieldName::new("_props", "Properties");
        let record = json!({"Properties": {"which": "alternate"}, "_props": {"which": "primary"}});
        assert_eq!(
            get_field(&record, &field).and_then(|v| v.get("which")),
            Some(&json!("primary"))
        );
    }

    #[test]
    fn absence_is_silent() {
        let field = FieldName::new("Damage", "damage");
        assert!(get_field(&json!({}), &field).is_none());
        assert!(get_field(&json!({"Damage": null}), &field).is_none());
        assert!(get_field(&json!(["Damage"]), &field).is_none());
        assert!(get_field(&json!("Damage"), &field).is_none());
        assert!(!has_field(&json!(null), &field));
    }

    #[test]
    fn lookup_does_not_descend() {
        let record = json!({"_props": {"Caliber": "X"}});
        assert!(get(&record, "Caliber").is_none());
    }
}
