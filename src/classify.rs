//! Decides whether a single item record is ammunition.
//!
//! A record is ammo when its properties carry a non-blank caliber and at
//! least one damage-indicating field. The damage requirement keeps items
//! that merely display caliber text (weapons, labels) out of the index.

use crate::access;
use crate::catalog::Caliber;
use crate::config::FieldAliases;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Ammo(Caliber),
    NotAmmo,
}

impl Classification {
    pub fn is_ammo(&self) -> bool {
        matches!(self, Classification::Ammo(_))
    }

    pub fn caliber(&self) -> Option<&Caliber> {
        match self {
            Classification::Ammo(caliber) => Some(caliber),
            Classification::NotAmmo => None,
        }
    }
}

pub fn classify(record: &Value, fields: &FieldAliases) -> Classification {
    let Some(props) = access::get_field(record, &fields.properties) else {
        return Classification::NotAmmo;
    };
    let Some(caliber) = access::get_field(props, &fields.caliber)
        .and_then(Value::as_str)
        .and_then(Caliber::parse)
    else {
        return Classification::NotAmmo;
    };
    if !fields
        .damage
        .iter()
        .any(|field| access::has_field(props, field))
    {
        return Classification::NotAmmo;
    }
    Classification::Ammo(caliber)
}
