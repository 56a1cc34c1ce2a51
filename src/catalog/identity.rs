use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Item identifier as spelled in the catalog.
///
/// Whitelists compare identifiers case-insensitively; `folded` gives the key
/// used for those comparisons while the original spelling is what gets
/// appended to collections.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn folded(&self) -> String {
        fold(&self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-insensitive caliber key.
///
/// Equality and ordering only look at the folded key, so `9x19mm` and
/// `9X19MM` land in the same group. Each value keeps the spelling it was
/// parsed from; which spelling represents a group is decided by the
/// collection holding it (`AmmoIndex` keeps the first one it indexes).
#[derive(Clone, Debug)]
pub struct Caliber {
    key: String,
    display: String,
}

impl Caliber {
    /// Build a caliber from raw text; blank input is not a caliber.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            key: fold(trimmed),
            display: trimmed.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

impl PartialEq for Caliber {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Caliber {}

impl PartialOrd for Caliber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Caliber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

impl std::hash::Hash for Caliber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Caliber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl Serialize for Caliber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.display)
    }
}

impl<'de> Deserialize<'de> for Caliber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Caliber::parse(&value).ok_or_else(|| serde::de::Error::custom("caliber must not be blank"))
    }
}

/// How a particular whitelist stores its identifiers.
///
/// Resolved once per collection by sampling its existing elements; every
/// insertion into that collection then uses the same representation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdRepr {
    /// `"5447a9cd4bdc2dbd208b4567"`
    #[default]
    Bare,
    /// `{ "<key>": "5447a9cd4bdc2dbd208b4567" }`
    Wrapped { key: String },
}

impl IdRepr {
    /// Build the element this representation stores for `id`.
    pub fn to_element(&self, id: &ItemId) -> Value {
        match self {
            IdRepr::Bare => Value::String(id.0.clone()),
            IdRepr::Wrapped { key } => {
                let mut map = Map::new();
                map.insert(key.clone(), Value::String(id.0.clone()));
                Value::Object(map)
            }
        }
    }
}

/// Case folding shared by identifier and caliber comparisons.
pub fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}
