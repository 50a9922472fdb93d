//! An opaque, arbitrarily nested value tree.
//!
//! View configuration and document data are stored as `ConfigValue`s. The core
//! never interprets them, apart from the template translator which rewrites the
//! scalars inside.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{
    de::Deserializer,
    ser::{SerializeMap, SerializeSeq, Serializer},
    Deserialize, Serialize,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// A number that does not fit an `i64` or a finite `f64`, kept in its
    /// textual form.
    Decimal(String),
    String(String),
    Date(DateTime<Utc>),
    Sequence(Vec<ConfigValue>),
    /// Unordered, duplicate-free collection. Stored as a vector, the
    /// constructors keep it free of duplicates.
    Set(Vec<ConfigValue>),
    Mapping(BTreeMap<String, ConfigValue>),
}

/// Container shape of a value, used to check that a transform keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Sequence,
    Set,
    Mapping,
}

impl ConfigValue {
    pub fn shape(&self) -> Shape {
        match self {
            ConfigValue::Sequence(_) => Shape::Sequence,
            ConfigValue::Set(_) => Shape::Set,
            ConfigValue::Mapping(_) => Shape::Mapping,
            _ => Shape::Scalar,
        }
    }

    /// Builds a set, dropping repeated elements (first occurrence kept).
    pub fn set(values: impl IntoIterator<Item = ConfigValue>) -> Self {
        let mut set: Vec<ConfigValue> = Vec::new();
        for value in values {
            if !set.contains(&value) {
                set.push(value);
            }
        }
        ConfigValue::Set(set)
    }

    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, ConfigValue)>) -> Self {
        ConfigValue::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up a nested value by mapping keys.
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigValue> {
        path.iter()
            .try_fold(self, |value, key| value.as_mapping()?.get(*key))
    }

    /// The textual form of a scalar when it has to be used as a mapping key.
    /// Containers have no key form.
    pub fn to_key(&self) -> Option<String> {
        match self {
            ConfigValue::Null => Some("null".to_string()),
            ConfigValue::Bool(b) => Some(b.to_string()),
            ConfigValue::Int(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::Decimal(d) => Some(d.clone()),
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Date(d) => Some(format_date(d)),
            ConfigValue::Sequence(_) | ConfigValue::Set(_) | ConfigValue::Mapping(_) => None,
        }
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Int(i),
                // above i64::MAX
                None if n.is_u64() => ConfigValue::Decimal(n.to_string()),
                None => n
                    .as_f64()
                    .map(ConfigValue::Float)
                    .unwrap_or_else(|| ConfigValue::Decimal(n.to_string())),
            },
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(values) => {
                ConfigValue::Sequence(values.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Int(i) => serializer.serialize_i64(*i),
            ConfigValue::Float(f) => serializer.serialize_f64(*f),
            ConfigValue::Decimal(d) => serializer.serialize_str(d),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Date(d) => serializer.serialize_str(&format_date(d)),
            ConfigValue::Sequence(values) | ConfigValue::Set(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            ConfigValue::Mapping(map) => {
                let mut ser = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    ser.serialize_entry(k, v)?;
                }
                ser.end()
            }
        }
    }
}

// JSON has no set or date type, those come back as sequences and strings
impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(serde_json::Value::deserialize(deserializer)?.into())
    }
}
