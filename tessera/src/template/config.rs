//! Rewrites ids, dates and encoded scalars inside opaque value trees (view
//! configs and document data).

use super::dictionary::{Dictionary, ResourceKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::{id::ID_LENGTH, ConfigValue};
use serde_json::Number;
use std::collections::BTreeMap;

pub trait DateDecoder: Send + Sync {
    fn decode(&self, value: &str) -> Option<DateTime<Utc>>;
}

/// Decodes RFC 3339 timestamps, e.g. `2019-04-16T10:30:00.000Z`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rfc3339DateDecoder;

impl DateDecoder for Rfc3339DateDecoder {
    fn decode(&self, value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }
}

/// Decodes dates with a `chrono` format string. Formats without an offset are
/// read as UTC, formats without a time as midnight.
#[derive(Debug, Clone)]
pub struct FormatDateDecoder {
    format: String,
}

impl FormatDateDecoder {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl DateDecoder for FormatDateDecoder {
    fn decode(&self, value: &str) -> Option<DateTime<Utc>> {
        if let Ok(date) = DateTime::parse_from_str(value, &self.format) {
            return Some(date.with_timezone(&Utc));
        }

        if let Ok(date) = NaiveDateTime::parse_from_str(value, &self.format) {
            return Some(date.and_utc());
        }

        NaiveDate::parse_from_str(value, &self.format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|date| date.and_utc())
    }
}

/// Normalizes a plain string into its stored representation.
pub trait ValueEncoder: Send + Sync {
    fn encode(&self, value: &str) -> ConfigValue;
}

/// Turns JSON number literals into numbers and leaves every other string
/// alone.
///
/// Integers become `Int`, or `Decimal` when they overflow `i64`. Numbers with
/// a fraction or an exponent become `Float`. Literals JSON does not accept
/// (`007`, `1.`, ` 3`) and literals out of `f64` range stay strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstraintEncoder;

impl ValueEncoder for ConstraintEncoder {
    fn encode(&self, value: &str) -> ConfigValue {
        match value.parse::<Number>() {
            Err(_) => ConfigValue::String(value.to_string()),
            Ok(_) if !value.contains(['.', 'e', 'E']) => value
                .parse::<i64>()
                .map(ConfigValue::Int)
                .unwrap_or_else(|_| ConfigValue::Decimal(value.to_string())),
            Ok(number) => number
                .as_f64()
                .map(ConfigValue::Float)
                .unwrap_or_else(|| ConfigValue::Decimal(value.to_string())),
        }
    }
}

/// Rewrites a value tree against a template dictionary.
///
/// Strings of id length are looked up as collection, link type, document,
/// link instance and view ids, in that order. This is a heuristic: a literal
/// that happens to be 24 characters long and equals a placeholder is
/// rewritten too. Strings that are not ids are tried as dates, then encoded.
pub struct ConfigTranslator<'a> {
    dictionary: &'a Dictionary,
    dates: &'a dyn DateDecoder,
    encoder: &'a dyn ValueEncoder,
}

impl<'a> ConfigTranslator<'a> {
    pub fn new(
        dictionary: &'a Dictionary,
        dates: &'a dyn DateDecoder,
        encoder: &'a dyn ValueEncoder,
    ) -> Self {
        Self {
            dictionary,
            dates,
            encoder,
        }
    }

    /// Returns a new tree with the same container shape.
    pub fn translate(&self, value: &ConfigValue) -> ConfigValue {
        match value {
            ConfigValue::String(s) => self.translate_string(s),
            ConfigValue::Sequence(values) => {
                ConfigValue::Sequence(values.iter().map(|v| self.translate(v)).collect())
            }
            ConfigValue::Set(values) => ConfigValue::set(values.iter().map(|v| self.translate(v))),
            ConfigValue::Mapping(map) => ConfigValue::Mapping(self.translate_mapping(map)),
            ConfigValue::Null
            | ConfigValue::Bool(_)
            | ConfigValue::Int(_)
            | ConfigValue::Float(_)
            | ConfigValue::Decimal(_)
            | ConfigValue::Date(_) => value.clone(),
        }
    }

    /// Keys go through the same rule as values and are written back in their
    /// textual form. Keys that collide after translation keep the value of the
    /// last one in key order.
    pub fn translate_mapping(
        &self,
        map: &BTreeMap<String, ConfigValue>,
    ) -> BTreeMap<String, ConfigValue> {
        map.iter()
            .map(|(key, value)| {
                let key = self
                    .translate_string(key)
                    .to_key()
                    .unwrap_or_else(|| key.clone());
                (key, self.translate(value))
            })
            .collect()
    }

    pub fn translate_string(&self, value: &str) -> ConfigValue {
        if value.chars().count() == ID_LENGTH {
            if let Some(id) = self.lookup_id(value) {
                return ConfigValue::String(id.to_string());
            }
        }

        if let Some(date) = self.dates.decode(value) {
            return ConfigValue::Date(date);
        }

        self.encoder.encode(value)
    }

    fn lookup_id(&self, placeholder: &str) -> Option<&'a str> {
        ResourceKind::LOOKUP_ORDER
            .iter()
            .find_map(|kind| self.dictionary.get(*kind, placeholder))
    }
}

pub fn translate_config(
    value: &ConfigValue,
    dictionary: &Dictionary,
    dates: &dyn DateDecoder,
    encoder: &dyn ValueEncoder,
) -> ConfigValue {
    ConfigTranslator::new(dictionary, dates, encoder).translate(value)
}
