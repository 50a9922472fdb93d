//! Declarative predicates over the JSON form of stored resources.
//!
//! A filter is built once by the caller and pushed down to the store, which
//! decides how to evaluate it. The in-memory store evaluates it with
//! [`Filter::matches`].

use crate::field_path::FieldPath;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Substring,
    Prefix,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Field equals the value, or the field is an array containing it.
    Eq(FieldPath, Value),
    /// Field equals any of the values, or is an array containing any of them.
    In(FieldPath, Vec<Value>),
    /// Some element of the array at the path matches the inner filter, with
    /// paths inside the inner filter relative to the element.
    ElemMatch(FieldPath, Box<Filter>),
    /// Case-insensitive text match against a string field.
    Text {
        path: FieldPath,
        text: String,
        mode: TextMode,
    },
    /// Empty `And` matches everything.
    And(Vec<Filter>),
    /// Empty `Or` matches nothing.
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(path: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(FieldPath::from(path), value.into())
    }

    pub fn is_in<I, V>(path: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::In(
            FieldPath::from(path),
            values.into_iter().map(Into::into).collect(),
        )
    }

    pub fn elem_match(path: &str, filter: Filter) -> Self {
        Filter::ElemMatch(FieldPath::from(path), Box::new(filter))
    }

    pub fn contains_text(path: &str, text: impl Into<String>) -> Self {
        Filter::Text {
            path: FieldPath::from(path),
            text: text.into(),
            mode: TextMode::Substring,
        }
    }

    pub fn starts_with(path: &str, text: impl Into<String>) -> Self {
        Filter::Text {
            path: FieldPath::from(path),
            text: text.into(),
            mode: TextMode::Prefix,
        }
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::All => other,
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            filter => Filter::And(vec![filter, other]),
        }
    }

    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(path, expected) => path
                .values_in(record)
                .into_iter()
                .any(|value| value_matches(value, expected)),
            Filter::In(path, expected) => path.values_in(record).into_iter().any(|value| {
                expected
                    .iter()
                    .any(|candidate| value_matches(value, candidate))
            }),
            Filter::ElemMatch(path, inner) => {
                path.values_in(record)
                    .into_iter()
                    .any(|value| match value {
                        Value::Array(elements) => elements.iter().any(|e| inner.matches(e)),
                        _ => false,
                    })
            }
            Filter::Text { path, text, mode } => {
                let needle = text.to_lowercase();
                path.values_in(record)
                    .into_iter()
                    .filter_map(Value::as_str)
                    .any(|value| {
                        let haystack = value.to_lowercase();
                        match mode {
                            TextMode::Substring => haystack.contains(&needle),
                            TextMode::Prefix => haystack.starts_with(&needle),
                        }
                    })
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(record)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(record)),
            Filter::Not(filter) => !filter.matches(record),
        }
    }
}

fn value_matches(value: &Value, expected: &Value) -> bool {
    match value {
        Value::Array(elements) if !expected.is_array() => elements.contains(expected),
        _ => value == expected,
    }
}
