use serde_json::Value;
use std::fmt::Display;

/// Dotted path into the JSON form of a stored resource, e.g.
/// `permissions.users` or `query.stems.collectionId`.
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct FieldPath(pub Vec<String>);

impl FieldPath {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    /// Every value reachable at this path. Arrays met before the last
    /// segment are traversed element-wise, the value at the last segment is
    /// returned as-is (an array stays an array).
    pub fn values_in<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![root];

        for segment in self.iter() {
            let mut next = Vec::new();
            for value in current {
                collect_field(value, segment, &mut next);
            }
            current = next;
        }

        current
    }
}

fn collect_field<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(v) = map.get(segment) {
                out.push(v);
            }
        }
        Value::Array(values) => {
            for v in values {
                collect_field(v, segment, out);
            }
        }
        _ => {}
    }
}

impl From<&str> for FieldPath {
    fn from(v: &str) -> Self {
        Self(v.split('.').map(|s| s.to_string()).collect())
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.join(".").fmt(f)
    }
}
