use crate::errors::{Error, Result};
use derive_more::Display;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// The resource kinds a template can mint ids for.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    #[display(fmt = "collection")]
    Collection,

    #[display(fmt = "link type")]
    LinkType,

    #[display(fmt = "document")]
    Document,

    #[display(fmt = "link instance")]
    LinkInstance,

    #[display(fmt = "view")]
    View,
}

impl ResourceKind {
    /// Order in which an untyped placeholder is looked up.
    pub const LOOKUP_ORDER: [ResourceKind; 5] = [
        ResourceKind::Collection,
        ResourceKind::LinkType,
        ResourceKind::Document,
        ResourceKind::LinkInstance,
        ResourceKind::View,
    ];
}

/// Placeholder id to real id, per resource kind, for one template run.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Dictionary {
    mappings: BTreeMap<ResourceKind, HashMap<String, String>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mapping. Registering the same pair again is a no-op, a
    /// different real id for a known placeholder is a `DuplicateMapping`.
    pub fn put(
        &mut self,
        kind: ResourceKind,
        placeholder: impl Into<String>,
        real_id: impl Into<String>,
    ) -> Result<()> {
        let placeholder = placeholder.into();
        let real_id = real_id.into();
        let mapping = self.mappings.entry(kind).or_default();

        match mapping.get(&placeholder) {
            Some(existing) if *existing == real_id => Ok(()),
            Some(existing) => Err(Error::DuplicateMapping {
                kind,
                placeholder,
                existing: existing.clone(),
                attempted: real_id,
            }),
            None => {
                mapping.insert(placeholder, real_id);
                Ok(())
            }
        }
    }

    pub fn get(&self, kind: ResourceKind, placeholder: &str) -> Option<&str> {
        self.mappings
            .get(&kind)
            .and_then(|mapping| mapping.get(placeholder))
            .map(String::as_str)
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        self.mappings.get(&kind).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.values().all(HashMap::is_empty)
    }
}
