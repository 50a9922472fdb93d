//! The saved query of a view.
//!
//! Optional stem fields distinguish "unset" (no filtering on that field) from
//! "present but empty" (matches nothing). Both states survive serialization:
//! unset is written as `null`, empty as `[]`. A link type chain is
//! positional, so a hop that lost its reference stays in place as `null`.
//! Document sets and filters keep a lost reference as `null` as well.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub stems: Vec<QueryStem>,
    #[serde(default)]
    pub fulltexts: BTreeSet<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl Query {
    pub fn new(stems: Vec<QueryStem>) -> Self {
        Self {
            stems,
            ..Default::default()
        }
    }

    /// Every collection id a stem is rooted on.
    pub fn collection_ids(&self) -> impl Iterator<Item = &str> {
        self.stems.iter().filter_map(|s| s.collection_id.as_deref())
    }

    /// Every link type id used by any stem, in stem order. Unresolved hops
    /// are skipped.
    pub fn link_type_ids(&self) -> impl Iterator<Item = &str> {
        self.stems
            .iter()
            .filter_map(|s| s.link_type_ids.as_ref())
            .flatten()
            .filter_map(Option::as_deref)
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty() && self.fulltexts.is_empty()
    }
}

/// One traversal unit of a query: an optional root collection and a chain of
/// link types to follow from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStem {
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub link_type_ids: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub document_ids: Option<BTreeSet<Option<String>>>,
    #[serde(default)]
    pub filters: Option<Vec<CollectionAttributeFilter>>,
    #[serde(default)]
    pub link_filters: Option<Vec<LinkAttributeFilter>>,
}

impl QueryStem {
    pub fn new(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: Some(collection_id.into()),
            ..Default::default()
        }
    }

    pub fn with_link_types<I, S>(mut self, link_type_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.link_type_ids = Some(
            link_type_ids
                .into_iter()
                .map(|id| Some(id.into()))
                .collect(),
        );
        self
    }

    pub fn with_documents<I, S>(mut self, document_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document_ids = Some(
            document_ids
                .into_iter()
                .map(|id| Some(id.into()))
                .collect(),
        );
        self
    }

    pub fn with_filters(mut self, filters: Vec<CollectionAttributeFilter>) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_link_filters(mut self, filters: Vec<LinkAttributeFilter>) -> Self {
        self.link_filters = Some(filters);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionValue {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAttributeFilter {
    #[serde(default)]
    pub collection_id: Option<String>,
    pub attribute_id: String,
    pub condition: String,
    #[serde(default)]
    pub condition_values: Vec<ConditionValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAttributeFilter {
    #[serde(default)]
    pub link_type_id: Option<String>,
    pub attribute_id: String,
    pub condition: String,
    #[serde(default)]
    pub condition_values: Vec<ConditionValue>,
}
