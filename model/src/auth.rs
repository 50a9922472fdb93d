use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity of the caller for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationContext {
    user_id: String,
    #[serde(default)]
    group_ids: BTreeSet<String>,
}

impl AuthorizationContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            group_ids: BTreeSet::new(),
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_ids = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn group_ids(&self) -> &BTreeSet<String> {
        &self.group_ids
    }
}
