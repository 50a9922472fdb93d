use crate::{
    config_value::ConfigValue, permission::Permissions, query::Query, role::ResourceType,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;

/// A permission-guarded, persisted entity.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const TYPE: ResourceType;

    /// `None` until the store has assigned an id.
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Unique, human readable code, for the resource types that have one.
    fn code(&self) -> Option<&str> {
        None
    }

    fn permissions(&self) -> &Permissions;

    fn permissions_mut(&mut self) -> &mut Permissions;
}

macro_rules! impl_resource {
    ($ty:ty, $resource_type:expr) => {
        impl_resource!(@impl $ty, $resource_type, {});
    };
    ($ty:ty, $resource_type:expr, coded) => {
        impl_resource!(@impl $ty, $resource_type, {
            fn code(&self) -> Option<&str> {
                Some(self.code.as_str()).filter(|c| !c.is_empty())
            }
        });
    };
    (@impl $ty:ty, $resource_type:expr, { $($extra:tt)* }) => {
        impl Resource for $ty {
            const TYPE: ResourceType = $resource_type;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }

            fn permissions(&self) -> &Permissions {
                &self.permissions
            }

            fn permissions_mut(&mut self) -> &mut Permissions {
                &mut self.permissions
            }

            $($extra)*
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permissions: Permissions,
}

impl_resource!(Organization, ResourceType::Organization, coded);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permissions: Permissions,
}

impl_resource!(Project, ResourceType::Project, coded);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub documents_count: u64,
    #[serde(default)]
    pub last_attribute_num: u32,
    #[serde(default)]
    pub permissions: Permissions,
}

impl_resource!(Collection, ResourceType::Collection);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// The two collections this link type connects.
    #[serde(default)]
    pub collection_ids: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub permissions: Permissions,
}

impl_resource!(LinkType, ResourceType::LinkType);

impl LinkType {
    pub fn new(name: impl Into<String>, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection_ids: vec![first.into(), second.into()],
            ..Default::default()
        }
    }

    pub fn connects(&self, collection_id: &str) -> bool {
        self.collection_ids.iter().any(|id| id == collection_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub data: BTreeMap<String, ConfigValue>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub update_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data_version: u32,
    #[serde(default)]
    pub permissions: Permissions,
}

impl_resource!(Document, ResourceType::Document);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub link_type_id: String,
    #[serde(default)]
    pub document_ids: Vec<String>,
    #[serde(default)]
    pub data: BTreeMap<String, ConfigValue>,
    #[serde(default)]
    pub permissions: Permissions,
}

impl_resource!(LinkInstance, ResourceType::LinkInstance);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub perspective: String,
    #[serde(default)]
    pub query: Query,
    #[serde(default)]
    pub config: ConfigValue,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub update_date: Option<DateTime<Utc>>,
}

impl_resource!(View, ResourceType::View, coded);

/// A change a caller may make to a view. Id, author, creation date and
/// permissions have no update.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Name(String),
    Code(String),
    Icon(String),
    Color(String),
    Description(Option<String>),
    Perspective(String),
    Query(Query),
    Config(ConfigValue),
}

impl View {
    pub fn apply(&mut self, update: ViewUpdate) {
        match update {
            ViewUpdate::Name(name) => self.name = name,
            ViewUpdate::Code(code) => self.code = code,
            ViewUpdate::Icon(icon) => self.icon = icon,
            ViewUpdate::Color(color) => self.color = color,
            ViewUpdate::Description(description) => self.description = description,
            ViewUpdate::Perspective(perspective) => self.perspective = perspective,
            ViewUpdate::Query(query) => self.query = query,
            ViewUpdate::Config(config) => self.config = config,
        }
    }
}
