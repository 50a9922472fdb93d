#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod auth;
pub mod config_value;
mod error;
pub mod id;
pub mod permission;
pub mod query;
pub mod resource;
pub mod role;

pub use auth::AuthorizationContext;
pub use config_value::ConfigValue;
pub use error::{Error, Result};
pub use permission::{Permission, Permissions};
pub use query::{CollectionAttributeFilter, ConditionValue, LinkAttributeFilter, Query, QueryStem};
pub use resource::{
    Attribute, Collection, Document, LinkInstance, LinkType, Organization, Project, Resource,
    View, ViewUpdate,
};
pub use role::{ResourceType, Role};
