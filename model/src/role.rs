use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// A named capability that can be granted to a user or a group on a resource.
///
/// Roles are flat: holding `Manage` does not imply `Read`. Callers that want a
/// hierarchy grant every implied role explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Read,
    Write,
    Manage,
    Clone,
    Share,
    Comment,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Read => "read",
            Role::Write => "write",
            Role::Manage => "manage",
            Role::Clone => "clone",
            Role::Share => "share",
            Role::Comment => "comment",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Role::Read),
            "write" => Ok(Role::Write),
            "manage" => Ok(Role::Manage),
            "clone" => Ok(Role::Clone),
            "share" => Ok(Role::Share),
            "comment" => Ok(Role::Comment),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Organization,
    Project,
    Collection,
    LinkType,
    Document,
    LinkInstance,
    View,
}

impl ResourceType {
    /// The closed role vocabulary of this resource type.
    pub fn roles(&self) -> &'static [Role] {
        match self {
            ResourceType::Organization | ResourceType::Project => {
                &[Role::Read, Role::Write, Role::Manage]
            }
            ResourceType::Collection => &[Role::Read, Role::Write, Role::Share, Role::Manage],
            ResourceType::LinkType => &[Role::Read, Role::Write, Role::Manage],
            ResourceType::Document | ResourceType::LinkInstance => &[Role::Read, Role::Write],
            ResourceType::View => &[
                Role::Read,
                Role::Write,
                Role::Manage,
                Role::Clone,
                Role::Share,
                Role::Comment,
            ],
        }
    }

    pub fn supports(&self, role: Role) -> bool {
        self.roles().contains(&role)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Organization => "organization",
            ResourceType::Project => "project",
            ResourceType::Collection => "collection",
            ResourceType::LinkType => "link type",
            ResourceType::Document => "document",
            ResourceType::LinkInstance => "link instance",
            ResourceType::View => "view",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', ' '], "").as_str() {
            "organization" => Ok(ResourceType::Organization),
            "project" => Ok(ResourceType::Project),
            "collection" => Ok(ResourceType::Collection),
            "linktype" => Ok(ResourceType::LinkType),
            "document" => Ok(ResourceType::Document),
            "linkinstance" => Ok(ResourceType::LinkInstance),
            "view" => Ok(ResourceType::View),
            _ => Err(Error::UnknownResourceType(s.to_string())),
        }
    }
}
