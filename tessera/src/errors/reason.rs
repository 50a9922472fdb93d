use derive_more::Display;

use crate::{errors::code::ErrorCode, template::TemplateError};
use model::ResourceType;

#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum ReasonCode {
    #[display(fmt = "organization/not-found")]
    OrganizationNotFound,

    #[display(fmt = "project/not-found")]
    ProjectNotFound,

    #[display(fmt = "collection/not-found")]
    CollectionNotFound,

    #[display(fmt = "link-type/not-found")]
    LinkTypeNotFound,

    #[display(fmt = "document/not-found")]
    DocumentNotFound,

    #[display(fmt = "link-instance/not-found")]
    LinkInstanceNotFound,

    #[display(fmt = "view/not-found")]
    ViewNotFound,

    #[display(fmt = "resource/key-exists")]
    ResourceKeyExists,

    #[display(fmt = "resource/bad-format")]
    BadFormat,

    #[display(fmt = "template/duplicate-mapping")]
    TemplateDuplicateMapping,

    #[display(fmt = "template/unresolved-reference")]
    TemplateUnresolvedReference,

    #[display(fmt = "template/malformed")]
    TemplateMalformed,

    #[display(fmt = "template/io")]
    TemplateIo,

    #[display(fmt = "unauthorized")]
    Unauthorized,

    #[display(fmt = "internal")]
    Internal,
}

impl ReasonCode {
    pub fn code(&self) -> ErrorCode {
        match self {
            ReasonCode::OrganizationNotFound => ErrorCode::NotFound,
            ReasonCode::ProjectNotFound => ErrorCode::NotFound,
            ReasonCode::CollectionNotFound => ErrorCode::NotFound,
            ReasonCode::LinkTypeNotFound => ErrorCode::NotFound,
            ReasonCode::DocumentNotFound => ErrorCode::NotFound,
            ReasonCode::LinkInstanceNotFound => ErrorCode::NotFound,
            ReasonCode::ViewNotFound => ErrorCode::NotFound,
            ReasonCode::ResourceKeyExists => ErrorCode::AlreadyExists,
            ReasonCode::BadFormat => ErrorCode::InvalidArgument,
            ReasonCode::TemplateDuplicateMapping => ErrorCode::FailedPrecondition,
            ReasonCode::TemplateUnresolvedReference => ErrorCode::FailedPrecondition,
            ReasonCode::TemplateMalformed => ErrorCode::InvalidArgument,
            ReasonCode::TemplateIo => ErrorCode::FailedPrecondition,
            ReasonCode::Unauthorized => ErrorCode::PermissionDenied,
            ReasonCode::Internal => ErrorCode::Internal,
        }
    }

    pub fn not_found(resource_type: ResourceType) -> Self {
        match resource_type {
            ResourceType::Organization => ReasonCode::OrganizationNotFound,
            ResourceType::Project => ReasonCode::ProjectNotFound,
            ResourceType::Collection => ReasonCode::CollectionNotFound,
            ResourceType::LinkType => ReasonCode::LinkTypeNotFound,
            ResourceType::Document => ReasonCode::DocumentNotFound,
            ResourceType::LinkInstance => ReasonCode::LinkInstanceNotFound,
            ResourceType::View => ReasonCode::ViewNotFound,
        }
    }

    pub fn from_template_error(err: &TemplateError) -> Self {
        match err {
            TemplateError::UnresolvedReference { .. } => ReasonCode::TemplateUnresolvedReference,
            TemplateError::MissingPlaceholderId { .. } => ReasonCode::TemplateMalformed,
            TemplateError::MalformedSource { .. } => ReasonCode::TemplateMalformed,
            TemplateError::Json(_) => ReasonCode::TemplateMalformed,
            TemplateError::Io(_) => ReasonCode::TemplateIo,
        }
    }
}
