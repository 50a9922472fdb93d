mod code;
pub mod output;
pub mod reason;

pub use code::ErrorCode;
pub use reason::ReasonCode;

use crate::template::{ResourceKind, TemplateError};
use model::{ResourceType, Role};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{resource_type} {id:?} not found")]
    NotFound {
        resource_type: ResourceType,
        id: String,
    },

    #[error("{kind} placeholder {placeholder:?} is already mapped to {existing:?}, refusing {attempted:?}")]
    DuplicateMapping {
        kind: ResourceKind,
        placeholder: String,
        existing: String,
        attempted: String,
    },

    #[error("{resource_type} with key {key:?} already exists")]
    DuplicateKey {
        resource_type: ResourceType,
        key: String,
    },

    #[error("missing {role} role on {resource_type}")]
    Unauthorized {
        resource_type: ResourceType,
        role: Role,
    },

    #[error("bad format: {reason}")]
    BadFormat { reason: String },

    #[error("template not available")]
    TemplateNotAvailable(#[from] TemplateError),

    #[error("store error")]
    Store(#[source] resource_store::Error),
}

impl From<resource_store::Error> for Error {
    fn from(err: resource_store::Error) -> Self {
        match err {
            resource_store::Error::NotFound { resource_type, id } => {
                Error::NotFound { resource_type, id }
            }
            resource_store::Error::DuplicateKey { resource_type, key } => {
                Error::DuplicateKey { resource_type, key }
            }
            err => Error::Store(err),
        }
    }
}

impl Error {
    pub fn not_found(resource_type: ResourceType, id: impl Into<String>) -> Self {
        Error::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    pub fn reason(&self) -> ReasonCode {
        match self {
            Error::NotFound { resource_type, .. } => ReasonCode::not_found(*resource_type),
            Error::DuplicateMapping { .. } => ReasonCode::TemplateDuplicateMapping,
            Error::DuplicateKey { .. } => ReasonCode::ResourceKeyExists,
            Error::Unauthorized { .. } => ReasonCode::Unauthorized,
            Error::BadFormat { .. } => ReasonCode::BadFormat,
            Error::TemplateNotAvailable(err) => ReasonCode::from_template_error(err),
            Error::Store(_) => ReasonCode::Internal,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.reason().code()
    }
}
