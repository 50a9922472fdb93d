pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown role {0:?}")]
    UnknownRole(String),

    #[error("unknown resource type {0:?}")]
    UnknownResourceType(String),
}
