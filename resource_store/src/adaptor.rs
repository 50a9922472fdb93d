use crate::filter::Filter;
use model::{Resource, ResourceType};
use std::{collections::BTreeSet, pin::Pin};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{resource_type} {id:?} not found")]
    NotFound {
        resource_type: ResourceType,
        id: String,
    },

    #[error("{resource_type} with key {key:?} already exists")]
    DuplicateKey {
        resource_type: ResourceType,
        key: String,
    },

    #[error("store error: {0}")]
    Store(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("serde_json error")]
    SerdeJSON(#[from] serde_json::Error),
}

/// Offset pagination: skip `page * page_size` records, then return at most
/// `page_size`. A `page_size` of zero disables the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.page_size as usize
    }

    pub fn limit(&self) -> usize {
        match self.page_size {
            0 => usize::MAX,
            size => size as usize,
        }
    }
}

/// Persistence of one resource type.
#[async_trait::async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// Stores a new resource, assigning an id when it has none. Fails with
    /// `DuplicateKey` when the id or the code is already taken.
    async fn create(&self, resource: R) -> Result<R>;

    async fn update(&self, id: &str, resource: R) -> Result<R>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<R>>;

    async fn find(
        &self,
        filter: &Filter,
        pagination: Option<Pagination>,
    ) -> Result<Pin<Box<dyn futures::Stream<Item = R> + '_ + Send>>>;

    async fn find_all_codes(&self) -> Result<BTreeSet<String>>;
}
