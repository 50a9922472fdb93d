use crate::adaptor::{Error, Pagination, ResourceStore, Result};
use crate::filter::Filter;
use model::{id::new_id, Resource};
use std::{collections::BTreeSet, pin::Pin, sync::Arc};
use tokio::sync::Mutex;
use tracing::debug;

/// Keeps records in insertion order; `find` returns them in that order.
#[derive(Clone)]
pub struct MemoryStore<R> {
    state: Arc<Mutex<Vec<R>>>,
}

impl<R: Resource> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.is_empty()
    }
}

impl<R: Resource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_key<R: Resource>(key: &str) -> Error {
    Error::DuplicateKey {
        resource_type: R::TYPE,
        key: key.to_string(),
    }
}

fn not_found<R: Resource>(id: &str) -> Error {
    Error::NotFound {
        resource_type: R::TYPE,
        id: id.to_string(),
    }
}

/// Fails when another record (any record not at `skip`) already uses the code.
fn check_code<R: Resource>(records: &[R], resource: &R, skip: Option<usize>) -> Result<()> {
    let Some(code) = resource.code() else {
        return Ok(());
    };

    let taken = records
        .iter()
        .enumerate()
        .any(|(i, r)| Some(i) != skip && r.code() == Some(code));

    if taken {
        return Err(duplicate_key::<R>(code));
    }

    Ok(())
}

#[async_trait::async_trait]
impl<R: Resource> ResourceStore<R> for MemoryStore<R> {
    #[tracing::instrument(skip(self, resource))]
    async fn create(&self, mut resource: R) -> Result<R> {
        let mut state = self.state.lock().await;

        match resource.id() {
            Some(id) if state.iter().any(|r| r.id() == Some(id)) => {
                return Err(duplicate_key::<R>(id));
            }
            Some(_) => {}
            None => resource.set_id(new_id()),
        }

        check_code(&state, &resource, None)?;

        debug!(resource_type = %R::TYPE, id = ?resource.id(), "created");
        state.push(resource.clone());

        Ok(resource)
    }

    #[tracing::instrument(skip(self, resource))]
    async fn update(&self, id: &str, mut resource: R) -> Result<R> {
        let mut state = self.state.lock().await;

        let index = state
            .iter()
            .position(|r| r.id() == Some(id))
            .ok_or_else(|| not_found::<R>(id))?;

        resource.set_id(id.to_string());
        check_code(&state, &resource, Some(index))?;

        state[index] = resource.clone();

        Ok(resource)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;

        let index = state
            .iter()
            .position(|r| r.id() == Some(id))
            .ok_or_else(|| not_found::<R>(id))?;

        state.remove(index);

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        let state = self.state.lock().await;

        Ok(state.iter().find(|r| r.id() == Some(id)).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn find(
        &self,
        filter: &Filter,
        pagination: Option<Pagination>,
    ) -> Result<Pin<Box<dyn futures::Stream<Item = R> + '_ + Send>>> {
        let state = self.state.lock().await;

        let mut records = Vec::new();
        for record in state.iter() {
            if filter.matches(&serde_json::to_value(record)?) {
                records.push(record.clone());
            }
        }

        let (offset, limit) = match pagination {
            Some(pagination) => (pagination.offset(), pagination.limit()),
            None => (0, usize::MAX),
        };

        Ok(Box::pin(futures::stream::iter(
            records.into_iter().skip(offset).take(limit),
        )))
    }

    async fn find_all_codes(&self) -> Result<BTreeSet<String>> {
        let state = self.state.lock().await;

        Ok(state
            .iter()
            .filter_map(|r| r.code().map(str::to_string))
            .collect())
    }
}
