use model::{Collection, Document, LinkInstance, LinkType, Organization, Project, View};
use resource_store::{MemoryStore, ResourceStore};
use std::sync::Arc;

/// The organization and project a request works in, with one store per
/// resource type.
#[derive(Clone)]
pub struct Workspace {
    pub organization: Organization,
    pub project: Project,
    pub collections: Arc<dyn ResourceStore<Collection>>,
    pub link_types: Arc<dyn ResourceStore<LinkType>>,
    pub documents: Arc<dyn ResourceStore<Document>>,
    pub link_instances: Arc<dyn ResourceStore<LinkInstance>>,
    pub views: Arc<dyn ResourceStore<View>>,
}

impl Workspace {
    pub fn in_memory(organization: Organization, project: Project) -> Self {
        Self {
            organization,
            project,
            collections: Arc::new(MemoryStore::<Collection>::new()),
            link_types: Arc::new(MemoryStore::<LinkType>::new()),
            documents: Arc::new(MemoryStore::<Document>::new()),
            link_instances: Arc::new(MemoryStore::<LinkInstance>::new()),
            views: Arc::new(MemoryStore::<View>::new()),
        }
    }
}
