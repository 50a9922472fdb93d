use super::{
    dictionary::ResourceKind,
    source::{read_entry, TemplateError},
    Section, TemplateParser,
};
use crate::{errors::Result, workspace::Workspace};
use chrono::Utc;
use model::{
    AuthorizationContext, Collection, ConfigValue, Document, LinkInstance, LinkType, Permission,
    Resource,
};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub(super) fn grant_creator<R: Resource>(resource: &mut R, context: &AuthorizationContext) {
    let permissions = resource.permissions_mut();
    permissions.clear();
    permissions.update_user_permissions(Permission::new(
        context.user_id(),
        R::TYPE.roles().iter().copied(),
    ));
}

pub(super) fn created_id<R: Resource>(resource: &R) -> String {
    resource.id().unwrap_or_default().to_string()
}

impl TemplateParser {
    /// A reference the created resource cannot exist without.
    fn resolve_root(&self, kind: ResourceKind, placeholder: &str) -> Result<String> {
        self.dictionary
            .get(kind, placeholder)
            .map(str::to_string)
            .ok_or_else(|| {
                TemplateError::UnresolvedReference {
                    kind,
                    placeholder: placeholder.to_string(),
                }
                .into()
            })
    }

    fn translate_data(&self, data: &BTreeMap<String, ConfigValue>) -> BTreeMap<String, ConfigValue> {
        let translator = self.translator();
        data.iter()
            .map(|(attribute, value)| (attribute.clone(), translator.translate(value)))
            .collect()
    }

    pub(super) async fn create_collections(
        &mut self,
        entries: &mut [Value],
        workspace: &Workspace,
        context: &AuthorizationContext,
    ) -> Result<usize> {
        for entry in entries.iter_mut() {
            let (placeholder, mut collection): (String, Collection) =
                read_entry(entry, Section::Collections.name())?;

            collection.id = None;
            collection.documents_count = 0;
            grant_creator(&mut collection, context);

            let collection = workspace.collections.create(collection).await?;
            debug!(placeholder = %placeholder, id = ?collection.id, "collection created");

            self.dictionary
                .put(ResourceKind::Collection, placeholder, created_id(&collection))?;
        }

        Ok(entries.len())
    }

    pub(super) async fn create_link_types(
        &mut self,
        entries: &mut [Value],
        workspace: &Workspace,
        context: &AuthorizationContext,
    ) -> Result<usize> {
        for entry in entries.iter_mut() {
            let (placeholder, mut link_type): (String, LinkType) =
                read_entry(entry, Section::LinkTypes.name())?;

            link_type.id = None;
            link_type.collection_ids = link_type
                .collection_ids
                .iter()
                .map(|id| self.resolve_root(ResourceKind::Collection, id))
                .collect::<Result<_>>()?;
            grant_creator(&mut link_type, context);

            let link_type = workspace.link_types.create(link_type).await?;
            debug!(placeholder = %placeholder, id = ?link_type.id, "link type created");

            self.dictionary
                .put(ResourceKind::LinkType, placeholder, created_id(&link_type))?;
        }

        Ok(entries.len())
    }

    pub(super) async fn create_documents(
        &mut self,
        entries: &mut [Value],
        workspace: &Workspace,
        context: &AuthorizationContext,
    ) -> Result<usize> {
        for entry in entries.iter_mut() {
            let (placeholder, mut document): (String, Document) =
                read_entry(entry, Section::Documents.name())?;

            document.id = None;
            document.collection_id =
                self.resolve_root(ResourceKind::Collection, &document.collection_id)?;
            document.data = self.translate_data(&document.data);
            document.created_by = Some(context.user_id().to_string());
            document.creation_date = Some(Utc::now());
            document.updated_by = None;
            document.update_date = None;
            document.data_version = 1;
            grant_creator(&mut document, context);

            let document = workspace.documents.create(document).await?;
            debug!(placeholder = %placeholder, id = ?document.id, "document created");

            self.dictionary
                .put(ResourceKind::Document, placeholder, created_id(&document))?;
        }

        Ok(entries.len())
    }

    pub(super) async fn create_link_instances(
        &mut self,
        entries: &mut [Value],
        workspace: &Workspace,
        context: &AuthorizationContext,
    ) -> Result<usize> {
        for entry in entries.iter_mut() {
            let (placeholder, mut link_instance): (String, LinkInstance) =
                read_entry(entry, Section::LinkInstances.name())?;

            link_instance.id = None;
            link_instance.link_type_id =
                self.resolve_root(ResourceKind::LinkType, &link_instance.link_type_id)?;
            link_instance.document_ids = link_instance
                .document_ids
                .iter()
                .map(|id| self.resolve_root(ResourceKind::Document, id))
                .collect::<Result<_>>()?;
            link_instance.data = self.translate_data(&link_instance.data);
            grant_creator(&mut link_instance, context);

            let link_instance = workspace.link_instances.create(link_instance).await?;
            debug!(placeholder = %placeholder, id = ?link_instance.id, "link instance created");

            self.dictionary.put(
                ResourceKind::LinkInstance,
                placeholder,
                created_id(&link_instance),
            )?;
        }

        Ok(entries.len())
    }
}
