use super::{
    creators::created_id,
    dictionary::ResourceKind,
    query::{translate_query, unresolved_stem_roots},
    source::{read_entry, TemplateError},
    Section, TemplateParser,
};
use crate::{errors::Result, facade::ViewFacade};
use model::{AuthorizationContext, View};
use serde_json::Value;
use tracing::debug;

impl TemplateParser {
    /// Views go through the facade, so they get codes and ownership like any
    /// other new view. A view whose stem root collection is not part of the
    /// template fails the run.
    pub(super) async fn create_views(
        &mut self,
        entries: &mut [Value],
        facade: &ViewFacade,
        context: &AuthorizationContext,
    ) -> Result<usize> {
        for entry in entries.iter_mut() {
            let (placeholder, mut view): (String, View) =
                read_entry(entry, Section::Views.name())?;

            if let Some(root) = unresolved_stem_roots(&view.query, &self.dictionary).first() {
                return Err(TemplateError::UnresolvedReference {
                    kind: ResourceKind::Collection,
                    placeholder: root.to_string(),
                }
                .into());
            }

            view.query = translate_query(&view.query, &self.dictionary);
            view.config = self.translator().translate(&view.config);

            let view = facade.create_view(context, view).await?;
            debug!(placeholder = %placeholder, id = ?view.id, "view created");

            self.dictionary
                .put(ResourceKind::View, placeholder, created_id(&view))?;
        }

        Ok(entries.len())
    }
}
