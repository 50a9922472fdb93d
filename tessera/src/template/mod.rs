//! Template instantiation.
//!
//! A template is a JSON document with the top-level arrays `collections`,
//! `linkTypes`, `documents`, `linkInstances` and `views`. Every entry carries
//! a placeholder `_id`. Instantiation creates the resources in that order,
//! recording placeholder to real id in a [`Dictionary`] so later entries can
//! refer to earlier ones. It is not transactional: when an entry fails, the
//! resources created before it remain.

mod config;
mod creators;
mod dictionary;
mod query;
mod source;
mod views;

pub use config::{
    translate_config, ConfigTranslator, ConstraintEncoder, DateDecoder, FormatDateDecoder,
    Rfc3339DateDecoder, ValueEncoder,
};
pub use dictionary::{Dictionary, ResourceKind};
pub use query::{translate_query, unresolved_stem_roots};
pub use source::{FileTemplate, JsonTemplate, TemplateError, TemplateSource, PLACEHOLDER_FIELD};

use crate::{auth::PermissionsChecker, errors::Result, facade::ViewFacade};
use model::{AuthorizationContext, Role};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// How strings inside configs and document data are decoded.
#[derive(Clone)]
pub struct TemplateOptions {
    pub date_decoder: Arc<dyn DateDecoder>,
    pub encoder: Arc<dyn ValueEncoder>,
}

impl TemplateOptions {
    /// RFC 3339 dates when no format is given.
    pub fn with_date_format(format: Option<&str>) -> Self {
        let date_decoder: Arc<dyn DateDecoder> = match format {
            Some(format) => Arc::new(FormatDateDecoder::new(format)),
            None => Arc::new(Rfc3339DateDecoder),
        };

        Self {
            date_decoder,
            encoder: Arc::new(ConstraintEncoder),
        }
    }
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self::with_date_format(None)
    }
}

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateReport {
    pub collections: usize,
    pub link_types: usize,
    pub documents: usize,
    pub link_instances: usize,
    pub views: usize,
    pub dictionary: Dictionary,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Section {
    Collections,
    LinkTypes,
    Documents,
    LinkInstances,
    Views,
}

impl Section {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Section::Collections => "collections",
            Section::LinkTypes => "linkTypes",
            Section::Documents => "documents",
            Section::LinkInstances => "linkInstances",
            Section::Views => "views",
        }
    }
}

pub struct TemplateParser {
    template: Value,
    dictionary: Dictionary,
    options: TemplateOptions,
}

impl TemplateParser {
    pub fn new(template: Value, options: TemplateOptions) -> std::result::Result<Self, TemplateError> {
        if !template.is_object() {
            return Err(TemplateError::MalformedSource {
                reason: "template root is not an object".to_string(),
            });
        }

        Ok(Self {
            template,
            dictionary: Dictionary::new(),
            options,
        })
    }

    pub async fn load(source: &dyn TemplateSource, options: TemplateOptions) -> Result<Self> {
        Ok(Self::new(source.load().await?, options)?)
    }

    pub fn template(&self) -> &Value {
        &self.template
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub(crate) fn translator(&self) -> ConfigTranslator<'_> {
        ConfigTranslator::new(
            &self.dictionary,
            self.options.date_decoder.as_ref(),
            self.options.encoder.as_ref(),
        )
    }

    /// Creates every resource of the template in the facade's workspace,
    /// owned by the caller. Requires `Write` on the project.
    #[tracing::instrument(skip(self, facade, context), fields(user = context.user_id()))]
    pub async fn instantiate(
        &mut self,
        facade: &ViewFacade,
        context: &AuthorizationContext,
    ) -> Result<TemplateReport> {
        let workspace = facade.workspace();
        PermissionsChecker::new(context, &workspace.organization, &workspace.project)
            .check_project_role(Role::Write)?;

        let mut report = TemplateReport::default();

        let mut entries = self.take_section(Section::Collections)?;
        let result = self.create_collections(&mut entries, workspace, context).await;
        self.restore_section(Section::Collections, entries);
        report.collections = result?;

        let mut entries = self.take_section(Section::LinkTypes)?;
        let result = self.create_link_types(&mut entries, workspace, context).await;
        self.restore_section(Section::LinkTypes, entries);
        report.link_types = result?;

        let mut entries = self.take_section(Section::Documents)?;
        let result = self.create_documents(&mut entries, workspace, context).await;
        self.restore_section(Section::Documents, entries);
        report.documents = result?;

        let mut entries = self.take_section(Section::LinkInstances)?;
        let result = self
            .create_link_instances(&mut entries, workspace, context)
            .await;
        self.restore_section(Section::LinkInstances, entries);
        report.link_instances = result?;

        let mut entries = self.take_section(Section::Views)?;
        let result = self.create_views(&mut entries, facade, context).await;
        self.restore_section(Section::Views, entries);
        report.views = result?;

        report.dictionary = self.dictionary.clone();

        info!(
            collections = report.collections,
            link_types = report.link_types,
            documents = report.documents,
            link_instances = report.link_instances,
            views = report.views,
            "template instantiated"
        );

        Ok(report)
    }

    /// Moves a section's entries out of the template. A missing section is
    /// empty.
    fn take_section(&mut self, section: Section) -> std::result::Result<Vec<Value>, TemplateError> {
        let Some(object) = self.template.as_object_mut() else {
            return Err(TemplateError::MalformedSource {
                reason: "template root is not an object".to_string(),
            });
        };

        match object.get_mut(section.name()) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(entries)) => Ok(std::mem::take(entries)),
            Some(_) => Err(TemplateError::MalformedSource {
                reason: format!("{:?} is not an array", section.name()),
            }),
        }
    }

    fn restore_section(&mut self, section: Section, entries: Vec<Value>) {
        if let Some(Value::Array(slot)) = self
            .template
            .as_object_mut()
            .and_then(|object| object.get_mut(section.name()))
        {
            *slot = entries;
        }
    }
}
