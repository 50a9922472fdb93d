use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;

pub const PLACEHOLDER_FIELD: &str = "_id";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unresolved {kind} reference {placeholder:?}")]
    UnresolvedReference {
        kind: super::ResourceKind,
        placeholder: String,
    },

    #[error("entry in {section:?} has no string `_id`")]
    MissingPlaceholderId { section: String },

    #[error("malformed template: {reason}")]
    MalformedSource { reason: String },

    #[error("failed to read template")]
    Io(#[from] std::io::Error),

    #[error("invalid template JSON")]
    Json(#[from] serde_json::Error),
}

/// Supplies the portable template document.
#[async_trait::async_trait]
pub trait TemplateSource: Send + Sync {
    async fn load(&self) -> Result<Value, TemplateError>;
}

/// A template already in memory.
#[derive(Debug, Clone)]
pub struct JsonTemplate(Value);

impl JsonTemplate {
    pub fn new(template: Value) -> Self {
        Self(template)
    }
}

#[async_trait::async_trait]
impl TemplateSource for JsonTemplate {
    async fn load(&self) -> Result<Value, TemplateError> {
        Ok(self.0.clone())
    }
}

/// A template read from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct FileTemplate {
    path: PathBuf,
}

impl FileTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl TemplateSource for FileTemplate {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Value, TemplateError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Deserializes a template entry without its `_id`, then puts the `_id` back
/// so the template document is left as it was.
pub(crate) fn read_entry<T: DeserializeOwned>(
    entry: &mut Value,
    section: &str,
) -> Result<(String, T), TemplateError> {
    let object = entry
        .as_object_mut()
        .ok_or_else(|| TemplateError::MalformedSource {
            reason: format!("entry in {section:?} is not an object"),
        })?;

    let placeholder = match object.remove(PLACEHOLDER_FIELD) {
        Some(Value::String(placeholder)) => placeholder,
        Some(other) => {
            object.insert(PLACEHOLDER_FIELD.to_string(), other);
            return Err(TemplateError::MissingPlaceholderId {
                section: section.to_string(),
            });
        }
        None => {
            return Err(TemplateError::MissingPlaceholderId {
                section: section.to_string(),
            })
        }
    };

    let record = serde_json::from_value::<T>(Value::Object(object.clone()));

    object.insert(
        PLACEHOLDER_FIELD.to_string(),
        Value::String(placeholder.clone()),
    );

    Ok((placeholder, record?))
}
