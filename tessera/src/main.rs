#![warn(clippy::unwrap_used, clippy::expect_used)]

use model::{AuthorizationContext, Organization, Permission, Project, Role};
use resource_store::Pagination;
use serde_json::json;
use std::sync::Arc;
use tessera::{
    config::{Config, ConfigError, LogFormat, LogLevel},
    errors::output::ErrorOutput,
    facade::ViewFacade,
    identity::{IdentityProvider, StaticIdentity},
    template::{FileTemplate, TemplateOptions, TemplateParser},
    util,
    workspace::Workspace,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOCAL_CODE: &str = "LOCAL";

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("failed to load config")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tessera(#[from] tessera::Error),

    #[error("invalid log directive")]
    TracingParse(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to set up tracing")]
    TracingSetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error(transparent)]
    SerdeJSON(#[from] serde_json::Error),

    #[error("no template given, use --template or TESSERA_TEMPLATE")]
    MissingTemplate,

    #[error("invalid template path {0:?}")]
    InvalidTemplatePath(String),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        let exit_code = match &err {
            AppError::Tessera(err) => {
                match serde_json::to_string_pretty(&ErrorOutput::from(err)) {
                    Ok(output) => eprintln!("{output}"),
                    Err(_) => eprintln!("{err}"),
                }
                err.code().exit_code()
            }
            err => {
                eprintln!("{err}");
                1
            }
        };

        std::process::exit(exit_code);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::new()?;
    setup_tracing(config.log_level, config.log_format)?;

    let template = config
        .template
        .as_deref()
        .ok_or(AppError::MissingTemplate)?;
    let template_path = util::get_base_dir(template)
        .ok_or_else(|| AppError::InvalidTemplatePath(template.to_string()))?;

    let identity = StaticIdentity::new(
        AuthorizationContext::new(config.user.as_str()).with_groups(config.groups.iter().cloned()),
    );
    let context = identity.current().await?;

    let facade = ViewFacade::new(Arc::new(local_workspace(context.user_id())));

    let options = TemplateOptions::with_date_format(config.date_format.as_deref());
    let mut parser = TemplateParser::load(&FileTemplate::new(template_path), options).await?;
    let report = parser.instantiate(&facade, &context).await?;

    let views = facade
        .get_views(&context, Some(Pagination::new(0, config.page_size)))
        .await?;
    info!(views = views.len(), "listing views");

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "report": report, "views": views }))?
    );

    Ok(())
}

/// A fresh in-memory organization and project managed by the user.
fn local_workspace(user_id: &str) -> Workspace {
    let organization = Organization {
        code: LOCAL_CODE.to_string(),
        name: "Local organization".to_string(),
        ..Default::default()
    };

    let mut project = Project {
        code: LOCAL_CODE.to_string(),
        name: "Local project".to_string(),
        ..Default::default()
    };
    project.permissions.update_user_permissions(Permission::new(
        user_id,
        [Role::Read, Role::Write, Role::Manage],
    ));

    Workspace::in_memory(organization, project)
}

fn setup_tracing(log_level: LogLevel, log_format: LogFormat) -> Result<(), AppError> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("tessera={}", log_level.as_directive()).parse()?)
        .add_directive(format!("resource_store={}", log_level.as_directive()).parse()?);

    match log_format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .finish(),
        )?,
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish(),
        )?,
    }

    Ok(())
}
