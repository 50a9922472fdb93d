use crate::{
    auth::PermissionsChecker,
    errors::{Error, Result},
    resolver, util,
    workspace::Workspace,
};
use chrono::Utc;
use futures::StreamExt;
use model::{
    AuthorizationContext, LinkType, Permission, Permissions, Resource, ResourceType, Role, View,
    ViewUpdate,
};
use resource_store::{Filter, Pagination};
use std::{collections::BTreeSet, sync::Arc};
use tracing::{info, warn};

/// How many times a generated code is tried before the duplicate is reported.
const CODE_ATTEMPTS: usize = 3;

/// View operations. Every call is made on behalf of the caller it is given.
pub struct ViewFacade {
    workspace: Arc<Workspace>,
}

impl ViewFacade {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    fn checker<'a>(&'a self, context: &'a AuthorizationContext) -> PermissionsChecker<'a> {
        PermissionsChecker::new(
            context,
            &self.workspace.organization,
            &self.workspace.project,
        )
    }

    /// Creates a view owned by the caller. A missing code is generated from the
    /// name; the caller gets every view role.
    #[tracing::instrument(skip(self, context, view), fields(user = context.user_id()))]
    pub async fn create_view(&self, context: &AuthorizationContext, mut view: View) -> Result<View> {
        self.checker(context).check_project_role(Role::Write)?;

        let generated = view.code.is_empty();
        if !generated {
            check_code(&view.code)?;
        }

        view.id = None;
        view.permissions.clear();
        view.permissions.update_user_permissions(Permission::new(
            context.user_id(),
            ResourceType::View.roles().iter().copied(),
        ));
        view.author_id = Some(context.user_id().to_string());
        view.creation_date = Some(Utc::now());
        view.updated_by = None;
        view.update_date = None;

        let view = if generated {
            self.create_with_generated_code(view).await?
        } else {
            self.workspace.views.create(view).await?
        };
        info!(id = ?view.id, code = %view.code, "view created");

        Ok(view)
    }

    /// A concurrent create can take the generated code before this one is
    /// stored, in which case a new code is generated.
    async fn create_with_generated_code(&self, mut view: View) -> Result<View> {
        let mut attempt = 1;
        loop {
            let existing = self.workspace.views.find_all_codes().await?;
            view.code = util::generate_code(&existing, &view.name);

            match self.workspace.views.create(view.clone()).await {
                Err(resource_store::Error::DuplicateKey { key, .. }) if attempt < CODE_ATTEMPTS => {
                    warn!(code = %key, attempt, "generated view code taken");
                    attempt += 1;
                }
                result => return Ok(result?),
            }
        }
    }

    pub async fn get_view(&self, context: &AuthorizationContext, id: &str) -> Result<View> {
        let view = self.load(id).await?;
        self.checker(context).check_read(&view)?;
        Ok(view)
    }

    pub async fn get_view_by_code(&self, context: &AuthorizationContext, code: &str) -> Result<View> {
        let view = self
            .workspace
            .views
            .find(&Filter::eq("code", code), None)
            .await?
            .next()
            .await
            .ok_or_else(|| Error::not_found(ResourceType::View, code))?;

        self.checker(context).check_read(&view)?;
        Ok(view)
    }

    /// Views the caller may read, every view for managers.
    pub async fn get_views(
        &self,
        context: &AuthorizationContext,
        pagination: Option<Pagination>,
    ) -> Result<Vec<View>> {
        let filter = self.read_filter(context);
        self.find(&filter, pagination).await
    }

    /// Readable views whose name contains `text`.
    pub async fn get_views_by_suggestion(
        &self,
        context: &AuthorizationContext,
        text: &str,
    ) -> Result<Vec<View>> {
        let filter = if self.checker(context).is_manager() {
            resolver::build_name_filter(text)
        } else {
            resolver::build_suggestion_filter(context, text)
        };

        self.find(&filter, None).await
    }

    /// Readable views whose query uses the collection, directly or through a
    /// link type.
    pub async fn get_views_by_collection(
        &self,
        context: &AuthorizationContext,
        collection_id: &str,
    ) -> Result<Vec<View>> {
        let link_types: Vec<LinkType> = self
            .workspace
            .link_types
            .find(
                &resolver::build_link_types_by_collection_filter(collection_id),
                None,
            )
            .await?
            .collect()
            .await;

        let filter = self.read_filter(context).and(
            resolver::build_collection_reference_filter(collection_id, &link_types),
        );

        self.find(&filter, None).await
    }

    /// Applies the updates in order. Changing the code takes `Manage`, every
    /// other field `Write`.
    #[tracing::instrument(skip(self, context, updates), fields(user = context.user_id()))]
    pub async fn update_view(
        &self,
        context: &AuthorizationContext,
        id: &str,
        updates: Vec<ViewUpdate>,
    ) -> Result<View> {
        let mut view = self.load(id).await?;
        let checker = self.checker(context);
        checker.check_read(&view)?;
        checker.check_role(&view, Role::Write)?;

        for update in updates {
            if let ViewUpdate::Code(code) = &update {
                checker.check_role(&view, Role::Manage)?;
                if code.is_empty() {
                    return Err(Error::BadFormat {
                        reason: "code cannot be empty".to_string(),
                    });
                }
                check_code(code)?;
            }
            view.apply(update);
        }

        view.updated_by = Some(context.user_id().to_string());
        view.update_date = Some(Utc::now());

        Ok(self.workspace.views.update(id, view).await?)
    }

    pub async fn update_user_permissions(
        &self,
        context: &AuthorizationContext,
        id: &str,
        permissions: Vec<Permission>,
    ) -> Result<Permissions> {
        self.change_permissions(context, id, |current| {
            for permission in permissions {
                current.update_user_permissions(permission);
            }
        })
        .await
    }

    pub async fn update_group_permissions(
        &self,
        context: &AuthorizationContext,
        id: &str,
        permissions: Vec<Permission>,
    ) -> Result<Permissions> {
        self.change_permissions(context, id, |current| {
            for permission in permissions {
                current.update_group_permissions(permission);
            }
        })
        .await
    }

    pub async fn remove_user_permission(
        &self,
        context: &AuthorizationContext,
        id: &str,
        user_id: &str,
    ) -> Result<Permissions> {
        self.change_permissions(context, id, |current| {
            current.remove_user_permission(user_id)
        })
        .await
    }

    pub async fn remove_group_permission(
        &self,
        context: &AuthorizationContext,
        id: &str,
        group_id: &str,
    ) -> Result<Permissions> {
        self.change_permissions(context, id, |current| {
            current.remove_group_permission(group_id)
        })
        .await
    }

    /// Copies everything but identity, code, authorship and permissions into a
    /// new view owned by the caller.
    #[tracing::instrument(skip(self, context), fields(user = context.user_id()))]
    pub async fn copy_view(
        &self,
        context: &AuthorizationContext,
        id: &str,
        name: &str,
    ) -> Result<View> {
        let source = self.load(id).await?;
        let checker = self.checker(context);
        checker.check_read(&source)?;
        checker.check_role(&source, Role::Clone)?;

        let copy = View {
            name: name.to_string(),
            icon: source.icon,
            color: source.color,
            description: source.description,
            perspective: source.perspective,
            query: source.query,
            config: source.config,
            ..Default::default()
        };

        self.create_view(context, copy).await
    }

    #[tracing::instrument(skip(self, context), fields(user = context.user_id()))]
    pub async fn delete_view(&self, context: &AuthorizationContext, id: &str) -> Result<()> {
        let view = self.load(id).await?;
        let checker = self.checker(context);
        checker.check_read(&view)?;
        checker.check_role(&view, Role::Manage)?;

        self.workspace.views.delete(id).await?;
        info!(id, "view deleted");

        Ok(())
    }

    pub async fn get_all_view_codes(&self) -> Result<BTreeSet<String>> {
        Ok(self.workspace.views.find_all_codes().await?)
    }

    async fn change_permissions<F>(
        &self,
        context: &AuthorizationContext,
        id: &str,
        change: F,
    ) -> Result<Permissions>
    where
        F: FnOnce(&mut Permissions),
    {
        let mut view = self.load(id).await?;
        let checker = self.checker(context);
        checker.check_read(&view)?;
        checker.check_role(&view, Role::Manage)?;

        change(view.permissions_mut());

        let view = self.workspace.views.update(id, view).await?;
        Ok(view.permissions)
    }

    async fn load(&self, id: &str) -> Result<View> {
        self.workspace
            .views
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(ResourceType::View, id))
    }

    fn read_filter(&self, context: &AuthorizationContext) -> Filter {
        if self.checker(context).is_manager() {
            Filter::All
        } else {
            resolver::build_read_filter(context, Role::Read)
        }
    }

    async fn find(&self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<View>> {
        Ok(self
            .workspace
            .views
            .find(filter, pagination)
            .await?
            .collect()
            .await)
    }
}

fn check_code(code: &str) -> Result<()> {
    if util::is_code_safe(code) {
        return Ok(());
    }

    Err(Error::BadFormat {
        reason: format!("invalid characters in code {code:?}, only A-Z, a-z, 0-9 and _ are allowed"),
    })
}
