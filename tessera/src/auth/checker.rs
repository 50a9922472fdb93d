use super::evaluator;
use crate::errors::{Error, Result};
use model::{AuthorizationContext, Organization, Project, Resource, ResourceType, Role};

/// Role checks for one request, composing resource grants with the grants
/// of the enclosing organization and project.
///
/// A `Manage` grant on the organization or the project makes the caller a
/// manager of every resource inside the project.
pub struct PermissionsChecker<'a> {
    context: &'a AuthorizationContext,
    organization: &'a Organization,
    project: &'a Project,
}

impl<'a> PermissionsChecker<'a> {
    pub fn new(
        context: &'a AuthorizationContext,
        organization: &'a Organization,
        project: &'a Project,
    ) -> Self {
        Self {
            context,
            organization,
            project,
        }
    }

    pub fn context(&self) -> &AuthorizationContext {
        self.context
    }

    pub fn is_manager(&self) -> bool {
        evaluator::has_role(&self.organization.permissions, self.context, Role::Manage)
            || evaluator::has_role(&self.project.permissions, self.context, Role::Manage)
    }

    pub fn has_project_role(&self, role: Role) -> bool {
        evaluator::has_role(&self.project.permissions, self.context, role) || self.is_manager()
    }

    pub fn has_role<R: Resource>(&self, resource: &R, role: Role) -> bool {
        evaluator::has_role(resource.permissions(), self.context, role) || self.is_manager()
    }

    pub fn check_project_role(&self, role: Role) -> Result<()> {
        if self.has_project_role(role) {
            return Ok(());
        }

        Err(Error::Unauthorized {
            resource_type: ResourceType::Project,
            role,
        })
    }

    pub fn check_role<R: Resource>(&self, resource: &R, role: Role) -> Result<()> {
        if self.has_role(resource, role) {
            return Ok(());
        }

        Err(Error::Unauthorized {
            resource_type: R::TYPE,
            role,
        })
    }

    /// Fails with `NotFound` rather than `Unauthorized`, so a denied read does
    /// not reveal that the resource exists.
    pub fn check_read<R: Resource>(&self, resource: &R) -> Result<()> {
        if self.has_role(resource, Role::Read) {
            return Ok(());
        }

        Err(Error::not_found(
            R::TYPE,
            resource.id().unwrap_or_default().to_string(),
        ))
    }
}
