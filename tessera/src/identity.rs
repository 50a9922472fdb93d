use crate::errors::Result;
use model::AuthorizationContext;

/// Resolves who is calling, once per request.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current(&self) -> Result<AuthorizationContext>;
}

/// Always answers with the same caller.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    context: AuthorizationContext,
}

impl StaticIdentity {
    pub fn new(context: AuthorizationContext) -> Self {
        Self { context }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current(&self) -> Result<AuthorizationContext> {
        Ok(self.context.clone())
    }
}
