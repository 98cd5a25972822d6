//! Policy administration service.
//!
//! Writes go to the store first and the oracle is reloaded before the call
//! returns, so a granted role is usable by the very next request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{AuthorizationOracle, PolicyAdministration, PolicyRepository};
use super::{Actor, Error, Permission, PolicyRule, UserId, validate_name};

pub struct PolicyAdministrationService<R> {
    repository: Arc<R>,
    oracle: Arc<dyn AuthorizationOracle>,
}

impl<R> PolicyAdministrationService<R> {
    pub fn new(repository: Arc<R>, oracle: Arc<dyn AuthorizationOracle>) -> Self {
        Self { repository, oracle }
    }
}

impl<R> PolicyAdministrationService<R>
where
    R: PolicyRepository,
{
    async fn write(&self, actor: &Actor, rule: PolicyRule) -> Result<(), Error> {
        self.oracle.authorize(actor, Permission::MANAGE_POLICY).await?;
        self.repository.insert_rule(&rule).await?;
        self.oracle.reload().await?;
        info!(tenant_id = %actor.tenant_id, ?rule, "policy rule stored");
        Ok(())
    }
}

#[async_trait]
impl<R> PolicyAdministration for PolicyAdministrationService<R>
where
    R: PolicyRepository,
{
    async fn assign_role(&self, actor: Actor, user: UserId, role: String) -> Result<(), Error> {
        validate_name("role", &role)?;
        self.write(&actor, PolicyRule::grant(user, role, actor.tenant_id))
            .await
    }

    async fn grant_permission(
        &self,
        actor: Actor,
        role: String,
        object: String,
        action: String,
    ) -> Result<(), Error> {
        validate_name("role", &role)?;
        validate_name("object", &object)?;
        validate_name("action", &action)?;
        self.write(
            &actor,
            PolicyRule::permission(role, actor.tenant_id, object, action),
        )
        .await
    }
}
