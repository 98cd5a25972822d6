//! Driving port for managing authorization policy within a tenant.

use async_trait::async_trait;

use crate::domain::{Actor, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PolicyAdministration: Send + Sync {
    /// Grant `role` to `user` in the actor's tenant. The change is visible to
    /// authorization checks by the time this returns.
    async fn assign_role(&self, actor: Actor, user: UserId, role: String) -> Result<(), Error>;

    /// Allow `role` to perform `action` on `object` in the actor's tenant.
    async fn grant_permission(
        &self,
        actor: Actor,
        role: String,
        object: String,
        action: String,
    ) -> Result<(), Error>;
}
