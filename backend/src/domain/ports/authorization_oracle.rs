//! Driven port for authorization decisions.
//!
//! Services consult the oracle before every action; the oracle owns the
//! policy snapshot and how it is refreshed.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Permission};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorizationOracle: Send + Sync {
    /// `Ok` when the actor may exercise `permission` in their tenant,
    /// otherwise an `UNAUTHORIZED-ERROR`.
    async fn authorize(&self, actor: &Actor, permission: Permission) -> Result<(), Error>;

    /// Replace the cached policy with the current stored policy.
    ///
    /// Called after every policy-mutating write, before the write is reported
    /// as complete.
    async fn reload(&self) -> Result<(), Error>;
}
