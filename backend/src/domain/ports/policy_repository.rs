//! Driven port for stored authorization policy rows.

use async_trait::async_trait;

use crate::domain::{Error, PolicyRule};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Every stored rule, across all tenants.
    async fn load_rules(&self) -> Result<Vec<PolicyRule>, Error>;

    /// Store a rule. Storing an identical rule twice is not an error.
    async fn insert_rule(&self, rule: &PolicyRule) -> Result<(), Error>;
}
