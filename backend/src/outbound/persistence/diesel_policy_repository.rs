//! PostgreSQL-backed `PolicyRepository` implementation over `casbin_rule`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::models::{CasbinRuleRow, NewCasbinRuleRow};
use super::pool::DbPool;
use super::schema::casbin_rule;
use crate::domain::ports::PolicyRepository;
use crate::domain::{Error, PolicyRule};

/// Diesel-backed store of authorization policy rows.
#[derive(Clone)]
pub struct DieselPolicyRepository {
    pool: DbPool,
}

impl DieselPolicyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyRepository for DieselPolicyRepository {
    async fn load_rules(&self) -> Result<Vec<PolicyRule>, Error> {
        self.pool
            .within_deadline("casbin_rule.load", async {
                let mut conn = self.pool.get().await?;
                let rows: Vec<CasbinRuleRow> = casbin_rule::table
                    .select(CasbinRuleRow::as_select())
                    .order_by(casbin_rule::id.asc())
                    .load(&mut conn)
                    .await?;
                debug!(rows = rows.len(), "policy rows loaded");
                Ok(rows.into_iter().filter_map(CasbinRuleRow::into_rule).collect())
            })
            .await
    }

    async fn insert_rule(&self, rule: &PolicyRule) -> Result<(), Error> {
        self.pool
            .within_deadline("casbin_rule.insert", async {
                let mut conn = self.pool.get().await?;
                diesel::insert_into(casbin_rule::table)
                    .values(NewCasbinRuleRow::from(rule))
                    .on_conflict_do_nothing()
                    .execute(&mut conn)
                    .await?;
                Ok(())
            })
            .await
    }
}
