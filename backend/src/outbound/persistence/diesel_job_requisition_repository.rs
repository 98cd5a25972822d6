//! PostgreSQL-backed `JobRequisitionRepository` implementation.
//!
//! Inserts go through Diesel's typed DSL. Sparse reads and updates go
//! through the tenant-scoped query builder so that the optional filter and
//! update fields map one-to-one onto `WHERE` and `SET` terms.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use super::models::{JobRequisitionRow, NewCasbinRuleRow, NewJobRequisitionRow};
use super::pool::DbPool;
use super::query_builder::{self, Assignment, Condition, SqlValue, TenantScopedTable};
use super::schema::{casbin_rule, job_requisition};
use crate::domain::ports::JobRequisitionRepository;
use crate::domain::{
    Error, JobRequisition, JobRequisitionFilter, JobRequisitionUpdate, NewJobRequisition,
    PolicyRule,
};

pub(crate) const JOB_REQUISITION: TenantScopedTable = TenantScopedTable {
    name: "job_requisition",
    tenant_column: "tenant_id",
    columns: &[
        "id",
        "tenant_id",
        "title",
        "department_id",
        "job_description",
        "job_requirements",
        "requestor",
        "supervisor",
        "supervisor_decision",
        "hr_approver",
        "hr_approver_decision",
        "recruiter",
        "filled_by",
        "filled_at",
    ],
};

fn push_equals<V: Into<SqlValue>>(
    conditions: &mut Vec<Condition>,
    column: &'static str,
    value: Option<V>,
) {
    if let Some(value) = value {
        conditions.push(Condition::equals(column, value));
    }
}

fn conditions(filter: &JobRequisitionFilter) -> Vec<Condition> {
    let mut conditions = Vec::new();
    push_equals(&mut conditions, "tenant_id", filter.tenant_id.map(Uuid::from));
    push_equals(&mut conditions, "id", filter.id.map(Uuid::from));
    push_equals(&mut conditions, "title", filter.title.clone());
    push_equals(&mut conditions, "department_id", filter.department_id.map(Uuid::from));
    push_equals(&mut conditions, "requestor", filter.requestor.map(Uuid::from));
    push_equals(&mut conditions, "supervisor", filter.supervisor.map(Uuid::from));
    push_equals(
        &mut conditions,
        "supervisor_decision",
        filter.supervisor_decision.map(|d| d.as_str()),
    );
    push_equals(&mut conditions, "hr_approver", filter.hr_approver.map(Uuid::from));
    push_equals(
        &mut conditions,
        "hr_approver_decision",
        filter.hr_approver_decision.map(|d| d.as_str()),
    );
    push_equals(&mut conditions, "recruiter", filter.recruiter.map(Uuid::from));
    push_equals(&mut conditions, "filled_by", filter.filled_by.map(Uuid::from));
    if filter.unfilled_only {
        conditions.push(Condition::is_null("filled_by"));
    }
    conditions
}

fn assignments(update: &JobRequisitionUpdate) -> Vec<Assignment> {
    let JobRequisitionUpdate {
        supervisor_decision,
        hr_approver_decision,
        recruiter,
        filled_by,
        filled_at,
    } = update;
    [
        supervisor_decision.map(|d| Assignment::new("supervisor_decision", d.as_str())),
        hr_approver_decision.map(|d| Assignment::new("hr_approver_decision", d.as_str())),
        recruiter.map(|id| Assignment::new("recruiter", Uuid::from(id))),
        filled_by.map(|id| Assignment::new("filled_by", Uuid::from(id))),
        filled_at.map(|at| Assignment::new("filled_at", at)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Run a sparse requisition update on an open connection.
///
/// Returns `None` when no row matched. At most one row is expected: every
/// caller filters by id.
pub(crate) async fn update_requisition(
    conn: &mut AsyncPgConnection,
    filter: &JobRequisitionFilter,
    update: &JobRequisitionUpdate,
) -> Result<Option<JobRequisition>, Error> {
    let statement = query_builder::update(&JOB_REQUISITION, &assignments(update), &conditions(filter))?;
    let rows: Vec<JobRequisitionRow> = statement.into_query().load(conn).await?;
    rows.into_iter().next().map(JobRequisition::try_from).transpose()
}

/// Diesel-backed implementation of the job requisition port.
#[derive(Clone)]
pub struct DieselJobRequisitionRepository {
    pool: DbPool,
}

impl DieselJobRequisitionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRequisitionRepository for DieselJobRequisitionRepository {
    async fn create(&self, requisition: &NewJobRequisition) -> Result<JobRequisition, Error> {
        self.pool
            .within_deadline("job_requisition.create", async {
                let mut conn = self.pool.get().await?;
                let row = diesel::insert_into(job_requisition::table)
                    .values(NewJobRequisitionRow::from(requisition))
                    .returning(JobRequisitionRow::as_returning())
                    .get_result(&mut conn)
                    .await?;
                JobRequisition::try_from(row)
            })
            .await
    }

    async fn find(&self, filter: &JobRequisitionFilter) -> Result<Vec<JobRequisition>, Error> {
        let statement = query_builder::select(&JOB_REQUISITION, &conditions(filter))?;
        self.pool
            .within_deadline("job_requisition.find", async {
                let mut conn = self.pool.get().await?;
                let rows: Vec<JobRequisitionRow> = statement.into_query().load(&mut conn).await?;
                debug!(rows = rows.len(), "job requisitions loaded");
                rows.into_iter()
                    .map(JobRequisition::try_from)
                    .collect::<Result<Vec<_>, Error>>()
            })
            .await
    }

    async fn update(
        &self,
        filter: &JobRequisitionFilter,
        update: &JobRequisitionUpdate,
    ) -> Result<Option<JobRequisition>, Error> {
        self.pool
            .within_deadline("job_requisition.update", async {
                let mut conn = self.pool.get().await?;
                update_requisition(&mut conn, filter, update).await
            })
            .await
    }

    async fn update_with_role_grant(
        &self,
        filter: &JobRequisitionFilter,
        update: &JobRequisitionUpdate,
        role_grant: &PolicyRule,
    ) -> Result<Option<JobRequisition>, Error> {
        self.pool
            .within_deadline("job_requisition.update_with_role_grant", async {
                let mut conn = self.pool.get().await?;
                conn.transaction::<_, Error, _>(|conn| {
                    async move {
                        let Some(requisition) = update_requisition(conn, filter, update).await?
                        else {
                            return Ok(None);
                        };
                        diesel::insert_into(casbin_rule::table)
                            .values(NewCasbinRuleRow::from(role_grant))
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .await?;
                        Ok(Some(requisition))
                    }
                    .scope_boxed()
                })
                .await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ApprovalDecision, JobRequisitionId, RequisitionRole, TenantId, UserId,
    };
    use rstest::rstest;

    #[rstest]
    fn ownership_filter_renders_tenant_first_then_actor_then_unfilled() {
        let tenant = TenantId::random();
        let id = JobRequisitionId::random();
        let user = UserId::random();
        let filter = JobRequisitionFilter::by_id(tenant, id)
            .owned_by(RequisitionRole::Supervisor, user)
            .unfilled();
        let update = JobRequisitionUpdate {
            supervisor_decision: Some(ApprovalDecision::Approved),
            ..JobRequisitionUpdate::default()
        };

        let statement =
            query_builder::update(&JOB_REQUISITION, &assignments(&update), &conditions(&filter))
                .expect("statement");

        assert!(statement.sql.starts_with(
            "UPDATE job_requisition SET supervisor_decision = $1 \
             WHERE tenant_id = $2 AND id = $3 AND supervisor = $4 AND filled_by IS NULL"
        ));
        assert_eq!(
            statement.params,
            vec![
                SqlValue::Text("APPROVED".to_owned()),
                SqlValue::Uuid(Uuid::from(tenant)),
                SqlValue::Uuid(Uuid::from(id)),
                SqlValue::Uuid(Uuid::from(user)),
            ]
        );
    }

    #[rstest]
    fn default_filter_has_no_tenant_and_is_refused() {
        assert!(query_builder::select(&JOB_REQUISITION, &conditions(&JobRequisitionFilter::default())).is_err());
    }

    #[rstest]
    fn empty_update_has_no_assignments() {
        assert!(assignments(&JobRequisitionUpdate::default()).is_empty());
    }
}
