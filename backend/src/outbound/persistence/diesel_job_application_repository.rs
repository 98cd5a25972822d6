//! PostgreSQL-backed `JobApplicationRepository` implementation, including the
//! onboarding transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, info};
use uuid::Uuid;

use super::diesel_job_requisition_repository::update_requisition;
use super::models::{
    JobApplicationRow, NewJobApplicationRow, NewPositionAssignmentRow, NewUserAccountRow,
};
use super::pool::DbPool;
use super::query_builder::{self, Assignment, Condition, SqlValue, TenantScopedTable};
use super::schema::{job_application, job_requisition, position, position_assignment, user_account};
use crate::domain::ports::JobApplicationRepository;
use crate::domain::{
    ApplicantDecision, Error, JobApplication, JobApplicationFilter, JobApplicationUpdate,
    JobRequisitionFilter, JobRequisitionUpdate, NewJobApplication, OfferAcceptance, Onboarding,
    PositionId,
};

pub(crate) const JOB_APPLICATION: TenantScopedTable = TenantScopedTable {
    name: "job_application",
    tenant_column: "tenant_id",
    columns: &[
        "id",
        "tenant_id",
        "job_requisition_id",
        "first_name",
        "last_name",
        "country_code",
        "phone_number",
        "email",
        "resume_url",
        "recruiter_decision",
        "interview_date",
        "hiring_manager_decision",
        "offer_start_date",
        "offer_end_date",
        "applicant_decision",
    ],
};

fn conditions(filter: &JobApplicationFilter) -> Vec<Condition> {
    let JobApplicationFilter {
        tenant_id,
        id,
        job_requisition_id,
        email,
        recruiter_decision,
        hiring_manager_decision,
        applicant_decision,
        undecided_only,
    } = filter;
    let candidates: [(&'static str, Option<SqlValue>); 7] = [
        ("tenant_id", tenant_id.map(|v| Uuid::from(v).into())),
        ("id", id.map(|v| Uuid::from(v).into())),
        (
            "job_requisition_id",
            job_requisition_id.map(|v| Uuid::from(v).into()),
        ),
        ("email", email.clone().map(Into::into)),
        (
            "recruiter_decision",
            recruiter_decision.map(|d| d.as_str().into()),
        ),
        (
            "hiring_manager_decision",
            hiring_manager_decision.map(|d| d.as_str().into()),
        ),
        (
            "applicant_decision",
            applicant_decision.map(|d| d.as_str().into()),
        ),
    ];
    let mut conditions: Vec<Condition> = candidates
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| Condition::equals(column, v)))
        .collect();
    if *undecided_only {
        conditions.push(Condition::is_null("applicant_decision"));
    }
    conditions
}

fn assignments(update: &JobApplicationUpdate) -> Vec<Assignment> {
    let JobApplicationUpdate {
        recruiter_decision,
        interview_date,
        hiring_manager_decision,
        offer_start_date,
        offer_end_date,
        applicant_decision,
    } = update;
    [
        recruiter_decision.map(|d| Assignment::new("recruiter_decision", d.as_str())),
        interview_date.map(|d| Assignment::new("interview_date", d)),
        hiring_manager_decision.map(|d| Assignment::new("hiring_manager_decision", d.as_str())),
        offer_start_date.map(|d| Assignment::new("offer_start_date", d)),
        offer_end_date.map(|d| Assignment::new("offer_end_date", d)),
        applicant_decision.map(|d| Assignment::new("applicant_decision", d.as_str())),
    ]
    .into_iter()
    .flatten()
    .collect()
}

async fn update_application(
    conn: &mut AsyncPgConnection,
    filter: &JobApplicationFilter,
    update: &JobApplicationUpdate,
) -> Result<Option<JobApplication>, Error> {
    let statement =
        query_builder::update(&JOB_APPLICATION, &assignments(update), &conditions(filter))?;
    let rows: Vec<JobApplicationRow> = statement.into_query().load(conn).await?;
    rows.into_iter().next().map(JobApplication::try_from).transpose()
}

/// Resolve the position a requisition was raised for.
async fn requisition_position(
    conn: &mut AsyncPgConnection,
    acceptance: &OfferAcceptance,
) -> Result<PositionId, Error> {
    let tenant = Uuid::from(acceptance.tenant_id);
    let (department_id, title): (Uuid, String) = job_requisition::table
        .filter(job_requisition::tenant_id.eq(tenant))
        .filter(job_requisition::id.eq(Uuid::from(acceptance.job_requisition_id)))
        .select((job_requisition::department_id, job_requisition::title))
        .first(conn)
        .await?;
    let position_id: Uuid = position::table
        .filter(position::tenant_id.eq(tenant))
        .filter(position::department_id.eq(department_id))
        .filter(position::title.eq(title))
        .select(position::id)
        .first(conn)
        .await?;
    Ok(position_id.into())
}

/// Create the hire, staff the position, and close out the requisition and
/// application. Any failure, including a zero-row update, rolls back.
async fn onboard(
    conn: &mut AsyncPgConnection,
    acceptance: &OfferAcceptance,
) -> Result<Onboarding, Error> {
    let tenant = Uuid::from(acceptance.tenant_id);
    let user = &acceptance.new_user;

    diesel::insert_into(user_account::table)
        .values(NewUserAccountRow::from(user))
        .execute(conn)
        .await?;

    let position_id = requisition_position(conn, acceptance).await?;

    diesel::insert_into(position_assignment::table)
        .values(NewPositionAssignmentRow {
            tenant_id: tenant,
            position_id: position_id.into(),
            user_account_id: user.id.into(),
            start_date: acceptance.start_date,
            end_date: acceptance.end_date,
        })
        .execute(conn)
        .await?;

    let requisition = update_requisition(
        conn,
        &JobRequisitionFilter::by_id(acceptance.tenant_id, acceptance.job_requisition_id).unfilled(),
        &JobRequisitionUpdate {
            filled_by: Some(user.id),
            filled_at: Some(acceptance.filled_at),
            ..JobRequisitionUpdate::default()
        },
    )
    .await?
    .ok_or_else(|| {
        Error::not_found(format!(
            "job requisition {} is no longer open",
            acceptance.job_requisition_id
        ))
    })?;

    let application_filter = JobApplicationFilter {
        email: Some(acceptance.applicant_email.clone()),
        ..JobApplicationFilter::by_id(
            acceptance.tenant_id,
            acceptance.job_requisition_id,
            acceptance.job_application_id,
        )
    }
    .undecided();
    let statement = query_builder::update(
        &JOB_APPLICATION,
        &[Assignment::new(
            "applicant_decision",
            ApplicantDecision::Accepted.as_str(),
        )],
        &conditions(&application_filter),
    )?;
    let rows: Vec<JobApplicationRow> = statement.into_query().load(conn).await?;
    let application = rows
        .into_iter()
        .next()
        .map(JobApplication::try_from)
        .transpose()?
        .ok_or_else(|| {
            Error::not_found(format!(
                "job application {} is no longer awaiting a decision",
                acceptance.job_application_id
            ))
        })?;

    Ok(Onboarding {
        user_id: user.id,
        position_id,
        requisition,
        application,
    })
}

/// Diesel-backed implementation of the job application port.
#[derive(Clone)]
pub struct DieselJobApplicationRepository {
    pool: DbPool,
}

impl DieselJobApplicationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobApplicationRepository for DieselJobApplicationRepository {
    async fn create(&self, application: &NewJobApplication) -> Result<JobApplication, Error> {
        self.pool
            .within_deadline("job_application.create", async {
                let mut conn = self.pool.get().await?;
                let row = diesel::insert_into(job_application::table)
                    .values(NewJobApplicationRow::from(application))
                    .returning(JobApplicationRow::as_returning())
                    .get_result(&mut conn)
                    .await?;
                JobApplication::try_from(row)
            })
            .await
    }

    async fn find(&self, filter: &JobApplicationFilter) -> Result<Vec<JobApplication>, Error> {
        let statement = query_builder::select(&JOB_APPLICATION, &conditions(filter))?;
        self.pool
            .within_deadline("job_application.find", async {
                let mut conn = self.pool.get().await?;
                let rows: Vec<JobApplicationRow> = statement.into_query().load(&mut conn).await?;
                debug!(rows = rows.len(), "job applications loaded");
                rows.into_iter()
                    .map(JobApplication::try_from)
                    .collect::<Result<Vec<_>, Error>>()
            })
            .await
    }

    async fn update(
        &self,
        filter: &JobApplicationFilter,
        update: &JobApplicationUpdate,
    ) -> Result<Option<JobApplication>, Error> {
        self.pool
            .within_deadline("job_application.update", async {
                let mut conn = self.pool.get().await?;
                update_application(&mut conn, filter, update).await
            })
            .await
    }

    async fn accept_offer(&self, acceptance: &OfferAcceptance) -> Result<Onboarding, Error> {
        let onboarding = self
            .pool
            .within_deadline("job_application.accept_offer", async {
                let mut conn = self.pool.get().await?;
                conn.transaction::<_, Error, _>(|conn| onboard(conn, acceptance).scope_boxed())
                    .await
            })
            .await?;
        info!(
            user_id = %onboarding.user_id,
            requisition_id = %onboarding.requisition.id,
            "onboarding committed"
        );
        Ok(onboarding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobApplicationId, JobRequisitionId, RecruiterDecision, TenantId};
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    fn interview_update_binds_date_then_scope() {
        let tenant = TenantId::random();
        let requisition = JobRequisitionId::random();
        let application = JobApplicationId::random();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
        let statement = query_builder::update(
            &JOB_APPLICATION,
            &assignments(&JobApplicationUpdate {
                interview_date: Some(date),
                ..JobApplicationUpdate::default()
            }),
            &conditions(&JobApplicationFilter::by_id(tenant, requisition, application)),
        )
        .expect("statement");

        assert!(statement.sql.starts_with(
            "UPDATE job_application SET interview_date = $1 \
             WHERE tenant_id = $2 AND id = $3 AND job_requisition_id = $4 RETURNING "
        ));
        assert!(matches!(
            statement.params.as_slice(),
            [SqlValue::Date(bound), _, _, _] if *bound == date
        ));
    }

    #[rstest]
    fn undecided_filter_guards_the_applicant_answer() {
        let filter = JobApplicationFilter::by_id(
            TenantId::random(),
            JobRequisitionId::random(),
            JobApplicationId::random(),
        )
        .undecided();
        let statement = query_builder::update(
            &JOB_APPLICATION,
            &assignments(&JobApplicationUpdate {
                applicant_decision: Some(ApplicantDecision::Rejected),
                ..JobApplicationUpdate::default()
            }),
            &conditions(&filter),
        )
        .expect("statement");

        assert!(statement.sql.contains(
            "WHERE tenant_id = $2 AND id = $3 AND job_requisition_id = $4 \
             AND applicant_decision IS NULL RETURNING "
        ));
        assert_eq!(statement.params.len(), 4);
    }

    #[rstest]
    fn decision_filters_bind_their_stored_text() {
        let filter = JobApplicationFilter {
            tenant_id: Some(TenantId::random()),
            recruiter_decision: Some(RecruiterDecision::Shortlisted),
            ..JobApplicationFilter::default()
        };
        let statement =
            query_builder::select(&JOB_APPLICATION, &conditions(&filter)).expect("statement");

        assert!(statement.sql.ends_with("WHERE tenant_id = $1 AND recruiter_decision = $2"));
        assert_eq!(
            statement.params.get(1),
            Some(&SqlValue::Text("SHORTLISTED".to_owned()))
        );
    }
}
