//! Hiring workflow service implementing the requisition and application
//! driving ports.
//!
//! Every step is authorised twice: once against the role policy through the
//! [`AuthorizationOracle`], and once by matching the actor against the
//! requisition column that owns the step (`supervisor`, `hr_approver`,
//! `recruiter`, or `requestor`). Cross-field guards are enforced by the store
//! and arrive here already translated; the service adds only the errors that
//! need workflow context (ownership mismatches, zero-row updates, and the
//! approval re-check before screening).

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::ports::{
    ApplicantDecisionOutcome, ApplicantDecisionRequest, ApplicationRef, ApprovalRequest,
    AssignRecruiterRequest, AuthorizationOracle, CreateApplicationRequest,
    CreateRequisitionRequest, CredentialIssuer, HiringManagerDecisionRequest,
    JobApplicationCommand, JobApplicationQuery, JobApplicationRepository, JobRequisitionCommand,
    JobRequisitionQuery, JobRequisitionRepository, RecruiterDecisionRequest,
    ScheduleInterviewRequest,
};
use super::{
    Actor, ApplicantDecision, ApprovalDecision, Error, JobApplication, JobApplicationFilter,
    JobApplicationId, JobApplicationUpdate, JobRequisition, JobRequisitionFilter, JobRequisitionId,
    JobRequisitionUpdate, NewJobApplication, NewJobRequisition, NewUserAccount, OfferAcceptance,
    Permission, PolicyRule, RECRUITER_ROLE, RequisitionRole, UserId, validate_approval_decision,
    validate_new_application, validate_new_requisition, validate_offer,
};

fn requisition_not_found(id: JobRequisitionId) -> Error {
    Error::not_found(format!("job requisition {id} not found"))
}

fn application_not_found(application: ApplicationRef) -> Error {
    Error::not_found(format!(
        "job application {} not found for requisition {}",
        application.application_id, application.requisition_id
    ))
}

/// Service backing the hiring workflow ports.
///
/// # Examples
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use hr_backend::domain::{HiringWorkflowService, PolicyCache};
/// # use hr_backend::outbound::credentials::RandomCredentialIssuer;
/// # use hr_backend::outbound::persistence::{
/// #     DbPool, DieselJobApplicationRepository, DieselJobRequisitionRepository,
/// #     DieselPolicyRepository,
/// # };
/// # fn build(pool: DbPool) {
/// let policy = PolicyCache::new(Arc::new(DieselPolicyRepository::new(pool.clone())));
/// let service = HiringWorkflowService::new(
///     Arc::new(DieselJobRequisitionRepository::new(pool.clone())),
///     Arc::new(DieselJobApplicationRepository::new(pool)),
///     Arc::new(policy),
///     Arc::new(RandomCredentialIssuer),
///     Arc::new(mockable::DefaultClock),
/// );
/// # let _ = service;
/// # }
/// ```
pub struct HiringWorkflowService<R, A> {
    requisitions: Arc<R>,
    applications: Arc<A>,
    oracle: Arc<dyn AuthorizationOracle>,
    credentials: Arc<dyn CredentialIssuer>,
    clock: Arc<dyn Clock>,
}

impl<R, A> HiringWorkflowService<R, A> {
    pub fn new(
        requisitions: Arc<R>,
        applications: Arc<A>,
        oracle: Arc<dyn AuthorizationOracle>,
        credentials: Arc<dyn CredentialIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            requisitions,
            applications,
            oracle,
            credentials,
            clock,
        }
    }
}

impl<R, A> HiringWorkflowService<R, A>
where
    R: JobRequisitionRepository,
    A: JobApplicationRepository,
{
    /// Fetch the requisition if `actor` holds `role` on it.
    ///
    /// A miss is reported as `UNAUTHORIZED-ERROR`: the actor may not act on a
    /// requisition they do not own, whether or not it exists.
    async fn owned_requisition(
        &self,
        actor: &Actor,
        id: JobRequisitionId,
        role: RequisitionRole,
    ) -> Result<JobRequisition, Error> {
        let filter = JobRequisitionFilter::by_id(actor.tenant_id, id).owned_by(role, actor.user_id);
        self.requisitions
            .find(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::unauthorized(format!(
                    "job requisition {id} is not assigned to the current user"
                ))
            })
    }

    async fn update_application(
        &self,
        filter: JobApplicationFilter,
        update: JobApplicationUpdate,
        application: ApplicationRef,
    ) -> Result<JobApplication, Error> {
        self.applications
            .update(&filter, &update)
            .await?
            .ok_or_else(|| application_not_found(application))
    }

    /// Record an HR decision, granting the recruiter role when the decision
    /// also assigns a recruiter.
    async fn write_hr_update(
        &self,
        actor: &Actor,
        requisition_id: JobRequisitionId,
        update: JobRequisitionUpdate,
    ) -> Result<JobRequisition, Error> {
        let filter = JobRequisitionFilter::by_id(actor.tenant_id, requisition_id)
            .owned_by(RequisitionRole::HrApprover, actor.user_id)
            .unfilled();
        let Some(recruiter) = update.recruiter else {
            return self
                .requisitions
                .update(&filter, &update)
                .await?
                .ok_or_else(|| requisition_not_found(requisition_id));
        };

        let grant = PolicyRule::grant(recruiter, RECRUITER_ROLE, actor.tenant_id);
        let requisition = self
            .requisitions
            .update_with_role_grant(&filter, &update, &grant)
            .await?
            .ok_or_else(|| requisition_not_found(requisition_id))?;
        // The grant is committed; a failed reload is picked up by the next one.
        if let Err(err) = self.oracle.reload().await {
            warn!(
                requisition_id = %requisition_id,
                error = %err,
                "policy reload after recruiter grant failed"
            );
        }
        info!(
            requisition_id = %requisition_id,
            recruiter = %recruiter,
            "recruiter assigned"
        );
        Ok(requisition)
    }

    async fn onboard(
        &self,
        request: &ApplicantDecisionRequest,
        application: JobApplication,
    ) -> Result<ApplicantDecisionOutcome, Error> {
        let Some(start_date) = application.offer_start_date.filter(|_| application.has_offer())
        else {
            return Err(Error::missing_hiring_manager_offer());
        };
        let credentials = self.credentials.issue()?;
        let acceptance = OfferAcceptance {
            tenant_id: request.tenant_id,
            job_requisition_id: request.application.requisition_id,
            job_application_id: request.application.application_id,
            applicant_email: application.email.clone(),
            new_user: NewUserAccount {
                id: UserId::random(),
                tenant_id: request.tenant_id,
                email: application.email,
                credentials,
            },
            start_date,
            end_date: application.offer_end_date,
            filled_at: self.clock.utc(),
        };
        let onboarding = self.applications.accept_offer(&acceptance).await?;
        info!(
            requisition_id = %onboarding.requisition.id,
            position_id = %onboarding.position_id,
            user_id = %onboarding.user_id,
            "applicant onboarded"
        );
        Ok(ApplicantDecisionOutcome::Onboarded(Box::new(onboarding)))
    }
}

#[async_trait]
impl<R, A> JobRequisitionCommand for HiringWorkflowService<R, A>
where
    R: JobRequisitionRepository,
    A: JobApplicationRepository,
{
    async fn create(&self, request: CreateRequisitionRequest) -> Result<JobRequisition, Error> {
        let actor = request.actor;
        self.oracle
            .authorize(&actor, Permission::CREATE_REQUISITION)
            .await?;
        let new = NewJobRequisition {
            id: JobRequisitionId::random(),
            tenant_id: actor.tenant_id,
            title: request.title,
            department_id: request.department_id,
            job_description: request.job_description,
            job_requirements: request.job_requirements,
            requestor: actor.user_id,
            supervisor: request.supervisor,
            hr_approver: request.hr_approver,
        };
        validate_new_requisition(&new)?;
        let requisition = self.requisitions.create(&new).await?;
        info!(requisition_id = %requisition.id, "job requisition created");
        Ok(requisition)
    }

    async fn record_supervisor_decision(
        &self,
        request: ApprovalRequest,
    ) -> Result<JobRequisition, Error> {
        let ApprovalRequest {
            actor,
            requisition_id,
            decision,
            ..
        } = request;
        self.oracle
            .authorize(&actor, Permission::SUPERVISE_REQUISITION)
            .await?;
        validate_approval_decision(decision)?;
        let filter = JobRequisitionFilter::by_id(actor.tenant_id, requisition_id)
            .owned_by(RequisitionRole::Supervisor, actor.user_id)
            .unfilled();
        let update = JobRequisitionUpdate {
            supervisor_decision: Some(decision),
            ..JobRequisitionUpdate::default()
        };
        let requisition = self
            .requisitions
            .update(&filter, &update)
            .await?
            .ok_or_else(|| requisition_not_found(requisition_id))?;
        info!(requisition_id = %requisition_id, %decision, "supervisor decision recorded");
        Ok(requisition)
    }

    async fn record_hr_decision(&self, request: ApprovalRequest) -> Result<JobRequisition, Error> {
        let ApprovalRequest {
            actor,
            requisition_id,
            decision,
            recruiter,
        } = request;
        self.oracle
            .authorize(&actor, Permission::APPROVE_REQUISITION)
            .await?;
        validate_approval_decision(decision)?;
        let update = JobRequisitionUpdate {
            hr_approver_decision: Some(decision),
            recruiter,
            ..JobRequisitionUpdate::default()
        };
        let requisition = self.write_hr_update(&actor, requisition_id, update).await?;
        info!(requisition_id = %requisition_id, %decision, "HR decision recorded");
        Ok(requisition)
    }

    async fn assign_recruiter(
        &self,
        request: AssignRecruiterRequest,
    ) -> Result<JobRequisition, Error> {
        let actor = request.actor;
        self.oracle
            .authorize(&actor, Permission::APPROVE_REQUISITION)
            .await?;
        let update = JobRequisitionUpdate {
            recruiter: Some(request.recruiter),
            ..JobRequisitionUpdate::default()
        };
        self.write_hr_update(&actor, request.requisition_id, update)
            .await
    }
}

#[async_trait]
impl<R, A> JobRequisitionQuery for HiringWorkflowService<R, A>
where
    R: JobRequisitionRepository,
    A: JobApplicationRepository,
{
    async fn list(
        &self,
        actor: Actor,
        mut filter: JobRequisitionFilter,
    ) -> Result<Vec<JobRequisition>, Error> {
        self.oracle
            .authorize(&actor, Permission::READ_REQUISITIONS)
            .await?;
        filter.tenant_id = Some(actor.tenant_id);
        self.requisitions.find(&filter).await
    }
}

#[async_trait]
impl<R, A> JobApplicationCommand for HiringWorkflowService<R, A>
where
    R: JobRequisitionRepository,
    A: JobApplicationRepository,
{
    async fn create(&self, request: CreateApplicationRequest) -> Result<JobApplication, Error> {
        let new = NewJobApplication {
            id: JobApplicationId::random(),
            tenant_id: request.tenant_id,
            job_requisition_id: request.job_requisition_id,
            first_name: request.first_name,
            last_name: request.last_name,
            country_code: request.country_code,
            phone_number: request.phone_number,
            email: request.email,
            resume_url: request.resume_url,
        };
        validate_new_application(&new)?;
        let application = self.applications.create(&new).await?;
        info!(
            application_id = %application.id,
            requisition_id = %application.job_requisition_id,
            "job application recorded"
        );
        Ok(application)
    }

    async fn record_recruiter_decision(
        &self,
        request: RecruiterDecisionRequest,
    ) -> Result<JobApplication, Error> {
        let RecruiterDecisionRequest {
            actor,
            application,
            decision,
        } = request;
        self.oracle
            .authorize(&actor, Permission::SCREEN_APPLICATION)
            .await?;
        let requisition = self
            .owned_requisition(&actor, application.requisition_id, RequisitionRole::Recruiter)
            .await?;
        // Approvals can be rescinded after the recruiter was assigned.
        if requisition.supervisor_decision != ApprovalDecision::Approved {
            return Err(Error::missing_supervisor_approval());
        }
        if requisition.hr_approver_decision != ApprovalDecision::Approved {
            return Err(Error::missing_hr_approval());
        }
        let filter = JobApplicationFilter::by_id(
            actor.tenant_id,
            application.requisition_id,
            application.application_id,
        );
        let update = JobApplicationUpdate {
            recruiter_decision: Some(decision),
            ..JobApplicationUpdate::default()
        };
        let updated = self.update_application(filter, update, application).await?;
        info!(application_id = %updated.id, %decision, "recruiter decision recorded");
        Ok(updated)
    }

    async fn schedule_interview(
        &self,
        request: ScheduleInterviewRequest,
    ) -> Result<JobApplication, Error> {
        let ScheduleInterviewRequest {
            actor,
            application,
            interview_date,
        } = request;
        self.oracle
            .authorize(&actor, Permission::SCREEN_APPLICATION)
            .await?;
        self.owned_requisition(&actor, application.requisition_id, RequisitionRole::Recruiter)
            .await?;
        let filter = JobApplicationFilter::by_id(
            actor.tenant_id,
            application.requisition_id,
            application.application_id,
        );
        let update = JobApplicationUpdate {
            interview_date: Some(interview_date),
            ..JobApplicationUpdate::default()
        };
        let updated = self.update_application(filter, update, application).await?;
        info!(application_id = %updated.id, %interview_date, "interview scheduled");
        Ok(updated)
    }

    async fn record_hiring_manager_decision(
        &self,
        request: HiringManagerDecisionRequest,
    ) -> Result<JobApplication, Error> {
        let HiringManagerDecisionRequest {
            actor,
            application,
            decision,
            offer_start_date,
            offer_end_date,
        } = request;
        self.oracle
            .authorize(&actor, Permission::OFFER_APPLICATION)
            .await?;
        validate_offer(decision, offer_start_date, offer_end_date)?;
        self.owned_requisition(&actor, application.requisition_id, RequisitionRole::Requestor)
            .await?;
        let filter = JobApplicationFilter::by_id(
            actor.tenant_id,
            application.requisition_id,
            application.application_id,
        );
        let update = JobApplicationUpdate {
            hiring_manager_decision: Some(decision),
            offer_start_date,
            offer_end_date,
            ..JobApplicationUpdate::default()
        };
        let updated = self.update_application(filter, update, application).await?;
        info!(application_id = %updated.id, %decision, "hiring manager decision recorded");
        Ok(updated)
    }

    async fn record_applicant_decision(
        &self,
        request: ApplicantDecisionRequest,
    ) -> Result<ApplicantDecisionOutcome, Error> {
        let reference = request.application;
        let filter = JobApplicationFilter {
            email: Some(request.email.clone()),
            ..JobApplicationFilter::by_id(
                request.tenant_id,
                reference.requisition_id,
                reference.application_id,
            )
        };
        let application = self
            .applications
            .find(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| application_not_found(reference))?;
        if application.applicant_decision.is_some() {
            return Err(Error::not_found(format!(
                "job application {} is no longer awaiting a decision",
                reference.application_id
            )));
        }

        match request.decision {
            ApplicantDecision::Rejected => {
                let update = JobApplicationUpdate {
                    applicant_decision: Some(ApplicantDecision::Rejected),
                    ..JobApplicationUpdate::default()
                };
                let declined = self
                    .update_application(filter.undecided(), update, reference)
                    .await?;
                info!(application_id = %declined.id, "offer declined");
                Ok(ApplicantDecisionOutcome::Declined(declined))
            }
            ApplicantDecision::Accepted => self.onboard(&request, application).await,
        }
    }
}

#[async_trait]
impl<R, A> JobApplicationQuery for HiringWorkflowService<R, A>
where
    R: JobRequisitionRepository,
    A: JobApplicationRepository,
{
    async fn list(
        &self,
        actor: Actor,
        mut filter: JobApplicationFilter,
    ) -> Result<Vec<JobApplication>, Error> {
        self.oracle
            .authorize(&actor, Permission::READ_APPLICATIONS)
            .await?;
        filter.tenant_id = Some(actor.tenant_id);
        self.applications.find(&filter).await
    }
}
