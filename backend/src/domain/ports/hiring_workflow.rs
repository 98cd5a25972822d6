//! Driving ports for the hiring workflow.
//!
//! Inbound adapters call these use-cases; the domain service enforces RBAC,
//! actor ownership, and the approval chain behind them.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Actor, ApplicantDecision, ApprovalDecision, DepartmentId, Error, HiringManagerDecision,
    JobApplication, JobApplicationFilter, JobApplicationId, JobRequisition, JobRequisitionFilter,
    JobRequisitionId, Onboarding, RecruiterDecision, TenantId, UserId,
};

/// Raise a requisition as the hiring manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequisitionRequest {
    pub actor: Actor,
    pub title: String,
    pub department_id: DepartmentId,
    pub job_description: String,
    pub job_requirements: String,
    pub supervisor: UserId,
    pub hr_approver: UserId,
}

/// Supervisor or HR decision on a requisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalRequest {
    pub actor: Actor,
    pub requisition_id: JobRequisitionId,
    pub decision: ApprovalDecision,
    /// Only honoured for HR decisions; assigns the recruiter in the same write.
    pub recruiter: Option<UserId>,
}

/// Assign a recruiter after HR approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignRecruiterRequest {
    pub actor: Actor,
    pub requisition_id: JobRequisitionId,
    pub recruiter: UserId,
}

/// Record an application once the résumé upload has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateApplicationRequest {
    pub tenant_id: TenantId,
    pub job_requisition_id: JobRequisitionId,
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_number: String,
    pub email: String,
    pub resume_url: String,
}

/// Identifies an application under the requisition named in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationRef {
    pub requisition_id: JobRequisitionId,
    pub application_id: JobApplicationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecruiterDecisionRequest {
    pub actor: Actor,
    pub application: ApplicationRef,
    pub decision: RecruiterDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleInterviewRequest {
    pub actor: Actor,
    pub application: ApplicationRef,
    pub interview_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiringManagerDecisionRequest {
    pub actor: Actor,
    pub application: ApplicationRef,
    pub decision: HiringManagerDecision,
    pub offer_start_date: Option<NaiveDate>,
    pub offer_end_date: Option<NaiveDate>,
}

/// The applicant's answer to an offer. Applicants are not platform users, so
/// the tenant comes from the link they were sent and the email on the
/// application identifies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantDecisionRequest {
    pub tenant_id: TenantId,
    pub application: ApplicationRef,
    pub email: String,
    pub decision: ApplicantDecision,
}

/// Result of an applicant decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicantDecisionOutcome {
    /// The offer was declined.
    Declined(JobApplication),
    /// The offer was accepted and the applicant onboarded.
    Onboarded(Box<Onboarding>),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRequisitionCommand: Send + Sync {
    async fn create(&self, request: CreateRequisitionRequest) -> Result<JobRequisition, Error>;

    async fn record_supervisor_decision(
        &self,
        request: ApprovalRequest,
    ) -> Result<JobRequisition, Error>;

    async fn record_hr_decision(&self, request: ApprovalRequest) -> Result<JobRequisition, Error>;

    async fn assign_recruiter(
        &self,
        request: AssignRecruiterRequest,
    ) -> Result<JobRequisition, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRequisitionQuery: Send + Sync {
    /// Requisitions in the actor's tenant matching `filter`; the filter's
    /// tenant is always replaced with the actor's.
    async fn list(
        &self,
        actor: Actor,
        filter: JobRequisitionFilter,
    ) -> Result<Vec<JobRequisition>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobApplicationCommand: Send + Sync {
    async fn create(&self, request: CreateApplicationRequest) -> Result<JobApplication, Error>;

    async fn record_recruiter_decision(
        &self,
        request: RecruiterDecisionRequest,
    ) -> Result<JobApplication, Error>;

    async fn schedule_interview(
        &self,
        request: ScheduleInterviewRequest,
    ) -> Result<JobApplication, Error>;

    async fn record_hiring_manager_decision(
        &self,
        request: HiringManagerDecisionRequest,
    ) -> Result<JobApplication, Error>;

    async fn record_applicant_decision(
        &self,
        request: ApplicantDecisionRequest,
    ) -> Result<ApplicantDecisionOutcome, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobApplicationQuery: Send + Sync {
    /// Applications in the actor's tenant matching `filter`.
    async fn list(
        &self,
        actor: Actor,
        filter: JobApplicationFilter,
    ) -> Result<Vec<JobApplication>, Error>;
}
