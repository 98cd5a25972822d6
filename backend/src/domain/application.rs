//! Job application records and their sparse filter and update forms.

use chrono::NaiveDate;

use super::{
    ApplicantDecision, HiringManagerDecision, JobApplicationId, JobRequisitionId,
    RecruiterDecision, TenantId,
};

/// One applicant's candidacy against a requisition.
///
/// Each decision is `None` until the responsible actor records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplication {
    pub id: JobApplicationId,
    pub tenant_id: TenantId,
    pub job_requisition_id: JobRequisitionId,
    pub first_name: String,
    pub last_name: String,
    /// ISO 3166-1 alpha-2 country of the phone number.
    pub country_code: String,
    pub phone_number: String,
    pub email: String,
    /// Location of the uploaded résumé in object storage.
    pub resume_url: String,
    pub recruiter_decision: Option<RecruiterDecision>,
    pub interview_date: Option<NaiveDate>,
    pub hiring_manager_decision: Option<HiringManagerDecision>,
    pub offer_start_date: Option<NaiveDate>,
    pub offer_end_date: Option<NaiveDate>,
    pub applicant_decision: Option<ApplicantDecision>,
}

impl JobApplication {
    /// The hiring manager has an offer outstanding for this applicant.
    #[must_use]
    pub fn has_offer(&self) -> bool {
        self.hiring_manager_decision == Some(HiringManagerDecision::Offered)
    }
}

/// Input recorded when an applicant's résumé upload completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobApplication {
    pub id: JobApplicationId,
    pub tenant_id: TenantId,
    pub job_requisition_id: JobRequisitionId,
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_number: String,
    pub email: String,
    pub resume_url: String,
}

/// Sparse application filter. `None` fields are not constrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobApplicationFilter {
    pub tenant_id: Option<TenantId>,
    pub id: Option<JobApplicationId>,
    pub job_requisition_id: Option<JobRequisitionId>,
    pub email: Option<String>,
    pub recruiter_decision: Option<RecruiterDecision>,
    pub hiring_manager_decision: Option<HiringManagerDecision>,
    pub applicant_decision: Option<ApplicantDecision>,
    /// Restrict to applications the applicant has not answered yet.
    pub undecided_only: bool,
}

impl JobApplicationFilter {
    /// Filter for one application of one requisition in a tenant.
    #[must_use]
    pub fn by_id(
        tenant_id: TenantId,
        job_requisition_id: JobRequisitionId,
        id: JobApplicationId,
    ) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            id: Some(id),
            job_requisition_id: Some(job_requisition_id),
            ..Self::default()
        }
    }

    /// Narrow the filter to applications still awaiting the applicant.
    #[must_use]
    pub fn undecided(mut self) -> Self {
        self.undecided_only = true;
        self
    }
}

/// Sparse application update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobApplicationUpdate {
    pub recruiter_decision: Option<RecruiterDecision>,
    pub interview_date: Option<NaiveDate>,
    pub hiring_manager_decision: Option<HiringManagerDecision>,
    pub offer_start_date: Option<NaiveDate>,
    pub offer_end_date: Option<NaiveDate>,
    pub applicant_decision: Option<ApplicantDecision>,
}

impl JobApplicationUpdate {
    /// No field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
