//! Job requisition records and their sparse filter and update forms.

use chrono::{DateTime, Utc};

use super::{ApprovalDecision, DepartmentId, JobRequisitionId, TenantId, UserId};

/// A request to fill a position, moving through supervisor and HR approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequisition {
    pub id: JobRequisitionId,
    pub tenant_id: TenantId,
    /// Title of the position being filled.
    pub title: String,
    pub department_id: DepartmentId,
    pub job_description: String,
    pub job_requirements: String,
    /// Hiring manager who raised the requisition.
    pub requestor: UserId,
    pub supervisor: UserId,
    pub supervisor_decision: ApprovalDecision,
    pub hr_approver: UserId,
    pub hr_approver_decision: ApprovalDecision,
    pub recruiter: Option<UserId>,
    pub filled_by: Option<UserId>,
    pub filled_at: Option<DateTime<Utc>>,
}

impl JobRequisition {
    /// Both approvers have signed off.
    #[must_use]
    pub fn is_fully_approved(&self) -> bool {
        self.supervisor_decision == ApprovalDecision::Approved
            && self.hr_approver_decision == ApprovalDecision::Approved
    }

    /// Onboarding has completed for this requisition.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.filled_by.is_some()
    }
}

/// Input for creating a requisition. Both decisions start as pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobRequisition {
    pub id: JobRequisitionId,
    pub tenant_id: TenantId,
    pub title: String,
    pub department_id: DepartmentId,
    pub job_description: String,
    pub job_requirements: String,
    pub requestor: UserId,
    pub supervisor: UserId,
    pub hr_approver: UserId,
}

/// Which actor column an ownership filter matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequisitionRole {
    Requestor,
    Supervisor,
    HrApprover,
    Recruiter,
}

/// Sparse requisition filter. `None` fields are not constrained.
///
/// `tenant_id` is optional only so that an omitted tenant can be detected and
/// refused by the query builder; services always set it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRequisitionFilter {
    pub tenant_id: Option<TenantId>,
    pub id: Option<JobRequisitionId>,
    pub title: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub requestor: Option<UserId>,
    pub supervisor: Option<UserId>,
    pub supervisor_decision: Option<ApprovalDecision>,
    pub hr_approver: Option<UserId>,
    pub hr_approver_decision: Option<ApprovalDecision>,
    pub recruiter: Option<UserId>,
    pub filled_by: Option<UserId>,
    /// Restrict to requisitions that have not been filled.
    pub unfilled_only: bool,
}

impl JobRequisitionFilter {
    /// Filter for one requisition in a tenant.
    #[must_use]
    pub fn by_id(tenant_id: TenantId, id: JobRequisitionId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            id: Some(id),
            ..Self::default()
        }
    }

    /// Narrow the filter to requisitions where `user` holds `role`.
    #[must_use]
    pub fn owned_by(mut self, role: RequisitionRole, user: UserId) -> Self {
        match role {
            RequisitionRole::Requestor => self.requestor = Some(user),
            RequisitionRole::Supervisor => self.supervisor = Some(user),
            RequisitionRole::HrApprover => self.hr_approver = Some(user),
            RequisitionRole::Recruiter => self.recruiter = Some(user),
        }
        self
    }

    /// Narrow the filter to requisitions that are still open.
    #[must_use]
    pub fn unfilled(mut self) -> Self {
        self.unfilled_only = true;
        self
    }
}

/// Sparse requisition update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRequisitionUpdate {
    pub supervisor_decision: Option<ApprovalDecision>,
    pub hr_approver_decision: Option<ApprovalDecision>,
    pub recruiter: Option<UserId>,
    pub filled_by: Option<UserId>,
    pub filled_at: Option<DateTime<Utc>>,
}

impl JobRequisitionUpdate {
    /// No field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RequisitionRole::Requestor)]
    #[case(RequisitionRole::Supervisor)]
    #[case(RequisitionRole::HrApprover)]
    #[case(RequisitionRole::Recruiter)]
    fn ownership_sets_exactly_one_actor_column(#[case] role: RequisitionRole) {
        let user = UserId::random();
        let filter =
            JobRequisitionFilter::by_id(TenantId::random(), JobRequisitionId::random())
                .owned_by(role, user);
        let actors = [
            filter.requestor,
            filter.supervisor,
            filter.hr_approver,
            filter.recruiter,
        ];
        assert_eq!(actors.iter().flatten().count(), 1);
        assert!(actors.contains(&Some(user)));
    }

    #[rstest]
    fn default_update_is_empty() {
        assert!(JobRequisitionUpdate::default().is_empty());
        let update = JobRequisitionUpdate {
            recruiter: Some(UserId::random()),
            ..JobRequisitionUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
