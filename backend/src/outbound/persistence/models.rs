//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Decision columns travel as text and are
//! parsed on the way out; a value the domain does not recognise is an
//! internal error rather than a silent default.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use super::schema::{
    casbin_rule, department, division, job_application, job_requisition, position,
    position_assignment, subordinate_supervisor_relationship, user_account,
};
use crate::domain::{
    Department, Division, Error, JobApplication, JobRequisition, NewJobApplication,
    NewJobRequisition, NewPosition, NewUserAccount, PolicyRule, Position, PositionId,
};

fn parse_decision<T>(column: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err| Error::internal(format!("stored {column} is invalid: {err}")))
}

fn parse_optional_decision<T>(column: &str, value: Option<&str>) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map(|v| parse_decision(column, v)).transpose()
}

// ---------------------------------------------------------------------------
// Job requisitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = job_requisition)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobRequisitionRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub department_id: Uuid,
    pub job_description: String,
    pub job_requirements: String,
    pub requestor: Uuid,
    pub supervisor: Uuid,
    pub supervisor_decision: String,
    pub hr_approver: Uuid,
    pub hr_approver_decision: String,
    pub recruiter: Option<Uuid>,
    pub filled_by: Option<Uuid>,
    pub filled_at: Option<DateTime<Utc>>,
}

impl TryFrom<JobRequisitionRow> for JobRequisition {
    type Error = Error;

    fn try_from(row: JobRequisitionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            tenant_id: row.tenant_id.into(),
            title: row.title,
            department_id: row.department_id.into(),
            job_description: row.job_description,
            job_requirements: row.job_requirements,
            requestor: row.requestor.into(),
            supervisor: row.supervisor.into(),
            supervisor_decision: parse_decision("supervisor_decision", &row.supervisor_decision)?,
            hr_approver: row.hr_approver.into(),
            hr_approver_decision: parse_decision(
                "hr_approver_decision",
                &row.hr_approver_decision,
            )?,
            recruiter: row.recruiter.map(Into::into),
            filled_by: row.filled_by.map(Into::into),
            filled_at: row.filled_at,
        })
    }
}

/// Decisions are omitted so the column defaults (`PENDING`) apply.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = job_requisition)]
pub(crate) struct NewJobRequisitionRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: &'a str,
    pub department_id: Uuid,
    pub job_description: &'a str,
    pub job_requirements: &'a str,
    pub requestor: Uuid,
    pub supervisor: Uuid,
    pub hr_approver: Uuid,
}

impl<'a> From<&'a NewJobRequisition> for NewJobRequisitionRow<'a> {
    fn from(new: &'a NewJobRequisition) -> Self {
        Self {
            id: *new.id.as_uuid(),
            tenant_id: *new.tenant_id.as_uuid(),
            title: &new.title,
            department_id: *new.department_id.as_uuid(),
            job_description: &new.job_description,
            job_requirements: &new.job_requirements,
            requestor: *new.requestor.as_uuid(),
            supervisor: *new.supervisor.as_uuid(),
            hr_approver: *new.hr_approver.as_uuid(),
        }
    }
}

// ---------------------------------------------------------------------------
// Job applications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = job_application)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobApplicationRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub job_requisition_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_number: String,
    pub email: String,
    pub resume_url: String,
    pub recruiter_decision: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub hiring_manager_decision: Option<String>,
    pub offer_start_date: Option<NaiveDate>,
    pub offer_end_date: Option<NaiveDate>,
    pub applicant_decision: Option<String>,
}

impl TryFrom<JobApplicationRow> for JobApplication {
    type Error = Error;

    fn try_from(row: JobApplicationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            tenant_id: row.tenant_id.into(),
            job_requisition_id: row.job_requisition_id.into(),
            first_name: row.first_name,
            last_name: row.last_name,
            country_code: row.country_code,
            phone_number: row.phone_number,
            email: row.email,
            resume_url: row.resume_url,
            recruiter_decision: parse_optional_decision(
                "recruiter_decision",
                row.recruiter_decision.as_deref(),
            )?,
            interview_date: row.interview_date,
            hiring_manager_decision: parse_optional_decision(
                "hiring_manager_decision",
                row.hiring_manager_decision.as_deref(),
            )?,
            offer_start_date: row.offer_start_date,
            offer_end_date: row.offer_end_date,
            applicant_decision: parse_optional_decision(
                "applicant_decision",
                row.applicant_decision.as_deref(),
            )?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = job_application)]
pub(crate) struct NewJobApplicationRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub job_requisition_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub country_code: &'a str,
    pub phone_number: &'a str,
    pub email: &'a str,
    pub resume_url: &'a str,
}

impl<'a> From<&'a NewJobApplication> for NewJobApplicationRow<'a> {
    fn from(new: &'a NewJobApplication) -> Self {
        Self {
            id: *new.id.as_uuid(),
            tenant_id: *new.tenant_id.as_uuid(),
            job_requisition_id: *new.job_requisition_id.as_uuid(),
            first_name: &new.first_name,
            last_name: &new.last_name,
            country_code: &new.country_code,
            phone_number: &new.phone_number,
            email: &new.email,
            resume_url: &new.resume_url,
        }
    }
}

// ---------------------------------------------------------------------------
// Onboarding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_account)]
pub(crate) struct NewUserAccountRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: &'a str,
    pub password: &'a str,
    pub totp_secret_key: &'a str,
}

impl<'a> From<&'a NewUserAccount> for NewUserAccountRow<'a> {
    fn from(user: &'a NewUserAccount) -> Self {
        Self {
            id: *user.id.as_uuid(),
            tenant_id: *user.tenant_id.as_uuid(),
            email: &user.email,
            password: user.credentials.password(),
            totp_secret_key: user.credentials.totp_secret_key(),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = position_assignment)]
pub(crate) struct NewPositionAssignmentRow {
    pub tenant_id: Uuid,
    pub position_id: Uuid,
    pub user_account_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Organisation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = division)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DivisionRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
}

impl From<&Division> for DivisionRow {
    fn from(division: &Division) -> Self {
        Self {
            id: *division.id.as_uuid(),
            tenant_id: *division.tenant_id.as_uuid(),
            name: division.name.clone(),
        }
    }
}

impl From<DivisionRow> for Division {
    fn from(row: DivisionRow) -> Self {
        Self {
            id: row.id.into(),
            tenant_id: row.tenant_id.into(),
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = department)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepartmentRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub division_id: Uuid,
    pub name: String,
}

impl From<&Department> for DepartmentRow {
    fn from(department: &Department) -> Self {
        Self {
            id: *department.id.as_uuid(),
            tenant_id: *department.tenant_id.as_uuid(),
            division_id: *department.division_id.as_uuid(),
            name: department.name.clone(),
        }
    }
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id.into(),
            tenant_id: row.tenant_id.into(),
            division_id: row.division_id.into(),
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = position)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PositionRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub department_id: Uuid,
}

impl From<&NewPosition> for PositionRow {
    fn from(position: &NewPosition) -> Self {
        Self {
            id: *position.id.as_uuid(),
            tenant_id: *position.tenant_id.as_uuid(),
            title: position.title.clone(),
            department_id: *position.department_id.as_uuid(),
        }
    }
}

impl PositionRow {
    pub(crate) fn into_position(self, supervisor_position_ids: Vec<PositionId>) -> Position {
        Position {
            id: self.id.into(),
            tenant_id: self.tenant_id.into(),
            department_id: self.department_id.into(),
            title: self.title,
            supervisor_position_ids,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = subordinate_supervisor_relationship)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SupervisorEdgeRow {
    pub tenant_id: Uuid,
    pub subordinate_position_id: Uuid,
    pub supervisor_position_id: Uuid,
}

// ---------------------------------------------------------------------------
// Authorization policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = casbin_rule)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CasbinRuleRow {
    pub ptype: String,
    pub v0: String,
    pub v1: String,
    pub v2: String,
    pub v3: String,
}

impl CasbinRuleRow {
    /// Convert to a domain rule; rows of an unknown type are skipped.
    pub(crate) fn into_rule(self) -> Option<PolicyRule> {
        match self.ptype.as_str() {
            "p" => Some(PolicyRule::Permission {
                role: self.v0,
                tenant: self.v1,
                object: self.v2,
                action: self.v3,
            }),
            "g" => Some(PolicyRule::Grant {
                user: self.v0,
                role: self.v1,
                tenant: self.v2,
            }),
            other => {
                warn!(ptype = other, "skipping policy row of unknown type");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = casbin_rule)]
pub(crate) struct NewCasbinRuleRow<'a> {
    pub ptype: &'static str,
    pub v0: &'a str,
    pub v1: &'a str,
    pub v2: &'a str,
    pub v3: &'a str,
}

impl<'a> From<&'a PolicyRule> for NewCasbinRuleRow<'a> {
    fn from(rule: &'a PolicyRule) -> Self {
        match rule {
            PolicyRule::Permission {
                role,
                tenant,
                object,
                action,
            } => Self {
                ptype: "p",
                v0: role,
                v1: tenant,
                v2: object,
                v3: action,
            },
            PolicyRule::Grant { user, role, tenant } => Self {
                ptype: "g",
                v0: user,
                v1: role,
                v2: tenant,
                v3: "",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApprovalDecision, ErrorCode, TenantId, UserId};
    use rstest::rstest;

    fn requisition_row(supervisor_decision: &str) -> JobRequisitionRow {
        JobRequisitionRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            title: "Engineer".to_owned(),
            department_id: Uuid::new_v4(),
            job_description: "Build".to_owned(),
            job_requirements: "Rust".to_owned(),
            requestor: Uuid::new_v4(),
            supervisor: Uuid::new_v4(),
            supervisor_decision: supervisor_decision.to_owned(),
            hr_approver: Uuid::new_v4(),
            hr_approver_decision: "PENDING".to_owned(),
            recruiter: None,
            filled_by: None,
            filled_at: None,
        }
    }

    #[rstest]
    fn stored_decisions_are_parsed() {
        let requisition =
            JobRequisition::try_from(requisition_row("APPROVED")).expect("valid row");
        assert_eq!(requisition.supervisor_decision, ApprovalDecision::Approved);
        assert_eq!(requisition.hr_approver_decision, ApprovalDecision::Pending);
    }

    #[rstest]
    fn unknown_stored_decision_is_internal() {
        let err = JobRequisition::try_from(requisition_row("MAYBE")).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn grant_rules_round_trip_through_rows() {
        let rule = PolicyRule::grant(UserId::random(), "RECRUITER", TenantId::random());
        let row = NewCasbinRuleRow::from(&rule);
        assert_eq!(row.ptype, "g");
        assert_eq!(row.v3, "");

        let stored = CasbinRuleRow {
            ptype: row.ptype.to_owned(),
            v0: row.v0.to_owned(),
            v1: row.v1.to_owned(),
            v2: row.v2.to_owned(),
            v3: row.v3.to_owned(),
        };
        assert_eq!(stored.into_rule(), Some(rule));
    }

    #[rstest]
    fn unknown_rule_type_is_skipped() {
        let row = CasbinRuleRow {
            ptype: "x".to_owned(),
            v0: String::new(),
            v1: String::new(),
            v2: String::new(),
            v3: String::new(),
        };
        assert_eq!(row.into_rule(), None);
    }
}
