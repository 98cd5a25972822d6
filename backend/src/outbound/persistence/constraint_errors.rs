//! Translation of store failures into domain errors.
//!
//! This is the only place raw PostgreSQL signals are interpreted. Unique and
//! foreign-key violations are resolved through a catalogue keyed by
//! constraint name that mirrors the migrations; the attributes it lists are
//! the ones a client supplied, so the tenant column is left out. A constraint
//! missing from the catalogue falls back to the `Key (...)` list in the
//! server's detail text and logs a warning. Check violations map onto the
//! workflow guard they enforce; an unknown check constraint is a defect and
//! surfaces as an internal error.

use std::collections::HashMap;
use std::sync::OnceLock;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use super::pool::PoolError;
use crate::domain::Error;

/// Kind of constraint a write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViolationKind {
    Unique,
    ForeignKey,
    Check,
}

/// Entity and user-facing attributes guarded by a named constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConstraintTarget {
    entity: &'static str,
    attributes: &'static [&'static str],
}

const fn target(entity: &'static str, attributes: &'static [&'static str]) -> ConstraintTarget {
    ConstraintTarget { entity, attributes }
}

const CATALOGUE_ENTRIES: &[(&str, ConstraintTarget)] = &[
    ("pk_tenant", target("tenant", &["id"])),
    ("uq_tenant_name", target("tenant", &["name"])),
    ("pk_division", target("division", &["id"])),
    ("uq_division_tenant_name", target("division", &["name"])),
    ("fk_division_tenant", target("division", &["tenant_id"])),
    ("pk_department", target("department", &["id"])),
    (
        "uq_department_tenant_division_name",
        target("department", &["division_id", "name"]),
    ),
    ("fk_department_division", target("department", &["division_id"])),
    ("pk_position", target("position", &["id"])),
    (
        "uq_position_tenant_department_title",
        target("position", &["department_id", "title"]),
    ),
    ("fk_position_department", target("position", &["department_id"])),
    (
        "pk_subordinate_supervisor_relationship",
        target(
            "subordinate_supervisor_relationship",
            &["subordinate_position_id", "supervisor_position_id"],
        ),
    ),
    (
        "fk_subordinate_position",
        target("subordinate_supervisor_relationship", &["subordinate_position_id"]),
    ),
    (
        "fk_supervisor_position",
        target("subordinate_supervisor_relationship", &["supervisor_position_id"]),
    ),
    ("pk_user_account", target("user_account", &["id"])),
    ("uq_user_account_tenant_email", target("user_account", &["email"])),
    ("fk_user_account_tenant", target("user_account", &["tenant_id"])),
    (
        "pk_position_assignment",
        target(
            "position_assignment",
            &["position_id", "user_account_id", "start_date"],
        ),
    ),
    (
        "fk_position_assignment_position",
        target("position_assignment", &["position_id"]),
    ),
    (
        "fk_position_assignment_user_account",
        target("position_assignment", &["user_account_id"]),
    ),
    ("pk_job_requisition", target("job_requisition", &["id"])),
    (
        "fk_job_requisition_position",
        target("job_requisition", &["department_id", "title"]),
    ),
    ("fk_job_requisition_requestor", target("job_requisition", &["requestor"])),
    ("fk_job_requisition_supervisor", target("job_requisition", &["supervisor"])),
    ("fk_job_requisition_hr_approver", target("job_requisition", &["hr_approver"])),
    ("fk_job_requisition_recruiter", target("job_requisition", &["recruiter"])),
    ("fk_job_requisition_filled_by", target("job_requisition", &["filled_by"])),
    ("pk_job_application", target("job_application", &["id"])),
    (
        "uq_job_application_tenant_requisition_email",
        target("job_application", &["job_requisition_id", "email"]),
    ),
    (
        "fk_job_application_job_requisition",
        target("job_application", &["job_requisition_id"]),
    ),
];

fn catalogue() -> &'static HashMap<&'static str, ConstraintTarget> {
    static CATALOGUE: OnceLock<HashMap<&'static str, ConstraintTarget>> = OnceLock::new();
    CATALOGUE.get_or_init(|| CATALOGUE_ENTRIES.iter().copied().collect())
}

fn guard_error(constraint: &str) -> Option<Error> {
    let error = match constraint {
        "ck_hr_approval_only_with_supervisor_approval" => Error::missing_supervisor_approval(),
        "ck_recruiter_assignment_only_with_hr_approval"
        | "ck_req_filled_only_with_hr_approval"
        | "ck_req_filled_at_only_with_hr_approval" => Error::missing_hr_approval(),
        "ck_recruiter_shortlist_before_setting_interview_date" => {
            Error::missing_recruiter_shortlist()
        }
        "ck_interview_date_set_before_hiring_manager_offer" => Error::missing_interview_date(),
        "ck_hiring_manager_offer_before_applicant_acceptance" => {
            Error::missing_hiring_manager_offer()
        }
        _ => return None,
    };
    Some(error)
}

/// Pull the column list out of `Key (a, b)=(...)` detail text.
fn attributes_from_details(details: &str) -> Option<Vec<String>> {
    let start = details.find("Key (")? + "Key (".len();
    let rest = details.get(start..)?;
    let end = rest.find(")=")?;
    let columns: Vec<String> = rest
        .get(..end)?
        .split(',')
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(str::to_owned)
        .collect();
    let user_facing: Vec<String> = columns
        .iter()
        .filter(|column| column.as_str() != "tenant_id")
        .cloned()
        .collect();
    match (columns.is_empty(), user_facing.is_empty()) {
        (true, _) => None,
        (false, true) => Some(columns),
        (false, false) => Some(user_facing),
    }
}

fn humanise(name: &str) -> String {
    name.replace('_', " ")
}

/// `a`, `a and b`, or `a, b, and c`.
pub(crate) fn join_with_conjunction(attributes: &[String]) -> String {
    match attributes {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

/// `a`, or `a-b combination`.
pub(crate) fn join_as_combination(attributes: &[String]) -> String {
    if attributes.len() > 1 {
        format!("{} combination", attributes.join("-"))
    } else {
        attributes.join("-")
    }
}

/// Translate a constraint violation reported by the store.
pub(crate) fn translate_violation(
    kind: ViolationKind,
    constraint: Option<&str>,
    details: Option<&str>,
    table: Option<&str>,
) -> Error {
    if kind == ViolationKind::Check {
        return constraint.and_then(guard_error).unwrap_or_else(|| {
            Error::internal(format!(
                "unrecognised check constraint {}",
                constraint.unwrap_or("<unnamed>")
            ))
        });
    }

    let resolved = constraint
        .and_then(|name| catalogue().get(name))
        .map(|target| {
            (
                humanise(target.entity),
                target.attributes.iter().map(|a| humanise(a)).collect::<Vec<_>>(),
            )
        })
        .or_else(|| {
            let attributes = details.and_then(attributes_from_details)?;
            warn!(
                constraint = constraint.unwrap_or("<unnamed>"),
                "constraint missing from catalogue; parsed attributes from details"
            );
            Some((
                humanise(table.unwrap_or("record")),
                attributes.iter().map(|a| humanise(a)).collect(),
            ))
        });

    let Some((entity, attributes)) = resolved else {
        return Error::internal(format!(
            "{kind:?} violation on {} without identifiable attributes",
            constraint.unwrap_or("<unnamed>")
        ));
    };

    match kind {
        ViolationKind::Unique => Error::unique_violation(format!(
            "A {entity} with the provided {} already exists",
            join_with_conjunction(&attributes)
        )),
        ViolationKind::ForeignKey | ViolationKind::Check => Error::invalid_foreign_key(format!(
            "The provided {} is invalid",
            join_as_combination(&attributes)
        )),
    }
}

/// Map any Diesel error onto the domain error taxonomy.
pub(crate) fn map_diesel_error(error: DieselError) -> Error {
    match error {
        DieselError::NotFound => Error::not_found("record not found"),
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "store rejected statement");
            let violation = match kind {
                DatabaseErrorKind::UniqueViolation => ViolationKind::Unique,
                DatabaseErrorKind::ForeignKeyViolation => ViolationKind::ForeignKey,
                DatabaseErrorKind::CheckViolation => ViolationKind::Check,
                // Older drivers report SQLSTATE 23514 as `Unknown`.
                _ if info.constraint_name().and_then(guard_error).is_some() => {
                    ViolationKind::Check
                }
                _ => {
                    return Error::internal(format!("database error ({kind:?}): {}", info.message()));
                }
            };
            translate_violation(
                violation,
                info.constraint_name(),
                info.details(),
                info.table_name(),
            )
        }
        other => Error::internal(format!("database error: {other}")),
    }
}

impl From<DieselError> for Error {
    fn from(error: DieselError) -> Self {
        map_diesel_error(error)
    }
}

impl From<PoolError> for Error {
    fn from(error: PoolError) -> Self {
        Self::internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[rstest]
    #[case(&["email"], "email")]
    #[case(&["division id", "name"], "division id and name")]
    #[case(&["position id", "user account id", "start date"], "position id, user account id, and start date")]
    fn unique_attribute_grammar(#[case] attributes: &[&str], #[case] expected: &str) {
        assert_eq!(join_with_conjunction(&strings(attributes)), expected);
    }

    #[rstest]
    #[case(&["recruiter"], "recruiter")]
    #[case(&["department id", "title"], "department id-title combination")]
    fn foreign_key_attribute_grammar(#[case] attributes: &[&str], #[case] expected: &str) {
        assert_eq!(join_as_combination(&strings(attributes)), expected);
    }

    #[rstest]
    fn catalogued_unique_violation_omits_tenant() {
        let err = translate_violation(
            ViolationKind::Unique,
            Some("uq_user_account_tenant_email"),
            Some("Key (tenant_id, email)=(…, a@b.c) already exists."),
            Some("user_account"),
        );
        assert_eq!(err.code(), ErrorCode::UniqueViolation);
        assert_eq!(
            err.message(),
            "A user account with the provided email already exists"
        );
    }

    #[rstest]
    fn catalogued_foreign_key_uses_combination() {
        let err = translate_violation(
            ViolationKind::ForeignKey,
            Some("fk_job_requisition_position"),
            None,
            None,
        );
        assert_eq!(err.code(), ErrorCode::InvalidForeignKey);
        assert_eq!(
            err.message(),
            "The provided department id-title combination is invalid"
        );
    }

    #[rstest]
    fn uncatalogued_constraint_falls_back_to_details() {
        let err = translate_violation(
            ViolationKind::Unique,
            Some("uq_added_later"),
            Some("Key (tenant_id, badge_number, site)=(x, 7, HQ) already exists."),
            Some("access_badge"),
        );
        assert_eq!(
            err.message(),
            "A access badge with the provided badge number and site already exists"
        );
    }

    #[rstest]
    fn violation_without_attributes_is_internal() {
        let err = translate_violation(ViolationKind::ForeignKey, Some("fk_unknown"), None, None);
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case("ck_hr_approval_only_with_supervisor_approval", ErrorCode::MissingSupervisorApproval)]
    #[case("ck_recruiter_assignment_only_with_hr_approval", ErrorCode::MissingHrApproval)]
    #[case("ck_req_filled_only_with_hr_approval", ErrorCode::MissingHrApproval)]
    #[case("ck_req_filled_at_only_with_hr_approval", ErrorCode::MissingHrApproval)]
    #[case("ck_recruiter_shortlist_before_setting_interview_date", ErrorCode::MissingRecruiterShortlist)]
    #[case("ck_interview_date_set_before_hiring_manager_offer", ErrorCode::MissingInterviewDate)]
    #[case("ck_hiring_manager_offer_before_applicant_acceptance", ErrorCode::MissingHiringManagerOffer)]
    fn check_constraints_map_to_guards(#[case] constraint: &str, #[case] expected: ErrorCode) {
        let err = translate_violation(ViolationKind::Check, Some(constraint), None, None);
        assert_eq!(err.code(), expected);
        assert!(expected.is_workflow_guard());
    }

    #[rstest]
    fn unknown_check_constraint_is_internal() {
        let err = translate_violation(
            ViolationKind::Check,
            Some("ck_job_requisition_supervisor_decision"),
            None,
            None,
        );
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(err.trace_id().is_some());
    }

    #[rstest]
    fn not_found_and_pool_errors_are_distinguished() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound).code(),
            ErrorCode::NotFound
        );
        let pool: Error = PoolError::checkout("timed out").into();
        assert_eq!(pool.code(), ErrorCode::InternalError);
    }
}
