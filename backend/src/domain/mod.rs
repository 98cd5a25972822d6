//! Domain types, services, and ports for the hiring workflow.
//!
//! Everything here is storage- and transport-agnostic. Inbound adapters
//! call the driving ports in [`ports`]; outbound adapters implement the
//! driven ones. All fallible operations return [`Error`], whose
//! [`ErrorCode`] is the stable identifier clients see.

mod application;
mod authorization;
mod decision;
pub mod error;
mod hiring_workflow;
mod ids;
mod onboarding;
mod organisation;
mod organisation_service;
mod policy_service;
pub mod ports;
mod requisition;
mod trace_id;
pub mod validation;

pub use self::application::{
    JobApplication, JobApplicationFilter, JobApplicationUpdate, NewJobApplication,
};
pub use self::authorization::{
    Actor, GLOBAL_TENANT, Permission, PolicyCache, PolicyRule, PolicySet, RECRUITER_ROLE,
};
pub use self::decision::{
    ApplicantDecision, ApprovalDecision, HiringManagerDecision, RecruiterDecision,
    UnknownDecision,
};
pub use self::error::{Error, ErrorCode};
pub use self::hiring_workflow::HiringWorkflowService;
pub use self::ids::{
    DepartmentId, DivisionId, JobApplicationId, JobRequisitionId, PositionId, TenantId, UserId,
};
pub use self::onboarding::{
    IssuedCredentials, MINIMUM_ASSIGNMENT_DAYS, NewUserAccount, OfferAcceptance, Onboarding,
    valid_position_assignment_duration,
};
pub use self::organisation::{Department, Division, NewPosition, Position};
pub use self::organisation_service::OrganisationService;
pub use self::policy_service::PolicyAdministrationService;
pub use self::requisition::{
    JobRequisition, JobRequisitionFilter, JobRequisitionUpdate, NewJobRequisition,
    RequisitionRole,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{
    validate_approval_decision, validate_distinct, validate_name, validate_new_application,
    validate_new_requisition, validate_offer,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use hr_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::missing_hr_approval())
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
