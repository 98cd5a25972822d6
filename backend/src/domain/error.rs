//! Domain-level error type.
//!
//! Errors are transport agnostic: the HTTP adapter decides which status code
//! each [`ErrorCode`] maps to and redacts internal failures before they leave
//! the process. Persistence adapters are the only place raw store failures are
//! turned into these values; services add ownership and not-found errors on
//! top but never reinterpret one they receive.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use super::TraceId;

/// Stable machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ErrorCode {
    /// Input failed shape or content validation.
    #[serde(rename = "VALIDATION-ERROR")]
    Validation,
    /// A referenced record does not exist in the caller's tenant.
    #[serde(rename = "INVALID-FOREIGN-KEY-ERROR")]
    InvalidForeignKey,
    /// No authenticated actor on the request.
    #[serde(rename = "UNAUTHENTICATED-ERROR")]
    Unauthenticated,
    /// The actor lacks the permission or ownership for the action.
    #[serde(rename = "UNAUTHORIZED-ERROR")]
    Unauthorized,
    /// HR acted before the supervisor approved.
    #[serde(rename = "MISSING-SUPERVISOR-APPROVAL-ERROR")]
    MissingSupervisorApproval,
    /// Recruiter assignment, screening, or filling attempted before HR approval.
    #[serde(rename = "MISSING-HR-APPROVAL-ERROR")]
    MissingHrApproval,
    /// Interview scheduled for an applicant who was not shortlisted.
    #[serde(rename = "MISSING-RECRUITER-SHORTLIST-ERROR")]
    MissingRecruiterShortlist,
    /// Hiring manager decided before an interview date was set.
    #[serde(rename = "MISSING-INTERVIEW-DATE-ERROR")]
    MissingInterviewDate,
    /// Applicant accepted without an outstanding offer.
    #[serde(rename = "MISSING-HIRING-MANAGER-OFFER-ERROR")]
    MissingHiringManagerOffer,
    /// Nothing matched the request under the caller's filters.
    #[serde(rename = "NOT-FOUND-ERROR")]
    NotFound,
    /// A record with the same natural key already exists.
    #[serde(rename = "UNIQUE-VIOLATION-ERROR")]
    UniqueViolation,
    /// Unexpected failure; details are only logged.
    #[serde(rename = "INTERNAL-SERVER-ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Whether the code reports a violated hiring workflow precondition.
    #[must_use]
    pub fn is_workflow_guard(self) -> bool {
        matches!(
            self,
            Self::MissingSupervisorApproval
                | Self::MissingHrApproval
                | Self::MissingRecruiterShortlist
                | Self::MissingInterviewDate
                | Self::MissingHiringManagerOffer
        )
    }
}

/// Domain error payload.
///
/// # Examples
/// ```
/// use hr_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("job requisition not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert!(err.trace_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Error {
    #[schema(example = "NOT-FOUND-ERROR")]
    code: ErrorCode,
    #[schema(example = "job requisition not found")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create an error, capturing the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier, when one was captured.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured supplementary details.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthenticated`].
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::UniqueViolation`].
    pub fn unique_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UniqueViolation, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidForeignKey`].
    pub fn invalid_foreign_key(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidForeignKey, message)
    }

    /// The supervisor has not approved the requisition.
    #[must_use]
    pub fn missing_supervisor_approval() -> Self {
        Self::new(
            ErrorCode::MissingSupervisorApproval,
            "The job requisition has not been approved by the supervisor",
        )
    }

    /// HR has not approved the requisition.
    #[must_use]
    pub fn missing_hr_approval() -> Self {
        Self::new(
            ErrorCode::MissingHrApproval,
            "The job requisition has not been approved by HR",
        )
    }

    /// The applicant was not shortlisted by the recruiter.
    #[must_use]
    pub fn missing_recruiter_shortlist() -> Self {
        Self::new(
            ErrorCode::MissingRecruiterShortlist,
            "The job application has not been shortlisted by the recruiter",
        )
    }

    /// No interview date has been set for the application.
    #[must_use]
    pub fn missing_interview_date() -> Self {
        Self::new(
            ErrorCode::MissingInterviewDate,
            "The job application has no interview date",
        )
    }

    /// The hiring manager has not made an offer.
    #[must_use]
    pub fn missing_hiring_manager_offer() -> Self {
        Self::new(
            ErrorCode::MissingHiringManagerOffer,
            "The job application has no offer from the hiring manager",
        )
    }

    /// Internal failure.
    ///
    /// Always carries a trace identifier (the one in scope, or a fresh one)
    /// and logs `detail` against it so operators can correlate the client's
    /// redacted response with the server-side cause.
    pub fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let trace_id = TraceId::current_or_generate();
        error!(trace_id = %trace_id, detail = %detail, "internal error");
        Self {
            code: ErrorCode::InternalError,
            message: detail,
            trace_id: Some(trace_id.to_string()),
            details: None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
