//! Types for turning an accepted offer into a staffed position.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use zeroize::Zeroizing;

use super::{
    JobApplication, JobApplicationId, JobRequisition, JobRequisitionId, PositionId, TenantId,
    UserId,
};

/// Shortest permitted fixed-term assignment, in days.
pub const MINIMUM_ASSIGNMENT_DAYS: i64 = 30;

/// Check that a position assignment spans at least [`MINIMUM_ASSIGNMENT_DAYS`].
///
/// Open-ended assignments are always valid. An end date exactly 30 days after
/// the start is valid; 29 days, or an end before the start, is not.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hr_backend::domain::valid_position_assignment_duration;
///
/// let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
/// assert!(valid_position_assignment_duration(start, None));
/// assert!(valid_position_assignment_duration(start, NaiveDate::from_ymd_opt(2024, 7, 31)));
/// assert!(!valid_position_assignment_duration(start, NaiveDate::from_ymd_opt(2024, 7, 30)));
/// ```
#[must_use]
pub fn valid_position_assignment_duration(start: NaiveDate, end: Option<NaiveDate>) -> bool {
    end.is_none_or(|end| (end - start).num_days() >= MINIMUM_ASSIGNMENT_DAYS)
}

/// Credentials generated for an account that has not been activated yet.
#[derive(Clone)]
pub struct IssuedCredentials {
    password: Zeroizing<String>,
    totp_secret_key: Zeroizing<String>,
}

impl IssuedCredentials {
    /// Wrap generated credential material.
    pub fn new(password: impl Into<String>, totp_secret_key: impl Into<String>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
            totp_secret_key: Zeroizing::new(totp_secret_key.into()),
        }
    }

    /// Stored password value.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Shared TOTP secret.
    #[must_use]
    pub fn totp_secret_key(&self) -> &str {
        self.totp_secret_key.as_str()
    }
}

impl fmt::Debug for IssuedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedCredentials")
            .field("password", &"<redacted>")
            .field("totp_secret_key", &"<redacted>")
            .finish()
    }
}

/// Account created for a hired applicant.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub email: String,
    pub credentials: IssuedCredentials,
}

/// Everything the onboarding transaction needs, gathered before it starts.
#[derive(Debug, Clone)]
pub struct OfferAcceptance {
    pub tenant_id: TenantId,
    pub job_requisition_id: JobRequisitionId,
    pub job_application_id: JobApplicationId,
    /// Applicant email; acts as the ownership filter for the application.
    pub applicant_email: String,
    pub new_user: NewUserAccount,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub filled_at: DateTime<Utc>,
}

/// State after a successful onboarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Onboarding {
    pub user_id: UserId,
    pub position_id: PositionId,
    pub requisition: JobRequisition,
    pub application: JobApplication,
}
