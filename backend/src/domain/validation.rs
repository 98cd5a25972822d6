//! Explicit input validation for workflow commands.
//!
//! Each validator collects every failing `(field, rule)` pair before
//! returning, so a client sees all problems in one response. Messages come
//! from a single lookup on [`Rule`], keeping wording consistent across
//! endpoints.

use chrono::NaiveDate;
use serde_json::{Value, json};
use url::Url;

use super::{
    ApprovalDecision, Error, HiringManagerDecision, MINIMUM_ASSIGNMENT_DAYS, NewJobApplication,
    NewJobRequisition, valid_position_assignment_duration,
};

/// Upper bound for short free-text fields such as names and titles.
pub const MAX_NAME_LENGTH: usize = 255;
/// Upper bound for long free-text fields such as job descriptions.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// A validation rule a field can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MaxLength(usize),
    Email,
    HttpUrl,
    CountryCode,
    PhoneNumber,
    DecisionRequired,
    OfferStartDateRequired,
    OfferDatesNotAllowed,
    MinimumAssignmentDuration,
    DistinctValues,
}

impl Rule {
    fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MaxLength(_) => "max_length",
            Self::Email => "invalid_email",
            Self::HttpUrl => "invalid_url",
            Self::CountryCode => "invalid_country_code",
            Self::PhoneNumber => "invalid_phone_number",
            Self::DecisionRequired => "decision_required",
            Self::OfferStartDateRequired => "offer_start_date_required",
            Self::OfferDatesNotAllowed => "offer_dates_not_allowed",
            Self::MinimumAssignmentDuration => "minimum_assignment_duration",
            Self::DistinctValues => "duplicate_value",
        }
    }

    fn message(self, field: &str) -> String {
        match self {
            Self::Required => format!("{field} is required"),
            Self::MaxLength(max) => format!("{field} must be at most {max} characters"),
            Self::Email => format!("{field} must be a valid email address"),
            Self::HttpUrl => format!("{field} must be an http or https URL"),
            Self::CountryCode => {
                format!("{field} must be a two-letter upper-case ISO 3166 country code")
            }
            Self::PhoneNumber => format!("{field} must be a valid phone number"),
            Self::DecisionRequired => format!("{field} must be APPROVED or REJECTED"),
            Self::OfferStartDateRequired => format!("{field} is required when making an offer"),
            Self::OfferDatesNotAllowed => {
                format!("{field} must not be set when rejecting an applicant")
            }
            Self::MinimumAssignmentDuration => format!(
                "{field} must be at least {MINIMUM_ASSIGNMENT_DAYS} days after the start date"
            ),
            Self::DistinctValues => format!("{field} must not contain duplicates"),
        }
    }
}

/// A single failed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
}

impl FieldViolation {
    fn to_json(self) -> Value {
        json!({
            "field": self.field,
            "code": self.rule.code(),
            "message": self.rule.message(self.field),
        })
    }
}

/// Accumulator for field violations.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `rule` against `field` unless `holds` is true.
    pub fn check(&mut self, holds: bool, field: &'static str, rule: Rule) -> &mut Self {
        if !holds {
            self.0.push(FieldViolation { field, rule });
        }
        self
    }

    /// Require non-blank text no longer than `max` characters.
    pub fn text(&mut self, field: &'static str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            return self.check(false, field, Rule::Required);
        }
        self.check(value.chars().count() <= max, field, Rule::MaxLength(max))
    }

    /// Recorded violations, in the order they were found.
    #[must_use]
    pub fn as_slice(&self) -> &[FieldViolation] {
        &self.0
    }

    /// `Ok` when nothing failed, otherwise a validation error listing every
    /// violation under `details.violations`.
    pub fn finish(&self) -> Result<(), Error> {
        let Some(first) = self.0.first() else {
            return Ok(());
        };
        let violations: Vec<Value> = self.0.iter().map(|v| v.to_json()).collect();
        Err(Error::invalid_request(first.rule.message(first.field))
            .with_details(json!({ "violations": violations })))
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

fn is_country_code(value: &str) -> bool {
    value.len() == 2 && value.chars().all(|c| c.is_ascii_uppercase())
}

fn is_phone_number(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    let digit_count = digits.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digit_count)
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
}

/// Validate a requisition before it is stored.
pub fn validate_new_requisition(input: &NewJobRequisition) -> Result<(), Error> {
    Violations::new()
        .text("title", &input.title, MAX_NAME_LENGTH)
        .text("jobDescription", &input.job_description, MAX_TEXT_LENGTH)
        .text("jobRequirements", &input.job_requirements, MAX_TEXT_LENGTH)
        .finish()
}

/// Validate an application recorded on résumé upload completion.
pub fn validate_new_application(input: &NewJobApplication) -> Result<(), Error> {
    let mut violations = Violations::new();
    violations
        .text("firstName", &input.first_name, MAX_NAME_LENGTH)
        .text("lastName", &input.last_name, MAX_NAME_LENGTH)
        .check(
            is_country_code(&input.country_code),
            "countryCode",
            Rule::CountryCode,
        )
        .check(
            is_phone_number(&input.phone_number),
            "phoneNumber",
            Rule::PhoneNumber,
        )
        .check(is_email(&input.email), "email", Rule::Email)
        .check(is_http_url(&input.resume_url), "resumeUrl", Rule::HttpUrl);
    violations.finish()
}

/// Supervisor and HR decisions must move the requisition out of pending.
pub fn validate_approval_decision(decision: ApprovalDecision) -> Result<(), Error> {
    Violations::new()
        .check(decision.is_decided(), "decision", Rule::DecisionRequired)
        .finish()
}

/// Offers need a start date and, when fixed-term, a long enough span.
/// Rejections carry no dates.
pub fn validate_offer(
    decision: HiringManagerDecision,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), Error> {
    let mut violations = Violations::new();
    match decision {
        HiringManagerDecision::Offered => match start {
            Some(start) => {
                violations.check(
                    valid_position_assignment_duration(start, end),
                    "offerEndDate",
                    Rule::MinimumAssignmentDuration,
                );
            }
            None => {
                violations.check(false, "offerStartDate", Rule::OfferStartDateRequired);
            }
        },
        HiringManagerDecision::Rejected => {
            violations
                .check(start.is_none(), "offerStartDate", Rule::OfferDatesNotAllowed)
                .check(end.is_none(), "offerEndDate", Rule::OfferDatesNotAllowed);
        }
    }
    violations.finish()
}

/// Validate a single short name such as a division, department, role, or
/// position title.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), Error> {
    Violations::new().text(field, value, MAX_NAME_LENGTH).finish()
}

/// Validate a list that must not repeat itself.
pub fn validate_distinct<T: PartialEq>(field: &'static str, values: &[T]) -> Result<(), Error> {
    let distinct = values
        .iter()
        .enumerate()
        .all(|(index, value)| !values.iter().skip(index + 1).any(|other| other == value));
    Violations::new()
        .check(distinct, field, Rule::DistinctValues)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DepartmentId, ErrorCode, JobApplicationId, JobRequisitionId, TenantId, UserId,
    };
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn violation_codes(error: &Error) -> Vec<String> {
        error.details().expect("details")["violations"]
            .as_array()
            .expect("violations array")
            .iter()
            .map(|v| v["code"].as_str().expect("code").to_owned())
            .collect()
    }

    #[fixture]
    fn application() -> NewJobApplication {
        NewJobApplication {
            id: JobApplicationId::random(),
            tenant_id: TenantId::random(),
            job_requisition_id: JobRequisitionId::random(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            country_code: "GB".to_owned(),
            phone_number: "+44 20 7946 0958".to_owned(),
            email: "ada@example.com".to_owned(),
            resume_url: "https://storage.example.com/resumes/ada.pdf".to_owned(),
        }
    }

    #[rstest]
    fn well_formed_application_passes(application: NewJobApplication) {
        assert!(validate_new_application(&application).is_ok());
    }

    #[rstest]
    fn every_failing_field_is_reported(mut application: NewJobApplication) {
        application.first_name = "   ".to_owned();
        application.email = "ada.example.com".to_owned();
        application.resume_url = "ftp://storage.example.com/ada.pdf".to_owned();
        application.country_code = "gb".to_owned();

        let error = validate_new_application(&application).expect_err("invalid");
        assert_eq!(error.code(), ErrorCode::Validation);
        assert_eq!(error.message(), "firstName is required");
        assert_eq!(
            violation_codes(&error),
            vec![
                "required",
                "invalid_country_code",
                "invalid_email",
                "invalid_url"
            ]
        );
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("ada@example", false)]
    #[case("@example.com", false)]
    #[case("ada@@example.com", false)]
    #[case("ada @example.com", false)]
    fn email_shape(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(is_email(value), valid);
    }

    #[rstest]
    #[case("+1 555-010-9999", true)]
    #[case("5550109", true)]
    #[case("555", false)]
    #[case("call me", false)]
    fn phone_shape(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(is_phone_number(value), valid);
    }

    #[rstest]
    fn requisition_text_limits_apply() {
        let input = NewJobRequisition {
            id: JobRequisitionId::random(),
            tenant_id: TenantId::random(),
            title: "x".repeat(MAX_NAME_LENGTH + 1),
            department_id: DepartmentId::random(),
            job_description: "Build things".to_owned(),
            job_requirements: String::new(),
            requestor: UserId::random(),
            supervisor: UserId::random(),
            hr_approver: UserId::random(),
        };
        let error = validate_new_requisition(&input).expect_err("invalid");
        assert_eq!(violation_codes(&error), vec!["max_length", "required"]);
    }

    #[rstest]
    fn pending_is_not_a_decision() {
        assert!(validate_approval_decision(ApprovalDecision::Pending).is_err());
        assert!(validate_approval_decision(ApprovalDecision::Approved).is_ok());
        assert!(validate_approval_decision(ApprovalDecision::Rejected).is_ok());
    }

    #[rstest]
    fn offer_requires_start_date() {
        let error = validate_offer(HiringManagerDecision::Offered, None, None).expect_err("no start");
        assert_eq!(violation_codes(&error), vec!["offer_start_date_required"]);
    }

    #[rstest]
    #[case(Some(date(2024, 7, 31)), true)]
    #[case(Some(date(2024, 7, 30)), false)]
    #[case(None, true)]
    fn offer_end_date_respects_minimum_span(
        #[case] end: Option<NaiveDate>,
        #[case] valid: bool,
    ) {
        let result = validate_offer(HiringManagerDecision::Offered, Some(date(2024, 7, 1)), end);
        assert_eq!(result.is_ok(), valid);
    }

    #[rstest]
    fn rejection_carries_no_dates() {
        let error = validate_offer(
            HiringManagerDecision::Rejected,
            Some(date(2024, 7, 1)),
            Some(date(2024, 9, 1)),
        )
        .expect_err("dates on rejection");
        assert_eq!(
            violation_codes(&error),
            vec!["offer_dates_not_allowed", "offer_dates_not_allowed"]
        );
        assert!(validate_offer(HiringManagerDecision::Rejected, None, None).is_ok());
    }

    #[rstest]
    fn duplicates_are_rejected() {
        assert!(validate_distinct("supervisorPositionIds", &[1, 2, 3]).is_ok());
        assert!(validate_distinct("supervisorPositionIds", &[1, 2, 1]).is_err());
    }
}
