//! Job application HTTP handlers.
//!
//! ```text
//! POST /api/v1/tenants/{tid}/requisitions/{rid}/applications                        (public)
//! PUT  /api/v1/tenants/{tid}/requisitions/{rid}/applications/{aid}/applicant-decision (public)
//! GET  /api/v1/applications
//! PUT  /api/v1/requisitions/{rid}/applications/{aid}/recruiter-decision
//! PUT  /api/v1/requisitions/{rid}/applications/{aid}/interview
//! PUT  /api/v1/requisitions/{rid}/applications/{aid}/hiring-manager-decision
//! ```
//!
//! The public endpoints take the tenant from the path and need no session;
//! the applicant proves who they are with the email on the application.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    ApplicantDecisionOutcome, ApplicantDecisionRequest, ApplicationRef, CreateApplicationRequest,
    HiringManagerDecisionRequest, RecruiterDecisionRequest, ScheduleInterviewRequest,
};
use crate::domain::{
    ApplicantDecision, Error, HiringManagerDecision, JobApplication, JobApplicationFilter,
    Onboarding, RecruiterDecision,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_decision, parse_id, parse_optional_date,
    parse_optional_decision, parse_optional_id, required,
};

const TENANT_ID: FieldName = FieldName::new("tenantId");
const REQUISITION_ID: FieldName = FieldName::new("requisitionId");
const APPLICATION_ID: FieldName = FieldName::new("applicationId");
const DECISION: FieldName = FieldName::new("decision");
const EMAIL: FieldName = FieldName::new("email");

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// ISO 3166-1 alpha-2.
    #[schema(example = "GB")]
    pub country_code: Option<String>,
    /// E.164.
    #[schema(example = "+447700900123")]
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterDecisionBody {
    #[schema(example = "SHORTLISTED")]
    pub decision: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterviewBody {
    #[schema(example = "2024-07-01")]
    pub interview_date: Option<String>,
}

/// Offer dates are required when the decision is `OFFERED`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HiringManagerDecisionBody {
    #[schema(example = "OFFERED")]
    pub decision: Option<String>,
    pub offer_start_date: Option<String>,
    pub offer_end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDecisionBody {
    pub email: Option<String>,
    #[schema(example = "ACCEPTED")]
    pub decision: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ApplicationListQuery {
    pub job_requisition_id: Option<String>,
    pub email: Option<String>,
    pub recruiter_decision: Option<String>,
    pub hiring_manager_decision: Option<String>,
    pub applicant_decision: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationResponse {
    pub id: String,
    pub tenant_id: String,
    pub job_requisition_id: String,
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_number: String,
    pub email: String,
    pub resume_url: String,
    pub recruiter_decision: Option<RecruiterDecision>,
    pub interview_date: Option<String>,
    pub hiring_manager_decision: Option<HiringManagerDecision>,
    pub offer_start_date: Option<String>,
    pub offer_end_date: Option<String>,
    pub applicant_decision: Option<ApplicantDecision>,
}

impl From<JobApplication> for JobApplicationResponse {
    fn from(value: JobApplication) -> Self {
        Self {
            id: value.id.to_string(),
            tenant_id: value.tenant_id.to_string(),
            job_requisition_id: value.job_requisition_id.to_string(),
            first_name: value.first_name,
            last_name: value.last_name,
            country_code: value.country_code,
            phone_number: value.phone_number,
            email: value.email,
            resume_url: value.resume_url,
            recruiter_decision: value.recruiter_decision,
            interview_date: value.interview_date.map(|d| d.to_string()),
            hiring_manager_decision: value.hiring_manager_decision,
            offer_start_date: value.offer_start_date.map(|d| d.to_string()),
            offer_end_date: value.offer_end_date.map(|d| d.to_string()),
            applicant_decision: value.applicant_decision,
        }
    }
}

/// What an accepted offer produced.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSummary {
    pub user_id: String,
    pub position_id: String,
    pub requisition_id: String,
    /// RFC 3339 timestamp.
    pub filled_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDecisionResponse {
    pub application: JobApplicationResponse,
    /// Present when the applicant accepted.
    pub onboarding: Option<OnboardingSummary>,
}

impl From<ApplicantDecisionOutcome> for ApplicantDecisionResponse {
    fn from(outcome: ApplicantDecisionOutcome) -> Self {
        match outcome {
            ApplicantDecisionOutcome::Declined(application) => Self {
                application: application.into(),
                onboarding: None,
            },
            ApplicantDecisionOutcome::Onboarded(onboarding) => {
                let Onboarding {
                    user_id,
                    position_id,
                    requisition,
                    application,
                } = *onboarding;
                Self {
                    application: application.into(),
                    onboarding: Some(OnboardingSummary {
                        user_id: user_id.to_string(),
                        position_id: position_id.to_string(),
                        requisition_id: requisition.id.to_string(),
                        filled_at: requisition.filled_at.map(|at| at.to_rfc3339()),
                    }),
                }
            }
        }
    }
}

fn parse_filter(query: &ApplicationListQuery) -> Result<JobApplicationFilter, Error> {
    Ok(JobApplicationFilter {
        job_requisition_id: parse_optional_id(
            query.job_requisition_id.as_deref(),
            FieldName::new("jobRequisitionId"),
        )?,
        email: query.email.clone(),
        recruiter_decision: parse_optional_decision(
            query.recruiter_decision.as_deref(),
            FieldName::new("recruiterDecision"),
        )?,
        hiring_manager_decision: parse_optional_decision(
            query.hiring_manager_decision.as_deref(),
            FieldName::new("hiringManagerDecision"),
        )?,
        applicant_decision: parse_optional_decision(
            query.applicant_decision.as_deref(),
            FieldName::new("applicantDecision"),
        )?,
        ..JobApplicationFilter::default()
    })
}

fn application_ref(requisition_id: &str, application_id: &str) -> Result<ApplicationRef, Error> {
    Ok(ApplicationRef {
        requisition_id: parse_id(requisition_id, REQUISITION_ID)?,
        application_id: parse_id(application_id, APPLICATION_ID)?,
    })
}

fn json_ok(application: JobApplication) -> HttpResponse {
    HttpResponse::Ok().json(JobApplicationResponse::from(application))
}

/// Apply for a requisition. Public.
#[utoipa::path(
    post,
    path = "/api/v1/tenants/{tid}/requisitions/{rid}/applications",
    params(
        ("tid" = String, Path, description = "Tenant id"),
        ("rid" = String, Path, description = "Requisition id"),
    ),
    request_body = CreateApplicationBody,
    responses(
        (status = 201, description = "Application received", body = JobApplicationResponse),
        (status = 400, description = "Invalid application or unknown requisition", body = Error),
        (status = 409, description = "Email already applied to this requisition", body = Error),
    ),
    tags = ["applications"],
    security([]),
    operation_id = "createJobApplication"
)]
#[post("/tenants/{tid}/requisitions/{rid}/applications")]
pub async fn create_application(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<CreateApplicationBody>,
) -> ApiResult<HttpResponse> {
    let (tenant, requisition) = path.into_inner();
    let body = payload.into_inner();
    let request = CreateApplicationRequest {
        tenant_id: parse_id(&tenant, TENANT_ID)?,
        job_requisition_id: parse_id(&requisition, REQUISITION_ID)?,
        first_name: required(body.first_name, FieldName::new("firstName"))?,
        last_name: required(body.last_name, FieldName::new("lastName"))?,
        country_code: required(body.country_code, FieldName::new("countryCode"))?,
        phone_number: required(body.phone_number, FieldName::new("phoneNumber"))?,
        email: required(body.email, EMAIL)?,
        resume_url: required(body.resume_url, FieldName::new("resumeUrl"))?,
    };
    let application = state.applications.create(request).await?;
    Ok(HttpResponse::Created().json(JobApplicationResponse::from(application)))
}

/// Accept or decline an offer. Public; accepting runs onboarding.
#[utoipa::path(
    put,
    path = "/api/v1/tenants/{tid}/requisitions/{rid}/applications/{aid}/applicant-decision",
    params(
        ("tid" = String, Path, description = "Tenant id"),
        ("rid" = String, Path, description = "Requisition id"),
        ("aid" = String, Path, description = "Application id"),
    ),
    request_body = ApplicantDecisionBody,
    responses(
        (status = 200, description = "Decision recorded", body = ApplicantDecisionResponse),
        (status = 400, description = "Invalid decision", body = Error),
        (status = 403, description = "No outstanding offer", body = Error),
        (status = 404, description = "No matching application, or the requisition is filled", body = Error),
    ),
    tags = ["applications"],
    security([]),
    operation_id = "recordApplicantDecision"
)]
#[put("/tenants/{tid}/requisitions/{rid}/applications/{aid}/applicant-decision")]
pub async fn record_applicant_decision(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
    payload: web::Json<ApplicantDecisionBody>,
) -> ApiResult<web::Json<ApplicantDecisionResponse>> {
    let (tenant, requisition, application) = path.into_inner();
    let body = payload.into_inner();
    let request = ApplicantDecisionRequest {
        tenant_id: parse_id(&tenant, TENANT_ID)?,
        application: application_ref(&requisition, &application)?,
        email: required(body.email, EMAIL)?,
        decision: parse_decision(&required(body.decision, DECISION)?, DECISION)?,
    };
    let outcome = state.applications.record_applicant_decision(request).await?;
    Ok(web::Json(outcome.into()))
}

/// List applications in the caller's tenant.
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    params(ApplicationListQuery),
    responses(
        (status = 200, description = "Matching applications", body = [JobApplicationResponse]),
        (status = 400, description = "Malformed filter", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
    ),
    tags = ["applications"],
    operation_id = "listJobApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ApplicationListQuery>,
) -> ApiResult<web::Json<Vec<JobApplicationResponse>>> {
    let actor = session.require_actor()?;
    let filter = parse_filter(&query)?;
    let applications = state.applications_query.list(actor, filter).await?;
    Ok(web::Json(
        applications
            .into_iter()
            .map(JobApplicationResponse::from)
            .collect(),
    ))
}

/// Shortlist or reject an applicant.
#[utoipa::path(
    put,
    path = "/api/v1/requisitions/{rid}/applications/{aid}/recruiter-decision",
    params(
        ("rid" = String, Path, description = "Requisition id"),
        ("aid" = String, Path, description = "Application id"),
    ),
    request_body = RecruiterDecisionBody,
    responses(
        (status = 200, description = "Decision recorded", body = JobApplicationResponse),
        (status = 400, description = "Invalid decision", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not the recruiter, or approvals missing", body = Error),
        (status = 404, description = "No matching application", body = Error),
    ),
    tags = ["applications"],
    operation_id = "recordRecruiterDecision"
)]
#[put("/requisitions/{rid}/applications/{aid}/recruiter-decision")]
pub async fn record_recruiter_decision(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<RecruiterDecisionBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let (requisition, application) = path.into_inner();
    let request = RecruiterDecisionRequest {
        actor,
        application: application_ref(&requisition, &application)?,
        decision: parse_decision(&required(payload.into_inner().decision, DECISION)?, DECISION)?,
    };
    Ok(json_ok(
        state.applications.record_recruiter_decision(request).await?,
    ))
}

/// Set the interview date for a shortlisted applicant.
#[utoipa::path(
    put,
    path = "/api/v1/requisitions/{rid}/applications/{aid}/interview",
    params(
        ("rid" = String, Path, description = "Requisition id"),
        ("aid" = String, Path, description = "Application id"),
    ),
    request_body = ScheduleInterviewBody,
    responses(
        (status = 200, description = "Interview scheduled", body = JobApplicationResponse),
        (status = 400, description = "Invalid date", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not the recruiter, or not shortlisted", body = Error),
        (status = 404, description = "No matching application", body = Error),
    ),
    tags = ["applications"],
    operation_id = "scheduleInterview"
)]
#[put("/requisitions/{rid}/applications/{aid}/interview")]
pub async fn schedule_interview(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<ScheduleInterviewBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let (requisition, application) = path.into_inner();
    let field = FieldName::new("interviewDate");
    let request = ScheduleInterviewRequest {
        actor,
        application: application_ref(&requisition, &application)?,
        interview_date: parse_date(&required(payload.into_inner().interview_date, field)?, field)?,
    };
    Ok(json_ok(state.applications.schedule_interview(request).await?))
}

/// Offer the position or reject the applicant after interview.
#[utoipa::path(
    put,
    path = "/api/v1/requisitions/{rid}/applications/{aid}/hiring-manager-decision",
    params(
        ("rid" = String, Path, description = "Requisition id"),
        ("aid" = String, Path, description = "Application id"),
    ),
    request_body = HiringManagerDecisionBody,
    responses(
        (status = 200, description = "Decision recorded", body = JobApplicationResponse),
        (status = 400, description = "Invalid decision or offer dates", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not the hiring manager, or no interview date", body = Error),
        (status = 404, description = "No matching application", body = Error),
    ),
    tags = ["applications"],
    operation_id = "recordHiringManagerDecision"
)]
#[put("/requisitions/{rid}/applications/{aid}/hiring-manager-decision")]
pub async fn record_hiring_manager_decision(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<HiringManagerDecisionBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let (requisition, application) = path.into_inner();
    let body = payload.into_inner();
    let request = HiringManagerDecisionRequest {
        actor,
        application: application_ref(&requisition, &application)?,
        decision: parse_decision(&required(body.decision, DECISION)?, DECISION)?,
        offer_start_date: parse_optional_date(
            body.offer_start_date.as_deref(),
            FieldName::new("offerStartDate"),
        )?,
        offer_end_date: parse_optional_date(
            body.offer_end_date.as_deref(),
            FieldName::new("offerEndDate"),
        )?,
    };
    Ok(json_ok(
        state
            .applications
            .record_hiring_manager_decision(request)
            .await?,
    ))
}

#[cfg(test)]
mod tests;
