//! Job requisition HTTP handlers.
//!
//! ```text
//! POST /api/v1/requisitions
//! GET  /api/v1/requisitions
//! PUT  /api/v1/requisitions/{id}/supervisor-decision
//! PUT  /api/v1/requisitions/{id}/hr-decision
//! PUT  /api/v1/requisitions/{id}/recruiter
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ApprovalRequest, AssignRecruiterRequest, CreateRequisitionRequest};
use crate::domain::{ApprovalDecision, Error, JobRequisition, JobRequisitionFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_decision, parse_id, parse_optional_decision, parse_optional_id, required,
};

const TITLE: FieldName = FieldName::new("title");
const DEPARTMENT_ID: FieldName = FieldName::new("departmentId");
const JOB_DESCRIPTION: FieldName = FieldName::new("jobDescription");
const JOB_REQUIREMENTS: FieldName = FieldName::new("jobRequirements");
const SUPERVISOR: FieldName = FieldName::new("supervisor");
const HR_APPROVER: FieldName = FieldName::new("hrApprover");
const RECRUITER: FieldName = FieldName::new("recruiter");
const DECISION: FieldName = FieldName::new("decision");
const REQUISITION_ID: FieldName = FieldName::new("requisitionId");

/// Request payload for raising a requisition.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequisitionBody {
    pub title: Option<String>,
    pub department_id: Option<String>,
    pub job_description: Option<String>,
    pub job_requirements: Option<String>,
    pub supervisor: Option<String>,
    pub hr_approver: Option<String>,
}

/// Supervisor or HR decision. HR may name a recruiter in the same call.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalBody {
    #[schema(example = "APPROVED")]
    pub decision: Option<String>,
    pub recruiter: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRecruiterBody {
    pub recruiter: Option<String>,
}

/// Optional listing filters; every one narrows the caller's own tenant.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RequisitionListQuery {
    pub title: Option<String>,
    pub department_id: Option<String>,
    pub requestor: Option<String>,
    pub supervisor: Option<String>,
    pub supervisor_decision: Option<String>,
    pub hr_approver: Option<String>,
    pub hr_approver_decision: Option<String>,
    pub recruiter: Option<String>,
    pub filled_by: Option<String>,
}

/// Requisition as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRequisitionResponse {
    pub id: String,
    pub tenant_id: String,
    pub title: String,
    pub department_id: String,
    pub job_description: String,
    pub job_requirements: String,
    pub requestor: String,
    pub supervisor: String,
    pub supervisor_decision: ApprovalDecision,
    pub hr_approver: String,
    pub hr_approver_decision: ApprovalDecision,
    pub recruiter: Option<String>,
    pub filled_by: Option<String>,
    /// RFC 3339 timestamp.
    pub filled_at: Option<String>,
}

impl From<JobRequisition> for JobRequisitionResponse {
    fn from(value: JobRequisition) -> Self {
        Self {
            id: value.id.to_string(),
            tenant_id: value.tenant_id.to_string(),
            title: value.title,
            department_id: value.department_id.to_string(),
            job_description: value.job_description,
            job_requirements: value.job_requirements,
            requestor: value.requestor.to_string(),
            supervisor: value.supervisor.to_string(),
            supervisor_decision: value.supervisor_decision,
            hr_approver: value.hr_approver.to_string(),
            hr_approver_decision: value.hr_approver_decision,
            recruiter: value.recruiter.map(|id| id.to_string()),
            filled_by: value.filled_by.map(|id| id.to_string()),
            filled_at: value.filled_at.map(|at| at.to_rfc3339()),
        }
    }
}

fn parse_filter(query: &RequisitionListQuery) -> Result<JobRequisitionFilter, Error> {
    Ok(JobRequisitionFilter {
        title: query.title.clone(),
        department_id: parse_optional_id(query.department_id.as_deref(), DEPARTMENT_ID)?,
        requestor: parse_optional_id(query.requestor.as_deref(), FieldName::new("requestor"))?,
        supervisor: parse_optional_id(query.supervisor.as_deref(), SUPERVISOR)?,
        supervisor_decision: parse_optional_decision(
            query.supervisor_decision.as_deref(),
            FieldName::new("supervisorDecision"),
        )?,
        hr_approver: parse_optional_id(query.hr_approver.as_deref(), HR_APPROVER)?,
        hr_approver_decision: parse_optional_decision(
            query.hr_approver_decision.as_deref(),
            FieldName::new("hrApproverDecision"),
        )?,
        recruiter: parse_optional_id(query.recruiter.as_deref(), RECRUITER)?,
        filled_by: parse_optional_id(query.filled_by.as_deref(), FieldName::new("filledBy"))?,
        ..JobRequisitionFilter::default()
    })
}

fn json_ok(requisition: JobRequisition) -> HttpResponse {
    HttpResponse::Ok().json(JobRequisitionResponse::from(requisition))
}

/// Raise a requisition for an existing position.
#[utoipa::path(
    post,
    path = "/api/v1/requisitions",
    request_body = CreateRequisitionBody,
    responses(
        (status = 201, description = "Requisition created", body = JobRequisitionResponse),
        (status = 400, description = "Invalid request or unknown position", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
    ),
    tags = ["requisitions"],
    operation_id = "createJobRequisition"
)]
#[post("/requisitions")]
pub async fn create_requisition(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRequisitionBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let request = CreateRequisitionRequest {
        actor,
        title: required(body.title, TITLE)?,
        department_id: parse_id(&required(body.department_id, DEPARTMENT_ID)?, DEPARTMENT_ID)?,
        job_description: required(body.job_description, JOB_DESCRIPTION)?,
        job_requirements: required(body.job_requirements, JOB_REQUIREMENTS)?,
        supervisor: parse_id(&required(body.supervisor, SUPERVISOR)?, SUPERVISOR)?,
        hr_approver: parse_id(&required(body.hr_approver, HR_APPROVER)?, HR_APPROVER)?,
    };
    let requisition = state.requisitions.create(request).await?;
    Ok(HttpResponse::Created().json(JobRequisitionResponse::from(requisition)))
}

/// List requisitions in the caller's tenant.
#[utoipa::path(
    get,
    path = "/api/v1/requisitions",
    params(RequisitionListQuery),
    responses(
        (status = 200, description = "Matching requisitions", body = [JobRequisitionResponse]),
        (status = 400, description = "Malformed filter", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
    ),
    tags = ["requisitions"],
    operation_id = "listJobRequisitions"
)]
#[get("/requisitions")]
pub async fn list_requisitions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RequisitionListQuery>,
) -> ApiResult<web::Json<Vec<JobRequisitionResponse>>> {
    let actor = session.require_actor()?;
    let filter = parse_filter(&query)?;
    let requisitions = state.requisitions_query.list(actor, filter).await?;
    Ok(web::Json(
        requisitions
            .into_iter()
            .map(JobRequisitionResponse::from)
            .collect(),
    ))
}

fn approval_request(
    session: &SessionContext,
    id: &str,
    body: ApprovalBody,
) -> Result<ApprovalRequest, Error> {
    Ok(ApprovalRequest {
        actor: session.require_actor()?,
        requisition_id: parse_id(id, REQUISITION_ID)?,
        decision: parse_decision(&required(body.decision, DECISION)?, DECISION)?,
        recruiter: parse_optional_id(body.recruiter.as_deref(), RECRUITER)?,
    })
}

/// Record the named supervisor's decision.
#[utoipa::path(
    put,
    path = "/api/v1/requisitions/{id}/supervisor-decision",
    params(("id" = String, Path, description = "Requisition id")),
    request_body = ApprovalBody,
    responses(
        (status = 200, description = "Decision recorded", body = JobRequisitionResponse),
        (status = 400, description = "Invalid decision", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not the requisition's supervisor", body = Error),
        (status = 404, description = "No open requisition matched", body = Error),
    ),
    tags = ["requisitions"],
    operation_id = "recordSupervisorDecision"
)]
#[put("/requisitions/{id}/supervisor-decision")]
pub async fn record_supervisor_decision(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ApprovalBody>,
) -> ApiResult<HttpResponse> {
    let request = approval_request(&session, &path, payload.into_inner())?;
    Ok(json_ok(
        state.requisitions.record_supervisor_decision(request).await?,
    ))
}

/// Record the named HR approver's decision, optionally assigning a recruiter.
#[utoipa::path(
    put,
    path = "/api/v1/requisitions/{id}/hr-decision",
    params(("id" = String, Path, description = "Requisition id")),
    request_body = ApprovalBody,
    responses(
        (status = 200, description = "Decision recorded", body = JobRequisitionResponse),
        (status = 400, description = "Invalid decision", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not the HR approver, or supervisor approval missing", body = Error),
        (status = 404, description = "No open requisition matched", body = Error),
    ),
    tags = ["requisitions"],
    operation_id = "recordHrDecision"
)]
#[put("/requisitions/{id}/hr-decision")]
pub async fn record_hr_decision(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ApprovalBody>,
) -> ApiResult<HttpResponse> {
    let request = approval_request(&session, &path, payload.into_inner())?;
    Ok(json_ok(state.requisitions.record_hr_decision(request).await?))
}

/// Assign the recruiter for an HR-approved requisition.
#[utoipa::path(
    put,
    path = "/api/v1/requisitions/{id}/recruiter",
    params(("id" = String, Path, description = "Requisition id")),
    request_body = AssignRecruiterBody,
    responses(
        (status = 200, description = "Recruiter assigned", body = JobRequisitionResponse),
        (status = 400, description = "Invalid recruiter", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not the HR approver, or HR approval missing", body = Error),
        (status = 404, description = "No open requisition matched", body = Error),
    ),
    tags = ["requisitions"],
    operation_id = "assignRecruiter"
)]
#[put("/requisitions/{id}/recruiter")]
pub async fn assign_recruiter(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AssignRecruiterBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let request = AssignRecruiterRequest {
        actor,
        requisition_id: parse_id(&path, REQUISITION_ID)?,
        recruiter: parse_id(&required(payload.into_inner().recruiter, RECRUITER)?, RECRUITER)?,
    };
    Ok(json_ok(state.requisitions.assign_recruiter(request).await?))
}
