//! Organisation structure HTTP handlers.
//!
//! ```text
//! POST /api/v1/divisions
//! POST /api/v1/departments
//! POST /api/v1/positions
//! GET  /api/v1/positions?departmentId=...
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CreatePositionRequest;
use crate::domain::{Department, Division, Error, Position};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_id_list, parse_optional_id, required,
};

const NAME: FieldName = FieldName::new("name");
const DIVISION_ID: FieldName = FieldName::new("divisionId");
const DEPARTMENT_ID: FieldName = FieldName::new("departmentId");

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDivisionBody {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentBody {
    pub division_id: Option<String>,
    pub name: Option<String>,
}

/// A new position and the existing positions it reports to.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePositionBody {
    pub department_id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub supervisor_position_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PositionListQuery {
    pub department_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionResponse {
    pub id: String,
    pub name: String,
}

impl From<Division> for DivisionResponse {
    fn from(value: Division) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: String,
    pub division_id: String,
    pub name: String,
}

impl From<Department> for DepartmentResponse {
    fn from(value: Department) -> Self {
        Self {
            id: value.id.to_string(),
            division_id: value.division_id.to_string(),
            name: value.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub id: String,
    pub department_id: String,
    pub title: String,
    pub supervisor_position_ids: Vec<String>,
}

impl From<Position> for PositionResponse {
    fn from(value: Position) -> Self {
        Self {
            id: value.id.to_string(),
            department_id: value.department_id.to_string(),
            title: value.title,
            supervisor_position_ids: value
                .supervisor_position_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/divisions",
    request_body = CreateDivisionBody,
    responses(
        (status = 201, description = "Division created", body = DivisionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
        (status = 409, description = "Name already used in this tenant", body = Error),
    ),
    tags = ["organisation"],
    operation_id = "createDivision"
)]
#[post("/divisions")]
pub async fn create_division(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDivisionBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let name = required(payload.into_inner().name, NAME)?;
    let division = state.organisation.create_division(actor, name).await?;
    Ok(HttpResponse::Created().json(DivisionResponse::from(division)))
}

#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateDepartmentBody,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid request or unknown division", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
        (status = 409, description = "Name already used in this division", body = Error),
    ),
    tags = ["organisation"],
    operation_id = "createDepartment"
)]
#[post("/departments")]
pub async fn create_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDepartmentBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let division_id = parse_id(&required(body.division_id, DIVISION_ID)?, DIVISION_ID)?;
    let name = required(body.name, NAME)?;
    let department = state
        .organisation
        .create_department(actor, division_id, name)
        .await?;
    Ok(HttpResponse::Created().json(DepartmentResponse::from(department)))
}

#[utoipa::path(
    post,
    path = "/api/v1/positions",
    request_body = CreatePositionBody,
    responses(
        (status = 201, description = "Position created", body = PositionResponse),
        (status = 400, description = "Invalid request or unknown supervisor position", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
        (status = 409, description = "Title already used in this department", body = Error),
    ),
    tags = ["organisation"],
    operation_id = "createPosition"
)]
#[post("/positions")]
pub async fn create_position(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePositionBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let request = CreatePositionRequest {
        actor,
        department_id: parse_id(&required(body.department_id, DEPARTMENT_ID)?, DEPARTMENT_ID)?,
        title: required(body.title, FieldName::new("title"))?,
        supervisor_position_ids: parse_id_list(
            &body.supervisor_position_ids,
            FieldName::new("supervisorPositionIds"),
        )?,
    };
    let position = state.organisation.create_position(request).await?;
    Ok(HttpResponse::Created().json(PositionResponse::from(position)))
}

#[utoipa::path(
    get,
    path = "/api/v1/positions",
    params(PositionListQuery),
    responses(
        (status = 200, description = "Positions ordered by title", body = [PositionResponse]),
        (status = 400, description = "Malformed filter", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
    ),
    tags = ["organisation"],
    operation_id = "listPositions"
)]
#[get("/positions")]
pub async fn list_positions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PositionListQuery>,
) -> ApiResult<web::Json<Vec<PositionResponse>>> {
    let actor = session.require_actor()?;
    let department_id = parse_optional_id(query.department_id.as_deref(), DEPARTMENT_ID)?;
    let positions = state
        .organisation_query
        .list_positions(actor, department_id)
        .await?;
    Ok(web::Json(
        positions.into_iter().map(PositionResponse::from).collect(),
    ))
}
