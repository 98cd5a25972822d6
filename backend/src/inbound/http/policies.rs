//! Tenant policy administration handlers.
//!
//! ```text
//! POST /api/v1/policies/roles
//! POST /api/v1/policies/permissions
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, required};

const USER_ID: FieldName = FieldName::new("userId");
const ROLE: FieldName = FieldName::new("role");

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleBody {
    pub user_id: Option<String>,
    #[schema(example = "HR_APPROVER")]
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantPermissionBody {
    #[schema(example = "RECRUITER")]
    pub role: Option<String>,
    #[schema(example = "job_application")]
    pub object: Option<String>,
    #[schema(example = "read")]
    pub action: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/policies/roles",
    request_body = AssignRoleBody,
    responses(
        (status = 204, description = "Role assigned"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
    ),
    tags = ["policies"],
    operation_id = "assignRole"
)]
#[post("/policies/roles")]
pub async fn assign_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AssignRoleBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let user = parse_id(&required(body.user_id, USER_ID)?, USER_ID)?;
    let role = required(body.role, ROLE)?;
    state.policies.assign_role(actor, user, role).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/policies/permissions",
    request_body = GrantPermissionBody,
    responses(
        (status = 204, description = "Permission granted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not permitted", body = Error),
    ),
    tags = ["policies"],
    operation_id = "grantPermission"
)]
#[post("/policies/permissions")]
pub async fn grant_permission(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GrantPermissionBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let role = required(body.role, ROLE)?;
    let object = required(body.object, FieldName::new("object"))?;
    let action = required(body.action, FieldName::new("action"))?;
    state
        .policies
        .grant_permission(actor, role, object, action)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
