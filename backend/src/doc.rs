//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] registers every HTTP handler and the shared error schema. The
//! document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    ApplicantDecision, ApprovalDecision, Error, ErrorCode, HiringManagerDecision,
    RecruiterDecision,
};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the caller's user and tenant.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "HR backend API",
        description = "Multi-tenant hiring workflow: requisitions, applications, onboarding, and organisation structure."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::requisitions::create_requisition,
        crate::inbound::http::requisitions::list_requisitions,
        crate::inbound::http::requisitions::record_supervisor_decision,
        crate::inbound::http::requisitions::record_hr_decision,
        crate::inbound::http::requisitions::assign_recruiter,
        crate::inbound::http::applications::create_application,
        crate::inbound::http::applications::record_applicant_decision,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::record_recruiter_decision,
        crate::inbound::http::applications::schedule_interview,
        crate::inbound::http::applications::record_hiring_manager_decision,
        crate::inbound::http::organisation::create_division,
        crate::inbound::http::organisation::create_department,
        crate::inbound::http::organisation::create_position,
        crate::inbound::http::organisation::list_positions,
        crate::inbound::http::policies::assign_role,
        crate::inbound::http::policies::grant_permission,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ApprovalDecision,
        RecruiterDecision,
        HiringManagerDecision,
        ApplicantDecision,
    )),
    tags(
        (name = "requisitions", description = "Raising and approving job requisitions"),
        (name = "applications", description = "Screening, interviewing, and hiring applicants"),
        (name = "organisation", description = "Divisions, departments, and positions"),
        (name = "policies", description = "Tenant role and permission administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
