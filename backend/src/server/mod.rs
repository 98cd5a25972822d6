//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use state_builders::build_http_state;

use hr_backend::Trace;
#[cfg(debug_assertions)]
use hr_backend::doc::ApiDoc;
use hr_backend::inbound::http::applications::{
    create_application, list_applications, record_applicant_decision,
    record_hiring_manager_decision, record_recruiter_decision, schedule_interview,
};
use hr_backend::inbound::http::health::{HealthState, live, ready};
use hr_backend::inbound::http::organisation::{
    create_department, create_division, create_position, list_positions,
};
use hr_backend::inbound::http::policies::{assign_role, grant_permission};
use hr_backend::inbound::http::requisitions::{
    assign_recruiter, create_requisition, list_requisitions, record_hr_decision,
    record_supervisor_decision,
};
use hr_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(8)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(create_requisition)
        .service(list_requisitions)
        .service(record_supervisor_decision)
        .service(record_hr_decision)
        .service(assign_recruiter)
        .service(create_application)
        .service(record_applicant_decision)
        .service(list_applications)
        .service(record_recruiter_decision)
        .service(schedule_interview)
        .service(record_hiring_manager_decision)
        .service(create_division)
        .service(create_department)
        .service(create_position)
        .service(list_positions)
        .service(assign_role)
        .service(grant_permission);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Build the HTTP state and bind the server.
///
/// Readiness is flipped once the socket is bound.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the initial policy load fails or the
/// socket cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(
        build_http_state(&config.db_pool)
            .await
            .map_err(|err| std::io::Error::other(format!("policy load failed: {}", err.message())))?,
    );
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
