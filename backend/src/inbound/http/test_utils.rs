//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use serde::{Deserialize, Serialize};

use super::session::SessionContext;
use crate::domain::{Actor, Error, TenantId, UserId};

const TEST_LOGIN_PATH: &str = "/__test/login";

/// Cookie session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

#[derive(Serialize, Deserialize)]
struct TestActor {
    user_id: UserId,
    tenant_id: TenantId,
}

async fn test_login(
    session: SessionContext,
    payload: web::Json<TestActor>,
) -> Result<HttpResponse, Error> {
    let TestActor { user_id, tenant_id } = payload.into_inner();
    session.persist_actor(&Actor::new(user_id, tenant_id))?;
    Ok(HttpResponse::NoContent().finish())
}

/// App with test sessions and a login route standing in for the identity
/// collaborator.
pub fn session_test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .route(TEST_LOGIN_PATH, web::post().to(test_login))
}

/// Request that logs `actor` in on an app built from [`session_test_app`].
pub fn login_request(actor: Actor) -> test::TestRequest {
    test::TestRequest::post()
        .uri(TEST_LOGIN_PATH)
        .set_json(TestActor {
            user_id: actor.user_id,
            tenant_id: actor.tenant_id,
        })
}

/// The session cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
