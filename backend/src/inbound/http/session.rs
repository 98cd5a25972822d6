//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session carries the authenticated actor as two strings,
//! `user_id` and `tenant_id`. Sessions are issued by the login collaborator;
//! this service only reads them. A cookie with either value missing or
//! malformed is treated as no session at all.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Actor, Error, TenantId, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const TENANT_ID_KEY: &str = "tenant_id";

/// Newtype wrapper exposing actor-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `actor` in the session cookie.
    pub fn persist_actor(&self, actor: &Actor) -> Result<(), Error> {
        let write = |key: &str, value: String| {
            self.0
                .insert(key, value)
                .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
        };
        write(USER_ID_KEY, actor.user_id.to_string())?;
        write(TENANT_ID_KEY, actor.tenant_id.to_string())
    }

    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// The actor in the session, if any.
    pub fn actor(&self) -> Result<Option<Actor>, Error> {
        let (Some(user), Some(tenant)) = (self.read(USER_ID_KEY)?, self.read(TENANT_ID_KEY)?)
        else {
            return Ok(None);
        };
        match (user.parse::<UserId>(), tenant.parse::<TenantId>()) {
            (Ok(user_id), Ok(tenant_id)) => Ok(Some(Actor::new(user_id, tenant_id))),
            _ => {
                warn!("malformed actor in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated actor or fail with `UNAUTHENTICATED-ERROR`.
    pub fn require_actor(&self) -> Result<Actor, Error> {
        self.actor()?
            .ok_or_else(|| Error::unauthenticated("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_request, session_cookie, session_test_app};
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, test, web};

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let actor = session.require_actor()?;
        Ok(HttpResponse::Ok().body(format!("{}@{}", actor.user_id, actor.tenant_id)))
    }

    #[actix_web::test]
    async fn round_trips_actor() {
        let app =
            test::init_service(session_test_app().route("/whoami", web::get().to(whoami))).await;
        let actor = Actor::new(UserId::random(), TenantId::random());
        let login = test::call_service(&app, login_request(actor).to_request()).await;
        let cookie = session_cookie(&login);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, format!("{}@{}", actor.user_id, actor.tenant_id));
    }

    #[actix_web::test]
    async fn missing_actor_is_unauthenticated() {
        let app =
            test::init_service(session_test_app().route("/whoami", web::get().to(whoami))).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_tenant_is_unauthenticated() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/corrupt",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, UserId::random().to_string())
                            .expect("insert user");
                        session
                            .insert(TENANT_ID_KEY, "not-a-uuid")
                            .expect("insert tenant");
                        HttpResponse::Ok().finish()
                    }),
                )
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let set = test::call_service(&app, test::TestRequest::get().uri("/corrupt").to_request())
            .await;
        let cookie = session_cookie(&set);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
