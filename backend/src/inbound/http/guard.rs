//! Gate plumbing shared by protected page handlers.
//!
//! Handlers resolve the session and run the authorisation gate through one
//! helper so the resolve-then-gate sequencing cannot be reordered per
//! handler. Data reads happen strictly after [`gate`] hands back `Allowed`.

use actix_web::HttpResponse;

use crate::domain::ports::ProfileDirectory;
use crate::domain::{authorize, DomainError, GateOutcome, Role, SessionState};
use crate::inbound::http::redirects::gate_redirect;
use crate::inbound::http::session::SessionContext;

/// Result of gating one request.
pub(crate) enum Gated {
    /// The visitor passed; the resolved session rides along so handlers do
    /// not resolve twice.
    Allowed(SessionState),
    /// The visitor is redirected; the response is ready to send.
    Blocked(HttpResponse),
}

/// Resolve the session, then run the authorisation gate.
///
/// Resolution completes before screening, so the gate's Suspend arm cannot
/// occur here; reaching it is a programming error surfaced as an internal
/// error rather than a panic.
pub(crate) async fn gate(
    session: &SessionContext,
    directory: &dyn ProfileDirectory,
    required: Option<Role>,
) -> Result<Gated, DomainError> {
    let resolved = session.resolve(directory).await;
    match authorize(&resolved, required, directory).await {
        GateOutcome::Allow => Ok(Gated::Allowed(resolved)),
        GateOutcome::Redirect(target) => Ok(Gated::Blocked(gate_redirect(target))),
        GateOutcome::Suspend => Err(DomainError::internal(
            "authorisation gate suspended after session resolution",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureAuthGateway, FixturePlantCatalog};
    use crate::domain::{Identity, IdentityId};
    use crate::inbound::http::state::HttpState;
    use crate::inbound::http::test_utils::{seeded_directory, test_session_middleware};
    use crate::inbound::http::ApiResult;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test as actix_test, web, App};
    use std::sync::Arc;

    async fn seed(session: SessionContext, path: web::Path<i64>) -> ApiResult<HttpResponse> {
        session.persist_identity(IdentityId::new(path.into_inner()))?;
        Ok(HttpResponse::NoContent().finish())
    }

    async fn probe(
        state: web::Data<HttpState>,
        session: SessionContext,
    ) -> ApiResult<HttpResponse> {
        match gate(&session, state.directory.as_ref(), Some(Role::Admin)).await? {
            Gated::Allowed(resolved) => {
                let label = resolved
                    .identity()
                    .map_or("none", Identity::label)
                    .to_owned();
                Ok(HttpResponse::Ok().body(label))
            }
            Gated::Blocked(response) => Ok(response),
        }
    }

    fn probe_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let directory = seeded_directory();
        let state = HttpState::new(
            Arc::new(FixtureAuthGateway::new(directory.clone(), "berkebun123")),
            Arc::new(FixturePlantCatalog::default()),
            Arc::new(directory),
        );
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .route("/seed/{id}", web::get().to(seed))
            .route("/probe", web::get().to(probe))
    }

    #[actix_web::test]
    async fn anonymous_visitors_are_sent_to_login() {
        let app = actix_test::init_service(probe_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/probe").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).expect("location"),
            "/login"
        );
    }

    #[actix_web::test]
    async fn members_without_the_role_are_sent_home() {
        let app = actix_test::init_service(probe_app()).await;
        let seed_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/seed/7").to_request(),
        )
        .await;
        let cookie = seed_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/probe")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).expect("location"),
            "/"
        );
    }

    #[actix_web::test]
    async fn admins_pass_with_their_identity_resolved() {
        let app = actix_test::init_service(probe_app()).await;
        let seed_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/seed/1").to_request(),
        )
        .await;
        let cookie = seed_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/probe")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        assert_eq!(body, "Ibu Sari");
    }
}
