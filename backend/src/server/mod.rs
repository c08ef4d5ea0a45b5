//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{GatewaySettings, ServerConfig, ServerSettings, SettingsError};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::admin::{change_role, close_page, directory_page, page_snapshot};
use crate::inbound::http::auth::{login, login_page, logout, signup, signup_page, signup_success};
use crate::inbound::http::catalog::{category_page, home, plant_page};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
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
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // Trace is registered after the session middleware so it runs outermost
    // and session failures still carry a trace id.
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .service(home)
        .service(category_page)
        .service(plant_page)
        .service(login_page)
        .service(login)
        .service(logout)
        .service(signup_page)
        .service(signup)
        .service(signup_success)
        .service(directory_page)
        .service(page_snapshot)
        .service(change_role)
        .service(close_page)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: resolved [`ServerConfig`] carrying session, binding, and gateway settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when port wiring, binding the socket, or
/// starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        gateway: _,
        demo_catalog: _,
    } = config;

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

#[cfg(test)]
mod tests {
    //! Route and middleware coverage for the assembled application.

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    use crate::domain::ports::{FixtureAuthGateway, FixturePlantCatalog, FixtureProfileDirectory};
    use crate::inbound::http::test_utils::seeded_directory;

    fn assembled_deps() -> AppDependencies {
        let directory = seeded_directory();
        let http_state = web::Data::new(HttpState::new(
            Arc::new(FixtureAuthGateway::new(directory.clone(), "berkebun123")),
            Arc::new(FixturePlantCatalog::default()),
            Arc::new(directory),
        ));
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state,
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn the_assembled_app_serves_the_home_page() {
        let app = test::init_service(build_app(assembled_deps())).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["state"]["phase"], "ready");
    }

    #[rstest]
    #[actix_web::test]
    async fn the_login_flow_round_trips_through_the_session_middleware() {
        let app = test::init_service(build_app(assembled_deps())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_json(serde_json::json!({
                    "email": "member7@harvestworld.id",
                    "password": "berkebun123",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie issued");
        let cookie = cookie.into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/login")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res
            .headers()
            .get("location")
            .and_then(|value| value.to_str().ok())
            .expect("redirect target");
        assert_eq!(location, "/");
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_reports_through_the_assembled_app() {
        let deps = assembled_deps();
        let health = deps.health_state.clone();
        let app = test::init_service(build_app(deps)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.mark_ready();
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[cfg(debug_assertions)]
    #[rstest]
    #[actix_web::test]
    async fn debug_builds_expose_the_openapi_document() {
        let app = test::init_service(build_app(assembled_deps())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api-docs/openapi.json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert!(body["paths"]["/admin/users"].is_object());
    }
}
