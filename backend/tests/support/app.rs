//! Shared harness for the HTTP integration suites.
//!
//! Assembles the application the way the server does, seeded with the
//! curated demo catalogue behind the fixture adapters and wrapped in real
//! cookie-session middleware.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use std::sync::Arc;

use demo_catalog::{DEMO_PASSWORD, demo_plants, demo_profiles};
use harvestworld::Trace;
use harvestworld::domain::ports::{
    FixtureAuthGateway, FixturePlantCatalog, FixtureProfileDirectory,
};
use harvestworld::domain::{DisplayName, EmailAddress, Identity, IdentityId, Plant, PlantId};
use harvestworld::inbound::http::state::HttpState;
use harvestworld::inbound::http::{admin, auth, catalog, health};

fn demo_directory() -> FixtureProfileDirectory {
    FixtureProfileDirectory::with_members(demo_profiles().into_iter().map(|profile| Identity {
        id: IdentityId::new(profile.id),
        email: EmailAddress::parse(&profile.email).expect("curated email"),
        display_name: profile
            .display_name
            .as_deref()
            .map(|name| DisplayName::parse(name).expect("curated name")),
        role: profile.role.parse().expect("curated role"),
        avatar_url: profile.avatar_url,
        created_at: None,
    }))
}

fn demo_catalogue() -> FixturePlantCatalog {
    FixturePlantCatalog::with_plants(demo_plants().into_iter().map(|plant| Plant {
        id: PlantId::new(plant.id),
        name: plant.name,
        scientific_name: plant.scientific_name,
        category: plant.category,
        description: plant.description,
        image_url: plant.image_url,
        difficulty: plant.difficulty,
    }))
}

/// Application with every page handler, the probes, and a fresh session key.
pub fn demo_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let directory = demo_directory();
    let state = HttpState::new(
        Arc::new(FixtureAuthGateway::new(directory.clone(), DEMO_PASSWORD)),
        Arc::new(demo_catalogue()),
        Arc::new(directory),
    );
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(health::HealthState::new()))
        .wrap(session)
        .wrap(Trace)
        .service(catalog::home)
        .service(catalog::category_page)
        .service(catalog::plant_page)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::signup_page)
        .service(auth::signup)
        .service(auth::signup_success)
        .service(admin::directory_page)
        .service(admin::page_snapshot)
        .service(admin::change_role)
        .service(admin::close_page)
        .service(health::ready)
        .service(health::live)
}

/// Sign in with the shared demo password and return the session cookie.
pub async fn sign_in(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({
                "email": email,
                "password": DEMO_PASSWORD,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 303, "sign-in should redirect");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
