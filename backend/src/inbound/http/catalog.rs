//! Catalogue page handlers: home listing, category listing, plant detail.
//!
//! The home page is public. Category and detail pages sit behind the gate
//! with no role requirement, so any signed-in member passes. Read failures
//! surface as the page's Failed phase rather than the error envelope; the
//! envelope is reserved for protocol-level errors such as an unknown
//! category slug.

use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::messages;
use crate::domain::{Category, CategoryLookup, DomainError, PageView, Plant, PlantId};
use crate::inbound::http::guard::{gate, Gated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Payload of the home page listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    /// Full catalogue, ordered by name.
    pub plants: Vec<Plant>,
}

/// Payload of a category listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    /// Resolved category slug.
    pub slug: String,
    /// Header label for the category.
    pub label: String,
    /// Plants in the category, ordered by name.
    pub plants: Vec<Plant>,
}

/// Home page with the full plant listing.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Home page view", body = PageView<HomePage>)
    ),
    tags = ["catalog"],
    operation_id = "homePage",
    security([])
)]
#[get("/")]
pub async fn home(state: web::Data<HttpState>) -> HttpResponse {
    let view = match state.catalog.all_plants().await {
        Ok(plants) => PageView::ready(HomePage { plants }),
        Err(error) => {
            tracing::warn!(%error, "home listing failed");
            PageView::load_failed(messages::GENERIC_FAILURE)
        }
    };
    HttpResponse::Ok().json(view)
}

/// Category listing page.
#[utoipa::path(
    get,
    path = "/category/{slug}",
    params(("slug" = String, Path, description = "Category slug, e.g. `sayuran`")),
    responses(
        (status = 200, description = "Category page view", body = PageView<CategoryPage>),
        (status = 303, description = "Visitor not signed in; redirect to login"),
        (status = 404, description = "Slug outside the category vocabulary", body = DomainError)
    ),
    tags = ["catalog"],
    operation_id = "categoryPage",
    security(("SessionCookie" = []))
)]
#[get("/category/{slug}")]
pub async fn category_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    match gate(&session, state.directory.as_ref(), None).await? {
        Gated::Allowed(_) => {}
        Gated::Blocked(response) => return Ok(response),
    }

    let category = match Category::resolve(&path) {
        CategoryLookup::Known(category) => category,
        CategoryLookup::Unknown { slug } => {
            return Err(
                DomainError::not_found("category not found").with_details(json!({ "slug": slug }))
            );
        }
    };

    let view = match state.catalog.plants_in_category(category).await {
        Ok(plants) => PageView::ready(CategoryPage {
            slug: category.slug().to_owned(),
            label: category.display_name().to_owned(),
            plants,
        }),
        Err(error) => {
            tracing::warn!(%error, slug = category.slug(), "category listing failed");
            PageView::load_failed(messages::GENERIC_FAILURE)
        }
    };
    Ok(HttpResponse::Ok().json(view))
}

/// Plant detail page.
#[utoipa::path(
    get,
    path = "/plant/{id}",
    params(("id" = i64, Path, description = "Catalogue plant identifier")),
    responses(
        (status = 200, description = "Plant detail view", body = PageView<Plant>),
        (status = 303, description = "Visitor not signed in; redirect to login")
    ),
    tags = ["catalog"],
    operation_id = "plantPage",
    security(("SessionCookie" = []))
)]
#[get("/plant/{id}")]
pub async fn plant_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    match gate(&session, state.directory.as_ref(), None).await? {
        Gated::Allowed(_) => {}
        Gated::Blocked(response) => return Ok(response),
    }

    let id = PlantId::new(path.into_inner());
    let view = match state.catalog.plant_by_id(id).await {
        Ok(Some(plant)) => PageView::ready(plant),
        Ok(None) => PageView::load_failed(messages::PLANT_NOT_FOUND),
        Err(error) => {
            tracing::warn!(%error, %id, "plant read failed");
            PageView::load_failed(messages::GENERIC_FAILURE)
        }
    };
    Ok(HttpResponse::Ok().json(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureAuthGateway, FixturePlantCatalog, MockPlantCatalog, PlantCatalog,
        PlantCatalogError,
    };
    use crate::domain::IdentityId;
    use crate::inbound::http::test_utils::{seeded_directory, test_session_middleware};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test as actix_test, web, App};
    use serde_json::Value;
    use std::sync::Arc;

    fn plant(id: i64, name: &str, category: &str) -> Plant {
        Plant {
            id: PlantId::new(id),
            name: name.to_owned(),
            scientific_name: None,
            category: category.to_owned(),
            description: format!("Cara merawat {name}."),
            image_url: None,
            difficulty: None,
        }
    }

    fn seeded_catalog() -> FixturePlantCatalog {
        FixturePlantCatalog::with_plants([
            plant(1, "Bayam", "vegetables"),
            plant(2, "Kangkung", "vegetables"),
            plant(3, "Jahe", "spices"),
            plant(4, "Mangga", "fruits"),
        ])
    }

    async fn seed(session: SessionContext, path: web::Path<i64>) -> ApiResult<HttpResponse> {
        session.persist_identity(IdentityId::new(path.into_inner()))?;
        Ok(HttpResponse::NoContent().finish())
    }

    fn test_app(
        catalog: Arc<dyn PlantCatalog>,
    ) -> App<
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
            catalog,
            Arc::new(directory),
        );
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .route("/seed/{id}", web::get().to(seed))
            .service(home)
            .service(category_page)
            .service(plant_page)
    }

    async fn member_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::get().uri("/seed/7").to_request(),
        )
        .await;
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    fn plant_names(value: &Value) -> Vec<&str> {
        value["state"]["payload"]["plants"]
            .as_array()
            .expect("plants array")
            .iter()
            .map(|plant| plant["name"].as_str().expect("plant name"))
            .collect()
    }

    #[actix_web::test]
    async fn home_page_lists_every_plant_without_a_session() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_catalog()))).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["state"]["phase"], "ready");
        assert_eq!(plant_names(&value), ["Bayam", "Jahe", "Kangkung", "Mangga"]);
    }

    #[actix_web::test]
    async fn home_page_reports_read_failures_in_the_view() {
        let mut catalog = MockPlantCatalog::new();
        catalog
            .expect_all_plants()
            .returning(|| Err(PlantCatalogError::transport("connection reset")));
        let app = actix_test::init_service(test_app(Arc::new(catalog))).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["state"]["phase"], "failed");
        assert_eq!(
            value["state"]["message"],
            "Terjadi kesalahan. Silakan coba lagi."
        );
        assert!(value["state"].get("retained").is_none());
    }

    #[actix_web::test]
    async fn category_pages_gate_before_any_read() {
        let mut catalog = MockPlantCatalog::new();
        catalog.expect_plants_in_category().never();
        let app = actix_test::init_service(test_app(Arc::new(catalog))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/category/sayuran")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).expect("location"),
            "/login"
        );
    }

    #[actix_web::test]
    async fn category_page_lists_only_the_matching_plants() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_catalog()))).await;
        let cookie = member_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/category/sayuran")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["state"]["payload"]["slug"], "sayuran");
        assert_eq!(value["state"]["payload"]["label"], "Sayuran");
        assert_eq!(plant_names(&value), ["Bayam", "Kangkung"]);
    }

    #[actix_web::test]
    async fn unknown_category_is_not_found_with_the_slug_preserved() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_catalog()))).await;
        let cookie = member_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/category/xyz")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"], "not_found");
        assert_eq!(value["details"]["slug"], "xyz");
    }

    #[actix_web::test]
    async fn plant_page_shows_the_requested_plant() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_catalog()))).await;
        let cookie = member_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/plant/1")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["state"]["phase"], "ready");
        assert_eq!(value["state"]["payload"]["name"], "Bayam");
        assert_eq!(value["state"]["payload"]["category"], "vegetables");
    }

    #[actix_web::test]
    async fn missing_plant_renders_a_failed_view() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_catalog()))).await;
        let cookie = member_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/plant/99")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["state"]["phase"], "failed");
        assert_eq!(value["state"]["message"], "Tanaman tidak ditemukan.");
        assert!(value["state"].get("retained").is_none());
    }

    #[actix_web::test]
    async fn plant_pages_gate_before_any_read() {
        let mut catalog = MockPlantCatalog::new();
        catalog.expect_plant_by_id().never();
        let app = actix_test::init_service(test_app(Arc::new(catalog))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/plant/1").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).expect("location"),
            "/login"
        );
    }
}
