//! Member management page and its page-session API.
//!
//! `GET /admin/users` opens a server-held page session whose actor owns the
//! directory view, then hands the client a `pageId` to drive the follow-up
//! calls. Every `/api/v1/pages` call re-runs the admin gate; passing the
//! gate once buys nothing for later requests.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AssignableRole, DirectoryView, DomainError, IdentityId, PageHandle, PageId, Role,
};
use crate::inbound::http::guard::{gate, Gated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Page-session document returned by the directory page and its API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    /// Identifier driving the page-session API.
    pub page_id: PageId,
    /// Current view of the member directory.
    pub view: DirectoryView,
}

/// Role change request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeRequest {
    /// Member whose role changes.
    pub user_id: i64,
    /// Role to assign.
    pub role: AssignableRole,
}

fn page_gone(id: PageId) -> DomainError {
    DomainError::not_found("page session not found").with_details(json!({ "pageId": id }))
}

/// Member directory page. Opens a page session and runs its initial load.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "Open page session with the loaded view", body = PageDocument),
        (status = 303, description = "Visitor not signed in or not an administrator")
    ),
    tags = ["admin"],
    operation_id = "directoryPage",
    security(("SessionCookie" = []))
)]
#[get("/admin/users")]
pub async fn directory_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    match gate(&session, state.directory.as_ref(), Some(Role::Admin)).await? {
        Gated::Allowed(_) => {}
        Gated::Blocked(response) => return Ok(response),
    }

    let (handle, view) = state
        .pages
        .open_directory_page()
        .await
        .map_err(|_| DomainError::internal("page session closed during open"))?;
    Ok(HttpResponse::Ok().json(PageDocument {
        page_id: handle.id(),
        view,
    }))
}

fn lookup(state: &HttpState, raw_id: Uuid) -> Result<(PageId, PageHandle), DomainError> {
    let id = PageId::from_uuid(raw_id);
    let handle = state.pages.get(id).ok_or_else(|| page_gone(id))?;
    Ok((id, handle))
}

/// Current snapshot of an open page session.
#[utoipa::path(
    get,
    path = "/api/v1/pages/{page_id}",
    params(("page_id" = Uuid, Path, description = "Open page session identifier")),
    responses(
        (status = 200, description = "Current view", body = PageDocument),
        (status = 303, description = "Visitor not signed in or not an administrator"),
        (status = 404, description = "No page session with this identifier", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "pageSnapshot",
    security(("SessionCookie" = []))
)]
#[get("/api/v1/pages/{page_id}")]
pub async fn page_snapshot(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    match gate(&session, state.directory.as_ref(), Some(Role::Admin)).await? {
        Gated::Allowed(_) => {}
        Gated::Blocked(response) => return Ok(response),
    }
    let (id, handle) = lookup(&state, path.into_inner())?;
    let view = handle.snapshot().await.map_err(|_| page_gone(id))?;
    Ok(HttpResponse::Ok().json(PageDocument { page_id: id, view }))
}

/// Change a member's role through the page session.
#[utoipa::path(
    post,
    path = "/api/v1/pages/{page_id}/role",
    params(("page_id" = Uuid, Path, description = "Open page session identifier")),
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "View after the mutation", body = PageDocument),
        (status = 303, description = "Visitor not signed in or not an administrator"),
        (status = 404, description = "No page session with this identifier", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "changeRole",
    security(("SessionCookie" = []))
)]
#[post("/api/v1/pages/{page_id}/role")]
pub async fn change_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<RoleChangeRequest>,
) -> ApiResult<HttpResponse> {
    match gate(&session, state.directory.as_ref(), Some(Role::Admin)).await? {
        Gated::Allowed(_) => {}
        Gated::Blocked(response) => return Ok(response),
    }
    let (id, handle) = lookup(&state, path.into_inner())?;
    let RoleChangeRequest { user_id, role } = payload.into_inner();
    let view = handle
        .change_role(IdentityId::new(user_id), role)
        .await
        .map_err(|_| page_gone(id))?;
    Ok(HttpResponse::Ok().json(PageDocument { page_id: id, view }))
}

/// Close a page session, cancelling its pending notice revert.
#[utoipa::path(
    delete,
    path = "/api/v1/pages/{page_id}",
    params(("page_id" = Uuid, Path, description = "Open page session identifier")),
    responses(
        (status = 204, description = "Page session closed"),
        (status = 303, description = "Visitor not signed in or not an administrator"),
        (status = 404, description = "No page session with this identifier", body = DomainError)
    ),
    tags = ["admin"],
    operation_id = "closePage",
    security(("SessionCookie" = []))
)]
#[delete("/api/v1/pages/{page_id}")]
pub async fn close_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    match gate(&session, state.directory.as_ref(), Some(Role::Admin)).await? {
        Gated::Allowed(_) => {}
        Gated::Blocked(response) => return Ok(response),
    }
    let id = PageId::from_uuid(path.into_inner());
    if state.pages.close(id).await {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(page_gone(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureAuthGateway, FixturePlantCatalog, MockProfileDirectory, ProfileDirectory,
    };
    use crate::inbound::http::test_utils::{member, seeded_directory, test_session_middleware};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test as actix_test, web, App};
    use serde_json::Value;
    use std::sync::Arc;

    async fn seed(session: SessionContext, path: web::Path<i64>) -> ApiResult<HttpResponse> {
        session.persist_identity(IdentityId::new(path.into_inner()))?;
        Ok(HttpResponse::NoContent().finish())
    }

    fn test_app(
        directory: Arc<dyn ProfileDirectory>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(
            Arc::new(FixtureAuthGateway::new(seeded_directory(), "berkebun123")),
            Arc::new(FixturePlantCatalog::default()),
            directory,
        );
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .route("/seed/{id}", web::get().to(seed))
            .service(directory_page)
            .service(page_snapshot)
            .service(change_role)
            .service(close_page)
    }

    async fn cookie_for(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        id: i64,
    ) -> actix_web::cookie::Cookie<'static> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::get()
                .uri(&format!("/seed/{id}"))
                .to_request(),
        )
        .await;
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    fn directory_labels(view: &Value) -> Vec<&str> {
        view["state"]["payload"]
            .as_array()
            .expect("member array")
            .iter()
            .map(|member| member["displayName"].as_str().expect("display name"))
            .collect()
    }

    #[actix_web::test]
    async fn anonymous_visitors_are_redirected_without_any_lookup() {
        let mut directory = MockProfileDirectory::new();
        directory.expect_profile_of().never();
        directory.expect_role_of().never();
        directory.expect_members_with_role().never();
        let app = actix_test::init_service(test_app(Arc::new(directory))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/users")
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
    async fn non_admins_are_sent_home_after_exactly_one_role_lookup() {
        let mut directory = MockProfileDirectory::new();
        directory
            .expect_profile_of()
            .returning(|id| Ok(Some(member(id.value(), "Budi Santoso", Role::User))));
        directory
            .expect_role_of()
            .times(1)
            .returning(|_| Ok(Role::User));
        directory.expect_members_with_role().never();
        let app = actix_test::init_service(test_app(Arc::new(directory))).await;
        let cookie = cookie_for(&app, 7).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/users")
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
    async fn admins_open_a_directory_page_with_the_loaded_view() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_directory()))).await;
        let cookie = cookie_for(&app, 1).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/users")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert!(value["pageId"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(value["view"]["state"]["phase"], "ready");
        // Users in label order, then experts. Admins are not listed.
        assert_eq!(
            directory_labels(&value["view"]),
            ["Agus", "Budi Santoso", "Made Wirawan"]
        );
    }

    #[actix_web::test]
    async fn a_role_change_patches_the_member_and_reports_the_notice() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_directory()))).await;
        let cookie = cookie_for(&app, 1).await;

        let opened = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/users")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let opened: Value = actix_test::read_body_json(opened).await;
        let page_id = opened["pageId"].as_str().expect("page id").to_owned();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/pages/{page_id}/role"))
                .cookie(cookie)
                .set_json(RoleChangeRequest {
                    user_id: 7,
                    role: AssignableRole::Expert,
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["pageId"], page_id.as_str());

        let members = value["view"]["state"]["payload"]
            .as_array()
            .expect("member array");
        let budi = members
            .iter()
            .find(|member| member["id"] == 7)
            .expect("member 7 listed");
        assert_eq!(budi["role"], "expert");
        let agus = members
            .iter()
            .find(|member| member["id"] == 5)
            .expect("member 5 listed");
        assert_eq!(agus["role"], "user");
        assert_eq!(
            value["view"]["notice"]["message"],
            "Berhasil mengubah peran pengguna menjadi expert"
        );
    }

    #[actix_web::test]
    async fn snapshots_return_the_current_view() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_directory()))).await;
        let cookie = cookie_for(&app, 1).await;

        let opened = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/users")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let opened: Value = actix_test::read_body_json(opened).await;
        let page_id = opened["pageId"].as_str().expect("page id").to_owned();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/pages/{page_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            directory_labels(&value["view"]),
            ["Agus", "Budi Santoso", "Made Wirawan"]
        );
        assert!(value["view"].get("notice").is_none());
    }

    #[actix_web::test]
    async fn closing_a_page_unregisters_it() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_directory()))).await;
        let cookie = cookie_for(&app, 1).await;

        let opened = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/users")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let opened: Value = actix_test::read_body_json(opened).await;
        let page_id = opened["pageId"].as_str().expect("page id").to_owned();

        let closed = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/pages/{page_id}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(closed.status(), StatusCode::NO_CONTENT);

        let snapshot = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/pages/{page_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(snapshot.status(), StatusCode::NOT_FOUND);
        let value: Value = actix_test::read_body_json(snapshot).await;
        assert_eq!(value["code"], "not_found");
        assert_eq!(value["details"]["pageId"], page_id.as_str());
    }

    #[actix_web::test]
    async fn unknown_page_ids_are_not_found() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_directory()))).await;
        let cookie = cookie_for(&app, 1).await;
        let unknown = Uuid::new_v4();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/pages/{unknown}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["details"]["pageId"], unknown.to_string());
    }

    #[actix_web::test]
    async fn the_pages_api_reruns_the_gate_on_every_call() {
        let app = actix_test::init_service(test_app(Arc::new(seeded_directory()))).await;
        let admin = cookie_for(&app, 1).await;

        let opened = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/users")
                .cookie(admin)
                .to_request(),
        )
        .await;
        let opened: Value = actix_test::read_body_json(opened).await;
        let page_id = opened["pageId"].as_str().expect("page id").to_owned();

        // A plain member holding a valid page id is still turned away.
        let user = cookie_for(&app, 7).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/pages/{page_id}"))
                .cookie(user)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).expect("location"),
            "/"
        );
    }
}
