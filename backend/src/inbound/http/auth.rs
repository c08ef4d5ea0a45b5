//! Login, signup, and logout page handlers.
//!
//! ```text
//! POST /login {"email":"budi@harvestworld.id","password":"berkebun123"}
//! POST /signup {"email":"citra@harvestworld.id","password":"rahasia","displayName":"Citra"}
//! POST /logout
//! ```
//!
//! Page responses are JSON view documents. A rejected submission does not
//! produce the error envelope: it returns the page view in Failed phase with
//! the form payload retained, so the form stays usable under the banner.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::messages;
use crate::domain::ports::AuthGatewayError;
use crate::domain::{
    CredentialValidationError, Credentials, PageView, RedirectTarget, Registration,
};
use crate::inbound::http::redirects::see_other;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Form state retained by the login view. Never carries the password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
}

/// Signup request body for `POST /signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Form state retained by the signup view. Never carries the password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub email: String,
    pub display_name: String,
}

/// Payload of the static signup confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub message: String,
}

/// Login page.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", body = PageView<LoginForm>),
        (status = 303, description = "Already signed in; redirect to home")
    ),
    tags = ["auth"],
    operation_id = "loginPage",
    security([])
)]
#[get("/login")]
pub async fn login_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let resolved = session.resolve(state.directory.as_ref()).await;
    if resolved.identity().is_some() {
        return Ok(see_other(RedirectTarget::Home.path()));
    }
    Ok(HttpResponse::Ok().json(PageView::ready(LoginForm::default())))
}

/// Sign in against the identity gateway and establish a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 303, description = "Signed in; redirect to home", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Credentials rejected", body = PageView<LoginForm>),
        (status = 503, description = "Identity gateway unreachable", body = PageView<LoginForm>)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let form = LoginForm {
        email: email.clone(),
    };

    // A locally invalid email can never sign in, so it gets the same
    // banner as a gateway denial rather than a field-level error.
    let Ok(credentials) = Credentials::try_from_parts(&email, &password) else {
        return Ok(invalid_credentials(form));
    };

    match state.auth.sign_in(&credentials).await {
        Ok(identity) => {
            session.persist_identity(identity.id)?;
            Ok(see_other(RedirectTarget::Home.path()))
        }
        Err(AuthGatewayError::Denied { .. }) => Ok(invalid_credentials(form)),
        Err(error) => {
            tracing::warn!(%error, "sign-in failed upstream");
            Ok(HttpResponse::ServiceUnavailable()
                .json(PageView::rejected(form, messages::GENERIC_FAILURE)))
        }
    }
}

fn invalid_credentials(form: LoginForm) -> HttpResponse {
    HttpResponse::Unauthorized().json(PageView::rejected(form, messages::INVALID_CREDENTIALS))
}

/// Clear the session and send the visitor back to the login page.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 303, description = "Signed out; redirect to login")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    see_other(RedirectTarget::Login.path())
}

/// Signup page.
#[utoipa::path(
    get,
    path = "/signup",
    responses(
        (status = 200, description = "Signup form", body = PageView<SignupForm>),
        (status = 303, description = "Already signed in; redirect to home")
    ),
    tags = ["auth"],
    operation_id = "signupPage",
    security([])
)]
#[get("/signup")]
pub async fn signup_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let resolved = session.resolve(state.directory.as_ref()).await;
    if resolved.identity().is_some() {
        return Ok(see_other(RedirectTarget::Home.path()));
    }
    Ok(HttpResponse::Ok().json(PageView::ready(SignupForm::default())))
}

/// Register a new account with the identity gateway.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 303, description = "Account created; redirect to confirmation"),
        (status = 400, description = "Form rejected", body = PageView<SignupForm>),
        (status = 409, description = "Email already registered", body = PageView<SignupForm>),
        (status = 503, description = "Identity gateway unreachable", body = PageView<SignupForm>)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        email,
        password,
        display_name,
    } = payload.into_inner();
    let form = SignupForm {
        email: email.clone(),
        display_name: display_name.clone(),
    };

    let registration = match Registration::try_from_parts(&email, &password, &display_name) {
        Ok(registration) => registration,
        Err(error) => {
            let message = match error {
                CredentialValidationError::Email(_) => messages::INVALID_EMAIL,
                CredentialValidationError::EmptyPassword => messages::EMPTY_PASSWORD,
            };
            return Ok(HttpResponse::BadRequest().json(PageView::rejected(form, message)));
        }
    };

    match state.auth.sign_up(&registration).await {
        Ok(_) => Ok(see_other("/signup/success")),
        Err(error @ AuthGatewayError::Conflict { .. }) => {
            Ok(HttpResponse::Conflict().json(PageView::rejected(form, rejection_message(&error))))
        }
        Err(error @ AuthGatewayError::Denied { .. }) => {
            Ok(HttpResponse::BadRequest().json(PageView::rejected(form, rejection_message(&error))))
        }
        Err(error) => {
            tracing::warn!(%error, "signup failed upstream");
            Ok(HttpResponse::ServiceUnavailable()
                .json(PageView::rejected(form, messages::GENERIC_FAILURE)))
        }
    }
}

fn rejection_message(error: &AuthGatewayError) -> String {
    error
        .gateway_message()
        .map_or_else(|| messages::GENERIC_FAILURE.to_owned(), str::to_owned)
}

/// Static confirmation page shown after a successful signup.
#[utoipa::path(
    get,
    path = "/signup/success",
    responses(
        (status = 200, description = "Confirmation", body = PageView<Confirmation>)
    ),
    tags = ["auth"],
    operation_id = "signupSuccessPage",
    security([])
)]
#[get("/signup/success")]
pub async fn signup_success() -> HttpResponse {
    HttpResponse::Ok().json(PageView::ready(Confirmation {
        message: messages::SIGNUP_SUCCESS.to_owned(),
    }))
}
