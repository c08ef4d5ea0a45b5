//! HTTP adapter for the hosted gateway.
//!
//! One [`HttpGateway`] speaks to both gateway surfaces: the identity
//! endpoints under `auth/v1` and the PostgREST-style tables under
//! `rest/v1`. It implements all three outbound ports so the server can be
//! wired with a single client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use super::dto::{AuthUserDto, PlantRowDto, ProfileRowDto, RoleRowDto, TokenResponseDto};
use crate::domain::auth::{Credentials, Registration};
use crate::domain::category::Category;
use crate::domain::identity::{AssignableRole, EmailAddress, Identity, IdentityId, Role};
use crate::domain::plant::{Plant, PlantId};
use crate::domain::ports::{
    AuthGateway, AuthGatewayError, PlantCatalog, PlantCatalogError, ProfileDirectory,
    ProfileDirectoryError,
};

const BODY_PREVIEW_LIMIT: usize = 160;

/// Errors raised while constructing an [`HttpGateway`].
#[derive(Debug, Error)]
pub enum GatewayBuildError {
    #[error("gateway base URL cannot carry request paths: {url}")]
    OpaqueBaseUrl { url: Url },
    #[error("failed to construct the gateway HTTP client: {source}")]
    Client {
        #[from]
        source: reqwest::Error,
    },
}

/// Failure observed on the `rest/v1` table surface before it is mapped
/// into a port error.
#[derive(Debug)]
enum RestFailure {
    Denied(String),
    NotFound(String),
    InvalidRequest(String),
    Timeout(String),
    RateLimited(String),
    Transport(String),
    Decode(String),
}

impl From<RestFailure> for ProfileDirectoryError {
    fn from(failure: RestFailure) -> Self {
        match failure {
            RestFailure::Denied(message) => Self::denied(message),
            RestFailure::NotFound(message) => Self::not_found(message),
            RestFailure::InvalidRequest(message) => Self::invalid_request(message),
            RestFailure::Timeout(message) => Self::timeout(message),
            RestFailure::RateLimited(message) => Self::rate_limited(message),
            RestFailure::Transport(message) => Self::transport(message),
            RestFailure::Decode(message) => Self::decode(message),
        }
    }
}

impl From<RestFailure> for PlantCatalogError {
    fn from(failure: RestFailure) -> Self {
        match failure {
            RestFailure::Denied(message) => Self::denied(message),
            // The catalog tables have no per-row 404s; a missing endpoint is
            // a misconfigured request.
            RestFailure::NotFound(message) | RestFailure::InvalidRequest(message) => {
                Self::invalid_request(message)
            }
            RestFailure::Timeout(message) => Self::timeout(message),
            RestFailure::RateLimited(message) => Self::rate_limited(message),
            RestFailure::Transport(message) => Self::transport(message),
            RestFailure::Decode(message) => Self::decode(message),
        }
    }
}

impl From<RestFailure> for AuthGatewayError {
    fn from(failure: RestFailure) -> Self {
        match failure {
            RestFailure::Denied(message)
            | RestFailure::NotFound(message)
            | RestFailure::InvalidRequest(message) => Self::denied(message),
            RestFailure::Timeout(message) => Self::timeout(message),
            RestFailure::RateLimited(message) => Self::rate_limited(message),
            RestFailure::Transport(message) => Self::transport(message),
            RestFailure::Decode(message) => Self::decode(message),
        }
    }
}

/// Reqwest-backed client for the hosted gateway.
#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl HttpGateway {
    /// Builds a gateway client with a per-request timeout.
    ///
    /// # Errors
    /// Returns an error when the base URL cannot carry path segments or
    /// the underlying HTTP client fails to initialise.
    pub fn new(base_url: Url, api_key: String, timeout: Duration) -> Result<Self, GatewayBuildError> {
        if base_url.cannot_be_a_base() {
            return Err(GatewayBuildError::OpaqueBaseUrl { url: base_url });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint<const N: usize>(&self, segments: [&str; N]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects opaque bases, so the segments always apply.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), RestFailure> {
        let response = self.authed(request).send().await.map_err(transport_failure)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;
        Ok((status, body))
    }

    /// Issues a `rest/v1` read and decodes the row array.
    async fn fetch_rows<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, RestFailure> {
        let (status, body) = self.send(self.client.get(url)).await?;
        if !status.is_success() {
            return Err(rest_status_failure(status, &body));
        }
        serde_json::from_str(&body).map_err(|err| {
            RestFailure::Decode(format!(
                "gateway returned an undecodable row payload: {err}; body: {}",
                body_preview(&body)
            ))
        })
    }

    async fn fetch_profile_row(&self, id: IdentityId) -> Result<Option<Identity>, RestFailure> {
        let mut url = self.endpoint(["rest", "v1", "profiles"]);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{}", id.value()));

        let rows: Vec<ProfileRowDto> = self.fetch_rows(url).await?;
        rows.into_iter()
            .next()
            .map(|row| row.into_domain().map_err(RestFailure::Decode))
            .transpose()
    }
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthGatewayError> {
        let mut url = self.endpoint(["auth", "v1", "token"]);
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self.client.post(url).json(&json!({
            "email": credentials.email().as_str(),
            "password": credentials.password(),
        }));
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(auth_status_failure(status, &body));
        }
        let token: TokenResponseDto = serde_json::from_str(&body).map_err(|err| {
            AuthGatewayError::decode(format!(
                "gateway returned an undecodable token payload: {err}; body: {}",
                body_preview(&body)
            ))
        })?;

        // Roles live in the profile table, not the token payload, so a
        // sign-in completes with a profile read.
        let id = IdentityId::new(token.user.id);
        self.fetch_profile_row(id)
            .await?
            .ok_or_else(|| {
                AuthGatewayError::decode(format!("no profile row for signed-in identity {id}"))
            })
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthGatewayError> {
        let url = self.endpoint(["auth", "v1", "signup"]);
        let mut payload = json!({
            "email": registration.email().as_str(),
            "password": registration.password(),
        });
        if let Some(name) = registration.display_name() {
            payload["data"] = json!({ "display_name": name.as_str() });
        }

        let (status, body) = self.send(self.client.post(url).json(&payload)).await?;
        if !status.is_success() {
            return Err(auth_status_failure(status, &body));
        }
        let user: AuthUserDto = serde_json::from_str(&body).map_err(|err| {
            AuthGatewayError::decode(format!(
                "gateway returned an undecodable signup payload: {err}; body: {}",
                body_preview(&body)
            ))
        })?;

        // The gateway provisions the profile row for fresh accounts with
        // the default role, so the identity is assembled locally.
        let email = EmailAddress::parse(&user.email).map_err(|err| {
            AuthGatewayError::decode(format!("signup payload for user {}: {err}", user.id))
        })?;
        Ok(Identity {
            id: IdentityId::new(user.id),
            email,
            display_name: registration.display_name().cloned(),
            role: Role::User,
            avatar_url: None,
            created_at: None,
        })
    }
}

#[async_trait]
impl PlantCatalog for HttpGateway {
    async fn all_plants(&self) -> Result<Vec<Plant>, PlantCatalogError> {
        let mut url = self.endpoint(["rest", "v1", "plants"]);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "name.asc");

        let rows: Vec<PlantRowDto> = self.fetch_rows(url).await?;
        Ok(rows.into_iter().map(PlantRowDto::into_domain).collect())
    }

    async fn plants_in_category(
        &self,
        category: Category,
    ) -> Result<Vec<Plant>, PlantCatalogError> {
        let mut url = self.endpoint(["rest", "v1", "plants"]);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("category", &format!("eq.{}", category.storage_name()))
            .append_pair("order", "name.asc");

        let rows: Vec<PlantRowDto> = self.fetch_rows(url).await?;
        Ok(rows.into_iter().map(PlantRowDto::into_domain).collect())
    }

    async fn plant_by_id(&self, id: PlantId) -> Result<Option<Plant>, PlantCatalogError> {
        let mut url = self.endpoint(["rest", "v1", "plants"]);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{}", id.value()));

        let rows: Vec<PlantRowDto> = self.fetch_rows(url).await?;
        Ok(rows.into_iter().next().map(PlantRowDto::into_domain))
    }
}

#[async_trait]
impl ProfileDirectory for HttpGateway {
    async fn profile_of(&self, id: IdentityId) -> Result<Option<Identity>, ProfileDirectoryError> {
        Ok(self.fetch_profile_row(id).await?)
    }

    async fn role_of(&self, id: IdentityId) -> Result<Role, ProfileDirectoryError> {
        let mut url = self.endpoint(["rest", "v1", "profiles"]);
        url.query_pairs_mut()
            .append_pair("select", "role")
            .append_pair("id", &format!("eq.{}", id.value()));

        let rows: Vec<RoleRowDto> = self.fetch_rows(url).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| ProfileDirectoryError::not_found(format!("no profile row for {id}")))?;
        row.role
            .parse()
            .map_err(|err| ProfileDirectoryError::decode(format!("profile row {id}: {err}")))
    }

    async fn members_with_role(&self, role: Role) -> Result<Vec<Identity>, ProfileDirectoryError> {
        let mut url = self.endpoint(["rest", "v1", "profiles"]);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("role", &format!("eq.{}", role.as_str()))
            .append_pair("order", "display_name.asc");

        let rows: Vec<ProfileRowDto> = self.fetch_rows(url).await?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(RestFailure::Decode))
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn assign_role(
        &self,
        id: IdentityId,
        role: AssignableRole,
    ) -> Result<(), ProfileDirectoryError> {
        let mut url = self.endpoint(["rest", "v1", "profiles"]);
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id.value()));

        let request = self
            .client
            .patch(url)
            .header("Prefer", "return=minimal")
            .json(&json!({ "role": role.as_str() }));
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(rest_status_failure(status, &body).into());
        }
        Ok(())
    }
}

fn transport_failure(error: reqwest::Error) -> RestFailure {
    if error.is_timeout() {
        RestFailure::Timeout(format!("gateway request timed out: {error}"))
    } else {
        RestFailure::Transport(format!("gateway request failed: {error}"))
    }
}

fn rest_status_failure(status: StatusCode, body: &str) -> RestFailure {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RestFailure::Denied(message),
        StatusCode::NOT_FOUND => RestFailure::NotFound(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => RestFailure::Timeout(message),
        StatusCode::TOO_MANY_REQUESTS => RestFailure::RateLimited(message),
        status if status.is_client_error() => RestFailure::InvalidRequest(message),
        status => RestFailure::Transport(format!("gateway returned {status}: {message}")),
    }
}

fn auth_status_failure(status: StatusCode, body: &str) -> AuthGatewayError {
    let message = error_message(body);
    match status {
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            AuthGatewayError::conflict(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AuthGatewayError::timeout(message)
        }
        StatusCode::TOO_MANY_REQUESTS => AuthGatewayError::rate_limited(message),
        status if status.is_client_error() => AuthGatewayError::denied(message),
        status => AuthGatewayError::transport(format!("gateway returned {status}: {message}")),
    }
}

/// Pulls the human-readable message out of a gateway error body.
///
/// The identity surface reports `error_description` or `msg`; the table
/// surface reports `message`. Anything else falls back to a body preview.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error_description: Option<String>,
        msg: Option<String>,
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error_description.or(parsed.msg).or(parsed.message))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| body_preview(body))
}

fn body_preview(body: &str) -> String {
    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.len() <= BODY_PREVIEW_LIMIT {
        compact
    } else {
        let mut cut = BODY_PREVIEW_LIMIT;
        while !compact.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &compact[..cut])
    }
}
