//! Redirect responses shared by the page handlers.

use actix_web::{http::header, HttpResponse};

use crate::domain::RedirectTarget;

/// `303 See Other` pointing at the given location.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Act on a gate redirect decision.
pub(crate) fn gate_redirect(target: RedirectTarget) -> HttpResponse {
    see_other(target.path())
}
