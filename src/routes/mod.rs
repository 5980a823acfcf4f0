// Route exports
pub mod auth;
pub mod compatibility;

use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{AccessClaims, AuthProvider, ProfileService, TokenVerifier};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<ProfileService>,
    pub auth: Arc<dyn AuthProvider>,
    pub verifier: Arc<TokenVerifier>,
    pub matcher: Matcher,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(compatibility::configure)
            .configure(auth::configure),
    );
}

/// Extract and verify the bearer token on a request
pub(crate) fn authenticate(req: &HttpRequest, verifier: &TokenVerifier) -> Result<AccessClaims, HttpResponse> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            HttpResponse::Unauthorized().json(ErrorResponse::new(
                "Unauthorized",
                "Missing bearer token",
                401,
            ))
        })?;

    verifier.verify(token).map_err(|e| {
        tracing::debug!("Rejected bearer token on {}: {}", req.path(), e);
        HttpResponse::Unauthorized().json(ErrorResponse::new("Unauthorized", e.to_string(), 401))
    })
}
