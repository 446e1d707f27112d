//! HTTP API routes
//!
//! - [`quotations`] - quotation lifecycle and payments
//! - [`catalog`] - standards, sample classes, test methods, services
//! - [`upload`] - file upload endpoint

pub mod catalog;
pub mod quotations;
pub mod upload;

use axum::{Router, extract::FromRequestParts, http::request::Parts};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;
use shared::types::{Principal, Role};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(quotations::router())
        .merge(catalog::router())
        .merge(upload::router(&state.config))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Principal extractor
///
/// Identity arrives from the fronting gateway as trusted headers:
/// `x-portal-user`, `x-portal-name` and `x-portal-role`. Requests
/// without a recognizable role act as `other` and can only read
/// public resources.
pub struct ExtractPrincipal(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for ExtractPrincipal {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let role = header("x-portal-role")
            .and_then(|v| v.parse::<Role>().ok())
            .unwrap_or(Role::Other);
        let id = header("x-portal-user").unwrap_or_else(|| "anonymous".to_string());
        let name = header("x-portal-name").unwrap_or_default();

        Ok(ExtractPrincipal(Principal { id, name, role }))
    }
}
