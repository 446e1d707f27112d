//! Catalog API
//!
//! Reads are open to any principal; writes and deletes are staff
//! only. Bulk deletes report a per-id outcome instead of failing the
//! whole batch when some entries are still referenced.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;

use crate::core::{Result, ServerError, ServerState};
use shared::models::{DeleteOutcome, SampleClass, Service, Standard, TestMethod};

use super::ExtractPrincipal;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/catalog", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/standards", get(list_standards).post(save_standard))
        .route("/standards/delete", post(delete_standards))
        .route(
            "/sample-classes",
            get(list_sample_classes).post(save_sample_class),
        )
        .route("/sample-classes/delete", post(delete_sample_classes))
        .route("/test-methods", get(list_test_methods).post(save_test_method))
        .route("/test-methods/delete", post(delete_test_methods))
        .route("/services", get(list_services).post(save_service))
        .route("/services/delete", post(delete_services))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub ids: Vec<String>,
}

fn require_admin(principal: &shared::types::Principal) -> Result<()> {
    if principal.role.is_admin() {
        Ok(())
    } else {
        Err(ServerError::Forbidden)
    }
}

async fn list_standards(State(state): State<ServerState>) -> Result<Json<Vec<Standard>>> {
    Ok(Json(state.catalog.standards().await?))
}

async fn save_standard(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(doc): Json<Standard>,
) -> Result<Json<Standard>> {
    require_admin(&principal)?;
    Ok(Json(state.catalog.save_standard(doc).await?))
}

async fn delete_standards(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteOutcome>> {
    require_admin(&principal)?;
    Ok(Json(state.catalog.delete_standards(&request.ids).await?))
}

async fn list_sample_classes(State(state): State<ServerState>) -> Result<Json<Vec<SampleClass>>> {
    Ok(Json(state.catalog.sample_classes().await?))
}

async fn save_sample_class(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(doc): Json<SampleClass>,
) -> Result<Json<SampleClass>> {
    require_admin(&principal)?;
    Ok(Json(state.catalog.save_sample_class(doc).await?))
}

async fn delete_sample_classes(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteOutcome>> {
    require_admin(&principal)?;
    Ok(Json(
        state.catalog.delete_sample_classes(&request.ids).await?,
    ))
}

async fn list_test_methods(State(state): State<ServerState>) -> Result<Json<Vec<TestMethod>>> {
    Ok(Json(state.catalog.test_methods().await?))
}

async fn save_test_method(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(doc): Json<TestMethod>,
) -> Result<Json<TestMethod>> {
    require_admin(&principal)?;
    Ok(Json(state.catalog.save_test_method(doc).await?))
}

async fn delete_test_methods(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteOutcome>> {
    require_admin(&principal)?;
    Ok(Json(state.catalog.delete_test_methods(&request.ids).await?))
}

async fn list_services(State(state): State<ServerState>) -> Result<Json<Vec<Service>>> {
    Ok(Json(state.catalog.services().await?))
}

async fn save_service(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(doc): Json<Service>,
) -> Result<Json<Service>> {
    require_admin(&principal)?;
    Ok(Json(state.catalog.save_service(doc).await?))
}

async fn delete_services(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteOutcome>> {
    require_admin(&principal)?;
    Ok(Json(state.catalog.delete_services(&request.ids).await?))
}
