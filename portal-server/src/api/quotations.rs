//! Quotation API
//!
//! Staff manage drafts and revisions, clients respond and pay. Every
//! state transition routes through a lifecycle action so the handler
//! layer stays thin.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::{Result, ServerError, ServerState};
use crate::money;
use crate::quotations::actions::{
    ApprovePayment, CreateRevision, MakePayment, MakeResubmission, PaymentRequest,
    QuotationAction, QuotationDecision, RejectPayment, RespondToQuotation, ResubmissionRequest,
    SendQuotation,
};
use crate::quotations::{ledger, resolver};
use shared::models::{ActivityItem, PaymentType, Quotation, QuotationStatus, ServiceItem};

use super::ExtractPrincipal;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/quotations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id))
        .route("/{id}/send", post(send))
        .route("/{id}/respond", post(respond))
        .route("/{id}/revisions", post(create_revision))
        .route("/{id}/payments", post(make_payment))
        .route("/{id}/payments/{key}/approve", post(approve_payment))
        .route("/{id}/payments/{key}/reject", post(reject_payment))
        .route(
            "/{id}/payments/{key}/resubmissions",
            post(make_resubmission),
        )
}

/// New draft quotation
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationRequest {
    #[validate(length(min = 1))]
    pub quotation_number: String,
    pub acquisition_number: Option<String>,
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub currency: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub vat_percentage: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub advance_percentage: Option<f64>,
    #[serde(default)]
    pub items: Vec<ServiceItem>,
    #[serde(default)]
    pub other_items: Vec<ActivityItem>,
    pub payment_notes: Option<String>,
}

/// Resolved quotation view with derived payment state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationView {
    pub quotation: Option<Quotation>,
    pub needs_revision: bool,
    pub revision_count: usize,
    pub ledger: ledger::LedgerTotals,
    pub available_payment_types: Vec<PaymentType>,
}

/// Row in the quotation listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSummary {
    pub id: String,
    pub quotation_number: String,
    pub status: QuotationStatus,
    pub currency: String,
    pub grand_total: f64,
    pub revision_count: usize,
}

/// POST /api/quotations
async fn create(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(payload): Json<CreateQuotationRequest>,
) -> Result<Json<Quotation>> {
    if !principal.role.is_admin() {
        return Err(ServerError::Forbidden);
    }
    payload
        .validate()
        .map_err(|e| ServerError::Validation(e.to_string()))?;

    let mut items = payload.items;
    for item in &mut items {
        if item.key.is_empty() {
            item.key = Uuid::new_v4().to_string();
        }
    }
    let mut other_items = payload.other_items;
    for item in &mut other_items {
        if item.key.is_empty() {
            item.key = Uuid::new_v4().to_string();
        }
    }

    let mut doc = Quotation {
        id: Uuid::new_v4().to_string(),
        quotation_number: payload.quotation_number,
        revision_number: 0,
        acquisition_number: payload.acquisition_number,
        date: payload.date,
        status: QuotationStatus::Draft,
        currency: payload.currency,
        vat_percentage: payload.vat_percentage,
        advance_percentage: payload.advance_percentage,
        items,
        other_items,
        subtotal: 0.0,
        grand_total: 0.0,
        rejection_notes: None,
        payment_notes: payload.payment_notes,
        revisions: Vec::new(),
        payments: Vec::new(),
        invoice: None,
        version: 0,
    };
    money::recalculate_totals(&mut doc);

    let saved = state.quotations.insert(doc).await?;
    tracing::info!(
        quotation_id = %saved.id,
        quotation_number = %saved.quotation_number,
        operator = %principal.id,
        "Quotation created"
    );
    Ok(Json(saved))
}

/// GET /api/quotations
async fn list(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
) -> Result<Json<Vec<QuotationSummary>>> {
    let docs = state.quotations.list().await?;
    let summaries = docs
        .iter()
        .filter_map(|doc| {
            let resolved = resolver::resolve_for(Some(doc), principal.role);
            let effective = resolved.quotation?;
            Some(QuotationSummary {
                id: doc.id.clone(),
                quotation_number: effective.quotation_number.clone(),
                status: effective.status,
                currency: effective.currency.clone(),
                grand_total: effective.grand_total,
                revision_count: resolved.revision_count,
            })
        })
        .collect();
    Ok(Json(summaries))
}

/// GET /api/quotations/:id
async fn get_by_id(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<String>,
) -> Result<Json<QuotationView>> {
    let doc = state.quotations.get(&id).await?;
    let resolved = resolver::resolve_for(Some(&doc), principal.role);

    let (ledger_totals, available) = match resolved.quotation {
        Some(q) => (
            ledger::aggregate(&q.payments, q.grand_total),
            ledger::available_payment_types(q),
        ),
        None => (ledger::aggregate(&[], 0.0), Vec::new()),
    };

    Ok(Json(QuotationView {
        quotation: resolved.quotation.cloned(),
        needs_revision: resolved.needs_revision,
        revision_count: resolved.revision_count,
        ledger: ledger_totals,
        available_payment_types: available,
    }))
}

/// POST /api/quotations/:id/send
async fn send(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<String>,
) -> Result<Json<Quotation>> {
    let action = SendQuotation { quotation_id: id };
    let saved = action.execute(&state.action_ctx(&principal)).await?;
    Ok(Json(saved))
}

/// POST /api/quotations/:id/respond
async fn respond(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<String>,
    Json(decision): Json<QuotationDecision>,
) -> Result<Json<Quotation>> {
    let action = RespondToQuotation {
        quotation_id: id,
        decision,
    };
    let saved = action.execute(&state.action_ctx(&principal)).await?;
    Ok(Json(saved))
}

/// POST /api/quotations/:id/revisions
async fn create_revision(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<String>,
) -> Result<Json<Quotation>> {
    let action = CreateRevision { quotation_id: id };
    let saved = action.execute(&state.action_ctx(&principal)).await?;
    Ok(Json(saved))
}

/// POST /api/quotations/:id/payments
async fn make_payment(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<String>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<Quotation>> {
    let action = MakePayment {
        quotation_id: id,
        request,
    };
    let saved = action.execute(&state.action_ctx(&principal)).await?;
    Ok(Json(saved))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub resubmission_key: Option<String>,
    pub notes: Option<String>,
}

/// POST /api/quotations/:id/payments/:key/approve
async fn approve_payment(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path((id, key)): Path<(String, String)>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<Quotation>> {
    let action = ApprovePayment {
        quotation_id: id,
        payment_key: key,
        resubmission_key: request.resubmission_key,
        notes: request.notes,
    };
    let saved = action.execute(&state.action_ctx(&principal)).await?;
    Ok(Json(saved))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub resubmission_key: Option<String>,
    pub reason: String,
}

/// POST /api/quotations/:id/payments/:key/reject
async fn reject_payment(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path((id, key)): Path<(String, String)>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<Quotation>> {
    let action = RejectPayment {
        quotation_id: id,
        payment_key: key,
        resubmission_key: request.resubmission_key,
        reason: request.reason,
    };
    let saved = action.execute(&state.action_ctx(&principal)).await?;
    Ok(Json(saved))
}

/// POST /api/quotations/:id/payments/:key/resubmissions
async fn make_resubmission(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path((id, key)): Path<(String, String)>,
    Json(request): Json<ResubmissionRequest>,
) -> Result<Json<Quotation>> {
    let action = MakeResubmission {
        quotation_id: id,
        payment_key: key,
        request,
    };
    let saved = action.execute(&state.action_ctx(&principal)).await?;
    Ok(Json(saved))
}
