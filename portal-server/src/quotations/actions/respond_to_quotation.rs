//! RespondToQuotation action
//!
//! The client's decision on a sent quotation. Acceptance assembles
//! the billing document, renders the invoice PDF, uploads it and
//! references it on the quotation in one transition; rejection and
//! revision requests persist the notes under distinct statuses.

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{InvoiceRecord, Quotation, QuotationStatus};

use super::{ActionContext, QuotationAction};
use crate::billing;
use crate::pdf;
use crate::quotations::{resolver, QuotationError};

/// Client decision on a sent quotation
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum QuotationDecision {
    Accepted,
    Rejected { notes: Option<String> },
    RevisionsRequested { notes: String },
}

#[derive(Debug, Clone)]
pub struct RespondToQuotation {
    pub quotation_id: String,
    pub decision: QuotationDecision,
}

#[async_trait]
impl QuotationAction for RespondToQuotation {
    type Output = Quotation;

    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Quotation, QuotationError> {
        if !ctx.principal.role.is_client() {
            return Err(QuotationError::Forbidden(ctx.principal.role));
        }

        let mut doc = ctx.store.get(&self.quotation_id).await?;
        let expected = doc.version;

        let effective = resolver::effective_mut(&mut doc);
        if effective.status != QuotationStatus::Sent {
            return Err(QuotationError::InvalidStatus {
                action: "respond to",
                status: effective.status,
            });
        }

        match &self.decision {
            QuotationDecision::Accepted => {
                // Invoice number is stable per quotation+revision so a
                // retried acceptance references the same document name
                let invoice_number = format!(
                    "INV-{}-R{}",
                    effective.quotation_number, effective.revision_number
                );
                let billing = billing::assemble(effective);
                let pdf_doc = pdf::invoice_document(effective, &billing, &invoice_number);
                let bytes = ctx.renderer.render(&pdf_doc)?;

                // Upload first, then reference; a failed reference step
                // leaves the upload orphaned, so record it for cleanup
                let file = ctx
                    .files
                    .store(&format!("{}.pdf", invoice_number), bytes)
                    .await?;
                let file_id = file.file_id.clone();

                effective.invoice = Some(InvoiceRecord {
                    number: invoice_number,
                    file,
                    issued_at: ctx.now,
                });
                effective.status = QuotationStatus::Invoiced;

                match ctx.store.put(doc, expected).await {
                    Ok(saved) => {
                        tracing::info!(
                            quotation_id = %self.quotation_id,
                            operator = %ctx.principal.id,
                            "Quotation accepted, invoice issued"
                        );
                        Ok(saved)
                    }
                    Err(err) => {
                        ctx.orphans.record(file_id);
                        Err(err.into())
                    }
                }
            }
            QuotationDecision::Rejected { notes } => {
                effective.rejection_notes = notes
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                effective.status = QuotationStatus::Rejected;

                tracing::info!(
                    quotation_id = %self.quotation_id,
                    operator = %ctx.principal.id,
                    "Quotation rejected"
                );
                Ok(ctx.store.put(doc, expected).await?)
            }
            QuotationDecision::RevisionsRequested { notes } => {
                let notes = notes.trim();
                if notes.is_empty() {
                    return Err(QuotationError::MissingNotes);
                }
                effective.rejection_notes = Some(notes.to_string());
                effective.status = QuotationStatus::RevisionsRequested;

                tracing::info!(
                    quotation_id = %self.quotation_id,
                    operator = %ctx.principal.id,
                    "Revisions requested"
                );
                Ok(ctx.store.put(doc, expected).await?)
            }
        }
    }
}
