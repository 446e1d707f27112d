//! Quotation lifecycle actions
//!
//! One file per transition, following a command-handler pattern: each
//! action is a plain struct executed against an [`ActionContext`].
//! The context carries the document store, file storage, the PDF
//! renderer, the orphan ledger and the acting principal. The role is
//! always an explicit input, never ambient state.

mod approve_payment;
mod create_revision;
mod make_payment;
mod make_resubmission;
mod reject_payment;
mod respond_to_quotation;
mod send_quotation;

pub use approve_payment::ApprovePayment;
pub use create_revision::CreateRevision;
pub use make_payment::{MakePayment, PaymentRequest};
pub use make_resubmission::{MakeResubmission, ResubmissionRequest};
pub use reject_payment::RejectPayment;
pub use respond_to_quotation::{QuotationDecision, RespondToQuotation};
pub use send_quotation::SendQuotation;

use async_trait::async_trait;
use shared::types::{Principal, Timestamp};

use super::QuotationError;
use crate::files::{FileStorage, OrphanLedger};
use crate::pdf::PdfRenderer;
use crate::store::QuotationStore;

/// Everything an action needs to execute
pub struct ActionContext<'a> {
    pub store: &'a dyn QuotationStore,
    pub files: &'a dyn FileStorage,
    pub renderer: &'a dyn PdfRenderer,
    pub orphans: &'a OrphanLedger,
    pub principal: &'a Principal,
    pub now: Timestamp,
}

/// A lifecycle transition
#[async_trait]
pub trait QuotationAction {
    type Output: Send;

    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Self::Output, QuotationError>;
}

#[cfg(test)]
pub(crate) mod test_context {
    use std::sync::Arc;

    use shared::types::{Principal, Role};

    use crate::files::{LocalFileStorage, OrphanLedger};
    use crate::pdf::PlainTextRenderer;
    use crate::store::MemoryQuotationStore;

    /// Owned bundle backing an [`super::ActionContext`] in tests
    pub struct TestHarness {
        pub store: MemoryQuotationStore,
        pub files: LocalFileStorage,
        pub renderer: PlainTextRenderer,
        pub orphans: Arc<OrphanLedger>,
        pub _dir: tempfile::TempDir,
    }

    impl TestHarness {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            Self {
                store: MemoryQuotationStore::new(),
                files: LocalFileStorage::new(dir.path()),
                renderer: PlainTextRenderer,
                orphans: Arc::new(OrphanLedger::new()),
                _dir: dir,
            }
        }

        pub fn ctx<'a>(&'a self, principal: &'a Principal) -> super::ActionContext<'a> {
            super::ActionContext {
                store: &self.store,
                files: &self.files,
                renderer: &self.renderer,
                orphans: &self.orphans,
                principal,
                now: 1_700_000_000_000,
            }
        }
    }

    pub fn client() -> Principal {
        Principal::new("user-1", "Asha Mushi", Role::Client)
    }

    pub fn admin() -> Principal {
        Principal::new("staff-1", "Neema Lyimo", Role::Admin)
    }

    pub fn other() -> Principal {
        Principal::new("guest-1", "Guest", Role::Other)
    }
}
