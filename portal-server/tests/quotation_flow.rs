//! End-to-end quotation lifecycle against a fully initialized server
//! state: draft, send, accept, invoice, advance and final payments,
//! rejection with resubmission, and the revision loop.

use chrono::NaiveDate;
use portal_server::quotations::actions::{
    ApprovePayment, CreateRevision, MakePayment, MakeResubmission, PaymentRequest,
    QuotationAction, QuotationDecision, RejectPayment, RespondToQuotation, ResubmissionRequest,
    SendQuotation,
};
use portal_server::quotations::ledger;
use portal_server::{Config, ServerState};
use shared::models::{
    ActivityItem, ActivityKind, PaymentMode, PaymentType, Quotation, QuotationStatus,
    ReviewStatus, ServiceItem, ServiceSection, TestMethodOption,
};
use shared::types::{Principal, Role};

fn client() -> Principal {
    Principal::new("user-1", "Asha Mushi", Role::Client)
}

fn admin() -> Principal {
    Principal::new("staff-1", "Neema Lyimo", Role::Admin)
}

/// Draft quotation: subtotal 100000, 18% VAT, grand total 118000,
/// 60% advance
fn draft_quotation(id: &str) -> Quotation {
    Quotation {
        id: id.to_string(),
        quotation_number: format!("QTN-{id}"),
        revision_number: 0,
        acquisition_number: None,
        date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
        status: QuotationStatus::Draft,
        currency: "TZS".to_string(),
        vat_percentage: 18.0,
        advance_percentage: Some(60.0),
        items: vec![ServiceItem {
            key: "item-1".to_string(),
            service_id: "svc-cbr".to_string(),
            description: "CBR test".to_string(),
            section: ServiceSection::Lab,
            test_methods: vec![TestMethodOption {
                id: "tm-1".to_string(),
                name: "BS 1377".to_string(),
                selected: true,
            }],
            unit: Some("sample".to_string()),
            unit_price: Some(30000.0),
            quantity: Some(2.0),
        }],
        other_items: vec![ActivityItem {
            key: "other-1".to_string(),
            kind: ActivityKind::Mobilization,
            description: "Equipment mobilization".to_string(),
            unit: Some("trip".to_string()),
            unit_price: Some(40000.0),
            quantity: Some(1.0),
        }],
        subtotal: 100000.0,
        grand_total: 118000.0,
        rejection_notes: None,
        payment_notes: None,
        revisions: vec![],
        payments: vec![],
        invoice: None,
        version: 0,
    }
}

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).await.unwrap();
    (state, dir)
}

#[tokio::test]
async fn test_full_payment_lifecycle() {
    let (state, _dir) = test_state().await;
    let admin = admin();
    let client = client();

    state
        .quotations
        .insert(draft_quotation("q-flow"))
        .await
        .unwrap();

    // Staff sends the draft
    let doc = SendQuotation {
        quotation_id: "q-flow".to_string(),
    }
    .execute(&state.action_ctx(&admin))
    .await
    .unwrap();
    assert_eq!(doc.status, QuotationStatus::Sent);

    // Client accepts: invoice is rendered, uploaded and referenced
    let doc = RespondToQuotation {
        quotation_id: "q-flow".to_string(),
        decision: QuotationDecision::Accepted,
    }
    .execute(&state.action_ctx(&client))
    .await
    .unwrap();
    assert_eq!(doc.status, QuotationStatus::Invoiced);
    let invoice = doc.invoice.as_ref().unwrap();
    assert!(invoice.number.starts_with("INV-"));
    assert!(state.orphans.is_empty());

    // Client submits the advance payment, amount fixed server-side
    let doc = MakePayment {
        quotation_id: "q-flow".to_string(),
        request: PaymentRequest {
            payment_type: PaymentType::Advance,
            amount: None,
            mode: PaymentMode::Mobile,
            proof_file: None,
        },
    }
    .execute(&state.action_ctx(&client))
    .await
    .unwrap();
    let advance_key = doc.payments[0].key.clone();
    assert_eq!(doc.payments[0].amount, 70800.0);
    assert_eq!(doc.payments[0].status, ReviewStatus::Pending);

    // Pending payment contributes nothing yet
    let totals = ledger::aggregate(&doc.payments, doc.grand_total);
    assert_eq!(totals.total_approved, 0.0);
    assert_eq!(totals.remaining, 118000.0);

    // Staff approves the advance
    let doc = ApprovePayment {
        quotation_id: "q-flow".to_string(),
        payment_key: advance_key,
        resubmission_key: None,
        notes: None,
    }
    .execute(&state.action_ctx(&admin))
    .await
    .unwrap();
    assert_eq!(doc.status, QuotationStatus::PartiallyPaid);
    assert!(doc.payments[0].receipt_file.is_some());

    // A second advance is not allowed
    let err = MakePayment {
        quotation_id: "q-flow".to_string(),
        request: PaymentRequest {
            payment_type: PaymentType::Advance,
            amount: None,
            mode: PaymentMode::Bank,
            proof_file: None,
        },
    }
    .execute(&state.action_ctx(&client))
    .await;
    assert!(err.is_err());

    // Full payment pins the remaining balance
    let doc = MakePayment {
        quotation_id: "q-flow".to_string(),
        request: PaymentRequest {
            payment_type: PaymentType::Full,
            amount: None,
            mode: PaymentMode::Bank,
            proof_file: None,
        },
    }
    .execute(&state.action_ctx(&client))
    .await
    .unwrap();
    let final_key = doc.payments[1].key.clone();
    assert_eq!(doc.payments[1].amount, 47200.0);

    let doc = ApprovePayment {
        quotation_id: "q-flow".to_string(),
        payment_key: final_key,
        resubmission_key: None,
        notes: None,
    }
    .execute(&state.action_ctx(&admin))
    .await
    .unwrap();
    assert_eq!(doc.status, QuotationStatus::FullyPaid);

    let totals = ledger::aggregate(&doc.payments, doc.grand_total);
    assert_eq!(totals.total_approved, 118000.0);
    assert_eq!(totals.remaining, 0.0);

    // Every write bumped the version tag
    assert_eq!(doc.version, 6);
}

#[tokio::test]
async fn test_rejected_payment_resubmission_replaces_not_stacks() {
    let (state, _dir) = test_state().await;
    let admin = admin();
    let client = client();

    let mut doc = draft_quotation("q-resub");
    doc.status = QuotationStatus::Invoiced;
    state.quotations.insert(doc).await.unwrap();

    // Client pays part of the balance
    let doc = MakePayment {
        quotation_id: "q-resub".to_string(),
        request: PaymentRequest {
            payment_type: PaymentType::Other,
            amount: Some(50000.0),
            mode: PaymentMode::Bank,
            proof_file: None,
        },
    }
    .execute(&state.action_ctx(&client))
    .await
    .unwrap();
    let payment_key = doc.payments[0].key.clone();

    // Staff rejects the proof
    let doc = RejectPayment {
        quotation_id: "q-resub".to_string(),
        payment_key: payment_key.clone(),
        resubmission_key: None,
        reason: "Reference number does not match".to_string(),
    }
    .execute(&state.action_ctx(&admin))
    .await
    .unwrap();
    assert_eq!(doc.payments[0].status, ReviewStatus::Rejected);
    assert_eq!(doc.status, QuotationStatus::Invoiced);

    // Client resubmits, amount locked to the original payment
    let doc = MakeResubmission {
        quotation_id: "q-resub".to_string(),
        payment_key: payment_key.clone(),
        request: ResubmissionRequest {
            mode: PaymentMode::Mobile,
            proof_file: None,
        },
    }
    .execute(&state.action_ctx(&client))
    .await
    .unwrap();
    let resub_key = doc.payments[0].resubmissions[0].key.clone();
    assert_eq!(doc.payments[0].resubmissions[0].amount, 50000.0);

    // Staff approves the resubmission
    let doc = ApprovePayment {
        quotation_id: "q-resub".to_string(),
        payment_key,
        resubmission_key: Some(resub_key),
        notes: None,
    }
    .execute(&state.action_ctx(&admin))
    .await
    .unwrap();
    assert_eq!(doc.status, QuotationStatus::PartiallyPaid);

    // The approved resubmission replaces the payment, never stacks
    let totals = ledger::aggregate(&doc.payments, doc.grand_total);
    assert_eq!(totals.total_approved, 50000.0);
    assert_eq!(totals.remaining, 68000.0);
}

#[tokio::test]
async fn test_revision_loop_back_to_acceptance() {
    let (state, _dir) = test_state().await;
    let admin = admin();
    let client = client();

    let mut doc = draft_quotation("q-rev");
    doc.status = QuotationStatus::Sent;
    state.quotations.insert(doc).await.unwrap();

    // Client sends it back for changes
    let doc = RespondToQuotation {
        quotation_id: "q-rev".to_string(),
        decision: QuotationDecision::RevisionsRequested {
            notes: "Reduce mobilization cost".to_string(),
        },
    }
    .execute(&state.action_ctx(&client))
    .await
    .unwrap();
    assert_eq!(doc.status, QuotationStatus::RevisionsRequested);

    // Staff revises; the new draft becomes the effective quotation
    let doc = CreateRevision {
        quotation_id: "q-rev".to_string(),
    }
    .execute(&state.action_ctx(&admin))
    .await
    .unwrap();
    assert_eq!(doc.revisions.len(), 1);
    assert_eq!(doc.revisions[0].status, QuotationStatus::Draft);
    assert_eq!(doc.revisions[0].revision_number, 1);

    // Send and accept the revision
    let doc = SendQuotation {
        quotation_id: "q-rev".to_string(),
    }
    .execute(&state.action_ctx(&admin))
    .await
    .unwrap();
    assert_eq!(doc.revisions[0].status, QuotationStatus::Sent);

    let doc = RespondToQuotation {
        quotation_id: "q-rev".to_string(),
        decision: QuotationDecision::Accepted,
    }
    .execute(&state.action_ctx(&client))
    .await
    .unwrap();
    assert_eq!(doc.revisions[0].status, QuotationStatus::Invoiced);
    let invoice = doc.revisions[0].invoice.as_ref().unwrap();
    assert_eq!(invoice.number, "INV-QTN-q-rev-R1");
}
