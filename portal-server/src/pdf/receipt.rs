//! Payment receipt document builder

use shared::models::{Payment, Quotation, Resubmission};

use super::{format_amount, PdfDocument, PdfNode};

/// Build the receipt document for an approved payment or resubmission
///
/// When a resubmission is being approved, its amount and mode are the
/// ones on the receipt; the parent payment supplies the type.
pub fn receipt_document(
    quotation: &Quotation,
    payment: &Payment,
    resubmission: Option<&Resubmission>,
    receipt_number: &str,
) -> PdfDocument {
    let (amount, mode) = match resubmission {
        Some(r) => (r.amount, r.mode),
        None => (payment.amount, payment.mode),
    };

    let mut pairs = vec![
        ("Receipt No".to_string(), receipt_number.to_string()),
        (
            "Quotation No".to_string(),
            quotation.quotation_number.clone(),
        ),
        (
            "Payment Type".to_string(),
            serde_json::to_value(payment.payment_type)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
        ),
        (
            "Amount".to_string(),
            format!("{} {}", quotation.currency, format_amount(amount)),
        ),
        ("Payment Mode".to_string(), mode.form_value().to_string()),
    ];
    if resubmission.is_some() {
        pairs.push(("Resubmission".to_string(), "yes".to_string()));
    }

    PdfDocument {
        title: format!("Payment Receipt {}", receipt_number),
        nodes: vec![
            PdfNode::KeyValues { pairs },
            PdfNode::Paragraph {
                text: "This receipt confirms approval of the referenced payment.".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotations::test_support::{
        payment_fixture, quotation_fixture, resubmission_fixture,
    };
    use shared::models::ReviewStatus;

    #[test]
    fn test_receipt_uses_payment_amount() {
        let quotation = quotation_fixture();
        let payment = payment_fixture("p-1", 70800.0, ReviewStatus::Approved);
        let doc = receipt_document(&quotation, &payment, None, "RCP-0001");

        let PdfNode::KeyValues { pairs } = &doc.nodes[0] else {
            panic!("expected key/value block");
        };
        assert!(pairs.contains(&("Amount".to_string(), "TZS 70,800.00".to_string())));
    }

    #[test]
    fn test_receipt_prefers_resubmission_amount() {
        let quotation = quotation_fixture();
        let payment = payment_fixture("p-1", 1000.0, ReviewStatus::Rejected);
        let resubmission = resubmission_fixture("r-1", 1500.0, ReviewStatus::Approved);
        let doc = receipt_document(&quotation, &payment, Some(&resubmission), "RCP-0002");

        let PdfNode::KeyValues { pairs } = &doc.nodes[0] else {
            panic!("expected key/value block");
        };
        assert!(pairs.contains(&("Amount".to_string(), "TZS 1,500.00".to_string())));
        assert!(pairs.contains(&("Resubmission".to_string(), "yes".to_string())));
    }
}
