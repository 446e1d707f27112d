//! Quotation state resolver
//!
//! Derives the "effective" quotation to display and act on: the most
//! recent revision when any exist, else the parent itself. Pure
//! derivation, safe to recompute on every request.

use shared::models::{Quotation, QuotationStatus};
use shared::types::Role;

/// Resolved view of a project's quotation
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub quotation: Option<&'a Quotation>,
    pub needs_revision: bool,
    pub revision_count: usize,
}

/// Resolve the effective quotation from an optional parent
///
/// Revisions are ordered newest-first, so `revisions[0]` wins when
/// any exist. `needs_revision` is true iff the effective quotation's
/// rejection notes are non-empty after trimming.
pub fn resolve(parent: Option<&Quotation>) -> Resolved<'_> {
    let Some(parent) = parent else {
        return Resolved {
            quotation: None,
            needs_revision: false,
            revision_count: 0,
        };
    };

    let effective = effective(parent);
    Resolved {
        quotation: Some(effective),
        needs_revision: needs_revision(effective),
        revision_count: parent.revisions.len(),
    }
}

/// Resolve for a specific acting role
///
/// Same derivation as [`resolve`], but a draft effective quotation is
/// not visible to clients.
pub fn resolve_for(parent: Option<&Quotation>, role: Role) -> Resolved<'_> {
    let resolved = resolve(parent);
    match resolved.quotation {
        Some(q) if !visible_to(q, role) => Resolved {
            quotation: None,
            ..resolved
        },
        _ => resolved,
    }
}

/// The effective quotation within a parent document
pub fn effective(parent: &Quotation) -> &Quotation {
    parent.revisions.first().unwrap_or(parent)
}

/// Mutable access to the effective quotation within a parent document
pub fn effective_mut(parent: &mut Quotation) -> &mut Quotation {
    if parent.revisions.is_empty() {
        parent
    } else {
        &mut parent.revisions[0]
    }
}

/// Whether the effective quotation has been sent back for changes
pub fn needs_revision(quotation: &Quotation) -> bool {
    quotation
        .rejection_notes
        .as_deref()
        .is_some_and(|notes| !notes.trim().is_empty())
}

/// Role visibility: clients never see draft quotations
pub fn visible_to(quotation: &Quotation, role: Role) -> bool {
    quotation.status != QuotationStatus::Draft || role.is_admin()
}
