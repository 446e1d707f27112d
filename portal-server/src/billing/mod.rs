//! Billing document assembly
//!
//! Maps a quotation's selected services and activities into the flat
//! line structure rendered on invoices and quotation PDFs.

mod assembler;

pub use assembler::{
    assemble, BillingDocument, BillingItem, BillingLine, BillingSection,
};
