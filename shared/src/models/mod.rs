//! Data models
//!
//! Shared between portal-server and frontend (via API).
//! All document ids are strings; array elements carry a uuid `key`
//! used for targeted element updates.

pub mod catalog;
pub mod file_ref;
pub mod payment;
pub mod quotation;

// Re-exports
pub use catalog::*;
pub use file_ref::*;
pub use payment::*;
pub use quotation::*;
