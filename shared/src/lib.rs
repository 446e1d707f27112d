//! Shared types for the laboratory services portal
//!
//! Domain documents, status vocabulary and utility types used by the
//! portal server and its clients.

pub mod models;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};
pub use types::{Principal, Role, Timestamp};
