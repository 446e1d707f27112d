//! Laboratory services portal server
//!
//! Backend for the quotation-to-payment workflow of a materials
//! testing laboratory:
//!
//! - **quotations**: lifecycle actions, state resolver, payment ledger
//! - **billing**: display-ready billing document assembly
//! - **pdf**: invoice and receipt document rendering
//! - **catalog**: standards, sample classes, test methods, services
//! - **files**: upload storage and orphaned-file reclamation
//! - **store**: version-checked document store
//! - **api**: HTTP routes and the principal extractor
//!
//! ```text
//! portal-server/src/
//! ├── core/          # config, state, server, errors
//! ├── api/           # HTTP routes and handlers
//! ├── quotations/    # lifecycle actions, resolver, ledger
//! ├── billing/       # billing document assembly
//! ├── pdf/           # document model and renderers
//! ├── money/         # decimal money arithmetic
//! ├── catalog/       # catalog service with deletion guard
//! ├── files/         # file storage and orphan sweeper
//! └── store/         # document store traits and memory impl
//! ```

pub mod api;
pub mod billing;
pub mod catalog;
pub mod core;
pub mod files;
pub mod logging;
pub mod money;
pub mod pdf;
pub mod quotations;
pub mod store;

pub use core::{Config, Server, ServerState};
