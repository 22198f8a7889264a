//! # Routier Reconciliation
//!
//! Keeps the authoritative relational store and the secondary document
//! store consistent for users, reports, and work orders.
//!
//! ## Modules
//!
//! - [`progress`]: canonical progress derivation from report status
//! - [`dto`]: typed documents at the secondary-store ingestion boundary
//! - [`store`]: the [`store::DocumentStore`] trait and its backends
//! - [`engine`]: the reconciliation engine (sync, import, merged view,
//!   dual-write edits)

pub mod dto;
pub mod engine;
pub mod progress;
pub mod store;

pub use dto::{AuditEntryDoc, Document, ReportDoc, UserDoc, WorkOrderDoc};
pub use engine::{ReconciliationEngine, ReportEdit, ReportView, WorkOrderEdit};
pub use store::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
