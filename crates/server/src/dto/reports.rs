//! # Report Data Transfer Objects
//!
//! The edit request mirrors the edit-report workflow: scalar report fields
//! plus optional work-order fields. Progress never appears in a request;
//! it is derived from the status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::works::{AuditEntryResponse, WorkOrderResponse};

/// Request body for editing a report
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EditReportRequest {
    /// New status (`nouveau`, `en cours`, `terminé`)
    pub status: Option<String>,

    pub problem_type: Option<String>,

    pub description: Option<String>,

    pub surface: Option<Decimal>,

    /// Work-order fields; presence triggers the work-order upsert and one
    /// audit entry
    #[serde(default)]
    pub work_order: Option<WorkOrderFields>,
}

/// Work-order half of a report edit
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WorkOrderFields {
    pub company_id: Option<i32>,
    pub budget:     Option<Decimal>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date:   Option<chrono::NaiveDate>,
}

/// Report state returned after an edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResponse {
    pub id:           i32,
    pub doc_id:       String,
    pub latitude:     Decimal,
    pub longitude:    Decimal,
    pub surface:      Option<Decimal>,
    pub problem_type: Option<String>,
    pub description:  Option<String>,
    pub status:       String,
    pub reporter_id:  Option<String>,
}

impl From<entity::reports::Model> for ReportResponse {
    fn from(report: entity::reports::Model) -> Self {
        Self {
            id:           report.id,
            doc_id:       report.doc_id,
            latitude:     report.latitude,
            longitude:    report.longitude,
            surface:      report.surface,
            problem_type: report.problem_type,
            description:  report.description,
            status:       report.status,
            reporter_id:  report.reporter_id,
        }
    }
}

/// Everything an edit produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditReportResponse {
    pub report: ReportResponse,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_order: Option<WorkOrderResponse>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_entry: Option<AuditEntryResponse>,
}
