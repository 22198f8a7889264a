//! # Company and Work-Order Data Transfer Objects

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Company returned by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyResponse {
    pub id:   i32,
    pub name: String,
}

impl From<entity::companies::Model> for CompanyResponse {
    fn from(company: entity::companies::Model) -> Self {
        Self {
            id:   company.id,
            name: company.name,
        }
    }
}

/// Request body for creating a work order against a report
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateWorkOrderRequest {
    /// Primary-store id of the report being remediated
    pub report_id: i32,

    pub company_id: Option<i32>,

    pub budget: Option<Decimal>,

    pub start_date: Option<chrono::NaiveDate>,

    pub end_date: Option<chrono::NaiveDate>,
}

/// Request body for updating a work order. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UpdateWorkOrderRequest {
    pub company_id: Option<i32>,

    pub budget: Option<Decimal>,

    pub start_date: Option<chrono::NaiveDate>,

    pub end_date: Option<chrono::NaiveDate>,
}

/// Work order returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkOrderResponse {
    pub id:         i32,
    pub doc_id:     Option<String>,
    pub report_id:  i32,
    pub company_id: Option<i32>,
    pub budget:     Option<Decimal>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date:   Option<chrono::NaiveDate>,
    pub progress:   Decimal,
}

impl From<entity::work_orders::Model> for WorkOrderResponse {
    fn from(work_order: entity::work_orders::Model) -> Self {
        Self {
            id:         work_order.id,
            doc_id:     work_order.doc_id,
            report_id:  work_order.report_id,
            company_id: work_order.company_id,
            budget:     work_order.budget,
            start_date: work_order.start_date,
            end_date:   work_order.end_date,
            progress:   work_order.progress,
        }
    }
}

/// Audit entry returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntryResponse {
    pub id:            i32,
    pub work_order_id: i32,
    pub modified_at:   String,
    pub progress:      Decimal,
    pub comment:       String,
}

impl From<entity::audit_entries::Model> for AuditEntryResponse {
    fn from(entry: entity::audit_entries::Model) -> Self {
        Self {
            id:            entry.id,
            work_order_id: entry.work_order_id,
            modified_at:   entry.modified_at.to_rfc3339(),
            progress:      entry.progress,
            comment:       entry.comment,
        }
    }
}
