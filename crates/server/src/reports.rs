//! # Report Handlers
//!
//! The merged report view, the edit-report workflow, and the
//! synchronization triggers. All writes go through the reconciliation
//! engine; nothing here touches either store directly.

use axum::{extract::Path, Json};
use error::Result;
use reconcile::{
    engine::{ImportSummary, SyncSummary},
    ReportEdit, ReportView, WorkOrderEdit,
};
use tracing::info;

use crate::{
    dto::reports::{EditReportRequest, EditReportResponse},
    middleware::auth::SessionContext,
    AppState,
};

/// List the merged report view (public).
///
/// Reports and work orders come from the secondary store, company names
/// from the primary store; a company id with no match resolves to the
/// placeholder label.
pub async fn list_reports_handler(state: &AppState) -> Result<Json<Vec<ReportView>>> {
    let views = state.engine().sync_reports().await?;
    Ok(Json(views))
}

/// Apply an edit to a report and optionally its work order (manager only).
pub async fn edit_report_handler_inner(
    state: &AppState,
    ctx: &SessionContext,
    Path(report_id): Path<i32>,
    Json(req): Json<EditReportRequest>,
) -> Result<Json<EditReportResponse>> {
    ctx.require_manager()?;

    let edit = ReportEdit {
        status:       req.status,
        problem_type: req.problem_type,
        description:  req.description,
        surface:      req.surface,
    };
    let work_order_edit = req.work_order.map(|wo| {
        WorkOrderEdit {
            company_id: wo.company_id,
            budget:     wo.budget,
            start_date: wo.start_date,
            end_date:   wo.end_date,
        }
    });

    let outcome = state
        .engine()
        .apply_report_edit(report_id, edit, work_order_edit)
        .await?;

    info!(report_id, edited_by = ctx.user_id, "Report edited");

    Ok(Json(EditReportResponse {
        report:      outcome.report.into(),
        work_order:  outcome.work_order.map(Into::into),
        audit_entry: outcome.audit_entry.map(Into::into),
    }))
}

/// Trigger user synchronization from the secondary store (manager only).
pub async fn sync_users_handler_inner(state: &AppState, ctx: &SessionContext) -> Result<Json<SyncSummary>> {
    ctx.require_manager()?;
    let summary = state.engine().sync_users().await?;
    Ok(Json(summary))
}

/// Trigger report/work-order import from the secondary store (manager
/// only).
pub async fn import_reports_handler_inner(state: &AppState, ctx: &SessionContext) -> Result<Json<ImportSummary>> {
    ctx.require_manager()?;
    let summary = state.engine().import_reports().await?;
    Ok(Json(summary))
}
