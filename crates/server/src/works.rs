//! # Company and Work-Order Handlers
//!
//! Company lookup plus the work-order CRUD surface. Work-order writes are
//! normalized through the edit-report workflow so that progress stays
//! derived from the report status and every write leaves an audit entry.

use axum::{extract::Path, Json};
use entity::{companies, work_orders};
use error::{AppError, Result};
use reconcile::{ReportEdit, WorkOrderEdit};
use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    dto::works::{CompanyResponse, CreateWorkOrderRequest, UpdateWorkOrderRequest, WorkOrderResponse},
    middleware::auth::SessionContext,
    AppState,
};

/// List companies (public).
pub async fn list_companies_handler(state: &AppState) -> Result<Json<Vec<CompanyResponse>>> {
    let companies = companies::Entity::find()
        .order_by_asc(companies::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(CompanyResponse::from)
        .collect();

    Ok(Json(companies))
}

/// Create a work order against a report (manager only).
pub async fn create_work_order_handler_inner(
    state: &AppState,
    ctx: &SessionContext,
    Json(req): Json<CreateWorkOrderRequest>,
) -> Result<Json<WorkOrderResponse>> {
    ctx.require_manager()?;

    let outcome = state
        .engine()
        .apply_report_edit(
            req.report_id,
            ReportEdit::default(),
            Some(WorkOrderEdit {
                company_id: req.company_id,
                budget:     req.budget,
                start_date: req.start_date,
                end_date:   req.end_date,
            }),
        )
        .await?;

    let work_order = outcome
        .work_order
        .ok_or_else(|| AppError::internal("work-order edit produced no work order"))?;

    Ok(Json(work_order.into()))
}

/// Update a work order by id (manager only).
pub async fn update_work_order_handler_inner(
    state: &AppState,
    ctx: &SessionContext,
    Path(work_order_id): Path<i32>,
    Json(req): Json<UpdateWorkOrderRequest>,
) -> Result<Json<WorkOrderResponse>> {
    ctx.require_manager()?;

    let existing = work_orders::Entity::find_by_id(work_order_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Travaux {} introuvables", work_order_id)))?;

    let outcome = state
        .engine()
        .apply_report_edit(
            existing.report_id,
            ReportEdit::default(),
            Some(WorkOrderEdit {
                company_id: req.company_id,
                budget:     req.budget,
                start_date: req.start_date,
                end_date:   req.end_date,
            }),
        )
        .await?;

    let work_order = outcome
        .work_order
        .ok_or_else(|| AppError::internal("work-order edit produced no work order"))?;

    Ok(Json(work_order.into()))
}
