//! The reconciliation engine.
//!
//! Reads from the primary (relational) and secondary (document) stores,
//! joins entities, performs idempotent upserts, and issues dual writes for
//! edits. Consistency between the two stores is best-effort: a primary
//! write failure surfaces to the caller, a secondary write failure after a
//! successful primary write is logged and the stores are allowed to
//! diverge until the next sync or edit touches the record.

use std::{collections::HashMap, sync::Arc};

use chrono::{NaiveDate, Utc};
use entity::{audit_entries, companies, reports, users, work_orders, UserRole};
use error::{AppError, Result};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    dto::{AuditEntryDoc, Document, ReportDoc, WorkOrderDoc},
    progress::{comment_for, is_known_status, progress_for},
    store::DocumentStore,
};

/// Placeholder shown when a work order references a company id that has no
/// match in the primary store. A lookup miss is never an error.
pub const UNKNOWN_COMPANY: &str = "Entreprise inconnue";

/// Password assigned to users created by `sync_users` whose secondary
/// record carries none. Hashed like any other credential.
const DEFAULT_SYNC_PASSWORD: &str = "motdepasse-a-changer";

/// Outcome counters for a user synchronization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Users created in the primary store.
    pub created: usize,
    /// Users already present (matched by email).
    pub skipped: usize,
    /// Records that failed and were passed over.
    pub failed:  usize,
}

/// Outcome counters for a report import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Reports created in the primary store.
    pub reports_created:     usize,
    /// Work orders created in the primary store.
    pub work_orders_created: usize,
    /// Documents already imported (matched by doc id).
    pub skipped:             usize,
    /// Records that failed and were passed over.
    pub failed:              usize,
}

/// One row of the merged report view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub doc_id:       String,
    pub latitude:     Decimal,
    pub longitude:    Decimal,
    pub surface:      Option<Decimal>,
    pub problem_type: Option<String>,
    pub description:  Option<String>,
    pub status:       String,
    pub reporter_id:  Option<String>,
    pub created_at:   Option<chrono::DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_order:   Option<WorkOrderView>,
}

/// Work-order half of the merged view, with the company name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkOrderView {
    pub doc_id:       String,
    pub company_id:   Option<i32>,
    pub company_name: String,
    pub budget:       Option<Decimal>,
    pub start_date:   Option<NaiveDate>,
    pub end_date:     Option<NaiveDate>,
    pub progress:     Decimal,
}

/// Scalar report fields of an edit. `None` leaves the stored value as is.
#[derive(Debug, Clone, Default)]
pub struct ReportEdit {
    pub status:       Option<String>,
    pub problem_type: Option<String>,
    pub description:  Option<String>,
    pub surface:      Option<Decimal>,
}

/// Work-order fields of an edit.
#[derive(Debug, Clone, Default)]
pub struct WorkOrderEdit {
    pub company_id: Option<i32>,
    pub budget:     Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date:   Option<NaiveDate>,
}

/// What an edit produced, after all writes resolved.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub report:      reports::Model,
    pub work_order:  Option<work_orders::Model>,
    pub audit_entry: Option<audit_entries::Model>,
}

/// Reads both stores, joins entities, and issues idempotent upserts and
/// dual writes.
pub struct ReconciliationEngine {
    db:   DbConn,
    docs: Arc<dyn DocumentStore>,
}

impl ReconciliationEngine {
    /// Create an engine over the given store handles.
    #[must_use]
    pub fn new(db: DbConn, docs: Arc<dyn DocumentStore>) -> Self {
        Self {
            db,
            docs,
        }
    }

    /// Create any secondary-store user missing from the primary store.
    ///
    /// Existence is checked by email equality before every insert, so
    /// repeated calls never create duplicates. Per-record failures are
    /// logged and do not abort the batch. Existing primary users are never
    /// updated or deleted.
    pub async fn sync_users(&self) -> Result<SyncSummary> {
        let docs = self.docs.list_users().await?;
        let mut summary = SyncSummary::default();

        for doc in &docs {
            match self.sync_one_user(doc).await {
                Ok(true) => summary.created += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    warn!(doc_id = %doc.id, error = %e, "Failed to sync user, continuing");
                    summary.failed += 1;
                },
            }
        }

        info!(
            created = summary.created,
            skipped = summary.skipped,
            failed = summary.failed,
            "User synchronization finished"
        );
        Ok(summary)
    }

    async fn sync_one_user(&self, doc: &Document<crate::dto::UserDoc>) -> Result<bool> {
        let email = doc.data.email.trim();
        if email.is_empty() {
            return Err(AppError::validation("user document has an empty email"));
        }

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let password = doc
            .data
            .password
            .clone()
            .unwrap_or_else(|| DEFAULT_SYNC_PASSWORD.to_string());
        let password_hash = auth::hash_password(&auth::secrecy::SecretString::from(password))
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

        let now = Utc::now();
        users::ActiveModel {
            username: Set(doc.data.username.clone()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            role: Set(UserRole::Reporter),
            blocked: Set(false),
            failed_attempts: Set(0),
            created_at: Set(doc.data.created_at.unwrap_or(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(email = %email, "Created primary-store user from secondary record");
        Ok(true)
    }

    /// Import secondary-store reports and work orders into the primary
    /// store, keyed by document id. Create-only: rows that already exist
    /// are left untouched, so repeated calls are idempotent.
    pub async fn import_reports(&self) -> Result<ImportSummary> {
        let report_docs = self.docs.list_reports().await?;
        let work_order_docs = self.docs.list_work_orders().await?;
        let mut summary = ImportSummary::default();

        for doc in &report_docs {
            match self.import_one_report(doc).await {
                Ok(true) => summary.reports_created += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    warn!(doc_id = %doc.id, error = %e, "Failed to import report, continuing");
                    summary.failed += 1;
                },
            }
        }

        for doc in &work_order_docs {
            match self.import_one_work_order(doc).await {
                Ok(true) => summary.work_orders_created += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    warn!(doc_id = %doc.id, error = %e, "Failed to import work order, continuing");
                    summary.failed += 1;
                },
            }
        }

        info!(
            reports = summary.reports_created,
            work_orders = summary.work_orders_created,
            skipped = summary.skipped,
            failed = summary.failed,
            "Report import finished"
        );
        Ok(summary)
    }

    async fn import_one_report(&self, doc: &Document<ReportDoc>) -> Result<bool> {
        let existing = reports::Entity::find()
            .filter(reports::Column::DocId.eq(&doc.id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        reports::ActiveModel {
            doc_id: Set(doc.id.clone()),
            latitude: Set(doc.data.latitude),
            longitude: Set(doc.data.longitude),
            surface: Set(doc.data.surface),
            problem_type: Set(doc.data.problem_type.clone()),
            description: Set(doc.data.description.clone()),
            status: Set(doc.data.status.clone()),
            reporter_id: Set(doc.data.reporter_id.clone()),
            created_at: Set(doc.data.created_at.unwrap_or_else(Utc::now)),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(true)
    }

    async fn import_one_work_order(&self, doc: &Document<WorkOrderDoc>) -> Result<bool> {
        let existing = work_orders::Entity::find()
            .filter(work_orders::Column::DocId.eq(&doc.id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let report = reports::Entity::find()
            .filter(reports::Column::DocId.eq(&doc.data.report_doc_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "work order references unknown report {}",
                    doc.data.report_doc_id
                ))
            })?;

        let company_id = match doc.data.company_id {
            Some(id) => {
                let company = companies::Entity::find_by_id(id).one(&self.db).await?;
                if company.is_none() {
                    warn!(doc_id = %doc.id, company_id = id, "Work order references unknown company");
                }
                company.map(|c| c.id)
            },
            None => None,
        };

        let progress = doc.data.progress.unwrap_or(Decimal::ZERO);
        if progress < Decimal::ZERO || progress > Decimal::from(100) {
            return Err(AppError::validation(format!(
                "work order progress {} out of range",
                progress
            )));
        }

        work_orders::ActiveModel {
            doc_id: Set(Some(doc.id.clone())),
            report_id: Set(report.id),
            company_id: Set(company_id),
            budget: Set(doc.data.budget),
            start_date: Set(doc.data.start_date),
            end_date: Set(doc.data.end_date),
            progress: Set(progress),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(true)
    }

    /// Build the merged read-only view rendered by the UI: reports and
    /// work orders from the secondary store, company names from the
    /// primary store. Writes nothing.
    pub async fn sync_reports(&self) -> Result<Vec<ReportView>> {
        let report_docs = self.docs.list_reports().await?;
        let work_order_docs = self.docs.list_work_orders().await?;
        let companies = companies::Entity::find().all(&self.db).await?;

        let company_names: HashMap<i32, String> =
            companies.into_iter().map(|c| (c.id, c.name)).collect();

        let views = report_docs
            .into_iter()
            .map(|report| {
                let matches: Vec<&Document<WorkOrderDoc>> = work_order_docs
                    .iter()
                    .filter(|w| w.data.report_doc_id == report.id)
                    .collect();

                let work_order = pick_work_order(&report.id, &matches).map(|w| {
                    WorkOrderView {
                        doc_id:       w.id.clone(),
                        company_id:   w.data.company_id,
                        company_name: w
                            .data
                            .company_id
                            .and_then(|id| company_names.get(&id).cloned())
                            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
                        budget:       w.data.budget,
                        start_date:   w.data.start_date,
                        end_date:     w.data.end_date,
                        progress:     w.data.progress.unwrap_or(Decimal::ZERO),
                    }
                });

                ReportView {
                    doc_id: report.id,
                    latitude: report.data.latitude,
                    longitude: report.data.longitude,
                    surface: report.data.surface,
                    problem_type: report.data.problem_type,
                    description: report.data.description,
                    status: report.data.status,
                    reporter_id: report.data.reporter_id,
                    created_at: report.data.created_at,
                    work_order,
                }
            })
            .collect();

        Ok(views)
    }

    /// Apply an edit to a report, and optionally to its work order, in
    /// both stores.
    ///
    /// Validation happens before any write. The primary-store writes
    /// surface their errors; secondary-store writes after a successful
    /// primary write are logged on failure and never retried or rolled
    /// back. When work-order fields are present the progress is derived
    /// from the edited status and exactly one audit entry is appended.
    pub async fn apply_report_edit(
        &self,
        report_id: i32,
        edit: ReportEdit,
        work_order_edit: Option<WorkOrderEdit>,
    ) -> Result<EditOutcome> {
        validate_edit(&edit, work_order_edit.as_ref())?;

        let report = reports::Entity::find_by_id(report_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Signalement {} introuvable", report_id)))?;

        // Primary write first; its failure is the caller's problem. An
        // edit with no scalar fields (work-order-only) skips the UPDATE.
        let has_report_changes = edit.status.is_some()
            || edit.problem_type.is_some()
            || edit.description.is_some()
            || edit.surface.is_some();
        let report = if has_report_changes {
            let mut active: reports::ActiveModel = report.into();
            if let Some(status) = edit.status {
                active.status = Set(status);
            }
            if let Some(problem_type) = edit.problem_type {
                active.problem_type = Set(Some(problem_type));
            }
            if let Some(description) = edit.description {
                active.description = Set(Some(description));
            }
            if let Some(surface) = edit.surface {
                active.surface = Set(Some(surface));
            }
            active.update(&self.db).await?
        }
        else {
            report
        };

        // Secondary mirror is best-effort.
        let report_doc = report_to_doc(&report);
        if let Err(e) = self.docs.upsert_report(&report.doc_id, &report_doc).await {
            warn!(doc_id = %report.doc_id, error = %e, "Secondary report write failed, stores diverge until next sync");
        }

        let (work_order, audit_entry) = match work_order_edit {
            Some(wo_edit) => {
                let (work_order, audit_entry) = self.apply_work_order_edit(&report, wo_edit).await?;
                (Some(work_order), Some(audit_entry))
            },
            None => (None, None),
        };

        Ok(EditOutcome {
            report,
            work_order,
            audit_entry,
        })
    }

    async fn apply_work_order_edit(
        &self,
        report: &reports::Model,
        edit: WorkOrderEdit,
    ) -> Result<(work_orders::Model, audit_entries::Model)> {
        let progress = progress_for(&report.status);
        let comment = comment_for(&report.status);

        let existing = work_orders::Entity::find()
            .filter(work_orders::Column::ReportId.eq(report.id))
            .order_by_asc(work_orders::Column::Id)
            .one(&self.db)
            .await?;

        let work_order = match existing {
            Some(model) => {
                let doc_id = model
                    .doc_id
                    .clone()
                    .unwrap_or_else(|| cuid2::cuid());
                let mut active: work_orders::ActiveModel = model.into();
                active.doc_id = Set(Some(doc_id));
                if let Some(company_id) = edit.company_id {
                    active.company_id = Set(Some(company_id));
                }
                if let Some(budget) = edit.budget {
                    active.budget = Set(Some(budget));
                }
                if let Some(start_date) = edit.start_date {
                    active.start_date = Set(Some(start_date));
                }
                if let Some(end_date) = edit.end_date {
                    active.end_date = Set(Some(end_date));
                }
                active.progress = Set(progress);
                active.update(&self.db).await?
            },
            None => {
                work_orders::ActiveModel {
                    doc_id: Set(Some(cuid2::cuid())),
                    report_id: Set(report.id),
                    company_id: Set(edit.company_id),
                    budget: Set(edit.budget),
                    start_date: Set(edit.start_date),
                    end_date: Set(edit.end_date),
                    progress: Set(progress),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            },
        };

        let work_order_doc_id = work_order
            .doc_id
            .clone()
            .unwrap_or_else(|| work_order.id.to_string());
        let work_order_doc = WorkOrderDoc {
            report_doc_id: report.doc_id.clone(),
            company_id:    work_order.company_id,
            budget:        work_order.budget,
            start_date:    work_order.start_date,
            end_date:      work_order.end_date,
            progress:      Some(work_order.progress),
        };
        if let Err(e) = self
            .docs
            .upsert_work_order(&work_order_doc_id, &work_order_doc)
            .await
        {
            warn!(doc_id = %work_order_doc_id, error = %e, "Secondary work-order write failed, stores diverge until next sync");
        }

        // One audit entry per create/update; corrections are new entries.
        let modified_at = Utc::now();
        let audit_doc_id = cuid2::cuid();
        let audit_entry = audit_entries::ActiveModel {
            doc_id: Set(Some(audit_doc_id.clone())),
            work_order_id: Set(work_order.id),
            modified_at: Set(modified_at),
            progress: Set(progress),
            comment: Set(comment.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        let audit_doc = AuditEntryDoc {
            work_order_doc_id,
            modified_at,
            progress,
            comment: comment.to_string(),
        };
        if let Err(e) = self.docs.append_audit_entry(&audit_doc_id, &audit_doc).await {
            warn!(doc_id = %audit_doc_id, error = %e, "Secondary audit write failed, stores diverge until next sync");
        }

        Ok((work_order, audit_entry))
    }
}

/// Resolve the authoritative work order for a report when the secondary
/// store holds several. Latest start date wins; documents without a start
/// date are least preferred; ties keep the first encountered.
fn pick_work_order<'a>(
    report_doc_id: &str,
    candidates: &[&'a Document<WorkOrderDoc>],
) -> Option<&'a Document<WorkOrderDoc>> {
    if candidates.len() > 1 {
        warn!(
            report_doc_id = %report_doc_id,
            count = candidates.len(),
            "Multiple work orders reference one report, taking the latest start date"
        );
    }

    let mut best = *candidates.first()?;
    for candidate in &candidates[1 ..] {
        if candidate.data.start_date > best.data.start_date {
            best = candidate;
        }
    }
    Some(best)
}

fn report_to_doc(report: &reports::Model) -> ReportDoc {
    ReportDoc {
        latitude:     report.latitude,
        longitude:    report.longitude,
        reporter_id:  report.reporter_id.clone(),
        surface:      report.surface,
        problem_type: report.problem_type.clone(),
        description:  report.description.clone(),
        status:       report.status.clone(),
        created_at:   Some(report.created_at),
    }
}

fn validate_edit(edit: &ReportEdit, work_order: Option<&WorkOrderEdit>) -> Result<()> {
    if let Some(status) = &edit.status {
        if !is_known_status(status) {
            return Err(AppError::validation(format!("Statut inconnu: {}", status)));
        }
    }

    if let Some(wo) = work_order {
        if let Some(budget) = wo.budget {
            if budget < Decimal::ZERO {
                return Err(AppError::validation("Le budget ne peut pas être négatif"));
            }
        }
        if let (Some(start), Some(end)) = (wo.start_date, wo.end_date) {
            if end < start {
                return Err(AppError::validation(
                    "La date de fin précède la date de début",
                ));
            }
        }
    }

    Ok(())
}
