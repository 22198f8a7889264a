//! Integration tests for the reconciliation engine against an in-memory
//! primary store (sqlite) and the in-memory document store.

use std::sync::Arc;

use async_trait::async_trait;
use entity::{audit_entries, companies, reports, users, work_orders};
use error::{AppError, Result};
use migration::{Migrator, MigratorTrait};
use reconcile::{
    store::{COLLECTION_AUDIT_ENTRIES, COLLECTION_WORK_ORDERS},
    AuditEntryDoc, Document, DocumentStore, MemoryDocumentStore, ReconciliationEngine, ReportDoc,
    ReportEdit, UserDoc, WorkOrderDoc, WorkOrderEdit,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DbConn, EntityTrait, QueryFilter, Set};
use serde_json::json;

async fn test_db() -> DbConn {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

async fn seed_company(db: &DbConn, id: i32, name: &str) {
    companies::ActiveModel {
        id:   Set(id),
        name: Set(name.to_string()),
    }
    .insert(db)
    .await
    .expect("seed company");
}

async fn setup() -> (DbConn, Arc<MemoryDocumentStore>, ReconciliationEngine) {
    let db = test_db().await;
    let docs = Arc::new(MemoryDocumentStore::new());
    let engine = ReconciliationEngine::new(db.clone(), docs.clone());
    (db, docs, engine)
}

#[tokio::test]
async fn sync_users_creates_missing_user_once() {
    let (db, docs, engine) = setup().await;

    docs.insert(
        "utilisateurs",
        "u-1",
        json!({"nomUtilisateur": "alice", "email": "a@x.com", "motDePasse": "Secret123"}),
    )
    .await;

    let first = engine.sync_users().await.unwrap();
    assert_eq!(first.created, 1);
    assert_eq!(first.failed, 0);

    // Second run against the same snapshot must not create a duplicate.
    let second = engine.sync_users().await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 1);

    let matching = users::Entity::find()
        .filter(users::Column::Email.eq("a@x.com"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].username, "alice");
    assert!(!matching[0].blocked);
}

#[tokio::test]
async fn sync_users_applies_default_password_and_survives_bad_records() {
    let (db, docs, engine) = setup().await;

    docs.insert(
        "utilisateurs",
        "u-1",
        json!({"nomUtilisateur": "bob", "email": "b@x.com"}),
    )
    .await;
    // Parses but is rejected by the engine: empty email.
    docs.insert(
        "utilisateurs",
        "u-2",
        json!({"nomUtilisateur": "ghost", "email": "  "}),
    )
    .await;

    let summary = engine.sync_users().await.unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed, 1);

    let bob = users::Entity::find()
        .filter(users::Column::Email.eq("b@x.com"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    // Default credential is hashed, never stored in clear.
    assert!(bob.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn sync_reports_joins_work_orders_and_resolves_companies() {
    let (db, docs, engine) = setup().await;
    seed_company(&db, 7, "Travaux Publics SA").await;

    docs.insert(
        "signalements",
        "sig-1",
        json!({"latitude": -18.9, "longitude": 47.5, "statut": "en cours", "surface": 12}),
    )
    .await;
    docs.insert(
        "signalements",
        "sig-2",
        json!({"latitude": -18.8, "longitude": 47.6, "statut": "nouveau"}),
    )
    .await;
    docs.insert(
        "travaux",
        "t-1",
        json!({"id_signalement": "sig-1", "id_entreprise": 7, "budget": 1000, "avancement": 50}),
    )
    .await;

    let views = engine.sync_reports().await.unwrap();
    assert_eq!(views.len(), 2);

    let with_work = views.iter().find(|v| v.doc_id == "sig-1").unwrap();
    let work_order = with_work.work_order.as_ref().unwrap();
    assert_eq!(work_order.company_name, "Travaux Publics SA");
    assert_eq!(work_order.progress, dec!(50));

    let without_work = views.iter().find(|v| v.doc_id == "sig-2").unwrap();
    assert!(without_work.work_order.is_none());
}

#[tokio::test]
async fn sync_reports_substitutes_placeholder_for_unknown_company() {
    let (_db, docs, engine) = setup().await;

    docs.insert(
        "signalements",
        "sig-1",
        json!({"latitude": 0.0, "longitude": 0.0, "statut": "en cours"}),
    )
    .await;
    docs.insert(
        "travaux",
        "t-1",
        json!({"id_signalement": "sig-1", "id_entreprise": 99, "avancement": 50}),
    )
    .await;

    let views = engine.sync_reports().await.unwrap();
    let work_order = views[0].work_order.as_ref().unwrap();
    assert_eq!(work_order.company_name, "Entreprise inconnue");
    assert_eq!(work_order.company_id, Some(99));
}

#[tokio::test]
async fn import_reports_is_idempotent() {
    let (db, docs, engine) = setup().await;
    seed_company(&db, 7, "Travaux Publics SA").await;

    docs.insert(
        "signalements",
        "sig-1",
        json!({"latitude": "-18.9", "longitude": "47.5", "statut": "nouveau", "Id_User": "u-9"}),
    )
    .await;
    docs.insert(
        "travaux",
        "t-1",
        json!({"id_signalement": "sig-1", "id_entreprise": "7", "budget": "2500.50", "avancement": 0}),
    )
    .await;

    let first = engine.import_reports().await.unwrap();
    assert_eq!(first.reports_created, 1);
    assert_eq!(first.work_orders_created, 1);

    let second = engine.import_reports().await.unwrap();
    assert_eq!(second.reports_created, 0);
    assert_eq!(second.work_orders_created, 0);
    assert_eq!(second.skipped, 2);

    let report = reports::Entity::find()
        .filter(reports::Column::DocId.eq("sig-1"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.reporter_id.as_deref(), Some("u-9"));

    let work_order = work_orders::Entity::find()
        .filter(work_orders::Column::DocId.eq("t-1"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(work_order.report_id, report.id);
    assert_eq!(work_order.budget, Some(dec!(2500.50)));
}

/// Scenario: edit a report that has no work order yet, supplying
/// in-progress status and work-order fields. A work order is created with
/// progress 50 and exactly one audit entry is appended.
#[tokio::test]
async fn edit_creates_work_order_with_derived_progress() {
    let (db, docs, engine) = setup().await;
    seed_company(&db, 7, "Travaux Publics SA").await;

    docs.insert(
        "signalements",
        "sig-1",
        json!({"latitude": -18.9, "longitude": 47.5, "statut": "nouveau"}),
    )
    .await;
    engine.import_reports().await.unwrap();
    let report = reports::Entity::find()
        .filter(reports::Column::DocId.eq("sig-1"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let outcome = engine
        .apply_report_edit(
            report.id,
            ReportEdit {
                status: Some("en cours".to_string()),
                ..Default::default()
            },
            Some(WorkOrderEdit {
                company_id: Some(7),
                budget:     Some(dec!(1000)),
                start_date: Some("2024-01-01".parse().unwrap()),
                end_date:   Some("2024-02-01".parse().unwrap()),
            }),
        )
        .await
        .unwrap();

    let work_order = outcome.work_order.unwrap();
    assert_eq!(work_order.progress, dec!(50));
    assert_eq!(work_order.company_id, Some(7));
    assert_eq!(work_order.budget, Some(dec!(1000)));

    let entries = audit_entries::Entity::find().all(&db).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].progress, dec!(50));
    assert_eq!(entries[0].comment, "Travaux en cours");

    // Both stores saw the edit.
    assert_eq!(docs.count(COLLECTION_WORK_ORDERS).await, 1);
    assert_eq!(docs.count(COLLECTION_AUDIT_ENTRIES).await, 1);
}

/// Scenario: a later edit moves the same report to done. The existing work
/// order's progress becomes 100 and a second, distinct audit entry is
/// appended; the first entry is untouched.
#[tokio::test]
async fn second_edit_appends_new_audit_entry() {
    let (db, docs, engine) = setup().await;
    seed_company(&db, 7, "Travaux Publics SA").await;

    docs.insert(
        "signalements",
        "sig-1",
        json!({"latitude": -18.9, "longitude": 47.5, "statut": "nouveau"}),
    )
    .await;
    engine.import_reports().await.unwrap();
    let report = reports::Entity::find()
        .filter(reports::Column::DocId.eq("sig-1"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let first = engine
        .apply_report_edit(
            report.id,
            ReportEdit {
                status: Some("en cours".to_string()),
                ..Default::default()
            },
            Some(WorkOrderEdit {
                company_id: Some(7),
                budget:     Some(dec!(1000)),
                start_date: Some("2024-01-01".parse().unwrap()),
                end_date:   Some("2024-02-01".parse().unwrap()),
            }),
        )
        .await
        .unwrap();
    let first_work_order = first.work_order.unwrap();

    let second = engine
        .apply_report_edit(
            report.id,
            ReportEdit {
                status: Some("terminé".to_string()),
                ..Default::default()
            },
            Some(WorkOrderEdit::default()),
        )
        .await
        .unwrap();
    let second_work_order = second.work_order.unwrap();

    // Same work order, updated in place.
    assert_eq!(second_work_order.id, first_work_order.id);
    assert_eq!(second_work_order.progress, dec!(100));
    assert_eq!(second_work_order.company_id, Some(7));

    let entries = audit_entries::Entity::find().all(&db).await.unwrap();
    assert_eq!(entries.len(), 2);
    let first_entry = entries.iter().find(|e| e.progress == dec!(50)).unwrap();
    let second_entry = entries.iter().find(|e| e.progress == dec!(100)).unwrap();
    assert_ne!(first_entry.id, second_entry.id);
    assert_eq!(first_entry.comment, "Travaux en cours");
    assert_eq!(second_entry.comment, "Travaux terminés");

    assert_eq!(docs.count(COLLECTION_AUDIT_ENTRIES).await, 2);
}

#[tokio::test]
async fn edit_validation_rejects_before_any_write() {
    let (db, docs, engine) = setup().await;

    docs.insert(
        "signalements",
        "sig-1",
        json!({"latitude": -18.9, "longitude": 47.5, "statut": "nouveau"}),
    )
    .await;
    engine.import_reports().await.unwrap();
    let report = reports::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    let result = engine
        .apply_report_edit(
            report.id,
            ReportEdit {
                status: Some("en cours".to_string()),
                ..Default::default()
            },
            Some(WorkOrderEdit {
                budget: Some(dec!(-1)),
                ..Default::default()
            }),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation { .. })));

    // No partial write happened.
    let stored = reports::Entity::find_by_id(report.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "nouveau");
    assert!(work_orders::Entity::find().all(&db).await.unwrap().is_empty());
}

/// A secondary store that accepts reads but fails every write.
struct WriteFailingStore {
    inner: MemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for WriteFailingStore {
    async fn list_users(&self) -> Result<Vec<Document<UserDoc>>> { self.inner.list_users().await }

    async fn list_reports(&self) -> Result<Vec<Document<ReportDoc>>> { self.inner.list_reports().await }

    async fn list_work_orders(&self) -> Result<Vec<Document<WorkOrderDoc>>> {
        self.inner.list_work_orders().await
    }

    async fn upsert_report(&self, _id: &str, _doc: &ReportDoc) -> Result<()> {
        Err(AppError::transport("document store unavailable"))
    }

    async fn upsert_work_order(&self, _id: &str, _doc: &WorkOrderDoc) -> Result<()> {
        Err(AppError::transport("document store unavailable"))
    }

    async fn append_audit_entry(&self, _id: &str, _doc: &AuditEntryDoc) -> Result<()> {
        Err(AppError::transport("document store unavailable"))
    }
}

/// A failed secondary write after a successful primary write is logged,
/// not surfaced: the edit still succeeds and the stores diverge until the
/// next sync.
#[tokio::test]
async fn secondary_write_failure_does_not_fail_the_edit() {
    let db = test_db().await;
    let inner = MemoryDocumentStore::new();
    inner
        .insert(
            "signalements",
            "sig-1",
            json!({"latitude": -18.9, "longitude": 47.5, "statut": "nouveau"}),
        )
        .await;
    let docs = Arc::new(WriteFailingStore {
        inner,
    });
    let engine = ReconciliationEngine::new(db.clone(), docs);

    engine.import_reports().await.unwrap();
    let report = reports::Entity::find().one(&db).await.unwrap().unwrap();

    let outcome = engine
        .apply_report_edit(
            report.id,
            ReportEdit {
                status: Some("en cours".to_string()),
                ..Default::default()
            },
            Some(WorkOrderEdit {
                budget: Some(Decimal::from(500)),
                ..Default::default()
            }),
        )
        .await
        .expect("edit must succeed despite secondary failure");

    assert_eq!(outcome.work_order.unwrap().progress, dec!(50));
    // The primary store holds the authoritative result.
    let entries = audit_entries::Entity::find().all(&db).await.unwrap();
    assert_eq!(entries.len(), 1);
}
