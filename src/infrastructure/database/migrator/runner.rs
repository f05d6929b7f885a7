//! Linear migration runner
//!
//! Applies the ordered step list exactly once each and records every applied
//! version in the `migrations` table. Each step runs in its own transaction
//! together with its bookkeeping insert (or delete, on rollback), so a failed
//! step leaves neither schema changes nor a record behind.
//!
//! Checksums cover each step's source file, so a step edited after it was
//! applied is reported as a mismatch by `up`.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm_migration::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::migration;

/// One named schema step
pub struct MigrationDefinition {
    pub version: String,
    pub description: &'static str,
    /// Text of the step's definition, usually its source file
    source: &'static str,
    step: Box<dyn MigrationTrait>,
}

impl MigrationDefinition {
    /// The version is the step's migration name (its file stem).
    pub fn new<M: MigrationTrait + 'static>(step: M, description: &'static str) -> Self {
        Self {
            version: step.name().to_string(),
            description,
            source: "",
            step: Box::new(step),
        }
    }

    /// Include the step's source in the checksum, so editing its `up` or
    /// `down` body shows up as a mismatch.
    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = source;
        self
    }

    /// SHA-256 (hex) over version, description and source
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.as_bytes());
        hasher.update(b":");
        hasher.update(self.description.as_bytes());
        hasher.update(b":");
        hasher.update(self.source.as_bytes());
        hex::encode(hasher.finalize())
    }
}

pub struct MigrationRunner {
    db: DatabaseConnection,
    definitions: Vec<MigrationDefinition>,
}

impl MigrationRunner {
    pub fn new(db: DatabaseConnection, definitions: Vec<MigrationDefinition>) -> Self {
        Self { db, definitions }
    }

    /// Runner over the crate's own schema steps
    pub fn with_defaults(db: DatabaseConnection) -> Self {
        Self::new(db, super::definitions())
    }

    pub fn definitions(&self) -> &[MigrationDefinition] {
        &self.definitions
    }

    /// Create the bookkeeping table if it does not exist yet
    pub async fn ensure_table(&self) -> DomainResult<()> {
        SchemaManager::new(&self.db)
            .create_table(
                Table::create()
                    .table(Migrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Migrations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Migrations::Version)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Migrations::Description).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Migrations::AppliedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Migrations::Checksum).string_len(64).null())
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    /// Apply every pending step in declared order.
    ///
    /// Stops at the first failure; steps applied before it stay applied.
    /// Returns the versions applied by this call.
    pub async fn up(&self) -> DomainResult<Vec<String>> {
        self.ensure_table().await?;
        let applied = self.applied_records().await?;

        for version in self.checksum_mismatches(&applied) {
            warn!(version = %version, "Migration checksum differs from the applied record");
        }

        let mut ran = Vec::new();
        for definition in &self.definitions {
            if applied.contains_key(&definition.version) {
                continue;
            }
            self.apply(definition).await?;
            ran.push(definition.version.clone());
        }

        if ran.is_empty() {
            info!("Database schema is up to date");
        } else {
            info!(count = ran.len(), "Migrations applied");
        }
        Ok(ran)
    }

    /// Roll back a single applied version
    pub async fn down(&self, version: &str) -> DomainResult<()> {
        let definition = self
            .definitions
            .iter()
            .find(|d| d.version == version)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Migration",
                field: "version",
                value: version.to_string(),
            })?;

        self.ensure_table().await?;
        let record = migration::Entity::find()
            .filter(migration::Column::Version.eq(version))
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::NotApplied(version.to_string()))?;

        self.revert(definition, record.id).await
    }

    /// Applied records, oldest first
    pub async fn status(&self) -> DomainResult<Vec<migration::Model>> {
        self.ensure_table().await?;
        let records = migration::Entity::find()
            .order_by_asc(migration::Column::AppliedAt)
            .order_by_asc(migration::Column::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    /// Definitions not applied yet, in declared order
    pub async fn pending(&self) -> DomainResult<Vec<&MigrationDefinition>> {
        self.ensure_table().await?;
        let applied = self.applied_records().await?;
        Ok(self
            .definitions
            .iter()
            .filter(|d| !applied.contains_key(&d.version))
            .collect())
    }

    /// Roll back everything, drop the bookkeeping table and migrate from
    /// scratch. Destroys all data in the managed tables.
    pub async fn reset(&self) -> DomainResult<Vec<String>> {
        self.ensure_table().await?;
        let applied = self.applied_records().await?;

        for definition in self.definitions.iter().rev() {
            if let Some(record) = applied.get(&definition.version) {
                self.revert(definition, record.id).await?;
            }
        }

        SchemaManager::new(&self.db)
            .drop_table(Table::drop().table(Migrations::Table).if_exists().to_owned())
            .await?;
        warn!("Database reset, re-applying all migrations");

        self.up().await
    }

    /// Versions whose stored checksum no longer matches the definition
    pub fn checksum_mismatches(&self, applied: &HashMap<String, migration::Model>) -> Vec<String> {
        self.definitions
            .iter()
            .filter_map(|definition| {
                let stored = applied.get(&definition.version)?.checksum.as_deref()?;
                (stored != definition.checksum()).then(|| definition.version.clone())
            })
            .collect()
    }

    pub async fn applied_records(&self) -> DomainResult<HashMap<String, migration::Model>> {
        let records = migration::Entity::find().all(&self.db).await?;
        Ok(records
            .into_iter()
            .map(|record| (record.version.clone(), record))
            .collect())
    }

    async fn apply(&self, definition: &MigrationDefinition) -> DomainResult<()> {
        info!(version = %definition.version, "Applying migration");
        let txn = self.db.begin().await?;

        let result = async {
            definition.step.up(&SchemaManager::new(&txn)).await?;
            migration::ActiveModel {
                version: Set(definition.version.clone()),
                description: Set(definition.description.to_string()),
                applied_at: Set(Utc::now()),
                checksum: Set(Some(definition.checksum())),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            Ok::<_, DbErr>(())
        }
        .await;

        finish(txn, &definition.version, result).await
    }

    async fn revert(&self, definition: &MigrationDefinition, record_id: i32) -> DomainResult<()> {
        info!(version = %definition.version, "Rolling back migration");
        let txn = self.db.begin().await?;

        let result = async {
            definition.step.down(&SchemaManager::new(&txn)).await?;
            migration::Entity::delete_by_id(record_id).exec(&txn).await?;
            Ok::<_, DbErr>(())
        }
        .await;

        finish(txn, &definition.version, result).await
    }
}

/// Commit on success, roll back otherwise
async fn finish(
    txn: DatabaseTransaction,
    version: &str,
    result: Result<(), DbErr>,
) -> DomainResult<()> {
    let failed = |source| DomainError::MigrationFailed {
        version: version.to_string(),
        source,
    };

    match result {
        Ok(()) => txn.commit().await.map_err(failed),
        Err(source) => {
            if let Err(e) = txn.rollback().await {
                warn!(version = %version, error = %e, "Rollback failed");
            }
            Err(failed(source))
        }
    }
}

/// Human readable status report used by the CLI
pub fn format_status(records: &[migration::Model], pending: &[&MigrationDefinition]) -> String {
    let mut out = String::from("Migration Status:\n=================\n");
    if records.is_empty() {
        out.push_str("No migrations applied\n");
    }
    for record in records {
        let _ = writeln!(
            out,
            "Version: {}, Description: {}, Applied: {}",
            record.version,
            record.description,
            record.applied_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    if !pending.is_empty() {
        out.push_str("\nPending:\n");
        for definition in pending {
            let _ = writeln!(out, "  {} ({})", definition.version, definition.description);
        }
    }
    out
}

#[derive(Iden)]
enum Migrations {
    Table,
    Id,
    Version,
    Description,
    AppliedAt,
    Checksum,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Statement};

    use crate::infrastructure::database::test_support::{memory_db, migrated_db};

    const LAST: &str = "m20240101_000007_create_space";

    struct BrokenStep;

    impl MigrationName for BrokenStep {
        fn name(&self) -> &str {
            "m20990101_000001_broken"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for BrokenStep {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .get_connection()
                .execute_unprepared("CREATE TABLE half_done (id INTEGER PRIMARY KEY)")
                .await?;
            manager
                .get_connection()
                .execute_unprepared("THIS IS NOT SQL")
                .await?;
            Ok(())
        }

        async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn up_applies_every_step_once() {
        let db = memory_db().await;
        let runner = MigrationRunner::with_defaults(db);

        let first = runner.up().await.unwrap();
        assert_eq!(first.len(), runner.definitions().len());
        assert_eq!(first[0], "m20240101_000001_create_users");

        let second = runner.up().await.unwrap();
        assert!(second.is_empty());
        assert!(runner.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_lists_applied_versions_in_order() {
        let db = memory_db().await;
        let runner = MigrationRunner::with_defaults(db);
        runner.up().await.unwrap();

        let records = runner.status().await.unwrap();
        let versions: Vec<_> = records.iter().map(|r| r.version.as_str()).collect();
        let declared: Vec<_> = runner
            .definitions()
            .iter()
            .map(|d| d.version.as_str())
            .collect();
        assert_eq!(versions, declared);
        assert!(records.iter().all(|r| r.applied_at.timestamp() > 0));
        assert!(records
            .iter()
            .all(|r| r.checksum.as_ref().is_some_and(|c| c.len() == 64)));
    }

    #[tokio::test]
    async fn rollback_then_up_reapplies_exactly_that_version() {
        let db = migrated_db().await;
        let runner = MigrationRunner::with_defaults(db.clone());

        runner.down(LAST).await.unwrap();
        assert!(!SchemaManager::new(&db).has_table("space").await.unwrap());
        let pending: Vec<_> = runner
            .pending()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.version.clone())
            .collect();
        assert_eq!(pending, vec![LAST.to_string()]);

        let ran = runner.up().await.unwrap();
        assert_eq!(ran, vec![LAST.to_string()]);
        assert!(SchemaManager::new(&db).has_table("space").await.unwrap());
    }

    #[tokio::test]
    async fn rollback_of_unapplied_version_changes_nothing() {
        let db = migrated_db().await;
        let runner = MigrationRunner::with_defaults(db);
        runner.down(LAST).await.unwrap();
        let before = runner.status().await.unwrap().len();

        let err = runner.down(LAST).await.unwrap_err();
        assert!(matches!(err, DomainError::NotApplied(v) if v == LAST));
        assert_eq!(runner.status().await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn rollback_of_unknown_version_is_not_found() {
        let runner = MigrationRunner::with_defaults(migrated_db().await);

        let err = runner.down("m19700101_000000_nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Migration", .. }));
    }

    #[tokio::test]
    async fn failing_step_leaves_no_trace() {
        let db = memory_db().await;
        let runner = MigrationRunner::new(
            db.clone(),
            vec![
                MigrationDefinition::new(
                    super::super::m20240101_000001_create_users::Migration,
                    "Create users table",
                ),
                MigrationDefinition::new(BrokenStep, "Broken step"),
            ],
        );

        let err = runner.up().await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::MigrationFailed { ref version, .. } if version == "m20990101_000001_broken"
        ));

        let applied: Vec<_> = runner
            .status()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.version)
            .collect();
        assert_eq!(applied, vec!["m20240101_000001_create_users".to_string()]);
        assert!(!SchemaManager::new(&db).has_table("half_done").await.unwrap());
    }

    #[tokio::test]
    async fn reset_rebuilds_an_empty_schema() {
        let db = migrated_db().await;
        db.execute_unprepared(
            "INSERT INTO nation (name) VALUES ('Mondstadt'), ('Liyue')",
        )
        .await
        .unwrap();
        let runner = MigrationRunner::with_defaults(db.clone());

        let ran = runner.reset().await.unwrap();

        assert_eq!(ran.len(), runner.definitions().len());
        let rows = db
            .query_all(Statement::from_string(
                db.get_database_backend(),
                "SELECT id FROM nation",
            ))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn changed_definition_is_reported() {
        let db = migrated_db().await;
        let runner = MigrationRunner::with_defaults(db.clone());
        db.execute_unprepared(
            "UPDATE migrations SET checksum = 'stale' WHERE version = 'm20240101_000003_create_nation'",
        )
        .await
        .unwrap();

        let applied = runner.applied_records().await.unwrap();
        assert_eq!(
            runner.checksum_mismatches(&applied),
            vec!["m20240101_000003_create_nation".to_string()]
        );
        // a mismatch is only reported, never fatal
        assert!(runner.up().await.unwrap().is_empty());
    }

    #[test]
    fn checksum_follows_step_source() {
        let before = MigrationDefinition::new(BrokenStep, "Broken step")
            .with_source("CREATE TABLE half_done (id INTEGER)");
        let edited = MigrationDefinition::new(BrokenStep, "Broken step")
            .with_source("CREATE TABLE half_done (id INTEGER, name TEXT)");

        assert_ne!(before.checksum(), edited.checksum());
        assert_eq!(
            before.checksum(),
            MigrationDefinition::new(BrokenStep, "Broken step")
                .with_source("CREATE TABLE half_done (id INTEGER)")
                .checksum()
        );
    }

    #[test]
    fn declared_steps_carry_their_source() {
        let defaults = super::super::definitions();
        let bare = MigrationDefinition::new(
            super::super::m20240101_000001_create_users::Migration,
            "Create users table",
        );
        assert_ne!(defaults[0].checksum(), bare.checksum());
        assert!(defaults[0].source.contains("MigrationTrait"));
    }

    #[test]
    fn status_report_format() {
        let applied_at = chrono::DateTime::parse_from_rfc3339("2024-01-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = migration::Model {
            id: 1,
            version: "m20240101_000001_create_users".to_string(),
            description: "Create users table".to_string(),
            applied_at,
            checksum: None,
        };

        let report = format_status(&[record], &[]);
        assert_eq!(
            report,
            "Migration Status:\n=================\n\
             Version: m20240101_000001_create_users, Description: Create users table, Applied: 2024-01-01 12:30:00\n"
        );
        assert!(format_status(&[], &[]).contains("No migrations applied"));
    }
}
