use surrealdb::{Surreal, engine::any::Any};
use thiserror::Error;
use uuid::Uuid;

use crate::repository::VideoConferenceRepository;

#[derive(Error, Debug)]
pub enum TestUtilsError {
    #[error("Database connection failed: {0}")]
    DatabaseConnection(#[from] surrealdb::Error),

    #[error("Schema initialization failed: {message}")]
    SchemaInitialization { message: String },

    #[error("Test database cleanup failed: {message}")]
    CleanupFailed { message: String },
}

/// Isolated test database over the in-memory engine.
///
/// Every instance gets its own namespace/database pair and the production
/// schema, so tests can run concurrently without seeing each other's
/// records.
pub struct TestDatabase {
    pub db: Surreal<Any>,
    pub namespace: String,
    pub database_name: String,
}

impl TestDatabase {
    pub async fn new() -> Result<Self, TestUtilsError> {
        let namespace = format!("test_ns_{}", Uuid::new_v4().simple());
        let database_name = format!("test_db_{}", Uuid::new_v4().simple());

        let db = surrealdb::engine::any::connect("memory")
            .await
            .map_err(TestUtilsError::DatabaseConnection)?;

        db.use_ns(&namespace)
            .use_db(&database_name)
            .await
            .map_err(TestUtilsError::DatabaseConnection)?;

        // Initialize schema from production migrations
        let migration_sql = include_str!("../migrations/huddle.surql");
        db.query(migration_sql)
            .await
            .map_err(|e| TestUtilsError::SchemaInitialization { message: e.to_string() })?;

        Ok(TestDatabase { db, namespace, database_name })
    }

    /// Repository bound to this test database
    pub fn conference_repository(&self) -> VideoConferenceRepository {
        VideoConferenceRepository::new(self.db.clone())
    }

    /// Explicit cleanup; the in-memory engine also evaporates with the
    /// connection
    pub async fn cleanup(&self) -> Result<(), TestUtilsError> {
        self.db
            .query(format!("REMOVE DATABASE `{}`", self.database_name))
            .await
            .map_err(|e| TestUtilsError::CleanupFailed { message: e.to_string() })?;
        Ok(())
    }
}

/// Create an isolated test database with the conference schema applied
pub async fn create_test_database() -> Result<TestDatabase, TestUtilsError> {
    TestDatabase::new().await
}
