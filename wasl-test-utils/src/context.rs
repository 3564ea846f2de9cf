//! Test context returned by `TestBuilder`.
//!
//! The context owns an in-memory SQLite database, an in-memory session and a
//! temporary directory standing in for the document upload root.

use std::{path::PathBuf, sync::Arc};

use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tempfile::TempDir;
use tower_sessions::{MemoryStore, Session};

use crate::error::TestError;

/// Test environment shared by repository, service and controller tests.
///
/// ```ignore
/// let mut test = TestBuilder::new().with_marketplace_tables().build().await?;
///
/// let (user, company) = test.user().insert_company("acme@example.com", true).await?;
/// let state: AppState = test.to_app_state();
/// ```
pub struct TestContext {
    /// Connection to the in-memory SQLite database
    pub db: DatabaseConnection,
    /// Session backed by a memory store
    pub session: Session,
    /// Removed together with its contents when the context is dropped
    pub upload_dir: TempDir,
}

impl TestContext {
    /// Convert the database and upload directory into any type constructed from them.
    ///
    /// Lets tests build the server `AppState` without this crate depending on the
    /// server crate.
    pub fn to_app_state<T>(&self) -> T
    where
        T: From<(DatabaseConnection, PathBuf)>,
    {
        T::from((self.db.clone(), self.upload_path()))
    }

    /// Path of the temporary upload root.
    pub fn upload_path(&self) -> PathBuf {
        self.upload_dir.path().to_path_buf()
    }

    /// Create a new test context without any tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized context
    /// - `Err(TestError::DbErr)` - Database connection failed
    /// - `Err(TestError::IoError)` - Temporary upload directory could not be created
    pub async fn new() -> Result<Self, TestError> {
        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;
        let upload_dir = tempfile::tempdir()?;

        Ok(TestContext {
            db,
            session,
            upload_dir,
        })
    }

    /// Execute CREATE TABLE statements in order.
    ///
    /// Tables referenced by foreign keys must come before the tables referencing them.
    pub async fn with_tables(&self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }
}
