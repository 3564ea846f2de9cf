//! Declarative builder for test environments.
//!
//! Tables are queued while chaining and created in one pass by `build()`.

use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, setup::marketplace_tables, TestContext};

/// Builder for declarative test initialization.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_marketplace_tables: bool,
}

impl TestBuilder {
    /// Create a new builder with no tables configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_marketplace_tables: false,
        }
    }

    /// Add every marketplace table, from users through revenue reports.
    ///
    /// # Returns
    /// - `Self` - The builder instance for method chaining
    pub fn with_marketplace_tables(mut self) -> Self {
        self.include_marketplace_tables = true;
        self
    }

    /// Add a single entity table to the test database.
    ///
    /// Chain multiple calls to add multiple tables. Parent tables must be added
    /// before the tables holding foreign keys to them.
    ///
    /// # Arguments
    /// - `entity` - Entity type implementing `EntityTrait`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wasl_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), wasl_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(WaslUser)
    ///     .with_table(Admin)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Build the test context and create all queued tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Configured test environment
    /// - `Err(TestError::DbErr)` - Table creation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let context = TestContext::new().await?;

        let mut all_tables = Vec::new();
        if self.include_marketplace_tables {
            all_tables.extend(marketplace_tables());
        }
        all_tables.extend(self.tables);

        context.with_tables(all_tables).await?;

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
