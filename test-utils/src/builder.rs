use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{Balance, Transaction};
///
/// let test = TestBuilder::new()
///     .with_table(Balance)
///     .with_table(Transaction)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// Vector of CREATE TABLE statements to execute during database setup.
    ///
    /// Each statement is generated from an entity model using SeaORM's schema builder.
    /// Statements are executed in the order they were added during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    ///
    /// Chain method calls to configure the test environment before calling `build()`.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. The table will be created when `build()` is called. Chain multiple
    /// calls to add multiple tables.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds all tables required for economy operations.
    ///
    /// Adds `Balance`, `Transaction` and `InGame`. Use this when testing
    /// balance, transfer, or transaction-log functionality.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_economy_tables(self) -> Self {
        self.with_table(Balance)
            .with_table(Transaction)
            .with_table(InGame)
    }

    /// Adds all tables required for moderation operations.
    ///
    /// Adds `GlobalBan`, `Warn` and `ModerationStat`. Use this when testing
    /// bans, warns, the unban reaper, or moderation statistics.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_moderation_tables(self) -> Self {
        self.with_table(GlobalBan)
            .with_table(Warn)
            .with_table(ModerationStat)
    }

    /// Adds all tables required for card collection and trading.
    ///
    /// Adds `CardInstance`, `Trade` and `InGame`. Use this when testing
    /// card rolls, inventory pagination, or the trade state machine.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_card_tables(self) -> Self {
        self.with_table(CardInstance)
            .with_table(Trade)
            .with_table(InGame)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// Creates an in-memory SQLite database connection and executes all CREATE TABLE
    /// statements that were added via `with_table()`. Tables are created in the order
    /// they were added to the builder.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
