//! Database configuration module for `MissionLedger`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables and secondary indexes based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements from
//! the entity models, ensuring that the database schema matches the Rust struct definitions
//! without requiring manual SQL.

use crate::entities::{
    Circuit, GeneratedDocument, MissionEvent, Product, StockMovement, Transaction,
    TransactionItem,
};
use crate::errors::Result;
use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait, Schema,
};
use tracing_subscriber::EnvFilter;

/// Default database location when `DATABASE_URL` is not set.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/mission_ledger.sqlite?mode=rwc";

/// Installs the global tracing subscriber with `RUST_LOG`-style filtering.
///
/// Call once at application startup, before any database work. Safe to call
/// again (subsequent calls are no-ops), which keeps test setups simple.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .ok();
}

/// Gets the database URL from the environment or returns the default `SQLite` path.
///
/// Loads `.env` first (non-fatal if absent) so a local development file can
/// point the application at a different database location.
#[must_use]
pub fn get_database_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable, falling back to the default local file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    Database::connect(&database_url).await.map_err(Into::into)
}

fn table_statements(schema: &Schema) -> Vec<TableCreateStatement> {
    vec![
        schema.create_table_from_entity(Transaction),
        schema.create_table_from_entity(TransactionItem),
        schema.create_table_from_entity(Circuit),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(StockMovement),
        schema.create_table_from_entity(MissionEvent),
        schema.create_table_from_entity(GeneratedDocument),
    ]
}

async fn create_indexes<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    for stmt in schema.create_index_from_entity(entity) {
        db.execute(builder.build(&stmt)).await?;
    }
    Ok(())
}

/// Creates all tables and secondary indexes from the entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct
/// definitions. Secondary indexes come from the `indexed` column attributes, covering the
/// fields the application queries by: date, type, category, circuit, and quarter/year.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder: DbBackend = db.get_database_backend();
    let schema = Schema::new(builder);

    for table in table_statements(&schema) {
        db.execute(builder.build(&table)).await?;
    }

    create_indexes(db, &schema, Transaction).await?;
    create_indexes(db, &schema, TransactionItem).await?;
    create_indexes(db, &schema, Circuit).await?;
    create_indexes(db, &schema, Product).await?;
    create_indexes(db, &schema, StockMovement).await?;
    create_indexes(db, &schema, MissionEvent).await?;
    create_indexes(db, &schema, GeneratedDocument).await?;

    Ok(())
}
