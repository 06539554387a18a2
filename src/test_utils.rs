//! Shared test utilities for `MissionLedger`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.
#![allow(clippy::unwrap_used)]

use crate::{
    core::{circuit, inventory, product, transaction},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a `NaiveDate`, panicking on an invalid calendar date. Test-only.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test circuit with sensible defaults.
///
/// # Defaults
/// * `country`: "Germany"
/// * no sub-branches, no contact person
pub async fn create_test_circuit(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::circuit::Model> {
    circuit::create_circuit(db, name.to_string(), "Germany".to_string(), vec![], None).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `cost_price`: 3.0, `selling_price`: 8.0
/// * `reorder_level`: 10
/// * `category`: "regalia"
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), 3.0, 8.0, 10, "regalia".to_string()).await
}

/// Builds transaction-creation arguments with sensible defaults.
///
/// # Defaults
/// * `description`: `"Test transaction"`
/// * no circuit, event, items, or notes
#[must_use]
pub fn new_transaction(
    transaction_type: &str,
    category: &str,
    amount: f64,
    date: NaiveDate,
) -> transaction::NewTransaction {
    transaction::NewTransaction {
        date,
        transaction_type: transaction_type.to_string(),
        category: category.to_string(),
        description: "Test transaction".to_string(),
        amount,
        circuit_uid: None,
        event_uid: None,
        items: vec![],
        notes: None,
    }
}

/// Creates a test transaction through the normal create path.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    transaction_type: &str,
    category: &str,
    amount: f64,
    date: NaiveDate,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(db, new_transaction(transaction_type, category, amount, date))
        .await
}

/// Records a test stock movement through the normal path, updating the
/// owning product's stock.
///
/// # Defaults
/// * `unit_price`: 8.0
/// * no circuit or transaction reference, no notes
pub async fn create_test_movement(
    db: &DatabaseConnection,
    product_uid: &str,
    movement_type: &str,
    quantity: i32,
    date: NaiveDate,
) -> Result<entities::stock_movement::Model> {
    inventory::record_stock_movement(
        db,
        inventory::NewStockMovement {
            product_uid: product_uid.to_string(),
            movement_type: movement_type.to_string(),
            quantity,
            unit_price: 8.0,
            circuit_uid: None,
            transaction_uid: None,
            date,
            notes: None,
        },
    )
    .await
}

/// Builds a detached transaction model for pure-computation tests that never
/// touch the database.
#[must_use]
pub fn transaction_model(
    transaction_type: &str,
    category: &str,
    amount: f64,
    tx_date: NaiveDate,
) -> entities::transaction::Model {
    let now = chrono::Utc::now();
    entities::transaction::Model {
        id: 0,
        uid: uuid::Uuid::new_v4().to_string(),
        date: tx_date,
        transaction_type: transaction_type.to_string(),
        category: category.to_string(),
        description: "Test transaction".to_string(),
        amount,
        circuit_uid: None,
        event_uid: None,
        quarter: crate::core::period::quarter_from_date(tx_date),
        year: chrono::Datelike::year(&tx_date),
        notes: None,
        created_at: now,
        updated_at: now,
    }
}
