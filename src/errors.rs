//! Unified error types for the ledger.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation
//! problems get their own variants so callers can surface a precise message
//! next to the offending form field; storage and serialization failures wrap
//! their source errors.

use thiserror::Error;

/// All errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problem (seed file, database URL, parse failures).
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A record failed validation before it reached the store.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the rejected input
        message: String,
    },

    /// An amount was zero, negative, or not finite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A quantity was zero or negative.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// A transaction's amount disagrees with the sum of its line items.
    #[error("Transaction amount {amount} does not match item total {items_total}")]
    ItemTotalMismatch {
        /// The amount recorded on the transaction
        amount: f64,
        /// The sum of `quantity * unit_price` across its items
        items_total: f64,
    },

    /// No transaction with the given uid exists.
    #[error("Transaction not found: {uid}")]
    TransactionNotFound {
        /// The uid that failed to resolve
        uid: String,
    },

    /// No circuit with the given uid exists.
    #[error("Circuit not found: {uid}")]
    CircuitNotFound {
        /// The uid that failed to resolve
        uid: String,
    },

    /// No product with the given uid exists.
    #[error("Product not found: {uid}")]
    ProductNotFound {
        /// The uid that failed to resolve
        uid: String,
    },

    /// No stock movement with the given uid exists.
    #[error("Stock movement not found: {uid}")]
    MovementNotFound {
        /// The uid that failed to resolve
        uid: String,
    },

    /// No mission event with the given uid exists.
    #[error("Event not found: {uid}")]
    EventNotFound {
        /// The uid that failed to resolve
        uid: String,
    },

    /// A backup file failed the shape check before import.
    #[error("Backup error: {message}")]
    Backup {
        /// Why the backup file was rejected
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
