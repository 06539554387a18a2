//! Transaction entity - Represents all receipts and payments in the ledger.
//!
//! Each transaction has a logical `uid`, a date with its derived `quarter` and
//! `year`, a `transaction_type` (receipt/payment), a category code from the
//! closed per-type registry, and an optional circuit and event reference.
//! Line items live in the `transaction_items` child table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Row identifier, never referenced by other records
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i64,
    /// Logical identifier (UUID v4) used by all cross-record references
    #[sea_orm(unique, indexed)]
    pub uid: String,
    /// Calendar date the money moved
    #[sea_orm(indexed)]
    pub date: Date,
    /// Direction of the transaction: `"receipt"` or `"payment"`
    #[sea_orm(indexed)]
    pub transaction_type: String,
    /// Category code from the closed per-type registry
    #[sea_orm(indexed)]
    pub category: String,
    /// Human-readable description of the transaction
    pub description: String,
    /// Monetary value in currency units, always positive
    pub amount: f64,
    /// Uid of the circuit this transaction is attributed to, if any
    #[sea_orm(indexed)]
    pub circuit_uid: Option<String>,
    /// Uid of the mission event this transaction belongs to, if any
    pub event_uid: Option<String>,
    /// Reporting quarter (1-4), derived from `date` at write time
    #[sea_orm(indexed)]
    pub quarter: i32,
    /// Reporting year, derived from `date` at write time
    #[sea_orm(indexed)]
    pub year: i32,
    /// Optional free-text notes
    pub notes: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction owns zero or more line items
    #[sea_orm(has_many = "super::transaction_item::Entity")]
    TransactionItem,
}

impl Related<super::transaction_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
