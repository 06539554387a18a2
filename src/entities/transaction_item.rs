//! Transaction line item entity - One merchandise line within a transaction.
//!
//! Items record which product was sold or bought, in what quantity and at
//! what unit price. The `total` column is fixed at `quantity * unit_price`
//! when the item is written, and the owning transaction's `amount` must equal
//! the sum of its item totals.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_items")]
pub struct Model {
    /// Row identifier, never referenced by other records
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i64,
    /// Uid of the owning transaction
    #[sea_orm(indexed)]
    pub transaction_uid: String,
    /// Uid of the product on this line
    pub product_uid: String,
    /// Product name captured at write time, kept even if the product changes
    pub product_name: String,
    /// Units on this line, always positive
    pub quantity: i32,
    /// Price per unit at the time of the transaction
    pub unit_price: f64,
    /// Line total: `quantity * unit_price`
    pub total: f64,
}

/// Defines relationships between `TransactionItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one transaction
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionUid",
        to = "super::transaction::Column::Uid"
    )]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
