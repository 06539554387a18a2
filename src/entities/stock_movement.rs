//! Stock movement entity - A single recorded change to a product's quantity
//! on hand.
//!
//! Purchases and adjustments add to stock, sales subtract. Movements carry
//! their own `quarter`/`year` derived from `date`, the same invariant as
//! transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock movement database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    /// Row identifier, never referenced by other records
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i64,
    /// Logical identifier (UUID v4)
    #[sea_orm(unique, indexed)]
    pub uid: String,
    /// Uid of the product this movement applies to
    #[sea_orm(indexed)]
    pub product_uid: String,
    /// Movement type: `"purchase"`, `"sale"`, or `"adjustment"`
    #[sea_orm(indexed)]
    pub movement_type: String,
    /// Units moved, always positive; direction comes from the type
    pub quantity: i32,
    /// Price per unit for this movement
    pub unit_price: f64,
    /// Uid of the circuit involved (e.g. the buyer), if any
    pub circuit_uid: Option<String>,
    /// Uid of the transaction this movement was recorded alongside, if any
    pub transaction_uid: Option<String>,
    /// Calendar date of the movement
    #[sea_orm(indexed)]
    pub date: Date,
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
}

/// Defines relationships between `StockMovement` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each movement belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductUid",
        to = "super::product::Column::Uid"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
