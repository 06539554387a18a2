//! Product entity - A merchandise item tracked in inventory.
//!
//! `current_stock` is derived state: it is overwritten with a full refold of
//! the product's stock movements whenever a movement is recorded, clamped at
//! zero. It is never edited directly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Row identifier, never referenced by other records
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i64,
    /// Logical identifier (UUID v4) used by all cross-record references
    #[sea_orm(unique, indexed)]
    pub uid: String,
    /// Product name (e.g. "Regalia", "Handbook")
    #[sea_orm(indexed)]
    pub name: String,
    /// Purchase cost per unit
    pub cost_price: f64,
    /// Selling price per unit
    pub selling_price: f64,
    /// Units on hand, derived from movements and never negative
    pub current_stock: i32,
    /// Stock level at or below which the product needs reordering
    pub reorder_level: i32,
    /// Category code: regalia, badge, clothing, publication, or accessory
    #[sea_orm(indexed)]
    pub category: String,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product has zero or more stock movements
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovement,
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
