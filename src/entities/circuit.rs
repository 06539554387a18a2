//! Circuit entity - An organizational branch/region tracked for contribution
//! and purchase accounting.
//!
//! Transactions and stock movements reference circuits by `uid`. Deleting a
//! circuit does not cascade; dangling references degrade to "Unknown" in
//! reports.

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Names of a circuit's sub-branches, stored as a JSON array column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SubBranches(pub Vec<String>);

/// Circuit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "circuits")]
pub struct Model {
    /// Row identifier, never referenced by other records
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i64,
    /// Logical identifier (UUID v4) used by all cross-record references
    #[sea_orm(unique, indexed)]
    pub uid: String,
    /// Circuit name (e.g. "Hamburg")
    #[sea_orm(indexed)]
    pub name: String,
    /// Country the circuit operates in
    pub country: String,
    /// Optional sub-branch names under this circuit
    pub sub_branches: Option<SubBranches>,
    /// Optional contact person for the circuit
    pub contact_person: Option<String>,
    /// Whether the circuit is currently active
    pub is_active: bool,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Circuit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
