//! Generated document entity - Audit trail of past report exports.
//! Write-only; never read back into computations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Generated document database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    /// Row identifier
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i64,
    /// Logical identifier (UUID v4)
    #[sea_orm(unique, indexed)]
    pub uid: String,
    /// Document type (e.g. `"quarterly_report"`)
    #[sea_orm(indexed)]
    pub doc_type: String,
    /// Human-readable title of the export
    pub title: String,
    /// Reporting quarter, when the document covers one
    pub quarter: Option<i32>,
    /// Reporting year the document covers
    #[sea_orm(indexed)]
    pub year: i32,
    /// Serialized JSON payload of the report data
    pub data: Option<String>,
    /// When the document was generated
    pub generated_at: DateTimeUtc,
}

/// Defines relationships between `GeneratedDocument` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
