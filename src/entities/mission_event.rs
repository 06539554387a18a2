//! Mission event entity - Retreats, conferences, and other dated happenings.
//! Descriptive only; transactions may reference an event by uid.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mission event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Row identifier
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i64,
    /// Logical identifier (UUID v4)
    #[sea_orm(unique, indexed)]
    pub uid: String,
    /// Event name
    #[sea_orm(indexed)]
    pub name: String,
    /// Event type: retreat, conference, inauguration, or other
    #[sea_orm(indexed)]
    pub event_type: String,
    /// First day of the event
    #[sea_orm(indexed)]
    pub start_date: Date,
    /// Last day of the event, never before `start_date`
    pub end_date: Date,
    /// Optional free-text notes
    pub notes: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `MissionEvent` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
