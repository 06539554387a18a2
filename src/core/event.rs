//! Mission event business logic.
//!
//! Events (retreats, conferences, inaugurations) are descriptive records;
//! transactions may point at one by uid but nothing aggregates over them.

use crate::{
    core::categories,
    entities::{MissionEvent, mission_event},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

fn validate_event_fields(
    name: &str,
    event_type: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Event name cannot be empty".to_string(),
        });
    }

    if !categories::is_valid_event_type(event_type) {
        return Err(Error::Validation {
            message: format!("Unknown event type: {event_type}"),
        });
    }

    if end_date < start_date {
        return Err(Error::Validation {
            message: "Event end date cannot be before its start date".to_string(),
        });
    }

    Ok(())
}

/// Retrieves all events, most recent start date first.
pub async fn list_events(db: &DatabaseConnection) -> Result<Vec<mission_event::Model>> {
    MissionEvent::find()
        .order_by_desc(mission_event::Column::StartDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an event by its logical uid, returning None if not found.
pub async fn get_event_by_uid(
    db: &DatabaseConnection,
    uid: &str,
) -> Result<Option<mission_event::Model>> {
    MissionEvent::find()
        .filter(mission_event::Column::Uid.eq(uid))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new mission event, performing input validation.
pub async fn create_event(
    db: &DatabaseConnection,
    name: String,
    event_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    notes: Option<String>,
) -> Result<mission_event::Model> {
    validate_event_fields(&name, &event_type, start_date, end_date)?;

    let event = mission_event::ActiveModel {
        uid: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name.trim().to_string()),
        event_type: Set(event_type),
        start_date: Set(start_date),
        end_date: Set(end_date),
        notes: Set(notes),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    event.insert(db).await.map_err(Into::into)
}

/// Updates an existing mission event.
pub async fn update_event(
    db: &DatabaseConnection,
    uid: &str,
    name: String,
    event_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    notes: Option<String>,
) -> Result<mission_event::Model> {
    validate_event_fields(&name, &event_type, start_date, end_date)?;

    let mut event: mission_event::ActiveModel = get_event_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::EventNotFound {
            uid: uid.to_string(),
        })?
        .into();

    event.name = Set(name.trim().to_string());
    event.event_type = Set(event_type);
    event.start_date = Set(start_date);
    event.end_date = Set(end_date);
    event.notes = Set(notes);

    event.update(db).await.map_err(Into::into)
}

/// Deletes a mission event. Transactions referencing it keep their dangling
/// uid, the same graceful degradation circuits get.
pub async fn delete_event(db: &DatabaseConnection, uid: &str) -> Result<()> {
    let event = get_event_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::EventNotFound {
            uid: uid.to_string(),
        })?;

    event.delete(db).await?;
    Ok(())
}
