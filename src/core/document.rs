//! Generated-document audit trail.
//!
//! Every report export leaves a row behind: what was generated, for which
//! period, and the serialized payload. The trail is write-only; no
//! computation ever reads it back.

use crate::{
    core::categories,
    entities::{GeneratedDocument, generated_document},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Records a generated document.
///
/// `data` is the serialized payload of the export, when the caller wants it
/// kept (report archives do; one-off exports may pass None).
pub async fn record_document(
    db: &DatabaseConnection,
    doc_type: &str,
    title: String,
    quarter: Option<i32>,
    year: i32,
    data: Option<String>,
) -> Result<generated_document::Model> {
    if !categories::is_valid_document_type(doc_type) {
        return Err(Error::Validation {
            message: format!("Unknown document type: {doc_type}"),
        });
    }

    if title.trim().is_empty() {
        return Err(Error::Validation {
            message: "Document title cannot be empty".to_string(),
        });
    }

    let document = generated_document::ActiveModel {
        uid: Set(uuid::Uuid::new_v4().to_string()),
        doc_type: Set(doc_type.to_string()),
        title: Set(title.trim().to_string()),
        quarter: Set(quarter),
        year: Set(year),
        data: Set(data),
        generated_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    document.insert(db).await.map_err(Into::into)
}

/// Retrieves all recorded documents, newest first.
pub async fn list_documents(
    db: &DatabaseConnection,
) -> Result<Vec<generated_document::Model>> {
    GeneratedDocument::find()
        .order_by_desc(generated_document::Column::GeneratedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the recorded documents for one year, newest first.
pub async fn list_documents_for_year(
    db: &DatabaseConnection,
    year: i32,
) -> Result<Vec<generated_document::Model>> {
    GeneratedDocument::find()
        .filter(generated_document::Column::Year.eq(year))
        .order_by_desc(generated_document::Column::GeneratedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
