//! Full-store JSON backup export and restore.
//!
//! The backup is a versioned envelope holding every collection in the store,
//! pretty-printed for inspection. Import is a full replace: after the shape
//! check passes, every collection is cleared and re-filled inside one
//! database transaction, so a failed import leaves the store untouched.

use crate::{
    entities::{
        Circuit, GeneratedDocument, MissionEvent, Product, StockMovement, Transaction,
        TransactionItem, circuit, generated_document, mission_event, product, stock_movement,
        transaction, transaction_item,
    },
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, IntoActiveModel,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Version written into new backup envelopes.
pub const BACKUP_VERSION: u32 = 1;

/// The versioned envelope holding a full copy of every collection.
///
/// `version` and `transactions` are the required shape: a file missing either
/// is rejected before anything is touched. The remaining collections default
/// to empty so hand-trimmed envelopes still import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupEnvelope {
    /// Backup format version
    pub version: u32,
    /// When the backup was taken
    #[serde(default = "chrono::Utc::now")]
    pub exported_at: chrono::DateTime<chrono::Utc>,
    /// All transactions
    pub transactions: Vec<transaction::Model>,
    /// All transaction line items
    #[serde(default)]
    pub transaction_items: Vec<transaction_item::Model>,
    /// All circuits
    #[serde(default)]
    pub circuits: Vec<circuit::Model>,
    /// All products
    #[serde(default)]
    pub products: Vec<product::Model>,
    /// All stock movements
    #[serde(default)]
    pub stock_movements: Vec<stock_movement::Model>,
    /// All mission events
    #[serde(default)]
    pub events: Vec<mission_event::Model>,
    /// All generated documents
    #[serde(default)]
    pub documents: Vec<generated_document::Model>,
}

/// Reads every collection into a fresh backup envelope.
pub async fn export_backup(db: &DatabaseConnection) -> Result<BackupEnvelope> {
    Ok(BackupEnvelope {
        version: BACKUP_VERSION,
        exported_at: chrono::Utc::now(),
        transactions: Transaction::find().all(db).await?,
        transaction_items: TransactionItem::find().all(db).await?,
        circuits: Circuit::find().all(db).await?,
        products: Product::find().all(db).await?,
        stock_movements: StockMovement::find().all(db).await?,
        events: MissionEvent::find().all(db).await?,
        documents: GeneratedDocument::find().all(db).await?,
    })
}

/// Serializes a backup envelope as pretty-printed JSON.
pub fn backup_to_json(envelope: &BackupEnvelope) -> Result<String> {
    serde_json::to_string_pretty(envelope).map_err(Into::into)
}

/// Exports the whole store as a pretty-printed JSON backup string.
pub async fn export_backup_json(db: &DatabaseConnection) -> Result<String> {
    backup_to_json(&export_backup(db).await?)
}

/// Parses and shape-checks a backup file.
///
/// Runs before any destructive operation: a file that does not carry a
/// `version` field and a `transactions` array is rejected here.
pub fn parse_backup(json: &str) -> Result<BackupEnvelope> {
    serde_json::from_str(json).map_err(|e| Error::Backup {
        message: format!("Not a valid backup file: {e}"),
    })
}

/// Replaces the entire store with the contents of a backup envelope.
///
/// Every collection is cleared and re-inserted inside one database
/// transaction. Row ids are not preserved; all cross-record references go
/// through logical uids, which are.
pub async fn import_backup(db: &DatabaseConnection, envelope: BackupEnvelope) -> Result<()> {
    let txn = db.begin().await?;

    Transaction::delete_many().exec(&txn).await?;
    TransactionItem::delete_many().exec(&txn).await?;
    Circuit::delete_many().exec(&txn).await?;
    Product::delete_many().exec(&txn).await?;
    StockMovement::delete_many().exec(&txn).await?;
    MissionEvent::delete_many().exec(&txn).await?;
    GeneratedDocument::delete_many().exec(&txn).await?;

    let counts = (
        envelope.transactions.len(),
        envelope.circuits.len(),
        envelope.products.len(),
        envelope.stock_movements.len(),
    );

    for record in envelope.transactions {
        let mut active = record.into_active_model();
        active.id = NotSet;
        active.insert(&txn).await?;
    }
    for record in envelope.transaction_items {
        let mut active = record.into_active_model();
        active.id = NotSet;
        active.insert(&txn).await?;
    }
    for record in envelope.circuits {
        let mut active = record.into_active_model();
        active.id = NotSet;
        active.insert(&txn).await?;
    }
    for record in envelope.products {
        let mut active = record.into_active_model();
        active.id = NotSet;
        active.insert(&txn).await?;
    }
    for record in envelope.stock_movements {
        let mut active = record.into_active_model();
        active.id = NotSet;
        active.insert(&txn).await?;
    }
    for record in envelope.events {
        let mut active = record.into_active_model();
        active.id = NotSet;
        active.insert(&txn).await?;
    }
    for record in envelope.documents {
        let mut active = record.into_active_model();
        active.id = NotSet;
        active.insert(&txn).await?;
    }

    txn.commit().await?;

    info!(
        "Imported backup: {} transactions, {} circuits, {} products, {} stock movements",
        counts.0, counts.1, counts.2, counts.3
    );
    Ok(())
}

/// Parses a backup file and replaces the store with its contents.
pub async fn restore_from_json(db: &DatabaseConnection, json: &str) -> Result<()> {
    let envelope = parse_backup(json)?;
    import_backup(db, envelope).await
}
