//! Transaction business logic - Handles all receipt and payment operations.
//!
//! This module provides functions for creating, retrieving, updating, and
//! deleting transactions. Every write derives the reporting quarter and year
//! from the transaction date so the two can never disagree, and writes that
//! touch line items run inside a database transaction so a transaction and
//! its items change together or not at all. Validation rejects empty
//! descriptions, non-positive amounts, categories outside the closed per-type
//! registry, and item lists whose totals disagree with the amount.

use crate::{
    core::{categories, period},
    entities::{Transaction, TransactionItem, transaction, transaction_item},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Tolerance used when comparing a transaction amount against the sum of its
/// line item totals.
pub const AMOUNT_TOLERANCE: f64 = 1e-6;

/// One merchandise line on a new or updated transaction.
#[derive(Debug, Clone)]
pub struct NewTransactionItem {
    /// Uid of the product on this line
    pub product_uid: String,
    /// Product name captured at write time
    pub product_name: String,
    /// Units on this line, always positive
    pub quantity: i32,
    /// Price per unit
    pub unit_price: f64,
}

/// Arguments for creating or updating a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Calendar date the money moved; quarter and year are derived from it
    pub date: NaiveDate,
    /// Direction: `"receipt"` or `"payment"`
    pub transaction_type: String,
    /// Category code, valid for the transaction type
    pub category: String,
    /// Human-readable description
    pub description: String,
    /// Monetary value, always positive
    pub amount: f64,
    /// Uid of the circuit attributed, if any
    pub circuit_uid: Option<String>,
    /// Uid of the mission event, if any
    pub event_uid: Option<String>,
    /// Merchandise lines, empty for plain transactions
    pub items: Vec<NewTransactionItem>,
    /// Optional free-text notes
    pub notes: Option<String>,
}

fn items_total(items: &[NewTransactionItem]) -> f64 {
    items
        .iter()
        .map(|item| f64::from(item.quantity) * item.unit_price)
        .sum()
}

fn validate_new_transaction(new: &NewTransaction) -> Result<()> {
    if !categories::is_valid_transaction_type(&new.transaction_type) {
        return Err(Error::Validation {
            message: format!("Unknown transaction type: {}", new.transaction_type),
        });
    }

    if !categories::is_valid_category(&new.transaction_type, &new.category) {
        return Err(Error::Validation {
            message: format!(
                "Category {} is not valid for {} transactions",
                new.category, new.transaction_type
            ),
        });
    }

    if new.description.trim().is_empty() {
        return Err(Error::Validation {
            message: "Description cannot be empty".to_string(),
        });
    }

    if new.amount <= 0.0 || !new.amount.is_finite() {
        return Err(Error::InvalidAmount { amount: new.amount });
    }

    for item in &new.items {
        if item.quantity <= 0 {
            return Err(Error::InvalidQuantity {
                quantity: item.quantity,
            });
        }
        if item.unit_price < 0.0 || !item.unit_price.is_finite() {
            return Err(Error::InvalidAmount {
                amount: item.unit_price,
            });
        }
    }

    if !new.items.is_empty() {
        let total = items_total(&new.items);
        if (new.amount - total).abs() > AMOUNT_TOLERANCE {
            return Err(Error::ItemTotalMismatch {
                amount: new.amount,
                items_total: total,
            });
        }
    }

    Ok(())
}

async fn insert_items<C>(db: &C, transaction_uid: &str, items: &[NewTransactionItem]) -> Result<()>
where
    C: ConnectionTrait,
{
    for item in items {
        let row = transaction_item::ActiveModel {
            transaction_uid: Set(transaction_uid.to_string()),
            product_uid: Set(item.product_uid.clone()),
            product_name: Set(item.product_name.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            total: Set(f64::from(item.quantity) * item.unit_price),
            ..Default::default()
        };
        row.insert(db).await?;
    }
    Ok(())
}

/// Creates a new transaction (and its line items, if any).
///
/// The reporting quarter and year are derived from the date at write time.
/// The insert of the transaction and its items is atomic.
pub async fn create_transaction(
    db: &DatabaseConnection,
    new: NewTransaction,
) -> Result<transaction::Model> {
    validate_new_transaction(&new)?;

    let now = chrono::Utc::now();
    let uid = uuid::Uuid::new_v4().to_string();
    let quarter = period::quarter_from_date(new.date);
    let year = new.date.year();

    let txn = db.begin().await?;

    let model = transaction::ActiveModel {
        uid: Set(uid.clone()),
        date: Set(new.date),
        transaction_type: Set(new.transaction_type.clone()),
        category: Set(new.category.clone()),
        description: Set(new.description.trim().to_string()),
        amount: Set(new.amount),
        circuit_uid: Set(new.circuit_uid.clone()),
        event_uid: Set(new.event_uid.clone()),
        quarter: Set(quarter),
        year: Set(year),
        notes: Set(new.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = model.insert(&txn).await?;
    insert_items(&txn, &uid, &new.items).await?;

    txn.commit().await?;

    info!(
        "Created {} {} of {} in Q{}/{}",
        new.transaction_type, uid, new.amount, quarter, year
    );

    Ok(result)
}

/// Finds a transaction by its logical uid, returning None if not found.
pub async fn get_transaction_by_uid(
    db: &DatabaseConnection,
    uid: &str,
) -> Result<Option<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::Uid.eq(uid))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the line items belonging to a transaction.
pub async fn get_items_for_transaction(
    db: &DatabaseConnection,
    transaction_uid: &str,
) -> Result<Vec<transaction_item::Model>> {
    TransactionItem::find()
        .filter(transaction_item::Column::TransactionUid.eq(transaction_uid))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions, newest date first.
pub async fn list_transactions(db: &DatabaseConnection) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the transactions of one reporting quarter, newest date first.
pub async fn list_transactions_for_quarter(
    db: &DatabaseConnection,
    quarter: i32,
    year: i32,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::Quarter.eq(quarter))
        .filter(transaction::Column::Year.eq(year))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions of one type, newest date first.
pub async fn list_transactions_by_type(
    db: &DatabaseConnection,
    transaction_type: &str,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::TransactionType.eq(transaction_type))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates an existing transaction, replacing its line items wholesale.
///
/// The quarter and year are re-derived from the (possibly changed) date, and
/// the updated-timestamp is refreshed. The update and the item replacement
/// are atomic.
pub async fn update_transaction(
    db: &DatabaseConnection,
    uid: &str,
    new: NewTransaction,
) -> Result<transaction::Model> {
    validate_new_transaction(&new)?;

    let existing = get_transaction_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::TransactionNotFound {
            uid: uid.to_string(),
        })?;

    let quarter = period::quarter_from_date(new.date);
    let year = new.date.year();

    let txn = db.begin().await?;

    let mut model: transaction::ActiveModel = existing.into();
    model.date = Set(new.date);
    model.transaction_type = Set(new.transaction_type.clone());
    model.category = Set(new.category.clone());
    model.description = Set(new.description.trim().to_string());
    model.amount = Set(new.amount);
    model.circuit_uid = Set(new.circuit_uid.clone());
    model.event_uid = Set(new.event_uid.clone());
    model.quarter = Set(quarter);
    model.year = Set(year);
    model.notes = Set(new.notes.clone());
    model.updated_at = Set(chrono::Utc::now());

    let result = model.update(&txn).await?;

    TransactionItem::delete_many()
        .filter(transaction_item::Column::TransactionUid.eq(uid))
        .exec(&txn)
        .await?;
    insert_items(&txn, uid, &new.items).await?;

    txn.commit().await?;

    Ok(result)
}

/// Deletes a transaction and its line items.
pub async fn delete_transaction(db: &DatabaseConnection, uid: &str) -> Result<()> {
    let existing = get_transaction_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::TransactionNotFound {
            uid: uid.to_string(),
        })?;

    let txn = db.begin().await?;

    TransactionItem::delete_many()
        .filter(transaction_item::Column::TransactionUid.eq(uid))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    txn.commit().await?;

    info!("Deleted transaction {}", uid);
    Ok(())
}

async fn sum_amounts(
    db: &DatabaseConnection,
    transaction_type: &str,
    period: Option<(i32, i32)>,
) -> Result<f64> {
    let mut query = Transaction::find()
        .filter(transaction::Column::TransactionType.eq(transaction_type));

    if let Some((quarter, year)) = period {
        query = query
            .filter(transaction::Column::Quarter.eq(quarter))
            .filter(transaction::Column::Year.eq(year));
    }

    let matching = query.all(db).await?;
    Ok(matching.iter().map(|t| t.amount).sum())
}

/// Sums receipt amounts, optionally restricted to one (quarter, year).
pub async fn total_receipts(
    db: &DatabaseConnection,
    period: Option<(i32, i32)>,
) -> Result<f64> {
    sum_amounts(db, categories::RECEIPT, period).await
}

/// Sums payment amounts, optionally restricted to one (quarter, year).
pub async fn total_payments(
    db: &DatabaseConnection,
    period: Option<(i32, i32)>,
) -> Result<f64> {
    sum_amounts(db, categories::PAYMENT, period).await
}

/// Receipts minus payments, optionally restricted to one (quarter, year).
pub async fn net_balance(db: &DatabaseConnection, period: Option<(i32, i32)>) -> Result<f64> {
    Ok(total_receipts(db, period).await? - total_payments(db, period).await?)
}

/// Returns the distinct years with recorded transactions, newest first.
pub async fn recorded_years(db: &DatabaseConnection) -> Result<Vec<i32>> {
    let mut years: Vec<i32> = Transaction::find()
        .select_only()
        .column(transaction::Column::Year)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    years.sort_unstable_by(|a, b| b.cmp(a));
    Ok(years)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{
        create_test_transaction, date, new_transaction, setup_test_db,
    };

    #[tokio::test]
    async fn test_create_transaction_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let mut bad = new_transaction("receipt", "donation_received", 100.0, date(2023, 10, 5));
        bad.description = String::new();
        let result = create_transaction(&db, bad).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let mut bad = new_transaction("receipt", "donation_received", 0.0, date(2023, 10, 5));
        bad.description = "Zero".to_string();
        let result = create_transaction(&db, bad).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount } if amount == 0.0));

        let bad = new_transaction("receipt", "honorarium", 100.0, date(2023, 10, 5));
        let result = create_transaction(&db, bad).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let bad = new_transaction("transfer", "other", 100.0, date(2023, 10, 5));
        let result = create_transaction(&db, bad).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_transaction_derives_quarter_and_year() -> Result<()> {
        let db = setup_test_db().await?;

        let tx =
            create_test_transaction(&db, "receipt", "opening_balance", 6105.0, date(2023, 10, 1))
                .await?;
        assert_eq!(tx.quarter, 4);
        assert_eq!(tx.year, 2023);

        let tx =
            create_test_transaction(&db, "payment", "postage", 12.5, date(2024, 2, 29)).await?;
        assert_eq!(tx.quarter, 1);
        assert_eq!(tx.year, 2024);
        Ok(())
    }

    #[tokio::test]
    async fn test_item_total_must_match_amount() -> Result<()> {
        let db = setup_test_db().await?;

        let mut new = new_transaction("receipt", "merchandise_sale", 100.0, date(2023, 10, 5));
        new.items = vec![NewTransactionItem {
            product_uid: "p1".to_string(),
            product_name: "Regalia".to_string(),
            quantity: 10,
            unit_price: 8.0,
        }];
        let result = create_transaction(&db, new).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ItemTotalMismatch { amount, items_total }
                if amount == 100.0 && items_total == 80.0
        ));

        let mut new = new_transaction("receipt", "merchandise_sale", 80.0, date(2023, 10, 5));
        new.items = vec![NewTransactionItem {
            product_uid: "p1".to_string(),
            product_name: "Regalia".to_string(),
            quantity: 10,
            unit_price: 8.0,
        }];
        let created = create_transaction(&db, new).await?;

        let items = get_items_for_transaction(&db, &created.uid).await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].total, 80.0);
        assert_eq!(items[0].product_name, "Regalia");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_transaction_rederives_period_and_replaces_items() -> Result<()> {
        let db = setup_test_db().await?;

        let mut new = new_transaction("receipt", "merchandise_sale", 80.0, date(2023, 10, 5));
        new.items = vec![NewTransactionItem {
            product_uid: "p1".to_string(),
            product_name: "Regalia".to_string(),
            quantity: 10,
            unit_price: 8.0,
        }];
        let created = create_transaction(&db, new).await?;
        assert_eq!(created.quarter, 4);

        let mut changed = new_transaction("receipt", "merchandise_sale", 16.0, date(2024, 1, 9));
        changed.items = vec![NewTransactionItem {
            product_uid: "p2".to_string(),
            product_name: "Headgear (Cap)".to_string(),
            quantity: 4,
            unit_price: 4.0,
        }];
        let updated = update_transaction(&db, &created.uid, changed).await?;

        assert_eq!(updated.quarter, 1);
        assert_eq!(updated.year, 2024);
        assert_eq!(updated.amount, 16.0);
        assert!(updated.updated_at >= created.updated_at);

        let items = get_items_for_transaction(&db, &created.uid).await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "Headgear (Cap)");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_transaction_removes_items() -> Result<()> {
        let db = setup_test_db().await?;

        let mut new = new_transaction("receipt", "merchandise_sale", 80.0, date(2023, 10, 5));
        new.items = vec![NewTransactionItem {
            product_uid: "p1".to_string(),
            product_name: "Regalia".to_string(),
            quantity: 10,
            unit_price: 8.0,
        }];
        let created = create_transaction(&db, new).await?;

        delete_transaction(&db, &created.uid).await?;

        assert!(get_transaction_by_uid(&db, &created.uid).await?.is_none());
        assert!(get_items_for_transaction(&db, &created.uid).await?.is_empty());

        let missing = delete_transaction(&db, &created.uid).await;
        assert!(matches!(missing.unwrap_err(), Error::TransactionNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_period_totals() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_transaction(&db, "receipt", "opening_balance", 6105.0, date(2023, 10, 1))
            .await?;
        create_test_transaction(&db, "payment", "transportation", 250.0, date(2023, 11, 3))
            .await?;
        create_test_transaction(&db, "payment", "postage", 50.0, date(2023, 12, 18)).await?;
        // Different quarter, ignored by the filtered sums
        create_test_transaction(&db, "receipt", "donation_received", 999.0, date(2024, 1, 2))
            .await?;

        assert_eq!(total_receipts(&db, Some((4, 2023))).await?, 6105.0);
        assert_eq!(total_payments(&db, Some((4, 2023))).await?, 300.0);
        assert_eq!(net_balance(&db, Some((4, 2023))).await?, 5805.0);
        assert_eq!(total_receipts(&db, None).await?, 7104.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_recorded_years_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_transaction(&db, "receipt", "donation_received", 10.0, date(2022, 5, 1))
            .await?;
        create_test_transaction(&db, "receipt", "donation_received", 10.0, date(2024, 5, 1))
            .await?;
        create_test_transaction(&db, "payment", "postage", 5.0, date(2024, 6, 1)).await?;

        assert_eq!(recorded_years(&db).await?, vec![2024, 2022]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_for_quarter_filters_exactly() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_transaction(&db, "receipt", "donation_received", 10.0, date(2023, 10, 1))
            .await?;
        create_test_transaction(&db, "receipt", "donation_received", 20.0, date(2023, 7, 1))
            .await?;

        let q4 = list_transactions_for_quarter(&db, 4, 2023).await?;
        assert_eq!(q4.len(), 1);
        assert_eq!(q4[0].amount, 10.0);
        Ok(())
    }
}
