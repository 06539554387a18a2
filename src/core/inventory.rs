//! Inventory business logic - stock movements and derived stock levels.
//!
//! A product's `current_stock` is never edited directly: every time a
//! movement is recorded (or deleted), the stock is recomputed by folding the
//! product's complete movement history. The fold is commutative, so the
//! result is independent of the order movements were applied in, and
//! re-running it is always safe. The reported value is floored at zero: an
//! over-sale is accepted and stored as-is, and only the visible stock is
//! clamped.

use crate::{
    core::{categories, period},
    entities::{Product, StockMovement, product, stock_movement},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Arguments for recording a new stock movement.
#[derive(Debug, Clone)]
pub struct NewStockMovement {
    /// Uid of the product the movement applies to
    pub product_uid: String,
    /// Movement type: `"purchase"`, `"sale"`, or `"adjustment"`
    pub movement_type: String,
    /// Units moved, always positive
    pub quantity: i32,
    /// Price per unit for this movement
    pub unit_price: f64,
    /// Uid of the circuit involved, if any
    pub circuit_uid: Option<String>,
    /// Uid of the transaction recorded alongside, if any
    pub transaction_uid: Option<String>,
    /// Calendar date of the movement
    pub date: NaiveDate,
    /// Optional free-text notes
    pub notes: Option<String>,
}

/// Summary of a product's stock position over one quarter.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ProductSummary {
    /// Uid of the summarized product
    pub product_uid: String,
    /// Product name
    pub product_name: String,
    /// Stock on hand at the start of the quarter
    pub opening_stock: i32,
    /// Units purchased during the quarter
    pub purchased: i32,
    /// Units sold during the quarter
    pub sold: i32,
    /// Units adjusted in during the quarter
    pub adjusted: i32,
    /// Stock on hand at the end of the quarter
    pub closing_stock: i32,
    /// Closing stock valued at cost price
    pub cost_value: f64,
    /// Closing stock valued at selling price
    pub sale_value: f64,
    /// Difference between sale and cost valuation
    pub margin: f64,
}

/// Returns the signed effect of a movement on stock: sales subtract their
/// quantity, purchases and adjustments add it.
#[must_use]
pub fn signed_quantity(movement_type: &str, quantity: i32) -> i64 {
    if movement_type == "sale" {
        -i64::from(quantity)
    } else {
        i64::from(quantity)
    }
}

/// Computes a product's current stock from its full movement history:
/// `max(0, Σ signed_quantity)`.
///
/// The sum is commutative, so the movements may be passed in any order and
/// the result is idempotent under recomputation.
#[must_use]
pub fn compute_current_stock(movements: &[stock_movement::Model]) -> i32 {
    let total: i64 = movements
        .iter()
        .map(|m| signed_quantity(&m.movement_type, m.quantity))
        .sum();
    i32::try_from(total.max(0)).unwrap_or(i32::MAX)
}

/// Retrieves all stock movements, newest date first.
pub async fn list_movements(db: &DatabaseConnection) -> Result<Vec<stock_movement::Model>> {
    StockMovement::find()
        .order_by_desc(stock_movement::Column::Date)
        .order_by_desc(stock_movement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all movements for one product, newest date first.
pub async fn list_movements_for_product(
    db: &DatabaseConnection,
    product_uid: &str,
) -> Result<Vec<stock_movement::Model>> {
    StockMovement::find()
        .filter(stock_movement::Column::ProductUid.eq(product_uid))
        .order_by_desc(stock_movement::Column::Date)
        .order_by_desc(stock_movement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a stock movement by its logical uid.
pub async fn get_movement_by_uid(
    db: &DatabaseConnection,
    uid: &str,
) -> Result<Option<stock_movement::Model>> {
    StockMovement::find()
        .filter(stock_movement::Column::Uid.eq(uid))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Recomputes and overwrites a product's stock from its full movement
/// history, refreshing the product's updated-timestamp. Returns the new
/// stock level.
///
/// Usable inside a database transaction; callers that just need to self-heal
/// a product after external edits can pass the plain connection.
pub async fn recalculate_product_stock<C>(db: &C, product_uid: &str) -> Result<i32>
where
    C: ConnectionTrait,
{
    let product = Product::find()
        .filter(product::Column::Uid.eq(product_uid))
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            uid: product_uid.to_string(),
        })?;

    let movements = StockMovement::find()
        .filter(stock_movement::Column::ProductUid.eq(product_uid))
        .all(db)
        .await?;

    let stock = compute_current_stock(&movements);

    let mut active: product::ActiveModel = product.into();
    active.current_stock = Set(stock);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;

    Ok(stock)
}

/// Records a stock movement and updates the owning product's stock.
///
/// Validates the movement, derives its quarter/year from the date, then in
/// one database transaction inserts the movement and overwrites the
/// product's stock with a fresh refold of its full history. An over-sale is
/// not rejected; the visible stock simply floors at zero.
///
/// # Errors
/// Returns an error if:
/// - The movement type is not purchase, sale, or adjustment
/// - The quantity is zero or negative
/// - The unit price is negative or not finite
/// - The referenced product does not exist
/// - A database operation fails (the whole write rolls back)
pub async fn record_stock_movement(
    db: &DatabaseConnection,
    new: NewStockMovement,
) -> Result<stock_movement::Model> {
    if !categories::is_valid_movement_type(&new.movement_type) {
        return Err(Error::Validation {
            message: format!("Unknown movement type: {}", new.movement_type),
        });
    }

    if new.quantity <= 0 {
        return Err(Error::InvalidQuantity {
            quantity: new.quantity,
        });
    }

    if new.unit_price < 0.0 || !new.unit_price.is_finite() {
        return Err(Error::InvalidAmount {
            amount: new.unit_price,
        });
    }

    let txn = db.begin().await?;

    // The product must exist before we accept a movement against it
    Product::find()
        .filter(product::Column::Uid.eq(new.product_uid.as_str()))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            uid: new.product_uid.clone(),
        })?;

    let quarter = period::quarter_from_date(new.date);
    let year = new.date.year();

    let movement = stock_movement::ActiveModel {
        uid: Set(uuid::Uuid::new_v4().to_string()),
        product_uid: Set(new.product_uid.clone()),
        movement_type: Set(new.movement_type.clone()),
        quantity: Set(new.quantity),
        unit_price: Set(new.unit_price),
        circuit_uid: Set(new.circuit_uid),
        transaction_uid: Set(new.transaction_uid),
        date: Set(new.date),
        quarter: Set(quarter),
        year: Set(year),
        notes: Set(new.notes),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = movement.insert(&txn).await?;

    let stock = recalculate_product_stock(&txn, &new.product_uid).await?;

    txn.commit().await?;

    info!(
        "Recorded {} of {} units for product {}, stock now {}",
        new.movement_type, new.quantity, new.product_uid, stock
    );

    Ok(result)
}

/// Deletes a stock movement and refolds the owning product's stock.
///
/// If the product itself no longer exists the movement is still removed;
/// there is no stock left to correct.
pub async fn delete_stock_movement(db: &DatabaseConnection, uid: &str) -> Result<()> {
    let movement = get_movement_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::MovementNotFound {
            uid: uid.to_string(),
        })?;

    let product_uid = movement.product_uid.clone();

    let txn = db.begin().await?;
    movement.delete(&txn).await?;

    let product_exists = Product::find()
        .filter(product::Column::Uid.eq(product_uid.as_str()))
        .one(&txn)
        .await?
        .is_some();
    if product_exists {
        recalculate_product_stock(&txn, &product_uid).await?;
    }

    txn.commit().await?;
    Ok(())
}

/// Retrieves products at or below their reorder level, ordered by name.
pub async fn get_low_stock_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    use sea_orm::sea_query::Expr;

    Product::find()
        .filter(
            Expr::col(product::Column::CurrentStock)
                .lte(Expr::col(product::Column::ReorderLevel)),
        )
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Builds a quarterly stock summary for one product from its movement
/// history. Pure computation: opening stock folds every movement from
/// quarters before the target, closing stock folds through the target
/// quarter, both floored at zero like the live stock figure.
#[must_use]
pub fn product_summary(
    product: &product::Model,
    movements: &[stock_movement::Model],
    quarter: i32,
    year: i32,
) -> ProductSummary {
    let before = |m: &stock_movement::Model| (m.year, m.quarter) < (year, quarter);
    let through = |m: &stock_movement::Model| (m.year, m.quarter) <= (year, quarter);
    let within = |m: &stock_movement::Model| m.year == year && m.quarter == quarter;

    let own: Vec<&stock_movement::Model> = movements
        .iter()
        .filter(|m| m.product_uid == product.uid)
        .collect();

    let fold = |pred: &dyn Fn(&stock_movement::Model) -> bool| -> i32 {
        let total: i64 = own
            .iter()
            .filter(|m| pred(m))
            .map(|m| signed_quantity(&m.movement_type, m.quantity))
            .sum();
        i32::try_from(total.max(0)).unwrap_or(i32::MAX)
    };

    let quantity_of = |movement_type: &str| -> i32 {
        let total: i64 = own
            .iter()
            .filter(|m| within(m) && m.movement_type == movement_type)
            .map(|m| i64::from(m.quantity))
            .sum();
        i32::try_from(total).unwrap_or(i32::MAX)
    };

    let opening_stock = fold(&before);
    let closing_stock = fold(&through);
    let cost_value = f64::from(closing_stock) * product.cost_price;
    let sale_value = f64::from(closing_stock) * product.selling_price;

    ProductSummary {
        product_uid: product.uid.clone(),
        product_name: product.name.clone(),
        opening_stock,
        purchased: quantity_of("purchase"),
        sold: quantity_of("sale"),
        adjusted: quantity_of("adjustment"),
        closing_stock,
        cost_value,
        sale_value,
        margin: sale_value - cost_value,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::product::get_product_by_uid;
    use crate::test_utils::{
        create_test_movement, create_test_product, date, setup_test_db,
    };

    fn movement(movement_type: &str, quantity: i32) -> stock_movement::Model {
        stock_movement::Model {
            id: 0,
            uid: uuid::Uuid::new_v4().to_string(),
            product_uid: "p1".to_string(),
            movement_type: movement_type.to_string(),
            quantity,
            unit_price: 1.0,
            circuit_uid: None,
            transaction_uid: None,
            date: date(2023, 10, 1),
            quarter: 4,
            year: 2023,
            notes: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_signed_quantity() {
        assert_eq!(signed_quantity("purchase", 5), 5);
        assert_eq!(signed_quantity("adjustment", 5), 5);
        assert_eq!(signed_quantity("sale", 5), -5);
    }

    #[test]
    fn test_compute_current_stock_is_order_independent() {
        let mut movements = vec![
            movement("purchase", 90),
            movement("sale", 16),
            movement("adjustment", 4),
            movement("sale", 8),
        ];
        let forward = compute_current_stock(&movements);
        movements.reverse();
        let backward = compute_current_stock(&movements);
        assert_eq!(forward, 70);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_compute_current_stock_example_scenario() {
        // 90 purchased, 16 sold -> 74 on hand
        let movements = vec![movement("purchase", 90), movement("sale", 16)];
        assert_eq!(compute_current_stock(&movements), 74);
    }

    #[test]
    fn test_compute_current_stock_floors_at_zero() {
        let movements = vec![movement("purchase", 10), movement("sale", 25)];
        assert_eq!(compute_current_stock(&movements), 0);
    }

    #[test]
    fn test_compute_current_stock_empty() {
        assert_eq!(compute_current_stock(&[]), 0);
    }

    #[tokio::test]
    async fn test_record_movement_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Regalia").await?;

        let bad_type = record_stock_movement(
            &db,
            NewStockMovement {
                product_uid: product.uid.clone(),
                movement_type: "transfer".to_string(),
                quantity: 5,
                unit_price: 8.0,
                circuit_uid: None,
                transaction_uid: None,
                date: date(2023, 10, 5),
                notes: None,
            },
        )
        .await;
        assert!(matches!(bad_type.unwrap_err(), Error::Validation { .. }));

        let bad_quantity = record_stock_movement(
            &db,
            NewStockMovement {
                product_uid: product.uid.clone(),
                movement_type: "purchase".to_string(),
                quantity: 0,
                unit_price: 8.0,
                circuit_uid: None,
                transaction_uid: None,
                date: date(2023, 10, 5),
                notes: None,
            },
        )
        .await;
        assert!(matches!(bad_quantity.unwrap_err(), Error::InvalidQuantity { quantity: 0 }));

        let missing_product = record_stock_movement(
            &db,
            NewStockMovement {
                product_uid: "no-such-product".to_string(),
                movement_type: "purchase".to_string(),
                quantity: 5,
                unit_price: 8.0,
                circuit_uid: None,
                transaction_uid: None,
                date: date(2023, 10, 5),
                notes: None,
            },
        )
        .await;
        assert!(matches!(missing_product.unwrap_err(), Error::ProductNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_record_movement_updates_product_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Regalia").await?;

        create_test_movement(&db, &product.uid, "purchase", 90, date(2023, 10, 2)).await?;
        create_test_movement(&db, &product.uid, "sale", 16, date(2023, 11, 7)).await?;

        let refreshed = get_product_by_uid(&db, &product.uid).await?.unwrap();
        assert_eq!(refreshed.current_stock, 74);
        assert!(refreshed.updated_at >= product.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_movement_derives_quarter_and_year() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Handbook").await?;

        let recorded =
            create_test_movement(&db, &product.uid, "purchase", 10, date(2023, 11, 15)).await?;
        assert_eq!(recorded.quarter, 4);
        assert_eq!(recorded.year, 2023);
        Ok(())
    }

    #[tokio::test]
    async fn test_oversale_floors_visible_stock_at_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Scarf").await?;

        create_test_movement(&db, &product.uid, "purchase", 10, date(2023, 10, 2)).await?;
        // Over-sale is accepted, not rejected
        create_test_movement(&db, &product.uid, "sale", 25, date(2023, 10, 9)).await?;

        let refreshed = get_product_by_uid(&db, &product.uid).await?.unwrap();
        assert_eq!(refreshed.current_stock, 0);

        // The raw history still holds both movements
        let movements = list_movements_for_product(&db, &product.uid).await?;
        assert_eq!(movements.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_movement_refolds_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Gold Badge").await?;

        create_test_movement(&db, &product.uid, "purchase", 20, date(2023, 10, 2)).await?;
        let sale =
            create_test_movement(&db, &product.uid, "sale", 5, date(2023, 10, 9)).await?;

        delete_stock_movement(&db, &sale.uid).await?;

        let refreshed = get_product_by_uid(&db, &product.uid).await?.unwrap();
        assert_eq!(refreshed.current_stock, 20);

        let missing = delete_stock_movement(&db, &sale.uid).await;
        assert!(matches!(missing.unwrap_err(), Error::MovementNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_low_stock_products() -> Result<()> {
        let db = setup_test_db().await?;
        // reorder_level defaults to 10 in the factory
        let low = create_test_product(&db, "Enrolment Badge").await?;
        let high = create_test_product(&db, "Handbook").await?;

        create_test_movement(&db, &low.uid, "purchase", 4, date(2023, 10, 2)).await?;
        create_test_movement(&db, &high.uid, "purchase", 50, date(2023, 10, 2)).await?;

        let low_stock = get_low_stock_products(&db).await?;
        let names: Vec<&str> = low_stock.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Enrolment Badge"]);
        Ok(())
    }

    #[test]
    fn test_product_summary() {
        let product = product::Model {
            id: 0,
            uid: "p1".to_string(),
            name: "Regalia".to_string(),
            cost_price: 3.0,
            selling_price: 8.0,
            current_stock: 0,
            reorder_level: 10,
            category: "regalia".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let mut q3_purchase = movement("purchase", 30);
        q3_purchase.quarter = 3;
        let mut q4_purchase = movement("purchase", 60);
        q4_purchase.quarter = 4;
        let mut q4_sale = movement("sale", 16);
        q4_sale.quarter = 4;
        let mut q4_adjustment = movement("adjustment", 2);
        q4_adjustment.quarter = 4;

        let movements = vec![q3_purchase, q4_purchase, q4_sale, q4_adjustment];
        let summary = product_summary(&product, &movements, 4, 2023);

        assert_eq!(summary.opening_stock, 30);
        assert_eq!(summary.purchased, 60);
        assert_eq!(summary.sold, 16);
        assert_eq!(summary.adjusted, 2);
        assert_eq!(summary.closing_stock, 76);
        assert_eq!(summary.cost_value, 228.0);
        assert_eq!(summary.sale_value, 608.0);
        assert_eq!(summary.margin, 380.0);
    }
}
