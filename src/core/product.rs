//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for creating, retrieving, updating, and
//! deleting products in the merchandise catalogue. A product's
//! `current_stock` is derived state owned by the inventory module
//! ([`crate::core::inventory`]); nothing here writes it except initializing a
//! new product at zero.

use crate::{
    core::categories,
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

fn validate_product_fields(
    name: &str,
    cost_price: f64,
    selling_price: f64,
    reorder_level: i32,
    category: &str,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if cost_price < 0.0 || !cost_price.is_finite() {
        return Err(Error::InvalidAmount { amount: cost_price });
    }

    if selling_price < 0.0 || !selling_price.is_finite() {
        return Err(Error::InvalidAmount {
            amount: selling_price,
        });
    }

    if reorder_level < 0 {
        return Err(Error::InvalidQuantity {
            quantity: reorder_level,
        });
    }

    if !categories::is_valid_product_category(category) {
        return Err(Error::Validation {
            message: format!("Unknown product category: {category}"),
        });
    }

    Ok(())
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its logical uid, returning None if not found.
pub async fn get_product_by_uid(
    db: &DatabaseConnection,
    uid: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Uid.eq(uid))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by name, returning None if not found.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product with the specified parameters, performing input
/// validation. Stock starts at zero; it only changes through recorded stock
/// movements.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - Either price is negative or not finite (NaN, infinity)
/// - The reorder level is negative
/// - The category is not in the closed product category registry
/// - The database insert operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    cost_price: f64,
    selling_price: f64,
    reorder_level: i32,
    category: String,
) -> Result<product::Model> {
    validate_product_fields(&name, cost_price, selling_price, reorder_level, &category)?;

    let now = chrono::Utc::now();
    let product = product::ActiveModel {
        uid: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name.trim().to_string()),
        cost_price: Set(cost_price),
        selling_price: Set(selling_price),
        current_stock: Set(0),
        reorder_level: Set(reorder_level),
        category: Set(category),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Updates an existing product's catalogue fields, performing input
/// validation. `current_stock` is left untouched; it belongs to the
/// inventory module.
pub async fn update_product(
    db: &DatabaseConnection,
    uid: &str,
    name: String,
    cost_price: f64,
    selling_price: f64,
    reorder_level: i32,
    category: String,
) -> Result<product::Model> {
    validate_product_fields(&name, cost_price, selling_price, reorder_level, &category)?;

    let mut product: product::ActiveModel = get_product_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            uid: uid.to_string(),
        })?
        .into();

    product.name = Set(name.trim().to_string());
    product.cost_price = Set(cost_price);
    product.selling_price = Set(selling_price);
    product.reorder_level = Set(reorder_level);
    product.category = Set(category);
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

/// Deletes a product. Its stock movements are left in place as history.
pub async fn delete_product(db: &DatabaseConnection, uid: &str) -> Result<()> {
    let product = get_product_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            uid: uid.to_string(),
        })?;

    product.delete(db).await?;
    Ok(())
}
