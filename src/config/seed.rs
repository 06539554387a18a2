//! Seed data loading from defaults.toml
//!
//! This module provides functionality to load the organization's default
//! circuits and products from a TOML configuration file. The records defined
//! in defaults.toml are used to populate the database on first run, so a
//! fresh install starts with the circuits and merchandise catalogue the
//! organization actually uses.

use crate::core::{circuit, product};
use crate::entities::Circuit;
use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire defaults.toml file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Circuits to create on first run
    pub circuits: Vec<CircuitSeed>,
    /// Products to create on first run
    pub products: Vec<ProductSeed>,
}

/// Seed definition for a single circuit
#[derive(Debug, Deserialize, Clone)]
pub struct CircuitSeed {
    /// Circuit name
    pub name: String,
    /// Country the circuit operates in
    pub country: String,
    /// Sub-branch names, empty when the circuit has none
    #[serde(default)]
    pub sub_branches: Vec<String>,
}

/// Seed definition for a single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Product name
    pub name: String,
    /// Purchase cost per unit
    pub cost_price: f64,
    /// Selling price per unit
    pub selling_price: f64,
    /// Category code from the product registry
    pub category: String,
    /// Reorder threshold
    pub reorder_level: i32,
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse defaults.toml: {e}"),
    })
}

/// Loads seed configuration from the default location (./defaults.toml)
pub fn load_default_seed_config() -> Result<SeedConfig> {
    load_seed_config("defaults.toml")
}

/// Populates an empty database with the configured circuits and products.
///
/// Seeding only runs when no circuits exist yet, so it is safe to call on
/// every startup. Returns `true` when records were inserted, `false` when the
/// database already had data and was left untouched.
pub async fn seed_database(db: &DatabaseConnection, config: &SeedConfig) -> Result<bool> {
    let circuit_count = Circuit::find().count(db).await?;
    if circuit_count > 0 {
        return Ok(false);
    }

    info!("Seeding database with default circuits and products");

    for c in &config.circuits {
        circuit::create_circuit(
            db,
            c.name.clone(),
            c.country.clone(),
            c.sub_branches.clone(),
            None,
        )
        .await?;
    }

    for p in &config.products {
        product::create_product(
            db,
            p.name.clone(),
            p.cost_price,
            p.selling_price,
            p.reorder_level,
            p.category.clone(),
        )
        .await?;
    }

    info!(
        "Database seeded with {} circuits and {} products",
        config.circuits.len(),
        config.products.len()
    );
    Ok(true)
}
