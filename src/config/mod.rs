//! Configuration management for the ledger.

/// Database connection, table creation, and tracing bootstrap
pub mod database;

/// Seed data loading from defaults.toml
pub mod seed;
