//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod circuit;
pub mod generated_document;
pub mod mission_event;
pub mod product;
pub mod stock_movement;
pub mod transaction;
pub mod transaction_item;

// Re-export specific types to avoid conflicts
pub use circuit::{Column as CircuitColumn, Entity as Circuit, Model as CircuitModel};
pub use generated_document::{
    Column as GeneratedDocumentColumn, Entity as GeneratedDocument, Model as GeneratedDocumentModel,
};
pub use mission_event::{
    Column as MissionEventColumn, Entity as MissionEvent, Model as MissionEventModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use stock_movement::{
    Column as StockMovementColumn, Entity as StockMovement, Model as StockMovementModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use transaction_item::{
    Column as TransactionItemColumn, Entity as TransactionItem, Model as TransactionItemModel,
};
