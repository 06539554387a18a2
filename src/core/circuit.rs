//! Circuit business logic - Handles all circuit-related operations.
//!
//! Provides functions for creating, retrieving, updating, and deleting
//! circuits. Circuits are referenced from transactions and stock movements by
//! their logical uid; deleting a circuit does not cascade, and reports
//! resolve dangling references to "Unknown".

use crate::{
    entities::{Circuit, circuit},
    entities::circuit::SubBranches,
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

fn sub_branches_column(sub_branches: Vec<String>) -> Option<SubBranches> {
    if sub_branches.is_empty() {
        None
    } else {
        Some(SubBranches(sub_branches))
    }
}

/// Retrieves all circuits, ordered alphabetically by name.
pub async fn list_circuits(db: &DatabaseConnection) -> Result<Vec<circuit::Model>> {
    Circuit::find()
        .order_by_asc(circuit::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active circuits only, ordered alphabetically by name.
pub async fn list_active_circuits(db: &DatabaseConnection) -> Result<Vec<circuit::Model>> {
    Circuit::find()
        .filter(circuit::Column::IsActive.eq(true))
        .order_by_asc(circuit::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a circuit by its logical uid, returning None if not found.
pub async fn get_circuit_by_uid(
    db: &DatabaseConnection,
    uid: &str,
) -> Result<Option<circuit::Model>> {
    Circuit::find()
        .filter(circuit::Column::Uid.eq(uid))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a circuit by name, returning None if not found.
pub async fn get_circuit_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<circuit::Model>> {
    Circuit::find()
        .filter(circuit::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new circuit, performing input validation.
///
/// The circuit starts active, with a fresh uid and creation timestamp.
/// An empty sub-branch list is stored as absent.
pub async fn create_circuit(
    db: &DatabaseConnection,
    name: String,
    country: String,
    sub_branches: Vec<String>,
    contact_person: Option<String>,
) -> Result<circuit::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Circuit name cannot be empty".to_string(),
        });
    }

    if country.trim().is_empty() {
        return Err(Error::Validation {
            message: "Circuit country cannot be empty".to_string(),
        });
    }

    let circuit = circuit::ActiveModel {
        uid: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name.trim().to_string()),
        country: Set(country.trim().to_string()),
        sub_branches: Set(sub_branches_column(sub_branches)),
        contact_person: Set(contact_person),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    circuit.insert(db).await.map_err(Into::into)
}

/// Updates an existing circuit's details.
///
/// # Errors
/// Returns an error if:
/// - The name or country is empty or whitespace-only
/// - No circuit with the given uid exists
/// - The database update operation fails
pub async fn update_circuit(
    db: &DatabaseConnection,
    uid: &str,
    name: String,
    country: String,
    sub_branches: Vec<String>,
    contact_person: Option<String>,
    is_active: bool,
) -> Result<circuit::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Circuit name cannot be empty".to_string(),
        });
    }

    if country.trim().is_empty() {
        return Err(Error::Validation {
            message: "Circuit country cannot be empty".to_string(),
        });
    }

    let mut circuit: circuit::ActiveModel = get_circuit_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::CircuitNotFound {
            uid: uid.to_string(),
        })?
        .into();

    circuit.name = Set(name.trim().to_string());
    circuit.country = Set(country.trim().to_string());
    circuit.sub_branches = Set(sub_branches_column(sub_branches));
    circuit.contact_person = Set(contact_person);
    circuit.is_active = Set(is_active);

    circuit.update(db).await.map_err(Into::into)
}

/// Deletes a circuit.
///
/// Transactions and stock movements that reference the circuit are left in
/// place; their references dangle and degrade to "Unknown" in reports.
pub async fn delete_circuit(db: &DatabaseConnection, uid: &str) -> Result<()> {
    let circuit = get_circuit_by_uid(db, uid)
        .await?
        .ok_or_else(|| Error::CircuitNotFound {
            uid: uid.to_string(),
        })?;

    circuit.delete(db).await?;
    Ok(())
}
