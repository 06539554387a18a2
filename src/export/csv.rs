//! Flat transaction CSV export.
//!
//! One row per transaction: Date, Type, Category (label), Description,
//! Amount, Circuit, Notes. Circuit references that no longer resolve leave
//! the column empty. Opens cleanly in any spreadsheet application.

use crate::{
    core::categories,
    entities::{circuit, transaction},
    errors::Result,
};
use std::io::Write;

const HEADER: [&str; 7] = [
    "Date",
    "Type",
    "Category",
    "Description",
    "Amount",
    "Circuit",
    "Notes",
];

/// Writes the given transactions as CSV rows.
///
/// The caller decides which transactions to export (typically one reporting
/// quarter); `circuits` is only used to resolve circuit names.
pub fn write_transactions_csv<W: Write>(
    writer: W,
    transactions: &[transaction::Model],
    circuits: &[circuit::Model],
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for t in transactions {
        let circuit_name = t
            .circuit_uid
            .as_ref()
            .and_then(|uid| circuits.iter().find(|c| c.uid == *uid))
            .map_or("", |c| c.name.as_str());

        csv.write_record(&[
            t.date.format("%Y-%m-%d").to_string(),
            t.transaction_type.clone(),
            categories::category_label(&t.transaction_type, &t.category),
            t.description.clone(),
            format!("{:.2}", t.amount),
            circuit_name.to_string(),
            t.notes.clone().unwrap_or_default(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Renders the given transactions to a CSV string.
pub fn transactions_to_csv_string(
    transactions: &[transaction::Model],
    circuits: &[circuit::Model],
) -> Result<String> {
    let mut buffer = Vec::new();
    write_transactions_csv(&mut buffer, transactions, circuits)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{date, transaction_model};

    fn circuit_model(uid: &str, name: &str) -> circuit::Model {
        circuit::Model {
            id: 0,
            uid: uid.to_string(),
            name: name.to_string(),
            country: "Germany".to_string(),
            sub_branches: None,
            contact_person: None,
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let mut tx = transaction_model("receipt", "donation_received", 1234.5, date(2023, 10, 5));
        tx.circuit_uid = Some("c1".to_string());
        tx.notes = Some("from the harvest service".to_string());
        let circuits = vec![circuit_model("c1", "Hamburg")];

        let csv = transactions_to_csv_string(&[tx], &circuits).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Date,Type,Category,Description,Amount,Circuit,Notes"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2023-10-05,receipt,Donation Received,Test transaction,1234.50,Hamburg,from the harvest service"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_dangling_circuit_is_blank() {
        let mut tx = transaction_model("payment", "airtime", 20.0, date(2023, 11, 2));
        tx.circuit_uid = Some("c-deleted".to_string());

        let csv = transactions_to_csv_string(&[tx], &[]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "2023-11-02,payment,Airtime / Zoom,Test transaction,20.00,,");
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let mut tx = transaction_model("payment", "gift", 45.0, date(2023, 12, 24));
        tx.description = "Send-off gift, retiring pastor".to_string();

        let csv = transactions_to_csv_string(&[tx], &[]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"Send-off gift, retiring pastor\""));
    }

    #[test]
    fn test_csv_empty_input_is_header_only() {
        let csv = transactions_to_csv_string(&[], &[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
