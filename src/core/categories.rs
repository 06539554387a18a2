//! Closed category and type registries.
//!
//! Every enumerated code in the system is validated against these lists at the
//! core boundary before it reaches storage. Codes are stored as plain strings
//! (snake_case), which keeps backup files and exports readable; the closed-set
//! guarantee lives here rather than in the column type.

/// Transaction type code for incoming money.
pub const RECEIPT: &str = "receipt";
/// Transaction type code for outgoing money.
pub const PAYMENT: &str = "payment";

/// Category codes valid for receipt transactions.
pub const RECEIPT_CATEGORIES: &[&str] = &[
    "circuit_contribution",
    "donation_received",
    "merchandise_sale",
    "event_income",
    "debt_repayment",
    "opening_balance",
    "other",
];

/// Category codes valid for payment transactions.
pub const PAYMENT_CATEGORIES: &[&str] = &[
    "donation_given",
    "merchandise_purchase",
    "transportation",
    "postage",
    "event_expense",
    "airtime",
    "stationery",
    "gift",
    "honorarium",
    "other",
];

/// Category codes valid for products.
pub const PRODUCT_CATEGORIES: &[&str] =
    &["regalia", "badge", "clothing", "publication", "accessory"];

/// Movement type codes valid for stock movements.
pub const MOVEMENT_TYPES: &[&str] = &["purchase", "sale", "adjustment"];

/// Type codes valid for mission events.
pub const EVENT_TYPES: &[&str] = &["retreat", "conference", "inauguration", "other"];

/// Type codes valid for generated documents.
pub const DOCUMENT_TYPES: &[&str] = &[
    "quarterly_report",
    "annual_report",
    "circuit_report",
    "stock_report",
    "invoice",
    "receipt",
    "pnl_report",
];

/// Returns true when `transaction_type` is a known transaction type code.
#[must_use]
pub fn is_valid_transaction_type(transaction_type: &str) -> bool {
    transaction_type == RECEIPT || transaction_type == PAYMENT
}

/// Returns true when `category` is valid for the given transaction type.
/// Unknown transaction types have no valid categories.
#[must_use]
pub fn is_valid_category(transaction_type: &str, category: &str) -> bool {
    match transaction_type {
        RECEIPT => RECEIPT_CATEGORIES.contains(&category),
        PAYMENT => PAYMENT_CATEGORIES.contains(&category),
        _ => false,
    }
}

/// Returns true when `category` is a known product category code.
#[must_use]
pub fn is_valid_product_category(category: &str) -> bool {
    PRODUCT_CATEGORIES.contains(&category)
}

/// Returns true when `movement_type` is a known stock movement type code.
#[must_use]
pub fn is_valid_movement_type(movement_type: &str) -> bool {
    MOVEMENT_TYPES.contains(&movement_type)
}

/// Returns true when `event_type` is a known mission event type code.
#[must_use]
pub fn is_valid_event_type(event_type: &str) -> bool {
    EVENT_TYPES.contains(&event_type)
}

/// Returns true when `doc_type` is a known generated document type code.
#[must_use]
pub fn is_valid_document_type(doc_type: &str) -> bool {
    DOCUMENT_TYPES.contains(&doc_type)
}

/// Human label for a category code, e.g. `circuit_contribution` →
/// "Circuit Contribution".
///
/// A few codes have fixed labels that title-casing cannot produce: the
/// shared `other` code reads "Other Income" or "Other Expense" depending on
/// the transaction type, `airtime` is "Airtime / Zoom", and `gift` is
/// "Gift / Send-off".
#[must_use]
pub fn category_label(transaction_type: &str, category: &str) -> String {
    match category {
        "other" if transaction_type == RECEIPT => "Other Income".to_string(),
        "other" if transaction_type == PAYMENT => "Other Expense".to_string(),
        "airtime" => "Airtime / Zoom".to_string(),
        "gift" => "Gift / Send-off".to_string(),
        _ => title_case(category),
    }
}

/// Title-cases a snake_case code: `debt_repayment` → "Debt Repayment".
#[must_use]
pub fn title_case(code: &str) -> String {
    code.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_validity() {
        assert!(is_valid_transaction_type("receipt"));
        assert!(is_valid_transaction_type("payment"));
        assert!(!is_valid_transaction_type("transfer"));
        assert!(!is_valid_transaction_type(""));
    }

    #[test]
    fn test_categories_are_distinct_per_type() {
        assert!(is_valid_category("receipt", "donation_received"));
        assert!(!is_valid_category("payment", "donation_received"));
        assert!(is_valid_category("payment", "honorarium"));
        assert!(!is_valid_category("receipt", "honorarium"));
        // "other" exists on both sides
        assert!(is_valid_category("receipt", "other"));
        assert!(is_valid_category("payment", "other"));
        // Unknown type has no categories
        assert!(!is_valid_category("transfer", "other"));
    }

    #[test]
    fn test_category_label() {
        assert_eq!(
            category_label("receipt", "circuit_contribution"),
            "Circuit Contribution"
        );
        assert_eq!(category_label("payment", "debt_repayment"), "Debt Repayment");
        assert_eq!(category_label("receipt", "other"), "Other Income");
        assert_eq!(category_label("payment", "other"), "Other Expense");
        assert_eq!(category_label("payment", "airtime"), "Airtime / Zoom");
        assert_eq!(category_label("payment", "gift"), "Gift / Send-off");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("opening_balance"), "Opening Balance");
        assert_eq!(title_case("postage"), "Postage");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_other_registries() {
        assert!(is_valid_product_category("badge"));
        assert!(!is_valid_product_category("vehicle"));
        assert!(is_valid_movement_type("adjustment"));
        assert!(!is_valid_movement_type("transfer"));
        assert!(is_valid_event_type("retreat"));
        assert!(is_valid_document_type("quarterly_report"));
        assert!(!is_valid_document_type("memo"));
    }
}
