//! Report computation - category/circuit aggregation and the period
//! statistics engine.
//!
//! [`build_report_data`] is the single entry point renderers consume: a pure
//! function over in-memory transaction and circuit lists producing a fully
//! serializable [`ReportData`]. Every ratio, average, and percentage in here
//! degrades to a defined zero or `None` on empty input; the engine never
//! returns NaN or infinity and never panics. PDF/Word/CSV formatting happens
//! elsewhere; nothing in this module formats strings beyond labels.

use crate::{
    core::{categories, document, period},
    entities::{Circuit, Transaction, circuit, transaction},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use std::cmp::Ordering;

/// Organization name stamped on report headers.
pub const ORGANIZATION_NAME: &str = "Europe Mission";
/// Currency symbol stamped on report headers.
pub const CURRENCY_SYMBOL: &str = "€";

/// Aggregate for one category within a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Category code
    pub category: String,
    /// Human label for the category
    pub label: String,
    /// Sum of transaction amounts in this category
    pub amount: f64,
    /// Number of transactions in this category
    pub count: usize,
    /// Share of the period total, 0 when the total is zero
    pub percentage: f64,
}

/// Aggregate for one circuit within a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitBreakdown {
    /// Circuit name, "Unknown" when the reference no longer resolves
    pub name: String,
    /// Sum of receipt amounts attributed to the circuit
    pub receipts: f64,
    /// Sum of payment amounts attributed to the circuit
    pub payments: f64,
    /// Receipts minus payments
    pub net: f64,
    /// Number of transactions attributed to the circuit
    pub txn_count: usize,
}

/// Aggregate for one calendar month of the reporting quarter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBreakdown {
    /// Month name
    pub month: String,
    /// Zero-based calendar month index
    pub month_index: i32,
    /// Sum of receipt amounts in the month
    pub receipts: f64,
    /// Sum of payment amounts in the month
    pub payments: f64,
    /// Receipts minus payments
    pub net: f64,
    /// Number of transactions in the month
    pub txn_count: usize,
}

/// Derived statistics beyond the core totals.
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedStats {
    /// Mean amount across all transactions of the period, 0 if none
    pub avg_transaction_size: f64,
    /// Mean receipt amount, 0 if no receipts
    pub avg_receipt_size: f64,
    /// Mean payment amount, 0 if no payments
    pub avg_payment_size: f64,
    /// Median amount across all transactions of the period, 0 if none
    pub median_transaction: f64,
    /// The single largest receipt, first-encountered on ties
    pub largest_receipt: Option<transaction::Model>,
    /// The single largest payment, first-encountered on ties
    pub largest_payment: Option<transaction::Model>,
    /// Receipt growth vs the previous quarter in percent; None when not applicable
    pub receipt_growth_vs_prev_q: Option<f64>,
    /// Payment growth vs the previous quarter in percent; None when not applicable
    pub payment_growth_vs_prev_q: Option<f64>,
    /// Net balance growth vs the previous quarter in percent; None when not applicable
    pub balance_growth_vs_prev_q: Option<f64>,
    /// Previous quarter's total receipts
    pub prev_q_receipts: f64,
    /// Previous quarter's total payments
    pub prev_q_payments: f64,
    /// Previous quarter's net balance
    pub prev_q_balance: f64,
    /// Top receipt categories by amount (at most five)
    pub top_receipt_categories: Vec<CategoryBreakdown>,
    /// Top payment categories by amount (at most five)
    pub top_payment_categories: Vec<CategoryBreakdown>,
    /// Name of the month with the most transactions, first on ties
    pub busy_month: String,
    /// Name of the month with the fewest transactions, first on ties
    pub quiet_month: String,
    /// Payments divided by receipts, 0 when receipts are zero
    pub operating_ratio: f64,
    /// "surplus", "deficit", or "balanced" by sign of the net balance
    pub surplus_deficit: String,
}

/// Everything a quarterly report renderer needs, in one structure.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    /// Organization name for the header
    pub organization: String,
    /// Currency symbol for amount formatting
    pub currency_symbol: String,
    /// Reporting quarter (1-4)
    pub quarter: i32,
    /// Reporting year
    pub year: i32,
    /// Human label for the quarter ("October – December")
    pub quarter_label: String,
    /// When the report was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,

    /// Sum of receipt amounts in the period
    pub total_receipts: f64,
    /// Sum of payment amounts in the period
    pub total_payments: f64,
    /// Receipts minus payments
    pub net_balance: f64,
    /// Number of transactions in the period
    pub total_transactions: usize,
    /// Number of receipts in the period
    pub receipt_count: usize,
    /// Number of payments in the period
    pub payment_count: usize,

    /// Receipt categories, largest amount first
    pub receipts_by_category: Vec<CategoryBreakdown>,
    /// Payment categories, largest amount first
    pub payments_by_category: Vec<CategoryBreakdown>,
    /// Per-circuit totals, largest receipts first
    pub circuit_breakdown: Vec<CircuitBreakdown>,
    /// The three calendar months of the quarter, in order
    pub monthly_breakdown: Vec<MonthlyBreakdown>,

    /// Derived statistics
    pub advanced: AdvancedStats,

    /// The period's receipts, newest date first
    pub all_receipts: Vec<transaction::Model>,
    /// The period's payments, newest date first
    pub all_payments: Vec<transaction::Model>,
}

/// Standard median: midpoint of the sorted values for odd lengths, mean of
/// the two middle values for even lengths, 0 for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Growth of `current` over `previous` in percent, defined only for a
/// positive `previous`.
#[must_use]
pub fn growth(current: f64, previous: f64) -> Option<f64> {
    if previous > 0.0 {
        Some((current - previous) / previous * 100.0)
    } else {
        None
    }
}

fn sum_amounts(txns: &[&transaction::Model]) -> f64 {
    txns.iter().map(|t| t.amount).sum()
}

fn mean_amount(txns: &[&transaction::Model]) -> f64 {
    if txns.is_empty() {
        0.0
    } else {
        sum_amounts(txns) / txns.len() as f64
    }
}

fn largest<'a>(txns: &[&'a transaction::Model]) -> Option<&'a transaction::Model> {
    let mut best: Option<&transaction::Model> = None;
    for t in txns {
        match best {
            // Strict comparison keeps the first-encountered on ties
            Some(b) if t.amount <= b.amount => {}
            _ => best = Some(t),
        }
    }
    best
}

/// Groups transactions by category: per-category sum, count, and share of
/// `total`. Sorted descending by amount; equal amounts keep the order the
/// categories were first encountered in.
#[must_use]
pub fn build_category_breakdown(
    txns: &[&transaction::Model],
    transaction_type: &str,
    total: f64,
) -> Vec<CategoryBreakdown> {
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    for t in txns {
        match groups.iter_mut().find(|(category, _, _)| *category == t.category) {
            Some((_, amount, count)) => {
                *amount += t.amount;
                *count += 1;
            }
            None => groups.push((t.category.clone(), t.amount, 1)),
        }
    }

    let mut breakdown: Vec<CategoryBreakdown> = groups
        .into_iter()
        .map(|(category, amount, count)| CategoryBreakdown {
            label: categories::category_label(transaction_type, &category),
            category,
            amount,
            count,
            percentage: if total > 0.0 { amount / total * 100.0 } else { 0.0 },
        })
        .collect();
    breakdown.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    breakdown
}

/// Groups a period's transactions by circuit. Transactions without a circuit
/// reference are skipped; references that no longer resolve are reported as
/// "Unknown". Sorted descending by receipts, stable on ties.
#[must_use]
pub fn build_circuit_breakdown(
    txns: &[&transaction::Model],
    circuits: &[circuit::Model],
) -> Vec<CircuitBreakdown> {
    struct Group {
        circuit_uid: String,
        receipts: f64,
        payments: f64,
        count: usize,
    }

    let mut groups: Vec<Group> = Vec::new();
    for t in txns {
        let Some(circuit_uid) = &t.circuit_uid else {
            continue;
        };
        let idx = groups
            .iter()
            .position(|g| g.circuit_uid == *circuit_uid)
            .unwrap_or_else(|| {
                groups.push(Group {
                    circuit_uid: circuit_uid.clone(),
                    receipts: 0.0,
                    payments: 0.0,
                    count: 0,
                });
                groups.len() - 1
            });
        let group = &mut groups[idx];
        if t.transaction_type == categories::RECEIPT {
            group.receipts += t.amount;
        } else {
            group.payments += t.amount;
        }
        group.count += 1;
    }

    let mut breakdown: Vec<CircuitBreakdown> = groups
        .into_iter()
        .map(|g| CircuitBreakdown {
            name: circuits
                .iter()
                .find(|c| c.uid == g.circuit_uid)
                .map_or_else(|| "Unknown".to_string(), |c| c.name.clone()),
            receipts: g.receipts,
            payments: g.payments,
            net: g.receipts - g.payments,
            txn_count: g.count,
        })
        .collect();
    breakdown.sort_by(|a, b| b.receipts.partial_cmp(&a.receipts).unwrap_or(Ordering::Equal));
    breakdown
}

fn build_monthly_breakdown(
    txns: &[&transaction::Model],
    quarter: i32,
) -> Vec<MonthlyBreakdown> {
    use chrono::Datelike;

    let start = period::quarter_start_month0(quarter);
    (0..3)
        .map(|offset| {
            let month_index = start + offset;
            let month_txns: Vec<&&transaction::Model> = txns
                .iter()
                .filter(|t| t.date.month0() as i32 == month_index)
                .collect();
            let receipts: f64 = month_txns
                .iter()
                .filter(|t| t.transaction_type == categories::RECEIPT)
                .map(|t| t.amount)
                .sum();
            let payments: f64 = month_txns
                .iter()
                .filter(|t| t.transaction_type == categories::PAYMENT)
                .map(|t| t.amount)
                .sum();
            MonthlyBreakdown {
                month: period::month_name(month_index).to_string(),
                month_index,
                receipts,
                payments,
                net: receipts - payments,
                txn_count: month_txns.len(),
            }
        })
        .collect()
}

fn surplus_deficit(net_balance: f64) -> String {
    if net_balance > 0.0 {
        "surplus".to_string()
    } else if net_balance < 0.0 {
        "deficit".to_string()
    } else {
        "balanced".to_string()
    }
}

fn sorted_by_date_desc(txns: &[&transaction::Model]) -> Vec<transaction::Model> {
    let mut sorted: Vec<transaction::Model> = txns.iter().map(|t| (*t).clone()).collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Builds the full quarterly report from in-memory record lists.
///
/// Pure and total: any transaction list, any circuit list, any quarter/year
/// pair produces a well-defined `ReportData`. Statistics over empty subsets
/// come out as zeros and `None`s, never NaN or infinity.
#[must_use]
pub fn build_report_data(
    transactions: &[transaction::Model],
    circuits: &[circuit::Model],
    quarter: i32,
    year: i32,
) -> ReportData {
    let filtered: Vec<&transaction::Model> = transactions
        .iter()
        .filter(|t| t.quarter == quarter && t.year == year)
        .collect();
    let receipts: Vec<&transaction::Model> = filtered
        .iter()
        .copied()
        .filter(|t| t.transaction_type == categories::RECEIPT)
        .collect();
    let payments: Vec<&transaction::Model> = filtered
        .iter()
        .copied()
        .filter(|t| t.transaction_type == categories::PAYMENT)
        .collect();

    let total_receipts = sum_amounts(&receipts);
    let total_payments = sum_amounts(&payments);
    let net_balance = total_receipts - total_payments;

    let receipts_by_category =
        build_category_breakdown(&receipts, categories::RECEIPT, total_receipts);
    let payments_by_category =
        build_category_breakdown(&payments, categories::PAYMENT, total_payments);
    let circuit_breakdown = build_circuit_breakdown(&filtered, circuits);
    let monthly_breakdown = build_monthly_breakdown(&filtered, quarter);

    // Previous-quarter comparison
    let (prev_quarter, prev_year) = period::previous_quarter(quarter, year);
    let prev_filtered: Vec<&transaction::Model> = transactions
        .iter()
        .filter(|t| t.quarter == prev_quarter && t.year == prev_year)
        .collect();
    let prev_q_receipts: f64 = prev_filtered
        .iter()
        .filter(|t| t.transaction_type == categories::RECEIPT)
        .map(|t| t.amount)
        .sum();
    let prev_q_payments: f64 = prev_filtered
        .iter()
        .filter(|t| t.transaction_type == categories::PAYMENT)
        .map(|t| t.amount)
        .sum();
    let prev_q_balance = prev_q_receipts - prev_q_payments;
    let has_prev_data = !prev_filtered.is_empty();

    let amounts: Vec<f64> = filtered.iter().map(|t| t.amount).collect();

    let busy_month = monthly_breakdown
        .iter()
        .reduce(|max, m| if m.txn_count > max.txn_count { m } else { max })
        .map_or_else(String::new, |m| m.month.clone());
    let quiet_month = monthly_breakdown
        .iter()
        .reduce(|min, m| if m.txn_count < min.txn_count { m } else { min })
        .map_or_else(String::new, |m| m.month.clone());

    let advanced = AdvancedStats {
        avg_transaction_size: mean_amount(&filtered),
        avg_receipt_size: mean_amount(&receipts),
        avg_payment_size: mean_amount(&payments),
        median_transaction: median(&amounts),
        largest_receipt: largest(&receipts).cloned(),
        largest_payment: largest(&payments).cloned(),
        receipt_growth_vs_prev_q: has_prev_data
            .then(|| growth(total_receipts, prev_q_receipts))
            .flatten(),
        payment_growth_vs_prev_q: has_prev_data
            .then(|| growth(total_payments, prev_q_payments))
            .flatten(),
        balance_growth_vs_prev_q: has_prev_data
            .then(|| growth(net_balance, prev_q_balance))
            .flatten(),
        prev_q_receipts,
        prev_q_payments,
        prev_q_balance,
        top_receipt_categories: receipts_by_category.iter().take(5).cloned().collect(),
        top_payment_categories: payments_by_category.iter().take(5).cloned().collect(),
        busy_month,
        quiet_month,
        operating_ratio: if total_receipts > 0.0 {
            total_payments / total_receipts
        } else {
            0.0
        },
        surplus_deficit: surplus_deficit(net_balance),
    };

    ReportData {
        organization: ORGANIZATION_NAME.to_string(),
        currency_symbol: CURRENCY_SYMBOL.to_string(),
        quarter,
        year,
        quarter_label: period::quarter_label(quarter).to_string(),
        generated_at: chrono::Utc::now(),
        total_receipts,
        total_payments,
        net_balance,
        total_transactions: filtered.len(),
        receipt_count: receipts.len(),
        payment_count: payments.len(),
        receipts_by_category,
        payments_by_category,
        circuit_breakdown,
        monthly_breakdown,
        advanced,
        all_receipts: sorted_by_date_desc(&receipts),
        all_payments: sorted_by_date_desc(&payments),
    }
}

/// Loads the store and builds the quarterly report.
pub async fn generate_quarterly_report(
    db: &DatabaseConnection,
    quarter: i32,
    year: i32,
) -> Result<ReportData> {
    if !(1..=4).contains(&quarter) {
        return Err(Error::Validation {
            message: format!("Quarter must be between 1 and 4, got {quarter}"),
        });
    }

    let transactions = Transaction::find().all(db).await?;
    let circuits = Circuit::find().all(db).await?;

    Ok(build_report_data(&transactions, &circuits, quarter, year))
}

/// Builds the quarterly report and records it on the generated-document
/// audit trail with its serialized payload.
pub async fn generate_and_archive_report(
    db: &DatabaseConnection,
    quarter: i32,
    year: i32,
) -> Result<ReportData> {
    let report = generate_quarterly_report(db, quarter, year).await?;

    let payload = serde_json::to_string(&report)?;
    document::record_document(
        db,
        "quarterly_report",
        format!("Quarterly Financial Report Q{quarter} {year}"),
        Some(quarter),
        year,
        Some(payload),
    )
    .await?;

    Ok(report)
}
