//! Export surfaces - flat CSV rows and the versioned JSON backup envelope.

/// Full-store JSON backup export and restore
pub mod backup;
/// Flat transaction CSV export
pub mod csv;
