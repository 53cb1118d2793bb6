//! Core pipeline for filling council audit and survey PDF forms.
//!
//! The flow for an audit report is: raw financial entries are filtered
//! to a reporting period, income is aggregated by program, a fixed
//! chain of derived totals is computed, and the result is projected
//! onto one of the per-template field-identifier tables. Actual
//! document mutation is delegated to the [`fill`] collaborator.

pub mod entry;
pub mod error;
pub mod fill;
pub mod mapper;
pub mod period;
pub mod programs;
pub mod report;
pub mod schemes;
pub mod totals;

pub use error::FormError;
pub use report::ReportKind;
