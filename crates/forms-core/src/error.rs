//! Error types for form generation.
//!
//! Validation failures surface before any template or fill work starts;
//! everything else is terminal for the request and reported generically.

use std::path::PathBuf;

use thiserror::Error;

use crate::report::ReportKind;

#[derive(Debug, Error)]
pub enum FormError {
    /// The period selector was missing or not one of the two known windows.
    #[error("Invalid period '{0}'. Must be January-June or July-December")]
    InvalidPeriod(String),

    /// The report year was missing or empty.
    #[error("Year is required")]
    MissingYear,

    /// No template file exists for the requested report.
    #[error("template for {kind} not found at {path}")]
    Template { kind: ReportKind, path: PathBuf },

    /// The delegated fill step failed (pdftk missing, bad template, ...).
    #[error("form fill failed: {0}")]
    Filler(String),
}

impl FormError {
    /// Validation errors are the caller's fault and map to a client error;
    /// everything else is a server-side failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, FormError::InvalidPeriod(_) | FormError::MissingYear)
    }
}
