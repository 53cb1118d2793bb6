//! Financial entry records supplied by the caller.
//!
//! Entries arrive in request bodies with loosely typed dates (ISO
//! strings or serialized timestamp objects) and a program name that may
//! be flat or nested. Nothing here is persisted; entries live for one
//! request.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Sentinel date for entries whose date is missing or unparseable.
/// Far enough in the past to fall outside any real reporting window.
pub fn far_past() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
}

/// A date value as it appears on the wire: an ISO string or a
/// serialized timestamp object (`{"_seconds": N}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryDate {
    Iso(String),
    Timestamp {
        #[serde(rename = "_seconds")]
        seconds: i64,
    },
}

/// Nested program reference (`{"program": {"name": ...}}` form).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// One income or expense record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialEntry {
    #[serde(default)]
    pub date: Option<EntryDate>,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "programName", default, skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<ProgramRef>,
    #[serde(rename = "isExpense", default)]
    pub is_expense: bool,
}

impl FinancialEntry {
    /// Program name, falling back to the nested program object, then "".
    pub fn resolved_program(&self) -> &str {
        self.program_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.program.as_ref().and_then(|p| p.name.as_deref()))
            .unwrap_or("")
    }

    /// Entry date resolved to a calendar day; anything unparseable gets
    /// the far-past sentinel so it never matches a real period.
    pub fn resolved_date(&self) -> NaiveDate {
        match &self.date {
            Some(EntryDate::Iso(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
                .unwrap_or_else(|| {
                    tracing::debug!(date = %s, "unparseable entry date, using sentinel");
                    far_past()
                }),
            Some(EntryDate::Timestamp { seconds }) => DateTime::from_timestamp(*seconds, 0)
                .map(|dt| dt.date_naive())
                .unwrap_or_else(far_past),
            None => far_past(),
        }
    }
}

/// Load entries from a CSV export (Date, Amount, Category columns).
/// Negative amounts are recorded as expenses with the sign stripped.
pub fn load_entries_from_csv(path: &Path) -> Result<Vec<FinancialEntry>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    entries_from_csv_reader(file)
}

/// CSV row shape for finance exports.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Category")]
    category: String,
}

pub fn entries_from_csv_reader<R: Read>(reader: R) -> Result<Vec<FinancialEntry>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in rdr.deserialize() {
        let row: CsvRow = result.context("Invalid CSV row")?;
        if row.date.trim().is_empty() || row.category.trim().is_empty() {
            continue;
        }
        let amount = parse_csv_amount(&row.amount);
        entries.push(FinancialEntry {
            date: Some(EntryDate::Iso(normalize_csv_date(&row.date))),
            amount: amount.abs(),
            program_name: Some(row.category.trim().to_string()),
            program: None,
            is_expense: amount < 0.0,
        });
    }

    Ok(entries)
}

/// Parse "$1,234.56" / "-12.00" style amounts; unparseable values become 0.
fn parse_csv_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '"'))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse().unwrap_or_else(|_| {
        tracing::debug!(value = %raw, "unparseable CSV amount coerced to 0");
        0.0
    })
}

/// Accept either ISO dates or US-style M/D/Y (with 2- or 4-digit years).
fn normalize_csv_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }
    for fmt in ["%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.format("%Y-%m-%d").to_string();
        }
    }
    raw.to_string()
}
