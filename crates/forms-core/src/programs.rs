//! Program-level income aggregation for the audit report.
//!
//! Membership dues are pulled out first (they get their own line on the
//! form), then the remaining income is grouped by program and ranked.
//! The form has room for the top two programs; everything else lands in
//! a single "Other" bucket.

use crate::entry::FinancialEntry;

/// Case-insensitive marker for the dues category.
const MEMBERSHIP_DUES_MARKER: &str = "membership dues";

/// Name for entries with no program at all.
const UNKNOWN_PROGRAM: &str = "Unknown";

/// One program's summed income.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramTotal {
    pub name: String,
    pub amount: f64,
}

/// Aggregated income for the period, shaped for the form's income section.
#[derive(Debug, Clone, Default)]
pub struct ProgramBreakdown {
    /// Sum of all entries in the dues category (expenses included, per
    /// the form's definition of the dues line).
    pub membership_dues: f64,
    pub top1: ProgramTotal,
    pub top2: ProgramTotal,
    /// "Other" when any programs remain past the top two, else "".
    pub other_label: String,
    pub other_amount: f64,
}

/// Group period income by program and rank descending by amount.
///
/// Grouping preserves first-seen order, and the sort is stable, so two
/// programs with equal totals rank in aggregation order.
pub fn aggregate_programs(entries: &[&FinancialEntry]) -> ProgramBreakdown {
    let mut membership_dues = 0.0;
    let mut groups: Vec<ProgramTotal> = Vec::new();

    for entry in entries {
        let name = entry.resolved_program();
        if name.to_lowercase().contains(MEMBERSHIP_DUES_MARKER) {
            membership_dues += entry.amount;
            continue;
        }
        if entry.is_expense {
            continue;
        }
        let name = if name.is_empty() { UNKNOWN_PROGRAM } else { name };
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.amount += entry.amount,
            None => groups.push(ProgramTotal {
                name: name.to_string(),
                amount: entry.amount,
            }),
        }
    }

    groups.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let other_amount: f64 = groups.iter().skip(2).map(|g| g.amount).sum();
    let other_label = if groups.len() > 2 { "Other" } else { "" };

    let mut ranked = groups.into_iter();
    ProgramBreakdown {
        membership_dues,
        top1: ranked.next().unwrap_or_default(),
        top2: ranked.next().unwrap_or_default(),
        other_label: other_label.to_string(),
        other_amount,
    }
}
