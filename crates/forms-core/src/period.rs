//! Reporting periods: the two fixed half-year windows.

use chrono::NaiveDate;

use crate::entry::FinancialEntry;
use crate::error::FormError;

/// One of the two semi-annual audit windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportingPeriod {
    JanuaryJune,
    JulyDecember,
}

impl ReportingPeriod {
    /// Parse the wire form. Anything other than the two exact strings
    /// is an invalid period.
    pub fn parse(s: &str) -> Result<Self, FormError> {
        match s {
            "January-June" => Ok(ReportingPeriod::JanuaryJune),
            "July-December" => Ok(ReportingPeriod::JulyDecember),
            other => Err(FormError::InvalidPeriod(other.to_string())),
        }
    }

    /// Exact string used in request bodies and filenames.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ReportingPeriod::JanuaryJune => "January-June",
            ReportingPeriod::JulyDecember => "July-December",
        }
    }

    /// Inclusive date range for the window in the given year.
    pub fn date_range(&self, year: i32) -> (NaiveDate, NaiveDate) {
        match self {
            ReportingPeriod::JanuaryJune => (
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(year, 6, 30).unwrap(),
            ),
            ReportingPeriod::JulyDecember => (
                NaiveDate::from_ymd_opt(year, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
            ),
        }
    }
}

impl std::fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Keep only entries whose resolved date falls inside the window,
/// inclusive of both endpoints. Entries with unresolvable dates carry
/// the far-past sentinel and drop out here.
pub fn filter_by_period<'a>(
    entries: &'a [&'a FinancialEntry],
    period: ReportingPeriod,
    year: i32,
) -> Vec<&'a FinancialEntry> {
    let (start, end) = period.date_range(year);
    entries
        .iter()
        .copied()
        .filter(|e| {
            let date = e.resolved_date();
            date >= start && date <= end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryDate;

    fn dated(date: &str, amount: f64) -> FinancialEntry {
        FinancialEntry {
            date: Some(EntryDate::Iso(date.to_string())),
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn parses_only_the_two_known_periods() {
        assert_eq!(
            ReportingPeriod::parse("January-June").unwrap(),
            ReportingPeriod::JanuaryJune
        );
        assert_eq!(
            ReportingPeriod::parse("July-December").unwrap(),
            ReportingPeriod::JulyDecember
        );
        assert!(ReportingPeriod::parse("january-june").is_err());
        assert!(ReportingPeriod::parse("Q1").is_err());
        assert!(ReportingPeriod::parse("").is_err());
    }

    #[test]
    fn date_ranges_are_half_years() {
        let (start, end) = ReportingPeriod::JanuaryJune.date_range(2024);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());

        let (start, end) = ReportingPeriod::JulyDecember.date_range(2024);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn filter_is_inclusive_of_both_endpoints() {
        let entries = vec![
            dated("2024-01-01", 1.0),
            dated("2024-06-30", 2.0),
            dated("2024-07-01", 3.0),
            dated("2023-12-31", 4.0),
        ];
        let refs: Vec<&FinancialEntry> = entries.iter().collect();
        let kept = filter_by_period(&refs, ReportingPeriod::JanuaryJune, 2024);
        let amounts: Vec<f64> = kept.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0]);
    }

    #[test]
    fn sentinel_dates_never_match() {
        let entries = vec![FinancialEntry {
            amount: 9.0,
            ..Default::default()
        }];
        let refs: Vec<&FinancialEntry> = entries.iter().collect();
        // The sentinel is 1900-01-01; any real reporting year excludes it.
        assert!(filter_by_period(&refs, ReportingPeriod::JanuaryJune, 2024).is_empty());
        assert!(filter_by_period(&refs, ReportingPeriod::JulyDecember, 2024).is_empty());
    }

    #[test]
    fn filtered_set_is_a_subset() {
        let entries = vec![
            dated("2024-02-15", 1.0),
            dated("2024-08-15", 2.0),
            FinancialEntry::default(),
        ];
        let refs: Vec<&FinancialEntry> = entries.iter().collect();
        let kept = filter_by_period(&refs, ReportingPeriod::JulyDecember, 2024);
        assert!(kept.len() <= refs.len());
        let (start, end) = ReportingPeriod::JulyDecember.date_range(2024);
        for e in kept {
            let d = e.resolved_date();
            assert!(d >= start && d <= end);
        }
    }
}
