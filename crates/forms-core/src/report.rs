//! Report requests and the logical values they produce.
//!
//! Each request type deserializes straight from the intake JSON,
//! validates the minimum it needs, and renders the logical columns a
//! field scheme knows how to place. Rendering is where money values
//! pick up their two-decimal form; everything upstream stays numeric.

use std::fmt;

use serde::Deserialize;

use crate::entry::FinancialEntry;
use crate::error::FormError;
use crate::period::{filter_by_period, ReportingPeriod};
use crate::programs::aggregate_programs;
use crate::schemes::{
    self, FieldScheme, AUDIT_JAN_JUN, AUDIT_JUL_DEC, FORM_1728,
    SURVEY_ASSEMBLY_ACTIVITY_COUNT, SURVEY_COUNCIL_ACTIVITY_COUNT, SURVEY_TOTAL_FIELDS,
    SURVEY_YEAR_FIELDS,
};
use crate::totals::{fmt_amount, AuditTotals, ManualFigures, MoneyField};

/// Which template a request fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Audit,
    Form1728,
    IndividualSurvey,
}

impl ReportKind {
    /// Template file name, relative to the configured template
    /// directory.
    pub fn template_file(&self) -> &'static str {
        match self {
            ReportKind::Audit => "audit2_1295_p.pdf",
            ReportKind::Form1728 => "fraternal_survey1728_p.pdf",
            ReportKind::IndividualSurvey => "individual_survey1728a_p.pdf",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::Audit => "audit report",
            ReportKind::Form1728 => "form 1728",
            ReportKind::IndividualSurvey => "individual survey",
        };
        f.write_str(name)
    }
}

/// A year as clients send it: a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Number(i64),
    Text(String),
}

impl YearField {
    pub fn as_string(&self) -> String {
        match self {
            YearField::Number(n) => n.to_string(),
            YearField::Text(s) => s.trim().to_string(),
        }
    }

    /// Last two characters, as printed on the forms. Char-wise, since
    /// any non-empty string passes intake validation.
    pub fn suffix(&self) -> String {
        let s = self.as_string();
        let cut = s.char_indices().rev().nth(1).map_or(0, |(i, _)| i);
        s[cut..].to_string()
    }

    /// Present and non-empty. Numeric years always qualify.
    pub fn is_present(&self) -> bool {
        match self {
            YearField::Number(_) => true,
            YearField::Text(s) => !s.trim().is_empty(),
        }
    }

    /// Calendar year for date filtering, clamped to a plausible range.
    /// A non-numeric year passes intake validation but matches no
    /// entries.
    pub fn calendar_year(&self) -> i32 {
        let year = match self {
            YearField::Number(n) => *n,
            YearField::Text(s) => s.trim().parse().unwrap_or_else(|_| {
                tracing::debug!(year = %s, "non-numeric year, period filter will match nothing");
                0
            }),
        };
        year.clamp(0, 9999) as i32
    }
}

/// Everything a caller sends to fill one half-year audit report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditReportRequest {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub year: Option<YearField>,
    #[serde(default)]
    pub council_number: Option<String>,
    #[serde(default)]
    pub auditor_name: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub reserved_1: MoneyField,
    #[serde(default)]
    pub reserved_2: MoneyField,
    #[serde(default)]
    pub reserved_3: MoneyField,
    #[serde(default)]
    pub income: Vec<FinancialEntry>,
    #[serde(default)]
    pub expenses: Vec<FinancialEntry>,
    #[serde(flatten)]
    pub manual: ManualFigures,
}

impl AuditReportRequest {
    /// Period and year checks, in that order, before any work happens.
    pub fn validate(&self) -> Result<(ReportingPeriod, &YearField), FormError> {
        let period = match &self.period {
            Some(p) => ReportingPeriod::parse(p)?,
            None => return Err(FormError::InvalidPeriod(String::new())),
        };
        match &self.year {
            Some(y) if y.is_present() => Ok((period, y)),
            _ => Err(FormError::MissingYear),
        }
    }

    /// Field scheme for the requested half.
    pub fn scheme(period: ReportingPeriod) -> &'static FieldScheme {
        match period {
            ReportingPeriod::JanuaryJune => &AUDIT_JAN_JUN,
            ReportingPeriod::JulyDecember => &AUDIT_JUL_DEC,
        }
    }

    /// Run the whole audit pipeline and render every logical column.
    pub fn logical_values(&self) -> Result<Vec<(&'static str, String)>, FormError> {
        let (period, year) = self.validate()?;

        let all: Vec<&FinancialEntry> = self.income.iter().chain(self.expenses.iter()).collect();
        let in_period = filter_by_period(&all, period, year.calendar_year());
        let breakdown = aggregate_programs(&in_period);
        let totals = AuditTotals::compute(&breakdown, &self.manual);

        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let m = &self.manual;

        let mut values: Vec<(&'static str, String)> = vec![
            ("council_number", opt(&self.council_number)),
            ("auditor_name", opt(&self.auditor_name)),
            ("year_suffix", year.suffix()),
            ("organization_name", opt(&self.organization_name)),
            ("manual_income_1", fmt_amount(m.manual_income_1.amount())),
            ("membership_dues", fmt_amount(breakdown.membership_dues)),
            ("top_program_1_name", breakdown.top1.name.clone()),
            ("top_program_1_amount", fmt_amount(breakdown.top1.amount)),
            ("top_program_2_name", breakdown.top2.name.clone()),
            ("top_program_2_amount", fmt_amount(breakdown.top2.amount)),
            ("other_label", breakdown.other_label.clone()),
            ("other_programs_amount", fmt_amount(breakdown.other_amount)),
            ("total_income", fmt_amount(totals.total_income)),
            ("manual_income_2", fmt_amount(m.manual_income_2.amount())),
            ("net_income", fmt_amount(totals.net_income)),
            ("reserved_1", self.reserved_1.display_text()),
            ("reserved_2", self.reserved_2.display_text()),
            ("reserved_3", self.reserved_3.display_text()),
            ("interest_earned", fmt_amount(m.interest_earned.amount())),
            ("total_interest", fmt_amount(totals.total_interest)),
            ("supreme_per_capita", fmt_amount(m.supreme_per_capita.amount())),
            ("state_per_capita", fmt_amount(m.state_per_capita.amount())),
            ("other_council_programs", fmt_amount(m.other_council_programs.amount())),
            ("manual_expense_1", fmt_amount(m.manual_expense_1.amount())),
            ("manual_expense_2", fmt_amount(m.manual_expense_2.amount())),
            ("total_expenses", fmt_amount(totals.total_expenses)),
            ("net_council", fmt_amount(totals.net_council)),
            // The verification slot repeats the same figure so a
            // transposition in the ledger shows up on paper.
            ("net_council_verify", fmt_amount(totals.net_council)),
            ("manual_membership_1", fmt_amount(m.manual_membership_1.amount())),
            ("manual_membership_2", fmt_amount(m.manual_membership_2.amount())),
            ("manual_membership_3", fmt_amount(m.manual_membership_3.amount())),
            ("membership_count", m.membership_count.display_text()),
            ("membership_dues_total", fmt_amount(m.membership_dues_total.amount())),
            ("total_membership", fmt_amount(totals.total_membership)),
            ("total_disbursements", fmt_amount(m.total_disbursements_sum.amount())),
            ("net_membership", fmt_amount(totals.net_membership)),
            ("manual_disbursement_1", fmt_amount(m.manual_disbursement_1.amount())),
            ("manual_disbursement_2", fmt_amount(m.manual_disbursement_2.amount())),
            ("manual_disbursement_3", fmt_amount(m.manual_disbursement_3.amount())),
            ("manual_disbursement_4", fmt_amount(m.manual_disbursement_4.amount())),
            (
                "total_disbursements_verify",
                fmt_amount(totals.total_disbursements_verify),
            ),
            ("total_disbursements_sum", fmt_amount(totals.disbursements_total)),
        ];

        // Itemized columns 8, 10, 12, and 14 onward are free text.
        let money_columns = [1usize, 2, 3, 4, 5, 6, 7, 9, 11, 13];
        let item = |n: usize| -> &MoneyField {
            match n {
                1 => &m.manual_field_1,
                2 => &m.manual_field_2,
                3 => &m.manual_field_3,
                4 => &m.manual_field_4,
                5 => &m.manual_field_5,
                6 => &m.manual_field_6,
                7 => &m.manual_field_7,
                8 => &m.manual_field_8,
                9 => &m.manual_field_9,
                10 => &m.manual_field_10,
                11 => &m.manual_field_11,
                12 => &m.manual_field_12,
                13 => &m.manual_field_13,
                14 => &m.manual_field_14,
                15 => &m.manual_field_15,
                16 => &m.manual_field_16,
                17 => &m.manual_field_17,
                18 => &m.manual_field_18,
                19 => &m.manual_field_19,
                _ => &m.manual_field_20,
            }
        };
        const ITEM_KEYS: [&str; 20] = [
            "manual_field_1",
            "manual_field_2",
            "manual_field_3",
            "manual_field_4",
            "manual_field_5",
            "manual_field_6",
            "manual_field_7",
            "manual_field_8",
            "manual_field_9",
            "manual_field_10",
            "manual_field_11",
            "manual_field_12",
            "manual_field_13",
            "manual_field_14",
            "manual_field_15",
            "manual_field_16",
            "manual_field_17",
            "manual_field_18",
            "manual_field_19",
            "manual_field_20",
        ];
        for n in 1..=20 {
            let rendered = if money_columns.contains(&n) {
                fmt_amount(item(n).amount())
            } else {
                item(n).display_text()
            };
            values.push((ITEM_KEYS[n - 1], rendered));
        }

        Ok(values)
    }

    /// Download name for the rendered report.
    pub fn file_name(&self, period: ReportingPeriod, year: &YearField) -> String {
        format!(
            "audit_report_{}_{}.pdf",
            period.wire_name().to_lowercase(),
            year.as_string()
        )
    }
}

/// Form 1728 council survey. Two fields, both pass-through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Form1728Request {
    #[serde(default, rename = "councilNumber")]
    pub council_number: MoneyField,
    #[serde(default, rename = "yearStart")]
    pub year_start: MoneyField,
}

impl Form1728Request {
    /// The survey year is the one field the form cannot do without.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.year_start.display_text().trim().is_empty() {
            return Err(FormError::MissingYear);
        }
        Ok(())
    }

    pub fn logical_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("council_number", self.council_number.display_text()),
            ("year_start", self.year_start.display_text()),
        ]
    }

    pub fn scheme() -> &'static FieldScheme {
        &FORM_1728
    }

    pub fn file_name(&self) -> &'static str {
        "Form1728P_filled.pdf"
    }
}

/// Individual member survey: a year plus per-activity hour counts.
/// Activity keys are numbered, so they ride in as a flattened map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndividualSurveyRequest {
    #[serde(default)]
    pub year: Option<YearField>,
    #[serde(default)]
    pub council_total: Option<serde_json::Value>,
    #[serde(default)]
    pub assembly_total: Option<serde_json::Value>,
    #[serde(flatten)]
    pub activities: serde_json::Map<String, serde_json::Value>,
}

impl IndividualSurveyRequest {
    pub fn validate(&self) -> Result<&YearField, FormError> {
        match &self.year {
            Some(y) if y.is_present() => Ok(y),
            _ => Err(FormError::MissingYear),
        }
    }

    fn hours(&self, key: &str) -> String {
        match self.activities.get(key) {
            Some(v) => render_value(v),
            None => "0".to_string(),
        }
    }

    /// Field ids are positional on this template, so the values come
    /// out already keyed by id.
    pub fn field_values(&self) -> Result<Vec<(String, String)>, FormError> {
        let year = self.validate()?;
        let mut values = Vec::new();
        for id in SURVEY_YEAR_FIELDS {
            values.push((id.to_string(), year.suffix()));
        }
        for n in 1..=SURVEY_COUNCIL_ACTIVITY_COUNT {
            let key = format!("council_activity_{n}");
            values.push((schemes::survey_council_field(n), self.hours(&key)));
        }
        for n in 1..=SURVEY_ASSEMBLY_ACTIVITY_COUNT {
            let key = format!("assembly_activity_{n}");
            values.push((schemes::survey_assembly_field(n), self.hours(&key)));
        }
        let totals = [&self.council_total, &self.assembly_total];
        for (id, total) in SURVEY_TOTAL_FIELDS.iter().zip(totals) {
            let rendered = total.as_ref().map(render_value).unwrap_or_else(|| "0".to_string());
            values.push((id.to_string(), rendered));
        }
        Ok(values)
    }

    pub fn file_name(&self, year: &YearField) -> String {
        format!("individual_survey_{}.pdf", year.as_string())
    }
}

/// String form of an arbitrary JSON value, the way it lands in a text
/// field. Whole numbers drop their fraction.
pub fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else {
                n.to_string()
            }
        }
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
