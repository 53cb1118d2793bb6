//! Derived audit totals.
//!
//! Every total is a fixed sum/difference over the program aggregate and
//! the manually entered figures. Intermediate arithmetic stays in full
//! f64 precision; only the rendered field value is rounded to two
//! decimals. Missing or non-numeric manual values coerce to zero so a
//! partially filled form still produces a report.

use serde::Deserialize;

use crate::programs::ProgramBreakdown;

/// A manually entered money value. Intake clients send these as
/// numbers, strings, or not at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum MoneyField {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl MoneyField {
    /// Coerced numeric value. Non-numeric text is logged and becomes 0.
    pub fn amount(&self) -> f64 {
        match self {
            MoneyField::Number(n) => *n,
            MoneyField::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return 0.0;
                }
                trimmed.parse().unwrap_or_else(|_| {
                    tracing::debug!(value = %s, "non-numeric money value coerced to 0");
                    0.0
                })
            }
            MoneyField::Missing => 0.0,
        }
    }

    /// Raw text form for pass-through (non-money) columns.
    pub fn display_text(&self) -> String {
        match self {
            MoneyField::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            MoneyField::Text(s) => s.clone(),
            MoneyField::Missing => String::new(),
        }
    }
}

/// All manually entered figures on the audit form, keyed exactly as the
/// intake clients send them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManualFigures {
    #[serde(default)]
    pub manual_income_1: MoneyField,
    #[serde(default)]
    pub manual_income_2: MoneyField,
    #[serde(default)]
    pub interest_earned: MoneyField,
    #[serde(default)]
    pub manual_interest_1: MoneyField,
    #[serde(default)]
    pub manual_interest_2: MoneyField,
    #[serde(default)]
    pub supreme_per_capita: MoneyField,
    #[serde(default)]
    pub state_per_capita: MoneyField,
    #[serde(default)]
    pub other_council_programs: MoneyField,
    #[serde(default)]
    pub manual_expense_1: MoneyField,
    #[serde(default)]
    pub manual_expense_2: MoneyField,
    #[serde(default)]
    pub manual_membership_1: MoneyField,
    #[serde(default)]
    pub manual_membership_2: MoneyField,
    #[serde(default)]
    pub manual_membership_3: MoneyField,
    #[serde(default)]
    pub membership_count: MoneyField,
    #[serde(default)]
    pub membership_dues_total: MoneyField,
    /// Caller-supplied copy of the disbursement total (the form's own
    /// cross-reference from the disbursement section).
    #[serde(default)]
    pub total_disbursements_sum: MoneyField,
    #[serde(default)]
    pub manual_disbursement_1: MoneyField,
    #[serde(default)]
    pub manual_disbursement_2: MoneyField,
    #[serde(default)]
    pub manual_disbursement_3: MoneyField,
    #[serde(default)]
    pub manual_disbursement_4: MoneyField,
    #[serde(default)]
    pub manual_field_1: MoneyField,
    #[serde(default)]
    pub manual_field_2: MoneyField,
    #[serde(default)]
    pub manual_field_3: MoneyField,
    #[serde(default)]
    pub manual_field_4: MoneyField,
    #[serde(default)]
    pub manual_field_5: MoneyField,
    #[serde(default)]
    pub manual_field_6: MoneyField,
    #[serde(default)]
    pub manual_field_7: MoneyField,
    #[serde(default)]
    pub manual_field_8: MoneyField,
    #[serde(default)]
    pub manual_field_9: MoneyField,
    #[serde(default)]
    pub manual_field_10: MoneyField,
    #[serde(default)]
    pub manual_field_11: MoneyField,
    #[serde(default)]
    pub manual_field_12: MoneyField,
    #[serde(default)]
    pub manual_field_13: MoneyField,
    #[serde(default)]
    pub manual_field_14: MoneyField,
    #[serde(default)]
    pub manual_field_15: MoneyField,
    #[serde(default)]
    pub manual_field_16: MoneyField,
    #[serde(default)]
    pub manual_field_17: MoneyField,
    #[serde(default)]
    pub manual_field_18: MoneyField,
    #[serde(default)]
    pub manual_field_19: MoneyField,
    #[serde(default)]
    pub manual_field_20: MoneyField,
}

/// The full derived-total chain for one audit report.
#[derive(Debug, Clone, Default)]
pub struct AuditTotals {
    pub total_income: f64,
    pub net_income: f64,
    pub total_interest: f64,
    pub total_expenses: f64,
    pub net_council: f64,
    pub total_membership: f64,
    pub net_membership: f64,
    /// Computed from the itemized disbursement columns.
    pub disbursements_total: f64,
    /// Re-derivation that must equal the disbursement total under
    /// consistent input. A mismatch is a caller-visible red flag, not
    /// an error here.
    pub total_disbursements_verify: f64,
}

impl AuditTotals {
    /// Run the whole chain. Each total feeds the next.
    pub fn compute(breakdown: &ProgramBreakdown, manual: &ManualFigures) -> Self {
        let total_income = manual.manual_income_1.amount()
            + breakdown.membership_dues
            + breakdown.top1.amount
            + breakdown.top2.amount
            + breakdown.other_amount;
        let net_income = total_income - manual.manual_income_2.amount();

        let total_interest = manual.interest_earned.amount()
            + manual.manual_interest_1.amount()
            + manual.manual_interest_2.amount();
        let total_expenses = manual.other_council_programs.amount()
            + manual.manual_expense_1.amount()
            + manual.manual_expense_2.amount();
        let net_council = total_interest - total_expenses;

        let total_membership = net_council
            + manual.manual_membership_1.amount()
            + manual.manual_membership_2.amount()
            + manual.manual_membership_3.amount()
            + manual.membership_count.amount()
            + manual.membership_dues_total.amount();
        let net_membership = total_membership - manual.total_disbursements_sum.amount();

        let total_disbursements_verify = net_membership
            + manual.manual_disbursement_1.amount()
            + manual.manual_disbursement_2.amount()
            + manual.manual_disbursement_3.amount()
            + manual.manual_disbursement_4.amount();

        // Columns 8, 10, and 12 are text on the form, not money.
        let disbursements_total = manual.manual_field_1.amount()
            + manual.manual_field_2.amount()
            + manual.manual_field_3.amount()
            + manual.manual_field_4.amount()
            + manual.manual_field_5.amount()
            + manual.manual_field_6.amount()
            + manual.manual_field_7.amount()
            + manual.manual_field_9.amount()
            + manual.manual_field_11.amount()
            + manual.manual_field_13.amount();

        AuditTotals {
            total_income,
            net_income,
            total_interest,
            total_expenses,
            net_council,
            total_membership,
            net_membership,
            disbursements_total,
            total_disbursements_verify,
        }
    }
}

/// Render a money value the way it lands on the form: exactly two
/// decimals, half-up at the cent.
pub fn fmt_amount(value: f64) -> String {
    let cents = (value * 100.0).round();
    format!("{:.2}", cents / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::ProgramTotal;
    use serde_json::json;

    fn figures(value: serde_json::Value) -> ManualFigures {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn money_field_coercion() {
        let f = figures(json!({
            "manual_income_1": 12.5,
            "manual_income_2": "30.25",
            "interest_earned": "not a number",
            "manual_interest_1": "",
            "manual_interest_2": null,
        }));
        assert_eq!(f.manual_income_1.amount(), 12.5);
        assert_eq!(f.manual_income_2.amount(), 30.25);
        assert_eq!(f.interest_earned.amount(), 0.0);
        assert_eq!(f.manual_interest_1.amount(), 0.0);
        assert_eq!(f.manual_interest_2.amount(), 0.0);
        assert_eq!(f.manual_expense_1.amount(), 0.0);
    }

    #[test]
    fn display_text_passes_raw_values_through() {
        assert_eq!(MoneyField::Text("see note".into()).display_text(), "see note");
        assert_eq!(MoneyField::Number(3.0).display_text(), "3");
        assert_eq!(MoneyField::Number(2.5).display_text(), "2.5");
        assert_eq!(MoneyField::Missing.display_text(), "");
    }

    #[test]
    fn total_chain_matches_hand_computation() {
        let breakdown = ProgramBreakdown {
            membership_dues: 100.0,
            top1: ProgramTotal { name: "Bingo".into(), amount: 50.0 },
            top2: ProgramTotal { name: "Raffle".into(), amount: 25.0 },
            other_label: "Other".into(),
            other_amount: 10.0,
        };
        let manual = figures(json!({
            "manual_income_1": 15.0,
            "manual_income_2": 20.0,
            "interest_earned": 5.0,
            "manual_interest_1": 1.0,
            "manual_interest_2": 2.0,
            "other_council_programs": 3.0,
            "manual_expense_1": 1.5,
            "manual_expense_2": 0.5,
            "manual_membership_1": 10.0,
            "membership_count": 200.0,
            "membership_dues_total": 30.0,
            "total_disbursements_sum": 100.0,
            "manual_disbursement_1": 40.0,
            "manual_disbursement_2": 60.0,
        }));

        let t = AuditTotals::compute(&breakdown, &manual);
        assert!((t.total_income - 200.0).abs() < 1e-9);
        assert!((t.net_income - 180.0).abs() < 1e-9);
        assert!((t.total_interest - 8.0).abs() < 1e-9);
        assert!((t.total_expenses - 5.0).abs() < 1e-9);
        assert!((t.net_council - 3.0).abs() < 1e-9);
        assert!((t.total_membership - 243.0).abs() < 1e-9);
        assert!((t.net_membership - 143.0).abs() < 1e-9);
        assert!((t.total_disbursements_verify - 243.0).abs() < 1e-9);
    }

    #[test]
    fn verify_total_round_trips_under_consistent_input() {
        // When the caller's disbursement total equals the itemized sum
        // plus the section's own entries, the verify slot re-derives it.
        let breakdown = ProgramBreakdown::default();
        let manual = figures(json!({
            "manual_membership_1": 500.0,
            "manual_field_1": 120.0,
            "manual_field_9": 80.0,
            "total_disbursements_sum": 200.0,
            "manual_disbursement_1": 200.0,
        }));
        let t = AuditTotals::compute(&breakdown, &manual);
        assert!((t.disbursements_total - 200.0).abs() < 1e-9);
        // net_membership = 500 - 200 = 300; verify = 300 + 200 = 500 = total_membership
        assert!((t.total_disbursements_verify - t.total_membership).abs() < 1e-9);
    }

    #[test]
    fn text_columns_are_excluded_from_the_disbursement_sum() {
        let manual = figures(json!({
            "manual_field_1": 10.0,
            "manual_field_8": 999.0,
            "manual_field_10": 999.0,
            "manual_field_12": 999.0,
            "manual_field_13": 5.0,
        }));
        let t = AuditTotals::compute(&ProgramBreakdown::default(), &manual);
        assert!((t.disbursements_total - 15.0).abs() < 1e-9);
    }

    #[test]
    fn formatting_rounds_half_up_at_the_cent() {
        assert_eq!(fmt_amount(50.0), "50.00");
        assert_eq!(fmt_amount(0.125), "0.13");
        assert_eq!(fmt_amount(-0.125), "-0.13");
        assert_eq!(fmt_amount(123.456), "123.46");
    }

    #[test]
    fn formatting_is_idempotent() {
        for v in [0.0, 50.0, 123.456, 0.005, 99.994] {
            let once = fmt_amount(v);
            let twice = fmt_amount(once.parse().unwrap());
            assert_eq!(once, twice);
        }
    }
}
