//! Field-id schemes for the fixed PDF layouts.
//!
//! Each scheme maps a logical column name to the text-field id baked
//! into one template revision. The two audit halves share the same
//! logical columns; the July-December template carries its ids in the
//! `P2Text` family.

/// One template's logical-name to field-id table.
pub struct FieldScheme {
    pub name: &'static str,
    pairs: &'static [(&'static str, &'static str)],
}

impl FieldScheme {
    /// Field id for a logical column, if the template has it.
    pub fn field_id(&self, key: &str) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, id)| *id)
    }

    /// All (logical name, field id) pairs, in template order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        self.pairs.iter().copied()
    }
}

macro_rules! audit_scheme {
    ($name:expr, $prefix:expr) => {
        FieldScheme {
            name: $name,
            pairs: &[
                ("council_number", concat!($prefix, "1")),
                ("auditor_name", concat!($prefix, "2")),
                ("year_suffix", concat!($prefix, "3")),
                ("organization_name", concat!($prefix, "4")),
                ("manual_income_1", concat!($prefix, "50")),
                ("membership_dues", concat!($prefix, "51")),
                ("top_program_1_name", concat!($prefix, "52")),
                ("top_program_1_amount", concat!($prefix, "53")),
                ("top_program_2_name", concat!($prefix, "54")),
                ("top_program_2_amount", concat!($prefix, "55")),
                ("other_label", concat!($prefix, "56")),
                ("other_programs_amount", concat!($prefix, "57")),
                ("total_income", concat!($prefix, "58")),
                ("manual_income_2", concat!($prefix, "59")),
                ("net_income", concat!($prefix, "60")),
                ("reserved_1", concat!($prefix, "61")),
                ("reserved_2", concat!($prefix, "62")),
                ("reserved_3", concat!($prefix, "63")),
                ("interest_earned", concat!($prefix, "64")),
                ("total_interest", concat!($prefix, "65")),
                ("supreme_per_capita", concat!($prefix, "66")),
                ("state_per_capita", concat!($prefix, "67")),
                ("other_council_programs", concat!($prefix, "68")),
                ("manual_expense_1", concat!($prefix, "69")),
                ("manual_expense_2", concat!($prefix, "70")),
                ("total_expenses", concat!($prefix, "71")),
                ("net_council", concat!($prefix, "72")),
                ("net_council_verify", concat!($prefix, "73")),
                ("manual_membership_1", concat!($prefix, "74")),
                ("manual_membership_2", concat!($prefix, "75")),
                ("manual_membership_3", concat!($prefix, "76")),
                ("membership_count", concat!($prefix, "77")),
                ("membership_dues_total", concat!($prefix, "78")),
                ("total_membership", concat!($prefix, "79")),
                ("total_disbursements", concat!($prefix, "80")),
                // Slots 81 and 82 do not exist on the template.
                ("net_membership", concat!($prefix, "83")),
                ("manual_disbursement_1", concat!($prefix, "84")),
                ("manual_disbursement_2", concat!($prefix, "85")),
                ("manual_disbursement_3", concat!($prefix, "86")),
                ("manual_disbursement_4", concat!($prefix, "87")),
                ("total_disbursements_verify", concat!($prefix, "88")),
                ("manual_field_1", concat!($prefix, "89")),
                ("manual_field_2", concat!($prefix, "90")),
                ("manual_field_3", concat!($prefix, "91")),
                ("manual_field_4", concat!($prefix, "92")),
                ("manual_field_5", concat!($prefix, "93")),
                // Slot 94 does not exist on the template.
                ("manual_field_6", concat!($prefix, "95")),
                ("manual_field_7", concat!($prefix, "96")),
                ("manual_field_8", concat!($prefix, "97")),
                ("manual_field_9", concat!($prefix, "98")),
                ("manual_field_10", concat!($prefix, "99")),
                ("manual_field_11", concat!($prefix, "100")),
                ("manual_field_12", concat!($prefix, "101")),
                ("manual_field_13", concat!($prefix, "102")),
                ("total_disbursements_sum", concat!($prefix, "103")),
                ("manual_field_14", concat!($prefix, "104")),
                ("manual_field_15", concat!($prefix, "105")),
                ("manual_field_16", concat!($prefix, "106")),
                ("manual_field_17", concat!($prefix, "107")),
                ("manual_field_18", concat!($prefix, "108")),
                ("manual_field_19", concat!($prefix, "109")),
                ("manual_field_20", concat!($prefix, "110")),
            ],
        }
    };
}

pub static AUDIT_JAN_JUN: FieldScheme = audit_scheme!("audit-jan-jun", "Text");
pub static AUDIT_JUL_DEC: FieldScheme = audit_scheme!("audit-jul-dec", "P2Text");

pub static FORM_1728: FieldScheme = FieldScheme {
    name: "form-1728",
    pairs: &[
        ("council_number", "Text1"),
        ("year_start", "Text2"),
    ],
};

/// Both year slots on the individual survey take the same two-digit
/// value. The second field is literally named `undefined` in the
/// template, an artifact of the form authoring tool.
pub const SURVEY_YEAR_FIELDS: [&str; 2] = ["Text1", "undefined"];

pub const SURVEY_COUNCIL_ACTIVITY_COUNT: usize = 40;
pub const SURVEY_ASSEMBLY_ACTIVITY_COUNT: usize = 38;

/// Field id for the n-th council activity (1-based), `Text2`..`Text41`.
pub fn survey_council_field(n: usize) -> String {
    format!("Text{}", n + 1)
}

/// Field id for the n-th assembly activity (1-based), `Text42`..`Text79`.
pub fn survey_assembly_field(n: usize) -> String {
    format!("Text{}", n + 41)
}

pub const SURVEY_TOTAL_FIELDS: [&str; 2] = ["TOTAL", "TOTAL_2"];
