//! End-to-end audit report scenarios, from intake JSON to the field
//! payload handed to the filler.

use forms_core::mapper::map_fields;
use forms_core::report::AuditReportRequest;
use serde_json::json;

fn request(value: serde_json::Value) -> AuditReportRequest {
    serde_json::from_value(value).unwrap()
}

fn field<'a>(payload: &'a [(String, String)], id: &str) -> &'a str {
    &payload.iter().find(|(k, _)| k == id).unwrap().1
}

#[test]
fn first_half_report_lands_on_text_ids() {
    let req = request(json!({
        "period": "January-June",
        "year": 2024,
        "council_number": "4401",
        "auditor_name": "P. Moreau",
        "organization_name": "Council 4401",
        "manual_income_1": "15.00",
        "interest_earned": 12.0,
        "manual_interest_1": 3.0,
        "other_council_programs": 4.0,
        "income": [
            { "date": "2024-01-15", "amount": 200.0, "programName": "Council - Membership Dues", "isExpense": false },
            { "date": "2024-02-10", "amount": 120.0, "programName": "Bingo", "isExpense": false },
            { "date": "2024-03-05", "amount": 80.0, "programName": "Fish Fry", "isExpense": false },
            { "date": "2024-04-12", "amount": 45.0, "programName": "Raffle", "isExpense": false },
            { "date": "2023-12-31", "amount": 500.0, "programName": "Bingo", "isExpense": false }
        ],
        "expenses": [
            { "date": "2024-02-20", "amount": 60.0, "programName": "Hall Rental", "isExpense": true }
        ]
    }));

    let (period, _) = req.validate().unwrap();
    let payload = map_fields(
        AuditReportRequest::scheme(period),
        &req.logical_values().unwrap(),
    );

    assert_eq!(field(&payload, "Text1"), "4401");
    assert_eq!(field(&payload, "Text3"), "24");
    assert_eq!(field(&payload, "Text4"), "Council 4401");
    assert_eq!(field(&payload, "Text51"), "200.00");
    assert_eq!(field(&payload, "Text52"), "Bingo");
    assert_eq!(field(&payload, "Text53"), "120.00");
    assert_eq!(field(&payload, "Text54"), "Fish Fry");
    assert_eq!(field(&payload, "Text56"), "Other");
    assert_eq!(field(&payload, "Text57"), "45.00");
    // 15 + 200 + 120 + 80 + 45
    assert_eq!(field(&payload, "Text58"), "460.00");
    assert_eq!(field(&payload, "Text60"), "460.00");
    // interest 12 + 3, expenses 4
    assert_eq!(field(&payload, "Text65"), "15.00");
    assert_eq!(field(&payload, "Text71"), "4.00");
    assert_eq!(field(&payload, "Text72"), "11.00");
    assert_eq!(field(&payload, "Text72"), field(&payload, "Text73"));
    // Expense entries never count toward program income.
    assert!(!payload.iter().any(|(_, v)| v == "Hall Rental"));
}

#[test]
fn second_half_report_lands_on_p2_ids() {
    let req = request(json!({
        "period": "July-December",
        "year": 2024,
        "income": [
            { "date": "2024-09-12", "amount": 75.0, "programName": "Bingo", "isExpense": false },
            { "date": "2024-03-12", "amount": 900.0, "programName": "Bingo", "isExpense": false }
        ]
    }));

    let (period, _) = req.validate().unwrap();
    let payload = map_fields(
        AuditReportRequest::scheme(period),
        &req.logical_values().unwrap(),
    );

    assert_eq!(field(&payload, "P2Text52"), "Bingo");
    assert_eq!(field(&payload, "P2Text53"), "75.00");
    assert!(!payload.iter().any(|(k, _)| k == "Text53"));
}

#[test]
fn income_conservation_across_program_columns() {
    // dues + top1 + top2 + other must re-add to the income total when
    // manual income is zero.
    let req = request(json!({
        "period": "January-June",
        "year": 2024,
        "income": [
            { "date": "2024-01-02", "amount": 10.10, "programName": "A", "isExpense": false },
            { "date": "2024-01-03", "amount": 20.20, "programName": "B", "isExpense": false },
            { "date": "2024-01-04", "amount": 30.30, "programName": "C", "isExpense": false },
            { "date": "2024-01-05", "amount": 40.40, "programName": "D", "isExpense": false },
            { "date": "2024-01-06", "amount": 5.55, "programName": "Membership Dues", "isExpense": false }
        ]
    }));

    let values = req.logical_values().unwrap();
    let get = |key: &str| -> f64 {
        values
            .iter()
            .find(|(k, _)| *k == key)
            .unwrap()
            .1
            .parse()
            .unwrap()
    };
    let parts = get("membership_dues")
        + get("top_program_1_amount")
        + get("top_program_2_amount")
        + get("other_programs_amount");
    assert!((parts - get("total_income")).abs() < 0.001);
}

#[test]
fn disbursement_chain_uses_caller_total_and_recomputed_sum() {
    let req = request(json!({
        "period": "January-June",
        "year": 2024,
        "manual_membership_1": 500.0,
        "total_disbursements_sum": 200.0,
        "manual_disbursement_1": 200.0,
        "manual_field_1": 120.0,
        "manual_field_9": 80.0,
        "manual_field_8": "see attached",
        "manual_field_14": "carried forward"
    }));

    let (period, _) = req.validate().unwrap();
    let payload = map_fields(
        AuditReportRequest::scheme(period),
        &req.logical_values().unwrap(),
    );

    // Text80 echoes the caller's total; Text103 is the recomputed sum.
    assert_eq!(field(&payload, "Text80"), "200.00");
    assert_eq!(field(&payload, "Text103"), "200.00");
    assert_eq!(field(&payload, "Text83"), "300.00");
    assert_eq!(field(&payload, "Text88"), "500.00");
    assert_eq!(field(&payload, "Text79"), "500.00");
    // Text columns pass through untouched.
    assert_eq!(field(&payload, "Text97"), "see attached");
    assert_eq!(field(&payload, "Text104"), "carried forward");
}

#[test]
fn unparseable_entry_dates_fall_out_of_every_period() {
    let req = request(json!({
        "period": "January-June",
        "year": 2024,
        "income": [
            { "date": "someday", "amount": 50.0, "programName": "Bingo", "isExpense": false },
            { "amount": 60.0, "programName": "Bingo", "isExpense": false }
        ]
    }));
    let values = req.logical_values().unwrap();
    let dues = values.iter().find(|(k, _)| *k == "top_program_1_amount").unwrap();
    assert_eq!(dues.1, "0.00");
}
