//! Tests for the declarative validator engine.

use super::*;
use crate::domain::{ApplicationStatus, ErrorCode};
use rstest::rstest;
use serde_json::json;

const PROGRESS: &[Check] = &[
    check("status", Rule::OneOf(canonical::<ApplicationStatus>), "status is invalid."),
    check("date", Rule::IsoDate, "date is invalid."),
    check("note", Rule::Optional, ""),
    check("note", Rule::String, "note must be a string."),
];

const SAMPLE: &[Check] = &[
    check("page", Rule::Default(Literal::Int(0)), ""),
    check("page", Rule::Int { min: 0 }, "page must be an integer > -1."),
    check("name", Rule::String, "name must be a string."),
    check("name", Rule::NonEmpty, "name must be a non-empty string."),
    check("link", Rule::Optional, ""),
    check("link", Rule::Url, "link must be a valid URL."),
    check("open", Rule::Optional, ""),
    check("open", Rule::Bool, "open must be a boolean."),
    check("code", Rule::Optional, ""),
    check("code", Rule::MinLength(3), "code must be at least 3 characters."),
    check("process", Rule::Alias("progress"), ""),
    check("process", Rule::Optional, ""),
    check("process", Rule::ArrayOf(PROGRESS), "process must be an array."),
];

fn input(value: serde_json::Value) -> Map<String, Value> {
    body_input(value).expect("object input")
}

#[rstest]
fn normalises_recognised_fields_and_drops_unknown_ones() {
    let output = validate(
        SAMPLE,
        &input(json!({
            "name": "  Acme  ",
            "open": "TRUE",
            "unexpected": 42,
        })),
    )
    .expect("valid input");

    assert_eq!(
        Value::Object(output),
        json!({ "page": 0, "name": "Acme", "open": true })
    );
}

#[rstest]
#[case(json!("3"), json!(3))]
#[case(json!(7), json!(7))]
fn coerces_integers(#[case] raw: Value, #[case] expected: Value) {
    let output = validate(SAMPLE, &input(json!({ "page": raw, "name": "x" }))).expect("valid");
    assert_eq!(output.get("page"), Some(&expected));
}

#[rstest]
#[case(json!({ "page": "-1", "name": "x" }), "page", "page must be an integer > -1.")]
#[case(json!({ "page": "one", "name": "x" }), "page", "page must be an integer > -1.")]
#[case(json!({}), "name", "name must be a string.")]
#[case(json!({ "name": "   " }), "name", "name must be a non-empty string.")]
#[case(json!({ "name": "x", "link": "ftp://example.com" }), "link", "link must be a valid URL.")]
#[case(json!({ "name": "x", "open": "maybe" }), "open", "open must be a boolean.")]
#[case(json!({ "name": "x", "code": "ab" }), "code", "code must be at least 3 characters.")]
#[case(json!({ "name": "x", "code": 123 }), "code", "code must be at least 3 characters.")]
fn reports_first_failure_per_field(
    #[case] raw: Value,
    #[case] field: &str,
    #[case] message: &str,
) {
    let violations = validate(SAMPLE, &input(raw)).expect_err("invalid input");
    let first = violations.first().expect("one violation");
    assert_eq!(first.field, field);
    assert_eq!(first.message, message);
}

#[rstest]
#[case("abc")]
#[case("äöü")]
fn min_length_counts_characters(#[case] code: &str) {
    let output =
        validate(SAMPLE, &input(json!({ "name": "x", "code": code }))).expect("long enough");
    assert_eq!(output.get("code"), Some(&json!(code)));
}

#[rstest]
fn failing_chain_reports_only_its_first_rule() {
    let violations = validate(SAMPLE, &input(json!({ "name": 5 }))).expect_err("invalid");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "name must be a string.");
}

#[rstest]
fn violations_follow_rule_order() {
    let violations =
        validate(SAMPLE, &input(json!({ "page": -4, "link": "nope" }))).expect_err("invalid");
    let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, ["page", "name", "link"]);
}

#[rstest]
fn nested_entries_are_normalised_through_alias() {
    let output = validate(
        SAMPLE,
        &input(json!({
            "name": "x",
            "progress": [{ "status": "oa", "date": "2024-01-01", "note": " phone screen " }],
        })),
    )
    .expect("valid");

    assert_eq!(
        output.get("process"),
        Some(&json!([{
            "status": "OA",
            "date": "2024-01-01T00:00:00.000Z",
            "note": "phone screen",
        }]))
    );
    assert!(output.get("progress").is_none());
}

#[rstest]
fn nested_violations_carry_indexed_paths() {
    let violations = validate(
        SAMPLE,
        &input(json!({
            "name": "x",
            "process": [
                { "status": "APPLIED", "date": "2024-01-01" },
                { "status": "INVALID", "date": "2024-01-01" },
            ],
        })),
    )
    .expect_err("invalid status");
    assert_eq!(violations[0].field, "process[1].status");
    assert_eq!(violations[0].message, "status is invalid.");
}

#[rstest]
#[case("2024-02-29", true)]
#[case("2024-02-29T10:15:00Z", true)]
#[case("2024-02-29T10:15:00+02:00", true)]
#[case("2024-02-29T10:15:00", true)]
#[case("2023-02-29", false)]
#[case("yesterday", false)]
fn iso_dates(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(parse_iso_date(raw).is_some(), valid);
}

#[rstest]
#[case("ada@example.com", true)]
#[case("ada.lovelace+jobs@mail.example.org", true)]
#[case("ada@example", false)]
#[case("ada@@example.com", false)]
#[case("@example.com", false)]
#[case("ada @example.com", false)]
fn emails(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(is_email(raw), valid);
}

#[rstest]
fn object_ids_are_lowercased() {
    const IDS: &[Check] = &[check("id", Rule::ObjectId, "Invalid id.")];
    let output = validate(IDS, &path_input("id", "65A1F0C2E4B0A1B2C3D4E5F6".to_owned()))
        .expect("valid id");
    assert_eq!(output.get("id"), Some(&json!("65a1f0c2e4b0a1b2c3d4e5f6")));

    let violations =
        validate(IDS, &path_input("id", "not-an-id".to_owned())).expect_err("invalid id");
    assert_eq!(violations[0].message, "Invalid id.");
}

#[rstest]
fn extract_surfaces_first_violation_as_invalid_request() {
    let error = extract::<Value>(SAMPLE, &input(json!({ "name": "" })))
        .expect_err("blank name");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "name must be a non-empty string.");
    assert_eq!(error.details(), Some(&json!({ "field": "name" })));
}

#[rstest]
fn non_object_bodies_are_rejected() {
    let error = body_input(json!([1, 2, 3])).expect_err("array body");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}
