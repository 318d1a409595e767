//! Integration tests for spectraget-validation

use serde_json::{Value, json};
use spectraget_validation::*;

fn validate(schema: &Schema, payload: Value) -> ValidationOutcome {
    Validator::new().validate_json(schema, &payload)
}

fn schema_from(json: Value) -> Schema {
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_missing_mandatory_parameter() {
    let schema = schema_from(json!([{"name": "age", "type": "int", "mandatory": true}]));

    let failure = validate(&schema, json!({})).unwrap_err();
    assert_eq!(failure.message, "Parameter(s) required missing: age");
    assert_eq!(failure.status_code, 400);
}

#[test]
fn test_int_from_string_is_valid() {
    let schema = schema_from(json!([{"name": "age", "type": "int"}]));
    assert!(validate(&schema, json!({"age": "30"})).is_ok());
}

#[test]
fn test_invalid_email() {
    let schema = schema_from(json!([{"name": "email", "isEmail": true}]));

    let failure = validate(&schema, json!({"email": "not-an-email"})).unwrap_err();
    assert_eq!(failure.message, "email should be a valid email address");
    assert_eq!(failure.status_code, 400);
}

#[test]
fn test_value_not_among_allowed() {
    let schema = schema_from(json!([{"name": "role", "values": ["admin", "user"]}]));

    let failure = validate(&schema, json!({"role": "guest"})).unwrap_err();
    assert_eq!(failure.message, "role should have a value among admin, user");
}

#[test]
fn test_zero_counts_as_missing() {
    let schema = schema_from(json!([{"name": "age", "mandatory": true}]));

    let failure = validate(&schema, json!({"age": 0})).unwrap_err();
    assert_eq!(failure.message, "Parameter(s) required missing: age");
}

#[test]
fn test_ip_in_range() {
    let schema = schema_from(json!([
        {"name": "ip", "ipRange": ["192.168.1.1", "192.168.1.255"]}
    ]));
    assert!(validate(&schema, json!({"ip": "192.168.1.100"})).is_ok());
}

#[test]
fn test_lenient_integer_prefix() {
    let schema = schema_from(json!([{"name": "n", "type": "int"}]));
    assert!(validate(&schema, json!({"n": "42abc"})).is_ok());

    let failure = validate(&schema, json!({"n": "abc"})).unwrap_err();
    assert_eq!(failure.message, "n should be an integer");
}

#[test]
fn test_unknown_parameter_regardless_of_other_fields() {
    let schema = schema_from(json!([{"name": "q", "type": "string"}]));

    let failure = validate(&schema, json!({"q": "rust", "debug": true})).unwrap_err();
    assert_eq!(failure.message, "Unknown parameter: debug");
}

#[test]
fn test_regex_directive() {
    let schema = schema_from(json!([{"name": "zip", "regex": "^\\d{5}$"}]));

    assert!(validate(&schema, json!({"zip": "12345"})).is_ok());
    let failure = validate(&schema, json!({"zip": "1234"})).unwrap_err();
    assert_eq!(failure.message, "zip should match the format /^\\d{5}$/");
}

#[test]
fn test_regex_classes_follow_javascript() {
    let zip = schema_from(json!([{"name": "zip", "regex": "^\\d{5}$"}]));
    assert_eq!(
        validate(&zip, json!({"zip": "١٢٣٤٥"})).unwrap_err().message,
        "zip should match the format /^\\d{5}$/"
    );

    let single = schema_from(json!([{"name": "c", "regex": "^.$"}]));
    assert!(validate(&single, json!({"c": "é"})).is_ok());
    assert!(validate(&single, json!({"c": "😀"})).is_err());
}

#[test]
fn test_regex_message_escapes_slashes() {
    let schema = schema_from(json!([{"name": "path", "regex": "^/api/v\\d$"}]));

    assert!(validate(&schema, json!({"path": "/api/v2"})).is_ok());
    assert_eq!(
        validate(&schema, json!({"path": "/web"})).unwrap_err().message,
        "path should match the format /^\\/api\\/v\\d$/"
    );
}

#[test]
fn test_strong_password_directive() {
    let schema = schema_from(json!([{"name": "password", "isStrongPassword": true}]));

    assert!(validate(&schema, json!({"password": "S3cure!pw"})).is_ok());
    assert!(validate(&schema, json!({"password": "secure"})).is_err());
}

#[test]
fn test_pattern_contains_directive() {
    let schema = schema_from(json!([{"name": "ref", "patternContains": "INV-"}]));

    assert!(validate(&schema, json!({"ref": "INV-2024-001"})).is_ok());
    let failure = validate(&schema, json!({"ref": "PO-1"})).unwrap_err();
    assert_eq!(failure.message, "ref should contain the pattern \"INV-\"");
}

#[test]
fn test_array_directives() {
    let schema = schema_from(json!([
        {"name": "point", "arrayLength": 2, "isArrayOfNumbers": true}
    ]));

    assert!(validate(&schema, json!({"point": [1.5, -2]})).is_ok());
    assert_eq!(
        validate(&schema, json!({"point": [1, 2, 3]})).unwrap_err().message,
        "point should be an array with length of 2"
    );
    assert_eq!(
        validate(&schema, json!({"point": [1, "2"]})).unwrap_err().message,
        "point should be an array of numbers"
    );
}

#[test]
fn test_date_directives() {
    let schema = schema_from(json!([
        {"name": "from", "type": "date", "dateRange": ["2024-01-01", "2024-12-31"]}
    ]));

    assert!(validate(&schema, json!({"from": "2024-03-01"})).is_ok());
    assert!(validate(&schema, json!({"from": "Fri Mar 01 2024"})).is_ok());
    assert!(validate(
        &schema,
        json!({"from": "Fri Mar 01 2024 09:00:00 GMT+0000 (Coordinated Universal Time)"})
    )
    .is_ok());
    assert_eq!(
        validate(&schema, json!({"from": "soon"})).unwrap_err().message,
        "from should be a valid date"
    );
    assert_eq!(
        validate(&schema, json!({"from": "2023-12-31"})).unwrap_err().message,
        "from should be a date between 2024-01-01 and 2024-12-31"
    );
}

#[test]
fn test_json_directive() {
    let schema = schema_from(json!([{"name": "filter", "isJSON": true}]));

    assert!(validate(&schema, json!({"filter": "{\"status\": \"open\"}"})).is_ok());
    assert_eq!(
        validate(&schema, json!({"filter": "{status: open}"})).unwrap_err().message,
        "filter should be a valid JSON string"
    );
}

#[test]
fn test_range_directive() {
    let schema = schema_from(json!([{"name": "page", "range": [1, 50]}]));

    assert!(validate(&schema, json!({"page": 50})).is_ok());
    assert_eq!(
        validate(&schema, json!({"page": 51})).unwrap_err().message,
        "page should be in the range [1, 50]"
    );
}

#[test]
fn test_optional_parameter_may_be_absent() {
    let schema = schema_from(json!([
        {"name": "q", "mandatory": true},
        {"name": "page", "type": "int"}
    ]));
    assert!(validate(&schema, json!({"q": "search"})).is_ok());
}

#[test]
fn test_failure_serializes_for_http() {
    let schema = schema_from(json!([{"name": "q"}]));
    let failure = validate(&schema, json!({"x": 1})).unwrap_err();

    assert_eq!(
        failure.to_json(),
        json!({"error": "Unknown parameter: x", "status_code": 400})
    );
}

#[test]
fn test_schema_errors_are_not_validation_failures() {
    let result = Schema::new(vec![ParameterSpec::new("bad").with_regex("(unclosed")]);
    let err = result.unwrap_err();
    assert!(matches!(err, SchemaError::InvalidRegex { .. }));
    assert!(err.to_string().starts_with("Invalid regex for parameter bad"));
}

#[test]
fn test_validator_is_shareable_across_threads() {
    let schema = std::sync::Arc::new(schema_from(json!([
        {"name": "id", "mandatory": true, "type": "int"}
    ])));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let schema = schema.clone();
            std::thread::spawn(move || {
                VALIDATOR.validate_json(&schema, &json!({"id": i + 1})).is_ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
