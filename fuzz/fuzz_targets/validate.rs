//! Fuzz target for payload validation.
//!
//! Builds a schema and a payload from arbitrary input and checks that
//! validation never panics and is deterministic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};
use spectraget_validation::{ParamType, ParameterSpec, Schema, Validator};

#[derive(Debug, Arbitrary)]
enum FuzzType {
    Int,
    Float,
    String,
    Boolean,
    Date,
}

impl From<FuzzType> for ParamType {
    fn from(t: FuzzType) -> Self {
        match t {
            FuzzType::Int => ParamType::Int,
            FuzzType::Float => ParamType::Float,
            FuzzType::String => ParamType::String,
            FuzzType::Boolean => ParamType::Boolean,
            FuzzType::Date => ParamType::Date,
        }
    }
}

/// Arbitrary parameter rules.
#[derive(Debug, Arbitrary)]
struct FuzzParam {
    name: String,
    mandatory: bool,
    param_type: Option<FuzzType>,
    length: Option<u8>,
    range: Option<(f64, f64)>,
    values: Option<Vec<String>>,
    is_email: bool,
    is_strong_password: bool,
    pattern_contains: Option<String>,
    array_length: Option<u8>,
    is_array_of_numbers: bool,
    ip_range: Option<(String, String)>,
    date_range: Option<(String, String)>,
    is_json: bool,
}

/// Arbitrary payload values.
#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Numbers(Vec<i32>),
    Texts(Vec<String>),
}

impl From<FuzzValue> for Value {
    fn from(v: FuzzValue) -> Self {
        match v {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(b) => Value::Bool(b),
            FuzzValue::Int(i) => Value::from(i),
            FuzzValue::Float(f) => Value::from(f),
            FuzzValue::Text(s) => Value::String(s),
            FuzzValue::Numbers(n) => Value::from(n),
            FuzzValue::Texts(t) => Value::from(t),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    params: Vec<FuzzParam>,
    payload: Vec<(String, FuzzValue)>,
}

fn to_spec(p: FuzzParam) -> ParameterSpec {
    let mut spec = ParameterSpec::new(p.name);
    spec.mandatory = p.mandatory;
    spec.param_type = p.param_type.map(Into::into);
    spec.length = p.length.map(usize::from);
    if let Some((min, max)) = p.range {
        spec = spec.with_range(min, max);
    }
    spec.values = p.values;
    spec.is_email = p.is_email;
    spec.is_strong_password = p.is_strong_password;
    spec.pattern_contains = p.pattern_contains;
    spec.array_length = p.array_length.map(usize::from);
    spec.is_array_of_numbers = p.is_array_of_numbers;
    if let Some((start, end)) = p.ip_range {
        spec = spec.with_ip_range(start, end);
    }
    if let Some((start, end)) = p.date_range {
        spec = spec.with_date_range(start, end);
    }
    spec.is_json = p.is_json;
    spec
}

fuzz_target!(|input: FuzzInput| {
    let Ok(schema) = Schema::new(input.params.into_iter().map(to_spec)) else {
        return;
    };

    let payload: Map<String, Value> = input
        .payload
        .into_iter()
        .map(|(k, v)| (k, v.into()))
        .collect();

    let validator = Validator::new();
    let first = validator.validate(&schema, &payload);
    let second = validator.validate(&schema, &payload);
    assert_eq!(first, second);

    if let Err(failure) = first {
        assert_eq!(failure.status_code, 400);
        assert!(!failure.message.is_empty());
    }
});
