// Request validation against a schema

use crate::coerce::is_truthy;
use crate::schema::{ParamRule, Schema};
use crate::validators::*;
use crate::ValidationFailure;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Request data: field name to raw value, in insertion order
pub type Payload = Map<String, Value>;

/// `Ok(())` when the payload conforms, otherwise the first violation
pub type ValidationOutcome = Result<(), ValidationFailure>;

/// Shared validator instance
pub static VALIDATOR: Validator = Validator::new();

/// Constraint directives, in the order they are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Type,
    Length,
    Range,
    Values,
    Regex,
    Email,
    StrongPassword,
    PatternContains,
    ArrayLength,
    ArrayOfNumbers,
    IpRange,
    DateRange,
    Json,
}

impl Directive {
    pub const ORDER: [Directive; 13] = [
        Directive::Type,
        Directive::Length,
        Directive::Range,
        Directive::Values,
        Directive::Regex,
        Directive::Email,
        Directive::StrongPassword,
        Directive::PatternContains,
        Directive::ArrayLength,
        Directive::ArrayOfNumbers,
        Directive::IpRange,
        Directive::DateRange,
        Directive::Json,
    ];

    /// Schema field name of the directive
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::Type => "type",
            Directive::Length => "length",
            Directive::Range => "range",
            Directive::Values => "values",
            Directive::Regex => "regex",
            Directive::Email => "isEmail",
            Directive::StrongPassword => "isStrongPassword",
            Directive::PatternContains => "patternContains",
            Directive::ArrayLength => "arrayLength",
            Directive::ArrayOfNumbers => "isArrayOfNumbers",
            Directive::IpRange => "ipRange",
            Directive::DateRange => "dateRange",
            Directive::Json => "isJSON",
        }
    }

    /// Run the directive's checker, or `None` when the rule does not set it
    fn apply(&self, rule: &ParamRule, field: &str, value: &Value) -> Option<ValidationOutcome> {
        let spec = rule.spec();
        match self {
            Directive::Type => spec.param_type.map(|t| HasType(t).validate(value, field)),
            Directive::Length => spec.length.map(|n| ExactLength(n).validate(value, field)),
            Directive::Range => spec.range.map(|r| InRange(r).validate(value, field)),
            Directive::Values => spec
                .values
                .as_deref()
                .map(|allowed| AllowedValues::validate(value, field, allowed)),
            Directive::Regex => rule.pattern().map(|re| Matches(re).validate(value, field)),
            Directive::Email => spec.is_email.then(|| IsEmail::validate(value, field)),
            Directive::StrongPassword => spec
                .is_strong_password
                .then(|| IsStrongPassword::validate(value, field)),
            Directive::PatternContains => spec
                .pattern_contains
                .as_deref()
                .filter(|pattern| !pattern.is_empty())
                .map(|pattern| Contains::validate(value, field, pattern)),
            Directive::ArrayLength => spec
                .array_length
                .map(|n| ArrayLength(n).validate(value, field)),
            Directive::ArrayOfNumbers => spec
                .is_array_of_numbers
                .then(|| IsArrayOfNumbers::validate(value, field)),
            Directive::IpRange => spec
                .ip_range
                .as_ref()
                .map(|bounds| InIpRange(bounds).validate(value, field)),
            Directive::DateRange => spec
                .date_range
                .as_ref()
                .map(|bounds| InDateRange(bounds).validate(value, field)),
            Directive::Json => spec.is_json.then(|| IsJson::validate(value, field)),
        }
    }
}

/// Stateless schema validator.
///
/// Holds no state, so one instance (or [`VALIDATOR`]) can serve any number
/// of concurrent callers.
///
/// # Examples
///
/// ```
/// use spectraget_validation::{ParamType, ParameterSpec, Schema, Validator};
/// use serde_json::json;
///
/// let schema = Schema::new(vec![
///     ParameterSpec::new("age").required().with_type(ParamType::Int),
/// ])
/// .unwrap();
///
/// let validator = Validator::new();
/// assert!(validator.validate_json(&schema, &json!({"age": "30"})).is_ok());
///
/// let failure = validator.validate_json(&schema, &json!({})).unwrap_err();
/// assert_eq!(failure.message, "Parameter(s) required missing: age");
/// assert_eq!(failure.status_code, 400);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub const fn new() -> Self {
        Self
    }

    /// Validate a payload against a schema.
    ///
    /// Mandatory parameters are checked first, then each payload field in
    /// insertion order. The first violation wins.
    pub fn validate(&self, schema: &Schema, payload: &Payload) -> ValidationOutcome {
        debug!(
            parameters = schema.len(),
            fields = payload.len(),
            "Validating request payload"
        );

        let outcome = Self::check_mandatory(schema, payload)
            .and_then(|()| Self::check_fields(schema, payload));

        match &outcome {
            Ok(()) => debug!("Request payload is valid"),
            Err(failure) => debug!(error = %failure, "Request payload rejected"),
        }
        outcome
    }

    /// Validate an arbitrary JSON value; anything but an object is rejected
    pub fn validate_json(&self, schema: &Schema, payload: &Value) -> ValidationOutcome {
        match payload {
            Value::Object(fields) => self.validate(schema, fields),
            _ => Err(ValidationFailure::new("Request data should be an object")),
        }
    }

    // Falsy values (0, false, "", null) count as missing.
    fn check_mandatory(schema: &Schema, payload: &Payload) -> ValidationOutcome {
        let missing: Vec<&str> = schema
            .params()
            .filter(|spec| spec.mandatory && !payload.get(&spec.name).is_some_and(is_truthy))
            .map(|spec| spec.name.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::new(format!(
                "Parameter(s) required missing: {}",
                missing.join(", ")
            )))
        }
    }

    fn check_fields(schema: &Schema, payload: &Payload) -> ValidationOutcome {
        for (field, value) in payload {
            let rule = schema
                .get(field)
                .ok_or_else(|| ValidationFailure::new(format!("Unknown parameter: {}", field)))?;
            Self::check_rule(rule, field, value)?;
        }
        Ok(())
    }

    fn check_rule(rule: &ParamRule, field: &str, value: &Value) -> ValidationOutcome {
        for directive in Directive::ORDER {
            let Some(result) = directive.apply(rule, field, value) else {
                continue;
            };

            trace!(parameter = field, constraint = directive.as_str(), "Constraint applied");
            if result.is_err() {
                debug!(
                    parameter = field,
                    constraint = directive.as_str(),
                    "Constraint failed"
                );
            }
            result?;
        }
        Ok(())
    }
}
