// Built-in constraint checkers
//
// Each checker either passes silently or returns the failure message for
// its directive. Checkers never look at other directives.

use crate::coerce::{format_number, parse_float_prefix, parse_int_prefix, to_int32, to_text};
use crate::date::{parse_date, timestamp_millis};
use crate::pattern::Pattern;
use crate::schema::{Bounds, NumericRange, ParamType};
use crate::ValidationFailure;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::IgnoredAny;
use serde_json::Value;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Symbols accepted (and one required) in a strong password
const PASSWORD_SYMBOLS: &str = "@$!%*?&";

const PASSWORD_MIN_LENGTH: usize = 8;

fn fail(message: String) -> Result<(), ValidationFailure> {
    Err(ValidationFailure::new(message))
}

/// Validates the runtime type of a value
pub struct HasType(pub ParamType);

impl HasType {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationFailure> {
        match self.0 {
            ParamType::Int if parse_int_prefix(&to_text(value)).is_none() => {
                fail(format!("{} should be an integer", field))
            }
            ParamType::Float if parse_float_prefix(&to_text(value)).is_none() => {
                fail(format!("{} should be a floating point number", field))
            }
            ParamType::String if !value.is_string() => {
                fail(format!("{} should be a string", field))
            }
            ParamType::Boolean if !value.is_boolean() => {
                fail(format!("{} should be a boolean", field))
            }
            ParamType::Date if timestamp_millis(value).is_none() => {
                fail(format!("{} should be a valid date", field))
            }
            _ => Ok(()),
        }
    }
}

/// Validates the exact length of a string value; other values pass
pub struct ExactLength(pub usize);

impl ExactLength {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationFailure> {
        match value {
            Value::String(s) if s.encode_utf16().count() != self.0 => {
                fail(format!("{} should have a length of {}", field, self.0))
            }
            _ => Ok(()),
        }
    }
}

/// Validates a numeric value is in range; other values pass
pub struct InRange(pub NumericRange);

impl InRange {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationFailure> {
        let NumericRange { min, max } = self.0;
        match value.as_f64() {
            Some(n) if n < min || n > max => fail(format!(
                "{} should be in the range [{}, {}]",
                field,
                format_number(min),
                format_number(max)
            )),
            _ => Ok(()),
        }
    }
}

/// Validates every space-separated token is an allowed value
pub struct AllowedValues;

impl AllowedValues {
    pub fn validate(value: &Value, field: &str, allowed: &[String]) -> Result<(), ValidationFailure> {
        let all_allowed = value.as_str().is_some_and(|text| {
            text.split(' ')
                .all(|token| allowed.iter().any(|candidate| candidate == token))
        });

        if all_allowed {
            Ok(())
        } else {
            fail(format!(
                "{} should have a value among {}",
                field,
                allowed.join(", ")
            ))
        }
    }
}

/// Custom regex validator
pub struct Matches<'a>(pub &'a Pattern);

impl Matches<'_> {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationFailure> {
        if self.0.is_match(&to_text(value)) {
            Ok(())
        } else {
            fail(format!("{} should match the format {}", field, self.0))
        }
    }
}

/// Validates email format
pub struct IsEmail;

impl IsEmail {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationFailure> {
        if EMAIL_REGEX.is_match(&to_text(value)) {
            Ok(())
        } else {
            fail(format!("{} should be a valid email address", field))
        }
    }
}

/// Validates password strength
pub struct IsStrongPassword;

impl IsStrongPassword {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationFailure> {
        if Self::is_strong(&to_text(value)) {
            Ok(())
        } else {
            fail(format!(
                "{} should be a strong password (at least 8 characters, including uppercase, lowercase, number, and special character)",
                field
            ))
        }
    }

    fn is_strong(password: &str) -> bool {
        let is_symbol = |c: char| PASSWORD_SYMBOLS.contains(c);

        password.chars().count() >= PASSWORD_MIN_LENGTH
            && password
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || is_symbol(c))
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(is_symbol)
    }
}

/// Validates a string contains a substring, or an array contains an
/// equal string element
pub struct Contains;

impl Contains {
    pub fn validate(value: &Value, field: &str, pattern: &str) -> Result<(), ValidationFailure> {
        let found = match value {
            Value::String(s) => s.contains(pattern),
            Value::Array(items) => items.iter().any(|item| item.as_str() == Some(pattern)),
            _ => false,
        };

        if found {
            Ok(())
        } else {
            fail(format!(
                "{} should contain the pattern \"{}\"",
                field, pattern
            ))
        }
    }
}

/// Validates an array has an exact number of elements
pub struct ArrayLength(pub usize);

impl ArrayLength {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationFailure> {
        match value {
            Value::Array(items) if items.len() == self.0 => Ok(()),
            _ => fail(format!(
                "{} should be an array with length of {}",
                field, self.0
            )),
        }
    }
}

/// Validates an array holds only numbers
pub struct IsArrayOfNumbers;

impl IsArrayOfNumbers {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationFailure> {
        match value {
            Value::Array(items) if items.iter().all(Value::is_number) => Ok(()),
            _ => fail(format!("{} should be an array of numbers", field)),
        }
    }
}

/// Validates a dotted-quad address lies within an inclusive range.
///
/// Addresses are folded into a signed 32-bit number without checking
/// that octets are 0-255. A part with no digits makes the address
/// incomparable, and an incomparable address is never rejected.
pub struct InIpRange<'a>(pub &'a Bounds);

impl InIpRange<'_> {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationFailure> {
        let Bounds { start, end } = self.0;
        let ip = ipv4_to_number(&to_text(value));

        if ip < ipv4_to_number(start) || ip > ipv4_to_number(end) {
            fail(format!(
                "{} should be in the IP range {} - {}",
                field, start, end
            ))
        } else {
            Ok(())
        }
    }
}

/// `(int32(acc) << 8) + part` over the dot-separated parts; NaN when a part
/// has no integer prefix.
pub fn ipv4_to_number(ip: &str) -> f64 {
    ip.split('.').fold(0.0, |acc, part| {
        f64::from(to_int32(acc).wrapping_shl(8)) + parse_int_prefix(part).unwrap_or(f64::NAN)
    })
}

/// Validates a date lies within an inclusive range.
///
/// An unparseable bound never rejects on its side.
pub struct InDateRange<'a>(pub &'a Bounds);

impl InDateRange<'_> {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationFailure> {
        let Bounds { start, end } = self.0;
        let before_start = |date: f64| parse_date(start).is_some_and(|bound| date < bound);
        let after_end = |date: f64| parse_date(end).is_some_and(|bound| date > bound);

        match timestamp_millis(value) {
            Some(date) if !before_start(date) && !after_end(date) => Ok(()),
            _ => fail(format!(
                "{} should be a date between {} and {}",
                field, start, end
            )),
        }
    }
}

/// Validates a value is well-formed JSON text
pub struct IsJson;

impl IsJson {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationFailure> {
        match serde_json::from_str::<IgnoredAny>(&to_text(value)) {
            Ok(_) => Ok(()),
            Err(_) => fail(format!("{} should be a valid JSON string", field)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<(), ValidationFailure>) -> String {
        result.unwrap_err().message
    }

    #[test]
    fn test_int_type_is_lenient() {
        let validator = HasType(ParamType::Int);
        assert!(validator.validate(&json!("30"), "age").is_ok());
        assert!(validator.validate(&json!("42abc"), "age").is_ok());
        assert!(validator.validate(&json!(12.7), "age").is_ok());
        assert!(validator.validate(&json!(" -3"), "age").is_ok());
        assert_eq!(
            message(validator.validate(&json!("abc"), "age")),
            "age should be an integer"
        );
        assert!(validator.validate(&json!(true), "age").is_err());
        assert!(validator.validate(&json!(null), "age").is_err());
    }

    #[test]
    fn test_float_type() {
        let validator = HasType(ParamType::Float);
        assert!(validator.validate(&json!("3.14"), "price").is_ok());
        assert!(validator.validate(&json!(".5kg"), "price").is_ok());
        assert!(validator.validate(&json!("Infinity"), "price").is_ok());
        assert_eq!(
            message(validator.validate(&json!("free"), "price")),
            "price should be a floating point number"
        );
    }

    #[test]
    fn test_string_and_boolean_types() {
        assert!(HasType(ParamType::String).validate(&json!("x"), "s").is_ok());
        assert_eq!(
            message(HasType(ParamType::String).validate(&json!(1), "s")),
            "s should be a string"
        );
        assert!(HasType(ParamType::Boolean).validate(&json!(false), "b").is_ok());
        assert_eq!(
            message(HasType(ParamType::Boolean).validate(&json!("true"), "b")),
            "b should be a boolean"
        );
    }

    #[test]
    fn test_date_type() {
        let validator = HasType(ParamType::Date);
        assert!(validator.validate(&json!("2024-01-15"), "when").is_ok());
        assert!(validator.validate(&json!(1_700_000_000_000_i64), "when").is_ok());
        assert_eq!(
            message(validator.validate(&json!("yesterday"), "when")),
            "when should be a valid date"
        );
    }

    #[test]
    fn test_exact_length() {
        let validator = ExactLength(3);
        assert!(validator.validate(&json!("abc"), "code").is_ok());
        assert!(validator.validate(&json!(12345), "code").is_ok());
        assert_eq!(
            message(validator.validate(&json!("abcd"), "code")),
            "code should have a length of 3"
        );
    }

    #[test]
    fn test_exact_length_counts_utf16_units() {
        assert!(ExactLength(2).validate(&json!("😀"), "emoji").is_ok());
        assert!(ExactLength(2).validate(&json!("é!"), "word").is_ok());
    }

    #[test]
    fn test_in_range_boundaries() {
        let validator = InRange(NumericRange { min: 0.0, max: 10.0 });
        assert!(validator.validate(&json!(0), "score").is_ok());
        assert!(validator.validate(&json!(10), "score").is_ok());
        assert!(validator.validate(&json!("50"), "score").is_ok());
        assert_eq!(
            message(validator.validate(&json!(11), "score")),
            "score should be in the range [0, 10]"
        );
        assert!(validator.validate(&json!(-0.5), "score").is_err());
    }

    #[test]
    fn test_in_range_message_with_fractions() {
        let validator = InRange(NumericRange { min: 0.5, max: 2.5 });
        assert_eq!(
            message(validator.validate(&json!(3), "ratio")),
            "ratio should be in the range [0.5, 2.5]"
        );
    }

    #[test]
    fn test_allowed_values() {
        let allowed = vec!["admin".to_string(), "user".to_string()];
        assert!(AllowedValues::validate(&json!("admin"), "role", &allowed).is_ok());
        assert!(AllowedValues::validate(&json!("admin user"), "role", &allowed).is_ok());
        assert_eq!(
            message(AllowedValues::validate(&json!("guest"), "role", &allowed)),
            "role should have a value among admin, user"
        );
        assert!(AllowedValues::validate(&json!("admin  user"), "role", &allowed).is_err());
        assert!(AllowedValues::validate(&json!(1), "role", &allowed).is_err());
    }

    #[test]
    fn test_allowed_values_empty_set_rejects_everything() {
        assert!(AllowedValues::validate(&json!(""), "role", &[]).is_err());
        assert_eq!(
            message(AllowedValues::validate(&json!("x"), "role", &[])),
            "role should have a value among "
        );
    }

    #[test]
    fn test_matches() {
        let regex = Pattern::new(r"^\d{3}-\d{4}$").unwrap();
        let validator = Matches(&regex);
        assert!(validator.validate(&json!("555-1234"), "phone").is_ok());
        assert_eq!(
            message(validator.validate(&json!("5551234"), "phone")),
            r"phone should match the format /^\d{3}-\d{4}$/"
        );
    }

    #[test]
    fn test_matches_reads_numbers_as_text() {
        let regex = Pattern::new(r"^\d+$").unwrap();
        assert!(Matches(&regex).validate(&json!(123), "n").is_ok());
    }

    #[test]
    fn test_is_email() {
        assert!(IsEmail::validate(&json!("user@example.com"), "email").is_ok());
        assert!(IsEmail::validate(&json!("a@b.c.d"), "email").is_ok());
        assert_eq!(
            message(IsEmail::validate(&json!("not-an-email"), "email")),
            "email should be a valid email address"
        );
        assert!(IsEmail::validate(&json!("user@example"), "email").is_err());
        assert!(IsEmail::validate(&json!("us er@example.com"), "email").is_err());
        assert!(IsEmail::validate(&json!("a@@b.com"), "email").is_err());
    }

    #[test]
    fn test_strong_password() {
        assert!(IsStrongPassword::validate(&json!("Passw0rd!"), "pw").is_ok());
        assert!(IsStrongPassword::validate(&json!("Ab1?efgh"), "pw").is_ok());
        assert!(IsStrongPassword::validate(&json!("Ab1?efg"), "pw").is_err());
        assert!(IsStrongPassword::validate(&json!("password1!"), "pw").is_err());
        assert!(IsStrongPassword::validate(&json!("PASSWORD1!"), "pw").is_err());
        assert!(IsStrongPassword::validate(&json!("Password!!"), "pw").is_err());
        assert!(IsStrongPassword::validate(&json!("Password11"), "pw").is_err());
        assert_eq!(
            message(IsStrongPassword::validate(&json!("Pass word1!"), "pw")),
            "pw should be a strong password (at least 8 characters, including uppercase, lowercase, number, and special character)"
        );
    }

    #[test]
    fn test_contains() {
        assert!(Contains::validate(&json!("order-123"), "ref", "order-").is_ok());
        assert_eq!(
            message(Contains::validate(&json!("invoice-9"), "ref", "order-")),
            "ref should contain the pattern \"order-\""
        );
        assert!(Contains::validate(&json!(["a", "order-"]), "ref", "order-").is_ok());
        assert!(Contains::validate(&json!(["order-1"]), "ref", "order-").is_err());
        assert!(Contains::validate(&json!(42), "ref", "4").is_err());
    }

    #[test]
    fn test_array_length() {
        let validator = ArrayLength(2);
        assert!(validator.validate(&json!([1, "a"]), "pair").is_ok());
        assert_eq!(
            message(validator.validate(&json!([1]), "pair")),
            "pair should be an array with length of 2"
        );
        assert!(validator.validate(&json!("ab"), "pair").is_err());
    }

    #[test]
    fn test_array_of_numbers() {
        assert!(IsArrayOfNumbers::validate(&json!([1, 2.5, -3]), "nums").is_ok());
        assert!(IsArrayOfNumbers::validate(&json!([]), "nums").is_ok());
        assert_eq!(
            message(IsArrayOfNumbers::validate(&json!([1, "2"]), "nums")),
            "nums should be an array of numbers"
        );
        assert!(IsArrayOfNumbers::validate(&json!(1), "nums").is_err());
    }

    #[test]
    fn test_ipv4_to_number_wraps_like_int32() {
        assert_eq!(ipv4_to_number("10.0.0.1"), 167_772_161.0);
        assert_eq!(ipv4_to_number("192.168.1.100"), -1_062_731_420.0);
        assert!(ipv4_to_number("10.x.0.1").is_finite());
        assert!(ipv4_to_number("10.0.0.x").is_nan());
    }

    #[test]
    fn test_ip_range() {
        let bounds = Bounds::new("192.168.1.1", "192.168.1.255");
        let validator = InIpRange(&bounds);
        assert!(validator.validate(&json!("192.168.1.100"), "ip").is_ok());
        assert!(validator.validate(&json!("192.168.1.1"), "ip").is_ok());
        assert!(validator.validate(&json!("192.168.1.255"), "ip").is_ok());
        assert_eq!(
            message(validator.validate(&json!("192.168.2.1"), "ip")),
            "ip should be in the IP range 192.168.1.1 - 192.168.1.255"
        );
        assert!(validator.validate(&json!("10.0.0.1"), "ip").is_err());
    }

    #[test]
    fn test_ip_range_does_not_check_octets() {
        let bounds = Bounds::new("10.0.0.0", "10.0.1.255");
        let validator = InIpRange(&bounds);
        // 10.0.0.300 folds to the same number as 10.0.1.44
        assert!(validator.validate(&json!("10.0.0.300"), "ip").is_ok());
        // an incomparable address is not rejected
        assert!(validator.validate(&json!("not-an-ip"), "ip").is_ok());
    }

    #[test]
    fn test_date_range() {
        let bounds = Bounds::new("2024-01-01", "2024-12-31");
        let validator = InDateRange(&bounds);
        assert!(validator.validate(&json!("2024-06-15"), "when").is_ok());
        assert!(validator.validate(&json!("2024-01-01"), "when").is_ok());
        assert!(validator.validate(&json!("2024-12-31"), "when").is_ok());
        assert_eq!(
            message(validator.validate(&json!("2025-01-01"), "when")),
            "when should be a date between 2024-01-01 and 2024-12-31"
        );
        assert_eq!(
            message(validator.validate(&json!("garbage"), "when")),
            "when should be a date between 2024-01-01 and 2024-12-31"
        );
    }

    #[test]
    fn test_date_range_with_unparseable_bound() {
        let bounds = Bounds::new("whenever", "2024-12-31");
        let validator = InDateRange(&bounds);
        assert!(validator.validate(&json!("1900-01-01"), "when").is_ok());
        assert!(validator.validate(&json!("2025-01-01"), "when").is_err());
    }

    #[test]
    fn test_is_json() {
        assert!(IsJson::validate(&json!(r#"{"a": [1, 2]}"#), "doc").is_ok());
        assert!(IsJson::validate(&json!("42"), "doc").is_ok());
        assert!(IsJson::validate(&json!(42), "doc").is_ok());
        assert!(IsJson::validate(&json!(null), "doc").is_ok());
        assert_eq!(
            message(IsJson::validate(&json!("{oops"), "doc")),
            "doc should be a valid JSON string"
        );
        assert!(IsJson::validate(&json!({"a": 1}), "doc").is_err());
    }
}
