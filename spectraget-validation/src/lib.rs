//! Schema-driven request parameter validation
//!
//! A [`Schema`] is a flat, closed list of [`ParameterSpec`]s. The
//! [`Validator`] checks a request payload against it and reports the first
//! violation as a [`ValidationFailure`] carrying an HTTP 400 status.
//!
//! # Examples
//!
//! ## Building a Schema
//!
//! ```
//! use spectraget_validation::{ParamType, ParameterSpec, Schema, Validator};
//! use serde_json::json;
//!
//! let schema = Schema::new(vec![
//!     ParameterSpec::new("email").required().email(),
//!     ParameterSpec::new("role").with_values(["admin", "user"]),
//!     ParameterSpec::new("age").with_type(ParamType::Int).with_range(0.0, 130.0),
//! ])
//! .unwrap();
//!
//! let validator = Validator::new();
//! assert!(validator
//!     .validate_json(&schema, &json!({"email": "jane@example.com", "age": 30}))
//!     .is_ok());
//!
//! let failure = validator
//!     .validate_json(&schema, &json!({"email": "jane@example.com", "role": "guest"}))
//!     .unwrap_err();
//! assert_eq!(failure.message, "role should have a value among admin, user");
//! ```
//!
//! ## Loading a Schema
//!
//! ```
//! use spectraget_validation::{SchemaFormat, SchemaLoader, VALIDATOR};
//! use serde_json::json;
//!
//! let schema = SchemaLoader::new(SchemaFormat::Json)
//!     .parse(r#"[{"name": "ip", "ipRange": ["192.168.1.1", "192.168.1.255"]}]"#)
//!     .unwrap();
//!
//! assert!(VALIDATOR.validate_json(&schema, &json!({"ip": "192.168.1.100"})).is_ok());
//! ```
//!
//! ## Single Checkers
//!
//! ```
//! use spectraget_validation::{IsEmail, IsStrongPassword};
//! use serde_json::json;
//!
//! assert!(IsEmail::validate(&json!("user@example.com"), "email").is_ok());
//! assert!(IsStrongPassword::validate(&json!("weak"), "password").is_err());
//! ```

mod coerce;
mod date;
mod errors;
mod loader;
mod pattern;
mod schema;
mod validator;
mod validators;

pub use errors::*;
pub use loader::*;
pub use pattern::Pattern;
pub use schema::*;
pub use validator::*;
pub use validators::*;
