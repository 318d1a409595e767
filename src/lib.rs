// SpectraGet - declarative request parameter validation
//
// Describe the parameters an endpoint accepts as a flat schema, then check
// incoming request data against it. The first violation is reported with
// an HTTP 400 status, ready to send back to the client.

pub mod logging;

// Re-export the validation engine
#[cfg(feature = "validation")]
pub use spectraget_validation::*;

#[cfg(feature = "validation")]
pub use spectraget_validation;

// Prelude for common imports
#[cfg(feature = "validation")]
pub mod prelude {
    pub use crate::{
        ParamType, ParameterSpec, Payload, Schema, SchemaError, SchemaLoader, ValidationFailure,
        ValidationOutcome, Validator, VALIDATOR, load_schema,
    };
    pub use serde_json::json;
}
