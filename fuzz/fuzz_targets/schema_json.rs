//! Fuzz target for schema loading.
//!
//! Feeds arbitrary text to the JSON and TOML schema loaders and validates
//! arbitrary JSON payloads against whatever loads.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spectraget_validation::{SchemaFormat, SchemaLoader, VALIDATOR};

#[derive(Debug, Arbitrary)]
struct FuzzDocument {
    schema: String,
    payload: String,
    toml: bool,
}

fuzz_target!(|doc: FuzzDocument| {
    let format = if doc.toml {
        SchemaFormat::Toml
    } else {
        SchemaFormat::Json
    };

    let Ok(schema) = SchemaLoader::new(format).parse(&doc.schema) else {
        return;
    };

    if let Ok(payload) = serde_json::from_str::<serde_json::Value>(&doc.payload) {
        let _ = VALIDATOR.validate_json(&schema, &payload);
    }
});
