// Schema file loaders

use crate::errors::{Result, SchemaError};
use crate::schema::{ParameterSpec, Schema};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Supported schema file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// A JSON array of parameter specs, or an object with a `params` array
    Json,
    /// A TOML document with a `[[params]]` array of tables
    Toml,
}

impl SchemaFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(SchemaFormat::Json),
            "toml" => Some(SchemaFormat::Toml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaFormat::Json => "json",
            SchemaFormat::Toml => "toml",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    List(Vec<ParameterSpec>),
    Table { params: Vec<ParameterSpec> },
}

#[derive(Deserialize)]
struct TomlDocument {
    #[serde(default)]
    params: Vec<ParameterSpec>,
}

/// Schema file loader
///
/// # Examples
///
/// ```
/// use spectraget_validation::{SchemaFormat, SchemaLoader};
///
/// let schema = SchemaLoader::new(SchemaFormat::Toml)
///     .parse(
///         r#"
///         [[params]]
///         name = "age"
///         mandatory = true
///         type = "int"
///         "#,
///     )
///     .unwrap();
///
/// assert_eq!(schema.len(), 1);
/// ```
pub struct SchemaLoader {
    format: SchemaFormat,
}

impl SchemaLoader {
    pub fn new(format: SchemaFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SchemaError::Load("No file extension found".to_string()))?;

        let format = SchemaFormat::from_extension(ext)
            .ok_or_else(|| SchemaError::UnsupportedFormat(ext.to_string()))?;

        Ok(Self::new(format))
    }

    pub fn format(&self) -> SchemaFormat {
        self.format
    }

    /// Load a schema from file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Schema> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!(path = %path.display(), format = self.format.as_str(), "Loading schema file");

        self.parse(&content)
    }

    /// Parse a schema from a string
    pub fn parse(&self, content: &str) -> Result<Schema> {
        let params = match self.format {
            SchemaFormat::Json => self.parse_json(content)?,
            SchemaFormat::Toml => self.parse_toml(content)?,
        };

        let schema = Schema::new(params)?;
        debug!(
            format = self.format.as_str(),
            parameters = schema.len(),
            "Schema loaded"
        );
        Ok(schema)
    }

    fn parse_json(&self, content: &str) -> Result<Vec<ParameterSpec>> {
        let document: JsonDocument = serde_json::from_str(content)
            .map_err(|e| SchemaError::Parse(format!("JSON parse error: {}", e)))?;

        Ok(match document {
            JsonDocument::List(params) | JsonDocument::Table { params } => params,
        })
    }

    fn parse_toml(&self, content: &str) -> Result<Vec<ParameterSpec>> {
        let document: TomlDocument = toml::from_str(content)
            .map_err(|e| SchemaError::Parse(format!("TOML parse error: {}", e)))?;

        Ok(document.params)
    }
}

/// Load a schema file, detecting the format from its extension
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema> {
    let path = path.as_ref();
    SchemaLoader::auto(path)?.load_file(path)
}
