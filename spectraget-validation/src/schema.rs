// Parameter schema model

use crate::errors::{Result, SchemaError};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected runtime type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Anything with a base-10 integer prefix
    Int,
    /// Anything with a decimal number prefix
    Float,
    String,
    Boolean,
    /// Anything that converts to a valid timestamp
    Date,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Date => "date",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive numeric bounds, written `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl From<[f64; 2]> for NumericRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<NumericRange> for [f64; 2] {
    fn from(range: NumericRange) -> Self {
        [range.min, range.max]
    }
}

/// Inclusive bounds given as two strings, written `[start, end]`.
///
/// Used for dotted-quad IP ranges and for date ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[String; 2]", into = "[String; 2]")]
pub struct Bounds {
    pub start: String,
    pub end: String,
}

impl Bounds {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl From<[String; 2]> for Bounds {
    fn from([start, end]: [String; 2]) -> Self {
        Self { start, end }
    }
}

impl From<Bounds> for [String; 2] {
    fn from(bounds: Bounds) -> Self {
        [bounds.start, bounds.end]
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Rules for one expected request parameter.
///
/// Every directive is optional and independent; all present directives
/// must pass. Field names on the wire follow the camelCase schema format
/// (`isEmail`, `patternContains`, `isJSON`, ...).
///
/// # Examples
///
/// ```
/// use spectraget_validation::{ParamType, ParameterSpec};
///
/// let spec = ParameterSpec::new("age")
///     .required()
///     .with_type(ParamType::Int)
///     .with_range(0.0, 130.0);
///
/// assert!(spec.mandatory);
/// assert_eq!(spec.param_type, Some(ParamType::Int));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub mandatory: bool,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<ParamType>,

    /// Exact string length, in UTF-16 code units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,

    /// Allowed space-separated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,

    /// Regex source; an empty pattern is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_email: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_strong_password: bool,

    /// Required substring; an empty pattern is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_contains: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_length: Option<usize>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_array_of_numbers: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range: Option<Bounds>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<Bounds>,

    #[serde(default, rename = "isJSON", skip_serializing_if = "is_false")]
    pub is_json: bool,
}

impl ParameterSpec {
    /// Create an optional parameter with no constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Mark the parameter as mandatory
    pub fn required(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = Some(param_type);
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(NumericRange { min, max });
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn email(mut self) -> Self {
        self.is_email = true;
        self
    }

    pub fn strong_password(mut self) -> Self {
        self.is_strong_password = true;
        self
    }

    pub fn with_pattern_contains(mut self, pattern: impl Into<String>) -> Self {
        self.pattern_contains = Some(pattern.into());
        self
    }

    pub fn with_array_length(mut self, length: usize) -> Self {
        self.array_length = Some(length);
        self
    }

    pub fn array_of_numbers(mut self) -> Self {
        self.is_array_of_numbers = true;
        self
    }

    pub fn with_ip_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.ip_range = Some(Bounds::new(start, end));
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.date_range = Some(Bounds::new(start, end));
        self
    }

    pub fn json(mut self) -> Self {
        self.is_json = true;
        self
    }
}

/// A parameter spec together with its compiled regex directive
#[derive(Debug, Clone)]
pub struct ParamRule {
    spec: ParameterSpec,
    pattern: Option<Pattern>,
}

impl ParamRule {
    fn compile(spec: ParameterSpec) -> Result<Self> {
        let pattern = match spec.regex.as_deref() {
            Some(source) if !source.is_empty() => {
                Some(
                    Pattern::new(source).map_err(|err| SchemaError::InvalidRegex {
                        parameter: spec.name.clone(),
                        source: err,
                    })?,
                )
            }
            _ => None,
        };

        Ok(Self { spec, pattern })
    }

    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    /// Compiled `regex` directive, if one is set
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }
}

/// A closed set of expected parameters, unique by name.
///
/// Deserializes from (and serializes to) a plain list of
/// [`ParameterSpec`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ParameterSpec>", into = "Vec<ParameterSpec>")]
pub struct Schema {
    rules: Vec<ParamRule>,
}

impl Schema {
    /// Build a schema, rejecting duplicate names and invalid regexes
    pub fn new(params: impl IntoIterator<Item = ParameterSpec>) -> Result<Self> {
        let mut rules: Vec<ParamRule> = Vec::new();

        for spec in params {
            if rules.iter().any(|rule| rule.spec.name == spec.name) {
                return Err(SchemaError::DuplicateParameter(spec.name));
            }
            rules.push(ParamRule::compile(spec)?);
        }

        Ok(Self { rules })
    }

    /// Look up the rule for a parameter name
    pub fn get(&self, name: &str) -> Option<&ParamRule> {
        self.rules.iter().find(|rule| rule.spec.name == name)
    }

    pub fn params(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.rules.iter().map(ParamRule::spec)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<Vec<ParameterSpec>> for Schema {
    type Error = SchemaError;

    fn try_from(params: Vec<ParameterSpec>) -> Result<Self> {
        Self::new(params)
    }
}

impl From<Schema> for Vec<ParameterSpec> {
    fn from(schema: Schema) -> Self {
        schema.rules.into_iter().map(|rule| rule.spec).collect()
    }
}
