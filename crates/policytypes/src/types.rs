//! Core data types for extracted content policy constants.

use serde::{Deserialize, Serialize};

/// A single `const nsContentPolicyType NAME = VALUE` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConstant {
    /// Constant identifier, e.g. `TYPE_DOCUMENT`.
    pub name: String,
    /// Decimal value exactly as written in the IDL.
    pub value: String,
}

impl PolicyConstant {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the captured value as an unsigned ordinal.
    pub fn ordinal(&self) -> PolicyTypesResult<u64> {
        self.value
            .parse::<u64>()
            .map_err(|_| PolicyTypesError::InvalidValue {
                name: self.name.clone(),
                value: self.value.clone(),
            })
    }
}

/// All constants found in one document, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub constants: Vec<PolicyConstant>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Constant names in document order. Duplicates are kept.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constants.iter().map(|c| c.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PolicyConstant> {
        self.constants.iter()
    }
}

impl From<Vec<PolicyConstant>> for Extraction {
    fn from(constants: Vec<PolicyConstant>) -> Self {
        Self { constants }
    }
}

/// Shape of the generated artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Bracketed list of quoted names, one per line.
    #[default]
    List,
    /// A `nsContentPolicyType` Rust enum with explicit discriminants.
    RustEnum,
    /// JSON array of `{"name", "value"}` objects.
    Json,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::List => "list",
            OutputFormat::RustEnum => "rust-enum",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = PolicyTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(OutputFormat::List),
            "rust-enum" | "rust" => Ok(OutputFormat::RustEnum),
            "json" => Ok(OutputFormat::Json),
            other => Err(PolicyTypesError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors produced while rendering or checking constants.
#[derive(thiserror::Error, Debug)]
pub enum PolicyTypesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {name}: {value:?} is not an unsigned integer")]
    InvalidValue { name: String, value: String },

    #[error("Ordinal of {name} is {value}, expected greater than {previous}")]
    OrdinalNotIncreasing {
        name: String,
        previous: u64,
        value: u64,
    },

    #[error("Duplicate constant name: {0}")]
    DuplicateName(String),

    #[error("Duplicate value {value} for {name}")]
    DuplicateValue { name: String, value: u64 },

    #[error("Unknown output format: {0} (expected list, rust-enum or json)")]
    UnknownFormat(String),
}

/// Convenience result type.
pub type PolicyTypesResult<T> = Result<T, PolicyTypesError>;
