use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Supported environment tools.
// Adding a new manager means a variant here plus arms in Tool::display(),
// Tool::from_str() and backends::backend_for() - the compiler walks you
// through the rest.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Uv,    // uv-managed virtualenvs (binary wheel cache)
    Conda, // conda/mamba channel environments
    Pip,   // plain virtualenv + pip against an index
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Uv, Tool::Conda, Tool::Pip];
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uv => write!(f, "uv"),
            Self::Conda => write!(f, "conda"),
            Self::Pip => write!(f, "pip"),
        }
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uv" => Ok(Tool::Uv),
            "conda" | "mamba" => Ok(Tool::Conda),
            "pip" | "venv" => Ok(Tool::Pip),
            other => Err(format!(
                "Unknown tool '{}'. Supported: uv, conda, pip",
                other
            )),
        }
    }
}

/// One currently-installed package as reported by a backend.
///
/// The name is already normalized (see [`crate::core::identity`]); the
/// version string is passed through verbatim from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageObservation {
    pub name: String,
    pub version: String,
}

impl PackageObservation {
    pub fn new(raw_name: &str, version: impl Into<String>) -> Self {
        Self {
            name: crate::core::identity::normalize_name(raw_name),
            version: version.into(),
        }
    }
}
