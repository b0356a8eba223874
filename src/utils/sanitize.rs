//! Input sanitization.
//!
//! Package names end up as arguments to backend binaries; reject anything
//! that could smuggle shell metacharacters or path traversal before it gets
//! near a `Command`.

use crate::error::{LabenvError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Safe characters for Python package requirements.
static SAFE_PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("Invalid regex pattern"));

pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LabenvError::ConfigError(
            "Package name cannot be empty".to_string(),
        ));
    }

    if name.len() > 256 {
        return Err(LabenvError::ConfigError(format!(
            "Package name too long (max 256 chars): {}",
            &name[..50]
        )));
    }

    if !SAFE_PACKAGE_NAME.is_match(name) {
        return Err(LabenvError::ConfigError(format!(
            "Package name contains invalid characters: {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(LabenvError::ConfigError(format!(
            "Package name cannot contain path traversal: {}",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests;
