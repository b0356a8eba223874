use crate::error::{LabenvError, Result};
use crate::project_identity;
use std::env;
use std::path::PathBuf;

/// Locate the project's environment record.
///
/// `LABENV_CONFIG` overrides everything; otherwise walk upward from the
/// working directory so the tool also works from `notebooks/` or `src/`.
/// When no record exists anywhere, the expected path in the working
/// directory is returned so `init` and error messages agree on a location.
pub fn record_file() -> Result<PathBuf> {
    if let Some(overridden) = env::var_os(project_identity::env_key("CONFIG")) {
        return Ok(PathBuf::from(overridden));
    }

    let cwd = env::current_dir().map_err(|e| {
        LabenvError::Other(format!("Could not determine working directory: {}", e))
    })?;

    let mut dir = cwd.as_path();
    loop {
        let candidate = dir.join(project_identity::RECORD_FILE_BASENAME);
        if candidate.exists() {
            return Ok(candidate);
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    Ok(cwd.join(project_identity::RECORD_FILE_BASENAME))
}
