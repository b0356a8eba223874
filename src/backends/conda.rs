//! conda backend
//!
//! Channel-based environments. Listing and installs address the snapshot's
//! prefix explicitly (`--prefix`), so a stale CONDA_DEFAULT_ENV name can
//! never redirect an operation to the wrong environment.

use crate::backends::snapshot::EnvSnapshot;
use crate::backends::{Listing, PackageBackend, run_capture};
use crate::core::types::{PackageObservation, Tool};
use crate::error::{LabenvError, Result};
use crate::utils::sanitize;
use std::path::Path;
use std::process::{Command, Stdio};

pub struct CondaBackend;

impl PackageBackend for CondaBackend {
    fn tool(&self) -> Tool {
        Tool::Conda
    }

    fn is_installed(&self) -> bool {
        which::which("conda").is_ok() || which::which("mamba").is_ok()
    }

    fn is_active(&self, env: &EnvSnapshot) -> bool {
        env.prefix_for(Tool::Conda).is_some()
    }

    fn prefix<'a>(&self, env: &'a EnvSnapshot) -> Option<&'a Path> {
        env.prefix_for(Tool::Conda)
    }

    fn list_packages(&self, env: &EnvSnapshot) -> Result<Listing> {
        let Some(prefix) = self.prefix(env) else {
            return Ok(Listing::Inactive);
        };

        let captured = run_capture(
            Command::new(conda_binary())
                .args(["list", "--prefix"])
                .arg(prefix)
                .arg("--json"),
        )?;

        Ok(Listing::Packages(parse_conda_listing(&captured.stdout)?))
    }

    fn install(&self, env: &EnvSnapshot, package: &str) -> Result<()> {
        sanitize::validate_package_name(package)?;

        let Some(prefix) = self.prefix(env) else {
            return Err(LabenvError::EnvironmentInactive {
                tool: Tool::Conda.to_string(),
            });
        };

        let status = Command::new(conda_binary())
            .args(["install", "--prefix"])
            .arg(prefix)
            .args(["--yes", package])
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .status()
            .map_err(|e| LabenvError::SystemCommandFailed {
                command: "conda install".into(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(LabenvError::SystemCommandFailed {
                command: format!("conda install {}", package),
                reason: status.to_string(),
            });
        }

        Ok(())
    }
}

fn conda_binary() -> &'static str {
    if which::which("conda").is_ok() {
        "conda"
    } else {
        "mamba"
    }
}

/// Parse `conda list --json` output.
fn parse_conda_listing(raw: &str) -> Result<Vec<PackageObservation>> {
    #[derive(serde::Deserialize)]
    struct CondaPackage {
        name: String,
        version: String,
    }

    let listed: Vec<CondaPackage> = serde_json::from_str(raw.trim())
        .map_err(|e| LabenvError::BackendProbeFailure(format!("Unreadable conda listing: {}", e)))?;

    Ok(listed
        .into_iter()
        .map(|p| PackageObservation::new(&p.name, p.version))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::parse_conda_listing;

    #[test]
    fn parses_conda_json() {
        let raw = r#"[
            {"base_url": "https://conda.anaconda.org/conda-forge", "channel": "conda-forge",
             "name": "NumPy", "version": "1.26.4", "build_number": 0},
            {"channel": "defaults", "name": "python", "version": "3.12.4"}
        ]"#;
        let packages = parse_conda_listing(raw).expect("parse");
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "numpy");
        assert_eq!(packages[0].version, "1.26.4");
    }

    #[test]
    fn garbage_is_a_probe_failure() {
        assert!(parse_conda_listing("CondaError: oops").is_err());
    }
}
