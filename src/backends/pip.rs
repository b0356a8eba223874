//! pip backend
//!
//! Plain virtualenvs. Everything runs through the venv's own interpreter
//! (`<prefix>/bin/python -m pip`), never a bare `pip` from PATH, so the
//! listing always describes the snapshot's environment.

use crate::backends::snapshot::EnvSnapshot;
use crate::backends::{Listing, PackageBackend, run_capture};
use crate::core::types::Tool;
use crate::error::{LabenvError, Result};
use crate::utils::sanitize;
use std::path::Path;
use std::process::{Command, Stdio};

pub struct PipBackend;

impl PackageBackend for PipBackend {
    fn tool(&self) -> Tool {
        Tool::Pip
    }

    fn is_installed(&self) -> bool {
        which::which("pip").is_ok()
            || which::which("pip3").is_ok()
            || which::which("python3").is_ok()
    }

    fn is_active(&self, env: &EnvSnapshot) -> bool {
        env.prefix_for(Tool::Pip).is_some()
    }

    fn prefix<'a>(&self, env: &'a EnvSnapshot) -> Option<&'a Path> {
        env.prefix_for(Tool::Pip)
    }

    fn list_packages(&self, env: &EnvSnapshot) -> Result<Listing> {
        let Some(prefix) = self.prefix(env) else {
            return Ok(Listing::Inactive);
        };

        let python = prefix.join("bin").join("python");
        let captured = run_capture(Command::new(&python).args([
            "-m",
            "pip",
            "list",
            "--format",
            "json",
            "--disable-pip-version-check",
        ]))?;

        Ok(Listing::Packages(super::parse_pip_style_listing(
            &captured.stdout,
        )?))
    }

    fn install(&self, env: &EnvSnapshot, package: &str) -> Result<()> {
        sanitize::validate_package_name(package)?;

        let Some(prefix) = self.prefix(env) else {
            return Err(LabenvError::EnvironmentInactive {
                tool: Tool::Pip.to_string(),
            });
        };

        let python = prefix.join("bin").join("python");
        let status = Command::new(&python)
            .args(["-m", "pip", "install", package])
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .status()
            .map_err(|e| LabenvError::SystemCommandFailed {
                command: "python -m pip install".into(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(LabenvError::SystemCommandFailed {
                command: format!("python -m pip install {}", package),
                reason: status.to_string(),
            });
        }

        Ok(())
    }
}
