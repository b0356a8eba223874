//! uv backend
//!
//! uv-managed virtualenvs: listing and installs go through `uv pip`, scoped
//! to the snapshot's venv via an explicit VIRTUAL_ENV rather than whatever
//! the calling shell happens to export.

use crate::backends::snapshot::EnvSnapshot;
use crate::backends::{Listing, PackageBackend, run_capture};
use crate::core::types::Tool;
use crate::error::{LabenvError, Result};
use crate::utils::sanitize;
use std::path::Path;
use std::process::{Command, Stdio};

pub struct UvBackend;

impl PackageBackend for UvBackend {
    fn tool(&self) -> Tool {
        Tool::Uv
    }

    fn is_installed(&self) -> bool {
        which::which("uv").is_ok()
    }

    fn is_active(&self, env: &EnvSnapshot) -> bool {
        env.prefix_for(Tool::Uv).is_some()
    }

    fn prefix<'a>(&self, env: &'a EnvSnapshot) -> Option<&'a Path> {
        env.prefix_for(Tool::Uv)
    }

    fn list_packages(&self, env: &EnvSnapshot) -> Result<Listing> {
        let Some(prefix) = self.prefix(env) else {
            return Ok(Listing::Inactive);
        };

        let captured = run_capture(
            Command::new("uv")
                .args(["pip", "list", "--format", "json"])
                .env("VIRTUAL_ENV", prefix),
        )?;

        Ok(Listing::Packages(super::parse_pip_style_listing(
            &captured.stdout,
        )?))
    }

    fn install(&self, env: &EnvSnapshot, package: &str) -> Result<()> {
        sanitize::validate_package_name(package)?;

        let Some(prefix) = self.prefix(env) else {
            return Err(LabenvError::EnvironmentInactive {
                tool: Tool::Uv.to_string(),
            });
        };

        let status = Command::new("uv")
            .args(["pip", "install", package])
            .env("VIRTUAL_ENV", prefix)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .status()
            .map_err(|e| LabenvError::SystemCommandFailed {
                command: "uv pip install".into(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(LabenvError::SystemCommandFailed {
                command: format!("uv pip install {}", package),
                reason: status.to_string(),
            });
        }

        Ok(())
    }
}
