//! Package-manager backends.
//!
//! One adapter per supported tool, all normalized to the same contract:
//! detect whether the manager is installed, whether one of its environments
//! is active in the given snapshot, and list what it has installed. Listing
//! never mutates backend state; `install` exists solely for fix mode.

pub mod conda;
pub mod pip;
pub mod snapshot;
pub mod uv;

use crate::core::types::{PackageObservation, Tool};
use crate::error::{LabenvError, Result};
use regex::Regex;
use snapshot::EnvSnapshot;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

/// Outcome of a package listing probe.
///
/// Inactivity is a normal state, not a fault: the caller decides whether an
/// inactive backend is a hard error (sync) or a reportable status (check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Inactive,
    Packages(Vec<PackageObservation>),
}

pub trait PackageBackend {
    fn tool(&self) -> Tool;

    /// Whether the manager binary is present at all. Absence is a normal
    /// answer, never an error.
    fn is_installed(&self) -> bool;

    /// Whether an environment owned by this manager is active in the snapshot.
    fn is_active(&self, env: &EnvSnapshot) -> bool;

    /// List installed packages, or report inactivity.
    fn list_packages(&self, env: &EnvSnapshot) -> Result<Listing>;

    /// Interpreter version of the active environment, `None` when inactive.
    fn interpreter_version(&self, env: &EnvSnapshot) -> Result<Option<String>> {
        match self.prefix(env) {
            Some(prefix) => probe_python_version(prefix).map(Some),
            None => Ok(None),
        }
    }

    /// Root directory of the active environment, `None` when inactive.
    fn prefix<'a>(&self, env: &'a EnvSnapshot) -> Option<&'a Path>;

    /// Install one package into the active environment (fix mode only).
    fn install(&self, env: &EnvSnapshot, package: &str) -> Result<()>;
}

/// Closed dispatch over the tool enum. Adding a backend is an explicit,
/// exhaustively-checked addition here.
pub fn backend_for(tool: Tool) -> Box<dyn PackageBackend> {
    match tool {
        Tool::Uv => Box::new(uv::UvBackend),
        Tool::Conda => Box::new(conda::CondaBackend),
        Tool::Pip => Box::new(pip::PipBackend),
    }
}

static PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").expect("Invalid regex pattern"));

/// Ask the environment's own interpreter for its version.
pub(crate) fn probe_python_version(prefix: &Path) -> Result<String> {
    let python = prefix.join("bin").join("python");
    let captured = run_capture(Command::new(&python).arg("--version"))?;
    // Interpreters before 3.4 print the banner on stderr, newer ones on stdout.
    let banner = format!("{}\n{}", captured.stdout, captured.stderr);
    PYTHON_VERSION
        .captures(&banner)
        .map(|c| c[1].to_string())
        .ok_or_else(|| {
            LabenvError::BackendProbeFailure(format!(
                "Could not read a version from `{} --version`: {}",
                python.display(),
                banner.trim()
            ))
        })
}

pub(crate) struct Captured {
    pub stdout: String,
    pub stderr: String,
}

/// Run a command and capture its output, mapping spawn failures and non-zero
/// exits to errors the caller can attribute.
pub(crate) fn run_capture(cmd: &mut Command) -> Result<Captured> {
    let rendered = render_command(cmd);
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| LabenvError::SystemCommandFailed {
            command: rendered.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LabenvError::SystemCommandFailed {
            command: rendered,
            reason: format!("{} ({})", stderr.trim(), output.status),
        });
    }

    Ok(Captured {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn render_command(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Parse `pip list --format json` / `uv pip list --format json` output.
pub(crate) fn parse_pip_style_listing(raw: &str) -> Result<Vec<PackageObservation>> {
    #[derive(serde::Deserialize)]
    struct ListedPackage {
        name: String,
        version: String,
    }

    let listed: Vec<ListedPackage> = serde_json::from_str(raw.trim())
        .map_err(|e| LabenvError::BackendProbeFailure(format!("Unreadable package listing: {}", e)))?;

    Ok(listed
        .into_iter()
        .map(|p| PackageObservation::new(&p.name, p.version))
        .collect())
}
