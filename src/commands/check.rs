//! `labenv check` - classify environment health.
//!
//! Two phases: one probing pass gathers everything the classifier needs,
//! then a pure classification walks a fixed order of conditions to a single
//! terminal status. Fix mode remediates and re-runs both phases instead of
//! assuming the installs took.
//!
//! Exit codes are a contract: ACTIVE_VALID 0, INACTIVE 1, TOOL_MISMATCH 2,
//! MISSING_DEPENDENCIES 3, ERROR 4.

use crate::backends::snapshot::EnvSnapshot;
use crate::backends::{Listing, backend_for};
use crate::config::{ConfigStore, EnvironmentRecord};
use crate::core::types::{PackageObservation, Tool};
use crate::error::{LabenvError, Result};
use crate::project_identity;
use crate::ui;
use crate::utils::machine_output::{self, EnvironmentInfo, MachineFormat, MachineReport};
use crate::utils::paths;
use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt;

pub struct CheckOptions {
    pub fix: bool,
    pub machine: Option<MachineFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStatus {
    ActiveValid,
    Inactive,
    ToolMismatch,
    MissingDependencies,
    Error,
}

impl EnvStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveValid => "ACTIVE_VALID",
            Self::Inactive => "INACTIVE",
            Self::ToolMismatch => "TOOL_MISMATCH",
            Self::MissingDependencies => "MISSING_DEPENDENCIES",
            Self::Error => "ERROR",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ActiveValid => 0,
            Self::Inactive => 1,
            Self::ToolMismatch => 2,
            Self::MissingDependencies => 3,
            Self::Error => 4,
        }
    }
}

impl fmt::Display for EnvStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exit code for a status carried by name (e.g. inside a `CannotFix`).
pub fn exit_code_for_status_name(name: &str) -> i32 {
    match name {
        "ACTIVE_VALID" => 0,
        "INACTIVE" => 1,
        "TOOL_MISMATCH" => 2,
        "MISSING_DEPENDENCIES" => 3,
        _ => 4,
    }
}

/// Outcome of one classification run. Never persisted.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub status: EnvStatus,
    /// Blocking problems. For MISSING_DEPENDENCIES these are bare package
    /// names, one per missing package.
    pub issues: Vec<String>,
    /// Non-blocking drift observations.
    pub warnings: Vec<String>,
}

/// Everything the classifier consumes, gathered in a single probing pass.
#[derive(Debug, Clone)]
pub struct Probe {
    pub backend_installed: bool,
    pub active_tools: Vec<Tool>,
    /// Observed interpreter version, when the recorded tool is cleanly active.
    pub interpreter: Option<String>,
    /// Live package listing, when the probe got that far.
    pub packages: Option<Vec<PackageObservation>>,
    /// Unexpected probe failure, attributed instead of hanging the run.
    pub failure: Option<String>,
}

pub fn gather_probe(record: &EnvironmentRecord, snapshot: &EnvSnapshot) -> Probe {
    let backend = backend_for(record.tool);
    let mut probe = Probe {
        backend_installed: backend.is_installed(),
        active_tools: snapshot.active_tools(),
        interpreter: None,
        packages: None,
        failure: None,
    };

    // Only a cleanly-active recorded tool is worth probing further; every
    // other marker combination classifies on its own.
    if probe.active_tools != [record.tool] {
        return probe;
    }

    if !probe.backend_installed {
        probe.failure = Some(format!(
            "a {} environment is active but no {} executable is on PATH",
            record.tool, record.tool
        ));
        return probe;
    }

    match backend.interpreter_version(snapshot) {
        Ok(version) => probe.interpreter = version,
        Err(e) => {
            probe.failure = Some(first_line(&e));
            return probe;
        }
    }

    match backend.list_packages(snapshot) {
        Ok(Listing::Packages(observations)) => probe.packages = Some(observations),
        Ok(Listing::Inactive) => {}
        Err(e) => probe.failure = Some(first_line(&e)),
    }

    probe
}

/// Fixed-order classification; the first matching condition wins.
pub fn classify(record: &EnvironmentRecord, probe: &Probe) -> ValidationResult {
    let mut result = ValidationResult {
        status: EnvStatus::ActiveValid,
        issues: Vec::new(),
        warnings: Vec::new(),
    };

    if probe.active_tools.is_empty() {
        result.status = EnvStatus::Inactive;
        return result;
    }

    if probe.active_tools != [record.tool] {
        result.status = EnvStatus::ToolMismatch;
        let found = probe
            .active_tools
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" + ");
        result.issues.push(format!(
            "recorded tool is {} but the active environment belongs to {}",
            record.tool, found
        ));
        return result;
    }

    if let Some(cause) = &probe.failure {
        result.status = EnvStatus::Error;
        result.issues.push(cause.clone());
        return result;
    }

    if let Some(observed) = &probe.interpreter
        && !record.python_matches(observed)
    {
        result.status = EnvStatus::ToolMismatch;
        result.issues.push(format!(
            "recorded python {} but the environment runs {}",
            record.python, observed
        ));
        return result;
    }

    let Some(observations) = &probe.packages else {
        result.status = EnvStatus::Error;
        result
            .issues
            .push("backend probe produced no package listing".to_string());
        return result;
    };

    let observed: BTreeMap<&str, &str> = observations
        .iter()
        .map(|obs| (obs.name.as_str(), obs.version.as_str()))
        .collect();

    for (name, version) in &record.packages {
        match observed.get(name.as_str()) {
            None => result.issues.push(name.clone()),
            Some(live) if *live != version => result.warnings.push(format!(
                "{} recorded as {} but {} is installed",
                name, version, live
            )),
            Some(_) => {}
        }
    }

    for obs in observations {
        if !record.packages.contains_key(&obs.name) {
            result.warnings.push(format!(
                "{} {} is installed but not recorded",
                obs.name, obs.version
            ));
        }
    }

    if !result.issues.is_empty() {
        result.status = EnvStatus::MissingDependencies;
    }

    result
}

pub fn run(options: CheckOptions) -> Result<i32> {
    let store = ConfigStore::load(paths::record_file()?)?;
    let record = store.record().clone();
    let snapshot = EnvSnapshot::capture();

    let probe = gather_probe(&record, &snapshot);
    let result = classify(&record, &probe);

    if !options.fix {
        report(&record, &probe, &result, options.machine)?;
        return Ok(result.status.exit_code());
    }

    // Fix mode only repairs missing packages; remediating an inactive or
    // mismatched shell could target the wrong environment entirely.
    if result.status != EnvStatus::MissingDependencies {
        return Err(LabenvError::CannotFix {
            status: result.status.to_string(),
        });
    }

    if options.machine.is_none() {
        ui::header("Before fix");
        render_human(&record, &probe, &result);
    }

    let backend = backend_for(record.tool);
    for name in &result.issues {
        if ui::is_interrupted() {
            return Err(LabenvError::Interrupted);
        }
        if options.machine.is_none() {
            ui::info(&format!("Installing {}", name));
        }
        if let Err(e) = backend.install(&snapshot, name) {
            ui::error(&format!("Stopping at first failure: {}", first_line(&e)));
            break;
        }
    }

    let probe_after = gather_probe(&record, &snapshot);
    let result_after = classify(&record, &probe_after);
    if options.machine.is_none() {
        ui::header("After fix");
    }
    report(&record, &probe_after, &result_after, options.machine)?;
    Ok(result_after.status.exit_code())
}

fn report(
    record: &EnvironmentRecord,
    probe: &Probe,
    result: &ValidationResult,
    machine: Option<MachineFormat>,
) -> Result<()> {
    match machine {
        Some(format) => {
            let mut report = MachineReport::new(
                result.status.as_str(),
                Some(EnvironmentInfo::from_record(record)),
            );
            report.issues = result.issues.clone();
            report.warnings = result.warnings.clone();
            machine_output::emit(&report, format)
        }
        None => {
            render_human(record, probe, result);
            Ok(())
        }
    }
}

fn render_human(record: &EnvironmentRecord, probe: &Probe, result: &ValidationResult) {
    ui::keyval(
        "Environment",
        &format!("{} ({}, python {})", record.name, record.tool, record.python),
    );

    if probe.backend_installed {
        ui::success(&format!("{} is installed", record.tool));
    } else {
        ui::warning(&format!("{} is not on PATH", record.tool));
    }

    match probe.active_tools.as_slice() {
        [] => ui::warning(&format!(
            "no environment is active; activate it and re-run `{}`",
            project_identity::cli_with("check")
        )),
        tools => {
            for tool in tools {
                ui::info(&format!("active environment marker: {}", tool));
            }
        }
    }

    if let Some(version) = &probe.interpreter {
        if record.python_matches(version) {
            ui::success(&format!("python {} satisfies {}", version, record.python));
        }
    }

    match result.status {
        EnvStatus::MissingDependencies => {
            for name in &result.issues {
                ui::error(&format!("missing package: {}", name));
            }
        }
        _ => {
            for issue in &result.issues {
                ui::error(issue);
            }
        }
    }

    for warning in &result.warnings {
        ui::warning(warning);
    }

    let status = match result.status {
        EnvStatus::ActiveValid => result.status.as_str().green().bold(),
        EnvStatus::Inactive => result.status.as_str().yellow().bold(),
        _ => result.status.as_str().red().bold(),
    };
    println!("Status: {}", status);
}

fn first_line(err: &LabenvError) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests;
