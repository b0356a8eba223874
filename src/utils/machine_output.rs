//! Machine-readable reports.
//!
//! One fixed-shape document for every entry point: `status`, `environment`,
//! `issues`, `warnings`, plus `new_packages` on sync reports. Failures are
//! reported through the same shape (error kind as `status`) so scripted
//! callers never have to scrape human text.

use crate::config::EnvironmentRecord;
use crate::error::{LabenvError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MachineFormat {
    Json,
    Yaml,
}

#[derive(Debug, Serialize)]
pub struct MachineReport {
    pub status: String,
    pub environment: Option<EnvironmentInfo>,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_packages: Option<Vec<PackagePair>>,
}

#[derive(Debug, Serialize)]
pub struct EnvironmentInfo {
    pub tool: String,
    pub interpreter_version: String,
    pub environment_name: String,
}

#[derive(Debug, Serialize)]
pub struct PackagePair {
    pub name: String,
    pub version: String,
}

impl EnvironmentInfo {
    pub fn from_record(record: &EnvironmentRecord) -> Self {
        Self {
            tool: record.tool.to_string(),
            interpreter_version: record.python.clone(),
            environment_name: record.name.clone(),
        }
    }
}

impl MachineReport {
    pub fn new(status: impl Into<String>, environment: Option<EnvironmentInfo>) -> Self {
        Self {
            status: status.into(),
            environment,
            issues: Vec::new(),
            warnings: Vec::new(),
            new_packages: None,
        }
    }

    /// Failure report: error kind as `status`, first message line as issue.
    pub fn from_error(err: &LabenvError, environment: Option<EnvironmentInfo>) -> Self {
        let mut report = Self::new(err.kind(), environment);
        if let Some(line) = err.to_string().lines().next() {
            report.issues.push(line.to_string());
        }
        report
    }

    pub fn render(&self, format: MachineFormat) -> Result<String> {
        match format {
            MachineFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            MachineFormat::Yaml => serde_yml::to_string(self)
                .map_err(|e| LabenvError::Other(format!("YAML serialization: {}", e))),
        }
    }
}

pub fn emit(report: &MachineReport, format: MachineFormat) -> Result<()> {
    println!("{}", report.render(format)?);
    Ok(())
}

#[cfg(test)]
mod tests;
