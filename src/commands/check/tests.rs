use super::{EnvStatus, Probe, classify, exit_code_for_status_name};
use crate::config::EnvironmentRecord;
use crate::core::types::{PackageObservation, Tool};

fn record(tool: Tool, packages: &[(&str, &str)]) -> EnvironmentRecord {
    let mut record = EnvironmentRecord::new(tool, "3.12", "proj");
    record.packages = packages
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();
    record
}

fn probe(active: &[Tool]) -> Probe {
    Probe {
        backend_installed: true,
        active_tools: active.to_vec(),
        interpreter: Some("3.12.4".to_string()),
        packages: Some(Vec::new()),
        failure: None,
    }
}

fn observations(entries: &[(&str, &str)]) -> Vec<PackageObservation> {
    entries
        .iter()
        .map(|(n, v)| PackageObservation::new(n, *v))
        .collect()
}

#[test]
fn no_active_markers_is_inactive_with_empty_issues() {
    let mut p = probe(&[]);
    p.interpreter = None;
    p.packages = None;

    let result = classify(&record(Tool::Conda, &[]), &p);
    assert_eq!(result.status, EnvStatus::Inactive);
    assert!(result.issues.is_empty());
    assert_eq!(result.status.exit_code(), 1);
}

#[test]
fn wrong_tool_is_a_mismatch() {
    let mut p = probe(&[Tool::Conda]);
    p.interpreter = None;
    p.packages = None;

    let result = classify(&record(Tool::Uv, &[]), &p);
    assert_eq!(result.status, EnvStatus::ToolMismatch);
    assert_eq!(result.status.exit_code(), 2);
    assert!(result.issues[0].contains("uv"));
    assert!(result.issues[0].contains("conda"));
}

#[test]
fn two_simultaneous_markers_are_a_mismatch_against_the_record() {
    let mut p = probe(&[Tool::Pip, Tool::Conda]);
    p.interpreter = None;
    p.packages = None;

    let result = classify(&record(Tool::Conda, &[]), &p);
    assert_eq!(result.status, EnvStatus::ToolMismatch);
    assert!(result.issues[0].contains("pip + conda"));
}

#[test]
fn interpreter_drift_is_a_mismatch() {
    let mut p = probe(&[Tool::Uv]);
    p.interpreter = Some("3.11.9".to_string());

    let result = classify(&record(Tool::Uv, &[]), &p);
    assert_eq!(result.status, EnvStatus::ToolMismatch);
    assert!(result.issues[0].contains("3.11.9"));
}

#[test]
fn missing_packages_are_listed_by_bare_name() {
    let mut p = probe(&[Tool::Conda]);
    p.packages = Some(observations(&[("scipy", "1.11.0")]));

    let result = classify(
        &record(Tool::Conda, &[("scipy", "1.11.0"), ("pandas", "2.0.0")]),
        &p,
    );
    assert_eq!(result.status, EnvStatus::MissingDependencies);
    assert_eq!(result.issues, vec!["pandas".to_string()]);
    assert_eq!(result.status.exit_code(), 3);
}

#[test]
fn clean_environment_is_active_valid() {
    let mut p = probe(&[Tool::Uv]);
    p.packages = Some(observations(&[("numpy", "1.26.0")]));

    let result = classify(&record(Tool::Uv, &[("numpy", "1.26.0")]), &p);
    assert_eq!(result.status, EnvStatus::ActiveValid);
    assert!(result.issues.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(result.status.exit_code(), 0);
}

#[test]
fn drift_and_version_skew_are_warnings_not_issues() {
    let mut p = probe(&[Tool::Uv]);
    p.packages = Some(observations(&[
        ("numpy", "1.26.4"),
        ("requests", "2.32.0"),
    ]));

    let result = classify(&record(Tool::Uv, &[("numpy", "1.26.0")]), &p);
    assert_eq!(result.status, EnvStatus::ActiveValid);
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings.iter().any(|w| w.contains("numpy")));
    assert!(result.warnings.iter().any(|w| w.contains("requests")));
}

#[test]
fn probe_failure_is_error_with_a_single_cause() {
    let mut p = probe(&[Tool::Conda]);
    p.packages = None;
    p.failure = Some("System command 'conda list' failed: boom".to_string());

    let result = classify(&record(Tool::Conda, &[]), &p);
    assert_eq!(result.status, EnvStatus::Error);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.status.exit_code(), 4);
}

#[test]
fn tool_mismatch_wins_over_probe_failure() {
    // Fixed evaluation order: marker mismatch classifies before any
    // probe-level fault is considered.
    let mut p = probe(&[Tool::Pip]);
    p.failure = Some("unreachable".to_string());

    let result = classify(&record(Tool::Conda, &[]), &p);
    assert_eq!(result.status, EnvStatus::ToolMismatch);
}

#[test]
fn exit_codes_cover_all_five_states() {
    assert_eq!(EnvStatus::ActiveValid.exit_code(), 0);
    assert_eq!(EnvStatus::Inactive.exit_code(), 1);
    assert_eq!(EnvStatus::ToolMismatch.exit_code(), 2);
    assert_eq!(EnvStatus::MissingDependencies.exit_code(), 3);
    assert_eq!(EnvStatus::Error.exit_code(), 4);
}

#[test]
fn status_names_round_trip_to_exit_codes() {
    for status in [
        EnvStatus::ActiveValid,
        EnvStatus::Inactive,
        EnvStatus::ToolMismatch,
        EnvStatus::MissingDependencies,
        EnvStatus::Error,
    ] {
        assert_eq!(exit_code_for_status_name(status.as_str()), status.exit_code());
    }
}
