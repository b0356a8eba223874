use super::{EnvironmentInfo, MachineFormat, MachineReport, PackagePair};
use crate::config::EnvironmentRecord;
use crate::core::types::Tool;
use crate::error::LabenvError;
use serde_json::Value;

fn env_info() -> EnvironmentInfo {
    EnvironmentInfo::from_record(&EnvironmentRecord::new(Tool::Uv, "3.12", "glacier"))
}

#[test]
fn json_report_has_the_fixed_shape() {
    let mut report = MachineReport::new("MISSING_DEPENDENCIES", Some(env_info()));
    report.issues.push("pandas".to_string());
    report.warnings.push("numpy 1.24.0 -> 1.26.0".to_string());

    let value: Value =
        serde_json::from_str(&report.render(MachineFormat::Json).expect("render")).expect("json");

    assert_eq!(value["status"], "MISSING_DEPENDENCIES");
    assert_eq!(value["environment"]["tool"], "uv");
    assert_eq!(value["environment"]["interpreter_version"], "3.12");
    assert_eq!(value["environment"]["environment_name"], "glacier");
    assert_eq!(value["issues"][0], "pandas");
    assert_eq!(value["warnings"].as_array().map(Vec::len), Some(1));
    // Validation reports carry no sync-only field.
    assert!(value.get("new_packages").is_none());
}

#[test]
fn sync_report_lists_new_packages() {
    let mut report = MachineReport::new("ACTIVE_VALID", Some(env_info()));
    report.new_packages = Some(vec![PackagePair {
        name: "pandas".to_string(),
        version: "2.0.0".to_string(),
    }]);

    let value: Value =
        serde_json::from_str(&report.render(MachineFormat::Json).expect("render")).expect("json");
    assert_eq!(value["new_packages"][0]["name"], "pandas");
    assert_eq!(value["new_packages"][0]["version"], "2.0.0");
}

#[test]
fn failure_report_uses_error_kind_as_status() {
    let err = LabenvError::EnvironmentInactive {
        tool: "conda".to_string(),
    };
    let report = MachineReport::from_error(&err, None);

    let value: Value =
        serde_json::from_str(&report.render(MachineFormat::Json).expect("render")).expect("json");
    assert_eq!(value["status"], "EnvironmentInactive");
    assert!(value["environment"].is_null());
    assert!(
        value["issues"][0]
            .as_str()
            .expect("issue")
            .contains("conda")
    );
}

#[test]
fn yaml_rendering_round_trips_status() {
    let report = MachineReport::new("INACTIVE", None);
    let yaml = report.render(MachineFormat::Yaml).expect("render");
    assert!(yaml.contains("status: INACTIVE"));
}
