//! `labenv init` - create the project's environment record.
//!
//! Creation happens exactly once per project; syncing and checking never
//! touch the `environment` section this command writes.

use crate::config::ConfigStore;
use crate::core::types::Tool;
use crate::error::{LabenvError, Result};
use crate::project_identity;
use crate::ui;
use crate::utils::paths;

pub struct InitOptions {
    pub tool: Tool,
    pub python: String,
    pub name: String,
    pub force: bool,
}

pub fn run(options: InitOptions) -> Result<()> {
    validate_python_field(&options.python)?;
    validate_name_field(&options.name)?;

    let path = paths::record_file()?;
    let store = ConfigStore::create(
        &path,
        options.tool,
        &options.python,
        &options.name,
        options.force,
    )?;

    ui::success(&format!(
        "Created {} for {} ({} environment, python {})",
        store.path().display(),
        store.record().name,
        store.record().tool,
        store.record().python
    ));
    ui::info(&format!(
        "Activate the environment and run `{}` to record installed packages",
        project_identity::cli_with("sync")
    ));

    Ok(())
}

fn validate_python_field(python: &str) -> Result<()> {
    let numeric_components = !python.is_empty()
        && python
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if !numeric_components {
        return Err(LabenvError::Usage(format!(
            "Invalid python version '{}': expected a dotted version like 3.12",
            python
        )));
    }
    Ok(())
}

fn validate_name_field(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
    if !valid {
        return Err(LabenvError::Usage(format!(
            "Invalid environment name '{}': use letters, digits, '-' and '_'",
            name
        )));
    }
    Ok(())
}
