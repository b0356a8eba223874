//! Package name identity.
//!
//! uv, conda and pip disagree on how a package name is spelled: pip reports
//! `ruamel.yaml`, conda ships it as `ruamel_yaml`, and project files often
//! write `ruamel-yaml`. All of them are the same logical package. Every name
//! crossing a backend boundary is therefore normalized with the same rule:
//! lower-case, with runs of `-`, `_` and `.` collapsed to a single `-`.

use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("Invalid regex pattern"));

/// Normalize a package name to its canonical identity.
pub fn normalize_name(name: &str) -> String {
    SEPARATOR_RUN
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// Whether two spellings denote the same logical package.
pub fn same_package(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

#[cfg(test)]
mod tests;
