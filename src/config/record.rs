use crate::core::types::Tool;
use std::collections::BTreeMap;

/// The persisted environment record, one per project.
///
/// `tool`, `python` and `name` are set at creation and only change on a full
/// re-initialization. `packages` is owned by sync; `notes` has its own
/// lifecycle - a note may outlive its package and is never dropped by a
/// package sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRecord {
    pub tool: Tool,
    /// Required interpreter version, usually major.minor (e.g. "3.12").
    pub python: String,
    /// Environment name, unique within a project, immutable after creation.
    pub name: String,
    /// Normalized package name -> version string, verbatim from the backend.
    pub packages: BTreeMap<String, String>,
    /// Normalized package name -> free-text usage note.
    pub notes: BTreeMap<String, String>,
}

impl EnvironmentRecord {
    pub fn new(tool: Tool, python: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tool,
            python: python.into(),
            name: name.into(),
            packages: BTreeMap::new(),
            notes: BTreeMap::new(),
        }
    }

    /// Whether an observed interpreter version satisfies the recorded one.
    ///
    /// The record usually pins major.minor; the observation carries the full
    /// version. Match component-wise on the recorded prefix: "3.12" accepts
    /// 3.12.4, "3.12.1" does not accept 3.12.4.
    pub fn python_matches(&self, observed: &str) -> bool {
        let want: Vec<&str> = self.python.split('.').collect();
        let have: Vec<&str> = observed.split('.').collect();
        want.len() <= have.len() && want.iter().zip(have.iter()).all(|(w, h)| w == h)
    }
}
