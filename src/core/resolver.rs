//! Reconciliation planner.
//!
//! Pure diff between the recorded package map and a live observation set.
//! Applying a [`SyncPlan`] and re-resolving against the same observations
//! always yields an empty plan.

use crate::core::identity::normalize_name;
use crate::core::types::PackageObservation;
use std::collections::BTreeMap;

/// Planned changes to the recorded package map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Observed but not recorded: name -> observed version.
    pub added: BTreeMap<String, String>,
    /// Recorded but no longer observed.
    pub removed: Vec<String>,
    /// Recorded and observed with differing version strings: name -> observed version.
    pub changed: BTreeMap<String, String>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Apply the plan to a package map, producing the post-sync map.
    pub fn apply(&self, recorded: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut next = recorded.clone();
        for name in &self.removed {
            next.remove(name);
        }
        for (name, version) in &self.added {
            next.insert(name.clone(), version.clone());
        }
        for (name, version) in &self.changed {
            next.insert(name.clone(), version.clone());
        }
        next
    }
}

/// Diff live observations against the recorded package map.
///
/// Observation names arrive normalized from the adapters; recorded keys are
/// normalized defensively so a hand-edited record still matches. Version
/// strings are compared verbatim.
pub fn resolve(
    recorded: &BTreeMap<String, String>,
    observations: &[PackageObservation],
) -> SyncPlan {
    let mut observed: BTreeMap<String, String> = BTreeMap::new();
    for obs in observations {
        observed.insert(normalize_name(&obs.name), obs.version.clone());
    }

    let mut plan = SyncPlan::default();

    for (name, version) in &observed {
        match recorded.get(name) {
            None => {
                plan.added.insert(name.clone(), version.clone());
            }
            Some(recorded_version) if recorded_version != version => {
                plan.changed.insert(name.clone(), version.clone());
            }
            Some(_) => {}
        }
    }

    for name in recorded.keys() {
        if !observed.contains_key(name) {
            plan.removed.push(name.clone());
        }
    }

    plan
}

#[cfg(test)]
mod tests;
