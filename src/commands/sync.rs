//! `labenv sync` - reconcile the live environment into the record.
//!
//! Automatic mode diffs the active backend's package list against the
//! record and applies additions, removals and version changes. Documentation
//! mode (`--doc`) touches only the notes section. Either way the record's
//! `environment` section and every note it already holds stay intact.

use crate::backends::snapshot::EnvSnapshot;
use crate::backends::{Listing, backend_for};
use crate::config::ConfigStore;
use crate::core::identity::normalize_name;
use crate::core::resolver::{self, SyncPlan};
use crate::core::types::{PackageObservation, Tool};
use crate::error::{LabenvError, Result};
use crate::project_identity;
use crate::ui;
use crate::utils::machine_output::{self, EnvironmentInfo, MachineFormat, MachineReport, PackagePair};
use crate::utils::paths;
use colored::Colorize;
use std::collections::BTreeMap;

pub struct SyncOptions {
    /// Documentation mode: attach a note to this package instead of syncing.
    pub doc_package: Option<String>,
    pub note: Option<String>,
    pub dry_run: bool,
    pub assume_yes: bool,
    pub machine: Option<MachineFormat>,
}

pub fn run(options: SyncOptions) -> Result<()> {
    let path = paths::record_file()?;
    let mut store = ConfigStore::load(&path)?;
    let snapshot = EnvSnapshot::capture();

    match options.doc_package.clone() {
        Some(package) => document_package(&mut store, &snapshot, &package, &options),
        None => reconcile(&mut store, &snapshot, &options),
    }
}

/// Automatic mode. Refuses to run against an inactive backend: an accidental
/// sync from a bare shell must not empty the record.
fn reconcile(store: &mut ConfigStore, snapshot: &EnvSnapshot, options: &SyncOptions) -> Result<()> {
    let tool = store.record().tool;
    let backend = backend_for(tool);

    let observations = match backend.list_packages(snapshot)? {
        Listing::Inactive => {
            return Err(LabenvError::EnvironmentInactive {
                tool: tool.to_string(),
            });
        }
        Listing::Packages(observations) => observations,
    };

    if ui::is_verbose() {
        ui::info(&format!(
            "{} reported {} installed package(s)",
            tool,
            observations.len()
        ));
    }

    let before = store.record().packages.clone();
    let plan = resolver::resolve(&before, &observations);

    if options.machine.is_none() {
        display_plan(&before, &plan);
    }

    if options.dry_run {
        if options.machine.is_none() {
            ui::info("Dry run: record not written");
        }
    } else if plan.is_empty() {
        if options.machine.is_none() {
            ui::success("Record already matches the environment");
        }
    } else {
        store.set_packages(plan.apply(&before));
        store.save()?;
        if options.machine.is_none() {
            ui::success(&format!(
                "Recorded {} package(s) in {}",
                store.record().packages.len(),
                store.path().display()
            ));
        }
    }

    if let Some(format) = options.machine {
        let mut report = MachineReport::new(
            "ACTIVE_VALID",
            Some(EnvironmentInfo::from_record(store.record())),
        );
        report.new_packages = Some(
            plan.added
                .iter()
                .map(|(name, version)| PackagePair {
                    name: name.clone(),
                    version: version.clone(),
                })
                .collect(),
        );
        machine_output::emit(&report, format)?;
    }

    Ok(())
}

/// Documentation mode: write one usage note, never the package map.
fn document_package(
    store: &mut ConfigStore,
    snapshot: &EnvSnapshot,
    package: &str,
    options: &SyncOptions,
) -> Result<()> {
    let live = live_observations(store.record().tool, snapshot)?;
    let key = doc_target(&store.record().packages, &live, package)?;

    let note = match &options.note {
        Some(note) => note.clone(),
        None if ui::stdin_is_interactive() && !options.assume_yes => {
            ui::prompt_line(&format!("Usage note for {}", key)).ok_or_else(|| {
                LabenvError::Usage("No note provided; nothing recorded".to_string())
            })?
        }
        None => {
            return Err(LabenvError::Usage(format!(
                "--note is required without a terminal; try `{}`",
                project_identity::cli_with(&format!("sync --doc {} --note \"...\"", key))
            )));
        }
    };

    store.set_note(&key, &note);
    store.save()?;

    ui::success(&format!("Noted {}: {}", key, note));
    Ok(())
}

/// Resolve a documentation target against the record and the live listing.
fn doc_target(
    recorded: &BTreeMap<String, String>,
    live: &[PackageObservation],
    raw: &str,
) -> Result<String> {
    let key = normalize_name(raw);
    if key.is_empty() {
        return Err(LabenvError::Usage("Package name cannot be empty".to_string()));
    }
    let known = recorded.contains_key(&key) || live.iter().any(|obs| obs.name == key);
    if known {
        Ok(key)
    } else {
        Err(LabenvError::PackageNotFound { name: key })
    }
}

/// Live package list for doc-mode lookup; an inactive backend is simply an
/// empty live set here, not an error.
fn live_observations(tool: Tool, snapshot: &EnvSnapshot) -> Result<Vec<PackageObservation>> {
    let backend = backend_for(tool);
    if !backend.is_active(snapshot) {
        return Ok(Vec::new());
    }
    match backend.list_packages(snapshot)? {
        Listing::Inactive => Ok(Vec::new()),
        Listing::Packages(observations) => Ok(observations),
    }
}

/// Git-style preview of the planned record changes.
fn display_plan(before: &BTreeMap<String, String>, plan: &SyncPlan) {
    if plan.is_empty() {
        println!("{}", "No changes".bright_black());
        return;
    }

    println!("{}", "diff --record".bright_black());
    println!("{}", "--- recorded".red());
    println!("{}", "+++ installed".green());
    println!();

    if !plan.added.is_empty() {
        println!(
            "{}",
            format!("@@ Add {} package(s) @@", plan.added.len()).cyan()
        );
        for (name, version) in &plan.added {
            println!("{}    {} {}", "+".green().bold(), name.green(), version);
        }
        println!();
    }

    if !plan.changed.is_empty() {
        println!(
            "{}",
            format!("@@ Update {} version(s) @@", plan.changed.len()).cyan()
        );
        for (name, version) in &plan.changed {
            let old = before.get(name).map(String::as_str).unwrap_or("?");
            println!(
                "{}    {} {} -> {}",
                "~".yellow().bold(),
                name.yellow(),
                old,
                version
            );
        }
        println!();
    }

    if !plan.removed.is_empty() {
        println!(
            "{}",
            format!("@@ Remove {} package(s) @@", plan.removed.len()).cyan()
        );
        for name in &plan.removed {
            println!("{}    {}", "-".red().bold(), name.red());
        }
        println!();
    }

    println!(
        "{}",
        format!(
            "Summary: {} added, {} removed, {} changed",
            plan.added.len(),
            plan.removed.len(),
            plan.changed.len()
        )
        .bright_black()
    );
}
