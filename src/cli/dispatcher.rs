//! Command dispatcher.
//!
//! Validates the machine-output contract, routes commands to their handlers
//! and turns results into process exit codes. Failures never escape as
//! panics: machine mode gets the fixed-shape failure report, human mode the
//! error text with its remedy hint.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::core::types::Tool;
use crate::error::{LabenvError, Result};
use crate::ui;
use crate::utils::machine_output::{self, MachineReport};
use std::str::FromStr;

pub fn dispatch(args: &Cli) -> i32 {
    if let Err(e) = validate_output_contract(args) {
        ui::error(&e.to_string());
        return 2;
    }

    match route(args) {
        Ok(code) => code,
        Err(e) => {
            match args.global.machine {
                Some(format) => {
                    if machine_output::emit(&MachineReport::from_error(&e, None), format).is_err() {
                        ui::error(&e.to_string());
                    }
                }
                None => ui::error(&e.to_string()),
            }
            failure_exit_code(args, &e)
        }
    }
}

fn route(args: &Cli) -> Result<i32> {
    match &args.command {
        Command::Init {
            tool,
            python,
            name,
            force,
        } => {
            let tool = Tool::from_str(tool).map_err(LabenvError::Usage)?;
            commands::init::run(commands::init::InitOptions {
                tool,
                python: python.clone(),
                name: name.clone(),
                force: *force,
            })?;
            Ok(0)
        }

        Command::Sync { doc, note, dry_run } => {
            commands::sync::run(commands::sync::SyncOptions {
                doc_package: doc.clone(),
                note: note.clone(),
                dry_run: *dry_run,
                assume_yes: args.global.yes,
                machine: args.global.machine,
            })?;
            Ok(0)
        }

        Command::Check { fix } => commands::check::run(commands::check::CheckOptions {
            fix: *fix,
            machine: args.global.machine,
        }),

        Command::Completions { shell } => {
            commands::completions::run(*shell)?;
            Ok(0)
        }
    }
}

/// The fixed-shape report exists for sync and check; reject the flag where
/// no report is defined rather than inventing one ad hoc.
fn validate_output_contract(args: &Cli) -> Result<()> {
    if args.global.machine.is_none() {
        return Ok(());
    }
    match &args.command {
        Command::Check { .. } | Command::Sync { doc: None, .. } => Ok(()),
        Command::Sync { doc: Some(_), .. } => Err(LabenvError::Usage(
            "--machine is not available for documentation mode".to_string(),
        )),
        _ => Err(LabenvError::Usage(
            "--machine is only available for `sync` and `check`".to_string(),
        )),
    }
}

fn failure_exit_code(args: &Cli, err: &LabenvError) -> i32 {
    match (&args.command, err) {
        // A blocked fix still reports the health status it found.
        (Command::Check { .. }, LabenvError::CannotFix { status }) => {
            commands::check::exit_code_for_status_name(status)
        }
        // Any other check failure means validation could not complete.
        (Command::Check { .. }, _) => 4,
        _ => 1,
    }
}
