use crate::utils::machine_output::MachineFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    name = "labenv",
    about = "Environment-state manager for research Python projects",
    long_about = "Detects whether uv, conda or pip owns the project environment, records what \
                  is installed in a single human-editable file, and checks the environment's \
                  health with scriptable exit codes.",
    version,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Skip interactive prompts
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    /// Emit a machine-readable report instead of human text
    #[arg(long, global = true, value_enum, value_name = "FORMAT")]
    pub machine: Option<MachineFormat>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the project's environment record
    Init {
        /// Package manager that owns the environment (uv, conda or pip)
        #[arg(long)]
        tool: String,

        /// Required interpreter version, e.g. 3.12
        #[arg(long)]
        python: String,

        /// Environment name
        #[arg(long)]
        name: String,

        /// Overwrite an existing record
        #[arg(short = 'f', long)]
        force: bool,
    },

    /// Reconcile installed packages into the record
    Sync {
        /// Attach a usage note to one package instead of syncing
        #[arg(long, value_name = "PACKAGE")]
        doc: Option<String>,

        /// Note text for --doc (prompted interactively when omitted)
        #[arg(long, requires = "doc", value_name = "TEXT")]
        note: Option<String>,

        /// Preview changes without writing the record
        #[arg(long)]
        dry_run: bool,
    },

    /// Check environment health; the exit code encodes the result
    Check {
        /// Install missing packages through the active backend, one at a time
        #[arg(long)]
        fix: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
