use crate::cli::args::Cli;
use crate::error::Result;
use crate::project_identity;
use clap::CommandFactory;
use clap_complete::Shell;

pub fn run(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(
        shell,
        &mut cmd,
        project_identity::BINARY_NAME,
        &mut std::io::stdout(),
    );
    Ok(())
}
