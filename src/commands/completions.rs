//! Shell completions command

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use devkit_dispenser::Result;

use crate::cli::{Cli, CompletionsArgs};

/// Print completions for the requested shell to stdout
pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout().lock())
}

fn write_completions(shell: Shell, out: &mut impl Write) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut *out);
    out.flush()?;
    Ok(())
}
