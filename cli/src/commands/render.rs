use anyhow::{Context, Result};
use gcp_infra::pulumi;
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

use crate::{
    program::{self, Settings, PROGRAM_NAME},
    utils::io::write_to_file_or_stdout,
};

#[derive(Debug, StructOpt)]
pub struct RenderArgs {
    #[structopt(short = "f", long = "file", parse(from_os_str))]
    /// Write the program to a file (typically `Pulumi.yaml`) instead of stdout
    file: Option<PathBuf>,
}

pub fn run(args: &RenderArgs, settings: &Settings) -> Result<()> {
    let deployment = program::declare(settings)?;
    let program = pulumi::render(&deployment.stack, PROGRAM_NAME)
        .with_context(|| format!("Could not render stack `{}`", settings.stack))?;

    write_to_file_or_stdout(args.file.as_deref(), &program)?;
    if let Some(file) = &args.file {
        info!(
            "Wrote {} resources for stack `{}` to `{}`.",
            deployment.stack.len(),
            settings.stack,
            file.display()
        );
    }
    Ok(())
}
