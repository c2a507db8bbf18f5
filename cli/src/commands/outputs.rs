use anyhow::{anyhow, Result};
use gcp_infra::Preview;
use log::warn;
use std::io;
use structopt::StructOpt;

use crate::{
    printer::{print_resources_as_json, OutputFormat, Printer},
    program::{self, Settings},
};

#[derive(Debug, StructOpt)]
pub struct OutputsArgs {
    #[structopt(name = "name")]
    /// Print only this output
    name: Option<String>,

    #[structopt(long = "show-secrets")]
    /// Show secret values in clear (by default they are redacted)
    show_secrets: bool,
}

pub fn run(args: &OutputsArgs, settings: &Settings, printer: &Printer) -> Result<()> {
    let deployment = program::declare(settings)?;
    let preview = Preview::of(&deployment.stack, args.show_secrets);

    let Some(name) = &args.name else {
        return printer.print_resources(&preview.outputs);
    };

    let output = preview
        .output(name)
        .ok_or_else(|| anyhow!("Stack `{}` has no output `{}`", preview.stack, name))?;
    if !output.value.known {
        warn!("Output `{}` is only known once the stack is deployed.", name);
    }
    match printer.format() {
        OutputFormat::Table => {
            println!("{}", output.value.display());
            Ok(())
        }
        OutputFormat::Json => print_resources_as_json([output], io::stdout().lock()),
    }
}
