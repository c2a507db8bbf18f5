use anyhow::{anyhow, Result};
use gcp_infra::Preview;
use log::info;
use std::io;
use structopt::StructOpt;

use crate::{
    printer::{print_resources_as_json, properties_table, OutputFormat, Printer},
    program::{self, Settings},
};

#[derive(Debug, StructOpt)]
pub struct PreviewArgs {
    #[structopt(long = "resource")]
    /// Show every property of a single resource instead of the summary
    resource: Option<String>,

    #[structopt(long = "show-secrets")]
    /// Show secret values in clear (by default they are redacted)
    show_secrets: bool,
}

pub fn run(args: &PreviewArgs, settings: &Settings, printer: &Printer) -> Result<()> {
    let deployment = program::declare(settings)?;
    let preview = Preview::of(&deployment.stack, args.show_secrets);
    info!(
        "Stack `{}` declares {} resources in project `{}`.",
        preview.stack,
        preview.resources.len(),
        settings.project
    );

    if let Some(key) = &args.resource {
        let resource = preview
            .resource(key)
            .ok_or_else(|| anyhow!("Stack `{}` has no resource `{}`", preview.stack, key))?;
        return match printer.format() {
            OutputFormat::Table => {
                properties_table(resource).printstd();
                Ok(())
            }
            OutputFormat::Json => print_resources_as_json([resource], io::stdout().lock()),
        };
    }

    match printer.format() {
        OutputFormat::Table => {
            printer.print_resources(&preview.resources)?;
            println!();
            printer.print_resources(&preview.outputs)
        }
        OutputFormat::Json => print_resources_as_json([&preview], io::stdout().lock()),
    }
}
