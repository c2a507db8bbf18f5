use crate::{
    commands::{
        config::ConfigArgs, outputs::OutputsArgs, preview::PreviewArgs, render::RenderArgs,
    },
    printer::OutputFormat,
};
use anyhow::{anyhow, Error, Result};
use gcp_infra::ProjectId;
use std::{path::PathBuf, str::FromStr};
use structopt::StructOpt;

/// infra declares the GCP resources the tower defence game is deployed with.
#[derive(Debug, StructOpt)]
#[structopt(
    global_settings = &[
        structopt::clap::AppSettings::ColoredHelp,
        structopt::clap::AppSettings::InferSubcommands,
    ]
)]
pub struct Args {
    #[structopt(long = "config-file", parse(from_os_str))]
    /// Path to the stacks file. Typically defaults to ~/.config/gcp-infra/stacks.json on Linux.
    pub config: Option<PathBuf>,

    #[structopt(short = "s", long = "stack")]
    /// Specify what stack to use. Overrides the current stack, if any.
    pub stack: Option<String>,

    #[structopt(short = "v", long = "verbose")]
    /// Enable more verbose logging.
    pub verbose: bool,

    #[structopt(long = "project")]
    /// Specify what GCP project to declare resources in. Overrides the one
    /// from the stack, if any.
    pub project: Option<ProjectId>,

    #[structopt(long = "region")]
    /// Specify what region to export. Overrides the one from the stack, if any.
    pub region: Option<String>,

    #[structopt(short = "o", long = "output", default_value = "table")]
    /// Output format. One of: json, table
    pub output: OutputFormat,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(name = "completion")]
    /// Output shell completion code for the specified shell (bash or zsh)
    Completion { shell: Shell },

    #[structopt(name = "config")]
    /// Manage named stacks and their project and region
    Config {
        #[structopt(subcommand)]
        config_args: ConfigArgs,
    },

    #[structopt(name = "preview")]
    /// Show the resources and outputs the stack declares
    Preview {
        #[structopt(flatten)]
        preview_args: PreviewArgs,
    },

    #[structopt(name = "render")]
    /// Render the stack as a Pulumi YAML program
    Render {
        #[structopt(flatten)]
        render_args: RenderArgs,
    },

    #[structopt(name = "outputs")]
    /// Show the values the stack exports
    Outputs {
        #[structopt(flatten)]
        outputs_args: OutputsArgs,
    },
}

#[derive(Debug)]
pub enum Shell {
    Bash,
    Zsh,
}

impl FromStr for Shell {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        match string {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            _ => Err(anyhow!("unknown shell: '{}'", string)),
        }
    }
}
