#![deny(clippy::all)]

mod args;
mod commands;
mod config;
mod printer;
mod program;
mod utils;

use anyhow::{anyhow, Context, Result};
use gcp_infra::ProjectId;
use log::{debug, error, warn};
use std::{fs, io, path::PathBuf, process};
use structopt::{clap::Shell as ClapShell, StructOpt};

use crate::{
    args::{Args, Command, Shell},
    commands::{config as config_command, outputs, preview, render},
    config::InfraConfig,
    printer::Printer,
    program::{Settings, DEFAULT_PROJECT, DEFAULT_REGION},
    utils::io::init_env_logger,
};

const DEFAULT_STACK_NAME: &str = "dev";

fn run(args: Args) -> Result<()> {
    let config_path = find_configuration(&args)?;
    let cli_config = config::read_infra_config(&config_path)?;
    let printer = Printer::new(args.output);

    match &args.command {
        Command::Config { config_args } => {
            config_command::run(config_args, cli_config, config_path).map(|_| ())
        }
        Command::Completion { shell } => {
            let mut app = Args::clap();
            let clap_shell = match shell {
                Shell::Zsh => ClapShell::Zsh,
                Shell::Bash => ClapShell::Bash,
            };
            app.gen_completions_to("infra", clap_shell, &mut io::stdout());
            Ok(())
        }
        Command::Preview { preview_args } => preview::run(
            preview_args,
            &settings_from_args(&args, &cli_config)?,
            &printer,
        ),
        Command::Render { render_args } => {
            render::run(render_args, &settings_from_args(&args, &cli_config)?)
        }
        Command::Outputs { outputs_args } => outputs::run(
            outputs_args,
            &settings_from_args(&args, &cli_config)?,
            &printer,
        ),
    }
}

/// Flags win over the selected stack, which wins over the built-in defaults.
fn settings_from_args(args: &Args, config: &InfraConfig) -> Result<Settings> {
    let current_stack = if let Some(stack_name) = args.stack.as_ref() {
        let stack = config.get_stack(stack_name);
        if stack.is_none() {
            return Err(anyhow!("Unknown stack `{}`.", stack_name));
        };
        stack
    } else {
        config.get_current_stack()
    };

    let project = match (&args.project, current_stack.and_then(|stack| stack.project.as_ref())) {
        (Some(project), _) => project.clone(),
        (None, Some(project)) => project
            .parse::<ProjectId>()
            .with_context(|| format!("Invalid project in stack configuration: `{project}`"))?,
        (None, None) => DEFAULT_PROJECT.parse::<ProjectId>()?,
    };

    let region = args
        .region
        .clone()
        .or_else(|| current_stack.and_then(|stack| stack.region.clone()))
        .unwrap_or_else(|| DEFAULT_REGION.to_owned());

    let settings = Settings {
        stack: current_stack
            .map(|stack| stack.name.clone())
            .unwrap_or_else(|| DEFAULT_STACK_NAME.to_owned()),
        project,
        region,
    };
    debug!("Using settings {settings:?}");
    Ok(settings)
}

fn find_configuration(args: &Args) -> Result<PathBuf> {
    let config_path = if let Some(config_path) = args.config.clone() {
        if !config_path.exists() {
            warn!(
                "Configuration file `{}` doesn't exist.",
                config_path.display()
            );
        }
        config_path
    } else {
        let mut config_path =
            dirs::config_dir().context("Could not get path to the user's config directory")?;
        config_path.push("gcp-infra");
        fs::create_dir_all(&config_path).with_context(|| {
            format!(
                "Could not create config directory {}",
                config_path.display()
            )
        })?;
        config_path.push("stacks.json");
        config_path
    };
    Ok(config_path)
}

fn main() {
    let args = Args::from_args();
    init_env_logger(args.verbose);

    if let Err(error) = run(args) {
        error!("An error occurred:");
        for cause in error.chain() {
            error!(" |- {cause}");
        }

        #[cfg(feature = "backtrace")]
        {
            error!("{}", error.backtrace());
        }

        process::exit(1);
    }
}
