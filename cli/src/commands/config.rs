use anyhow::{Context, Result};
use colored::Colorize;
use gcp_infra::ProjectId;
use log::{error, info};
use prettytable::{cell, row};
use std::path::Path;
use structopt::StructOpt;

use crate::{
    config::{self, InfraConfig, StackConfig},
    printer::new_table,
    program::{DEFAULT_PROJECT, DEFAULT_REGION},
};

#[derive(Debug, StructOpt)]
pub enum ConfigArgs {
    #[structopt(name = "add")]
    /// Add a new stack, or update an existing one
    AddStack {
        #[structopt(long = "name", short = "n")]
        /// The name of the stack that will be created or updated
        name: String,

        #[structopt(long = "project", short = "p")]
        /// The GCP project the stack declares resources in
        project: Option<ProjectId>,

        #[structopt(long = "region", short = "r")]
        /// The region exported by the stack
        region: Option<String>,
    },

    #[structopt(name = "current")]
    /// Display the current stack
    CurrentStack,

    #[structopt(name = "delete")]
    /// Delete the specified stack(s) from the config file
    DeleteStack {
        /// The name(s) of the stack(s) which will be deleted
        names: Vec<String>,
    },

    #[structopt(name = "ls")]
    /// List the configured stacks
    ListStacks,

    #[structopt(name = "use")]
    /// Set the current stack
    UseStack {
        /// The name of the stack.
        name: String,
    },
}

pub fn run(
    args: &ConfigArgs,
    mut config: InfraConfig,
    config_path: impl AsRef<Path>,
) -> Result<InfraConfig> {
    match args {
        ConfigArgs::ListStacks if config.num_stacks() > 0 => {
            let mut stacks = config.get_all_stacks().clone();
            stacks.sort_unstable_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
            let mut table = new_table();
            table.set_titles(row![bFg => "Active", "Stack", "Project", "Region"]);
            for stack in stacks.iter() {
                let active = config
                    .get_current_stack()
                    .map_or(false, |current_stack| current_stack.name == stack.name);
                table.add_row(row![
                    if active { "    ->" } else { "" },
                    if active {
                        stack.name.bold().bright_white()
                    } else {
                        stack.name.normal()
                    },
                    match &stack.project {
                        Some(project) => project.normal(),
                        None => DEFAULT_PROJECT.dimmed(),
                    },
                    match &stack.region {
                        Some(region) => region.normal(),
                        None => DEFAULT_REGION.dimmed(),
                    }
                ]);
            }
            table.printstd();
        }
        ConfigArgs::ListStacks => {
            info!("No stacks configured.");
        }
        ConfigArgs::AddStack {
            name,
            project,
            region,
        } => {
            add_or_edit_stack(name, project, region, &mut config, config_path)?;
        }
        ConfigArgs::UseStack { name } => {
            if !config.set_current_stack(name) {
                error!(
                    "No such stack `{}` exists in `{}`.",
                    name,
                    config_path.as_ref().display()
                );
            } else {
                config::write_infra_config(config_path, &config)?;
                info!("Switched to stack `{}`.", name);
            }
        }
        ConfigArgs::CurrentStack => config.get_current_stack().map_or_else(
            || info!("There is no default stack in use."),
            |current_stack| println!("{}", current_stack.name),
        ),
        ConfigArgs::DeleteStack { names } => {
            for name in names {
                if config.delete_stack(name) {
                    config::write_infra_config(&config_path, &config)?;
                    info!(
                        "Deleted stack `{}` from `{}`.",
                        name,
                        config_path.as_ref().display()
                    );
                } else {
                    error!(
                        "No such stack `{}` exists in `{}`.",
                        name,
                        config_path.as_ref().display()
                    );
                }
            }
        }
    }
    Ok(config)
}

fn add_or_edit_stack(
    name: &str,
    project: &Option<ProjectId>,
    region: &Option<String>,
    config: &mut InfraConfig,
    config_path: impl AsRef<Path>,
) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow::anyhow!("Stack name cannot be empty."));
    }

    // Unset fields keep their previous value.
    let existing_stack = config.get_stack(name).cloned();
    let stack = StackConfig {
        name: name.to_owned(),
        project: project
            .as_ref()
            .map(ToString::to_string)
            .or_else(|| existing_stack.as_ref().and_then(|stack| stack.project.clone())),
        region: region
            .clone()
            .or_else(|| existing_stack.as_ref().and_then(|stack| stack.region.clone())),
    };

    let is_new_stack = !config.set_stack(stack);
    if is_new_stack && config.num_stacks() == 1 {
        info!("Default stack set to `{}`.", name);
        config.set_current_stack(name);
    }

    config::write_infra_config(&config_path, config).with_context(|| {
        format!(
            "Could not save stack `{}` to `{}`",
            name,
            config_path.as_ref().display()
        )
    })?;

    if is_new_stack {
        info!("New stack `{}` was created.", name);
    } else {
        info!("Stack `{}` was updated.", name);
    }
    Ok(())
}
