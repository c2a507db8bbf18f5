use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Named stack settings, one per target environment.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct InfraConfig {
    current_stack: Option<String>,
    #[serde(default)]
    stacks: Vec<StackConfig>,
}

impl InfraConfig {
    pub fn get_all_stacks(&self) -> &Vec<StackConfig> {
        &self.stacks
    }

    pub fn get_stack(&self, name: &str) -> Option<&StackConfig> {
        self.stacks.iter().find(|stack| stack.name == name)
    }

    /// Returns true if an existing stack was replaced.
    pub fn set_stack(&mut self, stack: StackConfig) -> bool {
        if let Some(index) = self.stack_position(&stack.name) {
            self.stacks[index] = stack;
            true
        } else {
            self.stacks.push(stack);
            false
        }
    }

    pub fn delete_stack(&mut self, name: &str) -> bool {
        if let Some(index) = self.stack_position(name) {
            self.stacks.remove(index);
            if self.current_stack.as_deref() == Some(name) {
                self.current_stack = None
            }
            true
        } else {
            false
        }
    }

    pub fn get_current_stack(&self) -> Option<&StackConfig> {
        self.current_stack
            .as_ref()
            .and_then(|current_stack| self.get_stack(current_stack))
    }

    pub fn set_current_stack(&mut self, name: &str) -> bool {
        if self.get_stack(name).is_some() {
            self.current_stack = Some(name.to_owned());
            true
        } else {
            false
        }
    }

    pub fn num_stacks(&self) -> usize {
        self.stacks.len()
    }

    fn stack_position(&self, name: &str) -> Option<usize> {
        self.stacks.iter().position(|stack| stack.name == name)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct StackConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

pub fn read_infra_config(path: impl AsRef<Path>) -> Result<InfraConfig> {
    debug!("Reading config file at `{}`", path.as_ref().display());
    if path.as_ref().exists() {
        let file = File::open(&path)
            .with_context(|| format!("Could not open config file `{}`", path.as_ref().display()))?;
        let config_reader = BufReader::new(file);
        serde_json::from_reader(config_reader)
            .with_context(|| format!("Could not parse config file `{}`", path.as_ref().display()))
    } else {
        Ok(Default::default())
    }
}

pub fn write_infra_config(path: impl AsRef<Path>, config: &InfraConfig) -> Result<()> {
    debug!("Writing config file at `{}`", path.as_ref().display());
    let file = File::create(&path)
        .with_context(|| format!("Could not create config file `{}`", path.as_ref().display()))?;
    let config_writer = BufWriter::new(file);
    serde_json::to_writer_pretty(config_writer, &config).with_context(|| {
        format!(
            "Could not serialise configuration to `{}`",
            path.as_ref().display()
        )
    })
}
