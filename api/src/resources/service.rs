use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    output::Output,
    resources::{ProjectId, PropertyValue, ResourceKey, ResourceSpec},
};

/// A platform API such as `run.googleapis.com`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `enable-<service with dots replaced by hyphens>`.
    pub fn enablement_key(&self) -> ResourceKey {
        ResourceKey(format!("enable-{}", self.0.replace('.', "-")))
    }
}

impl FromStr for ServiceName {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        let labels: Vec<&str> = string.split('.').collect();
        if labels.len() >= 2
            && labels.iter().all(|label| {
                !label.is_empty()
                    && label
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            })
        {
            Ok(Self(string.into()))
        } else {
            Err(Error::BadServiceName {
                service: string.into(),
            })
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Enables an API in a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub service: ServiceName,
    pub project: ProjectId,
    /// Leaving this false keeps the API on when the stack is destroyed, which
    /// avoids breaking anything else in the project that relies on it.
    pub disable_on_destroy: bool,
}

impl ResourceSpec for Service {
    fn type_token(&self) -> &'static str {
        "gcp:projects:Service"
    }

    fn project(&self) -> Option<&ProjectId> {
        Some(&self.project)
    }

    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("service", Output::known(self.service.as_str()).into()),
            ("project", Output::known(self.project.as_str()).into()),
            ("disableOnDestroy", self.disable_on_destroy.into()),
        ]
    }

    fn output_names(&self) -> &'static [&'static str] {
        &[]
    }
}
