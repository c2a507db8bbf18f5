use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    output::Output,
    resources::{ProjectId, PropertyValue, ResourceSpec},
};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct RepositoryId(String);

impl RepositoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RepositoryId {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        if (1..=63).contains(&string.len())
            && string.starts_with(|c: char| c.is_ascii_lowercase())
            && string
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._-".contains(c))
        {
            Ok(Self(string.into()))
        } else {
            Err(Error::BadRepositoryId {
                repository_id: string.into(),
            })
        }
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryFormat {
    Docker,
    Maven,
    Npm,
    Python,
}

impl RepositoryFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryFormat::Docker => "DOCKER",
            RepositoryFormat::Maven => "MAVEN",
            RepositoryFormat::Npm => "NPM",
            RepositoryFormat::Python => "PYTHON",
        }
    }
}

/// An Artifact Registry repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub repository_id: RepositoryId,
    /// Region or multi-region code (`us`, `europe`, `us-central1`, ...).
    pub location: String,
    pub format: RepositoryFormat,
    pub description: String,
    pub project: ProjectId,
}

impl Repository {
    pub fn name(&self) -> String {
        format!(
            "projects/{}/locations/{}/repositories/{}",
            self.project, self.location, self.repository_id
        )
    }
}

impl ResourceSpec for Repository {
    fn type_token(&self) -> &'static str {
        "gcp:artifactregistry:Repository"
    }

    fn project(&self) -> Option<&ProjectId> {
        Some(&self.project)
    }

    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("repositoryId", Output::known(self.repository_id.as_str()).into()),
            ("location", Output::known(self.location.as_str()).into()),
            ("format", Output::known(self.format.as_str()).into()),
            ("description", Output::known(self.description.as_str()).into()),
            ("project", Output::known(self.project.as_str()).into()),
        ]
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["name", "createTime", "updateTime"]
    }

    fn derive_output(&self, property: &str) -> Option<Output> {
        match property {
            "name" => Some(Output::known(self.name())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_name() {
        let repository = Repository {
            repository_id: "gcr.io".parse().unwrap(),
            location: "us".into(),
            format: RepositoryFormat::Docker,
            description: String::new(),
            project: "acme-123".parse().unwrap(),
        };
        assert_eq!(
            repository.name(),
            "projects/acme-123/locations/us/repositories/gcr.io"
        );
    }

    #[test]
    fn test_repository_id_validation() {
        assert!("gcr.io".parse::<RepositoryId>().is_ok());
        assert!("Images".parse::<RepositoryId>().is_err());
        assert!("".parse::<RepositoryId>().is_err());
    }
}
