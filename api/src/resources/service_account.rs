use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    output::Output,
    resources::{is_gcp_short_id, ProjectId, PropertyValue, ResourceKey, ResourceSpec},
};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Account ids are valid resource keys as they are.
    pub fn resource_key(&self) -> ResourceKey {
        ResourceKey(self.0.clone())
    }

    /// The address GCP assigns to a user-managed service account.
    pub fn email(&self, project: &ProjectId) -> String {
        format!("{}@{}.iam.gserviceaccount.com", self.0, project)
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        if is_gcp_short_id(string) {
            Ok(Self(string.into()))
        } else {
            Err(Error::BadAccountId {
                account_id: string.into(),
            })
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A service account: a non-human identity used by automation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_id: AccountId,
    pub display_name: String,
    pub project: ProjectId,
}

impl Account {
    pub fn email(&self) -> String {
        self.account_id.email(&self.project)
    }

    /// Fully qualified name, as accepted by the key and IAM APIs.
    pub fn name(&self) -> String {
        format!("projects/{}/serviceAccounts/{}", self.project, self.email())
    }
}

impl ResourceSpec for Account {
    fn type_token(&self) -> &'static str {
        "gcp:serviceaccount:Account"
    }

    fn project(&self) -> Option<&ProjectId> {
        Some(&self.project)
    }

    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("accountId", Output::known(self.account_id.as_str()).into()),
            ("displayName", Output::known(self.display_name.as_str()).into()),
            ("project", Output::known(self.project.as_str()).into()),
        ]
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["email", "name", "uniqueId", "member"]
    }

    fn derive_output(&self, property: &str) -> Option<Output> {
        match property {
            "email" => Some(Output::known(self.email())),
            "name" => Some(Output::known(self.name())),
            "member" => Some(Output::known(self.email()).prefixed("serviceAccount:")),
            _ => None,
        }
    }
}
