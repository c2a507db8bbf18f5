pub mod iam;
pub mod key;
pub mod repository;
pub mod service;
pub mod service_account;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    output::Output,
};

use self::{
    iam::IamMember, key::Key, repository::Repository, service::Service,
    service_account::Account,
};

/// Engine-side logical name of a declared resource. Unique within a stack.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResourceKey {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        if !string.is_empty()
            && string
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            Ok(Self(string.into()))
        } else {
            Err(Error::BadResourceKey { key: string.into() })
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectId {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        if is_gcp_short_id(string) {
            Ok(Self(string.into()))
        } else {
            Err(Error::BadProjectId {
                project: string.into(),
            })
        }
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Project ids and service account ids share the same shape: 6 to 30
/// characters, a lowercase letter first, no trailing hyphen.
pub(crate) fn is_gcp_short_id(string: &str) -> bool {
    (6..=30).contains(&string.len())
        && string.starts_with(|c: char| c.is_ascii_lowercase())
        && !string.ends_with('-')
        && string
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// An input property as handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Text(Output),
}

impl PropertyValue {
    pub fn as_output(&self) -> Option<&Output> {
        match self {
            PropertyValue::Text(output) => Some(output),
            PropertyValue::Bool(_) => None,
        }
    }
}

impl From<Output> for PropertyValue {
    fn from(output: Output) -> Self {
        PropertyValue::Text(output)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Every engine resource exposes these, none of which can be known before
/// the resource exists.
pub const COMMON_OUTPUTS: &[&str] = &["id", "urn"];

/// The shape of one kind of cloud resource.
pub trait ResourceSpec {
    /// Engine type token, e.g. `gcp:projects:Service`.
    fn type_token(&self) -> &'static str;

    fn project(&self) -> Option<&ProjectId>;

    /// Input properties in the engine's naming, in a stable order.
    fn properties(&self) -> Vec<(&'static str, PropertyValue)>;

    /// Output properties specific to this kind, besides [`COMMON_OUTPUTS`].
    fn output_names(&self) -> &'static [&'static str];

    fn secret_outputs(&self) -> &'static [&'static str] {
        &[]
    }

    /// Outputs the platform computes deterministically from the inputs, so a
    /// preview can show them before anything exists.
    fn derive_output(&self, _property: &str) -> Option<Output> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Service(Service),
    Account(Account),
    IamMember(IamMember),
    Repository(Repository),
    Key(Key),
}

impl Resource {
    fn spec(&self) -> &dyn ResourceSpec {
        match self {
            Resource::Service(service) => service,
            Resource::Account(account) => account,
            Resource::IamMember(member) => member,
            Resource::Repository(repository) => repository,
            Resource::Key(key) => key,
        }
    }

    pub fn has_output(&self, property: &str) -> bool {
        COMMON_OUTPUTS.contains(&property) || self.output_names().contains(&property)
    }

    pub fn is_secret_output(&self, property: &str) -> bool {
        self.secret_outputs().contains(&property)
    }
}

impl ResourceSpec for Resource {
    fn type_token(&self) -> &'static str {
        self.spec().type_token()
    }

    fn project(&self) -> Option<&ProjectId> {
        self.spec().project()
    }

    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        self.spec().properties()
    }

    fn output_names(&self) -> &'static [&'static str] {
        self.spec().output_names()
    }

    fn secret_outputs(&self) -> &'static [&'static str] {
        self.spec().secret_outputs()
    }

    fn derive_output(&self, property: &str) -> Option<Output> {
        self.spec().derive_output(property)
    }
}

macro_rules! impl_from_resource {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Resource {
                fn from(resource: $variant) -> Self {
                    Resource::$variant(resource)
                }
            }
        )*
    };
}

impl_from_resource!(Service, Account, IamMember, Repository, Key);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key_validation() {
        assert!("enable-run-googleapis-com".parse::<ResourceKey>().is_ok());
        assert!("gcr.io".parse::<ResourceKey>().is_ok());
        assert!("".parse::<ResourceKey>().is_err());
        assert!("roles/run.admin".parse::<ResourceKey>().is_err());
    }

    #[test]
    fn test_project_id_validation() {
        assert!("game-zone-479009".parse::<ProjectId>().is_ok());
        assert!("acme-123".parse::<ProjectId>().is_ok());
        assert!("short".parse::<ProjectId>().is_err());
        assert!("1-starts-with-digit".parse::<ProjectId>().is_err());
        assert!("trailing-hyphen-".parse::<ProjectId>().is_err());
        assert!("Upper-Case-Project".parse::<ProjectId>().is_err());
    }
}
