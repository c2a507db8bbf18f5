use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    output::Output,
    resources::{service_account::AccountId, ProjectId, PropertyValue, ResourceKey, ResourceSpec},
};

/// Member prefix for service account principals in IAM policies.
pub const SERVICE_ACCOUNT_MEMBER_PREFIX: &str = "serviceAccount:";

/// A predefined (`roles/run.admin`) or custom
/// (`projects/<p>/roles/<r>`, `organizations/<o>/roles/<r>`) role.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Role(String);

impl Role {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<account id>-<role with slashes replaced by hyphens>`.
    pub fn grant_key(&self, grantee: &AccountId) -> ResourceKey {
        ResourceKey(format!("{}-{}", grantee, self.0.replace('/', "-")))
    }
}

fn is_role_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        let parts: Vec<&str> = string.split('/').collect();
        let valid = match parts.as_slice() {
            ["roles", name] => is_role_name(name),
            ["projects" | "organizations", parent, "roles", name] => {
                !parent.is_empty() && is_role_name(name)
            }
            _ => false,
        };
        if valid {
            Ok(Self(string.into()))
        } else {
            Err(Error::BadRole {
                role: string.into(),
            })
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Non-authoritative grant of one role to one member in a project. Other
/// members of the same role are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IamMember {
    pub project: ProjectId,
    pub role: Role,
    pub member: Output,
}

impl IamMember {
    pub fn service_account_member(email: Output) -> Output {
        email.prefixed(SERVICE_ACCOUNT_MEMBER_PREFIX)
    }
}

impl ResourceSpec for IamMember {
    fn type_token(&self) -> &'static str {
        "gcp:projects:IAMMember"
    }

    fn project(&self) -> Option<&ProjectId> {
        Some(&self.project)
    }

    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("project", Output::known(self.project.as_str()).into()),
            ("role", Output::known(self.role.as_str()).into()),
            ("member", self.member.clone().into()),
        ]
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["etag"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_validation() {
        assert!("roles/iam.serviceAccountUser".parse::<Role>().is_ok());
        assert!("projects/acme-123/roles/deployer".parse::<Role>().is_ok());
        assert!("organizations/1234/roles/audit_reader".parse::<Role>().is_ok());
        assert!("run.admin".parse::<Role>().is_err());
        assert!("roles/".parse::<Role>().is_err());
        assert!("roles/run/admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_grant_key() {
        let grantee: AccountId = "github-actions".parse().unwrap();
        let role: Role = "roles/artifactregistry.admin".parse().unwrap();
        assert_eq!(
            role.grant_key(&grantee).as_str(),
            "github-actions-roles-artifactregistry.admin"
        );
    }
}
