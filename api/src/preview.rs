//! What a stack would ask the engine for, with every value the platform does
//! not generate already filled in.
use serde::Serialize;

use crate::{
    output::{Output, PropertyResolver, Resolved},
    resources::{PropertyValue, ResourceKey, ResourceSpec},
    stack::Stack,
};

/// Derives outputs that follow from declared inputs (emails, fully
/// qualified names). Anything else is unknown until the engine runs.
struct DerivingResolver<'stack> {
    stack: &'stack Stack,
}

impl PropertyResolver for DerivingResolver<'_> {
    fn resolve_property(&self, key: &ResourceKey, property: &str) -> Resolved {
        self.stack
            .get(key)
            .and_then(|declaration| declaration.resource.derive_output(property))
            .map_or(Resolved::Unknown, |derived| derived.resolve(self))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedValue {
    /// Absent when unknown or redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub known: bool,
    pub secret: bool,
}

impl PlannedValue {
    fn new(resolved: Resolved, secret: bool, show_secrets: bool) -> Self {
        match resolved {
            Resolved::Known(value) => Self {
                value: (!secret || show_secrets).then_some(value),
                known: true,
                secret,
            },
            Resolved::Unknown => Self {
                value: None,
                known: false,
                secret,
            },
        }
    }

    pub fn display(&self) -> &str {
        match (&self.value, self.known) {
            (Some(value), _) => value,
            (None, false) => "[unknown]",
            (None, true) => "[secret]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedProperty {
    pub name: &'static str,
    #[serde(flatten)]
    pub value: PlannedValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedResource {
    pub key: ResourceKey,
    #[serde(rename = "type")]
    pub type_token: &'static str,
    pub project: Option<String>,
    pub properties: Vec<PlannedProperty>,
    pub depends_on: Vec<ResourceKey>,
    pub implicit_dependencies: Vec<ResourceKey>,
}

impl PlannedResource {
    pub fn property(&self, name: &str) -> Option<&PlannedValue> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedOutput {
    pub name: String,
    #[serde(flatten)]
    pub value: PlannedValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub stack: String,
    pub resources: Vec<PlannedResource>,
    pub outputs: Vec<PlannedOutput>,
}

impl Preview {
    /// Secret values are redacted unless `show_secrets` is set.
    pub fn of(stack: &Stack, show_secrets: bool) -> Self {
        let resolver = DerivingResolver { stack };
        let plan_output = |output: &Output| {
            PlannedValue::new(output.resolve(&resolver), output.is_secret(), show_secrets)
        };

        let resources = stack
            .declarations()
            .iter()
            .map(|declaration| PlannedResource {
                key: declaration.key.clone(),
                type_token: declaration.resource.type_token(),
                project: declaration
                    .resource
                    .project()
                    .map(|project| project.to_string()),
                properties: declaration
                    .resource
                    .properties()
                    .into_iter()
                    .map(|(name, value)| PlannedProperty {
                        name,
                        value: match value {
                            PropertyValue::Bool(flag) => PlannedValue {
                                value: Some(flag.to_string()),
                                known: true,
                                secret: false,
                            },
                            PropertyValue::Text(output) => plan_output(&output),
                        },
                    })
                    .collect(),
                depends_on: declaration.explicit_dependencies().to_vec(),
                implicit_dependencies: declaration.implicit_dependencies().into_iter().collect(),
            })
            .collect();

        let outputs = stack
            .outputs()
            .iter()
            .map(|(name, output)| PlannedOutput {
                name: name.clone(),
                value: plan_output(output),
            })
            .collect();

        Self {
            stack: stack.name().to_owned(),
            resources,
            outputs,
        }
    }

    pub fn resource(&self, key: &str) -> Option<&PlannedResource> {
        self.resources
            .iter()
            .find(|resource| resource.key.as_str() == key)
    }

    pub fn output(&self, name: &str) -> Option<&PlannedOutput> {
        self.outputs.iter().find(|output| output.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        resources::{
            iam::IamMember,
            key::{Key, PublicKeyType},
            service_account::Account,
        },
        stack::Stack,
    };
    use pretty_assertions::assert_eq;

    fn stack() -> Stack {
        let mut stack = Stack::new("dev");
        let account = stack
            .declare(
                "deployer".parse().unwrap(),
                Account {
                    account_id: "deployer".parse().unwrap(),
                    display_name: "Deployer".into(),
                    project: "demo-proj".parse().unwrap(),
                },
                Default::default(),
            )
            .unwrap();
        stack
            .declare(
                "deployer-roles-viewer".parse().unwrap(),
                IamMember {
                    project: "demo-proj".parse().unwrap(),
                    role: "roles/viewer".parse().unwrap(),
                    member: IamMember::service_account_member(account.output("email").unwrap()),
                },
                Default::default(),
            )
            .unwrap();
        let key = stack
            .declare(
                "deployer-key".parse().unwrap(),
                Key {
                    service_account_id: account.output("name").unwrap(),
                    public_key_type: PublicKeyType::X509PemFile,
                },
                Default::default(),
            )
            .unwrap();
        stack
            .export("email", account.output("email").unwrap())
            .unwrap();
        stack
            .export("key", key.output("privateKey").unwrap())
            .unwrap();
        stack
            .export("token", Output::known("hunter2").secret())
            .unwrap();
        stack
    }

    #[test]
    fn test_derived_values_are_known() {
        let preview = Preview::of(&stack(), false);
        let grant = preview.resource("deployer-roles-viewer").unwrap();
        assert_eq!(
            grant.property("member").unwrap().display(),
            "serviceAccount:deployer@demo-proj.iam.gserviceaccount.com"
        );
        assert_eq!(
            grant.implicit_dependencies,
            vec!["deployer".parse::<ResourceKey>().unwrap()]
        );
        assert_eq!(
            preview.output("email").unwrap().value.display(),
            "deployer@demo-proj.iam.gserviceaccount.com"
        );
        assert_eq!(
            preview.resource("deployer-key").unwrap().project,
            None
        );
    }

    #[test]
    fn test_generated_values_are_unknown() {
        let preview = Preview::of(&stack(), true);
        let key = preview.output("key").unwrap();
        assert!(!key.value.known);
        assert!(key.value.secret);
        assert_eq!(key.value.display(), "[unknown]");
    }

    #[test]
    fn test_secrets_are_redacted_unless_requested() {
        let hidden = Preview::of(&stack(), false);
        assert_eq!(hidden.output("token").unwrap().value.display(), "[secret]");
        assert_eq!(hidden.output("token").unwrap().value.value, None);

        let shown = Preview::of(&stack(), true);
        assert_eq!(shown.output("token").unwrap().value.display(), "hunter2");
    }
}
