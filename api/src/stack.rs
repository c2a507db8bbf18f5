//! The declaration graph of one stack.
//!
//! Resources are appended in the order they are declared and may only refer
//! to resources declared before them, so declaration order is always a valid
//! creation order. Executing the graph is the provisioning engine's job.
use log::debug;
use std::collections::{BTreeSet, HashMap};

use crate::{
    error::{Error, Result},
    output::Output,
    resources::{Resource, ResourceKey, ResourceSpec, COMMON_OUTPUTS},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// Ordering edges the engine cannot infer from property references.
    pub depends_on: Vec<ResourceKey>,
}

impl ResourceOptions {
    pub fn depends_on<'a>(resources: impl IntoIterator<Item = &'a ResourceRef>) -> Self {
        Self {
            depends_on: resources
                .into_iter()
                .map(|resource| resource.key().clone())
                .collect(),
        }
    }
}

/// Handle to a declared resource, used to read its deferred outputs and to
/// express dependencies on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    key: ResourceKey,
    type_token: &'static str,
    output_names: &'static [&'static str],
    secret_outputs: &'static [&'static str],
}

impl ResourceRef {
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn type_token(&self) -> &'static str {
        self.type_token
    }

    pub fn output(&self, property: &str) -> Result<Output> {
        if !COMMON_OUTPUTS.contains(&property) && !self.output_names.contains(&property) {
            return Err(Error::UnknownProperty {
                key: self.key.to_string(),
                type_token: self.type_token,
                property: property.into(),
            });
        }
        let output = Output::property(self.key.clone(), property);
        Ok(if self.secret_outputs.contains(&property) {
            output.secret()
        } else {
            output
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub key: ResourceKey,
    pub resource: Resource,
    pub options: ResourceOptions,
}

impl Declaration {
    pub fn explicit_dependencies(&self) -> &[ResourceKey] {
        &self.options.depends_on
    }

    /// Resources whose outputs feed this resource's inputs.
    pub fn implicit_dependencies(&self) -> BTreeSet<ResourceKey> {
        self.resource
            .properties()
            .iter()
            .filter_map(|(_, value)| value.as_output())
            .flat_map(Output::dependencies)
            .collect()
    }

    /// Explicit and implicit dependencies together.
    pub fn dependencies(&self) -> BTreeSet<ResourceKey> {
        let mut dependencies = self.implicit_dependencies();
        dependencies.extend(self.options.depends_on.iter().cloned());
        dependencies
    }
}

#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    description: Option<String>,
    declarations: Vec<Declaration>,
    index: HashMap<ResourceKey, usize>,
    outputs: Vec<(String, Output)>,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            declarations: Vec::new(),
            index: HashMap::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn declare(
        &mut self,
        key: ResourceKey,
        resource: impl Into<Resource>,
        options: ResourceOptions,
    ) -> Result<ResourceRef> {
        let resource = resource.into();
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateResource {
                key: key.to_string(),
            });
        }

        for dependency in &options.depends_on {
            self.check_declared(key.as_str(), dependency)?;
        }
        for (_, value) in resource.properties() {
            if let Some(output) = value.as_output() {
                self.check_references(key.as_str(), output)?;
            }
        }

        debug!("Declared {} `{}`", resource.type_token(), key);
        let handle = ResourceRef {
            key: key.clone(),
            type_token: resource.type_token(),
            output_names: resource.output_names(),
            secret_outputs: resource.secret_outputs(),
        };
        self.index.insert(key.clone(), self.declarations.len());
        self.declarations.push(Declaration {
            key,
            resource,
            options,
        });
        Ok(handle)
    }

    /// Publishes a value for downstream consumers of the stack.
    pub fn export(&mut self, name: impl Into<String>, output: Output) -> Result<()> {
        let name = name.into();
        if self.output(&name).is_some() {
            return Err(Error::DuplicateOutput { name });
        }
        self.check_references(&format!("output {name}"), &output)?;
        debug!("Exported output `{}`", name);
        self.outputs.push((name, output));
        Ok(())
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&Declaration> {
        self.index
            .get(key)
            .map(|position| &self.declarations[*position])
    }

    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.declarations.iter().map(|declaration| &declaration.key)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn outputs(&self) -> &[(String, Output)] {
        &self.outputs
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs
            .iter()
            .find(|(output_name, _)| output_name == name)
            .map(|(_, output)| output)
    }

    fn check_declared(&self, referrer: &str, key: &ResourceKey) -> Result<&Declaration> {
        self.get(key).ok_or_else(|| Error::UnknownDependency {
            referrer: referrer.into(),
            key: key.to_string(),
        })
    }

    fn check_references(&self, referrer: &str, output: &Output) -> Result<()> {
        for (key, property) in output.references() {
            let declaration = self.check_declared(referrer, key)?;
            if !declaration.resource.has_output(property) {
                return Err(Error::UnknownProperty {
                    key: key.to_string(),
                    type_token: declaration.resource.type_token(),
                    property: property.into(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{
        key::{Key, PublicKeyType},
        service::Service,
        service_account::Account,
    };
    use pretty_assertions::assert_eq;

    fn service(name: &str) -> Service {
        Service {
            service: name.parse().unwrap(),
            project: "demo-proj".parse().unwrap(),
            disable_on_destroy: false,
        }
    }

    fn account() -> Account {
        Account {
            account_id: "deployer".parse().unwrap(),
            display_name: "Deployer".into(),
            project: "demo-proj".parse().unwrap(),
        }
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut stack = Stack::new("dev");
        let key: ResourceKey = "enable-run".parse().unwrap();
        stack
            .declare(key.clone(), service("run.googleapis.com"), Default::default())
            .unwrap();
        let error = stack
            .declare(key, service("run.googleapis.com"), Default::default())
            .unwrap_err();
        assert!(matches!(error, Error::DuplicateResource { .. }));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_dependency_must_be_declared_first() {
        let mut stack = Stack::new("dev");
        let error = stack
            .declare(
                "enable-run".parse().unwrap(),
                service("run.googleapis.com"),
                ResourceOptions {
                    depends_on: vec!["missing".parse().unwrap()],
                },
            )
            .unwrap_err();
        assert!(matches!(error, Error::UnknownDependency { .. }));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_unknown_output_property() {
        let mut stack = Stack::new("dev");
        let account = stack
            .declare("deployer".parse().unwrap(), account(), Default::default())
            .unwrap();
        assert!(account.output("email").is_ok());
        assert!(account.output("id").is_ok());
        assert!(matches!(
            account.output("privateKey"),
            Err(Error::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_implicit_dependencies_and_secret_outputs() {
        let mut stack = Stack::new("dev");
        let account = stack
            .declare("deployer".parse().unwrap(), account(), Default::default())
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

        let declaration = stack.get(key.key()).unwrap();
        assert_eq!(
            declaration.implicit_dependencies().into_iter().collect::<Vec<_>>(),
            vec![account.key().clone()]
        );
        assert!(declaration.explicit_dependencies().is_empty());
        assert!(key.output("privateKey").unwrap().is_secret());
        assert!(!key.output("publicKey").unwrap().is_secret());
    }

    #[test]
    fn test_export() {
        let mut stack = Stack::new("dev");
        stack.export("region", Output::known("us-central1")).unwrap();
        assert!(matches!(
            stack.export("region", Output::known("europe-west1")),
            Err(Error::DuplicateOutput { .. })
        ));
        assert!(matches!(
            stack.export(
                "email",
                Output::property("deployer".parse().unwrap(), "email")
            ),
            Err(Error::UnknownDependency { .. })
        ));
        assert_eq!(
            stack.output("region").and_then(Output::as_known).as_deref(),
            Some("us-central1")
        );
    }
}
