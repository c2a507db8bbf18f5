//! Renders a stack as a Pulumi YAML program, which the engine then
//! reconciles against the live project.
use log::debug;
use serde_yaml::{Mapping, Value};

use crate::{
    error::{Error, Result},
    output::{Output, Segment},
    resources::{PropertyValue, ResourceKey, ResourceSpec},
    stack::Stack,
};

fn interpolation(output: &Output) -> String {
    output
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => text.replace('$', "$$"),
            Segment::Property { key, property } => format!("${{{key}.{property}}}"),
        })
        .collect()
}

/// Gated values are selected out of a list that also holds every gate, so
/// the engine has to resolve the gates first.
fn expression(output: &Output) -> Value {
    let mut value = Value::String(interpolation(output));
    if !output.gates().is_empty() {
        let mut values = vec![value];
        values.extend(
            output
                .gates()
                .iter()
                .map(|(key, property)| Value::String(format!("${{{key}.{property}}}"))),
        );
        let mut select = Mapping::new();
        select.insert(
            "fn::select".into(),
            Value::Sequence(vec![Value::from(0), Value::Sequence(values)]),
        );
        value = Value::Mapping(select);
    }
    if output.is_secret() {
        let mut secret = Mapping::new();
        secret.insert("fn::secret".into(), value);
        Value::Mapping(secret)
    } else {
        value
    }
}

fn reference(key: &ResourceKey) -> Value {
    Value::String(format!("${{{key}}}"))
}

/// Program document for the stack. `project_name` is the engine-side project
/// the stack belongs to.
pub fn render(stack: &Stack, project_name: &str) -> Result<String> {
    let mut resources = Mapping::new();
    for declaration in stack.declarations() {
        let mut properties = Mapping::new();
        for (name, value) in declaration.resource.properties() {
            properties.insert(
                name.into(),
                match value {
                    PropertyValue::Bool(flag) => Value::Bool(flag),
                    PropertyValue::Text(output) => expression(&output),
                },
            );
        }

        let mut resource = Mapping::new();
        resource.insert("type".into(), declaration.resource.type_token().into());
        resource.insert("properties".into(), Value::Mapping(properties));
        if !declaration.options.depends_on.is_empty() {
            let mut options = Mapping::new();
            options.insert(
                "dependsOn".into(),
                Value::Sequence(
                    declaration
                        .options
                        .depends_on
                        .iter()
                        .map(reference)
                        .collect(),
                ),
            );
            resource.insert("options".into(), Value::Mapping(options));
        }
        resources.insert(
            declaration.key.as_str().into(),
            Value::Mapping(resource),
        );
    }

    let mut outputs = Mapping::new();
    for (name, output) in stack.outputs() {
        outputs.insert(name.as_str().into(), expression(output));
    }

    let mut program = Mapping::new();
    program.insert("name".into(), project_name.into());
    program.insert("runtime".into(), "yaml".into());
    if let Some(description) = stack.description() {
        program.insert("description".into(), description.into());
    }
    program.insert("resources".into(), Value::Mapping(resources));
    program.insert("outputs".into(), Value::Mapping(outputs));

    debug!(
        "Rendering {} resources and {} outputs for stack `{}`",
        stack.len(),
        stack.outputs().len(),
        stack.name()
    );
    serde_yaml::to_string(&Value::Mapping(program)).map_err(Error::Serialize)
}
