//! Deferred values.
//!
//! An [`Output`] is a string whose value may only be known once the
//! provisioning engine has created the resources it refers to. It is stored
//! as a template of literal text and `<resource>.<property>` references, so
//! composing outputs (prefixing an email, joining a transcript) never needs
//! the upstream value to exist yet. Whatever resolves the template later
//! sees every reference it depends on.
//!
//! Secrecy is sticky: anything composed from a secret output is secret.
//!
//! A value can also be gated on references it does not embed (see
//! [`Output::after`]); it then resolves only once those do.
use std::{collections::BTreeSet, iter};

use crate::resources::ResourceKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Property { key: ResourceKey, property: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    segments: Vec<Segment>,
    gates: Vec<(ResourceKey, String)>,
    secret: bool,
}

/// The value of an output at preview time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Known(String),
    /// Only the platform can tell (generated ids, key material).
    Unknown,
}

impl Resolved {
    pub fn known(&self) -> Option<&str> {
        match self {
            Resolved::Known(value) => Some(value),
            Resolved::Unknown => None,
        }
    }
}

pub trait PropertyResolver {
    fn resolve_property(&self, key: &ResourceKey, property: &str) -> Resolved;
}

impl Output {
    pub fn known(value: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Literal(value.into())],
            gates: Vec::new(),
            secret: false,
        }
    }

    pub fn property(key: ResourceKey, property: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Property {
                key,
                property: property.into(),
            }],
            gates: Vec::new(),
            secret: false,
        }
    }

    /// Marks the value as sensitive: the engine encrypts it in its state and
    /// redacts it from default output.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// True when the value neither contains nor waits for references to
    /// other resources.
    pub fn is_known(&self) -> bool {
        self.gates.is_empty()
            && self
                .segments
                .iter()
                .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// References the value waits for without embedding them.
    pub fn gates(&self) -> &[(ResourceKey, String)] {
        &self.gates
    }

    /// Keeps this value but only makes it available once `upstream` is. The
    /// result is secret if `upstream` is.
    pub fn after(mut self, upstream: &Output) -> Self {
        for (key, property) in upstream.references() {
            let gate = (key.clone(), property.to_owned());
            if !self.gates.contains(&gate) {
                self.gates.push(gate);
            }
        }
        self.secret |= upstream.secret;
        self
    }

    pub fn prefixed(self, prefix: &str) -> Self {
        Self::concat([Self::known(prefix), self])
    }

    pub fn concat(parts: impl IntoIterator<Item = Output>) -> Self {
        let mut secret = false;
        let mut segments: Vec<Segment> = Vec::new();
        let mut gates: Vec<(ResourceKey, String)> = Vec::new();
        for part in parts {
            secret |= part.secret;
            for gate in part.gates {
                if !gates.contains(&gate) {
                    gates.push(gate);
                }
            }
            for segment in part.segments {
                match segment {
                    Segment::Literal(next) if next.is_empty() => {}
                    Segment::Literal(next) => match segments.last_mut() {
                        Some(Segment::Literal(previous)) => previous.push_str(&next),
                        _ => segments.push(Segment::Literal(next)),
                    },
                    segment => segments.push(segment),
                }
            }
        }
        Self {
            segments,
            gates,
            secret,
        }
    }

    /// Literal value, if the output does not depend on any resource.
    pub fn as_known(&self) -> Option<String> {
        self.is_known().then(|| {
            self.segments
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Literal(text) => Some(text.as_str()),
                    Segment::Property { .. } => None,
                })
                .collect()
        })
    }

    /// Resource keys this value refers to or waits for, i.e. its implicit
    /// dependencies.
    pub fn dependencies(&self) -> BTreeSet<ResourceKey> {
        self.references().map(|(key, _)| key.clone()).collect()
    }

    pub(crate) fn references(&self) -> impl Iterator<Item = (&ResourceKey, &str)> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Property { key, property } => Some((key, property.as_str())),
                Segment::Literal(_) => None,
            })
            .chain(
                self.gates
                    .iter()
                    .map(|(key, property)| (key, property.as_str())),
            )
    }

    pub fn resolve(&self, resolver: &impl PropertyResolver) -> Resolved {
        for (key, property) in &self.gates {
            if resolver.resolve_property(key, property) == Resolved::Unknown {
                return Resolved::Unknown;
            }
        }

        let mut value = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => value.push_str(text),
                Segment::Property { key, property } => {
                    match resolver.resolve_property(key, property) {
                        Resolved::Known(resolved) => value.push_str(&resolved),
                        Resolved::Unknown => return Resolved::Unknown,
                    }
                }
            }
        }
        Resolved::Known(value)
    }
}

impl From<&str> for Output {
    fn from(value: &str) -> Self {
        Self::known(value)
    }
}

impl From<String> for Output {
    fn from(value: String) -> Self {
        Self::known(value)
    }
}

impl iter::FromIterator<Output> for Output {
    fn from_iter<T: IntoIterator<Item = Output>>(parts: T) -> Self {
        Self::concat(parts)
    }
}
