#![deny(clippy::all)]
mod error;
pub mod output;
pub mod preview;
pub mod pulumi;
pub mod resources;
pub mod stack;

pub use crate::{
    error::{Error, Result},
    output::{Output, PropertyResolver, Resolved},
    preview::{PlannedOutput, PlannedResource, PlannedValue, Preview},
    resources::{
        iam::{IamMember, Role, SERVICE_ACCOUNT_MEMBER_PREFIX},
        key::{Key, PublicKeyType},
        repository::{Repository, RepositoryFormat, RepositoryId},
        service::{Service, ServiceName},
        service_account::{Account, AccountId},
        ProjectId, PropertyValue, Resource, ResourceKey, ResourceSpec,
    },
    stack::{Declaration, ResourceOptions, ResourceRef, Stack},
};
