pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Expected a resource key made of [A-Za-z0-9_.-], got: `{}`", key)]
    BadResourceKey { key: String },

    #[error("Expected a GCP project id (6-30 chars of [a-z0-9-]), got: `{}`", project)]
    BadProjectId { project: String },

    #[error("Expected a service name such as `run.googleapis.com`, got: `{}`", service)]
    BadServiceName { service: String },

    #[error("Expected a service account id (6-30 chars of [a-z0-9-]), got: `{}`", account_id)]
    BadAccountId { account_id: String },

    #[error("Expected `roles/<name>` or a custom role path, got: `{}`", role)]
    BadRole { role: String },

    #[error("Expected a repository id of [a-z0-9._-], got: `{}`", repository_id)]
    BadRepositoryId { repository_id: String },

    #[error("A resource with key `{}` has already been declared", key)]
    DuplicateResource { key: String },

    #[error("Resource `{}` refers to `{}`, which has not been declared", referrer, key)]
    UnknownDependency { referrer: String, key: String },

    #[error("Resource `{}` ({}) has no output property `{}`", key, type_token, property)]
    UnknownProperty {
        key: String,
        type_token: &'static str,
        property: String,
    },

    #[error("An output named `{}` has already been exported", name)]
    DuplicateOutput { name: String },

    #[error("Could not serialise the stack program")]
    Serialize(#[source] serde_yaml::Error),
}
