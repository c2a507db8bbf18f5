//! The tower-defence deployment stack: what the GitHub Actions pipeline
//! needs in the GCP project to build images and deploy them to Cloud Run.
use anyhow::{Context, Result};
use gcp_infra::{
    Account, AccountId, IamMember, Key, Output, ProjectId, PublicKeyType, Repository,
    RepositoryFormat, ResourceOptions, ResourceRef, Role, Service, ServiceName, Stack,
};

pub const PROGRAM_NAME: &str = "tower-defence-infra";
pub const PROGRAM_DESCRIPTION: &str =
    "Service accounts, IAM permissions and Artifact Registry for the Cloud Run deployment";

pub const DEFAULT_PROJECT: &str = "game-zone-479009";
pub const DEFAULT_REGION: &str = "us-central1";

pub const REQUIRED_APIS: [&str; 4] = [
    "run.googleapis.com",
    "containerregistry.googleapis.com",
    "cloudbuild.googleapis.com",
    "artifactregistry.googleapis.com",
];

pub const DEPLOYER_ACCOUNT_ID: &str = "github-actions";
pub const DEPLOYER_DISPLAY_NAME: &str = "GitHub Actions for Tower Defense";

pub const DEPLOYER_ROLES: [&str; 4] = [
    "roles/run.admin",
    "roles/storage.admin",
    "roles/artifactregistry.admin",
    "roles/iam.serviceAccountUser",
];

pub const REGISTRY_KEY: &str = "gcr-repository";
/// Named after the legacy `gcr.io` host so existing image paths keep working.
pub const REGISTRY_ID: &str = "gcr.io";
pub const REGISTRY_LOCATION: &str = "us";
pub const REGISTRY_DESCRIPTION: &str = "Container Registry for Tower Defense";

pub const DEPLOYER_KEY_KEY: &str = "github-actions-key";

pub const GITHUB_REPOSITORY: &str = "twdobson/tower-defence";

/// Configuration inputs. Only these change what gets declared.
#[derive(Debug, Clone)]
pub struct Settings {
    pub stack: String,
    pub project: ProjectId,
    /// Exported as-is. No resource is placed by it; the registry is
    /// multi-regional.
    pub region: String,
}

/// Handles to everything the program declared.
#[derive(Debug)]
pub struct Deployment {
    pub stack: Stack,
    pub enabled_services: Vec<ResourceRef>,
    pub deployer: ResourceRef,
    pub grants: Vec<ResourceRef>,
    pub registry: ResourceRef,
    pub deployer_key: ResourceRef,
}

pub fn declare(settings: &Settings) -> Result<Deployment> {
    let mut stack = Stack::new(&settings.stack).with_description(PROGRAM_DESCRIPTION);
    let project = &settings.project;

    let enabled_services =
        enable_apis(&mut stack, project).context("Could not declare API enablement")?;
    let deployer = declare_deployer(&mut stack, project)
        .context("Could not declare the deployer service account")?;
    let grants = grant_deployer_roles(&mut stack, project, &deployer)
        .context("Could not declare role grants")?;
    let registry = declare_registry(&mut stack, project, &enabled_services)
        .context("Could not declare the container registry")?;
    let deployer_key = declare_deployer_key(&mut stack, &deployer)
        .context("Could not declare the deployer key")?;

    export_outputs(&mut stack, settings, &deployer, &registry, &deployer_key)
        .context("Could not export stack outputs")?;

    Ok(Deployment {
        stack,
        enabled_services,
        deployer,
        grants,
        registry,
        deployer_key,
    })
}

fn enable_apis(stack: &mut Stack, project: &ProjectId) -> Result<Vec<ResourceRef>> {
    let mut enabled_services = Vec::with_capacity(REQUIRED_APIS.len());
    for api in REQUIRED_APIS {
        let service: ServiceName = api.parse()?;
        let handle = stack.declare(
            service.enablement_key(),
            Service {
                service,
                project: project.clone(),
                disable_on_destroy: false,
            },
            ResourceOptions::default(),
        )?;
        enabled_services.push(handle);
    }
    Ok(enabled_services)
}

fn declare_deployer(stack: &mut Stack, project: &ProjectId) -> Result<ResourceRef> {
    let account = Account {
        account_id: DEPLOYER_ACCOUNT_ID.parse()?,
        display_name: DEPLOYER_DISPLAY_NAME.into(),
        project: project.clone(),
    };
    Ok(stack.declare(
        account.account_id.resource_key(),
        account,
        ResourceOptions::default(),
    )?)
}

fn grant_deployer_roles(
    stack: &mut Stack,
    project: &ProjectId,
    deployer: &ResourceRef,
) -> Result<Vec<ResourceRef>> {
    let grantee: AccountId = DEPLOYER_ACCOUNT_ID.parse()?;
    let member = IamMember::service_account_member(deployer.output("email")?);

    let mut grants = Vec::with_capacity(DEPLOYER_ROLES.len());
    for role in DEPLOYER_ROLES {
        let role: Role = role.parse()?;
        grants.push(stack.declare(
            role.grant_key(&grantee),
            IamMember {
                project: project.clone(),
                role,
                member: member.clone(),
            },
            ResourceOptions::default(),
        )?);
    }
    Ok(grants)
}

/// The registry is rejected by the platform until its API is enabled, and
/// nothing in its inputs says so; the dependency has to be spelled out.
fn declare_registry(
    stack: &mut Stack,
    project: &ProjectId,
    enabled_services: &[ResourceRef],
) -> Result<ResourceRef> {
    Ok(stack.declare(
        REGISTRY_KEY.parse()?,
        Repository {
            repository_id: REGISTRY_ID.parse()?,
            location: REGISTRY_LOCATION.into(),
            format: RepositoryFormat::Docker,
            description: REGISTRY_DESCRIPTION.into(),
            project: project.clone(),
        },
        ResourceOptions::depends_on(enabled_services),
    )?)
}

fn declare_deployer_key(stack: &mut Stack, deployer: &ResourceRef) -> Result<ResourceRef> {
    Ok(stack.declare(
        DEPLOYER_KEY_KEY.parse()?,
        Key {
            service_account_id: deployer.output("name")?,
            public_key_type: PublicKeyType::X509PemFile,
        },
        ResourceOptions::default(),
    )?)
}

/// Instructions for copying the deployer credentials into the GitHub
/// repository's secrets.
pub fn github_secret_setup_commands(project: &ProjectId) -> String {
    format!(
        r#"
# Set GitHub secrets using these commands:

# 1. Set GCP_PROJECT_ID:
echo "{project}" | gh secret set GCP_PROJECT_ID --repo={GITHUB_REPOSITORY}

# 2. Set GCP_SA_KEY (decode the base64 key first):
pulumi stack output service_account_key_base64 --show-secrets | base64 -d | gh secret set GCP_SA_KEY --repo={GITHUB_REPOSITORY}
"#
    )
}

fn export_outputs(
    stack: &mut Stack,
    settings: &Settings,
    deployer: &ResourceRef,
    registry: &ResourceRef,
    deployer_key: &ResourceRef,
) -> Result<()> {
    let private_key = deployer_key.output("privateKey")?;

    stack.export("project_id", Output::known(settings.project.as_str()))?;
    stack.export("region", Output::known(settings.region.as_str()))?;
    stack.export("service_account_email", deployer.output("email")?)?;
    stack.export("artifact_registry_repository", registry.output("name")?)?;
    stack.export("service_account_key_base64", private_key.clone())?;
    // The engine hands the key back decoded already; re-wrapping only restates
    // that it is secret.
    stack.export("service_account_key_json", private_key.clone().secret())?;
    stack.export(
        "github_secret_setup_commands",
        Output::known(github_secret_setup_commands(&settings.project)).after(&private_key),
    )?;
    Ok(())
}
