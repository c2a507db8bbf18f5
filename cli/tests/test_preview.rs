use pretty_assertions::assert_eq;

use crate::TestCli;

#[test]
fn test_preview_as_json() {
    let cli = TestCli::new();
    let preview: serde_json::Value =
        serde_json::from_str(&cli.run(["--project", "acme-123", "-o", "json", "preview"]))
            .unwrap();

    assert_eq!(preview["stack"], "dev");
    let resources = preview["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 11);

    let keys: Vec<&str> = resources
        .iter()
        .map(|resource| resource["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        &keys[..5],
        [
            "enable-run-googleapis-com",
            "enable-containerregistry-googleapis-com",
            "enable-cloudbuild-googleapis-com",
            "enable-artifactregistry-googleapis-com",
            "github-actions",
        ]
    );

    let registry = resources
        .iter()
        .find(|resource| resource["key"] == "gcr-repository")
        .unwrap();
    assert_eq!(registry["type"], "gcp:artifactregistry:Repository");
    assert_eq!(registry["project"], "acme-123");
    assert_eq!(registry["depends_on"].as_array().unwrap().len(), 4);
}

#[test]
fn test_preview_single_resource() {
    let cli = TestCli::new();
    let resource: serde_json::Value = serde_json::from_str(&cli.run([
        "-o",
        "json",
        "preview",
        "--resource",
        "github-actions-key",
    ]))
    .unwrap();
    assert_eq!(resource["type"], "gcp:serviceaccount:Key");
    assert_eq!(resource["implicit_dependencies"][0], "github-actions");
}

#[test]
fn test_preview_unknown_resource() {
    let cli = TestCli::new();
    let error = cli.run_and_error(["preview", "--resource", "bucket"]);
    assert!(error.contains("has no resource `bucket`"), "{error}");
}

#[test]
fn test_preview_table_lists_resources() {
    let cli = TestCli::new();
    let table = cli.run(["preview"]);
    assert!(table.contains("gcp:projects:IAMMember"));
    assert!(table.contains("github-actions-roles-artifactregistry.admin"));
    assert!(table.contains("service_account_email"));
}
