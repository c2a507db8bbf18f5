use pretty_assertions::assert_eq;

use crate::TestCli;

#[test]
fn test_defaults() {
    let cli = TestCli::new();
    assert_eq!(cli.run(["outputs", "project_id"]), "game-zone-479009\n");
    assert_eq!(cli.run(["outputs", "region"]), "us-central1\n");
    assert_eq!(
        cli.run(["outputs", "service_account_email"]),
        "github-actions@game-zone-479009.iam.gserviceaccount.com\n"
    );
    assert_eq!(
        cli.run(["outputs", "artifact_registry_repository"]),
        "projects/game-zone-479009/locations/us/repositories/gcr.io\n"
    );
}

#[test]
fn test_key_material_is_unknown() {
    let cli = TestCli::new();
    for name in [
        "service_account_key_base64",
        "service_account_key_json",
        "github_secret_setup_commands",
    ] {
        assert_eq!(cli.run(["outputs", name]), "[unknown]\n");
    }
}

#[test]
fn test_output_as_json() {
    let cli = TestCli::new();
    let output: serde_json::Value = serde_json::from_str(
        &cli.run(["--project", "acme-123", "-o", "json", "outputs", "service_account_key_json"]),
    )
    .unwrap();
    assert_eq!(output["name"], "service_account_key_json");
    assert_eq!(output["known"], false);
    assert_eq!(output["secret"], true);
    assert!(output.get("value").is_none());
}

#[test]
fn test_all_outputs_as_json() {
    let cli = TestCli::new();
    let names: Vec<String> = cli
        .run(["-o", "json", "outputs"])
        .lines()
        .map(|line| {
            let output: serde_json::Value = serde_json::from_str(line).unwrap();
            output["name"].as_str().unwrap().to_owned()
        })
        .collect();
    assert_eq!(
        names,
        [
            "project_id",
            "region",
            "service_account_email",
            "artifact_registry_repository",
            "service_account_key_base64",
            "service_account_key_json",
            "github_secret_setup_commands",
        ]
    );
}

#[test]
fn test_unknown_output() {
    let cli = TestCli::new();
    let error = cli.run_and_error(["outputs", "kubeconfig"]);
    assert!(error.contains("has no output `kubeconfig`"), "{error}");
}
