use pretty_assertions::assert_eq;

use crate::TestCli;

#[test]
fn test_first_stack_becomes_current() {
    let cli = TestCli::new();
    assert_eq!(cli.run(["config", "current"]), "");

    cli.run([
        "config", "add", "--name", "prod", "--project", "acme-123", "--region", "europe-west1",
    ]);
    assert_eq!(cli.run(["config", "current"]), "prod\n");
    assert!(cli.config_path().exists());

    let stacks: serde_json::Value =
        serde_json::from_str(&crate::common::read_file(cli.config_path())).unwrap();
    assert_eq!(stacks["current_stack"], "prod");
    assert_eq!(stacks["stacks"][0]["project"], "acme-123");
    assert_eq!(stacks["stacks"][0]["region"], "europe-west1");
}

#[test]
fn test_selected_stack_drives_settings() {
    let cli = TestCli::new();
    cli.run(["config", "add", "-n", "prod", "-p", "acme-123", "-r", "europe-west1"]);
    cli.run(["config", "add", "-n", "staging", "-p", "acme-staging"]);

    assert_eq!(cli.run(["outputs", "region"]), "europe-west1\n");
    assert_eq!(
        cli.run(["--stack", "staging", "outputs", "project_id"]),
        "acme-staging\n"
    );
    // Unset region falls back to the default.
    assert_eq!(
        cli.run(["--stack", "staging", "outputs", "region"]),
        "us-central1\n"
    );
    // Flags win over the stack.
    assert_eq!(
        cli.run(["--region", "asia-east1", "outputs", "region"]),
        "asia-east1\n"
    );

    cli.run(["config", "use", "staging"]);
    assert_eq!(cli.run(["config", "current"]), "staging\n");
}

#[test]
fn test_updating_a_stack_keeps_unset_fields() {
    let cli = TestCli::new();
    cli.run(["config", "add", "-n", "prod", "-p", "acme-123", "-r", "europe-west1"]);
    cli.run(["config", "add", "-n", "prod", "-r", "us-east1"]);

    assert_eq!(cli.run(["outputs", "project_id"]), "acme-123\n");
    assert_eq!(cli.run(["outputs", "region"]), "us-east1\n");
}

#[test]
fn test_delete_stack() {
    let cli = TestCli::new();
    cli.run(["config", "add", "-n", "prod", "-p", "acme-123"]);
    cli.run(["config", "delete", "prod"]);
    assert_eq!(cli.run(["config", "current"]), "");

    let error = cli.run_and_error(["--stack", "prod", "preview"]);
    assert!(error.contains("Unknown stack `prod`"), "{error}");
}

#[test]
fn test_invalid_project_is_rejected() {
    let cli = TestCli::new();
    let error = cli.run_and_error(["config", "add", "-n", "prod", "-p", "Not_A_Project"]);
    assert!(error.contains("Not_A_Project"), "{error}");
}
