use crate::{common::read_file, TestCli};

#[test]
fn test_render_to_stdout() {
    let cli = TestCli::new();
    let program = cli.run(["--project", "acme-123", "render"]);
    assert!(program.contains("runtime: yaml"));
    assert!(program.contains("gcp:artifactregistry:Repository"));
    assert!(program.contains("dependsOn"));
    assert!(program.contains("fn::secret"));
    assert!(program.contains("${github-actions.email}"));
}

#[test]
fn test_render_to_file() {
    let cli = TestCli::new();
    let path = cli.config_path().with_file_name("Pulumi.yaml");
    assert_eq!(cli.run(["render", "--file", path.to_str().unwrap()]), "");

    let program = read_file(&path);
    assert!(program.starts_with("name: tower-defence-infra\n"));
    assert!(program.contains("project: game-zone-479009"));
}
