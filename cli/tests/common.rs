use once_cell::sync::Lazy;
use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Command,
};
use tempfile::TempDir;

static CLI_PATH: Lazy<PathBuf> = Lazy::new(|| {
    env::current_exe()
        .ok()
        .and_then(|p| Some(p.parent()?.parent()?.join("infra")))
        .expect("Could not resolve CLI executable from test executable")
});

/// Runs the `infra` binary against a stacks file private to the test.
pub struct TestCli {
    config_dir: TempDir,
}

impl TestCli {
    pub fn new() -> Self {
        Self {
            config_dir: tempfile::tempdir().expect("Could not create config directory"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("stacks.json")
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&*CLI_PATH);
        command
            .arg("--config-file")
            .arg(self.config_path())
            .env_remove("RUST_LOG");
        command
    }

    pub fn run(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        self.output(self.command().args(args))
    }

    pub fn run_and_error(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        self.output_error(self.command().args(args))
    }

    pub fn output(&self, command: &mut Command) -> String {
        let output = command.output().unwrap();

        if !output.status.success() {
            panic!(
                "failed to run command:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        String::from_utf8(output.stdout).unwrap()
    }

    pub fn output_error(&self, command: &mut Command) -> String {
        let output = command.output().unwrap();

        if output.status.success() {
            panic!(
                "succeeded running command (expected failure):\n{}",
                String::from_utf8_lossy(&output.stdout)
            );
        }

        String::from_utf8(output.stderr).unwrap()
    }
}

pub fn read_file(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}
