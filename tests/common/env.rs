//! Isolated projects for workspace and CLI tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use hoist::domain::ports::FixedAnswer;
use hoist::{
    default_registry, CatalogTranslatorFactory, JsonSettingsRepository, PluginDeployer,
    RuntimeConfig, Workspace, WorkspaceContext, WorkspaceId,
};

/// Result of running the hoist binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Non-empty stdout lines parsed as JSON
    pub fn events(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

/// A workspace folder and a local target directory
pub struct TestProject {
    pub root: TempDir,
    pub target: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            target: tempfile::tempdir().unwrap(),
        }
    }

    /// Project with a `site` package (`src/**`) deploying to the local `dist` target
    pub fn with_site_package() -> Self {
        let project = Self::new();
        project.write_settings(json!({
            "packages": [{
                "name": "site",
                "files": ["src/**"],
                "targets": ["dist"],
                "deployOnChange": true,
                "removeOnChange": true
            }],
            "targets": [{
                "name": "dist",
                "type": "local",
                "dir": project.target_dir().to_string_lossy()
            }]
        }));
        project
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn target_dir(&self) -> &Path {
        self.target.path()
    }

    /// Write a file relative to the project root, creating parents
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Replace the deploy section of `.vscode/settings.json`
    pub fn write_settings(&self, section: Value) {
        let settings = json!({ "deploy.reloaded": section });
        self.write(
            ".vscode/settings.json",
            &serde_json::to_string_pretty(&settings).unwrap(),
        );
    }

    /// Contents of a deployed file, if present
    pub fn deployed(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.target_dir().join(relative)).ok()
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_hoist"))
            .current_dir(self.path())
            .env_remove("HOIST_LOG")
            .args(args)
            .output()
            .unwrap();
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Context wired to the real settings repository and local plugin;
/// never deletes local files
pub fn real_context() -> Arc<WorkspaceContext> {
    let runtime = RuntimeConfig::default().with_retry_delay(std::time::Duration::from_millis(10));
    let deployer = PluginDeployer::new(Arc::new(default_registry()), Arc::new(FixedAnswer(false)));
    Arc::new(WorkspaceContext::new(
        Arc::new(JsonSettingsRepository::new()),
        Arc::new(CatalogTranslatorFactory::new()),
        Arc::new(deployer),
        &runtime,
    ))
}

pub async fn open_workspace(
    project: &TestProject,
    id: &str,
    context: &Arc<WorkspaceContext>,
) -> Arc<Workspace> {
    let workspace = Workspace::new(WorkspaceId::new(id), project.path(), Arc::clone(context));
    assert!(workspace.initialize().await);
    workspace
}
