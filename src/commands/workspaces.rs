//! Opening workspaces and resolving command arguments against them

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use hoist::domain::ports::{DeletePrompt, FixedAnswer};
use hoist::{
    default_registry, CatalogTranslatorFactory, DialoguerPrompt, HoistError,
    JsonSettingsRepository, Package, PluginDeployer, RuntimeConfig, Target, Workspace,
    WorkspaceContext, WorkspaceId,
};

/// Open and initialize one workspace per root, all sharing one context
pub async fn open(roots: &[PathBuf], yes: bool) -> Result<Vec<Arc<Workspace>>> {
    let runtime = RuntimeConfig::from_env();
    let prompt: Arc<dyn DeletePrompt> = if yes {
        Arc::new(FixedAnswer(true))
    } else {
        Arc::new(DialoguerPrompt::new())
    };
    let deployer = PluginDeployer::new(Arc::new(default_registry()), prompt);
    let context = Arc::new(WorkspaceContext::new(
        Arc::new(JsonSettingsRepository::new()),
        Arc::new(CatalogTranslatorFactory::new()),
        Arc::new(deployer),
        &runtime,
    ));

    let mut workspaces = Vec::with_capacity(roots.len());
    for (index, root) in roots.iter().enumerate() {
        let folder = std::fs::canonicalize(root)
            .with_context(|| format!("workspace folder not found: {}", root.display()))?;
        let workspace = Workspace::new(
            WorkspaceId::new(format!("ws{}", index)),
            &folder,
            Arc::clone(&context),
        );
        workspace.initialize().await;
        workspaces.push(workspace);
    }
    Ok(workspaces)
}

/// First workspace declaring a package with that name
pub fn find_package<'a>(
    workspaces: &'a [Arc<Workspace>],
    name: &str,
) -> Result<(&'a Arc<Workspace>, Package)> {
    workspaces
        .iter()
        .find_map(|ws| ws.find_package(name).map(|p| (ws, p)))
        .ok_or_else(|| HoistError::NoSuchPackage(name.to_string()).into())
}

/// First workspace declaring a target with that name
pub fn find_target<'a>(
    workspaces: &'a [Arc<Workspace>],
    name: &str,
) -> Result<(&'a Arc<Workspace>, Target)> {
    workspaces
        .iter()
        .find_map(|ws| ws.find_target(name).map(|t| (ws, t)))
        .ok_or_else(|| HoistError::NoSuchTarget(name.to_string()).into())
}

/// Absolute form of a file argument plus the workspace containing it
pub fn locate_file<'a>(
    workspaces: &'a [Arc<Workspace>],
    file: &Path,
) -> Result<(&'a Arc<Workspace>, PathBuf)> {
    let absolute = if file.is_absolute() {
        file.to_path_buf()
    } else {
        std::env::current_dir()?.join(file)
    };

    match workspaces.iter().find(|ws| ws.is_path_of(&absolute)) {
        Some(ws) => Ok((ws, absolute)),
        None => Err(HoistError::NotInWorkspace {
            path: absolute,
            root: workspaces
                .first()
                .map(|ws| ws.folder().to_path_buf())
                .unwrap_or_default(),
        }
        .into()),
    }
}

/// Target of that name inside `workspace`
pub fn target_in(workspace: &Workspace, name: &str) -> Result<Target> {
    workspace
        .find_target(name)
        .ok_or_else(|| HoistError::NoSuchTarget(name.to_string()).into())
}
