//! Plugin-backed transfer operations
//!
//! Files keep their workspace-relative layout on the target: `src/a.ts` in the
//! workspace goes to `<target dir>/src/a.ts`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::operations::DeployOperations;
use crate::application::plugins::PluginRegistry;
use crate::application::workspace::Workspace;
use crate::domain::entities::{DeployOnSave, Package, Target};
use crate::domain::ports::{ClientError, DeletePrompt, RemoteEntry, TargetContext};
use crate::domain::value_objects::NameAndPath;
use crate::error::{HoistError, HoistResult};

/// [`DeployOperations`] over the registered target plugins
pub struct PluginDeployer {
    plugins: Arc<PluginRegistry>,
    prompt: Arc<dyn DeletePrompt>,
}

impl PluginDeployer {
    pub fn new(plugins: Arc<PluginRegistry>, prompt: Arc<dyn DeletePrompt>) -> Self {
        Self { plugins, prompt }
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    async fn upload(&self, ctx: &TargetContext, workspace: &Workspace, file: &Path) -> HoistResult<()> {
        let (local, location) = locate(workspace, file)?;
        let data = tokio::fs::read(&local).await?;
        let remote = ctx.file_path(&location.path, &location.name);
        ctx.client.put(&remote, data).await?;
        tracing::info!(file = %local.display(), target = %ctx.target.name(), remote = %remote, "deployed");
        Ok(())
    }

    async fn download(&self, ctx: &TargetContext, workspace: &Workspace, file: &Path) -> HoistResult<()> {
        let (local, location) = locate(workspace, file)?;
        let remote = ctx.file_path(&location.path, &location.name);
        let data = ctx.client.get(&remote).await?;
        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&local, data).await?;
        tracing::info!(file = %local.display(), target = %ctx.target.name(), remote = %remote, "pulled");
        Ok(())
    }

    async fn remove(&self, ctx: &TargetContext, workspace: &Workspace, file: &Path) -> HoistResult<()> {
        let (local, location) = locate(workspace, file)?;
        let remote = ctx.file_path(&location.path, &location.name);
        ctx.client.delete(&remote).await?;
        tracing::info!(file = %local.display(), target = %ctx.target.name(), remote = %remote, "deleted");
        Ok(())
    }

    async fn upload_to_all(&self, workspace: &Workspace, file: &Path, targets: &[Target]) -> HoistResult<usize> {
        let mut count = 0;
        for target in targets {
            let ctx = self.plugins.create_context(target).await?;
            self.upload(&ctx, workspace, file).await?;
            count += 1;
        }
        Ok(count)
    }

    async fn remove_local(&self, files: &[PathBuf]) -> HoistResult<()> {
        if files.is_empty() || !self.prompt.confirm_delete_local(files) {
            return Ok(());
        }
        for file in files {
            match tokio::fs::remove_file(file).await {
                Ok(()) => tracing::info!(file = %file.display(), "deleted local file"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

/// Absolute local path plus its name/directory split
fn locate(workspace: &Workspace, file: &Path) -> HoistResult<(PathBuf, NameAndPath)> {
    let location = workspace
        .to_name_and_path(file)
        .ok_or_else(|| HoistError::NotInWorkspace {
            path: file.to_path_buf(),
            root: workspace.folder().to_path_buf(),
        })?;
    Ok((PathBuf::from(workspace.resolve_path(file)), location))
}

/// Look up target names; every name must exist
fn resolve_targets(workspace: &Workspace, names: &[String]) -> HoistResult<Vec<Target>> {
    names
        .iter()
        .map(|name| {
            workspace
                .find_target(name)
                .ok_or_else(|| HoistError::NoSuchTarget(name.clone()))
        })
        .collect()
}

/// Targets of every package selecting `file` for which `pick` names targets,
/// each target once
fn auto_targets<F>(workspace: &Workspace, file: &Path, pick: F) -> HoistResult<Vec<Target>>
where
    F: Fn(&Package) -> Option<Vec<String>>,
{
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for package in workspace.get_packages() {
        let Some(names) = pick(&package) else {
            continue;
        };
        if !workspace.package_contains(&package, file)? {
            continue;
        }
        for target in resolve_targets(workspace, &names)? {
            if seen.insert(target.identity().to_string()) {
                targets.push(target);
            }
        }
    }
    Ok(targets)
}

#[async_trait]
impl DeployOperations for PluginDeployer {
    async fn deploy_file_to(&self, workspace: &Workspace, file: &Path, target: &Target) -> HoistResult<()> {
        let ctx = self.plugins.create_context(target).await?;
        self.upload(&ctx, workspace, file).await
    }

    async fn deploy_package(&self, workspace: &Workspace, package: &Package) -> HoistResult<usize> {
        let targets = resolve_targets(workspace, &package.target_names())?;
        if targets.is_empty() {
            tracing::warn!(package = %package.name(), "package has no targets");
            return Ok(0);
        }

        let files = workspace.find_files_by_filter(&package.filter()).await?;
        let mut count = 0;
        for target in &targets {
            let ctx = self.plugins.create_context(target).await?;
            for file in &files {
                self.upload(&ctx, workspace, file).await?;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn deploy_on_change(&self, workspace: &Workspace, file: &Path) -> HoistResult<usize> {
        let targets = auto_targets(workspace, file, |package| {
            package.deploy_on_change().then(|| package.target_names())
        })?;
        self.upload_to_all(workspace, file, &targets).await
    }

    async fn deploy_on_save(&self, workspace: &Workspace, file: &Path) -> HoistResult<usize> {
        let targets = auto_targets(workspace, file, |package| match package.deploy_on_save() {
            DeployOnSave::Disabled => None,
            DeployOnSave::PackageTargets => Some(package.target_names()),
            DeployOnSave::Targets(names) => Some(names),
        })?;
        self.upload_to_all(workspace, file, &targets).await
    }

    async fn pull_file_from(&self, workspace: &Workspace, file: &Path, target: &Target) -> HoistResult<()> {
        let ctx = self.plugins.create_context(target).await?;
        self.download(&ctx, workspace, file).await
    }

    async fn pull_package(&self, workspace: &Workspace, package: &Package) -> HoistResult<usize> {
        let targets = resolve_targets(workspace, &package.target_names())?;
        let files = workspace.find_files_by_filter(&package.filter()).await?;

        let mut count = 0;
        for target in &targets {
            let ctx = self.plugins.create_context(target).await?;
            for file in &files {
                match self.download(&ctx, workspace, file).await {
                    Ok(()) => count += 1,
                    Err(HoistError::Client(ClientError::NotFound(remote))) => {
                        tracing::debug!(remote = %remote, target = %target.name(), "not on target, skipping");
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(count)
    }

    async fn delete_file_in(
        &self,
        workspace: &Workspace,
        file: &Path,
        target: &Target,
        ask_for_delete_local_file: bool,
    ) -> HoistResult<()> {
        let ctx = self.plugins.create_context(target).await?;
        self.remove(&ctx, workspace, file).await?;
        if ask_for_delete_local_file {
            let (local, _) = locate(workspace, file)?;
            self.remove_local(&[local]).await?;
        }
        Ok(())
    }

    async fn delete_package(
        &self,
        workspace: &Workspace,
        package: &Package,
        ask_for_delete_local_files: bool,
    ) -> HoistResult<usize> {
        let targets = resolve_targets(workspace, &package.target_names())?;
        let files = workspace.find_files_by_filter(&package.filter()).await?;

        let mut count = 0;
        for target in &targets {
            let ctx = self.plugins.create_context(target).await?;
            for file in &files {
                self.remove(&ctx, workspace, file).await?;
                count += 1;
            }
        }

        if ask_for_delete_local_files {
            self.remove_local(&files).await?;
        }
        Ok(count)
    }

    async fn remove_on_change(&self, workspace: &Workspace, file: &Path) -> HoistResult<usize> {
        let targets = auto_targets(workspace, file, |package| {
            package.remove_on_change().then(|| package.target_names())
        })?;

        let mut count = 0;
        for target in &targets {
            let ctx = self.plugins.create_context(target).await?;
            self.remove(&ctx, workspace, file).await?;
            count += 1;
        }
        Ok(count)
    }

    async fn list_directory(
        &self,
        _workspace: &Workspace,
        target: &Target,
        dir: &str,
    ) -> HoistResult<Vec<RemoteEntry>> {
        let ctx = self.plugins.create_context(target).await?;
        Ok(ctx.client.list(&ctx.get_dir(dir)).await?)
    }
}
