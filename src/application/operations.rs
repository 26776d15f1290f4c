//! Deploy, pull and delete entry points
//!
//! The workspace routes every transfer through this trait without looking at
//! the result; failures propagate to whoever triggered the workspace call.

use std::path::Path;

use async_trait::async_trait;

use crate::application::workspace::Workspace;
use crate::domain::entities::{Package, Target};
use crate::domain::ports::RemoteEntry;
use crate::error::HoistResult;

/// Transfer operations invoked by a [`Workspace`]
///
/// Package-level operations return the number of files they touched.
#[async_trait]
pub trait DeployOperations: Send + Sync {
    async fn deploy_file_to(&self, workspace: &Workspace, file: &Path, target: &Target) -> HoistResult<()>;

    async fn deploy_package(&self, workspace: &Workspace, package: &Package) -> HoistResult<usize>;

    /// Deploy `file` for every package that has `deployOnChange` set
    async fn deploy_on_change(&self, workspace: &Workspace, file: &Path) -> HoistResult<usize>;

    /// Deploy `file` for every package that has `deployOnSave` set
    async fn deploy_on_save(&self, workspace: &Workspace, file: &Path) -> HoistResult<usize>;

    async fn pull_file_from(&self, workspace: &Workspace, file: &Path, target: &Target) -> HoistResult<()>;

    async fn pull_package(&self, workspace: &Workspace, package: &Package) -> HoistResult<usize>;

    async fn delete_file_in(
        &self,
        workspace: &Workspace,
        file: &Path,
        target: &Target,
        ask_for_delete_local_file: bool,
    ) -> HoistResult<()>;

    async fn delete_package(
        &self,
        workspace: &Workspace,
        package: &Package,
        ask_for_delete_local_files: bool,
    ) -> HoistResult<usize>;

    /// Remove `file` from the targets of every package with `removeOnChange`
    async fn remove_on_change(&self, workspace: &Workspace, file: &Path) -> HoistResult<usize>;

    /// List `dir` (relative to the target's root) on `target`
    async fn list_directory(
        &self,
        workspace: &Workspace,
        target: &Target,
        dir: &str,
    ) -> HoistResult<Vec<RemoteEntry>>;
}
