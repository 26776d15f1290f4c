//! Workspace lifecycle
//!
//! A [`Workspace`] is one opened project folder. It owns the folder's
//! [`ConfigStore`], turns its snapshot into package and target descriptors,
//! filters file events by containment and the settings folder, and forwards
//! transfers to the shared [`DeployOperations`].
//!
//! ```text
//! Created ──initialize──▶ Initialized ──dispose──▶ Disposed
//!    └────────────────────dispose─────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use async_trait::async_trait;

use crate::application::change_table::ChangeTable;
use crate::application::config_store::{ConfigStore, ReloadOutcome};
use crate::application::debounce::{ChangeDebouncer, ChangeHandler, ChangeOutcome};
use crate::application::files::{find_files, FileMatcher};
use crate::application::operations::DeployOperations;
use crate::application::retry::RetryScheduler;
use crate::config::RuntimeConfig;
use crate::domain::entities::{
    Descriptor, DescriptorKind, Package, PackageKind, Target, TargetKind, WorkspaceId,
    WorkspaceRoot,
};
use crate::domain::ports::{
    ConfigReloadListener, ConfigRepository, Disposable, ListenerId, RemoteEntry,
    TranslatorFactory,
};
use crate::domain::services::{assign_identities, identity_of};
use crate::domain::value_objects::{path, ConfigSnapshot, ConfigSource, FileChangeType, FileFilter, NameAndPath};
use crate::error::{HoistError, HoistResult};

/// Services shared by every workspace of the process
pub struct WorkspaceContext {
    pub repository: Arc<dyn ConfigRepository>,
    pub translators: Arc<dyn TranslatorFactory>,
    pub operations: Arc<dyn DeployOperations>,
    pub debouncer: ChangeDebouncer,
    pub scheduler: RetryScheduler,
}

impl WorkspaceContext {
    /// A context with a fresh change table and retry scheduler
    pub fn new(
        repository: Arc<dyn ConfigRepository>,
        translators: Arc<dyn TranslatorFactory>,
        operations: Arc<dyn DeployOperations>,
        runtime: &RuntimeConfig,
    ) -> Self {
        let scheduler = RetryScheduler::new(runtime.retry_delay);
        let debouncer = ChangeDebouncer::new(Arc::new(ChangeTable::new()), scheduler.clone());
        Self {
            repository,
            translators,
            operations,
            debouncer,
            scheduler,
        }
    }

    /// The change table shared by every workspace built on this context
    pub fn change_table(&self) -> &Arc<ChangeTable> {
        self.debouncer.table()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceState {
    Created,
    Initialized,
    Disposed,
}

pub struct Workspace {
    root: Arc<WorkspaceRoot>,
    context: Arc<WorkspaceContext>,
    store: Arc<ConfigStore>,
    state: Mutex<WorkspaceState>,
    disposables: Mutex<Vec<Box<dyn Disposable>>>,
    me: Weak<Workspace>,
}

impl Workspace {
    pub fn new(id: WorkspaceId, folder: impl AsRef<Path>, context: Arc<WorkspaceContext>) -> Arc<Self> {
        let root = Arc::new(WorkspaceRoot::new(id, folder));
        let store = ConfigStore::new(
            Arc::clone(&root),
            Arc::clone(&context.repository),
            Arc::clone(&context.translators),
            context.scheduler.clone(),
        );
        Arc::new_cyclic(|me| Self {
            root,
            context,
            store,
            state: Mutex::new(WorkspaceState::Created),
            disposables: Mutex::new(Vec::new()),
            me: me.clone(),
        })
    }

    pub fn id(&self) -> &WorkspaceId {
        self.root.id()
    }

    pub fn root(&self) -> &Arc<WorkspaceRoot> {
        &self.root
    }

    pub fn folder(&self) -> &Path {
        self.root.folder()
    }

    /// Display name: the last segment of the folder
    pub fn name(&self) -> String {
        self.root.name()
    }

    pub fn context(&self) -> &Arc<WorkspaceContext> {
        &self.context
    }

    pub fn state(&self) -> WorkspaceState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == WorkspaceState::Disposed
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Discover settings and load them. Returns false if already initialized
    /// or disposed.
    pub async fn initialize(&self) -> bool {
        if self.state() != WorkspaceState::Created {
            return false;
        }
        if !self.store.initialize().await {
            return false;
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == WorkspaceState::Disposed {
            return false;
        }
        *state = WorkspaceState::Initialized;
        tracing::info!(workspace = %self.id(), folder = %self.folder().display(), "workspace initialized");
        true
    }

    /// Release listeners and held resources. Safe to call repeatedly.
    pub fn dispose(&self) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state == WorkspaceState::Disposed {
                return;
            }
            *state = WorkspaceState::Disposed;
        }

        self.store.close();

        let held = std::mem::take(&mut *self.disposables.lock().unwrap_or_else(PoisonError::into_inner));
        for mut disposable in held.into_iter().rev() {
            if let Err(err) = disposable.dispose() {
                tracing::warn!(workspace = %self.id(), error = %err, "failed to release resource");
            }
        }
        tracing::debug!(workspace = %self.id(), "workspace disposed");
    }

    /// Keep `resource` until the workspace is disposed.
    ///
    /// On an already disposed workspace the resource is released right away.
    pub fn register_disposable(&self, mut resource: Box<dyn Disposable>) -> HoistResult<()> {
        {
            let mut held = self.disposables.lock().unwrap_or_else(PoisonError::into_inner);
            if !self.is_disposed() {
                held.push(resource);
                return Ok(());
            }
        }
        if let Err(err) = resource.dispose() {
            tracing::warn!(workspace = %self.id(), error = %err, "failed to release resource");
        }
        Err(self.disposed_error())
    }

    /// Be notified after every configuration reload
    pub fn subscribe(&self, listener: Arc<dyn ConfigReloadListener>) -> ListenerId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    fn ensure_active(&self) -> HoistResult<()> {
        if self.is_disposed() {
            return Err(self.disposed_error());
        }
        Ok(())
    }

    fn disposed_error(&self) -> HoistError {
        HoistError::Disposed(self.id().to_string())
    }

    // ── Configuration ──────────────────────────────────────────────────

    /// Active configuration snapshot; empty once disposed
    pub fn config(&self) -> Arc<ConfigSnapshot> {
        self.store.snapshot()
    }

    /// Where settings are read from; the default location before discovery
    pub fn config_source(&self) -> ConfigSource {
        self.store
            .source()
            .cloned()
            .unwrap_or_else(|| ConfigSource::default_for(self.folder()))
    }

    pub async fn reload_configuration(&self, retry: bool) -> ReloadOutcome {
        if self.is_disposed() {
            return ReloadOutcome::Skipped;
        }
        self.store.reload_configuration(retry).await
    }

    /// Settings changed on disk or in the host
    pub async fn on_configuration_changed(&self) -> ReloadOutcome {
        self.reload_configuration(true).await
    }

    /// Translate `key`, filling `{0}`, `{1}`, ... from `args`
    pub fn t(&self, key: &str, args: &[&str]) -> String {
        self.store.translate(key, args)
    }

    // ── Descriptors ────────────────────────────────────────────────────

    /// Packages of the active snapshot, freshly derived on every call
    pub fn get_packages(&self) -> Vec<Package> {
        self.descriptors::<PackageKind>()
    }

    /// Targets of the active snapshot, freshly derived on every call
    pub fn get_targets(&self) -> Vec<Target> {
        self.descriptors::<TargetKind>()
    }

    fn descriptors<K: DescriptorKind>(&self) -> Vec<Descriptor<K>> {
        assign_identities(&self.config(), &self.root, &self.config_source())
    }

    /// First package answering to `name` (case and whitespace insensitive)
    pub fn find_package(&self, name: &str) -> Option<Package> {
        self.get_packages().into_iter().find(|p| p.matches_name(name))
    }

    /// First target answering to `name` (case and whitespace insensitive)
    pub fn find_target(&self, name: &str) -> Option<Target> {
        self.get_targets().into_iter().find(|t| t.matches_name(name))
    }

    /// Whether the descriptor's owner lives in the same folder as this
    /// workspace
    pub fn can_be_handled_by_me<K: DescriptorKind>(&self, descriptor: &Descriptor<K>) -> bool {
        !self.is_disposed()
            && descriptor
            .owner()
            .is_some_and(|owner| owner.same_folder(&self.root))
    }

    fn owns<K: DescriptorKind>(&self, descriptor: &Descriptor<K>) -> bool {
        !self.is_disposed()
            && descriptor
            .owner()
            .is_some_and(|owner| Arc::ptr_eq(&owner, &self.root))
    }

    /// Identity of `package`, or `None` if another workspace owns it
    pub fn package_id(&self, package: &Package) -> Option<String> {
        self.descriptor_id(package)
    }

    /// Identity of `target`, or `None` if another workspace owns it
    pub fn target_id(&self, target: &Target) -> Option<String> {
        self.descriptor_id(target)
    }

    fn descriptor_id<K: DescriptorKind>(&self, descriptor: &Descriptor<K>) -> Option<String> {
        if !self.owns(descriptor) {
            return None;
        }
        Some(identity_of(&self.root, descriptor, &self.config_source()))
    }

    fn ensure_owned<K: DescriptorKind>(&self, descriptor: &Descriptor<K>) -> HoistResult<()> {
        if self.owns(descriptor) {
            Ok(())
        } else {
            Err(HoistError::NotOwned(descriptor.name()))
        }
    }

    // ── Paths ──────────────────────────────────────────────────────────

    /// Absolute, separator-uniform form of `file` (relative input resolves
    /// against the workspace folder)
    pub fn resolve_path(&self, file: &Path) -> String {
        path::resolve(&path::path_to_string(file), &self.root.folder_str())
    }

    /// Root-relative path of `file`, or `None` outside the workspace
    pub fn to_relative_path(&self, file: &Path) -> Option<String> {
        path::to_workspace_relative(&path::path_to_string(file), &self.root.folder_str())
    }

    /// Absolute path of a root-relative `relative`, if it stays inside
    pub fn to_full_path(&self, relative: &str) -> Option<PathBuf> {
        path::to_full_path(relative, &self.root.folder_str()).map(PathBuf::from)
    }

    pub fn to_name_and_path(&self, file: &Path) -> Option<NameAndPath> {
        path::split_name_and_path(&path::path_to_string(file), &self.root.folder_str())
    }

    /// Whether `file` lies inside this workspace
    pub fn is_path_of(&self, file: &Path) -> bool {
        self.to_relative_path(file).is_some()
    }

    /// Whether `file` is inside the directory holding the settings file
    pub fn is_in_settings_folder(&self, file: &Path) -> bool {
        let source = self.config_source();
        path::is_inside_settings_folder(
            &path::path_to_string(file),
            &path::path_to_string(source.settings_dir()),
        )
    }

    /// Whether `file` is the active settings file itself
    pub fn is_settings_file(&self, file: &Path) -> bool {
        let source = self.config_source();
        path::resolve(&path::path_to_string(file), "")
            == path::resolve(&path::path_to_string(source.resource()), "")
    }

    /// Files selected by `filter`, sorted
    pub async fn find_files_by_filter(&self, filter: &FileFilter) -> HoistResult<Vec<PathBuf>> {
        self.ensure_active()?;
        find_files(self.folder(), filter).await
    }

    /// Whether `file` is selected by `package`'s filter
    pub fn package_contains(&self, package: &Package, file: &Path) -> HoistResult<bool> {
        let Some(relative) = self.to_relative_path(file) else {
            return Ok(false);
        };
        Ok(FileMatcher::new(self.folder(), &package.filter())?.is_match(&relative))
    }

    // ── Events ─────────────────────────────────────────────────────────

    /// A file was created, changed or deleted on disk
    pub async fn on_file_event(&self, file: &Path, change: FileChangeType) -> HoistResult<ChangeOutcome> {
        self.on_file_event_with_retry(file, change, true).await
    }

    /// Like [`Workspace::on_file_event`]; `retry` decides what happens when
    /// the same path is already being handled
    pub async fn on_file_event_with_retry(
        &self,
        file: &Path,
        change: FileChangeType,
        retry: bool,
    ) -> HoistResult<ChangeOutcome> {
        let Some(me) = self.me.upgrade() else {
            return Ok(ChangeOutcome::Ignored);
        };
        if self.is_disposed() {
            return Ok(ChangeOutcome::Ignored);
        }
        let key = self.resolve_path(file);
        self.context
            .debouncer
            .handle_change(&me, &key, change, retry)
            .await
    }

    /// A document was saved in the host. Package membership is left to the
    /// deploy operations.
    pub async fn on_document_saved(&self, file: &Path) -> HoistResult<usize> {
        if self.is_disposed() {
            return Ok(0);
        }
        self.deploy_on_save(file).await
    }

    // ── Auto-deploy (settings folder excluded) ─────────────────────────

    pub async fn deploy_on_change(&self, file: &Path) -> HoistResult<usize> {
        if self.is_in_settings_folder(file) {
            tracing::debug!(file = %file.display(), "settings folder, not deploying");
            return Ok(0);
        }
        self.context.operations.deploy_on_change(self, file).await
    }

    pub async fn deploy_on_save(&self, file: &Path) -> HoistResult<usize> {
        if self.is_in_settings_folder(file) {
            tracing::debug!(file = %file.display(), "settings folder, not deploying");
            return Ok(0);
        }
        self.context.operations.deploy_on_save(self, file).await
    }

    pub async fn remove_on_change(&self, file: &Path) -> HoistResult<usize> {
        if self.is_in_settings_folder(file) {
            tracing::debug!(file = %file.display(), "settings folder, not removing");
            return Ok(0);
        }
        self.context.operations.remove_on_change(self, file).await
    }

    // ── Transfers ──────────────────────────────────────────────────────

    pub async fn deploy_file_to(&self, file: &Path, target: &Target) -> HoistResult<()> {
        self.ensure_active()?;
        self.ensure_owned(target)?;
        self.context.operations.deploy_file_to(self, file, target).await
    }

    pub async fn deploy_package(&self, package: &Package) -> HoistResult<usize> {
        self.ensure_active()?;
        self.ensure_owned(package)?;
        self.context.operations.deploy_package(self, package).await
    }

    pub async fn pull_file_from(&self, file: &Path, target: &Target) -> HoistResult<()> {
        self.ensure_active()?;
        self.ensure_owned(target)?;
        self.context.operations.pull_file_from(self, file, target).await
    }

    pub async fn pull_package(&self, package: &Package) -> HoistResult<usize> {
        self.ensure_active()?;
        self.ensure_owned(package)?;
        self.context.operations.pull_package(self, package).await
    }

    pub async fn delete_file_in(
        &self,
        file: &Path,
        target: &Target,
        ask_for_delete_local_file: bool,
    ) -> HoistResult<()> {
        self.ensure_active()?;
        self.ensure_owned(target)?;
        self.context
            .operations
            .delete_file_in(self, file, target, ask_for_delete_local_file)
            .await
    }

    pub async fn delete_package(&self, package: &Package, ask_for_delete_local_files: bool) -> HoistResult<usize> {
        self.ensure_active()?;
        self.ensure_owned(package)?;
        self.context
            .operations
            .delete_package(self, package, ask_for_delete_local_files)
            .await
    }

    pub async fn list_directory(&self, target: &Target, dir: &str) -> HoistResult<Vec<RemoteEntry>> {
        self.ensure_active()?;
        self.ensure_owned(target)?;
        self.context.operations.list_directory(self, target, dir).await
    }
}

#[async_trait]
impl ChangeHandler for Workspace {
    fn accepts(&self, path: &str) -> bool {
        !self.is_disposed() && self.is_path_of(Path::new(path))
    }

    async fn dispatch(&self, path: &str, change: FileChangeType) -> HoistResult<()> {
        let file = Path::new(path);
        let count = if change.is_upload() {
            self.deploy_on_change(file).await?
        } else {
            self.remove_on_change(file).await?
        };
        tracing::debug!(workspace = %self.id(), path, %change, files = count, "change handled");
        Ok(())
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("id", self.id())
            .field("folder", &self.folder())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests;
