use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::json;

use crate::domain::ports::{ConfigReloaded, Translator};

struct StaticRepository(ConfigSnapshot);

#[async_trait]
impl ConfigRepository for StaticRepository {
    async fn is_file(&self, _path: &Path) -> Result<bool> {
        Ok(false)
    }

    async fn load(&self, _source: &ConfigSource) -> Result<ConfigSnapshot> {
        Ok(self.0.clone())
    }
}

struct NoTranslations;

#[async_trait]
impl TranslatorFactory for NoTranslations {
    async fn create(&self, _snapshot: &ConfigSnapshot) -> Result<Arc<dyn Translator>> {
        Err(anyhow!("no catalogs"))
    }
}

#[derive(Default)]
struct RecordingOperations {
    calls: Mutex<Vec<String>>,
}

impl RecordingOperations {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeployOperations for RecordingOperations {
    async fn deploy_file_to(&self, _ws: &Workspace, file: &Path, target: &Target) -> HoistResult<()> {
        self.record(format!("deploy_file_to {} {}", file.display(), target.name()));
        Ok(())
    }

    async fn deploy_package(&self, _ws: &Workspace, package: &Package) -> HoistResult<usize> {
        self.record(format!("deploy_package {}", package.name()));
        Ok(1)
    }

    async fn deploy_on_change(&self, _ws: &Workspace, file: &Path) -> HoistResult<usize> {
        self.record(format!("deploy_on_change {}", file.display()));
        Ok(1)
    }

    async fn deploy_on_save(&self, _ws: &Workspace, file: &Path) -> HoistResult<usize> {
        self.record(format!("deploy_on_save {}", file.display()));
        Ok(1)
    }

    async fn pull_file_from(&self, _ws: &Workspace, file: &Path, target: &Target) -> HoistResult<()> {
        self.record(format!("pull_file_from {} {}", file.display(), target.name()));
        Ok(())
    }

    async fn pull_package(&self, _ws: &Workspace, package: &Package) -> HoistResult<usize> {
        self.record(format!("pull_package {}", package.name()));
        Ok(1)
    }

    async fn delete_file_in(&self, _ws: &Workspace, file: &Path, target: &Target, ask: bool) -> HoistResult<()> {
        self.record(format!("delete_file_in {} {} {}", file.display(), target.name(), ask));
        Ok(())
    }

    async fn delete_package(&self, _ws: &Workspace, package: &Package, ask: bool) -> HoistResult<usize> {
        self.record(format!("delete_package {} {}", package.name(), ask));
        Ok(1)
    }

    async fn remove_on_change(&self, _ws: &Workspace, file: &Path) -> HoistResult<usize> {
        self.record(format!("remove_on_change {}", file.display()));
        Ok(1)
    }

    async fn list_directory(&self, _ws: &Workspace, target: &Target, dir: &str) -> HoistResult<Vec<RemoteEntry>> {
        self.record(format!("list_directory {} {}", target.name(), dir));
        Ok(Vec::new())
    }
}

fn settings() -> ConfigSnapshot {
    ConfigSnapshot::from_value(json!({
        "packages": [
            {"name": "Web", "files": ["src/**"], "targets": ["prod"], "deployOnChange": true},
            {"name": "web"}
        ],
        "targets": [{"name": "prod", "type": "local", "dir": "/srv/prod"}]
    }))
}

fn context(snapshot: ConfigSnapshot) -> (Arc<WorkspaceContext>, Arc<RecordingOperations>) {
    let operations = Arc::new(RecordingOperations::default());
    let runtime = RuntimeConfig::default().with_retry_delay(Duration::from_millis(2));
    let context = WorkspaceContext::new(
        Arc::new(StaticRepository(snapshot)),
        Arc::new(NoTranslations),
        operations.clone(),
        &runtime,
    );
    (Arc::new(context), operations)
}

async fn workspace() -> (Arc<Workspace>, Arc<RecordingOperations>) {
    let (context, operations) = context(settings());
    let ws = Workspace::new(WorkspaceId::new("ws1"), "/proj", context);
    assert!(ws.initialize().await);
    (ws, operations)
}

struct Recorder {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
}

impl Disposable for Recorder {
    fn dispose(&mut self) -> Result<()> {
        self.log.lock().unwrap().push(self.label);
        if self.fail {
            return Err(anyhow!("release failed"));
        }
        Ok(())
    }
}

#[tokio::test]
async fn lifecycle_transitions() {
    let (context, _) = context(settings());
    let ws = Workspace::new(WorkspaceId::new("ws1"), "/proj", context);

    assert_eq!(ws.state(), WorkspaceState::Created);
    assert!(ws.initialize().await);
    assert_eq!(ws.state(), WorkspaceState::Initialized);
    assert!(!ws.initialize().await);

    ws.dispose();
    ws.dispose();
    assert_eq!(ws.state(), WorkspaceState::Disposed);
    assert!(!ws.initialize().await);
}

#[tokio::test]
async fn dispose_before_initialize_is_terminal() {
    let (context, _) = context(settings());
    let ws = Workspace::new(WorkspaceId::new("ws1"), "/proj", context);

    ws.dispose();

    assert!(!ws.initialize().await);
    assert!(ws.get_packages().is_empty());
}

#[tokio::test]
async fn disposed_workspace_answers_no_descriptors() {
    let (ws, _) = workspace().await;
    let package = ws.find_package("web").unwrap();
    let target = ws.find_target("prod").unwrap();

    ws.dispose();

    assert!(ws.get_packages().is_empty());
    assert!(ws.get_targets().is_empty());
    assert!(ws.config().is_empty());
    assert_eq!(ws.package_id(&package), None);
    assert_eq!(ws.target_id(&target), None);
    assert!(!ws.can_be_handled_by_me(&package));
}

#[tokio::test]
async fn packages_carry_identity_and_search_key() {
    let (ws, _) = workspace().await;

    let packages = ws.get_packages();

    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].search_key(), "web");
    assert_eq!(packages[1].search_key(), "web");
    assert_ne!(packages[0].identity(), packages[1].identity());
    assert!(packages[0].identity().starts_with("ws1\n0\nweb\n"));
    assert_eq!(ws.package_id(&packages[1]).as_deref(), Some(packages[1].identity()));
}

#[tokio::test]
async fn find_by_name_is_case_insensitive() {
    let (ws, _) = workspace().await;

    assert_eq!(ws.find_package("  WEB ").map(|p| p.index()), Some(0));
    assert_eq!(ws.find_target("Prod").map(|t| t.name()), Some("prod".to_string()));
    assert!(ws.find_target("staging").is_none());
}

#[tokio::test]
async fn foreign_descriptors_have_no_id() {
    let (ws, _) = workspace().await;
    let (other_context, _) = context(settings());
    let other = Workspace::new(WorkspaceId::new("ws2"), "/proj", other_context);
    other.initialize().await;

    let foreign = other.get_packages().remove(0);
    let foreign_target = other.get_targets().remove(0);

    assert_eq!(ws.package_id(&foreign), None);
    assert_eq!(ws.target_id(&foreign_target), None);
    // same folder, so still handled here
    assert!(ws.can_be_handled_by_me(&foreign));

    let elsewhere = Workspace::new(WorkspaceId::new("ws3"), "/elsewhere", context(settings()).0);
    elsewhere.initialize().await;
    assert!(!ws.can_be_handled_by_me(&elsewhere.get_packages()[0]));
}

#[tokio::test]
async fn foreign_package_is_rejected_by_transfers() {
    let (ws, operations) = workspace().await;
    let (other_context, _) = context(settings());
    let other = Workspace::new(WorkspaceId::new("ws2"), "/other", other_context);
    other.initialize().await;

    let err = ws.deploy_package(&other.get_packages()[0]).await.unwrap_err();

    assert!(matches!(err, HoistError::NotOwned(name) if name == "Web"));
    assert!(operations.calls().is_empty());
}

#[tokio::test]
async fn transfers_are_forwarded() {
    let (ws, operations) = workspace().await;
    let package = ws.find_package("web").unwrap();
    let target = ws.find_target("prod").unwrap();

    ws.deploy_package(&package).await.unwrap();
    ws.pull_package(&package).await.unwrap();
    ws.delete_package(&package, false).await.unwrap();
    ws.deploy_file_to(Path::new("/proj/src/a.ts"), &target).await.unwrap();
    ws.pull_file_from(Path::new("/proj/src/a.ts"), &target).await.unwrap();
    ws.delete_file_in(Path::new("/proj/src/a.ts"), &target, true).await.unwrap();
    ws.list_directory(&target, "src").await.unwrap();

    assert_eq!(
        operations.calls(),
        vec![
            "deploy_package Web",
            "pull_package Web",
            "delete_package Web false",
            "deploy_file_to /proj/src/a.ts prod",
            "pull_file_from /proj/src/a.ts prod",
            "delete_file_in /proj/src/a.ts prod true",
            "list_directory prod src",
        ]
    );
}

#[tokio::test]
async fn transfers_after_dispose_are_rejected() {
    let (ws, operations) = workspace().await;
    let package = ws.find_package("web").unwrap();

    ws.dispose();

    assert!(matches!(
        ws.deploy_package(&package).await,
        Err(HoistError::Disposed(id)) if id == "ws1"
    ));
    assert!(operations.calls().is_empty());
}

#[tokio::test]
async fn file_events_route_by_change_type() {
    let (ws, operations) = workspace().await;

    let changed = ws
        .on_file_event(Path::new("/proj/src/a.ts"), FileChangeType::Changed)
        .await
        .unwrap();
    ws.on_file_event(Path::new("/proj/src/b.ts"), FileChangeType::Created)
        .await
        .unwrap();
    ws.on_file_event(Path::new("/proj/src/c.ts"), FileChangeType::Deleted)
        .await
        .unwrap();

    assert_eq!(changed, ChangeOutcome::Dispatched);
    assert_eq!(
        operations.calls(),
        vec![
            "deploy_on_change /proj/src/a.ts",
            "deploy_on_change /proj/src/b.ts",
            "remove_on_change /proj/src/c.ts",
        ]
    );
    assert!(ws.context().change_table().is_empty());
}

#[tokio::test]
async fn settings_folder_never_auto_deploys() {
    let (ws, operations) = workspace().await;

    let outcome = ws
        .on_file_event(Path::new("/proj/.vscode/settings.json"), FileChangeType::Changed)
        .await
        .unwrap();
    ws.on_file_event(Path::new("/proj/.vscode/tasks.json"), FileChangeType::Deleted)
        .await
        .unwrap();
    let saved = ws
        .on_document_saved(Path::new("/proj/.vscode/settings.json"))
        .await
        .unwrap();

    assert_eq!(outcome, ChangeOutcome::Dispatched);
    assert_eq!(saved, 0);
    assert!(operations.calls().is_empty());
}

#[tokio::test]
async fn outside_paths_are_ignored() {
    let (ws, operations) = workspace().await;

    let outcome = ws
        .on_file_event(Path::new("/proj2/a.ts"), FileChangeType::Changed)
        .await
        .unwrap();

    assert_eq!(outcome, ChangeOutcome::Ignored);
    assert!(operations.calls().is_empty());
}

#[tokio::test]
async fn document_save_leaves_membership_to_operations() {
    let (ws, operations) = workspace().await;

    ws.on_document_saved(Path::new("/other/a.ts")).await.unwrap();

    assert_eq!(operations.calls(), vec!["deploy_on_save /other/a.ts"]);
}

#[tokio::test]
async fn document_save_routes_to_save_deploy() {
    let (ws, operations) = workspace().await;

    ws.on_document_saved(Path::new("/proj/src/a.ts")).await.unwrap();

    assert_eq!(operations.calls(), vec!["deploy_on_save /proj/src/a.ts"]);
}

#[tokio::test]
async fn relative_event_paths_resolve_against_root() {
    let (ws, operations) = workspace().await;

    ws.on_file_event(Path::new("src/./a.ts"), FileChangeType::Changed)
        .await
        .unwrap();

    assert_eq!(operations.calls(), vec!["deploy_on_change /proj/src/a.ts"]);
}

#[tokio::test]
async fn change_table_is_shared_across_workspaces() {
    let (context, operations) = context(settings());
    let first = Workspace::new(WorkspaceId::new("a"), "/proj", context.clone());
    let second = Workspace::new(WorkspaceId::new("b"), "/proj", context.clone());
    first.initialize().await;
    second.initialize().await;

    let held = context
        .change_table()
        .try_acquire("/proj/src/a.ts", FileChangeType::Changed)
        .unwrap();

    let outcome = second
        .on_file_event_with_retry(Path::new("/proj/src/a.ts"), FileChangeType::Changed, false)
        .await
        .unwrap();
    assert_eq!(outcome, ChangeOutcome::Skipped);

    let deferred = first
        .on_file_event(Path::new("/proj/src/a.ts"), FileChangeType::Changed)
        .await
        .unwrap();
    assert_eq!(deferred, ChangeOutcome::Deferred);

    drop(held);
    context.scheduler.wait_idle().await;

    assert_eq!(operations.calls(), vec!["deploy_on_change /proj/src/a.ts"]);
}

#[tokio::test]
async fn events_after_dispose_are_ignored() {
    let (ws, operations) = workspace().await;
    ws.dispose();

    let outcome = ws
        .on_file_event(Path::new("/proj/src/a.ts"), FileChangeType::Changed)
        .await
        .unwrap();

    assert_eq!(outcome, ChangeOutcome::Ignored);
    assert_eq!(ws.on_configuration_changed().await, ReloadOutcome::Skipped);
    assert!(operations.calls().is_empty());
}

#[tokio::test]
async fn dispose_releases_in_reverse_order_despite_failures() {
    let (ws, _) = workspace().await;
    let log = Arc::new(Mutex::new(Vec::new()));
    for (label, fail) in [("first", false), ("second", true), ("third", false)] {
        ws.register_disposable(Box::new(Recorder {
            label,
            log: log.clone(),
            fail,
        }))
        .unwrap();
    }

    ws.dispose();
    ws.dispose();

    assert_eq!(*log.lock().unwrap(), vec!["third", "second", "first"]);
}

#[tokio::test]
async fn registering_after_dispose_releases_immediately() {
    let (ws, _) = workspace().await;
    ws.dispose();
    let log = Arc::new(Mutex::new(Vec::new()));

    let result = ws.register_disposable(Box::new(Recorder {
        label: "late",
        log: log.clone(),
        fail: false,
    }));

    assert!(result.is_err());
    assert_eq!(*log.lock().unwrap(), vec!["late"]);
}

#[tokio::test]
async fn reload_notifies_subscribers() {
    let (ws, _) = workspace().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let id = ws.subscribe(Arc::new(move |event: &ConfigReloaded<'_>| -> Result<()> {
        assert_eq!(event.workspace.id().as_str(), "ws1");
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));

    assert_eq!(ws.on_configuration_changed().await, ReloadOutcome::Loaded);
    assert!(ws.unsubscribe(id));
    ws.on_configuration_changed().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn translation_falls_back_to_key() {
    let (ws, _) = workspace().await;
    assert_eq!(ws.t("deploy.finished", &["3"]), "deploy.finished");
}

#[tokio::test]
async fn path_helpers() {
    let (ws, _) = workspace().await;

    assert_eq!(ws.name(), "proj");
    assert!(ws.is_path_of(Path::new("/proj/src/a.ts")));
    assert!(!ws.is_path_of(Path::new("/project/a.ts")));
    assert_eq!(ws.to_relative_path(Path::new("/proj/src/a.ts")).as_deref(), Some("src/a.ts"));
    assert_eq!(ws.to_full_path("src/a.ts"), Some(PathBuf::from("/proj/src/a.ts")));
    assert_eq!(
        ws.to_name_and_path(Path::new("/proj/a.ts")),
        Some(NameAndPath {
            name: "a.ts".to_string(),
            path: String::new()
        })
    );
    assert!(ws.is_settings_file(Path::new("/proj/.vscode/settings.json")));
    assert!(!ws.is_settings_file(Path::new("/proj/.vscode/tasks.json")));
}

#[tokio::test]
async fn package_membership_uses_filter() {
    let (ws, _) = workspace().await;
    let web = ws.find_package("web").unwrap();

    assert!(ws.package_contains(&web, Path::new("/proj/src/a.ts")).unwrap());
    assert!(!ws.package_contains(&web, Path::new("/proj/docs/a.md")).unwrap());
    assert!(!ws.package_contains(&web, Path::new("/other/src/a.ts")).unwrap());
}
