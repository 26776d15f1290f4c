//! Per-workspace configuration store
//!
//! Owns the active snapshot, the source it is read from, and the translator
//! derived from it. Reloads never overlap: a reload that finds another one
//! running either retries after a delay or returns without effect.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock, Weak};

use crate::application::retry::RetryScheduler;
use crate::domain::entities::WorkspaceRoot;
use crate::domain::ports::{
    format_positional, ConfigReloadListener, ConfigReloaded, ConfigRepository, ListenerId,
    Translator, TranslatorFactory, EVENT_CONFIG_RELOADED,
};
use crate::domain::value_objects::{ConfigSnapshot, ConfigSource, SETTINGS_FILE, SETTINGS_SECTION};

/// Lifecycle of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    /// Settings discovery and first load are running
    Resolving,
    Ready,
}

/// Result of one reload request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new snapshot was swapped in
    Loaded,
    /// Another reload was running; this one was rescheduled
    Deferred,
    /// Nothing was done (busy without retry, no source yet, or closed)
    Skipped,
    /// Fetching the snapshot failed; the previous one stays active
    Failed,
}

type ListenerList = Vec<(ListenerId, Arc<dyn ConfigReloadListener>)>;

pub struct ConfigStore {
    root: Arc<WorkspaceRoot>,
    repository: Arc<dyn ConfigRepository>,
    translators: Arc<dyn TranslatorFactory>,
    scheduler: RetryScheduler,
    state: Mutex<StoreState>,
    source: OnceLock<ConfigSource>,
    snapshot: RwLock<Option<Arc<ConfigSnapshot>>>,
    translator: RwLock<Option<Arc<dyn Translator>>>,
    reloading: AtomicBool,
    closed: AtomicBool,
    listeners: Mutex<ListenerList>,
    next_listener: AtomicU64,
    me: Weak<ConfigStore>,
}

impl ConfigStore {
    pub fn new(
        root: Arc<WorkspaceRoot>,
        repository: Arc<dyn ConfigRepository>,
        translators: Arc<dyn TranslatorFactory>,
        scheduler: RetryScheduler,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            root,
            repository,
            translators,
            scheduler,
            state: Mutex::new(StoreState::Uninitialized),
            source: OnceLock::new(),
            snapshot: RwLock::new(None),
            translator: RwLock::new(None),
            reloading: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            me: me.clone(),
        })
    }

    pub fn state(&self) -> StoreState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolved settings source; `None` until discovery has finished
    pub fn source(&self) -> Option<&ConfigSource> {
        self.source.get()
    }

    /// Active snapshot; empty before the first successful load
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default()
    }

    /// Whether a reload body is running right now
    pub fn is_reloading(&self) -> bool {
        self.reloading.load(Ordering::SeqCst)
    }

    /// Discover the settings source and perform the first load.
    ///
    /// Returns false when the store was already initialized (or is being
    /// initialized), true after the first successful initialization.
    pub async fn initialize(&self) -> bool {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state != StoreState::Uninitialized {
                return false;
            }
            *state = StoreState::Resolving;
        }

        let source = self.discover_source().await;
        tracing::debug!(
            workspace = %self.root.id(),
            resource = %source.resource().display(),
            section = source.section(),
            "settings source resolved"
        );
        let _ = self.source.set(source);

        self.reload_configuration(true).await;

        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = StoreState::Ready;
        true
    }

    /// Walk from the workspace root upwards looking for the settings file.
    async fn discover_source(&self) -> ConfigSource {
        let mut dir = self.root.folder().to_path_buf();
        loop {
            let candidate = dir.join(SETTINGS_FILE);
            match self.repository.is_file(&candidate).await {
                Ok(true) => return ConfigSource::new(candidate, SETTINGS_SECTION),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(
                        candidate = %candidate.display(),
                        error = %err,
                        "settings lookup failed, using default location"
                    );
                    break;
                }
            }

            match dir.parent() {
                Some(parent) if parent != dir && !parent.as_os_str().is_empty() => {
                    dir = parent.to_path_buf();
                }
                _ => break,
            }
        }

        ConfigSource::default_for(self.root.folder())
    }

    /// Reload the snapshot from the settings source.
    ///
    /// If a reload is already running, `retry` decides between scheduling
    /// this one again after the retry delay and dropping it.
    pub async fn reload_configuration(&self, retry: bool) -> ReloadOutcome {
        if self.closed.load(Ordering::SeqCst) {
            return ReloadOutcome::Skipped;
        }
        let Some(source) = self.source.get() else {
            tracing::debug!(workspace = %self.root.id(), "reload before discovery, ignoring");
            return ReloadOutcome::Skipped;
        };

        let Some(_guard) = ReloadGuard::try_take(&self.reloading) else {
            if retry {
                self.schedule_reload();
                return ReloadOutcome::Deferred;
            }
            return ReloadOutcome::Skipped;
        };

        let current = match self.repository.load(source).await {
            Ok(snapshot) => Arc::new(snapshot),
            Err(err) => {
                tracing::warn!(
                    workspace = %self.root.id(),
                    resource = %source.resource().display(),
                    error = %err,
                    "could not load settings"
                );
                return ReloadOutcome::Failed;
            }
        };

        let previous = {
            let mut slot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            // closed while loading
            if self.closed.load(Ordering::SeqCst) {
                return ReloadOutcome::Skipped;
            }
            std::mem::replace(&mut *slot, Some(Arc::clone(&current)))
        };

        self.notify_listeners(&current, previous.as_deref());
        self.rebuild_translator(&current).await;

        tracing::info!(workspace = %self.root.id(), "configuration reloaded");
        ReloadOutcome::Loaded
    }

    fn schedule_reload(&self) {
        let store = self.me.clone();
        let task: Pin<Box<dyn Future<Output = ()> + Send>> = Box::pin(async move {
            if let Some(store) = store.upgrade() {
                store.reload_configuration(true).await;
            }
        });
        self.scheduler.schedule(task);
    }

    fn notify_listeners(&self, current: &ConfigSnapshot, previous: Option<&ConfigSnapshot>) {
        let listeners: ListenerList = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let event = ConfigReloaded {
            workspace: &self.root,
            current,
            previous,
        };
        for (id, listener) in listeners {
            if let Err(err) = listener.on_config_reloaded(&event) {
                tracing::warn!(
                    workspace = %self.root.id(),
                    listener = id.0,
                    event = EVENT_CONFIG_RELOADED,
                    error = %err,
                    "listener failed"
                );
            }
        }
    }

    async fn rebuild_translator(&self, snapshot: &ConfigSnapshot) {
        *self.translator.write().unwrap_or_else(PoisonError::into_inner) = None;

        match self.translators.create(snapshot).await {
            Ok(translator) => {
                *self.translator.write().unwrap_or_else(PoisonError::into_inner) = Some(translator);
            }
            Err(err) => {
                tracing::warn!(
                    workspace = %self.root.id(),
                    error = %err,
                    "translations unavailable, falling back to message keys"
                );
            }
        }
    }

    /// Look up `key` and fill in positional arguments.
    ///
    /// Without a translator, or for an unknown key, the key is returned
    /// unchanged.
    pub fn translate(&self, key: &str, args: &[&str]) -> String {
        let translator = self
            .translator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match translator.and_then(|t| t.lookup(key)) {
            Some(template) => format_positional(&template, args),
            None => key.to_string(),
        }
    }

    pub fn subscribe(&self, listener: Arc<dyn ConfigReloadListener>) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Stop reloading, drop every listener and forget the active snapshot
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.translator.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Holds the reload flag; clears it on every exit path
struct ReloadGuard<'a>(&'a AtomicBool);

impl<'a> ReloadGuard<'a> {
    fn try_take(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
