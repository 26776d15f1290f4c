//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod config_events;
pub mod config_repository;
pub mod delete_prompt;
pub mod disposable;
pub mod target_plugin;
pub mod translator;

pub use config_events::{ConfigReloadListener, ConfigReloaded, ListenerId, EVENT_CONFIG_RELOADED};
pub use config_repository::ConfigRepository;
pub use delete_prompt::{DeletePrompt, FixedAnswer};
pub use disposable::{Disposable, OnDispose};
pub use target_plugin::{
    join_target_dir, normalize_remote_path, ClientError, ClientResult, RemoteEntry,
    RemoteEntryKind, TargetClient, TargetContext, TargetPlugin,
};
pub use translator::{format_positional, Translator, TranslatorFactory};
