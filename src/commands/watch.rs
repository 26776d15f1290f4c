use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use hoist::application::WatchSink;
use hoist::{run_watch, FileWatcher, RuntimeConfig, WatchEvent, Workspace};

use super::Output;

pub async fn cmd_watch(workspaces: &[Arc<Workspace>], out: &Output) -> Result<()> {
    let Some(first) = workspaces.first() else {
        return Ok(());
    };

    let (tx, rx) = mpsc::unbounded_channel();
    for ws in workspaces {
        let watcher = FileWatcher::start(&[ws.folder().to_path_buf()], tx.clone())?;
        ws.register_disposable(Box::new(watcher))?;
    }
    drop(tx);

    let runtime = RuntimeConfig::from_env();
    let sink = event_sink(Arc::clone(first), out.is_json());
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    run_watch(workspaces.to_vec(), rx, runtime.watch_debounce, shutdown, sink).await;
    Ok(())
}

/// Print events as NDJSON or as translated human lines
fn event_sink(messages: Arc<Workspace>, json: bool) -> WatchSink {
    Arc::new(move |event: WatchEvent| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        match event {
            WatchEvent::WatchStarted { roots } => {
                println!("{}", messages.t("watch.started", &[&roots.len().to_string()]));
                for root in &roots {
                    println!("  {}", root);
                }
            }
            WatchEvent::FileChanged { path, change } => {
                println!("{}", messages.t("watch.change", &[&change.to_string(), &path]));
            }
            WatchEvent::ConfigReloaded { workspace } => {
                println!("{}", messages.t("watch.reloaded", &[&workspace]));
            }
            WatchEvent::Error { path, message } => {
                eprintln!("{}", messages.t("watch.failed", &[&path, &message]));
            }
            WatchEvent::Shutdown => {
                println!("{}", messages.t("watch.stopped", &[]));
            }
        }
    })
}
