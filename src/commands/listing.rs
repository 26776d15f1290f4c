use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use hoist::domain::ports::RemoteEntryKind;
use hoist::Workspace;

use super::workspaces::find_target;
use super::Output;

pub fn cmd_packages(workspaces: &[Arc<Workspace>], out: &Output) -> Result<()> {
    for ws in workspaces {
        let packages = ws.get_packages();
        out.line(format!("{} ({})", ws.name(), ws.folder().display()));
        if packages.is_empty() {
            out.line(format!("  {}", ws.t("packages.none", &[])));
        }

        for package in &packages {
            out.event(json!({
                "event": "package",
                "workspace": ws.name(),
                "name": package.name(),
                "description": package.description(),
                "targets": package.target_names(),
                "deploy_on_change": package.deploy_on_change(),
            }));
            match package.description() {
                Some(description) => out.line(format!("  {} - {}", package.name(), description)),
                None => out.line(format!("  {}", package.name())),
            }
        }
    }
    Ok(())
}

pub fn cmd_targets(workspaces: &[Arc<Workspace>], out: &Output) -> Result<()> {
    for ws in workspaces {
        let targets = ws.get_targets();
        out.line(format!("{} ({})", ws.name(), ws.folder().display()));
        if targets.is_empty() {
            out.line(format!("  {}", ws.t("targets.none", &[])));
        }

        for target in &targets {
            out.event(json!({
                "event": "target",
                "workspace": ws.name(),
                "name": target.name(),
                "type": target.target_type(),
                "description": target.description(),
            }));
            out.line(format!("  {} [{}]", target.name(), target.target_type()));
        }
    }
    Ok(())
}

pub async fn cmd_list(
    workspaces: &[Arc<Workspace>],
    target: &str,
    dir: &str,
    out: &Output,
) -> Result<()> {
    let (ws, target) = find_target(workspaces, target)?;
    let entries = ws.list_directory(&target, dir).await?;

    if entries.is_empty() {
        let shown = if dir.is_empty() { "/" } else { dir };
        out.line(ws.t("list.empty", &[shown]));
    }
    for entry in &entries {
        out.event(json!({ "event": "entry", "target": target.name(), "entry": entry }));
        match entry.kind {
            RemoteEntryKind::Directory => out.line(format!("  {}/", entry.name)),
            RemoteEntryKind::File => match entry.size {
                Some(size) => out.line(format!("  {}  ({} bytes)", entry.name, size)),
                None => out.line(format!("  {}", entry.name)),
            },
        }
    }
    Ok(())
}
