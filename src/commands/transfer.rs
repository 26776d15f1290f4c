use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use hoist::Workspace;

use super::workspaces::{find_package, locate_file, target_in};
use super::Output;

pub async fn cmd_deploy(workspaces: &[Arc<Workspace>], package: &str, out: &Output) -> Result<()> {
    let (ws, package) = find_package(workspaces, package)?;
    let count = ws.deploy_package(&package).await?;
    report_package(ws, out, "deploy", &package.name(), count);
    Ok(())
}

pub async fn cmd_pull(workspaces: &[Arc<Workspace>], package: &str, out: &Output) -> Result<()> {
    let (ws, package) = find_package(workspaces, package)?;
    let count = ws.pull_package(&package).await?;
    report_package(ws, out, "pull", &package.name(), count);
    Ok(())
}

pub async fn cmd_delete(
    workspaces: &[Arc<Workspace>],
    package: &str,
    ask: bool,
    out: &Output,
) -> Result<()> {
    let (ws, package) = find_package(workspaces, package)?;
    let count = ws.delete_package(&package, ask).await?;
    report_package(ws, out, "delete", &package.name(), count);
    Ok(())
}

pub async fn cmd_deploy_file(
    workspaces: &[Arc<Workspace>],
    file: &Path,
    target: &str,
    out: &Output,
) -> Result<()> {
    let (ws, file) = locate_file(workspaces, file)?;
    let target = target_in(ws, target)?;
    ws.deploy_file_to(&file, &target).await?;
    report_file(ws, out, "deploy", &file, &target.name());
    Ok(())
}

pub async fn cmd_pull_file(
    workspaces: &[Arc<Workspace>],
    file: &Path,
    target: &str,
    out: &Output,
) -> Result<()> {
    let (ws, file) = locate_file(workspaces, file)?;
    let target = target_in(ws, target)?;
    ws.pull_file_from(&file, &target).await?;
    report_file(ws, out, "pull", &file, &target.name());
    Ok(())
}

pub async fn cmd_delete_file(
    workspaces: &[Arc<Workspace>],
    file: &Path,
    target: &str,
    ask: bool,
    out: &Output,
) -> Result<()> {
    let (ws, file) = locate_file(workspaces, file)?;
    let target = target_in(ws, target)?;
    ws.delete_file_in(&file, &target, ask).await?;
    report_file(ws, out, "delete", &file, &target.name());
    Ok(())
}

fn report_package(ws: &Workspace, out: &Output, action: &str, package: &str, count: usize) {
    out.event(json!({
        "event": action,
        "workspace": ws.name(),
        "package": package,
        "files": count,
    }));
    let key = format!("{}.package.finished", action);
    out.line(ws.t(&key, &[&count.to_string(), package]));
}

fn report_file(ws: &Workspace, out: &Output, action: &str, file: &Path, target: &str) {
    let shown = ws
        .to_relative_path(file)
        .unwrap_or_else(|| file.display().to_string());
    out.event(json!({
        "event": action,
        "workspace": ws.name(),
        "file": shown,
        "target": target,
    }));
    let key = format!("{}.file.finished", action);
    out.line(ws.t(&key, &[&shown, target]));
}
