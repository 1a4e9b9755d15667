//! Plan command implementation

use std::fs;
use std::path::Path;

use herald_core::error::{HeraldError, HeraldResult};
use herald_core::remote::RemoteCommand;
use herald_core::sync::{SyncPlan, plan};
use herald_core::HeraldConfig;

use super::load;

/// Diff the folder against a snapshot of the default scope
pub async fn execute(config: &HeraldConfig, snapshot: &Path, json: bool) -> HeraldResult<()> {
    let loaded = load(config).await?;
    let remote = read_snapshot(snapshot)?;
    let result = plan(&loaded.tree.data(), &remote);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in render(&result) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Read a JSON array of remote commands
pub fn read_snapshot(path: &Path) -> HeraldResult<Vec<RemoteCommand>> {
    let content = fs::read_to_string(path).map_err(|e| {
        HeraldError::io_with_path(
            format!("Failed to read remote snapshot: {}", e),
            path.display().to_string(),
        )
    })?;
    serde_json::from_str(&content)
        .map_err(|e| HeraldError::parse(e.to_string(), path.display().to_string()))
}

/// Human-readable plan, one line per change
pub fn render(result: &SyncPlan) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    lines.extend(result.create.iter().map(|d| format!("+ {}", d.name)));
    lines.extend(
        result
            .update
            .iter()
            .map(|u| format!("~ {} ({})", u.desired.name, u.current.id)),
    );
    lines.extend(
        result
            .delete
            .iter()
            .map(|r| format!("- {} ({})", r.name, r.id)),
    );
    if result.is_in_sync() {
        lines.push("Remote commands are up to date".to_string());
    } else {
        lines.push(result.to_string());
    }
    lines
}
