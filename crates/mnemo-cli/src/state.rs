//! State file handling
//!
//! Each CLI invocation loads the reasoner from a JSON snapshot, runs one
//! command, and writes the snapshot back.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mnemo_core::{Config, CortexSnapshot, Reasoner};

use crate::error::CliResult;

/// `~/.mnemo/state.json`, or `.mnemo/state.json` without a home directory
pub fn default_state_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".mnemo"))
        .unwrap_or_else(|| PathBuf::from(".mnemo"))
        .join("state.json")
}

/// Build a reasoner from `config` and restore the state file if it exists.
///
/// Capacities always come from `config`; the snapshot's own config section
/// is ignored so edits to the config file take effect.
pub async fn load_reasoner(path: &Path, config: &Config) -> CliResult<Reasoner> {
    let mut reasoner = Reasoner::from_config(config);

    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let mut snapshot = CortexSnapshot::from_json(&json)
                .map_err(|e| format!("Failed to parse state file {}: {e}", path.display()))?;
            snapshot.memory.config = None;
            reasoner.load(snapshot);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No state file, starting empty");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(reasoner)
}

/// Write the reasoner's snapshot, replacing the file atomically
pub async fn save_reasoner(path: &Path, reasoner: &Reasoner) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let json = reasoner.save().to_json()?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;

    tracing::debug!(path = %path.display(), "Saved state");
    Ok(())
}
